use napi::Result as NapiResult;
use napi_derive::napi;

use bopm_core::PricingConfig;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn parse_config(input_json: &str) -> NapiResult<PricingConfig> {
    serde_json::from_str(input_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Lattice
// ---------------------------------------------------------------------------

/// Lattice summary (terminal distribution and every node) for a pricing
/// configuration. Strike and rate are accepted but unused.
#[napi]
pub fn build_lattice(input_json: String) -> NapiResult<String> {
    let config = parse_config(&input_json)?;
    let (_, output) = bopm_core::lattice::describe_lattice(&config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

#[napi]
pub fn price_european(input_json: String) -> NapiResult<String> {
    let config = parse_config(&input_json)?;
    let output = bopm_core::pricing::price_european(&config).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
