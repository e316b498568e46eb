use serde::de::DeserializeOwned;
use std::io::{self, Read};

/// Deserialise a configuration piped on stdin.
///
/// Returns `None` when stdin is a TTY or the pipe is empty. JSON is tried
/// first, then YAML.
pub fn read_stdin<T: DeserializeOwned>() -> Result<Option<T>, Box<dyn std::error::Error>> {
    if atty::is(atty::Stream::Stdin) {
        return Ok(None);
    }

    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    parse_piped(&buffer)
}

fn parse_piped<T: DeserializeOwned>(buffer: &str) -> Result<Option<T>, Box<dyn std::error::Error>> {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    if let Ok(value) = serde_json::from_str(trimmed) {
        return Ok(Some(value));
    }
    let value: T = serde_yaml::from_str(trimmed)
        .map_err(|e| format!("Failed to parse configuration from stdin: {e}"))?;
    Ok(Some(value))
}
