/// Binomial coefficient `C(n, k)` ("n choose k") in floating point.
///
/// Uses the multiplicative form `C(n, k) = prod_{i=1..k} (n - k + i) / i`,
/// multiplying then dividing at each step so the running value stays an
/// integer-valued float for as long as f64 can represent it exactly.
///
/// Precision boundary: results are exact for small `n`; relative error grows
/// slowly with `n`, and the central coefficients overflow to infinity past
/// `n` of roughly 1030. Callers bound `n` (see `lattice::MAX_STEPS`).
pub fn binomial_coefficient(n: usize, k: usize) -> f64 {
    if k > n {
        return 0.0;
    }
    let mut result = 1.0_f64;
    for i in 1..=k {
        result *= (n - k + i) as f64;
        result /= i as f64;
    }
    result
}
