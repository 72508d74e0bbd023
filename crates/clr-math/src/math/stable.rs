//! Numerically stable primitives for logistic and logit-space math.

/// Smallest distance a probability is kept from 0 or 1 before taking a logit.
pub const PROBABILITY_EPSILON: f64 = 1e-12;

/// Logistic function that never overflows `exp`.
///
/// Non-negative inputs use `1 / (1 + e^-x)`, negative inputs use
/// `e^x / (1 + e^x)`. Both branches only ever exponentiate a non-positive
/// number, so for huge magnitudes the exponential underflows to zero and the
/// result saturates to exactly `1.0` or `0.0`.
///
/// NaN input yields NaN.
pub fn stable_sigmoid(x: f64) -> f64 {
    if x >= 0.0 {
        let z = (-x).exp();
        1.0 / (1.0 + z)
    } else {
        let z = x.exp();
        z / (1.0 + z)
    }
}

/// Clamp a probability into `[PROBABILITY_EPSILON, 1 - PROBABILITY_EPSILON]`.
///
/// NaN passes through unchanged.
pub fn clamp_probability(p: f64) -> f64 {
    if p.is_nan() {
        return p;
    }
    p.max(PROBABILITY_EPSILON).min(1.0 - PROBABILITY_EPSILON)
}

/// Log-odds `ln(p / (1 - p))` of a clamped probability.
///
/// Always finite for finite or infinite `p`; NaN yields NaN.
pub fn logit(p: f64) -> f64 {
    let clamped = clamp_probability(p);
    (clamped / (1.0 - clamped)).ln()
}
