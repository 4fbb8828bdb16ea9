//! Small numeric helpers shared by the systems.

/// Clamp a value into `[0, 1]`.
pub(crate) fn unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// Standard logistic function.
pub(crate) fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// A head count as a float.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn as_real(count: u64) -> f64 {
    count as f64
}

/// `floor(count * rate)`, clamped to `[0, count]`.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn portion(count: u64, rate: f64) -> u64 {
    let raw = (as_real(count) * rate).floor();
    if raw <= 0.0 {
        0
    } else {
        (raw as u64).min(count)
    }
}
