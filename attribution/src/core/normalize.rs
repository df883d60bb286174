//! Rescaling raw Shapley values onto the conversion value

use crate::error::{AttributionError, AttributionResult};

/// Relative size below which a negative raw weight is treated as rounding noise
const NEGATIVE_NOISE: f64 = 1e-12;

/// Scale `raw` so the weights sum exactly to `total`
///
/// A zero total yields all-zero weights. For a positive total the raw values
/// must have a positive, finite sum.
pub fn normalize(raw: &[f64], total: f64) -> AttributionResult<Vec<f64>> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    if total == 0.0 {
        return Ok(vec![0.0; raw.len()]);
    }

    let magnitude: f64 = raw.iter().map(|w| w.abs()).sum();
    let cleaned: Vec<f64> = raw
        .iter()
        .map(|&w| if w < 0.0 && -w <= NEGATIVE_NOISE * magnitude { 0.0 } else { w })
        .collect();

    let sum: f64 = cleaned.iter().sum();
    if !sum.is_finite() || sum <= 0.0 {
        return Err(AttributionError::internal(format!(
            "cannot rescale weights summing to {sum} onto {total}"
        )));
    }

    let scale = total / sum;
    Ok(cleaned.into_iter().map(|w| w * scale).collect())
}
