//! Sample moments used for pipeline diagnostics.
use crate::error::{AutoregError, Result};

/// Arithmetic mean. Fails on empty input.
pub fn mean(data: &[f64]) -> Result<f64> {
    if data.is_empty() {
        return Err(AutoregError::TooFewSamples { len: 0, required: 1 });
    }
    Ok(data.iter().sum::<f64>() / data.len() as f64)
}

/// Unbiased sample variance (divides by `n − 1`). Fails for fewer than two samples.
pub fn variance(data: &[f64]) -> Result<f64> {
    if data.len() < 2 {
        return Err(AutoregError::TooFewSamples { len: data.len(), required: 2 });
    }
    let m = mean(data)?;
    let ss: f64 = data.iter().map(|&v| (v - m).powi(2)).sum();
    Ok(ss / (data.len() - 1) as f64)
}
