use serde::{Deserialize, Serialize};

use crate::acf::AcfParams;
use crate::error::{AutoregError, Result};
use crate::grid::{Delta3, Size3};

/// All inputs of a synthesis run.
/// Defaults describe a long, narrow surface: 768 time steps over a 24×24 patch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    /// Size of the output surface.
    pub zsize: Size3,
    /// Grid spacing of the surface (and of the ACF lags).
    pub zdelta: Delta3,
    /// Size of the ACF grid, which is also the AR filter size.
    pub acf_size: Size3,
    /// Ratio of the working (enlarged) size to `zsize`; ≥ 1.
    pub size_factor: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
    /// Noise seed; `None` draws one from OS entropy.
    pub seed: Option<u64>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let acf = AcfParams::default();
        Self {
            zsize: Size3::new(768, 24, 24),
            zdelta: Delta3::default(),
            acf_size: Size3::new(10, 10, 10),
            size_factor: 1.2,
            alpha: acf.alpha,
            beta: acf.beta,
            gamma: acf.gamma,
            seed: None,
        }
    }
}

impl ModelConfig {
    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }

    pub fn acf_params(&self) -> AcfParams {
        AcfParams { alpha: self.alpha, beta: self.beta, gamma: self.gamma }
    }

    /// Working size including the filter warm-up margin.
    pub fn enlarged_size(&self) -> Size3 {
        self.zsize.scaled(self.size_factor)
    }

    /// Check for input errors and numerical constraints of the pipeline.
    pub fn validate(&self) -> Result<()> {
        check_non_zero(&self.zsize, "zsize")?;
        check_non_zero(&self.acf_size, "acf_size")?;
        // The Yule-Walker matrix has acf_size.len() squared entries.
        if self.acf_size.len().checked_mul(self.acf_size.len()).is_none() {
            return Err(AutoregError::invalid("acf_size", format!("{} is too large to fit", self.acf_size)));
        }
        let d = self.zdelta;
        if !(d.t > 0.0 && d.x > 0.0 && d.y > 0.0) {
            return Err(AutoregError::invalid("zdelta", d));
        }
        if !(self.size_factor >= 1.0) {
            return Err(AutoregError::invalid("size_factor", self.size_factor));
        }
        let enlarged = self.enlarged_size();
        if enlarged.checked_len().is_none() {
            return Err(AutoregError::invalid(
                "size_factor",
                format!("{} gives enlarged size {enlarged} beyond addressable memory", self.size_factor),
            ));
        }
        if !enlarged.covers(&self.zsize) {
            return Err(AutoregError::invalid("enlarged size", format!("{enlarged} < zsize {}", self.zsize)));
        }
        if self.acf_size.t > self.zsize.t {
            return Err(AutoregError::invalid(
                "acf_size",
                format!("time extent {} exceeds zsize time extent {}", self.acf_size.t, self.zsize.t),
            ));
        }
        for (name, value) in [("alpha", self.alpha), ("beta", self.beta)] {
            if !(value >= 0.0 && value.is_finite()) {
                return Err(AutoregError::invalid(name, value));
            }
        }
        if !self.gamma.is_finite() {
            return Err(AutoregError::invalid("gamma", self.gamma));
        }
        Ok(())
    }
}

fn check_non_zero(size: &Size3, field: &'static str) -> Result<()> {
    if size.is_empty() || size.checked_len().is_none() {
        return Err(AutoregError::invalid(field, size));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = ModelConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.enlarged_size(), Size3::new(921, 28, 28));
    }

    #[test]
    fn missing_keys_take_defaults() {
        let cfg = ModelConfig::from_json(r#"{ "zsize": [16, 5, 5], "acf_size": [3, 3, 3], "seed": 4 }"#).unwrap();
        assert_eq!(cfg.zsize, Size3::new(16, 5, 5));
        assert_eq!(cfg.size_factor, 1.2);
        assert_eq!(cfg.seed, Some(4));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(ModelConfig::from_json(r#"{ "zsise": [1, 1, 1] }"#).is_err());
    }

    fn field_of(cfg: &ModelConfig) -> &'static str {
        match cfg.validate() {
            Err(AutoregError::InvalidConfig { field, .. }) => field,
            other => panic!("expected InvalidConfig, got {other:?}"),
        }
    }

    #[test]
    fn invalid_configurations_name_the_field() {
        let base = ModelConfig { zsize: Size3::new(16, 5, 5), acf_size: Size3::new(3, 3, 3), ..Default::default() };

        let cfg = ModelConfig { zsize: Size3::new(16, 0, 5), ..base.clone() };
        assert_eq!(field_of(&cfg), "zsize");

        let cfg = ModelConfig { acf_size: Size3::new(0, 3, 3), ..base.clone() };
        assert_eq!(field_of(&cfg), "acf_size");

        let cfg = ModelConfig { zdelta: Delta3::new(1.0, 0.0, 1.0), ..base.clone() };
        assert_eq!(field_of(&cfg), "zdelta");

        let cfg = ModelConfig { size_factor: 0.9, ..base.clone() };
        assert_eq!(field_of(&cfg), "size_factor");

        let cfg = ModelConfig { acf_size: Size3::new(17, 3, 3), ..base.clone() };
        assert_eq!(field_of(&cfg), "acf_size");

        let cfg = ModelConfig { alpha: f64::NAN, ..base.clone() };
        assert_eq!(field_of(&cfg), "alpha");

        let cfg = ModelConfig { alpha: -400.0, ..base.clone() };
        assert_eq!(field_of(&cfg), "alpha");

        let cfg = ModelConfig { beta: -0.5, ..base.clone() };
        assert_eq!(field_of(&cfg), "beta");

        let cfg = ModelConfig { gamma: f64::INFINITY, ..base };
        assert_eq!(field_of(&cfg), "gamma");
    }

    #[test]
    fn overflowing_sizes_are_rejected_without_panicking() {
        let huge = ModelConfig {
            zsize: Size3::new(1 << 22, 1 << 22, 1 << 22),
            acf_size: Size3::new(1, 1, 1),
            ..Default::default()
        };
        assert_eq!(field_of(&huge), "zsize");

        let huge_acf = ModelConfig { acf_size: Size3::new(1, 1 << 32, 1 << 32), ..Default::default() };
        assert_eq!(field_of(&huge_acf), "acf_size");

        let wide_acf = ModelConfig { acf_size: Size3::new(1, 1 << 16, 1 << 16), ..Default::default() };
        assert_eq!(field_of(&wide_acf), "acf_size");

        let factor = ModelConfig {
            zsize: Size3::new(2, 2, 2),
            acf_size: Size3::new(1, 1, 1),
            size_factor: 1e30,
            ..Default::default()
        };
        assert_eq!(field_of(&factor), "size_factor");
    }
}
