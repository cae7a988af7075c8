//! Pipeline orchestrator: runs all synthesis stages in order.

use serde::Serialize;
use std::time::Instant;
use tracing::{debug, info, warn};

use crate::acf::{acf_variance, approx_acf};
use crate::config::ModelConfig;
use crate::error::Result;
use crate::grid::{Grid3, Size3};
use crate::noise::generate_white_noise_seeded;
use crate::stats::{mean, variance};
use crate::synth::{generate_zeta, trim_zeta};
use crate::yule_walker::{compute_ar_coefs, white_noise_variance};

/// Sample moments collected along the way. Informational only.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Diagnostics {
    pub acf_variance: f64,
    pub noise_mean: f64,
    pub noise_variance: f64,
    pub zeta_mean: f64,
    pub zeta_variance: f64,
}

/// The fitted AR model, without a realization.
#[derive(Debug, Clone, Serialize)]
pub struct ArFit {
    pub acf: Grid3,
    pub ar_coefs: Grid3,
    pub white_noise_variance: f64,
}

/// Full output of the synthesis pipeline.
#[derive(Debug, Clone)]
pub struct SurfaceResult {
    /// Trimmed surface, `zsize` cells.
    pub zeta: Grid3,
    pub fit: ArFit,
    pub diagnostics: Diagnostics,
    pub generation_time_ms: u64,
}

/// Validated configuration plus the stages that act on it.
pub struct AutoregModel {
    config: ModelConfig,
}

impl AutoregModel {
    /// Validate `config` and wrap it.
    pub fn new(config: ModelConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Log the parameters this model will run with.
    pub fn echo_parameters(&self) {
        let c = &self.config;
        info!(
            acf_size = %c.acf_size,
            zsize = %c.zsize,
            zsize2 = %c.enlarged_size(),
            zdelta = %c.zdelta,
            size_factor = c.size_factor,
            alpha = c.alpha,
            beta = c.beta,
            gamma = c.gamma,
            "model parameters"
        );
    }

    /// ACF, AR coefficients and residual variance.
    pub fn fit(&self) -> Result<ArFit> {
        let c = &self.config;
        let acf = approx_acf(&c.acf_params(), &c.zdelta, c.acf_size);
        let ar_coefs = compute_ar_coefs(&acf)?;
        let white_noise_variance = white_noise_variance(&ar_coefs, &acf)?;
        info!(acf_variance = acf_variance(&acf), wn_variance = white_noise_variance, "AR model fitted");
        Ok(ArFit { acf, ar_coefs, white_noise_variance })
    }

    /// Run the full pipeline.
    ///
    /// Pipeline order:
    ///   1. ACF model
    ///   2. Yule-Walker fit + stationarity check
    ///   3. White noise on the enlarged grid
    ///   4. AR filtering in place
    ///   5. Trimming of the warm-up region
    pub fn act(&self) -> Result<SurfaceResult> {
        let start = Instant::now();
        self.echo_parameters();

        // ── 1–2. Model fit ───────────────────────────────────────────────────
        let fit = self.fit()?;

        // ── 3. White noise ──────────────────────────────────────────────────
        let zsize2 = self.config.enlarged_size();
        warn_if_short_margin(zsize2, self.config.zsize, fit.ar_coefs.size);
        let eps = generate_white_noise_seeded(zsize2, fit.white_noise_variance, self.config.seed)?;
        let (noise_mean, noise_variance) = moments(&eps)?;
        info!(mean = noise_mean, variance = noise_variance, "white noise generated");

        // ── 4. AR filtering ─────────────────────────────────────────────────
        let zeta2 = generate_zeta(&fit.ar_coefs, eps);
        let (zeta_mean, zeta_variance) = moments(&zeta2)?;
        info!(mean = zeta_mean, variance = zeta_variance, "surface synthesized");

        // ── 5. Trim ─────────────────────────────────────────────────────────
        let zeta = trim_zeta(&zeta2, self.config.zsize)?;
        let generation_time_ms = start.elapsed().as_millis() as u64;
        debug!(shape = %zeta.size, generation_time_ms, "warm-up region trimmed");

        Ok(SurfaceResult {
            zeta,
            diagnostics: Diagnostics {
                acf_variance: acf_variance(&fit.acf),
                noise_mean,
                noise_variance,
                zeta_mean,
                zeta_variance,
            },
            fit,
            generation_time_ms,
        })
    }
}

fn moments(g: &Grid3) -> Result<(f64, f64)> {
    Ok((mean(&g.data)?, variance(&g.data)?))
}

fn warn_if_short_margin(enlarged: Size3, zsize: Size3, fsize: Size3) {
    let margin = |e: usize, z: usize| e - z;
    let need = |f: usize| f.saturating_sub(1);
    if margin(enlarged.t, zsize.t) < need(fsize.t)
        || margin(enlarged.x, zsize.x) < need(fsize.x)
        || margin(enlarged.y, zsize.y) < need(fsize.y)
    {
        warn!(%enlarged, %zsize, %fsize, "warm-up margin is shorter than the AR filter; trimmed surface keeps edge cells");
    }
}
