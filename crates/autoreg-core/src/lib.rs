//! Three-dimensional autoregressive synthesis of wavy surfaces.
//!
//! A model ACF is fitted with an AR filter through the Yule-Walker
//! equations; the filter is then run over white noise to produce a field
//! (time × two spatial axes) with the prescribed second-order statistics.

pub mod acf;
pub mod config;
pub mod error;
pub mod grid;
pub mod matrix;
pub mod model;
pub mod noise;
pub mod solver;
pub mod stats;
pub mod synth;
pub mod yule_walker;

pub use acf::{acf_variance, approx_acf, AcfParams};
pub use config::ModelConfig;
pub use error::{AutoregError, Result};
pub use grid::{Delta3, Grid3, Size3};
pub use model::{ArFit, AutoregModel, Diagnostics, SurfaceResult};
pub use noise::{generate_white_noise, generate_white_noise_seeded, seeded_rng, NormalStream};
pub use solver::{LuSolver, SolveError, SymmetricSolver};
pub use synth::{generate_zeta, trim_zeta};
pub use yule_walker::{compute_ar_coefs, compute_ar_coefs_with, is_stationary, white_noise_variance};
