//! Driving white noise for the AR filter.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::error::{AutoregError, Result};
use crate::grid::{Grid3, Size3};

/// A source of normally distributed samples.
pub trait NormalStream {
    fn draw_normal(&mut self, count: usize, mean: f64, std_dev: f64) -> Vec<f64>;
}

impl<R: Rng + ?Sized> NormalStream for R {
    fn draw_normal(&mut self, count: usize, mean: f64, std_dev: f64) -> Vec<f64> {
        (0..count)
            .map(|_| mean + std_dev * self.sample::<f64, _>(StandardNormal))
            .collect()
    }
}

/// Deterministic stream for `Some(seed)`, OS entropy for `None`.
pub fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    }
}

/// Fill a grid of `size` with i.i.d. `N(0, variance)` samples drawn from `stream`.
pub fn generate_white_noise<S: NormalStream + ?Sized>(size: Size3, variance: f64, stream: &mut S) -> Result<Grid3> {
    if !(variance >= 0.0 && variance.is_finite()) {
        return Err(AutoregError::NegativeVariance(variance));
    }
    let data = stream.draw_normal(size.len(), 0.0, variance.sqrt());
    check_no_nan(&data)?;
    Grid3::from_vec(size, data).ok_or_else(|| AutoregError::invalid("noise length", size.len()))
}

/// Cells drawn from one independent stream when generating in parallel.
#[cfg(feature = "threading")]
pub const CHUNK_CELLS: usize = 1 << 16;

/// Like [`generate_white_noise`], with the stream(s) built from `seed`.
///
/// With the `threading` feature the grid is split into [`CHUNK_CELLS`]-sized
/// chunks, each drawn from its own stream seeded from the chunk number, so the
/// output for a fixed seed does not depend on the number of threads.
pub fn generate_white_noise_seeded(size: Size3, variance: f64, seed: Option<u64>) -> Result<Grid3> {
    #[cfg(feature = "threading")]
    {
        use rayon::prelude::*;

        if !(variance >= 0.0 && variance.is_finite()) {
            return Err(AutoregError::NegativeVariance(variance));
        }
        let base = seed.unwrap_or_else(|| seeded_rng(None).gen());
        let std_dev = variance.sqrt();
        let mut data = vec![0.0f64; size.len()];
        data.par_chunks_mut(CHUNK_CELLS).enumerate().for_each(|(i, chunk)| {
            let mut rng = StdRng::seed_from_u64(base.wrapping_add(i as u64));
            let draws = rng.draw_normal(chunk.len(), 0.0, std_dev);
            chunk.copy_from_slice(&draws);
        });
        check_no_nan(&data)?;
        Grid3::from_vec(size, data).ok_or_else(|| AutoregError::invalid("noise length", size.len()))
    }
    #[cfg(not(feature = "threading"))]
    {
        generate_white_noise(size, variance, &mut seeded_rng(seed))
    }
}

fn check_no_nan(data: &[f64]) -> Result<()> {
    match data.iter().position(|v| v.is_nan()) {
        Some(index) => Err(AutoregError::NanInNoise { index }),
        None => Ok(()),
    }
}
