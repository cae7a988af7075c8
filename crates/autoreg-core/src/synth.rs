//! Recursive AR filtering of the noise grid, and removal of the warm-up region.
//!
//! Near the origin of each axis the filter support is clamped to the cells
//! that exist, so the first cells see a shortened filter. Those cells are
//! statistically off-model; they are discarded by [`trim_zeta`].
use crate::error::{AutoregError, Result};
use crate::grid::{Grid3, Size3};

/// Apply the AR filter `phi` to `zeta` in place, in raster order.
///
/// `zeta` holds independent noise on entry; on return every cell is its noise
/// draw plus the AR prediction from the causally preceding cells.
pub fn generate_zeta(phi: &Grid3, mut zeta: Grid3) -> Grid3 {
    let f = phi.size;
    let z = zeta.size;
    for t in 0..z.t {
        let m1 = (t + 1).min(f.t);
        for x in 0..z.x {
            let m2 = (x + 1).min(f.x);
            for y in 0..z.y {
                let m3 = (y + 1).min(f.y);
                let mut sum = 0.0;
                for k in 0..m1 {
                    for i in 0..m2 {
                        let p = phi.index(k, i, 0);
                        let q = zeta.index(t - k, x - i, y);
                        for j in 0..m3 {
                            sum += phi.data[p + j] * zeta.data[q - j];
                        }
                    }
                }
                let c = zeta.index(t, x, y);
                zeta.data[c] += sum;
            }
        }
    }
    zeta
}

/// Keep the last `zsize` entries along every axis of `zeta`.
pub fn trim_zeta(zeta: &Grid3, zsize: Size3) -> Result<Grid3> {
    if !zeta.size.covers(&zsize) {
        return Err(AutoregError::invalid("trimmed size", format!("{zsize} exceeds {}", zeta.size)));
    }
    let dt = zeta.size.t - zsize.t;
    let dx = zeta.size.x - zsize.x;
    let dy = zeta.size.y - zsize.y;
    let mut out = Grid3::zeros(zsize);
    for t in 0..zsize.t {
        for x in 0..zsize.x {
            let src = zeta.index(t + dt, x + dx, dy);
            let dst = out.index(t, x, 0);
            out.data[dst..dst + zsize.y].copy_from_slice(&zeta.data[src..src + zsize.y]);
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn counting(size: Size3) -> Grid3 {
        Grid3::from_fn(size, |t, x, y| (t * 100 + x * 10 + y) as f64)
    }

    /// Straightforward transcription of the recurrence for cross-checking.
    fn reference(phi: &Grid3, zeta: &mut Grid3) {
        let (f, z) = (phi.size, zeta.size);
        for t in 0..z.t {
            for x in 0..z.x {
                for y in 0..z.y {
                    let mut sum = 0.0;
                    for k in 0..(t + 1).min(f.t) {
                        for i in 0..(x + 1).min(f.x) {
                            for j in 0..(y + 1).min(f.y) {
                                sum += phi.get(k, i, j) * zeta.get(t - k, x - i, y - j);
                            }
                        }
                    }
                    let v = zeta.get(t, x, y) + sum;
                    zeta.set(t, x, y, v);
                }
            }
        }
    }

    #[test]
    fn trim_keeps_last_entries() {
        let z = counting(Size3::new(10, 10, 10));
        let trimmed = trim_zeta(&z, Size3::new(6, 6, 6)).unwrap();
        assert_eq!(trimmed.size, Size3::new(6, 6, 6));
        for t in 0..6 {
            for x in 0..6 {
                for y in 0..6 {
                    assert_eq!(trimmed.get(t, x, y), z.get(t + 4, x + 4, y + 4));
                }
            }
        }
    }

    #[test]
    fn trim_with_uneven_margins() {
        let z = counting(Size3::new(5, 4, 3));
        let trimmed = trim_zeta(&z, Size3::new(2, 4, 1)).unwrap();
        assert_eq!(trimmed.data, vec![302.0, 312.0, 322.0, 332.0, 402.0, 412.0, 422.0, 432.0]);
    }

    #[test]
    fn trim_to_larger_size_is_rejected() {
        let z = counting(Size3::new(4, 4, 4));
        assert!(matches!(trim_zeta(&z, Size3::new(5, 4, 4)), Err(AutoregError::InvalidConfig { .. })));
    }

    #[test]
    fn origin_cell_keeps_its_noise_draw() {
        let phi = Grid3::from_fn(Size3::new(2, 2, 2), |t, x, y| if t + x + y == 0 { 0.0 } else { 0.3 });
        let noise = counting(Size3::new(4, 4, 4)).data.iter().map(|v| v + 1.0).collect();
        let noise = Grid3::from_vec(Size3::new(4, 4, 4), noise).unwrap();
        let zeta = generate_zeta(&phi, noise.clone());
        assert_eq!(zeta.get(0, 0, 0), noise.get(0, 0, 0));
        assert_ne!(zeta.get(1, 1, 1), noise.get(1, 1, 1));
    }

    #[test]
    fn ar1_along_time_accumulates_geometrically() {
        let mut phi = Grid3::zeros(Size3::new(2, 1, 1));
        phi.set(1, 0, 0, 0.5);
        let mut noise = Grid3::zeros(Size3::new(5, 1, 1));
        noise.set(0, 0, 0, 1.0);
        let zeta = generate_zeta(&phi, noise);
        assert_eq!(zeta.data, vec![1.0, 0.5, 0.25, 0.125, 0.0625]);
    }

    #[test]
    fn matches_direct_recurrence() {
        let phi = Grid3::from_fn(Size3::new(3, 2, 3), |t, x, y| {
            if t + x + y == 0 { 0.0 } else { 0.1 / (1 + t + x + y) as f64 }
        });
        let noise = Grid3::from_fn(Size3::new(6, 5, 7), |t, x, y| ((t * 7 + x * 3 + y) % 5) as f64 - 2.0);
        let mut expected = noise.clone();
        reference(&phi, &mut expected);
        let got = generate_zeta(&phi, noise);
        for (a, b) in got.data.iter().zip(&expected.data) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
    }
}
