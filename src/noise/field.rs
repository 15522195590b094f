use crate::foundation::core::Vec2;
use crate::foundation::math::{finite_or_zero, lerp, mix64, unit_f64};

/// Amplitude multiplier applied per fbm octave.
pub const FBM_GAIN: f64 = 0.53;
/// Frequency multiplier applied per fbm octave.
pub const FBM_LACUNARITY: f64 = 1.9;
/// Finite-difference step used by [`NoiseField::curl`].
pub(crate) const CURL_EPSILON: f64 = 1e-3;

const CURL_OCTAVES: u32 = 3;
const OCTAVE_SEED_STRIDE: u64 = 0x2545_F491_4F6C_DD1D;

/// Hash an integer lattice point into `[0, 1)`.
pub fn hash2d(ix: i64, iy: i64, seed: u64) -> f64 {
    let mut h = seed ^ 0x9E37_79B9_7F4A_7C15;
    h = mix64(h ^ (ix as u64).wrapping_mul(0xD6E8_FEB8_6659_FD93));
    h = mix64(h ^ (iy as u64).wrapping_mul(0xA076_1D64_78BD_642F));
    unit_f64(h)
}

fn value_noise_seeded(x: f64, y: f64, seed: u64) -> f64 {
    let x = finite_or_zero(x);
    let y = finite_or_zero(y);
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    // `as` saturates, so huge coordinates pin to the lattice edge instead of wrapping.
    let ix = x0 as i64;
    let iy = y0 as i64;

    let u = fx * fx * (3.0 - 2.0 * fx);
    let v = fy * fy * (3.0 - 2.0 * fy);

    let a = hash2d(ix, iy, seed);
    let b = hash2d(ix.wrapping_add(1), iy, seed);
    let c = hash2d(ix, iy.wrapping_add(1), seed);
    let d = hash2d(ix.wrapping_add(1), iy.wrapping_add(1), seed);

    lerp(lerp(a, b, u), lerp(c, d, u), v)
}

/// Seeded value-noise field with fbm and curl helpers.
///
/// Every method is a pure function of the seed and its arguments, so two fields with the
/// same seed produce bit-identical output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NoiseField {
    seed: u64,
}

impl NoiseField {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Bilinear value noise with smoothstep easing, in `[0, 1]`.
    pub fn value_noise(&self, x: f64, y: f64) -> f64 {
        value_noise_seeded(x, y, self.seed)
    }

    /// Fractal Brownian motion over `octaves` time-shifted value-noise layers.
    ///
    /// The result lies in `[0, amplitude / (1 - FBM_GAIN))`; zero octaves yield `0`.
    pub fn fbm(&self, x: f64, y: f64, t: f64, octaves: u32, amplitude: f64) -> f64 {
        let t = finite_or_zero(t);
        let mut sum = 0.0;
        let mut amp = amplitude;
        let mut freq = 1.0;
        for octave in 0..octaves {
            let o = f64::from(octave);
            let drift = t * (0.35 + 0.17 * o);
            let seed = self
                .seed
                .wrapping_add(u64::from(octave).wrapping_mul(OCTAVE_SEED_STRIDE));
            sum += amp * value_noise_seeded(x * freq + drift, y * freq - drift * 0.6, seed);
            amp *= FBM_GAIN;
            freq *= FBM_LACUNARITY;
        }
        finite_or_zero(sum)
    }

    /// Curl of a 3-octave fbm potential: `(dψ/dy, -dψ/dx)` by forward differences.
    pub fn curl(&self, x: f64, y: f64, t: f64) -> Vec2 {
        let psi = self.fbm(x, y, t, CURL_OCTAVES, 1.0);
        let psi_x = self.fbm(x + CURL_EPSILON, y, t, CURL_OCTAVES, 1.0);
        let psi_y = self.fbm(x, y + CURL_EPSILON, t, CURL_OCTAVES, 1.0);
        let dpdx = (psi_x - psi) / CURL_EPSILON;
        let dpdy = (psi_y - psi) / CURL_EPSILON;
        Vec2::new(finite_or_zero(dpdy), finite_or_zero(-dpdx))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/noise/field.rs"]
mod tests;
