//! Deterministic fractal value noise for grid generation.
//!
//! Integer lattice points are hashed with a `SplitMix64` finalizer into
//! values in `[-1, 1]`; samples between lattice points are interpolated with
//! a smoothstep curve. Three octaves are summed (lacunarity 2, gain 0.5) and
//! the sum is divided by the total amplitude so output stays in `[-1, 1]`.
//! The same seed always yields the same field on every platform.

/// Number of summed octaves.
const OCTAVES: u32 = 3;
/// Frequency multiplier between octaves.
const LACUNARITY: f64 = 2.0;
/// Amplitude multiplier between octaves.
const GAIN: f64 = 0.5;

/// Multiplier decorrelating lattice columns.
const X_PRIME: u64 = 0x9E37_79B9_7F4A_7C15;
/// Multiplier decorrelating lattice rows.
const Y_PRIME: u64 = 0xC2B2_AE3D_27D4_EB4F;

/// A seeded 2D value-noise field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValueNoise {
    seed: u64,
    frequency: f64,
}

impl ValueNoise {
    /// Create a field with the given seed and base frequency.
    pub const fn new(seed: u64, frequency: f64) -> Self {
        Self { seed, frequency }
    }

    /// Fractal sample at `(x, y)` in `[-1, 1]`.
    pub fn sample(&self, x: f64, y: f64) -> f64 {
        let mut sum = 0.0;
        let mut amplitude = 1.0;
        let mut total_amplitude = 0.0;
        let mut frequency = self.frequency;
        for octave in 0..OCTAVES {
            let octave_seed = self.seed.wrapping_add(u64::from(octave).wrapping_mul(X_PRIME));
            sum += amplitude * lattice_sample(octave_seed, x * frequency, y * frequency);
            total_amplitude += amplitude;
            amplitude *= GAIN;
            frequency *= LACUNARITY;
        }
        if total_amplitude <= 0.0 {
            return 0.0;
        }
        (sum / total_amplitude).clamp(-1.0, 1.0)
    }
}

/// Single-octave smoothed value noise.
fn lattice_sample(seed: u64, x: f64, y: f64) -> f64 {
    let x0 = x.floor();
    let y0 = y.floor();
    let tx = smoothstep(x - x0);
    let ty = smoothstep(y - y0);

    #[allow(clippy::cast_possible_truncation)]
    let (ix, iy) = (x0 as i64, y0 as i64);
    let ix1 = ix.saturating_add(1);
    let iy1 = iy.saturating_add(1);

    let v00 = lattice_value(seed, ix, iy);
    let v10 = lattice_value(seed, ix1, iy);
    let v01 = lattice_value(seed, ix, iy1);
    let v11 = lattice_value(seed, ix1, iy1);

    let top = (v10 - v00).mul_add(tx, v00);
    let bottom = (v11 - v01).mul_add(tx, v01);
    (bottom - top).mul_add(ty, top)
}

/// Hashed lattice value in `[-1, 1]`.
fn lattice_value(seed: u64, ix: i64, iy: i64) -> f64 {
    let ux = u64::from_ne_bytes(ix.to_ne_bytes());
    let uy = u64::from_ne_bytes(iy.to_ne_bytes());
    let hashed = splitmix64(seed ^ ux.wrapping_mul(X_PRIME) ^ uy.wrapping_mul(Y_PRIME));
    let high = u32::try_from(hashed >> 32).unwrap_or(u32::MAX);
    (f64::from(high) / f64::from(u32::MAX)).mul_add(2.0, -1.0)
}

/// `SplitMix64` output finalizer.
const fn splitmix64(value: u64) -> u64 {
    let mut z = value.wrapping_add(0x9E37_79B9_7F4A_7C15);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

fn smoothstep(t: f64) -> f64 {
    t * t * 2.0f64.mul_add(-t, 3.0)
}
