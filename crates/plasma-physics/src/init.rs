// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Initial Conditions
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Initial fields for drift-wave runs.

use plasma_types::grid::{Domain, Field};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// `amplitude · sin(2π(kx·x/nx + ky·y/ny))` on every `(batch, z)` plane.
/// Integer mode numbers keep the field periodic and mean-free.
pub fn sinusoidal_mode(domain: &Domain, kx: usize, ky: usize, amplitude: f64) -> Field {
    let shape = domain.shape;
    let (fx, fy) = (kx as f64 / shape.nx as f64, ky as f64 / shape.ny as f64);
    Field::from_shape_fn(shape, |(_, _, y, x)| {
        amplitude * (2.0 * std::f64::consts::PI * (fx * x as f64 + fy * y as f64)).sin()
    })
}

/// Independent `N(0, amplitude²)` samples, reproducible from `seed`.
pub fn gaussian_noise(domain: &Domain, amplitude: f64, seed: u64) -> Field {
    let mut rng = StdRng::seed_from_u64(seed);
    Field::from_shape_fn(domain.shape, |_| amplitude * rng.sample::<f64, _>(StandardNormal))
}
