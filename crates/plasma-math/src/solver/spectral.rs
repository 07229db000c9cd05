// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Spectral Poisson Solver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Direct FFT inversion of the discrete 5-point Laplacian.
//!
//! Divides by the exact symbol of the finite-difference operator rather
//! than `−k²`, so the result matches the iterative solvers to round-off.
//! The `k = 0` bin is zeroed, which fixes the potential to zero mean.
//! Fully periodic planes only.

use std::f64::consts::PI;

use ndarray::{Array1, ArrayView2};
use num_complex::Complex64;
use plasma_types::error::{PlasmaError, PlasmaResult};
use plasma_types::grid::{Plane, SliceStack};

use super::{solve_slices, PoissonSolver};
use crate::fft::Fft2;

#[derive(Debug, Clone, Copy, Default)]
pub struct SpectralPoisson;

/// 1D symbol `(2cos(2πm/n) − 2) / d²` for every wavenumber bin.
fn symbol(n: usize, d: f64) -> Array1<f64> {
    Array1::from_shape_fn(n, |m| (2.0 * (2.0 * PI * m as f64 / n as f64).cos() - 2.0) / (d * d))
}

impl PoissonSolver for SpectralPoisson {
    fn solve(
        &self,
        rhs: &SliceStack,
        plane: &Plane,
        _guess: Option<&SliceStack>,
    ) -> PlasmaResult<(SliceStack, usize)> {
        if !plane.is_periodic() {
            return Err(PlasmaError::ConfigError(
                "spectral Poisson solver requires periodic y and x boundaries".to_string(),
            ));
        }
        let fft = Fft2::new(plane.ny, plane.nx);
        let sy = symbol(plane.ny, plane.spacing);
        let sx = symbol(plane.nx, plane.spacing);

        solve_slices(rhs, plane, None, |b: ArrayView2<f64>, _| {
            let mut spectrum = fft.forward(b);
            for ((i, j), c) in spectrum.indexed_iter_mut() {
                let lambda = sy[i] + sx[j];
                *c = if lambda.abs() < 1e-300 { Complex64::new(0.0, 0.0) } else { *c / lambda };
            }
            Ok((fft.inverse(&spectrum), 1))
        })
    }

    fn name(&self) -> &'static str {
        "spectral"
    }
}
