// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Drift-Wave Coupling Terms
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Parallel resistive coupling and the background density drive.
//!
//! Both return folded `(batch·z, y, x)` arrays so they combine directly
//! with the per-slice bracket and diffusion terms.

use ndarray::Array3;
use plasma_math::stencil::{d_dx_stack, laplace_parallel};
use plasma_types::error::{PlasmaError, PlasmaResult};
use plasma_types::grid::Field;

/// A density sum at or below this fraction of `Σ|n|` cannot normalize the
/// drive.
pub const DENSITY_SUM_EPS: f64 = 1e-10;

/// `(1/nu)·∇∥²(n − φ)` along the field-aligned axis.
pub fn parallel_coupling(density: &Field, phi: &Field, nu: f64, parallel_spacing: f64) -> PlasmaResult<Array3<f64>> {
    let diff = density.zip_with(phi, |n, p| n - p)?;
    let inv_nu = 1.0 / nu;
    let lap = laplace_parallel(diff.data().view(), parallel_spacing).mapv_into(|v| v * inv_nu);
    Ok(Field::from_array(diff.shape(), lap)?.fold_parallel()?.into_data())
}

/// Constant coupling `kap/nu` of the planar model.
pub fn uniform_coupling(density: &Field, kap: f64, nu: f64) -> Array3<f64> {
    Array3::from_elem(density.shape().stack_dim(), kap / nu)
}

/// `κ = ∂x n / Σn` with the sum over the whole field.
///
/// A density with no x-variation gives `κ ≡ 0` whatever its sum. Otherwise
/// `|Σn| ≤ DENSITY_SUM_EPS · Σ|n|` is rejected: such a sum is cancellation
/// round-off and would blow `κ` up.
pub fn density_drive(density: &Field, spacing: f64) -> PlasmaResult<Array3<f64>> {
    let folded = density.fold_parallel()?;
    let dx = d_dx_stack(folded.data().view(), spacing)?;
    if dx.iter().all(|&v| v == 0.0) {
        return Ok(dx);
    }
    let total = density.sum();
    let magnitude: f64 = density.data().iter().map(|v| v.abs()).sum();
    if !total.is_finite() || total.abs() <= DENSITY_SUM_EPS * magnitude {
        return Err(PlasmaError::DegenerateNormalization { total });
    }
    Ok(dx.mapv_into(|v| v / total))
}
