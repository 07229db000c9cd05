// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Periodic Stencils
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Central finite differences with periodic wrap.
//!
//! Perpendicular operators act on `[y, x]` slices; the parallel operator
//! acts along `z` of a `(batch, z, y, x)` array.

use ndarray::{Array2, Array3, Array4, ArrayView2, ArrayView3, ArrayView4};
use plasma_types::error::PlasmaResult;

use crate::batch::par_map_slices;
use crate::padding::{periodic_pad, wrap};

/// Central first derivatives `(∂y f, ∂x f)`, each `(f[i+1] - f[i-1]) / 2d`.
pub fn gradient_periodic(f: ArrayView2<f64>, d: f64) -> (Array2<f64>, Array2<f64>) {
    let (h, w) = f.dim();
    let p = periodic_pad(f);
    let inv = 1.0 / (2.0 * d);
    let dy = Array2::from_shape_fn((h, w), |(i, j)| (p[[i + 2, j + 1]] - p[[i, j + 1]]) * inv);
    let dx = Array2::from_shape_fn((h, w), |(i, j)| (p[[i + 1, j + 2]] - p[[i + 1, j]]) * inv);
    (dy, dx)
}

/// `∂y f` of every slice.
pub fn d_dy_stack(f: ArrayView3<f64>, d: f64) -> PlasmaResult<Array3<f64>> {
    par_map_slices(f, |s| Ok(gradient_periodic(s, d).0))
}

/// `∂x f` of every slice.
pub fn d_dx_stack(f: ArrayView3<f64>, d: f64) -> PlasmaResult<Array3<f64>> {
    par_map_slices(f, |s| Ok(gradient_periodic(s, d).1))
}

/// 5-point perpendicular Laplacian.
pub fn laplace_periodic(f: ArrayView2<f64>, d: f64) -> Array2<f64> {
    let (h, w) = f.dim();
    let p = periodic_pad(f);
    let inv_d2 = 1.0 / (d * d);
    Array2::from_shape_fn((h, w), |(i, j)| {
        let (ci, cj) = (i + 1, j + 1);
        (p[[ci - 1, cj]] + p[[ci + 1, cj]] + p[[ci, cj - 1]] + p[[ci, cj + 1]] - 4.0 * p[[ci, cj]])
            * inv_d2
    })
}

/// Perpendicular Laplacian of every slice, slices in parallel.
pub fn laplace_perp_stack(f: ArrayView3<f64>, d: f64) -> PlasmaResult<Array3<f64>> {
    par_map_slices(f, |s| Ok(laplace_periodic(s, d)))
}

/// Second derivative along `z` (axis 1) of a `(batch, z, y, x)` array,
/// periodic in `z`. Zero when `nz == 1`.
pub fn laplace_parallel(f: ArrayView4<f64>, d_par: f64) -> Array4<f64> {
    let (_, nz, _, _) = f.dim();
    let inv_d2 = 1.0 / (d_par * d_par);
    Array4::from_shape_fn(f.raw_dim(), |(b, z, y, x)| {
        let up = f[[b, wrap(z as isize + 1, nz), y, x]];
        let down = f[[b, wrap(z as isize - 1, nz), y, x]];
        (up - 2.0 * f[[b, z, y, x]] + down) * inv_d2
    })
}
