// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Hyperdiffusion
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! `ν⊥ ∇⊥^(2N)` hyperdiffusion by repeated perpendicular Laplacians.

use ndarray::{Array3, ArrayView3};
use plasma_types::config::DiffusionOrder;
use plasma_types::error::PlasmaResult;

use crate::batch::par_map_slices;
use crate::stencil::laplace_periodic;

/// Apply the periodic perpendicular Laplacian `order` times to every slice
/// and scale by `nu`. Order 0 gives the zero field.
pub fn hyperdiffuse(f: ArrayView3<f64>, order: DiffusionOrder, nu: f64, d: f64) -> PlasmaResult<Array3<f64>> {
    let n = order.get();
    if n == 0 {
        return Ok(Array3::zeros(f.raw_dim()));
    }
    par_map_slices(f, |slice| {
        let mut out = laplace_periodic(slice, d);
        for _ in 1..n {
            out = laplace_periodic(out.view(), d);
        }
        Ok(out.mapv_into(|v| v * nu))
    })
}
