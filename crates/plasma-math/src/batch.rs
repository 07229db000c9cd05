// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Slice Batching
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Parallel per-slice evaluation over `(K, H, W)` stacks.
//!
//! Slices share no state, so every slice is handed to the Rayon pool on
//! its own and the results are restacked in slice order.

use ndarray::{Array2, Array3, ArrayView2, ArrayView3, Axis};
use plasma_types::error::{ensure_same_shape, PlasmaError, PlasmaResult};
use rayon::prelude::*;

/// Apply `f` to every slice of `a` in parallel.
pub fn par_map_slices<F>(a: ArrayView3<f64>, f: F) -> PlasmaResult<Array3<f64>>
where
    F: Fn(ArrayView2<f64>) -> PlasmaResult<Array2<f64>> + Sync,
{
    let (k, h, w) = a.dim();
    let slices = (0..k)
        .into_par_iter()
        .map(|s| f(a.index_axis(Axis(0), s)))
        .collect::<PlasmaResult<Vec<_>>>()?;
    restack(slices, (h, w))
}

/// Apply `f` to matching slice pairs of `a` and `b` in parallel.
pub fn par_zip_slices<F>(a: ArrayView3<f64>, b: ArrayView3<f64>, f: F) -> PlasmaResult<Array3<f64>>
where
    F: Fn(ArrayView2<f64>, ArrayView2<f64>) -> PlasmaResult<Array2<f64>> + Sync,
{
    ensure_same_shape("par_zip_slices", a.shape(), b.shape())?;
    let (k, h, w) = a.dim();
    let slices = (0..k)
        .into_par_iter()
        .map(|s| f(a.index_axis(Axis(0), s), b.index_axis(Axis(0), s)))
        .collect::<PlasmaResult<Vec<_>>>()?;
    restack(slices, (h, w))
}

/// Stack equally shaped 2D slices along a new leading axis.
pub fn restack(slices: Vec<Array2<f64>>, empty_dim: (usize, usize)) -> PlasmaResult<Array3<f64>> {
    if slices.is_empty() {
        return Ok(Array3::zeros((0, empty_dim.0, empty_dim.1)));
    }
    let views: Vec<ArrayView2<f64>> = slices.iter().map(|s| s.view()).collect();
    ndarray::stack(Axis(0), &views).map_err(|_| PlasmaError::ShapeMismatch {
        context: "restack",
        expected: views[0].shape().to_vec(),
        found: views
            .iter()
            .find(|v| v.shape() != views[0].shape())
            .map(|v| v.shape().to_vec())
            .unwrap_or_default(),
    })
}
