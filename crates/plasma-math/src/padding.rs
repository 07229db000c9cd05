// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Periodic Padding
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! One-cell periodic halo.
//!
//! Index `-1` maps to `n-1` and index `n` maps to `0` on both axes,
//! corners included.

use ndarray::{s, Array2, Array3, ArrayView2, ArrayView3, Axis};

/// Wrap index `i` (which may be -1 or n) onto `0..n`.
#[inline(always)]
pub fn wrap(i: isize, n: usize) -> usize {
    i.rem_euclid(n as isize) as usize
}

/// Pad an `(H, W)` array to `(H+2, W+2)` with a periodic halo.
pub fn periodic_pad(a: ArrayView2<f64>) -> Array2<f64> {
    let (h, w) = a.dim();
    Array2::from_shape_fn((h + 2, w + 2), |(i, j)| {
        a[[wrap(i as isize - 1, h), wrap(j as isize - 1, w)]]
    })
}

/// Pad the last two axes of a `(K, H, W)` stack; the slice axis is left alone.
pub fn periodic_pad_stack(a: ArrayView3<f64>) -> Array3<f64> {
    let (k, h, w) = a.dim();
    let mut out = Array3::zeros((k, h + 2, w + 2));
    for (mut dst, src) in out.axis_iter_mut(Axis(0)).zip(a.axis_iter(Axis(0))) {
        dst.assign(&periodic_pad(src));
    }
    out
}

/// Interior view of a padded array, the unpadded data.
pub fn unpad(padded: ArrayView2<f64>) -> ArrayView2<f64> {
    let (h, w) = padded.dim();
    padded.slice_move(s![1..h - 1, 1..w - 1])
}
