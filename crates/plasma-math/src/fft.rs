// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — 2D FFT
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Planned 2D FFT over `[y, x]` slices, built on rustfft.
//!
//! Forward is unnormalized; inverse applies `1/(ny·nx)`.

use std::sync::Arc;

use ndarray::{Array2, ArrayView2, Axis};
use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};

/// Row and column plans for one `(ny, nx)` shape. Plans are shared, so a
/// single `Fft2` can be used from many threads.
pub struct Fft2 {
    ny: usize,
    nx: usize,
    row_fwd: Arc<dyn Fft<f64>>,
    row_inv: Arc<dyn Fft<f64>>,
    col_fwd: Arc<dyn Fft<f64>>,
    col_inv: Arc<dyn Fft<f64>>,
}

impl std::fmt::Debug for Fft2 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fft2").field("ny", &self.ny).field("nx", &self.nx).finish()
    }
}

impl Fft2 {
    pub fn new(ny: usize, nx: usize) -> Self {
        let mut planner = FftPlanner::new();
        Fft2 {
            ny,
            nx,
            row_fwd: planner.plan_fft_forward(nx),
            row_inv: planner.plan_fft_inverse(nx),
            col_fwd: planner.plan_fft_forward(ny),
            col_inv: planner.plan_fft_inverse(ny),
        }
    }

    pub fn dim(&self) -> (usize, usize) {
        (self.ny, self.nx)
    }

    fn transform(&self, data: &mut Array2<Complex64>, rows: &Arc<dyn Fft<f64>>, cols: &Arc<dyn Fft<f64>>) {
        let mut buf = vec![Complex64::new(0.0, 0.0); self.nx.max(self.ny)];

        for mut row in data.axis_iter_mut(Axis(0)) {
            let line = &mut buf[..self.nx];
            for (b, v) in line.iter_mut().zip(row.iter()) {
                *b = *v;
            }
            rows.process(line);
            for (v, b) in row.iter_mut().zip(line.iter()) {
                *v = *b;
            }
        }

        for mut col in data.axis_iter_mut(Axis(1)) {
            let line = &mut buf[..self.ny];
            for (b, v) in line.iter_mut().zip(col.iter()) {
                *b = *v;
            }
            cols.process(line);
            for (v, b) in col.iter_mut().zip(line.iter()) {
                *v = *b;
            }
        }
    }

    /// Forward transform of a real slice.
    pub fn forward(&self, input: ArrayView2<f64>) -> Array2<Complex64> {
        let mut data = input.mapv(|v| Complex64::new(v, 0.0));
        self.transform(&mut data, &self.row_fwd, &self.col_fwd);
        data
    }

    /// Normalized inverse transform; returns the real part.
    pub fn inverse(&self, spectrum: &Array2<Complex64>) -> Array2<f64> {
        let mut data = spectrum.clone();
        self.transform(&mut data, &self.row_inv, &self.col_inv);
        let norm = 1.0 / (self.ny * self.nx) as f64;
        data.mapv(|c| c.re * norm)
    }
}
