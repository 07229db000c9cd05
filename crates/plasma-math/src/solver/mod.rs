// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Poisson Solvers
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Elliptic solvers for `∇⊥²φ = rhs` on every slice of a stack.
//!
//! The step engine only sees the [`PoissonSolver`] trait. Slices are
//! independent problems and are solved in parallel; the reported
//! iteration count is the largest over all slices.
//!
//! Periodic axes wrap; open axes use homogeneous Dirichlet ghost cells.
//! On a fully periodic plane the constant mode is projected out of the
//! right-hand side and the returned potential has zero mean.

pub mod cg;
pub mod sor;
pub mod spectral;

use ndarray::{Array2, ArrayView2, Axis};
use plasma_types::config::{SolverConfig, SolverKind};
use plasma_types::error::{ensure_same_shape, PlasmaError, PlasmaResult};
use plasma_types::grid::{Boundary, Plane, SliceStack};
use rayon::prelude::*;

use crate::batch::restack;
use crate::padding::wrap;

pub use cg::ConjugateGradient;
pub use sor::RedBlackSor;
pub use spectral::SpectralPoisson;

/// External elliptic-solver seam.
pub trait PoissonSolver: Send + Sync + std::fmt::Debug {
    /// Solve `∇⊥²φ = rhs` slice by slice, returning `(φ, iterations)`.
    fn solve(
        &self,
        rhs: &SliceStack,
        plane: &Plane,
        guess: Option<&SliceStack>,
    ) -> PlasmaResult<(SliceStack, usize)>;

    fn name(&self) -> &'static str;
}

/// Build the solver named by a config section.
pub fn from_config(cfg: &SolverConfig) -> Box<dyn PoissonSolver> {
    match cfg.kind {
        SolverKind::Cg => Box::new(ConjugateGradient {
            max_iterations: cfg.max_iterations,
            tol: cfg.convergence_threshold,
        }),
        SolverKind::Sor => Box::new(RedBlackSor {
            max_sweeps: cfg.max_iterations,
            tol: cfg.convergence_threshold,
            omega: cfg.relaxation_factor,
        }),
        SolverKind::Spectral => Box::new(SpectralPoisson),
    }
}

/// Fail on the first slice holding a NaN or infinite value.
pub(crate) fn check_finite(rhs: &SliceStack) -> PlasmaResult<()> {
    for (slice, values) in rhs.data().axis_iter(Axis(0)).enumerate() {
        if !values.iter().all(|v| v.is_finite()) {
            log::warn!("Poisson right-hand side is not finite on slice {slice}");
            return Err(PlasmaError::SolverDiverged {
                iteration: 0,
                residual: f64::NAN,
            });
        }
    }
    Ok(())
}

/// Shape and finiteness checks shared by all solvers, then a parallel
/// per-slice solve.
pub(crate) fn solve_slices<F>(
    rhs: &SliceStack,
    plane: &Plane,
    guess: Option<&SliceStack>,
    solve_one: F,
) -> PlasmaResult<(SliceStack, usize)>
where
    F: Fn(ArrayView2<f64>, Option<ArrayView2<f64>>) -> PlasmaResult<(Array2<f64>, usize)> + Sync,
{
    let data = rhs.data();
    let (k, ny, nx) = data.dim();
    ensure_same_shape("PoissonSolver::solve", &[ny, nx], &[plane.ny, plane.nx])?;
    if let Some(g) = guess {
        ensure_same_shape("PoissonSolver::solve guess", data.shape(), g.data().shape())?;
    }
    check_finite(rhs)?;

    let solved = (0..k)
        .into_par_iter()
        .map(|s| {
            let g = guess.map(|g| g.data().index_axis(Axis(0), s));
            solve_one(data.index_axis(Axis(0), s), g)
        })
        .collect::<PlasmaResult<Vec<_>>>()?;

    let iterations = solved.iter().map(|(_, it)| *it).max().unwrap_or(0);
    let slices: Vec<Array2<f64>> = solved.into_iter().map(|(phi, _)| phi).collect();
    let potential = rhs.with_data(restack(slices, (ny, nx))?)?;
    Ok((potential, iterations))
}

/// Value at `(i, j)` where indices one past either edge follow the axis
/// boundary: wrap for periodic, zero ghost for open.
#[inline(always)]
pub(crate) fn neighbour(x: &[f64], plane: &Plane, i: isize, j: isize) -> f64 {
    let (ny, nx) = (plane.ny, plane.nx);
    let ii = if i < 0 || i >= ny as isize {
        match plane.boundary[0] {
            Boundary::Periodic => wrap(i, ny),
            Boundary::Open => return 0.0,
        }
    } else {
        i as usize
    };
    let jj = if j < 0 || j >= nx as isize {
        match plane.boundary[1] {
            Boundary::Periodic => wrap(j, nx),
            Boundary::Open => return 0.0,
        }
    } else {
        j as usize
    };
    x[ii * nx + jj]
}

/// `out = ∇⊥² x` on a flat row-major slice.
pub(crate) fn laplacian_flat(x: &[f64], plane: &Plane, out: &mut [f64]) {
    let (ny, nx) = (plane.ny, plane.nx);
    let inv_d2 = 1.0 / (plane.spacing * plane.spacing);
    for i in 0..ny {
        for j in 0..nx {
            let (si, sj) = (i as isize, j as isize);
            let sum = neighbour(x, plane, si - 1, sj)
                + neighbour(x, plane, si + 1, sj)
                + neighbour(x, plane, si, sj - 1)
                + neighbour(x, plane, si, sj + 1);
            out[i * nx + j] = (sum - 4.0 * x[i * nx + j]) * inv_d2;
        }
    }
}

/// Subtract the mean in place; returns the removed mean.
pub(crate) fn remove_mean(v: &mut [f64]) -> f64 {
    if v.is_empty() {
        return 0.0;
    }
    let mean = v.iter().sum::<f64>() / v.len() as f64;
    for x in v.iter_mut() {
        *x -= mean;
    }
    mean
}

#[inline]
pub(crate) fn vec_dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

#[inline]
pub(crate) fn vec_norm(v: &[f64]) -> f64 {
    vec_dot(v, v).sqrt()
}

/// Row-major copy of a 2D view.
pub(crate) fn to_flat(a: ArrayView2<f64>) -> Vec<f64> {
    a.iter().copied().collect()
}

pub(crate) fn from_flat(v: Vec<f64>, plane: &Plane) -> PlasmaResult<Array2<f64>> {
    let found = v.len();
    Array2::from_shape_vec((plane.ny, plane.nx), v).map_err(|_| {
        PlasmaError::ShapeMismatch {
            context: "solver output",
            expected: vec![plane.ny, plane.nx],
            found: vec![found],
        }
    })
}
