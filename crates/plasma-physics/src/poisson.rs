// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Vorticity/Potential Coupling
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Recover `φ` from `∇⊥²φ = ω` on every folded slice.
//!
//! A periodic plane only admits a solution when the right-hand side has
//! zero mean. [`MeanPolicy`] decides whether a nonzero slice mean is
//! removed or reported as [`PlasmaError::IllPosedPoisson`].

use ndarray::{Array3, Axis};
use plasma_math::solver::PoissonSolver;
use plasma_types::error::{PlasmaError, PlasmaResult};
use plasma_types::grid::{Plane, SliceStack};

/// Relative tolerance on a slice mean, scaled by `max(1, max|ω|)`.
pub const MEAN_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeanPolicy {
    /// Remove each slice mean before the solve.
    Subtract,
    /// Fail on the first slice whose mean exceeds [`MEAN_TOLERANCE`].
    Reject,
}

/// Result of the Poisson stage.
#[derive(Debug, Clone)]
pub struct PotentialSolve {
    /// Vorticity actually handed to the solver.
    pub omega: SliceStack,
    pub phi: SliceStack,
    pub iterations: usize,
}

/// Subtract the spatial mean of every slice.
pub fn subtract_slice_means(stack: &SliceStack) -> PlasmaResult<SliceStack> {
    let mut data: Array3<f64> = stack.data().clone();
    for mut slice in data.axis_iter_mut(Axis(0)) {
        if let Some(mean) = slice.mean() {
            slice.mapv_inplace(|v| v - mean);
        }
    }
    stack.with_data(data)
}

/// Reject the first slice whose mean is not negligible.
pub fn check_slice_means(stack: &SliceStack) -> PlasmaResult<()> {
    for (slice, values) in stack.data().axis_iter(Axis(0)).enumerate() {
        let mean = values.mean().unwrap_or(0.0);
        let scale = values.iter().fold(1.0_f64, |m, v| m.max(v.abs()));
        if !mean.is_finite() || mean.abs() > MEAN_TOLERANCE * scale {
            return Err(PlasmaError::IllPosedPoisson { slice, mean });
        }
    }
    Ok(())
}

/// Apply the mean policy and solve. The policy is skipped on planes that
/// are not fully periodic.
pub fn solve_potential(
    solver: &dyn PoissonSolver,
    omega: &SliceStack,
    plane: &Plane,
    policy: MeanPolicy,
) -> PlasmaResult<PotentialSolve> {
    let omega = if plane.is_periodic() {
        match policy {
            MeanPolicy::Subtract => subtract_slice_means(omega)?,
            MeanPolicy::Reject => {
                check_slice_means(omega)?;
                omega.clone()
            }
        }
    } else {
        omega.clone()
    };

    let (phi, iterations) = solver.solve(&omega, plane, None)?;
    log::debug!("{}: {} iterations", solver.name(), iterations);
    Ok(PotentialSolve {
        omega,
        phi,
        iterations,
    })
}
