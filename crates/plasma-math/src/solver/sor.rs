// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Red-Black SOR Poisson Solver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Red-Black Successive Over-Relaxation for `∇⊥²φ = b`.
//!
//! 5-point stencil with the same boundary handling as the CG solver.
//! Each sweep updates the red points `(i + j) % 2 == 0` first, then the
//! black points. Convergence is measured on the L-infinity residual
//! relative to `max|b|`.

use ndarray::{Array2, ArrayView2};
use plasma_types::error::{PlasmaError, PlasmaResult};
use plasma_types::grid::{Plane, SliceStack};

use super::{from_flat, laplacian_flat, neighbour, remove_mean, solve_slices, to_flat, PoissonSolver};

#[derive(Debug, Clone)]
pub struct RedBlackSor {
    /// Sweep cap per slice.
    pub max_sweeps: usize,
    /// Relative L-infinity residual tolerance.
    pub tol: f64,
    /// Relaxation factor (1.0 = Gauss-Seidel, 1.8-1.9 = over-relaxation).
    pub omega: f64,
}

impl Default for RedBlackSor {
    fn default() -> Self {
        RedBlackSor {
            max_sweeps: 2000,
            tol: 1e-10,
            omega: 1.8,
        }
    }
}

/// Update a single point in place.
#[inline(always)]
fn update_point(phi: &mut [f64], b: &[f64], plane: &Plane, i: usize, j: usize, d_sq: f64, omega: f64) {
    let (si, sj) = (i as isize, j as isize);
    let sum = neighbour(phi, plane, si - 1, sj)
        + neighbour(phi, plane, si + 1, sj)
        + neighbour(phi, plane, si, sj - 1)
        + neighbour(phi, plane, si, sj + 1);
    let k = i * plane.nx + j;

    // Gauss-Seidel prediction
    let p_star = (sum - d_sq * b[k]) / 4.0;

    phi[k] = (1.0 - omega) * phi[k] + omega * p_star;
}

/// One red pass followed by one black pass.
pub fn sor_step(phi: &mut [f64], b: &[f64], plane: &Plane, omega: f64) {
    let d_sq = plane.spacing * plane.spacing;
    for colour in 0..2 {
        for i in 0..plane.ny {
            for j in 0..plane.nx {
                if (i + j) % 2 == colour {
                    update_point(phi, b, plane, i, j, d_sq, omega);
                }
            }
        }
    }
}

/// `max |∇⊥²φ − b|`
pub fn sor_residual(phi: &[f64], b: &[f64], plane: &Plane) -> f64 {
    let mut lap = vec![0.0; phi.len()];
    laplacian_flat(phi, plane, &mut lap);
    lap.iter()
        .zip(b.iter())
        .fold(0.0_f64, |m, (l, bi)| m.max((l - bi).abs()))
}

impl RedBlackSor {
    fn solve_slice(
        &self,
        rhs: ArrayView2<f64>,
        guess: Option<ArrayView2<f64>>,
        plane: &Plane,
    ) -> PlasmaResult<(Array2<f64>, usize)> {
        let periodic = plane.is_periodic();
        let mut b = to_flat(rhs);
        if periodic {
            remove_mean(&mut b);
        }
        let scale = b.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
        if scale < 1e-300 {
            return Ok((Array2::zeros((plane.ny, plane.nx)), 0));
        }

        let mut phi = match guess {
            Some(g) => to_flat(g),
            None => vec![0.0; b.len()],
        };

        let mut residual = sor_residual(&phi, &b, plane) / scale;
        let mut sweeps = 0;
        while residual > self.tol {
            if sweeps >= self.max_sweeps || !residual.is_finite() {
                log::warn!(
                    "SOR stopped after {sweeps} sweeps: relative residual {residual:.3e}"
                );
                return Err(PlasmaError::SolverDiverged {
                    iteration: sweeps,
                    residual,
                });
            }
            sor_step(&mut phi, &b, plane, self.omega);
            sweeps += 1;
            residual = sor_residual(&phi, &b, plane) / scale;
        }

        if periodic {
            remove_mean(&mut phi);
        }
        Ok((from_flat(phi, plane)?, sweeps))
    }
}

impl PoissonSolver for RedBlackSor {
    fn solve(
        &self,
        rhs: &SliceStack,
        plane: &Plane,
        guess: Option<&SliceStack>,
    ) -> PlasmaResult<(SliceStack, usize)> {
        if !(self.omega > 0.0 && self.omega < 2.0) {
            return Err(PlasmaError::ConfigError(format!(
                "SOR relaxation factor must lie in (0, 2), got {}",
                self.omega
            )));
        }
        solve_slices(rhs, plane, guess, |b, g| self.solve_slice(b, g, plane))
    }

    fn name(&self) -> &'static str {
        "red-black-sor"
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use plasma_types::grid::{Boundary, GridShape};

    #[test]
    fn test_sor_convergence_periodic() {
        let n = 16;
        let plane = periodic_plane(n, 1.0);
        let rhs = mixed_stack(n);
        let (phi, sweeps) = RedBlackSor::default().solve(&rhs, &plane, None).unwrap();
        assert!(sweeps > 1);
        assert!(residual(&phi, &rhs, &plane) < 1e-8);
        assert!(phi.data().sum().abs() < 1e-9);
    }

    #[test]
    fn test_sor_open_boundary() {
        let n = 10;
        let plane = Plane {
            ny: n,
            nx: n,
            spacing: 0.5,
            boundary: [Boundary::Open, Boundary::Periodic],
        };
        let rhs = mixed_stack(n);
        let (phi, _) = RedBlackSor::default().solve(&rhs, &plane, None).unwrap();
        assert!(residual(&phi, &rhs, &plane) < 1e-8);
    }

    #[test]
    fn test_over_relaxation_beats_gauss_seidel() {
        let n = 24;
        let plane = periodic_plane(n, 1.0);
        let rhs = mixed_stack(n);
        let gs = RedBlackSor {
            omega: 1.0,
            max_sweeps: 50_000,
            tol: 1e-8,
        };
        let sor = RedBlackSor { omega: 1.7, ..gs.clone() };
        let (_, gs_sweeps) = gs.solve(&rhs, &plane, None).unwrap();
        let (_, sor_sweeps) = sor.solve(&rhs, &plane, None).unwrap();
        assert!(sor_sweeps < gs_sweeps, "SOR {sor_sweeps} vs GS {gs_sweeps}");
    }

    #[test]
    fn test_sor_zero_rhs() {
        let plane = periodic_plane(6, 1.0);
        let rhs = SliceStack::zeros(GridShape::planar(6, 6).unwrap());
        let (phi, sweeps) = RedBlackSor::default().solve(&rhs, &plane, None).unwrap();
        assert_eq!(sweeps, 0);
        assert!(phi.data().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_sor_rejects_bad_relaxation() {
        let plane = periodic_plane(6, 1.0);
        let rhs = mixed_stack(6);
        let solver = RedBlackSor {
            omega: 2.0,
            ..RedBlackSor::default()
        };
        assert!(matches!(
            solver.solve(&rhs, &plane, None),
            Err(PlasmaError::ConfigError(_))
        ));
    }

    #[test]
    fn test_sor_sweep_cap() {
        let n = 32;
        let plane = periodic_plane(n, 1.0);
        let rhs = mixed_stack(n);
        let solver = RedBlackSor {
            max_sweeps: 3,
            ..RedBlackSor::default()
        };
        assert!(matches!(
            solver.solve(&rhs, &plane, None),
            Err(PlasmaError::SolverDiverged { iteration: 3, .. })
        ));
    }

    #[test]
    fn test_sor_fails_on_nan_rhs() {
        let plane = periodic_plane(8, 1.0);
        let rhs = with_value(&mixed_stack(8), (0, 0, 0), f64::NAN);
        assert!(matches!(
            RedBlackSor::default().solve(&rhs, &plane, None),
            Err(PlasmaError::SolverDiverged { iteration: 0, .. })
        ));
    }
}
