// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Conjugate Gradient Poisson Solver
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Matrix-free conjugate gradient on `A = −∇⊥²`.
//!
//! `A` is symmetric positive definite on open planes and positive
//! semi-definite on periodic ones, where the constant mode is its kernel.
//! There the right-hand side and every iterate are kept mean-free, so CG
//! runs on the complement of the kernel and the potential is unique.
//!
//! Convergence is declared when `‖r‖₂ ≤ tol · ‖b‖₂`.

use ndarray::{Array2, ArrayView2};
use plasma_types::error::{PlasmaError, PlasmaResult};
use plasma_types::grid::{Plane, SliceStack};

use super::{from_flat, laplacian_flat, remove_mean, solve_slices, to_flat, vec_dot, vec_norm, PoissonSolver};

#[derive(Debug, Clone)]
pub struct ConjugateGradient {
    /// Iteration cap per slice (default: 2000).
    pub max_iterations: usize,
    /// Relative L2 residual tolerance (default: 1e-10).
    pub tol: f64,
}

impl Default for ConjugateGradient {
    fn default() -> Self {
        ConjugateGradient {
            max_iterations: 2000,
            tol: 1e-10,
        }
    }
}

#[inline]
fn vec_axpy(alpha: f64, x: &[f64], y: &mut [f64]) {
    for (yi, xi) in y.iter_mut().zip(x.iter()) {
        *yi += alpha * xi;
    }
}

/// `out = −∇⊥² x`
fn apply_operator(x: &[f64], plane: &Plane, out: &mut [f64]) {
    laplacian_flat(x, plane, out);
    for v in out.iter_mut() {
        *v = -*v;
    }
}

impl ConjugateGradient {
    fn solve_slice(
        &self,
        rhs: ArrayView2<f64>,
        guess: Option<ArrayView2<f64>>,
        plane: &Plane,
    ) -> PlasmaResult<(Array2<f64>, usize)> {
        let periodic = plane.is_periodic();
        let n = plane.ny * plane.nx;

        // A x = −b
        let mut b: Vec<f64> = rhs.iter().map(|v| -v).collect();
        if periodic {
            remove_mean(&mut b);
        }
        let b_norm = vec_norm(&b);
        if b_norm < 1e-300 {
            return Ok((Array2::zeros((plane.ny, plane.nx)), 0));
        }

        let mut x = match guess {
            Some(g) => to_flat(g),
            None => vec![0.0; n],
        };
        if periodic {
            remove_mean(&mut x);
        }

        let mut ax = vec![0.0; n];
        apply_operator(&x, plane, &mut ax);
        let mut r: Vec<f64> = b.iter().zip(ax.iter()).map(|(bi, ai)| bi - ai).collect();
        let mut p = r.clone();
        let mut ap = vec![0.0; n];
        let mut rr = vec_dot(&r, &r);
        let abs_tol = self.tol * b_norm;

        let mut iteration = 0;
        while rr.sqrt() > abs_tol {
            if iteration >= self.max_iterations {
                let residual = rr.sqrt() / b_norm;
                log::warn!(
                    "CG did not converge in {} iterations: relative residual {:.3e}",
                    self.max_iterations,
                    residual
                );
                return Err(PlasmaError::SolverDiverged { iteration, residual });
            }
            iteration += 1;

            apply_operator(&p, plane, &mut ap);
            let pap = vec_dot(&p, &ap);
            if !pap.is_finite() || pap <= 0.0 {
                let residual = rr.sqrt() / b_norm;
                log::warn!("CG breakdown at iteration {iteration}: pAp = {pap:.3e}");
                return Err(PlasmaError::SolverDiverged { iteration, residual });
            }
            let alpha = rr / pap;
            vec_axpy(alpha, &p, &mut x);
            vec_axpy(-alpha, &ap, &mut r);
            if periodic {
                // round-off drifts r off the mean-free subspace
                remove_mean(&mut r);
            }

            let rr_new = vec_dot(&r, &r);
            if !rr_new.is_finite() {
                log::warn!("CG residual became non-finite at iteration {iteration}");
                return Err(PlasmaError::SolverDiverged {
                    iteration,
                    residual: f64::INFINITY,
                });
            }
            let beta = rr_new / rr;
            for (pi, ri) in p.iter_mut().zip(r.iter()) {
                *pi = ri + beta * *pi;
            }
            rr = rr_new;
        }

        if periodic {
            remove_mean(&mut x);
        }
        log::trace!("CG converged in {iteration} iterations");
        Ok((from_flat(x, plane)?, iteration))
    }
}

impl PoissonSolver for ConjugateGradient {
    fn solve(
        &self,
        rhs: &SliceStack,
        plane: &Plane,
        guess: Option<&SliceStack>,
    ) -> PlasmaResult<(SliceStack, usize)> {
        solve_slices(rhs, plane, guess, |b, g| self.solve_slice(b, g, plane))
    }

    fn name(&self) -> &'static str {
        "conjugate-gradient"
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use ndarray::Array3;
    use plasma_types::grid::{Boundary, GridShape};

    #[test]
    fn test_cg_solves_periodic_modes() {
        let n = 16;
        let plane = periodic_plane(n, 0.5);
        let rhs = sine_stack(n);
        let (phi, iters) = ConjugateGradient::default().solve(&rhs, &plane, None).unwrap();
        assert!(iters > 0);
        assert!(residual(&phi, &rhs, &plane) < 1e-8);
        for s in phi.data().outer_iter() {
            assert!(s.sum().abs() < 1e-10, "potential must be mean-free");
        }
    }

    #[test]
    fn test_cg_zero_rhs_returns_zero_without_iterating() {
        let plane = periodic_plane(8, 1.0);
        let rhs = SliceStack::zeros(GridShape::new(2, 3, 8, 8).unwrap());
        let (phi, iters) = ConjugateGradient::default().solve(&rhs, &plane, None).unwrap();
        assert_eq!(iters, 0);
        assert!(phi.data().iter().all(|&v| v == 0.0));
        assert_eq!(phi.data().dim(), (6, 8, 8));
    }

    #[test]
    fn test_cg_open_boundaries() {
        let n = 12;
        let plane = Plane {
            ny: n,
            nx: n,
            spacing: 1.0,
            boundary: [Boundary::Open; 2],
        };
        // constant source is solvable with Dirichlet ghosts
        let rhs = SliceStack::new(GridShape::planar(n, n).unwrap(), Array3::from_elem((1, n, n), -1.0)).unwrap();
        let (phi, _) = ConjugateGradient::default().solve(&rhs, &plane, None).unwrap();
        assert!(residual(&phi, &rhs, &plane) < 1e-8);
        // −∇²φ = 1 with zero walls: φ peaks positive at the centre
        assert!(phi.data()[[0, n / 2, n / 2]] > phi.data()[[0, 0, 0]]);
        assert!(phi.data()[[0, 0, 0]] > 0.0);
    }

    #[test]
    fn test_cg_reports_divergence_when_capped() {
        let n = 32;
        let plane = periodic_plane(n, 1.0);
        let rhs = mixed_stack(n);
        let solver = ConjugateGradient {
            max_iterations: 1,
            tol: 1e-14,
        };
        let err = solver.solve(&rhs, &plane, None).unwrap_err();
        assert!(matches!(err, PlasmaError::SolverDiverged { iteration: 1, .. }));
    }

    #[test]
    fn test_cg_exact_guess_converges_immediately() {
        let n = 16;
        let plane = periodic_plane(n, 1.0);
        let rhs = mixed_stack(n);
        let solver = ConjugateGradient::default();
        let (phi, first) = solver.solve(&rhs, &plane, None).unwrap();
        let (again, iters) = solver.solve(&rhs, &plane, Some(&phi)).unwrap();
        assert!(iters < first, "warm start took {iters} vs cold {first}");
        for (a, b) in phi.data().iter().zip(again.data().iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn test_cg_rejects_plane_mismatch() {
        let plane = periodic_plane(8, 1.0);
        let rhs = SliceStack::zeros(GridShape::planar(8, 9).unwrap());
        assert!(matches!(
            ConjugateGradient::default().solve(&rhs, &plane, None),
            Err(PlasmaError::ShapeMismatch { .. })
        ));
    }

    #[test]
    fn test_cg_fails_on_non_finite_rhs() {
        let n = 8;
        let plane = periodic_plane(n, 1.0);
        for bad in [f64::NAN, f64::INFINITY] {
            let rhs = with_value(&sine_stack(n), (1, 3, 4), bad);
            assert!(matches!(
                ConjugateGradient::default().solve(&rhs, &plane, None),
                Err(PlasmaError::SolverDiverged { iteration: 0, .. })
            ));
        }
    }
}
