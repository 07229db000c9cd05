// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Time Integration
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Explicit Euler update `x + dx·dt`.

use ndarray::{Array, Dimension};
use plasma_types::error::{ensure_same_shape, PlasmaResult};
use plasma_types::grid::Field;

/// One explicit Euler step. `dt = 0` returns `x` unchanged, even when
/// `dx` holds non-finite values.
pub fn euler<D: Dimension>(x: &Array<f64, D>, dx: &Array<f64, D>, dt: f64) -> PlasmaResult<Array<f64, D>> {
    ensure_same_shape("euler", x.shape(), dx.shape())?;
    if dt == 0.0 {
        return Ok(x.clone());
    }
    let mut out = x.clone();
    out.zip_mut_with(dx, |xi, &di| *xi += di * dt);
    Ok(out)
}

/// [`euler`] on fields; the result keeps the shape descriptor of `x`.
pub fn euler_field(x: &Field, dx: &Field, dt: f64) -> PlasmaResult<Field> {
    if dt == 0.0 {
        x.zip_with(dx, |xi, _| xi)
    } else {
        x.zip_with(dx, |xi, di| xi + di * dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array1, Array2};
    use plasma_types::grid::GridShape;

    #[test]
    fn test_euler_step() {
        let x = Array1::from(vec![1.0, 2.0, 3.0]);
        let dx = Array1::from(vec![10.0, -10.0, 0.5]);
        let out = euler(&x, &dx, 0.1).unwrap();
        let expected = [2.0, 1.0, 3.05];
        for (a, b) in out.iter().zip(expected.iter()) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_zero_step_is_identity() {
        let x = Array2::from_shape_fn((3, 3), |(i, j)| i as f64 - j as f64 * 0.5);
        let dx = Array2::from_elem((3, 3), f64::INFINITY);
        assert_eq!(euler(&x, &dx, 0.0).unwrap(), x);
    }

    #[test]
    fn test_negative_step_reverses() {
        let x = Array1::from(vec![1.0, -1.0]);
        let dx = Array1::from(vec![3.0, 2.0]);
        let fwd = euler(&x, &dx, 0.5).unwrap();
        let back = euler(&fwd, &dx, -0.5).unwrap();
        assert_eq!(back, x);
    }

    #[test]
    fn test_shape_mismatch() {
        let x = Array1::<f64>::zeros(3);
        let dx = Array1::<f64>::zeros(4);
        assert!(euler(&x, &dx, 1.0).is_err());
    }

    #[test]
    fn test_field_euler() {
        let shape = GridShape::planar(2, 2).unwrap();
        let x = Field::from_shape_fn(shape, |(_, _, y, x)| (y + x) as f64);
        let dx = Field::from_shape_fn(shape, |_| 2.0);
        let out = euler_field(&x, &dx, 0.25).unwrap();
        assert_eq!(out.shape(), shape);
        assert_eq!(out.data()[[0, 0, 1, 1]], 2.5);
        assert_eq!(euler_field(&x, &dx, 0.0).unwrap(), x);
    }
}
