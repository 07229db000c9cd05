// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Property-Based Tests (proptest) for plasma-types
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for plasma-types using proptest.
//!
//! Covers: GridShape invariants, fold/unfold of the parallel axis,
//! PlasmaState shapes, diffusion order parsing, config roundtrip.

use plasma_types::config::{DiffusionOrder, SimulationConfig};
use plasma_types::error::PlasmaError;
use plasma_types::grid::{Domain, Field, GridShape};
use plasma_types::state::PlasmaState;
use proptest::prelude::*;

// ── Shape Invariants ─────────────────────────────────────────────────

proptest! {
    /// Folded stack has batch·nz slices and the same element count.
    #[test]
    fn fold_dimensions_match(
        batch in 1usize..4,
        nz in 1usize..6,
        ny in 1usize..12,
        nx in 1usize..12,
    ) {
        let shape = GridShape::new(batch, nz, ny, nx).unwrap();
        let field = Field::from_shape_fn(shape, |(b, z, y, x)| (b + 2 * z + 3 * y + 5 * x) as f64);
        let stack = field.fold_parallel().unwrap();

        prop_assert_eq!(stack.data().dim(), (batch * nz, ny, nx));
        prop_assert_eq!(stack.data().len(), shape.len());
        prop_assert_eq!(stack.origin(), shape);
    }

    /// unfold(fold(f)) == f and plane (b, z) is slice b·nz + z.
    #[test]
    fn fold_unfold_roundtrip(
        batch in 1usize..3,
        nz in 1usize..5,
        n in 2usize..10,
        b_pick in 0usize..3,
        z_pick in 0usize..5,
    ) {
        let shape = GridShape::new(batch, nz, n, n).unwrap();
        let field = Field::from_shape_fn(shape, |(b, z, y, x)| ((b * 31 + z * 7 + y) as f64).sin() * x as f64);
        let stack = field.fold_parallel().unwrap();
        let (b, z) = (b_pick % batch, z_pick % nz);
        for y in 0..n {
            for x in 0..n {
                prop_assert_eq!(stack.data()[[b * nz + z, y, x]], field.data()[[b, z, y, x]]);
            }
        }
        prop_assert_eq!(stack.unfold().unwrap(), field);
    }
}

// ── PlasmaState Invariants ───────────────────────────────────────────

proptest! {
    /// All state fields share the domain shape and start at zero.
    #[test]
    fn state_fields_match_domain(
        nz in 1usize..4,
        ny in 2usize..32,
        nx in 2usize..32,
        nu in 0.01f64..10.0,
    ) {
        let domain = Domain::new(GridShape::new(1, nz, ny, nx).unwrap(), 1.0).unwrap();
        let state = PlasmaState::zeros(domain, nu, 0.0).unwrap();
        for f in [&state.density, &state.phi, &state.omega, &state.laplace_phi, &state.laplace_n] {
            prop_assert_eq!(f.shape(), domain.shape);
            prop_assert_eq!(f.max_abs(), 0.0);
        }
        prop_assert_eq!(state.age, 0.0);
    }

    /// Replacing a field with one of another shape is rejected.
    #[test]
    fn state_rejects_foreign_shape(n in 2usize..16, extra in 1usize..4) {
        let domain = Domain::new(GridShape::planar(n, n).unwrap(), 1.0).unwrap();
        let state = PlasmaState::zeros(domain, 1.0, 0.0).unwrap();
        let wrong = Field::zeros(GridShape::planar(n, n + extra).unwrap());
        let is_shape_error = matches!(state.with_density(wrong), Err(PlasmaError::ShapeMismatch { .. }));
        prop_assert!(is_shape_error);
    }
}

// ── Diffusion Order ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn non_negative_orders_accepted(order in 0i64..64) {
        prop_assert_eq!(DiffusionOrder::try_from(order).unwrap().get(), order as usize);
    }

    #[test]
    fn negative_orders_rejected(order in i64::MIN..0) {
        let rejected = matches!(
            DiffusionOrder::try_from(order),
            Err(PlasmaError::InvalidDiffusionOrder(o)) if o == order
        );
        prop_assert!(rejected);
    }
}

// ── Config Serialization Roundtrip ───────────────────────────────────

proptest! {
    #[test]
    fn config_roundtrip(
        ny in 2usize..64,
        nx in 2usize..64,
        spacing in 0.01f64..10.0,
        order in 0i64..4,
        kap in -1.0f64..1.0,
    ) {
        let json = format!(
            r#"{{ "run_name": "prop", "grid": {{ "shape": [1, 1, {ny}, {nx}], "spacing": {spacing} }},
                 "model": {{ "order": {order}, "kap": {kap} }} }}"#
        );
        let cfg = SimulationConfig::from_json(&json).unwrap();
        let back = SimulationConfig::from_json(&serde_json::to_string(&cfg).unwrap()).unwrap();
        prop_assert_eq!(back.grid.shape, [1, 1, ny, nx]);
        prop_assert_eq!(back.model.order, order);
        prop_assert!((back.grid.spacing - spacing).abs() < 1e-12);
        prop_assert!((back.model.kap - kap).abs() < 1e-12);
        let domain = back.create_domain().unwrap();
        prop_assert_eq!(domain.shape.dim(), (1, 1, ny, nx));
    }
}
