// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Property-Based Tests (proptest) for plasma-physics
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Property-based tests for the step engine.
//!
//! Covers: zero-step idempotence, age bookkeeping, conservation of the
//! vorticity integral, config-driven runs.

use std::path::PathBuf;

use plasma_physics::init::{gaussian_noise, sinusoidal_mode};
use plasma_physics::{HasegawaWakatani, Mode};
use plasma_types::config::{DiffusionOrder, SimulationConfig};
use plasma_types::grid::{Domain, Field, GridShape};
use plasma_types::state::PlasmaState;
use proptest::prelude::*;

fn config_path(relative: &str) -> String {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..")
        .join(relative)
        .to_string_lossy()
        .into_owned()
}

fn background(domain: &Domain, level: f64, seed: u64) -> Field {
    gaussian_noise(domain, 0.05, seed)
        .zip_with(&Field::zeros(domain.shape), |v, _| level + v)
        .unwrap()
}

// ── Engine Properties ────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// dt = 0 leaves vorticity and density unchanged.
    #[test]
    fn zero_step_is_identity(kx in 1usize..4, ky in 0usize..4, amp in 0.1f64..2.0) {
        let domain = Domain::new(GridShape::planar(16, 16).unwrap(), 1.0).unwrap();
        let state = PlasmaState::zeros(domain, 1.0, 0.0).unwrap()
            .with_omega(sinusoidal_mode(&domain, kx, ky, amp)).unwrap();
        let engine = HasegawaWakatani::builder()
            .order(DiffusionOrder::new(1))
            .build()
            .unwrap();
        let next = engine.step(&state, 0.0).unwrap();
        prop_assert_eq!(&next.omega, &state.omega);
        prop_assert_eq!(&next.density, &state.density);
        prop_assert_eq!(next.age, state.age);
    }

    /// Age advances by exactly dt per step.
    #[test]
    fn age_advances_by_dt(dt in 0.001f64..0.05, steps in 1usize..4) {
        let domain = Domain::new(GridShape::planar(8, 8).unwrap(), 1.0).unwrap();
        let state = PlasmaState::zeros(domain, 1.0, 0.0).unwrap()
            .with_omega(sinusoidal_mode(&domain, 1, 1, 0.2)).unwrap();
        let engine = HasegawaWakatani::builder()
            .order(DiffusionOrder::new(1))
            .build()
            .unwrap();
        let out = engine.run(state, dt, steps).unwrap();
        prop_assert!((out.age - dt * steps as f64).abs() < 1e-12);
    }

    /// Bracket and diffusion integrate to zero, so in the planar model the
    /// only source of mean vorticity is the uniform coupling kap/nu.
    #[test]
    fn planar_mean_vorticity_comes_from_coupling(
        kap in 0.1f64..1.0,
        nu in 0.5f64..2.0,
        dt in 0.001f64..0.05,
        seed in 0u64..1000,
    ) {
        let domain = Domain::new(GridShape::planar(16, 16).unwrap(), 1.0).unwrap();
        let state = PlasmaState::zeros(domain, nu, kap).unwrap()
            .with_omega(gaussian_noise(&domain, 0.5, seed)).unwrap()
            .with_density(gaussian_noise(&domain, 0.5, seed + 1)).unwrap();
        let engine = HasegawaWakatani::builder()
            .kap(kap)
            .order(DiffusionOrder::new(1))
            .nu_perp(0.1)
            .build()
            .unwrap();
        let next = engine.step(&state, dt).unwrap();
        let mean = next.omega.sum() / domain.shape.len() as f64;
        prop_assert!((mean - dt * kap / nu).abs() < 1e-10, "mean {} vs {}", mean, dt * kap / nu);
    }

    /// In the field-aligned model the parallel coupling also sums to zero
    /// over the periodic z axis, so total vorticity is conserved.
    #[test]
    fn field_aligned_conserves_total_vorticity(seed in 0u64..1000, dt in 0.001f64..0.05) {
        let domain = Domain::new(GridShape::new(1, 4, 12, 12).unwrap(), 1.0).unwrap()
            .with_parallel_spacing(3.0).unwrap();
        let state = PlasmaState::zeros(domain, 1.0, 0.0).unwrap()
            .with_omega(sinusoidal_mode(&domain, 2, 1, 0.3)).unwrap()
            .with_density(background(&domain, 1.0, seed)).unwrap();
        let engine = HasegawaWakatani::builder()
            .order(DiffusionOrder::new(1))
            .subtract_slice_mean(true)
            .build()
            .unwrap();
        let next = engine.step(&state, dt).unwrap();
        prop_assert!((next.omega.sum() - state.omega.sum()).abs() < 1e-9);
    }
}

// ── Config-driven runs ───────────────────────────────────────────────

#[test]
fn planar_config_runs() {
    let cfg = SimulationConfig::from_file(&config_path("configs/hw_planar.json")).unwrap();
    let engine = HasegawaWakatani::from_config(&cfg).unwrap();
    assert_eq!(engine.mode(), Mode::Planar { kap: 0.5 });
    assert_eq!(engine.solver_name(), "spectral");

    let domain = cfg.create_domain().unwrap();
    let state = PlasmaState::zeros(domain, cfg.model.nu, cfg.model.kap)
        .unwrap()
        .with_omega(gaussian_noise(&domain, 0.01, 1))
        .unwrap()
        .with_density(background(&domain, 1.0, 2))
        .unwrap();
    let out = engine.run(state, cfg.time.dt, 5).unwrap();
    assert!(out.omega.data().iter().all(|v| v.is_finite()));
    assert!(out.density.max_abs() < 2.0);
}

#[test]
fn field_aligned_config_runs() {
    let cfg = SimulationConfig::from_file(&config_path("configs/hw_field_aligned.json")).unwrap();
    let engine = HasegawaWakatani::from_config(&cfg).unwrap();
    assert_eq!(engine.mode(), Mode::FieldAligned);

    let domain = cfg.create_domain().unwrap();
    let state = PlasmaState::zeros(domain, cfg.model.nu, cfg.model.kap)
        .unwrap()
        .with_omega(sinusoidal_mode(&domain, 1, 2, 0.1))
        .unwrap()
        .with_density(background(&domain, 1.0, 9))
        .unwrap();
    let (next, diag) = engine.step_with_diagnostics(&state, cfg.time.dt).unwrap();
    assert!(diag.solver_iterations > 0);
    assert!(diag.max_coupling > 0.0);
    assert!(diag.timings.total() >= diag.timings.poisson);
    assert_eq!(next.shape(), state.shape());
}
