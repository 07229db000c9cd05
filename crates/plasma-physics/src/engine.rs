// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Hasegawa-Wakatani Step Engine
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Hasegawa-Wakatani drift-wave turbulence, explicit Euler in time.
//!
//! ```text
//! ∂ω/∂t = C − [φ, ω] + ν⊥∇⊥^(2N) ω
//! ∂n/∂t = C − [φ, n] − κ ∂yφ + ν⊥∇⊥^(2N) n
//! ∇⊥²φ = ω
//! ```
//!
//! Two models share the operator toolkit and differ in the coupling `C`
//! and drive `κ`:
//!
//! | mode | `C` | `κ` |
//! |---|---|---|
//! | [`Mode::Planar`] (`kap ≠ 0`, `nz = 1`) | `kap/nu` | `kap` |
//! | [`Mode::FieldAligned`] (`kap = 0`) | `(1/nu)∇∥²(n − φ)` | `∂x n / Σn` |
//!
//! Each step runs `normalize → poisson → derivatives →
//! bracket_and_diffusion → assemble_rhs → integrate` and returns a new
//! state; the input state is never touched.

use std::fmt;
use std::time::{Duration, Instant};

use ndarray::{Array3, Zip};
use plasma_math::arakawa::poisson_bracket;
use plasma_math::diffusion::hyperdiffuse;
use plasma_math::integrate::euler;
use plasma_math::solver::{self, ConjugateGradient, PoissonSolver};
use plasma_math::stencil::{d_dy_stack, laplace_parallel, laplace_perp_stack};
use plasma_types::config::{DiffusionOrder, SimulationConfig};
use plasma_types::error::{PlasmaError, PlasmaResult};
use plasma_types::grid::{Domain, Field, SliceStack};
use plasma_types::state::PlasmaState;

use crate::coupling::{density_drive, parallel_coupling, uniform_coupling};
use crate::poisson::{solve_potential, MeanPolicy};

/// Model variant, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    Planar { kap: f64 },
    FieldAligned,
}

impl Mode {
    /// `kap ≠ 0` selects the planar model.
    pub fn select(kap: f64) -> Self {
        if kap != 0.0 {
            Mode::Planar { kap }
        } else {
            Mode::FieldAligned
        }
    }

    fn strategy(self) -> Box<dyn StepStrategy> {
        match self {
            Mode::Planar { kap } => Box::new(PlanarStep { kap }),
            Mode::FieldAligned => Box::new(FieldAlignedStep),
        }
    }
}

/// The mode-specific pieces of a step.
pub trait StepStrategy: Send + Sync + fmt::Debug {
    fn name(&self) -> &'static str;

    /// Reject domains the model cannot run on.
    fn check_domain(&self, domain: &Domain) -> PlasmaResult<()>;

    fn mean_policy(&self, subtract_slice_mean: bool) -> MeanPolicy;

    /// Coupling term `C`, folded.
    fn coupling(&self, state: &PlasmaState, phi: &Field) -> PlasmaResult<Array3<f64>>;

    /// Drive coefficient `κ`, folded.
    fn drive(&self, state: &PlasmaState) -> PlasmaResult<Array3<f64>>;

    /// `(laplace_phi, laplace_n)` diagnostics.
    fn diagnostic_laplacians(&self, domain: &Domain, phi: &Field, density: &Field) -> PlasmaResult<(Field, Field)>;
}

/// Single-plane model with a constant background gradient.
#[derive(Debug, Clone, Copy)]
pub struct PlanarStep {
    pub kap: f64,
}

impl StepStrategy for PlanarStep {
    fn name(&self) -> &'static str {
        "planar"
    }

    fn check_domain(&self, domain: &Domain) -> PlasmaResult<()> {
        if !domain.shape.is_planar() {
            return Err(PlasmaError::ConfigError(format!(
                "planar model (kap = {}) needs nz = 1, got nz = {}",
                self.kap, domain.shape.nz
            )));
        }
        Ok(())
    }

    fn mean_policy(&self, _subtract_slice_mean: bool) -> MeanPolicy {
        MeanPolicy::Subtract
    }

    fn coupling(&self, state: &PlasmaState, _phi: &Field) -> PlasmaResult<Array3<f64>> {
        Ok(uniform_coupling(&state.density, self.kap, state.nu))
    }

    fn drive(&self, state: &PlasmaState) -> PlasmaResult<Array3<f64>> {
        Ok(Array3::from_elem(state.shape().stack_dim(), self.kap))
    }

    fn diagnostic_laplacians(&self, domain: &Domain, phi: &Field, density: &Field) -> PlasmaResult<(Field, Field)> {
        let perp = |f: &Field| -> PlasmaResult<Field> {
            let stack = f.fold_parallel()?;
            let lap = laplace_perp_stack(stack.data().view(), domain.spacing)?;
            stack.with_data(lap)?.unfold()
        };
        Ok((perp(phi)?, perp(density)?))
    }
}

/// Field-aligned model: slices along `z` coupled by parallel resistivity.
#[derive(Debug, Clone, Copy)]
pub struct FieldAlignedStep;

impl StepStrategy for FieldAlignedStep {
    fn name(&self) -> &'static str {
        "field-aligned"
    }

    fn check_domain(&self, _domain: &Domain) -> PlasmaResult<()> {
        Ok(())
    }

    fn mean_policy(&self, subtract_slice_mean: bool) -> MeanPolicy {
        if subtract_slice_mean {
            MeanPolicy::Subtract
        } else {
            MeanPolicy::Reject
        }
    }

    fn coupling(&self, state: &PlasmaState, phi: &Field) -> PlasmaResult<Array3<f64>> {
        parallel_coupling(&state.density, phi, state.nu, state.domain.parallel_spacing)
    }

    fn drive(&self, state: &PlasmaState) -> PlasmaResult<Array3<f64>> {
        density_drive(&state.density, state.domain.spacing)
    }

    fn diagnostic_laplacians(&self, domain: &Domain, phi: &Field, density: &Field) -> PlasmaResult<(Field, Field)> {
        let d_par = domain.parallel_spacing;
        let lap_phi = Field::from_array(phi.shape(), laplace_parallel(phi.data().view(), d_par))?;
        let lap_n = Field::from_array(density.shape(), laplace_parallel(density.data().view(), d_par))?;
        Ok((lap_phi, lap_n))
    }
}

/// Wall-clock time of each stage.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StageTimings {
    pub poisson: Duration,
    pub derivatives: Duration,
    pub bracket_and_diffusion: Duration,
    pub assemble: Duration,
    pub integrate: Duration,
}

impl StageTimings {
    pub fn total(&self) -> Duration {
        self.poisson + self.derivatives + self.bracket_and_diffusion + self.assemble + self.integrate
    }
}

/// Per-step maxima of the right-hand-side terms. Purely diagnostic.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct StepDiagnostics {
    pub max_omega_rhs: f64,
    pub max_density_rhs: f64,
    pub max_coupling: f64,
    pub max_bracket_omega: f64,
    pub max_diffusion_omega: f64,
    pub max_bracket_density: f64,
    pub max_drift: f64,
    pub max_diffusion_density: f64,
    pub solver_iterations: usize,
    pub timings: StageTimings,
}

fn max_abs(a: &Array3<f64>) -> f64 {
    a.iter().fold(0.0_f64, |m, v| m.max(v.abs()))
}

struct Terms {
    bracket_omega: Array3<f64>,
    diffusion_omega: Array3<f64>,
    bracket_density: Array3<f64>,
    diffusion_density: Array3<f64>,
}

/// Hasegawa-Wakatani step engine.
pub struct HasegawaWakatani {
    nu_perp: f64,
    order: DiffusionOrder,
    mode: Mode,
    spacing: f64,
    subtract_slice_mean: bool,
    solver: Box<dyn PoissonSolver>,
    strategy: Box<dyn StepStrategy>,
}

impl fmt::Debug for HasegawaWakatani {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HasegawaWakatani")
            .field("nu_perp", &self.nu_perp)
            .field("order", &self.order)
            .field("mode", &self.mode)
            .field("spacing", &self.spacing)
            .field("subtract_slice_mean", &self.subtract_slice_mean)
            .field("solver", &self.solver.name())
            .finish()
    }
}

/// Builder with the documented defaults: `nu_perp = 1`, `N = 2`,
/// `kap = 0`, conjugate gradient, `d = 1`, no slice-mean correction.
#[derive(Debug)]
pub struct EngineBuilder {
    nu_perp: f64,
    order: DiffusionOrder,
    kap: f64,
    spacing: f64,
    subtract_slice_mean: bool,
    solver: Option<Box<dyn PoissonSolver>>,
}

impl Default for EngineBuilder {
    fn default() -> Self {
        EngineBuilder {
            nu_perp: 1.0,
            order: DiffusionOrder::new(2),
            kap: 0.0,
            spacing: 1.0,
            subtract_slice_mean: false,
            solver: None,
        }
    }
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nu_perp(mut self, nu_perp: f64) -> Self {
        self.nu_perp = nu_perp;
        self
    }

    pub fn order(mut self, order: DiffusionOrder) -> Self {
        self.order = order;
        self
    }

    pub fn kap(mut self, kap: f64) -> Self {
        self.kap = kap;
        self
    }

    pub fn spacing(mut self, spacing: f64) -> Self {
        self.spacing = spacing;
        self
    }

    pub fn subtract_slice_mean(mut self, enabled: bool) -> Self {
        self.subtract_slice_mean = enabled;
        self
    }

    pub fn poisson_solver(mut self, solver: Box<dyn PoissonSolver>) -> Self {
        self.solver = Some(solver);
        self
    }

    pub fn build(self) -> PlasmaResult<HasegawaWakatani> {
        if !self.nu_perp.is_finite() {
            return Err(PlasmaError::ConfigError(format!(
                "nu_perp must be finite, got {}",
                self.nu_perp
            )));
        }
        if !self.kap.is_finite() {
            return Err(PlasmaError::ConfigError(format!("kap must be finite, got {}", self.kap)));
        }
        if !self.spacing.is_finite() || self.spacing <= 0.0 {
            return Err(PlasmaError::ConfigError(format!(
                "spacing must be finite and > 0, got {}",
                self.spacing
            )));
        }
        let mode = Mode::select(self.kap);
        Ok(HasegawaWakatani {
            nu_perp: self.nu_perp,
            order: self.order,
            mode,
            spacing: self.spacing,
            subtract_slice_mean: self.subtract_slice_mean,
            solver: self
                .solver
                .unwrap_or_else(|| Box::new(ConjugateGradient::default())),
            strategy: mode.strategy(),
        })
    }
}

impl HasegawaWakatani {
    pub fn builder() -> EngineBuilder {
        EngineBuilder::new()
    }

    /// Engine with the model, solver and spacing of a loaded config.
    pub fn from_config(config: &SimulationConfig) -> PlasmaResult<Self> {
        let m = &config.model;
        EngineBuilder::new()
            .nu_perp(m.nu_perp)
            .order(config.diffusion_order()?)
            .kap(m.kap)
            .spacing(config.grid.spacing)
            .subtract_slice_mean(m.subtract_slice_mean)
            .poisson_solver(solver::from_config(&config.solver))
            .build()
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn nu_perp(&self) -> f64 {
        self.nu_perp
    }

    pub fn order(&self) -> DiffusionOrder {
        self.order
    }

    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    pub fn solver_name(&self) -> &'static str {
        self.solver.name()
    }

    /// Advance one explicit Euler step of size `dt`.
    pub fn step(&self, state: &PlasmaState, dt: f64) -> PlasmaResult<PlasmaState> {
        self.step_with_diagnostics(state, dt).map(|(next, _)| next)
    }

    /// Advance `steps` steps sequentially, stopping at the first error.
    pub fn run(&self, state: PlasmaState, dt: f64, steps: usize) -> PlasmaResult<PlasmaState> {
        (0..steps).try_fold(state, |s, _| self.step(&s, dt))
    }

    fn check(&self, state: &PlasmaState, dt: f64) -> PlasmaResult<()> {
        if !dt.is_finite() {
            return Err(PlasmaError::ConfigError(format!("dt must be finite, got {dt}")));
        }
        if state.domain.spacing != self.spacing {
            return Err(PlasmaError::ConfigError(format!(
                "state spacing {} differs from engine spacing {}",
                state.domain.spacing, self.spacing
            )));
        }
        let kap = match self.mode {
            Mode::Planar { kap } => kap,
            Mode::FieldAligned => 0.0,
        };
        if state.kap != kap {
            return Err(PlasmaError::ConfigError(format!(
                "state kap {} differs from engine kap {}",
                state.kap, kap
            )));
        }
        let expected = state.shape();
        for (context, field) in [
            ("PlasmaState::density", &state.density),
            ("PlasmaState::omega", &state.omega),
        ] {
            if field.shape() != expected {
                let (b, z, y, x) = expected.dim();
                let (fb, fz, fy, fx) = field.shape().dim();
                return Err(PlasmaError::ShapeMismatch {
                    context,
                    expected: vec![b, z, y, x],
                    found: vec![fb, fz, fy, fx],
                });
            }
        }
        self.strategy.check_domain(&state.domain)
    }

    fn bracket_and_diffusion(&self, phi: &Array3<f64>, omega: &Array3<f64>, density: &Array3<f64>) -> PlasmaResult<Terms> {
        let d = self.spacing;
        let ((bracket_omega, diffusion_omega), (bracket_density, diffusion_density)) = rayon::join(
            || {
                rayon::join(
                    || poisson_bracket(phi.view(), omega.view(), d),
                    || hyperdiffuse(omega.view(), self.order, self.nu_perp, d),
                )
            },
            || {
                rayon::join(
                    || poisson_bracket(phi.view(), density.view(), d),
                    || hyperdiffuse(density.view(), self.order, self.nu_perp, d),
                )
            },
        );
        Ok(Terms {
            bracket_omega: bracket_omega?,
            diffusion_omega: diffusion_omega?,
            bracket_density: bracket_density?,
            diffusion_density: diffusion_density?,
        })
    }

    /// Advance one step and report the RHS maxima and stage timings.
    pub fn step_with_diagnostics(&self, state: &PlasmaState, dt: f64) -> PlasmaResult<(PlasmaState, StepDiagnostics)> {
        self.check(state, dt)?;
        let mut timings = StageTimings::default();
        let plane = state.domain.plane();

        // normalize + poisson
        let t = Instant::now();
        let policy = self.strategy.mean_policy(self.subtract_slice_mean);
        let solved = solve_potential(&*self.solver, &state.omega.fold_parallel()?, &plane, policy)?;
        let phi_field = solved.phi.clone().unfold()?;
        timings.poisson = t.elapsed();

        // derivatives
        let t = Instant::now();
        let phi = solved.phi.data();
        let omega = solved.omega.data();
        let density_stack: SliceStack = state.density.fold_parallel()?;
        let density = density_stack.data();
        let coupling = self.strategy.coupling(state, &phi_field)?;
        let kappa = self.strategy.drive(state)?;
        let dy_phi = d_dy_stack(phi.view(), self.spacing)?;
        timings.derivatives = t.elapsed();

        // bracket_and_diffusion
        let t = Instant::now();
        let terms = self.bracket_and_diffusion(phi, omega, density)?;
        timings.bracket_and_diffusion = t.elapsed();

        // assemble_rhs
        let t = Instant::now();
        let drift = &kappa * &dy_phi;
        let (rhs_omega, rhs_density) = rayon::join(
            || {
                let mut rhs = Array3::zeros(coupling.raw_dim());
                Zip::from(&mut rhs)
                    .and(&coupling)
                    .and(&terms.bracket_omega)
                    .and(&terms.diffusion_omega)
                    .for_each(|r, &c, &b, &df| *r = c - b + df);
                rhs
            },
            || {
                let mut rhs = Array3::zeros(coupling.raw_dim());
                Zip::from(&mut rhs)
                    .and(&coupling)
                    .and(&terms.bracket_density)
                    .and(&drift)
                    .and(&terms.diffusion_density)
                    .for_each(|r, &c, &b, &k, &df| *r = c - b - k + df);
                rhs
            },
        );
        timings.assemble = t.elapsed();

        // integrate
        let t = Instant::now();
        let next_omega = solved.omega.with_data(euler(omega, &rhs_omega, dt)?)?.unfold()?;
        let next_density = density_stack.with_data(euler(density, &rhs_density, dt)?)?.unfold()?;
        timings.integrate = t.elapsed();

        let (laplace_phi, laplace_n) =
            self.strategy
                .diagnostic_laplacians(&state.domain, &phi_field, &state.density)?;

        let diagnostics = StepDiagnostics {
            max_omega_rhs: max_abs(&rhs_omega),
            max_density_rhs: max_abs(&rhs_density),
            max_coupling: max_abs(&coupling),
            max_bracket_omega: max_abs(&terms.bracket_omega),
            max_diffusion_omega: max_abs(&terms.diffusion_omega),
            max_bracket_density: max_abs(&terms.bracket_density),
            max_drift: max_abs(&drift),
            max_diffusion_density: max_abs(&terms.diffusion_density),
            solver_iterations: solved.iterations,
            timings,
        };
        log_step(self.strategy.name(), state.age, &diagnostics);

        let next = PlasmaState {
            domain: state.domain,
            density: next_density,
            phi: phi_field,
            omega: next_omega,
            nu: state.nu,
            kap: state.kap,
            age: state.age + dt,
            laplace_phi,
            laplace_n,
        };
        Ok((next, diagnostics))
    }
}

fn log_step(model: &str, age: f64, d: &StepDiagnostics) {
    log::debug!(
        "{model} t={age:.4}  o={:.3e}  n={:.3e}  nu={:.3e}  [p,o]={:.3e}  nab2o={:.3e}  [p,n]={:.3e}  k*dyp={:.3e}  nab2n={:.3e}  iters={}",
        d.max_omega_rhs,
        d.max_density_rhs,
        d.max_coupling,
        d.max_bracket_omega,
        d.max_diffusion_omega,
        d.max_bracket_density,
        d.max_drift,
        d.max_diffusion_density,
        d.solver_iterations,
    );
    let t = &d.timings;
    log::debug!(
        "timings: poisson={:?} derivatives={:?} bracket+diffusion={:?} rhs={:?} integrate={:?} total={:?}",
        t.poisson,
        t.derivatives,
        t.bracket_and_diffusion,
        t.assemble,
        t.integrate,
        t.total(),
    );
}
