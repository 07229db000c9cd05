// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Config
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use serde::{Deserialize, Serialize};

use crate::error::{PlasmaError, PlasmaResult};
use crate::grid::{Boundary, Domain, GridShape};

/// Top-level simulation configuration, loaded from JSON.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub run_name: String,
    pub grid: GridConfig,
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub solver: SolverConfig,
    #[serde(default)]
    pub time: TimeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// `[batch, nz, ny, nx]`.
    pub shape: [usize; 4],
    #[serde(default = "default_spacing")]
    pub spacing: f64,
    /// Falls back to `spacing` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parallel_spacing: Option<f64>,
    /// Boundary kinds of `[z, y, x]`.
    #[serde(default = "default_boundary")]
    pub boundary: [Boundary; 3],
}

/// Hasegawa-Wakatani model parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    #[serde(default = "default_nu")]
    pub nu: f64,
    #[serde(default = "default_nu_perp")]
    pub nu_perp: f64,
    /// Hyperdiffusion order N (applies nabla^(2N)). Signed so that a
    /// negative value in a file is reported instead of failing to parse.
    #[serde(default = "default_order")]
    pub order: i64,
    /// Nonzero selects the planar model.
    #[serde(default)]
    pub kap: f64,
    /// Auto-correct nonzero slice means in the field-aligned model
    /// instead of rejecting them.
    #[serde(default)]
    pub subtract_slice_mean: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    Cg,
    Sor,
    Spectral,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    #[serde(default = "default_solver_kind")]
    pub kind: SolverKind,
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_convergence_threshold")]
    pub convergence_threshold: f64,
    /// Only used by the SOR solver.
    #[serde(default = "default_relaxation_factor")]
    pub relaxation_factor: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeConfig {
    #[serde(default = "default_dt")]
    pub dt: f64,
    #[serde(default = "default_steps")]
    pub steps: usize,
}

fn default_spacing() -> f64 {
    1.0
}
fn default_boundary() -> [Boundary; 3] {
    [Boundary::Periodic; 3]
}
fn default_nu() -> f64 {
    1.0
}
fn default_nu_perp() -> f64 {
    1.0
}
fn default_order() -> i64 {
    2
}
fn default_solver_kind() -> SolverKind {
    SolverKind::Cg
}
fn default_max_iterations() -> usize {
    2000
}
fn default_convergence_threshold() -> f64 {
    1e-10
}
fn default_relaxation_factor() -> f64 {
    1.8
}
fn default_dt() -> f64 {
    0.1
}
fn default_steps() -> usize {
    1
}

impl Default for ModelConfig {
    fn default() -> Self {
        ModelConfig {
            nu: default_nu(),
            nu_perp: default_nu_perp(),
            order: default_order(),
            kap: 0.0,
            subtract_slice_mean: false,
        }
    }
}

impl Default for SolverConfig {
    fn default() -> Self {
        SolverConfig {
            kind: default_solver_kind(),
            max_iterations: default_max_iterations(),
            convergence_threshold: default_convergence_threshold(),
            relaxation_factor: default_relaxation_factor(),
        }
    }
}

impl Default for TimeConfig {
    fn default() -> Self {
        TimeConfig {
            dt: default_dt(),
            steps: default_steps(),
        }
    }
}

/// Hyperdiffusion order N: the perpendicular Laplacian is applied N times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DiffusionOrder(usize);

impl DiffusionOrder {
    pub const fn new(order: usize) -> Self {
        DiffusionOrder(order)
    }

    pub fn get(self) -> usize {
        self.0
    }
}

impl TryFrom<i64> for DiffusionOrder {
    type Error = PlasmaError;

    fn try_from(order: i64) -> PlasmaResult<Self> {
        usize::try_from(order)
            .map(DiffusionOrder)
            .map_err(|_| PlasmaError::InvalidDiffusionOrder(order))
    }
}

impl SimulationConfig {
    /// Load from a JSON file and validate.
    pub fn from_file(path: &str) -> PlasmaResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn from_json(contents: &str) -> PlasmaResult<Self> {
        let config: Self = serde_json::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> PlasmaResult<()> {
        self.create_domain()?;
        self.diffusion_order()?;
        let m = &self.model;
        if !m.nu.is_finite() || m.nu <= 0.0 {
            return Err(PlasmaError::ConfigError(format!(
                "model.nu must be finite and > 0, got {}",
                m.nu
            )));
        }
        if !m.nu_perp.is_finite() || !m.kap.is_finite() {
            return Err(PlasmaError::ConfigError(
                "model.nu_perp and model.kap must be finite".to_string(),
            ));
        }
        let s = &self.solver;
        if s.max_iterations == 0 {
            return Err(PlasmaError::ConfigError(
                "solver.max_iterations must be >= 1".to_string(),
            ));
        }
        if s.convergence_threshold.is_nan() || s.convergence_threshold <= 0.0 {
            return Err(PlasmaError::ConfigError(format!(
                "solver.convergence_threshold must be > 0, got {}",
                s.convergence_threshold
            )));
        }
        if !(s.relaxation_factor > 0.0 && s.relaxation_factor < 2.0) {
            return Err(PlasmaError::ConfigError(format!(
                "solver.relaxation_factor must be in (0, 2), got {}",
                s.relaxation_factor
            )));
        }
        if !self.time.dt.is_finite() {
            return Err(PlasmaError::ConfigError(format!(
                "time.dt must be finite, got {}",
                self.time.dt
            )));
        }
        Ok(())
    }

    pub fn diffusion_order(&self) -> PlasmaResult<DiffusionOrder> {
        DiffusionOrder::try_from(self.model.order)
    }

    pub fn create_domain(&self) -> PlasmaResult<Domain> {
        let [batch, nz, ny, nx] = self.grid.shape;
        let shape = GridShape::new(batch, nz, ny, nx)?;
        let domain = Domain::new(shape, self.grid.spacing)?
            .with_parallel_spacing(self.grid.parallel_spacing.unwrap_or(self.grid.spacing))?
            .with_boundary(self.grid.boundary);
        Ok(domain)
    }
}
