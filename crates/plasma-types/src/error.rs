// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Plasma Errors
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PlasmaError {
    #[error("Solver diverged at iteration {iteration}: residual {residual:.3e}")]
    SolverDiverged { iteration: usize, residual: f64 },

    #[error("Ill-posed Poisson problem: slice {slice} has mean {mean:.3e} on a periodic plane")]
    IllPosedPoisson { slice: usize, mean: f64 },

    #[error("Degenerate density normalization: grid-wide sum {total:.3e} is too close to zero")]
    DegenerateNormalization { total: f64 },

    #[error("Invalid diffusion order {0}: must be >= 0")]
    InvalidDiffusionOrder(i64),

    #[error("Shape mismatch in {context}: expected {expected:?}, found {found:?}")]
    ShapeMismatch {
        context: &'static str,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type PlasmaResult<T> = Result<T, PlasmaError>;

/// Fail fast when two coupled arrays disagree on shape.
pub fn ensure_same_shape(context: &'static str, expected: &[usize], found: &[usize]) -> PlasmaResult<()> {
    if expected != found {
        return Err(PlasmaError::ShapeMismatch {
            context,
            expected: expected.to_vec(),
            found: found.to_vec(),
        });
    }
    Ok(())
}
