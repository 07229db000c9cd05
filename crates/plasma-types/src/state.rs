// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — State
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
use crate::error::{PlasmaError, PlasmaResult};
use crate::grid::{Domain, Field, GridShape};

/// Hasegawa-Wakatani plasma state.
///
/// A step never modifies a state; it builds the next one. `nu` and `kap`
/// are run parameters, `age` advances by `dt` per step, and the two
/// `laplace_*` fields are diagnostics with no feedback into the dynamics.
#[derive(Debug, Clone, PartialEq)]
pub struct PlasmaState {
    pub domain: Domain,
    pub density: Field,
    pub phi: Field,
    pub omega: Field,
    /// Parallel resistivity parameter, nu_e/(1.96 w_ce).
    pub nu: f64,
    /// Background density-gradient coefficient (0 selects the field-aligned model).
    pub kap: f64,
    pub age: f64,
    pub laplace_phi: Field,
    pub laplace_n: Field,
}

impl PlasmaState {
    /// All fields zero, `age = 0`.
    pub fn zeros(domain: Domain, nu: f64, kap: f64) -> PlasmaResult<Self> {
        if !nu.is_finite() || nu <= 0.0 {
            return Err(PlasmaError::ConfigError(format!(
                "nu must be finite and > 0, got {nu}"
            )));
        }
        if !kap.is_finite() {
            return Err(PlasmaError::ConfigError(format!("kap must be finite, got {kap}")));
        }
        let zero = Field::zeros(domain.shape);
        Ok(PlasmaState {
            domain,
            density: zero.clone(),
            phi: zero.clone(),
            omega: zero.clone(),
            nu,
            kap,
            age: 0.0,
            laplace_phi: zero.clone(),
            laplace_n: zero,
        })
    }

    pub fn shape(&self) -> GridShape {
        self.domain.shape
    }

    pub fn with_omega(mut self, omega: Field) -> PlasmaResult<Self> {
        self.check("PlasmaState::with_omega", &omega)?;
        self.omega = omega;
        Ok(self)
    }

    pub fn with_density(mut self, density: Field) -> PlasmaResult<Self> {
        self.check("PlasmaState::with_density", &density)?;
        self.density = density;
        Ok(self)
    }

    pub fn with_phi(mut self, phi: Field) -> PlasmaResult<Self> {
        self.check("PlasmaState::with_phi", &phi)?;
        self.phi = phi;
        Ok(self)
    }

    fn check(&self, context: &'static str, field: &Field) -> PlasmaResult<()> {
        if field.shape() != self.domain.shape {
            let (b, z, y, x) = self.domain.shape.dim();
            let (fb, fz, fy, fx) = field.shape().dim();
            return Err(PlasmaError::ShapeMismatch {
                context,
                expected: vec![b, z, y, x],
                found: vec![fb, fz, fy, fx],
            });
        }
        Ok(())
    }
}
