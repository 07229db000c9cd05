// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Plasma Math
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Numerical kernels for the drift-wave stepper: periodic stencils,
//! the Arakawa bracket, hyperdiffusion and Poisson solvers.

pub mod arakawa;
pub mod batch;
pub mod diffusion;
pub mod fft;
pub mod integrate;
pub mod padding;
pub mod solver;
pub mod stencil;
