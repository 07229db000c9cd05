// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Plasma Physics
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Hasegawa-Wakatani drift-wave model: Poisson coupling, drive terms,
//! the step engine, initial conditions and parameter helpers.

pub mod coupling;
pub mod engine;
pub mod init;
pub mod params;
pub mod poisson;

pub use engine::{EngineBuilder, HasegawaWakatani, Mode, StepDiagnostics};
