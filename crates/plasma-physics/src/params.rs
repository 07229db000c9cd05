// ─────────────────────────────────────────────────────────────────────
// SCPN Fusion Core — Model Parameters
// © 1998–2026 Miroslav Šotek. All rights reserved.
// Contact: www.anulum.li | protoscience@anulum.li
// ORCID: https://orcid.org/0009-0009-3560-0851
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
//! Dimensionless coefficients of the drift-wave model.

/// Parallel conductivity `σ̄ = Te0 / (me·νe)`.
pub fn sigma_bar(te0: f64, me: f64, nu_e: f64) -> f64 {
    te0 / (me * nu_e)
}

/// `μ = sqrt(me/mi) · (Ti/Te)^(5/2) · σ`.
pub fn mu(me: f64, mi: f64, ti: f64, te: f64, sigma: f64) -> f64 {
    (me / mi).sqrt() * (ti / te).powf(2.5) * sigma
}
