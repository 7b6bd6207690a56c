// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Correlation timescales used to check Markovian and coarse-graining
//! approximations.
//!
//!   τ_SB = 1 / ∫₀^∞ |C(t)| dt
//!   τ_B  = τ_SB ∫₀^N t |C(t)| dt
//!   τ_CG = √(τ_SB τ_B / N)
//!
//! The Born-Markov approximation is self-consistent when τ_B ≪ τ_SB; the
//! coarse-grained master equation additionally needs τ_B ≪ τ_CG ≪ τ_SB.
//!
//! Ref: Albash et al. (2012), New J. Phys. 14, 123016, Sec. 3.
//! Ref: Mozgunov & Lidar (2020), Quantum 4, 227.

use tracing::debug;

use super::{require_positive, BathModel};
use crate::config::QuadratureConfig;
use crate::error::{Error, Result};
use crate::numeric::integrate;

/// Timescale estimate together with its propagated quadrature error bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Timescale {
    pub estimate: f64,
    pub error: f64,
}

/// System-bath interaction timescale τ_SB.
pub fn tau_sb<B>(bath: &B, config: &QuadratureConfig) -> Result<Timescale>
where
    B: BathModel + ?Sized,
{
    let q = integrate(|t| bath.correlation(t).norm(), 0.0, f64::INFINITY, config)?;
    if q.value <= 0.0 {
        return Err(Error::config(
            "bath correlation vanishes identically; tau_sb is undefined",
        ));
    }
    let ts = Timescale {
        estimate: 1.0 / q.value,
        error: q.error / (q.value * q.value),
    };
    debug!(
        estimate = ts.estimate,
        error = ts.error,
        subdivisions = q.subdivisions,
        "tau_sb"
    );
    Ok(ts)
}

/// Bath correlation timescale τ_B over the integration horizon `[0, horizon]`,
/// given a previously computed `tau_sb` estimate.
pub fn tau_b<B>(bath: &B, horizon: f64, tau_sb: f64, config: &QuadratureConfig) -> Result<Timescale>
where
    B: BathModel + ?Sized,
{
    require_positive("horizon", horizon)?;
    require_positive("tau_sb", tau_sb)?;
    let q = integrate(|t| t * bath.correlation(t).norm(), 0.0, horizon, config)?;
    let ts = Timescale {
        estimate: tau_sb * q.value,
        error: tau_sb * q.error,
    };
    debug!(
        horizon,
        estimate = ts.estimate,
        error = ts.error,
        subdivisions = q.subdivisions,
        "tau_b"
    );
    Ok(ts)
}

/// Coarse-graining timescale √(τ_SB τ_B / N) with `N = horizon`.
///
/// The error is first-order propagation of the τ_SB and τ_B bounds through
/// the square root.
pub fn coarse_grain_timescale<B>(
    bath: &B,
    horizon: f64,
    config: &QuadratureConfig,
) -> Result<Timescale>
where
    B: BathModel + ?Sized,
{
    let sb = tau_sb(bath, config)?;
    let b = tau_b(bath, horizon, sb.estimate, config)?;
    let estimate = (sb.estimate * b.estimate / horizon).sqrt();
    let error = if estimate > 0.0 {
        (sb.error * b.estimate + sb.estimate * b.error) / (2.0 * horizon * estimate)
    } else {
        0.0
    };
    Ok(Timescale { estimate, error })
}
