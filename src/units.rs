// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Unit conventions.
//!
//! Time is measured in ns, frequency in GHz and temperature in mK. Matrices
//! handed to [`crate::hamiltonian`] are in GHz and are converted to angular
//! frequency exactly once, at construction, by [`EnergyUnit::factor`]. The
//! same factor is divided out exactly once when eigenvalues are reported.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Boltzmann constant (J/K), CODATA 2014.
pub const KB: f64 = 1.380_648_52e-23;

/// Planck constant (J·s), CODATA 2014.
pub const H_PLANCK: f64 = 6.626_070_04e-34;

/// Energy unit of user-supplied Hamiltonian matrices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnergyUnit {
    /// Matrices are in `h = 1` units (GHz); scaled by 2π on construction.
    #[default]
    Planck,
    /// Matrices are already in angular units (`ħ = 1`); no scaling.
    Reduced,
}

impl EnergyUnit {
    /// Multiplier applied once to every constant matrix at construction.
    pub fn factor(self) -> f64 {
        match self {
            EnergyUnit::Planck => 2.0 * PI,
            EnergyUnit::Reduced => 1.0,
        }
    }

    /// Convert an energy in this unit to angular frequency.
    pub fn to_angular(self, energy: f64) -> f64 {
        energy * self.factor()
    }

    /// Convert an angular frequency back to this unit.
    pub fn from_angular(self, omega: f64) -> f64 {
        omega / self.factor()
    }
}

/// Calling convention for the time argument passed to a Hamiltonian.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum TimeScale {
    /// The argument is the evaluation time itself.
    #[default]
    Absolute,
    /// The argument is physical time; coefficients take `s = t / total_time`.
    Fraction { total_time: f64 },
}

impl TimeScale {
    /// Build a fraction-of-total-time scale, rejecting non-positive totals.
    pub fn fraction(total_time: f64) -> Result<Self> {
        if !(total_time.is_finite() && total_time > 0.0) {
            return Err(Error::config(format!(
                "total_time must be positive and finite, got {total_time}"
            )));
        }
        Ok(TimeScale::Fraction { total_time })
    }

    /// Map a query time onto the coefficient argument.
    #[inline]
    pub fn map(self, t: f64) -> f64 {
        match self {
            TimeScale::Absolute => t,
            TimeScale::Fraction { total_time } => t / total_time,
        }
    }
}

/// Convert a temperature in mK to a thermal frequency `k_B T / h` in GHz.
pub fn temperature_to_freq(temperature_mk: f64) -> f64 {
    temperature_mk * KB / H_PLANCK / 1e12
}

/// Convert a temperature in mK to inverse temperature β in ns
/// (angular convention, `β = 1 / (2π k_B T / h)`).
///
/// Zero temperature maps to `f64::INFINITY`.
pub fn temperature_to_beta(temperature_mk: f64) -> f64 {
    1.0 / (2.0 * PI * temperature_to_freq(temperature_mk))
}

/// Inverse of [`temperature_to_beta`].
pub fn beta_to_temperature(beta: f64) -> f64 {
    1.0 / (2.0 * PI * beta) * H_PLANCK * 1e12 / KB
}
