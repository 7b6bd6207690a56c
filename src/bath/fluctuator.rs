// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Random telegraph noise (RTN) fluctuators.
//!
//! A symmetric fluctuator switches between ±b at rate ν:
//!
//!   C(τ) = b² e^{−2ν|τ|},    γ(ω) = 2b² (2ν) / ((2ν)² + ω²)
//!
//! An ensemble of independent fluctuators sums the individual terms.
//! Log-spaced switching rates with equal weights give the familiar 1/f
//! spectrum between the slowest and fastest rate.
//!
//! Ref: Paladino et al. (2014), Rev. Mod. Phys. 86, 361.

use num_complex::Complex64;
use tracing::debug;

use super::{require_positive, BathModel};
use crate::error::{Error, Result};

/// Single symmetric random telegraph fluctuator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SymmetricRtn {
    b: f64,
    nu: f64,
}

impl SymmetricRtn {
    /// Amplitude `b` and switching rate `nu` (1/ns). Only b² enters the
    /// noise, so any finite amplitude is accepted, including zero.
    pub fn new(b: f64, nu: f64) -> Result<Self> {
        require_finite("b", b)?;
        require_positive("nu", nu)?;
        Ok(Self { b, nu })
    }

    pub fn amplitude(&self) -> f64 {
        self.b
    }

    pub fn rate(&self) -> f64 {
        self.nu
    }
}

impl BathModel for SymmetricRtn {
    fn correlation(&self, tau: f64) -> Complex64 {
        Complex64::new(rtn_correlation(self.b, self.nu, tau), 0.0)
    }

    fn spectrum(&self, omega: f64) -> f64 {
        rtn_spectrum(self.b, self.nu, omega)
    }
}

/// Ensemble of independent symmetric fluctuators.
#[derive(Debug, Clone, PartialEq)]
pub struct EnsembleFluctuator {
    b: Vec<f64>,
    nu: Vec<f64>,
}

impl EnsembleFluctuator {
    /// Build from parallel amplitude and rate lists.
    pub fn new(b: Vec<f64>, nu: Vec<f64>) -> Result<Self> {
        if b.len() != nu.len() {
            return Err(Error::config(format!(
                "fluctuator amplitude/rate length mismatch: {} vs {}",
                b.len(),
                nu.len()
            )));
        }
        if b.is_empty() {
            return Err(Error::config("fluctuator ensemble must not be empty"));
        }
        for (&bi, &ni) in b.iter().zip(&nu) {
            require_finite("b", bi)?;
            require_positive("nu", ni)?;
        }
        debug!(count = b.len(), "fluctuator ensemble");
        Ok(Self { b, nu })
    }

    /// `count` fluctuators with log-spaced rates in `[nu_min, nu_max]` and
    /// amplitudes `b/√count`, so the ensemble variance C(0) equals b².
    pub fn one_over_f(b: f64, nu_min: f64, nu_max: f64, count: usize) -> Result<Self> {
        require_finite("b", b)?;
        require_positive("nu_min", nu_min)?;
        require_positive("nu_max", nu_max)?;
        if nu_min > nu_max {
            return Err(Error::config(format!(
                "nu_min ({nu_min}) must not exceed nu_max ({nu_max})"
            )));
        }
        if count == 0 {
            return Err(Error::config("1/f ensemble needs at least one fluctuator"));
        }

        let amplitude = b / (count as f64).sqrt();
        let log_span = (nu_max / nu_min).ln();
        let rates = (0..count)
            .map(|i| {
                if count == 1 {
                    nu_min
                } else {
                    nu_min * (log_span * i as f64 / (count - 1) as f64).exp()
                }
            })
            .collect();
        Self::new(vec![amplitude; count], rates)
    }

    pub fn len(&self) -> usize {
        self.b.len()
    }

    pub fn is_empty(&self) -> bool {
        self.b.is_empty()
    }

    /// The individual fluctuators.
    pub fn fluctuators(&self) -> impl Iterator<Item = SymmetricRtn> + '_ {
        self.b
            .iter()
            .zip(&self.nu)
            .map(|(&b, &nu)| SymmetricRtn { b, nu })
    }
}

impl BathModel for EnsembleFluctuator {
    fn correlation(&self, tau: f64) -> Complex64 {
        let c = self
            .b
            .iter()
            .zip(&self.nu)
            .map(|(&b, &nu)| rtn_correlation(b, nu, tau))
            .sum();
        Complex64::new(c, 0.0)
    }

    fn spectrum(&self, omega: f64) -> f64 {
        self.b
            .iter()
            .zip(&self.nu)
            .map(|(&b, &nu)| rtn_spectrum(b, nu, omega))
            .sum()
    }
}

fn require_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(Error::config(format!("{name} must be finite, got {value}")))
    }
}

fn rtn_correlation(b: f64, nu: f64, tau: f64) -> f64 {
    b * b * (-2.0 * nu * tau.abs()).exp()
}

fn rtn_spectrum(b: f64, nu: f64, omega: f64) -> f64 {
    let g = 2.0 * nu;
    2.0 * b * b * g / (g * g + omega * omega)
}
