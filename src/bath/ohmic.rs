// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Ohmic and hybrid Ohmic baths.
//!
//! Ohmic spectral density with exponential cutoff:
//!
//!   γ(ω) = 2πηω e^{−|ω|/ωc} / (1 − e^{−βω}),   γ(0) = 2πη/β
//!
//! whose inverse transform has the closed form
//!
//!   C(τ) = η/β² [ψ₁(1 + 1/(βωc) − iτ/β) + ψ₁(1/(βωc) + iτ/β)]
//!
//! with ψ₁ the trigamma function. The hybrid bath superposes low-frequency
//! Gaussian noise of width W on the Ohmic part.
//!
//! Ref: Leggett et al. (1987), Rev. Mod. Phys. 59, 1.
//! Ref: Amin & Averin (2008), Phys. Rev. Lett. 100, 197001.

use std::f64::consts::PI;

use num_complex::Complex64;
use tracing::debug;

use super::{require_positive, BathModel};
use crate::error::{Error, Result};
use crate::numeric::trigamma;
use crate::units::{beta_to_temperature, temperature_to_beta};

/// Ohmic bath.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OhmicBath {
    eta: f64,
    omega_c: f64,
    beta: f64,
}

impl OhmicBath {
    /// Create an Ohmic bath from coupling `eta`, angular cutoff `omega_c`
    /// (rad/ns) and inverse temperature `beta` (ns). `beta = ∞` is the
    /// zero-temperature bath.
    pub fn new(eta: f64, omega_c: f64, beta: f64) -> Result<Self> {
        require_positive("eta", eta)?;
        require_positive("omega_c", omega_c)?;
        if beta.is_nan() || beta <= 0.0 {
            return Err(Error::config(format!("beta must be positive, got {beta}")));
        }
        debug!(eta, omega_c, beta, "ohmic bath");
        Ok(Self { eta, omega_c, beta })
    }

    /// Create from lab units: cutoff `fc` in GHz, temperature in mK.
    pub fn from_lab_units(eta: f64, fc: f64, temperature_mk: f64) -> Result<Self> {
        require_positive("fc", fc)?;
        if !temperature_mk.is_finite() || temperature_mk < 0.0 {
            return Err(Error::config(format!(
                "temperature must be non-negative and finite, got {temperature_mk} mK"
            )));
        }
        Self::new(eta, 2.0 * PI * fc, temperature_to_beta(temperature_mk))
    }

    pub fn eta(&self) -> f64 {
        self.eta
    }

    pub fn omega_c(&self) -> f64 {
        self.omega_c
    }

    pub fn beta(&self) -> f64 {
        self.beta
    }

    /// Temperature in mK.
    pub fn temperature(&self) -> f64 {
        beta_to_temperature(self.beta)
    }

    pub fn is_zero_temperature(&self) -> bool {
        self.beta.is_infinite()
    }
}

impl BathModel for OhmicBath {
    fn correlation(&self, tau: f64) -> Complex64 {
        if self.is_zero_temperature() {
            let z = Complex64::new(1.0 / self.omega_c, tau);
            return self.eta / (z * z);
        }
        let x2 = 1.0 / (self.beta * self.omega_c);
        let x1 = Complex64::new(0.0, tau / self.beta);
        self.eta * (trigamma(1.0 + x2 - x1) + trigamma(x2 + x1)) / (self.beta * self.beta)
    }

    fn spectrum(&self, omega: f64) -> f64 {
        ohmic_gamma(self.eta, self.omega_c, self.beta, omega)
    }
}

/// |βω| below which γ(ω) is taken from the small-argument expansion.
const SMALL_BETA_OMEGA: f64 = 1e-4;

/// Ohmic γ(ω); the ω → 0 limit is taken analytically.
fn ohmic_gamma(eta: f64, omega_c: f64, beta: f64, omega: f64) -> f64 {
    if beta.is_infinite() {
        return if omega > 0.0 {
            2.0 * PI * eta * omega * (-omega / omega_c).exp()
        } else {
            0.0
        };
    }
    let x = beta * omega;
    let cutoff = (-omega.abs() / omega_c).exp();
    if x.abs() < SMALL_BETA_OMEGA {
        // x / (1 − e^{−x}) = 1 + x/2 + x²/12 + O(x⁴)
        return 2.0 * PI * eta / beta * (1.0 + x / 2.0 + x * x / 12.0) * cutoff;
    }
    // 1 − e^{−βω} = −expm1(−βω)
    2.0 * PI * eta * omega * cutoff / -(-x).exp_m1()
}

/// Ohmic bath plus low-frequency Gaussian noise.
///
///   γ(ω) = γ_Ohmic(ω) + √(2π) W exp(−(ω − ε_L)²/(2W²))
///   C(τ) = C_Ohmic(τ) + W² exp(−iε_Lτ − W²τ²/2)
///
/// with reorganization energy ε_L = βW²/2, which makes the low-frequency
/// part satisfy detailed balance γ_L(−ω) = e^{−βω} γ_L(ω).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HybridOhmicBath {
    width: f64,
    epsilon: f64,
    ohmic: OhmicBath,
}

impl HybridOhmicBath {
    /// Create from angular width `width`, Ohmic parameters and finite `beta`.
    pub fn new(width: f64, eta: f64, omega_c: f64, beta: f64) -> Result<Self> {
        require_positive("width", width)?;
        require_positive("beta", beta)?;
        let ohmic = OhmicBath::new(eta, omega_c, beta)?;
        let epsilon = beta * width * width / 2.0;
        debug!(width, epsilon, "hybrid ohmic bath");
        Ok(Self {
            width,
            epsilon,
            ohmic,
        })
    }

    /// Create from lab units: `w` and `fc` in GHz, temperature in mK.
    pub fn from_lab_units(w: f64, eta: f64, fc: f64, temperature_mk: f64) -> Result<Self> {
        require_positive("temperature", temperature_mk)?;
        require_positive("fc", fc)?;
        Self::new(
            2.0 * PI * w,
            eta,
            2.0 * PI * fc,
            temperature_to_beta(temperature_mk),
        )
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    /// Reorganization energy ε_L = βW²/2.
    pub fn reorganization_energy(&self) -> f64 {
        self.epsilon
    }

    /// The high-frequency Ohmic component.
    pub fn ohmic(&self) -> &OhmicBath {
        &self.ohmic
    }

    /// Low-frequency spectrum γ_L(ω).
    pub fn low_frequency_spectrum(&self, omega: f64) -> f64 {
        let w = self.width;
        let d = omega - self.epsilon;
        (2.0 * PI).sqrt() * w * (-d * d / (2.0 * w * w)).exp()
    }

    /// Low-frequency correlation C_L(τ).
    pub fn low_frequency_correlation(&self, tau: f64) -> Complex64 {
        let w2 = self.width * self.width;
        w2 * Complex64::new(-w2 * tau * tau / 2.0, -self.epsilon * tau).exp()
    }
}

impl BathModel for HybridOhmicBath {
    fn correlation(&self, tau: f64) -> Complex64 {
        self.ohmic.correlation(tau) + self.low_frequency_correlation(tau)
    }

    fn spectrum(&self, omega: f64) -> f64 {
        self.ohmic.spectrum(omega) + self.low_frequency_spectrum(omega)
    }
}
