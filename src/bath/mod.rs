// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Bath models: correlation functions and spectral densities.
//!
//! Conventions (time in ns, angular frequency in rad/ns):
//!
//!   γ(ω) = ∫ C(τ) e^{iωτ} dτ,    C(τ) = (1/2π) ∫ γ(ω) e^{−iωτ} dω
//!
//!   S(ω) = P.V. (1/2π) ∫ γ(ω′)/(ω − ω′) dω′   (Lamb shift)
//!
//! Every single-operator bath implements [`BathModel`]. [`Bath`] is the
//! tagged union consumed by the [`registry`], which turns any variant into
//! operator-indexed closure matrices so dissipator code never branches on
//! the bath kind.
//!
//! Ref: Breuer & Petruccione, "The Theory of Open Quantum Systems" (2002), Ch. 3.
//! Ref: Albash et al. (2012), New J. Phys. 14, 123016.

use std::sync::Arc;

use num_complex::Complex64;

use crate::config::QuadratureConfig;
use crate::error::{Error, Result};
use crate::numeric::hilbert_transform;

pub mod correlated;
pub mod custom;
pub mod fluctuator;
pub mod ohmic;
pub mod registry;
pub mod timescale;

pub use correlated::CorrelatedBath;
pub use custom::CustomBath;
pub use fluctuator::{EnsembleFluctuator, SymmetricRtn};
pub use ohmic::{HybridOhmicBath, OhmicBath};
pub use registry::{
    build_correlation, build_lamb_shift, build_spectrum, CorrelationFn, CorrelationMatrix,
    LambShiftFn, LambShiftMatrix, OperatorMatrix, SpectrumMatrix,
};
pub use timescale::{coarse_grain_timescale, tau_b, tau_sb, Timescale};

/// Stationary correlation function `C(τ)`.
pub type CorrelationKernel = Arc<dyn Fn(f64) -> Complex64 + Send + Sync>;

/// Spectral density `γ(ω)`.
pub type SpectrumFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Correlation / spectrum capability shared by all single-operator baths.
pub trait BathModel: Send + Sync {
    /// Stationary correlation `C(τ)`.
    fn correlation(&self, tau: f64) -> Complex64;

    /// Two-time correlation `C(t1, t2)`; identical to `C(t1 − t2)`.
    fn correlation_at(&self, t1: f64, t2: f64) -> Complex64 {
        self.correlation(t1 - t2)
    }

    /// One-sided power spectral density `γ(ω)`.
    fn spectrum(&self, omega: f64) -> f64;

    /// Rate kernel used by dissipator construction; equal to the spectrum.
    fn gamma(&self, omega: f64) -> f64 {
        self.spectrum(omega)
    }

    /// Lamb-shift kernel `S(ω)`, the principal-value Hilbert transform of γ.
    fn lamb_shift(&self, omega: f64, config: &QuadratureConfig) -> Result<f64> {
        hilbert_transform(|w| self.spectrum(w), omega, config)
    }
}

/// Tagged union over all bath variants.
#[derive(Debug, Clone)]
pub enum Bath {
    Ohmic(OhmicBath),
    HybridOhmic(HybridOhmicBath),
    Custom(CustomBath),
    SymmetricRtn(SymmetricRtn),
    Ensemble(EnsembleFluctuator),
    Correlated(CorrelatedBath),
}

impl Bath {
    /// Short variant name for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Bath::Ohmic(_) => "ohmic",
            Bath::HybridOhmic(_) => "hybrid_ohmic",
            Bath::Custom(_) => "custom",
            Bath::SymmetricRtn(_) => "symmetric_rtn",
            Bath::Ensemble(_) => "ensemble_fluctuator",
            Bath::Correlated(_) => "correlated",
        }
    }

    /// Number of system operators the bath couples to.
    pub fn num_operators(&self) -> usize {
        match self {
            Bath::Correlated(b) => b.num_operators(),
            _ => 1,
        }
    }

    /// Scalar view of a single-operator bath.
    ///
    /// Correlated baths only expose operator-indexed matrices through the
    /// [`registry`] and return a configuration error here.
    pub fn as_model(&self) -> Result<&dyn BathModel> {
        match self {
            Bath::Ohmic(b) => Ok(b),
            Bath::HybridOhmic(b) => Ok(b),
            Bath::Custom(b) => Ok(b),
            Bath::SymmetricRtn(b) => Ok(b),
            Bath::Ensemble(b) => Ok(b),
            Bath::Correlated(_) => Err(Error::config(
                "correlated bath has no scalar correlation; use build_correlation/build_spectrum",
            )),
        }
    }

    /// Shared handle to the scalar model, for closures that outlive `self`.
    pub(crate) fn shared_model(&self) -> Option<Arc<dyn BathModel>> {
        let model: Arc<dyn BathModel> = match self {
            Bath::Ohmic(b) => Arc::new(*b),
            Bath::HybridOhmic(b) => Arc::new(*b),
            Bath::Custom(b) => Arc::new(b.clone()),
            Bath::SymmetricRtn(b) => Arc::new(*b),
            Bath::Ensemble(b) => Arc::new(b.clone()),
            Bath::Correlated(_) => return None,
        };
        Some(model)
    }
}

impl From<OhmicBath> for Bath {
    fn from(b: OhmicBath) -> Self {
        Bath::Ohmic(b)
    }
}

impl From<HybridOhmicBath> for Bath {
    fn from(b: HybridOhmicBath) -> Self {
        Bath::HybridOhmic(b)
    }
}

impl From<CustomBath> for Bath {
    fn from(b: CustomBath) -> Self {
        Bath::Custom(b)
    }
}

impl From<SymmetricRtn> for Bath {
    fn from(b: SymmetricRtn) -> Self {
        Bath::SymmetricRtn(b)
    }
}

impl From<EnsembleFluctuator> for Bath {
    fn from(b: EnsembleFluctuator) -> Self {
        Bath::Ensemble(b)
    }
}

impl From<CorrelatedBath> for Bath {
    fn from(b: CorrelatedBath) -> Self {
        Bath::Correlated(b)
    }
}

/// Reject non-positive or non-finite physical parameters.
pub(crate) fn require_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::config(format!(
            "{name} must be positive and finite, got {value}"
        )))
    }
}
