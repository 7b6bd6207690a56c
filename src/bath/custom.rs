// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! User-supplied bath.

use std::fmt;
use std::sync::Arc;

use num_complex::Complex64;

use super::{BathModel, CorrelationKernel, SpectrumFn};

/// Bath defined by caller closures for `C(τ)` and `γ(ω)`.
///
/// No relation between the two is checked; keeping them a Fourier pair is
/// the caller's responsibility.
#[derive(Clone)]
pub struct CustomBath {
    correlation: CorrelationKernel,
    spectrum: SpectrumFn,
}

impl CustomBath {
    pub fn new<C, S>(correlation: C, spectrum: S) -> Self
    where
        C: Fn(f64) -> Complex64 + Send + Sync + 'static,
        S: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Self {
            correlation: Arc::new(correlation),
            spectrum: Arc::new(spectrum),
        }
    }

    /// Build from already shared closures.
    pub fn from_shared(correlation: CorrelationKernel, spectrum: SpectrumFn) -> Self {
        Self {
            correlation,
            spectrum,
        }
    }
}

impl fmt::Debug for CustomBath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomBath").finish_non_exhaustive()
    }
}

impl BathModel for CustomBath {
    fn correlation(&self, tau: f64) -> Complex64 {
        (self.correlation)(tau)
    }

    fn spectrum(&self, omega: f64) -> f64 {
        (self.spectrum)(omega)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::QuadratureConfig;
    use approx::assert_relative_eq;

    fn lorentzian() -> CustomBath {
        CustomBath::new(
            |t: f64| Complex64::new((-t.abs()).exp(), 0.0),
            |w: f64| 2.0 / (1.0 + w * w),
        )
    }

    #[test]
    fn test_pass_through() {
        let b = lorentzian();
        assert_relative_eq!(b.correlation(1.0).re, (-1.0f64).exp());
        assert_eq!(b.spectrum(0.0), 2.0);
        assert_eq!(b.correlation_at(3.5, 2.5), b.correlation(1.0));
    }

    #[test]
    fn test_lamb_shift_of_lorentzian() {
        // P.V. (1/2π) ∫ 2/(1+x²)/(ω−x) dx = ω/(1+ω²)
        let b = lorentzian();
        let cfg = QuadratureConfig::default();
        for &w in &[-2.0, 0.0, 0.5, 3.0] {
            let s = b.lamb_shift(w, &cfg).unwrap();
            assert_relative_eq!(s, w / (1.0 + w * w), epsilon = 1e-8);
        }
    }

    #[test]
    fn test_lamb_shift_reports_unresolvable_pole() {
        let b = CustomBath::new(|_| Complex64::new(0.0, 0.0), |w: f64| 1.0 / w);
        let err = b.lamb_shift(0.0, &QuadratureConfig::default()).unwrap_err();
        assert!(err.is_numerical());
    }

    #[test]
    fn test_debug_is_opaque() {
        assert_eq!(format!("{:?}", lorentzian()), "CustomBath { .. }");
    }
}
