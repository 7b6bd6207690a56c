// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Operator-indexed closure matrices built from any [`Bath`].
//!
//! Single-operator baths produce a 1×1 matrix, correlated baths an n×n one,
//! so dissipator code indexes `(i, j)` uniformly and never inspects the bath
//! variant. Absent entries evaluate to zero.

use std::fmt;
use std::sync::Arc;

use num_complex::Complex64;
use tracing::debug;

use super::{Bath, SpectrumFn};
use crate::config::QuadratureConfig;
use crate::error::{Error, Result};
use crate::numeric::hilbert_transform;

/// Two-time correlation `C(t1, t2)`.
pub type CorrelationFn = Arc<dyn Fn(f64, f64) -> Complex64 + Send + Sync>;

/// Lamb-shift kernel `S(ω)`; may fail when the principal value diverges.
pub type LambShiftFn = Arc<dyn Fn(f64) -> Result<f64> + Send + Sync>;

pub type CorrelationMatrix = OperatorMatrix<CorrelationFn>;
pub type SpectrumMatrix = OperatorMatrix<SpectrumFn>;
pub type LambShiftMatrix = OperatorMatrix<LambShiftFn>;

/// Dense `dim × dim` table of optional entries.
#[derive(Clone)]
pub struct OperatorMatrix<T> {
    dim: usize,
    entries: Vec<Option<T>>,
}

impl<T> OperatorMatrix<T> {
    /// All-zero matrix.
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            entries: std::iter::repeat_with(|| None).take(dim * dim).collect(),
        }
    }

    /// 1×1 matrix holding `entry`.
    pub fn single(entry: T) -> Self {
        Self {
            dim: 1,
            entries: vec![Some(entry)],
        }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Entry `(i, j)`, or `None` for the zero function.
    ///
    /// # Panics
    ///
    /// Panics if `i` or `j` is not below [`dim`](Self::dim).
    pub fn get(&self, i: usize, j: usize) -> Option<&T> {
        assert!(
            i < self.dim && j < self.dim,
            "operator index ({i}, {j}) out of range for dimension {}",
            self.dim
        );
        self.entries[i * self.dim + j].as_ref()
    }

    /// Entry `(i, j)`, or a configuration error when out of range.
    pub fn try_get(&self, i: usize, j: usize) -> Result<Option<&T>> {
        if i < self.dim && j < self.dim {
            Ok(self.entries[i * self.dim + j].as_ref())
        } else {
            Err(Error::config(format!(
                "operator index ({i}, {j}) out of range for dimension {}",
                self.dim
            )))
        }
    }

    pub fn is_zero(&self, i: usize, j: usize) -> bool {
        self.get(i, j).is_none()
    }

    /// Non-zero entries in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), &T)> {
        let dim = self.dim;
        self.entries
            .iter()
            .enumerate()
            .filter_map(move |(k, e)| e.as_ref().map(|e| ((k / dim, k % dim), e)))
    }

    pub(crate) fn set(&mut self, i: usize, j: usize, entry: T) {
        let dim = self.dim;
        self.entries[i * dim + j] = Some(entry);
    }
}

impl<T> fmt::Debug for OperatorMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorMatrix")
            .field("dim", &self.dim)
            .field("nonzero", &self.iter().map(|(k, _)| k).collect::<Vec<_>>())
            .finish()
    }
}

impl CorrelationMatrix {
    pub fn eval(&self, i: usize, j: usize, t1: f64, t2: f64) -> Complex64 {
        self.get(i, j).map_or(Complex64::new(0.0, 0.0), |c| c(t1, t2))
    }

    pub fn try_eval(&self, i: usize, j: usize, t1: f64, t2: f64) -> Result<Complex64> {
        Ok(self
            .try_get(i, j)?
            .map_or(Complex64::new(0.0, 0.0), |c| c(t1, t2)))
    }
}

impl SpectrumMatrix {
    pub fn eval(&self, i: usize, j: usize, omega: f64) -> f64 {
        self.get(i, j).map_or(0.0, |s| s(omega))
    }

    pub fn try_eval(&self, i: usize, j: usize, omega: f64) -> Result<f64> {
        Ok(self.try_get(i, j)?.map_or(0.0, |s| s(omega)))
    }
}

impl LambShiftMatrix {
    pub fn eval(&self, i: usize, j: usize, omega: f64) -> Result<f64> {
        self.get(i, j).map_or(Ok(0.0), |s| s(omega))
    }

    pub fn try_eval(&self, i: usize, j: usize, omega: f64) -> Result<f64> {
        self.try_get(i, j)?.map_or(Ok(0.0), |s| s(omega))
    }
}

/// Correlation matrix `C_ij(t1, t2)` for any bath.
pub fn build_correlation(bath: &Bath) -> CorrelationMatrix {
    let matrix = match (bath, bath.shared_model()) {
        (_, Some(model)) => OperatorMatrix::single(
            Arc::new(move |t1: f64, t2: f64| model.correlation_at(t1, t2)) as CorrelationFn,
        ),
        (Bath::Correlated(b), None) => {
            let mut m = OperatorMatrix::new(b.num_operators());
            for ((i, j), c) in b.correlations() {
                let c = Arc::clone(c);
                m.set(i, j, Arc::new(move |t1: f64, t2: f64| c(t1 - t2)) as CorrelationFn);
            }
            m
        }
        (_, None) => OperatorMatrix::new(bath.num_operators()),
    };
    debug!(kind = bath.kind(), dim = matrix.dim(), "built correlation matrix");
    matrix
}

/// Spectrum matrix `γ_ij(ω)` for any bath.
pub fn build_spectrum(bath: &Bath) -> SpectrumMatrix {
    let matrix = match (bath, bath.shared_model()) {
        (_, Some(model)) => {
            OperatorMatrix::single(Arc::new(move |w: f64| model.spectrum(w)) as SpectrumFn)
        }
        (Bath::Correlated(b), None) => {
            let mut m = OperatorMatrix::new(b.num_operators());
            for ((i, j), s) in b.spectra() {
                m.set(i, j, Arc::clone(s));
            }
            m
        }
        (_, None) => OperatorMatrix::new(bath.num_operators()),
    };
    debug!(kind = bath.kind(), dim = matrix.dim(), "built spectrum matrix");
    matrix
}

/// Lamb-shift matrix `S_ij(ω)`, the Hilbert transform of each spectrum entry
/// evaluated with `config`.
pub fn build_lamb_shift(bath: &Bath, config: &QuadratureConfig) -> LambShiftMatrix {
    let spectra = build_spectrum(bath);
    let mut matrix = OperatorMatrix::new(spectra.dim());
    for ((i, j), s) in spectra.iter() {
        let s = Arc::clone(s);
        let config = *config;
        matrix.set(
            i,
            j,
            Arc::new(move |w: f64| hilbert_transform(|x| s(x), w, &config)) as LambShiftFn,
        );
    }
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bath::{BathModel, CorrelatedBath, CustomBath, OhmicBath, SymmetricRtn};
    use approx::assert_relative_eq;

    #[test]
    fn test_single_bath_is_one_by_one() {
        let rtn = SymmetricRtn::new(2.0, 2.0).unwrap();
        let bath = Bath::from(rtn);
        let c = build_correlation(&bath);
        let s = build_spectrum(&bath);
        assert_eq!(c.dim(), 1);
        assert_eq!(s.dim(), 1);
        assert_eq!(c.eval(0, 0, 4.0, 1.0), rtn.correlation(3.0));
        assert_eq!(s.eval(0, 0, 2.0), rtn.spectrum(2.0));
    }

    #[test]
    fn test_correlated_bath_matrix() {
        let bath = Bath::from(
            CorrelatedBath::new(2)
                .unwrap()
                .with_spectrum(0, 1, |w: f64| 1.0 + w)
                .unwrap()
                .with_correlation(0, 1, |t: f64| Complex64::new(t, 0.0))
                .unwrap(),
        );
        let s = build_spectrum(&bath);
        assert_eq!(s.dim(), 2);
        assert!(s.is_zero(0, 0));
        assert!(s.is_zero(1, 0));
        assert_eq!(s.eval(0, 1, 2.0), 3.0);
        assert_eq!(s.eval(1, 1, 2.0), 0.0);

        let c = build_correlation(&bath);
        assert_eq!(c.eval(0, 1, 5.0, 2.0), Complex64::new(3.0, 0.0));
        assert_eq!(c.eval(1, 0, 5.0, 2.0), Complex64::new(0.0, 0.0));
        assert_eq!(c.iter().count(), 1);
    }

    #[test]
    fn test_lamb_shift_matrix() {
        let bath = Bath::from(CustomBath::new(
            |t: f64| Complex64::new((-t.abs()).exp(), 0.0),
            |w: f64| 2.0 / (1.0 + w * w),
        ));
        let cfg = QuadratureConfig::default();
        let ls = build_lamb_shift(&bath, &cfg);
        assert_relative_eq!(ls.eval(0, 0, 1.0).unwrap(), 0.5, epsilon = 1e-8);
    }

    #[test]
    fn test_matrix_outlives_bath() {
        let s = {
            let bath = Bath::from(OhmicBath::new(1e-4, 1.0, 1.0).unwrap());
            build_spectrum(&bath)
        };
        assert!(s.eval(0, 0, 0.5) > 0.0);
    }

    #[test]
    fn test_try_eval_reports_bad_index() {
        let bath = Bath::from(
            CorrelatedBath::new(2)
                .unwrap()
                .with_spectrum(0, 1, |w: f64| 1.0 + w)
                .unwrap(),
        );
        let s = build_spectrum(&bath);
        assert_eq!(s.try_eval(0, 1, 2.0).unwrap(), 3.0);
        assert_eq!(s.try_eval(1, 1, 2.0).unwrap(), 0.0);
        assert!(matches!(s.try_eval(2, 0, 0.0), Err(Error::Configuration(_))));
        assert!(s.try_get(0, 5).is_err());

        let c = build_correlation(&bath);
        assert!(c.try_eval(3, 3, 0.0, 0.0).is_err());
        let ls = build_lamb_shift(&bath, &QuadratureConfig::default());
        assert!(matches!(ls.try_eval(0, 2, 0.0), Err(Error::Configuration(_))));
        assert_eq!(ls.try_eval(1, 0, 0.0).unwrap(), 0.0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_index_panics() {
        let s = build_spectrum(&Bath::from(SymmetricRtn::new(1.0, 1.0).unwrap()));
        s.eval(1, 0, 0.0);
    }
}
