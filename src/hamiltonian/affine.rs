// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Affine time-dependent operators `H(s) = Σ_k f_k(s) · M_k`.

use std::fmt;
use std::sync::Arc;

use ndarray::{Array2, Zip};
use num_complex::Complex64;
use tracing::debug;

use crate::error::{Error, Result};
use crate::units::EnergyUnit;

/// Scalar time-dependent coefficient `f_k(s)`.
pub type TimeFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// Ordered list of (coefficient, constant matrix) terms.
///
/// Matrices are deep-copied and multiplied by [`EnergyUnit::factor`] at
/// construction, so every evaluation already works in angular units.
#[derive(Clone)]
pub struct AffineOperator {
    coefficients: Vec<TimeFn>,
    matrices: Vec<Array2<Complex64>>,
    unit: EnergyUnit,
    shape: (usize, usize),
}

impl AffineOperator {
    pub fn new(
        coefficients: Vec<TimeFn>,
        matrices: Vec<Array2<Complex64>>,
        unit: EnergyUnit,
    ) -> Result<Self> {
        if matrices.is_empty() {
            return Err(Error::config("affine operator needs at least one term"));
        }
        if coefficients.len() != matrices.len() {
            return Err(Error::config(format!(
                "{} coefficients but {} matrices",
                coefficients.len(),
                matrices.len()
            )));
        }
        let shape = matrices[0].dim();
        if let Some((k, m)) = matrices.iter().enumerate().find(|(_, m)| m.dim() != shape) {
            return Err(Error::config(format!(
                "matrix {k} has shape {:?}, expected {:?}",
                m.dim(),
                shape
            )));
        }

        let factor = unit.factor();
        let matrices = matrices.into_iter().map(|m| m * factor).collect();
        debug!(terms = coefficients.len(), ?shape, ?unit, "affine operator");
        Ok(Self {
            coefficients,
            matrices,
            unit,
            shape,
        })
    }

    /// Single time-independent term.
    pub fn constant(matrix: Array2<Complex64>, unit: EnergyUnit) -> Result<Self> {
        let one: TimeFn = Arc::new(|_: f64| 1.0);
        Self::new(vec![one], vec![matrix], unit)
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn len(&self) -> usize {
        self.matrices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matrices.is_empty()
    }

    pub fn unit(&self) -> EnergyUnit {
        self.unit
    }

    /// Stored (already unit-scaled) matrices.
    pub fn matrices(&self) -> &[Array2<Complex64>] {
        &self.matrices
    }

    /// Write `Σ f_k(s)·M_k` into `out`. The previous contents of `out` are
    /// never read.
    pub fn evaluate_into(&self, s: f64, out: &mut Array2<Complex64>) -> Result<()> {
        if out.dim() != self.shape {
            return Err(Error::config(format!(
                "output buffer has shape {:?}, expected {:?}",
                out.dim(),
                self.shape
            )));
        }
        self.fill(s, out);
        Ok(())
    }

    /// Evaluate into a freshly allocated matrix.
    pub fn evaluate(&self, s: f64) -> Array2<Complex64> {
        let mut out = Array2::zeros(self.shape);
        self.fill(s, &mut out);
        out
    }

    /// `out` must already have `self.shape`.
    pub(crate) fn fill(&self, s: f64, out: &mut Array2<Complex64>) {
        let mut terms = self.coefficients.iter().zip(&self.matrices);
        if let Some((f, m)) = terms.next() {
            let c = f(s);
            Zip::from(&mut *out).and(m).for_each(|o, &x| *o = x * c);
        }
        for (f, m) in terms {
            out.scaled_add(Complex64::new(f(s), 0.0), m);
        }
    }
}

impl fmt::Debug for AffineOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AffineOperator")
            .field("terms", &self.matrices.len())
            .field("shape", &self.shape)
            .field("unit", &self.unit)
            .finish()
    }
}
