// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Dense Hamiltonian with a reusable evaluation buffer.
//!
//! `DenseHamiltonian` is called by an external integrator at every step:
//!
//!   state vector:    du += −i c H(s) u
//!   density matrix:  du += −i c [H(s), u]
//!
//! The buffer `u_cache` is overwritten on each evaluation and never read
//! before being written. Evaluation takes `&mut self`, so concurrent
//! trajectories each need their own instance from [`DenseHamiltonian::p_copy`].

use std::sync::Arc;

use nalgebra::{DMatrix, SymmetricEigen};
use ndarray::linalg::{general_mat_mul, general_mat_vec_mul};
use ndarray::{Array1, Array2};
use num_complex::Complex64;
use tracing::{debug, warn};

use super::affine::{AffineOperator, TimeFn};
use crate::config::EigenConfig;
use crate::error::{Error, NumericalError, Result};
use crate::units::{EnergyUnit, TimeScale};

/// State types the Hamiltonian can act on.
pub trait QuantumState {
    /// Accumulate `−i c H u` (vectors) or `−i c [H, u]` (matrices) into `du`.
    fn accumulate_action(
        h: &Array2<Complex64>,
        du: &mut Self,
        u: &Self,
        coefficient: f64,
    ) -> Result<()>;
}

impl QuantumState for Array1<Complex64> {
    fn accumulate_action(
        h: &Array2<Complex64>,
        du: &mut Self,
        u: &Self,
        coefficient: f64,
    ) -> Result<()> {
        let n = h.nrows();
        if u.len() != n || du.len() != n {
            return Err(Error::config(format!(
                "state vector lengths ({}, {}) do not match Hamiltonian dimension {n}",
                u.len(),
                du.len()
            )));
        }
        let minus_ic = Complex64::new(0.0, -coefficient);
        general_mat_vec_mul(minus_ic, h, u, Complex64::new(1.0, 0.0), du);
        Ok(())
    }
}

impl QuantumState for Array2<Complex64> {
    fn accumulate_action(
        h: &Array2<Complex64>,
        du: &mut Self,
        u: &Self,
        coefficient: f64,
    ) -> Result<()> {
        let n = h.nrows();
        if u.dim() != (n, n) || du.dim() != (n, n) {
            return Err(Error::config(format!(
                "density matrix shapes ({:?}, {:?}) do not match Hamiltonian dimension {n}",
                u.dim(),
                du.dim()
            )));
        }
        let one = Complex64::new(1.0, 0.0);
        general_mat_mul(Complex64::new(0.0, -coefficient), h, u, one, du);
        general_mat_mul(Complex64::new(0.0, coefficient), u, h, one, du);
        Ok(())
    }
}

/// Lowest eigenpairs of `H(s)`.
#[derive(Debug, Clone, PartialEq)]
pub struct EigenDecomposition {
    /// Eigenvalues in ascending order, in the Hamiltonian's [`EnergyUnit`].
    pub values: Array1<f64>,
    /// Eigenvectors as columns, `dim × level`.
    pub vectors: Array2<Complex64>,
}

/// Dense time-dependent Hamiltonian.
#[derive(Debug)]
pub struct DenseHamiltonian {
    operator: Arc<AffineOperator>,
    u_cache: Array2<Complex64>,
}

impl DenseHamiltonian {
    /// Build from coefficient functions and square matrices in `unit`.
    pub fn new(
        coefficients: Vec<TimeFn>,
        matrices: Vec<Array2<Complex64>>,
        unit: EnergyUnit,
    ) -> Result<Self> {
        Self::from_operator(Arc::new(AffineOperator::new(coefficients, matrices, unit)?))
    }

    /// Wrap a shared operator; the buffer is private to the new instance.
    pub fn from_operator(operator: Arc<AffineOperator>) -> Result<Self> {
        let (rows, cols) = operator.shape();
        if rows != cols {
            return Err(Error::config(format!(
                "Hamiltonian matrices must be square, got {rows}x{cols}"
            )));
        }
        debug!(dim = rows, terms = operator.len(), "dense Hamiltonian");
        Ok(Self {
            operator,
            u_cache: Array2::zeros((rows, cols)),
        })
    }

    pub fn dim(&self) -> usize {
        self.u_cache.nrows()
    }

    pub fn unit(&self) -> EnergyUnit {
        self.operator.unit()
    }

    pub fn operator(&self) -> &Arc<AffineOperator> {
        &self.operator
    }

    /// `H(s)` in angular units. The reference is valid until the next call.
    pub fn evaluate(&mut self, s: f64) -> &Array2<Complex64> {
        self.operator.fill(s, &mut self.u_cache);
        &self.u_cache
    }

    /// `H` at physical time `t` under the given calling convention.
    pub fn evaluate_scaled(&mut self, scale: TimeScale, t: f64) -> &Array2<Complex64> {
        self.evaluate(scale.map(t))
    }

    /// Accumulate the Hamiltonian action at `s` into `du`.
    pub fn apply<S: QuantumState>(
        &mut self,
        du: &mut S,
        u: &S,
        coefficient: f64,
        s: f64,
    ) -> Result<()> {
        self.operator.fill(s, &mut self.u_cache);
        S::accumulate_action(&self.u_cache, du, u, coefficient)
    }

    /// Lowest `level` eigenpairs with default solver settings.
    pub fn eigen_decomp(&mut self, s: f64, level: usize) -> Result<EigenDecomposition> {
        self.eigen_decomp_with(s, level, &EigenConfig::default())
    }

    /// Lowest `level` eigenpairs of `H(s)`.
    pub fn eigen_decomp_with(
        &mut self,
        s: f64,
        level: usize,
        config: &EigenConfig,
    ) -> Result<EigenDecomposition> {
        config.validate()?;
        let n = self.dim();
        if level == 0 || level > n {
            return Err(Error::config(format!(
                "eigen level must be in 1..={n}, got {level}"
            )));
        }

        let factor = self.unit().factor();
        let h = self.evaluate(s);
        if h.iter().any(|z| !z.re.is_finite() || !z.im.is_finite()) {
            return Err(NumericalError::NonFiniteMatrix.into());
        }
        let scale = h.iter().map(|z| z.norm()).fold(1.0, f64::max);
        let deviation = hermitian_deviation(h);
        let tolerance = config.hermitian_tolerance * scale;
        if deviation > tolerance {
            return Err(NumericalError::NotHermitian {
                deviation,
                tolerance,
            }
            .into());
        }

        let m = DMatrix::from_fn(n, n, |i, j| h[[i, j]]);
        let eig = SymmetricEigen::try_new(m, config.tolerance, config.max_iterations)
            .ok_or_else(|| {
                warn!(
                    s,
                    tolerance = config.tolerance,
                    max_iterations = config.max_iterations,
                    "eigensolver did not converge"
                );
                NumericalError::EigenNotConverged {
                    tolerance: config.tolerance,
                    max_iterations: config.max_iterations,
                }
            })?;

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&a, &b| eig.eigenvalues[a].total_cmp(&eig.eigenvalues[b]));
        let order = &order[..level];

        let values = order.iter().map(|&k| eig.eigenvalues[k] / factor).collect();
        let vectors = Array2::from_shape_fn((n, level), |(i, k)| eig.eigenvectors[(i, order[k])]);
        Ok(EigenDecomposition { values, vectors })
    }

    /// Independent copy sharing the operator but owning a fresh buffer.
    pub fn p_copy(&self) -> Self {
        Self {
            operator: Arc::clone(&self.operator),
            u_cache: Array2::zeros(self.u_cache.raw_dim()),
        }
    }
}

impl Clone for DenseHamiltonian {
    fn clone(&self) -> Self {
        self.p_copy()
    }
}

fn hermitian_deviation(h: &Array2<Complex64>) -> f64 {
    let n = h.nrows();
    let mut worst = 0.0_f64;
    for i in 0..n {
        for j in i..n {
            worst = worst.max((h[[i, j]] - h[[j, i]].conj()).norm());
        }
    }
    worst
}
