// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Time-dependent Hamiltonians.
//!
//! An [`AffineOperator`] stores `H(s) = Σ_k f_k(s) · M_k` with the matrices
//! converted to angular units once at construction. [`DenseHamiltonian`]
//! wraps it with a private evaluation buffer and exposes the integrator-facing
//! action (`apply`) and adiabatic-frame eigendecomposition.

pub mod affine;
pub mod dense;

pub use affine::{AffineOperator, TimeFn};
pub use dense::{DenseHamiltonian, EigenDecomposition, QuantumState};
