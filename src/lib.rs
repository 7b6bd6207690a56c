// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! QubitOS Open-System Dynamics Core
//!
//! Bath spectral/correlation models and time-dependent Hamiltonian
//! evaluation for quantum master equations. An external ODE driver calls
//! into this crate at every integration step.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │          external ODE driver                 │
//! ├───────────────────────┬──────────────────────┤
//! │  DenseHamiltonian     │  LindbladTerm /      │
//! │  (apply, eigen)       │  DaviesGenerator     │
//! ├───────────────────────┼──────────────────────┤
//! │  AffineOperator       │  Bath registry       │
//! │  Σ f_k(s) M_k         │  C_ij, γ_ij, S_ij    │
//! ├───────────────────────┴──────────────────────┤
//! │  Bath models · timescales · quadrature       │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`bath`]: Bath models, registry and timescale estimators
//! - [`hamiltonian`]: Affine operators and the dense Hamiltonian evaluator
//! - [`lindblad`]: Lindblad and Davies dissipators
//! - [`numeric`]: Adaptive quadrature and special functions
//! - [`units`]: Unit conventions and temperature conversions
//! - [`config`]: Configuration management
//! - [`logging`]: Tracing subscriber setup
//! - [`error`]: Error types

pub mod bath;
pub mod config;
pub mod error;
pub mod hamiltonian;
pub mod lindblad;
pub mod logging;
pub mod numeric;
pub mod units;

pub use bath::{Bath, BathModel};
pub use config::Config;
pub use error::{Error, NumericalError, Result};
pub use hamiltonian::{AffineOperator, DenseHamiltonian};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
