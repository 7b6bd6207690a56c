// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Dissipative terms of the quantum master equation.
//!
//! Implements the Gorini–Kossakowski–Sudarshan–Lindblad (GKSL) form:
//!
//!   dρ/dt = -i[H(s), ρ] + Σ_k γ_k(s) (L_k ρ L_k† − ½{L_k†L_k, ρ})
//!
//! This module provides:
//! - Phenomenological collapse channels, including T1 and T2 for qubits
//! - The Davies generator, whose rates come from a bath spectrum matrix
//!   evaluated at the instantaneous Bohr frequencies of H(s)
//!
//! Both accumulate into a caller-owned derivative buffer so they can sit
//! alongside [`crate::hamiltonian::DenseHamiltonian::apply`] inside an
//! integrator callback.
//!
//! # References
//!
//! - Lindblad, G. (1976). Commun. Math. Phys. 48, 119.
//!   DOI: 10.1007/BF01608499
//! - Gorini, V., Kossakowski, A., & Sudarshan, E. C. G. (1976). J. Math. Phys. 17, 821.
//!   DOI: 10.1063/1.522979
//! - Breuer, H.-P. & Petruccione, F. (2002). "The Theory of Open Quantum Systems." Oxford.

pub mod davies;
pub mod dissipator;

pub use davies::DaviesGenerator;
pub use dissipator::{dissipator, lindblad_rhs, LindbladTerm, RateFn};
