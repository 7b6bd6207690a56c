// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Numerical building blocks: adaptive quadrature and special functions.

pub mod quadrature;
pub mod special;

pub use quadrature::{hilbert_transform, integrate, principal_value, Quadrature};
pub use special::trigamma;
