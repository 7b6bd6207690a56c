// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use ndarray::{array, Array2};
use num_complex::Complex64;
use qubit_os_dynamics::hamiltonian::TimeFn;

pub fn c(re: f64, im: f64) -> Complex64 {
    Complex64::new(re, im)
}

pub fn tf(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> TimeFn {
    Arc::new(f)
}

pub fn sigma_x() -> Array2<Complex64> {
    array![[c(0.0, 0.0), c(1.0, 0.0)], [c(1.0, 0.0), c(0.0, 0.0)]]
}

pub fn sigma_y() -> Array2<Complex64> {
    array![[c(0.0, 0.0), c(0.0, -1.0)], [c(0.0, 1.0), c(0.0, 0.0)]]
}

pub fn sigma_z() -> Array2<Complex64> {
    array![[c(1.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(-1.0, 0.0)]]
}

/// σ⁻ = |0⟩⟨1|
pub fn sigma_minus() -> Array2<Complex64> {
    array![[c(0.0, 0.0), c(1.0, 0.0)], [c(0.0, 0.0), c(0.0, 0.0)]]
}

pub fn dagger(m: &Array2<Complex64>) -> Array2<Complex64> {
    m.t().mapv(|z| z.conj())
}

pub fn trace(m: &Array2<Complex64>) -> Complex64 {
    m.diag().sum()
}

pub fn max_abs_diff(a: &Array2<Complex64>, b: &Array2<Complex64>) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).norm())
        .fold(0.0, f64::max)
}

/// Single classical RK4 step for dρ/dt = f(ρ, t).
pub fn rk4_step<F>(rho: &Array2<Complex64>, t: f64, dt: f64, rhs: &mut F) -> Array2<Complex64>
where
    F: FnMut(&Array2<Complex64>, f64) -> Array2<Complex64>,
{
    let k1 = rhs(rho, t);
    let rho2 = rho + &(&k1 * (0.5 * dt));
    let k2 = rhs(&rho2, t + 0.5 * dt);
    let rho3 = rho + &(&k2 * (0.5 * dt));
    let k3 = rhs(&rho3, t + 0.5 * dt);
    let rho4 = rho + &(&k3 * dt);
    let k4 = rhs(&rho4, t + dt);

    rho + &((k1 + &k2 * 2.0 + &k3 * 2.0 + k4) * (dt / 6.0))
}

/// Integrate from `t0` to `t1` in `steps` equal RK4 steps.
pub fn evolve<F>(
    rho0: &Array2<Complex64>,
    t0: f64,
    t1: f64,
    steps: usize,
    mut rhs: F,
) -> Array2<Complex64>
where
    F: FnMut(&Array2<Complex64>, f64) -> Array2<Complex64>,
{
    let dt = (t1 - t0) / steps as f64;
    let mut rho = rho0.clone();
    for k in 0..steps {
        rho = rk4_step(&rho, t0 + k as f64 * dt, dt, &mut rhs);
    }
    rho
}
