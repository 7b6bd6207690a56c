// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! End-to-end evolution driven through the public evaluator API.

mod common;

use std::f64::consts::PI;
use std::sync::Arc;

use approx::assert_relative_eq;
use ndarray::{array, Array1, Array2};
use num_complex::Complex64;

use common::{c, evolve, sigma_x, sigma_z, tf, trace};
use qubit_os_dynamics::bath::{build_spectrum, Bath, CorrelatedBath, OhmicBath, SpectrumFn};
use qubit_os_dynamics::hamiltonian::{AffineOperator, DenseHamiltonian};
use qubit_os_dynamics::lindblad::{lindblad_rhs, DaviesGenerator, LindbladTerm};
use qubit_os_dynamics::units::{EnergyUnit, TimeScale};

fn idle_hamiltonian() -> DenseHamiltonian {
    DenseHamiltonian::new(vec![tf(|_| 0.0)], vec![sigma_z()], EnergyUnit::Planck).unwrap()
}

/// H = −(f/2) σz, ground state |0⟩.
fn two_level(f: f64) -> DenseHamiltonian {
    DenseHamiltonian::new(
        vec![tf(move |_| -0.5 * f)],
        vec![sigma_z()],
        EnergyUnit::Planck,
    )
    .unwrap()
}

#[test]
fn test_rabi_oscillation_on_state_vector() {
    // H = (Ω/2) σx in GHz; P1(t) = sin²(πΩt)
    let omega = 0.05;
    let mut h = DenseHamiltonian::new(
        vec![tf(move |_| 0.5 * omega)],
        vec![sigma_x()],
        EnergyUnit::Planck,
    )
    .unwrap();

    let steps = 2000;
    let t_final = 10.0;
    let dt = t_final / steps as f64;
    let mut psi: Array1<Complex64> = array![c(1.0, 0.0), c(0.0, 0.0)];

    let mut rhs = |u: &Array1<Complex64>, t: f64| {
        let mut du = Array1::zeros(2);
        h.apply(&mut du, u, 1.0, t).unwrap();
        du
    };
    for k in 0..steps {
        let t = k as f64 * dt;
        let k1 = rhs(&psi, t);
        let k2 = rhs(&(&psi + &(&k1 * (0.5 * dt))), t + 0.5 * dt);
        let k3 = rhs(&(&psi + &(&k2 * (0.5 * dt))), t + 0.5 * dt);
        let k4 = rhs(&(&psi + &(&k3 * dt)), t + dt);
        psi = &psi + &((k1 + &k2 * 2.0 + &k3 * 2.0 + k4) * (dt / 6.0));
    }

    let p1 = psi[1].norm_sqr();
    let expected = (PI * omega * t_final).sin().powi(2);
    assert_relative_eq!(p1, expected, epsilon = 1e-8);
    assert_relative_eq!(psi[0].norm_sqr() + p1, 1.0, epsilon = 1e-8);
}

#[test]
fn test_t1_decay() {
    let t1 = 20.0;
    let terms = vec![LindbladTerm::amplitude_damping(t1, "q0").unwrap()];
    let mut h = idle_hamiltonian();
    let rho0 = array![[c(0.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(1.0, 0.0)]];

    let rho = evolve(&rho0, 0.0, 10.0, 500, |rho, t| {
        lindblad_rhs(&mut h, &terms, rho, t).unwrap()
    });

    assert_relative_eq!(rho[[1, 1]].re, (-10.0 / t1).exp(), epsilon = 1e-8);
    assert_relative_eq!(trace(&rho).re, 1.0, epsilon = 1e-12);
}

#[test]
fn test_t2_coherence_decay() {
    let (t1, t2) = (40.0, 25.0);
    let terms = LindbladTerm::from_t1_t2(t1, t2, "q0").unwrap();
    let mut h = idle_hamiltonian();
    let rho0 = Array2::from_elem((2, 2), c(0.5, 0.0));

    let t_final = 15.0;
    let rho = evolve(&rho0, 0.0, t_final, 600, |rho, t| {
        lindblad_rhs(&mut h, &terms, rho, t).unwrap()
    });

    assert_relative_eq!(rho[[0, 1]].norm(), 0.5 * (-t_final / t2).exp(), epsilon = 1e-8);
    assert_relative_eq!(
        rho[[1, 1]].re,
        0.5 * (-t_final / t1).exp(),
        epsilon = 1e-8
    );
}

#[test]
fn test_davies_thermalization() {
    let f = 1.0;
    let beta = 1.0 / 2.23;
    let bath = Bath::from(OhmicBath::new(1e-3, 8.0 * PI, beta).unwrap());
    let davies = DaviesGenerator::new(vec![sigma_x()], build_spectrum(&bath)).unwrap();
    let mut h = two_level(f);

    let rho0 = array![[c(0.0, 0.0), c(0.0, 0.0)], [c(0.0, 0.0), c(1.0, 0.0)]];
    let rho = evolve(&rho0, 0.0, 400.0, 4000, |rho, t| {
        let mut du = Array2::zeros((2, 2));
        h.apply(&mut du, rho, 1.0, t).unwrap();
        davies.apply(&mut du, rho, &mut h, 1.0, t).unwrap();
        du
    });

    let boltzmann = (-beta * 2.0 * PI * f).exp();
    let p_excited = boltzmann / (1.0 + boltzmann);
    assert_relative_eq!(rho[[1, 1]].re, p_excited, epsilon = 1e-4);
    assert_relative_eq!(trace(&rho).re, 1.0, epsilon = 1e-10);
    assert!(rho[[0, 1]].norm() < 1e-10);
}

#[test]
fn test_correlated_bath_preserves_trace() {
    let step = |w: f64| if w >= 0.0 { 1e-2 } else { 1e-2 * (-0.5f64).exp() };
    let bath = Bath::from(
        CorrelatedBath::from_pairs(
            &[(0, 1), (1, 0)],
            vec![Arc::new(step) as SpectrumFn, Arc::new(step) as SpectrumFn],
        )
        .unwrap(),
    );
    let davies = DaviesGenerator::new(vec![sigma_x(), sigma_z()], build_spectrum(&bath)).unwrap();
    let mut h = DenseHamiltonian::new(
        vec![tf(|s| 1.0 - s), tf(|s| s)],
        vec![sigma_x() * -0.5, sigma_z() * -0.5],
        EnergyUnit::Planck,
    )
    .unwrap();

    let rho0 = array![[c(0.7, 0.0), c(0.2, 0.1)], [c(0.2, -0.1), c(0.3, 0.0)]];
    let total = 50.0;
    let scale = TimeScale::fraction(total).unwrap();
    let rho = evolve(&rho0, 0.0, total, 1000, |rho, t| {
        let s = scale.map(t);
        let mut du = Array2::zeros((2, 2));
        h.apply(&mut du, rho, 1.0, s).unwrap();
        davies.apply(&mut du, rho, &mut h, 1.0, s).unwrap();
        du
    });

    assert_relative_eq!(trace(&rho).re, 1.0, epsilon = 1e-10);
    assert!(trace(&rho).im.abs() < 1e-10);
    assert_relative_eq!(rho[[0, 1]].re, rho[[1, 0]].re, epsilon = 1e-10);
    assert_relative_eq!(rho[[0, 1]].im, -rho[[1, 0]].im, epsilon = 1e-10);
}

#[test]
fn test_parallel_copies_are_independent() {
    let operator = Arc::new(
        AffineOperator::new(
            vec![tf(|s| 1.0 - s), tf(|s| s * s)],
            vec![sigma_x(), sigma_z()],
            EnergyUnit::Planck,
        )
        .unwrap(),
    );
    let base = DenseHamiltonian::from_operator(Arc::clone(&operator)).unwrap();
    let scale = TimeScale::fraction(10.0).unwrap();

    std::thread::scope(|scope| {
        for k in 0..4 {
            let mut local = base.p_copy();
            let operator = Arc::clone(&operator);
            scope.spawn(move || {
                for step in 0..200 {
                    let t = (k * 200 + step) as f64 * 0.0125;
                    let got = local.evaluate_scaled(scale, t).clone();
                    assert_eq!(got, operator.evaluate(t / 10.0));
                }
            });
        }
    });
}
