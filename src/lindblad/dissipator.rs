// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Lindblad dissipator terms.
//!
//! Each term contributes D[L](ρ) = γ(s) (L ρ L† − ½ L†L ρ − ½ ρ L†L) to the
//! master equation
//!
//!   dρ/dt = −i[H(s), ρ] + Σ_k D[L_k](ρ)
//!
//! Common operators for superconducting qubits (times in ns):
//!   - Amplitude damping (T1): L = σ⁻,     γ = 1/T1
//!   - Pure dephasing (T_φ):   L = σz/√2,  γ = 1/T2 − 1/(2T1)
//!
//! With this normalisation coherences decay exactly as e^{−t/T2}.
//!
//! Ref: Breuer & Petruccione, "The Theory of Open Quantum Systems" (2002), Ch. 3.

use std::fmt;
use std::sync::Arc;

use ndarray::linalg::general_mat_mul;
use ndarray::Array2;
use num_complex::Complex64;
use tracing::debug;

use crate::error::{Error, Result};
use crate::hamiltonian::DenseHamiltonian;

/// Time-dependent decay rate γ(s) in 1/ns.
pub type RateFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// A single collapse channel with its (possibly time-dependent) rate.
#[derive(Clone)]
pub struct LindbladTerm {
    rate: RateFn,
    operator: Array2<Complex64>,
    operator_dag: Array2<Complex64>,
    l_dag_l: Array2<Complex64>,
    label: String,
}

impl LindbladTerm {
    pub fn new(rate: RateFn, operator: Array2<Complex64>, label: impl Into<String>) -> Result<Self> {
        let label = label.into();
        if operator.nrows() != operator.ncols() {
            return Err(Error::config(format!(
                "collapse operator '{label}' must be square, got {} × {}",
                operator.nrows(),
                operator.ncols()
            )));
        }
        let operator_dag = conjugate_transpose(&operator);
        let l_dag_l = operator_dag.dot(&operator);
        Ok(Self {
            rate,
            operator,
            operator_dag,
            l_dag_l,
            label,
        })
    }

    /// Channel with a constant rate.
    pub fn constant(rate: f64, operator: Array2<Complex64>, label: impl Into<String>) -> Result<Self> {
        if !rate.is_finite() || rate < 0.0 {
            return Err(Error::config(format!(
                "collapse rate must be non-negative and finite, got {rate}"
            )));
        }
        Self::new(Arc::new(move |_: f64| rate), operator, label)
    }

    /// T1 channel, L = σ⁻ = |0⟩⟨1| with γ = 1/T1.
    pub fn amplitude_damping(t1_ns: f64, qubit_label: &str) -> Result<Self> {
        if !t1_ns.is_finite() || t1_ns <= 0.0 {
            return Err(Error::config(format!("T1 must be positive, got {t1_ns} ns")));
        }
        let mut sigma_minus = Array2::zeros((2, 2));
        sigma_minus[[0, 1]] = Complex64::new(1.0, 0.0);
        Self::constant(1.0 / t1_ns, sigma_minus, format!("T1_{qubit_label}"))
    }

    /// Pure dephasing channel, L = σz/√2 with γ = 1/T2 − 1/(2T1).
    pub fn pure_dephasing(t1_ns: f64, t2_ns: f64, qubit_label: &str) -> Result<Self> {
        if !t1_ns.is_finite() || t1_ns <= 0.0 {
            return Err(Error::config(format!("T1 must be positive, got {t1_ns} ns")));
        }
        if !t2_ns.is_finite() || t2_ns <= 0.0 {
            return Err(Error::config(format!("T2 must be positive, got {t2_ns} ns")));
        }
        if t2_ns > 2.0 * t1_ns {
            return Err(Error::config(format!(
                "T2 ({t2_ns} ns) must be ≤ 2*T1 ({} ns)",
                2.0 * t1_ns
            )));
        }
        // clamp rounding at T2 = 2*T1
        let gamma_phi = (1.0 / t2_ns - 1.0 / (2.0 * t1_ns)).max(0.0);

        let amp = std::f64::consts::FRAC_1_SQRT_2;
        let mut sigma_z = Array2::zeros((2, 2));
        sigma_z[[0, 0]] = Complex64::new(amp, 0.0);
        sigma_z[[1, 1]] = Complex64::new(-amp, 0.0);
        Self::constant(gamma_phi, sigma_z, format!("Tphi_{qubit_label}"))
    }

    /// Both T1 and T_φ channels for one qubit.
    pub fn from_t1_t2(t1_ns: f64, t2_ns: f64, qubit_label: &str) -> Result<Vec<Self>> {
        let t1 = Self::amplitude_damping(t1_ns, qubit_label)?;
        let tphi = Self::pure_dephasing(t1_ns, t2_ns, qubit_label)?;
        debug!(t1_ns, t2_ns, qubit = qubit_label, "T1/T2 collapse channels");
        Ok(vec![t1, tphi])
    }

    pub fn rate_at(&self, s: f64) -> f64 {
        (self.rate)(s)
    }

    pub fn operator(&self) -> &Array2<Complex64> {
        &self.operator
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn dim(&self) -> usize {
        self.operator.nrows()
    }

    /// Accumulate `coefficient · D[L](ρ)` at time `s` into `du`.
    pub fn apply(
        &self,
        du: &mut Array2<Complex64>,
        rho: &Array2<Complex64>,
        coefficient: f64,
        s: f64,
    ) -> Result<()> {
        let d = self.dim();
        if rho.dim() != (d, d) || du.dim() != (d, d) {
            return Err(Error::config(format!(
                "collapse operator '{}' is {d}×{d} but density matrices are {:?} and {:?}",
                self.label,
                rho.dim(),
                du.dim()
            )));
        }
        let g = coefficient * self.rate_at(s);
        if g == 0.0 {
            return Ok(());
        }

        let one = Complex64::new(1.0, 0.0);
        let half_g = Complex64::new(-0.5 * g, 0.0);
        // L ρ L†
        let l_rho = self.operator.dot(rho);
        general_mat_mul(Complex64::new(g, 0.0), &l_rho, &self.operator_dag, one, du);
        // −½ L†L ρ − ½ ρ L†L
        general_mat_mul(half_g, &self.l_dag_l, rho, one, du);
        general_mat_mul(half_g, rho, &self.l_dag_l, one, du);
        Ok(())
    }
}

impl fmt::Debug for LindbladTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LindbladTerm")
            .field("label", &self.label)
            .field("operator", &self.operator)
            .finish_non_exhaustive()
    }
}

/// D[L](ρ) at time `s` as a fresh matrix.
pub fn dissipator(term: &LindbladTerm, rho: &Array2<Complex64>, s: f64) -> Result<Array2<Complex64>> {
    let mut out = Array2::zeros(rho.raw_dim());
    term.apply(&mut out, rho, 1.0, s)?;
    Ok(out)
}

/// Full right-hand side dρ/dt = −i[H(s), ρ] + Σ_k D[L_k](ρ).
pub fn lindblad_rhs(
    hamiltonian: &mut DenseHamiltonian,
    terms: &[LindbladTerm],
    rho: &Array2<Complex64>,
    s: f64,
) -> Result<Array2<Complex64>> {
    let mut du = Array2::zeros(rho.raw_dim());
    hamiltonian.apply(&mut du, rho, 1.0, s)?;
    for term in terms {
        term.apply(&mut du, rho, 1.0, s)?;
    }
    Ok(du)
}

/// Conjugate transpose (dagger) of a matrix.
pub(crate) fn conjugate_transpose(m: &Array2<Complex64>) -> Array2<Complex64> {
    m.t().mapv(|z| z.conj())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hamiltonian::TimeFn;
    use crate::units::EnergyUnit;
    use approx::assert_relative_eq;

    fn c(re: f64) -> Complex64 {
        Complex64::new(re, 0.0)
    }

    fn sigma_minus() -> Array2<Complex64> {
        let mut m = Array2::zeros((2, 2));
        m[[0, 1]] = c(1.0);
        m
    }

    fn excited_state() -> Array2<Complex64> {
        let mut m = Array2::zeros((2, 2));
        m[[1, 1]] = c(1.0);
        m
    }

    fn ground_state() -> Array2<Complex64> {
        let mut m = Array2::zeros((2, 2));
        m[[0, 0]] = c(1.0);
        m
    }

    fn plus_state() -> Array2<Complex64> {
        Array2::from_elem((2, 2), c(0.5))
    }

    #[test]
    fn test_ground_state_is_fixed_point_of_damping() {
        let term = LindbladTerm::amplitude_damping(20.0, "q0").unwrap();
        let d = dissipator(&term, &ground_state(), 0.0).unwrap();
        for elem in d.iter() {
            assert_relative_eq!(elem.norm(), 0.0, epsilon = 1e-15);
        }
    }

    #[test]
    fn test_excited_state_decays() {
        let term = LindbladTerm::amplitude_damping(20.0, "q0").unwrap();
        let d = dissipator(&term, &excited_state(), 0.0).unwrap();
        assert_relative_eq!(d[[0, 0]].re, 0.05, epsilon = 1e-15);
        assert_relative_eq!(d[[1, 1]].re, -0.05, epsilon = 1e-15);
    }

    #[test]
    fn test_dissipator_preserves_trace() {
        let term = LindbladTerm::constant(0.3, sigma_minus(), "L").unwrap();
        let d = dissipator(&term, &plus_state(), 0.0).unwrap();
        let trace = d[[0, 0]] + d[[1, 1]];
        assert_relative_eq!(trace.norm(), 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_dephasing_rate_matches_t2() {
        // populations untouched, coherence decays at 1/T2 − 1/(2T1)
        let term = LindbladTerm::pure_dephasing(50.0, 30.0, "q0").unwrap();
        let rho = plus_state();
        let d = dissipator(&term, &rho, 0.0).unwrap();
        assert_relative_eq!(d[[0, 0]].norm(), 0.0, epsilon = 1e-15);
        assert_relative_eq!(d[[1, 1]].norm(), 0.0, epsilon = 1e-15);
        let gamma_phi = 1.0 / 30.0 - 1.0 / 100.0;
        assert_relative_eq!(d[[0, 1]].re, -gamma_phi * 0.5, epsilon = 1e-15);
        assert_relative_eq!(d[[1, 0]].re, -gamma_phi * 0.5, epsilon = 1e-15);
    }

    #[test]
    fn test_t1_t2_validation() {
        assert!(LindbladTerm::amplitude_damping(-10.0, "q0").is_err());
        assert!(LindbladTerm::pure_dephasing(50.0, 110.0, "q0").is_err());
        assert!(LindbladTerm::constant(-1.0, sigma_minus(), "L").is_err());
        let zero = LindbladTerm::pure_dephasing(50.0, 100.0, "q0").unwrap();
        assert_eq!(zero.rate_at(0.0), 0.0);

        let ops = LindbladTerm::from_t1_t2(50.0, 30.0, "q0").unwrap();
        assert_eq!(ops.len(), 2);
        assert_eq!(ops[0].label(), "T1_q0");
        assert_eq!(ops[1].label(), "Tphi_q0");
    }

    #[test]
    fn test_time_dependent_rate_and_coefficient() {
        let term = LindbladTerm::new(Arc::new(|s: f64| 2.0 * s), sigma_minus(), "ramp").unwrap();
        let mut du = Array2::zeros((2, 2));
        term.apply(&mut du, &excited_state(), 0.5, 3.0).unwrap();
        // c · γ(s) = 0.5 · 6
        assert_relative_eq!(du[[0, 0]].re, 3.0, epsilon = 1e-15);
        // accumulates rather than overwrites
        term.apply(&mut du, &excited_state(), 0.5, 3.0).unwrap();
        assert_relative_eq!(du[[0, 0]].re, 6.0, epsilon = 1e-15);
    }

    #[test]
    fn test_shape_mismatch_is_error() {
        let term = LindbladTerm::constant(1.0, sigma_minus(), "L").unwrap();
        let rho = Array2::<Complex64>::zeros((3, 3));
        assert!(matches!(
            dissipator(&term, &rho, 0.0),
            Err(Error::Configuration(_))
        ));
        assert!(LindbladTerm::constant(1.0, Array2::zeros((2, 3)), "L").is_err());
    }

    #[test]
    fn test_lindblad_rhs_unitary_only() {
        // [σz, |1⟩⟨1|] = 0
        let mut sz = Array2::zeros((2, 2));
        sz[[0, 0]] = c(0.5);
        sz[[1, 1]] = c(-0.5);
        let one: TimeFn = Arc::new(|_: f64| 1.0);
        let mut h = DenseHamiltonian::new(vec![one], vec![sz], EnergyUnit::Planck).unwrap();
        let drho = lindblad_rhs(&mut h, &[], &excited_state(), 0.0).unwrap();
        for elem in drho.iter() {
            assert_relative_eq!(elem.norm(), 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_conjugate_transpose() {
        let mut m = Array2::zeros((2, 2));
        m[[0, 1]] = Complex64::new(1.0, 2.0);
        m[[1, 0]] = Complex64::new(3.0, 4.0);
        let dag = conjugate_transpose(&m);
        assert_eq!(dag[[0, 1]], Complex64::new(3.0, -4.0));
        assert_eq!(dag[[1, 0]], Complex64::new(1.0, -2.0));
    }
}
