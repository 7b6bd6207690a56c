// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Davies (adiabatic-frame) Lindblad generator.
//!
//! In the instantaneous eigenbasis {|a⟩} of H(s) with angular energies E_a,
//! system operators A_α couple to a bath with spectrum matrix γ_αβ(ω). The
//! secular Born-Markov generator acts as
//!
//!   populations:  dρ_aa = Σ_{b≠a} (W_{a←b} ρ_bb − W_{b←a} ρ_aa)
//!   coherences:   dρ_ac = [Z_ac − ½(Γ_a + Γ_c) − i(h_a − h_c)] ρ_ac
//!
//! with
//!
//!   W_{a←b} = Σ_αβ γ_αβ(E_b − E_a) A^β_ab conj(A^α_ab)
//!   Z_ac    = Σ_αβ γ_αβ(0) A^β_aa conj(A^α_cc)
//!   Γ_a     = Σ_{b≠a} W_{b←a} + Z_aa
//!   h_a     = Σ_b Σ_αβ S_αβ(E_a − E_b) conj(A^α_ba) A^β_ba
//!
//! The level structure is assumed non-degenerate.
//!
//! Ref: Davies (1974), Commun. Math. Phys. 39, 91.
//! Ref: Albash et al. (2012), New J. Phys. 14, 123016.

use ndarray::Array2;
use num_complex::Complex64;
use tracing::debug;

use super::dissipator::conjugate_transpose;
use crate::bath::{LambShiftMatrix, SpectrumMatrix};
use crate::config::EigenConfig;
use crate::error::{Error, Result};
use crate::hamiltonian::DenseHamiltonian;

/// Secular Lindblad generator built from a bath spectrum matrix.
#[derive(Debug, Clone)]
pub struct DaviesGenerator {
    couplings: Vec<Array2<Complex64>>,
    spectrum: SpectrumMatrix,
    lamb_shift: Option<LambShiftMatrix>,
    levels: Option<usize>,
    eigen: EigenConfig,
}

impl DaviesGenerator {
    /// `spectrum` must be `couplings.len()`-dimensional, or 1×1, in which
    /// case every coupling sees an independent copy of the same bath.
    pub fn new(couplings: Vec<Array2<Complex64>>, spectrum: SpectrumMatrix) -> Result<Self> {
        let first = couplings
            .first()
            .ok_or_else(|| Error::config("Davies generator needs at least one coupling"))?;
        let dim = first.nrows();
        if let Some(bad) = couplings.iter().find(|a| a.dim() != (dim, dim)) {
            return Err(Error::config(format!(
                "coupling operators must all be {dim}×{dim}, found {:?}",
                bad.dim()
            )));
        }
        check_kernel_dim(spectrum.dim(), couplings.len(), "spectrum")?;
        debug!(couplings = couplings.len(), dim, "Davies generator");
        Ok(Self {
            couplings,
            spectrum,
            lamb_shift: None,
            levels: None,
            eigen: EigenConfig::default(),
        })
    }

    /// Include the Lamb-shift Hamiltonian.
    pub fn with_lamb_shift(mut self, lamb_shift: LambShiftMatrix) -> Result<Self> {
        check_kernel_dim(lamb_shift.dim(), self.couplings.len(), "lamb shift")?;
        self.lamb_shift = Some(lamb_shift);
        Ok(self)
    }

    /// Restrict the generator to the lowest `levels` eigenstates.
    pub fn with_levels(mut self, levels: usize) -> Result<Self> {
        let dim = self.dim();
        if levels == 0 || levels > dim {
            return Err(Error::config(format!(
                "levels must be in 1..={dim}, got {levels}"
            )));
        }
        self.levels = Some(levels);
        Ok(self)
    }

    pub fn with_eigen_config(mut self, eigen: EigenConfig) -> Self {
        self.eigen = eigen;
        self
    }

    pub fn dim(&self) -> usize {
        self.couplings[0].nrows()
    }

    /// Coupling pairs (α, β) with a non-zero kernel.
    fn channels(&self) -> Vec<(usize, usize)> {
        if self.spectrum.dim() == 1 {
            (0..self.couplings.len()).map(|a| (a, a)).collect()
        } else {
            self.spectrum.iter().map(|(pair, _)| pair).collect()
        }
    }

    fn gamma(&self, alpha: usize, beta: usize, omega: f64) -> f64 {
        if self.spectrum.dim() == 1 {
            self.spectrum.eval(0, 0, omega)
        } else {
            self.spectrum.eval(alpha, beta, omega)
        }
    }

    fn shift(ls: &LambShiftMatrix, alpha: usize, beta: usize, omega: f64) -> Result<f64> {
        if ls.dim() == 1 {
            ls.eval(0, 0, omega)
        } else {
            ls.eval(alpha, beta, omega)
        }
    }

    /// Accumulate `coefficient · D_Davies(ρ)` at time `s` into `du`.
    ///
    /// The unitary part is not included; call [`DenseHamiltonian::apply`]
    /// for it.
    pub fn apply(
        &self,
        du: &mut Array2<Complex64>,
        rho: &Array2<Complex64>,
        hamiltonian: &mut DenseHamiltonian,
        coefficient: f64,
        s: f64,
    ) -> Result<()> {
        let n = self.dim();
        if hamiltonian.dim() != n {
            return Err(Error::config(format!(
                "Hamiltonian dimension {} does not match coupling dimension {n}",
                hamiltonian.dim()
            )));
        }
        if rho.dim() != (n, n) || du.dim() != (n, n) {
            return Err(Error::config(format!(
                "density matrices {:?} and {:?} do not match dimension {n}",
                rho.dim(),
                du.dim()
            )));
        }

        let levels = self.levels.unwrap_or(n);
        let unit = hamiltonian.unit();
        let eig = hamiltonian.eigen_decomp_with(s, levels, &self.eigen)?;
        let energies: Vec<f64> = eig.values.iter().map(|&e| unit.to_angular(e)).collect();
        let v = &eig.vectors;
        let v_dag = conjugate_transpose(v);

        let rho_e = v_dag.dot(rho).dot(v);
        let ops: Vec<Array2<Complex64>> =
            self.couplings.iter().map(|a| v_dag.dot(a).dot(v)).collect();
        let channels = self.channels();

        // W[a][b] = rate a ← b
        let mut w = Array2::<f64>::zeros((levels, levels));
        for a in 0..levels {
            for b in 0..levels {
                if a == b {
                    continue;
                }
                let omega = energies[b] - energies[a];
                w[[a, b]] = channels
                    .iter()
                    .map(|&(al, be)| {
                        self.gamma(al, be, omega) * (ops[be][[a, b]] * ops[al][[a, b]].conj()).re
                    })
                    .sum();
            }
        }

        // Z_ac from the zero-frequency kernel
        let gamma0: Vec<f64> = channels
            .iter()
            .map(|&(al, be)| self.gamma(al, be, 0.0))
            .collect();
        let z = Array2::from_shape_fn((levels, levels), |(a, c)| {
            channels
                .iter()
                .zip(&gamma0)
                .map(|(&(al, be), &g)| g * ops[be][[a, a]] * ops[al][[c, c]].conj())
                .sum::<Complex64>()
        });

        let decay: Vec<f64> = (0..levels)
            .map(|a| {
                let out: f64 = (0..levels).filter(|&b| b != a).map(|b| w[[b, a]]).sum();
                out + z[[a, a]].re
            })
            .collect();

        let lamb: Vec<f64> = match &self.lamb_shift {
            Some(ls) => (0..levels)
                .map(|a| -> Result<f64> {
                    let mut h = 0.0;
                    for b in 0..levels {
                        let omega = energies[a] - energies[b];
                        for &(al, be) in &channels {
                            let weight = (ops[al][[b, a]].conj() * ops[be][[b, a]]).re;
                            if weight != 0.0 {
                                h += Self::shift(ls, al, be, omega)? * weight;
                            }
                        }
                    }
                    Ok(h)
                })
                .collect::<Result<_>>()?,
            None => vec![0.0; levels],
        };

        let mut d_e = Array2::<Complex64>::zeros((levels, levels));
        for a in 0..levels {
            for c in 0..levels {
                if a == c {
                    let gain: f64 = (0..levels)
                        .filter(|&b| b != a)
                        .map(|b| w[[a, b]] * rho_e[[b, b]].re)
                        .sum();
                    let loss: f64 = (0..levels).filter(|&b| b != a).map(|b| w[[b, a]]).sum();
                    d_e[[a, a]] = Complex64::new(gain - loss * rho_e[[a, a]].re, 0.0);
                } else {
                    let rate = z[[a, c]] - 0.5 * (decay[a] + decay[c])
                        - Complex64::new(0.0, lamb[a] - lamb[c]);
                    d_e[[a, c]] = rate * rho_e[[a, c]];
                }
            }
        }

        let back = v.dot(&d_e).dot(&v_dag);
        du.scaled_add(Complex64::new(coefficient, 0.0), &back);
        Ok(())
    }
}

fn check_kernel_dim(kernel: usize, couplings: usize, what: &str) -> Result<()> {
    if kernel == couplings || kernel == 1 {
        Ok(())
    } else {
        Err(Error::config(format!(
            "{what} matrix is {kernel}×{kernel} but there are {couplings} couplings"
        )))
    }
}
