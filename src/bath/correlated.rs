// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Multi-operator bath with cross-correlations.
//!
//! A correlated bath couples `n` system operators `A_1..A_n` to a shared
//! environment. It is described entirely by operator-indexed spectra
//! `γ_ij(ω)`; pairs that are not listed are the zero function. Correlation
//! functions are optional and only needed by time-domain consumers.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use num_complex::Complex64;
use tracing::debug;

use super::{CorrelationKernel, SpectrumFn};
use crate::config::QuadratureConfig;
use crate::error::{Error, Result};
use crate::numeric::hilbert_transform;

/// Operator-pair keyed spectra for `n` coupled operators.
#[derive(Clone)]
pub struct CorrelatedBath {
    num_operators: usize,
    spectra: BTreeMap<(usize, usize), SpectrumFn>,
    correlations: BTreeMap<(usize, usize), CorrelationKernel>,
}

impl CorrelatedBath {
    /// An empty (all-zero) bath over `num_operators` operators.
    pub fn new(num_operators: usize) -> Result<Self> {
        if num_operators == 0 {
            return Err(Error::config("correlated bath needs at least one operator"));
        }
        Ok(Self {
            num_operators,
            spectra: BTreeMap::new(),
            correlations: BTreeMap::new(),
        })
    }

    /// Build from parallel lists of operator pairs and their spectra. The
    /// operator count is inferred from the largest index.
    pub fn from_pairs(pairs: &[(usize, usize)], spectra: Vec<SpectrumFn>) -> Result<Self> {
        if pairs.len() != spectra.len() {
            return Err(Error::config(format!(
                "{} operator pairs but {} spectra",
                pairs.len(),
                spectra.len()
            )));
        }
        let num_operators = pairs.iter().map(|&(i, j)| i.max(j) + 1).max().unwrap_or(0);
        let mut bath = Self::new(num_operators)?;
        for (&(i, j), spectrum) in pairs.iter().zip(spectra) {
            bath = bath.with_shared_spectrum(i, j, spectrum)?;
        }
        Ok(bath)
    }

    /// Set `γ_ij`.
    pub fn with_spectrum<S>(self, i: usize, j: usize, spectrum: S) -> Result<Self>
    where
        S: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        self.with_shared_spectrum(i, j, Arc::new(spectrum))
    }

    pub fn with_shared_spectrum(mut self, i: usize, j: usize, spectrum: SpectrumFn) -> Result<Self> {
        self.check_pair(i, j)?;
        if self.spectra.insert((i, j), spectrum).is_some() {
            return Err(Error::config(format!("duplicate spectrum for pair ({i}, {j})")));
        }
        debug!(i, j, "correlated bath spectrum");
        Ok(self)
    }

    /// Set `C_ij(τ)`.
    pub fn with_correlation<C>(mut self, i: usize, j: usize, correlation: C) -> Result<Self>
    where
        C: Fn(f64) -> Complex64 + Send + Sync + 'static,
    {
        self.check_pair(i, j)?;
        if self
            .correlations
            .insert((i, j), Arc::new(correlation))
            .is_some()
        {
            return Err(Error::config(format!(
                "duplicate correlation for pair ({i}, {j})"
            )));
        }
        Ok(self)
    }

    fn check_pair(&self, i: usize, j: usize) -> Result<()> {
        if i >= self.num_operators || j >= self.num_operators {
            return Err(Error::config(format!(
                "operator pair ({i}, {j}) out of range for {} operators",
                self.num_operators
            )));
        }
        Ok(())
    }

    pub fn num_operators(&self) -> usize {
        self.num_operators
    }

    /// Pairs with a non-zero spectrum, in index order.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        self.spectra.keys().copied().collect()
    }

    pub(crate) fn spectra(&self) -> impl Iterator<Item = ((usize, usize), &SpectrumFn)> {
        self.spectra.iter().map(|(&k, v)| (k, v))
    }

    pub(crate) fn correlations(&self) -> impl Iterator<Item = ((usize, usize), &CorrelationKernel)> {
        self.correlations.iter().map(|(&k, v)| (k, v))
    }

    /// `γ_ij(ω)`; zero for unlisted pairs.
    pub fn spectrum(&self, i: usize, j: usize, omega: f64) -> f64 {
        self.spectra.get(&(i, j)).map_or(0.0, |s| s(omega))
    }

    /// `C_ij(τ)`; zero for unlisted pairs.
    pub fn correlation(&self, i: usize, j: usize, tau: f64) -> Complex64 {
        self.correlations
            .get(&(i, j))
            .map_or(Complex64::new(0.0, 0.0), |c| c(tau))
    }

    /// Lamb-shift kernel `S_ij(ω)`; zero for unlisted pairs.
    pub fn lamb_shift(
        &self,
        i: usize,
        j: usize,
        omega: f64,
        config: &QuadratureConfig,
    ) -> Result<f64> {
        match self.spectra.get(&(i, j)) {
            Some(s) => hilbert_transform(|w| s(w), omega, config),
            None => Ok(0.0),
        }
    }
}

impl fmt::Debug for CorrelatedBath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CorrelatedBath")
            .field("num_operators", &self.num_operators)
            .field("spectra", &self.spectra.keys().collect::<Vec<_>>())
            .field("correlations", &self.correlations.keys().collect::<Vec<_>>())
            .finish()
    }
}
