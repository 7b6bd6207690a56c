// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Configuration management for the dynamics core.
//!
//! Configuration is loaded from multiple sources with the following priority
//! (later sources override earlier ones):
//!
//! 1. Built-in defaults
//! 2. `qubitos-dynamics.yaml` / `.json` file
//! 3. Environment variables (QUBITOS_*)

use std::collections::BTreeMap;
use std::env;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bath::{Bath, EnsembleFluctuator, HybridOhmicBath, OhmicBath, SymmetricRtn};
use crate::error::{Error, Result};

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Adaptive quadrature settings
    #[serde(default)]
    pub quadrature: QuadratureConfig,

    /// Eigensolver settings
    #[serde(default)]
    pub eigen: EigenConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Named bath definitions
    #[serde(default)]
    pub baths: BTreeMap<String, BathParams>,
}

impl Config {
    /// Load configuration from file and environment.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(path) = config_path {
            if path.exists() {
                config = Self::from_file(path)?;
            }
        } else {
            for path in &[
                "qubitos-dynamics.yaml",
                "qubitos-dynamics.yml",
                "qubitos-dynamics.json",
                "/etc/qubitos/dynamics.yaml",
            ] {
                let path = Path::new(path);
                if path.exists() {
                    config = Self::from_file(path)?;
                    break;
                }
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Parse a single file, choosing the format by extension.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            _ => serde_yaml::from_str(&content)?,
        };
        tracing::debug!(path = %path.display(), "loaded dynamics configuration");
        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Some(v) = env_parse("QUBITOS_QUAD_ABS_TOL") {
            self.quadrature.abs_tol = v;
        }
        if let Some(v) = env_parse("QUBITOS_QUAD_REL_TOL") {
            self.quadrature.rel_tol = v;
        }
        if let Some(v) = env_parse("QUBITOS_QUAD_MAX_SUBDIVISIONS") {
            self.quadrature.max_subdivisions = v;
        }
        if let Some(v) = env_parse("QUBITOS_QUAD_PV_WINDOW") {
            self.quadrature.pv_window = v;
        }
        if let Some(v) = env_parse("QUBITOS_EIGEN_TOLERANCE") {
            self.eigen.tolerance = v;
        }
        if let Some(v) = env_parse("QUBITOS_EIGEN_MAX_ITERATIONS") {
            self.eigen.max_iterations = v;
        }
        if let Ok(val) = env::var("QUBITOS_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = env::var("QUBITOS_LOG_FORMAT") {
            self.logging.format = val;
        }
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<()> {
        self.quadrature.validate()?;
        self.eigen.validate()?;
        match self.logging.format.as_str() {
            "pretty" | "compact" | "json" => {}
            other => {
                return Err(Error::config(format!(
                    "unknown log format '{other}' (expected pretty, compact or json)"
                )))
            }
        }
        for (name, params) in &self.baths {
            params
                .build()
                .map_err(|e| Error::config(format!("bath '{name}': {e}")))?;
        }
        Ok(())
    }

    /// Build a named bath from the configuration.
    pub fn bath(&self, name: &str) -> Result<Bath> {
        self.baths
            .get(name)
            .ok_or_else(|| Error::config(format!("no bath named '{name}' in configuration")))?
            .build()
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}

/// Adaptive Gauss–Kronrod quadrature settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadratureConfig {
    /// Absolute error tolerance
    #[serde(default)]
    pub abs_tol: f64,

    /// Relative error tolerance
    #[serde(default = "default_rel_tol")]
    pub rel_tol: f64,

    /// Maximum number of interval subdivisions before giving up
    #[serde(default = "default_max_subdivisions")]
    pub max_subdivisions: usize,

    /// Half-width of the folded window around a principal-value pole
    #[serde(default = "default_pv_window")]
    pub pv_window: f64,
}

impl Default for QuadratureConfig {
    fn default() -> Self {
        Self {
            abs_tol: 0.0,
            rel_tol: default_rel_tol(),
            max_subdivisions: default_max_subdivisions(),
            pv_window: default_pv_window(),
        }
    }
}

impl QuadratureConfig {
    /// Validate tolerances.
    pub fn validate(&self) -> Result<()> {
        let negative = |x: f64| x.is_nan() || x < 0.0;
        if negative(self.abs_tol) || negative(self.rel_tol) {
            return Err(Error::config("quadrature tolerances must be non-negative"));
        }
        if self.abs_tol == 0.0 && self.rel_tol == 0.0 {
            return Err(Error::config(
                "at least one of abs_tol and rel_tol must be positive",
            ));
        }
        if self.max_subdivisions == 0 {
            return Err(Error::config("max_subdivisions must be > 0"));
        }
        if !(self.pv_window.is_finite() && self.pv_window > 0.0) {
            return Err(Error::config("pv_window must be positive and finite"));
        }
        Ok(())
    }

    /// Copy with relaxed relative tolerance, for callers retrying after a
    /// convergence failure.
    pub fn relaxed(&self, factor: f64) -> Self {
        Self {
            rel_tol: self.rel_tol * factor,
            abs_tol: self.abs_tol * factor,
            ..*self
        }
    }
}

fn default_rel_tol() -> f64 {
    1e-10
}

fn default_max_subdivisions() -> usize {
    2000
}

fn default_pv_window() -> f64 {
    1.0
}

/// Hermitian eigensolver settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EigenConfig {
    /// Convergence threshold passed to the eigensolver
    #[serde(default = "default_eigen_tolerance")]
    pub tolerance: f64,

    /// Maximum number of QR sweeps
    #[serde(default = "default_eigen_max_iterations")]
    pub max_iterations: usize,

    /// Largest tolerated |H_ij − conj(H_ji)| relative to the largest entry
    #[serde(default = "default_hermitian_tolerance")]
    pub hermitian_tolerance: f64,
}

impl Default for EigenConfig {
    fn default() -> Self {
        Self {
            tolerance: default_eigen_tolerance(),
            max_iterations: default_eigen_max_iterations(),
            hermitian_tolerance: default_hermitian_tolerance(),
        }
    }
}

impl EigenConfig {
    /// Validate settings.
    pub fn validate(&self) -> Result<()> {
        if self.tolerance.is_nan() || self.tolerance <= 0.0 {
            return Err(Error::config("eigen tolerance must be > 0"));
        }
        if self.max_iterations == 0 {
            return Err(Error::config("eigen max_iterations must be > 0"));
        }
        if self.hermitian_tolerance.is_nan() || self.hermitian_tolerance < 0.0 {
            return Err(Error::config("hermitian_tolerance must be >= 0"));
        }
        Ok(())
    }
}

fn default_eigen_tolerance() -> f64 {
    f64::EPSILON
}

fn default_eigen_max_iterations() -> usize {
    10_000
}

fn default_hermitian_tolerance() -> f64 {
    1e-10
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format (pretty, compact, json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

/// Numeric bath parameters as supplied by a configuration file.
///
/// Lab units: frequencies in GHz, temperatures in mK.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BathParams {
    /// Ohmic bath with exponential cutoff.
    Ohmic {
        eta: f64,
        fc: f64,
        temperature: f64,
    },
    /// Ohmic bath plus low-frequency Gaussian noise of width `w`.
    HybridOhmic {
        w: f64,
        eta: f64,
        fc: f64,
        temperature: f64,
    },
    /// Single symmetric random telegraph fluctuator.
    SymmetricRtn { b: f64, nu: f64 },
    /// Explicit fluctuator ensemble.
    EnsembleFluctuator { b: Vec<f64>, nu: Vec<f64> },
    /// Log-spaced fluctuator ensemble approximating 1/f noise.
    OneOverF {
        b: f64,
        nu_min: f64,
        nu_max: f64,
        count: usize,
    },
}

impl BathParams {
    /// Validate and build the bath.
    pub fn build(&self) -> Result<Bath> {
        let bath = match self {
            BathParams::Ohmic {
                eta,
                fc,
                temperature,
            } => Bath::Ohmic(OhmicBath::from_lab_units(*eta, *fc, *temperature)?),
            BathParams::HybridOhmic {
                w,
                eta,
                fc,
                temperature,
            } => Bath::HybridOhmic(HybridOhmicBath::from_lab_units(
                *w,
                *eta,
                *fc,
                *temperature,
            )?),
            BathParams::SymmetricRtn { b, nu } => Bath::SymmetricRtn(SymmetricRtn::new(*b, *nu)?),
            BathParams::EnsembleFluctuator { b, nu } => {
                Bath::Ensemble(EnsembleFluctuator::new(b.clone(), nu.clone())?)
            }
            BathParams::OneOverF {
                b,
                nu_min,
                nu_max,
                count,
            } => Bath::Ensemble(EnsembleFluctuator::one_over_f(
                *b, *nu_min, *nu_max, *count,
            )?),
        };
        Ok(bath)
    }
}
