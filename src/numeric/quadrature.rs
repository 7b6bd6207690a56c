// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Globally adaptive Gauss–Kronrod (7, 15) quadrature.
//!
//! The interval with the largest error estimate is bisected until the summed
//! estimate drops below `max(abs_tol, rel_tol·|I|)`. Infinite limits are
//! handled by the substitutions
//!
//!   [a, ∞):   x = a + u/(1−u)
//!   (−∞, b]:  x = b − u/(1−u)
//!   (−∞, ∞):  x = u/(1−u²)
//!
//! which map onto finite intervals whose endpoints are never sampled.
//!
//! Ref: Piessens et al., "QUADPACK" (1983), §2.2.

use std::f64::consts::PI;

use tracing::{trace, warn};

use crate::config::QuadratureConfig;
use crate::error::{Error, NumericalError, Result};

/// Result of an integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quadrature {
    /// Integral estimate.
    pub value: f64,
    /// Estimated absolute error.
    pub error: f64,
    /// Number of intervals in the final partition.
    pub subdivisions: usize,
    /// Number of integrand evaluations.
    pub evaluations: usize,
}

impl Quadrature {
    fn zero() -> Self {
        Self {
            value: 0.0,
            error: 0.0,
            subdivisions: 0,
            evaluations: 0,
        }
    }

    fn combine(self, other: Quadrature) -> Self {
        Self {
            value: self.value + other.value,
            error: self.error + other.error,
            subdivisions: self.subdivisions + other.subdivisions,
            evaluations: self.evaluations + other.evaluations,
        }
    }
}

/// Kronrod abscissae on [0, 1]; odd indices are the Gauss points.
const XGK: [f64; 8] = [
    0.991_455_371_120_812_639_206_854_697_526_329,
    0.949_107_912_342_758_524_526_189_684_047_851,
    0.864_864_423_359_769_072_789_712_788_640_926,
    0.741_531_185_599_394_439_863_864_773_280_788,
    0.586_087_235_467_691_130_294_144_845_693_013,
    0.405_845_151_377_397_166_906_606_412_076_961,
    0.207_784_955_007_898_467_600_689_403_773_245,
    0.0,
];

const WGK: [f64; 8] = [
    0.022_935_322_010_529_224_963_732_008_058_970,
    0.063_092_092_629_978_553_290_700_663_189_204,
    0.104_790_010_322_250_183_839_876_322_541_518,
    0.140_653_259_715_525_918_745_189_590_510_238,
    0.169_004_726_639_267_902_826_583_426_598_550,
    0.190_350_578_064_785_409_913_256_402_421_014,
    0.204_432_940_075_298_892_414_161_999_234_649,
    0.209_482_141_084_727_828_012_999_174_891_714,
];

const WG: [f64; 4] = [
    0.129_484_966_168_869_693_270_611_432_679_082,
    0.279_705_391_489_276_667_901_467_771_423_780,
    0.381_830_050_505_118_944_950_369_775_488_975,
    0.417_959_183_673_469_387_755_102_040_816_327,
];

#[derive(Debug, Clone, Copy)]
struct Segment {
    a: f64,
    b: f64,
    value: f64,
    error: f64,
}

/// Integrate `f` over `[lower, upper]`; either limit may be infinite.
pub fn integrate<F>(f: F, lower: f64, upper: f64, config: &QuadratureConfig) -> Result<Quadrature>
where
    F: Fn(f64) -> f64,
{
    config.validate()?;
    if lower.is_nan() || upper.is_nan() {
        return Err(Error::config("integration limits must not be NaN"));
    }
    if lower == upper {
        return Ok(Quadrature::zero());
    }
    if lower > upper {
        let q = integrate(f, upper, lower, config)?;
        return Ok(Quadrature {
            value: -q.value,
            ..q
        });
    }

    let bounds = (lower, upper);
    match (lower.is_finite(), upper.is_finite()) {
        (true, true) => adaptive(&f, &|x| x, lower, upper, bounds, config),
        (true, false) => {
            let to_x = |u: f64| lower + u / (1.0 - u);
            let g = |u: f64| {
                let d = 1.0 - u;
                f(lower + u / d) / (d * d)
            };
            adaptive(&g, &to_x, 0.0, 1.0, bounds, config)
        }
        (false, true) => {
            let to_x = |u: f64| upper - u / (1.0 - u);
            let g = |u: f64| {
                let d = 1.0 - u;
                f(upper - u / d) / (d * d)
            };
            adaptive(&g, &to_x, 0.0, 1.0, bounds, config)
        }
        (false, false) => {
            let to_x = |u: f64| u / (1.0 - u * u);
            let g = |u: f64| {
                let d = 1.0 - u * u;
                f(u / d) * (1.0 + u * u) / (d * d)
            };
            adaptive(&g, &to_x, -1.0, 1.0, bounds, config)
        }
    }
}

/// Cauchy principal value `P.V. ∫ f(x)/(pole − x) dx` over the real line.
///
/// The window `[pole − δ, pole + δ]` (δ = `config.pv_window`) is folded onto
/// `∫₀^δ [f(pole − u) − f(pole + u)]/u du`, where the singular parts of the
/// two half-integrals cancel exactly; the tails are integrated directly.
pub fn principal_value<F>(f: F, pole: f64, config: &QuadratureConfig) -> Result<Quadrature>
where
    F: Fn(f64) -> f64,
{
    config.validate()?;
    let at_pole = f(pole);
    if !pole.is_finite() || !at_pole.is_finite() {
        warn!(pole, value = at_pole, "principal value pole is not resolvable");
        return Err(NumericalError::SingularPrincipalValue {
            pole,
            value: at_pole,
        }
        .into());
    }

    let delta = config.pv_window;
    let kernel = |x: f64| f(x) / (pole - x);
    let left = integrate(kernel, f64::NEG_INFINITY, pole - delta, config)?;
    let right = integrate(kernel, pole + delta, f64::INFINITY, config)?;
    let inner = integrate(|u| (f(pole - u) - f(pole + u)) / u, 0.0, delta, config)?;

    Ok(left.combine(right).combine(inner))
}

/// Hilbert-transform kernel `S(ω) = P.V. (1/2π) ∫ γ(ω')/(ω − ω') dω'`.
pub fn hilbert_transform<F>(f: F, omega: f64, config: &QuadratureConfig) -> Result<f64>
where
    F: Fn(f64) -> f64,
{
    Ok(principal_value(f, omega, config)?.value / (2.0 * PI))
}

fn adaptive<F, M>(
    f: &F,
    to_x: &M,
    a: f64,
    b: f64,
    bounds: (f64, f64),
    config: &QuadratureConfig,
) -> Result<Quadrature>
where
    F: Fn(f64) -> f64,
    M: Fn(f64) -> f64,
{
    let mut segments = vec![kronrod15(f, to_x, a, b)?];
    let mut evaluations = 15;

    loop {
        let value: f64 = segments.iter().map(|s| s.value).sum();
        let error: f64 = segments.iter().map(|s| s.error).sum();
        let tolerance = config.abs_tol.max(config.rel_tol * value.abs());

        if error <= tolerance {
            return Ok(Quadrature {
                value,
                error,
                subdivisions: segments.len(),
                evaluations,
            });
        }

        let (worst_idx, worst) = segments
            .iter()
            .copied()
            .enumerate()
            .max_by(|x, y| x.1.error.total_cmp(&y.1.error))
            .ok_or_else(|| Error::config("empty quadrature partition"))?;

        let mid = 0.5 * (worst.a + worst.b);
        let exhausted = segments.len() >= config.max_subdivisions;
        if exhausted || mid <= worst.a || mid >= worst.b {
            warn!(
                lower = bounds.0,
                upper = bounds.1,
                value,
                error,
                subdivisions = segments.len(),
                "quadrature did not converge"
            );
            return Err(NumericalError::QuadratureDiverged {
                lower: bounds.0,
                upper: bounds.1,
                estimate: value,
                error,
                abs_tol: config.abs_tol,
                rel_tol: config.rel_tol,
                subdivisions: segments.len(),
            }
            .into());
        }

        trace!(a = worst.a, b = worst.b, error = worst.error, "bisecting");
        segments.swap_remove(worst_idx);
        segments.push(kronrod15(f, to_x, worst.a, mid)?);
        segments.push(kronrod15(f, to_x, mid, worst.b)?);
        evaluations += 30;
    }
}

/// One G7/K15 panel; the error estimate is |K15 − G7|.
fn kronrod15<F, M>(f: &F, to_x: &M, a: f64, b: f64) -> Result<Segment>
where
    F: Fn(f64) -> f64,
    M: Fn(f64) -> f64,
{
    let center = 0.5 * (a + b);
    let half = 0.5 * (b - a);

    let eval = |u: f64| -> Result<f64> {
        let y = f(u);
        if y.is_finite() {
            Ok(y)
        } else {
            Err(NumericalError::NonFiniteIntegrand { at: to_x(u) }.into())
        }
    };

    let fc = eval(center)?;
    let mut kronrod = fc * WGK[7];
    let mut gauss = fc * WG[3];

    for j in 0..7 {
        let dx = half * XGK[j];
        let pair = eval(center - dx)? + eval(center + dx)?;
        kronrod += WGK[j] * pair;
        if j % 2 == 1 {
            gauss += WG[j / 2] * pair;
        }
    }

    Ok(Segment {
        a,
        b,
        value: kronrod * half,
        error: ((kronrod - gauss) * half).abs(),
    })
}
