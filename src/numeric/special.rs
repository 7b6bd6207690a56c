// Copyright 2026 QubitOS Contributors
// SPDX-License-Identifier: Apache-2.0

//! Special functions of complex argument.

use std::f64::consts::PI;

use num_complex::Complex64;

/// Real part above which the asymptotic series is used.
const ASYMPTOTIC_THRESHOLD: f64 = 10.0;

/// Trigamma function ψ₁(z) = d²/dz² ln Γ(z).
///
/// Uses the reflection formula for Re z < 0, the recurrence
/// ψ₁(z) = ψ₁(z + 1) + 1/z² to reach Re z ≥ 10, and then the asymptotic
/// expansion ψ₁(z) ~ 1/z + 1/(2z²) + Σ B₂ₖ/z^{2k+1} through B₁₄, which is
/// accurate to a few ulps there. Poles at the non-positive integers yield
/// non-finite values.
pub fn trigamma(z: Complex64) -> Complex64 {
    if z.re < 0.0 {
        // ψ₁(1 − z) + ψ₁(z) = π² / sin²(πz)
        let s = (z * PI).sin();
        return PI * PI / (s * s) - trigamma(1.0 - z);
    }

    let mut z = z;
    let mut acc = Complex64::new(0.0, 0.0);
    while z.re < ASYMPTOTIC_THRESHOLD {
        acc += 1.0 / (z * z);
        z += 1.0;
    }

    let w = 1.0 / z;
    let w2 = w * w;
    let tail = w2
        * (-1.0 / 30.0
            + w2 * (1.0 / 42.0
                + w2 * (-1.0 / 30.0
                    + w2 * (5.0 / 66.0 + w2 * (-691.0 / 2730.0 + w2 * (7.0 / 6.0))))));
    acc + w + 0.5 * w2 + w * w2 * (1.0 / 6.0 + tail)
}
