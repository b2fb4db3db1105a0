// Copyright 2025 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small dense polynomials.

use alloc::vec::Vec;

/// A polynomial of dynamic degree.
#[derive(Clone, Debug, PartialEq)]
pub struct Polynomial {
    /// Coefficients in increasing order of degree.
    ///
    /// For example, `coeffs[0]` is the constant term.
    coeffs: Vec<f64>,
}

impl Polynomial {
    /// Constructs a new polynomial from coefficients.
    ///
    /// The first coefficient provided will be the constant term, the second will
    /// be the linear term, and so on.
    pub fn new(coeffs: impl IntoIterator<Item = f64>) -> Self {
        Polynomial {
            coeffs: coeffs.into_iter().collect(),
        }
    }

    /// The coefficients of this polynomial.
    ///
    /// In the returned slice, the coefficient of `x^i` is at index `i`.
    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    /// The degree of this polynomial, counting coefficients rather than
    /// inspecting their values.
    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    /// Evaluates this polynomial at a point.
    pub fn eval(&self, x: f64) -> f64 {
        let mut ret = 0.0;
        let mut x_pow = 1.0;
        for &c in &self.coeffs {
            ret += c * x_pow;
            x_pow *= x;
        }
        ret
    }

    /// Returns the polynomial that's the derivative of this polynomial.
    pub fn deriv(&self) -> Polynomial {
        let mut coeffs = Vec::with_capacity(self.coeffs.len().saturating_sub(1));
        for (i, c) in self.coeffs.iter().enumerate().skip(1) {
            coeffs.push(c * (i as f64));
        }
        Polynomial { coeffs }
    }
}

/// The quintic Hermite interpolant on `[0, 1]`.
///
/// Returns the unique polynomial of degree 5 with value, first derivative
/// and second derivative `x0`, `v0`, `a0` at 0 and `x1`, `v1`, `a1` at 1.
///
/// # Examples
///
/// ```
/// use rspline::hermite5;
///
/// let p = hermite5(0.0, 0.0, 0.0, 0.0, 1.0, 0.0);
/// let p2 = p.deriv().deriv();
/// assert!((p2.eval(0.0) - 1.0).abs() < 1e-12);
/// assert!(p.eval(1.0).abs() < 1e-12);
/// ```
pub fn hermite5(x0: f64, x1: f64, v0: f64, v1: f64, a0: f64, a1: f64) -> Polynomial {
    Polynomial::new([
        x0,
        v0,
        0.5 * a0,
        -10.0 * x0 + 10.0 * x1 - 6.0 * v0 - 4.0 * v1 - 1.5 * a0 + 0.5 * a1,
        15.0 * x0 - 15.0 * x1 + 8.0 * v0 + 7.0 * v1 + 1.5 * a0 - a1,
        -6.0 * x0 + 6.0 * x1 - 3.0 * v0 - 3.0 * v1 - 0.5 * a0 + 0.5 * a1,
    ])
}
