// Copyright 2025 the Kurbo Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Common mathematical operations

#![allow(missing_docs)]

#[cfg(not(feature = "std"))]
mod sealed {
    /// A [sealed trait](https://predr.ag/blog/definitive-guide-to-sealed-traits-in-rust/)
    /// which stops [`super::FloatFuncs`] from being implemented outside this crate.
    pub trait FloatFuncsSealed {}
}

/// Generates `FloatFuncs` from a list of method signatures and their `libm` names.
macro_rules! define_float_funcs {
    ($(
        fn $name:ident(self $(,$arg:ident: $arg_ty:ty)*) -> $ret:ty
        => $lname:ident/$lfname:ident;
    )+) => {

        /// Float methods that `core` lacks, backed by `libm` when the `std`
        /// feature is off.
        ///
        /// Each method behaves like the `f64` method of the same name.
        #[cfg(not(feature = "std"))]
        pub trait FloatFuncs: Sized + sealed::FloatFuncsSealed {
            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret;)+
        }

        #[cfg(not(feature = "std"))]
        impl sealed::FloatFuncsSealed for f64 {}

        #[cfg(not(feature = "std"))]
        impl FloatFuncs for f64 {
            $(fn $name(self $(,$arg: $arg_ty)*) -> $ret {
                #[cfg(feature = "libm")]
                return libm::$lname(self $(,$arg as _)*);

                #[cfg(not(feature = "libm"))]
                compile_error!("rspline requires either the `std` or `libm` feature")
            })+
        }
    }
}

define_float_funcs! {
    fn abs(self) -> Self => fabs/fabsf;
    fn atan2(self, other: Self) -> Self => atan2/atan2f;
    fn copysign(self, sign: Self) -> Self => copysign/copysignf;
    fn cos(self) -> Self => cos/cosf;
    fn hypot(self, other: Self) -> Self => hypot/hypotf;
    fn round(self) -> Self => round/roundf;
    fn sin(self) -> Self => sin/sinf;
    fn sin_cos(self) -> (Self, Self) => sincos/sincosf;
    fn sqrt(self) -> Self => sqrt/sqrtf;
    fn tan(self) -> Self => tan/tanf;
    fn tanh(self) -> Self => tanh/tanhf;
}

use core::f64::consts::PI;

/// Reduce an angle to the range `[-π, π]`.
///
/// Rounding is to the nearest multiple of 2π, so the result lies on the
/// short arc. Inputs that are not finite come back as NaN.
///
/// # Examples
///
/// ```
/// use rspline::common::mod2pi;
///
/// let th = mod2pi(3.0 * std::f64::consts::PI / 2.0);
/// assert!((th + std::f64::consts::FRAC_PI_2).abs() < 1e-12);
/// ```
#[inline]
pub fn mod2pi(th: f64) -> f64 {
    let twopi = 2.0 * PI;
    let frac = th * twopi.recip();
    twopi * (frac - frac.round())
}

/// Tangent with angles beyond ±π/2 reflected back into range.
///
/// An atan-curvature past a right angle means the tangent handle points
/// backward; reflecting keeps the value bounded instead of passing through
/// the pole of `tan`.
#[inline]
pub fn my_tan(th: f64) -> f64 {
    if th > PI / 2.0 {
        (PI - th).tan()
    } else if th < -PI / 2.0 {
        (-PI - th).tan()
    } else {
        th.tan()
    }
}

/// Sign of a value as `-1`, `0` or `1`.
///
/// Unlike [`f64::signum`], zero (of either sign) maps to `0`, so a flat side
/// never agrees in sign with a curved one. NaN maps to `0` as well.
#[inline]
pub fn sign(x: f64) -> i32 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}
