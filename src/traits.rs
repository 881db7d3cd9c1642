//! [`Scalar`] trait: the floating point types an [`Uncertain`](crate::Uncertain) value can
//! carry its mean, standard deviation and partial derivatives in.

use std::fmt::{Debug, Display};
use std::ops::{Add, AddAssign, Div, Mul, MulAssign, Neg, Sub};
use std::str::FromStr;

/// A floating point scalar suitable for first-order error propagation.
///
/// Implemented for `f32` and `f64` only. Every method maps onto the inherent method
/// of the same name, so IEEE special values propagate untouched.
pub trait Scalar:
    Copy
    + Debug
    + Display
    + FromStr
    + PartialEq
    + PartialOrd
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + Neg<Output = Self>
    + AddAssign
    + MulAssign
    + Send
    + Sync
    + 'static
{
    /// Additive identity.
    const ZERO: Self;
    /// Multiplicative identity.
    const ONE: Self;
    /// Archimedes' constant.
    const PI: Self;

    /// Convert an `f64` constant, rounding if the target is narrower.
    fn from_f64(v: f64) -> Self;

    /// Widen to `f64`.
    fn to_f64(self) -> f64;

    fn sqrt(self) -> Self;
    fn abs(self) -> Self;
    fn signum(self) -> Self;
    fn powf(self, n: Self) -> Self;
    fn powi(self, n: i32) -> Self;
    fn exp(self) -> Self;
    fn ln(self) -> Self;
    fn sin(self) -> Self;
    fn cos(self) -> Self;
    fn tan(self) -> Self;
    fn asin(self) -> Self;
    fn acos(self) -> Self;
    fn atan(self) -> Self;
    fn atan2(self, x: Self) -> Self;
    fn is_finite(self) -> bool;
}

macro_rules! impl_scalar {
    ($t:ident) => {
        impl Scalar for $t {
            const ZERO: Self = 0.0;
            const ONE: Self = 1.0;
            const PI: Self = std::$t::consts::PI;

            #[inline]
            #[allow(clippy::cast_possible_truncation)]
            fn from_f64(v: f64) -> Self {
                v as $t
            }

            #[inline]
            fn to_f64(self) -> f64 {
                f64::from(self)
            }

            #[inline]
            fn sqrt(self) -> Self {
                $t::sqrt(self)
            }

            #[inline]
            fn abs(self) -> Self {
                $t::abs(self)
            }

            #[inline]
            fn signum(self) -> Self {
                $t::signum(self)
            }

            #[inline]
            fn powf(self, n: Self) -> Self {
                $t::powf(self, n)
            }

            #[inline]
            fn powi(self, n: i32) -> Self {
                $t::powi(self, n)
            }

            #[inline]
            fn exp(self) -> Self {
                $t::exp(self)
            }

            #[inline]
            fn ln(self) -> Self {
                $t::ln(self)
            }

            #[inline]
            fn sin(self) -> Self {
                $t::sin(self)
            }

            #[inline]
            fn cos(self) -> Self {
                $t::cos(self)
            }

            #[inline]
            fn tan(self) -> Self {
                $t::tan(self)
            }

            #[inline]
            fn asin(self) -> Self {
                $t::asin(self)
            }

            #[inline]
            fn acos(self) -> Self {
                $t::acos(self)
            }

            #[inline]
            fn atan(self) -> Self {
                $t::atan(self)
            }

            #[inline]
            fn atan2(self, x: Self) -> Self {
                $t::atan2(self, x)
            }

            #[inline]
            fn is_finite(self) -> bool {
                $t::is_finite(self)
            }
        }
    };
}

impl_scalar!(f32);
impl_scalar!(f64);
