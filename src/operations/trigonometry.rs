//! Trigonometric functions of uncertain values.
//!
//! Each unary function maps the mean and scales every partial derivative by the
//! function's derivative at the mean. Out-of-domain inputs (for example `asin` of a
//! mean above one) produce NaN, which then propagates into the standard deviation.

use super::mutator::{combine, rescale};
use crate::Uncertain;
use crate::traits::Scalar;

impl<T: Scalar> Uncertain<T> {
    /// Sine; `d/dx = cos(x)`.
    ///
    /// # Example
    /// ```rust
    /// use sigma_rs::Uncertain;
    ///
    /// let angle: Uncertain<f64> = Uncertain::new(0.0, 0.01);
    /// let s = angle.sin();
    /// assert_eq!(s.mean(), 0.0);
    /// assert!((s.std() - 0.01).abs() < 1e-15);
    /// ```
    #[must_use]
    pub fn sin(&self) -> Uncertain<T> {
        rescale(self, self.mean.sin(), self.mean.cos())
    }

    /// Cosine; `d/dx = -sin(x)`.
    #[must_use]
    pub fn cos(&self) -> Uncertain<T> {
        rescale(self, self.mean.cos(), -self.mean.sin())
    }

    /// Tangent; `d/dx = 1 / cos^2(x)`.
    #[must_use]
    pub fn tan(&self) -> Uncertain<T> {
        let c = self.mean.cos();
        rescale(self, self.mean.tan(), T::ONE / (c * c))
    }

    /// Arcsine; `d/dx = 1 / sqrt(1 - x^2)`.
    #[must_use]
    pub fn asin(&self) -> Uncertain<T> {
        let dydx = T::ONE / (T::ONE - self.mean * self.mean).sqrt();
        rescale(self, self.mean.asin(), dydx)
    }

    /// Arccosine; `d/dx = -1 / sqrt(1 - x^2)`.
    #[must_use]
    pub fn acos(&self) -> Uncertain<T> {
        let dydx = -T::ONE / (T::ONE - self.mean * self.mean).sqrt();
        rescale(self, self.mean.acos(), dydx)
    }

    /// Arctangent; `d/dx = 1 / (1 + x^2)`.
    #[must_use]
    pub fn atan(&self) -> Uncertain<T> {
        let dydx = T::ONE / (T::ONE + self.mean * self.mean);
        rescale(self, self.mean.atan(), dydx)
    }

    /// Converts an angle in radians to degrees.
    #[must_use]
    pub fn to_degrees(&self) -> Uncertain<T> {
        self * (T::from_f64(180.0) / T::PI)
    }

    /// Converts an angle in degrees to radians.
    #[must_use]
    pub fn to_radians(&self) -> Uncertain<T> {
        self * (T::PI / T::from_f64(180.0))
    }
}

/// Two-argument arctangent, `atan2(self, x)`, for any mix of uncertain and exact
/// operands. An exact operand contributes no dependencies.
pub trait Atan2<X> {
    type Output;

    fn atan2(self, x: X) -> Self::Output;
}

/// `(d/dy, d/dx)` of `atan2(y, x)`.
fn atan2_partials<T: Scalar>(y: T, x: T) -> (T, T) {
    let r2 = x * x + y * y;
    (x / r2, -y / r2)
}

impl<T: Scalar> Atan2<&Uncertain<T>> for &Uncertain<T> {
    type Output = Uncertain<T>;

    fn atan2(self, x: &Uncertain<T>) -> Self::Output {
        let (dy, dx) = atan2_partials(self.mean, x.mean);
        combine(self.mean.atan2(x.mean), &self.deps, dy, &x.deps, dx)
    }
}

impl<T: Scalar> Atan2<T> for &Uncertain<T> {
    type Output = Uncertain<T>;

    fn atan2(self, x: T) -> Self::Output {
        let (dy, _) = atan2_partials(self.mean, x);
        rescale(self, self.mean.atan2(x), dy)
    }
}

impl<T: Scalar> Atan2<Uncertain<T>> for Uncertain<T> {
    type Output = Uncertain<T>;

    fn atan2(self, x: Uncertain<T>) -> Self::Output {
        (&self).atan2(&x)
    }
}

impl<T: Scalar> Atan2<&Uncertain<T>> for Uncertain<T> {
    type Output = Uncertain<T>;

    fn atan2(self, x: &Uncertain<T>) -> Self::Output {
        (&self).atan2(x)
    }
}

impl<T: Scalar> Atan2<Uncertain<T>> for &Uncertain<T> {
    type Output = Uncertain<T>;

    fn atan2(self, x: Uncertain<T>) -> Self::Output {
        self.atan2(&x)
    }
}

impl<T: Scalar> Atan2<T> for Uncertain<T> {
    type Output = Uncertain<T>;

    fn atan2(self, x: T) -> Self::Output {
        (&self).atan2(x)
    }
}

macro_rules! impl_atan2_scalar_y {
    ($t:ty) => {
        impl Atan2<&Uncertain<$t>> for $t {
            type Output = Uncertain<$t>;

            fn atan2(self, x: &Uncertain<$t>) -> Self::Output {
                let (_, dx) = atan2_partials(self, x.mean);
                rescale(x, Scalar::atan2(self, x.mean), dx)
            }
        }

        impl Atan2<Uncertain<$t>> for $t {
            type Output = Uncertain<$t>;

            fn atan2(self, x: Uncertain<$t>) -> Self::Output {
                Atan2::atan2(self, &x)
            }
        }
    };
}

impl_atan2_scalar_y!(f32);
impl_atan2_scalar_y!(f64);

/// Sine of `a`.
#[must_use]
pub fn sin<T: Scalar>(a: &Uncertain<T>) -> Uncertain<T> {
    a.sin()
}

/// Cosine of `a`.
#[must_use]
pub fn cos<T: Scalar>(a: &Uncertain<T>) -> Uncertain<T> {
    a.cos()
}

/// Tangent of `a`.
#[must_use]
pub fn tan<T: Scalar>(a: &Uncertain<T>) -> Uncertain<T> {
    a.tan()
}

/// Arcsine of `a`.
#[must_use]
pub fn asin<T: Scalar>(a: &Uncertain<T>) -> Uncertain<T> {
    a.asin()
}

/// Arccosine of `a`.
#[must_use]
pub fn acos<T: Scalar>(a: &Uncertain<T>) -> Uncertain<T> {
    a.acos()
}

/// Arctangent of `a`.
#[must_use]
pub fn atan<T: Scalar>(a: &Uncertain<T>) -> Uncertain<T> {
    a.atan()
}

/// Two-argument arctangent of `y / x`, with either side uncertain or exact.
///
/// # Example
/// ```rust
/// use sigma_rs::{Uncertain, trig};
///
/// let y: Uncertain<f64> = Uncertain::new(1.0, 0.1);
/// let x: Uncertain<f64> = Uncertain::new(1.0, 0.1);
///
/// let both = trig::atan2(&y, &x);
/// let exact_x = trig::atan2(&y, 1.0);
/// let exact_y = trig::atan2(1.0, &x);
///
/// assert!(both.std() > exact_x.std());
/// assert_eq!(exact_x.std(), exact_y.std());
/// ```
#[must_use]
pub fn atan2<Y, X>(y: Y, x: X) -> Y::Output
where
    Y: Atan2<X>,
{
    y.atan2(x)
}

/// Radians to degrees.
#[must_use]
pub fn degrees<T: Scalar>(a: &Uncertain<T>) -> Uncertain<T> {
    a.to_degrees()
}

/// Degrees to radians.
#[must_use]
pub fn radians<T: Scalar>(a: &Uncertain<T>) -> Uncertain<T> {
    a.to_radians()
}
