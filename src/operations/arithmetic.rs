//! Arithmetic on uncertain values.
//!
//! Every binary operation computes the new mean in closed form, evaluates the two
//! partial derivatives at the operand means and merges both dependency maps scaled by
//! them. Scalar operands contribute no dependencies, so those forms only rescale the
//! uncertain operand's map.

use super::mutator::{Mutator, combine, rescale};
use crate::Uncertain;
use crate::traits::Scalar;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

fn add<T: Scalar>(a: &Uncertain<T>, b: &Uncertain<T>) -> Uncertain<T> {
    combine(a.mean + b.mean, &a.deps, T::ONE, &b.deps, T::ONE)
}

fn sub<T: Scalar>(a: &Uncertain<T>, b: &Uncertain<T>) -> Uncertain<T> {
    combine(a.mean - b.mean, &a.deps, T::ONE, &b.deps, -T::ONE)
}

fn mul<T: Scalar>(a: &Uncertain<T>, b: &Uncertain<T>) -> Uncertain<T> {
    combine(a.mean * b.mean, &a.deps, b.mean, &b.deps, a.mean)
}

/// `(y, dy/da, dy/db)` for `y = a / b`.
///
/// `dy/db` is `-y / b` so that `a / a` cancels exactly: both partials become `+-1 / b`.
fn quotient_partials<T: Scalar>(a: T, b: T) -> (T, T, T) {
    let y = a / b;
    (y, T::ONE / b, -y / b)
}

fn div<T: Scalar>(a: &Uncertain<T>, b: &Uncertain<T>) -> Uncertain<T> {
    let (mean, dyda, dydb) = quotient_partials(a.mean, b.mean);
    combine(mean, &a.deps, dyda, &b.deps, dydb)
}

/// Replaces the mean and keeps the derivatives (`dy/da == 1`).
fn shift<T: Scalar>(a: &Uncertain<T>, mean: T) -> Uncertain<T> {
    let mut result = a.clone();
    Mutator::new(&mut result).update_mean(mean);
    result
}

fn add_assign<T: Scalar>(a: &mut Uncertain<T>, b: &Uncertain<T>) {
    let mean = a.mean + b.mean;
    let mut setter = Mutator::new(a);
    setter.update_mean(mean);
    setter.merge_derivatives(&b.deps, T::ONE);
}

fn sub_assign<T: Scalar>(a: &mut Uncertain<T>, b: &Uncertain<T>) {
    let mean = a.mean - b.mean;
    let mut setter = Mutator::new(a);
    setter.update_mean(mean);
    setter.merge_derivatives(&b.deps, -T::ONE);
}

fn mul_assign<T: Scalar>(a: &mut Uncertain<T>, b: &Uncertain<T>) {
    let (dyda, dydb) = (b.mean, a.mean);
    let mean = a.mean * b.mean;
    let mut setter = Mutator::new(a);
    setter.update_mean(mean);
    setter.scale_derivatives(dyda);
    setter.merge_derivatives(&b.deps, dydb);
}

fn div_assign<T: Scalar>(a: &mut Uncertain<T>, b: &Uncertain<T>) {
    let (mean, dyda, dydb) = quotient_partials(a.mean, b.mean);
    let mut setter = Mutator::new(a);
    setter.update_mean(mean);
    setter.scale_derivatives(dyda);
    setter.merge_derivatives(&b.deps, dydb);
}

impl<T: Scalar> Neg for &Uncertain<T> {
    type Output = Uncertain<T>;

    fn neg(self) -> Self::Output {
        rescale(self, -self.mean, -T::ONE)
    }
}

impl<T: Scalar> Neg for Uncertain<T> {
    type Output = Uncertain<T>;

    fn neg(self) -> Self::Output {
        -&self
    }
}

/// Implements a value-value operator for every owned/borrowed operand combination,
/// plus the value-scalar form.
macro_rules! impl_binary_op {
    ($imp:ident, $method:ident, $core:ident, |$a:ident, $s:ident| $scalar:expr) => {
        impl<T: Scalar> $imp<&Uncertain<T>> for &Uncertain<T> {
            type Output = Uncertain<T>;

            fn $method(self, rhs: &Uncertain<T>) -> Self::Output {
                $core(self, rhs)
            }
        }

        impl<T: Scalar> $imp<Uncertain<T>> for Uncertain<T> {
            type Output = Uncertain<T>;

            fn $method(self, rhs: Uncertain<T>) -> Self::Output {
                $core(&self, &rhs)
            }
        }

        impl<T: Scalar> $imp<&Uncertain<T>> for Uncertain<T> {
            type Output = Uncertain<T>;

            fn $method(self, rhs: &Uncertain<T>) -> Self::Output {
                $core(&self, rhs)
            }
        }

        impl<T: Scalar> $imp<Uncertain<T>> for &Uncertain<T> {
            type Output = Uncertain<T>;

            fn $method(self, rhs: Uncertain<T>) -> Self::Output {
                $core(self, &rhs)
            }
        }

        impl<T: Scalar> $imp<T> for &Uncertain<T> {
            type Output = Uncertain<T>;

            fn $method(self, rhs: T) -> Self::Output {
                let ($a, $s) = (self, rhs);
                $scalar
            }
        }

        impl<T: Scalar> $imp<T> for Uncertain<T> {
            type Output = Uncertain<T>;

            fn $method(self, rhs: T) -> Self::Output {
                let ($a, $s) = (&self, rhs);
                $scalar
            }
        }
    };
}

impl_binary_op!(Add, add, add, |a, s| shift(a, a.mean + s));
impl_binary_op!(Sub, sub, sub, |a, s| shift(a, a.mean - s));
impl_binary_op!(Mul, mul, mul, |a, s| rescale(a, a.mean * s, s));
impl_binary_op!(Div, div, div, |a, s| rescale(a, a.mean / s, T::ONE / s));

/// Implements a compound assignment operator for value and scalar right-hand sides.
macro_rules! impl_assign_op {
    ($imp:ident, $method:ident, $core:ident, |$setter:ident, $mean:ident, $s:ident| $scalar:block) => {
        impl<T: Scalar> $imp<&Uncertain<T>> for Uncertain<T> {
            fn $method(&mut self, rhs: &Uncertain<T>) {
                $core(self, rhs);
            }
        }

        impl<T: Scalar> $imp<Uncertain<T>> for Uncertain<T> {
            fn $method(&mut self, rhs: Uncertain<T>) {
                $core(self, &rhs);
            }
        }

        impl<T: Scalar> $imp<T> for Uncertain<T> {
            fn $method(&mut self, rhs: T) {
                let ($mean, $s) = (self.mean, rhs);
                let mut $setter = Mutator::new(self);
                $scalar
            }
        }
    };
}

impl_assign_op!(AddAssign, add_assign, add_assign, |setter, mean, s| {
    setter.update_mean(mean + s);
});
impl_assign_op!(SubAssign, sub_assign, sub_assign, |setter, mean, s| {
    setter.update_mean(mean - s);
});
impl_assign_op!(MulAssign, mul_assign, mul_assign, |setter, mean, s| {
    setter.update_mean(mean * s);
    setter.scale_derivatives(s);
});
impl_assign_op!(DivAssign, div_assign, div_assign, |setter, mean, s| {
    setter.update_mean(mean / s);
    setter.scale_derivatives(T::ONE / s);
});

/// Scalar-on-the-left operators. Coherence rules need one impl per concrete float type.
macro_rules! impl_scalar_lhs {
    ($t:ty) => {
        impl Add<&Uncertain<$t>> for $t {
            type Output = Uncertain<$t>;

            fn add(self, rhs: &Uncertain<$t>) -> Self::Output {
                shift(rhs, self + rhs.mean)
            }
        }

        impl Sub<&Uncertain<$t>> for $t {
            type Output = Uncertain<$t>;

            fn sub(self, rhs: &Uncertain<$t>) -> Self::Output {
                rescale(rhs, self - rhs.mean, -1.0)
            }
        }

        impl Mul<&Uncertain<$t>> for $t {
            type Output = Uncertain<$t>;

            fn mul(self, rhs: &Uncertain<$t>) -> Self::Output {
                rescale(rhs, self * rhs.mean, self)
            }
        }

        impl Div<&Uncertain<$t>> for $t {
            type Output = Uncertain<$t>;

            fn div(self, rhs: &Uncertain<$t>) -> Self::Output {
                let (mean, _, dydx) = quotient_partials(self, rhs.mean);
                rescale(rhs, mean, dydx)
            }
        }

        impl Add<Uncertain<$t>> for $t {
            type Output = Uncertain<$t>;

            fn add(self, rhs: Uncertain<$t>) -> Self::Output {
                self + &rhs
            }
        }

        impl Sub<Uncertain<$t>> for $t {
            type Output = Uncertain<$t>;

            fn sub(self, rhs: Uncertain<$t>) -> Self::Output {
                self - &rhs
            }
        }

        impl Mul<Uncertain<$t>> for $t {
            type Output = Uncertain<$t>;

            fn mul(self, rhs: Uncertain<$t>) -> Self::Output {
                self * &rhs
            }
        }

        impl Div<Uncertain<$t>> for $t {
            type Output = Uncertain<$t>;

            fn div(self, rhs: Uncertain<$t>) -> Self::Output {
                self / &rhs
            }
        }
    };
}

impl_scalar_lhs!(f32);
impl_scalar_lhs!(f64);

impl<T: Scalar> Sum for Uncertain<T> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Uncertain::default(), |mut acc, x| {
            acc += &x;
            acc
        })
    }
}

impl<'a, T: Scalar> Sum<&'a Uncertain<T>> for Uncertain<T> {
    fn sum<I: Iterator<Item = &'a Uncertain<T>>>(iter: I) -> Self {
        iter.fold(Uncertain::default(), |mut acc, x| {
            acc += x;
            acc
        })
    }
}

// Power and elementary functions
impl<T: Scalar> Uncertain<T> {
    /// Raises the value to a real power.
    ///
    /// Derivatives are scaled by `exponent * mean^(exponent - 1)`. A zero mean with an
    /// exponent below one, or a negative mean with a fractional exponent, yields
    /// infinities or NaNs rather than an error.
    ///
    /// # Example
    /// ```rust
    /// use sigma_rs::Uncertain;
    ///
    /// let base: Uncertain<f64> = Uncertain::new(2.0, 0.1);
    /// let squared = base.pow(2.0);
    /// assert_eq!(squared.mean(), 4.0);
    /// assert!((squared.std() - 0.4).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn pow(&self, exponent: T) -> Uncertain<T> {
        let dydx = exponent * self.mean.powf(exponent - T::ONE);
        rescale(self, self.mean.powf(exponent), dydx)
    }

    /// Raises the value to an integer power.
    #[must_use]
    pub fn powi(&self, n: i32) -> Uncertain<T> {
        let dydx = T::from_f64(f64::from(n)) * self.mean.powi(n - 1);
        rescale(self, self.mean.powi(n), dydx)
    }

    /// Square root; `d/dx = 1 / (2 sqrt(x))`.
    #[must_use]
    pub fn sqrt(&self) -> Uncertain<T> {
        let root = self.mean.sqrt();
        rescale(self, root, T::ONE / (T::from_f64(2.0) * root))
    }

    /// Natural exponential; `d/dx = exp(x)`.
    #[must_use]
    pub fn exp(&self) -> Uncertain<T> {
        let e = self.mean.exp();
        rescale(self, e, e)
    }

    /// Natural logarithm; `d/dx = 1 / x`.
    #[must_use]
    pub fn ln(&self) -> Uncertain<T> {
        rescale(self, self.mean.ln(), T::ONE / self.mean)
    }

    /// Absolute value; derivatives are multiplied by the sign of the mean
    /// (`+1` at zero).
    #[must_use]
    pub fn abs(&self) -> Uncertain<T> {
        rescale(self, self.mean.abs(), self.mean.signum())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_addition() {
        let x = Uncertain::new(10.0, 1.0);
        let y = Uncertain::new(5.0, 0.5);
        let z = &x + &y;
        assert_eq!(z.mean(), 15.0);
        assert_relative_eq!(z.std(), (1.0_f64 + 0.25).sqrt());
    }

    #[test]
    fn test_self_subtraction_cancels() {
        let x = Uncertain::new(3.0, 0.7);
        let d = &x - &x;
        assert_eq!(d.mean(), 0.0);
        assert_eq!(d.std(), 0.0);
    }

    #[test]
    fn test_self_division_cancels() {
        for m in [0.1, 0.7, 1.1, 3.0, 7.3, 1e-3, 123.456, -42.0] {
            let x = Uncertain::new(m, 0.5);
            let q = &x / &x;
            assert_eq!(q.mean(), 1.0, "mean {m}");
            assert_eq!(q.std(), 0.0, "mean {m}");

            let mut in_place = x.clone();
            in_place /= x.clone();
            assert_eq!(in_place.std(), 0.0, "mean {m}");
        }
    }

    #[test]
    fn test_scalar_numerator_matches_exact_operand() {
        for m in [0.1, 3.0, -7.3] {
            let x = Uncertain::new(m, 0.2);
            assert_eq!(8.0 / &x, Uncertain::point(8.0) / &x);
        }
    }

    #[test]
    fn test_square_adds_linearly() {
        let x = Uncertain::new(2.0, 0.1);
        let w = &x * &x;
        assert_eq!(w.mean(), 4.0);
        assert_relative_eq!(w.std(), 0.4, epsilon = 1e-15);
    }

    #[test]
    fn test_division_partials() {
        let a = Uncertain::new(6.0, 0.3);
        let b = Uncertain::new(3.0, 0.0);
        let q = &a / &b;
        assert_eq!(q.mean(), 2.0);
        assert_relative_eq!(q.std(), 0.1, epsilon = 1e-15);

        let b = Uncertain::new(3.0, 0.3);
        let q = Uncertain::point(6.0) / &b;
        // |d/db| = 6 / 9
        assert_relative_eq!(q.std(), 0.3 * 6.0 / 9.0, epsilon = 1e-15);
    }

    #[test]
    fn test_division_by_zero_mean_propagates() {
        let a: Uncertain<f64> = Uncertain::new(1.0, 0.1);
        let b = Uncertain::new(0.0, 0.1);
        let q = &a / &b;
        assert!(q.mean().is_infinite());
        assert!(!q.std().is_finite());
    }

    #[test]
    fn test_scalar_forms() {
        let x: Uncertain<f64> = Uncertain::new(4.0, 0.2);
        assert_relative_eq!((&x * -3.0).std(), 0.6, epsilon = 1e-15);
        assert_eq!((&x * -3.0).mean(), -12.0);
        assert_eq!((-3.0 * &x), (&x * -3.0));
        assert_eq!((&x / 2.0).mean(), 2.0);
        assert_relative_eq!((&x / 2.0).std(), 0.1);
        assert_eq!((8.0 / &x).mean(), 2.0);
        assert_relative_eq!((8.0 / &x).std(), 0.2 * 8.0 / 16.0);
        assert_eq!((&x + 1.0).std(), x.std());
        assert_eq!((1.0 - &x).mean(), -3.0);
        assert_eq!((1.0 - &x).std(), x.std());
        assert_eq!((1.0 + &x).mean(), 5.0);
        assert_eq!((&x - 1.0).mean(), 3.0);
    }

    #[test]
    fn test_negation() {
        let x = Uncertain::new(2.0, 0.5);
        let n = -&x;
        assert_eq!(n.mean(), -2.0);
        assert_eq!(n.std(), 0.5);
        assert_eq!(-n, x);
    }

    #[test]
    fn test_compound_assignment_matches_binary() {
        let a = Uncertain::new(2.0, 0.3);
        let b = Uncertain::new(-5.0, 0.4);
        let shared = &a * 2.0 + &b;

        let mut sum = a.clone();
        sum += &shared;
        assert_eq!(sum, &a + &shared);

        let mut diff = a.clone();
        diff -= &shared;
        assert_eq!(diff, &a - &shared);

        let mut prod = a.clone();
        prod *= &shared;
        assert_eq!(prod, &a * &shared);

        let mut quot = a.clone();
        quot /= shared.clone();
        assert_eq!(quot, &a / &shared);
    }

    #[test]
    fn test_scalar_compound_assignment() {
        let a = Uncertain::new(2.0, 0.3);
        let mut m = a.clone();
        m *= 4.0;
        assert_eq!(m, &a * 4.0);
        m /= 4.0;
        assert_eq!(m, &(&a * 4.0) / 4.0);
        let mut s = a.clone();
        s += 1.5;
        s -= 0.5;
        assert_eq!(s.mean(), 3.0);
        assert_eq!(s.std(), a.std());
    }

    #[test]
    fn test_sum() {
        let parts = vec![
            Uncertain::new(1.0, 0.3),
            Uncertain::new(2.0, 0.4),
            Uncertain::point(3.0),
        ];
        let total: Uncertain<f64> = parts.iter().sum();
        assert_eq!(total.mean(), 6.0);
        assert_relative_eq!(total.std(), 0.5, epsilon = 1e-15);
        let owned: Uncertain<f64> = parts.into_iter().sum();
        assert_eq!(owned, total);
    }

    #[test]
    fn test_pow() {
        let x = Uncertain::new(3.0, 0.1);
        let cube = x.pow(3.0);
        assert_relative_eq!(cube.mean(), 27.0, epsilon = 1e-12);
        assert_relative_eq!(cube.std(), 27.0 * 0.1, epsilon = 1e-12);
        assert_eq!(x.powi(3).mean(), 27.0);
        assert_relative_eq!(x.powi(3).std(), 2.7, epsilon = 1e-12);
    }

    #[test]
    fn test_pow_of_zero_mean_is_unguarded() {
        let x: Uncertain<f64> = Uncertain::new(0.0, 0.1);
        let root = x.pow(0.5);
        assert_eq!(root.mean(), 0.0);
        assert!(root.std().is_infinite());
    }

    #[test]
    fn test_elementary_functions() {
        let x = Uncertain::new(4.0, 0.4);
        assert_eq!(x.sqrt().mean(), 2.0);
        assert_relative_eq!(x.sqrt().std(), 0.1, epsilon = 1e-15);

        let y = Uncertain::new(0.0, 0.01);
        assert_eq!(y.exp().mean(), 1.0);
        assert_relative_eq!(y.exp().std(), 0.01);

        let z = Uncertain::new(2.0, 0.2);
        assert_relative_eq!(z.ln().std(), 0.1, epsilon = 1e-15);

        let n = Uncertain::new(-2.0, 0.2);
        assert_eq!(n.abs().mean(), 2.0);
        assert_eq!(n.abs().std(), 0.2);
        assert_eq!(n.abs().dependencies().iter().next().map(|(_, d)| d), Some(-1.0));
    }

    #[test]
    fn test_single_precision() {
        let x = Uncertain::new(2.0_f32, 0.1);
        let y = Uncertain::new(1.0_f32, 0.2);
        let z = &x * &y + 1.0;
        assert_eq!(z.mean(), 3.0);
        assert_relative_eq!(z.std(), (0.01_f32 + 0.16).sqrt(), epsilon = 1e-6);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn compound_assignment_equivalence(
            m1 in -1e3_f64..1e3,
            s1 in 0.0_f64..10.0,
            m2 in -1e3_f64..1e3,
            s2 in 0.0_f64..10.0,
        ) {
            let a = Uncertain::new(m1, s1);
            let b = Uncertain::new(m2, s2) + &a;
            prop_assume!(b.mean().abs() > 1e-6);

            let mut x = a.clone();
            x += &b;
            prop_assert_eq!(&x, &(&a + &b));

            let mut x = a.clone();
            x -= &b;
            prop_assert_eq!(&x, &(&a - &b));

            let mut x = a.clone();
            x *= &b;
            prop_assert_eq!(&x, &(&a * &b));

            let mut x = a.clone();
            x /= &b;
            prop_assert_eq!(&x, &(&a / &b));
        }

        #[test]
        fn scaling_law(m in -1e3_f64..1e3, s in 0.0_f64..10.0, k in -1e3_f64..1e3) {
            let a = Uncertain::new(m, s);
            let scaled = &a * k;
            let expected = k.abs() * a.std();
            prop_assert!((scaled.std() - expected).abs() <= 1e-12 * expected.max(1.0));
        }

        #[test]
        fn disjoint_sources_add_in_quadrature(
            m1 in -1e3_f64..1e3, s1 in 0.0_f64..10.0,
            m2 in -1e3_f64..1e3, s2 in 0.0_f64..10.0,
        ) {
            let a = Uncertain::new(m1, s1);
            let b = Uncertain::new(m2, s2);
            let expected = (s1 * s1 + s2 * s2).sqrt();
            prop_assert!(((&a + &b).std() - expected).abs() <= 1e-12 * expected.max(1.0));
        }

        #[test]
        fn negation_is_involutive(m in -1e6_f64..1e6, s in 0.0_f64..100.0) {
            let a = Uncertain::new(m, s);
            prop_assert_eq!(-(-&a), a);
        }

        #[test]
        fn self_division_is_exact(
            m in prop::num::f64::NORMAL,
            s in prop::num::f64::POSITIVE | prop::num::f64::NORMAL | prop::num::f64::SUBNORMAL,
        ) {
            let a = Uncertain::new(m, s);
            let q = &a / &a;
            prop_assert_eq!(q.mean(), 1.0);
            prop_assert_eq!(q.std(), 0.0);
        }

        #[test]
        fn self_division_is_exact_single_precision(
            m in prop::num::f32::NORMAL,
            s in prop::num::f32::POSITIVE | prop::num::f32::NORMAL | prop::num::f32::SUBNORMAL,
        ) {
            let a = Uncertain::new(m, s);
            let q = &a / &a;
            prop_assert_eq!(q.mean(), 1.0);
            prop_assert_eq!(q.std(), 0.0);
        }

        #[test]
        fn self_subtraction_is_exact(m in -1e6_f64..1e6, s in 0.0_f64..100.0) {
            let a = Uncertain::new(m, s);
            let d = &a - &a;
            prop_assert_eq!(d.mean(), 0.0);
            prop_assert_eq!(d.std(), 0.0);
        }
    }
}
