//! Second-moment statistics derived from the dependency map.
//!
//! Everything here is computed in closed form from the partial derivatives and the
//! standard deviations of the independent variables; no sampling is involved.

use crate::Uncertain;
use crate::traits::Scalar;
use crate::variable::IndependentVariable;

/// Statistical analysis methods for uncertain values
impl<T: Scalar> Uncertain<T> {
    /// The variance, `std^2`.
    #[must_use]
    pub fn variance(&self) -> T {
        self.std * self.std
    }

    /// Standard deviation relative to the magnitude of the mean.
    ///
    /// Infinite (or NaN) for a zero mean.
    #[must_use]
    pub fn relative_std(&self) -> T {
        self.std / self.mean.abs()
    }

    /// Covariance with `other`: the sum over shared independent variables of
    /// `d_self * d_other * sigma^2`. Values with disjoint sources have zero covariance.
    ///
    /// # Example
    /// ```rust
    /// use sigma_rs::Uncertain;
    ///
    /// let x: Uncertain<f64> = Uncertain::new(1.0, 0.5);
    /// let y = &x * 2.0;
    /// assert!((x.covariance(&y) - 0.5).abs() < 1e-12);
    /// assert_eq!(x.covariance(&Uncertain::new(1.0, 0.5)), 0.0);
    /// ```
    #[must_use]
    pub fn covariance(&self, other: &Uncertain<T>) -> T {
        self.deps
            .iter()
            .filter_map(|(var, d_self)| {
                other.deps.get(var).map(|d_other| {
                    let sigma = var.std();
                    d_self * d_other * sigma * sigma
                })
            })
            .fold(T::ZERO, |acc, term| acc + term)
    }

    /// Pearson correlation coefficient with `other`, in `[-1, 1]`.
    ///
    /// Zero when either value is exact.
    ///
    /// # Example
    /// ```rust
    /// use sigma_rs::Uncertain;
    ///
    /// let x: Uncertain<f64> = Uncertain::new(1.0, 0.5);
    /// assert!((x.correlation(&-&x) + 1.0).abs() < 1e-12);
    /// ```
    #[must_use]
    pub fn correlation(&self, other: &Uncertain<T>) -> T {
        let denom = self.std * other.std;
        if denom == T::ZERO {
            return T::ZERO;
        }
        self.covariance(other) / denom
    }

    /// The error budget: each independent variable paired with the magnitude of its
    /// contribution `|d_i * sigma_i|` to the standard deviation, in variable creation
    /// order. The squares of the contributions sum to the variance.
    #[must_use]
    pub fn contributions(&self) -> Vec<(IndependentVariable<T>, T)> {
        self.deps
            .iter()
            .map(|(var, deriv)| (*var, (deriv * var.std()).abs()))
            .collect()
    }

    /// The interval `mean -/+ z * std`.
    ///
    /// # Example
    /// ```rust
    /// use sigma_rs::Uncertain;
    ///
    /// let x = Uncertain::new(10.0, 2.0);
    /// assert_eq!(x.confidence_interval(1.96), (10.0 - 3.92, 10.0 + 3.92));
    /// ```
    #[must_use]
    pub fn confidence_interval(&self, z: T) -> (T, T) {
        let half_width = z * self.std;
        (self.mean - half_width, self.mean + half_width)
    }

    /// Separation between the two means in units of the standard deviation of their
    /// difference. Shared error sources are accounted for.
    #[must_use]
    pub fn z_score(&self, other: &Uncertain<T>) -> T {
        let diff = self - other;
        diff.mean / diff.std
    }
}
