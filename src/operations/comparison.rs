#![allow(clippy::float_cmp)]

use crate::Uncertain;
use crate::traits::Scalar;

/// Exact equality: same mean, same standard deviation and the same partial derivative
/// for the same set of independent variables.
///
/// Floats are compared with IEEE `==`, never with a tolerance. Two values built by
/// separate calls to [`Uncertain::new`] are never equal unless both are exact, because
/// they depend on different independent variables.
///
/// # Example
/// ```rust
/// use sigma_rs::Uncertain;
///
/// let a = Uncertain::new(1.0, 0.1);
/// let b = Uncertain::new(1.0, 0.1);
///
/// assert_eq!(a, a.clone());
/// assert_ne!(a, b);
/// ```
impl<T: Scalar> PartialEq for Uncertain<T> {
    fn eq(&self, other: &Self) -> bool {
        self.mean == other.mean && self.std == other.std && self.deps == other.deps
    }
}

impl<T: Scalar> Uncertain<T> {
    /// `true` when both values depend on exactly the same independent variables,
    /// ignoring means and derivative magnitudes.
    #[must_use]
    pub fn shares_sources_with(&self, other: &Self) -> bool {
        self.deps.len() == other.deps.len()
            && self
                .deps
                .variables()
                .zip(other.deps.variables())
                .all(|(a, b)| a == b)
    }

    /// `true` when the two values have at least one independent variable in common,
    /// and are therefore (potentially) correlated.
    #[must_use]
    pub fn is_correlated_with(&self, other: &Self) -> bool {
        self.deps.variables().any(|var| other.deps.contains(var))
    }
}
