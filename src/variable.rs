//! Independent variables and the dependency map that links derived values to them.
//!
//! An [`IndependentVariable`] is a root source of error: a standard deviation plus a
//! process-unique [`VariableId`]. Uncertain values never point at each other; each one
//! holds a flattened [`Dependencies`] map from the independent variables it ultimately
//! depends on to the partial derivative with respect to each of them.

use crate::traits::Scalar;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

static NEXT_VARIABLE_ID: AtomicU64 = AtomicU64::new(0);

/// Stable identity of an independent variable.
///
/// Identifiers are handed out in increasing order, so sorting by id sorts by creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariableId(u64);

impl VariableId {
    fn next() -> Self {
        Self(NEXT_VARIABLE_ID.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// The raw integer behind this handle.
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

/// An uncorrelated elementary source of error.
///
/// The handle is `Copy`: any number of uncertain values can depend on the same
/// variable. Two handles are equal only when they come from the same call to
/// [`IndependentVariable::new`], regardless of their standard deviations.
///
/// # Example
/// ```rust
/// use sigma_rs::{IndependentVariable, Uncertain};
///
/// let calibration = IndependentVariable::new(0.05);
/// let a = Uncertain::from_variable(1.0, calibration);
/// let b = Uncertain::from_variable(2.0, calibration);
///
/// // Both readings share the same calibration error, so it cancels here.
/// assert_eq!((b - a).std(), 0.0);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct IndependentVariable<T> {
    id: VariableId,
    std: T,
}

impl<T: Scalar> IndependentVariable<T> {
    /// Mints a new independent variable with the given standard deviation.
    #[must_use]
    pub fn new(std: T) -> Self {
        let id = VariableId::next();
        tracing::trace!(id = id.get(), std = %std, "new independent variable");
        Self { id, std }
    }

    /// The identity used as the dependency map key.
    #[must_use]
    pub fn id(&self) -> VariableId {
        self.id
    }

    /// The fixed standard deviation of this source.
    #[must_use]
    pub fn std(&self) -> T {
        self.std
    }
}

impl<T> PartialEq for IndependentVariable<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for IndependentVariable<T> {}

impl<T> PartialOrd for IndependentVariable<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for IndependentVariable<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.id.cmp(&other.id)
    }
}

impl<T> Hash for IndependentVariable<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Read-only map from independent variable to partial derivative.
///
/// Iteration follows variable creation order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dependencies<T> {
    entries: BTreeMap<IndependentVariable<T>, T>,
}

impl<T> Default for Dependencies<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T: Scalar> Dependencies<T> {
    pub(crate) fn single(variable: IndependentVariable<T>, derivative: T) -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(variable, derivative);
        Self { entries }
    }

    /// Number of independent variables this value depends on.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` for an exact constant.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Partial derivative with respect to `variable`, if it is a dependency.
    #[must_use]
    pub fn get(&self, variable: &IndependentVariable<T>) -> Option<T> {
        self.entries.get(variable).copied()
    }

    /// `true` when `variable` appears in the map, even with a zero derivative.
    #[must_use]
    pub fn contains(&self, variable: &IndependentVariable<T>) -> bool {
        self.entries.contains_key(variable)
    }

    /// Iterates `(variable, derivative)` pairs in variable creation order.
    pub fn iter(&self) -> impl Iterator<Item = (&IndependentVariable<T>, T)> + '_ {
        self.entries.iter().map(|(var, deriv)| (var, *deriv))
    }

    /// The independent variables, in creation order.
    pub fn variables(&self) -> impl Iterator<Item = &IndependentVariable<T>> + '_ {
        self.entries.keys()
    }

    /// `sqrt(sum_i (d_i * sigma_i)^2)`, evaluated as `m * sqrt(sum_i (t_i / m)^2)` with
    /// `m` the largest `|t_i|`, so the squares neither overflow nor underflow before
    /// the result does.
    pub(crate) fn standard_deviation(&self) -> T {
        let mut largest = T::ZERO;
        for (var, deriv) in &self.entries {
            let term = (*deriv * var.std()).abs();
            if !term.is_finite() {
                return self.unscaled_quadrature_sum();
            }
            if term > largest {
                largest = term;
            }
        }
        if largest == T::ZERO {
            return T::ZERO;
        }
        let sum = self.entries.iter().fold(T::ZERO, |acc, (var, deriv)| {
            let ratio = *deriv * var.std() / largest;
            acc + ratio * ratio
        });
        sum.sqrt() * largest
    }

    // Infinite and NaN terms propagate as IEEE arithmetic dictates.
    fn unscaled_quadrature_sum(&self) -> T {
        self.entries
            .iter()
            .fold(T::ZERO, |acc, (var, deriv)| {
                let term = *deriv * var.std();
                acc + term * term
            })
            .sqrt()
    }

    pub(crate) fn scale(&mut self, factor: T) {
        for deriv in self.entries.values_mut() {
            *deriv *= factor;
        }
    }

    pub(crate) fn merge(&mut self, other: &Self, dydx: T) {
        for (var, deriv) in &other.entries {
            match self.entries.entry(*var) {
                btree_map::Entry::Occupied(mut slot) => *slot.get_mut() += dydx * *deriv,
                btree_map::Entry::Vacant(slot) => {
                    slot.insert(T::ZERO + dydx * *deriv);
                }
            }
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<'a, T: Scalar> IntoIterator for &'a Dependencies<T> {
    type Item = (&'a IndependentVariable<T>, &'a T);
    type IntoIter = btree_map::Iter<'a, IndependentVariable<T>, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
