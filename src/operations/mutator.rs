use crate::Uncertain;
use crate::traits::Scalar;
use crate::variable::Dependencies;

/// Write access to the mean and derivatives of one [`Uncertain`] value.
///
/// Only the operation layer builds these. Updates are applied in call order and the
/// standard deviation is recomputed once, when the mutator is dropped.
pub(crate) struct Mutator<'a, T: Scalar> {
    target: &'a mut Uncertain<T>,
}

impl<'a, T: Scalar> Mutator<'a, T> {
    pub(crate) fn new(target: &'a mut Uncertain<T>) -> Self {
        Self { target }
    }

    pub(crate) fn update_mean(&mut self, mean: T) {
        self.target.mean = mean;
    }

    /// Multiplies every existing partial derivative by `factor`.
    pub(crate) fn scale_derivatives(&mut self, factor: T) {
        self.target.deps.scale(factor);
    }

    /// Chain rule step: adds `dydx * d_i` for every `(var_i, d_i)` in `deps`.
    pub(crate) fn merge_derivatives(&mut self, deps: &Dependencies<T>, dydx: T) {
        self.target.deps.merge(deps, dydx);
    }

    /// Forgets the bound value's own dependencies, for building a fresh result.
    pub(crate) fn clear_derivatives(&mut self) {
        self.target.deps.clear();
    }
}

impl<T: Scalar> Drop for Mutator<'_, T> {
    fn drop(&mut self) {
        let std = self.target.deps.standard_deviation();
        if !std.is_finite() {
            tracing::debug!(
                mean = %self.target.mean,
                std = %std,
                "propagated standard deviation is not finite"
            );
        }
        self.target.std = std;
    }
}

/// Builds a fresh value from two operands: `mean`, plus `dyda * deps(a) + dydb * deps(b)`.
pub(crate) fn combine<T: Scalar>(
    mean: T,
    a: &Dependencies<T>,
    dyda: T,
    b: &Dependencies<T>,
    dydb: T,
) -> Uncertain<T> {
    let mut result = Uncertain::point(mean);
    {
        let mut setter = Mutator::new(&mut result);
        setter.clear_derivatives();
        setter.merge_derivatives(a, dyda);
        setter.merge_derivatives(b, dydb);
    }
    result
}

/// Copies `source`, replaces its mean and scales its derivatives by `dydx`.
pub(crate) fn rescale<T: Scalar>(source: &Uncertain<T>, mean: T, dydx: T) -> Uncertain<T> {
    let mut result = source.clone();
    {
        let mut setter = Mutator::new(&mut result);
        setter.update_mean(mean);
        setter.scale_derivatives(dydx);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IndependentVariable;

    #[test]
    fn test_std_recomputed_on_drop() {
        let mut x = Uncertain::new(1.0, 0.5);
        {
            let mut setter = Mutator::new(&mut x);
            setter.scale_derivatives(4.0);
            setter.update_mean(2.0);
        }
        assert_eq!(x.mean(), 2.0);
        assert_eq!(x.std(), 2.0);
    }

    #[test]
    fn test_clear_then_merge_builds_fresh_map() {
        let var = IndependentVariable::new(1.0);
        let source = Uncertain::from_variable(0.0, var);
        let mut y = Uncertain::new(5.0, 3.0);
        {
            let mut setter = Mutator::new(&mut y);
            setter.clear_derivatives();
            setter.merge_derivatives(source.dependencies(), 2.0);
        }
        assert_eq!(y.dependencies().len(), 1);
        assert_eq!(y.dependencies().get(&var), Some(2.0));
        assert_eq!(y.std(), 2.0);
        assert_eq!(y.mean(), 5.0);
    }

    #[test]
    fn test_combine_adds_shared_contributions() {
        let x = Uncertain::new(2.0, 0.1);
        let w = combine(4.0, x.dependencies(), 2.0, x.dependencies(), 2.0);
        assert_eq!(w.dependencies().len(), 1);
        assert!((w.std() - 0.4).abs() < 1e-15);
    }

    #[test]
    fn test_rescale_leaves_source_untouched() {
        let x = Uncertain::new(1.0, 1.0);
        let y = rescale(&x, -1.0, -1.0);
        assert_eq!(x.mean(), 1.0);
        assert_eq!(y.mean(), -1.0);
        assert_eq!(y.std(), 1.0);
    }
}
