use crate::error::{Result, UncertainError};
use crate::traits::Scalar;
use crate::variable::{Dependencies, IndependentVariable};
use std::fmt::{self, Write as _};
use std::str::FromStr;

/// A quantity with first-order uncertainty.
///
/// `Uncertain` stores a mean and the partial derivatives of the quantity with respect
/// to every independent variable it depends on. The standard deviation is derived from
/// those partials and cached, which lets operations on values that share error sources
/// account for their correlation.
///
/// Values are read-only through the public API; only the compound assignment operators
/// update one in place.
///
/// # Example
/// ```rust
/// use sigma_rs::Uncertain;
///
/// let x = Uncertain::new(10.0, 1.0);
/// let y = Uncertain::new(5.0, 0.5);
/// let z = &x + &y;
///
/// assert_eq!(z.mean(), 15.0);
/// assert!((z.std() - 1.25_f64.sqrt()).abs() < 1e-12);
/// assert_eq!((&x - &x).std(), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct Uncertain<T> {
    pub(crate) mean: T,
    pub(crate) std: T,
    pub(crate) deps: Dependencies<T>,
}

/// Single precision uncertain value.
pub type UFloat = Uncertain<f32>;

/// Double precision uncertain value.
pub type UDouble = Uncertain<f64>;

impl<T: Scalar> Uncertain<T> {
    /// Creates a value driven by a fresh independent variable of standard deviation `std`.
    ///
    /// A zero `std` yields an exact constant with no dependencies.
    ///
    /// # Example
    /// ```rust
    /// use sigma_rs::Uncertain;
    ///
    /// let reading = Uncertain::new(3.0, 0.2);
    /// assert_eq!(reading.to_string(), "3+/-0.2");
    /// ```
    #[must_use]
    pub fn new(mean: T, std: T) -> Self {
        if std == T::ZERO {
            return Self::point(mean);
        }
        Self::from_variable(mean, IndependentVariable::new(std))
    }

    /// Like [`Uncertain::new`], but rejects a non-finite mean and a negative or
    /// non-finite standard deviation.
    ///
    /// # Errors
    ///
    /// Returns [`UncertainError::NonFiniteParameter`] or
    /// [`UncertainError::InvalidParameter`] for out-of-range input.
    pub fn try_new(mean: T, std: T) -> Result<Self> {
        if !mean.is_finite() {
            return Err(UncertainError::non_finite("mean", mean.to_f64()));
        }
        if !std.is_finite() {
            return Err(UncertainError::non_finite("std", std.to_f64()));
        }
        if std < T::ZERO {
            return Err(UncertainError::invalid_parameter(
                "std",
                std.to_f64(),
                "must be non-negative",
            ));
        }
        Ok(Self::new(mean, std))
    }

    /// An exact value with no uncertainty.
    #[must_use]
    pub fn point(mean: T) -> Self {
        Self {
            mean,
            std: T::ZERO,
            deps: Dependencies::default(),
        }
    }

    /// A value that moves one-for-one with a caller-owned independent variable.
    ///
    /// Values built from the same variable are fully correlated.
    #[must_use]
    pub fn from_variable(mean: T, variable: IndependentVariable<T>) -> Self {
        let deps = Dependencies::single(variable, T::ONE);
        Self {
            mean,
            std: deps.standard_deviation(),
            deps,
        }
    }

    /// The central value.
    #[must_use]
    pub fn mean(&self) -> T {
        self.mean
    }

    /// The standard deviation, `sqrt(sum_i (d_i * sigma_i)^2)` over every independent
    /// variable. Cached, so reading it is free.
    #[must_use]
    pub fn std(&self) -> T {
        self.std
    }

    /// The independent variables this value depends on and the partial derivatives
    /// with respect to each.
    #[must_use]
    pub fn dependencies(&self) -> &Dependencies<T> {
        &self.deps
    }

    /// `true` when the value carries no uncertainty at all.
    #[must_use]
    pub fn is_exact(&self) -> bool {
        self.std == T::ZERO
    }
}

impl<T: Scalar> Default for Uncertain<T> {
    fn default() -> Self {
        Self::point(T::ZERO)
    }
}

impl<T: Scalar> From<T> for Uncertain<T> {
    fn from(mean: T) -> Self {
        Self::point(mean)
    }
}

/// Renders `<mean>+/-<std>`.
///
/// A precision applies to both numbers. Width, fill and alignment apply to the whole
/// rendering, which is right-aligned by default like a plain number.
///
/// # Example
/// ```rust
/// use sigma_rs::Uncertain;
///
/// let x = Uncertain::new(3.0, 0.2);
/// assert_eq!(format!("{x:.2}"), "3.00+/-0.20");
/// assert_eq!(format!("[{x:>9}]"), "[  3+/-0.2]");
/// assert_eq!(format!("[{x:_<9}]"), "[3+/-0.2__]");
/// ```
impl<T: Scalar> fmt::Display for Uncertain<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered = match f.precision() {
            Some(precision) => format!(
                "{:.*}+/-{:.*}",
                precision, self.mean, precision, self.std
            ),
            None => format!("{}+/-{}", self.mean, self.std),
        };

        let padding = f
            .width()
            .map_or(0, |width| width.saturating_sub(rendered.chars().count()));
        let (before, after) = match f.align() {
            Some(fmt::Alignment::Left) => (0, padding),
            Some(fmt::Alignment::Center) => (padding / 2, padding - padding / 2),
            Some(fmt::Alignment::Right) | None => (padding, 0),
        };

        let fill = f.fill();
        for _ in 0..before {
            f.write_char(fill)?;
        }
        f.write_str(&rendered)?;
        for _ in 0..after {
            f.write_char(fill)?;
        }
        Ok(())
    }
}

/// Parses the `Display` form, `<mean>+/-<std>` (`±` is accepted as the separator).
///
/// The parsed value gets its own fresh independent variable, so parsing the same text
/// twice yields two uncorrelated values.
///
/// # Example
/// ```rust
/// use sigma_rs::Uncertain;
///
/// let x: Uncertain<f64> = "3+/-0.2".parse().unwrap();
/// assert_eq!(x.mean(), 3.0);
/// assert_eq!(x.std(), 0.2);
/// assert!("3 +- 0.2".parse::<Uncertain<f64>>().is_err());
/// ```
impl<T: Scalar> FromStr for Uncertain<T> {
    type Err = UncertainError;

    fn from_str(s: &str) -> Result<Self> {
        let (mean, std) = s
            .split_once("+/-")
            .or_else(|| s.split_once('±'))
            .ok_or_else(|| UncertainError::parse(s, "missing '+/-' separator"))?;
        let mean: T = mean
            .trim()
            .parse()
            .map_err(|_| UncertainError::parse(s, "invalid mean"))?;
        let std: T = std
            .trim()
            .parse()
            .map_err(|_| UncertainError::parse(s, "invalid standard deviation"))?;
        if !std.is_finite() || std < T::ZERO {
            return Err(UncertainError::parse(
                s,
                "standard deviation must be finite and non-negative",
            ));
        }
        Ok(Self::new(mean, std))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_seeds_single_dependency() {
        let x = Uncertain::new(10.0, 1.0);
        assert_eq!(x.mean(), 10.0);
        assert_eq!(x.std(), 1.0);
        assert_eq!(x.dependencies().len(), 1);
        let (var, deriv) = x.dependencies().iter().next().unwrap();
        assert_eq!(deriv, 1.0);
        assert_eq!(var.std(), 1.0);
    }

    #[test]
    fn test_zero_std_is_exact_constant() {
        let c = Uncertain::new(4.0, 0.0);
        assert!(c.dependencies().is_empty());
        assert!(c.is_exact());
        assert_eq!(c, Uncertain::point(4.0));
    }

    #[test]
    fn test_independent_constructions_are_not_equal() {
        let a = Uncertain::new(1.0, 0.1);
        let b = Uncertain::new(1.0, 0.1);
        assert_ne!(a, b);
        assert_eq!(a, a.clone());
    }

    #[test]
    fn test_negative_std_reports_magnitude() {
        let x = Uncertain::new(1.0, -0.5);
        assert_eq!(x.std(), 0.5);
    }

    #[test]
    fn test_try_new_validation() {
        assert!(Uncertain::try_new(1.0, 0.1).is_ok());
        assert_eq!(
            Uncertain::try_new(1.0, -0.1).unwrap_err(),
            UncertainError::invalid_parameter("std", -0.1, "must be non-negative")
        );
        assert!(matches!(
            Uncertain::try_new(f64::NAN, 0.1),
            Err(UncertainError::NonFiniteParameter { parameter: "mean", .. })
        ));
        assert!(matches!(
            Uncertain::try_new(0.0, f64::INFINITY),
            Err(UncertainError::NonFiniteParameter { parameter: "std", .. })
        ));
    }

    #[test]
    fn test_from_variable_shares_identity() {
        let var = IndependentVariable::new(0.3);
        let a = Uncertain::from_variable(1.0, var);
        let b = Uncertain::from_variable(7.0, var);
        assert_eq!(a.std(), 0.3);
        assert_eq!(a.dependencies(), b.dependencies());
    }

    #[test]
    fn test_default_and_from() {
        let d: UDouble = Uncertain::default();
        assert_eq!(d.mean(), 0.0);
        assert_eq!(d.std(), 0.0);
        assert_eq!(Uncertain::from(2.5_f32), UFloat::point(2.5));
    }

    #[test]
    fn test_display() {
        assert_eq!(Uncertain::new(3.0, 0.2).to_string(), "3+/-0.2");
        assert_eq!(Uncertain::new(1.0_f32, 0.5).to_string(), "1+/-0.5");
        assert_eq!(format!("{:.2}", Uncertain::new(1.23456, 0.0123)), "1.23+/-0.01");
    }

    #[test]
    fn test_display_honours_width_fill_and_alignment() {
        let x = Uncertain::new(3.0, 0.2);
        assert_eq!(format!("{x:>10}|"), "   3+/-0.2|");
        assert_eq!(format!("{x:<10}|"), "3+/-0.2   |");
        assert_eq!(format!("{x:*^11}"), "**3+/-0.2**");
        assert_eq!(format!("{x:12.2}"), " 3.00+/-0.20");
        assert_eq!(format!("{x:3}"), "3+/-0.2");
    }

    #[test]
    fn test_extreme_std_round_trips() {
        assert_eq!(UFloat::new(0.0, 1e20).std(), 1e20);
        assert_eq!(UFloat::new(0.0, 1e-25).std(), 1e-25);
        assert_eq!(UDouble::new(0.0, 1e200).std(), 1e200);
        assert_eq!(UDouble::new(0.0, 1e-200).std(), 1e-200);
    }

    #[test]
    fn test_parse_round_trips_display() {
        let x = Uncertain::new(12.5, 0.25);
        let parsed: Uncertain<f64> = x.to_string().parse().unwrap();
        assert_eq!(parsed.mean(), x.mean());
        assert_eq!(parsed.std(), x.std());
        assert_ne!(parsed, x);
    }

    #[test]
    fn test_parse_accepts_whitespace_and_plus_minus_sign() {
        let x: UFloat = " 1.5 ± 0.1 ".parse().unwrap();
        assert_eq!(x.mean(), 1.5);
        assert_eq!(x.std(), 0.1);
        let exact: UDouble = "7+/-0".parse().unwrap();
        assert!(exact.dependencies().is_empty());
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "1.0".parse::<UDouble>().unwrap_err(),
            UncertainError::parse("1.0", "missing '+/-' separator")
        );
        assert_eq!(
            "abc+/-1".parse::<UDouble>().unwrap_err(),
            UncertainError::parse("abc+/-1", "invalid mean")
        );
        assert_eq!(
            "1+/-x".parse::<UDouble>().unwrap_err(),
            UncertainError::parse("1+/-x", "invalid standard deviation")
        );
        assert!(matches!(
            "1+/--0.5".parse::<UDouble>(),
            Err(UncertainError::Parse { .. })
        ));
        assert!("1+/-inf".parse::<UDouble>().is_err());
    }
}
