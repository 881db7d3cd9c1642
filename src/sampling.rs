#![allow(clippy::cast_precision_loss)]

//! Monte Carlo draws from the linearized Gaussian model.
//!
//! A sample of an uncertain value is `mean + sum_i d_i * sigma_i * z_i`, where each
//! `z_i` is a standard normal draw for independent variable `i`. A [`SampleContext`]
//! memoizes one draw per variable so that several values sampled through the same
//! context see the same `z_i`, which reproduces their correlation.

use crate::Uncertain;
use crate::error::{Result, UncertainError};
use crate::traits::Scalar;
use crate::variable::VariableId;
use rand::Rng;
use rand::rngs::ThreadRng;
use std::collections::HashMap;
use std::f64::consts::PI;

/// Memoized standard normal draws, one per independent variable.
pub struct SampleContext<R> {
    rng: R,
    draws: HashMap<VariableId, f64>,
}

impl SampleContext<ThreadRng> {
    /// A context drawing from the thread-local generator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(rand::rng())
    }
}

impl Default for SampleContext<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> SampleContext<R> {
    /// A context drawing from `rng`; pass a seeded generator for reproducible runs.
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            draws: HashMap::new(),
        }
    }

    /// The standard normal draw for `id`, generated on first use.
    pub fn standard_normal(&mut self, id: VariableId) -> f64 {
        let rng = &mut self.rng;
        *self.draws.entry(id).or_insert_with(|| box_muller(rng))
    }

    /// Forget every memoized draw, starting a new joint realization.
    pub fn clear(&mut self) {
        self.draws.clear();
    }

    /// Get the number of memoized draws
    #[must_use]
    pub fn len(&self) -> usize {
        self.draws.len()
    }

    /// Check if the context is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }
}

fn box_muller<R: Rng>(rng: &mut R) -> f64 {
    // Keep u1 away from zero so ln(u1) stays finite.
    let u1: f64 = rng.random::<f64>().max(f64::MIN_POSITIVE);
    let u2: f64 = rng.random::<f64>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

fn check_count(count: usize) -> Result<()> {
    if count == 0 {
        return Err(UncertainError::invalid_sample_count(
            count,
            "must be greater than zero",
        ));
    }
    Ok(())
}

impl<T: Scalar> Uncertain<T> {
    /// Draws one sample, reusing (or creating) the context's draw for every
    /// independent variable this value depends on.
    ///
    /// # Example
    /// ```rust
    /// use sigma_rs::Uncertain;
    /// use sigma_rs::sampling::SampleContext;
    ///
    /// let x: Uncertain<f64> = Uncertain::new(1.0, 0.1);
    /// let y = &x * 3.0;
    ///
    /// let mut context = SampleContext::new();
    /// let (sx, sy) = (x.sample_with(&mut context), y.sample_with(&mut context));
    /// assert!((sy - 3.0 * sx).abs() < 1e-12);
    /// ```
    pub fn sample_with<R: Rng>(&self, context: &mut SampleContext<R>) -> T {
        let offset = self
            .deps
            .iter()
            .map(|(var, deriv)| {
                deriv.to_f64() * var.std().to_f64() * context.standard_normal(var.id())
            })
            .sum::<f64>();
        self.mean + T::from_f64(offset)
    }

    /// Draws one sample with fresh draws for every independent variable.
    #[must_use]
    pub fn sample(&self) -> T {
        self.sample_with(&mut SampleContext::new())
    }

    /// Draws `count` independent samples.
    ///
    /// # Errors
    ///
    /// Returns [`UncertainError::InvalidSampleCount`] when `count` is zero.
    pub fn take_samples(&self, count: usize) -> Result<Vec<T>> {
        self.take_samples_with(count, rand::rng())
    }

    /// Draws `count` independent samples from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`UncertainError::InvalidSampleCount`] when `count` is zero.
    pub fn take_samples_with<R: Rng>(&self, count: usize, rng: R) -> Result<Vec<T>> {
        check_count(count)?;
        let mut context = SampleContext::with_rng(rng);
        let samples = (0..count)
            .map(|_| {
                context.clear();
                self.sample_with(&mut context)
            })
            .collect();
        tracing::debug!(count, "drew linearized samples");
        Ok(samples)
    }
}

/// Draws `count` joint realizations of `values`: within one realization every value
/// sees the same draw for a shared independent variable.
///
/// Row `k` of the result holds the `k`-th draw of every value, in input order.
///
/// # Errors
///
/// Returns [`UncertainError::InvalidSampleCount`] when `count` is zero.
pub fn take_joint_samples<T: Scalar, R: Rng>(
    values: &[&Uncertain<T>],
    count: usize,
    rng: R,
) -> Result<Vec<Vec<T>>> {
    check_count(count)?;
    let mut context = SampleContext::with_rng(rng);
    let rows = (0..count)
        .map(|_| {
            context.clear();
            values
                .iter()
                .map(|value| value.sample_with(&mut context))
                .collect()
        })
        .collect();
    tracing::debug!(count, values = values.len(), "drew joint samples");
    Ok(rows)
}

/// Sample mean and (population) standard deviation of `samples`.
///
/// # Errors
///
/// Returns [`UncertainError::InvalidSampleCount`] for an empty slice.
pub fn summarize<T: Scalar>(samples: &[T]) -> Result<(f64, f64)> {
    check_count(samples.len())?;
    let n = samples.len() as f64;
    let mean = samples.iter().map(|s| s.to_f64()).sum::<f64>() / n;
    let variance = samples
        .iter()
        .map(|s| (s.to_f64() - mean).powi(2))
        .sum::<f64>()
        / n;
    Ok((mean, variance.sqrt()))
}
