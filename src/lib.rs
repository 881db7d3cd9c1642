//! # sigma-rs
//!
//! First-order propagation of measurement uncertainty with correlation tracking.
//!
//! ## Core Concept: Values Remember Their Error Sources
//!
//! An [`Uncertain`] value is a mean plus the partial derivatives of that mean with
//! respect to every [`IndependentVariable`] it depends on. Standard deviations are
//! rebuilt from those partials, so quantities that share an error source stay
//! correlated through any chain of operations:
//!
//! ```rust
//! use sigma_rs::{Uncertain, trig};
//!
//! let x: Uncertain<f64> = Uncertain::new(2.0, 0.1);
//!
//! // x - x is exactly zero, not sqrt(2) * 0.1
//! assert_eq!((&x - &x).std(), 0.0);
//!
//! // x * x depends on x twice, so the contributions add linearly
//! let w = &x * &x;
//! assert!((w.std() - 0.4).abs() < 1e-12);
//!
//! let angle = Uncertain::new(0.0, 0.01);
//! println!("sin = {}", trig::sin(&angle)); // 0+/-0.01
//! ```
//!
//! ## Features
//!
//! - **Linear error propagation**: every operation supplies its analytic derivative
//! - **Correlation tracking**: dependency maps are flattened onto independent variables
//! - **Operators**: `+ - * /` and compound assignment for values, scalars and mixes
//! - **Trigonometry**: `sin`, `cos`, `tan`, their inverses, `atan2`, degree conversion
//! - **Statistics**: covariance, correlation and per-source error budgets
//! - **Sampling** (feature `sampling`): Monte Carlo draws from the linearized model

pub mod error;
pub mod operations;
#[cfg(feature = "sampling")]
pub mod sampling;
pub mod statistics;
pub mod traits;
pub mod uncertain;
pub mod variable;

pub use error::UncertainError;
pub use operations::Atan2;
pub use operations::trigonometry as trig;
pub use traits::Scalar;
pub use uncertain::{UDouble, UFloat, Uncertain};
pub use variable::{Dependencies, IndependentVariable, VariableId};
