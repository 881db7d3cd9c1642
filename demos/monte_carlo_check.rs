//! # Monte Carlo Check
//!
//! Compares first-order standard deviations with the spread of Monte Carlo draws
//! as the relative input uncertainty grows. The linear model is exact for linear
//! expressions, so the check re-evaluates the nonlinear expression on each draw of
//! the inputs rather than sampling the linearized output.

use rand::SeedableRng;
use rand::rngs::StdRng;
use sigma_rs::sampling::{summarize, take_joint_samples};
use sigma_rs::{UDouble, Uncertain};

const SAMPLE_COUNT: usize = 20_000;

fn model(x: f64, y: f64) -> f64 {
    x * x / y
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🎲 Linear Propagation vs Monte Carlo");
    println!("====================================\n");
    println!(
        "{:>10}  {:>12}  {:>12}  {:>8}",
        "rel. σ", "linear σ", "sampled σ", "ratio"
    );

    for relative in [0.001, 0.01, 0.05, 0.1, 0.2] {
        let x: UDouble = Uncertain::new(4.0, 4.0 * relative);
        let y: UDouble = Uncertain::new(2.0, 2.0 * relative);
        let linear = &(&x * &x) / &y;

        let rows = take_joint_samples(&[&x, &y], SAMPLE_COUNT, StdRng::seed_from_u64(17))?;
        let outputs: Vec<f64> = rows.iter().map(|row| model(row[0], row[1])).collect();
        let (_, sampled_std) = summarize(&outputs)?;

        println!(
            "{relative:>10}  {:>12.5}  {sampled_std:>12.5}  {:>8.3}",
            linear.std(),
            sampled_std / linear.std()
        );
    }

    println!("\n✅ Agreement degrades as the inputs leave the linear regime.");
    Ok(())
}
