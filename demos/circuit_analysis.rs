use sigma_rs::{IndependentVariable, Uncertain};

/// Voltage Divider with Shared Calibration Error
///
/// Two resistors measured with the same ohmmeter share its calibration error.
/// The divider ratio cancels that shared error, while the current through the
/// pair does not.

fn main() {
    println!("🔌 Voltage Divider Uncertainty Analysis");
    println!("=======================================\n");

    // Every resistance reading is scaled by the meter's calibration factor.
    let calibration = Uncertain::new(1.0, 0.02);
    let r1 = &calibration * &Uncertain::new(1000.0, 5.0);
    let r2 = &calibration * &Uncertain::new(2200.0, 11.0);
    let supply = Uncertain::new(12.0, 0.05);

    println!("📏 Measured components:");
    println!("   R1     = {r1:.1} Ω");
    println!("   R2     = {r2:.1} Ω");
    println!("   Supply = {supply:.3} V\n");

    let total = &r1 + &r2;
    let ratio = &r2 / &total;
    let v_out = &supply * &ratio;
    let current = &supply / &total * 1000.0;

    println!("⚡ Derived quantities:");
    println!("   Divider ratio = {ratio:.4}");
    println!("   V_out         = {v_out:.3} V");
    println!("   Current       = {current:.3} mA\n");

    println!("📊 Error budget for V_out:");
    let sources = [("calibration", &calibration), ("supply", &supply)];
    for (variable, contribution) in v_out.contributions() {
        let label = sources
            .iter()
            .find(|(_, value)| value.dependencies().contains(&variable))
            .map_or("resistor tolerance", |(name, _)| *name);
        println!("   {label:<20} {contribution:.5} V");
    }

    println!(
        "\n   Calibration correlation between R1 and R2: {:.3}",
        r1.correlation(&r2)
    );

    // A second divider built from the same physical resistors shares their errors.
    let tolerance = IndependentVariable::new(0.5);
    let trim = Uncertain::from_variable(100.0, tolerance);
    let trimmed = &supply * &(&r2 / &(&total + &trim));
    println!("\n🔧 Trimmed divider output: {trimmed:.3} V");
    println!(
        "   Correlation with untrimmed output: {:.3}",
        trimmed.correlation(&v_out)
    );
}
