//! # Projectile Range with Uncertain Launch Conditions
//!
//! Launch speed and angle are measured with limited precision. The range
//! `v^2 sin(2θ) / g` inherits both, and near 45° the angle error almost vanishes.

use sigma_rs::{UDouble, Uncertain, trig};

const GRAVITY: f64 = 9.81;

fn range(speed: &UDouble, angle: &UDouble) -> UDouble {
    let double_angle = angle * 2.0;
    speed.powi(2) * &trig::sin(&double_angle) / GRAVITY
}

fn main() {
    println!("🎯 Projectile Range Analysis");
    println!("============================\n");

    let speed = Uncertain::new(25.0, 0.4);

    println!("Speed: {speed} m/s\n");
    println!("{:>8}  {:>18}  {:>10}  {:>10}", "angle", "range (m)", "from v", "from θ");

    for degrees in [15.0, 30.0, 40.0, 45.0, 50.0, 60.0, 75.0] {
        let angle = trig::radians(&Uncertain::new(degrees, 1.0));
        let r = range(&speed, &angle);
        let budget = r.contributions();
        let from_speed = budget.first().map_or(0.0, |(_, c)| *c);
        let from_angle = budget.get(1).map_or(0.0, |(_, c)| *c);
        println!("{degrees:>7}°  {r:>18.2}  {from_speed:>10.3}  {from_angle:>10.3}");
    }

    // Aim for a target and see how confidently it is reached.
    let target = Uncertain::point(60.0);
    let best = range(&speed, &trig::radians(&Uncertain::new(45.0, 1.0)));
    let overshoot = &best - &target;
    println!("\n📍 Target at {target} m");
    println!("   Overshoot at 45°: {overshoot:.2} m");
    println!("   95% interval:     {:?}", overshoot.confidence_interval(1.96));
    println!(
        "   Separation:       {:.1} standard deviations",
        best.z_score(&target)
    );
}
