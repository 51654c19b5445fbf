//! Sample-size sensitivity to CVintra
//!
//! Run with: `cargo run --example cv_sweep`

use beplan::prelude::*;
use beplan::sizing::{SampleSizeCalculator, SampleSizeRequest};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let overrides = Overrides::default().validate()?;
    let calculator = SampleSizeCalculator::default();
    let cvs: Vec<f64> = (10..=60).step_by(5).map(f64::from).collect();

    for (label, base) in [
        ("2x2 crossover", SampleSizeRequest::new(None, 2)),
        ("4-period replicate, HVD", SampleSizeRequest::new(None, 4).with_hvd(true)),
        ("parallel", SampleSizeRequest::new(None, 1)),
    ] {
        println!("--- {label} ---");
        println!("{:>6} {:>6} {:>8} {:>8}  method", "CV %", "base", "dropout", "screen");
        for point in calculator.sweep(&base, &cvs, &overrides)? {
            let plan = &point.plan;
            println!(
                "{:>6.1} {:>6} {:>8} {:>8}  {}{}",
                point.cv_intra,
                plan.n_base,
                plan.n_with_dropout,
                plan.n_total,
                plan.method,
                if plan.needs_adaptive { " (adaptive)" } else { "" }
            );
        }
        println!();
    }

    Ok(())
}
