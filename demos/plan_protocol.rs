//! Plan a bioequivalence study end to end
//!
//! Run with: `RUST_LOG=beplan=debug cargo run --example plan_protocol [overrides.json]`

use anyhow::Context;
use beplan::prelude::*;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("beplan=info".parse()?),
        )
        .init();

    let overrides = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)
                .with_context(|| format!("reading overrides from {path}"))?;
            Overrides::from_json(&json)?
        }
        None => Overrides::default(),
    };

    println!("=== beplan study planning ===\n");

    // Immediate-release drug with moderate variability
    let pk = PkInputs::new()
        .with_cv_intra(24.0)
        .with_t_half(12.0)
        .with_tmax(1.0);
    print_plan("Standard drug", &StudyPlanner::default().plan(&pk, &overrides)?)?;

    // Highly variable drug
    let pk = PkInputs::new()
        .with_cv_pair(Some(38.0), Some(29.0))
        .with_t_half(8.0)
        .with_tmax(2.0);
    print_plan("Highly variable drug", &StudyPlanner::default().plan(&pk, &overrides)?)?;

    // Long half-life, modified release
    let pk = PkInputs::new()
        .with_cv_intra(20.0)
        .with_t_half(36.0)
        .with_tmax(4.0)
        .with_release_type(ReleaseType::Modified);
    print_plan("Long half-life", &StudyPlanner::default().plan(&pk, &overrides)?)?;

    Ok(())
}

fn print_plan(title: &str, plan: &StudyProtocolPlan) -> anyhow::Result<()> {
    println!("--- {title} ---\n");

    let design = &plan.design;
    println!("Design:        {}", design.design_type);
    println!("Sequences:     {}", design.design_type.sequences_description());
    println!("Washout:       {}", design.washout.formula());
    println!("Intake:        {}", design.intake_mode);
    println!(
        "Limits:        {:.2}% - {:.2}%{}",
        design.be_lower,
        design.be_upper,
        if design.be_can_expand { " (expandable)" } else { "" }
    );
    println!("Dropout:       {}", design.dropout.justification);
    println!("Justification: {}", design.justification);
    if plan.escalated {
        println!("Escalated to an adaptive design");
    }

    println!("\n{}\n", plan.narrative);
    println!("Groups:        {}", plan.groups_description());

    let blood = &plan.blood;
    println!(
        "Sampling:      {} points × {} periods over {} h",
        blood.fk_points_per_period, blood.n_periods, blood.sampling_duration_hours
    );
    println!("               {}", blood.sampling_times_text);
    println!("Laboratory:    {}", blood.lab_formula);
    println!(
        "Blood total:   {}{}",
        blood.total_formula,
        if blood.volume_ok { "" } else { " (over the limit)" }
    );
    println!(
        "Biosamples:    {} = {}",
        blood.biosamples_formula(plan.n_subjects()),
        plan.biosamples_total()
    );

    println!("\nCalendar:");
    for visit in &plan.timeline.visits {
        println!("  {}", visit.description);
    }
    println!("  Dosing: {}", plan.timeline.dosing_days_text());
    println!(
        "  Duration: {} to {} days",
        plan.timeline.total_days_min, plan.timeline.total_days_max
    );

    let json = plan.to_json().context("serialising the plan")?;
    println!("\nJSON: {} bytes\n", json.len());
    Ok(())
}
