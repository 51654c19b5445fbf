//! Worked planning scenarios
//!
//! Each scenario is checked stage by stage and then through the full planner.

use approx::assert_relative_eq;
use beplan::blood::{BloodBudget, BloodRequest, SamplingScheduleGenerator};
use beplan::design::{AcceptanceLimits, DesignSelector, DesignType, Washout};
use beplan::prelude::*;
use beplan::sizing::{SampleSizeCalculator, SampleSizeRequest, SizingMethod};
use beplan::tables::TableKey;

fn defaults() -> ValidatedOverrides {
    Overrides::default().validate().unwrap()
}

// ============================================================================
// Scenario 1: standard 2×2 crossover
// ============================================================================

#[test]
fn test_scenario_standard_crossover() {
    let design = DesignSelector::default().select(Some(24.0), Some(12.0), false, false, false);
    assert_eq!(design, DesignType::Crossover2x2);

    let request = SampleSizeRequest::new(Some(24.0), 2);
    let plan = SampleSizeCalculator::default()
        .compute(&request, &defaults())
        .unwrap();
    assert_eq!(plan.table, TableKey::TostCrossover095);
    assert_eq!(plan.n_base, 26);
    assert_eq!(plan.n_with_dropout, 31);
    assert_eq!(plan.n_with_screenfail, 37);
    assert_eq!(plan.n_total, 37);
}

#[test]
fn test_scenario_standard_crossover_full_plan() {
    let pk = PkInputs::new()
        .with_cv_intra(24.0)
        .with_t_half(12.0)
        .with_tmax(1.0);
    let plan = StudyPlanner::default()
        .plan(&pk, &Overrides::new().with_dropout_rate(0.15))
        .unwrap();

    assert_eq!(plan.design.design_type, DesignType::Crossover2x2);
    assert_eq!(plan.sample_size.n_with_dropout, 31);
    assert_eq!(plan.sample_size.n_total, 37);
    assert_eq!(plan.design.washout.formula(), "6 × 12.0 h = 72 h ≈ 7 days");
    assert!(plan
        .narrative
        .contains("31 subjects must be randomised"));
    assert!(plan.narrative.contains("up to 37 subjects will be screened"));
}

// ============================================================================
// Scenario 2: long half-life
// ============================================================================

#[test]
fn test_scenario_long_half_life() {
    for (cv, hvd, nti) in [(20.0, false, false), (45.0, true, false), (12.0, false, true)] {
        let pk = PkInputs::new()
            .with_cv_intra(cv)
            .with_t_half(30.0)
            .with_hvd(hvd)
            .with_nti(nti);
        let design = DesignSelector::default().plan(&pk, None, None, false);
        assert_eq!(design.design_type, DesignType::Parallel);
        assert_eq!(design.washout_days, None);
        assert_eq!(design.washout, Washout::NotRequired);
    }
}

// ============================================================================
// Scenario 3: highly variable drug, 4-period replicate
// ============================================================================

#[test]
fn test_scenario_hvd_replicate() {
    let pk = PkInputs::new()
        .with_cv_intra(35.0)
        .with_t_half(10.0)
        .with_hvd(true);
    let design = DesignSelector::default().plan(&pk, None, None, false);
    assert_eq!(design.design_type, DesignType::Replicate4);
    assert_eq!(design.n_periods, 4);
    assert!(design.be_can_expand);
    assert_eq!(design.be_lower, 80.0);
    assert_eq!(design.be_upper, 125.0);

    let request = SampleSizeRequest::new(Some(35.0), 4).with_hvd(true);
    let plan = SampleSizeCalculator::default()
        .compute(&request, &defaults())
        .unwrap();
    assert_eq!(plan.method, SizingMethod::ScaledAbel);
    assert_eq!(plan.table, TableKey::Abel4Period095);
    assert_eq!(plan.n_base, 26);

    assert_eq!(AcceptanceLimits::STANDARD.expanded(35.0), None);
    let (lower, upper) = design.limits().expanded(35.0).unwrap();
    assert_relative_eq!(lower, 77.23, epsilon = 1e-9);
    assert_relative_eq!(upper, 129.48, epsilon = 1e-9);
}

// ============================================================================
// Scenario 4: highly variable drug with only two periods
// ============================================================================

#[test]
fn test_scenario_hvd_two_period_fallback() {
    let request = SampleSizeRequest::new(Some(35.0), 2).with_hvd(true);
    let plan = SampleSizeCalculator::default()
        .compute(&request, &defaults())
        .unwrap();
    assert!(plan.hvd_fallback);
    assert_eq!(plan.method, SizingMethod::Tost);
    assert_eq!(plan.table, TableKey::TostCrossover095);
    assert_eq!(plan.n_base, 52);

    let request = SampleSizeRequest::new(Some(36.5), 2).with_hvd(true);
    let plan = SampleSizeCalculator::default()
        .compute(&request, &defaults())
        .unwrap();
    // 52 + 0.5 × (64 − 52)
    assert_eq!(plan.n_base, 58);
}

// ============================================================================
// Scenario 5: blood budget and sampling for a long half-life crossover
// ============================================================================

#[test]
fn test_scenario_blood_schedule() {
    let budget = BloodBudget::default();
    let points = budget.max_points_per_period(2, false);
    assert!((11..=20).contains(&points));

    let request = BloodRequest {
        n_periods: 2,
        tmax_hours: Some(1.5),
        t_half_hours: Some(25.0),
        needs_genetics: false,
    };
    let plan = budget.plan(&SamplingScheduleGenerator::default(), &request);
    let times = &plan.sampling_times_hours;

    assert_eq!(plan.sampling_duration_hours, 72);
    assert_eq!(times.len() as u32, plan.fk_points_per_period);
    assert_eq!(times[0], 0.0);
    assert!(times.contains(&1.5));
    assert_eq!(times.last().copied(), Some(72.0));
    assert!(plan.volume_ok);
    assert!(plan.sampling_times_text.starts_with("30 min before dosing"));

    let timeline = TimelineScheduler::default()
        .layout(2, Some(8), plan.sampling_duration_hours, 14, 7)
        .unwrap();
    assert_eq!(timeline.dosing_days, vec![1, 9]);
    assert_eq!(timeline.periods[0].discharge_day, 4);
    assert_eq!(timeline.periods[1].hospitalization_day, 8);
}
