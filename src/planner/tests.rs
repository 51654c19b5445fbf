//! Tests for the end-to-end planning pipeline

use crate::blood::{BloodBudget, BloodPlan, BloodRequest, SamplingScheduleGenerator};
use crate::design::{DesignPlan, DesignType, IntakeMode};
use crate::pk::{PkInputs, ReleaseType};
use crate::planner::*;
use crate::sizing::SizingMethod;
use crate::tables::TableKey;
use crate::timeline::Timeline;
use crate::PlanningError;

fn plan(pk: &PkInputs) -> StudyProtocolPlan {
    StudyPlanner::default()
        .plan(pk, &Overrides::default())
        .unwrap()
}

// ============================================================================
// Standard scenarios
// ============================================================================

#[test]
fn test_standard_crossover() {
    let pk = PkInputs::new()
        .with_cv_intra(24.0)
        .with_t_half(12.0)
        .with_tmax(1.0);
    let plan = plan(&pk);

    assert_eq!(plan.design.design_type, DesignType::Crossover2x2);
    assert_eq!(plan.design.washout_days, Some(7));
    assert_eq!(plan.design.intake_mode, IntakeMode::Fasting);
    assert!(!plan.escalated);

    assert_eq!(plan.sample_size.n_base, 26);
    assert_eq!(plan.sample_size.dropout_rate, 0.12);
    assert_eq!(plan.sample_size.n_with_dropout, 30);
    assert_eq!(plan.sample_size.n_total, 36);
    assert_eq!(plan.n_subjects(), 30);
    assert_eq!(plan.n_screened(), 36);

    assert_eq!(plan.blood.sampling_duration_hours, 48);
    assert_eq!(plan.blood.fk_points_per_period, 20);
    assert_eq!(plan.blood.total_volume_ml, 285.0);
    assert_eq!(plan.sample_size.blood_volume_ml, plan.blood.total_volume_ml);
    assert!(plan.sample_size.blood_volume_ok);
    assert_eq!(plan.biosamples_total(), 20 * 2 * 30);

    assert_eq!(plan.timeline.dosing_days, vec![1, 8]);
    assert_eq!(plan.timeline.follow_up_day, 15);
    assert_eq!(plan.timeline.total_days_max, 29);
    assert_eq!(
        plan.groups_description(),
        "Group 1 (n=15): TR; Group 2 (n=15): RT"
    );
    assert!(plan.narrative.contains("sampleN.TOST"));
}

#[test]
fn test_highly_variable_replicate() {
    let pk = PkInputs::new()
        .with_cv_intra(35.0)
        .with_t_half(8.0)
        .with_tmax(2.0);
    let plan = plan(&pk);

    assert_eq!(plan.design.design_type, DesignType::Replicate4);
    assert!(plan.design.is_hvd);
    assert!(plan.design.be_can_expand);
    assert_eq!(plan.sample_size.method, SizingMethod::ScaledAbel);
    assert_eq!(plan.sample_size.table, TableKey::Abel4Period095);
    assert_eq!(plan.sample_size.n_base, 26);
    assert_eq!(plan.sample_size.n_with_dropout, 35);
    assert_eq!(plan.sample_size.n_total, 42);

    assert_eq!(plan.blood.fk_points_per_period, 16);
    assert_eq!(plan.blood.sampling_duration_hours, 36);
    assert_eq!(plan.blood.total_volume_ml, 444.0);
    assert_eq!(plan.sample_size.blood_volume_ml, 444.0);
    assert_eq!(plan.timeline.dosing_days, vec![1, 8, 15, 22]);
}

#[test]
fn test_long_half_life_parallel() {
    let pk = PkInputs::new()
        .with_cv_intra(20.0)
        .with_t_half(30.0)
        .with_tmax(2.0);
    let plan = plan(&pk);

    assert_eq!(plan.design.design_type, DesignType::Parallel);
    assert_eq!(plan.design.n_periods, 1);
    assert_eq!(plan.design.washout_days, None);
    assert_eq!(plan.sample_size.table, TableKey::TostParallel095);
    assert_eq!(plan.sample_size.n_base, 38);
    assert_eq!(plan.sample_size.n_with_dropout, 43);
    assert_eq!(plan.sample_size.n_total, 51);

    assert_eq!(plan.blood.sampling_duration_hours, 72);
    assert_eq!(plan.timeline.periods.len(), 1);
    assert_eq!(plan.timeline.periods[0].discharge_day, 4);
    assert_eq!(plan.timeline.follow_up_day, 8);
    assert!(!plan.timeline.washout_provisional);
}

#[test]
fn test_narrow_therapeutic_index() {
    let pk = PkInputs::new()
        .with_cv_intra(10.0)
        .with_t_half(12.0)
        .with_tmax(1.0)
        .with_nti(true);
    let plan = plan(&pk);

    assert_eq!(plan.design.design_type, DesignType::Replicate4);
    assert_eq!(plan.design.be_lower, 90.0);
    assert_eq!(plan.design.be_upper, 111.11);
    assert_eq!(plan.sample_size.method, SizingMethod::Ntid);
    assert_eq!(plan.sample_size.table, TableKey::Ntid095);
    assert_eq!(plan.sample_size.n_base, 24);
    assert_eq!(plan.sample_size.n_with_dropout, 32);
    assert_eq!(plan.sample_size.n_total, 38);
    assert!(plan.narrative.contains("sampleN.NTID"));
}

#[test]
fn test_modified_release_needs_both_intakes() {
    let pk = PkInputs::new()
        .with_cv_intra(24.0)
        .with_t_half(12.0)
        .with_release_type(ReleaseType::Modified);
    assert_eq!(plan(&pk).design.intake_mode, IntakeMode::Both);

    let overrides = Overrides::new().with_intake_mode(IntakeMode::Fed);
    let plan = StudyPlanner::default().plan(&pk, &overrides).unwrap();
    assert_eq!(plan.design.intake_mode, IntakeMode::Fed);
}

#[test]
fn test_unknown_pk_uses_defaults() {
    let plan = plan(&PkInputs::new());

    assert_eq!(plan.design.design_type, DesignType::Crossover2x2);
    assert_eq!(plan.design.washout_days, None);
    assert!(plan.sample_size.cv_intra_assumed);
    assert_eq!(plan.sample_size.cv_intra_used, 30.0);
    assert!(plan.sample_size.hvd_fallback);
    assert_eq!(plan.sample_size.n_base, 40);
    assert_eq!(plan.blood.sampling_duration_hours, 48);
    assert!(plan.timeline.washout_provisional);
    assert_eq!(plan.timeline.dosing_days, vec![1, 8]);
}

// ============================================================================
// Overrides
// ============================================================================

#[test]
fn test_forced_design_two_period_hvd() {
    let pk = PkInputs::new()
        .with_cv_intra(35.0)
        .with_t_half(12.0)
        .with_tmax(1.0);
    let overrides = Overrides::new().with_design_type(DesignType::Crossover2x2);
    let plan = StudyPlanner::default().plan(&pk, &overrides).unwrap();

    assert_eq!(plan.design.design_type, DesignType::Crossover2x2);
    assert!(plan.design.justification.contains("explicitly"));
    assert!(plan.sample_size.hvd_fallback);
    assert_eq!(plan.sample_size.n_base, 52);
    assert_eq!(plan.sample_size.n_with_dropout, 60);
    assert_eq!(plan.sample_size.n_total, 71);
}

#[test]
fn test_washout_and_calendar_overrides() {
    let pk = PkInputs::new().with_cv_intra(24.0).with_t_half(4.0);
    let overrides = Overrides::new()
        .with_washout_min_days(10)
        .with_screening_days(21)
        .with_follow_up_days(10);
    let plan = StudyPlanner::default().plan(&pk, &overrides).unwrap();

    assert_eq!(plan.design.washout_days, Some(10));
    assert_eq!(plan.timeline.dosing_days, vec![1, 11]);
    assert_eq!(plan.timeline.visits[0].day_start, -21);
    assert_eq!(plan.timeline.follow_up_day, 21);
    assert_eq!(plan.timeline.total_days_max, 42);
}

#[test]
fn test_genetics_reduces_budget() {
    let pk = PkInputs::new()
        .with_cv_intra(35.0)
        .with_t_half(8.0)
        .with_tmax(2.0);
    let overrides = Overrides::new().with_genetics(true);
    let plan = StudyPlanner::default().plan(&pk, &overrides).unwrap();

    assert_eq!(plan.blood.fk_points_per_period, 15);
    assert_eq!(plan.blood.genetics_volume_ml, 10.0);
    assert!(plan.blood.total_volume_ml <= 450.0);
}

// ============================================================================
// Adaptive escalation
// ============================================================================

#[test]
fn test_escalates_once_to_adaptive_parallel() {
    let pk = PkInputs::new()
        .with_cv_intra(45.0)
        .with_t_half(30.0)
        .with_tmax(2.0);
    let plan = plan(&pk);

    assert!(plan.escalated);
    assert_eq!(plan.design.design_type, DesignType::AdaptiveParallel);
    assert_eq!(plan.sample_size.n_base, 162);
    // still above the limit after the single re-plan
    assert!(plan.sample_size.needs_adaptive);
    assert_eq!(plan.sample_size.dropout_rate, 0.15);
    assert_eq!(plan.sample_size.n_total, 225);
}

#[test]
fn test_escalates_to_adaptive_crossover() {
    let pk = PkInputs::new()
        .with_cv_intra(28.0)
        .with_t_half(6.0)
        .with_tmax(1.0);
    let overrides = Overrides::new().with_max_base_subjects(30);
    let plan = StudyPlanner::default().plan(&pk, &overrides).unwrap();

    assert!(plan.escalated);
    assert_eq!(plan.design.design_type, DesignType::AdaptiveCrossover);
    assert_eq!(plan.design.n_periods, 2);
    assert_eq!(plan.sample_size.n_base, 34);
    assert_eq!(plan.timeline.periods.len(), 2);
}

#[test]
fn test_forced_design_is_not_escalated() {
    let pk = PkInputs::new().with_cv_intra(45.0).with_t_half(30.0);
    let overrides = Overrides::new().with_design_type(DesignType::Parallel);
    let plan = StudyPlanner::default().plan(&pk, &overrides).unwrap();

    assert!(!plan.escalated);
    assert!(plan.sample_size.needs_adaptive);
    assert_eq!(plan.design.design_type, DesignType::Parallel);
}

// ============================================================================
// Errors and determinism
// ============================================================================

#[test]
fn test_invalid_inputs_rejected() {
    let planner = StudyPlanner::default();

    let result = planner.plan(&PkInputs::new().with_cv_intra(-5.0), &Overrides::default());
    assert!(matches!(
        result,
        Err(PlanningError::InvalidInput {
            field: "cv_intra",
            ..
        })
    ));

    let result = planner.plan(&PkInputs::new(), &Overrides::new().with_dropout_rate(1.0));
    assert!(matches!(
        result,
        Err(PlanningError::Override(OverrideError::OutOfRange {
            field: "dropout_rate",
            ..
        }))
    ));
}

#[test]
fn test_calendar_errors_surface() {
    let planner = StudyPlanner::default();

    let result = planner.plan(
        &PkInputs::new().with_cv_intra(24.0).with_t_half(4.0),
        &Overrides::new().with_screening_days(1 << 31),
    );
    assert!(matches!(
        result,
        Err(PlanningError::Override(OverrideError::OutOfRange {
            field: "screening_days",
            ..
        }))
    ));

    // six half-lives of 1e9 h run far past any calendar
    let result = planner.plan(
        &PkInputs::new().with_cv_intra(24.0).with_t_half(1e9),
        &Overrides::new().with_design_type(DesignType::Crossover2x2),
    );
    assert!(matches!(
        result,
        Err(PlanningError::CalendarOutOfRange {
            field: "washout_days",
            ..
        })
    ));

    let result = planner.plan(
        &PkInputs::new().with_cv_intra(24.0).with_t_half(4.0),
        &Overrides::new().with_washout_min_days(1),
    );
    assert!(matches!(
        result,
        Err(PlanningError::CalendarOverlap {
            event: "admission",
            ..
        })
    ));
}

#[test]
fn test_missing_table_is_an_error() {
    let planner = StudyPlanner::default().with_tables(crate::tables::TableStore::empty());
    let result = planner.plan(&PkInputs::new().with_cv_intra(24.0), &Overrides::default());
    assert!(matches!(result, Err(PlanningError::Table(_))));
}

#[test]
fn test_plan_is_deterministic() {
    let pk = PkInputs::new()
        .with_cv_intra(33.0)
        .with_t_half(18.0)
        .with_tmax(1.5);
    let first = plan(&pk);
    let second = plan(&pk);
    assert_eq!(first, second);
    assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());

    let restored = StudyProtocolPlan::from_json(&first.to_json().unwrap()).unwrap();
    assert_eq!(restored, first);
}

// ============================================================================
// Pluggable stages
// ============================================================================

struct FixedBlood;

impl BloodScheduler for FixedBlood {
    fn blood_plan(&self, budget: &BloodBudget, request: &BloodRequest) -> BloodPlan {
        let generator = SamplingScheduleGenerator::new()
            .with_grid(vec![0.0, 0.5, 1.0, 2.0, 4.0, 8.0, 12.0, 24.0, 48.0, 72.0]);
        budget.plan(&generator, request)
    }
}

struct ShortFollowUp;

impl TimelineBuilder for ShortFollowUp {
    fn timeline(
        &self,
        design: &DesignPlan,
        blood: &BloodPlan,
        overrides: &ValidatedOverrides,
    ) -> Result<Timeline, PlanningError> {
        crate::timeline::TimelineScheduler::default().layout(
            design.n_periods,
            design.washout_days,
            blood.sampling_duration_hours,
            overrides.screening_days(),
            3,
        )
    }
}

#[test]
fn test_custom_stages() {
    let pk = PkInputs::new()
        .with_cv_intra(24.0)
        .with_t_half(12.0)
        .with_tmax(1.0);
    let plan = StudyPlanner::default()
        .with_blood_scheduler(FixedBlood)
        .with_timeline_builder(ShortFollowUp)
        .plan(&pk, &Overrides::default())
        .unwrap();

    assert_eq!(plan.blood.fk_points_per_period, 9);
    assert_eq!(plan.sample_size.blood_volume_ml, plan.blood.total_volume_ml);
    assert_eq!(plan.timeline.follow_up_day, 11);
}
