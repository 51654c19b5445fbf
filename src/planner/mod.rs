//! Study planning pipeline
//!
//! [`StudyPlanner`] runs the stages in dependency order and assembles a
//! [`StudyProtocolPlan`]:
//!
//! 1. design selection (washout, intake, dropout, limits)
//! 2. blood budget and sampling schedule for the design's periods
//! 3. sample size, including the blood volume check
//! 4. one adaptive re-plan if the base sample is too large
//! 5. day-numbered timeline
//! 6. calculation narrative
//!
//! The blood and timeline stages are reached through the [`BloodScheduler`]
//! and [`TimelineBuilder`] traits so that a site with its own sampling
//! conventions can plug in a different implementation.
//!
//! # Example
//!
//! ```rust,ignore
//! use beplan::prelude::*;
//!
//! let pk = PkInputs::new().with_cv_intra(24.0).with_t_half(12.0).with_tmax(1.0);
//! let plan = StudyPlanner::default().plan(&pk, &Overrides::default())?;
//! assert_eq!(plan.design.design_type, DesignType::Crossover2x2);
//! assert_eq!(plan.sample_size.n_total, 36);
//! ```

mod overrides;
mod plan;
mod types;

#[cfg(test)]
mod tests;

pub use overrides::*;
pub use plan::StudyPlanner;
pub use types::StudyProtocolPlan;

use crate::blood::{BloodBudget, BloodPlan, BloodRequest, SamplingScheduleGenerator};
use crate::design::DesignPlan;
use crate::error::PlanningError;
use crate::timeline::{Timeline, TimelineScheduler};

/// Builds the blood plan for one design
pub trait BloodScheduler {
    fn blood_plan(&self, budget: &BloodBudget, request: &BloodRequest) -> BloodPlan;
}

/// Budgeted draws placed on the standard sampling grid
#[derive(Debug, Clone, Default)]
pub struct StandardBloodScheduler {
    generator: SamplingScheduleGenerator,
}

impl StandardBloodScheduler {
    pub fn new(generator: SamplingScheduleGenerator) -> Self {
        Self { generator }
    }

    pub fn generator(&self) -> &SamplingScheduleGenerator {
        &self.generator
    }
}

impl BloodScheduler for StandardBloodScheduler {
    fn blood_plan(&self, budget: &BloodBudget, request: &BloodRequest) -> BloodPlan {
        budget.plan(&self.generator, request)
    }
}

/// Lays out the study calendar
pub trait TimelineBuilder {
    fn timeline(
        &self,
        design: &DesignPlan,
        blood: &BloodPlan,
        overrides: &ValidatedOverrides,
    ) -> Result<Timeline, PlanningError>;
}

/// Day-numbered calendar from [`TimelineScheduler`]
#[derive(Debug, Clone, Copy, Default)]
pub struct DayTimeline;

impl TimelineBuilder for DayTimeline {
    fn timeline(
        &self,
        design: &DesignPlan,
        blood: &BloodPlan,
        overrides: &ValidatedOverrides,
    ) -> Result<Timeline, PlanningError> {
        TimelineScheduler::new()
            .with_fallback_washout_days(overrides.washout_min_days())
            .layout(
                design.n_periods,
                design.washout_days,
                blood.sampling_duration_hours,
                overrides.screening_days(),
                overrides.follow_up_days(),
            )
    }
}
