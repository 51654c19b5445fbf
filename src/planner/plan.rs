use super::{
    BloodScheduler, DayTimeline, Overrides, StandardBloodScheduler, StudyProtocolPlan,
    TimelineBuilder, ValidatedOverrides,
};
use crate::blood::{BloodBudget, BloodPlan, BloodRequest};
use crate::design::{DesignPlan, DesignSelector};
use crate::error::PlanningError;
use crate::pk::PkInputs;
use crate::sizing::{SampleSizeCalculator, SampleSizePlan, SampleSizeRequest};
use crate::tables::TableStore;

/// End-to-end study planner
#[derive(Debug, Clone)]
pub struct StudyPlanner<B = StandardBloodScheduler, T = DayTimeline> {
    tables: TableStore,
    selector: DesignSelector,
    blood: B,
    timeline: T,
}

impl Default for StudyPlanner {
    fn default() -> Self {
        Self {
            tables: TableStore::builtin().clone(),
            selector: DesignSelector::default(),
            blood: StandardBloodScheduler::default(),
            timeline: DayTimeline,
        }
    }
}

impl StudyPlanner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<B: BloodScheduler, T: TimelineBuilder> StudyPlanner<B, T> {
    /// Replace the reference tables
    pub fn with_tables(mut self, tables: TableStore) -> Self {
        self.tables = tables;
        self
    }

    pub fn with_selector(mut self, selector: DesignSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_blood_scheduler<B2: BloodScheduler>(self, blood: B2) -> StudyPlanner<B2, T> {
        StudyPlanner {
            tables: self.tables,
            selector: self.selector,
            blood,
            timeline: self.timeline,
        }
    }

    pub fn with_timeline_builder<T2: TimelineBuilder>(self, timeline: T2) -> StudyPlanner<B, T2> {
        StudyPlanner {
            tables: self.tables,
            selector: self.selector,
            blood: self.blood,
            timeline,
        }
    }

    pub fn tables(&self) -> &TableStore {
        &self.tables
    }

    /// Build a complete plan
    ///
    /// Inputs are validated before any stage runs. When the base sample is
    /// above the single-stage limit the design is re-selected once with the
    /// adaptive variant and sized again; a forced design is never escalated.
    pub fn plan(
        &self,
        pk: &PkInputs,
        overrides: &Overrides,
    ) -> Result<StudyProtocolPlan, PlanningError> {
        pk.validate()?;
        let overrides = overrides.validate()?;

        let selector = match overrides.inner().washout_min_days {
            Some(days) => self.selector.clone().with_washout_min_days(days),
            None => self.selector.clone(),
        };
        let calculator = SampleSizeCalculator::new(&self.tables);
        let budget = BloodBudget::from_overrides(&overrides);
        let forced = overrides.design_type();
        let intake = overrides.intake_mode();

        let mut design = selector.plan(pk, forced, intake, false);
        let (mut blood, mut sample_size) =
            self.size(&calculator, &budget, pk, &design, &overrides)?;
        let mut escalated = false;

        if sample_size.needs_adaptive {
            if forced.is_some() {
                tracing::warn!(
                    n_base = sample_size.n_base,
                    design = %design.design_type,
                    "base sample exceeds single-stage limit, forced design kept"
                );
            } else {
                let adaptive = selector.plan(pk, None, intake, true);
                tracing::warn!(
                    from = %design.design_type,
                    to = %adaptive.design_type,
                    "escalating to an adaptive design"
                );
                let (adaptive_blood, adaptive_size) =
                    self.size(&calculator, &budget, pk, &adaptive, &overrides)?;
                if adaptive_size.needs_adaptive {
                    tracing::warn!(
                        n_base = adaptive_size.n_base,
                        "adaptive design still exceeds the single-stage limit"
                    );
                }
                design = adaptive;
                blood = adaptive_blood;
                sample_size = adaptive_size;
                escalated = true;
            }
        }

        let timeline = self.timeline.timeline(&design, &blood, &overrides)?;
        let narrative = sample_size.narrative();

        tracing::debug!(
            design = %design.design_type,
            n_total = sample_size.n_total,
            follow_up_day = timeline.follow_up_day,
            escalated,
            "study plan built"
        );

        Ok(StudyProtocolPlan {
            pk: pk.clone(),
            design,
            sample_size,
            blood,
            timeline,
            narrative,
            escalated,
        })
    }

    /// Blood plan then sample size for one design
    fn size(
        &self,
        calculator: &SampleSizeCalculator<'_>,
        budget: &BloodBudget,
        pk: &PkInputs,
        design: &DesignPlan,
        overrides: &ValidatedOverrides,
    ) -> Result<(BloodPlan, SampleSizePlan), PlanningError> {
        let request = BloodRequest {
            n_periods: design.n_periods,
            tmax_hours: pk.tmax_hours,
            t_half_hours: pk.t_half_hours,
            needs_genetics: overrides.needs_genetics(),
        };
        let blood = self.blood.blood_plan(budget, &request);

        let request = SampleSizeRequest::from_design(design, pk.cv_intra)
            .with_blood(blood.fk_points_per_period, blood.overhead_ml());
        let sample_size = calculator.compute(&request, overrides)?;
        Ok((blood, sample_size))
    }
}
