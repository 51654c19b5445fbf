//! Blood budget and pharmacokinetic sampling schedule
//!
//! A subject may donate at most a fixed volume over the whole study (450 mL by
//! default). Laboratory panels are paid for first; what remains decides how
//! many PK draws fit in each period. The draws are then placed on a standard
//! time grid around the expected peak and along the terminal phase.
//!
//! ```rust,ignore
//! use beplan::blood::{BloodBudget, BloodRequest, SamplingScheduleGenerator};
//!
//! let request = BloodRequest {
//!     n_periods: 2,
//!     tmax_hours: Some(1.5),
//!     t_half_hours: Some(25.0),
//!     needs_genetics: false,
//! };
//! let plan = BloodBudget::default().plan(&SamplingScheduleGenerator::default(), &request);
//! assert_eq!(plan.sampling_duration_hours, 72);
//! ```

mod budget;
mod schedule;
mod types;


pub use budget::BloodBudget;
pub use schedule::{
    format_sampling_times, sampling_duration, SamplingScheduleGenerator, DEFAULT_TMAX_HOURS,
    DEFAULT_T_HALF_HOURS, MAX_SAMPLING_HOURS, STANDARD_GRID,
};
pub use types::{BloodPlan, BloodRequest};

impl BloodBudget {
    /// Budget the draws, build the schedule and account for every millilitre
    pub fn plan(&self, generator: &SamplingScheduleGenerator, request: &BloodRequest) -> BloodPlan {
        let n_periods = request.n_periods;
        let fk_points_budget = self.max_points_per_period(n_periods, request.needs_genetics);

        let sampling_duration_hours = sampling_duration(request.tmax_hours, request.t_half_hours);
        let sampling_times_hours = generator.schedule(
            fk_points_budget as usize,
            request.tmax_hours.unwrap_or(DEFAULT_TMAX_HOURS),
            request.t_half_hours.unwrap_or(DEFAULT_T_HALF_HOURS),
            sampling_duration_hours as f64,
        );
        let fk_points_per_period = sampling_times_hours.len() as u32;
        if fk_points_per_period < fk_points_budget {
            tracing::debug!(
                fk_points_budget,
                fk_points_per_period,
                sampling_duration_hours,
                "sampling grid shorter than the budget allows"
            );
        }

        let total_volume_ml = self.total_volume(fk_points_per_period, n_periods, request.needs_genetics);
        let volume_ok = total_volume_ml <= self.max_blood_ml;
        if !volume_ok {
            tracing::warn!(
                total_volume_ml,
                max = self.max_blood_ml,
                "per-subject blood volume exceeds ceiling"
            );
        }
        tracing::debug!(
            fk_points_per_period,
            sampling_duration_hours,
            total_volume_ml,
            "blood plan built"
        );

        BloodPlan {
            n_periods,
            fk_points_budget,
            fk_points_per_period,
            fk_total_points: fk_points_per_period * n_periods,
            sampling_duration_hours,
            sampling_times_text: format_sampling_times(&sampling_times_hours),
            sampling_times_hours,
            needs_genetics: request.needs_genetics,
            n_lab_visits: self.n_lab_visits(n_periods),
            lab_volume_ml: self.lab_volume(n_periods, request.needs_genetics),
            fk_volume_ml: self.fk_volume(fk_points_per_period, n_periods),
            flush_volume_ml: self.flush_volume(fk_points_per_period, n_periods),
            genetics_volume_ml: if request.needs_genetics {
                self.genetics_ml
            } else {
                0.0
            },
            total_volume_ml,
            max_blood_ml: self.max_blood_ml,
            volume_ok,
            lab_formula: self.lab_formula(n_periods, request.needs_genetics),
            total_formula: self.total_formula(
                fk_points_per_period,
                n_periods,
                request.needs_genetics,
            ),
        }
    }
}
