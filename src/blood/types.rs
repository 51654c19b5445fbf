use serde::{Deserialize, Serialize};

/// What the blood planner needs to know about the study
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodRequest {
    pub n_periods: u32,
    pub tmax_hours: Option<f64>,
    pub t_half_hours: Option<f64>,
    pub needs_genetics: bool,
}

/// Blood-draw plan for one subject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodPlan {
    pub n_periods: u32,
    /// Draws per period allowed by the volume ceiling, in `[11, 20]`
    pub fk_points_budget: u32,
    /// Draws per period actually scheduled; equals `sampling_times_hours.len()`
    pub fk_points_per_period: u32,
    pub fk_total_points: u32,
    /// 24, 36, 48 or 72
    pub sampling_duration_hours: u32,
    /// Strictly increasing, starts at 0
    pub sampling_times_hours: Vec<f64>,
    pub sampling_times_text: String,
    pub needs_genetics: bool,
    pub n_lab_visits: u32,
    pub lab_volume_ml: f64,
    pub fk_volume_ml: f64,
    pub flush_volume_ml: f64,
    pub genetics_volume_ml: f64,
    pub total_volume_ml: f64,
    pub max_blood_ml: f64,
    pub volume_ok: bool,
    pub lab_formula: String,
    pub total_formula: String,
}

impl BloodPlan {
    /// Blood drawn outside the PK samples themselves (lab panels and flushes)
    pub fn overhead_ml(&self) -> f64 {
        self.lab_volume_ml + self.flush_volume_ml
    }

    /// Samples sent to the bioanalytical lab for `n_subjects`
    pub fn biosamples_total(&self, n_subjects: u32) -> u32 {
        self.fk_total_points * n_subjects
    }

    /// `20 points × 2 periods × 37 subjects`
    pub fn biosamples_formula(&self, n_subjects: u32) -> String {
        format!(
            "{} points × {} periods × {} subjects",
            self.fk_points_per_period, self.n_periods, n_subjects
        )
    }
}
