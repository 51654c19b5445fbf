use serde::{Deserialize, Serialize};

use crate::planner::ValidatedOverrides;

/// Per-subject blood volumes and the donation ceiling
///
/// All volumes in mL. Laboratory panels are drawn at `2 + n_periods` visits
/// (screening, one per period, follow-up); serology once; genetics once when
/// requested. Every PK draw after the first in a period also costs a catheter
/// flush.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BloodBudget {
    pub sample_ml: f64,
    pub flush_ml: f64,
    pub biochemistry_ml: f64,
    pub clinical_ml: f64,
    pub serology_ml: f64,
    pub genetics_ml: f64,
    pub max_blood_ml: f64,
    pub min_points: u32,
    pub max_points: u32,
}

impl Default for BloodBudget {
    fn default() -> Self {
        Self {
            sample_ml: 5.0,
            flush_ml: 0.5,
            biochemistry_ml: 10.0,
            clinical_ml: 4.0,
            serology_ml: 10.0,
            genetics_ml: 10.0,
            max_blood_ml: 450.0,
            min_points: 11,
            max_points: 20,
        }
    }
}

impl BloodBudget {
    /// Default panels with the per-draw volume and ceiling from the overrides
    pub fn from_overrides(overrides: &ValidatedOverrides) -> Self {
        Self::default()
            .with_sample_ml(overrides.blood_per_point_ml())
            .with_max_blood_ml(overrides.max_blood_ml())
    }

    pub fn with_sample_ml(mut self, ml: f64) -> Self {
        self.sample_ml = ml;
        self
    }

    pub fn with_max_blood_ml(mut self, ml: f64) -> Self {
        self.max_blood_ml = ml;
        self
    }

    pub fn with_point_range(mut self, min: u32, max: u32) -> Self {
        self.min_points = min;
        self.max_points = max;
        self
    }

    pub fn n_lab_visits(&self, n_periods: u32) -> u32 {
        2 + n_periods
    }

    /// Laboratory volume, independent of the PK schedule
    pub fn lab_volume(&self, n_periods: u32, needs_genetics: bool) -> f64 {
        let visits = self.n_lab_visits(n_periods) as f64;
        let genetics = if needs_genetics { self.genetics_ml } else { 0.0 };
        visits * (self.biochemistry_ml + self.clinical_ml) + self.serology_ml + genetics
    }

    pub fn fk_volume(&self, points_per_period: u32, n_periods: u32) -> f64 {
        (points_per_period * n_periods) as f64 * self.sample_ml
    }

    /// No flush before the first draw of each period
    pub fn flush_volume(&self, points_per_period: u32, n_periods: u32) -> f64 {
        let flushes = (points_per_period * n_periods).saturating_sub(n_periods);
        flushes as f64 * self.flush_ml
    }

    pub fn total_volume(&self, points_per_period: u32, n_periods: u32, needs_genetics: bool) -> f64 {
        self.lab_volume(n_periods, needs_genetics)
            + self.fk_volume(points_per_period, n_periods)
            + self.flush_volume(points_per_period, n_periods)
    }

    /// Largest number of PK draws per period that fits the ceiling
    ///
    /// Solves `ceiling = lab + N·P·sample + (N·P − P)·flush` for `N`, floors
    /// it and clamps to `[min_points, max_points]`. The lower clamp wins over
    /// the ceiling; check [`total_volume`](Self::total_volume) afterwards.
    pub fn max_points_per_period(&self, n_periods: u32, needs_genetics: bool) -> u32 {
        if n_periods == 0 {
            return self.min_points;
        }
        let p = n_periods as f64;
        let available = self.max_blood_ml - self.lab_volume(n_periods, needs_genetics) + p * self.flush_ml;
        let raw = (available / (p * (self.sample_ml + self.flush_ml))).floor();
        let points = if raw.is_finite() && raw > 0.0 {
            raw as u32
        } else {
            0
        };
        points.max(self.min_points).min(self.max_points)
    }

    /// `(4)×10 + (4)×4 + 10 = 66 mL`
    pub fn lab_formula(&self, n_periods: u32, needs_genetics: bool) -> String {
        let visits = self.n_lab_visits(n_periods);
        let mut parts = vec![
            format!("({visits})×{:.0}", self.biochemistry_ml),
            format!("({visits})×{:.0}", self.clinical_ml),
            format!("{:.0}", self.serology_ml),
        ];
        if needs_genetics {
            parts.push(format!("{:.0}", self.genetics_ml));
        }
        format!(
            "{} = {:.0} mL",
            parts.join(" + "),
            self.lab_volume(n_periods, needs_genetics)
        )
    }

    /// `66 + 200 + 19.0 = 285.0 mL`
    pub fn total_formula(&self, points_per_period: u32, n_periods: u32, needs_genetics: bool) -> String {
        format!(
            "{:.0} + {:.0} + {:.1} = {:.1} mL",
            self.lab_volume(n_periods, needs_genetics),
            self.fk_volume(points_per_period, n_periods),
            self.flush_volume(points_per_period, n_periods),
            self.total_volume(points_per_period, n_periods, needs_genetics)
        )
    }
}
