use serde::{Deserialize, Serialize};

/// Kind of scheduled visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisitKind {
    Screening,
    Period,
    FollowUp,
}

/// One visit of the calendar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Visit {
    pub number: u32,
    pub kind: VisitKind,
    pub name: String,
    pub day_start: i32,
    pub day_end: i32,
    pub description: String,
}

/// Hospitalisation of one PK period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PkPeriod {
    pub number: u32,
    pub visit_number: u32,
    /// Evening admission, the day before dosing
    pub hospitalization_day: i32,
    pub dosing_day: i32,
    pub sampling_start_day: i32,
    pub sampling_end_day: i32,
    pub discharge_day: i32,
}

impl PkPeriod {
    /// Calendar days from dosing to discharge, both included
    pub fn stay_days(&self) -> u32 {
        (self.discharge_day - self.dosing_day + 1).max(1) as u32
    }
}

/// Day-numbered study calendar
///
/// Day 0 is the first admission; screening runs on negative days and ends on
/// day −1.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub n_periods: u32,
    /// Washout used for the layout
    pub washout_days: Option<u32>,
    /// Washout was unknown and the minimum was used for the layout
    pub washout_provisional: bool,
    pub screening_days: u32,
    pub follow_up_days: u32,
    pub sampling_hours: u32,
    pub visits: Vec<Visit>,
    pub periods: Vec<PkPeriod>,
    pub dosing_days: Vec<i32>,
    pub follow_up_day: i32,
    /// Duration with a one-day screening
    pub total_days_min: i32,
    /// Duration with the full screening window
    pub total_days_max: i32,
}

impl Timeline {
    /// Days in the unit per period
    pub fn hospital_stay_days(&self) -> u32 {
        self.periods.first().map(PkPeriod::stay_days).unwrap_or(0)
    }

    /// `Day 1, Day 8`
    pub fn dosing_days_text(&self) -> String {
        self.dosing_days
            .iter()
            .map(|d| format!("Day {d}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
