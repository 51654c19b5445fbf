use serde::{Deserialize, Serialize};

use super::types::*;
use crate::design::DEFAULT_WASHOUT_MIN_DAYS;
use crate::error::PlanningError;

/// Longest screening, washout or follow-up a calendar accepts
pub const MAX_CALENDAR_DAYS: u32 = 3650;

fn calendar_days(field: &'static str, days: u64) -> Result<i32, PlanningError> {
    match i32::try_from(days) {
        Ok(d) if days <= u64::from(MAX_CALENDAR_DAYS) => Ok(d),
        _ => Err(PlanningError::CalendarOutOfRange {
            field,
            days,
            max: MAX_CALENDAR_DAYS,
        }),
    }
}

/// Lays the study out as day numbers
///
/// A single forward pass: screening, then per period an evening admission,
/// dosing the next morning, sampling until discharge, and the next admission
/// on the eve of the next dosing day. Follow-up is counted from the last dose.
///
/// Day counts above [`MAX_CALENDAR_DAYS`] are rejected. So is a washout that
/// brings the next admission inside the previous stay, and a follow-up on or
/// before the last discharge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineScheduler {
    /// Washout used when none is known for a multi-period design
    fallback_washout_days: u32,
}

impl Default for TimelineScheduler {
    fn default() -> Self {
        Self {
            fallback_washout_days: DEFAULT_WASHOUT_MIN_DAYS,
        }
    }
}

impl TimelineScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_fallback_washout_days(mut self, days: u32) -> Self {
        self.fallback_washout_days = days;
        self
    }

    pub fn layout(
        &self,
        n_periods: u32,
        washout_days: Option<u32>,
        sampling_hours: u32,
        screening_days: u32,
        follow_up_days: u32,
    ) -> Result<Timeline, PlanningError> {
        if n_periods == 0 {
            return Err(PlanningError::InvalidPeriods(n_periods));
        }

        let washout_provisional = washout_days.is_none() && n_periods > 1;
        let washout = match washout_days {
            Some(days) => days,
            None if n_periods > 1 => {
                tracing::warn!(
                    days = self.fallback_washout_days,
                    "washout unknown, laying out with the minimum"
                );
                self.fallback_washout_days
            }
            None => 0,
        };
        let washout_span = calendar_days("washout_days", u64::from(washout))?;
        let sampling_days =
            calendar_days("sampling_days", u64::from(sampling_hours.div_ceil(24)))?;
        let screening = calendar_days("screening_days", u64::from(screening_days))?;
        let follow_up = calendar_days("follow_up_days", u64::from(follow_up_days))?;
        // each period spans at least a day
        calendar_days("n_periods", u64::from(n_periods))?;

        let mut visits = Vec::with_capacity(n_periods as usize + 2);
        let mut periods = Vec::with_capacity(n_periods as usize);
        let mut dosing_days = Vec::with_capacity(n_periods as usize);
        let mut visit_number = 1;

        let screening_start = -screening;
        visits.push(Visit {
            number: visit_number,
            kind: VisitKind::Screening,
            name: "Screening".to_string(),
            day_start: screening_start,
            day_end: -1,
            description: format!("Visit {visit_number}. (Day {screening_start} to Day -1)."),
        });
        visit_number += 1;

        let mut admission = 0;
        let mut last_dose = 0;
        let mut last_discharge = -1;

        for number in 1..=n_periods {
            if admission <= last_discharge {
                return Err(PlanningError::CalendarOverlap {
                    event: "admission",
                    day: admission,
                    discharge: last_discharge,
                });
            }
            let dosing_day = admission + 1;
            let discharge_day = dosing_day + sampling_days;

            periods.push(PkPeriod {
                number,
                visit_number,
                hospitalization_day: admission,
                dosing_day,
                sampling_start_day: dosing_day,
                sampling_end_day: discharge_day,
                discharge_day,
            });
            dosing_days.push(dosing_day);
            visits.push(Visit {
                number: visit_number,
                kind: VisitKind::Period,
                name: format!("PK period {number}"),
                day_start: admission,
                day_end: discharge_day,
                description: format!(
                    "Visit {visit_number}. Day {admission} to Day {discharge_day} (hospitalisation)"
                ),
            });
            visit_number += 1;

            last_dose = dosing_day;
            last_discharge = discharge_day;
            admission = dosing_day + washout_span - 1;
        }

        let follow_up_day = last_dose + follow_up;
        if follow_up_day <= last_discharge {
            return Err(PlanningError::CalendarOverlap {
                event: "follow-up",
                day: follow_up_day,
                discharge: last_discharge,
            });
        }
        visits.push(Visit {
            number: visit_number,
            kind: VisitKind::FollowUp,
            name: "Follow-up".to_string(),
            day_start: follow_up_day,
            day_end: follow_up_day,
            description: format!("Visit {visit_number}. Day {follow_up_day} (visit window +2 days)"),
        });

        tracing::debug!(n_periods, washout, follow_up_day, "timeline laid out");

        Ok(Timeline {
            n_periods,
            washout_days: if n_periods > 1 { Some(washout) } else { None },
            washout_provisional,
            screening_days,
            follow_up_days,
            sampling_hours,
            visits,
            periods,
            dosing_days,
            follow_up_day,
            total_days_min: 1 + follow_up_day,
            total_days_max: screening + follow_up_day,
        })
    }
}
