use thiserror::Error;

use crate::planner::OverrideError;
use crate::tables::TableError;

#[derive(Error, Debug)]
pub enum PlanningError {
    #[error("Invalid input: {field} = {value} (expected {expected})")]
    InvalidInput {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },
    #[error("A study needs at least one dosing period, got {0}")]
    InvalidPeriods(u32),
    #[error("{field} = {days} does not fit a study calendar (at most {max} days)")]
    CalendarOutOfRange {
        field: &'static str,
        days: u64,
        max: u32,
    },
    #[error("Day {day} of {event} falls on or before discharge on day {discharge}")]
    CalendarOverlap {
        event: &'static str,
        day: i32,
        discharge: i32,
    },
    #[error("Invalid override: {0}")]
    Override(#[from] OverrideError),
    #[error("Reference table error: {0}")]
    Table(#[from] TableError),
}
