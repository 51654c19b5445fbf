//! Study calendar

mod layout;
mod types;


pub use layout::{TimelineScheduler, MAX_CALENDAR_DAYS};
pub use types::*;
