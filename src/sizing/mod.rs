//! Sample-size determination from reference tables
//!
//! The calculator picks one of the [`tables`](crate::tables) by statistical
//! method (unscaled TOST, scaled ABEL or NTID), interpolates the base number of
//! completers at the study CVintra and inflates it for dropout and screening
//! failures.
//!
//! ```rust,ignore
//! use beplan::planner::Overrides;
//! use beplan::sizing::{SampleSizeCalculator, SampleSizeRequest};
//!
//! let overrides = Overrides::default().validate()?;
//! let request = SampleSizeRequest::new(Some(24.0), 2);
//! let plan = SampleSizeCalculator::default().compute(&request, &overrides)?;
//! assert_eq!(plan.n_base, 26);
//! assert_eq!(plan.n_total, 37);
//! ```

mod calc;
mod narrative;
mod sweep;
mod types;


pub use calc::{select_method, MethodSelection, SampleSizeCalculator};
pub use sweep::SweepPoint;
pub use types::*;
