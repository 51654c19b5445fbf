//! Trial design selection
//!
//! [`DesignSelector`] turns PK facts into a [`DesignPlan`]: the trial
//! architecture, the washout between periods, the intake condition, the
//! expected dropout and the bioequivalence acceptance limits.
//!
//! # Example
//!
//! ```rust,ignore
//! use beplan::design::{DesignSelector, DesignType};
//! use beplan::pk::PkInputs;
//!
//! let pk = PkInputs::new().with_cv_intra(24.0).with_t_half(12.0);
//! let plan = DesignSelector::default().plan(&pk, None, None, false);
//! assert_eq!(plan.design_type, DesignType::Crossover2x2);
//! assert_eq!(plan.washout_days, Some(7));
//! ```

mod select;
mod types;


pub use select::{
    DesignSelector, DEFAULT_WASHOUT_MIN_DAYS, LONG_T_HALF_HOURS, WASHOUT_MULTIPLIER,
};
pub use types::*;
