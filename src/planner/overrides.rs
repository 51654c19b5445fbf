use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::design::{DesignType, IntakeMode, DEFAULT_WASHOUT_MIN_DAYS};
use crate::timeline::MAX_CALENDAR_DAYS;

pub const DEFAULT_GMR: f64 = 0.95;
pub const DEFAULT_POWER: f64 = 0.80;
pub const DEFAULT_ALPHA: f64 = 0.05;
pub const DEFAULT_THETA: f64 = 1.25;
/// Dropout used when neither the caller nor the design stage supplies one
pub const DEFAULT_DROPOUT: f64 = 0.15;
pub const DEFAULT_SCREENFAIL: f64 = 0.15;
pub const DEFAULT_MIN_SUBJECTS: u32 = 12;
/// Base sample above which a single-stage design is not feasible
pub const DEFAULT_MAX_BASE_SUBJECTS: u32 = 80;
/// Ceiling applied to CVintra before any table lookup (%)
pub const DEFAULT_MAX_CV_INTRA: f64 = 60.0;
pub const DEFAULT_BLOOD_PER_POINT_ML: f64 = 5.0;
pub const DEFAULT_MAX_BLOOD_ML: f64 = 450.0;
pub const DEFAULT_SCREENING_DAYS: u32 = 14;
pub const DEFAULT_FOLLOW_UP_DAYS: u32 = 7;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum OverrideError {
    #[error("{field} = {value} is out of range (expected {expected})")]
    OutOfRange {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },
    #[error("Failed to parse overrides: {0}")]
    Parse(String),
}

impl OverrideError {
    fn out_of_range(field: &'static str, value: f64, expected: &'static str) -> Self {
        Self::OutOfRange {
            field,
            value,
            expected,
        }
    }
}

/// Caller-supplied values that pre-empt computed defaults
///
/// Every field is optional. A present value always wins over whatever a stage
/// would otherwise compute, in every stage.
///
/// # Example
///
/// ```rust,ignore
/// let overrides = Overrides::default()
///     .with_gmr(0.90)
///     .with_dropout_rate(0.20)
///     .validate()?;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Overrides {
    /// Expected test/reference ratio (default 0.95)
    pub gmr: Option<f64>,
    /// Target power (default 0.80)
    pub power: Option<f64>,
    /// Significance level (default 0.05)
    pub alpha: Option<f64>,
    /// Upper BE limit as a ratio (default 1.25)
    pub theta: Option<f64>,
    /// Expected dropout; falls back to the design estimate, then 0.15
    pub dropout_rate: Option<f64>,
    /// Expected screen failures (default 0.15)
    pub screenfail_rate: Option<f64>,
    /// Minimum number of subjects (default 12)
    pub min_subjects: Option<u32>,
    /// Base sample triggering an adaptive design (default 80)
    pub max_base_subjects: Option<u32>,
    /// CVintra ceiling in % (default 60)
    pub max_cv_intra: Option<f64>,
    /// Volume of one PK draw (default 5.0 mL)
    pub blood_per_point_ml: Option<f64>,
    /// Per-subject blood ceiling (default 450 mL)
    pub max_blood_ml: Option<f64>,
    /// Skip design selection and use this design
    pub design_type: Option<DesignType>,
    pub intake_mode: Option<IntakeMode>,
    /// Shortest washout (default 7 days)
    pub washout_min_days: Option<u32>,
    /// Screening window before the first period (default 14 days)
    pub screening_days: Option<u32>,
    /// Days from the last dose to the follow-up visit (default 7)
    pub follow_up_days: Option<u32>,
    /// Add a genetics panel to the laboratory draws
    pub needs_genetics: Option<bool>,
}

impl Overrides {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse overrides from a JSON object; absent keys stay unset
    pub fn from_json(json: &str) -> Result<Self, OverrideError> {
        serde_json::from_str(json).map_err(|e| OverrideError::Parse(e.to_string()))
    }

    pub fn with_gmr(mut self, gmr: f64) -> Self {
        self.gmr = Some(gmr);
        self
    }

    pub fn with_power(mut self, power: f64) -> Self {
        self.power = Some(power);
        self
    }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = Some(alpha);
        self
    }

    pub fn with_theta(mut self, theta: f64) -> Self {
        self.theta = Some(theta);
        self
    }

    pub fn with_dropout_rate(mut self, rate: f64) -> Self {
        self.dropout_rate = Some(rate);
        self
    }

    pub fn with_screenfail_rate(mut self, rate: f64) -> Self {
        self.screenfail_rate = Some(rate);
        self
    }

    pub fn with_min_subjects(mut self, n: u32) -> Self {
        self.min_subjects = Some(n);
        self
    }

    pub fn with_max_base_subjects(mut self, n: u32) -> Self {
        self.max_base_subjects = Some(n);
        self
    }

    pub fn with_max_cv_intra(mut self, cv: f64) -> Self {
        self.max_cv_intra = Some(cv);
        self
    }

    pub fn with_blood_per_point_ml(mut self, ml: f64) -> Self {
        self.blood_per_point_ml = Some(ml);
        self
    }

    pub fn with_max_blood_ml(mut self, ml: f64) -> Self {
        self.max_blood_ml = Some(ml);
        self
    }

    pub fn with_design_type(mut self, design: DesignType) -> Self {
        self.design_type = Some(design);
        self
    }

    pub fn with_intake_mode(mut self, mode: IntakeMode) -> Self {
        self.intake_mode = Some(mode);
        self
    }

    pub fn with_washout_min_days(mut self, days: u32) -> Self {
        self.washout_min_days = Some(days);
        self
    }

    pub fn with_screening_days(mut self, days: u32) -> Self {
        self.screening_days = Some(days);
        self
    }

    pub fn with_follow_up_days(mut self, days: u32) -> Self {
        self.follow_up_days = Some(days);
        self
    }

    pub fn with_genetics(mut self, needs_genetics: bool) -> Self {
        self.needs_genetics = Some(needs_genetics);
        self
    }

    /// Check every present value against its documented domain
    pub fn validate(&self) -> Result<ValidatedOverrides, OverrideError> {
        check_f64(self.gmr, "gmr", "> 0", |v| v > 0.0)?;
        check_f64(self.power, "power", "0 < power < 1", |v| v > 0.0 && v < 1.0)?;
        check_f64(self.alpha, "alpha", "0 < alpha < 1", |v| v > 0.0 && v < 1.0)?;
        check_f64(self.theta, "theta", "> 1", |v| v > 1.0)?;
        check_f64(self.dropout_rate, "dropout_rate", "0 <= rate < 1", is_rate)?;
        check_f64(self.screenfail_rate, "screenfail_rate", "0 <= rate < 1", is_rate)?;
        check_f64(self.max_cv_intra, "max_cv_intra", "> 0 %", |v| v > 0.0)?;
        check_f64(self.blood_per_point_ml, "blood_per_point_ml", "> 0 mL", |v| {
            v > 0.0
        })?;
        check_f64(self.max_blood_ml, "max_blood_ml", "> 0 mL", |v| v > 0.0)?;

        check_count(self.min_subjects, "min_subjects")?;
        check_count(self.max_base_subjects, "max_base_subjects")?;
        check_days(self.washout_min_days, "washout_min_days")?;
        check_days(self.screening_days, "screening_days")?;
        check_days(self.follow_up_days, "follow_up_days")?;

        Ok(ValidatedOverrides(self.clone()))
    }
}

fn is_rate(v: f64) -> bool {
    (0.0..1.0).contains(&v)
}

fn check_f64(
    value: Option<f64>,
    field: &'static str,
    expected: &'static str,
    ok: impl Fn(f64) -> bool,
) -> Result<(), OverrideError> {
    match value {
        Some(v) if !v.is_finite() || !ok(v) => {
            Err(OverrideError::out_of_range(field, v, expected))
        }
        _ => Ok(()),
    }
}

fn check_count(value: Option<u32>, field: &'static str) -> Result<(), OverrideError> {
    match value {
        Some(0) => Err(OverrideError::out_of_range(field, 0.0, ">= 1")),
        _ => Ok(()),
    }
}

fn check_days(value: Option<u32>, field: &'static str) -> Result<(), OverrideError> {
    match value {
        Some(days) if days == 0 || days > MAX_CALENDAR_DAYS => Err(OverrideError::out_of_range(
            field,
            f64::from(days),
            "1 ..= 3650 days",
        )),
        _ => Ok(()),
    }
}

/// [`Overrides`] that passed validation
///
/// Accessors resolve absent values to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ValidatedOverrides(Overrides);

impl ValidatedOverrides {
    pub fn inner(&self) -> &Overrides {
        &self.0
    }

    pub fn into_inner(self) -> Overrides {
        self.0
    }

    pub fn gmr(&self) -> f64 {
        self.0.gmr.unwrap_or(DEFAULT_GMR)
    }

    pub fn power(&self) -> f64 {
        self.0.power.unwrap_or(DEFAULT_POWER)
    }

    pub fn alpha(&self) -> f64 {
        self.0.alpha.unwrap_or(DEFAULT_ALPHA)
    }

    pub fn theta(&self) -> f64 {
        self.0.theta.unwrap_or(DEFAULT_THETA)
    }

    /// Caller dropout only; the design estimate is applied by the calculator
    pub fn dropout_rate(&self) -> Option<f64> {
        self.0.dropout_rate
    }

    pub fn screenfail_rate(&self) -> f64 {
        self.0.screenfail_rate.unwrap_or(DEFAULT_SCREENFAIL)
    }

    pub fn min_subjects(&self) -> u32 {
        self.0.min_subjects.unwrap_or(DEFAULT_MIN_SUBJECTS)
    }

    pub fn max_base_subjects(&self) -> u32 {
        self.0.max_base_subjects.unwrap_or(DEFAULT_MAX_BASE_SUBJECTS)
    }

    pub fn max_cv_intra(&self) -> f64 {
        self.0.max_cv_intra.unwrap_or(DEFAULT_MAX_CV_INTRA)
    }

    pub fn blood_per_point_ml(&self) -> f64 {
        self.0.blood_per_point_ml.unwrap_or(DEFAULT_BLOOD_PER_POINT_ML)
    }

    pub fn max_blood_ml(&self) -> f64 {
        self.0.max_blood_ml.unwrap_or(DEFAULT_MAX_BLOOD_ML)
    }

    pub fn design_type(&self) -> Option<DesignType> {
        self.0.design_type
    }

    pub fn intake_mode(&self) -> Option<IntakeMode> {
        self.0.intake_mode
    }

    pub fn washout_min_days(&self) -> u32 {
        self.0.washout_min_days.unwrap_or(DEFAULT_WASHOUT_MIN_DAYS)
    }

    pub fn screening_days(&self) -> u32 {
        self.0.screening_days.unwrap_or(DEFAULT_SCREENING_DAYS)
    }

    pub fn follow_up_days(&self) -> u32 {
        self.0.follow_up_days.unwrap_or(DEFAULT_FOLLOW_UP_DAYS)
    }

    pub fn needs_genetics(&self) -> bool {
        self.0.needs_genetics.unwrap_or(false)
    }
}

impl TryFrom<Overrides> for ValidatedOverrides {
    type Error = OverrideError;

    fn try_from(overrides: Overrides) -> Result<Self, Self::Error> {
        overrides.validate()
    }
}
