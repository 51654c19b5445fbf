use serde::{Deserialize, Serialize};
use std::fmt;

use crate::design::DesignPlan;
use crate::tables::TableKey;

/// PK draws per period assumed when the blood budget is not known yet
pub const DEFAULT_BLOOD_POINTS: u32 = 18;

/// Statistical method behind a sample-size lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizingMethod {
    /// Unscaled two one-sided tests
    Tost,
    /// Average bioequivalence with expanding limits
    ScaledAbel,
    /// Narrow-therapeutic-index method
    Ntid,
}

impl SizingMethod {
    /// PowerTOST function the reference tables were produced with
    pub fn reference_function(&self) -> &'static str {
        match self {
            SizingMethod::Tost => "sampleN.TOST",
            SizingMethod::ScaledAbel => "sampleN.scABEL.ad",
            SizingMethod::Ntid => "sampleN.NTID",
        }
    }
}

impl fmt::Display for SizingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SizingMethod::Tost => write!(f, "TOST"),
            SizingMethod::ScaledAbel => write!(f, "scaled (widened) ABEL"),
            SizingMethod::Ntid => write!(f, "NTID (reference-scaled)"),
        }
    }
}

/// Input of one sample-size computation
///
/// `gmr`, power and inflation rates come from the overrides; everything that
/// depends on the design is carried here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSizeRequest {
    /// CVintra (%); `None` resolves to 30%
    pub cv_intra: Option<f64>,
    pub n_periods: u32,
    pub is_hvd: bool,
    pub is_nti: bool,
    /// Dropout estimated by the design stage
    pub design_dropout: Option<f64>,
    /// PK draws per period
    pub blood_points_per_period: u32,
    /// Per-subject blood drawn outside the PK schedule (mL)
    pub blood_overhead_ml: f64,
}

impl SampleSizeRequest {
    pub fn new(cv_intra: Option<f64>, n_periods: u32) -> Self {
        Self {
            cv_intra,
            n_periods,
            is_hvd: false,
            is_nti: false,
            design_dropout: None,
            blood_points_per_period: DEFAULT_BLOOD_POINTS,
            blood_overhead_ml: 0.0,
        }
    }

    /// Request matching a design decision
    pub fn from_design(design: &DesignPlan, cv_intra: Option<f64>) -> Self {
        Self {
            is_hvd: design.is_hvd,
            is_nti: design.is_nti,
            design_dropout: Some(design.dropout.rate),
            ..Self::new(cv_intra, design.n_periods)
        }
    }

    pub fn with_cv_intra(mut self, cv: f64) -> Self {
        self.cv_intra = Some(cv);
        self
    }

    pub fn with_hvd(mut self, is_hvd: bool) -> Self {
        self.is_hvd = is_hvd;
        self
    }

    pub fn with_nti(mut self, is_nti: bool) -> Self {
        self.is_nti = is_nti;
        self
    }

    pub fn with_design_dropout(mut self, rate: f64) -> Self {
        self.design_dropout = Some(rate);
        self
    }

    pub fn with_blood(mut self, points_per_period: u32, overhead_ml: f64) -> Self {
        self.blood_points_per_period = points_per_period;
        self.blood_overhead_ml = overhead_ml;
        self
    }
}

/// Result of a sample-size computation
///
/// `n_base ≤ n_with_dropout ≤ n_with_screenfail ≤ n_total` and
/// `n_total ≥ min_subjects` always hold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSizePlan {
    /// Completers required by the reference table
    pub n_base: u32,
    /// Subjects to randomise
    pub n_with_dropout: u32,
    /// Subjects to screen
    pub n_with_screenfail: u32,
    pub n_total: u32,
    /// CVintra after default resolution and clamping (%)
    pub cv_intra_used: f64,
    /// CVintra was unknown and 30% was assumed
    pub cv_intra_assumed: bool,
    /// CVintra was above the ceiling and clamped
    pub cv_intra_clamped: bool,
    pub power: f64,
    pub alpha: f64,
    pub gmr: f64,
    pub theta: f64,
    pub dropout_rate: f64,
    pub screenfail_rate: f64,
    /// Per-subject blood volume (mL)
    pub blood_volume_ml: f64,
    pub blood_volume_ok: bool,
    /// Base sample exceeds the single-stage limit
    pub needs_adaptive: bool,
    pub method: SizingMethod,
    pub table: TableKey,
    /// HVD with two periods, sized with the unscaled table
    pub hvd_fallback: bool,
    pub n_periods: u32,
    pub is_hvd: bool,
    pub is_nti: bool,
}
