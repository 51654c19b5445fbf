//! Pharmacokinetic facts consumed by the planner
//!
//! The planner never extracts these values itself. A literature or regulatory
//! provider hands over a [`PkInputs`] record, optionally together with a
//! [`PkProvenance`] describing where each number came from. Every numeric
//! field may be absent; absent values are resolved to documented defaults by
//! the stage that needs them (see [`PkInputs::resolve_cv_intra`]).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PlanningError;

/// CVintra assumed when the provider could not supply one (%)
pub const DEFAULT_CV_INTRA: f64 = 30.0;
/// CVintra at or above which a drug is treated as highly variable (%)
pub const HVD_CV_THRESHOLD: f64 = 30.0;
/// Largest CVintra a provider may report (%)
pub const MAX_REPORTED_CV: f64 = 200.0;

/// Release profile of the dosage form
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseType {
    /// Immediate release
    #[default]
    Immediate,
    /// Modified (extended) release
    Modified,
    /// Delayed release
    Delayed,
}

impl ReleaseType {
    /// Modified and delayed forms require both fasting and fed studies
    pub fn is_modified(&self) -> bool {
        matches!(self, ReleaseType::Modified | ReleaseType::Delayed)
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseType::Immediate => write!(f, "immediate"),
            ReleaseType::Modified => write!(f, "modified"),
            ReleaseType::Delayed => write!(f, "delayed"),
        }
    }
}

/// PK facts for one planning run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PkInputs {
    /// Intra-subject coefficient of variation (%)
    pub cv_intra: Option<f64>,
    /// Elimination half-life (h)
    pub t_half_hours: Option<f64>,
    /// Time to peak concentration (h)
    pub tmax_hours: Option<f64>,
    /// High-variability drug flag as reported by the provider
    #[serde(default)]
    pub is_hvd: bool,
    /// Narrow-therapeutic-index flag
    #[serde(default)]
    pub is_nti: bool,
    #[serde(default)]
    pub release_type: ReleaseType,
}

/// Where a resolved CVintra value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CvSource {
    /// Supplied by the provider
    Provided,
    /// Not supplied; [`DEFAULT_CV_INTRA`] was assumed
    DefaultAssumed,
}

/// A CVintra value together with its origin
///
/// Keeps "the provider said 30%" distinguishable from "nobody knew, 30% was
/// assumed".
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CvIntra {
    pub value: f64,
    pub source: CvSource,
}

impl CvIntra {
    pub fn is_assumed(&self) -> bool {
        self.source == CvSource::DefaultAssumed
    }
}

impl PkInputs {
    /// Create an empty record (everything unknown, immediate release)
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cv_intra(mut self, cv: f64) -> Self {
        self.cv_intra = Some(cv);
        self
    }

    /// Set CVintra from separate Cmax and AUC estimates, keeping the larger
    pub fn with_cv_pair(mut self, cmax: Option<f64>, auc: Option<f64>) -> Self {
        self.cv_intra = match (cmax, auc) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        };
        self
    }

    pub fn with_t_half(mut self, hours: f64) -> Self {
        self.t_half_hours = Some(hours);
        self
    }

    pub fn with_tmax(mut self, hours: f64) -> Self {
        self.tmax_hours = Some(hours);
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

    pub fn with_release_type(mut self, release_type: ReleaseType) -> Self {
        self.release_type = release_type;
        self
    }

    /// Resolve CVintra, falling back to [`DEFAULT_CV_INTRA`] when unknown
    pub fn resolve_cv_intra(&self) -> CvIntra {
        match self.cv_intra {
            Some(value) => CvIntra {
                value,
                source: CvSource::Provided,
            },
            None => CvIntra {
                value: DEFAULT_CV_INTRA,
                source: CvSource::DefaultAssumed,
            },
        }
    }

    /// HVD if flagged by the provider or if the known CVintra reaches the threshold
    pub fn effective_hvd(&self) -> bool {
        self.is_hvd || self.cv_intra.is_some_and(|cv| cv >= HVD_CV_THRESHOLD)
    }

    /// Check that every present value lies in its documented domain
    pub fn validate(&self) -> Result<(), PlanningError> {
        if let Some(cv) = self.cv_intra {
            if !cv.is_finite() || !(0.0..=MAX_REPORTED_CV).contains(&cv) {
                return Err(PlanningError::InvalidInput {
                    field: "cv_intra",
                    value: cv,
                    expected: "0..=200 %",
                });
            }
        }
        if let Some(t_half) = self.t_half_hours {
            if !t_half.is_finite() || t_half < 0.0 {
                return Err(PlanningError::InvalidInput {
                    field: "t_half_hours",
                    value: t_half,
                    expected: ">= 0 h",
                });
            }
        }
        if let Some(tmax) = self.tmax_hours {
            if !tmax.is_finite() || tmax < 0.0 {
                return Err(PlanningError::InvalidInput {
                    field: "tmax_hours",
                    value: tmax,
                    expected: ">= 0 h",
                });
            }
        }
        Ok(())
    }
}

/// Kind of source a PK value was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    /// Product labelling (SmPC / OHLP)
    Label,
    PubMed,
    Fda,
    Ema,
    ClinicalTrials,
    /// Entered by the user
    User,
    Other,
}

/// Provenance of a single PK value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSource {
    pub kind: SourceKind,
    /// Short reference (PMID, DOI or URL)
    pub reference: Option<String>,
    /// Quoted passage the number was read from
    pub quote: Option<String>,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
}

/// Provenance for the values in a [`PkInputs`]
///
/// Returned next to the inputs rather than attached to them, so consumers that
/// only need the numbers never see it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PkProvenance {
    pub cv_intra: Option<ParameterSource>,
    pub t_half: Option<ParameterSource>,
    pub tmax: Option<ParameterSource>,
    /// Name of the component that drove the HVD classification (combination products)
    pub hvd_component: Option<String>,
    /// Reference product the values describe
    pub reference_product: Option<String>,
}

impl PkProvenance {
    /// Lowest confidence among the recorded sources, if any were recorded
    pub fn min_confidence(&self) -> Option<f64> {
        [&self.cv_intra, &self.t_half, &self.tmax]
            .into_iter()
            .flatten()
            .map(|s| s.confidence)
            .reduce(f64::min)
    }
}

/// Output of a PK provider: the facts plus how they were obtained
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PkEstimate {
    pub inputs: PkInputs,
    pub provenance: PkProvenance,
}

impl PkEstimate {
    pub fn new(inputs: PkInputs, provenance: PkProvenance) -> Self {
        Self { inputs, provenance }
    }
}
