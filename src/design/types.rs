//! Design types: trial architecture, intake condition, acceptance limits

use serde::{Deserialize, Serialize};
use std::fmt;

/// Trial architecture
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DesignType {
    /// Two-period, two-sequence crossover (TR/RT)
    #[serde(rename = "crossover_2x2")]
    Crossover2x2,
    /// Three-period partial replicate (TRT/RTR/TRR)
    #[serde(rename = "replicate_3")]
    Replicate3,
    /// Four-period full replicate (TRTR/RTRT)
    #[serde(rename = "replicate_4")]
    Replicate4,
    /// Two parallel groups, one period
    Parallel,
    /// Two-stage adaptive crossover
    AdaptiveCrossover,
    /// Two-stage adaptive parallel
    AdaptiveParallel,
}

impl DesignType {
    pub fn n_periods(&self) -> u32 {
        match self {
            DesignType::Crossover2x2 | DesignType::AdaptiveCrossover => 2,
            DesignType::Replicate3 => 3,
            DesignType::Replicate4 => 4,
            DesignType::Parallel | DesignType::AdaptiveParallel => 1,
        }
    }

    pub fn n_sequences(&self) -> u32 {
        match self {
            DesignType::Replicate3 => 3,
            _ => 2,
        }
    }

    /// Treatment sequences (or groups, for parallel designs)
    pub fn sequences(&self) -> &'static [&'static str] {
        match self {
            DesignType::Crossover2x2 | DesignType::AdaptiveCrossover => &["TR", "RT"],
            DesignType::Replicate3 => &["TRT", "RTR", "TRR"],
            DesignType::Replicate4 => &["TRTR", "RTRT"],
            DesignType::Parallel | DesignType::AdaptiveParallel => &["T", "R"],
        }
    }

    pub fn is_parallel(&self) -> bool {
        matches!(self, DesignType::Parallel | DesignType::AdaptiveParallel)
    }

    pub fn is_adaptive(&self) -> bool {
        matches!(
            self,
            DesignType::AdaptiveCrossover | DesignType::AdaptiveParallel
        )
    }

    pub fn is_replicate(&self) -> bool {
        matches!(self, DesignType::Replicate3 | DesignType::Replicate4)
    }

    /// Long human-readable description of the sequences
    pub fn sequences_description(&self) -> String {
        match self {
            DesignType::Crossover2x2 => "Sequence 1: T→R. Sequence 2: R→T".to_string(),
            DesignType::Replicate3 => "TRT / RTR / TRR (3-period partial replicate)".to_string(),
            DesignType::Replicate4 => "Sequence 1: T→R→T→R. Sequence 2: R→T→R→T".to_string(),
            DesignType::Parallel => "Group 1: T (test). Group 2: R (reference)".to_string(),
            DesignType::AdaptiveCrossover => "Two-stage adaptive crossover. Stage 1: pilot cohort (TR/RT). \
                 Stage 2: extended cohort sized from the interim analysis"
                .to_string(),
            DesignType::AdaptiveParallel => "Two-stage adaptive parallel. Stage 1: pilot cohort (T vs R). \
                 Stage 2: extended cohort sized from the interim analysis"
                .to_string(),
        }
    }
}

impl fmt::Display for DesignType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DesignType::Crossover2x2 => write!(f, "crossover_2x2"),
            DesignType::Replicate3 => write!(f, "replicate_3"),
            DesignType::Replicate4 => write!(f, "replicate_4"),
            DesignType::Parallel => write!(f, "parallel"),
            DesignType::AdaptiveCrossover => write!(f, "adaptive_crossover"),
            DesignType::AdaptiveParallel => write!(f, "adaptive_parallel"),
        }
    }
}

/// Intake condition for dosing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntakeMode {
    /// At least 8 h without food before dosing, 4 h after
    #[default]
    Fasting,
    /// After a standardised meal
    Fed,
    /// Separate fasting and fed studies
    Both,
}

impl fmt::Display for IntakeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntakeMode::Fasting => write!(f, "fasting"),
            IntakeMode::Fed => write!(f, "fed"),
            IntakeMode::Both => write!(f, "both"),
        }
    }
}

/// Bioequivalence acceptance interval for the 90% CI of the GMR (%)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AcceptanceLimits {
    pub lower: f64,
    pub upper: f64,
    /// Cmax limits may be widened by reference scaling (HVD)
    pub can_expand: bool,
}

/// Regulatory constant of the EMA ABEL method
const ABEL_K: f64 = 0.76;
/// CVwR above which the expansion no longer grows (%)
const ABEL_CAP_CV: f64 = 50.0;
/// CVwR below which no expansion is allowed (%)
const ABEL_SWITCH_CV: f64 = 30.0;

impl AcceptanceLimits {
    pub const STANDARD: AcceptanceLimits = AcceptanceLimits {
        lower: 80.0,
        upper: 125.0,
        can_expand: false,
    };

    pub const NARROW: AcceptanceLimits = AcceptanceLimits {
        lower: 90.0,
        upper: 111.11,
        can_expand: false,
    };

    /// Expanded (reference-scaled) limits for a given CVwR
    ///
    /// Returns `None` when the limits cannot be expanded or `cv` is below the
    /// switching CV. The expansion is capped at CVwR = 50%.
    pub fn expanded(&self, cv: f64) -> Option<(f64, f64)> {
        if !self.can_expand || cv < ABEL_SWITCH_CV {
            return None;
        }
        let cv = cv.min(ABEL_CAP_CV) / 100.0;
        let sigma_wr = (cv * cv + 1.0).ln().sqrt();
        let lower = (-ABEL_K * sigma_wr).exp() * 100.0;
        let upper = (ABEL_K * sigma_wr).exp() * 100.0;
        Some((round2(lower), round2(upper)))
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Rest period between dosing periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Washout {
    /// Single-period design
    NotRequired,
    /// Half-life unknown; must be set before the protocol is finalised
    Undetermined,
    /// Derived from the half-life
    Computed {
        days: u32,
        t_half_hours: f64,
        multiplier: f64,
    },
}

impl Washout {
    pub fn days(&self) -> Option<u32> {
        match self {
            Washout::Computed { days, .. } => Some(*days),
            _ => None,
        }
    }

    /// Calculation shown in the protocol
    pub fn formula(&self) -> String {
        match self {
            Washout::NotRequired => "Parallel design: no washout period required".to_string(),
            Washout::Undetermined => {
                "T½ unknown: washout period undetermined, to be specified".to_string()
            }
            Washout::Computed {
                days,
                t_half_hours,
                multiplier,
            } => format!(
                "{multiplier} × {t_half_hours:.1} h = {:.0} h ≈ {days} days",
                multiplier * t_half_hours
            ),
        }
    }
}

/// Expected attrition and its reasoning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropoutEstimate {
    pub rate: f64,
    pub justification: String,
}

/// Complete design decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignPlan {
    pub design_type: DesignType,
    pub n_periods: u32,
    pub n_sequences: u32,
    pub sequences: Vec<String>,
    /// Washout length in days; `None` for parallel designs and unknown half-life
    pub washout_days: Option<u32>,
    pub washout: Washout,
    pub intake_mode: IntakeMode,
    pub dropout: DropoutEstimate,
    pub be_lower: f64,
    pub be_upper: f64,
    pub be_can_expand: bool,
    pub is_hvd: bool,
    pub is_nti: bool,
    pub is_modified_release: bool,
    /// Short deterministic justification of the selected design
    pub justification: String,
}

impl DesignPlan {
    pub fn limits(&self) -> AcceptanceLimits {
        AcceptanceLimits {
            lower: self.be_lower,
            upper: self.be_upper,
            can_expand: self.be_can_expand,
        }
    }

    /// Subjects per sequence group; the first groups absorb any remainder
    pub fn group_sizes(&self, n_subjects: u32) -> Vec<u32> {
        let groups = self.n_sequences.max(1);
        let base = n_subjects / groups;
        let extra = n_subjects % groups;
        (0..groups).map(|g| base + u32::from(g < extra)).collect()
    }

    /// `Group 1 (n=19): TR; Group 2 (n=18): RT`
    pub fn groups_description(&self, n_subjects: u32) -> String {
        self.group_sizes(n_subjects)
            .iter()
            .zip(&self.sequences)
            .enumerate()
            .map(|(i, (n, seq))| format!("Group {} (n={n}): {seq}", i + 1))
            .collect::<Vec<_>>()
            .join("; ")
    }
}
