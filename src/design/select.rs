use serde::{Deserialize, Serialize};

use super::types::*;
use crate::pk::{PkInputs, ReleaseType, HVD_CV_THRESHOLD};

/// Half-life above which a crossover washout becomes impractical (h)
pub const LONG_T_HALF_HOURS: f64 = 24.0;
/// Washout length in half-lives
pub const WASHOUT_MULTIPLIER: f64 = 6.0;
/// Shortest washout accepted (days)
pub const DEFAULT_WASHOUT_MIN_DAYS: u32 = 7;
/// Washout beyond which attrition is expected to rise (days)
const LONG_WASHOUT_DAYS: u32 = 14;

/// Ordered decision rules mapping PK facts to a trial design
///
/// Every method is a pure function of its arguments and of the selector's
/// configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSelector {
    washout_min_days: u32,
}

impl Default for DesignSelector {
    fn default() -> Self {
        Self {
            washout_min_days: DEFAULT_WASHOUT_MIN_DAYS,
        }
    }
}

impl DesignSelector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_washout_min_days(mut self, days: u32) -> Self {
        self.washout_min_days = days;
        self
    }

    pub fn washout_min_days(&self) -> u32 {
        self.washout_min_days
    }

    /// Select the design; the first matching rule wins
    ///
    /// 1. `t½ > 24 h` → parallel
    /// 2. NTI → 4-period replicate
    /// 3. HVD or `cv_intra ≥ 30` → 4-period replicate
    /// 4. otherwise 2×2 crossover
    ///
    /// With `force_adaptive` the half-life check chooses between the adaptive
    /// parallel and adaptive crossover variants instead.
    pub fn select(
        &self,
        cv_intra: Option<f64>,
        t_half: Option<f64>,
        is_nti: bool,
        is_hvd: bool,
        force_adaptive: bool,
    ) -> DesignType {
        let long_t_half = t_half.is_some_and(|t| t > LONG_T_HALF_HOURS);

        if force_adaptive {
            return if long_t_half {
                DesignType::AdaptiveParallel
            } else {
                DesignType::AdaptiveCrossover
            };
        }

        if long_t_half {
            DesignType::Parallel
        } else if is_nti || is_hvd || cv_intra.is_some_and(|cv| cv >= HVD_CV_THRESHOLD) {
            DesignType::Replicate4
        } else {
            DesignType::Crossover2x2
        }
    }

    /// Washout between periods: `max(min_days, ceil(6 × t½ / 24))`
    pub fn washout(&self, t_half: Option<f64>, design: DesignType) -> Washout {
        if design.is_parallel() {
            return Washout::NotRequired;
        }
        match t_half {
            None => Washout::Undetermined,
            Some(t_half_hours) => {
                let hours = WASHOUT_MULTIPLIER * t_half_hours;
                let days = ((hours / 24.0).ceil() as u32).max(self.washout_min_days);
                Washout::Computed {
                    days,
                    t_half_hours,
                    multiplier: WASHOUT_MULTIPLIER,
                }
            }
        }
    }

    /// Caller choice wins; modified and delayed release need both conditions
    pub fn intake_mode(requested: Option<IntakeMode>, release_type: ReleaseType) -> IntakeMode {
        match requested {
            Some(mode) => mode,
            None if release_type.is_modified() => IntakeMode::Both,
            None => IntakeMode::Fasting,
        }
    }

    /// Expected attrition for a design and washout length
    ///
    /// | Design | Rate | Washout > 14 days |
    /// |--------|------|-------------------|
    /// | parallel | 10% | n/a |
    /// | adaptive (both) | 15% | unchanged |
    /// | replicate | 25% | 30% |
    /// | 2×2 crossover | 12% | 15% |
    pub fn dropout(design: DesignType, washout_days: Option<u32>) -> DropoutEstimate {
        let long_washout = washout_days.filter(|&d| d > LONG_WASHOUT_DAYS);

        let (rate, justification) = match design {
            DesignType::Parallel => (
                0.10,
                "Parallel design, single period: minimal dropout of 10%".to_string(),
            ),
            DesignType::AdaptiveParallel => (
                0.15,
                "Adaptive parallel design (two-stage): dropout 15%".to_string(),
            ),
            DesignType::AdaptiveCrossover => (
                0.15,
                "Adaptive crossover design (two-stage): dropout 15%".to_string(),
            ),
            DesignType::Replicate3 | DesignType::Replicate4 => match long_washout {
                Some(days) => (
                    0.30,
                    format!(
                        "Replicate design (3-4 periods): dropout at least 25%. \
                         Long washout ({days} days): raised to 30%"
                    ),
                ),
                None => (
                    0.25,
                    "Replicate design (3-4 periods): dropout at least 25%".to_string(),
                ),
            },
            DesignType::Crossover2x2 => match long_washout {
                Some(days) => (
                    0.15,
                    format!("2 periods with a long washout ({days} days): dropout 15%"),
                ),
                None => (
                    0.12,
                    "2 periods with a standard washout: dropout 10-12%".to_string(),
                ),
            },
        };

        DropoutEstimate {
            rate,
            justification,
        }
    }

    /// NTI → 90.00–111.11%; otherwise 80.00–125.00%, expandable when HVD
    pub fn acceptance_limits(is_nti: bool, is_hvd: bool) -> AcceptanceLimits {
        if is_nti {
            AcceptanceLimits::NARROW
        } else {
            AcceptanceLimits {
                can_expand: is_hvd,
                ..AcceptanceLimits::STANDARD
            }
        }
    }

    /// Full design decision for one set of PK facts
    ///
    /// `forced` bypasses [`select`](Self::select) entirely.
    pub fn plan(
        &self,
        pk: &PkInputs,
        forced: Option<DesignType>,
        intake: Option<IntakeMode>,
        force_adaptive: bool,
    ) -> DesignPlan {
        let is_hvd = pk.effective_hvd();
        let design_type = forced.unwrap_or_else(|| {
            self.select(
                pk.cv_intra,
                pk.t_half_hours,
                pk.is_nti,
                is_hvd,
                force_adaptive,
            )
        });

        let washout = self.washout(pk.t_half_hours, design_type);
        if washout == Washout::Undetermined {
            tracing::warn!(%design_type, "t½ unknown, washout left undetermined");
        }
        let washout_days = washout.days();
        let dropout = Self::dropout(design_type, washout_days);
        let limits = Self::acceptance_limits(pk.is_nti, is_hvd);
        let intake_mode = Self::intake_mode(intake, pk.release_type);

        tracing::debug!(
            %design_type,
            ?washout_days,
            %intake_mode,
            dropout = dropout.rate,
            "design selected"
        );

        DesignPlan {
            design_type,
            n_periods: design_type.n_periods(),
            n_sequences: design_type.n_sequences(),
            sequences: design_type
                .sequences()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            washout_days,
            washout,
            intake_mode,
            dropout,
            be_lower: limits.lower,
            be_upper: limits.upper,
            be_can_expand: limits.can_expand,
            is_hvd,
            is_nti: pk.is_nti,
            is_modified_release: pk.release_type.is_modified(),
            justification: justification(design_type, pk, is_hvd, forced.is_some()),
        }
    }
}

fn justification(design: DesignType, pk: &PkInputs, is_hvd: bool, forced: bool) -> String {
    if forced {
        return format!("Design {design} set explicitly by the sponsor.");
    }
    let long_t_half = pk.t_half_hours.is_some_and(|t| t > LONG_T_HALF_HOURS);
    let reason = match design {
        DesignType::Parallel => {
            "T½ > 24 h makes a crossover washout impractical, so a parallel design is used"
                .to_string()
        }
        DesignType::AdaptiveParallel | DesignType::AdaptiveCrossover => {
            "the required base sample exceeds the single-stage limit, so a two-stage adaptive \
             design is used"
                .to_string()
        }
        DesignType::Replicate4 if pk.is_nti => {
            "a narrow therapeutic index requires tightened limits and a full replicate design"
                .to_string()
        }
        _ => format!(
            "CVintra {} and T½ {}",
            if is_hvd { "≥ 30%" } else { "< 30%" },
            if long_t_half { "> 24 h" } else { "≤ 24 h" }
        ),
    };
    format!("Design {design} selected: {reason}.")
}
