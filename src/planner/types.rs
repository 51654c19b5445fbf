use serde::{Deserialize, Serialize};

use crate::blood::BloodPlan;
use crate::design::DesignPlan;
use crate::pk::PkInputs;
use crate::sizing::SampleSizePlan;
use crate::timeline::Timeline;

/// Complete bioequivalence study plan
///
/// Built once per planning call and never mutated. A re-plan produces a new
/// value; identical inputs produce identical plans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyProtocolPlan {
    /// PK facts the plan was built from
    pub pk: PkInputs,
    pub design: DesignPlan,
    pub sample_size: SampleSizePlan,
    pub blood: BloodPlan,
    pub timeline: Timeline,
    /// Sample-size calculation text
    pub narrative: String,
    /// The design was switched to its adaptive variant after the first sizing
    pub escalated: bool,
}

impl StudyProtocolPlan {
    /// Subjects to randomise
    pub fn n_subjects(&self) -> u32 {
        self.sample_size.n_with_dropout
    }

    /// Subjects to screen
    pub fn n_screened(&self) -> u32 {
        self.sample_size.n_total
    }

    /// Bioanalytical samples over the whole study
    pub fn biosamples_total(&self) -> u32 {
        self.blood.biosamples_total(self.n_subjects())
    }

    pub fn groups_description(&self) -> String {
        self.design.groups_description(self.n_subjects())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
