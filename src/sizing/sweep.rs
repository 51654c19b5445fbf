use rayon::prelude::*;

use super::calc::SampleSizeCalculator;
use super::types::{SampleSizePlan, SampleSizeRequest};
use crate::error::PlanningError;
use crate::planner::ValidatedOverrides;

/// One point of a CV sensitivity sweep
#[derive(Debug, Clone, PartialEq)]
pub struct SweepPoint {
    pub cv_intra: f64,
    pub plan: SampleSizePlan,
}

impl SampleSizeCalculator<'_> {
    /// Size the same request across a grid of CVintra values
    ///
    /// Points are computed in parallel and returned in the order of `cvs`.
    /// The first failing point aborts the sweep.
    pub fn sweep(
        &self,
        base: &SampleSizeRequest,
        cvs: &[f64],
        overrides: &ValidatedOverrides,
    ) -> Result<Vec<SweepPoint>, PlanningError> {
        cvs.par_iter()
            .map(|&cv_intra| {
                let request = base.clone().with_cv_intra(cv_intra);
                let plan = self.compute(&request, overrides)?;
                Ok(SweepPoint { cv_intra, plan })
            })
            .collect()
    }
}
