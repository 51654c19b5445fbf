use crate::error::PlanningError;
use crate::pk::{PkInputs, HVD_CV_THRESHOLD};
use crate::planner::{ValidatedOverrides, DEFAULT_ALPHA, DEFAULT_DROPOUT, DEFAULT_POWER};
use crate::tables::{TableKey, TableStore};

use super::types::*;

/// GMR at or below which the θ0 = 0.90 tables are used
const WIDE_GMR: f64 = 0.92;
/// GMR at or above which the stringent NTID table is used
const STRINGENT_NTID_GMR: f64 = 0.96;
/// Guards `ceil` against representation error on exact quotients
const CEIL_TOLERANCE: f64 = 1e-9;

/// Table and method chosen for one lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodSelection {
    pub method: SizingMethod,
    pub table: TableKey,
    /// HVD with two periods; the scaled method needs at least three
    pub hvd_fallback: bool,
}

/// Select the statistical method and reference table; the first rule wins
///
/// 1. NTI → NTID table (θ0 = 0.975 when `gmr ≥ 0.96`)
/// 2. HVD with `cv ≥ 30`: 4+ periods → ABEL 4-period, 3 periods → ABEL
///    3-period, 2 periods → unscaled crossover table
/// 3. otherwise unscaled, parallel for one period, crossover for more
///
/// A single-period design never uses the scaled tables, HVD or not.
///
/// The θ0 = 0.90 variants are used when `gmr ≤ 0.92`.
pub fn select_method(
    cv: f64,
    gmr: f64,
    n_periods: u32,
    is_hvd: bool,
    is_nti: bool,
) -> MethodSelection {
    let wide = gmr <= WIDE_GMR;
    let tost_crossover = if wide {
        TableKey::TostCrossover090
    } else {
        TableKey::TostCrossover095
    };

    if is_nti {
        let table = if gmr >= STRINGENT_NTID_GMR {
            TableKey::Ntid0975
        } else {
            TableKey::Ntid095
        };
        return MethodSelection {
            method: SizingMethod::Ntid,
            table,
            hvd_fallback: false,
        };
    }

    if is_hvd && cv >= HVD_CV_THRESHOLD && n_periods >= 2 {
        return match n_periods {
            n if n >= 4 => MethodSelection {
                method: SizingMethod::ScaledAbel,
                table: if wide {
                    TableKey::Abel4Period090
                } else {
                    TableKey::Abel4Period095
                },
                hvd_fallback: false,
            },
            3 => MethodSelection {
                method: SizingMethod::ScaledAbel,
                table: TableKey::Abel3Period095,
                hvd_fallback: false,
            },
            _ => MethodSelection {
                method: SizingMethod::Tost,
                table: tost_crossover,
                hvd_fallback: true,
            },
        };
    }

    let table = if n_periods == 1 {
        if wide {
            TableKey::TostParallel090
        } else {
            TableKey::TostParallel095
        }
    } else {
        tost_crossover
    };
    MethodSelection {
        method: SizingMethod::Tost,
        table,
        hvd_fallback: false,
    }
}

/// Inflate `n` for an expected loss rate
fn inflate(n: u32, rate: f64) -> u32 {
    let inflated = n as f64 / (1.0 - rate);
    ((inflated - CEIL_TOLERANCE).ceil() as u32).max(n)
}

/// Reference-table sample-size calculator
///
/// Borrows its tables, so one [`TableStore`] can serve many calculators.
#[derive(Debug, Clone, Copy)]
pub struct SampleSizeCalculator<'a> {
    tables: &'a TableStore,
}

impl Default for SampleSizeCalculator<'static> {
    fn default() -> Self {
        Self {
            tables: TableStore::builtin(),
        }
    }
}

impl<'a> SampleSizeCalculator<'a> {
    pub fn new(tables: &'a TableStore) -> Self {
        Self { tables }
    }

    pub fn tables(&self) -> &'a TableStore {
        self.tables
    }

    /// Compute the sample size for one request
    ///
    /// Missing CVintra resolves to 30%; CVintra above the configured ceiling
    /// is clamped. Neither is an error. Fails only for zero periods, a CV
    /// outside 0–200%, or a missing reference table.
    pub fn compute(
        &self,
        request: &SampleSizeRequest,
        overrides: &ValidatedOverrides,
    ) -> Result<SampleSizePlan, PlanningError> {
        if request.n_periods == 0 {
            return Err(PlanningError::InvalidPeriods(0));
        }
        let pk = PkInputs {
            cv_intra: request.cv_intra,
            ..PkInputs::default()
        };
        pk.validate()?;

        let resolved = pk.resolve_cv_intra();
        if resolved.is_assumed() {
            tracing::warn!(cv = resolved.value, "CVintra unknown, assuming default");
        }
        let max_cv = overrides.max_cv_intra();
        let cv_intra_clamped = resolved.value > max_cv;
        let cv = resolved.value.min(max_cv);
        if cv_intra_clamped {
            tracing::warn!(cv = resolved.value, max_cv, "CVintra clamped to ceiling");
        }

        let is_hvd = request.is_hvd || cv >= HVD_CV_THRESHOLD;
        let gmr = overrides.gmr();
        let power = overrides.power();
        let alpha = overrides.alpha();
        if power != DEFAULT_POWER || alpha != DEFAULT_ALPHA {
            tracing::warn!(
                power,
                alpha,
                "reference tables were computed for power 0.80 and alpha 0.05"
            );
        }

        let selection = select_method(cv, gmr, request.n_periods, is_hvd, request.is_nti);
        if selection.hvd_fallback {
            tracing::warn!(
                cv,
                n_periods = request.n_periods,
                "HVD with two periods, scaled limits unavailable, using unscaled table"
            );
        }

        let min_subjects = overrides.min_subjects();
        let table = self.tables.get(selection.table)?;
        let n_base = table.interpolate(cv, min_subjects).max(min_subjects);
        tracing::debug!(
            table = %selection.table,
            method = %selection.method,
            cv,
            n_base,
            "base sample size interpolated"
        );

        let needs_adaptive = n_base > overrides.max_base_subjects();
        if needs_adaptive {
            tracing::warn!(
                n_base,
                max = overrides.max_base_subjects(),
                "base sample exceeds single-stage limit"
            );
        }

        let dropout_rate = overrides
            .dropout_rate()
            .or(request.design_dropout)
            .unwrap_or(DEFAULT_DROPOUT);
        let screenfail_rate = overrides.screenfail_rate();
        let n_with_dropout = inflate(n_base, dropout_rate);
        let n_with_screenfail = inflate(n_with_dropout, screenfail_rate);
        let n_total = n_with_screenfail.max(min_subjects);

        let blood_volume_ml = request.blood_points_per_period as f64
            * request.n_periods as f64
            * overrides.blood_per_point_ml()
            + request.blood_overhead_ml;
        let blood_volume_ok = blood_volume_ml <= overrides.max_blood_ml();
        if !blood_volume_ok {
            tracing::warn!(
                blood_volume_ml,
                max = overrides.max_blood_ml(),
                "blood volume exceeds ceiling"
            );
        }

        Ok(SampleSizePlan {
            n_base,
            n_with_dropout,
            n_with_screenfail,
            n_total,
            cv_intra_used: cv,
            cv_intra_assumed: resolved.is_assumed(),
            cv_intra_clamped,
            power,
            alpha,
            gmr,
            theta: overrides.theta(),
            dropout_rate,
            screenfail_rate,
            blood_volume_ml,
            blood_volume_ok,
            needs_adaptive,
            method: selection.method,
            table: selection.table,
            hvd_fallback: selection.hvd_fallback,
            n_periods: request.n_periods,
            is_hvd,
            is_nti: request.is_nti,
        })
    }
}
