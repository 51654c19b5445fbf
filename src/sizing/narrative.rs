//! Deterministic calculation narrative for the protocol synopsis

use super::types::{SampleSizePlan, SizingMethod};
use crate::design::AcceptanceLimits;

impl SampleSizePlan {
    /// Study design code and label as the reference package names them
    fn design_label(&self) -> (&'static str, &'static str) {
        match (self.method, self.n_periods) {
            (SizingMethod::Ntid, _) => ("2x2x4", "2x2x4 (4 period full replicate)"),
            (SizingMethod::ScaledAbel, 3) => ("2x2x3", "2x2x3 (3 period partial replicate)"),
            (SizingMethod::ScaledAbel, _) => ("2x2x4", "2x2x4 (4 period full replicate)"),
            (SizingMethod::Tost, 1) => ("parallel", "parallel (2 groups)"),
            (SizingMethod::Tost, _) => ("2x2x2", "2x2x2 (2 period crossover)"),
        }
    }

    /// Audit text: method, reference call, result block and inflation steps
    pub fn narrative(&self) -> String {
        let (design_code, design_label) = self.design_label();
        let cv = self.cv_intra_used / 100.0;
        let mut lines: Vec<String> = Vec::new();

        lines.push(
            "The sample size was calculated with The R Project for Statistical Computing \
             (https://www.r-project.org), version 4.4.2 or later, package PowerTOST."
                .to_string(),
        );
        let mut cv_line = format!(
            "The calculation is based on the intra-subject coefficient of variation \
             (CVintra), which is {}% for the active substance.",
            self.cv_intra_used
        );
        if self.cv_intra_assumed {
            cv_line.push_str(" CVintra was not available and a conservative 30% was assumed.");
        }
        if self.cv_intra_clamped {
            cv_line.push_str(" The reported CVintra exceeded the ceiling and was capped.");
        }
        lines.push(cv_line);

        lines.push("The following call was used:".to_string());
        lines.push(format!(
            "{}(CV={cv}, theta0={}, targetpower={}, design=\"{design_code}\")",
            self.method.reference_function(),
            self.gmr,
            self.power
        ));
        if self.hvd_fallback {
            lines.push(
                "The drug is highly variable, but scaled limits require at least three \
                 periods; the unscaled TOST method was applied to the two-period design."
                    .to_string(),
            );
        }

        lines.push("Results:".to_string());
        lines.push(self.result_block(cv, design_label));

        lines.push(format!(
            "Enrolling {} subjects, of whom {} complete the study, provides {:.1}% power \
             to demonstrate bioequivalence in a {}-period design with 90% confidence \
             intervals for the geometric mean ratio of each PK parameter (Cmax, AUC0-t) \
             and an expected test/reference ratio of {}.",
            self.n_with_dropout,
            self.n_base,
            self.power * 100.0,
            self.n_periods,
            self.gmr
        ));
        lines.push(format!(
            "Allowing for a dropout of approximately {:.0}%, {} subjects must be randomised.",
            self.dropout_rate * 100.0,
            self.n_with_dropout
        ));
        lines.push(format!(
            "Allowing for a {:.0}% screening failure rate, up to {} subjects will be screened.",
            self.screenfail_rate * 100.0,
            self.n_total
        ));
        lines.push("Subjects who withdraw early will not be replaced.".to_string());

        lines.join("\n")
    }

    fn result_block(&self, cv: f64, design_label: &str) -> String {
        match self.method {
            SizingMethod::Ntid => format!(
                "+++++++++++ {method} ++++++++++++\n\
                 \x20           Sample size estimation\n\
                 \x20  (FDA NTID method, reference-scaled)\n\
                 ----------------------------------------------\n\
                 Study design: {design_label}\n\
                 log-transformed data (multiplicative model)\n\n\
                 Assumed CVwR {cv}, CVwT {cv}\n\
                 Nominal alpha      : {alpha}\n\
                 True ratio         : {gmr}\n\
                 Target power       : {power}\n\
                 Regulatory settings: FDA (NTID)\n\
                 BE limits          : {lo:.4} ... {hi:.4}\n\
                 n  {n}, power ~{power:.2}",
                method = self.method,
                alpha = self.alpha,
                gmr = self.gmr,
                power = self.power,
                lo = AcceptanceLimits::NARROW.lower / 100.0,
                hi = AcceptanceLimits::NARROW.upper / 100.0,
                n = self.n_base,
            ),
            SizingMethod::ScaledAbel => {
                let expandable = AcceptanceLimits {
                    can_expand: true,
                    ..AcceptanceLimits::STANDARD
                };
                let (lo, hi) = expandable
                    .expanded(self.cv_intra_used)
                    .unwrap_or((expandable.lower, expandable.upper));
                format!(
                    "+++++++++++ {method} ++++++++++++\n\
                     \x20           Sample size estimation\n\
                     \x20       for iteratively adjusted alpha\n\
                     \x20  (simulations based on ANOVA evaluation)\n\
                     ----------------------------------------------\n\
                     Study design: {design_label}\n\
                     log-transformed data (multiplicative model)\n\
                     1,000,000 studies in each iteration simulated.\n\n\
                     Assumed CVwR {cv}, CVwT {cv}\n\
                     Nominal alpha      : {alpha}\n\
                     True ratio         : {gmr}\n\
                     Target power       : {power}\n\
                     Regulatory settings: EMA (ABEL)\n\
                     Switching CVwR     : 0.3\n\
                     Regulatory constant: 0.76\n\
                     Expanded limits    : {lo:.4} ... {hi:.4}\n\
                     Upper scaling cap  : CVwR > 0.5\n\
                     PE constraints     : 0.8000 ... 1.2500\n\
                     n  {n}, power ~{power:.2}",
                    method = self.method,
                    alpha = self.alpha,
                    gmr = self.gmr,
                    power = self.power,
                    lo = lo / 100.0,
                    hi = hi / 100.0,
                    n = self.n_base,
                )
            }
            SizingMethod::Tost => format!(
                "+++++++++++ {method} ++++++++++++\n\
                 \x20           Sample size estimation\n\
                 \x20         (exact) for TOST\n\
                 ----------------------------------------------\n\
                 Study design: {design_label}\n\
                 log-transformed data (multiplicative model)\n\n\
                 alpha = {alpha}, target power = {power}\n\
                 BE limits        : {lo:.4} ... {hi:.4}\n\
                 True ratio       : {gmr}\n\
                 CV               : {cv}\n\n\
                 Sample size (total)\n\
                 n  {n}, power ~{power:.2}",
                method = self.method,
                alpha = self.alpha,
                gmr = self.gmr,
                power = self.power,
                lo = 1.0 / self.theta,
                hi = self.theta,
                n = self.n_base,
            ),
        }
    }
}
