//! Full evaluation of a well: reversions, economic limit, final cash flow
//!
//! The evaluator holds one econ calculator and reuses it for every well, so a
//! batch of wells can be run in parallel without re-reading anything.

use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::cutoff::{cutoff_results, CutoffOutcome};
use crate::econ::discount::{monthly_multipliers, present_value};
use crate::econ::{EconCalculator, EconEngine, EconResult, EconSummary, WellResult};
use crate::error::EconError;
use crate::ownership::{final_ownership_and_reversion_dates, get_initial_ownership_params, ReversionOutcome};
use crate::well::WellInput;

/// Everything produced for one well
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellEvaluation {
    pub well_id: String,
    pub reversion: ReversionOutcome,
    pub cutoff: CutoffOutcome,
    /// Econ result truncated at the economic limit
    pub econ: EconResult,
    pub summary: EconSummary,
    /// NPV of the BFIT cash flow at the first discount rate
    pub npv_first: f64,
    /// NPV of the BFIT cash flow at the second discount rate
    pub npv_second: f64,
}

/// One line of a batch summary
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    pub well_id: String,
    pub cutoff_date: String,
    pub unecon: bool,
    pub reversions: usize,
    pub months: u32,
    pub revenue: f64,
    pub expense: f64,
    pub production_tax: f64,
    pub capex: f64,
    pub bfit_cf: f64,
    pub npv_first: f64,
    pub npv_second: f64,
    pub irr: Option<f64>,
}

impl WellEvaluation {
    pub fn summary_row(&self) -> SummaryRow {
        SummaryRow {
            well_id: self.well_id.clone(),
            cutoff_date: self.cutoff.cutoff_date.to_string(),
            unecon: self.cutoff.unecon,
            reversions: self.reversion.reversion_details.len(),
            months: self.summary.total_months,
            revenue: self.summary.total_revenue,
            expense: self.summary.total_expense,
            production_tax: self.summary.total_production_tax,
            capex: self.summary.total_capex,
            bfit_cf: self.summary.total_bfit_cf,
            npv_first: self.npv_first,
            npv_second: self.npv_second,
            irr: self.summary.irr,
        }
    }
}

/// Reusable well evaluator
#[derive(Debug, Clone)]
pub struct WellEvaluator<C = EconEngine> {
    calc: C,
}

impl WellEvaluator<EconEngine> {
    /// Evaluator backed by the reference econ engine
    pub fn new() -> Self {
        Self {
            calc: EconEngine::default(),
        }
    }
}

impl Default for WellEvaluator<EconEngine> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: EconCalculator> WellEvaluator<C> {
    pub fn with_calculator(calc: C) -> Self {
        Self { calc }
    }

    /// Evaluate a single well
    pub fn evaluate(&self, well: &WellInput) -> Result<WellEvaluation, EconError> {
        let dates = &well.date_dict;
        let initial = get_initial_ownership_params(&well.ownership_model.initial_ownership, dates, None);

        let reversion = final_ownership_and_reversion_dates(&self.calc, well, &WellResult::new(initial))?;
        let well_result = WellResult::new(reversion.state());
        let mut cutoff = cutoff_results(&self.calc, well, &well_result, true)?;

        let econ = match cutoff.econ_result.take() {
            Some(econ) => econ,
            None => self.calc.calculate(well, &well_result.with_cutoff(cutoff.cutoff_date))?,
        };

        let table = &well.general_option_model.discount_table;
        let npv_at = |rate_pct: f64| {
            let multipliers = monthly_multipliers(table, rate_pct / 100.0, &econ.dates, dates.discount_anchor());
            present_value(&econ.bfit_cf, &multipliers)
        };
        let npv_first = npv_at(table.first_discount);
        let npv_second = npv_at(table.second_discount);

        info!(
            "Well {}: {} months to {}, NPV{} {:.2}",
            well.well_id,
            econ.len(),
            cutoff.cutoff_date,
            table.first_discount,
            npv_first
        );

        Ok(WellEvaluation {
            well_id: well.well_id.clone(),
            summary: econ.summary(),
            reversion,
            cutoff,
            econ,
            npv_first,
            npv_second,
        })
    }
}

impl<C: EconCalculator + Sync> WellEvaluator<C> {
    /// Evaluate wells in parallel.
    ///
    /// A failing well is logged with its id and reported in its slot; the rest
    /// of the batch carries on.
    pub fn evaluate_batch(&self, wells: &[WellInput]) -> Vec<(String, Result<WellEvaluation, EconError>)> {
        wells
            .par_iter()
            .map(|well| {
                let result = self.evaluate(well);
                if let Err(e) = &result {
                    warn!("Well {} failed: {}", well.well_id, e);
                }
                (well.well_id.clone(), result)
            })
            .collect()
    }
}
