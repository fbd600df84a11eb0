//! Reference monthly econ engine
//!
//! Prices a well month by month over its cash-flow window using flat prices,
//! gross expense lines, a severance tax, an NPI burden and WI-weighted capex.
//! Ownership comes from the [`WellResult`] so reversion triggers can re-run the
//! same calculation under gross or hypothetical ownership.

use chrono::{Datelike, NaiveDate};
use log::debug;

use super::types::{CapexEntry, EconResult, ExpenseLine, Phase, VolumeSeries, WellResult};
use super::EconCalculator;
use crate::error::EconError;
use crate::ownership::{NpiType, OwnershipParams};
use crate::time::{add_months, days_in_month, month_offset, month_start};
use crate::well::WellInput;

/// Configuration for an econ run
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upper bound on the number of months priced in one run
    pub max_projection_months: u32,

    /// Carry daily well-head volumes into the result for sub-month triggers
    pub include_daily: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_projection_months: 1200, // 100 years
            include_daily: true,
        }
    }
}

/// Main econ engine
#[derive(Debug, Clone, Default)]
pub struct EconEngine {
    config: EngineConfig,
}

/// Priced window: first month start, first day and last day
struct Window {
    first_month: NaiveDate,
    start: NaiveDate,
    end: NaiveDate,
    months: usize,
}

impl EconEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Run the econ calculation for a single well
    pub fn run(&self, well_input: &WellInput, well_result: &WellResult) -> Result<EconResult, EconError> {
        let dates = &well_input.date_dict;
        let fpd = dates.first_production_date;

        let mut result = EconResult::default();
        let window = match self.window(well_input, well_result) {
            Some(window) => window,
            None => {
                debug!("Well {}: empty econ window", well_input.well_id);
                result.capex_detail = self.capex_detail(well_input, well_result);
                return Ok(result);
            }
        };

        for i in 0..window.months {
            let month = add_months(window.first_month, i as i64);
            result.dates.push(month);
            result.time.push(month_offset(month, fpd));
        }

        let ownership = well_result.ownership.aligned(&result.time);
        let volumes = self.well_head_volumes(well_input, &window, &result.dates);
        let capex_detail = self.capex_detail(well_input, well_result);

        let model = &well_input.econ_model;
        let severance = model.production_taxes.severance_tax_pct.unwrap_or(0.0) / 100.0;
        let mut expense_detail: Vec<ExpenseLine> = model
            .expenses
            .iter()
            .map(|item| ExpenseLine {
                name: item.name.clone(),
                values: Vec::with_capacity(window.months),
                affect_econ_limit: item.affect_econ_limit,
            })
            .collect();

        for (i, &month) in result.dates.iter().enumerate() {
            let prorate = month_proration(month, &window);
            let wi = ownership.wi[i];
            let oil = volumes.oil[i];
            let gas = volumes.gas[i];

            let revenue = self.revenue(well_input, &ownership, i, oil, gas);

            let mut expense = 0.0;
            for (line, item) in expense_detail.iter_mut().zip(&model.expenses) {
                let variable = item
                    .phase
                    .map(|phase| item.per_unit * volumes.value(phase, i))
                    .unwrap_or(0.0);
                let value = wi * (item.fixed_per_month * prorate + variable);
                line.values.push(value);
                expense += value;
            }

            let production_tax = severance * revenue;
            let npi = match ownership.npi_type {
                NpiType::Expense => ownership.npi[i] * (revenue - expense - production_tax).max(0.0),
                NpiType::Revenue => ownership.npi[i] * revenue,
            };

            let capex: f64 = capex_detail
                .iter()
                .filter(|entry| entry.index == result.time[i])
                .map(|entry| entry.total)
                .sum();

            result.wi.push(wi);
            result.revenue.push(revenue);
            result.expense.push(expense);
            result.production_tax.push(production_tax);
            result.net_profit_interest.push(npi);
            result.capex.push(capex);
            result.bfit_cf.push(revenue - expense - production_tax - npi - capex);
        }

        result.expense_detail = expense_detail;
        result.capex_detail = capex_detail;
        result.well_head = Some(volumes);
        if self.config.include_daily {
            result.daily = well_input.production.daily.clone();
        }

        debug!(
            "Well {}: priced {} months from {}",
            well_input.well_id,
            result.len(),
            window.start
        );
        Ok(result)
    }

    /// Months to price: from the window start (or cash-flow start) through the
    /// cash-flow end, truncated at the cutoff date when one is set
    fn window(&self, well_input: &WellInput, well_result: &WellResult) -> Option<Window> {
        let dates = &well_input.date_dict;
        let start = well_result.window_start.unwrap_or(dates.cf_start_date);
        let end = match well_result.cutoff_date {
            Some(cutoff) => cutoff.min(dates.cf_end_date),
            None => dates.cf_end_date,
        };
        if end < start {
            return None;
        }

        let first_month = month_start(start);
        let months = (month_offset(end, first_month) + 1) as usize;
        Some(Window {
            first_month,
            start,
            end,
            months: months.min(self.config.max_projection_months as usize),
        })
    }

    /// Gross well-head volumes per priced month, prorated for partial months
    fn well_head_volumes(&self, well_input: &WellInput, window: &Window, months: &[NaiveDate]) -> VolumeSeries {
        let mut volumes = VolumeSeries::new(window.first_month);
        let monthly = well_input.production.monthly.as_ref();

        for &month in months {
            let prorate = month_proration(month, window);
            let idx = monthly.and_then(|series| series.month_index(month));
            let value = |phase: Phase| match (monthly, idx) {
                (Some(series), Some(idx)) => series.value(phase, idx) * prorate,
                _ => 0.0,
            };
            volumes.oil.push(value(Phase::Oil));
            volumes.gas.push(value(Phase::Gas));
            volumes.water.push(value(Phase::Water));
        }
        volumes
    }

    /// Net revenue of month `i`; NGL and drip condensate come out of the gas stream
    fn revenue(&self, well_input: &WellInput, ownership: &OwnershipParams, i: usize, oil: f64, gas: f64) -> f64 {
        let model = &well_input.econ_model;
        let pricing = &model.pricing;
        let mmcf = gas / 1000.0;
        let ngl = mmcf * model.stream_properties.ngl_yield;
        let drip = mmcf * model.stream_properties.drip_condensate_yield;

        oil * ownership.oil_ownership.nri[i] * pricing.oil
            + gas * ownership.gas_ownership.nri[i] * pricing.gas
            + ngl * ownership.ngl_ownership.nri[i] * pricing.ngl
            + drip * ownership.drip_condensate_ownership.nri[i] * pricing.drip_condensate
    }

    /// Net capex schedule.
    ///
    /// After-econ-limit capex moves to the cutoff month when the cut-off model
    /// asks for it and a cutoff is known.
    fn capex_detail(&self, well_input: &WellInput, well_result: &WellResult) -> Vec<CapexEntry> {
        let fpd = well_input.date_dict.first_production_date;
        let offset_to_ecl = well_input.cut_off_model.capex_offset_to_ecl;

        let indices: Vec<i64> = well_input
            .econ_model
            .capex
            .iter()
            .map(|item| match well_result.cutoff_date {
                Some(cutoff) if item.after_econ_limit && offset_to_ecl => month_offset(cutoff, fpd),
                _ => month_offset(item.date, fpd),
            })
            .collect();
        let wi = well_result.ownership.aligned(&indices).wi;

        well_input
            .econ_model
            .capex
            .iter()
            .zip(indices.iter().zip(wi))
            .map(|(item, (&index, wi))| CapexEntry {
                description: item.description.clone(),
                total: wi * item.amount,
                index,
                after_econ_limit: item.after_econ_limit,
            })
            .collect()
    }
}

/// Share of `month` inside the priced window
fn month_proration(month: NaiveDate, window: &Window) -> f64 {
    let days = days_in_month(month) as f64;
    let first_day = if month_start(window.start) == month { window.start.day() } else { 1 };
    let last_day = if month_start(window.end) == month {
        window.end.day()
    } else {
        days_in_month(month)
    };
    (last_day as f64 - first_day as f64 + 1.0).max(0.0) / days
}

impl EconCalculator for EconEngine {
    fn calculate(&self, well_input: &WellInput, well_result: &WellResult) -> Result<EconResult, EconError> {
        self.run(well_input, well_result)
    }
}
