//! Economic-limit orchestration for one well

use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::adjust::{adjust_cutoff, apply_min_cut_off, if_cf_cutoff_unecon};
use super::model::CutOffCriterion;
use super::policies::{
    apply_date_cutoff, apply_rate_cutoff, cf_after_expense_deduction, get_first_negative_with_tolerance,
    get_last_positive_cash_flow, get_max_cum_cash_flow,
};
use crate::econ::discount::monthly_multipliers;
use crate::econ::{EconCalculator, EconResult, WellResult};
use crate::error::EconError;
use crate::time::{add_months, month_end, month_offset};
use crate::well::WellInput;

/// Economic limit of a well
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutoffOutcome {
    pub cutoff_date: NaiveDate,
    /// Month offset of the cutoff from the FPD month
    pub t_cutoff: i64,
    pub unecon: bool,
    /// First negative cash-flow month skipped by the tolerance, as an index
    /// into the econ result
    #[serde(default)]
    pub first_tolerated: Option<usize>,
    /// Well result with the cutoff applied, when requested
    #[serde(default)]
    pub well_result: Option<WellResult>,
    /// Econ result re-run with the cutoff applied, when requested
    #[serde(default)]
    pub econ_result: Option<EconResult>,
}

/// Raw limit from a cash-flow or rate policy before clamping
struct RawCutoff {
    date: NaiveDate,
    unecon: bool,
    first_tolerated: Option<usize>,
}

fn cash_flow_cutoff(well_input: &WellInput, econ: &EconResult, criterion: CutOffCriterion) -> RawCutoff {
    let model = &well_input.cut_off_model;
    let dates = &well_input.date_dict;
    if econ.is_empty() {
        return RawCutoff {
            date: dates.as_of_date,
            unecon: true,
            first_tolerated: None,
        };
    }

    let cf = cf_after_expense_deduction(model.include_capex, econ);
    let (idx, unecon, first_tolerated) = match criterion {
        CutOffCriterion::FirstNegativeCashFlow => get_first_negative_with_tolerance(&cf, model.tolerance()),
        CutOffCriterion::LastPositiveCashFlow => {
            let (idx, unecon) = get_last_positive_cash_flow(&cf);
            (idx, unecon, None)
        }
        _ => {
            let rate = model.discount.unwrap_or(0.0) / 100.0;
            let table = &well_input.general_option_model.discount_table;
            let multipliers = monthly_multipliers(table, rate, &econ.dates, dates.discount_anchor());
            (get_max_cum_cash_flow(&cf, &multipliers), false, None)
        }
    };

    let unecon = unecon || if_cf_cutoff_unecon(&econ.bfit_cf, idx, &econ.capex_detail, econ.time[idx]);
    RawCutoff {
        date: month_end(econ.dates[idx]),
        unecon,
        first_tolerated,
    }
}

/// Determine the economic limit of a well.
///
/// With `return_cutoff_well_result` the econ calculation is re-run with the
/// cutoff applied and both the well result and its econ result are returned.
pub fn cutoff_results<C: EconCalculator + ?Sized>(
    calc: &C,
    well_input: &WellInput,
    well_result: &WellResult,
    return_cutoff_well_result: bool,
) -> Result<CutoffOutcome, EconError> {
    let model = &well_input.cut_off_model;
    let dates = &well_input.date_dict;
    let fpd = dates.first_production_date;

    if dates.as_of_date > dates.max_life_date() {
        info!("Well {}: as-of date is past max life, uneconomic", well_input.well_id);
        return Ok(CutoffOutcome {
            cutoff_date: dates.as_of_date,
            t_cutoff: month_offset(dates.as_of_date, fpd),
            unecon: true,
            first_tolerated: None,
            well_result: None,
            econ_result: None,
        });
    }

    let criterion = model.criterion()?;
    let min_cut_off = model.min_cut_off()?;
    debug!("Well {}: cut-off criterion {:?}", well_input.well_id, criterion);

    let raw = match criterion {
        CutOffCriterion::NoCutOff => RawCutoff {
            date: dates.max_life_date(),
            unecon: false,
            first_tolerated: None,
        },
        CutOffCriterion::Date(option) => {
            let (date, _) = apply_date_cutoff(&option, dates)?;
            RawCutoff {
                date,
                unecon: false,
                first_tolerated: None,
            }
        }
        CutOffCriterion::Rate { phase, threshold } => {
            let econ = calc.calculate(well_input, well_result)?;
            let boe = &well_input.general_option_model.boe_conversion;
            let (date, unecon) = apply_rate_cutoff(&econ, phase, threshold, dates, boe);
            RawCutoff {
                date,
                unecon,
                first_tolerated: None,
            }
        }
        CutOffCriterion::MaxCumCashFlow
        | CutOffCriterion::FirstNegativeCashFlow
        | CutOffCriterion::LastPositiveCashFlow => {
            let econ = calc.calculate(well_input, well_result)?;
            cash_flow_cutoff(well_input, &econ, criterion)
        }
    };

    let delay = match criterion {
        CutOffCriterion::NoCutOff | CutOffCriterion::Date(_) => 0,
        _ => model.delay_months(),
    };
    let limit = if delay > 0 && !raw.unecon {
        month_end(add_months(raw.date, delay))
    } else {
        raw.date
    };

    let (date, t) = adjust_cutoff(limit, dates);
    let (cutoff_date, t_cutoff, unecon) = apply_min_cut_off(date, t, raw.unecon, &min_cut_off, dates)?;
    info!(
        "Well {}: economic limit {} (month {}), uneconomic: {}",
        well_input.well_id, cutoff_date, t_cutoff, unecon
    );

    let mut outcome = CutoffOutcome {
        cutoff_date,
        t_cutoff,
        unecon,
        first_tolerated: raw.first_tolerated,
        well_result: None,
        econ_result: None,
    };

    if return_cutoff_well_result {
        let cut_result = well_result.clone().with_cutoff(cutoff_date);
        outcome.econ_result = Some(calc.calculate(well_input, &cut_result)?);
        outcome.well_result = Some(cut_result);
    }
    Ok(outcome)
}
