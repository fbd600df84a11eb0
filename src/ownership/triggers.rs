//! Reversion trigger evaluation
//!
//! Each evaluator decides whether a clause fires inside the ownership window,
//! on which day, and which share of the trigger month passes before that day.
//! Money and volume triggers re-run the econ calculation under the ownership
//! the clause is measured on.

use chrono::{Duration, NaiveDate};
use log::debug;

use super::clause::{Balance, DateAnchor, DateTrigger, MoneyMetric, VolumePhase};
use super::params::OwnershipState;
use crate::econ::discount::monthly_multipliers;
use crate::econ::{EconCalculator, EconResult, Phase, VolumeSeries, WellResult};
use crate::error::{EconError, ReversionError};
use crate::time::{add_fractional_months, days_in_month, fraction_of_month_before, month_from_offset, month_offset, month_start};
use crate::well::{BoeConversion, DateDict, WellInput};

/// Where and how a clause fires
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerOutcome {
    pub date: Option<NaiveDate>,
    /// Month offset of the trigger from the FPD month
    pub t_reversion: Option<i64>,
    /// True from the reversion index onward, aligned to `t_ownership`
    pub after_reversion_bools: Vec<bool>,
    pub reversion_index: Option<usize>,
    /// Share of the trigger month before the trigger day, in [0, 1)
    pub pre_rev_date_prop: Option<f64>,
}

impl TriggerOutcome {
    pub fn not_fired(len: usize) -> Self {
        Self {
            date: None,
            t_reversion: None,
            after_reversion_bools: vec![false; len],
            reversion_index: None,
            pre_rev_date_prop: None,
        }
    }

    fn at(date: NaiveDate, t: i64, index: usize, prop: f64, len: usize) -> Self {
        Self {
            date: Some(date),
            t_reversion: Some(t),
            after_reversion_bools: (0..len).map(|i| i >= index).collect(),
            reversion_index: Some(index),
            pre_rev_date_prop: Some(prop),
        }
    }

    pub fn fired(&self) -> bool {
        self.reversion_index.is_some()
    }
}

/// Calendar date of a date trigger
pub fn resolve_reversion_date(trigger: &DateTrigger, dates: &DateDict) -> Result<NaiveDate, ReversionError> {
    let (anchor, months) = match trigger {
        DateTrigger::Literal(date) => return Ok(*date),
        DateTrigger::Offset { anchor, months } => (anchor, *months),
    };
    let anchor_date = match anchor {
        DateAnchor::Fpd => dates.first_production_date,
        DateAnchor::AsOf => dates.as_of_date,
        DateAnchor::Discount => dates.discount_anchor(),
        DateAnchor::FirstSegment => dates
            .first_segment_date
            .ok_or(ReversionError::MissingAnchorDate("first_segment_date"))?,
        DateAnchor::EndHistory => dates
            .end_history_date
            .ok_or(ReversionError::MissingAnchorDate("end_history_date"))?,
    };
    Ok(add_fractional_months(anchor_date, months))
}

/// Place a trigger date on the ownership window.
///
/// A date before the window is already in effect at its first month; a date
/// after it never fires.
pub fn apply_date_reversion(date: NaiveDate, fpd: NaiveDate, t_ownership: &[i64]) -> TriggerOutcome {
    let len = t_ownership.len();
    let (first, last) = match (t_ownership.first(), t_ownership.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return TriggerOutcome::not_fired(len),
    };

    let t = month_offset(date, fpd);
    if t < first {
        TriggerOutcome::at(date, t, 0, 0.0, len)
    } else if t > last {
        TriggerOutcome::not_fired(len)
    } else {
        TriggerOutcome::at(date, t, (t - first) as usize, fraction_of_month_before(date), len)
    }
}

/// Re-run the econ calculation on the ownership a trigger is measured on
fn rerun_econ<C: EconCalculator + ?Sized>(
    calc: &C,
    well_input: &WellInput,
    template: &WellResult,
    state: &OwnershipState,
    balance: Balance,
) -> Result<EconResult, EconError> {
    let ownership = match balance {
        Balance::Gross => state.gross_basis(),
        Balance::Net => state.clone(),
    };
    let fpd = well_input.date_dict.first_production_date;
    let mut well_result = template.clone();
    well_result.ownership = ownership;
    well_result.window_start = Some(month_from_offset(state.first_t(), fpd));
    calc.calculate(well_input, &well_result)
}

pub fn money_reversion_econ_result<C: EconCalculator + ?Sized>(
    calc: &C,
    well_input: &WellInput,
    template: &WellResult,
    state: &OwnershipState,
    balance: Balance,
) -> Result<EconResult, EconError> {
    rerun_econ(calc, well_input, template, state, balance)
}

pub fn volume_reversion_econ_result<C: EconCalculator + ?Sized>(
    calc: &C,
    well_input: &WellInput,
    template: &WellResult,
    state: &OwnershipState,
    balance: Balance,
) -> Result<EconResult, EconError> {
    rerun_econ(calc, well_input, template, state, balance)
}

/// First index where `cum` passes `threshold`, with the share of that
/// period's change needed to reach it.
///
/// The cumulative value before index 0 is taken as 0. A period with no change
/// crosses at its start.
pub fn first_crossing(cum: &[f64], threshold: f64, inclusive: bool) -> Option<(usize, f64)> {
    let idx = cum
        .iter()
        .position(|&value| if inclusive { value >= threshold } else { value > threshold })?;
    let prev = if idx == 0 { 0.0 } else { cum[idx - 1] };
    let delta = cum[idx] - prev;
    let frac = if delta == 0.0 {
        0.0
    } else {
        ((threshold - prev) / delta).clamp(0.0, 1.0)
    };
    Some((idx, frac))
}

/// Day within `month` reached after `frac` of the month
fn day_from_fraction(month: NaiveDate, frac: f64) -> NaiveDate {
    let days = days_in_month(month) as i64;
    let offset = ((frac * days as f64).floor() as i64).clamp(0, days - 1);
    month + Duration::days(offset)
}

fn cumsum(values: impl Iterator<Item = f64>) -> Vec<f64> {
    values
        .scan(0.0, |acc, v| {
            *acc += v;
            Some(*acc)
        })
        .collect()
}

/// Zero out entries of months before the month containing `tied_to`
fn from_tied_month(econ: &EconResult, values: Vec<f64>, tied_to: NaiveDate) -> Vec<f64> {
    let tied_month = month_start(tied_to);
    values
        .into_iter()
        .zip(&econ.dates)
        .map(|(v, &month)| if month < tied_month { 0.0 } else { v })
        .collect()
}

fn at(values: &[f64], i: usize) -> f64 {
    values.get(i).copied().unwrap_or(0.0)
}

/// Cumulative money metric of a money reversion, one entry per econ month
fn money_metric(
    econ: &EconResult,
    metric: MoneyMetric,
    threshold: f64,
    include_npi: bool,
    tied_to: NaiveDate,
    well_input: &WellInput,
) -> Vec<f64> {
    let n = econ.len();
    match metric {
        MoneyMetric::Irr => {
            let table = &well_input.general_option_model.discount_table;
            let multipliers = monthly_multipliers(table, threshold / 100.0, &econ.dates, tied_to);
            let discounted: Vec<f64> = (0..n).map(|i| at(&econ.bfit_cf, i) * multipliers[i]).collect();
            cumsum(from_tied_month(econ, discounted, tied_to).into_iter())
        }
        MoneyMetric::RoiUndisc => {
            let income: Vec<f64> = (0..n)
                .map(|i| at(&econ.revenue, i) - at(&econ.expense, i) - at(&econ.production_tax, i))
                .collect();
            let capex: Vec<f64> = (0..n).map(|i| at(&econ.capex, i)).collect();
            let cum_income = cumsum(from_tied_month(econ, income, tied_to).into_iter());
            let cum_capex = cumsum(from_tied_month(econ, capex, tied_to).into_iter());
            cum_income
                .iter()
                .zip(&cum_capex)
                .map(|(&income, &capex)| {
                    // No investment yet: the return is the raw income
                    if capex == 0.0 {
                        income
                    } else {
                        income / capex
                    }
                })
                .collect()
        }
        MoneyMetric::PayoutWithInvestment | MoneyMetric::PayoutWithoutInvestment => {
            let cf: Vec<f64> = (0..n)
                .map(|i| {
                    let mut value = at(&econ.bfit_cf, i);
                    if !include_npi {
                        value += at(&econ.net_profit_interest, i);
                    }
                    if metric == MoneyMetric::PayoutWithoutInvestment {
                        value += at(&econ.capex, i);
                    }
                    value
                })
                .collect();
            cumsum(from_tied_month(econ, cf, tied_to).into_iter())
        }
    }
}

/// Locate a money reversion from its econ re-run
pub fn apply_money_reversion(
    econ: &EconResult,
    metric: MoneyMetric,
    threshold: f64,
    include_npi: bool,
    tied_to: NaiveDate,
    well_input: &WellInput,
    t_ownership: &[i64],
) -> TriggerOutcome {
    let dates = &well_input.date_dict;
    let fpd = dates.first_production_date;
    let len = t_ownership.len();

    let immediate = match metric {
        MoneyMetric::PayoutWithoutInvestment => threshold == 0.0,
        MoneyMetric::PayoutWithInvestment => threshold == 0.0 && econ.total_capex() == 0.0,
        _ => false,
    };
    if immediate {
        debug!("{:?} reversion with zero threshold fires at cash-flow start", metric);
        let start = dates.cf_start_date;
        return TriggerOutcome {
            date: Some(start),
            t_reversion: Some(month_offset(start, fpd)),
            after_reversion_bools: vec![true; len],
            reversion_index: Some(0),
            pre_rev_date_prop: Some(0.0),
        };
    }

    // IRR clauses pay out once the cash flow discounted at the clause rate turns positive
    let target = if metric == MoneyMetric::Irr { 0.0 } else { threshold };
    let cum = money_metric(econ, metric, threshold, include_npi, tied_to, well_input);
    let (idx, frac) = match first_crossing(&cum, target, false) {
        Some(crossing) => crossing,
        None => return TriggerOutcome::not_fired(len),
    };

    let mut date = day_from_fraction(econ.dates[idx], frac);
    if date < dates.cf_start_date {
        date = dates.cf_start_date;
    }
    debug!("{:?} reversion crosses {} on {}", metric, threshold, date);
    apply_date_reversion(date, fpd, t_ownership)
}

/// Well-head volume of `phase` in econ month `i`
fn phase_volume(econ: &EconResult, phase: VolumePhase, boe: &BoeConversion, i: usize) -> f64 {
    let oil = econ.well_head_volume(Phase::Oil, i);
    let gas = econ.well_head_volume(Phase::Gas, i);
    match phase {
        VolumePhase::Oil => oil,
        VolumePhase::Gas => gas,
        VolumePhase::Boe => boe.to_boe(oil, gas),
    }
}

fn daily_phase_volume(daily: &VolumeSeries, phase: VolumePhase, boe: &BoeConversion, idx: usize) -> f64 {
    let oil = daily.value(Phase::Oil, idx);
    let gas = daily.value(Phase::Gas, idx);
    match phase {
        VolumePhase::Oil => oil,
        VolumePhase::Gas => gas,
        VolumePhase::Boe => boe.to_boe(oil, gas),
    }
}

/// Day the daily running sum over `month` reaches `remaining`, when daily data
/// covers the whole month
fn daily_crossing(
    econ: &EconResult,
    phase: VolumePhase,
    boe: &BoeConversion,
    month: NaiveDate,
    scale: f64,
    remaining: f64,
) -> Option<NaiveDate> {
    let daily = econ.daily.as_ref()?;
    let days = days_in_month(month) as i64;
    let first = daily.day_index(month)?;
    daily.day_index(month + Duration::days(days - 1))?;

    let mut running = 0.0;
    for day in 0..days as usize {
        running += daily_phase_volume(daily, phase, boe, first + day) * scale;
        if running >= remaining {
            return Some(month + Duration::days(day as i64));
        }
    }
    None
}

/// Locate a volume reversion from its econ re-run
#[allow(clippy::too_many_arguments)]
pub fn apply_volume_reversion(
    econ: &EconResult,
    phase: VolumePhase,
    threshold: f64,
    balance: Balance,
    tied_to: NaiveDate,
    boe: &BoeConversion,
    fpd: NaiveDate,
    t_ownership: &[i64],
) -> TriggerOutcome {
    let len = t_ownership.len();
    let scale = |i: usize| match balance {
        Balance::Gross => 1.0,
        Balance::Net => at(&econ.wi, i),
    };

    let volumes: Vec<f64> = (0..econ.len())
        .map(|i| phase_volume(econ, phase, boe, i) * scale(i))
        .collect();
    let cum = cumsum(from_tied_month(econ, volumes, tied_to).into_iter());

    let (idx, frac) = match first_crossing(&cum, threshold, true) {
        Some(crossing) => crossing,
        None => return TriggerOutcome::not_fired(len),
    };

    let month = econ.dates[idx];
    let prev = if idx == 0 { 0.0 } else { cum[idx - 1] };
    let date = daily_crossing(econ, phase, boe, month, scale(idx), threshold - prev)
        .unwrap_or_else(|| day_from_fraction(month, frac));

    debug!("{:?} volume reversion reaches {} on {}", phase, threshold, date);
    apply_date_reversion(date, fpd, t_ownership)
}
