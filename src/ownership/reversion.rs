//! Reversion orchestration: walks a well's clauses in order and threads the
//! ownership store through each one that fires.

use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::clause::{parse_reversions, ReversionClause, ReversionTrigger};
use super::params::{get_initial_ownership_params, OwnershipParams, OwnershipState, OwnershipValues};
use super::transition::{get_new_ownership_outputs, ReversionDetail};
use super::triggers::{
    apply_date_reversion, apply_money_reversion, apply_volume_reversion, money_reversion_econ_result,
    resolve_reversion_date, volume_reversion_econ_result, TriggerOutcome,
};
use crate::econ::{EconCalculator, WellResult};
use crate::error::EconError;
use crate::well::WellInput;

/// Final ownership of a well and the log of reversions that fired
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReversionOutcome {
    pub ownership_params: OwnershipParams,
    pub t_ownership: Vec<i64>,
    pub reversion_details: Vec<ReversionDetail>,
}

impl ReversionOutcome {
    pub fn state(&self) -> OwnershipState {
        OwnershipState {
            params: self.ownership_params.clone(),
            t_ownership: self.t_ownership.clone(),
        }
    }

    fn from_state(state: OwnershipState, reversion_details: Vec<ReversionDetail>) -> Self {
        Self {
            ownership_params: state.params,
            t_ownership: state.t_ownership,
            reversion_details,
        }
    }
}

/// Earliest accumulation start across the clauses
pub fn earliest_tied_to_date(clauses: &[ReversionClause], well_input: &WellInput) -> Option<NaiveDate> {
    clauses
        .iter()
        .filter_map(|clause| clause.accumulation_start())
        .map(|tied| tied.resolve(&well_input.date_dict))
        .min()
}

/// Evaluate one clause against the current ownership
fn evaluate_clause<C: EconCalculator + ?Sized>(
    calc: &C,
    well_input: &WellInput,
    template: &WellResult,
    clause: &ReversionClause,
    state: &OwnershipState,
) -> Result<TriggerOutcome, EconError> {
    let dates = &well_input.date_dict;
    let fpd = dates.first_production_date;
    let tied_to = clause
        .accumulation_start()
        .map(|tied| tied.resolve(dates))
        .unwrap_or(dates.as_of_date);

    let outcome = match &clause.trigger {
        ReversionTrigger::Date(trigger) => {
            let date = resolve_reversion_date(trigger, dates)?;
            apply_date_reversion(date, fpd, &state.t_ownership)
        }
        ReversionTrigger::Money { metric, threshold } => {
            let econ = money_reversion_econ_result(calc, well_input, template, state, clause.balance)?;
            apply_money_reversion(
                &econ,
                *metric,
                *threshold,
                clause.include_net_profit_interest,
                tied_to,
                well_input,
                &state.t_ownership,
            )
        }
        ReversionTrigger::Volume { phase, threshold } => {
            let econ = volume_reversion_econ_result(calc, well_input, template, state, clause.balance)?;
            apply_volume_reversion(
                &econ,
                *phase,
                *threshold,
                clause.balance,
                tied_to,
                &well_input.general_option_model.boe_conversion,
                fpd,
                &state.t_ownership,
            )
        }
    };
    Ok(outcome)
}

/// Apply every reversion clause of a well in order.
///
/// `well_result` is the template for the econ re-runs of money and volume
/// triggers; its ownership is replaced by the running ownership each time.
/// Wells with no cash-flow life return their initial ownership without
/// looking at any clause.
pub fn final_ownership_and_reversion_dates<C: EconCalculator + ?Sized>(
    calc: &C,
    well_input: &WellInput,
    well_result: &WellResult,
) -> Result<ReversionOutcome, EconError> {
    let model = &well_input.ownership_model;
    let dates = &well_input.date_dict;

    if dates.is_zero_life() {
        debug!("Well {}: zero well life, reversions skipped", well_input.well_id);
        let state = get_initial_ownership_params(&model.initial_ownership, dates, None);
        return Ok(ReversionOutcome::from_state(state, Vec::new()));
    }

    let clauses = parse_reversions(model)?;
    let earliest = earliest_tied_to_date(&clauses, well_input);
    let mut state = get_initial_ownership_params(&model.initial_ownership, dates, earliest);

    let initial_values = OwnershipValues::from_initial(&model.initial_ownership);
    let mut previous_values = initial_values;
    let mut details = Vec::new();

    for clause in &clauses {
        let outcome = evaluate_clause(calc, well_input, well_result, clause, &state)?;
        if !outcome.fired() {
            debug!(
                "Well {}: reversion {} not reached",
                well_input.well_id,
                clause.key.as_str()
            );
            continue;
        }

        let new_values = OwnershipValues::resolve(&clause.terms, &initial_values);
        state = get_new_ownership_outputs(&state, &outcome, clause.key, &previous_values, &new_values, &mut details);
        previous_values = new_values;
    }

    info!(
        "Well {}: {} of {} reversions fired",
        well_input.well_id,
        details.len(),
        clauses.len()
    );
    Ok(ReversionOutcome::from_state(state, details))
}
