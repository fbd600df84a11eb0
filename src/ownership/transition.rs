//! Applying a fired reversion to the ownership store
//!
//! A reversion replaces every ownership series from its trigger month on. The
//! trigger month itself is blended by the days before and after the trigger
//! day; when several reversions land in the same month each sub-period carries
//! the last applied reversion that has triggered by its first day.

use chrono::{Datelike, NaiveDate};
use log::info;
use serde::{Deserialize, Serialize};

use super::clause::ReversionKey;
use super::params::{OwnershipParams, OwnershipState, OwnershipValues, SERIES_COUNT};
use super::triggers::TriggerOutcome;
use crate::time::days_in_month;

/// Audit entry for one fired reversion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReversionDetail {
    /// WI in the trigger month before the reversion
    pub before: f64,
    /// WI after the reversion
    pub after: f64,
    pub date: NaiveDate,
    /// Month offset of the trigger from the FPD month
    pub t: i64,
    pub rev_key: ReversionKey,
    /// Ownership in effect before this reversion
    pub pre_rev_params: OwnershipValues,
    /// Ownership this reversion switches to
    pub cur_rev_params: OwnershipValues,
}

/// Replace ownership from `index` on, blending the boundary month as
/// `prop * old + (1 - prop) * new`
pub fn apply_single_reversion(
    params: &OwnershipParams,
    index: usize,
    prop: f64,
    new_values: &OwnershipValues,
) -> OwnershipParams {
    let mut out = params.clone();
    let new_array = new_values.to_array();
    for (series, new) in out.series_mut().into_iter().zip(new_array) {
        if let Some(old) = series.get(index).copied() {
            series[index] = prop * old + (1.0 - prop) * new;
        }
        for value in series.iter_mut().skip(index + 1) {
            *value = new;
        }
    }
    out
}

/// Day weights of the sub-periods of a month split at each zero-based
/// `split_days` entry (sorted). The last weight covers the days after the
/// final split.
pub fn same_month_weights(split_days: &[u32], days_in_month: u32) -> Vec<f64> {
    let days = days_in_month as f64;
    let mut weights = Vec::with_capacity(split_days.len() + 1);
    let mut start = 0u32;
    for &split in split_days {
        let split = split.clamp(start, days_in_month);
        weights.push((split - start) as f64 / days);
        start = split;
    }
    weights.push((days_in_month - start) as f64 / days);
    weights
}

/// Replace ownership from `index` on, blending the boundary month across
/// every reversion recorded in that month.
///
/// `same_month` holds those reversions in the order they were applied,
/// including the current one. Days before the earliest trigger day keep the
/// ownership in effect before the month. Every later day carries the
/// ownership of the last applied reversion that has triggered by then, so a
/// clause applied later wins even when it triggers earlier in the month.
pub fn apply_multi_reversion(
    params: &OwnershipParams,
    index: usize,
    same_month: &[&ReversionDetail],
    new_values: &OwnershipValues,
) -> OwnershipParams {
    let new_array = new_values.to_array();
    let mut ordered: Vec<(usize, &ReversionDetail)> = same_month.iter().copied().enumerate().collect();
    ordered.sort_by_key(|(_, detail)| detail.date.day0());

    let days = ordered.first().map(|(_, detail)| days_in_month(detail.date)).unwrap_or(30);
    let split_days: Vec<u32> = ordered.iter().map(|(_, detail)| detail.date.day0()).collect();
    let weights = same_month_weights(&split_days, days);

    let mut periods = Vec::with_capacity(ordered.len() + 1);
    periods.push(same_month.first().map(|detail| detail.pre_rev_params.to_array()).unwrap_or(new_array));
    let mut latest: Option<(usize, &ReversionDetail)> = None;
    for &(position, detail) in &ordered {
        if latest.map_or(true, |(applied, _)| position > applied) {
            latest = Some((position, detail));
        }
        let values = latest.map(|(_, detail)| detail.cur_rev_params.to_array()).unwrap_or(new_array);
        periods.push(values);
    }

    let mut blended = [0.0; SERIES_COUNT];
    for (period, weight) in periods.iter().zip(&weights) {
        for (acc, value) in blended.iter_mut().zip(period) {
            *acc += weight * value;
        }
    }

    let mut out = params.clone();
    for ((series, boundary), new) in out.series_mut().into_iter().zip(blended).zip(new_array) {
        if index < series.len() {
            series[index] = boundary;
        }
        for value in series.iter_mut().skip(index + 1) {
            *value = new;
        }
    }
    out
}

pub fn single_reversion_in_month(
    state: &OwnershipState,
    outcome: &TriggerOutcome,
    new_values: &OwnershipValues,
) -> OwnershipState {
    let index = outcome.reversion_index.unwrap_or(0);
    let prop = outcome.pre_rev_date_prop.unwrap_or(0.0);
    OwnershipState {
        params: apply_single_reversion(&state.params, index, prop, new_values),
        t_ownership: state.t_ownership.clone(),
    }
}

pub fn multiple_reversions_in_month(
    state: &OwnershipState,
    outcome: &TriggerOutcome,
    details: &[ReversionDetail],
    new_values: &OwnershipValues,
) -> OwnershipState {
    let index = outcome.reversion_index.unwrap_or(0);
    let same_month: Vec<&ReversionDetail> = details
        .iter()
        .filter(|detail| Some(detail.t) == outcome.t_reversion)
        .collect();
    OwnershipState {
        params: apply_multi_reversion(&state.params, index, &same_month, new_values),
        t_ownership: state.t_ownership.clone(),
    }
}

/// Record a fired reversion and return the ownership after it.
///
/// Reversions whose trigger month precedes the window are fully in effect from
/// its start and never blend with one another.
pub fn get_new_ownership_outputs(
    state: &OwnershipState,
    outcome: &TriggerOutcome,
    rev_key: ReversionKey,
    pre_rev_params: &OwnershipValues,
    new_values: &OwnershipValues,
    details: &mut Vec<ReversionDetail>,
) -> OwnershipState {
    let (date, t, index) = match (outcome.date, outcome.t_reversion, outcome.reversion_index) {
        (Some(date), Some(t), Some(index)) => (date, t, index),
        _ => return state.clone(),
    };

    let in_window = t >= state.first_t();
    let shares_month = in_window && details.iter().any(|detail| detail.t == t);

    details.push(ReversionDetail {
        before: state.params.wi.get(index).copied().unwrap_or(0.0),
        after: new_values.wi,
        date,
        t,
        rev_key,
        pre_rev_params: *pre_rev_params,
        cur_rev_params: *new_values,
    });
    info!(
        "Reversion {} fired on {}: WI {:.4} -> {:.4}",
        rev_key.as_str(),
        date,
        pre_rev_params.wi,
        new_values.wi
    );

    if shares_month {
        multiple_reversions_in_month(state, outcome, details, new_values)
    } else {
        single_reversion_in_month(state, outcome, new_values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ownership::params::{InterestPair, NpiType};
    use crate::ownership::triggers::apply_date_reversion;
    use crate::testutil::d;
    use approx::assert_abs_diff_eq;

    fn values(wi: f64, nri: f64) -> OwnershipValues {
        let pair = InterestPair { nri, lease_nri: 0.8 };
        OwnershipValues {
            wi,
            npi: 0.0,
            original: pair,
            oil: pair,
            gas: pair,
            ngl: pair,
            drip_condensate: pair,
        }
    }

    fn state(initial: &OwnershipValues) -> OwnershipState {
        OwnershipState {
            params: OwnershipParams::constant(initial, NpiType::Revenue, 12),
            t_ownership: (12..24).collect(),
        }
    }

    #[test]
    fn test_single_reversion_exact_blend() {
        let old = values(1.0, 0.75);
        let new = values(0.37, 0.61);
        let prop = 10.0 / 31.0;
        let params = apply_single_reversion(&state(&old).params, 3, prop, &new);

        assert_eq!(params.wi[2], 1.0);
        assert_eq!(params.wi[3], prop * 1.0 + (1.0 - prop) * 0.37);
        assert_eq!(params.gas_ownership.nri[3], prop * 0.75 + (1.0 - prop) * 0.61);
        assert_eq!(params.wi[4], 0.37);
        assert_eq!(params.npi_type, NpiType::Revenue);
        for series in params.series() {
            assert_eq!(series.len(), 12);
        }
    }

    #[test]
    fn test_reversion_may_increase_wi() {
        let params = apply_single_reversion(&state(&values(0.25, 0.2)).params, 0, 0.0, &values(0.5, 0.4));
        assert_eq!(params.wi, vec![0.5; 12]);
    }

    #[test]
    fn test_same_month_weights_sum_to_one() {
        let weights = same_month_weights(&[9, 19], 30);
        assert_eq!(weights.len(), 3);
        assert_abs_diff_eq!(weights.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(weights[0], 9.0 / 30.0);
        assert_abs_diff_eq!(weights[1], 10.0 / 30.0);

        let weights = same_month_weights(&[0, 0, 27], 28);
        assert_abs_diff_eq!(weights.iter().sum::<f64>(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_two_reversions_same_month() {
        let fpd = d(2020, 1, 1);
        let initial = values(1.0, 0.8);
        let first = values(0.75, 0.6);
        let second = values(0.5, 0.4);
        let mut details = Vec::new();

        let s0 = state(&initial);
        let o1 = apply_date_reversion(d(2021, 4, 11), fpd, &s0.t_ownership);
        let s1 = get_new_ownership_outputs(&s0, &o1, ReversionKey::Date, &initial, &first, &mut details);
        assert_abs_diff_eq!(s1.params.wi[3], (10.0 * 1.0 + 20.0 * 0.75) / 30.0, epsilon = 1e-12);

        let o2 = apply_date_reversion(d(2021, 4, 21), fpd, &s1.t_ownership);
        let s2 = get_new_ownership_outputs(&s1, &o2, ReversionKey::Date, &first, &second, &mut details);

        // 10 days at 1.0, 10 days at 0.75, 10 days at 0.5
        assert_abs_diff_eq!(s2.params.wi[3], (10.0 * 1.0 + 10.0 * 0.75 + 10.0 * 0.5) / 30.0, epsilon = 1e-12);
        assert_eq!(s2.params.wi[4], 0.5);
        assert_eq!(s2.params.wi[2], 1.0);
        assert_eq!(details.len(), 2);
        assert_eq!(details[1].before, s1.params.wi[3]);
    }

    #[test]
    fn test_later_clause_triggering_earlier_in_month() {
        let fpd = d(2020, 1, 1);
        let initial = values(1.0, 0.8);
        let first = values(0.75, 0.6);
        let second = values(0.5, 0.4);
        let mut details = Vec::new();

        let s0 = state(&initial);
        let o1 = apply_date_reversion(d(2021, 4, 21), fpd, &s0.t_ownership);
        let s1 = get_new_ownership_outputs(&s0, &o1, ReversionKey::Date, &initial, &first, &mut details);
        let o2 = apply_date_reversion(d(2021, 4, 11), fpd, &s1.t_ownership);
        let s2 = get_new_ownership_outputs(&s1, &o2, ReversionKey::Date, &first, &second, &mut details);

        // Days 1-10 keep the starting WI; the second clause governs from the 11th on
        assert_abs_diff_eq!(s2.params.wi[3], (10.0 * 1.0 + 20.0 * 0.5) / 30.0, epsilon = 1e-12);
        assert_abs_diff_eq!(s2.params.gas_ownership.nri[3], (10.0 * 0.8 + 20.0 * 0.4) / 30.0, epsilon = 1e-12);
        assert_eq!(s2.params.wi[4], 0.5);
    }

    #[test]
    fn test_three_reversions_weights_cover_month() {
        let fpd = d(2020, 1, 1);
        let steps = [
            (d(2021, 6, 6), values(0.9, 0.7)),
            (d(2021, 6, 16), values(0.6, 0.5)),
            (d(2021, 6, 26), values(0.3, 0.2)),
        ];
        let mut details = Vec::new();
        let mut current = state(&values(1.0, 0.8));
        let mut previous = values(1.0, 0.8);
        for (date, new) in &steps {
            let outcome = apply_date_reversion(*date, fpd, &current.t_ownership);
            current = get_new_ownership_outputs(&current, &outcome, ReversionKey::Date, &previous, new, &mut details);
            previous = *new;
        }

        let expected = (5.0 * 1.0 + 10.0 * 0.9 + 10.0 * 0.6 + 5.0 * 0.3) / 30.0;
        assert_abs_diff_eq!(current.params.wi[5], expected, epsilon = 1e-12);
        assert_eq!(current.params.wi[6], 0.3);
    }

    #[test]
    fn test_pre_window_reversions_do_not_blend() {
        let fpd = d(2020, 1, 1);
        let initial = values(1.0, 0.8);
        let first = values(0.75, 0.6);
        let second = values(0.5, 0.4);
        let mut details = Vec::new();

        let s0 = state(&initial);
        let o1 = apply_date_reversion(d(2020, 5, 10), fpd, &s0.t_ownership);
        let s1 = get_new_ownership_outputs(&s0, &o1, ReversionKey::Date, &initial, &first, &mut details);
        let o2 = apply_date_reversion(d(2020, 5, 20), fpd, &s1.t_ownership);
        let s2 = get_new_ownership_outputs(&s1, &o2, ReversionKey::Date, &first, &second, &mut details);

        assert_eq!(s2.params.wi, vec![0.5; 12]);
    }

    #[test]
    fn test_unfired_outcome_leaves_state() {
        let s0 = state(&values(1.0, 0.8));
        let mut details = Vec::new();
        let outcome = TriggerOutcome::not_fired(12);
        let s1 = get_new_ownership_outputs(&s0, &outcome, ReversionKey::Irr, &values(1.0, 0.8), &values(0.5, 0.4), &mut details);
        assert_eq!(s1, s0);
        assert!(details.is_empty());
    }
}
