//! Ownership parameter store
//!
//! Ownership is kept as one array per interest over the ownership window
//! `t_ownership` (month offsets from the FPD month). Every array in an
//! [`OwnershipParams`] always has the same length as the window.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::clause::{InterestTerms, OwnershipTerms};
use crate::time::{adjust_array_zero, month_offset, Extend};
use crate::well::DateDict;

/// Number of time-varying ownership series
pub const SERIES_COUNT: usize = 12;

/// How a net profit interest is charged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NpiType {
    /// Share of positive net income, charged as an expense
    #[default]
    Expense,
    /// Share of revenue
    Revenue,
}

/// Revenue streams that carry their own NRI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnershipPhase {
    Oil,
    Gas,
    Ngl,
    DripCondensate,
}

impl OwnershipPhase {
    pub const ALL: [OwnershipPhase; 4] = [
        OwnershipPhase::Oil,
        OwnershipPhase::Gas,
        OwnershipPhase::Ngl,
        OwnershipPhase::DripCondensate,
    ];
}

/// NRI and lease NRI as decimals
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct InterestPair {
    pub nri: f64,
    pub lease_nri: f64,
}

/// Ownership in effect at a single point in time, as decimals
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct OwnershipValues {
    pub wi: f64,
    pub npi: f64,
    pub original: InterestPair,
    pub oil: InterestPair,
    pub gas: InterestPair,
    pub ngl: InterestPair,
    pub drip_condensate: InterestPair,
}

fn pct(value: Option<f64>) -> Option<f64> {
    value.map(|v| v / 100.0)
}

/// Phase NRI from its own term, or the original ownership when blank
pub fn get_phase_ownership_value(phase_value: Option<f64>, original: f64) -> f64 {
    pct(phase_value).unwrap_or(original)
}

fn phase_pair(terms: &InterestTerms, original: InterestPair) -> InterestPair {
    InterestPair {
        nri: get_phase_ownership_value(terms.net_revenue_interest, original.nri),
        lease_nri: get_phase_ownership_value(terms.lease_net_revenue_interest, original.lease_nri),
    }
}

impl OwnershipValues {
    /// Starting ownership; blank interests are zero
    pub fn from_initial(terms: &OwnershipTerms) -> Self {
        Self::resolve(terms, &OwnershipValues::default())
    }

    /// Clause terms with blanks inherited from `base`.
    ///
    /// WI, NPI and the original ownership inherit from `base`; a blank phase
    /// interest inherits from the resolved original ownership.
    pub fn resolve(terms: &OwnershipTerms, base: &OwnershipValues) -> Self {
        let original = InterestPair {
            nri: pct(terms.original_ownership.net_revenue_interest).unwrap_or(base.original.nri),
            lease_nri: pct(terms.original_ownership.lease_net_revenue_interest)
                .unwrap_or(base.original.lease_nri),
        };
        Self {
            wi: pct(terms.working_interest).unwrap_or(base.wi),
            npi: pct(terms.net_profit_interest).unwrap_or(base.npi),
            original,
            oil: phase_pair(&terms.oil_ownership, original),
            gas: phase_pair(&terms.gas_ownership, original),
            ngl: phase_pair(&terms.ngl_ownership, original),
            drip_condensate: phase_pair(&terms.drip_condensate_ownership, original),
        }
    }

    /// 8/8ths view: full WI and every NRI replaced by its lease NRI
    pub fn gross(&self) -> Self {
        let gross_pair = |pair: InterestPair| InterestPair {
            nri: pair.lease_nri,
            lease_nri: pair.lease_nri,
        };
        Self {
            wi: 1.0,
            npi: self.npi,
            original: gross_pair(self.original),
            oil: gross_pair(self.oil),
            gas: gross_pair(self.gas),
            ngl: gross_pair(self.ngl),
            drip_condensate: gross_pair(self.drip_condensate),
        }
    }

    pub fn phase(&self, phase: OwnershipPhase) -> InterestPair {
        match phase {
            OwnershipPhase::Oil => self.oil,
            OwnershipPhase::Gas => self.gas,
            OwnershipPhase::Ngl => self.ngl,
            OwnershipPhase::DripCondensate => self.drip_condensate,
        }
    }

    /// Values in [`OwnershipParams::series`] order
    pub fn to_array(&self) -> [f64; SERIES_COUNT] {
        [
            self.wi,
            self.npi,
            self.original.nri,
            self.original.lease_nri,
            self.oil.nri,
            self.oil.lease_nri,
            self.gas.nri,
            self.gas.lease_nri,
            self.ngl.nri,
            self.ngl.lease_nri,
            self.drip_condensate.nri,
            self.drip_condensate.lease_nri,
        ]
    }

    pub fn from_array(values: [f64; SERIES_COUNT]) -> Self {
        let pair = |i: usize| InterestPair {
            nri: values[i],
            lease_nri: values[i + 1],
        };
        Self {
            wi: values[0],
            npi: values[1],
            original: pair(2),
            oil: pair(4),
            gas: pair(6),
            ngl: pair(8),
            drip_condensate: pair(10),
        }
    }
}

/// NRI and lease NRI arrays of one phase
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PhaseOwnership {
    pub nri: Vec<f64>,
    pub lease_nri: Vec<f64>,
}

impl PhaseOwnership {
    fn constant(pair: InterestPair, len: usize) -> Self {
        Self {
            nri: vec![pair.nri; len],
            lease_nri: vec![pair.lease_nri; len],
        }
    }
}

/// Time-varying ownership over the ownership window
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OwnershipParams {
    pub wi: Vec<f64>,
    pub npi: Vec<f64>,
    pub npi_type: NpiType,
    pub original_ownership: PhaseOwnership,
    pub oil_ownership: PhaseOwnership,
    pub gas_ownership: PhaseOwnership,
    pub ngl_ownership: PhaseOwnership,
    pub drip_condensate_ownership: PhaseOwnership,
}

impl OwnershipParams {
    /// Broadcast `values` across `len` months
    pub fn constant(values: &OwnershipValues, npi_type: NpiType, len: usize) -> Self {
        Self {
            wi: vec![values.wi; len],
            npi: vec![values.npi; len],
            npi_type,
            original_ownership: PhaseOwnership::constant(values.original, len),
            oil_ownership: PhaseOwnership::constant(values.oil, len),
            gas_ownership: PhaseOwnership::constant(values.gas, len),
            ngl_ownership: PhaseOwnership::constant(values.ngl, len),
            drip_condensate_ownership: PhaseOwnership::constant(values.drip_condensate, len),
        }
    }

    pub fn len(&self) -> usize {
        self.wi.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wi.is_empty()
    }

    pub fn phase(&self, phase: OwnershipPhase) -> &PhaseOwnership {
        match phase {
            OwnershipPhase::Oil => &self.oil_ownership,
            OwnershipPhase::Gas => &self.gas_ownership,
            OwnershipPhase::Ngl => &self.ngl_ownership,
            OwnershipPhase::DripCondensate => &self.drip_condensate_ownership,
        }
    }

    /// Every time-varying array; `npi_type` is not a series
    pub fn series(&self) -> [&Vec<f64>; SERIES_COUNT] {
        [
            &self.wi,
            &self.npi,
            &self.original_ownership.nri,
            &self.original_ownership.lease_nri,
            &self.oil_ownership.nri,
            &self.oil_ownership.lease_nri,
            &self.gas_ownership.nri,
            &self.gas_ownership.lease_nri,
            &self.ngl_ownership.nri,
            &self.ngl_ownership.lease_nri,
            &self.drip_condensate_ownership.nri,
            &self.drip_condensate_ownership.lease_nri,
        ]
    }

    pub fn series_mut(&mut self) -> [&mut Vec<f64>; SERIES_COUNT] {
        let Self {
            wi,
            npi,
            npi_type: _,
            original_ownership,
            oil_ownership,
            gas_ownership,
            ngl_ownership,
            drip_condensate_ownership,
        } = self;
        [
            wi,
            npi,
            &mut original_ownership.nri,
            &mut original_ownership.lease_nri,
            &mut oil_ownership.nri,
            &mut oil_ownership.lease_nri,
            &mut gas_ownership.nri,
            &mut gas_ownership.lease_nri,
            &mut ngl_ownership.nri,
            &mut ngl_ownership.lease_nri,
            &mut drip_condensate_ownership.nri,
            &mut drip_condensate_ownership.lease_nri,
        ]
    }

    /// Ownership at window position `idx`
    pub fn values_at(&self, idx: usize) -> OwnershipValues {
        let series = self.series();
        let mut values = [0.0; SERIES_COUNT];
        for (value, s) in values.iter_mut().zip(series) {
            *value = s.get(idx).or_else(|| s.last()).copied().unwrap_or(0.0);
        }
        OwnershipValues::from_array(values)
    }

    /// 8/8ths copy used when a trigger is evaluated on a gross balance
    pub fn gross_basis(&self) -> Self {
        let gross_pair = |pair: &PhaseOwnership| PhaseOwnership {
            nri: pair.lease_nri.clone(),
            lease_nri: pair.lease_nri.clone(),
        };
        Self {
            wi: vec![1.0; self.len()],
            npi: self.npi.clone(),
            npi_type: self.npi_type,
            original_ownership: gross_pair(&self.original_ownership),
            oil_ownership: gross_pair(&self.oil_ownership),
            gas_ownership: gross_pair(&self.gas_ownership),
            ngl_ownership: gross_pair(&self.ngl_ownership),
            drip_condensate_ownership: gross_pair(&self.drip_condensate_ownership),
        }
    }
}

/// Ownership arrays together with the month window they are laid out on
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct OwnershipState {
    pub params: OwnershipParams,
    /// Month offsets from the FPD month, contiguous and ascending
    pub t_ownership: Vec<i64>,
}

impl OwnershipState {
    pub fn first_t(&self) -> i64 {
        self.t_ownership.first().copied().unwrap_or(0)
    }

    pub fn last_t(&self) -> i64 {
        self.t_ownership.last().copied().unwrap_or(0)
    }

    /// Gross-basis copy on the same window
    pub fn gross_basis(&self) -> Self {
        Self {
            params: self.params.gross_basis(),
            t_ownership: self.t_ownership.clone(),
        }
    }

    /// Ownership re-laid onto `target_t`, holding the edge values outside the window
    pub fn aligned(&self, target_t: &[i64]) -> OwnershipParams {
        let mut out = OwnershipParams {
            npi_type: self.params.npi_type,
            ..Default::default()
        };
        for (dst, src) in out.series_mut().into_iter().zip(self.params.series()) {
            *dst = adjust_array_zero(src, &self.t_ownership, target_t, Extend::Edge);
        }
        out
    }
}

/// Build the starting ownership store.
///
/// The window runs from the earlier of the cash-flow start and
/// `earliest_tied_to` through the cash-flow end, both inclusive. A window whose
/// end precedes its start collapses to a single month.
pub fn get_initial_ownership_params(
    initial: &OwnershipTerms,
    dates: &DateDict,
    earliest_tied_to: Option<NaiveDate>,
) -> OwnershipState {
    let fpd = dates.first_production_date;
    let start_date = match earliest_tied_to {
        Some(tied) => tied.min(dates.cf_start_date),
        None => dates.cf_start_date,
    };
    let start = month_offset(start_date, fpd);
    let end = month_offset(dates.cf_end_date, fpd).max(start);
    let t_ownership: Vec<i64> = (start..=end).collect();

    let values = OwnershipValues::from_initial(initial);
    let npi_type = initial.net_profit_interest_type.unwrap_or_default();

    OwnershipState {
        params: OwnershipParams::constant(&values, npi_type, t_ownership.len()),
        t_ownership,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn dates() -> DateDict {
        DateDict {
            first_production_date: d(2020, 1, 1),
            as_of_date: d(2021, 1, 1),
            cf_start_date: d(2021, 1, 1),
            cf_end_date: d(2021, 12, 31),
            discount_date: None,
            end_history_date: None,
            first_segment_date: None,
        }
    }

    fn terms() -> OwnershipTerms {
        OwnershipTerms {
            working_interest: Some(100.0),
            net_profit_interest: Some(5.0),
            original_ownership: InterestTerms {
                net_revenue_interest: Some(75.0),
                lease_net_revenue_interest: Some(80.0),
            },
            gas_ownership: InterestTerms {
                net_revenue_interest: Some(70.0),
                lease_net_revenue_interest: None,
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_initial_window_and_lengths() {
        let state = get_initial_ownership_params(&terms(), &dates(), None);
        assert_eq!(state.t_ownership.first(), Some(&12));
        assert_eq!(state.t_ownership.last(), Some(&23));
        for series in state.params.series() {
            assert_eq!(series.len(), state.t_ownership.len());
        }
        assert_eq!(state.params.wi[0], 1.0);
        assert_relative_eq!(state.params.npi[5], 0.05);
    }

    #[test]
    fn test_earliest_tied_to_extends_window() {
        let state = get_initial_ownership_params(&terms(), &dates(), Some(d(2020, 1, 1)));
        assert_eq!(state.first_t(), 0);
        assert_eq!(state.last_t(), 23);

        // A later tied-to date never shrinks the window
        let state = get_initial_ownership_params(&terms(), &dates(), Some(d(2021, 6, 1)));
        assert_eq!(state.first_t(), 12);
    }

    #[test]
    fn test_zero_life_window_clamped() {
        let mut dates = dates();
        dates.cf_end_date = d(2020, 6, 30);
        let state = get_initial_ownership_params(&terms(), &dates, None);
        assert_eq!(state.t_ownership, vec![12]);
        assert_eq!(state.params.len(), 1);
    }

    #[test]
    fn test_phase_falls_back_to_original() {
        let values = OwnershipValues::from_initial(&terms());
        assert_relative_eq!(values.oil.nri, 0.75);
        assert_relative_eq!(values.gas.nri, 0.70);
        assert_relative_eq!(values.gas.lease_nri, 0.80);
        assert_eq!(get_phase_ownership_value(None, 0.6), 0.6);
    }

    #[test]
    fn test_resolve_inherits_blanks() {
        let initial = OwnershipValues::from_initial(&terms());
        let clause = OwnershipTerms {
            working_interest: Some(50.0),
            ..Default::default()
        };
        let resolved = OwnershipValues::resolve(&clause, &initial);
        assert_relative_eq!(resolved.wi, 0.5);
        assert_relative_eq!(resolved.npi, 0.05);
        assert_relative_eq!(resolved.original.nri, 0.75);
        // Phase terms are blank on the clause, so they follow the original
        assert_relative_eq!(resolved.gas.nri, 0.75);
    }

    #[test]
    fn test_array_round_trip_and_gross() {
        let values = OwnershipValues::from_initial(&terms());
        assert_eq!(OwnershipValues::from_array(values.to_array()), values);

        let gross = values.gross();
        assert_eq!(gross.wi, 1.0);
        assert_relative_eq!(gross.oil.nri, 0.80);

        let state = get_initial_ownership_params(&terms(), &dates(), None);
        let gross_state = state.gross_basis();
        assert_eq!(gross_state.params.values_at(0), gross);
    }

    #[test]
    fn test_aligned_holds_edges() {
        let mut state = get_initial_ownership_params(&terms(), &dates(), None);
        state.params.wi[11] = 0.5;
        let aligned = state.aligned(&[10, 12, 23, 30]);
        assert_eq!(aligned.wi, vec![1.0, 1.0, 0.5, 0.5]);
        assert_eq!(aligned.npi_type, NpiType::Expense);
        assert_eq!(aligned.oil_ownership.nri.len(), 4);
    }
}
