//! Ownership model documents and reversion clause parsing
//!
//! A reversion clause is stored as a flat JSON object whose reversion type is
//! given by which key is present (`well_head_oil_cum`, `irr`, `date`, ...).
//! [`parse_reversions`] turns each one into a [`ReversionClause`] up front and
//! rejects clauses with no type key or more than one.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::ReversionError;
use crate::time::parse_date;
use crate::well::de::{blank_f64, is_blank, value_as_date, value_as_f64};
use crate::well::DateDict;

use super::params::NpiType;

/// Ownership section of a well: the starting terms plus ordered reversions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnershipModel {
    pub initial_ownership: OwnershipTerms,

    #[serde(default)]
    pub reversions: Vec<Map<String, Value>>,
}

/// Percent ownership terms as written on a clause; blanks inherit
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OwnershipTerms {
    #[serde(default, deserialize_with = "blank_f64")]
    pub working_interest: Option<f64>,

    #[serde(default, deserialize_with = "blank_f64")]
    pub net_profit_interest: Option<f64>,

    #[serde(default)]
    pub net_profit_interest_type: Option<NpiType>,

    #[serde(default)]
    pub original_ownership: InterestTerms,

    #[serde(default)]
    pub oil_ownership: InterestTerms,

    #[serde(default)]
    pub gas_ownership: InterestTerms,

    #[serde(default)]
    pub ngl_ownership: InterestTerms,

    #[serde(default)]
    pub drip_condensate_ownership: InterestTerms,
}

/// NRI / lease NRI pair in percent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterestTerms {
    #[serde(default, deserialize_with = "blank_f64")]
    pub net_revenue_interest: Option<f64>,

    #[serde(default, deserialize_with = "blank_f64")]
    pub lease_net_revenue_interest: Option<f64>,
}

/// Every recognized reversion type key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReversionKey {
    NoReversion,
    WellHeadOilCum,
    WellHeadGasCum,
    WellHeadBoeCum,
    OffsetToFpd,
    OffsetToAsOfDate,
    OffsetToDiscountDate,
    OffsetToFirstSegment,
    OffsetToEndHistory,
    Date,
    Irr,
    PayoutWithInvestment,
    PayoutWithoutInvestment,
    RoiUndisc,
}

impl ReversionKey {
    pub const ALL: [ReversionKey; 14] = [
        ReversionKey::NoReversion,
        ReversionKey::WellHeadOilCum,
        ReversionKey::WellHeadGasCum,
        ReversionKey::WellHeadBoeCum,
        ReversionKey::OffsetToFpd,
        ReversionKey::OffsetToAsOfDate,
        ReversionKey::OffsetToDiscountDate,
        ReversionKey::OffsetToFirstSegment,
        ReversionKey::OffsetToEndHistory,
        ReversionKey::Date,
        ReversionKey::Irr,
        ReversionKey::PayoutWithInvestment,
        ReversionKey::PayoutWithoutInvestment,
        ReversionKey::RoiUndisc,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReversionKey::NoReversion => "no_reversion",
            ReversionKey::WellHeadOilCum => "well_head_oil_cum",
            ReversionKey::WellHeadGasCum => "well_head_gas_cum",
            ReversionKey::WellHeadBoeCum => "well_head_boe_cum",
            ReversionKey::OffsetToFpd => "offset_to_fpd",
            ReversionKey::OffsetToAsOfDate => "offset_to_as_of_date",
            ReversionKey::OffsetToDiscountDate => "offset_to_discount_date",
            ReversionKey::OffsetToFirstSegment => "offset_to_first_segment",
            ReversionKey::OffsetToEndHistory => "offset_to_end_history",
            ReversionKey::Date => "date",
            ReversionKey::Irr => "irr",
            ReversionKey::PayoutWithInvestment => "payout_with_investment",
            ReversionKey::PayoutWithoutInvestment => "payout_without_investment",
            ReversionKey::RoiUndisc => "roi_undisc",
        }
    }
}

/// Phase whose cumulative well-head volume triggers a volume reversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VolumePhase {
    Oil,
    Gas,
    Boe,
}

/// Cumulative money metric of a money reversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MoneyMetric {
    Irr,
    PayoutWithInvestment,
    PayoutWithoutInvestment,
    RoiUndisc,
}

/// Date a date-reversion offset is measured from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateAnchor {
    Fpd,
    AsOf,
    Discount,
    FirstSegment,
    EndHistory,
}

/// How a reversion is triggered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ReversionTrigger {
    Volume { phase: VolumePhase, threshold: f64 },
    Date(DateTrigger),
    Money { metric: MoneyMetric, threshold: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DateTrigger {
    Literal(NaiveDate),
    Offset { anchor: DateAnchor, months: f64 },
}

/// Whether triggers are evaluated on 8/8ths or on the owner's net share
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Balance {
    Net,
    Gross,
}

/// Date cumulative volumes and money start accumulating from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TiedTo {
    AsOf,
    Fpd,
    Date(NaiveDate),
}

impl TiedTo {
    pub fn resolve(&self, dates: &DateDict) -> NaiveDate {
        match self {
            TiedTo::AsOf => dates.as_of_date,
            TiedTo::Fpd => dates.first_production_date,
            TiedTo::Date(date) => *date,
        }
    }
}

/// A parsed reversion clause
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReversionClause {
    pub key: ReversionKey,
    pub trigger: ReversionTrigger,
    pub terms: OwnershipTerms,
    pub balance: Balance,
    pub include_net_profit_interest: bool,
    pub tied_to: Option<TiedTo>,
}

impl ReversionClause {
    /// Accumulation start for volume and money triggers.
    ///
    /// Cumulative well-head volume defaults to first production; payout
    /// defaults to the as-of date. Date triggers do not accumulate.
    pub fn accumulation_start(&self) -> Option<TiedTo> {
        match self.trigger {
            ReversionTrigger::Date(_) => None,
            ReversionTrigger::Volume { .. } => Some(self.tied_to.unwrap_or(TiedTo::Fpd)),
            ReversionTrigger::Money { .. } => Some(self.tied_to.unwrap_or(TiedTo::AsOf)),
        }
    }
}

/// Identify the single reversion type key of a clause
pub fn get_reversion_key(doc: &Map<String, Value>) -> Result<ReversionKey, ReversionError> {
    let present: Vec<ReversionKey> = ReversionKey::ALL
        .iter()
        .copied()
        .filter(|key| doc.contains_key(key.as_str()))
        .collect();

    match present.as_slice() {
        [] => Err(ReversionError::MissingKey),
        [key] => Ok(*key),
        many => Err(ReversionError::AmbiguousKey(
            many.iter().map(|k| k.as_str().to_string()).collect(),
        )),
    }
}

/// Phase of a `well_head_<phase>_cum` key
pub fn volume_phase(key: &str) -> Result<VolumePhase, ReversionError> {
    let phase = key
        .strip_prefix("well_head_")
        .and_then(|rest| rest.strip_suffix("_cum"));
    match phase {
        Some("oil") => Ok(VolumePhase::Oil),
        Some("gas") => Ok(VolumePhase::Gas),
        Some("boe") => Ok(VolumePhase::Boe),
        _ => Err(ReversionError::UnknownPhase(key.to_string())),
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> ReversionError {
    ReversionError::InvalidValue {
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn threshold(doc: &Map<String, Value>, key: ReversionKey) -> Result<f64, ReversionError> {
    let value = &doc[key.as_str()];
    value_as_f64(value).ok_or_else(|| invalid(key.as_str(), format!("expected a number, got {}", value)))
}

fn parse_trigger(doc: &Map<String, Value>, key: ReversionKey) -> Result<ReversionTrigger, ReversionError> {
    let offset = |anchor: DateAnchor| -> Result<ReversionTrigger, ReversionError> {
        Ok(ReversionTrigger::Date(DateTrigger::Offset {
            anchor,
            months: threshold(doc, key)?,
        }))
    };
    let money = |metric: MoneyMetric| -> Result<ReversionTrigger, ReversionError> {
        Ok(ReversionTrigger::Money {
            metric,
            threshold: threshold(doc, key)?,
        })
    };

    match key {
        ReversionKey::NoReversion => Err(invalid("no_reversion", "sentinel has no trigger")),
        ReversionKey::WellHeadOilCum | ReversionKey::WellHeadGasCum | ReversionKey::WellHeadBoeCum => {
            Ok(ReversionTrigger::Volume {
                phase: volume_phase(key.as_str())?,
                threshold: threshold(doc, key)?,
            })
        }
        ReversionKey::OffsetToFpd => offset(DateAnchor::Fpd),
        ReversionKey::OffsetToAsOfDate => offset(DateAnchor::AsOf),
        ReversionKey::OffsetToDiscountDate => offset(DateAnchor::Discount),
        ReversionKey::OffsetToFirstSegment => offset(DateAnchor::FirstSegment),
        ReversionKey::OffsetToEndHistory => offset(DateAnchor::EndHistory),
        ReversionKey::Date => {
            let value = &doc["date"];
            value_as_date(value)
                .map(|date| ReversionTrigger::Date(DateTrigger::Literal(date)))
                .ok_or_else(|| invalid("date", format!("expected a date, got {}", value)))
        }
        ReversionKey::Irr => money(MoneyMetric::Irr),
        ReversionKey::PayoutWithInvestment => money(MoneyMetric::PayoutWithInvestment),
        ReversionKey::PayoutWithoutInvestment => money(MoneyMetric::PayoutWithoutInvestment),
        ReversionKey::RoiUndisc => money(MoneyMetric::RoiUndisc),
    }
}

fn parse_balance(doc: &Map<String, Value>) -> Result<Balance, ReversionError> {
    match doc.get("balance") {
        None => Ok(Balance::Net),
        Some(value) if is_blank(value) => Ok(Balance::Net),
        Some(Value::String(s)) if s == "net" => Ok(Balance::Net),
        Some(Value::String(s)) if s == "gross" => Ok(Balance::Gross),
        Some(other) => Err(invalid("balance", format!("expected net or gross, got {}", other))),
    }
}

fn parse_include_npi(doc: &Map<String, Value>) -> Result<bool, ReversionError> {
    match doc.get("include_net_profit_interest") {
        None => Ok(false),
        Some(value) if is_blank(value) => Ok(false),
        Some(Value::String(s)) if s == "yes" => Ok(true),
        Some(Value::String(s)) if s == "no" => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(invalid(
            "include_net_profit_interest",
            format!("expected yes or no, got {}", other),
        )),
    }
}

/// `reversion_tied_to` is an object with one key: `as_of`, `fpd` or `date`
fn parse_tied_to(doc: &Map<String, Value>) -> Result<Option<TiedTo>, ReversionError> {
    let tied = match doc.get("reversion_tied_to") {
        None => return Ok(None),
        Some(value) if is_blank(value) => return Ok(None),
        Some(Value::Object(tied)) => tied,
        Some(other) => return Err(invalid("reversion_tied_to", format!("expected an object, got {}", other))),
    };

    if tied.contains_key("as_of") {
        Ok(Some(TiedTo::AsOf))
    } else if tied.contains_key("fpd") {
        Ok(Some(TiedTo::Fpd))
    } else if let Some(value) = tied.get("date") {
        value
            .as_str()
            .and_then(parse_date)
            .map(|date| Some(TiedTo::Date(date)))
            .ok_or_else(|| invalid("reversion_tied_to", format!("expected a date, got {}", value)))
    } else {
        Err(invalid("reversion_tied_to", "expected as_of, fpd or date"))
    }
}

/// Parse one clause; `Ok(None)` for the `no_reversion` sentinel
pub fn parse_reversion(doc: &Map<String, Value>) -> Result<Option<ReversionClause>, ReversionError> {
    let key = get_reversion_key(doc)?;
    if key == ReversionKey::NoReversion {
        return Ok(None);
    }

    let terms: OwnershipTerms = serde_json::from_value(Value::Object(doc.clone()))
        .map_err(|e| invalid(key.as_str(), e.to_string()))?;

    Ok(Some(ReversionClause {
        key,
        trigger: parse_trigger(doc, key)?,
        terms,
        balance: parse_balance(doc)?,
        include_net_profit_interest: parse_include_npi(doc)?,
        tied_to: parse_tied_to(doc)?,
    }))
}

/// Parse every clause in order, failing on the first malformed one
pub fn parse_reversions(model: &OwnershipModel) -> Result<Vec<ReversionClause>, ReversionError> {
    let mut clauses = Vec::with_capacity(model.reversions.len());
    for doc in &model.reversions {
        if let Some(clause) = parse_reversion(doc)? {
            clauses.push(clause);
        }
    }
    Ok(clauses)
}
