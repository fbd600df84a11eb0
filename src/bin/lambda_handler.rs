//! AWS Lambda handler for well evaluations
//!
//! Accepts one or more well input documents as JSON and returns the
//! economic limit, reversion dates and summary of each. Monthly cash flows
//! are included on request.

use std::time::Instant;

use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};

use well_econ::econ::EconResult;
use well_econ::ownership::ReversionDetail;
use well_econ::{SummaryRow, WellEvaluation, WellEvaluator, WellInput};

/// Evaluation request
#[derive(Debug, Deserialize)]
pub struct WellRequest {
    /// Wells to evaluate
    #[serde(default)]
    pub wells: Vec<WellInput>,

    /// Include the monthly cash flow of each well (default: false)
    #[serde(default)]
    pub include_cashflows: bool,

    /// Include the reversion details of each well (default: true)
    #[serde(default = "default_true")]
    pub include_reversions: bool,
}

fn default_true() -> bool {
    true
}

/// Result for one well
#[derive(Debug, Serialize)]
pub struct WellResponse {
    pub well_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reversions: Option<Vec<ReversionDetail>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cashflows: Option<EconResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Batch response
#[derive(Debug, Serialize)]
pub struct BatchResponse {
    pub wells: Vec<WellResponse>,
    pub failed: usize,
    pub execution_time_ms: u64,
}

impl WellResponse {
    fn from_evaluation(evaluation: WellEvaluation, request: &WellRequest) -> Self {
        let summary = evaluation.summary_row();
        Self {
            well_id: evaluation.well_id,
            summary: Some(summary),
            reversions: request
                .include_reversions
                .then_some(evaluation.reversion.reversion_details),
            cashflows: request.include_cashflows.then_some(evaluation.econ),
            error: None,
        }
    }

    fn failed(well_id: String, error: String) -> Self {
        Self {
            well_id,
            summary: None,
            reversions: None,
            cashflows: None,
            error: Some(error),
        }
    }
}

/// Lambda handler function
async fn handler(event: LambdaEvent<WellRequest>) -> Result<BatchResponse, Error> {
    let start = Instant::now();
    let request = event.payload;
    if request.wells.is_empty() {
        return Err("Request contains no wells".into());
    }

    let evaluator = WellEvaluator::new();
    let results = evaluator.evaluate_batch(&request.wells);

    let mut failed = 0;
    let wells = results
        .into_iter()
        .map(|(well_id, result)| match result {
            Ok(evaluation) => WellResponse::from_evaluation(evaluation, &request),
            Err(e) => {
                failed += 1;
                WellResponse::failed(well_id, e.to_string())
            }
        })
        .collect();

    Ok(BatchResponse {
        wells,
        failed,
        execution_time_ms: start.elapsed().as_millis() as u64,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
