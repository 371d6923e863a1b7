//! AWS Lambda handler for the balance chart engine
//!
//! Accepts chart requests via JSON (raw observations, rate quotes, and a
//! period token scoped to the calling endpoint) and returns the
//! {series, summary} payload.
//!
//! Supports API Gateway proxy events and Lambda Function URLs.

use std::time::Instant;

use aws_lambda_events::encodings::Body;
use aws_lambda_events::event::apigw::{ApiGatewayProxyRequest, ApiGatewayProxyResponse};
use aws_lambda_events::http::HeaderValue;
use chrono::{DateTime, Utc};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use serde::{Deserialize, Serialize};

use yield_engine::{
    BalanceEngine, BalanceObservation, BalanceSummary, ChartPayload, ChartPoint, EngineConfig,
    EngineError, ExplorePeriod, PeriodWindow, RateHistory, RateQuote, WalletPeriod,
};

/// Calling endpoint; decides which period vocabulary applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum Caller {
    /// Wallet-balance endpoint: 24h, 7d, 1mo
    Wallet,
    /// Explore/APY endpoint: current, 7d, 30d, 90d, 180d
    Explore,
}

fn default_caller() -> Caller {
    Caller::Wallet
}

fn default_period() -> String {
    "1mo".to_string()
}

/// Input for one chart computation
#[derive(Debug, Deserialize)]
struct ChartRequest {
    /// Which endpoint vocabulary the period token is drawn from
    #[serde(default = "default_caller")]
    caller: Caller,

    /// Period token scoped to the caller
    #[serde(default = "default_period")]
    period: String,

    /// Raw balance observations for the wallet
    #[serde(default)]
    observations: Vec<BalanceObservation>,

    /// Rate quote history for the pool
    #[serde(default)]
    rates: Vec<RateQuote>,

    /// Override for "now"; defaults to the wall clock
    #[serde(default)]
    now: Option<DateTime<Utc>>,
}

/// Output from the chart computation
#[derive(Debug, Serialize)]
struct ChartResponse {
    series: Vec<ChartPoint>,
    summary: BalanceSummary,
    execution_time_ms: u64,
}

fn resolve_window(caller: Caller, token: &str) -> Result<PeriodWindow, EngineError> {
    match caller {
        Caller::Wallet => token.parse::<WalletPeriod>().map(PeriodWindow::from),
        Caller::Explore => token.parse::<ExplorePeriod>().map(PeriodWindow::from),
    }
}

fn json_response(status_code: i64, body: String) -> ApiGatewayProxyResponse {
    let mut response = ApiGatewayProxyResponse {
        status_code,
        body: Some(Body::Text(body)),
        ..Default::default()
    };
    response
        .headers
        .insert("content-type", HeaderValue::from_static("application/json"));
    response
}

fn error_response(status_code: i64, message: &str) -> ApiGatewayProxyResponse {
    json_response(
        status_code,
        serde_json::json!({ "error": message }).to_string(),
    )
}

async fn handler(
    event: LambdaEvent<ApiGatewayProxyRequest>,
) -> Result<ApiGatewayProxyResponse, Error> {
    let start = Instant::now();

    let body = event.payload.body.unwrap_or_default();
    let request: ChartRequest = match serde_json::from_str(&body) {
        Ok(request) => request,
        Err(e) => return Ok(error_response(400, &format!("invalid request body: {}", e))),
    };

    let window = match resolve_window(request.caller, &request.period) {
        Ok(window) => window,
        Err(e) => return Ok(error_response(400, &e.to_string())),
    };

    let rates = RateHistory::new(request.rates);
    let now = request.now.unwrap_or_else(Utc::now);

    let engine = BalanceEngine::new(EngineConfig::default());
    let payload = match engine.chart(&request.observations, &rates, window, now) {
        Ok(payload) => payload,
        // No history is a reported condition, not a failure: substitute the
        // zero-balance series
        Err(EngineError::EmptySeries) => ChartPayload::zero(&rates, now),
        Err(e) => return Ok(error_response(400, &e.to_string())),
    };

    let response = ChartResponse {
        series: payload.series,
        summary: payload.summary,
        execution_time_ms: start.elapsed().as_millis() as u64,
    };

    Ok(json_response(200, serde_json::to_string(&response)?))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
