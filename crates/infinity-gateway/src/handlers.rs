//! HTTP handlers

use crate::state::AppState;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use infinity_analysis::{
    AnalysisRequest, AnalysisResult, FibonacciLevels, ServiceStatus, build_request,
};
use infinity_market::{Quote, normalize};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
pub struct MarketDataQuery {
    pub symbol: Option<String>,
}

/// `GET /market-data?symbol=`
pub async fn market_data(
    State(state): State<AppState>,
    Query(query): Query<MarketDataQuery>,
) -> Json<Quote> {
    let symbol = normalize(query.symbol.as_deref());
    Json(state.quotes.get_quote(&symbol).await)
}

/// Body of `POST /ai-analyze`; every field is optional
#[derive(Debug, Default)]
pub struct AnalyzeBody {
    pub symbol: Option<String>,
    pub timeframe: Option<String>,
    pub fib_levels: Option<FibonacciLevels>,
    pub prompt: Option<String>,
    /// Number or numeric string
    pub swing_high: Option<Value>,
    pub swing_low: Option<Value>,
}

fn swing_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_field(object: &Map<String, Value>, key: &str) -> Option<String> {
    object.get(key)?.as_str().map(str::to_string)
}

/// Finite numeric entries only; `null` and strings are dropped
fn levels_field(object: &Map<String, Value>) -> Option<FibonacciLevels> {
    let levels: FibonacciLevels = object
        .get("fibLevels")?
        .as_object()?
        .iter()
        .filter_map(|(label, value)| {
            value
                .as_f64()
                .filter(|price| price.is_finite())
                .map(|price| (label.clone(), price))
        })
        .collect();
    Some(levels)
}

impl AnalyzeBody {
    /// Parse leniently
    ///
    /// A body that is not a JSON object counts as empty. Inside an object
    /// each field is read on its own, so one malformed field falls back to
    /// its default without discarding the others.
    pub fn from_bytes(body: &[u8]) -> Self {
        let object = match serde_json::from_slice::<Value>(body) {
            Ok(Value::Object(object)) => object,
            Ok(_) => {
                debug!("Analyze body is not an object, using defaults");
                return Self::default();
            }
            Err(e) => {
                debug!(error = %e, "Unreadable analyze body, using defaults");
                return Self::default();
            }
        };

        Self {
            symbol: string_field(&object, "symbol"),
            timeframe: string_field(&object, "timeframe"),
            fib_levels: levels_field(&object),
            prompt: string_field(&object, "prompt"),
            swing_high: object.get("swingHigh").cloned(),
            swing_low: object.get("swingLow").cloned(),
        }
    }

    /// Resolve defaults; derive levels from the swings when none were sent
    pub fn into_request(self) -> AnalysisRequest {
        let defaults = AnalysisRequest::default();
        let symbol = normalize(self.symbol.as_deref());
        let timeframe = self
            .timeframe
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or(defaults.timeframe);

        let mut fib_levels = self.fib_levels.unwrap_or_default();
        if fib_levels.is_empty() {
            let high = swing_text(self.swing_high.as_ref());
            let low = swing_text(self.swing_low.as_ref());
            fib_levels =
                build_request(&symbol, &timeframe, high.as_deref(), low.as_deref(), None)
                    .fib_levels;
        }

        AnalysisRequest {
            symbol,
            timeframe,
            fib_levels,
            prompt: self.prompt.unwrap_or_default(),
        }
    }
}

/// `POST /ai-analyze`
pub async fn analyze(State(state): State<AppState>, body: Bytes) -> Json<AnalysisResult> {
    let request = AnalyzeBody::from_bytes(&body).into_request();
    Json(state.analysis.analyze(&request).await)
}

/// `GET /ai-analyze`
pub async fn analysis_status(State(state): State<AppState>) -> Json<ServiceStatus> {
    Json(state.analysis.status().await)
}
