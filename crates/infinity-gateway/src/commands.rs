//! CLI commands
//!
//! The CLI plays the role of the UI: it calls the gateway services and
//! records what it did in the local history store.

use crate::cli::HistoryKind;
use crate::state::AppState;
use anyhow::Result;
use infinity_analysis::{AnalysisResult, build_request};
use infinity_history::{HistoryEntry, HistoryStore};
use infinity_market::{Quote, normalize};
use serde_json::{Map, Value, json};
use tracing::{info, warn};

/// Calculator id recorded for quote lookups
pub const QUOTE_SOURCE_ID: &str = "market-data";
/// Calculator id recorded for Fibonacci level sets
pub const FIBONACCI_SOURCE_ID: &str = "fibonacci";
/// Source id recorded for analyses
pub const ANALYSIS_SOURCE_ID: &str = "ai-analysis";

fn inputs<const N: usize>(pairs: [(&str, Value); N]) -> Map<String, Value> {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// Fetch a quote and record it as a calculation
pub async fn quote(state: &AppState, store: &mut HistoryStore, symbol: Option<&str>) -> Result<Quote> {
    let symbol = normalize(symbol);
    let quote = state.quotes.get_quote(&symbol).await;
    if !quote.source.is_live() {
        warn!(%symbol, source = %quote.source, "Recording a reference price, not a live quote");
    }

    store.append_calculation(HistoryEntry::new(
        QUOTE_SOURCE_ID,
        inputs([("symbol", json!(symbol))]),
        serde_json::to_value(&quote)?,
    ))?;

    Ok(quote)
}

/// Raw `analyze` arguments
#[derive(Debug, Clone, Default)]
pub struct AnalyzeArgs {
    pub symbol: String,
    pub timeframe: String,
    pub high: Option<String>,
    pub low: Option<String>,
    pub prompt: Option<String>,
}

/// Build the request, run the analysis and record both the level set and
/// the result
pub async fn analyze(
    state: &AppState,
    store: &mut HistoryStore,
    args: AnalyzeArgs,
) -> Result<AnalysisResult> {
    let symbol = normalize(Some(&args.symbol));
    let request = build_request(
        &symbol,
        &args.timeframe,
        args.high.as_deref(),
        args.low.as_deref(),
        args.prompt.as_deref(),
    );

    if !request.fib_levels.is_empty() {
        store.append_calculation(HistoryEntry::new(
            FIBONACCI_SOURCE_ID,
            inputs([("swingHigh", json!(args.high)), ("swingLow", json!(args.low))]),
            serde_json::to_value(&request.fib_levels)?,
        ))?;
    }

    let result = state.analysis.analyze(&request).await;
    info!(symbol = %request.symbol, bias = ?result.bias, "Analysis complete");

    store.append_analysis(HistoryEntry::new(
        ANALYSIS_SOURCE_ID,
        inputs([
            ("symbol", json!(request.symbol)),
            ("timeframe", json!(request.timeframe)),
            ("prompt", json!(request.prompt)),
            ("fibLevels", serde_json::to_value(&request.fib_levels)?),
        ]),
        serde_json::to_value(&result)?,
    ))?;

    Ok(result)
}

/// List entries of one kind, clearing them first when asked
pub fn history(store: &mut HistoryStore, kind: HistoryKind, clear: bool) -> Result<Vec<HistoryEntry>> {
    match (kind, clear) {
        (HistoryKind::Calculations, true) => store.clear_calculations()?,
        (HistoryKind::Analyses, true) => store.clear_analyses()?,
        _ => {}
    }

    Ok(match kind {
        HistoryKind::Calculations => store.calculations().cloned().collect(),
        HistoryKind::Analyses => store.analyses().cloned().collect(),
    })
}

/// Preference changes requested on the command line
#[derive(Debug, Clone, Default)]
pub struct PrefsUpdate {
    pub account_size: Option<f64>,
    pub risk_percent: Option<f64>,
    pub calculator: Option<String>,
}

/// Apply preference updates
pub fn prefs(store: &mut HistoryStore, update: PrefsUpdate) -> Result<()> {
    if let Some(size) = update.account_size {
        store.set_default_account_size(size)?;
    }
    if let Some(percent) = update.risk_percent {
        store.set_default_risk_percent(percent)?;
    }
    if let Some(id) = update.calculator.as_deref() {
        store.set_selected_calculator(id)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::offline_state;
    use infinity_analysis::Bias;
    use infinity_market::QuoteSource;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_quote_is_recorded() {
        let mut store = HistoryStore::in_memory();
        let quote = quote(&offline_state(), &mut store, Some("eurusd")).await.unwrap();

        assert_eq!(quote.symbol, "EURUSD");
        assert_eq!(quote.source, QuoteSource::MockData);

        let entry = store.calculations().next().unwrap();
        assert_eq!(entry.source_id, QUOTE_SOURCE_ID);
        assert_eq!(entry.inputs["symbol"], "EURUSD");
        assert_eq!(entry.result["price"], 1.085);
    }

    #[tokio::test]
    async fn test_analyze_records_levels_and_result() {
        let mut store = HistoryStore::in_memory();
        let args = AnalyzeArgs {
            symbol: "xauusd".to_string(),
            timeframe: "H1".to_string(),
            high: Some("2500".to_string()),
            low: Some("2400".to_string()),
            prompt: None,
        };

        let result = analyze(&offline_state(), &mut store, args).await.unwrap();
        assert_eq!(result.bias, Bias::Bullish);

        let levels = store.calculations().next().unwrap();
        assert_eq!(levels.source_id, FIBONACCI_SOURCE_ID);
        assert_eq!(levels.result["0.618"], 2461.8);

        let analysis = store.analyses().next().unwrap();
        assert_eq!(analysis.inputs["symbol"], "XAUUSD");
        assert_eq!(analysis.inputs["prompt"], "Analyze XAUUSD market conditions");
        assert_eq!(analysis.result["confidence"], 75);
    }

    #[tokio::test]
    async fn test_analyze_without_swings_records_no_levels() {
        let mut store = HistoryStore::in_memory();
        let args = AnalyzeArgs {
            symbol: "BTCUSD".to_string(),
            timeframe: "D1".to_string(),
            ..Default::default()
        };
        analyze(&offline_state(), &mut store, args).await.unwrap();
        assert_eq!(store.calculations().len(), 0);
        assert_eq!(store.analyses().len(), 1);
    }

    #[tokio::test]
    async fn test_history_clear_persists() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        let mut store = HistoryStore::open(&path).unwrap();
        quote(&offline_state(), &mut store, None).await.unwrap();

        let listed = history(&mut store, HistoryKind::Calculations, false).unwrap();
        assert_eq!(listed.len(), 1);

        let listed = history(&mut store, HistoryKind::Calculations, true).unwrap();
        assert!(listed.is_empty());
        assert_eq!(HistoryStore::open(&path).unwrap().calculations().len(), 0);
    }

    #[test]
    fn test_prefs_validation_surfaces() {
        let mut store = HistoryStore::in_memory();
        let update = PrefsUpdate {
            account_size: Some(5_000.0),
            risk_percent: Some(1.0),
            ..Default::default()
        };
        prefs(&mut store, update).unwrap();
        assert_eq!(store.preferences().default_account_size, 5_000.0);

        let update = PrefsUpdate {
            risk_percent: Some(0.0),
            ..Default::default()
        };
        assert!(prefs(&mut store, update).is_err());
    }

    #[test]
    fn test_prefs_selects_calculator() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("history.json");
        let mut store = HistoryStore::open(&path).unwrap();

        let update = PrefsUpdate {
            calculator: Some("position-size".to_string()),
            ..Default::default()
        };
        prefs(&mut store, update).unwrap();
        assert_eq!(
            HistoryStore::open(&path).unwrap().preferences().selected_calculator,
            "position-size"
        );

        let blank = PrefsUpdate {
            calculator: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(prefs(&mut store, blank).is_err());
    }
}
