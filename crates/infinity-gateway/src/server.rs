//! Router and HTTP server

use crate::handlers;
use crate::state::AppState;
use anyhow::Result;
use axum::Router;
use axum::routing::get;
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Build the router
///
/// Routes are served at the root and again under `/api`.
pub fn app_router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/market-data", get(handlers::market_data))
        .route(
            "/ai-analyze",
            get(handlers::analysis_status).post(handlers::analyze),
        );

    Router::new()
        .merge(routes.clone())
        .nest("/api", routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve until the process is stopped
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    info!("Registering routes:");
    info!("  GET  /market-data?symbol=XAUUSD");
    info!("  POST /ai-analyze");
    info!("  GET  /ai-analyze");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "Server listening");
    axum::serve(listener, app_router(state)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{offline_quotes, offline_state};
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use infinity_analysis::{AnalysisClient, AnalysisConfig};
    use infinity_llm::{
        CompletionRequest, CompletionResponse, LLMProvider, Message, StopReason, TokenUsage,
    };
    use mockall::mock;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    mock! {
        Provider {}

        #[async_trait]
        impl LLMProvider for Provider {
            async fn complete(&self, request: CompletionRequest) -> infinity_llm::Result<CompletionResponse>;
            async fn health_check(&self) -> infinity_llm::Result<()>;
            fn name(&self) -> &str;
        }
    }

    fn app(analysis: AnalysisClient) -> Router {
        app_router(AppState::new(offline_quotes(), analysis))
    }

    fn offline_app() -> Router {
        app_router(offline_state())
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post(uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_market_data_normalizes_symbol() {
        let response = offline_app()
            .oneshot(
                Request::builder()
                    .uri("/market-data?symbol=%20xauusd")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["symbol"], "XAUUSD");
        assert_eq!(json["price"], 2485.5);
        assert_eq!(json["source"], "Mock Data (API limit)");
        assert!(json.get("open").is_none());
    }

    #[tokio::test]
    async fn test_routes_mounted_under_api() {
        let response = offline_app()
            .oneshot(Request::builder().uri("/api/market-data").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["symbol"], "XAUUSD");
    }

    #[tokio::test]
    async fn test_analyze_unparsable_body_gets_fallback() {
        let response = offline_app()
            .oneshot(post("/api/ai-analyze", "{{{"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["bias"], "bullish");
        assert_eq!(json["confidence"], 75);
        assert_eq!(
            json["summary"],
            "XAUUSD showing bullish momentum. Watch key levels for entry opportunities."
        );
        assert_eq!(json["keyLevels"][0], json!({ "price": 2485.0, "type": "support" }));
    }

    #[tokio::test]
    async fn test_analyze_null_level_keeps_symbol() {
        let response = offline_app()
            .oneshot(post(
                "/ai-analyze",
                r#"{"symbol":"BTCUSD","timeframe":"H4","fibLevels":{"0.5":null},"prompt":"Scalp plan"}"#,
            ))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(
            json["summary"],
            "BTCUSD showing bullish momentum. Watch key levels for entry opportunities."
        );
    }

    #[tokio::test]
    async fn test_analyze_live_path() {
        let mut provider = MockProvider::new();
        provider
            .expect_complete()
            .withf(|req| {
                let text = &req.messages[0].content;
                text.starts_with("AI trading analysis for BTCUSD on H4 timeframe.")
                    && text.contains("\"0.5\":65000")
            })
            .times(1)
            .returning(|_| {
                Ok(CompletionResponse {
                    message: Message::assistant(
                        r#"{"bias":"bearish","confidence":40,"keyLevels":[],"scenarios":["Fade rallies"],"summary":"Weak."}"#,
                    ),
                    stop_reason: StopReason::EndTurn,
                    usage: TokenUsage::default(),
                })
            });

        let client = AnalysisClient::new(Arc::new(provider), AnalysisConfig::default());
        let response = app(client)
            .oneshot(post(
                "/ai-analyze",
                r#"{"symbol":"BTCUSD","timeframe":"H4","swingHigh":70000,"swingLow":60000}"#,
            ))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert_eq!(json["bias"], "bearish");
        assert_eq!(json["confidence"], 40);
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let response = offline_app()
            .oneshot(Request::builder().uri("/ai-analyze").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(
            json,
            json!({ "status": "live", "openai": "unconfigured", "model": "gpt-4o-mini" })
        );
    }

    #[tokio::test]
    async fn test_cors_is_permissive() {
        let response = offline_app()
            .oneshot(
                Request::builder()
                    .uri("/market-data")
                    .header("origin", "https://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(
            response.headers()["access-control-allow-origin"],
            "*"
        );
    }
}
