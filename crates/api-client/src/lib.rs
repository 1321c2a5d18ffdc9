// In crates/api-client/src/lib.rs

use std::time::Duration;

use app_config::types::EngineSettings;
use core_types::RunMode;
use serde_json::Value;

pub mod error;
pub mod types;

// Re-export public types
pub use error::{Error, Result};
pub use types::*;

impl ApiClient {
    /// Constructs a new ApiClient from EngineSettings.
    pub fn new(settings: &EngineSettings) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .map_err(|e| Error::ClientBuildError(e.to_string()))?;
        let base_url = settings.base_url.trim_end_matches('/').to_string();
        Ok(ApiClient { http_client, base_url })
    }

    /// Runs one sub-run on the engine and returns its raw JSON report.
    ///
    /// This corresponds to the `POST /api/backtest` endpoint.
    pub async fn run_backtest(&self, mode: &RunMode, config: &Value) -> Result<Value> {
        let url = format!("{}/api/backtest", self.base_url);
        let body = BacktestRequest {
            mode: &mode.0,
            gekko_config: config,
        };

        let response = self
            .http_client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(Error::RequestFailed)?;

        let status = response.status();
        let text = response.text().await.map_err(Error::RequestFailed)?;

        if !status.is_success() {
            // Prefer the engine's own error message over the raw body.
            let msg = serde_json::from_str::<EngineErrorBody>(&text)
                .map(|body| body.error)
                .unwrap_or(text);
            return Err(Error::ApiError {
                status: status.as_u16(),
                msg,
            });
        }

        tracing::debug!(bytes = text.len(), "Received engine report.");
        let value: Value = serde_json::from_str(&text).map_err(Error::DeserializationFailed)?;
        Ok(value)
    }
}

// Free function to allow api_client::new usage
pub fn new(settings: &EngineSettings) -> Result<ApiClient> {
    ApiClient::new(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn client(url: &str) -> ApiClient {
        ApiClient::new(&EngineSettings {
            base_url: format!("{}/", url),
            timeout_secs: 5,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_run_backtest_posts_config_and_returns_report() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/backtest")
            .match_body(mockito::Matcher::PartialJson(json!({
                "mode": "backtest",
                "gekkoConfig": { "tradingAdvisor": { "candleSize": 60 } }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"performanceReport":{"profit":4.2}}"#)
            .create_async()
            .await;

        let report = client(&server.url())
            .run_backtest(
                &RunMode::default(),
                &json!({ "tradingAdvisor": { "candleSize": 60 } }),
            )
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(report["performanceReport"]["profit"], 4.2);
    }

    #[tokio::test]
    async fn test_engine_error_is_surfaced() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/backtest")
            .with_status(500)
            .with_body(r#"{"error":"Child process has died."}"#)
            .create_async()
            .await;

        let err = client(&server.url())
            .run_backtest(&RunMode::default(), &json!({}))
            .await
            .unwrap_err();

        match err {
            Error::ApiError { status, msg } => {
                assert_eq!(status, 500);
                assert_eq!(msg, "Child process has died.");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_plain_text_error_body_is_kept() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/api/backtest")
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let err = client(&server.url())
            .run_backtest(&RunMode::default(), &json!({}))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ApiError { status: 502, ref msg } if msg == "bad gateway"));
    }
}
