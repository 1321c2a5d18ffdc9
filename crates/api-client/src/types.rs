// In crates/api-client/src/types.rs

use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The HTTP client for a remote compute engine.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// The persistent HTTP client.
    pub http_client: Client,
    /// The engine's REST base URL, without a trailing slash.
    pub base_url: String,
}

/// Body of `POST /api/backtest`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestRequest<'a> {
    pub mode: &'a str,
    pub gekko_config: &'a Value,
}

/// The error object the engine answers with on failure.
#[derive(Debug, Deserialize)]
pub struct EngineErrorBody {
    #[serde(alias = "message")]
    pub error: String,
}
