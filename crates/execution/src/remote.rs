// In crates/execution/src/remote.rs

use analytics::ResultReport;
use api_client::ApiClient;
use async_trait::async_trait;
use core_types::RunMode;

use crate::{ComputeEngine, PartitionRequest, Result};

/// Runs sub-runs on a compute engine reachable over HTTP.
pub struct RemoteEngine {
    api_client: ApiClient,
}

impl RemoteEngine {
    pub fn new(api_client: ApiClient) -> Self {
        Self { api_client }
    }
}

#[async_trait]
impl ComputeEngine for RemoteEngine {
    fn name(&self) -> &'static str {
        "RemoteEngine"
    }

    async fn run(&self, mode: &RunMode, request: PartitionRequest) -> Result<ResultReport> {
        tracing::debug!(index = request.index, base_url = %self.api_client.base_url, "Submitting partition to remote engine.");
        let value = self.api_client.run_backtest(mode, &request.config).await?;
        let report: ResultReport = serde_json::from_value(value)?;
        Ok(report)
    }
}
