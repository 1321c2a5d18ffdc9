// In crates/execution/src/types.rs

use app_config::set_path;
use core_types::DateSpan;
use serde::Serialize;
use serde_json::{json, Value};

/// One sub-run: a full, owned copy of the batch configuration scoped to a
/// single span.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartitionRequest {
    /// Position of the partition in the batch (chronological).
    pub index: usize,
    pub span: DateSpan,
    pub config: Value,
}

impl PartitionRequest {
    /// Clones `template` and points its `backtest.daterange` at `span`.
    pub fn new(index: usize, template: &Value, span: DateSpan) -> Self {
        let mut config = template.clone();
        set_path(
            &mut config,
            &["backtest", "daterange"],
            json!({ "from": span.from_rfc3339(), "to": span.to_rfc3339() }),
        );
        Self { index, span, config }
    }
}
