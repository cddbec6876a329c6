//! Engine operations as [`Tool`]s.
//!
//! Each tool parses its camelCase parameters, queues the matching controller
//! call on the worker and returns the operation's envelope as a
//! [`ToolResult`]. Soft failures come back as `success: false` results; only
//! fatal engine errors and a stopped worker are `Err`.

mod operation;
mod params;

use std::sync::Arc;

use async_trait::async_trait;
use futures::FutureExt;
use pagehand_protocols::{Tool, ToolContext, ToolDefinition, ToolError, ToolResult};
use serde_json::Value;
use tracing::{debug, error};

pub use operation::Operation;
pub use params::Request;

use crate::error::FatalError;
use crate::worker::WorkerHandle;

pub struct BrowserTool {
    definition: ToolDefinition,
    operation: Operation,
    handle: WorkerHandle,
}

impl BrowserTool {
    pub fn new(operation: Operation, handle: WorkerHandle) -> Self {
        Self {
            definition: operation.definition(),
            operation,
            handle,
        }
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }
}

impl From<FatalError> for ToolError {
    fn from(e: FatalError) -> Self {
        match e {
            FatalError::WorkerStopped | FatalError::WorkerStartup(_) => {
                ToolError::WorkerUnavailable(e.to_string())
            }
            FatalError::ThreadAffinityViolation { .. } => ToolError::Fatal(e.to_string()),
        }
    }
}

#[async_trait]
impl Tool for BrowserTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, params: Value, ctx: ToolContext) -> Result<ToolResult, ToolError> {
        self.validate(&params)?;
        let request = Request::parse(self.operation, params)?;
        debug!(
            tool = self.operation.id(),
            correlation_id = %ctx.correlation_id,
            "Executing {:?}",
            request
        );

        let envelope = self
            .handle
            .call(move |c| async move { request.run(c).await }.boxed_local())
            .await
            .inspect_err(|e| error!(tool = self.operation.id(), "Tool call failed: {}", e))?;

        Ok(ToolResult::from_envelope(self.operation.id(), envelope))
    }
}

/// One tool per operation, all backed by `handle`.
pub fn toolset(handle: WorkerHandle) -> Vec<Arc<dyn Tool>> {
    Operation::ALL
        .into_iter()
        .map(|op| Arc::new(BrowserTool::new(op, handle.clone())) as Arc<dyn Tool>)
        .collect()
}

/// Tool definitions, available without a running worker.
pub fn definitions() -> Vec<ToolDefinition> {
    Operation::ALL.into_iter().map(Operation::definition).collect()
}
