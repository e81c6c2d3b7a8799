//! Rendering of operation results as tool responses.

use rmcp::model::{CallToolResult, Content};
use serde::Serialize;

use crate::clients::ShopifyError;

/// Renders a successful value as pretty-printed JSON text.
pub fn success<T: Serialize>(value: &T) -> CallToolResult {
    match serde_json::to_string_pretty(value) {
        Ok(json) => CallToolResult::success(vec![Content::text(json)]),
        Err(e) => CallToolResult::error(vec![Content::text(format!(
            "Failed to serialize result: {e}"
        ))]),
    }
}

/// Renders a failure as `"<default>: <message>"` with the error flag set.
pub fn failure(default_message: &str, error: &ShopifyError) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!("{default_message}: {error}"))])
}

/// Renders an operation result, logging failures.
pub fn render<T: Serialize>(
    tool: &str,
    default_message: &str,
    result: Result<T, ShopifyError>,
) -> CallToolResult {
    match result {
        Ok(value) => success(&value),
        Err(error) => {
            tracing::debug!(tool, kind = ?error.kind(), "tool call failed");
            failure(default_message, &error)
        }
    }
}
