//! Tool-call routing for memory operations.
//!
//! The streaming session delivers tool calls in batches. Each call in a
//! batch is validated and dispatched independently: a bad argument, an
//! unreachable store, or even a panic in one call never affects its
//! siblings, and every call gets exactly one response correlated by id.
//!
//! The operation set is closed, so rather than an open registry keyed by
//! name, a raw call is validated once into a [`MemoryOp`] and routed to the
//! matching typed [`MemoryStoreClient`](crate::store::MemoryStoreClient)
//! method.

use crate::store::{Memory, MemoryStoreClient};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, error};

/// A tool call received from the agent session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallRequest {
    /// Unique ID for this tool call within its batch
    pub id: String,
    /// Name of the tool to call
    pub name: String,
    /// Arguments for the tool
    #[serde(default)]
    pub arguments: Value,
}

/// Outcome of a single tool call: the resulting memory, or a failure message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ToolOutcome {
    /// The store's full, up-to-date memory after the operation
    Output(Memory),
    /// Human-readable failure message
    Error(String),
}

/// Response to a single tool call, correlated to its request by `id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCallResponse {
    /// ID of the originating request
    pub id: String,
    /// Echoes the request name
    pub name: String,
    /// Success or failure payload
    pub response: ToolOutcome,
}

impl ToolCallResponse {
    fn output(id: String, name: String, memory: Memory) -> Self {
        Self {
            id,
            name,
            response: ToolOutcome::Output(memory),
        }
    }

    fn error(id: String, name: String, message: String) -> Self {
        let message = if message.trim().is_empty() {
            "API call failed".to_string()
        } else {
            message
        };
        Self {
            id,
            name,
            response: ToolOutcome::Error(message),
        }
    }
}

/// The closed set of memory operations the session may request
#[derive(Debug, Clone, PartialEq)]
pub enum MemoryOp {
    /// Read the current memory
    Get,
    /// Replace the memory in full, in the given order
    Overwrite(Memory),
    /// Append items not already present
    Add(Memory),
    /// Remove exact-match items
    Delete(Memory),
}

impl MemoryOp {
    /// Validate a raw tool call into a typed operation.
    ///
    /// Fails with a message suitable for the response payload; no remote
    /// call has been made at this point.
    pub fn parse(name: &str, arguments: &Value) -> std::result::Result<Self, String> {
        match name {
            "memory_get" => Ok(Self::Get),
            "memory_overwrite" => Ok(Self::Overwrite(required_items(name, arguments)?)),
            "memory_add" => Ok(Self::Add(required_items(name, arguments)?)),
            "memory_delete" => Ok(Self::Delete(required_items(name, arguments)?)),
            other => Err(format!("Unknown tool: {other}")),
        }
    }
}

/// Extract the mandatory `items` argument as an array of strings
fn required_items(name: &str, arguments: &Value) -> std::result::Result<Memory, String> {
    arguments
        .get("items")
        .and_then(Value::as_array)
        .and_then(|items| {
            items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect::<Option<Memory>>()
        })
        .ok_or_else(|| format!("Invalid or missing 'items' for {name}"))
}

/// Dispatches batches of tool calls against a memory store.
///
/// The router is stateless between batches; it only borrows the store
/// client's connection pool.
#[derive(Debug, Clone)]
pub struct ToolCallRouter {
    store: MemoryStoreClient,
}

impl ToolCallRouter {
    /// Create a router backed by `store`
    pub fn new(store: MemoryStoreClient) -> Self {
        Self { store }
    }

    /// The store client this router dispatches to
    pub fn store(&self) -> &MemoryStoreClient {
        &self.store
    }

    /// Dispatch a batch of tool calls and collect one response per request.
    ///
    /// Requests run concurrently as independent tasks; the combined batch is
    /// returned only once every task has settled. An empty batch returns an
    /// empty response batch without any remote call. Response order follows
    /// request order, but consumers must correlate by `id`.
    pub async fn dispatch(&self, requests: Vec<ToolCallRequest>) -> Vec<ToolCallResponse> {
        if requests.is_empty() {
            return Vec::new();
        }

        debug!("dispatching {} tool call(s)", requests.len());

        let tasks: Vec<_> = requests
            .into_iter()
            .map(|request| {
                let router = self.clone();
                let id = request.id.clone();
                let name = request.name.clone();
                let task = tokio::spawn(async move { router.dispatch_one(request).await });
                (id, name, task)
            })
            .collect();

        join_all(tasks.into_iter().map(|(id, name, task)| async move {
            match task.await {
                Ok(response) => response,
                // The task panicked; isolate it to this one call.
                Err(e) => {
                    error!("tool call {name} ({id}) aborted: {e}");
                    ToolCallResponse::error(id, name, "API call failed".to_string())
                }
            }
        }))
        .await
    }

    async fn dispatch_one(&self, request: ToolCallRequest) -> ToolCallResponse {
        let ToolCallRequest {
            id,
            name,
            arguments,
        } = request;

        let op = match MemoryOp::parse(&name, &arguments) {
            Ok(op) => op,
            Err(message) => {
                error!("rejected tool call {name} ({id}): {message}");
                return ToolCallResponse::error(id, name, message);
            }
        };

        let result = match op {
            MemoryOp::Get => Ok(self.store.get().await),
            MemoryOp::Overwrite(items) => self.store.overwrite(&items).await,
            MemoryOp::Add(items) => self.store.add(&items).await,
            MemoryOp::Delete(items) => self.store.delete(&items).await,
        };

        match result {
            Ok(memory) => ToolCallResponse::output(id, name, memory),
            Err(e) => {
                error!("tool call {name} ({id}) failed: {e}");
                ToolCallResponse::error(id, name, e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_get() {
        let op = MemoryOp::parse("memory_get", &json!({})).unwrap();
        assert_eq!(op, MemoryOp::Get);
    }

    #[test]
    fn test_parse_mutations() {
        let args = json!({"items": ["a", "b"]});

        assert_eq!(
            MemoryOp::parse("memory_overwrite", &args).unwrap(),
            MemoryOp::Overwrite(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(
            MemoryOp::parse("memory_add", &args).unwrap(),
            MemoryOp::Add(vec!["a".to_string(), "b".to_string()])
        );
        assert_eq!(
            MemoryOp::parse("memory_delete", &args).unwrap(),
            MemoryOp::Delete(vec!["a".to_string(), "b".to_string()])
        );
    }

    #[test]
    fn test_parse_unknown_tool() {
        let err = MemoryOp::parse("memory_frobnicate", &json!({})).unwrap_err();
        assert_eq!(err, "Unknown tool: memory_frobnicate");
    }

    #[test]
    fn test_parse_missing_items() {
        let err = MemoryOp::parse("memory_overwrite", &json!({})).unwrap_err();
        assert_eq!(err, "Invalid or missing 'items' for memory_overwrite");
    }

    #[test]
    fn test_parse_items_wrong_shape() {
        let err = MemoryOp::parse("memory_add", &json!({"items": "not-an-array"})).unwrap_err();
        assert_eq!(err, "Invalid or missing 'items' for memory_add");

        let err = MemoryOp::parse("memory_delete", &json!({"items": [1, 2]})).unwrap_err();
        assert_eq!(err, "Invalid or missing 'items' for memory_delete");
    }

    #[test]
    fn test_response_serialization() {
        let ok = ToolCallResponse::output("1".into(), "memory_get".into(), vec!["a".into()]);
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["response"]["output"], json!(["a"]));

        let err = ToolCallResponse::error("2".into(), "memory_add".into(), "boom".into());
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["response"]["error"], "boom");
    }

    #[test]
    fn test_empty_error_message_falls_back() {
        let response = ToolCallResponse::error("1".into(), "memory_get".into(), "  ".into());
        assert_eq!(
            response.response,
            ToolOutcome::Error("API call failed".to_string())
        );
    }

    #[test]
    fn test_request_arguments_default() {
        let request: ToolCallRequest =
            serde_json::from_value(json!({"id": "1", "name": "memory_get"})).unwrap();
        assert!(request.arguments.is_null());
    }
}
