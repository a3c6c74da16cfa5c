//! Session adapter boundary.
//!
//! The streaming agent session is an external collaborator: it emits batches
//! of tool calls as events and accepts one full batch of responses per
//! dispatch cycle. This module owns the lifecycle of that relationship.
//!
//! Attachment takes the request receiver by value, so a second subscription
//! to the same channel is impossible by construction. Teardown goes through
//! [`HandlerHandle`]: once the handle is shut down (or dropped), no further
//! batches are processed and no responses are emitted.

use crate::router::{ToolCallRequest, ToolCallResponse, ToolCallRouter};
use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use uuid::Uuid;

/// Receiving half of the session's tool-call event stream
pub type ToolCallReceiver = mpsc::Receiver<Vec<ToolCallRequest>>;

/// Sink half of the session adapter.
///
/// Implementations wrap the session transport; `submit` is called exactly
/// once per non-empty request batch, with the complete response batch.
#[async_trait]
pub trait ResponseSink: Send + Sync + 'static {
    /// Deliver a full batch of tool responses to the session
    async fn submit(&self, responses: Vec<ToolCallResponse>) -> crate::Result<()>;
}

/// Binds a [`ToolCallRouter`] to a session for the handle's lifetime
pub struct MemoryHandler {
    router: ToolCallRouter,
}

impl MemoryHandler {
    /// Create a handler around `router`
    pub fn new(router: ToolCallRouter) -> Self {
        Self { router }
    }

    /// Attach to a session: consume tool-call batches from `requests` and
    /// submit response batches to `sink` until the channel closes or the
    /// returned handle is shut down.
    ///
    /// Empty batches are consumed without dispatch and without submission.
    pub fn attach<S: ResponseSink>(self, mut requests: ToolCallReceiver, sink: S) -> HandlerHandle {
        let task = tokio::spawn(async move {
            while let Some(batch) = requests.recv().await {
                if batch.is_empty() {
                    continue;
                }

                let responses = self.router.dispatch(batch).await;
                if let Err(e) = sink.submit(responses).await {
                    warn!("failed to submit tool responses: {e}");
                }
            }
            debug!("tool call channel closed, memory handler stopping");
        });

        HandlerHandle { task: Some(task) }
    }
}

/// Handle for an attached [`MemoryHandler`].
///
/// Dropping the handle aborts the dispatch loop; batches in flight are
/// best-effort abandoned and their remote calls are not awaited.
pub struct HandlerHandle {
    task: Option<JoinHandle<()>>,
}

impl HandlerHandle {
    /// Detach from the session and wait for the loop to stop
    pub async fn shutdown(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }

    /// Whether the dispatch loop is still running
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for HandlerHandle {
    fn drop(&mut self) {
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

/// Parse a tool-call frame from the session wire format.
///
/// Frames look like `{"functionCalls": [{"id": .., "name": .., "args": ..}]}`.
/// Calls without an id are assigned a fresh one so response correlation
/// still holds; calls without a name are skipped.
pub fn parse_tool_call_frame(frame: &Value) -> Vec<ToolCallRequest> {
    let Some(calls) = frame.get("functionCalls").and_then(Value::as_array) else {
        return Vec::new();
    };

    calls
        .iter()
        .filter_map(|call| {
            let name = call.get("name").and_then(Value::as_str)?.to_string();
            let id = call
                .get("id")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| Uuid::new_v4().to_string());
            let arguments = call.get("args").cloned().unwrap_or_else(|| json!({}));

            Some(ToolCallRequest {
                id,
                name,
                arguments,
            })
        })
        .collect()
}

/// Build the wire frame carrying a full response batch
pub fn tool_response_frame(responses: &[ToolCallResponse]) -> Value {
    json!({ "functionResponses": responses })
}
