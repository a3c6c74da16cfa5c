//! Typed client for the remote memory store.
//!
//! The store is the system of record for long-term memory and exposes a
//! small CRUD protocol over HTTP:
//!
//! | Operation   | Request                              | Success reply            |
//! |-------------|--------------------------------------|--------------------------|
//! | `get`       | `GET /memory`                        | `{"memory": [string..]}` |
//! | `overwrite` | `PUT /memory` `{"memory": [..]}`     | `{"memory": [string..]}` |
//! | `add`       | `POST /memory` `{"add": [..]}`       | `{"memory": [string..]}` |
//! | `delete`    | `DELETE /memory` `{"delete": [..]}`  | `{"memory": [string..]}` |
//!
//! Every success reply carries the full, current memory after the operation.
//! Reads are best-effort and degrade to an empty memory on any failure;
//! mutation failures propagate to the caller.

use crate::{Result, SmritiError};
use serde_json::{json, Value};
use tracing::warn;

/// The ordered list of free-text memory items. Order is caller-controlled
/// and preserved end-to-end by `overwrite`/`get`.
pub type Memory = Vec<String>;

/// HTTP client for the remote memory store
#[derive(Debug, Clone)]
pub struct MemoryStoreClient {
    http: reqwest::Client,
    base_url: String,
}

impl MemoryStoreClient {
    /// Create a client for the store at `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    /// Create a client reusing an existing `reqwest::Client`
    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    /// The store base URL this client talks to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn memory_url(&self) -> String {
        format!("{}/memory", self.base_url)
    }

    /// Fetch the current memory.
    ///
    /// This never fails: transport errors, non-2xx statuses, and malformed
    /// reply bodies all degrade to an empty memory with a logged warning.
    /// Use [`try_get`](Self::try_get) where "unreachable" must be
    /// distinguishable from "empty".
    pub async fn get(&self) -> Memory {
        match self.try_get().await {
            Ok(memory) => memory,
            Err(e) => {
                warn!("memory get degraded to empty: {e}");
                Vec::new()
            }
        }
    }

    /// Fallible read path wrapped by [`get`](Self::get)
    pub async fn try_get(&self) -> Result<Memory> {
        let response = self
            .http
            .get(self.memory_url())
            .send()
            .await
            .map_err(|e| SmritiError::Store(format!("memory get request failed: {e}")))?;

        Self::decode_envelope("get", response).await
    }

    /// Replace the memory in full with `items`, preserving their order
    pub async fn overwrite(&self, items: &[String]) -> Result<Memory> {
        let response = self
            .http
            .put(self.memory_url())
            .json(&json!({ "memory": items }))
            .send()
            .await
            .map_err(|e| SmritiError::Store(format!("memory overwrite request failed: {e}")))?;

        Self::decode_envelope("overwrite", response).await
    }

    /// Append `items` not already present. Dedup policy (exact match) is
    /// enforced by the store; the client forwards the items verbatim.
    pub async fn add(&self, items: &[String]) -> Result<Memory> {
        let response = self
            .http
            .post(self.memory_url())
            .json(&json!({ "add": items }))
            .send()
            .await
            .map_err(|e| SmritiError::Store(format!("memory add request failed: {e}")))?;

        Self::decode_envelope("add", response).await
    }

    /// Remove exact-match `items` from the memory
    pub async fn delete(&self, items: &[String]) -> Result<Memory> {
        let response = self
            .http
            .delete(self.memory_url())
            .json(&json!({ "delete": items }))
            .send()
            .await
            .map_err(|e| SmritiError::Store(format!("memory delete request failed: {e}")))?;

        Self::decode_envelope("delete", response).await
    }

    /// Validate a store reply against the `{"memory": [string..]}` envelope.
    ///
    /// Non-2xx statuses short-circuit before body parsing; the error carries
    /// the status and whatever body text was readable.
    async fn decode_envelope(operation: &str, response: reqwest::Response) -> Result<Memory> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SmritiError::Store(
                format!("memory {operation} failed ({status}): {body}")
                    .trim()
                    .to_string(),
            ));
        }

        let body: Value = response.json().await.map_err(|e| {
            SmritiError::Store(format!("memory {operation} returned invalid JSON: {e}"))
        })?;

        let items = body.get("memory").and_then(Value::as_array).ok_or_else(|| {
            SmritiError::Store(format!(
                "memory {operation} response was malformed, expected {{\"memory\": [..]}} but received: {body}"
            ))
        })?;

        items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    SmritiError::Store(format!(
                        "memory {operation} response contained a non-string item: {item}"
                    ))
                })
            })
            .collect()
    }
}
