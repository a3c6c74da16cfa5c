//! # Smriti (स्मृति) - Long-Term Memory for Streaming Agent Sessions
//!
//! Smriti is the client-side layer that lets a conversational agent maintain
//! a persistent long-term memory: an ordered list of free-text items held in
//! a remote memory store. The agent asks for changes through tool calls; this
//! crate validates them, talks to the store, and reports one correlated
//! result per call back to the session.
//!
//! ## Components
//!
//! - [`store::MemoryStoreClient`] - typed CRUD client over the store's HTTP
//!   protocol (`GET`/`PUT`/`POST`/`DELETE /memory`)
//! - [`router::ToolCallRouter`] - batch tool-call dispatch with per-call
//!   failure isolation
//! - [`session::MemoryHandler`] - attaches a router to a streaming session
//!   for the lifetime of a [`session::HandlerHandle`]
//! - [`cache::FallbackCache`] - local snapshot consulted when the store is
//!   unreachable at startup
//! - [`prompt`] - system prompt assembly with memory context
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use smriti::{Config, MemoryHandler, MemoryStoreClient, ToolCallRouter};
//! use tokio::sync::mpsc;
//!
//! let config = Config::from_env()?;
//! let store = MemoryStoreClient::new(&config.store.base_url);
//! let router = ToolCallRouter::new(store);
//!
//! // `requests` is the receiving half of the session's tool-call channel;
//! // `sink` implements `ResponseSink` over the session transport.
//! let handle = MemoryHandler::new(router).attach(requests, sink);
//!
//! // ... session runs ...
//! handle.shutdown().await;
//! ```

pub mod cache;
pub mod config;
pub mod prompt;
pub mod router;
pub mod session;
pub mod store;

pub use cache::FallbackCache;
pub use config::Config;
pub use router::{ToolCallRequest, ToolCallResponse, ToolCallRouter, ToolOutcome};
pub use session::{HandlerHandle, MemoryHandler, ResponseSink};
pub use store::{Memory, MemoryStoreClient};

/// Error types for Smriti
#[derive(Debug, thiserror::Error)]
pub enum SmritiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Memory store error: {0}")]
    Store(String),

    #[error("Session error: {0}")]
    Session(String),
}

/// Result type alias for Smriti operations
pub type Result<T> = std::result::Result<T, SmritiError>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default base URL for the remote memory store
pub const DEFAULT_STORE_URL: &str = "http://localhost:4000";

/// Storage key the fallback cache persists memory under
pub const MEMORY_STORAGE_KEY: &str = "long_term_memory";
