//! System prompt assembly.
//!
//! The session's system prompt lives on disk as plain markdown. At startup
//! the current memory is appended to it as a bulleted section so the agent
//! resumes with its long-term context in place.

use crate::cache::FallbackCache;
use crate::store::{Memory, MemoryStoreClient};
use crate::Result;
use std::path::Path;
use tracing::warn;

/// Header introducing the memory section in the assembled prompt
pub const MEMORY_SECTION_HEADER: &str = "Long-term memory:";

/// Read the base system prompt from `path`
pub fn load_system_prompt(path: impl AsRef<Path>) -> Result<String> {
    Ok(std::fs::read_to_string(path)?)
}

/// Append memory-derived context to a base prompt.
///
/// Items are listed in memory order; an empty memory leaves the base prompt
/// untouched.
pub fn with_memory_context(base: &str, memory: &[String]) -> String {
    if memory.is_empty() {
        return base.to_string();
    }

    let items = memory
        .iter()
        .map(|item| format!("- {item}"))
        .collect::<Vec<_>>()
        .join("\n");

    format!("{}\n\n{MEMORY_SECTION_HEADER}\n{items}", base.trim_end())
}

/// Assemble the full startup prompt: base text from `path` plus the current
/// memory.
///
/// The memory comes from the store when reachable (and is written through
/// to `cache`, if given); when the store is unreachable the cached snapshot
/// stands in. Only a missing/unreadable prompt file fails.
pub async fn bootstrap(
    path: impl AsRef<Path>,
    store: &MemoryStoreClient,
    cache: Option<&FallbackCache>,
) -> Result<String> {
    let base = load_system_prompt(path)?;

    let memory: Memory = match store.try_get().await {
        Ok(memory) => {
            if let Some(cache) = cache {
                cache.save(&memory);
            }
            memory
        }
        Err(e) => {
            warn!("memory store unreachable during prompt assembly: {e}");
            cache.map(FallbackCache::load).unwrap_or_default()
        }
    };

    Ok(with_memory_context(&base, &memory))
}
