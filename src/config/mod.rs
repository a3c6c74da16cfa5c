//! Configuration for Smriti
//!
//! All settings come from the environment (a `.env` file is honored):
//!
//! - `MEMORY_API_URL` - base URL of the remote memory store
//! - `SYSTEM_PROMPT_PATH` - path to the base system prompt file
//! - `MEMORY_CACHE_DIR` - directory for the local fallback cache

use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub store: StoreConfig,
    pub prompt: PromptConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// Base URL of the remote memory store
    pub base_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PromptConfig {
    /// Path to the base system prompt file
    pub path: PathBuf,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Directory the fallback cache file lives in
    pub dir: PathBuf,
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        dotenvy::dotenv().ok();

        let base_url =
            env::var("MEMORY_API_URL").unwrap_or_else(|_| crate::DEFAULT_STORE_URL.to_string());

        // Catch misconfiguration here rather than on the first tool call.
        reqwest::Url::parse(&base_url)
            .map_err(|e| crate::SmritiError::Config(format!("invalid MEMORY_API_URL: {e}")))?;

        Ok(Config {
            store: StoreConfig { base_url },
            prompt: PromptConfig {
                path: env::var("SYSTEM_PROMPT_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("system-prompt.md")),
            },
            cache: CacheConfig {
                dir: env::var("MEMORY_CACHE_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from(".smriti")),
            },
        })
    }
}
