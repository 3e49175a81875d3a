//! Application state management

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tickerbot_chat::ChatPipeline;
use tickerbot_core::config::AppConfig;

/// Application state shared across handlers.
///
/// Constructed once at startup and read-only afterwards; the only
/// mutable member is the request counter.
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,
    /// Server start time
    pub start_time: Instant,
    /// Request counter
    pub request_count: AtomicU64,
    /// Ask pipeline; absent when no LLM credentials are configured
    pipeline: Option<Arc<ChatPipeline>>,
}

impl AppState {
    /// Create new application state.
    pub fn new(config: AppConfig, pipeline: Option<Arc<ChatPipeline>>) -> Self {
        Self {
            config,
            start_time: Instant::now(),
            request_count: AtomicU64::new(0),
            pipeline,
        }
    }

    /// Increment request counter
    pub fn increment_requests(&self) -> u64 {
        self.request_count.fetch_add(1, Ordering::SeqCst)
    }

    /// Get total request count
    pub fn get_request_count(&self) -> u64 {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Get uptime in seconds
    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Ask pipeline if configured
    pub fn pipeline(&self) -> Option<Arc<ChatPipeline>> {
        self.pipeline.clone()
    }

    pub fn has_pipeline(&self) -> bool {
        self.pipeline.is_some()
    }

    /// Whether a context store backs the pipeline
    pub fn has_store(&self) -> bool {
        self.pipeline
            .as_ref()
            .map(|p| p.has_store())
            .unwrap_or(false)
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(AppConfig::default(), None)
    }
}
