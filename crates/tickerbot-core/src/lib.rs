//! Tickerbot Core - Domain models, traits, and shared types
//!
//! This crate defines the core abstractions used throughout tickerbot:
//! - Investor context types flowing through the ask pipeline
//! - Common error types
//! - Shared traits for the context store and the LLM client
//! - Configuration management

pub mod config;

pub use config::{AppConfig, ConfigError, LlmConfig, LoggingConfig, ServerConfig, StoreConfig};

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Core error types for tickerbot operations
#[derive(Error, Debug)]
pub enum TickerbotError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("LLM error: {0}")]
    LlmError(String),

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, TickerbotError>;

// ============================================================================
// Investor Context
// ============================================================================

/// The `investors` sub-structure extracted from one matching document.
///
/// The store does not fix the shape: a mapping, a list of mappings, or
/// whatever a document happens to hold under its `investors` field.
/// Documents without the field contribute an empty object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InvestorContext(pub serde_json::Value);

impl InvestorContext {
    /// Context for a document that has no `investors` field.
    pub fn empty() -> Self {
        Self(serde_json::Value::Object(serde_json::Map::new()))
    }
}

impl From<serde_json::Value> for InvestorContext {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

/// Context retrieved for a single request.
///
/// `Unavailable` means no store is configured and retrieval was skipped,
/// which is distinct from a configured store returning zero matches.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextBatch {
    /// No context store is configured.
    Unavailable,
    /// Matches in store iteration order; may be empty.
    Retrieved(Vec<InvestorContext>),
}

impl ContextBatch {
    /// Number of records in the batch. `Unavailable` counts as zero.
    pub fn len(&self) -> usize {
        match self {
            Self::Unavailable => 0,
            Self::Retrieved(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a store was actually consulted.
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Retrieved(_))
    }

    /// Records in the batch; empty slice when unavailable.
    pub fn records(&self) -> &[InvestorContext] {
        match self {
            Self::Unavailable => &[],
            Self::Retrieved(records) => records,
        }
    }

    /// JSON array rendering used when interpolating context into a prompt.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.records().iter().map(|c| c.0.clone()).collect())
    }
}

// ============================================================================
// Pipeline Output
// ============================================================================

/// Result of one full ask-pipeline pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatAnswer {
    /// Text of the model's first returned choice.
    pub answer: String,

    /// Number of context records that were retrieved.
    pub context_records: usize,

    /// Whether a context store was consulted at all.
    pub context_available: bool,

    /// Wall-clock pipeline time in milliseconds.
    pub processing_time_ms: u64,
}

// ============================================================================
// Traits
// ============================================================================

/// Trait for context stores backing retrieval.
#[async_trait::async_trait]
pub trait ContextStore: Send + Sync {
    /// Fetch the `investors` sub-structures of every document whose
    /// `investors.name` matches the query, in store iteration order.
    async fn retrieve(&self, query: &str) -> Result<Vec<InvestorContext>>;

    /// Store name for logging.
    fn name(&self) -> &str;
}

/// Trait for LLM clients.
#[async_trait::async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate a completion for a system instruction plus user message.
    async fn generate(&self, system: &str, user: &str) -> Result<String>;
}

// ============================================================================
// Tests
// ============================================================================
