//! Tickerbot API Server
//!
//! Serves the investor-context chat endpoint over HTTP.

use std::sync::Arc;
use tickerbot_api::{create_router, state::AppState};
use tickerbot_chat::{ChatPipeline, OpenAiClient};
use tickerbot_core::config::AppConfig;
use tickerbot_core::{ContextStore, LlmClient};
use tickerbot_store::MongoContextStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;

    // Initialize tracing; RUST_LOG takes precedence over the config level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level)),
        )
        .init();

    // Context store is optional: without MONGO_URI the service answers
    // from the model alone.
    let store: Option<Arc<dyn ContextStore>> = match &config.store.mongo_uri {
        Some(_) => {
            let store = MongoContextStore::connect(&config.store).await?;
            tracing::info!(
                database = %config.store.database,
                collection = %config.store.collection,
                "Connected to MongoDB"
            );
            Some(Arc::new(store))
        }
        None => {
            tracing::warn!("MONGO_URI not set; answering without database context");
            None
        }
    };

    // Without LLM credentials the pipeline is absent and ask requests
    // are rejected with 503.
    let pipeline = match OpenAiClient::from_config(&config.llm) {
        Ok(client) => {
            let llm: Arc<dyn LlmClient> = Arc::new(client);
            Some(Arc::new(ChatPipeline::new(store, llm)))
        }
        Err(e) => {
            tracing::warn!(error = %e, "LLM client not configured; ask requests will be rejected");
            None
        }
    };

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = Arc::new(AppState::new(config, pipeline));
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Tickerbot API server starting on http://{addr}");
    tracing::info!("Swagger UI available at http://{addr}/swagger-ui/");

    axum::serve(listener, app).await?;

    Ok(())
}
