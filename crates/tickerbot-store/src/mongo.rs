//! MongoDB implementation of the context store
//!
//! Provides connection management and the `investors.name` lookup backing
//! retrieval.

use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::{Client, Collection};
use tickerbot_core::{ContextStore, InvestorContext, Result, StoreConfig, TickerbotError};

/// MongoDB context store implementation
pub struct MongoContextStore {
    collection: Collection<Document>,
}

impl MongoContextStore {
    /// Connect using the configured URI and select the configured
    /// database and collection.
    ///
    /// Returns an error when `mongo_uri` is unset; callers that want the
    /// degraded no-context mode simply skip construction.
    pub async fn connect(config: &StoreConfig) -> Result<Self> {
        let uri = config.mongo_uri.as_deref().ok_or_else(|| {
            TickerbotError::ConfigError("MongoDB connection string required".to_string())
        })?;

        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| TickerbotError::DatabaseError(format!("MongoDB connection failed: {e}")))?;

        let collection = client
            .database(&config.database)
            .collection::<Document>(&config.collection);

        Ok(Self { collection })
    }
}

#[async_trait]
impl ContextStore for MongoContextStore {
    /// Case-insensitive substring/regex match of the query against
    /// `investors.name`. The query text is used as the pattern verbatim,
    /// unescaped; intended matching semantics (exact vs. fuzzy) are
    /// unspecified, so regex metacharacters in user input reach the server.
    async fn retrieve(&self, query: &str) -> Result<Vec<InvestorContext>> {
        let filter = doc! {
            "investors.name": { "$regex": query, "$options": "i" }
        };

        let mut cursor = self
            .collection
            .find(filter)
            .await
            .map_err(|e| TickerbotError::DatabaseError(format!("Find failed: {e}")))?;

        let mut contexts = Vec::new();
        while let Some(document) = cursor
            .try_next()
            .await
            .map_err(|e| TickerbotError::DatabaseError(format!("Cursor error: {e}")))?
        {
            contexts.push(investors_field(&document));
        }

        tracing::debug!(matches = contexts.len(), "Context retrieval completed");

        Ok(contexts)
    }

    fn name(&self) -> &str {
        "mongodb"
    }
}

/// Extract a document's `investors` field as JSON, or an empty object when
/// the field is absent.
fn investors_field(document: &Document) -> InvestorContext {
    match document.get("investors") {
        Some(bson) => InvestorContext::from(bson.clone().into_relaxed_extjson()),
        None => InvestorContext::empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_investors_field_extracted() {
        let document = doc! {
            "ticker": "ACME",
            "investors": { "name": "Acme Capital", "stake": 12.5 }
        };

        let context = investors_field(&document);
        assert_eq!(context.0, json!({"name": "Acme Capital", "stake": 12.5}));
    }

    #[test]
    fn test_investors_field_array_shape() {
        let document = doc! {
            "investors": [
                { "name": "Acme Capital" },
                { "name": "Beta Partners" }
            ]
        };

        let context = investors_field(&document);
        assert_eq!(
            context.0,
            json!([{"name": "Acme Capital"}, {"name": "Beta Partners"}])
        );
    }

    #[test]
    fn test_missing_investors_field_is_empty_object() {
        let document = doc! { "ticker": "ACME" };

        let context = investors_field(&document);
        assert_eq!(context.0, json!({}));
    }

    #[tokio::test]
    async fn test_connect_requires_uri() {
        let config = StoreConfig::default();
        let result = MongoContextStore::connect(&config).await;
        assert!(matches!(result, Err(TickerbotError::ConfigError(_))));
    }

    #[tokio::test]
    #[ignore = "requires a running MongoDB"]
    async fn test_retrieve_against_live_store() {
        let config = StoreConfig {
            mongo_uri: Some("mongodb://localhost:27017".to_string()),
            ..Default::default()
        };

        let store = MongoContextStore::connect(&config).await.unwrap();
        let contexts = store.retrieve("Acme").await.unwrap();

        for context in &contexts {
            assert!(context.0.is_object() || context.0.is_array());
        }
    }
}
