//! Tickerbot Chat - Ask Pipeline
//!
//! This crate implements the query-and-augment request flow:
//! fetch investor context for the question, build a prompt embedding
//! both, call the chat-completion model, and return its answer.

use std::sync::Arc;
use std::time::Instant;
use tickerbot_core::{ChatAnswer, ContextBatch, ContextStore, LlmClient, Result, TickerbotError};

pub mod llm;

pub use llm::OpenAiClient;

/// System instruction describing the assistant's role.
pub const SYSTEM_INSTRUCTION: &str =
    "You are a helpful assistant that provides insights based on user input and database content.";

/// Fixed farewell returned for the exit sentinel.
pub const FAREWELL: &str = "Goodbye!";

/// Whether the input is the case-insensitive exit sentinel.
pub fn is_exit(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("exit")
}

// ============================================================================
// Ask Pipeline
// ============================================================================

/// Two-step pipeline: context retrieval followed by answer generation.
pub struct ChatPipeline {
    /// Context store; `None` degrades retrieval to no context.
    store: Option<Arc<dyn ContextStore>>,

    /// LLM client
    llm: Arc<dyn LlmClient>,
}

impl ChatPipeline {
    /// Create a new pipeline.
    pub fn new(store: Option<Arc<dyn ContextStore>>, llm: Arc<dyn LlmClient>) -> Self {
        Self { store, llm }
    }

    /// Whether a context store is configured.
    pub fn has_store(&self) -> bool {
        self.store.is_some()
    }

    /// Execute one ask: retrieve context, build the prompt, generate.
    ///
    /// Retrieval always runs before generation. Store and model failures
    /// propagate to the caller untouched.
    pub async fn ask(&self, user_input: &str) -> Result<ChatAnswer> {
        if user_input.trim().is_empty() {
            return Err(TickerbotError::ValidationError(
                "User input is required".to_string(),
            ));
        }

        let start = Instant::now();
        tracing::info!("Ask pipeline started");

        let context = self.retrieve_context(user_input).await?;
        tracing::debug!(
            records = context.len(),
            available = context.is_available(),
            "Context retrieved"
        );

        let prompt = PromptBuilder::new()
            .question(user_input)
            .context(&context)
            .build();

        tracing::info!(prompt_chars = prompt.len(), "Calling LLM");
        let answer = self.llm.generate(SYSTEM_INSTRUCTION, &prompt).await?;
        tracing::info!(answer_chars = answer.len(), "LLM response received");

        Ok(ChatAnswer {
            answer,
            context_records: context.len(),
            context_available: context.is_available(),
            processing_time_ms: start.elapsed().as_millis() as u64,
        })
    }

    async fn retrieve_context(&self, query: &str) -> Result<ContextBatch> {
        match &self.store {
            Some(store) => {
                tracing::debug!(store = store.name(), "Querying context store");
                let records = store.retrieve(query).await?;
                Ok(ContextBatch::Retrieved(records))
            }
            None => Ok(ContextBatch::Unavailable),
        }
    }
}

// ============================================================================
// Prompt Builder
// ============================================================================

/// Builder for the single user prompt sent to the model.
///
/// Interpolates the question and a JSON rendering of the context batch
/// into a fixed natural-language template. No size limit is applied
/// against the model's context window.
pub struct PromptBuilder {
    question: String,
    context_json: String,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self {
            question: String::new(),
            context_json: "[]".to_string(),
        }
    }

    /// Set the user's question.
    pub fn question(mut self, question: impl Into<String>) -> Self {
        self.question = question.into();
        self
    }

    /// Set the retrieved context. Unavailable context renders as an
    /// empty array.
    pub fn context(mut self, context: &ContextBatch) -> Self {
        self.context_json = context.to_json().to_string();
        self
    }

    /// Build the final prompt.
    pub fn build(self) -> String {
        format!(
            "The user asked: {}. Here is the relevant data from the database: {}. \
             Provide an informative response.",
            self.question, self.context_json
        )
    }
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;
    use tickerbot_core::InvestorContext;

    /// Records collaborator invocations in order.
    #[derive(Default)]
    struct CallLog(Mutex<Vec<&'static str>>);

    impl CallLog {
        fn push(&self, call: &'static str) {
            self.0.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<&'static str> {
            self.0.lock().unwrap().clone()
        }
    }

    struct FakeStore {
        records: Vec<InvestorContext>,
        log: Arc<CallLog>,
    }

    #[async_trait::async_trait]
    impl ContextStore for FakeStore {
        async fn retrieve(&self, _query: &str) -> Result<Vec<InvestorContext>> {
            self.log.push("retrieve");
            Ok(self.records.clone())
        }

        fn name(&self) -> &str {
            "fake"
        }
    }

    struct FakeLlm {
        log: Arc<CallLog>,
        prompts: Mutex<Vec<String>>,
        reply: Result<String>,
    }

    impl FakeLlm {
        fn replying(log: Arc<CallLog>, reply: &str) -> Self {
            Self {
                log,
                prompts: Mutex::new(Vec::new()),
                reply: Ok(reply.to_string()),
            }
        }

        fn failing(log: Arc<CallLog>, message: &str) -> Self {
            Self {
                log,
                prompts: Mutex::new(Vec::new()),
                reply: Err(TickerbotError::LlmError(message.to_string())),
            }
        }
    }

    #[async_trait::async_trait]
    impl LlmClient for FakeLlm {
        async fn generate(&self, _system: &str, user: &str) -> Result<String> {
            self.log.push("generate");
            self.prompts.lock().unwrap().push(user.to_string());
            match &self.reply {
                Ok(answer) => Ok(answer.clone()),
                Err(TickerbotError::LlmError(msg)) => Err(TickerbotError::LlmError(msg.clone())),
                Err(_) => unreachable!(),
            }
        }
    }

    fn pipeline_with(
        records: Option<Vec<InvestorContext>>,
        llm: FakeLlm,
        log: Arc<CallLog>,
    ) -> ChatPipeline {
        let store: Option<Arc<dyn ContextStore>> =
            records.map(|records| Arc::new(FakeStore { records, log }) as Arc<dyn ContextStore>);
        ChatPipeline::new(store, Arc::new(llm))
    }

    #[tokio::test]
    async fn test_retrieval_runs_before_generation() {
        let log = Arc::new(CallLog::default());
        let llm = FakeLlm::replying(log.clone(), "answer");
        let pipeline = pipeline_with(Some(vec![]), llm, log.clone());

        pipeline.ask("Tell me about Acme").await.unwrap();

        assert_eq!(log.calls(), vec!["retrieve", "generate"]);
    }

    #[tokio::test]
    async fn test_context_count_and_order_preserved() {
        let log = Arc::new(CallLog::default());
        let llm = FakeLlm::replying(log.clone(), "answer");
        let records = vec![
            InvestorContext::from(json!({"name": "Acme Capital"})),
            InvestorContext::from(json!({"name": "Beta Partners"})),
            InvestorContext::empty(),
        ];
        let pipeline = pipeline_with(Some(records), llm, log.clone());

        let answer = pipeline.ask("Acme").await.unwrap();

        assert_eq!(answer.context_records, 3);
        assert!(answer.context_available);
    }

    #[tokio::test]
    async fn test_context_is_interpolated_into_prompt() {
        let log = Arc::new(CallLog::default());
        let llm = FakeLlm::replying(log.clone(), "answer");
        let prompts = {
            let records = vec![InvestorContext::from(json!({"name": "Acme Capital"}))];
            let store: Arc<dyn ContextStore> = Arc::new(FakeStore {
                records,
                log: log.clone(),
            });
            let llm = Arc::new(llm);
            let pipeline = ChatPipeline::new(Some(store), llm.clone());
            pipeline.ask("Tell me about Acme").await.unwrap();
            let captured = llm.prompts.lock().unwrap().clone();
            captured
        };

        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].starts_with("The user asked: Tell me about Acme."));
        assert!(prompts[0].contains(r#"[{"name":"Acme Capital"}]"#));
        assert!(prompts[0].ends_with("Provide an informative response."));
    }

    #[tokio::test]
    async fn test_unconfigured_store_degrades_to_empty_context() {
        let log = Arc::new(CallLog::default());
        let llm = FakeLlm::replying(log.clone(), "answer");
        let pipeline = pipeline_with(None, llm, log.clone());

        let answer = pipeline.ask("Acme").await.unwrap();

        assert_eq!(answer.context_records, 0);
        assert!(!answer.context_available);
        // Only the model was invoked.
        assert_eq!(log.calls(), vec!["generate"]);
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected_before_collaborators() {
        let log = Arc::new(CallLog::default());
        let llm = FakeLlm::replying(log.clone(), "answer");
        let pipeline = pipeline_with(Some(vec![]), llm, log.clone());

        let result = pipeline.ask("   ").await;

        assert!(matches!(result, Err(TickerbotError::ValidationError(_))));
        assert!(log.calls().is_empty());
    }

    #[tokio::test]
    async fn test_llm_failure_propagates() {
        let log = Arc::new(CallLog::default());
        let llm = FakeLlm::failing(log.clone(), "quota exceeded");
        let pipeline = pipeline_with(Some(vec![]), llm, log.clone());

        let result = pipeline.ask("Acme").await;

        assert!(matches!(result, Err(TickerbotError::LlmError(_))));
    }

    #[test]
    fn test_exit_sentinel_matching() {
        assert!(is_exit("exit"));
        assert!(is_exit("EXIT"));
        assert!(is_exit("Exit"));
        assert!(is_exit("  exit  "));
        assert!(!is_exit("exit now"));
        assert!(!is_exit("quit"));
    }

    #[test]
    fn test_prompt_builder_template() {
        let batch = ContextBatch::Retrieved(vec![InvestorContext::from(json!({"name": "Acme"}))]);
        let prompt = PromptBuilder::new()
            .question("Who holds Acme?")
            .context(&batch)
            .build();

        assert_eq!(
            prompt,
            "The user asked: Who holds Acme?. Here is the relevant data from the database: \
             [{\"name\":\"Acme\"}]. Provide an informative response."
        );
    }

    #[test]
    fn test_prompt_builder_unavailable_context() {
        let prompt = PromptBuilder::new()
            .question("Who holds Acme?")
            .context(&ContextBatch::Unavailable)
            .build();

        assert!(prompt.contains("database: []."));
    }
}
