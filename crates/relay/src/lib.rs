mod llm;

pub use llm::{HttpLlmClient, HttpLlmClientConfig};

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use state_plane::{
    ContextMessage, MetricsAggregator, SessionContextStore, SlidingWindowRateLimiter,
    StoredMessage,
};
use thiserror::Error;
use tracing::{debug, info};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("rate limit exceeded")]
    RateLimited,
    #[error("upstream error: {0}")]
    Upstream(String),
}

/// External completion service: accepts a prompt, returns text or fails.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, RelayError>;
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Endpoint {
    Upload,
    Quiz,
    StudyGuide,
    Graph,
    Chat,
}

impl Endpoint {
    pub fn label(self) -> &'static str {
        match self {
            Endpoint::Upload => "upload",
            Endpoint::Quiz => "quiz",
            Endpoint::StudyGuide => "study_guide",
            Endpoint::Graph => "graph",
            Endpoint::Chat => "chat",
        }
    }
}

#[derive(Clone, Debug)]
pub struct ChatRequest {
    pub client_id: String,
    pub session_id: Option<String>,
    pub message: String,
}

#[derive(Clone, Debug)]
pub struct ChatReply {
    pub session_id: String,
    pub reply: String,
    pub context_length: usize,
}

/// Sequencing every externally-visible operation passes through: rate-limit
/// check, context fetch, completion, context append, latency record.
pub struct RequestPipeline {
    contexts: Arc<SessionContextStore>,
    rate_limiter: Arc<SlidingWindowRateLimiter>,
    metrics: Arc<MetricsAggregator>,
    llm: Arc<dyn LlmClient>,
}

impl RequestPipeline {
    pub fn new(
        contexts: Arc<SessionContextStore>,
        rate_limiter: Arc<SlidingWindowRateLimiter>,
        metrics: Arc<MetricsAggregator>,
        llm: Arc<dyn LlmClient>,
    ) -> Self {
        Self {
            contexts,
            rate_limiter,
            metrics,
            llm,
        }
    }

    /// Conversational operation. A denied request short-circuits before any
    /// other work and records no metrics; a failed completion persists
    /// nothing. Only the assistant reply is appended to the session.
    pub async fn chat(&self, request: ChatRequest) -> Result<ChatReply, RelayError> {
        if !self.rate_limiter.allow(&request.client_id) {
            debug!(client_id = %request.client_id, "rate limit exceeded");
            return Err(RelayError::RateLimited);
        }

        let start = Instant::now();
        let session_id = request
            .session_id
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        self.metrics.track_session(&session_id);

        let context = self.contexts.get(&session_id);
        let prompt = chat_prompt(&context, &request.message);
        let reply = self.llm.generate(&prompt).await?;

        self.contexts.append(
            &session_id,
            ContextMessage {
                role: "assistant".to_string(),
                content: reply.clone(),
            },
        );
        self.metrics.record(Endpoint::Chat.label(), elapsed_ms(start));
        info!(
            session_id = %session_id,
            context_length = context.len(),
            "chat completed"
        );

        Ok(ChatReply {
            session_id,
            reply,
            context_length: context.len(),
        })
    }

    /// One-shot completion for the stateless endpoints; measured, not rate
    /// limited.
    pub async fn complete(&self, endpoint: Endpoint, input: &str) -> Result<String, RelayError> {
        let start = Instant::now();
        let output = self.llm.generate(input).await?;
        self.metrics.record(endpoint.label(), elapsed_ms(start));
        Ok(output)
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

// Prior turns joined ahead of the question. Prompt templating belongs to the
// route layer; this carries only the transcript the session store holds.
fn chat_prompt(context: &[StoredMessage], message: &str) -> String {
    let mut prompt = String::new();
    for stored in context {
        prompt.push_str(&stored.message.role);
        prompt.push_str(": ");
        prompt.push_str(&stored.message.content);
        prompt.push('\n');
    }
    prompt.push_str("user: ");
    prompt.push_str(message);
    prompt
}
