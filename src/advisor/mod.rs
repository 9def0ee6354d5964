// Gemini chat bridge: start a session grounded in the analyzed statement,
// then run question-and-answer turns against it.

pub mod gemini;

use crate::config::AppConfig;
use crate::model::ChatError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// First user turn sent when a session starts, to obtain the initial
/// narrative.
pub const INITIAL_ANALYSIS_PROMPT: &str =
    "Based on the financial data provided, give an objective, concise assessment \
     (around 3-4 paragraphs) of the company's financial position. Focus on growth, \
     changes in asset composition and short-term liquidity.";

/// One wire-side turn; roles follow the Gemini API ("user" / "model").
#[derive(Debug, Clone, PartialEq)]
pub struct ChatTurn {
    pub role: &'static str,
    pub text: String,
}

/// An open conversation: the grounding context plus every turn so far. The
/// REST API is stateless, so each request replays the full history. A dropped
/// handle is recreated by calling `start` again with the stored context.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    pub context: String,
    pub history: Vec<ChatTurn>,
}

/// Transport seam: one completion over the grounding context and the turn
/// history.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn generate(&self, context: &str, history: &[ChatTurn]) -> Result<String, ChatError>;
}

pub struct GeminiAdvisor {
    pub(crate) client: Client,
    pub(crate) api_key: String,
    pub(crate) model: String,
    pub(crate) api_base: String,
}

impl GeminiAdvisor {
    pub fn new(api_key: String, config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .expect("failed to create HTTP client");
        Self {
            client,
            api_key,
            model: config.gemini_model.clone(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ChatBackend for GeminiAdvisor {
    async fn generate(&self, context: &str, history: &[ChatTurn]) -> Result<String, ChatError> {
        gemini::send_generate(self, context, history).await
    }
}

/// Starts a session grounded in `context` and asks for the initial narrative.
pub async fn start<B: ChatBackend + ?Sized>(
    backend: &B,
    context: &str,
) -> Result<(ChatSession, String), ChatError> {
    let mut session = ChatSession {
        context: context.to_string(),
        history: Vec::new(),
    };
    let reply = send(backend, &mut session, INITIAL_ANALYSIS_PROMPT).await?;
    Ok((session, reply))
}

/// Sends one user message on an open session. On success both turns are
/// appended to the session history; on failure the pending user turn is
/// rolled back so a retry does not replay it twice.
pub async fn send<B: ChatBackend + ?Sized>(
    backend: &B,
    session: &mut ChatSession,
    message: &str,
) -> Result<String, ChatError> {
    session.history.push(ChatTurn {
        role: "user",
        text: message.to_string(),
    });
    match backend.generate(&session.context, &session.history).await {
        Ok(reply) => {
            session.history.push(ChatTurn {
                role: "model",
                text: reply.clone(),
            });
            Ok(reply)
        }
        Err(e) => {
            session.history.pop();
            Err(e)
        }
    }
}
