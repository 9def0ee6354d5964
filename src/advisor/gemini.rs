// Gemini generateContent wire format.

use crate::advisor::{ChatTurn, GeminiAdvisor};
use crate::model::ChatError;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Serialize)]
struct GenerateRequest<'a> {
    system_instruction: ContentOut<'a>,
    contents: Vec<ContentOut<'a>>,
}

#[derive(Serialize)]
struct ContentOut<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<PartOut<'a>>,
}

#[derive(Serialize)]
struct PartOut<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ContentIn>,
}

#[derive(Debug, Deserialize)]
struct ContentIn {
    parts: Option<Vec<PartIn>>,
}

#[derive(Debug, Deserialize)]
struct PartIn {
    text: Option<String>,
}

/// Runs one generateContent call: the grounding context rides in the system
/// instruction, the full turn history in `contents`.
pub(super) async fn send_generate(
    advisor: &GeminiAdvisor,
    context: &str,
    history: &[ChatTurn],
) -> Result<String, ChatError> {
    let url = format!(
        "{}/v1beta/models/{}:generateContent",
        advisor.api_base, advisor.model
    );
    let request = GenerateRequest {
        system_instruction: ContentOut {
            role: None,
            parts: vec![PartOut { text: context }],
        },
        contents: history
            .iter()
            .map(|turn| ContentOut {
                role: Some(turn.role),
                parts: vec![PartOut { text: &turn.text }],
            })
            .collect(),
    };

    let response = advisor
        .client
        .post(&url)
        .header("x-goog-api-key", &advisor.api_key)
        .json(&request)
        .send()
        .await
        .map_err(|e| ChatError::Transport(e.to_string()))?;

    let status = response.status();
    if matches!(
        status,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    ) {
        let body = response.text().await.unwrap_or_else(|_| "unknown".into());
        warn!("Gemini API rejected request [{}]: {}", status, body);
        return Err(ChatError::QuotaOrAuth(format!("{}: {}", status, body)));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_else(|_| "unknown".into());
        warn!("Gemini API error [{}]: {}", status, body);
        return Err(ChatError::Transport(format!("{}: {}", status, body)));
    }

    let payload: GenerateResponse = response
        .json()
        .await
        .map_err(|e| ChatError::Transport(e.to_string()))?;
    let text = payload
        .candidates
        .into_iter()
        .flatten()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts)
        .map(|parts| {
            parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .filter(|text| !text.is_empty())
        .ok_or(ChatError::InvalidResponse)?;

    info!("Gemini reply received ({} chars)", text.len());
    Ok(text)
}
