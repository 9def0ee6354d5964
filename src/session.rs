// Per-session interactive state: active statement, transcript, chat handle.
use crate::advisor::ChatSession;
use crate::model::AnalyzedTable;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Everything one interactive session owns. Passed explicitly to every
/// command handler; there are no ambient globals.
#[derive(Default)]
pub struct SessionState {
    pub source_id: Option<String>,
    pub table: Option<AnalyzedTable>,
    pub transcript: Vec<ChatMessage>,
    pub chat: Option<ChatSession>,
    pub narrative: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracks a newly loaded file. A different identity drops the chat
    /// session, transcript and narrative belonging to the previous file;
    /// reloading the same file keeps them.
    pub fn track_upload(&mut self, source_id: &str) {
        if self.source_id.as_deref() != Some(source_id) {
            self.transcript.clear();
            self.chat = None;
            self.narrative = None;
            self.source_id = Some(source_id.to_string());
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.transcript.push(ChatMessage {
            role: Role::User,
            content: content.into(),
        });
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.transcript.push(ChatMessage {
            role: Role::Assistant,
            content: content.into(),
        });
    }

    pub fn chat_ready(&self) -> bool {
        self.chat.is_some()
    }
}
