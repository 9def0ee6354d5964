// Interactive command handling for the analyzer prompt.

use crate::advisor::{self, ChatBackend};
use crate::analyzer::StatementAnalyzer;
use crate::loader::{CsvLoader, Loader};
use crate::render;
use crate::session::SessionState;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, PartialEq, Eq)]
pub enum Outcome {
    Continue,
    Quit,
}

/// Dispatches one line from the prompt. Slash-prefixed lines are commands;
/// anything else is a chat turn once a session exists. No path through here
/// terminates the process.
pub async fn handle_line(
    line: &str,
    state: &mut SessionState,
    loader: &CsvLoader,
    analyzer: &StatementAnalyzer,
    backend: Option<&dyn ChatBackend>,
) -> Outcome {
    let line = line.trim();
    if line.is_empty() {
        return Outcome::Continue;
    }

    match line.split_once(' ') {
        Some(("/load", path)) => handle_load(path, state, loader, analyzer),
        None if line == "/load" => {
            println!("Usage: /load <path-to-csv>");
        }
        _ => match line {
            "/table" => handle_table(state),
            "/ratios" => handle_ratios(state),
            "/analyze" => handle_analyze(state, backend).await,
            "/narrative" => handle_narrative(state),
            "/history" => handle_history(state),
            "/help" => handle_help(),
            "/quit" | "/exit" => return Outcome::Quit,
            _ if line.starts_with('/') => {
                println!("Unknown command. Type /help for the command list.");
            }
            _ => handle_chat_turn(line, state, backend).await,
        },
    }
    Outcome::Continue
}

/// Loads and analyzes a statement file. Fatal errors print one message and
/// leave the previous analysis alone; a new file identity resets the chat
/// state even when its analysis fails afterwards.
fn handle_load(
    raw_path: &str,
    state: &mut SessionState,
    loader: &CsvLoader,
    analyzer: &StatementAnalyzer,
) {
    let path = Path::new(raw_path.trim());
    info!("Loading statement from {}", path.display());

    let rows = match loader.load(path) {
        Ok(rows) => rows,
        Err(e) => {
            warn!("Load failed: {}", e);
            println!("❌ Could not read file: {}. Please check the format and re-upload.", e);
            return;
        }
    };

    state.track_upload(&path.display().to_string());

    match analyzer.analyze(&rows) {
        Ok(table) => {
            println!("\n{}", render::render_table(&table));
            println!("{}", render::render_metrics(&table.metrics));
            for warning in &table.warnings {
                println!("⚠️ {}", warning);
            }
            println!("Loaded {} line items. Run /analyze for the AI narrative.", table.rows.len());
            state.table = Some(table);
        }
        Err(e) => {
            warn!("Analysis failed: {}", e);
            state.table = None;
            println!("❌ Analysis failed: {}. Please check the statement and re-upload.", e);
        }
    }
}

fn handle_table(state: &SessionState) {
    match &state.table {
        Some(table) => println!("\n{}", render::render_table(table)),
        None => println!("No statement loaded. Use /load <path> first."),
    }
}

fn handle_ratios(state: &SessionState) {
    match &state.table {
        Some(table) => {
            println!("\n{}", render::render_metrics(&table.metrics));
            for warning in &table.warnings {
                println!("⚠️ {}", warning);
            }
        }
        None => println!("No statement loaded. Use /load <path> first."),
    }
}

/// Starts the AI session: sends the analyzed table as grounding context and
/// stores the returned narrative. Transport failures are reported and leave
/// the session unstarted.
async fn handle_analyze(state: &mut SessionState, backend: Option<&dyn ChatBackend>) {
    let Some(table) = state.table.as_ref() else {
        println!("No statement loaded. Use /load <path> first.");
        return;
    };
    let Some(backend) = backend else {
        println!("⚠️ AI analysis is disabled: GEMINI_API_KEY is not set.");
        return;
    };
    if state.chat_ready() {
        println!("AI session already running. Just type your question.");
        return;
    }

    let context = render::build_ai_context(table);
    info!("Starting Gemini session ({} chars of context)", context.len());
    match advisor::start(backend, &context).await {
        Ok((session, narrative)) => {
            state.chat = Some(session);
            state.narrative = Some(narrative.clone());
            state.push_assistant(narrative.clone());
            println!("🤖 {}\n", narrative);
            println!("Ask follow-up questions about the statement, or /quit to exit.");
        }
        Err(e) => {
            warn!("Failed to start Gemini session: {}", e);
            println!("❌ {}", e);
        }
    }
}

/// One question-and-answer turn. The user message always lands in the
/// transcript; a transport failure becomes the assistant's turn instead of
/// an abort, so the conversation can continue.
async fn handle_chat_turn(line: &str, state: &mut SessionState, backend: Option<&dyn ChatBackend>) {
    let Some(backend) = backend else {
        println!("⚠️ AI chat is disabled: GEMINI_API_KEY is not set.");
        return;
    };
    let Some(mut session) = state.chat.take() else {
        println!("Load a statement and run /analyze to start the AI chat.");
        return;
    };

    state.push_user(line);
    match advisor::send(backend, &mut session, line).await {
        Ok(reply) => {
            state.push_assistant(reply.clone());
            println!("🤖 {}", reply);
        }
        Err(e) => {
            warn!("Chat turn failed: {}", e);
            let message = format!("Error during the conversation: {}. Please try again.", e);
            state.push_assistant(message.clone());
            println!("❌ {}", message);
        }
    }
    state.chat = Some(session);
}

fn handle_narrative(state: &SessionState) {
    match &state.narrative {
        Some(narrative) => println!("🤖 {}", narrative),
        None => println!("No narrative yet. Run /analyze first."),
    }
}

fn handle_history(state: &SessionState) {
    if state.transcript.is_empty() {
        println!("Transcript is empty.");
        return;
    }
    for message in &state.transcript {
        println!("[{}] {}", message.role, message.content);
    }
}

fn handle_help() {
    println!(
        "📋 Available commands:\n\
         /load <path> — load and analyze a statement CSV (label, prior year, current year)\n\
         /table — show the analyzed table again\n\
         /ratios — show the current-ratio summary\n\
         /analyze — ask the AI for a narrative and open the chat\n\
         /narrative — show the AI narrative again\n\
         /history — show the chat transcript\n\
         /help — this list\n\
         /quit — exit\n\
         Anything else is sent to the AI as a question once a session is open."
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advisor::{ChatSession, ChatTurn};
    use crate::model::ChatError;
    use crate::session::Role;
    use async_trait::async_trait;
    use std::io::Write;

    struct EchoBackend;

    #[async_trait]
    impl ChatBackend for EchoBackend {
        async fn generate(
            &self,
            _context: &str,
            history: &[ChatTurn],
        ) -> Result<String, ChatError> {
            Ok(format!("echo: {}", history.last().unwrap().text))
        }
    }

    struct FailingBackend;

    #[async_trait]
    impl ChatBackend for FailingBackend {
        async fn generate(
            &self,
            _context: &str,
            _history: &[ChatTurn],
        ) -> Result<String, ChatError> {
            Err(ChatError::Transport("connection reset".to_string()))
        }
    }

    fn write_statement(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    const GOOD_STATEMENT: &str = "Item,Prior,Current\n\
        Total current assets,500,600\n\
        TOTAL ASSETS,1000,2000\n\
        Total current liabilities,250,300\n";

    async fn load(state: &mut SessionState, path: &std::path::Path) {
        let line = format!("/load {}", path.display());
        handle_line(&line, state, &CsvLoader::new(), &StatementAnalyzer::new(), None).await;
    }

    #[tokio::test]
    async fn load_produces_an_analysis() {
        let file = write_statement(GOOD_STATEMENT);
        let mut state = SessionState::new();
        load(&mut state, file.path()).await;
        let table = state.table.as_ref().unwrap();
        assert_eq!(table.rows.len(), 3);
        assert_eq!(table.metrics.current_ratio_prior, Some(2.0));
    }

    #[tokio::test]
    async fn load_without_total_assets_leaves_no_table() {
        let file = write_statement("Item,Prior,Current\nCash,1,2\n");
        let mut state = SessionState::new();
        load(&mut state, file.path()).await;
        assert!(state.table.is_none());
    }

    #[tokio::test]
    async fn loading_a_different_file_resets_the_transcript() {
        let first = write_statement(GOOD_STATEMENT);
        let second = write_statement(GOOD_STATEMENT);
        let mut state = SessionState::new();

        load(&mut state, first.path()).await;
        state.chat = Some(ChatSession::default());
        state.push_assistant("narrative");
        state.narrative = Some("narrative".to_string());

        load(&mut state, second.path()).await;
        assert!(state.transcript.is_empty());
        assert!(state.chat.is_none());
        assert!(state.narrative.is_none());

        // Reloading the same file keeps whatever is there.
        state.push_assistant("kept");
        load(&mut state, second.path()).await;
        assert_eq!(state.transcript.len(), 1);
    }

    #[tokio::test]
    async fn transcript_reset_happens_even_when_the_new_file_fails_analysis() {
        let first = write_statement(GOOD_STATEMENT);
        let broken = write_statement("Item,Prior,Current\nCash,1,2\n");
        let mut state = SessionState::new();

        load(&mut state, first.path()).await;
        state.push_assistant("narrative");

        load(&mut state, broken.path()).await;
        assert!(state.transcript.is_empty());
        assert!(state.table.is_none());
    }

    #[tokio::test]
    async fn unreadable_file_leaves_previous_state_intact() {
        let file = write_statement(GOOD_STATEMENT);
        let mut state = SessionState::new();
        load(&mut state, file.path()).await;
        state.push_assistant("narrative");

        load(&mut state, std::path::Path::new("/nonexistent/next.csv")).await;
        assert!(state.table.is_some());
        assert_eq!(state.transcript.len(), 1);
    }

    #[tokio::test]
    async fn analyze_opens_a_session_and_records_the_narrative() {
        let file = write_statement(GOOD_STATEMENT);
        let mut state = SessionState::new();
        load(&mut state, file.path()).await;

        handle_line(
            "/analyze",
            &mut state,
            &CsvLoader::new(),
            &StatementAnalyzer::new(),
            Some(&EchoBackend as &dyn ChatBackend),
        )
        .await;
        assert!(state.chat_ready());
        assert!(state.narrative.is_some());
        assert_eq!(state.transcript.len(), 1);
        assert_eq!(state.transcript[0].role, Role::Assistant);
    }

    #[tokio::test]
    async fn chat_turn_appends_user_and_assistant_messages() {
        let mut state = SessionState::new();
        state.chat = Some(ChatSession::default());

        handle_line(
            "how is liquidity?",
            &mut state,
            &CsvLoader::new(),
            &StatementAnalyzer::new(),
            Some(&EchoBackend as &dyn ChatBackend),
        )
        .await;
        assert_eq!(state.transcript.len(), 2);
        assert_eq!(state.transcript[0].role, Role::User);
        assert_eq!(state.transcript[0].content, "how is liquidity?");
        assert_eq!(state.transcript[1].content, "echo: how is liquidity?");
    }

    #[tokio::test]
    async fn transport_failure_grows_the_transcript_by_exactly_two() {
        let mut state = SessionState::new();
        state.chat = Some(ChatSession::default());

        handle_line(
            "how is liquidity?",
            &mut state,
            &CsvLoader::new(),
            &StatementAnalyzer::new(),
            Some(&FailingBackend as &dyn ChatBackend),
        )
        .await;
        assert_eq!(state.transcript.len(), 2);
        assert_eq!(state.transcript[0].role, Role::User);
        assert_eq!(state.transcript[0].content, "how is liquidity?");
        assert_eq!(state.transcript[1].role, Role::Assistant);
        assert!(state.transcript[1].content.contains("connection reset"));
        // The session handle survives for the next turn.
        assert!(state.chat_ready());
    }

    #[tokio::test]
    async fn chat_before_analyze_does_not_touch_the_transcript() {
        let mut state = SessionState::new();
        handle_line(
            "hello?",
            &mut state,
            &CsvLoader::new(),
            &StatementAnalyzer::new(),
            Some(&EchoBackend as &dyn ChatBackend),
        )
        .await;
        assert!(state.transcript.is_empty());
    }

    #[tokio::test]
    async fn quit_ends_the_session() {
        let mut state = SessionState::new();
        let outcome = handle_line(
            "/quit",
            &mut state,
            &CsvLoader::new(),
            &StatementAnalyzer::new(),
            None,
        )
        .await;
        assert_eq!(outcome, Outcome::Quit);
    }
}
