mod advisor;
mod analyzer;
mod commands;
mod config;
mod loader;
mod model;
mod normalizer;
mod render;
mod session;

use advisor::{ChatBackend, GeminiAdvisor};
use analyzer::StatementAnalyzer;
use commands::Outcome;
use config::{AppConfig, load_config};
use loader::CsvLoader;
use session::SessionState;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = match load_config("config.json") {
        Ok(cfg) => cfg,
        Err(e) => {
            info!("No usable config.json ({}), falling back to defaults", e);
            AppConfig::default()
        }
    };

    // A missing credential only disables the AI features; tables and ratios
    // keep working.
    let advisor = match config::load_api_key() {
        Ok(key) => Some(GeminiAdvisor::new(key, &config)),
        Err(e) => {
            warn!("AI features disabled: {}", e);
            println!(
                "⚠️ {}. Tables and ratios still work; /analyze and chat are disabled.",
                e
            );
            None
        }
    };
    let backend = advisor.as_ref().map(|a| a as &dyn ChatBackend);

    let loader = CsvLoader::new();
    let analyzer = StatementAnalyzer::new();
    let mut state = SessionState::new();

    println!("📊 finlens — financial statement analysis");
    println!("Type /help for the command list.");

    // A path given on the command line is loaded before the prompt starts.
    if let Some(path) = std::env::args().nth(1) {
        let line = format!("/load {}", path);
        commands::handle_line(&line, &mut state, &loader, &analyzer, backend).await;
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        if std::io::stdout().flush().is_err() {
            break;
        }
        match lines.next_line().await {
            Ok(Some(line)) => {
                let outcome =
                    commands::handle_line(&line, &mut state, &loader, &analyzer, backend).await;
                if outcome == Outcome::Quit {
                    break;
                }
            }
            Ok(None) => break,
            Err(e) => {
                error!("Failed to read input: {}", e);
                break;
            }
        }
    }
    info!("Session ended.");
}
