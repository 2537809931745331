use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::Path;
use icf_chat_core::{AskClient, AskRequest, Config, ConversationHistory, ERROR_TEXT};

mod app;
mod handler;
mod logging;
mod tui;
mod ui;

use app::App;
use tui::EventHandler;

#[derive(Parser)]
#[command(name = "icf-chat")]
#[command(version, about = "Chat with the Islamic Center of Frisco assistant from your terminal")]
struct Cli {
    /// Base URL of the chat server (overrides config and ICF_CHAT_ENDPOINT)
    #[arg(long, global = true)]
    endpoint: Option<String>,

    /// Start with the large chat panel
    #[arg(long)]
    large: bool,

    /// Start with the chat panel already open
    #[arg(long)]
    open: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a single question with no prior history and print the answer
    Ask {
        /// Your question
        question: String,
    },
    /// Check that the chat server is up
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logging comes up first so a broken config file can be reported
    let log_path = if cli.command.is_none() {
        logging::init_file()?
    } else {
        logging::init_stderr();
        logging::log_file_path()
    };

    let (mut config, problem) = Config::load_or_default();
    if let Some(err) = problem {
        tracing::warn!("using default config: {:#}", err);
    }
    if let Some(endpoint) = cli.endpoint {
        config.endpoint = endpoint;
    }
    if cli.large {
        config.start_large = true;
    }
    if cli.open {
        config.start_expanded = true;
    }

    match cli.command {
        None => run_chat(&config, &log_path).await,
        Some(Commands::Ask { question }) => ask_once(&config, &question).await,
        Some(Commands::Health) => check_health(&config).await,
    }
}

async fn run_chat(config: &Config, log_path: &Path) -> Result<()> {
    tracing::info!(
        endpoint = %config.endpoint,
        log = %log_path.display(),
        large = config.start_large,
        "starting chat"
    );

    let mut app = App::new(config)?;

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();

    let result = async {
        while !app.should_quit {
            terminal.draw(|frame| ui::render(&mut app, frame))?;

            match events.next().await {
                Some(event) => handler::handle_event(&mut app, event),
                None => break,
            }

            app.poll_pending().await;
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    tui::restore()?;
    tracing::info!("chat closed");
    result
}

async fn ask_once(config: &Config, question: &str) -> Result<()> {
    let question = question.trim();
    if question.is_empty() {
        return Err(anyhow!("question is empty"));
    }

    let client = AskClient::with_timeout(&config.endpoint, config.request_timeout())?;
    let request = AskRequest {
        question: question.to_string(),
        history: ConversationHistory::new(),
    };

    match client.ask(&request).await {
        Ok(reply) => {
            println!("{}", reply.answer);
            if let Some(chunks) = reply.context_chunks_found.filter(|n| *n > 0) {
                println!("({} relevant sources found)", chunks);
            }
            Ok(())
        }
        Err(err) => {
            println!("{}", ERROR_TEXT);
            Err(anyhow!(err).context(format!("asking {} failed", client.base_url())))
        }
    }
}

async fn check_health(config: &Config) -> Result<()> {
    let client = AskClient::with_timeout(&config.endpoint, config.request_timeout())?;

    match client.health().await {
        Ok(()) => {
            println!("Connected to chat server at {}", client.base_url());
            Ok(())
        }
        Err(err) => {
            println!("Cannot reach chat server at {}", client.base_url());
            println!("Make sure the server is running and listening for /ask");
            Err(err.into())
        }
    }
}
