use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod client;
mod config;
mod controller;
mod format;
mod history;
mod presenter;

use client::ChatClient;
use config::Config;
use controller::ChatController;
use presenter::{Presenter as _, TerminalPresenter};

#[derive(Parser)]
#[command(name = "parley")]
#[command(version)]
#[command(about = "Terminal chat client for a remote agent endpoint", long_about = None)]
struct Cli {
    /// Chat endpoint URL (overrides the config file)
    #[arg(long)]
    endpoint: Option<String>,

    /// Request timeout in seconds (overrides the config file)
    #[arg(long)]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(endpoint) = cli.endpoint {
        config.endpoint_url = endpoint;
    }
    if let Some(timeout) = cli.timeout {
        config.request_timeout_secs = timeout;
    }

    println!("💬 parley - chatting with {}", config.endpoint_url);
    println!("Type a message and press Enter. /quit to leave.\n");

    let client = ChatClient::new(config.clone());
    let presenter = TerminalPresenter::new();
    let mut controller = ChatController::new(client, presenter, &config);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    controller.presenter_mut().enable_input();
    while let Some(line) = lines.next_line().await? {
        if line.trim() == "/quit" {
            break;
        }

        let outcome = controller.submit_turn(&line).await;

        // An ignored turn never reaches the controller's enable call, so the
        // prompt has to come back here.
        if outcome == controller::TurnOutcome::Ignored {
            controller.presenter_mut().enable_input();
        }
    }

    println!("\n👋 Bye! ({} messages this session)", controller.history().len());
    Ok(())
}
