mod api;
mod chat;
mod render;

use std::io::IsTerminal;

use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use api::{ApiError, DiagnoseApi, GatewayClient};
use chat::{ChatSession, SubmitRejected};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("gateway request failed: {0}")]
    Api(#[from] ApiError),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "medichain-cli", about = "MediChain AI diagnostic chat client")]
struct Cli {
    #[arg(long, env = "MEDICHAIN_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive chat session (default).
    Chat,
    /// Send one message and print the reply.
    Ask { message: String },
    /// Print the gateway health payload.
    Health,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let client = GatewayClient::new(&cli.base_url)?;

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => run_chat(&client).await,
        Command::Ask { message } => run_ask(&client, &message).await,
        Command::Health => run_health(&client).await,
    }
}

async fn run_health(client: &GatewayClient) -> Result<(), CliError> {
    let body = client.health().await?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    Ok(())
}

async fn run_ask(client: &dyn DiagnoseApi, message: &str) -> Result<(), CliError> {
    let mut session = ChatSession::new();
    match session.submit(client, message).await {
        Ok(reply) => println!("{}", render::render_content(&reply.content, std::io::stdout().is_terminal())),
        Err(rejected) => eprintln!("nothing sent: {rejected}"),
    }
    Ok(())
}

async fn run_chat(client: &dyn DiagnoseApi) -> Result<(), CliError> {
    let ansi = std::io::stdout().is_terminal();
    let mut session = ChatSession::new();
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    for message in session.messages() {
        stdout.write_all(render::render_message(message, ansi).as_bytes()).await?;
    }

    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else { break };
        if matches!(line.trim(), "/quit" | "/exit") {
            break;
        }

        // Input is only read between requests, so nothing queues behind one.
        let text = match session.begin(&line) {
            Ok(text) => text,
            // Busy cannot happen here: the loop awaits each reply before reading on.
            Err(SubmitRejected::Empty | SubmitRejected::Busy) => continue,
        };
        stdout.write_all(b"analyzing symptoms...\n").await?;
        stdout.flush().await?;

        let reply = session.complete(client.diagnose(&text).await);
        stdout.write_all(render::render_message(reply, ansi).as_bytes()).await?;
    }

    stdout.flush().await?;
    Ok(())
}
