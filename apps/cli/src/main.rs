use std::{
    io::{self, Write as _},
    path::PathBuf,
    sync::Arc,
};

use anyhow::Result;
use clap::Parser;
use client_core::{
    load_settings, render_transcript, render_turn, AssistantClient, HttpAssistantClient,
    SessionState, SubmissionController, SubmitRejected,
};
use shared::domain::{FileHandle, Turn};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod command;
mod print;

use command::{parse, Command, HELP};
use print::{format_history, format_turn};

#[derive(Parser, Debug)]
#[command(about = "Ask insurance questions and analyze insurance documents")]
struct Args {
    /// Overrides the configured assistant service URL.
    #[arg(long)]
    base_url: Option<String>,
    /// Ask one question and exit.
    #[arg(long)]
    query: Option<String>,
    /// Analyze one document and exit. Runs after --query when both are given.
    #[arg(long)]
    upload: Option<PathBuf>,
}

type Controller = SubmissionController<HttpAssistantClient>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();
    let args = Args::parse();

    let mut settings = load_settings();
    if let Some(base_url) = args.base_url {
        settings.base_url = base_url;
    }
    let client = HttpAssistantClient::from_settings(&settings)?;
    tracing::info!(base_url = %client.base_url(), "assistant client ready");
    let controller = SubmissionController::new(Arc::new(client));
    let mut session = SessionState::new();

    if args.query.is_some() || args.upload.is_some() {
        if let Some(query) = args.query {
            ask(&controller, &mut session, query).await;
        }
        if let Some(path) = args.upload {
            upload(&controller, &mut session, path).await;
        }
        let failed = session.transcript().all().iter().any(Turn::is_failed);
        std::process::exit(if failed { 1 } else { 0 });
    }

    println!("Insurance assistant at {}. Type /help for commands.", settings.base_url);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        match parse(&line) {
            Command::Ask(query) => ask(&controller, &mut session, query).await,
            Command::Upload(path) => upload(&controller, &mut session, path).await,
            Command::Retry => {
                if session.draft_query.trim().is_empty() {
                    println!("Nothing to retry.");
                } else {
                    let query = session.draft_query.clone();
                    ask(&controller, &mut session, query).await;
                }
            }
            Command::History => print!("{}", format_history(&render_transcript(session.transcript()))),
            Command::Expand(number) => match session.transcript().all().get(number - 1) {
                Some(turn) => print!("{}", format_turn(number, &render_turn(turn), true)),
                None => println!("No turn {number}."),
            },
            Command::Health => match controller.client().health().await {
                Ok(health) => println!("Service status: {}", health.status),
                Err(err) => println!("Service check failed: {err}"),
            },
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
            Command::Empty => {}
            Command::Invalid(message) => println!("{message}"),
        }
    }

    Ok(())
}

async fn ask(controller: &Controller, session: &mut SessionState, query: String) {
    session.draft_query = query;
    thinking();
    let outcome = controller.submit_draft(session).await.map(|_| true);
    show_outcome(session, outcome);
}

async fn upload(controller: &Controller, session: &mut SessionState, path: PathBuf) {
    let Some(file) = FileHandle::from_path(&path) else {
        println!("'{}' does not name a file.", path.display());
        return;
    };
    thinking();
    let outcome = controller
        .upload(session, Some(file))
        .await
        .map(|turn| turn.is_some());
    show_outcome(session, outcome);
}

fn thinking() {
    eprintln!("AI: Thinking...");
}

fn show_outcome(session: &SessionState, outcome: Result<bool, SubmitRejected>) {
    match outcome {
        Ok(true) => {
            let number = session.transcript().len();
            if let Some(turn) = session.transcript().last() {
                print!("{}", format_turn(number, &render_turn(turn), false));
            }
        }
        Ok(false) => {}
        Err(rejected) => println!("Not sent: {rejected}."),
    }
}
