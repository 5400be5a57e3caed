//! autoware-agent - Main CLI Entry Point

use anyhow::{Context, Result};
use autoware_agent::{
    agent::{AgentRunner, RunOutcome, TraceBus},
    cli::{input::is_exit_command, Args, InputHandler},
    config::AppConfig,
    errors::AgentError,
    ingest::DocumentLoader,
    llm::OpenAiClient,
    logging::init_logging,
    store,
    tools::ToolRuntime,
    types::ChatMessage,
};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

const SEPARATOR: &str = "============================================";

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(args.verbose);
    info!("Starting Autoware documentation assistant");

    if let Err(e) = run(args).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        if e.downcast_ref::<AgentError>().is_some_and(AgentError::is_user_error) {
            eprintln!("{}", "Check --components and the configuration; see --help.".dimmed());
        }
        std::process::exit(1);
    }
}

async fn run(args: Args) -> Result<()> {
    let config = AppConfig::load(args.config.as_deref(), &args.overrides())?;
    debug!("{:?}", config);

    let loader = DocumentLoader::new(&config)?;
    let documents = loader.load_documents(args.components.as_deref()).await?;
    info!("Loaded {} documents", documents.len());

    let client = OpenAiClient::new(&config)?;
    let mut vector_store = store::from_config(&config, &client)?;

    let pb = spinner("Indexing documentation...");
    let built = vector_store.build(&documents).await;
    pb.finish_and_clear();
    let chunks = built?;
    info!("Indexed {} chunks ({} backend)", chunks, vector_store.backend());

    let tools = Arc::new(ToolRuntime::new(
        Arc::new(vector_store),
        config.top_k,
        config.component_names(),
    ));
    let runner = AgentRunner::new(Arc::new(client), tools.clone(), config.max_iterations);

    if args.chat {
        chat(&runner, args.trace).await?;
    } else {
        ask(&runner, args.question(), &[], args.trace).await?;
    }

    let stats = tools.stats();
    debug!(
        "Tool calls: {} ok, {} failed, avg {:.1}ms",
        stats.successful_executions,
        stats.failed_executions,
        stats.average_duration_ms()
    );
    Ok(())
}

/// Ask one question and print the answer, with the trace when requested
async fn ask(
    runner: &AgentRunner,
    question: &str,
    history: &[ChatMessage],
    trace: bool,
) -> Result<RunOutcome> {
    println!("{}", SEPARATOR);
    println!("質問: {}", question);

    let outcome = if trace {
        println!("---- Agent intermediate steps ----");
        let (bus, mut receiver) = TraceBus::new();
        let printer = tokio::spawn(async move {
            while let Some(event) = receiver.recv().await {
                println!("{}", event);
            }
        });

        let result = runner.run(question, history, Some(&bus)).await;
        drop(bus);
        printer.await.context("Trace printer task failed")?;
        println!("---- End of intermediate steps ----");
        result?
    } else {
        let pb = spinner("Agent thinking...");
        let result = runner.run(question, history, None).await;
        pb.finish_and_clear();
        result?
    };

    println!("---- 回答 ----");
    println!("{}", outcome.answer);
    Ok(outcome)
}

/// Interactive loop keeping the conversation between questions
async fn chat(runner: &AgentRunner, trace: bool) -> Result<()> {
    let mut input = match InputHandler::default_history_path() {
        Some(path) => InputHandler::with_history(path)?,
        None => InputHandler::new()?,
    };

    println!("{}", "Autoware documentation assistant".bold().cyan());
    println!("{}", "Type a question, or 'exit' to quit.".dimmed());

    let mut history: Vec<ChatMessage> = Vec::new();
    while let Some(line) = input.read_line()? {
        if line.is_empty() {
            continue;
        }
        if is_exit_command(&line) {
            break;
        }

        match ask(runner, &line, &history, trace).await {
            Ok(outcome) => {
                history.push(ChatMessage::human(line));
                history.push(ChatMessage::ai(outcome.answer));
            }
            Err(e) => eprintln!("{} {:#}", "Error:".red().bold(), e),
        }
    }

    input.save_history()?;
    Ok(())
}

fn spinner(message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
