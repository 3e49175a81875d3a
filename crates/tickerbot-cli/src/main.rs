//! Tickerbot CLI
//!
//! Usage:
//!   tickerbot ask <question>
//!   tickerbot chat

use anyhow::Context;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use tickerbot_chat::{is_exit, ChatPipeline, OpenAiClient, FAREWELL};
use tickerbot_core::config::AppConfig;
use tickerbot_core::{ContextStore, LlmClient};
use tickerbot_store::MongoContextStore;

#[derive(Parser)]
#[command(name = "tickerbot")]
#[command(about = "Investor-context chat CLI")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Ask a single question
    Ask {
        /// Question to ask
        question: String,
    },
    /// Interactive chat session; type "exit" to quit
    Chat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let config = AppConfig::from_env()?;
    let pipeline = build_pipeline(&config).await?;

    match cli.command {
        Commands::Ask { question } => {
            let answer = pipeline.ask(&question).await?;
            println!("{}", answer.answer);
        }
        Commands::Chat => {
            chat_loop(&pipeline).await?;
        }
    }

    Ok(())
}

async fn build_pipeline(config: &AppConfig) -> anyhow::Result<ChatPipeline> {
    let store: Option<Arc<dyn ContextStore>> = match &config.store.mongo_uri {
        Some(_) => Some(Arc::new(MongoContextStore::connect(&config.store).await?)),
        None => {
            eprintln!("warning: MONGO_URI not set; answering without database context");
            None
        }
    };

    let llm: Arc<dyn LlmClient> =
        Arc::new(OpenAiClient::from_config(&config.llm).context("OPENAI_API_KEY must be set")?);

    Ok(ChatPipeline::new(store, llm))
}

async fn chat_loop(pipeline: &ChatPipeline) -> anyhow::Result<()> {
    println!("Ask about investors in the screener database. Type \"exit\" to quit.");

    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            // EOF
            break;
        }
        let input = line.trim();

        if input.is_empty() {
            continue;
        }
        if is_exit(input) {
            println!("{FAREWELL}");
            break;
        }

        match pipeline.ask(input).await {
            Ok(answer) => println!("{}", answer.answer),
            Err(e) => eprintln!("error: {e}"),
        }
    }

    Ok(())
}
