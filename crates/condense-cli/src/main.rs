use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use condense_engine::{EngineOptions, InferenceEngine, TextGenerator};
use condense_serve::AppState;

#[derive(Parser)]
#[command(
    name = "condense",
    about = "Beam-search text summarization over a pretrained causal LM",
    version,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Args)]
struct ModelArgs {
    /// Hub repository holding the GGUF weights
    #[arg(long, default_value = condense_engine::hub::DEFAULT_MODEL_REPO)]
    model_repo: String,
    /// GGUF file within the model repository
    #[arg(long, default_value = condense_engine::hub::DEFAULT_MODEL_FILE)]
    model_file: String,
    /// Hub repository holding tokenizer.json
    #[arg(long, default_value = condense_engine::hub::DEFAULT_TOKENIZER_REPO)]
    tokenizer_repo: String,
    /// Local GGUF path (skips the hub)
    #[arg(long)]
    model_path: Option<PathBuf>,
    /// Local tokenizer.json path (skips the hub)
    #[arg(long)]
    tokenizer_path: Option<PathBuf>,
}

impl ModelArgs {
    fn to_options(&self) -> EngineOptions {
        EngineOptions {
            model_repo: self.model_repo.clone(),
            model_file: self.model_file.clone(),
            tokenizer_repo: self.tokenizer_repo.clone(),
            model_path: self.model_path.clone(),
            tokenizer_path: self.tokenizer_path.clone(),
            ..EngineOptions::default()
        }
    }
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Start the summarization HTTP server
    Serve {
        /// Address to bind to
        #[arg(long, default_value = "0.0.0.0:8000")]
        addr: String,
        #[command(flatten)]
        model: ModelArgs,
    },
    /// Summarize a single text and print the result
    Summarize {
        /// Input text to summarize
        text: String,
        #[command(flatten)]
        model: ModelArgs,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { addr, model } => cmd_serve(&addr, &model),
        Commands::Summarize { text, model } => cmd_summarize(&text, &model),
    }
}

fn cmd_serve(addr: &str, model: &ModelArgs) -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let engine = InferenceEngine::load(&model.to_options()).context("engine startup failed")?;
    let state = AppState::new(Box::new(engine));

    println!("condense v{}", env!("CARGO_PKG_VERSION"));
    println!("  model:     {}", state.model_name);
    println!("  listening: {}", addr);
    println!("  endpoints: POST /summarize, GET /health");

    let rt = tokio::runtime::Runtime::new().context("failed to create tokio runtime")?;
    rt.block_on(condense_serve::server::serve(addr, state))
}

fn cmd_summarize(text: &str, model: &ModelArgs) -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut engine = InferenceEngine::load(&model.to_options()).context("engine startup failed")?;
    let summary = engine.generate(text)?;
    println!("{}", summary);
    Ok(())
}
