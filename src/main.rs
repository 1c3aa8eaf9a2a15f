use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use appforge::api::{self, AppState};
use appforge::llm::{LlmSettings, OpenAiClient};
use appforge::store::MemoryStore;

#[derive(Parser)]
#[command(name = "appforge")]
#[command(about = "LLM-backed generation service for front-end app projects")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the AppForge server
    Serve {
        /// Port for HTTP API
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Run the judge on every generation, behind the response path
        #[arg(long)]
        auto_evaluate: bool,
    },
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "appforge=debug,tower_http=debug".into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

async fn serve(port: u16, auto_evaluate: bool) -> anyhow::Result<()> {
    tracing::info!("Starting AppForge server on port {}", port);

    let settings = LlmSettings::from_env();
    tracing::info!(
        "Using model {} at {}",
        settings.model,
        settings.base_url.as_deref().unwrap_or("https://api.openai.com/v1")
    );

    let llm = Arc::new(OpenAiClient::new(&settings));
    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(llm, store, auto_evaluate);

    let app = api::create_router(state);

    let listener = tokio::net::TcpListener::bind(format!("127.0.0.1:{}", port)).await?;
    tracing::info!("AppForge server listening on http://127.0.0.1:{}", port);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    match cli.command {
        Some(Commands::Serve {
            port,
            auto_evaluate,
        }) => serve(port, auto_evaluate).await?,
        None => serve(3000, false).await?,
    }

    Ok(())
}
