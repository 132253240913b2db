use ai_tutor::chat::ChatController;
use ai_tutor::config::Config;
use ai_tutor::groq::{GroqChat, GroqTranscription};
use ai_tutor::http::{create_router, AppState};
use ai_tutor::recording::Recorder;
use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "ai-tutor")]
#[command(about = "Voice-and-text AI tutor service", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(long, default_value = "config/ai-tutor")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let config = Config::load(&args.config)?;
    info!("Starting {}", config.service.name);

    let api_key = config.groq.require_api_key()?.to_string();
    let chat = GroqChat::new(
        config.groq.api_base.clone(),
        api_key.clone(),
        config.groq.chat.clone(),
    )?;
    let transcription = GroqTranscription::new(
        config.groq.api_base.clone(),
        api_key,
        config.groq.transcription.clone(),
    )?;

    let recorder = Recorder::new(Arc::new(transcription));
    let controller = Arc::new(ChatController::new(Arc::new(chat), recorder));
    let state = AppState::new(controller, config.capture.clone());

    let app = create_router(state);
    let addr = format!("{}:{}", config.service.http.bind, config.service.http.port);
    info!("HTTP API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
