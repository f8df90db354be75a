//! parley-chat service entry point.

use anyhow::{Context, Result};
use clap::Parser;
use parley_chat::{
    build_router, AppState, Args, BpeTokenizer, ChatService, CompatibleProvider, Conversation,
    CredentialStore, EchoProvider, Provider,
};
use parley_common::logging::init_logging;
use parley_common::Validate;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 1024 * 1024;

#[tokio::main]
async fn main() -> Result<()> {
    let startup_start = std::time::Instant::now();

    let config = Args::parse().into_config();
    init_logging(&config.observability);

    tracing::info!("Parley Chat v{}", env!("CARGO_PKG_VERSION"));

    config.validate().context("Invalid configuration")?;

    let tokenizer = BpeTokenizer::cl100k()?;
    let credentials = CredentialStore::load(&config.api_key_file)?;

    let provider: Arc<dyn Provider> = if config.test_mode {
        tracing::info!("Test mode: replies are echoed locally");
        Arc::new(EchoProvider::new())
    } else {
        Arc::new(CompatibleProvider::cerebras(&config.inference))
    };

    tracing::info!(
        provider = provider.name(),
        model = provider.model(),
        context = %config.context,
        "Inference configured"
    );

    let chat = ChatService::new(
        Conversation::new(config.context, Arc::new(tokenizer)),
        credentials,
        provider,
    );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = build_router(AppState::new(chat))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(cors);

    let addr = config.bind_addr()?;

    let startup_duration = startup_start.elapsed();
    tracing::info!(
        duration_ms = startup_duration.as_millis() as u64,
        "Service initialized in {:?}",
        startup_duration
    );

    tracing::info!("Visit http://127.0.0.1:{}/chat to start chatting", config.port);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
