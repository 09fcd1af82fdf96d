mod agent;
mod chat;
mod http_client;
mod model;

use std::sync::Arc;

use clap::Parser;
use agent::AnthropicAgent;
use model::arg::Args;
use model::config::{API_KEY_ENV, Config};

#[tokio::main]
async fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config_path = args
        .config
        .unwrap_or_else(|| Config::default_config_path().to_string());
    let mut config = Config::load(&config_path).unwrap_or_else(|e| {
        tracing::error!("Failed to load config: {:#}", e);
        std::process::exit(1);
    });
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(path) = config.config_path().filter(|p| p.exists()) {
        tracing::info!("Loaded config from {}", path.display());
    } else {
        tracing::info!("Config file {} not found, using defaults", config_path);
    }

    // Get agent API Key
    let api_key = config.agent.effective_api_key().unwrap_or_else(|| {
        tracing::error!("agent.apiKey not set in config file and {} is empty", API_KEY_ENV);
        std::process::exit(1);
    });

    // Build proxy configuration
    let proxy_config = http_client::ProxyConfig::from_config(&config);
    if let Some(proxy) = &proxy_config {
        tracing::info!("HTTP proxy configured: {}", proxy.url);
    }

    let agent = AnthropicAgent::new(
        config.agent.clone(),
        api_key,
        proxy_config.as_ref(),
        config.tls_backend,
    )
    .unwrap_or_else(|e| {
        tracing::error!("Failed to create agent: {:#}", e);
        std::process::exit(1);
    });
    tracing::info!("Agent endpoint: {} (model {})", agent.messages_url(), agent.model());

    let state = chat::AppState::new(Arc::new(agent)).with_mime_policy(config.image_mime_policy);
    let app = chat::create_router(state, config.max_request_body_bytes);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting chat relay: {}", addr);
    tracing::info!("Image MIME policy: {:?}", config.image_mime_policy);
    tracing::info!("Available APIs:");
    tracing::info!("  POST /chat");

    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap_or_else(|e| {
        tracing::error!("Failed to bind {}: {}", addr, e);
        std::process::exit(1);
    });
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
