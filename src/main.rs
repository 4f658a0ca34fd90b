mod commands;
mod config;
mod handlers;
mod platform;

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::platform::telegram::{self, TelegramPlatform};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,join_bot=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Resolve the token before touching the network
    let token = config::load_token(&config::default_sources())
        .context("Failed to load bot token")?;
    info!("Token loaded");

    let platform = Arc::new(TelegramPlatform::new(&token));

    handlers::publish_commands(platform.as_ref(), commands::COMMANDS).await;

    println!("Join bot is running…");
    telegram::run(platform).await;

    Ok(())
}
