use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::routes::{router, AppState};
use crate::telegram::TelegramClient;

mod auth;
mod config;
mod error;
mod gifts;
mod logging;
mod routes;
mod telegram;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    logging::setup();

    let config = Config::from_env()?;
    let addr = config.socket_addr()?;
    if config.mini_app_url.is_none() {
        tracing::warn!("MINI_APP_URL is not set, /start will not offer the mini app");
    }

    let bot = TelegramClient::new(&config);
    let state = AppState {
        config: Arc::new(config),
        bot: Arc::new(bot),
    };
    let app = router(state);

    let listener = TcpListener::bind(addr).await?;
    info!("listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
