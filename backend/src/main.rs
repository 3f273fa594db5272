use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

use gig_ledger_backend::config::AppConfig;
use gig_ledger_backend::domain::auth::ChannelAuthProvider;
use gig_ledger_backend::initialize_shell;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = AppConfig::from_env();
    let auth = Arc::new(ChannelAuthProvider::new());
    let mut shell = initialize_shell(&config, auth.clone()).await?;

    // Headless mode: establish a session for the user named in the
    // environment, if any; otherwise wait on the provider's events
    if let Ok(user_id) = std::env::var("GIG_LEDGER_USER") {
        info!(user_id = %user_id, "establishing session from environment");
        auth.establish_session(&user_id);
    }

    info!(view = ?shell.view(), "shell started");
    shell.run().await;

    Ok(())
}
