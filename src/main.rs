use anyhow::{Context, Result};
use restaurant_support::config::SupportConfig;
use restaurant_support::session::{Script, ScriptedProvider, SessionController};
use restaurant_support::token::HttpTokenClient;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "restaurant_support=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting restaurant support widget");

    let config = SupportConfig::from_env().context("Failed to read configuration")?;
    config.validate().context("Invalid configuration")?;

    let script = match &config.script_path {
        Some(path) => {
            info!("Loading session script from {:?}", path);
            Script::load(path).context("Failed to load session script")?
        }
        None => Script::demo(),
    };

    let client = HttpTokenClient::new(config.token_url.clone(), config.token_timeout)
        .context("Failed to build token client")?;
    let provider = ScriptedProvider::new(script);

    let controller = SessionController::spawn(config.clone(), Arc::new(client), Arc::new(provider))
        .context("Failed to start credential worker")?;

    info!("Token endpoint: {}", config.token_url);
    info!("Session server: {}", config.server_url);

    restaurant_support::ui::run(config, controller)
        .map_err(|e| anyhow::anyhow!("GUI exited with error: {}", e))
}
