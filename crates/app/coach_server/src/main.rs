//! Growth Coach relay server binary.
//!
//! Serves `POST /api/growth-coach`, relaying each message to a hosted ChatKit
//! workflow. Configuration comes from flags, environment, or a `.env` file.

use clap::Parser;
use coach_api::config::{ApiConfig, DEFAULT_BIND_ADDR};
use coach_core::config::{ChatKitConfig, ConfigError};
use tracing::{info, warn};

/// CLI arguments for the relay server.
///
/// ChatKit flags override the environment variable of the same meaning;
/// anything not given on the command line is read from the environment by
/// [`ChatKitConfig::from_lookup`].
#[derive(Parser)]
#[command(name = "coach_server", about = "Growth Coach ChatKit relay server")]
struct Args {
    /// Address to listen on.
    #[arg(long, env = "BIND_ADDR", default_value = DEFAULT_BIND_ADDR)]
    bind: String,

    /// Hosted ChatKit workflow identifier [env: CHATKIT_WORKFLOW_ID].
    #[arg(long)]
    workflow_id: Option<String>,

    /// API key used to create ChatKit sessions [env: OPENAI_API_KEY].
    #[arg(long)]
    api_key: Option<String>,

    /// ChatKit API origin [env: CHATKIT_API_BASE].
    #[arg(long)]
    api_base: Option<String>,

    /// Timeout for each outbound ChatKit request, in seconds [env: CHATKIT_TIMEOUT_SECS].
    #[arg(long)]
    timeout_secs: Option<String>,
}

impl Args {
    /// Value given on the command line for a ChatKit variable, if any.
    fn flag(&self, key: &str) -> Option<String> {
        match key {
            "CHATKIT_WORKFLOW_ID" => self.workflow_id.clone(),
            "OPENAI_API_KEY" => self.api_key.clone(),
            "CHATKIT_API_BASE" => self.api_base.clone(),
            "CHATKIT_TIMEOUT_SECS" => self.timeout_secs.clone(),
            _ => None,
        }
    }

    /// Resolves the ChatKit config: flags first, then the environment.
    fn chatkit_config<F>(&self, env: F) -> Result<ChatKitConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        ChatKitConfig::from_lookup(|key| self.flag(key).or_else(|| env(key)))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,coach_api=debug,coach_core=debug".into()),
        )
        .init();

    let args = Args::parse();

    let chatkit = args.chatkit_config(|key| std::env::var(key).ok())?;

    if chatkit.credentials().is_none() {
        warn!("CHATKIT_WORKFLOW_ID or OPENAI_API_KEY is not set; relay requests will fail");
    }

    info!(
        bind = %args.bind,
        api_base = %chatkit.api_base,
        timeout_secs = chatkit.request_timeout.as_secs(),
        "starting coach_server"
    );

    let config = ApiConfig {
        bind_addr: args.bind,
        chatkit,
    };
    let state = coach_api::AppState::new(config.clone())?;
    let app = coach_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "REST API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("coach_server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for ctrl-c: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
