//! Jenkins Relay Server.
//!
//! A standalone binary that turns Jenkins build notifications into Slack
//! messages and lets Slack users list and start Jenkins jobs.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tower_http::trace::TraceLayer;

use jenkins_relay::config::RelayConfig;
use jenkins_relay::routes::{self, RelayState};
use jenkins_relay::services::chat_sink::{ChatSink, SlackSink};
use jenkins_relay::services::jenkins_service::{BuildServer, JenkinsClient};

#[derive(Parser)]
#[command(name = "jenkins-relay", about = "Jenkins → Slack build notification relay")]
struct Cli {
    /// Server port
    #[arg(short, long, env = "RELAY_PORT", default_value = "8080")]
    port: u16,

    /// Path prefix for the webhook (`/<name>/jenkins`)
    #[arg(long, env = "RELAY_SERVICE_NAME", default_value = "hubot")]
    service_name: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_default();
    if log_format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "info".into()),
            )
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "info".into()),
            )
            .init();
    }

    let cli = Cli::parse();

    tracing::info!("Starting Jenkins Relay Server...");

    let config = RelayConfig::from_env(&cli.service_name);

    let sink: Arc<dyn ChatSink> = Arc::new(SlackSink::new(
        config.slack_token.clone(),
        config.slack_api_url.clone(),
    ));

    let jenkins: Option<Arc<dyn BuildServer>> = match config.jenkins_url.as_deref() {
        Some(url) => Some(Arc::new(JenkinsClient::new(url)?) as Arc<dyn BuildServer>),
        None => None,
    };

    let webhook_path = config.webhook_path();
    let state = RelayState {
        config: Arc::new(config),
        sink,
        jenkins,
    };

    let app = routes::relay_router(state).layer(TraceLayer::new_for_http());

    // Initialize metrics
    jenkins_relay::metrics::init_metrics();

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], cli.port));
    tracing::info!(webhook = %webhook_path, "Jenkins Relay listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT, shutting down..."),
        _ = terminate => tracing::info!("Received SIGTERM, shutting down..."),
    }
}
