//! Server startup utilities.

use ledger_config::{AppConfig, ObservabilityConfig};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,ledger=debug,tower_http=debug";

/// Builds the log filter: `RUST_LOG` first, then the configured level.
pub fn log_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if config.log_level.is_empty() || config.log_level == "info" {
            EnvFilter::new(DEFAULT_LOG_FILTER)
        } else {
            EnvFilter::new(&config.log_level)
        }
    })
}

/// Installs the global subscriber, JSON or plain text per configuration.
pub fn init_logging(config: &ObservabilityConfig) {
    let registry = tracing_subscriber::registry().with(log_filter(config));

    if config.json_logs() {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

/// Prints the startup banner.
pub fn print_banner() {
    info!(
        r#"
    __           __
   / /__  ____/ /___ ____  _____
  / / _ \/ __  / __ `/ _ \/ ___/
 / /  __/ /_/ / /_/ /  __/ /
/_/\___/\__,_/\__, /\___/_/
             /____/
    "#
    );
}

/// Prints server startup information.
pub fn print_startup_info(config: &AppConfig) {
    let separator = "=".repeat(60);
    let port = config.server.port;
    info!("{}", separator);
    info!("Environment: {}", config.app.environment);
    info!("REST API:    http://{}/api/v1", config.server.addr());
    info!("Health:      http://0.0.0.0:{}/health", port);
    info!("API Docs:    http://0.0.0.0:{}/swagger-ui", port);
    if config.observability.metrics_enabled {
        info!("Metrics:     http://0.0.0.0:{}{}", port, config.observability.metrics_path);
    }
    info!(
        "Writes:      {}",
        if config.database.transactional_writes {
            "transactional"
        } else {
            "auto-commit"
        }
    );
    info!("{}", separator);
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        _ = terminate => {
            info!("Received terminate signal, initiating graceful shutdown...");
        }
    }
}
