//! # Ledger Server
//!
//! Main entry point for the transaction ledger.

use ledger_config::{AppConfig, ConfigLoader};
use ledger_core::{LedgerError, LedgerResult};
use ledger_rest::{create_router, AppState};
use ledger_server::{
    di::{build_ledger_module, LedgerResolver},
    metrics::{install_recorder, metrics_router},
    startup::{init_logging, print_banner, print_startup_info, shutdown_signal},
};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    let config = match ConfigLoader::from_default_location() {
        Ok(loader) => loader.get().await,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config.observability);
    print_banner();
    info!("Starting {} v{}", config.app.name, env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(config).await {
        error!("Application error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> LedgerResult<()> {
    let module = build_ledger_module(&config).await?;
    let db_pool = module.database_pool();

    if config.database.run_migrations {
        db_pool.run_migrations().await?;
    }

    let state = AppState::new(module.transaction_service(), db_pool.clone());
    let mut router = create_router(state, &config.server);

    if let Some(handle) = install_recorder(&config.observability)? {
        router = router.merge(metrics_router(handle, &config.observability.metrics_path));
    }

    let addr = config.server.addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| LedgerError::Internal(format!("Failed to bind {addr}: {e}")))?;

    print_startup_info(&config);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| LedgerError::Internal(format!("REST server error: {e}")))?;

    db_pool.close().await;
    info!("Server shutdown complete");
    Ok(())
}
