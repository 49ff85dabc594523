use anyhow::{Context, Result};
use tokio::net::TcpListener;

use vol_forecast::api;
use vol_forecast::config::{Config, LoggingConfig};
use vol_forecast::inference::Forecaster;

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::try_new(&logging.level)
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    });
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {:#}", e);
            eprintln!("Set VF_CONFIG_PATH or run from a directory containing config/default.toml");
            std::process::exit(1);
        }
    };

    init_tracing(&config.logging);

    let store = config.models.store();
    match store.available_lags() {
        Ok(lags) => tracing::info!(
            dir = %store.dir().display(),
            lags = ?lags,
            "Model bundle store ready"
        ),
        Err(e) => tracing::warn!(
            dir = %store.dir().display(),
            error = %e,
            "Model bundle directory is not readable"
        ),
    }

    let listener = TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind))?;
    let app = api::router(Forecaster::new(store));

    tokio::select! {
        res = api::serve(listener, app) => res?,
        _ = tokio::signal::ctrl_c() => tracing::info!("Ctrl+C received"),
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
