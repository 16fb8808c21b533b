use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tracing::{info, warn};

use fragments_model::{FragmentService, Fragments};
use fragments_server::api::AppState;
use fragments_server::auth::BasicAuthProvider;
use fragments_server::config::FragmentsConfig;

/// Fragments HTTP server.
#[derive(Parser, Debug)]
#[command(name = "fragments-server", about = "HTTP API for the fragments store")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "fragments.toml")]
    config: String,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration from TOML file, or use defaults if the file does not exist.
    let config_path = Path::new(&cli.config);
    let mut config = FragmentsConfig::load(config_path)?;

    // Must happen after config is loaded so the format is known, but before
    // any tracing calls.
    fragments_server::logging::init(&config.logging);

    if !config_path.exists() {
        info!(path = %cli.config, "config file not found, using defaults");
    }

    // CLI overrides take precedence.
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let store = fragments_server::store_factory::create_store(&config.store).await?;
    info!(backend = %config.store.backend, "fragment store initialized");

    let auth = BasicAuthProvider::from_config(&config.auth).map(Arc::new);
    if auth.is_none() {
        warn!("no users configured, authentication disabled");
    }

    let state = AppState {
        service: FragmentService::new(Fragments::new(store)),
        auth,
        api_url: config.server.resolved_api_url(),
        max_body_bytes: config.server.max_body_bytes,
    };
    let app = fragments_server::api::router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "fragments-server listening");

    // Serve with graceful shutdown on SIGINT / SIGTERM.
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("fragments-server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { info!("received SIGINT"); }
        () = terminate => { info!("received SIGTERM"); }
    }
}
