//! `xtweetd`: the X-Tweet API server.
//!
//! Usage:
//!   xtweetd [--port <port>] [--listen <addr>] [--uri <store>]
//!
//! Configuration comes from the environment (a `.env` file in the working
//! directory is loaded first); flags override it.

mod origin_guard;
mod rate_limit;
mod routes;

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tweet::TweetModule;
use tweet::model::ReactionPolicy;
use tweet::service::TweetConfig;
use xtweet_core::{Module, ServiceConfig};
use xtweet_kv::{KVStore, MemoryStore, RedbStore};

/// Store URI selecting the process-local store.
const MEMORY_URI: &str = "memory:";

/// X-Tweet API server.
#[derive(Parser, Debug)]
#[command(name = "xtweetd", about = "X-Tweet API server", version)]
struct Cli {
    /// Port to bind on all interfaces (overrides PORT).
    #[arg(long)]
    port: Option<u16>,

    /// Full listen address (overrides --port and PORT).
    #[arg(long)]
    listen: Option<String>,

    /// Store connection string: a redb file path or `memory:` (overrides URI).
    #[arg(long)]
    uri: Option<String>,

    /// How likes are deduplicated: dislike-only or symmetric.
    #[arg(long, env = "REACTION_POLICY", default_value_t = ReactionPolicy::DislikeOnly)]
    reaction_policy: ReactionPolicy,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();

    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    if let Ok(path) = dotenv {
        info!("Loaded environment from {}", path.display());
    }

    let cli = Cli::parse();

    let mut config = ServiceConfig::from_env()?;
    if let Some(port) = cli.port {
        config.listen = format!("0.0.0.0:{port}");
    }
    if let Some(listen) = cli.listen {
        config.listen = listen;
    }
    if let Some(uri) = cli.uri {
        config.store_uri = uri;
    }

    let kv = open_store(&config.store_uri)?;

    let tweet_module = TweetModule::with_config(
        kv,
        TweetConfig {
            reaction_policy: cli.reaction_policy,
        },
    );
    info!(policy = %cli.reaction_policy, "Tweet module initialized");

    let module_routes = vec![(tweet_module.name(), tweet_module.routes())];

    let config = Arc::new(config);
    let app = routes::build_router(Arc::clone(&config), module_routes);

    let listener = tokio::net::TcpListener::bind(&config.listen).await?;
    info!("X-Tweet server listening on {}", config.listen);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

/// Open the store named by `uri`. Failure here is fatal.
fn open_store(uri: &str) -> anyhow::Result<Arc<dyn KVStore>> {
    if uri == MEMORY_URI {
        warn!("Using in-memory store, data will not survive a restart");
        return Ok(Arc::new(MemoryStore::new()));
    }

    let path = Path::new(uri);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let store = RedbStore::open(path)
        .map_err(|e| anyhow::anyhow!("failed to open KV store at {}: {}", uri, e))?;
    info!("Opened store at {}", path.display());
    Ok(Arc::new(store))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
