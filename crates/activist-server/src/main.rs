//! Activist server
//!
//! Usage:
//! ```bash
//! # Defaults: 127.0.0.1:8080, tenants in ~/.activist
//! activist-server
//!
//! # With config file (YAML or TOML); env vars override it, flags override both
//! activist-server --config activist.yaml serve --port 9000
//!
//! # Which context would a request land in?
//! activist-server resolve --host city-bike.activist.com
//! ```
//!
//! Local testing without DNS:
//! ```bash
//! curl -H "Host: app.activist.com" http://localhost:8080/api/tenants
//! curl -H "Host: climate-action.activist.com" http://localhost:8080/
//! ```

use activist_core::{TenantRepository, seed::default_tenants};
use activist_egress::{ChatAssistant, HttpChatAssistant};
use activist_observability::{Metrics, init_logging};
use activist_routing::DomainResolver;
use activist_server::{AppState, ServerConfig, build_router};
use activist_store::{JsonFileRepository, StoreOrigin, TenantStore};
use clap::{Parser, Subcommand};
use futures::StreamExt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "activist-server")]
#[command(about = "Activist - multi-tenant campaign site builder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to configuration file (YAML or TOML)
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "ACTIVIST_CONFIG",
        global = true
    )]
    config: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL", global = true)]
    log_level: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server (default if no command specified)
    Serve {
        /// Address to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to bind
        #[arg(short, long)]
        port: Option<u16>,

        /// Directory holding the tenant file
        #[arg(long, value_name = "DIR")]
        data_dir: Option<PathBuf>,
    },
    /// Print the route context a request would resolve to
    Resolve {
        /// Request hostname, with or without port
        #[arg(long)]
        host: String,

        /// Request path
        #[arg(long, default_value = "/")]
        path: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ServerConfig::from_file(path)?,
        None => ServerConfig::default(),
    };

    // Environment overrides the file, flags override both
    config.merge_env();
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    match cli.command {
        Some(Commands::Resolve { host, path }) => resolve(&config, &host, &path).await,
        Some(Commands::Serve {
            host,
            port,
            data_dir,
        }) => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(dir) = data_dir {
                config.storage.data_dir = dir.to_string_lossy().into_owned();
            }
            serve(config, cli.config).await
        }
        None => serve(config, cli.config).await,
    }
}

/// Resolve one request against the persisted tenants. Never writes.
async fn resolve(config: &ServerConfig, host: &str, path: &str) -> anyhow::Result<()> {
    let repository = JsonFileRepository::in_dir(config.data_dir())?;
    let tenants = match repository.load().await {
        Ok(Some(tenants)) => tenants,
        Ok(None) => default_tenants(),
        Err(e) => {
            eprintln!("Warning: {} ({}), using built-in tenants", e, repository.describe());
            default_tenants()
        }
    };

    let hostname = activist_routing::hostname_from_authority(host).unwrap_or(host);
    let resolver = DomainResolver::new(config.host_config());
    let context = resolver.resolve(path, hostname, &tenants);

    match context.tenant() {
        Some(tenant) => println!("{} {} ({})", context.as_str(), tenant.slug, tenant.name),
        None => println!("{}", context.as_str()),
    }
    Ok(())
}

async fn serve(config: ServerConfig, config_path: Option<String>) -> anyhow::Result<()> {
    init_logging(&config.logging.level, config.logging.json)?;

    match config_path {
        Some(path) => info!("Loaded configuration from {}", path),
        None => info!("Using default configuration"),
    }

    let metrics = Arc::new(Metrics::new()?);

    let repository = Arc::new(JsonFileRepository::in_dir(config.data_dir())?);
    let store = Arc::new(TenantStore::open(repository.clone()).await);
    if store.origin() == StoreOrigin::Recovered {
        metrics.record_store_fallback("load_failed");
    }
    info!(
        "Loaded {} tenant(s) from {} ({})",
        store.len(),
        repository.path().display(),
        store.origin().as_str()
    );

    let chat: Option<Arc<dyn ChatAssistant>> = match HttpChatAssistant::from_config(&config.chat)? {
        Some(assistant) => {
            info!("Chat assistant enabled: {}", assistant.endpoint());
            Some(Arc::new(assistant) as Arc<dyn ChatAssistant>)
        }
        None => {
            info!("Chat assistant disabled (no endpoint configured)");
            None
        }
    };

    if config.storage.watch {
        spawn_tenant_watcher(repository.clone(), store.clone(), metrics.clone());
    }

    let hosts = config.host_config();
    let resolver = DomainResolver::new(hosts.clone());
    let state = AppState::new(store, resolver, metrics, chat);
    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    let listener = TcpListener::bind(addr).await?;

    info!("Activist listening on http://{}", addr);
    info!("   Admin dashboard: http://{}/", hosts.admin_host);
    info!("   Landing page:    http://{}/", hosts.root_host);
    info!("   Tenant sites:    http://<slug>.{}/", hosts.root_host);
    info!("   Health check:    http://{}/healthz", addr);
    info!("   Metrics:         http://{}/metrics", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Reload the store whenever the tenant file changes outside this process.
fn spawn_tenant_watcher(
    repository: Arc<JsonFileRepository>,
    store: Arc<TenantStore>,
    metrics: Arc<Metrics>,
) {
    let mut changes = match repository.watch() {
        Ok(changes) => changes,
        Err(e) => {
            warn!("Tenant file watching disabled: {}", e);
            return;
        }
    };

    tokio::spawn(async move {
        while let Some(change) = changes.next().await {
            match change {
                Ok(change) => {
                    debug!("Tenant file changed at {}", change.timestamp);
                    match store.reload().await {
                        Ok(count) => metrics.set_tenant_count(count),
                        Err(e) => {
                            warn!("Keeping current tenants after failed reload: {}", e);
                            metrics.record_store_fallback("reload_failed");
                        }
                    }
                }
                Err(e) => warn!("Tenant file watch error: {}", e),
            }
        }
        debug!("Tenant watcher stopped");
    });
}

/// Wait for shutdown signal (SIGINT or SIGTERM)
async fn shutdown_signal() {
    use tokio::signal;

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
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
