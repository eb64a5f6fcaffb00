pub mod api;
pub mod cli;
pub mod config;
pub mod constants;
pub mod db;
pub mod entities;
pub mod services;
pub mod state;

use std::sync::Arc;

use anyhow::Context;
pub use cli::{Cli, Commands};
pub use config::Config;
use state::SharedState;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

pub async fn run(cli: Cli, config: Config) -> anyhow::Result<()> {
    init_tracing(&config);
    config.validate()?;

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => run_server(config, port).await,

        Commands::Init => {
            if Config::create_default_if_missing()? {
                println!("✓ Config file created. Edit config.toml and run again.");
            } else {
                println!("config.toml already exists");
            }
            Ok(())
        }

        Commands::Register { email, password } => {
            cli::cmd_register(&config, &email, &password).await
        }

        Commands::Deactivate { email } => cli::cmd_deactivate(&config, &email).await,

        Commands::Subjects => cli::cmd_list_subjects(&config).await,

        Commands::Courses => cli::cmd_list_courses(&config).await,
    }
}

fn init_tracing(config: &Config) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.general.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if config.general.log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn run_server(config: Config, port_override: Option<u16>) -> anyhow::Result<()> {
    info!("CourseOwl v{} starting...", env!("CARGO_PKG_VERSION"));

    let prometheus_handle = if config.observability.metrics_enabled {
        use metrics_exporter_prometheus::PrometheusBuilder;
        let handle = PrometheusBuilder::new()
            .install_recorder()
            .context("Failed to install Prometheus recorder")?;
        info!("Prometheus metrics recorder initialized");
        Some(handle)
    } else {
        None
    };

    let port = port_override.unwrap_or(config.server.port);
    let shared = Arc::new(SharedState::new(config).await?);
    let api_state = api::create_app_state(shared, prometheus_handle);

    let app = api::router(api_state).await;
    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    info!("Web server running at http://{addr}");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Web server error: {}", e);
    }

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => error!("Error listening for shutdown: {}", e),
    }
}
