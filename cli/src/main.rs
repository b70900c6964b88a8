//! CLI entrypoint for contact-relay
//!
//! This is the main binary that loads configuration, wires together all
//! layers using dependency injection, and serves the HTTP API.

mod wiring;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use relay_application::{LogSink, NoLogSink};
use relay_domain::Severity;
use relay_infrastructure::{ConfigLoader, FileConfig, LogSinkLayer};
use relay_presentation::{AppState, Cli, build_router};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Time allowed for queued log records to ship after the server stops.
const SHIPPER_GRACE: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loaded = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
    };
    let mut config = loaded.map_err(|e| anyhow!("Failed to load configuration: {}", e))?;

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(mode) = cli.mode {
        config.mode = mode;
    }

    if cli.show_config {
        ConfigLoader::print_config_sources(cli.config.as_ref());
        println!();
        println!(
            "{}",
            toml::to_string_pretty(&config.redacted()).context("Failed to render configuration")?
        );
        return Ok(());
    }

    let issues = config.validate();
    for issue in &issues {
        match issue.severity {
            Severity::Error => eprintln!("config error: {}", issue.message),
            Severity::Warning => eprintln!("config warning: {}", issue.message),
        }
    }
    let errors = issues.iter().filter(|issue| issue.is_error()).count();
    if errors > 0 {
        bail!("Configuration has {} error(s); refusing to start", errors);
    }

    let sinks = wiring::log_sinks(&config)?;
    let _log_guard = init_tracing(&cli, &config, sinks.sink.clone())?;
    for reason in &sinks.unavailable {
        warn!("Continuing without {}", reason);
    }

    info!(mode = %config.mode, "Starting contact-relay");

    // === Dependency Injection ===
    let log_sink = sinks.sink.unwrap_or_else(|| Arc::new(NoLogSink));
    let use_case = wiring::build_use_case(&config, log_sink)?;
    let state = AppState::new(use_case, wiring::http_settings(&config));

    if let Some(limiter) = state.rate_limiter().cloned() {
        let period = limiter.settings().window;
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                limiter.purge_expired();
            }
        });
    }

    let router = build_router(state);
    let bind = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {}", bind))?;
    let address = listener.local_addr()?;
    info!(address = %address, "Listening");

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("Server error")?;

    if let Some(shipper) = sinks.shipper
        && !shipper.finish(SHIPPER_GRACE).await
    {
        warn!("Log sink did not drain within {:?}", SHIPPER_GRACE);
    }

    info!("Shut down");
    Ok(())
}

/// Install the global subscriber.
///
/// Filter precedence: `-v` count, then `RUST_LOG`, then `logging.level`.
/// The returned guard flushes the file writer on drop.
fn init_tracing(
    cli: &Cli,
    config: &FileConfig,
    sink: Option<Arc<dyn LogSink>>,
) -> Result<Option<WorkerGuard>> {
    let filter = match cli.verbosity_filter() {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&config.logging.level))
            .context("Invalid logging.level filter")?,
    };

    let (file_layer, guard) = match &config.logging.file {
        Some(path) => {
            let (writer, guard) = tracing_appender::non_blocking(daily_appender(path));
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .with(file_layer)
        .with(sink.map(LogSinkLayer::new))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    Ok(guard)
}

fn daily_appender(path: &Path) -> tracing_appender::rolling::RollingFileAppender {
    let directory = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| "contact-relay.log".into());
    tracing_appender::rolling::daily(directory, file_name)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
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
                warn!("Failed to listen for SIGTERM: {}", e);
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
    info!("Shutdown signal received, draining connections");
}
