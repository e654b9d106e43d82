/*
[INPUT]:  CLI arguments, YAML configuration file, OS shutdown signals
[OUTPUT]: Formatted `data` payloads on stdout until shutdown or server close
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, startup flow, or shutdown handling
*/

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tickwire_adapter::{create_connection, ConnectionConfig, SocketError};
use tickwire_tail::{PayloadRenderer, TailConfig};

#[derive(Parser, Debug)]
#[command(name = "tickwire-tail", version, about = "Print formatted payloads from a JSON WebSocket feed")]
struct Cli {
    #[arg(long = "config", value_name = "PATH")]
    config_path: PathBuf,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    log_level: String,
    #[arg(long = "dry-run")]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    info!(
        config_path = %args.config_path.display(),
        dry_run = args.dry_run,
        "starting tickwire-tail"
    );

    let config = load_config(&args.config_path)?;
    info!(
        endpoint = %config.endpoint,
        fields = config.fields.len(),
        has_request = config.request.is_some(),
        "configuration loaded"
    );

    if args.dry_run {
        info!("dry-run requested; configuration validated");
        return Ok(());
    }

    let shutdown = CancellationToken::new();
    setup_signal_handlers(shutdown.clone());

    let renderer = PayloadRenderer::new(config.fields.clone(), config.format_options());
    let closed = shutdown.clone();
    let connect_failure = Arc::new(Mutex::new(None::<String>));
    let failure_slot = connect_failure.clone();
    let mut connection = ConnectionConfig::new(move |data| println!("{}", renderer.render(&data)))
        .on_open(|| info!("stream open"))
        .on_error(move |err| {
            warn!(error = %err, "stream error");
            if matches!(err, SocketError::Connect(_))
                && let Ok(mut slot) = failure_slot.lock()
            {
                *slot = Some(err.to_string());
            }
        })
        .on_close(move || closed.cancel());
    if let Some(request) = config.request {
        connection = connection.with_request_value(request);
    }

    let handle = create_connection(&config.endpoint, connection).context("create connection")?;

    shutdown.cancelled().await;
    info!("shutting down");

    handle.close();
    handle.closed().await;
    info!("stream closed");

    let failure = connect_failure.lock().ok().and_then(|mut slot| slot.take());
    if let Some(message) = failure {
        bail!("connect to {} failed: {message}", config.endpoint);
    }

    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn load_config(path: &PathBuf) -> Result<TailConfig> {
    let path_str = path
        .to_str()
        .context("config path must be valid utf-8")?;
    TailConfig::from_file(path_str).context("load config")
}

fn setup_signal_handlers(shutdown: CancellationToken) {
    let shutdown_clone = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "failed to install SIGINT handler");
            return;
        }
        info!("received SIGINT");
        shutdown_clone.cancel();
    });

    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let shutdown_clone = shutdown.clone();
        tokio::spawn(async move {
            match signal(SignalKind::terminate()) {
                Ok(mut stream) => {
                    stream.recv().await;
                    info!("received SIGTERM");
                    shutdown_clone.cancel();
                }
                Err(err) => {
                    warn!(error = %err, "failed to install SIGTERM handler");
                }
            }
        });
    }
}
