use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::writer::MakeWriterExt;

use whalewatch::WhalewatchError;
use whalewatch::alert::render_startup;
use whalewatch::config::{AppConfig, fetch_config};
use whalewatch::credentials::{CredentialKey, Keychain};
use whalewatch::market::WhalesClient;
use whalewatch::monitor::MarketMonitor;
use whalewatch::notify::{AlertSink, LogNotifier, Notifier, TelegramNotifier};

fn main() -> Result<(), WhalewatchError> {
    if std::env::args().nth(1).as_deref() == Some("--store-credentials") {
        return store_credentials();
    }

    let app_config = fetch_config(&Keychain)?;
    init_logging(app_config.log_file.as_deref())?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| WhalewatchError::Io(format!("failed to start runtime: {e}")))?;
    runtime.block_on(run(app_config))
}

async fn run(app_config: AppConfig) -> Result<(), WhalewatchError> {
    let shutdown = listen_for_shutdown();
    // Lets the listener install its handler before the first network call.
    tokio::task::yield_now().await;

    let source = WhalesClient::new(app_config.market.api_url.clone())?;
    let notifier = match &app_config.telegram.destination {
        Some(dest) => Notifier::Telegram(TelegramNotifier::new(
            &app_config.telegram.api_url,
            &dest.bot_token,
            &dest.chat_id,
        )?),
        None => {
            warn!("No Telegram destination configured; alerts go to the log");
            Notifier::Log(LogNotifier)
        }
    };

    let poll_interval = app_config.market.poll_interval;
    let startup = render_startup(&app_config.pairs, poll_interval.as_secs());
    if !notifier.send(&startup).await {
        warn!("Startup notification was not delivered");
    }

    let mut monitor = MarketMonitor::new(source, notifier, app_config.pairs);
    monitor.run(poll_interval, shutdown).await;

    Ok(())
}

/// Spawns the Ctrl-C listener; the returned flag turns `true` on the signal.
fn listen_for_shutdown() -> watch::Receiver<bool> {
    let (tx, rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown requested; finishing current cycle");
                let _ = tx.send(true);
            }
            Err(e) => {
                error!("Failed to listen for Ctrl-C: {e}");
                // Keep the sender so the monitor keeps running.
                std::future::pending::<()>().await
            }
        }
    });
    rx
}

/// Logs to stderr, and additionally to `log_file` when configured.
fn init_logging(log_file: Option<&Path>) -> Result<(), WhalewatchError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|e| {
                    WhalewatchError::Io(format!("failed to open {}: {e}", path.display()))
                })?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::io::stderr.and(Mutex::new(file)))
                .init();
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
        }
    }
    Ok(())
}

/// Copies the Telegram credentials from the environment into the keychain.
fn store_credentials() -> Result<(), WhalewatchError> {
    tracing_subscriber::fmt::init();
    for key in CredentialKey::ALL {
        match std::env::var(key.env_var()) {
            Ok(value) if !value.is_empty() => {
                Keychain.store(key, &value)?;
                info!(key = key.env_var(), "stored credential in keychain");
            }
            _ => warn!(key = key.env_var(), "not set; skipped"),
        }
    }
    Ok(())
}
