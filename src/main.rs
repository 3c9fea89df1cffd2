//! BACCSIM — Baccarat pattern-strategy simulation engine
//!
//! Entry point. Loads configuration, initialises structured logging,
//! spawns the driver API, and runs the tick loop with graceful shutdown.

use anyhow::Result;
use std::time::Duration;
use tracing::{debug, info, warn};

use baccsim::config::AppConfig;
use baccsim::engine::{Session, TickReport};
use baccsim::server;
use baccsim::server::routes::AppState;

const BANNER: &str = r#"
 ____    _    ____ ____ ____ ___ __  __
| __ )  / \  / ___/ ___/ ___|_ _|  \/  |
|  _ \ / _ \| |  | |   \___ \| || |\/| |
| |_) / ___ \ |__| |___ ___) | || |  | |
|____/_/   \_\____\____|____/___|_|  |_|

  Baccarat Pattern-Strategy Simulator
  v0.1.0
"#;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (non-fatal if missing)
    let _ = dotenv::dotenv();

    // Load configuration from TOML
    let cfg = AppConfig::load("config.toml")?;

    // Initialise structured logging
    init_logging();

    // Print startup banner
    println!("{BANNER}");
    info!(
        initial_bankroll = cfg.session.initial_bankroll,
        initial_bet = cfg.session.initial_bet,
        tick_interval_ms = cfg.session.tick_interval_ms,
        strategy_enabled = cfg.session.strategy_enabled,
        "BACCSIM starting up"
    );

    // -- Session and driver surface ---------------------------------------

    let state = AppState::new(Session::new(cfg.session.clone()));

    if cfg.server.enabled {
        server::spawn_server(state.clone(), cfg.server.port);
    } else {
        // Headless runs still simulate; start immediately.
        state.session.write().await.start();
    }

    // -- Tick loop ---------------------------------------------------------

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    info!("Entering tick loop. Press Ctrl+C to stop.");

    loop {
        // Re-read both each pass so apply_config and pause take effect on
        // the next tick without rebuilding the loop.
        let (running, interval_ms) = {
            let session = state.session.read().await;
            (session.is_running(), session.config().tick_interval_ms)
        };

        // Paused: no timer is armed; park until start() signals or we
        // shut down.
        if !running {
            tokio::select! {
                _ = state.wake.notified() => continue,
                _ = &mut shutdown => {
                    info!("Shutdown signal received.");
                    break;
                }
            }
        }

        tokio::select! {
            _ = tokio::time::sleep(Duration::from_millis(interval_ms)) => {
                let mut guard = state.session.write().await;
                // Pause may have landed while the timer was pending.
                if !guard.is_running() {
                    continue;
                }
                let report = guard.tick();
                let snapshot = guard.snapshot();
                drop(guard);

                log_tick(&report);
                debug!(%snapshot, "Tick complete");
            }
            _ = &mut shutdown => {
                info!("Shutdown signal received.");
                break;
            }
        }
    }

    let snapshot = state.session.read().await.snapshot();
    info!(
        bankroll = snapshot.bankroll,
        profit = snapshot.profit,
        rounds = snapshot.rounds_played,
        wins = snapshot.wins,
        losses = snapshot.losses,
        "BACCSIM shut down cleanly."
    );

    Ok(())
}

/// Log a human-readable tick summary.
fn log_tick(report: &TickReport) {
    info!(
        round = %report.round,
        check_passed = report.check_passed,
        settlement = ?report.settlement,
        "Round played"
    );
    if report.depleted {
        warn!("Bankroll depleted — session was reset and paused");
    }
}

/// Initialise the `tracing` subscriber.
fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("baccsim=info"));

    let json_logging = std::env::var("BACCSIM_LOG_JSON").is_ok();

    if json_logging {
        fmt()
            .json()
            .with_env_filter(env_filter)
            .with_target(true)
            .with_thread_ids(true)
            .init();
    } else {
        fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .init();
    }
}
