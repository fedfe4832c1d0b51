//! Wiring: the feed task, the two timers, and shutdown.
//!
//! Three schedules run concurrently and share only the [`TickerStore`] and
//! the [`RotationHandle`]:
//! - the supervised feed session (spawned task)
//! - the rotation timer, every `TOGGLE_RATE` seconds (spawned task)
//! - the presentation timer, every second (main task, owns the presenter)
//!
//! A `watch` channel carries the shutdown flag. `Ctrl-C`, a quit key in the
//! terminal UI, or a fatal feed error sets it; every loop observes it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::Result;
use crate::config::AppConfig;
use crate::error::TickerError;
use crate::feed::{FeedConnection, ReconnectSupervisor, stop_requested};
use crate::presentation::terminal::spawn_quit_listener;
use crate::presentation::{ConsolePresenter, PresentationTick, Presenter, TerminalPresenter};
use crate::rotation::{RotationHandle, SymbolRotator};
use crate::store::TickerStore;

/// Interval between redraws.
pub const PRESENT_INTERVAL: Duration = Duration::from_secs(1);

/// How the ticker is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayMode {
    /// Plain text on stdout.
    Text,
    /// Full-screen terminal UI.
    Graphical,
}

/// Runs the ticker until shutdown.
///
/// # Errors
///
/// Returns [`TickerError::Config`] for an invalid symbol list or toggle
/// rate, [`TickerError::Io`] if the presenter cannot take over the
/// output, or the feed's fatal error if the endpoint is unusable.
pub async fn run(config: AppConfig, mode: DisplayMode) -> Result<()> {
    let store = TickerStore::new();
    let rotation = RotationHandle::new(SymbolRotator::new(
        config.symbols.clone(),
        config.toggle_rate,
    )?);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let shutdown_tx = Arc::new(shutdown_tx);

    let mut quit_listener = None;
    let presenter: Box<dyn Presenter + Send> = match mode {
        DisplayMode::Text => Box::new(ConsolePresenter::stdout()?),
        DisplayMode::Graphical => {
            let presenter = TerminalPresenter::setup()?;
            quit_listener = Some(spawn_quit_listener(
                shutdown_tx.clone(),
                shutdown_rx.clone(),
            ));
            Box::new(presenter)
        }
    };

    spawn_signal_listener(shutdown_tx.clone());

    let feed = tokio::spawn({
        let config = config.clone();
        let store = store.clone();
        let shutdown_rx = shutdown_rx.clone();
        let shutdown_tx = shutdown_tx.clone();
        async move {
            let result = run_feed(&config, store, shutdown_rx).await;
            // A feed that gives up takes the display down with it.
            let _ = shutdown_tx.send(true);
            result
        }
    });

    let rotator = tokio::spawn(run_rotation(
        rotation.clone(),
        config.toggle_interval(),
        shutdown_rx.clone(),
    ));

    let mut tick = PresentationTick::new(store, rotation, presenter);
    run_presentation(&mut tick, PRESENT_INTERVAL, shutdown_rx).await;

    let _ = shutdown_tx.send(true);
    let finished = tick.finish();

    rotator
        .await
        .map_err(|e| TickerError::Task(e.to_string()))?;
    if let Some(listener) = quit_listener {
        listener
            .await
            .map_err(|e| TickerError::Task(e.to_string()))?;
    }
    feed.await.map_err(|e| TickerError::Task(e.to_string()))??;

    info!("Shut down cleanly");
    finished
}

/// Supervises feed sessions for every configured symbol, writing into `store`.
///
/// # Errors
///
/// Returns the first attempt's error if it is fatal (e.g. a malformed
/// endpoint).
pub async fn run_feed(
    config: &AppConfig,
    store: TickerStore,
    shutdown: watch::Receiver<bool>,
) -> Result<()> {
    let url = config.endpoint();
    let supervisor = ReconnectSupervisor::new(config.feed.reconnect_delay);

    supervisor
        .run_forever(
            |attempt| {
                let connection = FeedConnection::new(url.clone(), config.symbols.clone(), attempt)
                    .with_timeout(config.feed.timeout);
                let store = store.clone();
                let shutdown = shutdown.clone();
                async move { connection.run(move |snapshot| store.put(snapshot), shutdown).await }
            },
            shutdown.clone(),
        )
        .await
}

/// Advances the rotation every `every` until shutdown.
///
/// The first rotation happens one full interval after start.
pub async fn run_rotation(
    rotation: RotationHandle,
    every: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    interval.tick().await;

    loop {
        tokio::select! {
            _ = interval.tick() => {
                rotation.tick();
            }
            () = stop_requested(&mut shutdown) => break,
        }
    }
}

/// Redraws every `every` until shutdown. Presenter errors are logged.
pub async fn run_presentation(
    tick: &mut PresentationTick,
    every: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut interval = tokio::time::interval(every);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if let Err(e) = tick.tick() {
                    warn!(error = %e, "Failed to render ticker");
                }
            }
            () = stop_requested(&mut shutdown) => break,
        }
    }
}

/// Requests shutdown on `Ctrl-C`.
fn spawn_signal_listener(shutdown: Arc<watch::Sender<bool>>) {
    tokio::spawn(async move {
        tokio::select! {
            res = tokio::signal::ctrl_c() => {
                if let Err(e) = res {
                    warn!("Unable to listen for Ctrl-C: {e}");
                    return;
                }
                info!("Shutting down...");
                let _ = shutdown.send(true);
            }
            () = shutdown.closed() => {}
        }
    });
}
