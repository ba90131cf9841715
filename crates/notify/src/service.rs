//! Periodic driver for the [`ReconciliationEngine`].

use std::{
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use {
    chrono::{DateTime, Utc},
    tokio::{
        sync::Mutex,
        task::JoinHandle,
        time::{MissedTickBehavior, interval},
    },
    tokio_util::sync::CancellationToken,
    tracing::{debug, info, warn},
};

use crate::{
    engine::{ReconciliationEngine, TickReport},
    error::{Error, Result},
};

/// Snapshot of the scheduler state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceStatus {
    pub running: bool,
    pub ticks: u64,
    pub last_tick_at: Option<DateTime<Utc>>,
    /// Channels that currently have a notification.
    pub tracked: usize,
}

struct Worker {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Runs one reconcile pass immediately and then every `interval`.
///
/// Passes never overlap: the engine sits behind a mutex and the ticker
/// delays instead of bursting when a pass runs long.
pub struct ReconcileService {
    engine: Mutex<ReconciliationEngine>,
    interval: Duration,
    worker: Mutex<Option<Worker>>,
    ticks: AtomicU64,
    last_tick_at: std::sync::Mutex<Option<DateTime<Utc>>>,
}

impl ReconcileService {
    pub fn new(engine: ReconciliationEngine, interval: Duration) -> Arc<Self> {
        Arc::new(Self {
            engine: Mutex::new(engine),
            interval,
            worker: Mutex::new(None),
            ticks: AtomicU64::new(0),
            last_tick_at: std::sync::Mutex::new(None),
        })
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Spawn the timer loop.
    pub async fn start(self: &Arc<Self>) -> Result<()> {
        let mut worker = self.worker.lock().await;
        if worker.as_ref().is_some_and(|w| !w.handle.is_finished()) {
            return Err(Error::AlreadyRunning);
        }

        let cancel = CancellationToken::new();
        let svc = Arc::clone(self);
        let token = cancel.clone();
        let handle = tokio::spawn(async move {
            svc.timer_loop(token).await;
        });
        *worker = Some(Worker { cancel, handle });

        info!(interval_secs = self.interval.as_secs(), "reconcile service started");
        Ok(())
    }

    /// Stop the timer loop, waiting for an in-flight pass to finish.
    pub async fn stop(&self) {
        let Some(worker) = self.worker.lock().await.take() else {
            return;
        };
        worker.cancel.cancel();
        if let Err(e) = worker.handle.await {
            warn!(error = %e, "reconcile task ended abnormally");
        }
        info!("reconcile service stopped");
    }

    /// Run a single pass inline.
    pub async fn run_once(&self) -> TickReport {
        let report = self.engine.lock().await.reconcile().await;
        self.ticks.fetch_add(1, Ordering::Relaxed);
        *self
            .last_tick_at
            .lock()
            .unwrap_or_else(|e| e.into_inner()) = Some(report.started_at);
        report
    }

    pub async fn status(&self) -> ServiceStatus {
        let running = self
            .worker
            .lock()
            .await
            .as_ref()
            .is_some_and(|w| !w.handle.is_finished());
        let tracked = self.engine.lock().await.registry().len();
        ServiceStatus {
            running,
            ticks: self.ticks.load(Ordering::Relaxed),
            last_tick_at: *self.last_tick_at.lock().unwrap_or_else(|e| e.into_inner()),
            tracked,
        }
    }

    async fn timer_loop(&self, cancel: CancellationToken) {
        let mut ticker = interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    let report = self.run_once().await;
                    let failed = report.failures().count();
                    if failed > 0 {
                        warn!(failed, "reconcile pass had failures");
                    }
                },
            }
        }
        debug!("reconcile timer loop exited");
    }
}
