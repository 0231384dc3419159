//! Deferred ingestion: a bounded queue in front of a background worker.
//!
//! `submit` returns once the event is queued. The worker runs the normal
//! ingestion path later, so rejections and storage failures cannot reach the
//! client; they are logged and counted in [`IngestStats`] instead.

use crate::config::IngestConfig;
use crate::error::{EventError, EventResult};
use crate::models::CreateEvent;
use crate::repository::{EventRepository, SessionRepository};
use crate::service::IngestionService;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

#[derive(Debug, Default)]
pub struct IngestStats {
    accepted: AtomicU64,
    persisted: AtomicU64,
    rejected: AtomicU64,
    failed: AtomicU64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct IngestStatsSnapshot {
    pub accepted: u64,
    pub persisted: u64,
    pub rejected: u64,
    pub failed: u64,
}

impl IngestStats {
    pub fn snapshot(&self) -> IngestStatsSnapshot {
        IngestStatsSnapshot {
            accepted: self.accepted.load(Ordering::Relaxed),
            persisted: self.persisted.load(Ordering::Relaxed),
            rejected: self.rejected.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}

/// Sending half, cheap to clone into handler state.
#[derive(Clone)]
pub struct IngestQueue {
    tx: mpsc::Sender<CreateEvent>,
    stats: Arc<IngestStats>,
}

impl IngestQueue {
    /// Waits for room when the queue is full.
    pub async fn submit(&self, event: CreateEvent) -> EventResult<()> {
        self.tx
            .send(event)
            .await
            .map_err(|_| EventError::QueueClosed)?;
        self.stats.accepted.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub fn stats(&self) -> IngestStatsSnapshot {
        self.stats.snapshot()
    }
}

pub struct IngestWorker<R> {
    service: Arc<IngestionService<R>>,
    rx: mpsc::Receiver<CreateEvent>,
    max_in_flight: usize,
    stats: Arc<IngestStats>,
}

/// Creates a queue and the worker that drains it.
pub fn ingest_channel<R>(
    service: Arc<IngestionService<R>>,
    config: &IngestConfig,
) -> (IngestQueue, IngestWorker<R>) {
    let (tx, rx) = mpsc::channel(config.queue_capacity.max(1));
    let stats = Arc::new(IngestStats::default());

    let queue = IngestQueue {
        tx,
        stats: Arc::clone(&stats),
    };
    let worker = IngestWorker {
        service,
        rx,
        max_in_flight: config.max_in_flight.max(1),
        stats,
    };
    (queue, worker)
}

impl<R> IngestWorker<R>
where
    R: SessionRepository + EventRepository + 'static,
{
    /// Processes queued events until every [`IngestQueue`] is dropped or
    /// `shutdown` completes.
    ///
    /// On shutdown the queue stops accepting, and everything already queued
    /// or in flight is still processed before this returns.
    pub async fn run<F>(mut self, shutdown: F) -> IngestStatsSnapshot
    where
        F: Future<Output = ()> + Send,
    {
        let mut jobs = JoinSet::new();
        let mut closing = false;
        tokio::pin!(shutdown);

        info!(max_in_flight = self.max_in_flight, "Ingest worker started");

        loop {
            while jobs.len() >= self.max_in_flight {
                if let Some(result) = jobs.join_next().await {
                    log_join_result(result);
                }
            }

            tokio::select! {
                _ = &mut shutdown, if !closing => {
                    info!(queued = self.rx.len(), "Ingest worker draining");
                    self.rx.close();
                    closing = true;
                }
                received = self.rx.recv() => match received {
                    Some(event) => {
                        jobs.spawn(process(
                            Arc::clone(&self.service),
                            Arc::clone(&self.stats),
                            event,
                        ));
                    }
                    None => break,
                },
                Some(result) = jobs.join_next(), if !jobs.is_empty() => log_join_result(result),
            }
        }

        while let Some(result) = jobs.join_next().await {
            log_join_result(result);
        }

        let stats = self.stats.snapshot();
        info!(
            accepted = stats.accepted,
            persisted = stats.persisted,
            rejected = stats.rejected,
            failed = stats.failed,
            "Ingest worker stopped"
        );
        stats
    }
}

async fn process<R>(service: Arc<IngestionService<R>>, stats: Arc<IngestStats>, event: CreateEvent)
where
    R: SessionRepository + EventRepository,
{
    let session_id = event.session_id.clone();
    let category = event.category.clone();

    match service.ingest(event).await {
        Ok(stored) => {
            stats.persisted.fetch_add(1, Ordering::Relaxed);
            debug!(event_id = stored.id, %session_id, "Deferred event persisted");
        }
        Err(EventError::Validation(e)) => {
            stats.rejected.fetch_add(1, Ordering::Relaxed);
            warn!(%session_id, %category, rule = e.rule(), error = %e, "Deferred event rejected");
        }
        Err(EventError::InvalidInput(e)) => {
            stats.rejected.fetch_add(1, Ordering::Relaxed);
            warn!(%session_id, %category, error = %e, "Deferred event rejected");
        }
        Err(e) => {
            stats.failed.fetch_add(1, Ordering::Relaxed);
            error!(%session_id, %category, error = %e, "Deferred event could not be stored");
        }
    }
}

fn log_join_result(result: Result<(), tokio::task::JoinError>) {
    if let Err(e) = result {
        error!(error = %e, "Deferred ingest task panicked");
    }
}
