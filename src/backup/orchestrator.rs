//! Backup/restore orchestration
//!
//! Local operations run synchronously on the caller's context and return
//! their error directly. Remote operations are validated synchronously,
//! then run as independent units on a small tokio worker pool; their
//! outcomes come back through the completion queue and are applied (store
//! resets, events) only when the primary context calls `pump` or
//! `wait_idle`.

use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info, warn};

use super::dispatch::{Completion, CompletionQueue, Outcome};
use super::local;
use super::request::{Operation, RequestId, RequestLedger, RequestState, RestoreTracker};
use super::target::BackupTarget;
use crate::error::{PlannerError, PlannerResult};
use crate::events::{EventBus, StoreEvent};
use crate::models::{DocumentKind, DocumentSnapshot};
use crate::remote::{AuthToken, Reference, ReferenceStorage};
use crate::storage::Storage;

/// Per-document results of a synchronous multi-document operation
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: Vec<DocumentKind>,
    pub failed: Vec<(DocumentKind, PlannerError)>,
}

impl BatchReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Coordinates backups and restores of the stores in a `Storage`
pub struct BackupOrchestrator {
    runtime: Runtime,
    remote: Arc<dyn ReferenceStorage>,
    bus: EventBus,
    queue: CompletionQueue,
    ledger: RequestLedger,
    trackers: Vec<RestoreTracker>,
}

impl BackupOrchestrator {
    /// Start the worker pool
    pub fn new(
        remote: Arc<dyn ReferenceStorage>,
        bus: EventBus,
        worker_threads: usize,
    ) -> PlannerResult<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(worker_threads.max(1))
            .thread_name("backup-worker")
            .enable_all()
            .build()
            .map_err(|e| PlannerError::Config(format!("Failed to start backup workers: {}", e)))?;

        debug!(worker_threads, service = remote.service_name(), "Backup workers started");

        Ok(Self {
            runtime,
            remote,
            bus,
            queue: CompletionQueue::new(),
            ledger: RequestLedger::new(),
            trackers: Vec::new(),
        })
    }

    /// Name of the remote service in use
    pub fn service_name(&self) -> &str {
        self.remote.service_name()
    }

    // ------------------------------------------------------------------
    // Local
    // ------------------------------------------------------------------

    /// Write `snapshot` to `path`, replacing any previous backup
    pub fn backup_local(&self, snapshot: &DocumentSnapshot, path: &Path) -> PlannerResult<()> {
        let target = BackupTarget::local(snapshot.kind(), path);
        local::write_backup(&target, snapshot)?;

        self.bus.publish(StoreEvent::BackupSucceeded {
            request: None,
            target,
            reference: None,
        });
        Ok(())
    }

    /// Replace the `kind` history with the backup at `path`
    ///
    /// Returns the number of entries restored.
    pub fn restore_local(
        &self,
        storage: &mut Storage,
        kind: DocumentKind,
        path: &Path,
    ) -> PlannerResult<usize> {
        let target = BackupTarget::local(kind, path);
        let snapshot = local::read_backup(&target)?;
        let entries = snapshot.entry_count();

        storage.reset(snapshot);
        info!(kind = %kind, path = %path.display(), entries, "Restored local backup");

        self.bus.publish(StoreEvent::RestoreSucceeded {
            request: None,
            target,
            entries,
        });
        Ok(entries)
    }

    /// Back up each target's book, independently
    ///
    /// Failures are published as `BackupFailed` and do not stop the others.
    pub fn backup_all_local(&self, storage: &Storage, targets: &[BackupTarget]) -> BatchReport {
        let mut report = BatchReport::default();

        for target in targets {
            let snapshot = storage.snapshot(target.kind());
            match local::write_backup(target, &snapshot) {
                Ok(()) => {
                    report.succeeded.push(target.kind());
                    self.bus.publish(StoreEvent::BackupSucceeded {
                        request: None,
                        target: target.clone(),
                        reference: None,
                    });
                }
                Err(error) => {
                    report.failed.push((target.kind(), error.clone()));
                    self.bus.publish(StoreEvent::BackupFailed {
                        request: None,
                        target: target.clone(),
                        error,
                    });
                }
            }
        }

        report
    }

    /// Restore each target's book, independently
    ///
    /// Publishes `RestoreComplete` when every target restored. Books that did
    /// restore stay restored when another fails.
    pub fn restore_all_local(&self, storage: &mut Storage, targets: &[BackupTarget]) -> BatchReport {
        let mut report = BatchReport::default();

        for target in targets {
            match local::read_backup(target) {
                Ok(snapshot) => {
                    let entries = snapshot.entry_count();
                    storage.reset(snapshot);
                    report.succeeded.push(target.kind());
                    self.bus.publish(StoreEvent::RestoreSucceeded {
                        request: None,
                        target: target.clone(),
                        entries,
                    });
                }
                Err(error) => {
                    report.failed.push((target.kind(), error.clone()));
                    self.bus.publish(StoreEvent::RestoreFailed {
                        request: None,
                        target: target.clone(),
                        error,
                    });
                }
            }
        }

        if !targets.is_empty() && report.is_complete() {
            self.bus.publish(StoreEvent::RestoreComplete {
                documents: targets.len(),
            });
        }
        report
    }

    // ------------------------------------------------------------------
    // Remote
    // ------------------------------------------------------------------

    /// Submit a remote backup of `snapshot`
    ///
    /// Only validation errors are returned; everything after submission is
    /// reported as a `BackupSucceeded` or `BackupFailed` event.
    pub fn backup_remote(
        &mut self,
        snapshot: DocumentSnapshot,
        token: &AuthToken,
    ) -> PlannerResult<RequestId> {
        require_token(token)?;

        let kind = snapshot.kind();
        let id = self
            .ledger
            .submit(BackupTarget::remote(kind, None), Operation::Backup);
        info!(request = %id, kind = %kind, "Submitting remote backup");

        let remote = Arc::clone(&self.remote);
        let token = token.clone();
        self.spawn_unit(id, Operation::Backup, async move {
            let saved: PlannerResult<Reference> = async {
                let content = snapshot.to_text()?;
                remote
                    .save(
                        &content,
                        &kind.remote_file_name(),
                        &kind.remote_description(),
                        &token,
                    )
                    .await
            }
            .await;
            Outcome::Saved(saved)
        });

        Ok(id)
    }

    /// Submit a restore from the reference held by `target`
    pub fn restore_remote(
        &mut self,
        target: &BackupTarget,
        token: &AuthToken,
    ) -> PlannerResult<RequestId> {
        require_token(token)?;
        let reference = target.required_reference()?.clone();
        Ok(self.submit_restore(target.clone(), reference, token))
    }

    /// Submit one remote backup per kind
    pub fn backup_all_remote(
        &mut self,
        storage: &Storage,
        kinds: &[DocumentKind],
        token: &AuthToken,
    ) -> PlannerResult<Vec<RequestId>> {
        require_token(token)?;

        let mut ids = Vec::with_capacity(kinds.len());
        for kind in kinds {
            ids.push(self.backup_remote(storage.snapshot(*kind), token)?);
        }
        Ok(ids)
    }

    /// Submit one remote restore per target and track them as a batch
    ///
    /// Every target is validated before anything is submitted.
    pub fn restore_all_remote(
        &mut self,
        targets: &[BackupTarget],
        token: &AuthToken,
    ) -> PlannerResult<Vec<RequestId>> {
        require_token(token)?;
        let references = targets
            .iter()
            .map(|target| target.required_reference().cloned())
            .collect::<PlannerResult<Vec<_>>>()?;

        let mut ids = Vec::with_capacity(targets.len());
        for (target, reference) in targets.iter().zip(references) {
            ids.push(self.submit_restore(target.clone(), reference, token));
        }

        if !ids.is_empty() {
            self.trackers.push(RestoreTracker::new(ids.iter().copied()));
        }
        Ok(ids)
    }

    fn submit_restore(
        &mut self,
        target: BackupTarget,
        reference: Reference,
        token: &AuthToken,
    ) -> RequestId {
        let kind = target.kind();
        let id = self.ledger.submit(target, Operation::Restore);
        info!(request = %id, kind = %kind, reference = %reference, "Submitting remote restore");

        let remote = Arc::clone(&self.remote);
        let token = token.clone();
        self.spawn_unit(id, Operation::Restore, async move {
            let fetched: PlannerResult<DocumentSnapshot> = async {
                let text = remote.read(&reference, kind, &token).await?;
                DocumentSnapshot::from_text(kind, &text)
            }
            .await;
            Outcome::Fetched(fetched)
        });

        id
    }

    /// Run `unit` on the pool; a panic becomes a failed outcome
    fn spawn_unit<F>(&self, id: RequestId, operation: Operation, unit: F)
    where
        F: Future<Output = Outcome> + Send + 'static,
    {
        let sender = self.queue.sender();
        let started = sender.clone();

        let work = self.runtime.spawn(async move {
            started.post(Completion::Started(id));
            unit.await
        });

        self.runtime.spawn(async move {
            let outcome = match work.await {
                Ok(outcome) => outcome,
                Err(e) => {
                    warn!(request = %id, error = %e, "Backup worker unit aborted");
                    Outcome::failure(
                        operation,
                        PlannerError::Worker(format!("Background task failed: {}", e)),
                    )
                }
            };
            sender.post(Completion::Finished { id, outcome });
        });
    }

    // ------------------------------------------------------------------
    // Completion handling (primary context)
    // ------------------------------------------------------------------

    /// Apply every completion already waiting, without blocking
    ///
    /// Returns the number of requests that settled.
    pub fn pump(&mut self, storage: &mut Storage) -> usize {
        let mut settled = 0;
        while let Some(completion) = self.queue.try_next() {
            if self.apply(storage, completion) {
                settled += 1;
            }
        }
        settled
    }

    /// Block until no request is in flight, or `timeout` passes
    pub fn wait_idle(&mut self, storage: &mut Storage, timeout: Duration) -> PlannerResult<()> {
        let deadline = Instant::now() + timeout;
        self.pump(storage);

        while self.ledger.in_flight() > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(PlannerError::Network(format!(
                    "Timed out waiting for {} remote request(s)",
                    self.ledger.in_flight()
                )));
            }
            if let Some(completion) = self.queue.next_within(remaining) {
                self.apply(storage, completion);
            }
        }
        Ok(())
    }

    /// State of a request; `None` once it has aged out of the settled history
    pub fn status(&self, id: RequestId) -> Option<RequestState> {
        self.ledger.state(id)
    }

    /// Requests submitted but not yet settled
    pub fn in_flight(&self) -> usize {
        self.ledger.in_flight()
    }

    fn apply(&mut self, storage: &mut Storage, completion: Completion) -> bool {
        let (id, outcome) = match completion {
            Completion::Started(id) => {
                if self.ledger.mark_running(id) {
                    debug!(request = %id, "Request running");
                }
                return false;
            }
            Completion::Finished { id, outcome } => (id, outcome),
        };

        let Some(record) = self.ledger.finish(id, outcome.is_success()) else {
            warn!(request = %id, "Ignoring completion for unknown or settled request");
            return false;
        };
        let target = record.target;

        match outcome {
            Outcome::Saved(Ok(reference)) => {
                info!(request = %id, kind = %target.kind(), reference = %reference, "Remote backup saved");
                self.bus.publish(StoreEvent::BackupSucceeded {
                    request: Some(id),
                    target,
                    reference: Some(reference),
                });
            }
            Outcome::Saved(Err(error)) => {
                warn!(request = %id, kind = %target.kind(), error = %error, "Remote backup failed");
                self.bus.publish(StoreEvent::BackupFailed {
                    request: Some(id),
                    target,
                    error,
                });
            }
            Outcome::Fetched(Ok(snapshot)) => {
                let entries = snapshot.entry_count();
                storage.reset(snapshot);
                info!(request = %id, kind = %target.kind(), entries, "Remote restore applied");
                self.bus.publish(StoreEvent::RestoreSucceeded {
                    request: Some(id),
                    target,
                    entries,
                });
                self.record_restore(id, true);
            }
            Outcome::Fetched(Err(error)) => {
                warn!(request = %id, kind = %target.kind(), error = %error, "Remote restore failed");
                self.bus.publish(StoreEvent::RestoreFailed {
                    request: Some(id),
                    target,
                    error,
                });
                self.record_restore(id, false);
            }
        }
        true
    }

    fn record_restore(&mut self, id: RequestId, succeeded: bool) {
        let Some(index) = self.trackers.iter().position(|t| t.tracks(id)) else {
            return;
        };

        if let Some(documents) = self.trackers[index].record(id, succeeded) {
            info!(documents, "Data restore successful");
            self.bus.publish(StoreEvent::RestoreComplete { documents });
        }
        if self.trackers[index].is_settled() {
            self.trackers.remove(index);
        }
    }
}

fn require_token(token: &AuthToken) -> PlannerResult<()> {
    if token.is_blank() {
        return Err(PlannerError::Validation(
            "A GitHub personal access token is required".into(),
        ));
    }
    Ok(())
}
