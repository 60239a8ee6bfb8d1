//! Remote request identity and lifecycle
//!
//! Every remote backup or restore gets a `RequestId` on submission and moves
//! `Submitted -> Running -> Succeeded | Failed`. Terminal states are final:
//! a request reports exactly one outcome.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use super::target::BackupTarget;

/// Identifier of one submitted remote operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Backup,
    Restore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    Submitted,
    Running,
    Succeeded,
    Failed,
}

impl RequestState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestState::Succeeded | RequestState::Failed)
    }
}

/// One tracked request
#[derive(Debug, Clone)]
pub struct RequestRecord {
    pub target: BackupTarget,
    pub operation: Operation,
    pub state: RequestState,
}

/// Settled requests whose state is still answerable
pub const SETTLED_HISTORY: usize = 64;

/// Requests submitted through one orchestrator
///
/// In-flight requests are always kept. Only the most recent
/// `SETTLED_HISTORY` settled ones are remembered; older ids report no state.
#[derive(Debug, Default)]
pub struct RequestLedger {
    next_id: u64,
    records: HashMap<RequestId, RequestRecord>,
    settled: VecDeque<RequestId>,
}

impl RequestLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a request and return its id
    pub fn submit(&mut self, target: BackupTarget, operation: Operation) -> RequestId {
        self.next_id += 1;
        let id = RequestId(self.next_id);
        self.records.insert(
            id,
            RequestRecord {
                target,
                operation,
                state: RequestState::Submitted,
            },
        );
        id
    }

    /// Move a submitted request to running; false if it was not submitted
    pub fn mark_running(&mut self, id: RequestId) -> bool {
        match self.records.get_mut(&id) {
            Some(record) if record.state == RequestState::Submitted => {
                record.state = RequestState::Running;
                true
            }
            _ => false,
        }
    }

    /// Settle a request; `None` if it is unknown or already settled
    pub fn finish(&mut self, id: RequestId, succeeded: bool) -> Option<RequestRecord> {
        let record = self.records.get_mut(&id)?;
        if record.state.is_terminal() {
            return None;
        }
        record.state = if succeeded {
            RequestState::Succeeded
        } else {
            RequestState::Failed
        };
        let settled = record.clone();

        self.settled.push_back(id);
        while self.settled.len() > SETTLED_HISTORY {
            if let Some(oldest) = self.settled.pop_front() {
                self.records.remove(&oldest);
            }
        }
        Some(settled)
    }

    pub fn state(&self, id: RequestId) -> Option<RequestState> {
        self.records.get(&id).map(|r| r.state)
    }

    /// Requests that have not settled yet
    pub fn in_flight(&self) -> usize {
        self.records
            .values()
            .filter(|r| !r.state.is_terminal())
            .count()
    }
}

/// Counts the restores of one multi-document batch
///
/// Completion is reported once, when every request in the batch succeeded.
/// A batch with any failure never completes, and the documents that did
/// come back stay restored.
#[derive(Debug)]
pub struct RestoreTracker {
    pending: HashSet<RequestId>,
    expected: usize,
    succeeded: usize,
}

impl RestoreTracker {
    pub fn new(requests: impl IntoIterator<Item = RequestId>) -> Self {
        let pending: HashSet<RequestId> = requests.into_iter().collect();
        Self {
            expected: pending.len(),
            pending,
            succeeded: 0,
        }
    }

    pub fn tracks(&self, id: RequestId) -> bool {
        self.pending.contains(&id)
    }

    /// Record an outcome; returns the document count when the batch completes
    pub fn record(&mut self, id: RequestId, succeeded: bool) -> Option<usize> {
        if !self.pending.remove(&id) {
            return None;
        }
        if succeeded {
            self.succeeded += 1;
        }
        (self.pending.is_empty() && self.succeeded == self.expected).then_some(self.expected)
    }

    /// Every request has reported, successfully or not
    pub fn is_settled(&self) -> bool {
        self.pending.is_empty()
    }
}
