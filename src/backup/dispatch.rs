//! Completion queue between worker units and the primary context
//!
//! Workers only ever post here. The orchestrator drains the queue on the
//! primary context, which is the only place store state and events change.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::time::Duration;

use tracing::debug;

use super::request::{Operation, RequestId};
use crate::error::{PlannerError, PlannerResult};
use crate::models::DocumentSnapshot;
use crate::remote::Reference;

/// Result of one finished unit of work
#[derive(Debug)]
pub(crate) enum Outcome {
    Saved(PlannerResult<Reference>),
    Fetched(PlannerResult<DocumentSnapshot>),
}

impl Outcome {
    pub(crate) fn failure(operation: Operation, error: PlannerError) -> Self {
        match operation {
            Operation::Backup => Outcome::Saved(Err(error)),
            Operation::Restore => Outcome::Fetched(Err(error)),
        }
    }

    pub(crate) fn is_success(&self) -> bool {
        match self {
            Outcome::Saved(result) => result.is_ok(),
            Outcome::Fetched(result) => result.is_ok(),
        }
    }
}

/// Message posted by a worker
#[derive(Debug)]
pub(crate) enum Completion {
    Started(RequestId),
    Finished { id: RequestId, outcome: Outcome },
}

/// Worker-side handle; cheap to clone into each unit
#[derive(Debug, Clone)]
pub(crate) struct CompletionSender(Sender<Completion>);

impl CompletionSender {
    pub(crate) fn post(&self, completion: Completion) {
        if self.0.send(completion).is_err() {
            debug!("Completion dropped: orchestrator is gone");
        }
    }
}

/// Primary-side end of the queue
#[derive(Debug)]
pub(crate) struct CompletionQueue {
    sender: Sender<Completion>,
    receiver: Receiver<Completion>,
}

impl CompletionQueue {
    pub(crate) fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    pub(crate) fn sender(&self) -> CompletionSender {
        CompletionSender(self.sender.clone())
    }

    /// Next completion if one is waiting
    pub(crate) fn try_next(&self) -> Option<Completion> {
        match self.receiver.try_recv() {
            Ok(completion) => Some(completion),
            // The queue holds its own sender, so it never disconnects
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }

    /// Block up to `timeout` for the next completion
    pub(crate) fn next_within(&self, timeout: Duration) -> Option<Completion> {
        match self.receiver.recv_timeout(timeout) {
            Ok(completion) => Some(completion),
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => None,
        }
    }
}
