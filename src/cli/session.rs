//! Wiring of storage, preferences, the event bus and the orchestrator
//!
//! One `Session` serves either a single command or a whole `shell` run.

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use super::backup::{handle_backup_command, handle_restore_command};
use super::expense::handle_expense_command;
use super::history::{handle_redo_command, handle_undo_command};
use super::person::handle_person_command;
use super::Command;
use crate::backup::BackupOrchestrator;
use crate::config::{PlannerPaths, Preferences};
use crate::error::PlannerResult;
use crate::events::{EventBus, StoreEvent};
use crate::remote::{GistStorage, ReferenceStorage};
use crate::storage::Storage;

pub struct Session {
    storage: Storage,
    orchestrator: BackupOrchestrator,
    preferences: Rc<RefCell<Preferences>>,
    failures: Rc<Cell<usize>>,
}

impl Session {
    /// Open the planner data under `paths`, backed by GitHub Gists
    pub fn open(paths: PlannerPaths) -> PlannerResult<Self> {
        let preferences = Preferences::load(paths)?;
        let remote = &preferences.settings().remote;
        let gists = GistStorage::new(&remote.api_url, remote.timeout())?;
        Self::with_remote(preferences, Arc::new(gists))
    }

    /// Open with an explicit remote service
    pub fn with_remote(
        preferences: Preferences,
        remote: Arc<dyn ReferenceStorage>,
    ) -> PlannerResult<Self> {
        let bus = EventBus::new();

        let failures = Rc::new(Cell::new(0));
        let counter = Rc::clone(&failures);
        bus.subscribe(move |event| {
            if event.is_failure() {
                counter.set(counter.get() + 1);
            }
            report(event);
            Ok(())
        });

        let worker_threads = preferences.settings().remote.worker_threads;
        let paths = preferences.paths().clone();
        let preferences = Rc::new(RefCell::new(preferences));
        Preferences::attach(&preferences, &bus);

        let orchestrator = BackupOrchestrator::new(remote, bus.clone(), worker_threads)?;
        let storage = Storage::load(paths, bus)?;

        Ok(Self {
            storage,
            orchestrator,
            preferences,
            failures,
        })
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Failure events seen so far
    pub fn failures(&self) -> usize {
        self.failures.get()
    }

    /// Run one command
    pub fn execute(&mut self, command: Command) -> PlannerResult<()> {
        debug!(command = ?command, "Executing");
        match command {
            Command::Person(cmd) => handle_person_command(&mut self.storage, cmd),
            Command::Expense(cmd) => handle_expense_command(&mut self.storage, cmd),
            Command::Undo(args) => handle_undo_command(&mut self.storage, args),
            Command::Redo(args) => handle_redo_command(&mut self.storage, args),
            Command::Backup(args) => {
                // Cloned so subscribers can borrow the shared preferences
                let preferences = self.preferences.borrow().clone();
                handle_backup_command(&mut self.storage, &mut self.orchestrator, &preferences, args)
            }
            Command::Restore(args) => {
                let preferences = self.preferences.borrow().clone();
                handle_restore_command(&mut self.storage, &mut self.orchestrator, &preferences, args)
            }
        }
    }

    /// Apply finished remote work and save changed books, without blocking
    pub fn settle(&mut self) -> PlannerResult<()> {
        self.orchestrator.pump(&mut self.storage);
        self.storage.flush()?;
        Ok(())
    }

    /// Wait for outstanding remote work, then save changed books
    pub fn finish(&mut self) -> PlannerResult<()> {
        let timeout = self.remote_wait();
        let waited = self.orchestrator.wait_idle(&mut self.storage, timeout);
        self.storage.flush()?;
        waited
    }

    /// Enough for a request plus a follow-up download
    fn remote_wait(&self) -> Duration {
        self.preferences.borrow().settings().remote.timeout() * 2 + Duration::from_secs(1)
    }
}

/// Print an event for the user
fn report(event: &StoreEvent) {
    match event {
        StoreEvent::DocumentChanged { .. } => {}
        event if event.is_failure() => eprintln!("{}", event.message()),
        event => println!("{}", event.message()),
    }
}
