//! Persisted preferences that react to store events
//!
//! The stored reference for a book is written here and nowhere else, once a
//! remote save has been confirmed by a `BackupSucceeded` event.

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use tracing::info;

use super::paths::PlannerPaths;
use super::settings::Settings;
use crate::backup::BackupTarget;
use crate::error::PlannerResult;
use crate::events::{EventBus, StoreEvent};
use crate::models::DocumentKind;
use crate::remote::Reference;

/// Settings plus where they are saved
#[derive(Debug, Clone)]
pub struct Preferences {
    paths: PlannerPaths,
    settings: Settings,
}

impl Preferences {
    pub fn new(paths: PlannerPaths, settings: Settings) -> Self {
        Self { paths, settings }
    }

    /// Load from the settings file under `paths`
    pub fn load(paths: PlannerPaths) -> PlannerResult<Self> {
        let settings = Settings::load_or_create(&paths)?;
        Ok(Self::new(paths, settings))
    }

    pub fn paths(&self) -> &PlannerPaths {
        &self.paths
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn backup_path(&self, kind: DocumentKind) -> PathBuf {
        self.settings.backup_path(&self.paths, kind)
    }

    pub fn reference(&self, kind: DocumentKind) -> Option<Reference> {
        self.settings.reference(kind).cloned()
    }

    /// Target for restoring `kind` from its last online backup
    pub fn remote_target(&self, kind: DocumentKind) -> BackupTarget {
        BackupTarget::remote(kind, self.reference(kind))
    }

    /// Record the reference of a confirmed remote backup
    pub fn handle_event(&mut self, event: &StoreEvent) -> PlannerResult<()> {
        if let StoreEvent::BackupSucceeded {
            target,
            reference: Some(reference),
            ..
        } = event
        {
            info!(kind = %target.kind(), reference = %reference, "Storing backup reference");
            self.settings.set_reference(target.kind(), reference.clone());
            self.settings.save(&self.paths)?;
        }
        Ok(())
    }

    /// Subscribe shared preferences to `bus`
    pub fn attach(this: &Rc<RefCell<Self>>, bus: &EventBus) {
        let preferences = Rc::clone(this);
        bus.subscribe(move |event| preferences.borrow_mut().handle_event(event));
    }
}
