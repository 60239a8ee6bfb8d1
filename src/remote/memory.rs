//! In-process reference storage
//!
//! Behaves like a remote service: it issues references, checks tokens, and
//! can be made slow or unreachable per resource.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use super::{AuthToken, Reference, ReferenceStorage};
use crate::error::{PlannerError, PlannerResult};
use crate::models::DocumentKind;

/// Reference storage held entirely in memory
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    resources: Mutex<HashMap<Reference, HashMap<String, String>>>,
    accepted_tokens: HashSet<String>,
    delays: HashMap<String, Duration>,
    next_id: AtomicU64,
    offline: AtomicBool,
}

impl InMemoryStorage {
    /// A store that accepts exactly `token`
    pub fn new(token: &str) -> Self {
        let mut storage = Self::default();
        storage.accepted_tokens.insert(token.to_string());
        storage
    }

    /// Delay every save and read of the resource called `name`
    pub fn with_delay(mut self, name: &str, delay: Duration) -> Self {
        self.delays.insert(name.to_string(), delay);
        self
    }

    /// Number the next issued reference `n` (`gist{n}`)
    pub fn with_first_id(mut self, n: u64) -> Self {
        self.next_id = AtomicU64::new(n.saturating_sub(1));
        self
    }

    /// Make every call fail with a network error
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Put a resource in place directly, as if saved by another client
    pub fn insert(&self, reference: &Reference, name: &str, content: &str) {
        self.lock()
            .entry(reference.clone())
            .or_default()
            .insert(name.to_string(), content.to_string());
    }

    /// Content saved under `reference` and `name`, if any
    pub fn resource(&self, reference: &Reference, name: &str) -> Option<String> {
        self.lock()
            .get(reference)
            .and_then(|files| files.get(name).cloned())
    }

    /// Number of references issued so far
    pub fn saved_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Reference, HashMap<String, String>>> {
        self.resources
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn admit(&self, name: &str, token: &AuthToken) -> PlannerResult<()> {
        if let Some(delay) = self.delays.get(name) {
            tokio::time::sleep(*delay).await;
        }
        if self.offline.load(Ordering::SeqCst) {
            return Err(PlannerError::Network("remote storage unreachable".into()));
        }
        if token.is_blank() || !self.accepted_tokens.contains(token.expose()) {
            return Err(PlannerError::Auth("Bad credentials".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl ReferenceStorage for InMemoryStorage {
    fn service_name(&self) -> &str {
        "in-memory storage"
    }

    async fn save(
        &self,
        content: &str,
        name: &str,
        _description: &str,
        token: &AuthToken,
    ) -> PlannerResult<Reference> {
        self.admit(name, token).await?;

        if content.is_empty() {
            return Err(PlannerError::RemoteService(
                "contents can't be blank (422)".into(),
            ));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let reference = Reference::new(format!("gist{}", id));
        self.insert(&reference, name, content);
        Ok(reference)
    }

    async fn read(
        &self,
        reference: &Reference,
        kind: DocumentKind,
        token: &AuthToken,
    ) -> PlannerResult<String> {
        let name = kind.remote_file_name();
        self.admit(&name, token).await?;

        let files = self.lock();
        let files = files
            .get(reference)
            .ok_or_else(|| PlannerError::backup_not_found(reference.as_str()))?;
        files
            .get(&name)
            .cloned()
            .ok_or_else(|| PlannerError::backup_not_found(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_save_then_read() {
        let storage = InMemoryStorage::new("tok");
        let token = AuthToken::new("tok");

        let reference = storage
            .save("{\"persons\":[]}", "AddressBook.bak", "Address Book Backup", &token)
            .await
            .unwrap();
        assert_eq!(storage.saved_count(), 1);

        let text = storage
            .read(&reference, DocumentKind::AddressBook, &token)
            .await
            .unwrap();
        assert_eq!(text, "{\"persons\":[]}");

        let err = storage
            .read(&reference, DocumentKind::ExpenseBook, &token)
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_rejected_token_and_offline() {
        let storage = InMemoryStorage::new("tok");

        let err = storage
            .save("x", "AddressBook.bak", "", &AuthToken::new("wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, PlannerError::Auth(_)));

        storage.set_offline(true);
        let err = storage
            .save("x", "AddressBook.bak", "", &AuthToken::new("tok"))
            .await
            .unwrap_err();
        assert!(matches!(err, PlannerError::Network(_)));
        assert_eq!(storage.saved_count(), 0);
    }

    #[tokio::test]
    async fn test_unknown_reference_is_not_found() {
        let storage = InMemoryStorage::new("tok");
        let err = storage
            .read(&Reference::new("nope"), DocumentKind::AddressBook, &AuthToken::new("tok"))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
