//! Reference-based remote storage
//!
//! A remote store saves a named piece of text and hands back an opaque
//! `Reference`; later, the same reference plus a document kind fetches the
//! text again. Implementations hold no credentials of their own: the caller
//! supplies an `AuthToken` on every call.
//!
//! - `GistStorage`: GitHub Gists over HTTPS
//! - `InMemoryStorage`: an in-process service with the same failure modes,
//!   used to exercise the backup pipeline without a network

mod gist;
mod memory;
mod token;

pub use gist::GistStorage;
pub use memory::InMemoryStorage;
pub use token::AuthToken;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PlannerResult;
use crate::models::DocumentKind;

/// Opaque handle returned by a successful remote save
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reference(String);

impl Reference {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// A reference with no usable content
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A remote blob store addressed by references
///
/// Errors: `Auth` for a missing or rejected token, `Network` for transport
/// failures, `NotFound` when the reference or the document's sub-resource
/// does not exist, `RemoteService` for any other rejection.
#[async_trait]
pub trait ReferenceStorage: Send + Sync {
    /// Human-readable name of the service
    fn service_name(&self) -> &str;

    /// Save `content` under `name` and return a reference to it
    async fn save(
        &self,
        content: &str,
        name: &str,
        description: &str,
        token: &AuthToken,
    ) -> PlannerResult<Reference>;

    /// Fetch the sub-resource for `kind` stored under `reference`
    async fn read(
        &self,
        reference: &Reference,
        kind: DocumentKind,
        token: &AuthToken,
    ) -> PlannerResult<String>;
}
