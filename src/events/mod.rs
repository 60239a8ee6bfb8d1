//! Notification channel between the store, the backup orchestrator and
//! whatever is listening (console output, preferences).
//!
//! The bus is an explicit object handed to each component at construction;
//! there is no global instance.

mod bus;
mod event;

pub use bus::{EventBus, Subscriber};
pub use event::{ChangeKind, StoreEvent};
