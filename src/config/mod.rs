//! Configuration module for the planner
//!
//! This module provides configuration management including:
//! - Platform path resolution
//! - User settings persistence
//! - Preferences updated from store events

pub mod paths;
pub mod preferences;
pub mod settings;

pub use paths::PlannerPaths;
pub use preferences::Preferences;
pub use settings::{RemoteSettings, Settings};
