// src/models/mod.rs

//! Domain models for the watcher application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

mod config;
mod resource;

// Re-export all public types
pub use config::{Config, NotifyConfig, WatcherConfig};
pub use resource::{ChangeEvent, FetchResult, ResourceRecord, TrackedResource};
