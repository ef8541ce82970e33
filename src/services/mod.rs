//! Service layer for the watcher application.
//!
//! This module contains the outward-facing adapters:
//! - Content retrieval (`HttpFetcher`)
//! - Change notification (`TelegramNotifier`)

mod fetcher;
mod notifier;

pub use fetcher::{Fetcher, HttpFetcher};
pub use notifier::{Notifier, TelegramCredentials, TelegramNotifier};
