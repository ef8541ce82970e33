// src/pipeline/run.rs

//! Run orchestration.
//!
//! One run walks the configured resources in order, collects change
//! events, and dispatches at most one aggregate notification. Failures
//! are contained per resource or per step: a dead host or a rejected
//! notification never fails the run, so an external scheduler only sees
//! success.

use crate::models::{ChangeEvent, Config, TrackedResource};
use crate::pipeline::ChangeDetector;
use crate::services::{Fetcher, Notifier};
use crate::storage::StateStore;

/// Outcome of the notification step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// Delivery confirmed by the notification API
    Sent,
    /// Transport error or API did not confirm delivery
    Failed,
    /// No notifier configured (missing credentials)
    Skipped,
    /// No changes detected, nothing to send
    NotNeeded,
}

/// Summary of one watcher run.
#[derive(Debug)]
pub struct RunSummary {
    /// Resources processed successfully
    pub checked: usize,
    /// Change events collected, in configured order
    pub changes: Vec<ChangeEvent>,
    /// Resources that failed fetch or state I/O
    pub failed: usize,
    /// What happened to the aggregate notification
    pub notified: NotifyOutcome,
}

impl RunSummary {
    /// Exit status for an external scheduler. Always success: partial
    /// failures and notification problems are reported in the log only.
    pub fn exit_status(&self) -> i32 {
        0
    }
}

/// Build the aggregate notification message.
///
/// One bullet per changed resource, in configured order, with the
/// Last-Modified hint when the server provided one.
pub fn build_message(subject: &str, changes: &[ChangeEvent]) -> String {
    let mut lines = Vec::with_capacity(changes.len() + 1);
    lines.push(subject.to_string());

    for change in changes {
        match &change.last_modified {
            Some(lm) => lines.push(format!("• {} (Last-Modified: {})", change.url, lm)),
            None => lines.push(format!("• {}", change.url)),
        }
    }

    lines.join("\n")
}

/// Process every tracked resource once and notify on changes.
pub async fn run_once(
    config: &Config,
    fetcher: &dyn Fetcher,
    store: &dyn StateStore,
    notifier: Option<&dyn Notifier>,
) -> RunSummary {
    let resources: Vec<TrackedResource> = config.tracked_resources();
    let detector = ChangeDetector::new(fetcher, store);

    let mut checked = 0;
    let mut failed = 0;
    let mut changes = Vec::new();

    for resource in &resources {
        match detector.detect(resource).await {
            Ok((record, event)) => {
                checked += 1;
                log::debug!(
                    "Checked {} ({} bytes, digest {})",
                    resource.url,
                    record.size_bytes,
                    &record.sha256[..12.min(record.sha256.len())]
                );

                if let Some(event) = event {
                    if event.is_first_observation() {
                        log::info!("First observation of {}", resource.url);
                    } else {
                        log::info!("Change detected at {}", resource.url);
                    }
                    changes.push(event);
                }
            }
            Err(e) => {
                failed += 1;
                log::error!("Failed to check {}: {}", resource.url, e);
            }
        }
    }

    let notified = if changes.is_empty() {
        log::info!("No changes detected across {checked} resources.");
        NotifyOutcome::NotNeeded
    } else {
        let message = build_message(&config.notify.subject, &changes);
        log::info!("{message}");
        dispatch(notifier, &message).await
    };

    RunSummary {
        checked,
        changes,
        failed,
        notified,
    }
}

/// Send the aggregate message, containing delivery problems to the log.
async fn dispatch(notifier: Option<&dyn Notifier>, message: &str) -> NotifyOutcome {
    let Some(notifier) = notifier else {
        log::warn!("Notification credentials not set; skipping notify.");
        return NotifyOutcome::Skipped;
    };

    match notifier.notify(message).await {
        Ok(true) => {
            log::info!("Notification delivered.");
            NotifyOutcome::Sent
        }
        Ok(false) => NotifyOutcome::Failed,
        Err(e) => {
            log::error!("Notification delivery failed: {e}");
            NotifyOutcome::Failed
        }
    }
}
