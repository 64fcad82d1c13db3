//! Registry of per-component health status

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

/// Status value meaning "healthy". Anything else counts as unhealthy.
pub const HEALTH_OK: &str = "ok";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthEntry {
    pub name: String,
    pub status: String,
    pub reason: Option<String>,
}

impl HealthEntry {
    pub fn new(name: impl Into<String>, status: impl Into<String>, reason: Option<String>) -> Self {
        Self {
            name: name.into(),
            status: status.into(),
            reason,
        }
    }

    pub fn ok(name: impl Into<String>) -> Self {
        Self::new(name, HEALTH_OK, None)
    }

    pub fn error(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(name, "error", Some(reason.into()))
    }

    pub fn is_ok(&self) -> bool {
        self.status == HEALTH_OK
    }
}

/// Point-in-time view served by the health endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub healthy: bool,
    pub status: Vec<HealthEntry>,
}

/// Ordered set of component statuses, one entry per name.
///
/// Clones share the same entries. Entries keep the order in which their
/// names were first pushed; pushing an existing name replaces the whole
/// entry in place.
#[derive(Debug, Clone, Default)]
pub struct HealthRegistry {
    entries: Arc<RwLock<Vec<HealthEntry>>>,
}

impl HealthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces the entry for `name`. An update without a reason
    /// clears any previous one.
    pub fn push_health(&self, name: impl Into<String>, status: impl Into<String>, reason: Option<&str>) {
        self.push(HealthEntry::new(name, status, reason.map(str::to_string)));
    }

    pub fn push(&self, entry: HealthEntry) {
        if entry.is_ok() {
            debug!(target: "health", "{} is {}", entry.name, entry.status);
        } else {
            warn!(
                target: "health",
                "{} is {}: {}",
                entry.name,
                entry.status,
                entry.reason.as_deref().unwrap_or("no reason given")
            );
        }

        let mut entries = self.entries.write();
        match entries.iter_mut().find(|existing| existing.name == entry.name) {
            Some(existing) => *existing = entry,
            None => entries.push(entry),
        }
    }

    /// True when every entry reports `"ok"`, including when there are none.
    pub fn is_healthy(&self) -> bool {
        self.entries.read().iter().all(HealthEntry::is_ok)
    }

    /// Copy of all entries in insertion order.
    pub fn get_health(&self) -> Vec<HealthEntry> {
        self.entries.read().clone()
    }

    pub fn clear_health(&self) {
        self.entries.write().clear();
    }

    pub fn get(&self, name: &str) -> Option<HealthEntry> {
        self.entries
            .read()
            .iter()
            .find(|entry| entry.name == name)
            .cloned()
    }

    pub fn unhealthy(&self) -> Vec<HealthEntry> {
        self.entries
            .read()
            .iter()
            .filter(|entry| !entry.is_ok())
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Health flag and entries read under one lock, so they always agree.
    pub fn report(&self) -> HealthReport {
        let entries = self.entries.read();
        HealthReport {
            healthy: entries.iter().all(HealthEntry::is_ok),
            status: entries.clone(),
        }
    }
}
