//! # Status Strip
//!
//! Facts about the running host that are shown above the panels: runtime
//! version, data-store version, memory usage and a warning when verbose
//! debugging is off. The host measures them; this module turns them into
//! ordered [`StatusEntry`] values before the status filter runs.

use crate::config::OverlayConfig;
use crate::types::StatusEntry;
use serde::{Deserialize, Serialize};

/// Data-store identity reported by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreFacts {
    pub label: String,
    pub version: String,
}

/// Facts the host measured for the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuntimeFacts {
    pub runtime_version: String,
    pub store: Option<StoreFacts>,
    pub peak_memory_bytes: Option<u64>,
}

/// Status entries derived from `facts`, in display order.
#[must_use]
pub fn derived_statuses(facts: &RuntimeFacts, config: &OverlayConfig) -> Vec<StatusEntry> {
    let mut entries = vec![StatusEntry::new("rust", "Rust", facts.runtime_version.clone())];

    if let Some(store) = &facts.store {
        entries.push(StatusEntry::new("db", store.label.clone(), store.version.clone()));
    }

    entries.push(match facts.peak_memory_bytes {
        Some(bytes) => StatusEntry::new("memory", "Memory Usage", format_bytes(bytes)),
        None => StatusEntry::title_only("memory", "Memory Usage"),
    });

    if !config.debug_enabled {
        entries.push(StatusEntry::new(
            "warning",
            "Please Enable",
            config.debug_flag_label.clone(),
        ));
    }

    entries
}

/// `1234567` -> `1,234,567 bytes`.
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    format!("{} bytes", group_thousands(bytes))
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
