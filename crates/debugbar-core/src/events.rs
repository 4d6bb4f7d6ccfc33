//! # Request Event Log
//!
//! Append-only record of what happened while the host served a request:
//! runtime notices, data-store queries, deprecated calls and cache lookups.
//!
//! Collaborators (the host's data store, deprecation reporter and so on) append
//! to the log while the request runs. Panels only read it during prerender, so
//! no panel depends on state accumulated by another panel.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

// =============================================================================
// EVENT KINDS
// =============================================================================

/// Severity of a runtime notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Notice,
    Warning,
}

/// A non-fatal runtime notice or warning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub location: Option<String>,
}

/// One data-store query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRecord {
    pub statement: String,
    pub duration: Duration,
    pub caller: Option<String>,
    pub error: Option<String>,
}

impl QueryRecord {
    #[must_use]
    pub fn new(statement: impl Into<String>, duration: Duration) -> Self {
        Self {
            statement: statement.into(),
            duration,
            caller: None,
            error: None,
        }
    }

    #[must_use]
    pub fn with_caller(mut self, caller: impl Into<String>) -> Self {
        self.caller = Some(caller.into());
        self
    }

    #[must_use]
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// What kind of deprecated usage was reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeprecationKind {
    Function,
    Argument,
    File,
}

impl DeprecationKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            DeprecationKind::Function => "Deprecated Function Calls",
            DeprecationKind::Argument => "Deprecated Arguments",
            DeprecationKind::File => "Deprecated Files",
        }
    }
}

/// A call into deprecated API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deprecation {
    pub kind: DeprecationKind,
    pub name: String,
    pub version: String,
    pub replacement: Option<String>,
    pub location: Option<String>,
}

/// A single object-cache lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheLookup {
    pub group: String,
    pub hit: bool,
}

/// Anything a collaborator can report during a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Notice(Notice),
    Query(QueryRecord),
    Deprecated(Deprecation),
    Cache(CacheLookup),
}

// =============================================================================
// CACHE STATS
// =============================================================================

/// Hit/miss counters for one cache group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitMiss {
    pub hits: u64,
    pub misses: u64,
}

impl HitMiss {
    #[must_use]
    pub fn total(&self) -> u64 {
        self.hits.saturating_add(self.misses)
    }

    /// Hit ratio as a whole percentage, rounded down. Zero when nothing was looked up.
    #[must_use]
    pub fn hit_percent(&self) -> u64 {
        match self.total() {
            0 => 0,
            total => self.hits.saturating_mul(100) / total,
        }
    }
}

/// Aggregated cache counters, overall and per group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub overall: HitMiss,
    pub groups: BTreeMap<String, HitMiss>,
}

impl CacheStats {
    fn add(&mut self, lookup: &CacheLookup) {
        let group = self.groups.entry(lookup.group.clone()).or_default();
        if lookup.hit {
            self.overall.hits = self.overall.hits.saturating_add(1);
            group.hits = group.hits.saturating_add(1);
        } else {
            self.overall.misses = self.overall.misses.saturating_add(1);
            group.misses = group.misses.saturating_add(1);
        }
    }
}

// =============================================================================
// EVENT LOG
// =============================================================================

/// Append-only, per-request event log.
///
/// Shared by reference between the host's collaborators and the panels;
/// appending only needs `&self`.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<Event>>,
}

impl EventLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event.
    pub fn record(&self, event: Event) {
        self.lock().push(event);
    }

    pub fn notice(&self, level: NoticeLevel, message: impl Into<String>, location: Option<String>) {
        self.record(Event::Notice(Notice {
            level,
            message: message.into(),
            location,
        }));
    }

    pub fn query(&self, record: QueryRecord) {
        self.record(Event::Query(record));
    }

    pub fn deprecated(&self, deprecation: Deprecation) {
        self.record(Event::Deprecated(deprecation));
    }

    pub fn cache_lookup(&self, group: impl Into<String>, hit: bool) {
        self.record(Event::Cache(CacheLookup {
            group: group.into(),
            hit,
        }));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of every event, in append order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Event> {
        self.lock().clone()
    }

    #[must_use]
    pub fn notices(&self) -> Vec<Notice> {
        self.collect(|event| match event {
            Event::Notice(notice) => Some(notice.clone()),
            _ => None,
        })
    }

    #[must_use]
    pub fn queries(&self) -> Vec<QueryRecord> {
        self.collect(|event| match event {
            Event::Query(query) => Some(query.clone()),
            _ => None,
        })
    }

    #[must_use]
    pub fn deprecations(&self) -> Vec<Deprecation> {
        self.collect(|event| match event {
            Event::Deprecated(deprecation) => Some(deprecation.clone()),
            _ => None,
        })
    }

    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        let mut stats = CacheStats::default();
        for event in self.lock().iter() {
            if let Event::Cache(lookup) = event {
                stats.add(lookup);
            }
        }
        stats
    }

    fn collect<T>(&self, pick: impl Fn(&Event) -> Option<T>) -> Vec<T> {
        self.lock().iter().filter_map(pick).collect()
    }

    // A poisoned lock still holds a consistent Vec: every mutation is a single push.
    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Event>> {
        self.events.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Format a duration as milliseconds with microsecond precision, e.g. `1.250ms`.
#[must_use]
pub fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();
    format!("{}.{:03}ms", micros / 1000, micros % 1000)
}

// =============================================================================
// TESTS
// =============================================================================
