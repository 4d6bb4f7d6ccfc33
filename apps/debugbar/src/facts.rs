//! # Runtime Facts
//!
//! What the host measures for the status strip: compiler version captured at
//! build time and the process's resident memory.

use debugbar_core::{RuntimeFacts, StoreFacts};
use sysinfo::{ProcessesToUpdate, System};

/// Version of the compiler that built this binary.
pub const RUNTIME_VERSION: &str = env!("DEBUGBAR_RUSTC_VERSION");

/// Resident memory of this process in bytes, if the platform reports it.
#[must_use]
pub fn resident_memory_bytes() -> Option<u64> {
    let pid = sysinfo::get_current_pid().ok()?;
    let mut system = System::new();
    system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
    system.process(pid).map(|process| process.memory())
}

/// Facts for the current request.
#[must_use]
pub fn collect(store: Option<StoreFacts>) -> RuntimeFacts {
    RuntimeFacts {
        runtime_version: RUNTIME_VERSION.to_string(),
        store,
        peak_memory_bytes: resident_memory_bytes(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn runtime_version_is_captured() {
        assert!(!RUNTIME_VERSION.is_empty());
    }

    #[test]
    fn collect_carries_store() {
        let facts = collect(Some(StoreFacts {
            label: "MemStore".to_string(),
            version: "1".to_string(),
        }));
        assert_eq!(facts.runtime_version, RUNTIME_VERSION);
        assert_eq!(facts.store.map(|s| s.label).as_deref(), Some("MemStore"));
    }
}
