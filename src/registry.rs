//! Service registry enumeration
//!
//! The registry is the set of deployable services, derived by listing the
//! services directory. Entries are sorted by name so every downstream
//! ordering (build map seeding, dependent resolution, retag list) is
//! deterministic for a given tree.

use std::fs;
use std::path::Path;

use crate::error::{PlanError, PlanResult};

/// Enumerate the service registry from a directory listing.
///
/// Only immediate subdirectories count; stray files are ignored. A missing
/// or unreadable directory aborts the run.
pub fn services(services_dir: &Path) -> PlanResult<Vec<String>> {
    let entries = fs::read_dir(services_dir).map_err(|source| PlanError::ServicesDir {
        path: services_dir.to_path_buf(),
        source,
    })?;

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| PlanError::ServicesDir {
            path: services_dir.to_path_buf(),
            source,
        })?;
        if entry.file_type()?.is_dir() {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    names.sort();
    Ok(names)
}
