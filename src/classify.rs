//! Change classification
//!
//! Maps the changed-folder list onto the service registry: a changed folder
//! that is a registered service is rebuilt for its own sake; anything else
//! is treated as a shared package and expanded into the services that
//! depend on it.

use std::path::Path;

use indexmap::IndexMap;

use crate::error::{PlanError, PlanResult};
use crate::resolver;

/// Service build map: service name -> ordered reason list.
///
/// The reason list starts with the service's own name and appends every
/// changed package the service depends on. Insertion order of both keys
/// and reasons is contractual; it drives fingerprint input ordering.
pub type BuildMap = IndexMap<String, Vec<String>>;

/// Derive changed top-level folders from a comma-separated changed-file list.
///
/// Each entry's second path component names the changed unit
/// (`packages/svc-a/src/main.ts` -> `svc-a`). Duplicates are preserved.
/// An entry without a second component is a configuration fault and aborts
/// the run.
pub fn changed_folders(changed_files: Option<&str>) -> PlanResult<Vec<String>> {
    let Some(changed_files) = changed_files else {
        println!("no changed files");
        return Ok(Vec::new());
    };

    let mut folders = Vec::new();
    for entry in changed_files.split(',') {
        let folder = entry
            .split('/')
            .nth(1)
            .filter(|f| !f.is_empty())
            .ok_or_else(|| PlanError::ChangedPath {
                entry: entry.to_string(),
            })?;
        folders.push(folder.to_string());
    }
    Ok(folders)
}

/// Classify changed folders into the service build map and the package
/// build list.
///
/// Returns the build map plus the list of fixed-form package identifiers,
/// duplicate-free, covering every changed folder whether or not anything
/// depends on it.
pub fn classify(
    changed: &[String],
    registry: &[String],
    packages_dir: &Path,
) -> PlanResult<(BuildMap, Vec<String>)> {
    let mut build_map = BuildMap::new();
    let mut package_list: Vec<String> = Vec::new();

    for folder in changed {
        if registry.iter().any(|s| s == folder) {
            // Idempotent: a repeat change never duplicates the self-reason.
            build_map
                .entry(folder.clone())
                .or_insert_with(|| vec![folder.clone()]);
        } else {
            for service in resolver::dependents_of(folder, registry, packages_dir)? {
                build_map
                    .entry(service.clone())
                    .or_insert_with(|| vec![service])
                    .push(folder.clone());
            }
        }

        let identifier = resolver::scoped_identifier(folder);
        if !package_list.contains(&identifier) {
            println!("package name was fixed from {} to {}", folder, identifier);
            package_list.push(identifier);
        }
    }

    Ok((build_map, package_list))
}
