//! Dependency resolution between shared packages and services
//!
//! A changed folder that is not itself a service is treated as a shared
//! package. Its published npm identifier is derived from the folder name,
//! and every service whose `package.json` declares that identifier as a
//! dependency key must be rebuilt.
//!
//! The search is a literal substring match on the quoted key
//! (`"@scope/name":`), not a JSON parse, so it matches the identifier in
//! any dependency section of the manifest.

use std::fs;
use std::path::Path;

use crate::error::{PlanError, PlanResult};

/// Derive the published npm identifier from a package folder name.
///
/// The first hyphen becomes the scope separator: `shared-lib` -> `@shared/lib`.
/// A folder with no hyphen gets the scope marker only: `shared` -> `@shared`.
pub fn scoped_identifier(folder: &str) -> String {
    format!("@{}", folder.replacen('-', "/", 1))
}

/// Find the services depending on a changed package, in registry order.
///
/// Reads each service's `package.json` under `packages_dir`. A missing or
/// unreadable manifest aborts the run; every registered service must carry
/// one.
pub fn dependents_of(
    package_folder: &str,
    registry: &[String],
    packages_dir: &Path,
) -> PlanResult<Vec<String>> {
    let key = format!("\"{}\":", scoped_identifier(package_folder));

    let mut dependents = Vec::new();
    for service in registry {
        let manifest_path = packages_dir.join(service).join("package.json");
        let manifest = fs::read_to_string(&manifest_path).map_err(|source| PlanError::Manifest {
            service: service.clone(),
            path: manifest_path.clone(),
            source,
        })?;
        if manifest.contains(&key) {
            println!(
                "The service {} depends on package {}, will build",
                service,
                scoped_identifier(package_folder)
            );
            dependents.push(service.clone());
        }
    }
    Ok(dependents)
}
