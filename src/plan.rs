//! Build plan assembly and artifact emission
//!
//! The build plan is the run's single output value: which services to
//! rebuild (with reasons), which package identifiers were implicated, and
//! which services keep their existing image and only need a retag.

use std::fs;

use serde::Serialize;

use crate::classify::BuildMap;
use crate::config::Config;
use crate::error::PlanResult;

/// The complete plan for one CI run.
#[derive(Debug, Clone, Serialize)]
pub struct BuildPlan {
    /// Services to rebuild, keyed by name, with ordered reason lists
    pub services: BuildMap,
    /// Fixed-form package identifiers implicated by the change set
    pub packages: Vec<String>,
    /// Services to retag with their existing image, in registry order
    pub retag: Vec<String>,
}

/// Assemble the plan from classification results.
///
/// The retag list is the registry minus the build-map keys, in registry
/// order, so retag and build keys always partition the registry exactly.
pub fn assemble(registry: &[String], services: BuildMap, packages: Vec<String>) -> BuildPlan {
    let retag = registry
        .iter()
        .filter(|service| !services.contains_key(*service))
        .cloned()
        .collect();
    BuildPlan {
        services,
        packages,
        retag,
    }
}

/// Write the three list artifacts.
///
/// The service build list is a JSON array encoded *again* as a JSON string,
/// so the file reads `"[\"svc-a\"]"`. The pipeline consuming these files
/// unwraps that outer string; the shape is load-bearing and must not be
/// flattened to a plain array.
///
/// Not transactional: a failure mid-way leaves earlier files in place.
pub fn write_artifacts(plan: &BuildPlan, config: &Config) -> PlanResult<()> {
    let service_names: Vec<&String> = plan.services.keys().collect();
    println!("Will build the following services: {:?}", service_names);
    let encoded = serde_json::to_string(&service_names)?;
    fs::write(&config.services_output, serde_json::to_string(&encoded)?)?;

    println!("Will build the following packages: {:?}", plan.packages);
    fs::write(
        &config.packages_output,
        serde_json::to_string_pretty(&plan.packages)?,
    )?;

    println!("Will retag the following services: {:?}", plan.retag);
    fs::write(
        &config.retag_output,
        serde_json::to_string_pretty(&plan.retag)?,
    )?;

    Ok(())
}
