//! Configuration for a buildplan run
//!
//! Resolution order, highest priority first:
//! 1. CLI flags
//! 2. Environment variables (the pipeline's interface)
//! 3. Built-in defaults relative to the workspace root
//!
//! Environment variables:
//! - `GITHUB_WORKSPACE` - workspace root
//! - `SERVICES_OUTPUT_PATH` - service build list output file
//! - `PACKAGES_OUTPUT_PATH` - package build list output file
//! - `SERVICES_RETAG_OUTPUT_PATH` - service retag list output file
//! - `HELM_SERVICES_FOLDER` - directory enumerated to form the service registry
//! - `PACKAGES_FOLDER` - root of package/service sources, fingerprint base
//! - `CHANGED_FILES_PR` / `CHANGED_FILES_NOT_PR` - comma-separated changed
//!   file paths; the PR variable wins when both are set and non-empty
//! - `CHANGED_FOLDERS` - comma-separated changed folder names; replaces the
//!   folder list otherwise derived from the changed files

use std::env;
use std::path::{Path, PathBuf};

use crate::error::PlanResult;

/// CLI-provided overrides, all optional.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub root: Option<PathBuf>,
    pub services_output: Option<PathBuf>,
    pub packages_output: Option<PathBuf>,
    pub retag_output: Option<PathBuf>,
    pub services_dir: Option<PathBuf>,
    pub packages_dir: Option<PathBuf>,
    pub changed_files: Option<String>,
    pub changed_folders: Option<String>,
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Workspace root all defaults hang off
    pub root: PathBuf,
    /// Service build list output file (JSON)
    pub services_output: PathBuf,
    /// Package build list output file (JSON)
    pub packages_output: PathBuf,
    /// Service retag list output file (JSON)
    pub retag_output: PathBuf,
    /// Directory whose subdirectories form the service registry
    pub services_dir: PathBuf,
    /// Root of package/service source folders, base for fingerprinting
    pub packages_dir: PathBuf,
    /// Comma-separated changed file paths, if any were provided
    pub changed_files: Option<String>,
    /// Explicit changed-folder override; when set it replaces the folder
    /// list normally derived from `changed_files`
    pub changed_folders: Option<Vec<String>>,
}

/// Read an environment variable, treating empty values as unset.
fn env_non_empty(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.is_empty())
}

fn env_path(name: &str) -> Option<PathBuf> {
    env_non_empty(name).map(PathBuf::from)
}

impl Config {
    /// Resolve the configuration from overrides, environment and defaults.
    pub fn resolve(overrides: Overrides) -> PlanResult<Self> {
        let root = match overrides.root.or_else(|| env_path("GITHUB_WORKSPACE")) {
            Some(root) => root,
            None => env::current_dir()?,
        };

        let services_output = overrides
            .services_output
            .or_else(|| env_path("SERVICES_OUTPUT_PATH"))
            .unwrap_or_else(|| root.join("service_build_list.json"));
        let packages_output = overrides
            .packages_output
            .or_else(|| env_path("PACKAGES_OUTPUT_PATH"))
            .unwrap_or_else(|| root.join("package_build_list.json"));
        let retag_output = overrides
            .retag_output
            .or_else(|| env_path("SERVICES_RETAG_OUTPUT_PATH"))
            .unwrap_or_else(|| root.join("service_retag_list.json"));
        let services_dir = overrides
            .services_dir
            .or_else(|| env_path("HELM_SERVICES_FOLDER"))
            .unwrap_or_else(|| root.join("helm/charts/services"));
        let packages_dir = overrides
            .packages_dir
            .or_else(|| env_path("PACKAGES_FOLDER"))
            .unwrap_or_else(|| root.join("packages"));

        let changed_files = overrides
            .changed_files
            .filter(|v| !v.is_empty())
            .or_else(|| env_non_empty("CHANGED_FILES_PR"))
            .or_else(|| env_non_empty("CHANGED_FILES_NOT_PR"));

        let changed_folders = overrides
            .changed_folders
            .filter(|v| !v.is_empty())
            .or_else(|| env_non_empty("CHANGED_FOLDERS"))
            .map(|csv| {
                csv.split(',')
                    .map(|folder| folder.trim().to_string())
                    .filter(|folder| !folder.is_empty())
                    .collect()
            });

        Ok(Self {
            root,
            services_output,
            packages_output,
            retag_output,
            services_dir,
            packages_dir,
            changed_files,
            changed_folders,
        })
    }

    /// Resolve from environment and defaults only.
    pub fn from_env() -> PlanResult<Self> {
        Self::resolve(Overrides::default())
    }

    /// Directory fingerprint files are written to, next to the service
    /// build list.
    pub fn fingerprint_dir(&self) -> &Path {
        self.services_output.parent().unwrap_or(Path::new("."))
    }
}
