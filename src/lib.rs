//! buildplan - monorepo build planner for CI
//!
//! Given the set of changed source folders in a monorepo of deployable
//! services and shared packages, buildplan computes which services must be
//! rebuilt (directly changed, or depending on a changed package), which
//! package identifiers were implicated, and which services keep their
//! existing image and only need a retag. Each rebuilt service also gets a
//! stable content fingerprint for cache/retag decisions.

pub mod classify;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod plan;
pub mod registry;
pub mod resolver;

// Re-exports for convenience
pub use classify::{changed_folders, classify, BuildMap};
pub use config::{Config, Overrides};
pub use error::{PlanError, PlanResult};
pub use fingerprint::{fingerprint, write_fingerprints};
pub use plan::{assemble, write_artifacts, BuildPlan};
pub use registry::services;
pub use resolver::{dependents_of, scoped_identifier};
