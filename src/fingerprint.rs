//! Content fingerprinting for build-map entries
//!
//! A fingerprint is a coarse change-detection signal for image caching and
//! retag decisions, not an integrity guarantee: it samples the first file
//! of the entry's folder once per reason, never the full tree.
//!
//! The scheme: per reason, the MD5 hex digest of the sampled file's raw
//! bytes; all digests concatenated with no separator; the concatenation
//! SHA-256 digested and rendered as a decimal integer string. Identical
//! file bytes and identical reason ordering reproduce the fingerprint
//! bit-for-bit.

use std::fs;
use std::path::{Path, PathBuf};

use md5::Md5;
use num_bigint::BigUint;
use sha2::{Digest, Sha256};
use walkdir::WalkDir;

use crate::classify::BuildMap;
use crate::config::Config;
use crate::error::{PlanError, PlanResult};

/// First file under `dir`, recursively, in lexicographic walk order.
fn first_file(unit: &str, dir: &Path) -> PlanResult<PathBuf> {
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() {
            return Ok(entry.into_path());
        }
    }
    Err(PlanError::NoFiles {
        unit: unit.to_string(),
        dir: dir.to_path_buf(),
    })
}

/// Compute the decimal fingerprint for one build-map entry.
///
/// Every reason samples the first file under `packages_root/<key>` - the
/// build-map key's folder, not the reason's own folder. Downstream cache
/// keys depend on this exact shape, so it is preserved as-is.
pub fn fingerprint(key: &str, reasons: &[String], packages_root: &Path) -> PlanResult<String> {
    let dir = packages_root.join(key);
    let sampled = first_file(key, &dir)?;
    let bytes = fs::read(&sampled)?;
    let sample_hex = format!("{:x}", Md5::digest(&bytes));

    let mut concatenated = String::with_capacity(sample_hex.len() * reasons.len());
    for _reason in reasons {
        concatenated.push_str(&sample_hex);
    }

    let digest = Sha256::digest(concatenated.as_bytes());
    Ok(BigUint::from_bytes_be(&digest).to_str_radix(10))
}

/// Write one `<service>.md5` fingerprint file per build-map entry, next to
/// the service build list.
pub fn write_fingerprints(build_map: &BuildMap, config: &Config) -> PlanResult<()> {
    for (service, reasons) in build_map {
        let value = fingerprint(service, reasons, &config.packages_dir)?;
        let path = config.fingerprint_dir().join(format!("{}.md5", service));
        fs::write(path, value)?;
    }
    Ok(())
}
