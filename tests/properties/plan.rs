//! Property tests for classification and plan assembly invariants.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use proptest::prelude::*;

use buildplan::{assemble, classify, BuildMap};

/// Shared package pool the generators draw from.
const PACKAGES: &[&str] = &["shared-lib", "shared-util", "orphan-pkg"];

/// One changed folder: either a registry service (by index) or a package.
#[derive(Debug, Clone)]
enum Change {
    Service(usize),
    Package(&'static str),
}

fn change() -> impl Strategy<Value = Change> {
    prop_oneof![
        (0usize..16).prop_map(Change::Service),
        (0usize..PACKAGES.len()).prop_map(|i| Change::Package(PACKAGES[i])),
    ]
}

/// Registry services with a per-service flag: does it depend on shared-lib?
fn services() -> impl Strategy<Value = Vec<(String, bool)>> {
    proptest::collection::btree_map("[a-z]{3,8}", any::<bool>(), 0..5).prop_map(|map| {
        map.into_iter()
            .map(|(name, depends)| (format!("svc-{}", name), depends))
            .collect()
    })
}

/// Write each service's manifest under `packages_dir`.
fn write_manifests(packages_dir: &Path, services: &[(String, bool)]) {
    for (name, depends) in services {
        let dir = packages_dir.join(name);
        fs::create_dir_all(&dir).unwrap();
        let manifest = if *depends {
            r#"{"dependencies": {"@shared/lib": "^1.0.0"}}"#
        } else {
            r#"{"dependencies": {}}"#
        };
        fs::write(dir.join("package.json"), manifest).unwrap();
    }
}

fn resolve_changed(changes: &[Change], registry: &[String]) -> Vec<String> {
    changes
        .iter()
        .filter_map(|change| match change {
            Change::Service(i) => {
                if registry.is_empty() {
                    None
                } else {
                    Some(registry[i % registry.len()].clone())
                }
            }
            Change::Package(name) => Some(name.to_string()),
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 48,
        .. ProptestConfig::default()
    })]

    /// PROPERTY: retag and build-map keys partition the registry exactly,
    /// for arbitrary registries and changed-folder lists.
    #[test]
    fn property_retag_and_build_partition_registry(
        services in services(),
        changes in proptest::collection::vec(change(), 0..12)
    ) {
        let dir = tempfile::tempdir().unwrap();
        write_manifests(dir.path(), &services);
        let registry: Vec<String> = services.iter().map(|(name, _)| name.clone()).collect();
        let changed = resolve_changed(&changes, &registry);

        let (build_map, packages) = classify(&changed, &registry, dir.path()).unwrap();
        let plan = assemble(&registry, build_map, packages);

        let build_keys: HashSet<&String> = plan.services.keys().collect();
        let retag_set: HashSet<&String> = plan.retag.iter().collect();
        let registry_set: HashSet<&String> = registry.iter().collect();

        prop_assert!(build_keys.is_disjoint(&retag_set));
        let union: HashSet<&String> = build_keys.union(&retag_set).copied().collect();
        prop_assert_eq!(union, registry_set);
    }

    /// PROPERTY: every build-map entry starts with its own name as the
    /// sole self-reason, however often the service appears in the change
    /// list.
    #[test]
    fn property_self_reason_is_first_and_unique(
        services in services(),
        changes in proptest::collection::vec(change(), 0..12)
    ) {
        let dir = tempfile::tempdir().unwrap();
        write_manifests(dir.path(), &services);
        let registry: Vec<String> = services.iter().map(|(name, _)| name.clone()).collect();
        let changed = resolve_changed(&changes, &registry);

        let (build_map, _) = classify(&changed, &registry, dir.path()).unwrap();

        for (service, reasons) in &build_map {
            prop_assert!(!reasons.is_empty());
            prop_assert_eq!(&reasons[0], service);
            prop_assert_eq!(reasons.iter().filter(|r| *r == service).count(), 1);
        }
    }

    /// PROPERTY: the package build list never contains duplicates.
    #[test]
    fn property_package_list_is_unique(
        services in services(),
        changes in proptest::collection::vec(change(), 0..12)
    ) {
        let dir = tempfile::tempdir().unwrap();
        write_manifests(dir.path(), &services);
        let registry: Vec<String> = services.iter().map(|(name, _)| name.clone()).collect();
        let changed = resolve_changed(&changes, &registry);

        let (_, packages) = classify(&changed, &registry, dir.path()).unwrap();

        let unique: HashSet<&String> = packages.iter().collect();
        prop_assert_eq!(unique.len(), packages.len());
    }

    /// PROPERTY: a changed shared-lib reaches exactly the services whose
    /// manifest declares it, in registry order.
    #[test]
    fn property_dependents_follow_manifests(
        services in services(),
    ) {
        let dir = tempfile::tempdir().unwrap();
        write_manifests(dir.path(), &services);
        let registry: Vec<String> = services.iter().map(|(name, _)| name.clone()).collect();
        let changed = vec!["shared-lib".to_string()];

        let (build_map, _) = classify(&changed, &registry, dir.path()).unwrap();

        let expected: Vec<String> = services
            .iter()
            .filter(|(_, depends)| *depends)
            .map(|(name, _)| name.clone())
            .collect();
        let keys: Vec<String> = build_map.keys().cloned().collect();
        prop_assert_eq!(keys, expected);
        for reasons in build_map.values() {
            prop_assert_eq!(reasons.last().map(String::as_str), Some("shared-lib"));
        }
    }
}

/// Partitioning must hold for an empty build map too.
#[test]
fn test_assemble_empty_map_partition() {
    let registry = vec!["svc-a".to_string(), "svc-b".to_string()];
    let plan = assemble(&registry, BuildMap::new(), Vec::new());
    assert_eq!(plan.retag, registry);
    assert!(plan.services.is_empty());
}
