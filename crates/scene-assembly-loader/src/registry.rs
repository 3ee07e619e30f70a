//! Package registry
//!
//! Pairs fragment indices with the packages carrying their geometry. Either
//! half may arrive first; a fragment becomes queryable once both are known.

use scene_assembly_core::{FragmentIndex, Package};
use std::collections::HashMap;
use tracing::{debug, warn};

/// A fragment index bound to its package
#[derive(Debug, Clone)]
pub struct LoadedFragment {
    pub index: FragmentIndex,
    pub package: Package,
}

impl LoadedFragment {
    /// Fragment name shared by the index and the package
    pub fn name(&self) -> &str {
        &self.package.name
    }
}

/// Result of looking up a fragment by name
#[derive(Debug)]
pub enum Lookup<'a> {
    /// Index and package are both known
    Ready(&'a FragmentIndex, &'a Package),
    /// Only one half is known so far
    NotReady,
    /// Neither half is known
    Missing,
}

impl Lookup<'_> {
    pub fn is_ready(&self) -> bool {
        matches!(self, Lookup::Ready(..))
    }
}

/// Final contents of a registry once loading completes
#[derive(Debug, Default)]
pub struct RegistryContents {
    /// Bound fragments by name
    pub fragments: HashMap<String, LoadedFragment>,

    /// Packages without a matching index: renderable, opaque to queries
    pub unmapped_packages: Vec<Package>,
}

/// Registry of fragment indices and packages for one sub-model load
#[derive(Debug, Default)]
pub struct PackageRegistry {
    indices: HashMap<String, FragmentIndex>,
    packages: HashMap<String, Package>,
}

impl PackageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the index of a fragment
    ///
    /// Degenerate indices are skipped. A second index for the same name
    /// replaces the first. Returns whether the index was registered.
    pub fn register_index(&mut self, index: FragmentIndex) -> bool {
        let name = match index.name() {
            Some(name) if index.is_usable() => name.to_string(),
            _ => {
                warn!(entries = index.len(), "Skipping degenerate mapping manifest");
                return false;
            }
        };

        debug!(fragment = %name, submeshes = index.len(), "Registered fragment index");
        if self.indices.insert(name.clone(), index).is_some() {
            warn!(fragment = %name, "Duplicate fragment name, replacing earlier index");
        }
        true
    }

    /// Bind a package by its embedded name
    ///
    /// A second package for a name already bound is ignored. Returns whether
    /// the package was kept.
    pub fn bind(&mut self, package: Package) -> bool {
        if self.packages.contains_key(&package.name) {
            warn!(fragment = %package.name, "Package already bound, ignoring duplicate");
            return false;
        }

        debug!(fragment = %package.name, "Bound package");
        self.packages.insert(package.name.clone(), package);
        true
    }

    /// Look up a fragment by name
    pub fn lookup(&self, name: &str) -> Lookup<'_> {
        match (self.indices.get(name), self.packages.get(name)) {
            (Some(index), Some(package)) => Lookup::Ready(index, package),
            (None, None) => Lookup::Missing,
            _ => Lookup::NotReady,
        }
    }

    /// Number of fragments with both halves known
    pub fn ready_count(&self) -> usize {
        self.indices
            .keys()
            .filter(|name| self.packages.contains_key(*name))
            .count()
    }

    /// Close the registry and pair up every fragment
    pub fn finish(mut self) -> RegistryContents {
        let mut contents = RegistryContents::default();

        for (name, package) in self.packages.drain() {
            match self.indices.remove(&name) {
                Some(index) => {
                    contents
                        .fragments
                        .insert(name, LoadedFragment { index, package });
                }
                None => {
                    warn!(fragment = %name, "Package has no mapping manifest, geometry will not be queryable");
                    contents.unmapped_packages.push(package);
                }
            }
        }

        for name in self.indices.keys() {
            warn!(fragment = %name, "Mapping manifest has no package, dropping fragment");
        }

        contents
            .unmapped_packages
            .sort_by(|a, b| a.name.cmp(&b.name));
        contents
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scene_assembly_core::{MappingEntry, MappingManifest};

    fn index(fragment: &str, ids: &[&str]) -> FragmentIndex {
        let entries = ids
            .iter()
            .enumerate()
            .map(|(i, id)| MappingEntry::new(*id, format!("{}_{}", fragment, i)))
            .collect();
        FragmentIndex::from_manifest(&MappingManifest::new(entries))
    }

    #[test]
    fn test_lookup_states() {
        let mut registry = PackageRegistry::new();
        assert!(matches!(registry.lookup("F"), Lookup::Missing));

        registry.register_index(index("F", &["E1"]));
        assert!(matches!(registry.lookup("F"), Lookup::NotReady));

        registry.bind(Package::new("F"));
        assert!(registry.lookup("F").is_ready());
    }

    #[test]
    fn test_binding_is_order_independent() {
        let mut index_first = PackageRegistry::new();
        index_first.register_index(index("F", &["E1", "E2"]));
        index_first.bind(Package::new("F"));

        let mut package_first = PackageRegistry::new();
        package_first.bind(Package::new("F"));
        package_first.register_index(index("F", &["E1", "E2"]));

        let a = index_first.finish();
        let b = package_first.finish();
        assert_eq!(
            a.fragments["F"].index.element_ids(),
            b.fragments["F"].index.element_ids()
        );
        assert_eq!(a.fragments.len(), 1);
        assert_eq!(b.fragments.len(), 1);
    }

    #[test]
    fn test_second_bind_is_ignored() {
        let mut registry = PackageRegistry::new();
        assert!(registry.bind(Package::new("F").with_sub_object(Default::default())));
        assert!(!registry.bind(Package::new("F")));
        registry.register_index(index("F", &["E1"]));

        let contents = registry.finish();
        assert_eq!(contents.fragments["F"].package.sub_objects.len(), 1);
    }

    #[test]
    fn test_duplicate_index_replaces_earlier() {
        let mut registry = PackageRegistry::new();
        registry.register_index(index("F", &["E1"]));
        registry.register_index(index("F", &["E9", "E10"]));
        registry.bind(Package::new("F"));

        let contents = registry.finish();
        assert_eq!(contents.fragments["F"].index.len(), 2);
    }

    #[test]
    fn test_degenerate_index_is_skipped() {
        let mut registry = PackageRegistry::new();
        assert!(!registry.register_index(FragmentIndex::from_manifest(&MappingManifest::default())));
        assert_eq!(registry.ready_count(), 0);
    }

    #[test]
    fn test_finish_separates_unmatched_halves() {
        let mut registry = PackageRegistry::new();
        registry.register_index(index("A", &["E1"]));
        registry.register_index(index("B", &["E2"]));
        registry.bind(Package::new("A"));
        registry.bind(Package::new("C"));
        assert_eq!(registry.ready_count(), 1);

        let contents = registry.finish();
        assert_eq!(contents.fragments.len(), 1);
        assert!(contents.fragments.contains_key("A"));
        assert_eq!(contents.unmapped_packages.len(), 1);
        assert_eq!(contents.unmapped_packages[0].name, "C");
    }
}
