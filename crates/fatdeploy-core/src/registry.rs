use fatdeploy_schema::Coordinate;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// In-memory mapping from candidate file path to its resolved coordinate,
/// built during the resolution pass and drained by the publish phase and the
/// manifest writer. Keyed by path, so iteration order is deterministic.
#[derive(Debug, Default)]
pub struct ArtifactRegistry {
    entries: BTreeMap<PathBuf, Coordinate>,
}

impl ArtifactRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a resolution. The first coordinate recorded for a path wins;
    /// a later record for the same path is ignored and `false` is returned.
    pub fn record(&mut self, path: PathBuf, coordinate: Coordinate) -> bool {
        match self.entries.entry(path) {
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(coordinate);
                true
            }
            std::collections::btree_map::Entry::Occupied(_) => false,
        }
    }

    pub fn get(&self, path: &Path) -> Option<&Coordinate> {
        self.entries.get(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PathBuf, &Coordinate)> {
        self.entries.iter()
    }

    /// All coordinates in path order.
    pub fn coordinates(&self) -> Vec<Coordinate> {
        self.entries.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coordinate(artifact: &str) -> Coordinate {
        Coordinate::new("g", artifact, "1.0").unwrap()
    }

    #[test]
    fn first_record_wins() {
        let mut registry = ArtifactRegistry::new();
        assert!(registry.record(PathBuf::from("/w/a.jar"), coordinate("first")));
        assert!(!registry.record(PathBuf::from("/w/a.jar"), coordinate("second")));

        assert_eq!(registry.len(), 1);
        assert_eq!(
            registry.get(Path::new("/w/a.jar")).unwrap().artifact,
            "first"
        );
    }

    #[test]
    fn iteration_is_path_ordered() {
        let mut registry = ArtifactRegistry::new();
        registry.record(PathBuf::from("/w/b.jar"), coordinate("b"));
        registry.record(PathBuf::from("/w/a.jar"), coordinate("a"));

        let artifacts: Vec<_> = registry.iter().map(|(_, c)| c.artifact.clone()).collect();
        assert_eq!(artifacts, vec!["a".to_owned(), "b".to_owned()]);
    }

    #[test]
    fn clear_empties_the_registry() {
        let mut registry = ArtifactRegistry::new();
        registry.record(PathBuf::from("/w/a.jar"), coordinate("a"));
        registry.clear();
        assert!(registry.is_empty());
    }
}
