//! Name table threaded through staging.
//!
//! The host may rename objects at any point (duplicates get `.NNN`, a rename
//! to a taken name gets disambiguated), so the pipeline never re-derives
//! names: every host-assigned name is recorded here as soon as it is known.

use crate::scene::ObjectKind;

/// One staged duplicate.
#[derive(Clone, Debug, PartialEq)]
pub struct StagedObject {
    /// Current name in the scene.
    pub name: String,
    /// Selected objects this duplicate stands for. Grows when meshes are
    /// merged into it.
    pub origins: Vec<String>,
    pub kind: ObjectKind,
}

/// Ordered list of staged duplicates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NameTable {
    entries: Vec<StagedObject>,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a duplicate of `origin` that the host named `assigned`.
    pub fn push(&mut self, origin: &str, assigned: &str, kind: ObjectKind) {
        self.entries.push(StagedObject {
            name: assigned.to_string(),
            origins: vec![origin.to_string()],
            kind,
        });
    }

    /// Current names, in staging order.
    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    /// Names of mesh duplicates, in staging order.
    pub fn meshes(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.kind.is_mesh())
            .map(|e| e.name.clone())
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&StagedObject> {
        self.entries.iter().find(|e| e.name == name)
    }

    pub fn entries(&self) -> &[StagedObject] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Record that the host renamed `old` to `new`. Returns false if `old`
    /// is not tracked.
    pub fn rename(&mut self, old: &str, new: &str) -> bool {
        match self.entries.iter_mut().find(|e| e.name == old) {
            Some(entry) => {
                entry.name = new.to_string();
                true
            }
            None => false,
        }
    }

    /// Record that `consumed` was merged into `survivor` and removed from the
    /// scene. The survivor keeps its position.
    pub fn absorb(&mut self, survivor: &str, consumed: &str) -> bool {
        let Some(idx) = self.entries.iter().position(|e| e.name == consumed) else {
            return false;
        };
        if !self.entries.iter().any(|e| e.name == survivor) || survivor == consumed {
            return false;
        }
        let gone = self.entries.remove(idx);
        if let Some(target) = self.entries.iter_mut().find(|e| e.name == survivor) {
            target.origins.extend(gone.origins);
        }
        true
    }

    /// Stop tracking an object.
    pub fn forget(&mut self, name: &str) {
        self.entries.retain(|e| e.name != name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> NameTable {
        let mut t = NameTable::new();
        t.push("A", "A.001", ObjectKind::Mesh);
        t.push("Lamp", "Lamp.001", ObjectKind::Light);
        t.push("B", "B.001", ObjectKind::Mesh);
        t
    }

    #[test]
    fn test_meshes_keep_order() {
        assert_eq!(table().meshes(), ["A.001", "B.001"]);
    }

    #[test]
    fn test_rename_then_absorb() {
        let mut t = table();
        assert!(t.rename("A.001", "chair"));
        assert!(t.absorb("chair", "B.001"));
        assert_eq!(t.names(), ["chair", "Lamp.001"]);
        assert_eq!(t.get("chair").unwrap().origins, ["A", "B"]);
    }

    #[test]
    fn test_absorb_unknown() {
        let mut t = table();
        assert!(!t.absorb("A.001", "nope"));
        assert!(!t.absorb("nope", "B.001"));
        assert!(!t.absorb("A.001", "A.001"));
        assert_eq!(t.len(), 3);
        assert!(!t.rename("nope", "x"));
    }
}
