//! In-memory scene.
//!
//! Behaves like a typical DCC host where it matters to this crate: names are
//! kept unique with `.NNN` suffixes (lowest free number), duplicates get their
//! own data block, property keys are length-limited, and joins merge geometry
//! into the target.

use std::collections::BTreeMap;

use super::naming::unique_name;
use super::{ObjectKind, PropertyUi, Scene};
use crate::metadata::{PropertySet, PropertyValue};
use crate::util::{Error, Result};

/// Longest custom-property key accepted, in bytes.
pub const MAX_PROPERTY_KEY_LEN: usize = 63;

const DEFAULT_COLLECTION: &str = "Collection";

/// Mesh data block.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct MeshData {
    /// Data block name, unique among data blocks.
    pub name: String,
    pub vertices: usize,
    /// Modifiers baked into this data, in application order.
    pub baked: Vec<String>,
}

/// One object in a [`MemoryScene`].
#[derive(Clone, Debug, PartialEq)]
pub struct MemoryObject {
    pub name: String,
    pub kind: ObjectKind,
    pub collection: String,
    /// Present for meshes only.
    pub mesh: Option<MeshData>,
    /// Unapplied modifier stack.
    pub modifiers: Vec<String>,
    pub properties: PropertySet,
    /// UI side-table, created on first use.
    pub ui: Option<BTreeMap<String, PropertyUi>>,
    /// Set by `tag_redraw`.
    pub needs_redraw: bool,
}

impl MemoryObject {
    /// Create an object of the given kind. Meshes get an empty data block.
    pub fn new(name: &str, kind: ObjectKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            collection: DEFAULT_COLLECTION.to_string(),
            mesh: kind.is_mesh().then(|| MeshData {
                name: name.to_string(),
                ..Default::default()
            }),
            modifiers: Vec::new(),
            properties: PropertySet::new(),
            ui: None,
            needs_redraw: false,
        }
    }

    /// Create a mesh object with `vertices` vertices.
    pub fn mesh(name: &str, vertices: usize) -> Self {
        let mut obj = Self::new(name, ObjectKind::Mesh);
        if let Some(mesh) = obj.mesh.as_mut() {
            mesh.vertices = vertices;
        }
        obj
    }

    pub fn with_modifier(mut self, modifier: &str) -> Self {
        self.modifiers.push(modifier.to_string());
        self
    }

    pub fn with_property(mut self, key: &str, value: impl Into<PropertyValue>) -> Self {
        self.properties.insert(key.to_string(), value.into());
        self
    }

    /// UI entry of a property, if any.
    pub fn property_ui(&self, key: &str) -> Option<&PropertyUi> {
        self.ui.as_ref()?.get(key)
    }
}

/// Scene graph held entirely in memory.
#[derive(Clone, Debug, PartialEq)]
pub struct MemoryScene {
    objects: Vec<MemoryObject>,
    selection: Vec<String>,
    collection: String,
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryScene {
    pub fn new() -> Self {
        Self {
            objects: Vec::new(),
            selection: Vec::new(),
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }

    /// Set the collection new objects are linked into.
    pub fn set_active_collection(&mut self, collection: &str) {
        self.collection = collection.to_string();
    }

    /// Insert an object, disambiguating its name (and data name) as needed.
    /// Returns the assigned name.
    pub fn add(&mut self, mut object: MemoryObject) -> String {
        object.name = unique_name(&object.name, |n| self.contains(n));
        if let Some(mesh) = object.mesh.as_mut() {
            mesh.name = unique_name(&mesh.name, |n| self.data_exists(n));
        }
        let name = object.name.clone();
        self.objects.push(object);
        name
    }

    pub fn get(&self, name: &str) -> Option<&MemoryObject> {
        self.objects.iter().find(|o| o.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut MemoryObject> {
        self.objects.iter_mut().find(|o| o.name == name)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn objects(&self) -> impl Iterator<Item = &MemoryObject> {
        self.objects.iter()
    }

    fn data_exists(&self, data_name: &str) -> bool {
        self.objects
            .iter()
            .filter_map(|o| o.mesh.as_ref())
            .any(|m| m.name == data_name)
    }

    fn object(&self, name: &str) -> Result<&MemoryObject> {
        self.get(name).ok_or_else(|| Error::ObjectNotFound(name.to_string()))
    }

    fn object_mut(&mut self, name: &str) -> Result<&mut MemoryObject> {
        self.get_mut(name)
            .ok_or_else(|| Error::ObjectNotFound(name.to_string()))
    }
}

impl Scene for MemoryScene {
    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    fn kind(&self, name: &str) -> Option<ObjectKind> {
        self.get(name).map(|o| o.kind)
    }

    fn object_names(&self) -> Vec<String> {
        self.objects.iter().map(|o| o.name.clone()).collect()
    }

    fn selected(&self) -> Vec<String> {
        self.selection.clone()
    }

    fn select(&mut self, names: &[String]) -> Result<()> {
        if let Some(missing) = names.iter().find(|n| !self.contains(n)) {
            return Err(Error::ObjectNotFound(missing.clone()));
        }
        self.selection = names.to_vec();
        Ok(())
    }

    fn active_collection(&self) -> Option<String> {
        Some(self.collection.clone())
    }

    fn create_object(&mut self, name: &str, kind: ObjectKind) -> Result<String> {
        let mut object = MemoryObject::new(name, kind);
        object.collection = self.collection.clone();
        Ok(self.add(object))
    }

    fn duplicate(&mut self, name: &str) -> Result<String> {
        let mut copy = self.object(name)?.clone();
        copy.collection = self.collection.clone();
        copy.needs_redraw = false;
        let assigned = self.add(copy);
        tracing::trace!("Duplicated {name} as {assigned}");
        Ok(assigned)
    }

    fn apply_modifiers(&mut self, name: &str) -> Result<()> {
        let object = self.object_mut(name)?;
        let modifiers = std::mem::take(&mut object.modifiers);
        let Some(mesh) = object.mesh.as_mut() else {
            object.modifiers = modifiers;
            return Err(Error::scene(format!("{name} has no mesh data")));
        };
        mesh.baked.extend(modifiers);
        Ok(())
    }

    fn join(&mut self, target: &str, sources: &[String]) -> Result<()> {
        let mut vertices = 0;
        let mut baked = Vec::new();
        for source in sources.iter().filter(|s| s.as_str() != target) {
            let mesh = self
                .object(source)?
                .mesh
                .as_ref()
                .ok_or_else(|| Error::scene(format!("cannot join non-mesh {source}")))?;
            vertices += mesh.vertices;
            baked.extend(mesh.baked.iter().cloned());
        }
        let mesh = self
            .object_mut(target)?
            .mesh
            .as_mut()
            .ok_or_else(|| Error::scene(format!("join target {target} is not a mesh")))?;
        mesh.vertices += vertices;
        mesh.baked.extend(baked);
        Ok(())
    }

    fn rename(&mut self, name: &str, requested: &str) -> Result<String> {
        self.object(name)?;
        if name == requested {
            return Ok(name.to_string());
        }
        let assigned = unique_name(requested, |n| n != name && self.contains(n));
        self.object_mut(name)?.name = assigned.clone();
        for selected in self.selection.iter_mut().filter(|s| s.as_str() == name) {
            *selected = assigned.clone();
        }
        Ok(assigned)
    }

    fn remove(&mut self, name: &str) -> Result<()> {
        let idx = self
            .objects
            .iter()
            .position(|o| o.name == name)
            .ok_or_else(|| Error::ObjectNotFound(name.to_string()))?;
        self.objects.remove(idx);
        self.selection.retain(|s| s != name);
        Ok(())
    }

    fn custom_properties(&self, name: &str) -> Result<PropertySet> {
        Ok(self.object(name)?.properties.clone())
    }

    fn has_property(&self, name: &str, key: &str) -> bool {
        self.get(name).is_some_and(|o| o.properties.contains_key(key))
    }

    fn set_property(&mut self, name: &str, key: &str, value: PropertyValue) -> Result<()> {
        if key.is_empty() || key.len() > MAX_PROPERTY_KEY_LEN {
            return Err(Error::scene(format!(
                "property key must be 1..={MAX_PROPERTY_KEY_LEN} bytes, got {}",
                key.len()
            )));
        }
        self.object_mut(name)?
            .properties
            .insert(key.to_string(), value);
        Ok(())
    }

    fn remove_property(&mut self, name: &str, key: &str) -> Result<()> {
        let object = self.object_mut(name)?;
        object.properties.remove(key);
        if let Some(ui) = object.ui.as_mut() {
            ui.remove(key);
        }
        Ok(())
    }

    fn set_property_ui(&mut self, name: &str, key: &str, ui: PropertyUi) -> Result<()> {
        self.object_mut(name)?
            .ui
            .get_or_insert_with(BTreeMap::new)
            .insert(key.to_string(), ui);
        Ok(())
    }

    fn tag_redraw(&mut self, name: &str) {
        if let Some(object) = self.get_mut(name) {
            object.needs_redraw = true;
        }
    }
}
