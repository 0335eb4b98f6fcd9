//! Export staging - duplicates the selection into a throwaway working set.
//!
//! ```text
//! EMPTY -> DUPLICATED -> MERGED | UNMERGED -> ENCODED -> CLEANED
//! ```
//!
//! The originals are never touched: every mutation (modifier baking, joining,
//! renaming) happens on duplicates. A [`StagingSet`] removes its duplicates and
//! restores the original selection when it is dropped, so every exit path,
//! including `?` and panics, leaves the scene as it was found.

mod names;

pub use names::{NameTable, StagedObject};

use crate::metadata::{Properties, PropertySet};
use crate::scene::{Scene, SceneCodec};
use crate::util::{Error, Result};

/// What to do with the duplicates before encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StagingOptions {
    /// Bake the modifier stack of every mesh duplicate.
    pub apply_modifiers: bool,
    /// Join all mesh duplicates into one object named after the export.
    pub combine_meshes: bool,
}

impl Default for StagingOptions {
    fn default() -> Self {
        Self {
            apply_modifiers: true,
            combine_meshes: true,
        }
    }
}

/// Pipeline position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StagingState {
    Empty,
    Duplicated,
    Merged,
    Unmerged,
    Encoded,
    Cleaned,
}

/// Staged duplicates of one export, bound to the scene they live in.
pub struct StagingSet<'a> {
    scene: &'a mut dyn Scene,
    table: NameTable,
    state: StagingState,
    original_selection: Vec<String>,
}

impl<'a> StagingSet<'a> {
    /// Duplicate `selection` and merge meshes as `options` ask.
    ///
    /// On error, whatever was already staged is cleaned up before returning.
    pub fn stage(
        scene: &'a mut dyn Scene,
        selection: &[String],
        options: StagingOptions,
        base_name: &str,
    ) -> Result<Self> {
        if selection.is_empty() {
            return Err(Error::NothingSelected);
        }
        let original_selection = scene.selected();
        let mut set = Self {
            scene,
            table: NameTable::new(),
            state: StagingState::Empty,
            original_selection,
        };
        set.duplicate(selection, options.apply_modifiers)?;
        if options.combine_meshes {
            set.merge(base_name)?;
        } else {
            set.state = StagingState::Unmerged;
        }
        let names = set.table.names();
        set.scene.select(&names)?;
        tracing::debug!("Staged {} objects: {names:?}", names.len());
        Ok(set)
    }

    fn duplicate(&mut self, selection: &[String], apply_modifiers: bool) -> Result<()> {
        for origin in selection {
            let kind = self
                .scene
                .kind(origin)
                .ok_or_else(|| Error::ObjectNotFound(origin.clone()))?;
            let assigned = self.scene.duplicate(origin)?;
            self.table.push(origin, &assigned, kind);
            if kind.is_mesh() && apply_modifiers {
                self.scene.apply_modifiers(&assigned)?;
            }
        }
        self.state = StagingState::Duplicated;
        Ok(())
    }

    fn merge(&mut self, base_name: &str) -> Result<()> {
        let meshes = self.table.meshes();
        let Some(first) = meshes.first() else {
            tracing::warn!("Combine meshes requested but nothing selected is a mesh");
            self.state = StagingState::Unmerged;
            return Ok(());
        };

        self.scene.select(&meshes)?;
        self.scene.join(first, &meshes)?;
        let survivor = self.scene.rename(first, base_name)?;
        self.table.rename(first, &survivor);
        if survivor != base_name {
            tracing::warn!("Merged object named {survivor}, {base_name} is taken");
        }

        for other in &meshes[1..] {
            self.scene.remove(other)?;
            self.table.absorb(&survivor, other);
        }
        tracing::info!("Combined {} meshes into {survivor}", meshes.len());
        self.state = StagingState::Merged;
        Ok(())
    }

    pub fn state(&self) -> StagingState {
        self.state
    }

    /// Tracked duplicates.
    pub fn table(&self) -> &NameTable {
        &self.table
    }

    /// Current names of the tracked duplicates, in order.
    pub fn names(&self) -> Vec<String> {
        self.table.names()
    }

    pub fn scene(&self) -> &dyn Scene {
        &*self.scene
    }

    /// Select the tracked duplicates and encode exactly those.
    pub fn encode(&mut self, codec: &dyn SceneCodec) -> Result<Vec<u8>> {
        let names = self.table.names();
        self.scene.select(&names)?;
        let payload = codec.encode(&*self.scene, &names)?;
        tracing::debug!("Encoded {} objects into {} bytes", names.len(), payload.len());
        self.state = StagingState::Encoded;
        Ok(payload)
    }

    /// Gather custom properties for the metadata record.
    ///
    /// With `combine`, the flat set comes from the last object in the host's
    /// current selection. Otherwise every selected object with at least one
    /// property gets its own set keyed by name.
    pub fn collect_properties(&self, combine: bool) -> Result<Properties> {
        let selected = self.scene.selected();
        if combine {
            if let Some(last) = selected.last() {
                return Ok(Properties::flat(&self.scene.custom_properties(last)?));
            }
        }
        let sets = selected
            .iter()
            .map(|name| Ok((name.clone(), self.scene.custom_properties(name)?)))
            .collect::<Result<Vec<(String, PropertySet)>>>()?;
        Ok(Properties::per_object(
            sets.iter().map(|(name, set)| (name.as_str(), set)),
        ))
    }

    /// Remove the duplicates now and restore the selection.
    ///
    /// Returns the number of objects removed.
    pub fn cleanup(mut self) -> usize {
        self.release()
    }

    fn release(&mut self) -> usize {
        if self.state == StagingState::Cleaned {
            return 0;
        }
        let mut removed = 0;
        for name in self.table.names() {
            if !self.scene.contains(&name) {
                continue;
            }
            match self.scene.remove(&name) {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!("Failed to remove staged object {name}: {e}"),
            }
        }
        self.table = NameTable::new();

        let restore: Vec<String> = self
            .original_selection
            .iter()
            .filter(|n| self.scene.contains(n))
            .cloned()
            .collect();
        if let Err(e) = self.scene.select(&restore) {
            tracing::warn!("Failed to restore selection: {e}");
        }
        tracing::debug!("Cleaned up {removed} staged objects");
        self.state = StagingState::Cleaned;
        removed
    }
}

impl Drop for StagingSet<'_> {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for StagingSet<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StagingSet")
            .field("state", &self.state)
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}
