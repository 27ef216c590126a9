//! Buff definition registry

mod definition;
mod seed;
mod sync;

pub use definition::BuffDefinition;
pub use seed::{default_seed_definitions, parse_seed_table, SeedTable};
pub use sync::{SyncOutcome, SyncReport};

use crate::types::BuffId;
use std::collections::HashMap;

/// Known buff definitions keyed by id
///
/// Entries are never removed. Population happens in three stages: seed data
/// at construction, a single [`sync`](BuffRegistry::sync) against the host
/// catalog, then ad-hoc registration as unseen buffs are applied in play.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuffRegistry {
    definitions: HashMap<BuffId, BuffDefinition>,
    synced: bool,
}

impl BuffRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        BuffRegistry {
            definitions: HashMap::new(),
            synced: false,
        }
    }

    /// Create a registry holding the built-in seed definitions
    pub fn with_seed_data() -> Self {
        let mut registry = Self::new();
        for definition in default_seed_definitions() {
            registry.add_seed(definition);
        }
        registry
    }

    /// Insert a seed definition unless its id is already present
    pub fn add_seed(&mut self, definition: BuffDefinition) {
        self.definitions.entry(definition.id()).or_insert(definition);
    }

    /// Insert a definition discovered at runtime or supplied by an extension
    ///
    /// Returns false if the id was already known; the existing entry is kept.
    pub fn register_external(&mut self, definition: BuffDefinition) -> bool {
        if self.definitions.contains_key(&definition.id()) {
            return false;
        }
        self.definitions.insert(definition.id(), definition);
        true
    }

    /// Get a definition by id
    pub fn lookup(&self, id: BuffId) -> Option<&BuffDefinition> {
        self.definitions.get(&id)
    }

    pub fn contains(&self, id: BuffId) -> bool {
        self.definitions.contains_key(&id)
    }

    /// Toggle the extension flag of a known buff, returns false for unknown ids
    pub fn set_allow_extension(&mut self, id: BuffId, allow: bool) -> bool {
        match self.definitions.get_mut(&id) {
            Some(definition) => {
                definition.allow_extension = allow;
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Iterate definitions in arbitrary order
    pub fn iter(&self) -> impl Iterator<Item = &BuffDefinition> {
        self.definitions.values()
    }

    /// All definitions ordered by id
    pub fn sorted(&self) -> Vec<&BuffDefinition> {
        let mut definitions: Vec<_> = self.definitions.values().collect();
        definitions.sort_by_key(|d| d.id());
        definitions
    }

    /// Ids of every buff currently flagged as extendable, ascending
    pub fn allowed_extension_ids(&self) -> Vec<BuffId> {
        let mut ids: Vec<BuffId> = self
            .definitions
            .values()
            .filter(|d| d.allow_extension)
            .map(|d| d.id())
            .collect();
        ids.sort_unstable();
        ids
    }

    /// Log the extendable buffs for inspection
    pub fn log_allowed_extensions(&self) -> Vec<BuffId> {
        let ids = self.allowed_extension_ids();
        tracing::info!(count = ids.len(), "Buffs allowed to extend");
        for &id in &ids {
            if let Some(definition) = self.lookup(id) {
                tracing::info!(id, name = definition.display_name(), "Extendable buff");
            }
        }
        ids
    }
}
