//! One-time reconciliation of the registry against the host catalog

use super::{BuffDefinition, BuffRegistry};
use crate::catalog::{BuffCatalog, CatalogError};
use crate::types::BuffPrefab;

/// Counts from a completed sync
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Known buffs whose duration, stack count or tag were corrected
    pub updated: usize,
    /// Known buffs that already matched the catalog
    pub unchanged: usize,
    /// Buffs seen for the first time
    pub inserted: usize,
}

impl SyncReport {
    /// Number of catalog entries that matched an existing definition
    pub fn known(&self) -> usize {
        self.updated + self.unchanged
    }
}

/// Result of a sync request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Applied(SyncReport),
    /// The registry was synced earlier; nothing changed
    AlreadySynced,
}

impl BuffRegistry {
    /// Merge live catalog entries into the registry, once per registry
    ///
    /// Known ids get their numeric fields corrected in place; policy flags and
    /// names are never touched. Unknown ids are inserted as non-extendable,
    /// non-beneficial definitions. Later calls are no-ops.
    pub fn sync<I>(&mut self, entries: I) -> SyncOutcome
    where
        I: IntoIterator<Item = BuffPrefab>,
    {
        if self.synced {
            return SyncOutcome::AlreadySynced;
        }

        let mut report = SyncReport::default();
        for prefab in entries {
            let duration = prefab.catalog_duration();
            let tag = prefab.exclusion_tag();

            match self.definitions.get_mut(&prefab.id) {
                Some(existing) => {
                    if existing.apply_runtime_values(duration, prefab.max_layers, tag.as_deref()) {
                        tracing::debug!(
                            id = prefab.id,
                            name = existing.display_name(),
                            duration,
                            max_stack = prefab.max_layers,
                            "Corrected buff definition from catalog"
                        );
                        report.updated += 1;
                    } else {
                        report.unchanged += 1;
                    }
                }
                None => {
                    tracing::debug!(id = prefab.id, name = %prefab.display_name, "Discovered catalog buff");
                    self.definitions.insert(prefab.id, BuffDefinition::from_prefab(&prefab));
                    report.inserted += 1;
                }
            }
        }

        self.synced = true;
        tracing::info!(
            updated = report.updated,
            unchanged = report.unchanged,
            inserted = report.inserted,
            total = self.definitions.len(),
            "Buff registry synced with host catalog"
        );
        SyncOutcome::Applied(report)
    }

    /// Take a snapshot from the host catalog and sync against it
    ///
    /// If the snapshot cannot be obtained the registry stays unsynced so the
    /// caller can retry.
    pub fn sync_from<C>(&mut self, catalog: &C) -> Result<SyncOutcome, CatalogError>
    where
        C: BuffCatalog + ?Sized,
    {
        if self.synced {
            return Ok(SyncOutcome::AlreadySynced);
        }
        let entries = catalog.snapshot()?;
        Ok(self.sync(entries))
    }

    /// Whether the one-time sync has completed
    pub fn is_synced(&self) -> bool {
        self.synced
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct OfflineCatalog;

    impl BuffCatalog for OfflineCatalog {
        fn snapshot(&self) -> Result<Vec<BuffPrefab>, CatalogError> {
            Err(CatalogError::Unavailable("host not loaded".to_string()))
        }
    }

    fn seeded() -> BuffRegistry {
        let mut registry = BuffRegistry::new();
        registry.add_seed(
            BuffDefinition::new(1001, "1001_Buff_BleedS", "Bleeding", 25.0, 3).with_tag(Some("Bleeding")),
        );
        registry.add_seed(
            BuffDefinition::new(1011, "1011_Buff_AddSpeed", "Haste", 120.0, 1)
                .with_allow_extension(true)
                .with_beneficial(true),
        );
        registry
    }

    #[test]
    fn test_sync_updates_and_inserts() {
        let mut registry = seeded();
        let catalog = vec![
            BuffPrefab::new(1001, "1001_Buff_BleedS", "Bleeding", 30.0, 3).with_tag("Bleeding"),
            BuffPrefab::new(1011, "1011_Buff_AddSpeed", "Haste", 120.0, 1),
            BuffPrefab::new(5001, "5001_Mod_Buff", "Modded", 12.0, 2).with_tag("ModGroup"),
        ];

        let outcome = registry.sync(catalog);
        assert_eq!(
            outcome,
            SyncOutcome::Applied(SyncReport {
                updated: 1,
                unchanged: 1,
                inserted: 1
            })
        );

        let bleed = registry.lookup(1001).unwrap();
        assert!((bleed.base_duration() - 30.0).abs() < f64::EPSILON);
        assert!(!bleed.allow_extension);

        let modded = registry.lookup(5001).unwrap();
        assert!(!modded.allow_extension);
        assert!(!modded.is_beneficial);
        assert_eq!(modded.exclusion_tag(), Some("ModGroup"));
    }

    #[test]
    fn test_sync_runs_once() {
        let mut registry = seeded();
        registry.sync(vec![BuffPrefab::new(1001, "1001_Buff_BleedS", "Bleeding", 30.0, 3)]);
        let after_first = registry.clone();

        let outcome = registry.sync(vec![
            BuffPrefab::new(1001, "1001_Buff_BleedS", "Bleeding", 99.0, 9),
            BuffPrefab::new(6000, "6000_Late", "Late", 5.0, 1),
        ]);
        assert_eq!(outcome, SyncOutcome::AlreadySynced);
        assert_eq!(registry, after_first);
    }

    #[test]
    fn test_sync_unlimited_catalog_entry() {
        let mut registry = seeded();
        registry.sync(vec![
            BuffPrefab::new(1001, "1001_Buff_BleedS", "Bleeding", 25.0, 3).unlimited(),
        ]);
        assert!(registry.lookup(1001).unwrap().is_infinite());
    }

    #[test]
    fn test_sync_empty_catalog() {
        let mut registry = seeded();
        let outcome = registry.sync(Vec::new());
        assert_eq!(outcome, SyncOutcome::Applied(SyncReport::default()));
        assert!(registry.is_synced());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_sync_from_unavailable_catalog_is_retryable() {
        let mut registry = seeded();
        let result = registry.sync_from(&OfflineCatalog);
        assert!(matches!(result, Err(CatalogError::Unavailable(_))));
        assert!(!registry.is_synced());

        let catalog = vec![BuffPrefab::new(5001, "5001_Mod_Buff", "Modded", 12.0, 2)];
        let outcome = registry.sync_from(&catalog).unwrap();
        assert!(matches!(outcome, SyncOutcome::Applied(report) if report.inserted == 1));
        assert!(registry.is_synced());
    }

    #[test]
    fn test_sync_from_after_sync() {
        let mut registry = seeded();
        registry.sync(Vec::new());
        // Catalog is not consulted again
        assert_eq!(registry.sync_from(&OfflineCatalog), Ok(SyncOutcome::AlreadySynced));
    }
}
