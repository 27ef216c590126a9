//! Stand-in host catalog built from the seed table plus a few modded buffs

use buff_core::catalog::{BuffCatalog, CatalogError};
use buff_core::{BuffPrefab, BuffRegistry};
use rand::Rng;

/// Buffs the registry has never seen, as another mod would add them
const MOD_BUFFS: &[(i32, &str, &str, f64, u32)] = &[
    (5001, "5001_Mod_Focus", "Focus", 45.0, 1),
    (5002, "5002_Mod_Rage", "Rage", 20.0, 3),
    (5003, "5003_Mod_Curse", "Curse", 15.0, 1),
];

/// In-memory host catalog
#[derive(Debug, Clone)]
pub struct SimCatalog {
    prefabs: Vec<BuffPrefab>,
    /// Prefabs only revealed when first applied, never listed in the catalog
    hidden: Vec<BuffPrefab>,
}

impl SimCatalog {
    /// Mirror the seed table, drifting some durations the way a game patch would
    pub fn generate(rng: &mut impl Rng, drift_chance: f64) -> Self {
        let seed = BuffRegistry::with_seed_data();
        let mut prefabs: Vec<BuffPrefab> = seed
            .sorted()
            .into_iter()
            .map(|definition| {
                let mut prefab = BuffPrefab::new(
                    definition.id(),
                    definition.internal_name(),
                    definition.display_name(),
                    definition.base_duration(),
                    definition.max_stack(),
                )
                .with_tag(definition.exclusion_tag().unwrap_or(buff_core::types::NOT_EXCLUSIVE_TAG));
                if definition.is_infinite() {
                    prefab = prefab.unlimited();
                } else if rng.gen_bool(drift_chance) {
                    prefab.total_lifetime = (prefab.total_lifetime * rng.gen_range(0.5..1.5)).max(0.5);
                }
                prefab
            })
            .collect();

        let (listed, hidden) = MOD_BUFFS.split_at(1);
        prefabs.extend(listed.iter().map(mod_prefab));

        SimCatalog {
            prefabs,
            hidden: hidden.iter().map(mod_prefab).collect(),
        }
    }

    /// Every prefab a character can receive, listed or not
    pub fn applicable(&self) -> Vec<BuffPrefab> {
        self.prefabs.iter().chain(self.hidden.iter()).cloned().collect()
    }
}

impl BuffCatalog for SimCatalog {
    fn snapshot(&self) -> Result<Vec<BuffPrefab>, CatalogError> {
        // An empty catalog is a valid (if unusual) host state
        Ok(self.prefabs.clone())
    }
}

fn mod_prefab(&(id, internal_name, display_name, lifetime, max_layers): &(i32, &str, &str, f64, u32)) -> BuffPrefab {
    BuffPrefab::new(id, internal_name, display_name, lifetime, max_layers)
}
