//! Core types shared by the registry, the hook and the host catalog

use serde::{Deserialize, Serialize};

/// Numeric buff identifier assigned by the host
pub type BuffId = i32;

/// Exclusive tag value the host uses for "no exclusivity group"
pub const NOT_EXCLUSIVE_TAG: &str = "NotExclusive";

/// Stored duration for buffs without a natural expiry
pub const UNLIMITED_DURATION: f64 = -1.0;

/// Normalize a host exclusive tag: empty strings and the host sentinel mean no tag
pub fn normalize_tag(tag: &str) -> Option<String> {
    let tag = tag.trim();
    if tag.is_empty() || tag == NOT_EXCLUSIVE_TAG {
        None
    } else {
        Some(tag.to_string())
    }
}

/// Static buff record as the host declares it (a "prefab")
///
/// The same record is used for catalog snapshots and as the metadata of an
/// incoming buff-apply event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuffPrefab {
    pub id: BuffId,
    /// Host object name, e.g. "1001_Buff_BleedS"
    pub internal_name: String,
    /// Localized name shown to the player
    pub display_name: String,
    /// Lifetime in seconds, meaningful only when `limited_lifetime` is set
    pub total_lifetime: f64,
    pub limited_lifetime: bool,
    pub max_layers: u32,
    /// Raw exclusive tag, may be the host sentinel
    #[serde(default)]
    pub exclusive_tag: String,
}

impl BuffPrefab {
    /// Create a prefab with a limited lifetime and no exclusivity group
    pub fn new(id: BuffId, internal_name: &str, display_name: &str, total_lifetime: f64, max_layers: u32) -> Self {
        BuffPrefab {
            id,
            internal_name: internal_name.to_string(),
            display_name: display_name.to_string(),
            total_lifetime,
            limited_lifetime: true,
            max_layers,
            exclusive_tag: NOT_EXCLUSIVE_TAG.to_string(),
        }
    }

    /// Set the exclusive tag
    pub fn with_tag(mut self, tag: &str) -> Self {
        self.exclusive_tag = tag.to_string();
        self
    }

    /// Mark the prefab as having no natural expiry
    pub fn unlimited(mut self) -> Self {
        self.limited_lifetime = false;
        self
    }

    /// Duration as stored in the registry (negative for unlimited buffs)
    pub fn catalog_duration(&self) -> f64 {
        if self.limited_lifetime {
            self.total_lifetime
        } else {
            UNLIMITED_DURATION
        }
    }

    /// Exclusive tag with the host sentinel normalized away
    pub fn exclusion_tag(&self) -> Option<String> {
        normalize_tag(&self.exclusive_tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag("NotExclusive"), None);
        assert_eq!(normalize_tag(""), None);
        assert_eq!(normalize_tag("  "), None);
        assert_eq!(normalize_tag("Bleeding"), Some("Bleeding".to_string()));
    }

    #[test]
    fn test_catalog_duration() {
        let limited = BuffPrefab::new(1011, "1011_Buff_AddSpeed", "Haste", 120.0, 1);
        assert!((limited.catalog_duration() - 120.0).abs() < f64::EPSILON);

        let unlimited = BuffPrefab::new(1002, "1002_Buff_BleedUnlimit", "Bleeding", 5.0, 5).unlimited();
        assert!(unlimited.catalog_duration() < 0.0);
    }

    #[test]
    fn test_prefab_tag() {
        let prefab = BuffPrefab::new(1001, "1001_Buff_BleedS", "Bleeding", 25.0, 3);
        assert_eq!(prefab.exclusion_tag(), None);

        let tagged = prefab.with_tag("Bleeding");
        assert_eq!(tagged.exclusion_tag().as_deref(), Some("Bleeding"));
    }
}
