//! BuffDefinition - Static metadata for one kind of buff

use crate::types::{BuffId, BuffPrefab};
use serde::{Deserialize, Serialize};

/// Differences below this are treated as the same duration
const DURATION_EPSILON: f64 = 1e-4;

/// Known buff kind with the two policy flags this library owns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuffDefinition {
    id: BuffId,
    internal_name: String,
    display_name: String,
    /// Seconds; negative means the buff never expires on its own
    base_duration: f64,
    max_stack: u32,
    #[serde(default)]
    exclusion_tag: Option<String>,
    /// Whether durations of this buff may be rewritten
    #[serde(default)]
    pub allow_extension: bool,
    #[serde(default)]
    pub is_beneficial: bool,
}

impl BuffDefinition {
    /// Create a definition that is neither extendable nor beneficial
    pub fn new(id: BuffId, internal_name: &str, display_name: &str, base_duration: f64, max_stack: u32) -> Self {
        BuffDefinition {
            id,
            internal_name: internal_name.to_string(),
            display_name: display_name.to_string(),
            base_duration,
            max_stack,
            exclusion_tag: None,
            allow_extension: false,
            is_beneficial: false,
        }
    }

    /// Build a definition from a host prefab
    pub fn from_prefab(prefab: &BuffPrefab) -> Self {
        BuffDefinition {
            exclusion_tag: prefab.exclusion_tag(),
            ..Self::new(
                prefab.id,
                &prefab.internal_name,
                &prefab.display_name,
                prefab.catalog_duration(),
                prefab.max_layers,
            )
        }
    }

    pub fn with_tag(mut self, tag: Option<&str>) -> Self {
        self.exclusion_tag = tag.filter(|t| !t.is_empty()).map(str::to_string);
        self
    }

    pub fn with_allow_extension(mut self, allow: bool) -> Self {
        self.allow_extension = allow;
        self
    }

    pub fn with_beneficial(mut self, beneficial: bool) -> Self {
        self.is_beneficial = beneficial;
        self
    }

    pub fn id(&self) -> BuffId {
        self.id
    }

    pub fn internal_name(&self) -> &str {
        &self.internal_name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn base_duration(&self) -> f64 {
        self.base_duration
    }

    pub fn max_stack(&self) -> u32 {
        self.max_stack
    }

    pub fn exclusion_tag(&self) -> Option<&str> {
        self.exclusion_tag.as_deref()
    }

    pub fn is_infinite(&self) -> bool {
        self.base_duration < 0.0
    }

    /// Correct numeric fields from live host data
    ///
    /// Only duration, stack count and tag are touched, and only when the
    /// duration or stack count actually differ. A missing live tag never
    /// clears a stored one. Returns true if the definition changed.
    pub fn apply_runtime_values(&mut self, duration: f64, max_stack: u32, tag: Option<&str>) -> bool {
        let duration_differs = (self.base_duration - duration).abs() > DURATION_EPSILON;
        if !duration_differs && self.max_stack == max_stack {
            return false;
        }

        self.base_duration = duration;
        self.max_stack = max_stack;
        if let Some(tag) = tag.filter(|t| !t.is_empty()) {
            self.exclusion_tag = Some(tag.to_string());
        }
        true
    }
}
