//! Prelude module for convenient imports
//!
//! ```rust
//! use buff_core::prelude::*;
//! ```

// Core types
pub use crate::types::{BuffId, BuffPrefab};

// Registry
pub use crate::registry::{BuffDefinition, BuffRegistry, SyncOutcome, SyncReport};

// Decision and duration
pub use crate::duration::{compute_final_duration, DurationMode};
pub use crate::policy::{resolve_policy, PolicyDecision};

// Host integration
pub use crate::catalog::BuffCatalog;
pub use crate::hook::{AppliedBuff, ApplyOutcome, BuffList, BuffTarget, DurationHook};

// Config
pub use crate::config::{BuffConfig, SettingsStore, TomlSettingsStore};
