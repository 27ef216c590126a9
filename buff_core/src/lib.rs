//! buff_core - Buff duration extension policy for game characters
//!
//! This library provides:
//! - BuffRegistry: Known buff definitions, seeded at startup and synced once against the host catalog
//! - Policy resolution: Blacklist / database flag / whitelist decision per buff-apply event
//! - Duration engine: Multiplier, stacking and force-to-maximum duration arithmetic
//! - DurationHook: Before/after callbacks the host invokes around each buff application
//! - Export: Tabular snapshot of the registry for inspection

pub mod catalog;
pub mod config;
pub mod duration;
pub mod export;
pub mod hook;
pub mod policy;
pub mod prelude;
pub mod registry;
pub mod types;

// Re-export core types for convenience
pub use catalog::{BuffCatalog, CatalogError};
pub use config::{BuffConfig, ConfigError, IdList, SettingsStore, TomlSettingsStore, MAX_BUFF_DURATION};
pub use duration::{compute_final_duration, DurationMode};
pub use export::{export_csv, export_json, parse_csv, ExportError, ExportRow};
pub use hook::{ActiveBuff, AppliedBuff, ApplyOutcome, BuffList, BuffTarget, DurationHook, PreviousDuration};
pub use policy::{resolve_policy, AllowReason, DenyReason, PolicyDecision};
pub use registry::{BuffDefinition, BuffRegistry, SyncOutcome, SyncReport};
pub use types::{BuffId, BuffPrefab};
