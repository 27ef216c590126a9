//! Persisted key-value settings store

use super::ConfigError;
use std::path::Path;
use toml::{Table, Value};

/// Setting keys used by [`BuffConfig`](super::BuffConfig)
pub mod keys {
    pub const DURATION_MULTIPLIER: &str = "buff_duration_multiplier";
    pub const ALLOW_STACK: &str = "allow_buff_stack";
    pub const ENABLE_INFINITE_DURATION: &str = "enable_infinite_duration";
    pub const WHITELIST_IDS: &str = "custom_whitelist_ids";
    pub const BLACKLIST_IDS: &str = "custom_blacklist_ids";
}

/// Result of a typed settings lookup
#[derive(Debug, Clone, PartialEq)]
pub enum Setting<T> {
    /// Key present and well-formed
    Present(T),
    /// Key not stored
    Absent,
    /// Key stored with a value of the wrong type
    Malformed,
}

impl<T> Setting<T> {
    /// Take the value if present, discarding absent and malformed lookups
    pub fn present(self) -> Option<T> {
        match self {
            Setting::Present(value) => Some(value),
            Setting::Absent | Setting::Malformed => None,
        }
    }
}

/// Typed read access to persisted settings
pub trait SettingsStore {
    fn get_float(&self, key: &str) -> Setting<f64>;
    fn get_bool(&self, key: &str) -> Setting<bool>;
    fn get_string(&self, key: &str) -> Setting<String>;
}

/// Settings store backed by a flat TOML table
#[derive(Debug, Clone, Default)]
pub struct TomlSettingsStore {
    table: Table,
}

impl TomlSettingsStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse settings from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let table: Table = super::parse_toml(content)?;
        Ok(TomlSettingsStore { table })
    }

    /// Read settings from a TOML file
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let table: Table = super::load_toml(path)?;
        Ok(TomlSettingsStore { table })
    }

    pub fn set_float(&mut self, key: &str, value: f64) {
        self.table.insert(key.to_string(), Value::Float(value));
    }

    pub fn set_bool(&mut self, key: &str, value: bool) {
        self.table.insert(key.to_string(), Value::Boolean(value));
    }

    pub fn set_string(&mut self, key: &str, value: &str) {
        self.table.insert(key.to_string(), Value::String(value.to_string()));
    }

    /// Serialize the store for persistence
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string(&self.table).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

impl SettingsStore for TomlSettingsStore {
    fn get_float(&self, key: &str) -> Setting<f64> {
        match self.table.get(key) {
            None => Setting::Absent,
            Some(Value::Float(value)) if value.is_finite() => Setting::Present(*value),
            // Whole numbers written without a decimal point
            Some(Value::Integer(value)) => Setting::Present(*value as f64),
            Some(_) => Setting::Malformed,
        }
    }

    fn get_bool(&self, key: &str) -> Setting<bool> {
        match self.table.get(key) {
            None => Setting::Absent,
            Some(Value::Boolean(value)) => Setting::Present(*value),
            Some(_) => Setting::Malformed,
        }
    }

    fn get_string(&self, key: &str) -> Setting<String> {
        match self.table.get(key) {
            None => Setting::Absent,
            Some(Value::String(value)) => Setting::Present(value.clone()),
            Some(_) => Setting::Malformed,
        }
    }
}
