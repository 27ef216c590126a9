//! User-tunable buff duration settings

use super::settings::{keys, Setting, SettingsStore, TomlSettingsStore};
use crate::duration::DurationMode;
use crate::types::BuffId;
use std::cell::OnceCell;
use std::collections::HashSet;

/// Ceiling for any rewritten duration (one day, in seconds)
pub const MAX_BUFF_DURATION: f64 = 86400.0;
/// Smallest accepted duration multiplier
pub const MIN_MULTIPLIER: f64 = 1.0;
/// Largest accepted duration multiplier
pub const MAX_MULTIPLIER: f64 = 20.0;

const DEFAULT_MULTIPLIER: f64 = 1.0;
const DEFAULT_ALLOW_STACK: bool = true;
/// Multiplier changes smaller than this are not treated as edits
const MULTIPLIER_TOLERANCE: f64 = 0.001;

/// Delimiters accepted between ids, including the full-width comma
const ID_DELIMITERS: &[char] = &[',', ';', '，'];

/// Parse a free-form list of buff ids, skipping tokens that are not integers
pub fn parse_id_list(raw: &str) -> HashSet<BuffId> {
    raw.split(|c: char| c.is_whitespace() || ID_DELIMITERS.contains(&c))
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.parse::<BuffId>().ok())
        .collect()
}

/// A user-edited id list with a lazily parsed set
///
/// Editing the raw string drops the parsed set; it is rebuilt on the next read.
#[derive(Debug, Clone, Default)]
pub struct IdList {
    raw: String,
    parsed: OnceCell<HashSet<BuffId>>,
}

impl IdList {
    pub fn new(raw: &str) -> Self {
        IdList {
            raw: raw.to_string(),
            parsed: OnceCell::new(),
        }
    }

    /// The raw string as the user typed it
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Replace the raw string, returns true if it changed
    pub fn set_raw(&mut self, raw: &str) -> bool {
        if self.raw == raw {
            return false;
        }
        self.raw = raw.to_string();
        self.parsed = OnceCell::new();
        true
    }

    /// Parsed ids, computed on first access after an edit
    pub fn ids(&self) -> &HashSet<BuffId> {
        self.parsed.get_or_init(|| parse_id_list(&self.raw))
    }

    pub fn contains(&self, id: BuffId) -> bool {
        self.ids().contains(&id)
    }

    /// Whether the parsed set is currently cached
    pub fn is_cached(&self) -> bool {
        self.parsed.get().is_some()
    }
}

/// Which settings a load actually applied
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub applied: usize,
    pub rejected: usize,
}

/// Duration extension settings read on every buff-apply event
#[derive(Debug, Clone)]
pub struct BuffConfig {
    duration_multiplier: f64,
    allow_stack: bool,
    enable_infinite_duration: bool,
    max_duration: f64,
    whitelist: IdList,
    blacklist: IdList,
    /// Bumped on every effective change, for UI refresh
    revision: u64,
}

impl Default for BuffConfig {
    fn default() -> Self {
        BuffConfig {
            duration_multiplier: DEFAULT_MULTIPLIER,
            allow_stack: DEFAULT_ALLOW_STACK,
            enable_infinite_duration: false,
            max_duration: MAX_BUFF_DURATION,
            whitelist: IdList::default(),
            blacklist: IdList::default(),
            revision: 0,
        }
    }
}

impl BuffConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a config from defaults overlaid with persisted settings
    pub fn from_store(store: &dyn SettingsStore) -> Self {
        let mut config = Self::default();
        config.load(store);
        config
    }

    /// Overlay persisted settings onto the current values
    ///
    /// Absent keys keep their current value. Malformed values and
    /// multipliers outside [MIN_MULTIPLIER, MAX_MULTIPLIER] are discarded.
    pub fn load(&mut self, store: &dyn SettingsStore) -> LoadReport {
        let mut report = LoadReport::default();

        match store.get_float(keys::DURATION_MULTIPLIER) {
            Setting::Present(value) if (MIN_MULTIPLIER..=MAX_MULTIPLIER).contains(&value) => {
                self.duration_multiplier = value;
                report.applied += 1;
            }
            Setting::Present(value) => {
                tracing::warn!(value, "Ignoring out-of-range duration multiplier");
                report.rejected += 1;
            }
            Setting::Malformed => {
                tracing::warn!(key = keys::DURATION_MULTIPLIER, "Ignoring malformed setting");
                report.rejected += 1;
            }
            Setting::Absent => {}
        }

        load_bool(store, keys::ALLOW_STACK, &mut self.allow_stack, &mut report);
        load_bool(
            store,
            keys::ENABLE_INFINITE_DURATION,
            &mut self.enable_infinite_duration,
            &mut report,
        );
        load_id_list(store, keys::WHITELIST_IDS, &mut self.whitelist, &mut report);
        load_id_list(store, keys::BLACKLIST_IDS, &mut self.blacklist, &mut report);

        if report.applied > 0 {
            self.revision += 1;
        }
        report
    }

    /// Write the current values back to a settings store
    pub fn save(&self, store: &mut TomlSettingsStore) {
        store.set_float(keys::DURATION_MULTIPLIER, self.duration_multiplier);
        store.set_bool(keys::ALLOW_STACK, self.allow_stack);
        store.set_bool(keys::ENABLE_INFINITE_DURATION, self.enable_infinite_duration);
        store.set_string(keys::WHITELIST_IDS, self.whitelist.raw());
        store.set_string(keys::BLACKLIST_IDS, self.blacklist.raw());
    }

    // === Accessors ===

    pub fn duration_multiplier(&self) -> f64 {
        self.duration_multiplier
    }

    pub fn allow_stack(&self) -> bool {
        self.allow_stack
    }

    pub fn enable_infinite_duration(&self) -> bool {
        self.enable_infinite_duration
    }

    pub fn max_duration(&self) -> f64 {
        self.max_duration
    }

    pub fn whitelist(&self) -> &IdList {
        &self.whitelist
    }

    pub fn blacklist(&self) -> &IdList {
        &self.blacklist
    }

    pub fn is_whitelisted(&self, id: BuffId) -> bool {
        self.whitelist.contains(id)
    }

    pub fn is_blacklisted(&self, id: BuffId) -> bool {
        self.blacklist.contains(id)
    }

    /// Change counter, bumped whenever a setter alters a value
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Duration rule currently in effect
    pub fn duration_mode(&self) -> DurationMode {
        if self.enable_infinite_duration {
            DurationMode::ForceMaximum
        } else {
            DurationMode::Multiply {
                multiplier: self.duration_multiplier,
                allow_stack: self.allow_stack,
            }
        }
    }

    // === Setters ===

    /// Set the duration multiplier, returns false if it is outside the accepted range
    pub fn set_duration_multiplier(&mut self, value: f64) -> bool {
        if !(MIN_MULTIPLIER..=MAX_MULTIPLIER).contains(&value) {
            return false;
        }
        if (self.duration_multiplier - value).abs() > MULTIPLIER_TOLERANCE {
            self.duration_multiplier = value;
            self.revision += 1;
        }
        true
    }

    pub fn set_allow_stack(&mut self, value: bool) {
        if self.allow_stack != value {
            self.allow_stack = value;
            self.revision += 1;
        }
    }

    pub fn set_enable_infinite_duration(&mut self, value: bool) {
        if self.enable_infinite_duration != value {
            self.enable_infinite_duration = value;
            self.revision += 1;
        }
    }

    pub fn set_whitelist(&mut self, raw: &str) {
        if self.whitelist.set_raw(raw) {
            self.revision += 1;
        }
    }

    pub fn set_blacklist(&mut self, raw: &str) {
        if self.blacklist.set_raw(raw) {
            self.revision += 1;
        }
    }
}

fn load_bool(store: &dyn SettingsStore, key: &str, target: &mut bool, report: &mut LoadReport) {
    match store.get_bool(key) {
        Setting::Present(value) => {
            *target = value;
            report.applied += 1;
        }
        Setting::Malformed => {
            tracing::warn!(key, "Ignoring malformed setting");
            report.rejected += 1;
        }
        Setting::Absent => {}
    }
}

fn load_id_list(store: &dyn SettingsStore, key: &str, target: &mut IdList, report: &mut LoadReport) {
    match store.get_string(key) {
        Setting::Present(value) => {
            target.set_raw(&value);
            report.applied += 1;
        }
        Setting::Malformed => {
            tracing::warn!(key, "Ignoring malformed setting");
            report.rejected += 1;
        }
        Setting::Absent => {}
    }
}
