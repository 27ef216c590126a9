//! Buff-apply hook - the before/after callbacks the host invokes around each application

mod target;

pub use target::{ActiveBuff, AppliedBuff, BuffList, BuffTarget};

use crate::catalog::{BuffCatalog, CatalogError};
use crate::config::BuffConfig;
use crate::duration::compute_final_duration;
use crate::policy::{resolve_policy, DenyReason, PolicyDecision};
use crate::registry::{BuffRegistry, SyncOutcome};
use crate::types::BuffPrefab;

/// Remaining duration of the same buff captured before the host applied it
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PreviousDuration(pub f64);

impl PreviousDuration {
    /// Token for a buff that was not active
    pub fn none() -> Self {
        PreviousDuration(0.0)
    }
}

/// What the after-phase did to the applied buff
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ApplyOutcome {
    /// No instance with the prefab's id was found on the target
    NotApplied,
    /// Instance has no natural expiry, nothing to rewrite
    Unlimited,
    /// Policy refused the rewrite; the host duration stands
    Denied(DenyReason),
    /// Remaining duration was rewritten
    Extended { previous: f64, requested: f64, duration: f64 },
}

/// Owns the registry and settings and rewrites durations around host buff applications
///
/// The host calls [`before_apply`](DurationHook::before_apply) right before it
/// applies a buff to a target and passes the returned token to
/// [`after_apply`](DurationHook::after_apply) once the buff is in place. No
/// other application of the same buff to the same target may happen between
/// the two calls.
#[derive(Debug, Clone, Default)]
pub struct DurationHook {
    registry: BuffRegistry,
    config: BuffConfig,
}

impl DurationHook {
    pub fn new(registry: BuffRegistry, config: BuffConfig) -> Self {
        DurationHook { registry, config }
    }

    pub fn registry(&self) -> &BuffRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut BuffRegistry {
        &mut self.registry
    }

    pub fn config(&self) -> &BuffConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut BuffConfig {
        &mut self.config
    }

    /// Sync the registry against the host catalog (once)
    pub fn sync_catalog<C>(&mut self, catalog: &C) -> Result<SyncOutcome, CatalogError>
    where
        C: BuffCatalog + ?Sized,
    {
        self.registry.sync_from(catalog)
    }

    /// Capture the remaining duration of the first active instance of the buff
    pub fn before_apply<T: BuffTarget>(&self, target: &T, prefab: &BuffPrefab) -> PreviousDuration {
        target
            .active_buffs()
            .iter()
            .find(|b| b.buff_id() == prefab.id)
            .map(|b| PreviousDuration(b.remaining_duration()))
            .unwrap_or_default()
    }

    /// Rewrite the duration of the newest instance of the buff, if policy allows
    pub fn after_apply<T: BuffTarget>(
        &mut self,
        target: &mut T,
        prefab: &BuffPrefab,
        previous: PreviousDuration,
    ) -> ApplyOutcome {
        let Some(applied) = target
            .active_buffs_mut()
            .iter_mut()
            .rev()
            .find(|b| b.buff_id() == prefab.id)
        else {
            return ApplyOutcome::NotApplied;
        };

        if !applied.has_limited_lifetime() {
            return ApplyOutcome::Unlimited;
        }

        let decision = resolve_policy(&mut self.registry, &self.config, prefab);
        if let PolicyDecision::Deny(reason) = decision {
            tracing::debug!(id = prefab.id, ?reason, "Buff duration left unchanged");
            return ApplyOutcome::Denied(reason);
        }

        let duration = compute_final_duration(
            prefab.total_lifetime,
            previous.0,
            self.config.duration_mode(),
            self.config.max_duration(),
        );
        applied.set_remaining_duration(duration);

        tracing::debug!(
            id = prefab.id,
            name = %prefab.display_name,
            previous = previous.0,
            requested = prefab.total_lifetime,
            duration,
            "Buff duration rewritten"
        );
        ApplyOutcome::Extended {
            previous: previous.0,
            requested: prefab.total_lifetime,
            duration,
        }
    }

    /// Run a full application: capture, let the host apply, rewrite
    pub fn apply_with<T, F>(&mut self, target: &mut T, prefab: &BuffPrefab, host_apply: F) -> ApplyOutcome
    where
        T: BuffTarget,
        F: FnOnce(&mut T, &BuffPrefab),
    {
        let previous = self.before_apply(target, prefab);
        host_apply(target, prefab);
        self.after_apply(target, prefab, previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::BuffDefinition;

    fn haste() -> BuffPrefab {
        BuffPrefab::new(1011, "1011_Buff_AddSpeed", "Haste", 120.0, 1)
    }

    fn hook(multiplier: f64, allow_stack: bool) -> DurationHook {
        let mut registry = BuffRegistry::new();
        registry.add_seed(
            BuffDefinition::new(1011, "1011_Buff_AddSpeed", "Haste", 120.0, 1)
                .with_allow_extension(true)
                .with_beneficial(true),
        );
        registry.add_seed(BuffDefinition::new(1081, "1081_Buff_Pain", "Pain", 0.5, 1));

        let mut config = BuffConfig::default();
        config.set_duration_multiplier(multiplier);
        config.set_allow_stack(allow_stack);
        DurationHook::new(registry, config)
    }

    fn apply(hook: &mut DurationHook, target: &mut BuffList, prefab: &BuffPrefab) -> ApplyOutcome {
        hook.apply_with(target, prefab, |t, p| t.add_buff(p))
    }

    #[test]
    fn test_first_application_multiplied() {
        let mut hook = hook(2.0, true);
        let mut target = BuffList::new();

        let outcome = apply(&mut hook, &mut target, &haste());
        assert!(matches!(outcome, ApplyOutcome::Extended { duration, .. } if (duration - 240.0).abs() < 0.01));
        assert!((target.get(1011).unwrap().duration_remaining - 240.0).abs() < 0.01);
    }

    #[test]
    fn test_reapplication_stacks_remaining() {
        let mut hook = hook(2.0, true);
        let mut target = BuffList::new();

        apply(&mut hook, &mut target, &haste());
        target.tick(40.0);
        // 200 remaining + 120 * 2
        apply(&mut hook, &mut target, &haste());
        assert!((target.get(1011).unwrap().duration_remaining - 440.0).abs() < 0.01);
    }

    #[test]
    fn test_reapplication_without_stack_replaces() {
        let mut hook = hook(2.0, false);
        let mut target = BuffList::new();

        apply(&mut hook, &mut target, &haste());
        target.tick(40.0);
        apply(&mut hook, &mut target, &haste());
        assert!((target.get(1011).unwrap().duration_remaining - 240.0).abs() < 0.01);
    }

    #[test]
    fn test_before_apply_reads_previous() {
        let hook = hook(1.0, true);
        let mut target = BuffList::new();
        assert_eq!(hook.before_apply(&target, &haste()), PreviousDuration::none());

        target.add_buff(&haste());
        target.tick(20.0);
        let previous = hook.before_apply(&target, &haste());
        assert!((previous.0 - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_denied_keeps_host_duration() {
        let mut hook = hook(5.0, true);
        let mut target = BuffList::new();
        let pain = BuffPrefab::new(1081, "1081_Buff_Pain", "Pain", 0.5, 1);

        let outcome = apply(&mut hook, &mut target, &pain);
        assert_eq!(outcome, ApplyOutcome::Denied(DenyReason::NotExtendable));
        assert!((target.get(1081).unwrap().duration_remaining - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_unlimited_bypasses_policy() {
        let mut hook = hook(5.0, true);
        let mut target = BuffList::new();
        let unknown = BuffPrefab::new(8000, "8000_Mod_Aura", "Aura", 0.0, 1).unlimited();

        let outcome = apply(&mut hook, &mut target, &unknown);
        assert_eq!(outcome, ApplyOutcome::Unlimited);
        // Never reached discovery
        assert!(!hook.registry().contains(8000));
    }

    #[test]
    fn test_not_applied() {
        let mut hook = hook(2.0, true);
        let mut target = BuffList::new();

        // Host refused to apply (e.g. immunity)
        let outcome = hook.apply_with(&mut target, &haste(), |_, _| {});
        assert_eq!(outcome, ApplyOutcome::NotApplied);
    }

    #[test]
    fn test_discovered_buff_registered() {
        let mut hook = hook(2.0, true);
        hook.config_mut().set_whitelist("9000");
        let mut target = BuffList::new();
        let modded = BuffPrefab::new(9000, "9000_Mod_Buff", "Modded", 10.0, 1);

        let outcome = apply(&mut hook, &mut target, &modded);
        assert!(matches!(outcome, ApplyOutcome::Extended { duration, .. } if (duration - 20.0).abs() < 0.01));
        assert!(hook.registry().lookup(9000).unwrap().allow_extension);
    }

    #[test]
    fn test_infinite_mode() {
        let mut hook = hook(2.0, true);
        hook.config_mut().set_enable_infinite_duration(true);
        let mut target = BuffList::new();

        apply(&mut hook, &mut target, &haste());
        assert!((target.get(1011).unwrap().duration_remaining - 86400.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_sync_catalog_through_hook() {
        let mut hook = hook(1.0, true);
        let catalog = vec![BuffPrefab::new(1081, "1081_Buff_Pain", "Pain", 1.0, 1)];
        assert!(matches!(hook.sync_catalog(&catalog), Ok(SyncOutcome::Applied(_))));
        assert_eq!(hook.sync_catalog(&catalog), Ok(SyncOutcome::AlreadySynced));
    }
}
