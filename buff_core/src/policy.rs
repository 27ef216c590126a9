//! Policy resolution - decides whether a buff's duration may be rewritten

use crate::config::BuffConfig;
use crate::registry::{BuffDefinition, BuffRegistry};
use crate::types::BuffPrefab;

/// Why an application was allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllowReason {
    /// Registry flags the buff as extendable
    Extendable,
    /// User whitelist overrides a non-extendable registry entry
    Whitelisted,
    /// Unknown buff registered on the spot because the user whitelisted it
    DiscoveredWhitelisted,
}

/// Why an application was denied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// User blacklist, checked before anything else
    Blacklisted,
    /// Registry entry is not extendable and the user did not whitelist it
    NotExtendable,
    /// Unknown buff registered on the spot as non-extendable
    Discovered,
}

/// Outcome of policy resolution for one buff-apply event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyDecision {
    Allow(AllowReason),
    Deny(DenyReason),
}

impl PolicyDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, PolicyDecision::Allow(_))
    }
}

/// Decide whether the duration of `prefab` may be rewritten
///
/// Order:
/// 1. Blacklisted ids are denied, whatever the registry or whitelist say
/// 2. Known ids are allowed if flagged extendable or whitelisted
/// 3. Unknown ids are registered from the prefab with `allow_extension`
///    set to whitelist membership, and that membership is the decision
///
/// Step 3 is the only mutation; afterwards the id is never unknown again.
pub fn resolve_policy(registry: &mut BuffRegistry, config: &BuffConfig, prefab: &BuffPrefab) -> PolicyDecision {
    let id = prefab.id;

    if config.is_blacklisted(id) {
        return PolicyDecision::Deny(DenyReason::Blacklisted);
    }

    if let Some(definition) = registry.lookup(id) {
        return if definition.allow_extension {
            PolicyDecision::Allow(AllowReason::Extendable)
        } else if config.is_whitelisted(id) {
            PolicyDecision::Allow(AllowReason::Whitelisted)
        } else {
            PolicyDecision::Deny(DenyReason::NotExtendable)
        };
    }

    let wants_extension = config.is_whitelisted(id);
    let definition = BuffDefinition::from_prefab(prefab)
        .with_allow_extension(wants_extension)
        .with_beneficial(false);
    registry.register_external(definition);

    if wants_extension {
        tracing::info!(id, name = %prefab.display_name, "Registered whitelisted buff on first application");
        PolicyDecision::Allow(AllowReason::DiscoveredWhitelisted)
    } else {
        tracing::debug!(id, name = %prefab.display_name, "Registered unknown buff on first application");
        PolicyDecision::Deny(DenyReason::Discovered)
    }
}
