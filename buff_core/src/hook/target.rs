//! Host-side view of a character's active buffs

use crate::types::{BuffId, BuffPrefab};
use serde::{Deserialize, Serialize};

/// A buff instance currently applied to a character
pub trait AppliedBuff {
    fn buff_id(&self) -> BuffId;
    /// Remaining lifetime in seconds
    fn remaining_duration(&self) -> f64;
    fn set_remaining_duration(&mut self, duration: f64);
    /// False for buffs that never expire on their own
    fn has_limited_lifetime(&self) -> bool;
}

/// A character whose active buffs can be inspected and edited
pub trait BuffTarget {
    type Buff: AppliedBuff;

    /// Active buffs, oldest first
    fn active_buffs(&self) -> &[Self::Buff];
    fn active_buffs_mut(&mut self) -> &mut [Self::Buff];
}

/// Active buff on a character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveBuff {
    /// Buff identifier
    pub buff_id: BuffId,
    /// Display name
    pub name: String,
    /// Time remaining in seconds
    pub duration_remaining: f64,
    /// Current stack count
    pub stacks: u32,
    pub max_stacks: u32,
    pub limited_lifetime: bool,
}

impl ActiveBuff {
    /// Create a single-stack instance from a prefab
    pub fn from_prefab(prefab: &BuffPrefab) -> Self {
        ActiveBuff {
            buff_id: prefab.id,
            name: prefab.display_name.clone(),
            duration_remaining: prefab.total_lifetime,
            stacks: 1,
            max_stacks: prefab.max_layers.max(1),
            limited_lifetime: prefab.limited_lifetime,
        }
    }

    /// Add a stack, up to the maximum
    pub fn add_stack(&mut self) {
        if self.stacks < self.max_stacks {
            self.stacks += 1;
        }
    }

    /// Refresh duration
    pub fn refresh(&mut self, duration: f64) {
        self.duration_remaining = duration;
    }

    /// Tick the buff duration
    /// Returns true if the buff is still active
    pub fn tick(&mut self, delta: f64) -> bool {
        if !self.limited_lifetime {
            return true;
        }
        self.duration_remaining -= delta;
        self.is_active()
    }

    /// Check if the buff is active
    pub fn is_active(&self) -> bool {
        !self.limited_lifetime || self.duration_remaining > 0.0
    }
}

impl AppliedBuff for ActiveBuff {
    fn buff_id(&self) -> BuffId {
        self.buff_id
    }

    fn remaining_duration(&self) -> f64 {
        self.duration_remaining
    }

    fn set_remaining_duration(&mut self, duration: f64) {
        self.duration_remaining = duration;
    }

    fn has_limited_lifetime(&self) -> bool {
        self.limited_lifetime
    }
}

/// In-memory buff list behaving like a host buff manager
///
/// Applying a buff that is already active adds a stack and resets its
/// lifetime to the prefab value; otherwise a new instance is appended.
#[derive(Debug, Clone, Default)]
pub struct BuffList {
    buffs: Vec<ActiveBuff>,
}

impl BuffList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a prefab the way the host does, without any duration rewrite
    pub fn add_buff(&mut self, prefab: &BuffPrefab) {
        match self.buffs.iter_mut().find(|b| b.buff_id == prefab.id) {
            Some(existing) => {
                existing.add_stack();
                existing.refresh(prefab.total_lifetime);
            }
            None => self.buffs.push(ActiveBuff::from_prefab(prefab)),
        }
    }

    /// Advance time, returns the ids of buffs that expired
    pub fn tick(&mut self, delta: f64) -> Vec<BuffId> {
        for buff in self.buffs.iter_mut() {
            buff.tick(delta);
        }

        let expired = self
            .buffs
            .iter()
            .filter(|b| !b.is_active())
            .map(|b| b.buff_id)
            .collect();
        self.buffs.retain(|b| b.is_active());
        expired
    }

    pub fn get(&self, id: BuffId) -> Option<&ActiveBuff> {
        self.buffs.iter().find(|b| b.buff_id == id)
    }

    pub fn len(&self) -> usize {
        self.buffs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveBuff> {
        self.buffs.iter()
    }
}

impl BuffTarget for BuffList {
    type Buff = ActiveBuff;

    fn active_buffs(&self) -> &[ActiveBuff] {
        &self.buffs
    }

    fn active_buffs_mut(&mut self) -> &mut [ActiveBuff] {
        &mut self.buffs
    }
}
