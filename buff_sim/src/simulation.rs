//! Buff application simulation

use buff_core::hook::ApplyOutcome;
use buff_core::{BuffList, BuffPrefab, DurationHook};
use rand::seq::SliceRandom;
use rand::Rng;

/// Counters from a simulation run
#[derive(Debug, Clone, Default)]
pub struct BuffSimulation {
    pub applications: u32,
    pub extended: u32,
    pub denied: u32,
    pub unlimited: u32,
    pub expired: u32,
    /// Seconds added on top of what the host would have granted
    pub bonus_seconds: f64,
    pub longest_duration: f64,
}

impl BuffSimulation {
    /// Apply random buffs to one character, advancing time between events
    ///
    /// A `max_gap` that is not a positive finite number freezes the clock.
    pub fn run(
        hook: &mut DurationHook,
        character: &mut BuffList,
        prefabs: &[BuffPrefab],
        events: u32,
        max_gap: f64,
        rng: &mut impl Rng,
    ) -> Self {
        let mut result = BuffSimulation::default();

        for _ in 0..events {
            let Some(prefab) = prefabs.choose(rng) else {
                break;
            };

            let outcome = hook.apply_with(character, prefab, |target, p| target.add_buff(p));
            result.record(&outcome);

            let gap = if max_gap.is_finite() && max_gap > 0.0 {
                rng.gen_range(0.0..max_gap)
            } else {
                0.0
            };
            result.expired += character.tick(gap).len() as u32;
        }

        result
    }

    fn record(&mut self, outcome: &ApplyOutcome) {
        self.applications += 1;
        match *outcome {
            ApplyOutcome::Extended {
                requested, duration, ..
            } => {
                self.extended += 1;
                self.bonus_seconds += (duration - requested).max(0.0);
                self.longest_duration = self.longest_duration.max(duration);
            }
            ApplyOutcome::Denied(_) => self.denied += 1,
            ApplyOutcome::Unlimited => self.unlimited += 1,
            ApplyOutcome::NotApplied => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use buff_core::{BuffConfig, BuffRegistry};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_run_counts_every_event() {
        let mut hook = DurationHook::new(BuffRegistry::with_seed_data(), BuffConfig::default());
        let mut character = BuffList::new();
        let prefabs = vec![
            BuffPrefab::new(1011, "1011_Buff_AddSpeed", "Haste", 120.0, 1),
            BuffPrefab::new(1081, "1081_Buff_Pain", "Pain", 0.5, 1),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let result = BuffSimulation::run(&mut hook, &mut character, &prefabs, 50, 5.0, &mut rng);
        assert_eq!(result.applications, 50);
        assert_eq!(result.extended + result.denied + result.unlimited, 50);
        assert!(result.longest_duration <= hook.config().max_duration());
    }

    #[test]
    fn test_run_without_prefabs() {
        let mut hook = DurationHook::default();
        let mut character = BuffList::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let result = BuffSimulation::run(&mut hook, &mut character, &[], 10, 1.0, &mut rng);
        assert_eq!(result.applications, 0);
    }

    #[test]
    fn test_run_with_unusable_gap() {
        let prefabs = vec![BuffPrefab::new(1011, "1011_Buff_AddSpeed", "Haste", 120.0, 1)];

        for max_gap in [f64::INFINITY, f64::NAN, 0.0, -3.0] {
            let mut hook = DurationHook::new(BuffRegistry::with_seed_data(), BuffConfig::default());
            let mut character = BuffList::new();
            let mut rng = ChaCha8Rng::seed_from_u64(3);

            let result = BuffSimulation::run(&mut hook, &mut character, &prefabs, 5, max_gap, &mut rng);
            assert_eq!(result.applications, 5);
            assert_eq!(result.expired, 0);
        }
    }
}
