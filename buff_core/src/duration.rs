//! Duration engine - rewrites the lifetime of an allowed buff application

use serde::{Deserialize, Serialize};

/// How an allowed buff's duration is rewritten
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DurationMode {
    /// Scale the requested duration, optionally adding it on top of the remaining time
    Multiply { multiplier: f64, allow_stack: bool },
    /// Ignore the request and pin the buff to the ceiling
    ForceMaximum,
}

/// Compute the final remaining duration for an allowed buff application
///
/// `previous_remaining` is the remaining time of the same buff on the target
/// captured before the host applied it (0 when it was not active). The
/// result never exceeds `max_duration`.
///
/// Buffs with an unlimited lifetime must not be routed here.
pub fn compute_final_duration(
    requested_base: f64,
    previous_remaining: f64,
    mode: DurationMode,
    max_duration: f64,
) -> f64 {
    let final_duration = match mode {
        DurationMode::ForceMaximum => max_duration,
        DurationMode::Multiply {
            multiplier,
            allow_stack,
        } => {
            let single_shot = requested_base * multiplier;
            if allow_stack {
                previous_remaining + single_shot
            } else {
                single_shot
            }
        }
    };

    final_duration.min(max_duration)
}
