//! Single source of truth for working-memory decay (§4.7).

use crate::types::WorkingMemoryItem;
use chrono::{DateTime, Utc};

/// Current activation of an item that had activation `a0` at time `since`,
/// observed at `now`: `A(Δt) = A0 · exp(−λ·Δt)` where
/// `λ = decay_rate · (1 − 0.5·importance)`.
#[must_use]
pub fn current_activation(a0: f32, decay_rate: f32, importance: f32, delta_t_secs: f32) -> f32 {
    let lambda = decay_rate * (1.0 - 0.5 * importance);
    a0 * (-lambda * delta_t_secs).exp()
}

/// Floor below which an item is a candidate for eviction regardless of
/// buffer capacity (§4.7).
pub const DECAY_FLOOR: f32 = 0.1;

/// [`current_activation`] evaluated for `item` at `now`.
#[must_use]
pub fn item_activation(item: &WorkingMemoryItem, now: DateTime<Utc>) -> f32 {
    let delta_t = (now - item.last_accessed).num_milliseconds().max(0) as f32 / 1000.0;
    current_activation(
        item.activation_level,
        item.decay_rate,
        item.importance,
        delta_t,
    )
}

/// Whether `item`'s current activation has fallen below [`DECAY_FLOOR`].
#[must_use]
pub fn is_decayed(item: &WorkingMemoryItem, now: DateTime<Utc>) -> bool {
    item_activation(item, now) < DECAY_FLOOR
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decays_toward_zero() {
        let a = current_activation(1.0, 0.1, 0.0, 0.0);
        let b = current_activation(1.0, 0.1, 0.0, 10.0);
        assert!((a - 1.0).abs() < 1e-6);
        assert!(b < a);
    }

    #[test]
    fn higher_importance_slows_decay() {
        let low_importance = current_activation(1.0, 0.1, 0.0, 20.0);
        let high_importance = current_activation(1.0, 0.1, 1.0, 20.0);
        assert!(high_importance > low_importance);
    }
}
