//! Ongoing effects: multi-turn perturbations applied by espionage, blockade
//! and combat resolution (§3 OngoingEffect — intel corruption, NCV/SRP/tax
//! reduction, etc).

use crate::core::ids::{ColonyId, HouseId, SystemId};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EffectKind {
    IntelCorrupted { target: HouseId, observed_system: SystemId, magnitude: f32 },
    NcvReduction { colony: ColonyId, magnitude: f32 },
    SrpReduction { colony: ColonyId, magnitude: f32 },
    TaxReduction { house: HouseId, magnitude: f32 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OngoingEffect {
    pub kind: EffectKind,
    pub turns_remaining: u8,
}

impl OngoingEffect {
    /// Advance by one turn; `true` once the effect expires and should be
    /// dropped by its owning collection.
    pub fn tick(&mut self) -> bool {
        self.turns_remaining = self.turns_remaining.saturating_sub(1);
        self.turns_remaining == 0
    }
}

/// Applies a corruption perturbation to an observed numeric value, drawing
/// uniformly from the interval `[floor(v*(1-m)), ceil(v*(1+m))]` (§3 B4),
/// clamped so corrupted intel never reads a true zero as nonzero or goes
/// negative (§3 "zero-preservation, non-negative clamping").
pub fn corrupt_value(rng: &mut ChaCha8Rng, true_value: f32, magnitude: f32) -> f32 {
    if true_value == 0.0 {
        return 0.0;
    }
    // floor/ceil on a float product amplifies f32 rounding noise into a
    // whole integer miss (e.g. 100.0 * 1.2 landing a hair above 120.0), so
    // nudge toward the exact boundary before rounding.
    const EPSILON: f64 = 1e-4;
    let low = ((true_value as f64 * (1.0 - magnitude as f64) + EPSILON).floor() as f32).max(0.0);
    let high = ((true_value as f64 * (1.0 + magnitude as f64) - EPSILON).ceil() as f32).max(low);
    if high <= low {
        low
    } else {
        rng.gen_range(low..=high)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rng() -> ChaCha8Rng {
        use rand::SeedableRng;
        ChaCha8Rng::seed_from_u64(1)
    }

    #[test]
    fn corruption_preserves_true_zero() {
        assert_eq!(corrupt_value(&mut rng(), 0.0, 0.9), 0.0);
    }

    #[test]
    fn corruption_never_goes_negative() {
        assert!(corrupt_value(&mut rng(), 10.0, -5.0) >= 0.0);
    }

    #[test]
    fn corruption_stays_within_the_documented_interval() {
        let mut r = rng();
        for _ in 0..50 {
            let v = corrupt_value(&mut r, 100.0, 0.2);
            assert!((80.0..=120.0).contains(&v));
        }
    }

    #[test]
    fn tick_counts_down_to_expiry() {
        let mut effect = OngoingEffect {
            kind: EffectKind::TaxReduction { house: HouseId(0), magnitude: 0.1 },
            turns_remaining: 2,
        };
        assert!(!effect.tick());
        assert!(effect.tick());
    }
}
