//! Combat kernel: simultaneous-round damage resolution within one theater
//! (§4.3, P3 "combat resolution is deterministic given the same seed").

use crate::combat::{Theater, TheaterResult};
use crate::core::ids::{HouseId, ShipId};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use std::collections::HashMap;

/// Chance an attack connects at all, rolled independently of target
/// selection (§4.3). Targeting itself is fully deterministic; this is the
/// kernel's only remaining source of randomness per round.
const HIT_CHANCE: f64 = 0.85;

/// One combatant's state for the duration of a theater fight. The kernel
/// owns a private copy of hull points rather than reaching into the ship
/// store mid-round, so "simultaneous" damage application is exact: every
/// ship's target is chosen against the round's opening state.
#[derive(Debug, Clone)]
pub struct Combatant {
    pub ship: ShipId,
    pub owner: HouseId,
    pub attack: i32,
    pub hull: i32,
    pub max_hull: i32,
}

const MAX_ROUNDS: u32 = 50;

/// Resolve one theater to exhaustion: rounds continue until combatants from
/// only one house (or zero) remain alive, or the round cap is hit (a
/// starbase/command-ship stalemate is possible with low attack values).
///
/// Each attacker always targets the enemy roster's head after sorting by
/// `(attack desc, ship id asc)` (§5 deterministic tie-break) — the highest
/// attack ship, ties broken by lowest id. Whether the attack connects is
/// the kernel's one remaining roll, so the same seed reproduces the same
/// fight bit-for-bit.
pub fn resolve_theater(
    rng: &mut ChaCha8Rng,
    theater: Theater,
    mut combatants: Vec<Combatant>,
) -> (TheaterResult, Vec<Combatant>) {
    let mut destroyed = Vec::new();
    let mut crippled = Vec::new();
    let mut rounds_fought = 0;

    loop {
        let owners: Vec<HouseId> = {
            let mut seen = Vec::new();
            for c in &combatants {
                if c.hull > 0 && !seen.contains(&c.owner) {
                    seen.push(c.owner);
                }
            }
            seen
        };
        if owners.len() < 2 || rounds_fought >= MAX_ROUNDS {
            break;
        }
        rounds_fought += 1;

        let mut damage: HashMap<ShipId, i32> = HashMap::new();
        for attacker in combatants.iter().filter(|c| c.hull > 0) {
            let mut enemies: Vec<&Combatant> = combatants
                .iter()
                .filter(|c| c.hull > 0 && c.owner != attacker.owner)
                .collect();
            if enemies.is_empty() {
                continue;
            }
            enemies.sort_by(|a, b| b.attack.cmp(&a.attack).then(a.ship.get().cmp(&b.ship.get())));
            let target = enemies[0].ship;
            if rng.gen_bool(HIT_CHANCE) {
                *damage.entry(target).or_insert(0) += attacker.attack;
            }
        }

        for combatant in combatants.iter_mut() {
            if let Some(&dmg) = damage.get(&combatant.ship) {
                combatant.hull -= dmg;
                let was_crippled_threshold = combatant.max_hull / 2;
                if combatant.hull <= 0 {
                    destroyed.push(combatant.ship);
                } else if combatant.hull <= was_crippled_threshold && !crippled.contains(&combatant.ship) {
                    crippled.push(combatant.ship);
                }
            }
        }
        combatants.retain(|c| c.hull > 0);
    }

    (
        TheaterResult { theater, rounds_fought, ships_destroyed: destroyed, ships_crippled: crippled },
        combatants,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn combatant(id: u32, owner: u32, attack: i32, hull: i32) -> Combatant {
        Combatant { ship: ShipId(id), owner: HouseId(owner), attack, hull, max_hull: hull }
    }

    #[test]
    fn stronger_side_wins_deterministically() {
        let combatants = vec![
            combatant(0, 0, 10, 10),
            combatant(1, 0, 10, 10),
            combatant(2, 1, 2, 5),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (result, survivors) = resolve_theater(&mut rng, Theater::Space, combatants);
        assert!(result.ships_destroyed.contains(&ShipId(2)));
        assert!(survivors.iter().all(|c| c.owner == HouseId(0)));
    }

    #[test]
    fn same_seed_reproduces_identical_outcome() {
        let setup = || {
            vec![
                combatant(0, 0, 5, 20),
                combatant(1, 1, 5, 20),
                combatant(2, 1, 5, 20),
            ]
        };
        let mut a = ChaCha8Rng::seed_from_u64(99);
        let mut b = ChaCha8Rng::seed_from_u64(99);
        let (result_a, _) = resolve_theater(&mut a, Theater::Space, setup());
        let (result_b, _) = resolve_theater(&mut b, Theater::Space, setup());
        assert_eq!(result_a.ships_destroyed, result_b.ships_destroyed);
        assert_eq!(result_a.rounds_fought, result_b.rounds_fought);
    }

    #[test]
    fn single_house_present_fights_zero_rounds() {
        let combatants = vec![combatant(0, 0, 5, 10), combatant(1, 0, 5, 10)];
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let (result, survivors) = resolve_theater(&mut rng, Theater::Space, combatants);
        assert_eq!(result.rounds_fought, 0);
        assert_eq!(survivors.len(), 2);
    }
}
