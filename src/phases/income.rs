//! Income phase (C9, §4.5): economy accrual, maintenance, salvage,
//! capacity enforcement, prestige bookkeeping, elimination and victory
//! checks.

use crate::core::config::Config;
use crate::core::event::{EventBus, EventKind};
use crate::core::ids::HouseId;
use crate::core::GameState;

/// Colonies producing more population than their infrastructure supports
/// get a grace period before population is forcibly reduced (§4.5
/// "capacity enforcement with grace periods"). Units are population
/// figures, not souls, per infrastructure point.
const CAPACITY_PER_INFRASTRUCTURE: u64 = 5;

pub fn run(state: &mut GameState, config: &Config, events: &mut EventBus) {
    accrue_economy(state, config, events);
    pay_maintenance(state, config, events);
    salvage_wrecks(state, config, events);
    enforce_capacity(state, config, events);
    track_prestige_instability(state, config, events);
    check_elimination(state, events);
    check_victory(state, config, events);
}

/// E1: every colony's gross output (infrastructure scaled by the base GCO
/// rate, halved by blockade) accrues to its owner's treasury at the colony's
/// tax rate.
fn accrue_economy(state: &mut GameState, config: &Config, events: &mut EventBus) {
    let turn = state.turn;
    let mut income_by_house: std::collections::HashMap<HouseId, i64> = std::collections::HashMap::new();
    for colony in state.colonies.iter() {
        let base = colony.infrastructure as f32 * config.economy.base_gco_per_infrastructure;
        let gross = if colony.blockaded { base * (1.0 - config.economy.blockade_penalty) } else { base };
        let taxed = gross * colony.tax_rate as f32 / 100.0;
        *income_by_house.entry(colony.owner).or_insert(0) += taxed as i64;
    }
    for (house_id, income) in income_by_house {
        if let Some(house) = state.houses.get_mut(&house_id) {
            house.treasury += income;
        }
        events.emit(turn, Some(house_id), EventKind::PrestigeChanged { house: house_id, delta: 0 });
    }
}

/// Every ship and ground unit the house still owns draws upkeep from the
/// treasury (§4.5 "net PP accrual").
fn pay_maintenance(state: &mut GameState, config: &Config, _events: &mut EventBus) {
    let mut upkeep_by_house: std::collections::HashMap<HouseId, i64> = std::collections::HashMap::new();
    for ship in state.ships.iter() {
        if let Ok(stats) = config.ship_stats(ship.class, 0) {
            *upkeep_by_house.entry(ship.owner).or_insert(0) += (stats.upkeep as f32 * config.economy.maintenance_scale) as i64;
        }
    }
    for unit in state.ground_units.iter() {
        *upkeep_by_house.entry(unit.owner).or_insert(0) += unit.max_strength as i64 / 10;
    }
    for (house_id, upkeep) in upkeep_by_house {
        if let Some(house) = state.houses.get_mut(&house_id) {
            house.treasury -= upkeep;
        }
    }
}

/// A house that destroyed enemy ships this turn recovers a fraction of
/// their build cost as salvage (§4.5). Grounded on conflict's
/// `ShipDestroyed` events rather than re-deriving wrecks here.
fn salvage_wrecks(state: &mut GameState, config: &Config, events: &mut EventBus) {
    let destroyed: Vec<_> = events
        .iter()
        .filter_map(|e| match &e.kind {
            EventKind::ShipDestroyed { owner, class, system, .. } => Some((*owner, *class, *system)),
            _ => None,
        })
        .collect();
    for (destroyed_owner, class, system) in destroyed {
        let Ok(stats) = config.ship_stats(class, 0) else { continue };
        let salvage = (stats.build_cost as f32 * config.economy.salvage_fraction) as i64;
        let victor = state
            .fleets
            .fleets_at(system)
            .iter()
            .filter_map(|&fid| state.fleets.get(fid).ok())
            .map(|f| f.owner)
            .find(|&owner| owner != destroyed_owner);
        if let Some(victor) = victor {
            if let Some(house) = state.houses.get_mut(&victor) {
                house.treasury += salvage;
                events.emit(state.turn, Some(victor), EventKind::PrestigeChanged { house: victor, delta: 0 });
            }
        }
    }
}

fn enforce_capacity(state: &mut GameState, config: &Config, events: &mut EventBus) {
    let turn = state.turn;
    let colony_ids: Vec<_> = state.colonies.iter().map(|c| c.id).collect();
    for id in colony_ids {
        let owner = match state.colonies.get(id) {
            Ok(c) => c.owner,
            Err(_) => continue,
        };
        let over_capacity = {
            let colony = state.colonies.get(id).unwrap();
            colony.population() > colony.infrastructure as u64 * CAPACITY_PER_INFRASTRUCTURE
        };
        let colony = state.colonies.get_mut(id).unwrap();
        if over_capacity {
            colony.capacity_overage_turns = colony.capacity_overage_turns.saturating_add(1);
            if colony.capacity_overage_turns > config.capacity_grace_period_turns {
                colony.souls = colony.souls * 9 / 10;
                events.emit(
                    turn,
                    Some(owner),
                    EventKind::CommandAborted {
                        fleet: crate::core::ids::FleetId(0),
                        reason: format!("{} exceeded capacity beyond its grace period", colony.id),
                    },
                );
            }
        } else {
            colony.capacity_overage_turns = 0;
        }
    }
}

/// §4.5: a house whose prestige moved net-negative this turn accrues a
/// consecutive-turn counter; once it crosses `instability_threshold` a flat
/// penalty fires and the counter resets so it can only ever fire once per
/// qualifying streak.
fn track_prestige_instability(state: &mut GameState, config: &Config, events: &mut EventBus) {
    let turn = state.turn;
    let house_ids: Vec<_> = state.houses.keys().copied().collect();
    for house_id in house_ids {
        let Some(house) = state.houses.get_mut(&house_id) else { continue };
        if !house.is_active() {
            continue;
        }
        if house.prestige < 0 {
            house.consecutive_negative_prestige_turns = house.consecutive_negative_prestige_turns.saturating_add(1);
            if house.consecutive_negative_prestige_turns >= config.prestige.instability_threshold {
                house.prestige -= config.prestige.instability_penalty;
                house.consecutive_negative_prestige_turns = 0;
                events.emit(turn, Some(house_id), EventKind::DefensiveInstability { house: house_id, penalty: config.prestige.instability_penalty });
            }
        } else {
            house.consecutive_negative_prestige_turns = 0;
        }
    }
}

/// §4.5 elimination: no colonies and no fleet still capable of rebuilding
/// a colony (an ETAC aboard).
fn check_elimination(state: &mut GameState, events: &mut EventBus) {
    let turn = state.turn;
    let house_ids: Vec<_> = state.houses.keys().copied().collect();
    for house_id in house_ids {
        let has_colony = state.colonies.owned_by(house_id).next().is_some();
        let has_production_fleet = state
            .fleets
            .fleets_owned_by(house_id)
            .iter()
            .flat_map(|&fid| state.ships.ships_in_fleet(fid).to_vec())
            .filter_map(|sid| state.ships.get(sid).ok())
            .any(|s| s.class == crate::entities::ship::ShipClass::ETAC && !s.crippled);
        let house = state.houses.get_mut(&house_id).unwrap();
        if house.is_active() && !has_colony && !has_production_fleet {
            house.status = crate::entities::house::HouseStatus::Eliminated;
            events.emit(turn, Some(house_id), EventKind::HouseEliminated { house: house_id });
        }
    }
}

/// §4.5 victory: prestige threshold, last house standing, or turn limit
/// (highest prestige wins the turn-limit case; ties broken by
/// `(prestige desc, colonies desc, house_id asc)`).
fn check_victory(state: &GameState, config: &Config, events: &mut EventBus) {
    let turn = state.turn;
    let active: Vec<_> = state.active_houses().collect();

    for house in &active {
        if house.prestige >= config.prestige.victory_threshold {
            events.emit(turn, Some(house.id), EventKind::VictoryAchieved { house: house.id });
            return;
        }
    }

    if active.len() == 1 {
        events.emit(turn, Some(active[0].id), EventKind::VictoryAchieved { house: active[0].id });
        return;
    }
    if active.is_empty() {
        return;
    }

    if config.prestige.turn_limit != 0 && turn >= config.prestige.turn_limit {
        let winner = active
            .iter()
            .map(|h| (h.prestige, state.colonies.owned_by(h.id).count(), std::cmp::Reverse(h.id)))
            .max()
            .map(|(_, _, std::cmp::Reverse(id))| id);
        if let Some(house) = winner {
            events.emit(turn, Some(house), EventKind::VictoryAchieved { house });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::{ColonyId, HouseId};
    use crate::entities::colony::{Colony, PlanetClass};
    use crate::entities::house::House;

    fn colony(id: u32, owner: u32, souls: u64, infrastructure: i32, overage: u8) -> Colony {
        Colony {
            id: ColonyId(id),
            owner: HouseId(owner),
            souls,
            planet_class: PlanetClass::Terran,
            infrastructure,
            tax_rate: 20,
            terraform_level: 0,
            blockaded: false,
            capacity_overage_turns: overage,
            neoria: Vec::new(),
            kastra: None,
            ground_units: Vec::new(),
        }
    }

    #[test]
    fn house_with_no_colonies_or_etacs_is_eliminated() {
        let mut state = GameState::new();
        state.add_house(House::new(HouseId(0), "A"));
        let config = Config::baseline();
        let mut events = EventBus::new();
        run(&mut state, &config, &mut events);
        assert_eq!(state.houses[&HouseId(0)].status, crate::entities::house::HouseStatus::Eliminated);
    }

    #[test]
    fn colony_over_capacity_past_grace_period_loses_population() {
        let mut state = GameState::new();
        state.add_house(House::new(HouseId(0), "A"));
        state.colonies.insert(colony(0, 0, 10_000_000, 1, 5));
        let config = Config::baseline();
        let mut events = EventBus::new();
        run(&mut state, &config, &mut events);
        assert!(state.colonies.get(ColonyId(0)).unwrap().souls < 10_000_000);
    }

    #[test]
    fn colony_income_accrues_to_owner_treasury() {
        let mut state = GameState::new();
        state.add_house(House::new(HouseId(0), "A"));
        state.colonies.insert(colony(0, 0, 2_000_000, 10, 0));
        let config = Config::baseline();
        let mut events = EventBus::new();
        run(&mut state, &config, &mut events);
        assert!(state.houses[&HouseId(0)].treasury > 0);
    }

    #[test]
    fn last_house_standing_wins() {
        let mut state = GameState::new();
        state.add_house(House::new(HouseId(0), "A"));
        state.colonies.insert(colony(0, 0, 2_000_000, 10, 0));
        let config = Config::baseline();
        let mut events = EventBus::new();
        run(&mut state, &config, &mut events);
        let flushed = events.flush();
        assert!(flushed.iter().any(|e| matches!(e.kind, EventKind::VictoryAchieved { house } if house == HouseId(0))));
    }

    #[test]
    fn three_consecutive_negative_prestige_turns_trigger_instability() {
        let mut state = GameState::new();
        let mut house = House::new(HouseId(0), "A");
        house.prestige = -5;
        house.consecutive_negative_prestige_turns = 2;
        state.add_house(house);
        state.colonies.insert(colony(0, 0, 2_000_000, 10, 0));
        let config = Config::baseline();
        let mut events = EventBus::new();
        run(&mut state, &config, &mut events);
        let flushed = events.flush();
        assert!(flushed.iter().any(|e| matches!(e.kind, EventKind::DefensiveInstability { .. })));
    }
}
