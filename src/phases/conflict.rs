//! Conflict phase (C7, §4.3): resolve every contested system before any
//! income or production happens, so captured colonies pay their new owner
//! this same turn.

use crate::combat::kernel::{resolve_theater, Combatant};
use crate::combat::{CombatReport, TheaterResult, Theater, THEATER_ORDER};
use crate::core::config::{Config, TechField};
use crate::core::event::{EventBus, EventKind};
use crate::core::ids::{ColonyId, HouseId, ShipId, SystemId};
use crate::core::rng::RngService;
use crate::core::GameState;
use crate::entities::fleet::FleetOrder;
use crate::entities::ship::ShipClass;

/// Sentinel offset added to a `KastraId` to stand in for a `ShipId` inside
/// the combat kernel, which only knows about ships. No real ship ever
/// reaches this range, so a combatant above the line is always a Kastra.
const KASTRA_SENTINEL_OFFSET: u32 = 1_000_000_000;

/// Run conflict resolution for every system with fleets from two or more
/// houses present (CON1a: detect contested systems).
pub fn run(state: &mut GameState, config: &Config, rng: &RngService, events: &mut EventBus) {
    let contested: Vec<SystemId> = state
        .fleets
        .iter()
        .map(|f| f.system)
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .collect();

    for &system in &contested {
        resolve_system(state, system, config, rng, events);
    }

    for &system in &contested {
        resolve_colonization(state, system, rng, events);
    }

    for &system in &contested {
        resolve_scouting(state, system, config, rng, events);
    }
}

/// Houses with a fleet in `system` whose diplomatic posture toward some
/// other house present triggers combat (CON1a-1d, §4.3): War always fights;
/// Hostile only fights if at least one of the two fleets is under an
/// engaging stance (Seek/Patrol/Guard's chase behavior is modeled via
/// `FleetStance::engages_hostile`).
fn houses_in_combat(state: &GameState, system: SystemId) -> Vec<HouseId> {
    let fleet_ids = state.fleets.fleets_at(system);
    let mut owners: Vec<(HouseId, bool)> = Vec::new();
    for &fid in fleet_ids {
        if let Ok(fleet) = state.fleets.get(fid) {
            let engages = fleet.stance.engages_hostile();
            match owners.iter_mut().find(|(h, _)| *h == fleet.owner) {
                Some((_, e)) => *e = *e || engages,
                None => owners.push((fleet.owner, engages)),
            }
        }
    }

    let mut combatant_houses = std::collections::BTreeSet::new();
    for i in 0..owners.len() {
        for j in (i + 1)..owners.len() {
            let (h1, e1) = owners[i];
            let (h2, e2) = owners[j];
            let Some(house1) = state.houses.get(&h1) else { continue };
            let status = house1.relation_with(h2);
            let triggers = status.always_triggers_combat() || (status.can_trigger_combat() && (e1 || e2));
            if triggers {
                combatant_houses.insert(h1);
                combatant_houses.insert(h2);
            }
        }
    }
    combatant_houses.into_iter().collect()
}

fn wep_level(state: &GameState, house: HouseId) -> u8 {
    state.houses.get(&house).map(|h| h.tech_tree.level_of(TechField::WEP)).unwrap_or(0)
}

/// CON1b-1f: build combatants theater by theater and resolve them in order
/// (Space, Orbital, Blockade, Planetary); CON1g: file the combat report.
/// CON2: apply destroyed-ship bookkeeping and, if the colony's defenders
/// lost space superiority to an invading order, transfer ownership.
fn resolve_system(state: &mut GameState, system: SystemId, config: &Config, rng: &RngService, events: &mut EventBus) {
    let combat_houses = houses_in_combat(state, system);
    if combat_houses.len() < 2 {
        return;
    }

    let mut rng = rng.combat_stream(system, 0);
    let mut theaters = Vec::new();
    let mut all_destroyed = Vec::new();

    let fleet_ids: Vec<_> = state.fleets.fleets_at(system).to_vec();
    let mut combatants: Vec<Combatant> = fleet_ids
        .iter()
        .filter_map(|&fid| state.fleets.get(fid).ok())
        .filter(|fleet| combat_houses.contains(&fleet.owner))
        .flat_map(|fleet| state.ships.ships_in_fleet(fleet.id).to_vec())
        .filter_map(|ship_id| state.ships.get(ship_id).ok())
        .filter_map(|ship| {
            let stats = config.ship_stats(ship.class, wep_level(state, ship.owner)).ok()?;
            Some(Combatant { ship: ship.id, owner: ship.owner, attack: stats.attack, hull: ship.hull_points, max_hull: ship.max_hull_points })
        })
        .collect();

    let mut participants: Vec<_> = combatants.iter().map(|c| c.owner).collect();
    participants.sort();
    participants.dedup();

    let colony_owner = state.colony_owner(ColonyId::from(system)).ok();
    let mut attacker_has_space_superiority = true;

    for &theater in THEATER_ORDER.iter() {
        // Orbital/Blockade/Planetary theaters contest a colony's space; once
        // the side without the colony loses every combat ship in the Space
        // theater it cannot press the contest further (§4.3).
        if theater != Theater::Space && (colony_owner.is_none() || !attacker_has_space_superiority) {
            theaters.push(TheaterResult { theater, rounds_fought: 0, ships_destroyed: Vec::new(), ships_crippled: Vec::new() });
            continue;
        }

        if combatants.len() < 2 {
            theaters.push(TheaterResult { theater, rounds_fought: 0, ships_destroyed: Vec::new(), ships_crippled: Vec::new() });
            continue;
        }
        let (result, survivors) = resolve_theater(&mut rng, theater, combatants);
        for &destroyed in &result.ships_destroyed {
            all_destroyed.push(destroyed);
        }
        for &crippled in &result.ships_crippled {
            if let Ok(ship) = state.ships.get_mut(crippled) {
                ship.crippled = true;
            }
        }
        combatants = survivors;
        theaters.push(result);

        if theater == Theater::Space {
            if let Some(owner) = colony_owner {
                let attacker_survives = combatants.iter().any(|c| c.owner != owner);
                attacker_has_space_superiority = attacker_survives;

                // The Kastra defends orbital space onward, not the open-space
                // skirmish itself (§4.3 theater ordering).
                if let Some(kastra_id) = state.colonies.get(ColonyId::from(system)).ok().and_then(|c| c.kastra) {
                    if let Ok(kastra) = state.kastra.get(kastra_id) {
                        if !kastra.is_destroyed() {
                            if let Ok(stats) = config.ship_stats(ShipClass::Starbase, wep_level(state, owner)) {
                                combatants.push(Combatant {
                                    ship: ShipId(KASTRA_SENTINEL_OFFSET + kastra_id.get()),
                                    owner,
                                    attack: stats.attack,
                                    hull: kastra.hull_points,
                                    max_hull: kastra.max_hull_points,
                                });
                            }
                        }
                    }
                }
            }
        }
    }

    for destroyed in &all_destroyed {
        if destroyed.get() >= KASTRA_SENTINEL_OFFSET {
            if let Ok(colony) = state.colonies.get_mut(ColonyId::from(system)) {
                if let Some(kastra_id) = colony.kastra.take() {
                    let _ = state.kastra.remove(kastra_id);
                }
            }
            continue;
        }
        if let Ok(ship) = state.ships.get(*destroyed) {
            events.emit(
                state.turn,
                Some(ship.owner),
                EventKind::ShipDestroyed { ship: ship.id, owner: ship.owner, class: ship.class, system },
            );
        }
        let _ = state.ships.remove(*destroyed);
    }

    for combatant in &combatants {
        if combatant.ship.get() >= KASTRA_SENTINEL_OFFSET {
            if let Ok(colony) = state.colonies.get(ColonyId::from(system)) {
                if let Some(kastra_id) = colony.kastra {
                    if let Ok(kastra) = state.kastra.get_mut(kastra_id) {
                        kastra.hull_points = combatant.hull;
                    }
                }
            }
            continue;
        }
        if let Ok(ship) = state.ships.get_mut(combatant.ship) {
            ship.hull_points = combatant.hull;
        }
    }

    let victor = {
        let mut remaining: Vec<_> = combatants.iter().map(|c| c.owner).collect();
        remaining.sort();
        remaining.dedup();
        if remaining.len() == 1 {
            Some(remaining[0])
        } else {
            None
        }
    };

    if let (Some(owner), Some(victor)) = (colony_owner, victor) {
        if victor != owner {
            try_conquer(state, system, victor, config, events);
        }
    }

    events.emit(
        state.turn,
        None,
        EventKind::CombatReportFiled(CombatReport { system, participants, theaters, victor }),
    );
    events.emit(state.turn, None, EventKind::CombatPhaseCompleted { system });
}

/// CON2: conquest is only attempted when the victor actually ordered an
/// invasion-class action (Invade/Blitz/Bombard); a fleet that merely won a
/// Hostile skirmish passing through does not seize the colony. Ground units
/// garrisoning the colony defend against the victor's surviving attack
/// strength; the colony falls only if that defense is overcome.
fn try_conquer(state: &mut GameState, system: SystemId, victor: HouseId, config: &Config, events: &mut EventBus) {
    let invading = state
        .fleets
        .fleets_at(system)
        .iter()
        .filter_map(|&fid| state.fleets.get(fid).ok())
        .filter(|f| f.owner == victor)
        .any(|f| matches!(f.order, FleetOrder::Invade(_) | FleetOrder::Blitz(_) | FleetOrder::Bombard(_)));
    if !invading {
        return;
    }

    let colony_id = ColonyId::from(system);
    let Ok(colony) = state.colonies.get(colony_id) else { return };
    let from = Some(colony.owner);

    let attacker_strength: i32 = state
        .fleets
        .fleets_at(system)
        .iter()
        .filter_map(|&fid| state.fleets.get(fid).ok())
        .filter(|f| f.owner == victor)
        .flat_map(|f| state.ships.ships_in_fleet(f.id).to_vec())
        .filter_map(|sid| state.ships.get(sid).ok())
        .filter_map(|s| config.ship_stats(s.class, wep_level(state, s.owner)).ok())
        .map(|stats| stats.attack)
        .sum();
    let ground_defense: i32 = state.ground_units.at_colony(colony_id).map(|g| g.strength).sum();

    if attacker_strength <= ground_defense {
        let razed = attacker_strength * 2 > ground_defense;
        if razed {
            let souls_lost = state.colonies.get(colony_id).map(|c| c.souls / 10).unwrap_or(0);
            if let Ok(colony) = state.colonies.get_mut(colony_id) {
                colony.souls = colony.souls.saturating_sub(souls_lost);
            }
            events.emit(state.turn, Some(victor), EventKind::ColonyBombarded { colony: colony_id, by: victor, souls_lost });
        }
        return;
    }

    if let Ok(colony) = state.colonies.get_mut(colony_id) {
        colony.owner = victor;
    }
    events.emit(state.turn, Some(victor), EventKind::ColonyConquered { colony: colony_id, from, to: victor });
}

/// A colony starting size: thin enough that a fresh settlement still clears
/// the `MIN_SOULS` floor (§P3) but doesn't just appear at an established
/// colony's scale.
const NEW_COLONY_SOULS: u64 = crate::entities::colony::MIN_SOULS;

/// CON1e: a system with no standing colony but one or more non-crippled
/// ETAC fleets under a `Colonize` order settles or contests it. A single
/// claimant settles uncontested; two or more roll it off, since an ETAC
/// can't out-race another to the surface (§4.3).
fn resolve_colonization(state: &mut GameState, system: SystemId, rng: &RngService, events: &mut EventBus) {
    let colony_id = ColonyId::from(system);
    if state.colonies.get(colony_id).is_ok() {
        return;
    }

    let mut claimants: Vec<HouseId> = state
        .fleets
        .fleets_at(system)
        .iter()
        .filter_map(|&fid| state.fleets.get(fid).ok())
        .filter(|f| matches!(f.order, FleetOrder::Colonize(s) if s == system))
        .filter(|f| {
            state
                .ships
                .ships_in_fleet(f.id)
                .iter()
                .filter_map(|&sid| state.ships.get(sid).ok())
                .any(|s| s.class == ShipClass::ETAC && !s.crippled)
        })
        .map(|f| f.owner)
        .collect();
    claimants.sort();
    claimants.dedup();

    if claimants.is_empty() {
        return;
    }

    let winner = if claimants.len() == 1 {
        claimants[0]
    } else {
        let mut stream = rng.master();
        let roll = RngService::roll_die(&mut stream, claimants.len() as u32) as usize - 1;
        let winner = claimants[roll];
        events.emit(state.turn, None, EventKind::ColonizationContested { system, claimants: claimants.clone(), winner: Some(winner) });
        winner
    };

    state.colonies.insert(crate::entities::colony::Colony {
        id: colony_id,
        owner: winner,
        souls: NEW_COLONY_SOULS,
        planet_class: crate::entities::colony::PlanetClass::Terran,
        infrastructure: 0,
        tax_rate: 0,
        terraform_level: 0,
        blockaded: false,
        capacity_overage_turns: 0,
        neoria: Vec::new(),
        kastra: None,
        ground_units: Vec::new(),
    });
    events.emit(state.turn, Some(winner), EventKind::ColonyEstablished { colony: colony_id, house: winner });
}

/// CON1f: a Scout/HackStarbase-ordered fleet that reaches its target system
/// rolls against the defender's detection odds. Success files intel for the
/// scouting house (or a successful-espionage event for a hack); failure
/// gets the attempt spotted and reported to the defender instead. Systems
/// with no standing house presence to evade can't detect anything.
fn resolve_scouting(state: &GameState, system: SystemId, config: &Config, rng: &RngService, events: &mut EventBus) {
    let defender = state.colonies.get(ColonyId::from(system)).ok().map(|c| c.owner);

    let scouts: Vec<_> = state
        .fleets
        .fleets_at(system)
        .iter()
        .filter_map(|&fid| state.fleets.get(fid).ok())
        .filter(|f| matches!(f.order, FleetOrder::ScoutColony(s) | FleetOrder::ScoutSystem(s) | FleetOrder::HackStarbase(s) if s == system))
        .collect();

    for fleet in scouts {
        let Some(defender) = defender else {
            events.emit(state.turn, Some(fleet.owner), EventKind::ScoutIntelGathered { fleet: fleet.id, system, quality: crate::intel::ObservationQuality::Visual });
            continue;
        };
        if defender == fleet.owner {
            continue;
        }

        let is_hack = matches!(fleet.order, FleetOrder::HackStarbase(_));
        let overinvestment_cap = config.espionage.overinvestment_cap.max(1);
        let odds = (100 - (state.houses.get(&fleet.owner).map(|h| h.espionage_budget).unwrap_or(0) * 100 / overinvestment_cap)).clamp(5, 95) as u32;

        if is_hack {
            let mut stream = rng.espionage_stream(fleet.owner, defender);
            let roll = RngService::roll_die(&mut stream, 100);
            if roll > odds {
                events.emit(state.turn, Some(fleet.owner), EventKind::EspionageSuccess { actor: fleet.owner, target: defender, action: "HackStarbase".to_string() });
            } else {
                events.emit(state.turn, Some(defender), EventKind::EspionageDetected { actor: fleet.owner, target: defender, action: "HackStarbase".to_string() });
            }
        } else {
            let mut stream = rng.surveillance_stream(fleet.owner, system);
            let roll = RngService::roll_die(&mut stream, 100);
            events.emit(state.turn, Some(fleet.owner), EventKind::ScoutIntelGathered { fleet: fleet.id, system, quality: crate::intel::ObservationQuality::Spy });
            if roll > odds {
                events.emit(state.turn, Some(defender), EventKind::ScoutDetected { fleet: fleet.id, system });
            }
        }
    }
}
