//! Production phase (C11, §4.7): fleet movement, construction/repair queue
//! advance, population transfers, diplomatic transitions, and research
//! advancement for whatever the command phase queued.

use crate::command::Command;
use crate::core::config::Config;
use crate::core::event::{EventBus, EventKind};
use crate::core::ids::ColonyId;
use crate::core::rng::RngService;
use crate::core::GameState;
use crate::entities::construction::{BuildItem, ConstructionProject, RepairTarget};
use crate::entities::facility::Neoria;
use crate::entities::fleet::FleetOrder;
use crate::entities::ground_unit::GroundUnit;
use crate::entities::ship::Ship;
use crate::entities::star_map::LaneClass;
use crate::phases::command_phase::QueuedCommand;

/// How many lane hops a fleet may cross in one production phase: two if the
/// whole stretch is Major lanes, one otherwise (§4.7).
fn hops_for(path: &[crate::core::ids::SystemId], star_map: &crate::entities::star_map::StarMap) -> usize {
    if path.len() < 3 {
        return path.len().saturating_sub(1).min(1);
    }
    let first_major = star_map
        .neighbors(path[0])
        .any(|(n, class)| n == path[1] && class == LaneClass::Major);
    let second_major = star_map
        .neighbors(path[1])
        .any(|(n, class)| n == path[2] && class == LaneClass::Major);
    if first_major && second_major {
        2
    } else {
        1
    }
}

pub fn run(state: &mut GameState, queued: &[QueuedCommand], config: &Config, rng: &RngService, events: &mut EventBus) {
    for entry in queued {
        match &entry.command {
            Command::IssueFleetOrder { fleet, order } => issue_order(state, *fleet, *order, events),
            Command::QueueConstruction { colony, item, through } => {
                queue_construction(state, entry.house, *colony, item, *through, config, events)
            }
            Command::SetTaxRate { rate } => {
                let owned: Vec<_> = state.colonies.owned_by(entry.house).map(|c| c.id).collect();
                for colony_id in owned {
                    if let Ok(colony) = state.colonies.get_mut(colony_id) {
                        colony.tax_rate = *rate;
                    }
                }
            }
            Command::SetEspionageBudget { amount } => {
                if let Some(house) = state.houses.get_mut(&entry.house) {
                    house.espionage_budget = *amount;
                }
            }
            Command::SetResearchAllocation { field, points } => {
                advance_research(state, entry.house, *field, *points, config, rng, events);
            }
            Command::ProposeDiplomacy { target, status } => {
                if let Some(house) = state.houses.get_mut(&entry.house) {
                    house.diplomatic_relations.insert(*target, *status);
                }
                events.emit(state.turn, Some(entry.house), EventKind::ProposalAccepted { from: entry.house, to: *target, status: *status });
            }
            Command::Terraform { colony } => advance_terraforming(state, entry.house, *colony, config, events),
            Command::TransferShips { .. }
            | Command::MergeFleets { .. }
            | Command::DetachFleet { .. }
            | Command::TransferFighters { .. } => {
                // Zero-turn ops already executed during the command phase.
            }
        }
    }

    advance_construction(state, events);
    advance_repairs(state, events);
    advance_population_transfers(state, events);
    age_proposals(state, config, events);
}

/// Re-derive the fleet's stance from its new standing order and advance it
/// one-or-two hops along the shortest lane-respecting path toward its
/// destination (§4.2, §4.7). A fleet with no path simply holds in place;
/// command validation should already have rejected an impossible order, but
/// production re-checks rather than trusting state from a prior turn.
fn issue_order(state: &mut GameState, fleet_id: crate::core::ids::FleetId, order: FleetOrder, events: &mut EventBus) {
    let Ok(fleet) = state.fleets.get_mut(fleet_id) else { return };
    fleet.order = order;
    fleet.stance = order.stance();
    let owner = fleet.owner;
    let Some(destination) = order.destination() else { return };
    let current = fleet.system;
    if current == destination {
        return;
    }

    let has_capital = state
        .ships
        .ships_in_fleet(fleet_id)
        .iter()
        .filter_map(|&sid| state.ships.get(sid).ok())
        .any(|s| s.class.is_capital());
    let allowed = move |class: LaneClass| !(has_capital && class == LaneClass::Restricted);
    let Some(path) = state.star_map.shortest_path(current, destination, allowed) else { return };
    let hops = hops_for(&path, &state.star_map);
    let target = path.get(hops).copied().unwrap_or(current);
    if target != current && state.fleets.relocate(fleet_id, target).is_ok() {
        events.emit(state.turn, Some(owner), EventKind::FleetArrived { fleet: fleet_id, system: target });
    }
}

fn queue_construction(
    state: &mut GameState,
    house_id: crate::core::ids::HouseId,
    colony: ColonyId,
    item: &BuildItem,
    through: crate::entities::facility::NeoriaKind,
    config: &Config,
    events: &mut EventBus,
) {
    let Ok(cost) = crate::command::validate::build_cost(config, item, through) else { return };
    let Some(house) = state.houses.get_mut(&house_id) else { return };
    if house.treasury < cost {
        return;
    }
    house.treasury -= cost;

    let build_ticks = match item {
        BuildItem::Ship(_) => 4,
        BuildItem::Facility(kind) => config.facility_stats(kind.config_key()).map(|s| s.build_ticks).unwrap_or(4),
        BuildItem::GroundUnit(_) => 3,
    };

    let id = state.id_counters.bump_construction_project();
    state.construction_projects.push(ConstructionProject {
        id,
        colony,
        owner: house_id,
        item: item.clone(),
        commissioned_through: through,
        remaining_ticks: build_ticks,
        total_cost: cost,
    });
    let _ = events;
}

/// §4.7: one terraforming step per command, deducted from treasury up
/// front the same turn it's ordered, capped at the config's ceiling.
fn advance_terraforming(state: &mut GameState, house_id: crate::core::ids::HouseId, colony: ColonyId, config: &Config, events: &mut EventBus) {
    let Ok(owner) = state.colonies.get(colony).map(|c| c.owner) else { return };
    if owner != house_id {
        return;
    }
    let Some(house) = state.houses.get_mut(&house_id) else { return };
    if house.treasury < config.terraform_cost {
        return;
    }
    let Ok(colony_ref) = state.colonies.get(colony) else { return };
    if colony_ref.terraform_level >= config.terraform_max_level {
        return;
    }
    house.treasury -= config.terraform_cost;
    let Ok(colony_mut) = state.colonies.get_mut(colony) else { return };
    colony_mut.terraform_level += 1;
    let level = colony_mut.terraform_level;
    events.emit(state.turn, Some(house_id), EventKind::TerraformAdvanced { colony, level });
}

/// Planetary-defense builds (facilities, ground units) commission the
/// instant their queue empties so they are available for this same turn's
/// next conflict phase; ship builds are deferred one tick further so the
/// commissioning dock frees up before a new keel is laid (§4.7 step 4).
fn advance_construction(state: &mut GameState, events: &mut EventBus) {
    let mut remaining = Vec::new();
    let projects = std::mem::take(&mut state.construction_projects);
    for mut project in projects {
        if project.remaining_ticks > 0 {
            project.remaining_ticks -= 1;
        }
        if project.remaining_ticks > 0 {
            remaining.push(project);
            continue;
        }
        commission(state, &project, events);
    }
    state.construction_projects = remaining;
}

fn commission(state: &mut GameState, project: &ConstructionProject, events: &mut EventBus) {
    match &project.item {
        BuildItem::Ship(class) => {
            let ship_id = state.id_counters.bump_ship();
            let fleet_id = state
                .fleets
                .fleets_owned_by(project.owner)
                .iter()
                .find(|&&fid| state.fleets.get(fid).map(|f| f.system == crate::core::ids::SystemId::from(project.colony)).unwrap_or(false))
                .copied()
                .unwrap_or_else(|| {
                    let new_fleet = state.id_counters.bump_fleet();
                    state.fleets.insert(crate::entities::fleet::Fleet {
                        id: new_fleet,
                        owner: project.owner,
                        system: crate::core::ids::SystemId::from(project.colony),
                        destination: None,
                        stance: Default::default(),
                        order: Default::default(),
                    });
                    new_fleet
                });
            state.ships.insert(Ship { id: ship_id, class: *class, owner: project.owner, fleet: Some(fleet_id), hull_points: 1, max_hull_points: 1, crippled: false });
        }
        BuildItem::Facility(kind) => {
            let id = state.id_counters.bump_neoria();
            state.neoria.insert(Neoria { id, colony: project.colony, kind: *kind, docks_in_use: 0 });
            if let Ok(colony) = state.colonies.get_mut(project.colony) {
                colony.neoria.push(id);
            }
        }
        BuildItem::GroundUnit(kind) => {
            let id = state.id_counters.bump_ground_unit();
            state.ground_units.insert(GroundUnit { id, colony: project.colony, owner: project.owner, unit_type: kind.clone(), strength: 10, max_strength: 10 });
            if let Ok(colony) = state.colonies.get_mut(project.colony) {
                colony.ground_units.push(id);
            }
        }
    }
    events.emit(state.turn, Some(project.owner), EventKind::ConstructionCompleted { colony: project.colony, item: format!("{:?}", project.item) });
}

fn advance_repairs(state: &mut GameState, events: &mut EventBus) {
    let mut remaining = Vec::new();
    let projects = std::mem::take(&mut state.repair_projects);
    for mut project in projects {
        if project.remaining_ticks > 0 {
            project.remaining_ticks -= 1;
        }
        if project.remaining_ticks > 0 {
            remaining.push(project);
            continue;
        }
        let owner = match project.target {
            RepairTarget::Ship(ship_id) => state.ships.get(ship_id).ok().map(|s| s.owner),
            RepairTarget::Kastra(_) => None,
        };
        match project.target {
            RepairTarget::Ship(ship_id) => {
                if let Ok(ship) = state.ships.get_mut(ship_id) {
                    ship.hull_points = ship.max_hull_points;
                    ship.crippled = false;
                }
            }
            RepairTarget::Kastra(kastra_id) => {
                if let Ok(kastra) = state.kastra.get_mut(kastra_id) {
                    kastra.hull_points = kastra.max_hull_points;
                }
            }
        }
        events.emit(state.turn, owner, EventKind::ConstructionCompleted { colony: project.colony, item: "repair".to_string() });
    }
    state.repair_projects = remaining;
}

fn advance_population_transfers(state: &mut GameState, events: &mut EventBus) {
    let mut remaining = Vec::new();
    let transfers = std::mem::take(&mut state.population_transfers);
    for mut transfer in transfers {
        if transfer.remaining_ticks > 0 {
            transfer.remaining_ticks -= 1;
        }
        if transfer.remaining_ticks > 0 {
            remaining.push(transfer);
            continue;
        }
        if let Ok(from) = state.colonies.get_mut(transfer.from) {
            from.souls = from.souls.saturating_sub(transfer.souls);
        }
        if let Ok(to) = state.colonies.get_mut(transfer.to) {
            to.souls += transfer.souls;
        }
        events.emit(state.turn, None, EventKind::PopulationTransferCompleted { from: transfer.from, to: transfer.to, souls: transfer.souls });
    }
    state.population_transfers = remaining;
}

/// §4.7 step 8: proposals age every production phase and expire unanswered.
const PROPOSAL_EXPIRY_TURNS: u8 = 3;

fn age_proposals(state: &mut GameState, _config: &Config, events: &mut EventBus) {
    let mut expired = Vec::new();
    for proposal in state.proposals.values_mut() {
        proposal.turns_pending = proposal.turns_pending.saturating_add(1);
        if proposal.turns_pending >= PROPOSAL_EXPIRY_TURNS {
            expired.push(proposal.id);
        }
    }
    for id in expired {
        if let Some(proposal) = state.proposals.remove(&id) {
            events.emit(state.turn, Some(proposal.from), EventKind::ProposalExpired { from: proposal.from, to: proposal.to });
        }
    }
}

fn advance_research(
    state: &mut GameState,
    house_id: crate::core::ids::HouseId,
    field: crate::core::config::TechField,
    points: u32,
    config: &Config,
    rng: &RngService,
    events: &mut EventBus,
) {
    let Some(house) = state.houses.get_mut(&house_id) else { return };
    let current = house.tech_tree.research_points.entry(field).or_insert(0);
    *current += points;
    if *current < config.research.points_per_level {
        return;
    }
    *current -= config.research.points_per_level;
    let level = *house.tech_tree.level.get(&field).unwrap_or(&0);
    let odds = *config.research.breakthrough_table.get(&level).unwrap_or(&0);
    let mut stream = rng.master();
    let roll = RngService::roll_die(&mut stream, 100);
    if roll <= odds as u32 {
        house.tech_tree.level.insert(field, level + 1);
        house.prestige += config.prestige.tech_levelup_prestige;
        events.emit(state.turn, Some(house_id), EventKind::TechAdvanced { house: house_id, field, level: level + 1 });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::{FleetId, HouseId, SystemId};
    use crate::entities::fleet::Fleet;
    use crate::entities::house::House;
    use crate::entities::star_map::LaneClass;

    #[test]
    fn move_order_relocates_along_a_major_lane_and_emits_arrival() {
        let mut state = GameState::new();
        state.star_map.add_lane(SystemId(0), SystemId(1), LaneClass::Major);
        state.fleets.insert(Fleet { id: FleetId(0), owner: HouseId(0), system: SystemId(0), destination: None, stance: Default::default(), order: Default::default() });
        let queued = vec![QueuedCommand { house: HouseId(0), command: Command::IssueFleetOrder { fleet: FleetId(0), order: FleetOrder::Move(SystemId(1)) } }];
        let mut events = EventBus::new();
        run(&mut state, &queued, &Config::baseline(), &RngService::new(1), &mut events);
        assert_eq!(state.fleets.get(FleetId(0)).unwrap().system, SystemId(1));
        assert!(!events.is_empty());
    }

    #[test]
    fn two_consecutive_major_lanes_allow_a_two_hop_move() {
        let mut state = GameState::new();
        state.star_map.add_lane(SystemId(0), SystemId(1), LaneClass::Major);
        state.star_map.add_lane(SystemId(1), SystemId(2), LaneClass::Major);
        state.fleets.insert(Fleet { id: FleetId(0), owner: HouseId(0), system: SystemId(0), destination: None, stance: Default::default(), order: Default::default() });
        let queued = vec![QueuedCommand { house: HouseId(0), command: Command::IssueFleetOrder { fleet: FleetId(0), order: FleetOrder::Move(SystemId(2)) } }];
        let mut events = EventBus::new();
        run(&mut state, &queued, &Config::baseline(), &RngService::new(1), &mut events);
        assert_eq!(state.fleets.get(FleetId(0)).unwrap().system, SystemId(2));
    }

    #[test]
    fn diplomacy_proposal_updates_relations() {
        let mut state = GameState::new();
        state.add_house(House::new(HouseId(0), "A"));
        let queued = vec![QueuedCommand {
            house: HouseId(0),
            command: Command::ProposeDiplomacy { target: HouseId(1), status: crate::entities::house::DiplomaticStatus::NonAggression },
        }];
        let mut events = EventBus::new();
        run(&mut state, &queued, &Config::baseline(), &RngService::new(1), &mut events);
        assert_eq!(
            state.houses[&HouseId(0)].relation_with(HouseId(1)),
            crate::entities::house::DiplomaticStatus::NonAggression
        );
    }

    #[test]
    fn construction_project_commissions_when_its_queue_empties() {
        let mut state = GameState::new();
        state.construction_projects.push(ConstructionProject {
            id: crate::core::ids::ConstructionProjectId(0),
            colony: ColonyId(0),
            owner: HouseId(0),
            item: BuildItem::GroundUnit("Militia".to_string()),
            commissioned_through: crate::entities::facility::NeoriaKind::Shipyard,
            remaining_ticks: 1,
            total_cost: 20,
        });
        let mut events = EventBus::new();
        run(&mut state, &[], &Config::baseline(), &RngService::new(1), &mut events);
        assert!(state.construction_projects.is_empty());
        assert_eq!(state.ground_units.at_colony(ColonyId(0)).count(), 1);
    }

    #[test]
    fn terraform_command_advances_level_and_deducts_treasury() {
        let mut state = GameState::new();
        state.add_house(House::new(HouseId(0), "A"));
        state.houses.get_mut(&HouseId(0)).unwrap().treasury = 1000;
        state.colonies.insert(crate::entities::colony::Colony {
            id: ColonyId(0),
            owner: HouseId(0),
            souls: 2_000_000,
            planet_class: crate::entities::colony::PlanetClass::Terran,
            infrastructure: 5,
            tax_rate: 20,
            terraform_level: 0,
            blockaded: false,
            capacity_overage_turns: 0,
            neoria: Vec::new(),
            kastra: None,
            ground_units: Vec::new(),
        });
        let queued = vec![QueuedCommand { house: HouseId(0), command: Command::Terraform { colony: ColonyId(0) } }];
        let config = Config::baseline();
        let mut events = EventBus::new();
        run(&mut state, &queued, &config, &RngService::new(1), &mut events);
        assert_eq!(state.colonies.get(ColonyId(0)).unwrap().terraform_level, 1);
        assert_eq!(state.houses[&HouseId(0)].treasury, 1000 - config.terraform_cost);
        let flushed = events.flush();
        assert!(flushed.iter().any(|e| matches!(e.kind, EventKind::TerraformAdvanced { .. })));
    }
}
