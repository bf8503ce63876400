//! Command validation (C5, §4.2).
//!
//! Checks run in a fixed order per command so two engines validating the
//! same packet reject on the same check (§5 determinism extends to
//! rejection reasons, not just accepted state).

use super::Command;
use crate::core::config::Config;
use crate::core::error::Rejection;
use crate::core::ids::HouseId;
use crate::entities::colony::ColonyStore;
use crate::entities::facility::NeoriaStore;
use crate::entities::fleet::{FleetStore, OrderCapability};
use crate::entities::house::House;
use crate::entities::ship::{ShipClass, ShipStore};
use crate::entities::star_map::{LaneClass, StarMap};

/// Everything validation needs to read besides the command itself and the
/// issuing house.
pub struct ValidationContext<'a> {
    pub fleets: &'a FleetStore,
    pub ships: &'a ShipStore,
    pub colonies: &'a ColonyStore,
    pub neoria: &'a NeoriaStore,
    pub star_map: &'a StarMap,
    pub config: &'a Config,
}

fn fleet_ships<'a>(ctx: &'a ValidationContext<'a>, fleet: crate::core::ids::FleetId) -> Vec<&'a crate::entities::ship::Ship> {
    ctx.ships
        .ships_in_fleet(fleet)
        .iter()
        .filter_map(|&id| ctx.ships.get(id).ok())
        .collect()
}

/// §4.2 fleet-command capability table: does this fleet's composition allow
/// the order's required capability.
fn check_capability(ctx: &ValidationContext, fleet: crate::core::ids::FleetId, requirement: OrderCapability) -> Result<(), String> {
    let ships = fleet_ships(ctx, fleet);
    match requirement {
        OrderCapability::None => Ok(()),
        OrderCapability::NonCrippledEtac => {
            if ships.iter().any(|s| s.class == ShipClass::ETAC && !s.crippled) {
                Ok(())
            } else {
                Err(format!("{fleet} has no non-crippled ETAC aboard to colonize with"))
            }
        }
        OrderCapability::CombatNoIntel => {
            let has_combat = ships.iter().any(|s| !s.class.is_fighter() && s.class != ShipClass::Scout);
            let has_intel = ships.iter().any(|s| s.class == ShipClass::Scout);
            if has_combat && !has_intel {
                Ok(())
            } else {
                Err(format!("{fleet} needs a combat squadron and no Intel squadrons for this order"))
            }
        }
        OrderCapability::PureIntel => {
            if !ships.is_empty() && ships.iter().all(|s| s.class == ShipClass::Scout) {
                Ok(())
            } else {
                Err(format!("{fleet} is not a pure-Intel fleet"))
            }
        }
    }
}

/// §3 StarMap: a path must exist under the lane classes this fleet's hulls
/// may traverse (Restricted lanes are closed to capital-class ships).
fn check_path(ctx: &ValidationContext, fleet: crate::core::ids::FleetId, destination: crate::core::ids::SystemId) -> Result<(), String> {
    let f = ctx.fleets.get(fleet).map_err(|e| e.to_string())?;
    let has_capital = fleet_ships(ctx, fleet).iter().any(|s| s.class.is_capital());
    let allowed = move |class: LaneClass| !(has_capital && class == LaneClass::Restricted);
    if ctx.star_map.shortest_path(f.system, destination, allowed).is_some() {
        Ok(())
    } else {
        Err(format!("no lane path from {} to {destination} for {fleet}'s composition", f.system))
    }
}

/// Validate one command against the current state. `Ok(())` means the
/// command is admitted for zero-turn execution or phase processing;
/// `Err(reason)` becomes a [`Rejection`] in the turn result, never an
/// `EngineError` (§7 kind 1).
pub fn validate_command(house: &House, command: &Command, ctx: &ValidationContext) -> Result<(), String> {
    // Check 1: the issuing house must still be active.
    if !house.is_active() {
        return Err(format!("house {} is eliminated and may not issue commands", house.id));
    }

    match command {
        Command::IssueFleetOrder { fleet, order } => {
            check_fleet_ownership(house.id, *fleet, ctx.fleets)?;
            check_capability(ctx, *fleet, order.requires())?;
            if let Some(destination) = order.destination() {
                check_path(ctx, *fleet, destination)?;
            }
            Ok(())
        }
        Command::TransferShips { ships: ship_ids, from, to } => {
            check_fleet_ownership(house.id, *from, ctx.fleets)?;
            check_fleet_ownership(house.id, *to, ctx.fleets)?;
            for &ship in ship_ids {
                let s = ctx.ships.get(ship).map_err(|e| e.to_string())?;
                if s.fleet != Some(*from) {
                    return Err(format!("{ship} is not aboard {from}"));
                }
            }
            Ok(())
        }
        Command::MergeFleets { absorbed, into } => {
            check_fleet_ownership(house.id, *absorbed, ctx.fleets)?;
            check_fleet_ownership(house.id, *into, ctx.fleets)
        }
        Command::DetachFleet { source, ships: ship_ids } => {
            check_fleet_ownership(house.id, *source, ctx.fleets)?;
            for &ship in ship_ids {
                let s = ctx.ships.get(ship).map_err(|e| e.to_string())?;
                if s.fleet != Some(*source) {
                    return Err(format!("{ship} is not aboard {source}"));
                }
            }
            Ok(())
        }
        Command::TransferFighters { to, .. } => check_fleet_ownership(house.id, *to, ctx.fleets),
        Command::SetTaxRate { rate } => {
            if *rate > 100 {
                Err(format!("tax rate {rate} exceeds 100"))
            } else {
                Ok(())
            }
        }
        Command::SetResearchAllocation { .. } => Ok(()),
        Command::SetEspionageBudget { amount } => {
            if *amount < 0 {
                Err("espionage budget cannot be negative".to_string())
            } else {
                Ok(())
            }
        }
        Command::ProposeDiplomacy { target, .. } => {
            if *target == house.id {
                Err("a house cannot propose diplomacy with itself".to_string())
            } else {
                Ok(())
            }
        }
        Command::QueueConstruction { colony, item, through } => {
            let c = ctx.colonies.get(*colony).map_err(|e| e.to_string())?;
            if c.owner != house.id {
                return Err(format!("house {} does not own {colony}", house.id));
            }
            if !c.neoria.iter().any(|&n| ctx.neoria.get(n).map(|n| n.kind).ok() == Some(*through)) {
                return Err(format!("{colony} has no {through:?} to commission through"));
            }
            let cost = build_cost(ctx.config, item, *through)?;
            if cost > house.treasury {
                return Err(format!("build cost {cost} exceeds treasury {}", house.treasury));
            }
            Ok(())
        }
        Command::Terraform { colony } => {
            let c = ctx.colonies.get(*colony).map_err(|e| e.to_string())?;
            if c.owner != house.id {
                return Err(format!("house {} does not own {colony}", house.id));
            }
            if c.terraform_level >= ctx.config.terraform_max_level {
                return Err(format!("{colony} is already at its terraform ceiling"));
            }
            if ctx.config.terraform_cost > house.treasury {
                return Err(format!("terraform cost {} exceeds treasury {}", ctx.config.terraform_cost, house.treasury));
            }
            Ok(())
        }
    }
}

/// §4.2 step 7 cost preview: the spaceport commission penalty applies only
/// to non-Fighter ships commissioned through a Spaceport (OQ2).
pub fn build_cost(
    config: &Config,
    item: &crate::entities::construction::BuildItem,
    through: crate::entities::facility::NeoriaKind,
) -> Result<i64, String> {
    use crate::entities::construction::BuildItem;
    match item {
        BuildItem::Ship(class) => {
            let stats = config.ship_stats(*class, 0)?;
            let multiplier = if *class == ShipClass::Fighter {
                1.0
            } else {
                through.commission_multiplier(config.spaceport_commission_penalty)
            };
            Ok((stats.build_cost as f32 * multiplier) as i64)
        }
        BuildItem::Facility(kind) => {
            let stats = config.facility_stats(kind.config_key())?;
            Ok(stats.build_cost as i64)
        }
        BuildItem::GroundUnit(key) => {
            let stats = config
                .ground_unit_stats
                .get(key)
                .ok_or_else(|| format!("ground_unit_stats missing key {key}"))?;
            Ok(stats.build_cost as i64)
        }
    }
}

fn check_fleet_ownership(house: HouseId, fleet: crate::core::ids::FleetId, fleets: &FleetStore) -> Result<(), String> {
    let f = fleets.get(fleet).map_err(|e| e.to_string())?;
    if f.owner != house {
        return Err(format!("{house} does not own {fleet}"));
    }
    Ok(())
}

/// Turn a command-packet validation pass into the rejection list the turn
/// result carries (§7 kind 1).
pub fn validate_packet(house: &House, commands: &[Command], ctx: &ValidationContext) -> (Vec<usize>, Vec<Rejection>) {
    let mut admitted = Vec::new();
    let mut rejections = Vec::new();
    for (index, command) in commands.iter().enumerate() {
        match validate_command(house, command, ctx) {
            Ok(()) => admitted.push(index),
            Err(reason) => rejections.push(Rejection { house: house.id, command_index: index, reason }),
        }
    }
    (admitted, rejections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ids::{FleetId, ShipId, SystemId};
    use crate::entities::fleet::{Fleet, FleetOrder};
    use crate::entities::ship::{Ship, ShipClass};

    fn context<'a>(
        fleets: &'a FleetStore,
        ships: &'a ShipStore,
        colonies: &'a ColonyStore,
        neoria: &'a NeoriaStore,
        star_map: &'a StarMap,
        config: &'a Config,
    ) -> ValidationContext<'a> {
        ValidationContext { fleets, ships, colonies, neoria, star_map, config }
    }

    #[test]
    fn move_fleet_rejected_when_not_owner() {
        let house = House::new(HouseId(0), "A");
        let mut fleets = FleetStore::new();
        fleets.insert(Fleet {
            id: FleetId(0),
            owner: HouseId(1),
            system: SystemId(0),
            destination: None,
            stance: Default::default(),
            order: Default::default(),
        });
        let ships = ShipStore::new();
        let colonies = ColonyStore::new();
        let neoria = NeoriaStore::new();
        let mut star_map = StarMap::new();
        star_map.add_lane(SystemId(0), SystemId(1), LaneClass::Major);
        let config = Config::baseline();
        let command = Command::IssueFleetOrder { fleet: FleetId(0), order: FleetOrder::Move(SystemId(1)) };
        let ctx = context(&fleets, &ships, &colonies, &neoria, &star_map, &config);
        assert!(validate_command(&house, &command, &ctx).is_err());
    }

    #[test]
    fn move_order_without_a_lane_path_is_rejected() {
        let house = House::new(HouseId(0), "A");
        let mut fleets = FleetStore::new();
        fleets.insert(Fleet {
            id: FleetId(0),
            owner: HouseId(0),
            system: SystemId(0),
            destination: None,
            stance: Default::default(),
            order: Default::default(),
        });
        let ships = ShipStore::new();
        let colonies = ColonyStore::new();
        let neoria = NeoriaStore::new();
        let star_map = StarMap::new();
        let config = Config::baseline();
        let command = Command::IssueFleetOrder { fleet: FleetId(0), order: FleetOrder::Move(SystemId(9)) };
        let ctx = context(&fleets, &ships, &colonies, &neoria, &star_map, &config);
        assert!(validate_command(&house, &command, &ctx).is_err());
    }

    #[test]
    fn colonize_requires_a_non_crippled_etac() {
        let house = House::new(HouseId(0), "A");
        let mut fleets = FleetStore::new();
        fleets.insert(Fleet {
            id: FleetId(0),
            owner: HouseId(0),
            system: SystemId(0),
            destination: None,
            stance: Default::default(),
            order: Default::default(),
        });
        let mut ships = ShipStore::new();
        ships.insert(Ship {
            id: ShipId(0),
            class: ShipClass::Destroyer,
            owner: HouseId(0),
            fleet: Some(FleetId(0)),
            hull_points: 10,
            max_hull_points: 10,
            crippled: false,
        });
        let colonies = ColonyStore::new();
        let neoria = NeoriaStore::new();
        let mut star_map = StarMap::new();
        star_map.add_lane(SystemId(0), SystemId(1), LaneClass::Major);
        let config = Config::baseline();
        let command = Command::IssueFleetOrder { fleet: FleetId(0), order: FleetOrder::Colonize(SystemId(1)) };
        let ctx = context(&fleets, &ships, &colonies, &neoria, &star_map, &config);
        assert!(validate_command(&house, &command, &ctx).is_err());
    }

    #[test]
    fn transfer_ships_requires_ship_aboard_source_fleet() {
        let house = House::new(HouseId(0), "A");
        let mut fleets = FleetStore::new();
        fleets.insert(Fleet {
            id: FleetId(0),
            owner: HouseId(0),
            system: SystemId(0),
            destination: None,
            stance: Default::default(),
            order: Default::default(),
        });
        fleets.insert(Fleet {
            id: FleetId(1),
            owner: HouseId(0),
            system: SystemId(0),
            destination: None,
            stance: Default::default(),
            order: Default::default(),
        });
        let mut ships = ShipStore::new();
        ships.insert(Ship {
            id: ShipId(0),
            class: ShipClass::Destroyer,
            owner: HouseId(0),
            fleet: Some(FleetId(1)),
            hull_points: 10,
            max_hull_points: 10,
            crippled: false,
        });
        let colonies = ColonyStore::new();
        let neoria = NeoriaStore::new();
        let star_map = StarMap::new();
        let config = Config::baseline();
        let command = Command::TransferShips { ships: vec![ShipId(0)], from: FleetId(0), to: FleetId(1) };
        let ctx = context(&fleets, &ships, &colonies, &neoria, &star_map, &config);
        assert!(validate_command(&house, &command, &ctx).is_err());
    }

    #[test]
    fn queue_construction_rejected_when_treasury_short() {
        let mut house = House::new(HouseId(0), "A");
        house.treasury = 5;
        let fleets = FleetStore::new();
        let ships = ShipStore::new();
        let mut colonies = ColonyStore::new();
        colonies.insert(crate::entities::colony::Colony {
            id: crate::core::ids::ColonyId(0),
            owner: HouseId(0),
            souls: 2_000_000,
            planet_class: crate::entities::colony::PlanetClass::Terran,
            infrastructure: 10,
            tax_rate: 10,
            terraform_level: 0,
            blockaded: false,
            capacity_overage_turns: 0,
            neoria: vec![crate::core::ids::NeoriaId(0)],
            kastra: None,
            ground_units: Vec::new(),
        });
        let mut neoria = NeoriaStore::new();
        neoria.insert(crate::entities::facility::Neoria {
            id: crate::core::ids::NeoriaId(0),
            colony: crate::core::ids::ColonyId(0),
            kind: crate::entities::facility::NeoriaKind::Shipyard,
            docks_in_use: 0,
        });
        let star_map = StarMap::new();
        let config = Config::baseline();
        let command = Command::QueueConstruction {
            colony: crate::core::ids::ColonyId(0),
            item: crate::entities::construction::BuildItem::Ship(ShipClass::Destroyer),
            through: crate::entities::facility::NeoriaKind::Shipyard,
        };
        let ctx = context(&fleets, &ships, &colonies, &neoria, &star_map, &config);
        assert!(validate_command(&house, &command, &ctx).is_err());
    }
}
