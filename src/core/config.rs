//! Immutable tuning tables (C2, §6).
//!
//! `Config` is read but never written by the engine. An external
//! collaborator is responsible for loading real game-balance data (RON,
//! TOML, whatever); [`Config::baseline`] ships enough defaults for the
//! engine's own tests, the way the teacher crate ships `config::` module
//! constants for its own defaults.

use crate::entities::ship::ShipClass;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tech fields a house accumulates research points in (§3 `House.techTree`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TechField {
    EL,
    SL,
    CST,
    WEP,
    TFM,
    ELI,
    CIC,
    ACO,
    CLK,
}

pub const ALL_TECH_FIELDS: [TechField; 9] = [
    TechField::EL,
    TechField::SL,
    TechField::CST,
    TechField::WEP,
    TechField::TFM,
    TechField::ELI,
    TechField::CIC,
    TechField::ACO,
    TechField::CLK,
];

/// Config-table-derived per-class, per-tech-level ship statistics (§3 Ship).
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ShipStats {
    pub attack: i32,
    pub defense: i32,
    pub command_cost: i32,
    pub command_rating: i32,
    pub tech_min: u8,
    pub build_cost: i32,
    pub upkeep: i32,
    pub carry_limit: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FacilityStats {
    pub build_cost: i32,
    pub build_ticks: u32,
    pub docks: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GroundUnitStats {
    pub attack: i32,
    pub defense: i32,
    pub build_cost: i32,
    pub upkeep: i32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EconomyConfig {
    pub blockade_penalty: f32,
    pub base_gco_per_infrastructure: f32,
    pub maintenance_scale: f32,
    /// Fraction of a destroyed ship's build cost recoverable as salvage by
    /// the system's combat victor (§4.5).
    pub salvage_fraction: f32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PrestigeConfig {
    pub victory_threshold: i32,
    pub tax_bonus_band_low: u8,
    pub tax_bonus_band_high: u8,
    pub combat_victory_prestige: i32,
    pub tech_levelup_prestige: i32,
    pub elimination_prestige: i32,
    /// Turns of net-negative prestige before the instability penalty fires
    /// (§4.5).
    pub instability_threshold: u8,
    pub instability_penalty: i32,
    /// Turn at which the game ends regardless of threshold (§4.5 "turn
    /// limit" victory condition). `0` disables the limit.
    pub turn_limit: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EspionageConfig {
    pub points_per_pp: i32,
    pub overinvestment_cap: i32,
    pub overinvestment_penalty: f32,
}

/// Breakthrough odds (numerator out of 100) once a field hits its
/// research-point threshold, keyed by current tech level.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchConfig {
    pub breakthrough_table: HashMap<u8, u8>,
    pub points_per_level: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub ship_stats: HashMap<ShipClass, ShipStats>,
    pub ground_unit_stats: HashMap<String, GroundUnitStats>,
    pub facility_stats: HashMap<String, FacilityStats>,
    pub economy: EconomyConfig,
    pub prestige: PrestigeConfig,
    pub espionage: EspionageConfig,
    pub research: ResearchConfig,
    pub spaceport_commission_penalty: f32,
    pub capacity_grace_period_turns: u8,
    pub defensive_collapse_turns: u8,
    /// Treasury cost per terraforming step (§4.7).
    pub terraform_cost: i64,
    /// Ceiling a colony's terraform level climbs to before further orders
    /// are rejected as no-ops (§4.7).
    pub terraform_max_level: u8,
}

impl Config {
    /// Lookup a ship's stats, scaling attack/defense by `wep_level`. Missing
    /// entries are a config error (§7 kind 3), never a panic.
    pub fn ship_stats(&self, class: ShipClass, wep_level: u8) -> Result<ShipStats, String> {
        let base = self
            .ship_stats
            .get(&class)
            .ok_or_else(|| format!("ship_stats missing class {:?}", class))?;
        Ok(ShipStats {
            attack: base.attack + base.attack * wep_level as i32 / 10,
            defense: base.defense + base.defense * wep_level as i32 / 10,
            ..*base
        })
    }

    pub fn facility_stats(&self, key: &str) -> Result<FacilityStats, String> {
        self.facility_stats
            .get(key)
            .copied()
            .ok_or_else(|| format!("facility_stats missing key {key}"))
    }

    /// A reasonable default table set, for tests and as a starting point for
    /// an external loader.
    pub fn baseline() -> Self {
        use ShipClass::*;
        let mut ship_stats = HashMap::new();
        let entry = |a: i32, d: i32, cc: i32, cr: i32, tm: u8, bc: i32, up: i32, carry: u32| ShipStats {
            attack: a,
            defense: d,
            command_cost: cc,
            command_rating: cr,
            tech_min: tm,
            build_cost: bc,
            upkeep: up,
            carry_limit: carry,
        };
        ship_stats.insert(Fighter, entry(2, 2, 1, 0, 0, 10, 1, 0));
        ship_stats.insert(Scout, entry(1, 1, 1, 1, 0, 15, 1, 0));
        ship_stats.insert(Raider, entry(4, 2, 2, 1, 1, 30, 2, 0));
        ship_stats.insert(Corvette, entry(3, 3, 2, 1, 1, 25, 2, 0));
        ship_stats.insert(Destroyer, entry(6, 5, 3, 2, 1, 50, 3, 0));
        ship_stats.insert(Cruiser, entry(10, 8, 4, 2, 2, 90, 4, 0));
        ship_stats.insert(Battlecruiser, entry(14, 11, 5, 3, 3, 140, 5, 0));
        ship_stats.insert(Battleship, entry(20, 16, 6, 3, 4, 220, 7, 0));
        ship_stats.insert(Dreadnought, entry(28, 22, 8, 4, 5, 340, 10, 0));
        ship_stats.insert(Monitor, entry(18, 24, 6, 3, 4, 260, 8, 0));
        ship_stats.insert(CommandShip, entry(8, 14, 6, 5, 3, 200, 6, 0));
        ship_stats.insert(Carrier, entry(4, 10, 5, 2, 3, 180, 6, 12));
        ship_stats.insert(Starbase, entry(24, 30, 0, 0, 2, 400, 12, 0));
        ship_stats.insert(ETAC, entry(0, 2, 1, 1, 0, 40, 2, 0));
        ship_stats.insert(TroopTransport, entry(0, 3, 2, 1, 0, 60, 3, 0));
        ship_stats.insert(Freighter, entry(0, 2, 1, 1, 0, 35, 2, 0));
        ship_stats.insert(PlanetBreaker, entry(60, 40, 12, 6, 6, 900, 20, 0));

        let mut ground_unit_stats = HashMap::new();
        ground_unit_stats.insert(
            "Militia".to_string(),
            GroundUnitStats { attack: 2, defense: 3, build_cost: 20, upkeep: 1 },
        );
        ground_unit_stats.insert(
            "Marine".to_string(),
            GroundUnitStats { attack: 5, defense: 5, build_cost: 45, upkeep: 2 },
        );
        ground_unit_stats.insert(
            "Armor".to_string(),
            GroundUnitStats { attack: 8, defense: 7, build_cost: 70, upkeep: 3 },
        );

        let mut facility_stats = HashMap::new();
        facility_stats.insert(
            "Spaceport".to_string(),
            FacilityStats { build_cost: 150, build_ticks: 4, docks: 1 },
        );
        facility_stats.insert(
            "Shipyard".to_string(),
            FacilityStats { build_cost: 400, build_ticks: 8, docks: 2 },
        );
        facility_stats.insert(
            "Drydock".to_string(),
            FacilityStats { build_cost: 800, build_ticks: 12, docks: 4 },
        );
        facility_stats.insert(
            "Starbase".to_string(),
            FacilityStats { build_cost: 1200, build_ticks: 16, docks: 0 },
        );

        let mut breakthrough_table = HashMap::new();
        for level in 0u8..20 {
            breakthrough_table.insert(level, 35u8.saturating_sub(level));
        }

        Config {
            ship_stats,
            ground_unit_stats,
            facility_stats,
            economy: EconomyConfig {
                blockade_penalty: 0.4,
                base_gco_per_infrastructure: 2.5,
                maintenance_scale: 1.0,
                salvage_fraction: 0.25,
            },
            prestige: PrestigeConfig {
                victory_threshold: 1000,
                tax_bonus_band_low: 15,
                tax_bonus_band_high: 35,
                combat_victory_prestige: 5,
                tech_levelup_prestige: 2,
                elimination_prestige: 25,
                instability_threshold: 3,
                instability_penalty: 10,
                turn_limit: 500,
            },
            espionage: EspionageConfig {
                points_per_pp: 40,
                overinvestment_cap: 500,
                overinvestment_penalty: 0.5,
            },
            research: ResearchConfig { breakthrough_table, points_per_level: 100 },
            spaceport_commission_penalty: 1.0,
            capacity_grace_period_turns: 2,
            defensive_collapse_turns: 3,
            terraform_cost: 500,
            terraform_max_level: 10,
        }
    }
}
