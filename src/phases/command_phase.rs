//! Command phase (C10, §4.6): validate each house's packet, execute
//! zero-turn ops immediately, and hand everything else on to production.

use crate::command::validate::{validate_packet, ValidationContext};
use crate::command::zero_turn;
use crate::command::{Command, CommandPacket};
use crate::core::config::Config;
use crate::core::error::Rejection;
use crate::core::GameState;

/// A command that survived validation but needs a later phase to act on it
/// (movement happens in production, so the fleet can still be intercepted
/// by this turn's conflict phase before it moves).
#[derive(Debug, Clone)]
pub struct QueuedCommand {
    pub house: crate::core::ids::HouseId,
    pub command: Command,
}

pub struct CommandPhaseResult {
    pub rejections: Vec<Rejection>,
    pub queued: Vec<QueuedCommand>,
}

pub fn run(state: &mut GameState, packets: &[CommandPacket], config: &Config) -> CommandPhaseResult {
    let mut rejections = Vec::new();
    let mut queued = Vec::new();

    for packet in packets {
        let house = match state.houses.get(&packet.house) {
            Some(h) => h.clone(),
            None => continue,
        };
        let ctx = ValidationContext {
            fleets: &state.fleets,
            ships: &state.ships,
            colonies: &state.colonies,
            neoria: &state.neoria,
            star_map: &state.star_map,
            config,
        };
        let (admitted, mut packet_rejections) = validate_packet(&house, &packet.commands, &ctx);
        rejections.append(&mut packet_rejections);

        for index in admitted {
            let command = packet.commands[index].clone();
            match &command {
                Command::TransferShips { ships, from: _, to } => {
                    if let Err(e) = zero_turn::transfer_ships(&mut state.ships, *to, ships) {
                        rejections.push(Rejection { house: packet.house, command_index: index, reason: e.to_string() });
                        continue;
                    }
                }
                Command::MergeFleets { absorbed, into } => {
                    if let Err(e) = zero_turn::merge_fleets(&mut state.fleets, &mut state.ships, *absorbed, *into) {
                        rejections.push(Rejection { house: packet.house, command_index: index, reason: e.to_string() });
                        continue;
                    }
                }
                Command::DetachFleet { source, ships } => {
                    let new_id = state.id_counters.bump_fleet();
                    if let Err(e) = zero_turn::detach_fleet(&mut state.fleets, &mut state.ships, *source, ships, new_id) {
                        rejections.push(Rejection { house: packet.house, command_index: index, reason: e.to_string() });
                        continue;
                    }
                }
                _ => {
                    queued.push(QueuedCommand { house: packet.house, command });
                }
            }
        }
    }

    CommandPhaseResult { rejections, queued }
}
