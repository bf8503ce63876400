//! The public turn orchestrator (C1-C13, §4, §5).
//!
//! `resolve_turn` is the engine's entire public surface for advancing the
//! game: a pure function from `(state, commands, seed)` to a new state and
//! an ordered turn log, with no I/O and no suspension points (§5).

use crate::command::CommandPacket;
use crate::core::config::Config;
use crate::core::error::Rejection;
use crate::core::event::{Event, EventBus};
use crate::core::rng::RngService;
use crate::core::{GameState, Phase};
use crate::combat::CombatReport;
use crate::phases::{command_phase, conflict, income, production};

#[derive(Debug)]
pub struct TurnResult {
    pub next_state: GameState,
    pub events_ordered: Vec<Event>,
    pub combat_results: Vec<CombatReport>,
    pub rejected_commands: Vec<Rejection>,
    pub victory: Option<crate::core::ids::HouseId>,
}

/// Resolve one turn. `seed` is normally `state.turn` (§6); tests and
/// replays may force a different one. The phase order is fixed: Conflict,
/// Income, Command, Production (§4), preceded by RNG initialization (C4).
pub fn resolve_turn(mut state: GameState, commands: Vec<CommandPacket>, seed: u64, config: &Config) -> TurnResult {
    let rng = RngService::new(seed);
    let mut events = EventBus::new();

    state.phase = Phase::Conflict;
    conflict::run(&mut state, config, &rng, &mut events);

    state.phase = Phase::Income;
    income::run(&mut state, config, &mut events);

    state.phase = Phase::Command;
    let command_result = command_phase::run(&mut state, &commands, config);

    state.phase = Phase::Production;
    production::run(&mut state, &command_result.queued, config, &rng, &mut events);

    crate::intel::update_all(&mut state);

    #[cfg(debug_assertions)]
    state.validate_indices().expect("post-turn index validation");

    let flushed = events.flush();
    let combat_results = flushed
        .iter()
        .filter_map(|e| match &e.kind {
            crate::core::event::EventKind::CombatReportFiled(report) => Some(report.clone()),
            _ => None,
        })
        .collect();
    let victory = flushed.iter().find_map(|e| match &e.kind {
        crate::core::event::EventKind::VictoryAchieved { house } => Some(*house),
        _ => None,
    });

    state.turn += 1;
    state.last_turn_events = flushed.clone();

    TurnResult {
        next_state: state,
        events_ordered: flushed,
        combat_results,
        rejected_commands: command_result.rejections,
        victory,
    }
}
