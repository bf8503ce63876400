#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

//! # EC4X Turn Resolution Engine
//!
//! A deterministic, server-authoritative turn resolution engine for the
//! EC4X turn-based strategy game. [`turn::resolve_turn`] is the entire
//! public surface: given a [`core::GameState`], a batch of per-house
//! [`command::CommandPacket`]s, and a seed, it produces the next state and
//! an ordered turn log with no I/O and no suspension points.
//!
//! ## Quick Start
//!
//! ```rust
//! use ec4x_engine::prelude::*;
//!
//! let state = GameState::new();
//! let config = Config::baseline();
//! let result = resolve_turn(state, Vec::new(), 0, &config);
//! assert_eq!(result.next_state.turn, 1);
//! ```
//!
//! ## Architecture Overview
//!
//! Every turn runs the same four phases in the same order, after the
//! deterministic RNG service is seeded for the turn:
//!
//! 1. Conflict — resolve combat in every contested system
//! 2. Income — economy accrual, capacity enforcement, elimination/victory
//! 3. Command — validate each house's orders, execute zero-turn ops
//! 4. Production — movement, diplomacy, research advancement
//!
//! Entities (ships, fleets, colonies, ...) live in per-kind stores, each a
//! primary `Vec`/`HashMap` plus whatever secondary indices its phase logic
//! needs; all mutation goes through the store's own methods so those
//! indices never drift out of sync.
//!
//! ## Error Handling
//!
//! [`core::error::EngineResult<T>`] is the alias used internally for
//! config/data errors and invariant violations — the only two error kinds
//! that ever abort a turn outright. Rejected commands and soft game-rule
//! failures are reported in-band, inside [`turn::TurnResult`], because the
//! turn still advances around them.
//!
//! ## Feature Flags
//!
//! - `debug`: enables [`debug`] module utilities for inspecting state.

pub mod combat;
pub mod command;
pub mod core;
pub mod entities;
pub mod intel;
pub mod phases;
pub mod turn;

pub use core::config::Config;
pub use core::error::{EngineError, EngineResult};
pub use core::GameState;
pub use turn::{resolve_turn, TurnResult};

pub mod prelude {
    //! Common imports for working with the engine: the state, the config,
    //! the command wire shape, and the turn orchestrator.

    pub use crate::combat::{CombatReport, Theater};
    pub use crate::command::{Command, CommandPacket};
    pub use crate::core::config::Config;
    pub use crate::core::error::{EngineError, EngineResult};
    pub use crate::core::ids::*;
    pub use crate::core::GameState;
    pub use crate::turn::{resolve_turn, TurnResult};
}

/// Current version of the engine crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(feature = "debug")]
pub mod debug {
    //! Debug utilities for inspecting engine state.

    use crate::core::GameState;

    /// Print a one-line summary of the current state to stdout.
    pub fn print_state_summary(state: &GameState) {
        println!(
            "turn {} | houses {} | fleets {} | ships {}",
            state.turn,
            state.houses.len(),
            state.fleets.iter().count(),
            state.ships.iter().count()
        );
    }
}

