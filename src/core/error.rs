//! Engine error kinds (§7).
//!
//! Only [`EngineError::ConfigError`] and [`EngineError::Invariant`] ever
//! come back from [`crate::turn::resolve_turn`] as an `Err` — validation
//! failures and soft game-rule failures are reported in-band, as rejected
//! commands and `CommandAborted` events respectively, because the turn
//! still advances around them.

use thiserror::Error;

pub type EngineResult<T> = Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    /// Kind 3: an id referenced an entity the store doesn't have, or a
    /// config table is missing the requested key. Programmer error.
    #[error("config/data error: {0}")]
    ConfigError(String),

    /// Kind 4: an index mismatch, a ship owned by two fleets, negative
    /// souls — a broken cross-entity invariant (§3).
    #[error("invariant violation: {0}")]
    Invariant(String),
}

impl EngineError {
    pub fn config(msg: impl Into<String>) -> Self {
        EngineError::ConfigError(msg.into())
    }

    pub fn invariant(msg: impl Into<String>) -> Self {
        EngineError::Invariant(msg.into())
    }
}

/// Kind 1 (§7): a command the validator refused to admit. The turn still
/// advances; this is returned inside `TurnResult::rejected_commands`, never
/// as an `Err`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rejection {
    pub house: crate::core::ids::HouseId,
    pub command_index: usize,
    pub reason: String,
}

use serde::{Deserialize, Serialize};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_formats_with_message() {
        let err = EngineError::config("ship_stats missing class Destroyer");
        assert_eq!(
            err.to_string(),
            "config/data error: ship_stats missing class Destroyer"
        );
    }
}
