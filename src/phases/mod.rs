//! The four ordered turn phases (§4: Conflict -> Income -> Command ->
//! Production), each taking the RNG service initialized once at turn
//! entry (C4).

pub mod command_phase;
pub mod conflict;
pub mod income;
pub mod production;
