use serde::{Deserialize, Serialize};

/// Phases of the game, which act as states in the game's finite-state machine.
///
/// # JSON
/// Phases are serialized in snake_case.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GamePhase {
    /// Cards and destination tickets are dealt, and players choose their starting pieces.
    Setup,
    /// The main turn-based phase, until a player runs low on pieces.
    Playing,
    /// Once a player runs low on pieces, a fixed number of rounds are left to play.
    FinalRounds,
    /// Final scores are settled. No action can be taken anymore.
    Done,
}
