use thiserror::Error;

/// Everything that can stop a game or refuse to build one.
///
/// Invalid player input is not part of this list: the engine re-prompts until it gets a legal
/// answer. The `*NotFound` / `CardNotInHand` variants only surface if a legality check was skipped.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GameError {
    #[error("Cannot create a game with {0} players: one must have at least two, and at most five players.")]
    InvalidPlayerCount(usize),

    #[error("Invalid game configuration: {0}")]
    InvalidConfig(String),

    #[error("The map references an unknown city `{0}`.")]
    UnknownCity(String),

    #[error("The map names two routes or ports `{0}`.")]
    DuplicateLabel(String),

    #[error("The map names a route or a port `{0}`, which is already the label of a card, a deck, or an action.")]
    ReservedLabel(String),

    #[error("The route `{0}` is not free.")]
    RouteNotFound(String),

    #[error("The port `{0}` is not free.")]
    PortNotFound(String),

    #[error("The card `{0}` is not in the player's hand.")]
    CardNotInHand(String),

    #[error("Cannot exchange {requested} pieces, at most {max} can be exchanged.")]
    InvalidExchange { requested: u8, max: u8 },

    #[error("The input channel was closed while a choice was pending.")]
    InputClosed,

    #[error("The setup was interrupted earlier: the game cannot be resumed.")]
    SetupInterrupted,

    #[error("The game is over.")]
    GameOver,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_messages() {
        assert_eq!(
            GameError::InvalidPlayerCount(6).to_string(),
            "Cannot create a game with 6 players: one must have at least two, and at most five players."
        );
        assert_eq!(
            GameError::InvalidExchange {
                requested: 4,
                max: 2
            }
            .to_string(),
            "Cannot exchange 4 pieces, at most 2 can be exchanged."
        );
    }
}
