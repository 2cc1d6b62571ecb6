use crate::error::GameError;

use serde::{Deserialize, Serialize};

/// Tunable rules of a game.
///
/// The defaults are the standard rules. Any field missing from a deserialized config keeps its
/// default value.
///
/// # Example
/// ```
/// use rails_and_sails::config::GameConfig;
///
/// let config: GameConfig = serde_json::from_str(r#"{"seed": 7, "max_wagons": 20}"#).unwrap();
/// assert_eq!(config.seed, Some(7));
/// assert_eq!(config.max_wagons, 20);
/// assert_eq!(config.piece_budget, 60);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct GameConfig {
    pub starting_land_cards: usize,
    pub starting_sea_cards: usize,
    pub initial_destinations_offered: usize,
    pub initial_destinations_kept: usize,
    pub destinations_offered: usize,
    pub destinations_kept: usize,
    /// Setup offers are picked at random from the pool instead of from its top.
    pub random_destination_deal: bool,
    /// Wagons plus boats a player puts in play at setup.
    pub piece_budget: u8,
    pub min_wagons: u8,
    pub max_wagons: u8,
    /// Wagon pieces owned by each player, in play or in reserve.
    pub wagon_pool: u8,
    /// Boat pieces owned by each player, in play or in reserve.
    pub boat_pool: u8,
    /// The end of the game triggers once a player has this many pieces in play, or fewer.
    pub end_game_pieces: u8,
    /// Full rounds played once the end of the game has triggered.
    pub final_rounds: usize,
    pub visible_cards: usize,
    /// Number of visible wildcards that forces the visible row to be replaced.
    pub wildcard_limit: usize,
    pub port_cost: usize,
    /// Only cards bearing an anchor (and wildcards) may pay for a port.
    pub port_requires_anchor: bool,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_land_cards: 2,
            starting_sea_cards: 6,
            initial_destinations_offered: 5,
            initial_destinations_kept: 3,
            destinations_offered: 4,
            destinations_kept: 1,
            random_destination_deal: false,
            piece_budget: 60,
            min_wagons: 10,
            max_wagons: 25,
            wagon_pool: 25,
            boat_pool: 50,
            end_game_pieces: 6,
            final_rounds: 2,
            visible_cards: 6,
            wildcard_limit: 3,
            port_cost: 4,
            port_requires_anchor: false,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Checks that the rules can actually be played.
    ///
    /// The starting wagon choice must always leave a number of boats the player owns, and keep
    /// counts cannot exceed offer counts.
    pub fn validate(&self) -> Result<(), GameError> {
        let invalid = |reason: String| Err(GameError::InvalidConfig(reason));

        if self.min_wagons > self.max_wagons {
            return invalid(format!(
                "the wagon range {}..={} is empty",
                self.min_wagons, self.max_wagons
            ));
        }

        if self.max_wagons > self.wagon_pool {
            return invalid(format!(
                "{} wagons cannot be chosen out of a pool of {}",
                self.max_wagons, self.wagon_pool
            ));
        }

        if self.max_wagons > self.piece_budget {
            return invalid(format!(
                "{} wagons exceed the piece budget of {}",
                self.max_wagons, self.piece_budget
            ));
        }

        if self.piece_budget - self.min_wagons > self.boat_pool {
            return invalid(format!(
                "{} boats cannot be taken out of a pool of {}",
                self.piece_budget - self.min_wagons,
                self.boat_pool
            ));
        }

        if self.visible_cards == 0 {
            return invalid(String::from("the visible row cannot be empty"));
        }

        if self.wildcard_limit == 0 {
            return invalid(String::from(
                "a wildcard limit of 0 would replace the visible row forever",
            ));
        }

        if self.initial_destinations_kept > self.initial_destinations_offered
            || self.destinations_kept > self.destinations_offered
        {
            return invalid(String::from(
                "cannot keep more destinations than are offered",
            ));
        }

        if self.port_cost == 0 {
            return invalid(String::from("ports cannot be free"));
        }

        Ok(())
    }
}
