use crate::{
    card::standard_decks,
    city::City,
    config::GameConfig,
    dealer::{CardDealer, CardDealerState},
    error::GameError,
    game_phase::GamePhase,
    interaction::Frontend,
    map::{Map, MapData, Route},
    player::{Player, PlayerColor, PlayerState},
};

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::Serialize;
use smallvec::SmallVec;
use strum::IntoEnumIterator;
use tracing::{debug, info, warn};

mod turn;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 5;

/// All the information about a game's current state, returned by [`Manager::get_state`].
///
/// Borrows from the live game: a new snapshot is taken before every choice request.
#[derive(Debug, Serialize)]
pub struct GameState<'a> {
    pub phase: GamePhase,
    /// Incremented every time a player finishes their turn.
    pub turn: usize,
    /// Index, in [`GameState::players`], of the player who is acting.
    pub current_player: usize,
    pub players: SmallVec<[PlayerState<'a>; MAX_PLAYERS]>,
    /// Both card piles, and the visible row.
    pub card_dealer: CardDealerState<'a>,
    pub free_routes: &'a [Route],
    pub free_ports: &'a [City],
    pub destination_deck_size: usize,
    /// What the current player is asked for. Empty when no choice is pending.
    pub instruction: &'a str,
    pub options: &'a [String],
    /// Whether the pending choice may be answered with an empty line.
    pub can_pass: bool,
    pub log: &'a [String],
}

/// A player's final position, as returned by [`Manager::run`].
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Standing {
    pub name: String,
    pub color: PlayerColor,
    pub score: i32,
}

/// In charge of holding all the state of the game, driving setup and turns, and settling scores.
///
/// This overall acts as a finite-state machine, whose only suspension point is a choice request
/// sent to the [`Frontend`].
pub struct Manager {
    config: GameConfig,
    /// The current phase of the game, which marks nodes (states) in this finite-state machine.
    phase: GamePhase,
    /// Set as soon as the setup starts dealing, so that an interrupted setup is never dealt twice.
    setup_started: bool,
    turn: usize,
    /// Index of the player whose turn it is in `players`.
    current_player: usize,
    /// Only set once the end of the game has triggered.
    final_turns_left: Option<usize>,
    /// All players, in turn order once the setup is done.
    players: SmallVec<[Player; MAX_PLAYERS]>,
    map: Map,
    card_dealer: CardDealer,
    /// Every shuffle and random pick of the game.
    rng: SmallRng,
    log: Vec<String>,
    instruction: String,
    options: Vec<String>,
    can_pass: bool,
}

impl Manager {
    /// Creates a new [`Manager`] in the [`GamePhase::Setup`], with the standard decks.
    ///
    /// Returns an `Err` if either:
    ///   * There are fewer than two, or more than five players.
    ///   * The configuration is inconsistent.
    ///   * The map references unknown cities, or names routes and ports ambiguously.
    pub fn new(
        player_names: Vec<String>,
        map_data: MapData,
        config: GameConfig,
    ) -> Result<Self, GameError> {
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&player_names.len()) {
            return Err(GameError::InvalidPlayerCount(player_names.len()));
        }

        config.validate()?;
        let map = Map::new(map_data)?;
        turn::check_map_labels(&map)?;

        let mut rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let (land_cards, sea_cards) = standard_decks();
        let card_dealer = CardDealer::new(
            land_cards,
            sea_cards,
            config.visible_cards,
            config.wildcard_limit,
            &mut rng,
        );

        let players = player_names
            .into_iter()
            .zip(PlayerColor::iter())
            .map(|(name, color)| Player::new(name, color, config.wagon_pool, config.boat_pool))
            .collect();

        Ok(Self {
            config,
            phase: GamePhase::Setup,
            setup_started: false,
            turn: 0,
            current_player: 0,
            final_turns_left: None,
            players,
            map,
            card_dealer,
            rng,
            log: Vec::new(),
            instruction: String::new(),
            options: Vec::new(),
            can_pass: false,
        })
    }

    /// Plays the whole game: the setup if it has not happened yet, then turns until the game is over.
    ///
    /// Returns the standings, best score first.
    ///
    /// If the input closes during the setup, the game cannot be resumed, and the manager should
    /// be dropped. A turn interrupted the same way is played again by the same player on the next call.
    pub fn run(&mut self, io: &mut dyn Frontend) -> Result<Vec<Standing>, GameError> {
        if self.phase == GamePhase::Done {
            return Err(GameError::GameOver);
        }

        self.setup(io)?;

        while self.phase != GamePhase::Done {
            self.take_turn(io)?;
        }

        Ok(self.standings())
    }

    /// Prepares the game, which entails:
    ///   * Shuffling the destination tickets, the order of players, and their colors.
    ///   * Revealing the visible cards.
    ///   * Dealing every player their starting hand.
    ///   * Having every player, in turn order, pick their starting destination tickets and pieces.
    ///
    /// Does nothing outside of the [`GamePhase::Setup`]. Returns an `Err` if a previous setup was
    /// interrupted, as cards and tickets were already dealt.
    pub fn setup(&mut self, io: &mut dyn Frontend) -> Result<(), GameError> {
        if self.phase != GamePhase::Setup {
            return Ok(());
        }

        if self.setup_started {
            return Err(GameError::SetupInterrupted);
        }
        self.setup_started = true;

        info!(num_players = self.players.len(), "Setting up the game");

        self.map.shuffle_destinations(&mut self.rng);
        self.players.shuffle(&mut self.rng);

        let mut colors: SmallVec<[PlayerColor; MAX_PLAYERS]> = PlayerColor::iter().collect();
        colors.shuffle(&mut self.rng);
        for (player, color) in self.players.iter_mut().zip(colors) {
            player.change_color(color);
        }

        self.card_dealer.reveal_visible_cards(&mut self.rng);

        for player in self.players.iter_mut() {
            let hand = self.card_dealer.deal_hand(
                self.config.starting_land_cards,
                self.config.starting_sea_cards,
                &mut self.rng,
            );

            for card in hand {
                player.receive_card(card);
            }
        }

        for index in 0..self.players.len() {
            self.current_player = index;

            let num_offered = self.config.initial_destinations_offered;
            let offer = if self.config.random_destination_deal {
                self.map.draw_random_destinations(num_offered, &mut self.rng)
            } else {
                self.map.draw_top_destinations(num_offered)
            };
            self.choose_destinations(io, offer, self.config.initial_destinations_kept)?;

            let name = self.players[index].name().to_owned();
            let piece_budget = self.config.piece_budget;
            let wagons = self.request_number(
                io,
                format!(
                    "{}, choose how many of your {} pieces are wagons. The others are boats.",
                    name, piece_budget
                ),
                self.config.min_wagons,
                self.config.max_wagons,
            )?;
            let boats = piece_budget - wagons;

            self.players[index].take_pieces_in_play(wagons, boats);
            self.log(format!(
                "{} starts with {} wagons and {} boats.",
                name, wagons, boats
            ));
        }

        self.current_player = 0;
        self.phase = GamePhase::Playing;
        self.log(String::from("The game starts."));

        Ok(())
    }

    /// Plays the current player's turn, then hands over to the next player, or ends the game.
    ///
    /// Returns an `Err` if the game is over, or if the input closed in the middle of the turn.
    pub fn take_turn(&mut self, io: &mut dyn Frontend) -> Result<(), GameError> {
        if self.phase == GamePhase::Done {
            return Err(GameError::GameOver);
        }

        debug!(turn = self.turn, player = self.current_player, "Starting a turn");

        self.resolve_turn(io)?;
        self.end_turn();

        Ok(())
    }

    fn end_turn(&mut self) {
        let num_players = self.players.len();

        match self.final_turns_left.as_mut() {
            Some(final_turns_left) => *final_turns_left = final_turns_left.saturating_sub(1),
            None => {
                let player = &self.players[self.current_player];
                let pieces_in_play = player.pieces_in_play();

                if pieces_in_play <= u16::from(self.config.end_game_pieces) {
                    let final_turns = self.config.final_rounds * num_players;
                    let message = format!(
                        "{} has only {} pieces left: {} turns are left to play.",
                        player.name(),
                        pieces_in_play,
                        final_turns
                    );

                    self.final_turns_left = Some(final_turns);
                    self.phase = GamePhase::FinalRounds;
                    self.log(message);
                }
            }
        }

        if self.final_turns_left == Some(0) {
            self.finish();
            return;
        }

        self.turn += 1;
        self.current_player = (self.current_player + 1) % num_players;
    }

    /// Settles the final scores (route count bonus and complete destination tickets), and ends the game.
    ///
    /// Scores are only settled once. Returns the standings, best score first.
    pub fn finish(&mut self) -> Vec<Standing> {
        if self.phase != GamePhase::Done {
            for index in 0..self.players.len() {
                let points = self.players[index].settle_final_score();
                let message = format!(
                    "{} gains {} points at the end of the game, for a total of {}.",
                    self.players[index].name(),
                    points,
                    self.players[index].score()
                );
                self.log(message);
            }

            self.phase = GamePhase::Done;
            self.clear_request();
            self.log(String::from("The game is over."));
        }

        self.standings()
    }

    /// Players sorted by score, best first. Ties keep the turn order.
    pub fn standings(&self) -> Vec<Standing> {
        let mut standings: Vec<Standing> = self
            .players
            .iter()
            .map(|player| Standing {
                name: player.name().to_owned(),
                color: player.color(),
                score: player.score(),
            })
            .collect();

        standings.sort_by(|a, b| b.score.cmp(&a.score));
        standings
    }

    /// Appends a message to the game log.
    pub fn log(&mut self, message: String) {
        info!("{}", message);
        self.log.push(message);
    }

    fn clear_request(&mut self) {
        self.instruction.clear();
        self.options.clear();
        self.can_pass = false;
    }

    /// Asks the current player to pick one of the given options, and blocks until they do.
    ///
    /// Answers are trimmed. An empty answer is accepted if passing is allowed, or if there is
    /// no option at all. Anything else is rejected, and the question is asked again.
    ///
    /// Returns an `Err` if the input closes before a valid answer comes.
    pub fn request_choice(
        &mut self,
        io: &mut dyn Frontend,
        instruction: String,
        options: Vec<String>,
        can_pass: bool,
    ) -> Result<String, GameError> {
        self.can_pass = can_pass || options.is_empty();
        self.instruction = instruction;
        self.options = options;

        debug!(instruction = %self.instruction, options = ?self.options, "Requesting a choice");

        loop {
            io.display(&self.get_state());

            let answer = io.read_line().ok_or(GameError::InputClosed)?;
            let answer = answer.trim();

            if (answer.is_empty() && self.can_pass) || self.options.iter().any(|option| option == answer)
            {
                let answer = answer.to_owned();
                self.clear_request();
                return Ok(answer);
            }

            warn!(answer, "Rejected an answer that is not one of the options");
        }
    }

    /// Asks the current player for a number between `min` and `max` (both included), and blocks
    /// until they give one.
    ///
    /// Invalid answers add a validation message to the game log, and the question is asked again.
    pub fn request_number(
        &mut self,
        io: &mut dyn Frontend,
        instruction: String,
        min: u8,
        max: u8,
    ) -> Result<u8, GameError> {
        self.can_pass = false;
        self.instruction = instruction;
        self.options = (min..=max).map(|number| number.to_string()).collect();

        debug!(instruction = %self.instruction, min, max, "Requesting a number");

        loop {
            io.display(&self.get_state());

            let answer = io.read_line().ok_or(GameError::InputClosed)?;
            let answer = answer.trim();

            match answer.parse::<i64>() {
                Ok(number) => match u8::try_from(number) {
                    Ok(number) if (min..=max).contains(&number) => {
                        self.clear_request();
                        return Ok(number);
                    }
                    _ => self.log(format!(
                        "{} is not between {} and {}.",
                        number, min, max
                    )),
                },
                Err(_) => self.log(format!("`{}` is not a number.", answer)),
            }
        }
    }

    /// Returns the game's state, including the pending request.
    pub fn get_state(&self) -> GameState {
        GameState {
            phase: self.phase,
            turn: self.turn,
            current_player: self.current_player,
            players: self
                .players
                .iter()
                .map(|player| player.get_player_state())
                .collect(),
            card_dealer: self.card_dealer.get_state(),
            free_routes: self.map.free_routes(),
            free_ports: self.map.free_ports(),
            destination_deck_size: self.map.destination_deck_len(),
            instruction: &self.instruction,
            options: &self.options,
            can_pass: self.can_pass,
            log: &self.log,
        }
    }

    #[inline]
    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    #[inline]
    pub fn turn(&self) -> usize {
        self.turn
    }

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[inline]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[inline]
    pub fn current_player_index(&self) -> usize {
        self.current_player
    }

    #[inline]
    pub fn current_player(&self) -> &Player {
        &self.players[self.current_player]
    }

    #[inline]
    pub fn map(&self) -> &Map {
        &self.map
    }

    #[inline]
    pub fn card_dealer(&self) -> &CardDealer {
        &self.card_dealer
    }

    #[inline]
    pub fn get_log(&self) -> &[String] {
        &self.log
    }

    /// Mutable accessor to the player whose turn it is.
    ///
    /// Should only be used for testing!
    pub fn get_mut_current_player(&mut self) -> &mut Player {
        &mut self.players[self.current_player]
    }

    /// Mutable accessor to the card dealer.
    ///
    /// Should only be used for testing!
    pub fn get_mut_card_dealer(&mut self) -> &mut CardDealer {
        &mut self.card_dealer
    }

    /// Mutable accessor to the map.
    ///
    /// Should only be used for testing!
    pub fn get_mut_map(&mut self) -> &mut Map {
        &mut self.map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::card::{Color, DestinationCard, TransportCard};
    use crate::interaction::ScriptedFrontend;
    use crate::map::RouteKind;
    use pretty_assertions::assert_eq;

    fn test_map_data() -> MapData {
        MapData {
            cities: vec![
                City::new("Lima", true),
                City::new("Cuzco", false),
                City::new("Quito", true),
            ],
            routes: vec![
                Route::new("R1", ("Lima", "Cuzco"), Color::Red, 2, RouteKind::Land),
                Route::new("R2", ("Lima", "Quito"), Color::Grey, 3, RouteKind::Sea),
            ],
            destinations: (1..=12)
                .map(|index| DestinationCard::new(&format!("D{}", index), &["Lima", "Quito"], 4))
                .collect(),
        }
    }

    fn test_config() -> GameConfig {
        GameConfig {
            seed: Some(1234),
            ..GameConfig::default()
        }
    }

    fn player_names(num_players: usize) -> Vec<String> {
        (0..num_players)
            .map(|index| format!("Player {}", index))
            .collect()
    }

    fn new_manager() -> Manager {
        Manager::new(player_names(2), test_map_data(), test_config()).unwrap()
    }

    /// Keeps every destination ticket, and picks 20 wagons, for both players.
    fn setup_answers() -> Vec<&'static str> {
        vec!["", "20", "", "20"]
    }

    fn set_up_manager() -> Manager {
        let mut manager = new_manager();
        let mut io = ScriptedFrontend::new(setup_answers());
        manager.setup(&mut io).unwrap();
        manager
    }

    // Tests for `Manager::new`.

    #[test]
    fn manager_new() {
        let manager = new_manager();

        assert_eq!(manager.phase(), GamePhase::Setup);
        assert_eq!(manager.turn(), 0);
        assert_eq!(manager.players().len(), 2);
        assert_eq!(manager.players()[0].wagons(), 0);
        assert_eq!(manager.card_dealer().land_pile().len(), 80);
        assert_eq!(manager.card_dealer().sea_pile().len(), 60);
        assert!(manager.card_dealer().visible_cards().is_empty());
        assert!(manager.get_log().is_empty());
    }

    #[test]
    fn manager_new_invalid_player_count() {
        assert_eq!(
            Manager::new(player_names(1), test_map_data(), test_config()).err(),
            Some(GameError::InvalidPlayerCount(1))
        );
        assert_eq!(
            Manager::new(player_names(6), test_map_data(), test_config()).err(),
            Some(GameError::InvalidPlayerCount(6))
        );
        assert!(Manager::new(player_names(5), test_map_data(), test_config()).is_ok());
    }

    #[test]
    fn manager_new_invalid_config() {
        let config = GameConfig {
            min_wagons: 30,
            ..test_config()
        };

        assert!(matches!(
            Manager::new(player_names(2), test_map_data(), config),
            Err(GameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn manager_new_unknown_city() {
        let mut map_data = test_map_data();
        map_data
            .routes
            .push(Route::new("R3", ("Lima", "Bogota"), Color::Red, 1, RouteKind::Land));

        assert_eq!(
            Manager::new(player_names(2), map_data, test_config()).err(),
            Some(GameError::UnknownCity(String::from("Bogota")))
        );
    }

    // Tests for `Manager::request_choice` and `Manager::request_number`.

    #[test]
    fn request_choice_reprompts_until_valid() {
        let mut manager = new_manager();
        let mut io = ScriptedFrontend::new(["nope", "", " B "]);

        let options = vec![String::from("A"), String::from("B")];
        let choice = manager.request_choice(&mut io, String::from("Pick one."), options, false);

        assert_eq!(choice, Ok(String::from("B")));
        assert_eq!(io.instructions(), &["Pick one.", "Pick one.", "Pick one."]);
        assert!(manager.get_state().options.is_empty());
        assert!(manager.get_state().instruction.is_empty());
    }

    #[test]
    fn request_choice_pass() {
        let mut manager = new_manager();
        let mut io = ScriptedFrontend::new([""]);

        let choice = manager.request_choice(&mut io, String::from("Pick one."), vec![String::from("A")], true);
        assert_eq!(choice, Ok(String::new()));
    }

    #[test]
    fn request_choice_without_options_can_pass() {
        let mut manager = new_manager();
        let mut io = ScriptedFrontend::new(["A", ""]);

        let choice = manager.request_choice(&mut io, String::from("Nothing to do."), Vec::new(), false);
        assert_eq!(choice, Ok(String::new()));
        assert_eq!(io.remaining_answers(), 0);
    }

    #[test]
    fn request_choice_input_closed() {
        let mut manager = new_manager();
        let mut io = ScriptedFrontend::new(["C"]);

        let choice = manager.request_choice(&mut io, String::from("Pick one."), vec![String::from("A")], false);
        assert_eq!(choice, Err(GameError::InputClosed));
    }

    #[test]
    fn request_number_logs_validation_messages() {
        let mut manager = new_manager();
        let mut io = ScriptedFrontend::new(["many", "300", "9", "12"]);

        assert_eq!(
            manager.request_number(&mut io, String::from("How many?"), 10, 25),
            Ok(12)
        );
        assert_eq!(
            manager.get_log(),
            &[
                "`many` is not a number.",
                "300 is not between 10 and 25.",
                "9 is not between 10 and 25.",
            ]
        );
    }

    // Tests for `Manager::setup`.

    #[test]
    fn setup() {
        let manager = set_up_manager();

        assert_eq!(manager.phase(), GamePhase::Playing);
        assert_eq!(manager.current_player_index(), 0);
        assert_eq!(manager.card_dealer().visible_cards().len(), 6);

        for player in manager.players() {
            assert_eq!(player.hand().len(), 8);
            assert_eq!(player.destinations().len(), 5);
            assert_eq!(player.wagons(), 20);
            assert_eq!(player.boats(), 40);
            assert_eq!(player.wagons_in_reserve(), 5);
            assert_eq!(player.boats_in_reserve(), 10);
        }

        assert_ne!(manager.players()[0].color(), manager.players()[1].color());
        assert_eq!(manager.map().destination_deck_len(), 2);
        assert_eq!(
            manager.card_dealer().land_pile().len() + manager.card_dealer().sea_pile().len(),
            140 - 6 - 16
        );
        assert_eq!(manager.get_log().last().map(String::as_str), Some("The game starts."));
    }

    #[test]
    fn setup_discard_destinations() {
        let mut manager = new_manager();
        let mut io = ScriptedFrontend::new([
            "D99", "", "20", // Unknown ticket, then keep all five.
            "", "20",
        ]);
        manager.setup(&mut io).unwrap();

        let first_offer: Vec<String> = manager.players()[0]
            .destinations()
            .iter()
            .map(|destination| destination.name.clone())
            .collect();
        assert_eq!(first_offer.len(), 5);

        let mut manager = new_manager();
        let mut io = ScriptedFrontend::new([
            first_offer[0].as_str(),
            first_offer[1].as_str(),
            "10",
            "",
            "25",
        ]);
        manager.setup(&mut io).unwrap();

        // The floor of three tickets stops discards on its own.
        assert_eq!(manager.players()[0].destinations().len(), 3);
        assert_eq!(manager.players()[0].wagons(), 10);
        assert_eq!(manager.players()[0].boats(), 50);
        assert_eq!(manager.players()[1].wagons(), 25);
        assert_eq!(manager.players()[1].boats(), 35);
        assert_eq!(manager.map().destination_deck_len(), 4);
        assert_eq!(io.remaining_answers(), 0);
    }

    #[test]
    fn setup_random_destination_deal() {
        let config = GameConfig {
            random_destination_deal: true,
            ..test_config()
        };
        let mut manager = Manager::new(player_names(2), test_map_data(), config).unwrap();
        let mut io = ScriptedFrontend::new(setup_answers());
        manager.setup(&mut io).unwrap();

        assert_eq!(manager.players()[0].destinations().len(), 5);
        assert_eq!(manager.map().destination_deck_len(), 2);
    }

    #[test]
    fn setup_is_deterministic_with_a_seed() {
        let first = set_up_manager();
        let second = set_up_manager();

        assert_eq!(first.players()[0].name(), second.players()[0].name());
        assert_eq!(first.players()[0].hand(), second.players()[0].hand());
        assert_eq!(
            first.card_dealer().visible_cards(),
            second.card_dealer().visible_cards()
        );
    }

    #[test]
    fn interrupted_setup_is_not_dealt_twice() {
        let mut manager = new_manager();
        let mut io = ScriptedFrontend::new(["", "20", ""]);

        assert_eq!(manager.run(&mut io), Err(GameError::InputClosed));
        let players: Vec<String> = manager
            .players()
            .iter()
            .map(|player| player.name().to_owned())
            .collect();

        let mut io = ScriptedFrontend::new(setup_answers());
        assert_eq!(manager.setup(&mut io), Err(GameError::SetupInterrupted));
        assert_eq!(manager.run(&mut io), Err(GameError::SetupInterrupted));

        assert_eq!(manager.phase(), GamePhase::Setup);
        assert_eq!(io.remaining_answers(), 4);
        for (player, name) in manager.players().iter().zip(players) {
            assert_eq!(player.name(), name);
            assert_eq!(player.hand().len(), 8);
        }
        assert_eq!(manager.players()[0].destinations().len(), 5);
        assert_eq!(manager.card_dealer().visible_cards().len(), 6);
    }

    // Tests for the end of the game.

    #[test]
    fn end_turn_triggers_final_rounds() {
        let mut manager = set_up_manager();
        let player = manager.get_mut_current_player();
        player.capture_route(Route::new("X1", ("Lima", "Cuzco"), Color::Grey, 15, RouteKind::Land));
        player.capture_route(Route::new("X2", ("Lima", "Quito"), Color::Grey, 39, RouteKind::Sea));
        assert_eq!(player.pieces_in_play(), 6);

        manager.end_turn();
        assert_eq!(manager.phase(), GamePhase::FinalRounds);
        assert_eq!(manager.final_turns_left, Some(4));
        assert_eq!(manager.current_player_index(), 1);

        for _ in 0..3 {
            manager.end_turn();
            assert_eq!(manager.phase(), GamePhase::FinalRounds);
        }

        manager.end_turn();
        assert_eq!(manager.phase(), GamePhase::Done);
        assert_eq!(manager.get_log().last().map(String::as_str), Some("The game is over."));
    }

    #[test]
    fn take_turn_after_the_end() {
        let mut manager = set_up_manager();
        manager.finish();

        let mut io = ScriptedFrontend::new(["WAGON"]);
        assert_eq!(manager.take_turn(&mut io), Err(GameError::GameOver));
        assert_eq!(manager.run(&mut io), Err(GameError::GameOver));
    }

    #[test]
    fn finish_only_scores_once() {
        let mut manager = set_up_manager();
        manager.players[0].capture_route(Route::new(
            "R1",
            ("Lima", "Cuzco"),
            Color::Red,
            2,
            RouteKind::Land,
        ));

        let standings = manager.finish();
        // Two points for the route, one for the route count.
        assert_eq!(standings[0].score, 3);
        assert_eq!(standings[0].name, manager.players()[0].name());
        assert_eq!(standings[1].score, 0);

        assert_eq!(manager.finish(), standings);
    }

    #[test]
    fn standings_keep_turn_order_on_ties() {
        let manager = set_up_manager();

        let names: Vec<String> = manager
            .standings()
            .into_iter()
            .map(|standing| standing.name)
            .collect();
        let players: Vec<String> = manager
            .players()
            .iter()
            .map(|player| player.name().to_owned())
            .collect();
        assert_eq!(names, players);
    }

    // Tests for `Manager::get_state`.

    #[test]
    fn game_state_to_json() -> serde_json::Result<()> {
        let mut manager = set_up_manager();
        manager
            .get_mut_card_dealer()
            .get_mut_visible_cards()
            .truncate(1);
        manager.get_mut_card_dealer().get_mut_visible_cards()[0] = TransportCard::wildcard(200);

        let state = serde_json::to_value(manager.get_state())?;

        assert_eq!(state["phase"], "playing");
        assert_eq!(state["turn"], 0);
        assert_eq!(state["current_player"], 0);
        assert_eq!(state["players"].as_array().map(Vec::len), Some(2));
        assert_eq!(state["players"][0]["wagons"], 20);
        assert_eq!(
            state["players"][0]["incomplete_destinations"]
                .as_array()
                .map(Vec::len),
            Some(5)
        );
        assert_eq!(state["card_dealer"]["visible_cards"][0]["id"], 200);
        assert_eq!(state["destination_deck_size"], 2);
        assert_eq!(state["free_routes"][1]["name"], "R2");
        assert_eq!(state["free_ports"][0]["name"], "Lima");
        assert_eq!(state["instruction"], "");
        assert_eq!(state["can_pass"], false);
        assert_eq!(state["log"].as_array().map(Vec::len), Some(5));

        Ok(())
    }
}
