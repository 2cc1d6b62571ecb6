mod common;

use common::*;
use rails_and_sails::card::{Color, DestinationCard, TransportCard};
use rails_and_sails::error::GameError;
use rails_and_sails::game_phase::GamePhase;
use rails_and_sails::interaction::{channel, Frontend, ScriptedFrontend};
use rails_and_sails::manager::{GameState, Manager};
use rails_and_sails::map::{Map, Route, RouteKind};
use rails_and_sails::player::{Player, PlayerColor};

use pretty_assertions::assert_eq;
use std::collections::VecDeque;
use std::thread;

/// Replays answers, and keeps the options of every request.
struct RecordingFrontend {
    answers: VecDeque<&'static str>,
    options: Vec<Vec<String>>,
}

impl RecordingFrontend {
    fn new(answers: &[&'static str]) -> Self {
        Self {
            answers: answers.iter().copied().collect(),
            options: Vec::new(),
        }
    }
}

impl Frontend for RecordingFrontend {
    fn display(&mut self, state: &GameState) {
        self.options.push(state.options.to_vec());
    }

    fn read_line(&mut self) -> Option<String> {
        self.answers.pop_front().map(String::from)
    }
}

#[test]
fn route_count_bonus_at_final_scoring() {
    let mut manager = set_up_scenario();
    let first = manager.current_player_index();
    give_hand(
        &mut manager,
        (901..=906).map(|id| TransportCard::land(id, Color::Red, false)),
    );

    play(&mut manager, ["LC", "C901"]);
    draw_one_card(&mut manager);
    play(&mut manager, ["CQ", "C902", "C903"]);
    draw_one_card(&mut manager);
    play(&mut manager, ["PN", "C904", "C905", "C906"]);

    let player = &manager.players()[first];
    assert_eq!(player.routes().len(), 3);
    assert_eq!(player.wagons(), 20 - 6);
    assert_eq!(player.score(), 1 + 2 + 4);
    assert!(manager.map().free_routes().iter().all(|route| route.name == "LA"));

    let standings = manager.finish();

    assert_eq!(manager.phase(), GamePhase::Done);
    assert_eq!(manager.players()[first].score(), 7 + 7);
    assert_eq!(standings[0].name, manager.players()[first].name());
    assert_eq!(standings[0].score, 14);
    assert_eq!(standings[1].score, 0);
}

#[test]
fn exchanging_five_wagons_for_boats_costs_five_points() {
    let mut manager = set_up_scenario();
    let first = manager.current_player_index();

    play(&mut manager, ["BOAT PIECES", "5"]);

    let player = &manager.players()[first];
    assert_eq!(player.wagons(), 15);
    assert_eq!(player.boats(), 45);
    assert_eq!(player.wagons_in_reserve(), 10);
    assert_eq!(player.boats_in_reserve(), 5);
    assert_eq!(player.score(), -5);
    assert_eq!(manager.current_player_index(), (first + 1) % 2);
}

#[test]
fn simple_sea_card_pays_the_last_unit() {
    let mut manager = set_up_scenario();
    let first = manager.current_player_index();
    give_hand(
        &mut manager,
        [
            TransportCard::sea(901, Color::Yellow, true),
            TransportCard::sea(902, Color::Yellow, false),
            TransportCard::sea(903, Color::Yellow, true),
        ],
    );

    let mut io = RecordingFrontend::new(&["LA", "C901", "C903", "C902"]);
    manager.take_turn(&mut io).unwrap();

    assert_eq!(io.options[1], vec!["C902", "C901", "C903"]);
    // One unit left: the other double card is not offered, and is refused.
    assert_eq!(io.options[2], vec!["C902"]);
    assert_eq!(io.options[3], vec!["C902"]);
    assert!(io.answers.is_empty());

    assert_eq!(hand_ids(&manager, first), vec![903]);
    assert_eq!(manager.players()[first].boats(), 37);
    assert_eq!(manager.players()[first].score(), 4);
}

#[test]
fn port_consumes_exactly_four_cards() {
    let mut manager = set_up_scenario();
    let first = manager.current_player_index();
    give_hand(&mut manager, [TransportCard::land(901, Color::Red, false)]);
    play(&mut manager, ["LC", "C901"]);
    draw_one_card(&mut manager);

    give_hand(
        &mut manager,
        [
            TransportCard::land(910, Color::Red, false),
            TransportCard::land(911, Color::Red, false),
            TransportCard::sea(912, Color::Red, false),
            TransportCard::sea(913, Color::Red, false),
            TransportCard::wildcard(914),
            TransportCard::land(915, Color::Black, false),
        ],
    );
    play(&mut manager, ["Lima"]);

    assert_eq!(hand_ids(&manager, first), vec![914, 915]);
    assert_eq!(manager.players()[first].ports().len(), 1);
    assert!(manager.map().free_port("Lima").is_none());
    assert!(manager.map().free_port("Quito").is_some());
}

#[test]
fn port_rejected_without_enough_cards() {
    let mut manager = set_up_scenario();
    let first = manager.current_player_index();
    give_hand(&mut manager, [TransportCard::land(901, Color::Red, false)]);
    play(&mut manager, ["LC", "C901"]);
    draw_one_card(&mut manager);

    give_hand(
        &mut manager,
        [
            TransportCard::land(910, Color::Red, false),
            TransportCard::wildcard(911),
            TransportCard::sea(912, Color::Red, false),
        ],
    );
    // `Lima` is not offered: the answer is refused, and the player draws instead.
    play(&mut manager, ["Lima", "WAGON", ""]);

    assert!(manager.players()[first].ports().is_empty());
    assert!(manager.map().free_port("Lima").is_some());
    assert_eq!(manager.players()[first].hand().len(), 4);
}

#[test]
fn destinations_complete_through_connected_routes() {
    let mut player = Player::new(String::from("Ada"), PlayerColor::Green, 25, 50);
    player.take_pieces_in_play(20, 40);
    let destination = DestinationCard::new("T1", &["Lima", "Quito"], 8);

    player.capture_route(Route::new("LC", ("Lima", "Cuzco"), Color::Red, 1, RouteKind::Land));
    assert!(!player.is_destination_complete(&destination));

    player.capture_route(Route::new("CQ", ("Cuzco", "Quito"), Color::Grey, 2, RouteKind::Sea));
    assert!(player.is_destination_complete(&destination));

    let itinerary = [
        String::from("Quito"),
        String::from("Lima"),
        String::from("Cuzco"),
    ];
    assert!(Map::connects(player.routes(), &itinerary));

    player.receive_destinations([destination]);
    assert_eq!(player.get_player_state().complete_destinations.len(), 1);
    // Two routes, and the ticket.
    assert_eq!(player.settle_final_score(), 2 + 8);
}

#[test]
fn setup_through_a_channel() {
    let mut manager = Manager::new(player_names(), scenario_map(), seeded_config(5)).unwrap();
    let mut instructions = Vec::new();

    {
        let (input, mut frontend) =
            channel(|state: &GameState| instructions.push(state.instruction.to_owned()));

        let sender = thread::spawn(move || {
            for answer in ["", "12", "", "25"] {
                assert!(input.send(answer));
            }
        });

        manager.setup(&mut frontend).unwrap();
        sender.join().unwrap();
    }

    assert_eq!(instructions.len(), 4);
    assert_eq!(manager.phase(), GamePhase::Playing);
    assert_eq!(manager.players()[0].wagons(), 12);
    assert_eq!(manager.players()[0].boats(), 48);
    assert_eq!(manager.players()[1].wagons(), 25);
    assert_eq!(manager.players()[1].boats(), 35);
}

#[test]
fn routes_cannot_be_named_like_cards() {
    let mut map = scenario_map();
    map.routes
        .push(Route::new("C5", ("Tacna", "Puno"), Color::Red, 1, RouteKind::Land));

    assert_eq!(
        Manager::new(player_names(), map, seeded_config(5)).err(),
        Some(GameError::ReservedLabel(String::from("C5")))
    );

    let mut map = scenario_map();
    map.routes
        .push(Route::new("TP", ("Tacna", "Puno"), Color::Red, 1, RouteKind::Land));
    let mut manager = Manager::new(player_names(), map, seeded_config(5)).unwrap();
    let mut io = ScriptedFrontend::new(["", "20", "", "20"]);
    manager.setup(&mut io).unwrap();
    let first = manager.current_player_index();
    give_hand(&mut manager, [TransportCard::land(901, Color::Red, false)]);

    play(&mut manager, ["TP", "C901"]);

    assert_eq!(manager.players()[first].routes().len(), 1);
    assert!(hand_ids(&manager, first).is_empty());
    assert!(manager.map().free_route("TP").is_none());
}

#[test]
fn run_stops_once_the_input_closes() {
    let mut manager = Manager::new(player_names(), scenario_map(), seeded_config(5)).unwrap();
    let mut io = ScriptedFrontend::new(["", "20"]);

    assert_eq!(manager.run(&mut io), Err(GameError::InputClosed));
    assert_eq!(manager.phase(), GamePhase::Setup);

    let mut io = ScriptedFrontend::new(["", "20", "", "20"]);
    assert_eq!(manager.run(&mut io), Err(GameError::SetupInterrupted));
}
