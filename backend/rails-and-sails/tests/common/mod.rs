#![allow(dead_code)]

use rails_and_sails::card::{Color, DestinationCard, TransportCard};
use rails_and_sails::city::City;
use rails_and_sails::config::GameConfig;
use rails_and_sails::interaction::ScriptedFrontend;
use rails_and_sails::manager::Manager;
use rails_and_sails::map::{MapData, Route, RouteKind};

pub fn player_names() -> Vec<String> {
    vec![String::from("Ada"), String::from("Bob")]
}

/// A handful of routes of every length used by the scenarios, and tickets nobody can complete.
pub fn scenario_map() -> MapData {
    MapData {
        cities: vec![
            City::new("Lima", true),
            City::new("Cuzco", false),
            City::new("Quito", true),
            City::new("Arica", true),
            City::new("Puno", false),
            City::new("Nazca", false),
            City::new("Tacna", false),
        ],
        routes: vec![
            Route::new("LC", ("Lima", "Cuzco"), Color::Red, 1, RouteKind::Land),
            Route::new("CQ", ("Cuzco", "Quito"), Color::Red, 2, RouteKind::Land),
            Route::new("PN", ("Puno", "Nazca"), Color::Red, 3, RouteKind::Land),
            Route::new("LA", ("Lima", "Arica"), Color::Yellow, 3, RouteKind::Sea),
        ],
        destinations: (1..=12)
            .map(|index| DestinationCard::new(&format!("T{}", index), &["Tacna", "Nazca"], 6))
            .collect(),
    }
}

pub fn seeded_config(seed: u64) -> GameConfig {
    GameConfig {
        seed: Some(seed),
        ..GameConfig::default()
    }
}

/// Sets up a two-player game where both players keep every ticket offered and start with 20 wagons.
pub fn set_up_scenario() -> Manager {
    let mut manager = Manager::new(player_names(), scenario_map(), seeded_config(42)).unwrap();
    let mut io = ScriptedFrontend::new(["", "20", "", "20"]);
    manager.setup(&mut io).unwrap();
    manager
}

/// Replaces the current player's hand.
pub fn give_hand(manager: &mut Manager, cards: impl IntoIterator<Item = TransportCard>) {
    let player = manager.get_mut_current_player();
    player.get_mut_hand().clear();

    for card in cards {
        player.receive_card(card);
    }
}

/// Plays the current player's turn with exactly the given answers.
pub fn play<'a>(manager: &mut Manager, answers: impl IntoIterator<Item = &'a str>) {
    let mut io = ScriptedFrontend::new(answers);
    manager.take_turn(&mut io).unwrap();
    assert_eq!(io.remaining_answers(), 0, "some answers were not used");
}

/// Plays a turn drawing a single blind land card.
pub fn draw_one_card(manager: &mut Manager) {
    play(manager, ["WAGON", ""]);
}

pub fn hand_ids(manager: &Manager, player_index: usize) -> Vec<u16> {
    let mut ids: Vec<u16> = manager.players()[player_index]
        .hand()
        .iter()
        .map(|card| card.id)
        .collect();
    ids.sort_unstable();
    ids
}
