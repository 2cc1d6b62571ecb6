use rails_and_sails::card::{CardKind, TransportCard};
use rails_and_sails::manager::GameState;
use rails_and_sails::player::PlayerState;
use tracing::error;

/// Prints snapshots on stdout, as text or as JSON.
pub struct ConsoleDisplay {
    json: bool,
    /// Game log entries already printed.
    num_logged: usize,
}

fn describe_card(card: &TransportCard) -> String {
    match card.kind {
        CardKind::Wildcard => format!("{} wildcard", card.name()),
        CardKind::Land if card.has_anchor => format!("{} {} wagon, anchor", card.name(), card.color),
        CardKind::Land => format!("{} {} wagon", card.name(), card.color),
        CardKind::Sea if card.is_double => format!("{} {} double boat", card.name(), card.color),
        CardKind::Sea => format!("{} {} boat, anchor", card.name(), card.color),
    }
}

fn describe_player(player: &PlayerState) -> String {
    format!(
        "{} ({}): {} points, {} wagons ({} in reserve), {} boats ({} in reserve), {} routes, {} ports",
        player.name,
        player.color,
        player.score,
        player.wagons,
        player.wagons_in_reserve,
        player.boats,
        player.boats_in_reserve,
        player.routes.len(),
        player.ports.len()
    )
}

impl ConsoleDisplay {
    pub fn new(json: bool) -> Self {
        Self {
            json,
            num_logged: 0,
        }
    }

    pub fn show(&mut self, state: &GameState) {
        if self.json {
            match serde_json::to_string(state) {
                Ok(json) => println!("{}", json),
                Err(err) => error!(%err, "Cannot serialize the game state"),
            }
            return;
        }

        for message in state.log.iter().skip(self.num_logged) {
            println!("* {}", message);
        }
        self.num_logged = state.log.len();

        println!();
        for (index, player) in state.players.iter().enumerate() {
            let marker = if index == state.current_player { ">" } else { " " };
            println!("{} {}", marker, describe_player(player));
        }

        if let Some(player) = state.players.get(state.current_player) {
            println!("Hand:");
            for card in player.hand {
                println!("    {}", describe_card(card));
            }

            for destination in &player.complete_destinations {
                println!("    [done] {} ({} points)", destination.name, destination.points);
            }
            for destination in &player.incomplete_destinations {
                println!(
                    "    [todo] {}: {} ({} points)",
                    destination.name,
                    destination.cities.join(" - "),
                    destination.points
                );
            }
        }

        println!("Visible cards:");
        for card in state.card_dealer.visible_cards {
            println!("    {}", describe_card(card));
        }
        println!(
            "Wagon deck: {} cards. Boat deck: {} cards. Destination tickets: {}.",
            state.card_dealer.land_pile.draw_pile_size,
            state.card_dealer.sea_pile.draw_pile_size,
            state.destination_deck_size
        );

        println!();
        println!("{}", state.instruction);
        if !state.options.is_empty() {
            println!("Options: {}", state.options.join(", "));
        }
        if state.can_pass {
            println!("(Enter an empty line to pass.)");
        }
    }
}
