//! The dialogs of a turn: picking an action, then resolving it one choice request at a time.

use super::Manager;
use crate::card::{Color, DestinationCard, TransportCard};
use crate::dealer::Deck;
use crate::error::GameError;
use crate::interaction::Frontend;
use crate::map::Map;
use crate::player::{Piece, RoutePayment};

const DESTINATIONS: &str = "DESTINATIONS";

/// Where a card is drawn from.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Draw {
    Blind(Deck),
    /// By card id.
    Visible(u16),
}

/// What an option of the turn menu does once picked.
#[derive(Clone, Debug, PartialEq)]
enum Action {
    BuildPort(String),
    Draw(Draw),
    CaptureRoute(String),
    Exchange(Piece),
    DrawDestinations,
}

/// Parses the `C<id>` label of a card.
fn parse_card_label(label: &str) -> Option<u16> {
    label.strip_prefix('C')?.parse().ok()
}

/// Whether a route or port name would be mistaken for another option of the turn menu.
fn is_reserved_label(label: &str) -> bool {
    label == DESTINATIONS
        || label.parse::<Deck>().is_ok()
        || [Piece::Wagon, Piece::Boat]
            .iter()
            .any(|piece| piece.exchange_label() == label)
        || parse_card_label(label).is_some()
}

/// Returns an `Err` if a route or a port of the map is named like a card, a deck, or an action.
pub(super) fn check_map_labels(map: &Map) -> Result<(), GameError> {
    let route_names = map.free_routes().iter().map(|route| route.name.as_str());
    let port_names = map.free_ports().iter().map(|city| city.name.as_str());

    match route_names.chain(port_names).find(|label| is_reserved_label(label)) {
        Some(label) => Err(GameError::ReservedLabel(label.to_owned())),
        None => Ok(()),
    }
}

impl Manager {
    fn current_name(&self) -> String {
        self.current_player().name().to_owned()
    }

    fn reset_visible_cards_if_needed(&mut self) {
        if self.card_dealer.maybe_reset_visible_cards(&mut self.rng) {
            self.log(String::from(
                "There were too many visible wildcards: the visible cards were replaced.",
            ));
        }
    }

    fn open_decks(&self) -> impl Iterator<Item = Deck> + '_ {
        [Deck::Land, Deck::Sea]
            .into_iter()
            .filter(|deck| !self.card_dealer.is_exhausted(*deck))
    }

    /// Every action the current player can take, under its option label, in this order:
    /// ports to build, visible cards, routes to capture, blind draws, piece exchanges, destination tickets.
    fn turn_actions(&self) -> Vec<(String, Action)> {
        let player = self.current_player();
        let port_cost = self.config.port_cost;
        let port_requires_anchor = self.config.port_requires_anchor;

        let mut actions: Vec<(String, Action)> = self
            .map
            .free_ports()
            .iter()
            .filter(|city| player.can_build_port(city, port_cost, port_requires_anchor))
            .map(|city| (city.name.clone(), Action::BuildPort(city.name.clone())))
            .collect();

        actions.extend(
            self.card_dealer
                .visible_cards()
                .iter()
                .map(|card| (card.name(), Action::Draw(Draw::Visible(card.id)))),
        );

        actions.extend(
            self.map
                .free_routes()
                .iter()
                .filter(|route| player.can_capture_route(route))
                .map(|route| (route.name.clone(), Action::CaptureRoute(route.name.clone()))),
        );

        actions.extend(
            self.open_decks()
                .map(|deck| (deck.to_string(), Action::Draw(Draw::Blind(deck)))),
        );

        actions.extend(
            [Piece::Wagon, Piece::Boat]
                .into_iter()
                .filter(|piece| player.max_exchange(*piece) > 0)
                .map(|piece| (piece.exchange_label().to_owned(), Action::Exchange(piece))),
        );

        if self.map.destination_deck_len() > 0 {
            actions.push((DESTINATIONS.to_owned(), Action::DrawDestinations));
        }

        actions
    }

    /// The options the current player is offered at the start of their turn.
    pub fn turn_options(&self) -> Vec<String> {
        self.turn_actions()
            .into_iter()
            .map(|(label, _)| label)
            .collect()
    }

    /// Asks the current player for their action, and resolves it.
    pub(super) fn resolve_turn(&mut self, io: &mut dyn Frontend) -> Result<(), GameError> {
        self.reset_visible_cards_if_needed();

        let name = self.current_name();
        let mut actions = self.turn_actions();
        let options = actions.iter().map(|(label, _)| label.clone()).collect();
        let choice = self.request_choice(io, format!("{}, choose an action.", name), options, false)?;

        let action = match actions.iter().position(|(label, _)| *label == choice) {
            Some(index) => actions.swap_remove(index).1,
            None => {
                self.log(format!("{} cannot do anything, and passes.", name));
                return Ok(());
            }
        };

        match action {
            Action::BuildPort(city) => self.build_port(io, &city),
            Action::Draw(draw) => self.draw_cards(io, draw),
            Action::CaptureRoute(route) => self.capture_route(io, &route),
            Action::Exchange(piece) => self.exchange_pieces(io, piece),
            Action::DrawDestinations => self.draw_destinations(io),
        }
    }

    /// Draws a first card and, unless it was a visible wildcard, offers a second one.
    fn draw_cards(&mut self, io: &mut dyn Frontend, first_draw: Draw) -> Result<(), GameError> {
        let first_card = match self.draw_card(io, first_draw)? {
            Some(card) => card,
            None => return Ok(()),
        };

        if matches!(first_draw, Draw::Visible(_)) && first_card.is_wildcard() {
            return Ok(());
        }

        self.reset_visible_cards_if_needed();

        // Visible wildcards cannot be taken as a second card.
        let mut draws: Vec<(String, Draw)> = self
            .card_dealer
            .visible_cards()
            .iter()
            .filter(|card| !card.is_wildcard())
            .map(|card| (card.name(), Draw::Visible(card.id)))
            .collect();
        draws.extend(
            self.open_decks()
                .map(|deck| (deck.to_string(), Draw::Blind(deck))),
        );

        if draws.is_empty() {
            return Ok(());
        }

        let name = self.current_name();
        let options = draws.iter().map(|(label, _)| label.clone()).collect();
        let choice = self.request_choice(
            io,
            format!("{}, draw a second card, or pass.", name),
            options,
            true,
        )?;

        match draws.into_iter().find(|(label, _)| *label == choice) {
            Some((_, second_draw)) => {
                self.draw_card(io, second_draw)?;
            }
            None => self.log(format!("{} does not draw a second card.", name)),
        }

        Ok(())
    }

    /// Moves one card to the current player's hand. A visible card is then replaced.
    fn draw_card(
        &mut self,
        io: &mut dyn Frontend,
        draw: Draw,
    ) -> Result<Option<TransportCard>, GameError> {
        let name = self.current_name();

        let card = match draw {
            Draw::Blind(deck) => self.card_dealer.draw(deck, &mut self.rng),
            Draw::Visible(card_id) => self.card_dealer.take_visible_card(card_id),
        };

        let card = match card {
            Some(card) => card,
            None => return Ok(None),
        };

        self.players[self.current_player].receive_card(card);

        match draw {
            Draw::Blind(deck) => {
                self.log(format!("{} draws a card from the {} deck.", name, deck));
            }
            Draw::Visible(_) => {
                self.log(format!(
                    "{} takes the visible card {} ({} {}).",
                    name,
                    card.name(),
                    card.color,
                    card.kind
                ));
                self.replace_visible_card(io)?;
            }
        }

        Ok(Some(card))
    }

    /// Fills the slot of a visible card that was taken, from the deck the player picks.
    ///
    /// There is nothing to pick when a single deck has cards, and nothing to do when none has.
    fn replace_visible_card(&mut self, io: &mut dyn Frontend) -> Result<(), GameError> {
        let open_decks: Vec<Deck> = self.open_decks().collect();

        let deck = match open_decks.as_slice() {
            [] => return Ok(()),
            [deck] => *deck,
            _ => {
                let name = self.current_name();
                let options = open_decks.iter().map(Deck::to_string).collect();
                let choice = self.request_choice(
                    io,
                    format!("{}, choose the deck replacing the visible card.", name),
                    options,
                    false,
                )?;

                choice.parse().unwrap_or(Deck::Land)
            }
        };

        if let Some(card) = self.card_dealer.replace_visible_card(deck, &mut self.rng) {
            self.log(format!(
                "The card {} ({} {}) is now visible.",
                card.name(),
                card.color,
                card.kind
            ));
        }

        Ok(())
    }

    /// Collects payment one card at a time, then hands the route over to the current player.
    fn capture_route(&mut self, io: &mut dyn Frontend, route_name: &str) -> Result<(), GameError> {
        let route = self
            .map
            .free_route(route_name)
            .cloned()
            .ok_or_else(|| GameError::RouteNotFound(route_name.to_owned()))?;
        let name = self.current_name();

        let mut payment = RoutePayment::for_route(&route);
        while !payment.is_complete() {
            let options = self
                .current_player()
                .acceptable_cards(&payment)
                .iter()
                .map(TransportCard::name)
                .collect();

            let choice = self.request_choice(
                io,
                format!(
                    "{}, pay for {}: {} units left.",
                    name, route.name, payment.remaining
                ),
                options,
                false,
            )?;

            let card_id =
                parse_card_label(&choice).ok_or_else(|| GameError::CardNotInHand(choice.clone()))?;
            let card = self.players[self.current_player].pay_with(card_id, &mut payment)?;
            self.card_dealer.discard(card);
        }

        let route = self.map.claim_route(route_name)?;
        self.log(format!(
            "{} captures the {} route {} between {} and {} ({} points).",
            name, route.kind, route.name, route.cities.0, route.cities.1, route.points
        ));
        self.players[self.current_player].capture_route(route);

        Ok(())
    }

    /// Pays for a port, in a color the current player picks if several are possible.
    fn build_port(&mut self, io: &mut dyn Frontend, city_name: &str) -> Result<(), GameError> {
        let city = self
            .map
            .free_port(city_name)
            .cloned()
            .ok_or_else(|| GameError::PortNotFound(city_name.to_owned()))?;
        let name = self.current_name();
        let port_cost = self.config.port_cost;
        let port_requires_anchor = self.config.port_requires_anchor;

        let colors = self
            .current_player()
            .port_colors(&city, port_cost, port_requires_anchor);

        let color = match colors.as_slice() {
            [] => {
                return Err(GameError::CardNotInHand(format!(
                    "{} cards to build a port in {}",
                    port_cost, city
                )))
            }
            [color] => *color,
            _ => {
                let options = colors.iter().map(Color::to_string).collect();
                let choice = self.request_choice(
                    io,
                    format!("{}, choose the color of the cards paying for the port.", name),
                    options,
                    false,
                )?;

                choice.parse().unwrap_or(colors[0])
            }
        };

        let cards =
            self.players[self.current_player].pay_for_port(color, port_cost, port_requires_anchor)?;
        for card in cards {
            self.card_dealer.discard(card);
        }

        let city = self.map.claim_port(city_name)?;
        self.log(format!("{} builds a port in {}.", name, city));
        self.players[self.current_player].build_port(city);

        Ok(())
    }

    fn exchange_pieces(&mut self, io: &mut dyn Frontend, piece: Piece) -> Result<(), GameError> {
        let name = self.current_name();
        let max = self.current_player().max_exchange(piece);

        let num_pieces = self.request_number(
            io,
            format!(
                "{}, how many {}s do you bring in from your reserve? Each one costs a point.",
                name, piece
            ),
            1,
            max,
        )?;

        self.players[self.current_player].exchange_pieces(piece, num_pieces)?;
        self.log(format!(
            "{} brings {} {}s in from their reserve, for {} points.",
            name, num_pieces, piece, num_pieces
        ));

        Ok(())
    }

    fn draw_destinations(&mut self, io: &mut dyn Frontend) -> Result<(), GameError> {
        let offer = self
            .map
            .draw_top_destinations(self.config.destinations_offered);

        self.log(format!(
            "{} draws {} destination tickets.",
            self.current_name(),
            offer.len()
        ));

        self.choose_destinations(io, offer, self.config.destinations_kept)
    }

    /// Has the current player discard offered tickets one at a time, until they pass or only
    /// `min_kept` are left. Kept tickets join the player's; discarded ones go back under the pool.
    pub(super) fn choose_destinations(
        &mut self,
        io: &mut dyn Frontend,
        mut offer: Vec<DestinationCard>,
        min_kept: usize,
    ) -> Result<(), GameError> {
        let name = self.current_name();
        let min_kept = min_kept.min(offer.len());
        let mut discarded = Vec::new();

        while offer.len() > min_kept {
            let options = offer
                .iter()
                .map(|destination| destination.name.clone())
                .collect();

            let choice = self.request_choice(
                io,
                format!(
                    "{}, discard a destination ticket, or pass to keep the {} left.",
                    name,
                    offer.len()
                ),
                options,
                true,
            )?;

            match offer
                .iter()
                .position(|destination| destination.name == choice)
            {
                Some(index) => discarded.push(offer.remove(index)),
                None => break,
            }
        }

        self.log(format!(
            "{} keeps {} destination tickets.",
            name,
            offer.len()
        ));

        self.players[self.current_player].receive_destinations(offer);
        self.map.return_destinations(discarded);

        Ok(())
    }
}
