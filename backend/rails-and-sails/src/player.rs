use crate::card::{CardKind, Color, DestinationCard, TransportCard};
use crate::city::City;
use crate::error::GameError;
use crate::map::{Map, Route, RouteKind};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use strum_macros::{Display, EnumIter};

/// Bonus granted at the end of the game, indexed by the number of captured routes.
/// Capturing more routes than the table covers grants nothing.
const ROUTE_COUNT_BONUS: [i32; 9] = [0, 1, 2, 4, 7, 10, 15, 18, 21];

/// Colors a payment can be made with.
pub type ColorSet = SmallVec<[Color; 6]>;

/// Every player has their own color.
#[derive(Clone, Copy, Debug, Deserialize, Display, EnumIter, Eq, Hash, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PlayerColor {
    Yellow,
    Red,
    Blue,
    Green,
    Pink,
}

/// The two kinds of pieces a player occupies routes with.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Piece {
    /// Occupies land routes.
    Wagon,
    /// Occupies sea routes.
    Boat,
}

impl Piece {
    /// The option under which exchanging pieces into this kind is offered.
    pub fn exchange_label(&self) -> &'static str {
        match self {
            Piece::Wagon => "WAGON PIECES",
            Piece::Boat => "BOAT PIECES",
        }
    }
}

/// Progress of an ongoing route payment, where cards are handed over one at a time.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RoutePayment {
    pub kind: RouteKind,
    /// Capture units still owed.
    pub remaining: u8,
    /// The color every non-wildcard must have.
    /// `None` on a neutral route, until the first colored card is handed over.
    pub color: Option<Color>,
}

impl RoutePayment {
    pub fn for_route(route: &Route) -> Self {
        Self {
            kind: route.kind,
            remaining: route.length,
            color: route.color.is_not_grey().then(|| route.color),
        }
    }

    #[inline]
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }
}

#[inline]
fn card_kind_for(route_kind: RouteKind) -> CardKind {
    match route_kind {
        RouteKind::Land => CardKind::Land,
        RouteKind::Sea => CardKind::Sea,
    }
}

/// All the information about a player's current state, returned by [`Player::get_player_state`].
#[derive(Debug, PartialEq, Serialize)]
pub struct PlayerState<'a> {
    pub name: &'a str,
    pub color: PlayerColor,
    pub score: i32,
    pub hand: &'a [TransportCard],
    pub wagons: u8,
    pub wagons_in_reserve: u8,
    pub boats: u8,
    pub boats_in_reserve: u8,
    pub routes: &'a [Route],
    pub ports: &'a [City],
    /// Destination tickets whose cities are already connected by the player's routes.
    pub complete_destinations: Vec<&'a DestinationCard>,
    pub incomplete_destinations: Vec<&'a DestinationCard>,
}

/// Encapsulates all the player information and actions.
///
/// A [`Player`] only knows about its own state. Shared state (free routes and ports, card piles)
/// is handled by the [`crate::manager::Manager`], which checks legality through the predicates
/// exposed here before mutating anything.
#[derive(Debug)]
pub struct Player {
    name: String,
    color: PlayerColor,
    /// Kept sorted by family, then color.
    hand: Vec<TransportCard>,
    routes: Vec<Route>,
    ports: Vec<City>,
    destinations: Vec<DestinationCard>,
    wagons: u8,
    wagons_in_reserve: u8,
    boats: u8,
    boats_in_reserve: u8,
    /// Piece exchanges cost points, so a score can go negative.
    score: i32,
}

impl Player {
    /// Creates a new player, whose pieces are all in reserve.
    pub fn new(name: String, color: PlayerColor, wagon_pool: u8, boat_pool: u8) -> Self {
        Self {
            name,
            color,
            hand: Vec::new(),
            routes: Vec::new(),
            ports: Vec::new(),
            destinations: Vec::new(),
            wagons: 0,
            wagons_in_reserve: wagon_pool,
            boats: 0,
            boats_in_reserve: boat_pool,
            score: 0,
        }
    }

    /// Puts the starting pieces in play, taking them from the reserve.
    pub fn take_pieces_in_play(&mut self, wagons: u8, boats: u8) {
        let wagons = wagons.min(self.wagons_in_reserve);
        let boats = boats.min(self.boats_in_reserve);

        self.wagons += wagons;
        self.wagons_in_reserve -= wagons;
        self.boats += boats;
        self.boats_in_reserve -= boats;
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn color(&self) -> PlayerColor {
        self.color
    }

    /// Change the player's color.
    /// This should be unique across players of the game.
    #[inline]
    pub fn change_color(&mut self, color: PlayerColor) {
        self.color = color;
    }

    #[inline]
    pub fn hand(&self) -> &[TransportCard] {
        &self.hand
    }

    #[inline]
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    #[inline]
    pub fn ports(&self) -> &[City] {
        &self.ports
    }

    #[inline]
    pub fn destinations(&self) -> &[DestinationCard] {
        &self.destinations
    }

    #[inline]
    pub fn wagons(&self) -> u8 {
        self.wagons
    }

    #[inline]
    pub fn wagons_in_reserve(&self) -> u8 {
        self.wagons_in_reserve
    }

    #[inline]
    pub fn boats(&self) -> u8 {
        self.boats
    }

    #[inline]
    pub fn boats_in_reserve(&self) -> u8 {
        self.boats_in_reserve
    }

    /// Wagons and boats in play.
    #[inline]
    pub fn pieces_in_play(&self) -> u16 {
        u16::from(self.wagons) + u16::from(self.boats)
    }

    #[inline]
    pub fn score(&self) -> i32 {
        self.score
    }

    /// Mutable accessor to the player's hand.
    ///
    /// Should only be used for testing!
    pub fn get_mut_hand(&mut self) -> &mut Vec<TransportCard> {
        &mut self.hand
    }

    pub fn receive_card(&mut self, card: TransportCard) {
        self.hand.push(card);
        self.hand.sort_by_key(TransportCard::display_key);
    }

    pub fn receive_destinations(&mut self, destinations: impl IntoIterator<Item = DestinationCard>) {
        self.destinations.extend(destinations);
    }

    /// Takes a card out of the hand.
    pub fn remove_card(&mut self, card_id: u16) -> Result<TransportCard, GameError> {
        match self.hand.iter().position(|card| card.id == card_id) {
            Some(index) => Ok(self.hand.remove(index)),
            None => Err(GameError::CardNotInHand(format!("C{}", card_id))),
        }
    }

    #[inline]
    pub fn num_wildcards(&self) -> usize {
        self.hand.iter().filter(|card| card.is_wildcard()).count()
    }

    /// Capture units held for the given kind of route, in the given color. Wildcards excluded.
    ///
    /// # Example
    /// ```
    /// use rails_and_sails::card::{Color, TransportCard};
    /// use rails_and_sails::map::RouteKind;
    /// use rails_and_sails::player::{Player, PlayerColor};
    ///
    /// let mut player = Player::new(String::from("Ada"), PlayerColor::Red, 25, 50);
    /// player.receive_card(TransportCard::sea(1, Color::Green, true));
    /// player.receive_card(TransportCard::sea(2, Color::Green, false));
    /// player.receive_card(TransportCard::land(3, Color::Green, false));
    ///
    /// assert_eq!(player.units(RouteKind::Sea, Color::Green), 3);
    /// assert_eq!(player.units(RouteKind::Land, Color::Green), 1);
    /// ```
    pub fn units(&self, kind: RouteKind, color: Color) -> usize {
        let card_kind = card_kind_for(kind);

        self.hand
            .iter()
            .filter(|card| card.matches(card_kind, color))
            .map(|card| usize::from(card.units()))
            .sum()
    }

    #[inline]
    fn pieces_for(&self, kind: RouteKind) -> u8 {
        match kind {
            RouteKind::Land => self.wagons,
            RouteKind::Sea => self.boats,
        }
    }

    /// Colors the player could pay the route with, ignoring pieces.
    ///
    /// A colored route yields at most its own color. A neutral route yields every color whose
    /// units, wildcards included, cover the route's length.
    pub fn capture_colors(&self, route: &Route) -> ColorSet {
        let num_wildcards = self.num_wildcards();
        let length = usize::from(route.length);

        Color::colored()
            .filter(|color| route.color.is_grey() || route.color == *color)
            .filter(|color| self.units(route.kind, *color) + num_wildcards >= length)
            .collect()
    }

    /// Predicate that assesses whether the player can capture a land route: enough land cards of a
    /// matching color (wildcards included), and enough wagons in play.
    pub fn can_capture_land_route(&self, route: &Route) -> bool {
        route.kind == RouteKind::Land
            && self.wagons >= route.length
            && !self.capture_colors(route).is_empty()
    }

    /// Predicate that assesses whether the player can capture a sea route: enough sea units of a
    /// matching color (double cards count twice, wildcards included), and enough boats in play.
    pub fn can_capture_sea_route(&self, route: &Route) -> bool {
        route.kind == RouteKind::Sea
            && self.boats >= route.length
            && !self.capture_colors(route).is_empty()
    }

    pub fn can_capture_route(&self, route: &Route) -> bool {
        match route.kind {
            RouteKind::Land => self.can_capture_land_route(route),
            RouteKind::Sea => self.can_capture_sea_route(route),
        }
    }

    /// A double card paying for a single unit strands a unit, which is only allowed when no simple
    /// card of the same color could pay for it instead.
    fn strands_unit(&self, card: &TransportCard, payment: &RoutePayment) -> bool {
        card.is_double
            && payment.remaining == 1
            && self
                .hand
                .iter()
                .any(|other| other.kind == card.kind && other.color == card.color && !other.is_double)
    }

    /// Cards of the hand that can be handed over next for the given payment.
    ///
    /// As long as the payment started from a route the player can capture, this is never empty
    /// until the payment is complete.
    pub fn acceptable_cards(&self, payment: &RoutePayment) -> Vec<TransportCard> {
        if payment.is_complete() {
            return Vec::new();
        }

        let card_kind = card_kind_for(payment.kind);
        let num_wildcards = self.num_wildcards();
        let remaining = usize::from(payment.remaining);

        self.hand
            .iter()
            .filter(|card| {
                if card.is_wildcard() {
                    return true;
                }

                if card.kind != card_kind {
                    return false;
                }

                let color_fits = match payment.color {
                    Some(color) => card.color == color,
                    // The first colored card fixes the color, which must then be able to finish the job.
                    None => self.units(payment.kind, card.color) + num_wildcards >= remaining,
                };

                color_fits && !self.strands_unit(card, payment)
            })
            .copied()
            .collect()
    }

    /// Hands a card over for the given payment, and returns it so that it can be discarded.
    ///
    /// The card is expected to be one of [`Player::acceptable_cards`].
    pub fn pay_with(
        &mut self,
        card_id: u16,
        payment: &mut RoutePayment,
    ) -> Result<TransportCard, GameError> {
        let card = self.remove_card(card_id)?;

        payment.remaining = payment.remaining.saturating_sub(card.units());
        if !card.is_wildcard() {
            payment.color = Some(card.color);
        }

        Ok(card)
    }

    /// Bookkeeping once a route is paid for: pieces go on the route, and its points are granted.
    pub fn capture_route(&mut self, route: Route) {
        match route.kind {
            RouteKind::Land => self.wagons = self.wagons.saturating_sub(route.length),
            RouteKind::Sea => self.boats = self.boats.saturating_sub(route.length),
        }

        self.score += i32::from(route.points);
        self.routes.push(route);
    }

    /// Whether one of the player's routes ends in the given city.
    pub fn owns_route_to(&self, city: &str) -> bool {
        self.routes.iter().any(|route| route.touches(city))
    }

    #[inline]
    fn is_port_card(card: &TransportCard, color: Color, requires_anchor: bool) -> bool {
        !card.is_wildcard() && card.color == color && (card.has_anchor || !requires_anchor)
    }

    /// Colors the player could build a port in the given city with.
    ///
    /// Empty if the city is not a port, if no route of the player reaches it, or if no color has
    /// `cost` cards (wildcards included).
    pub fn port_colors(&self, city: &City, cost: usize, requires_anchor: bool) -> ColorSet {
        if !city.is_port || !self.owns_route_to(&city.name) {
            return ColorSet::new();
        }

        let num_wildcards = self.num_wildcards();

        Color::colored()
            .filter(|color| {
                let num_cards = self
                    .hand
                    .iter()
                    .filter(|card| Self::is_port_card(card, *color, requires_anchor))
                    .count();

                num_cards + num_wildcards >= cost
            })
            .collect()
    }

    pub fn can_build_port(&self, city: &City, cost: usize, requires_anchor: bool) -> bool {
        !self.port_colors(city, cost, requires_anchor).is_empty()
    }

    /// Takes the cards paying for a port out of the hand, and returns them so that they can be discarded.
    ///
    /// Exactly `cost` cards are taken. Colored cards come first, balanced between land and sea so
    /// that one family does not pay for more than half while the other still has cards. Simple sea
    /// cards go before double ones. Wildcards only cover the shortfall.
    pub fn pay_for_port(
        &mut self,
        color: Color,
        cost: usize,
        requires_anchor: bool,
    ) -> Result<Vec<TransportCard>, GameError> {
        let port_cards = |kind: CardKind| -> Vec<&TransportCard> {
            self.hand
                .iter()
                .filter(|card| card.kind == kind && Self::is_port_card(card, color, requires_anchor))
                .collect()
        };

        let land_cards = port_cards(CardKind::Land);
        let mut sea_cards = port_cards(CardKind::Sea);
        sea_cards.sort_by_key(|card| card.is_double);
        let wildcards: Vec<&TransportCard> =
            self.hand.iter().filter(|card| card.is_wildcard()).collect();

        let num_colored = cost.min(land_cards.len() + sea_cards.len());
        let num_land = land_cards
            .len()
            .min(num_colored - sea_cards.len().min(num_colored / 2));
        let num_sea = num_colored - num_land;
        let num_wildcards = cost - num_colored;

        if num_wildcards > wildcards.len() {
            return Err(GameError::CardNotInHand(format!(
                "{} {} cards or wildcards",
                cost, color
            )));
        }

        let card_ids: Vec<u16> = land_cards[..num_land]
            .iter()
            .chain(&sea_cards[..num_sea])
            .chain(&wildcards[..num_wildcards])
            .map(|card| card.id)
            .collect();

        card_ids
            .into_iter()
            .map(|card_id| self.remove_card(card_id))
            .collect()
    }

    pub fn build_port(&mut self, city: City) {
        self.ports.push(city);
    }

    /// How many pieces of the given kind can be exchanged at most: as many as are left in its
    /// reserve, and as many as the other kind has in play.
    pub fn max_exchange(&self, piece: Piece) -> u8 {
        match piece {
            Piece::Wagon => self.wagons_in_reserve.min(self.boats),
            Piece::Boat => self.boats_in_reserve.min(self.wagons),
        }
    }

    /// Brings `num_pieces` pieces of the given kind into play from the reserve, and sends as many
    /// pieces of the other kind from play back to the reserve. Costs one point per piece.
    ///
    /// Returns an `Err` if no piece, or more than [`Player::max_exchange`], is requested.
    ///
    /// # Example
    /// ```
    /// use rails_and_sails::player::{Piece, Player, PlayerColor};
    ///
    /// let mut player = Player::new(String::from("Ada"), PlayerColor::Red, 25, 50);
    /// player.take_pieces_in_play(20, 40);
    ///
    /// player.exchange_pieces(Piece::Boat, 5).unwrap();
    /// assert_eq!((player.wagons(), player.boats()), (15, 45));
    /// assert_eq!(player.score(), -5);
    /// ```
    pub fn exchange_pieces(&mut self, piece: Piece, num_pieces: u8) -> Result<(), GameError> {
        let max = self.max_exchange(piece);
        if num_pieces == 0 || num_pieces > max {
            return Err(GameError::InvalidExchange {
                requested: num_pieces,
                max,
            });
        }

        match piece {
            Piece::Wagon => {
                self.wagons += num_pieces;
                self.wagons_in_reserve -= num_pieces;
                self.boats -= num_pieces;
                self.boats_in_reserve += num_pieces;
            }
            Piece::Boat => {
                self.boats += num_pieces;
                self.boats_in_reserve -= num_pieces;
                self.wagons -= num_pieces;
                self.wagons_in_reserve += num_pieces;
            }
        }

        self.score -= i32::from(num_pieces);
        Ok(())
    }

    /// Whether the player's routes connect all the cities of the ticket.
    pub fn is_destination_complete(&self, destination: &DestinationCard) -> bool {
        Map::connects(&self.routes, &destination.cities)
    }

    /// The end-of-game bonus for a number of captured routes.
    ///
    /// # Example
    /// ```
    /// use rails_and_sails::player::Player;
    ///
    /// assert_eq!(Player::route_count_bonus(3), 4);
    /// assert_eq!(Player::route_count_bonus(9), 0);
    /// ```
    pub fn route_count_bonus(num_routes: usize) -> i32 {
        ROUTE_COUNT_BONUS.get(num_routes).copied().unwrap_or(0)
    }

    /// Adds the end-of-game points to the score: the route count bonus, and the points of every
    /// complete destination ticket. Incomplete tickets cost nothing.
    ///
    /// Returns the points added.
    pub fn settle_final_score(&mut self) -> i32 {
        let destination_points: i32 = self
            .destinations
            .iter()
            .filter(|destination| self.is_destination_complete(destination))
            .map(|destination| i32::from(destination.points))
            .sum();

        let points = Self::route_count_bonus(self.routes.len()) + destination_points;
        self.score += points;
        points
    }

    /// Retrieve the player's state, destination tickets split by completeness.
    pub fn get_player_state(&self) -> PlayerState {
        let (complete_destinations, incomplete_destinations): (Vec<_>, Vec<_>) = self
            .destinations
            .iter()
            .partition(|destination| self.is_destination_complete(destination));

        PlayerState {
            name: &self.name,
            color: self.color,
            score: self.score,
            hand: &self.hand,
            wagons: self.wagons,
            wagons_in_reserve: self.wagons_in_reserve,
            boats: self.boats,
            boats_in_reserve: self.boats_in_reserve,
            routes: &self.routes,
            ports: &self.ports,
            complete_destinations,
            incomplete_destinations,
        }
    }
}
