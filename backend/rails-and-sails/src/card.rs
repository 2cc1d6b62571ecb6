use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

const NUM_ANCHORED_LAND_CARDS: usize = 4;
const NUM_PLAIN_LAND_CARDS: usize = 7;
const NUM_SIMPLE_SEA_CARDS: usize = 4;
const NUM_DOUBLE_SEA_CARDS: usize = 6;
const NUM_WILDCARDS: usize = 14;

/// Colors of transport cards and routes.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Color {
    Black,
    Green,
    Purple,
    Red,
    White,
    Yellow,
    /// The neutral color.
    /// A grey route can be paid with any single color, and wildcards are grey.
    Grey,
}

impl Color {
    /// Whether the current color is the neutral one.
    ///
    /// # Examples:
    /// ```
    /// use rails_and_sails::card::Color;
    ///
    /// assert!(Color::Grey.is_grey());
    /// assert!(!Color::Purple.is_grey());
    /// ```
    #[inline]
    pub fn is_grey(&self) -> bool {
        *self == Color::Grey
    }

    /// The opposite of `is_grey`.
    #[inline]
    pub fn is_not_grey(&self) -> bool {
        !self.is_grey()
    }

    /// All the colors a card or a payment can actually have, i.e. every color but grey.
    pub fn colored() -> impl Iterator<Item = Color> {
        Color::iter().filter(Color::is_not_grey)
    }
}

/// The family of a transport card.
#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CardKind {
    Land,
    Sea,
    /// Matches land and sea payments of any color.
    /// Wildcards are shuffled in the land deck, and discarded there.
    Wildcard,
}

/// A single transport card.
///
/// Cards are immutable. The `id` makes every card distinguishable, which is how a player
/// designates a card when paying.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct TransportCard {
    pub id: u16,
    pub kind: CardKind,
    pub color: Color,
    /// Only sea cards can be double. A double card is worth two units when capturing a sea route.
    pub is_double: bool,
    pub has_anchor: bool,
}

impl TransportCard {
    pub fn land(id: u16, color: Color, has_anchor: bool) -> Self {
        Self {
            id,
            kind: CardKind::Land,
            color,
            is_double: false,
            has_anchor,
        }
    }

    /// Simple sea cards all bear an anchor, double ones never do.
    pub fn sea(id: u16, color: Color, is_double: bool) -> Self {
        Self {
            id,
            kind: CardKind::Sea,
            color,
            is_double,
            has_anchor: !is_double,
        }
    }

    pub fn wildcard(id: u16) -> Self {
        Self {
            id,
            kind: CardKind::Wildcard,
            color: Color::Grey,
            is_double: false,
            has_anchor: true,
        }
    }

    /// The label under which a card is offered to players.
    ///
    /// # Examples:
    /// ```
    /// use rails_and_sails::card::{Color, TransportCard};
    ///
    /// assert_eq!(TransportCard::land(12, Color::Red, false).name(), "C12");
    /// ```
    #[inline]
    pub fn name(&self) -> String {
        format!("C{}", self.id)
    }

    #[inline]
    pub fn is_wildcard(&self) -> bool {
        self.kind == CardKind::Wildcard
    }

    /// How many capture units the card is worth.
    #[inline]
    pub fn units(&self) -> u8 {
        if self.is_double {
            2
        } else {
            1
        }
    }

    /// Whether the card is of the given family and color.
    #[inline]
    pub fn matches(&self, kind: CardKind, color: Color) -> bool {
        self.kind == kind && self.color == color
    }

    /// Ordering used when showing a hand: by family, then color, then simple before double.
    pub(crate) fn display_key(&self) -> (CardKind, Color, bool, u16) {
        (self.kind, self.color, self.is_double, self.id)
    }
}

/// Encapsulates information about a destination ticket.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct DestinationCard {
    /// Unique label, under which the ticket is offered to players.
    pub name: String,
    /// Cities that must all be connected by the player's routes.
    /// Most tickets name two cities, itineraries name more.
    pub cities: Vec<String>,
    /// How many points are granted at the end of the game if the ticket is complete.
    pub points: u8,
}

impl DestinationCard {
    pub fn new(name: &str, cities: &[&str], points: u8) -> Self {
        Self {
            name: name.to_owned(),
            cities: cities.iter().map(|city| (*city).to_owned()).collect(),
            points,
        }
    }
}

/// Builds the standard land and sea decks, in that order, unshuffled.
///
/// Ids are sequential across both decks, starting at 1.
///
/// # Example
/// ```
/// use rails_and_sails::card::standard_decks;
///
/// let (land_cards, sea_cards) = standard_decks();
/// assert_eq!(land_cards.len(), 80);
/// assert_eq!(sea_cards.len(), 60);
/// ```
pub fn standard_decks() -> (Vec<TransportCard>, Vec<TransportCard>) {
    let mut next_id = 0u16;
    let mut new_id = || {
        next_id += 1;
        next_id
    };

    let mut land_cards = Vec::with_capacity(80);
    let mut sea_cards = Vec::with_capacity(60);

    for color in Color::colored() {
        for _ in 0..NUM_ANCHORED_LAND_CARDS {
            land_cards.push(TransportCard::land(new_id(), color, true));
        }
        for _ in 0..NUM_PLAIN_LAND_CARDS {
            land_cards.push(TransportCard::land(new_id(), color, false));
        }
    }
    for _ in 0..NUM_WILDCARDS {
        land_cards.push(TransportCard::wildcard(new_id()));
    }

    for color in Color::colored() {
        for _ in 0..NUM_SIMPLE_SEA_CARDS {
            sea_cards.push(TransportCard::sea(new_id(), color, false));
        }
        for _ in 0..NUM_DOUBLE_SEA_CARDS {
            sea_cards.push(TransportCard::sea(new_id(), color, true));
        }
    }

    (land_cards, sea_cards)
}

/// Public information about a card pile, part of [`crate::manager::GameState`].
#[derive(Debug, PartialEq, Serialize)]
pub struct PileState<'a> {
    pub draw_pile_size: usize,
    pub discard_pile: &'a [TransportCard],
}

/// Draw pile and discard pile of one card family.
///
/// The top of the draw pile is its front. Cards never leave the game: whatever is drawn comes back
/// through [`CardPile::discard`], so the total number of cards of a family is constant as long as
/// the cards held by players and the visible row are accounted for.
#[derive(Debug)]
pub struct CardPile {
    draw_pile: VecDeque<TransportCard>,
    discard_pile: Vec<TransportCard>,
}

impl CardPile {
    /// Creates a pile whose draw pile holds the given cards, shuffled.
    pub fn new<R: Rng + ?Sized>(mut cards: Vec<TransportCard>, rng: &mut R) -> Self {
        cards.shuffle(rng);
        Self::unshuffled(cards)
    }

    /// Creates a pile whose draw pile holds the given cards in order: the first card is drawn first.
    pub fn unshuffled(cards: Vec<TransportCard>) -> Self {
        Self {
            draw_pile: VecDeque::from(cards),
            discard_pile: Vec::new(),
        }
    }

    /// Draws the top card.
    ///
    /// If the draw pile is empty, the discard pile is shuffled and becomes the draw pile first.
    /// Returns `None` if both are empty.
    ///
    /// # Example
    /// ```
    /// use rand::rngs::SmallRng;
    /// use rand::SeedableRng;
    /// use rails_and_sails::card::{CardPile, Color, TransportCard};
    ///
    /// let mut rng = SmallRng::seed_from_u64(0);
    /// let mut pile = CardPile::unshuffled(vec![]);
    /// assert!(pile.draw(&mut rng).is_none());
    ///
    /// pile.discard(TransportCard::land(1, Color::Red, false));
    /// assert_eq!(pile.draw(&mut rng).map(|card| card.id), Some(1));
    /// assert!(pile.is_exhausted());
    /// ```
    pub fn draw<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<TransportCard> {
        if self.draw_pile.is_empty() {
            self.reshuffle_discard_pile(rng);
        }

        self.draw_pile.pop_front()
    }

    /// Adds a card to the discard pile. Order inside the discard pile does not matter.
    #[inline]
    pub fn discard(&mut self, card: TransportCard) {
        self.discard_pile.push(card);
    }

    /// Whether no card can be drawn anymore, i.e. both piles are empty.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.draw_pile.is_empty() && self.discard_pile.is_empty()
    }

    #[inline]
    pub fn draw_pile_len(&self) -> usize {
        self.draw_pile.len()
    }

    #[inline]
    pub fn discard_pile(&self) -> &[TransportCard] {
        &self.discard_pile
    }

    /// Cards that can still be drawn, across both piles.
    #[inline]
    pub fn len(&self) -> usize {
        self.draw_pile.len() + self.discard_pile.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.is_exhausted()
    }

    /// Iterates through all the cards that can still be drawn, in no particular order.
    pub fn cards(&self) -> impl Iterator<Item = &TransportCard> {
        self.draw_pile.iter().chain(self.discard_pile.iter())
    }

    /// Mutable accessor to the draw pile.
    ///
    /// Should only be used for testing!
    pub fn get_mut_draw_pile(&mut self) -> &mut VecDeque<TransportCard> {
        &mut self.draw_pile
    }

    pub fn get_state(&self) -> PileState {
        PileState {
            draw_pile_size: self.draw_pile.len(),
            discard_pile: &self.discard_pile,
        }
    }

    fn reshuffle_discard_pile<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.discard_pile.is_empty() {
            return;
        }

        self.discard_pile.shuffle(rng);
        self.draw_pile.extend(self.discard_pile.drain(..));
    }
}
