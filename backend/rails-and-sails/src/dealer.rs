use crate::card::{CardKind, CardPile, PileState, TransportCard};

use rand::Rng;
use serde::Serialize;
use strum_macros::{Display, EnumString};

/// The two decks cards can be drawn from.
///
/// # JSON
/// Decks are serialized (and offered to players) under their option label.
#[derive(Clone, Copy, Debug, Display, EnumString, Eq, Hash, PartialEq, Serialize)]
pub enum Deck {
    #[serde(rename = "WAGON")]
    #[strum(serialize = "WAGON")]
    Land,
    #[serde(rename = "BOAT")]
    #[strum(serialize = "BOAT")]
    Sea,
}

impl Deck {
    #[inline]
    pub fn other(&self) -> Deck {
        match self {
            Deck::Land => Deck::Sea,
            Deck::Sea => Deck::Land,
        }
    }
}

/// Public information about the card dealer, part of [`crate::manager::GameState`].
#[derive(Debug, PartialEq, Serialize)]
pub struct CardDealerState<'a> {
    pub land_pile: PileState<'a>,
    pub sea_pile: PileState<'a>,
    pub visible_cards: &'a [TransportCard],
}

/// Entity in charge of both card piles and of the visible row of face-up cards.
#[derive(Debug)]
pub struct CardDealer {
    land_pile: CardPile,
    sea_pile: CardPile,
    visible_cards: Vec<TransportCard>,
    num_visible_cards: usize,
    wildcard_limit: usize,
}

impl CardDealer {
    /// Creates a dealer whose piles hold the given cards, shuffled.
    /// The visible row starts empty, see [`CardDealer::reveal_visible_cards`].
    pub fn new<R: Rng + ?Sized>(
        land_cards: Vec<TransportCard>,
        sea_cards: Vec<TransportCard>,
        num_visible_cards: usize,
        wildcard_limit: usize,
        rng: &mut R,
    ) -> Self {
        Self::from_piles(
            CardPile::new(land_cards, rng),
            CardPile::new(sea_cards, rng),
            num_visible_cards,
            wildcard_limit,
        )
    }

    pub fn from_piles(
        land_pile: CardPile,
        sea_pile: CardPile,
        num_visible_cards: usize,
        wildcard_limit: usize,
    ) -> Self {
        Self {
            land_pile,
            sea_pile,
            visible_cards: Vec::with_capacity(num_visible_cards),
            num_visible_cards,
            wildcard_limit,
        }
    }

    #[inline]
    fn pile(&self, deck: Deck) -> &CardPile {
        match deck {
            Deck::Land => &self.land_pile,
            Deck::Sea => &self.sea_pile,
        }
    }

    #[inline]
    fn pile_mut(&mut self, deck: Deck) -> &mut CardPile {
        match deck {
            Deck::Land => &mut self.land_pile,
            Deck::Sea => &mut self.sea_pile,
        }
    }

    #[inline]
    pub fn is_exhausted(&self, deck: Deck) -> bool {
        self.pile(deck).is_exhausted()
    }

    /// Draws the top card of the given deck.
    pub fn draw<R: Rng + ?Sized>(&mut self, deck: Deck, rng: &mut R) -> Option<TransportCard> {
        self.pile_mut(deck).draw(rng)
    }

    /// Draws a card from the given deck, or from the other one if the given deck is exhausted.
    fn draw_with_fallback<R: Rng + ?Sized>(
        &mut self,
        deck: Deck,
        rng: &mut R,
    ) -> Option<TransportCard> {
        self.draw(deck, rng).or_else(|| self.draw(deck.other(), rng))
    }

    /// Land cards and wildcards go to the land discard pile, sea cards to the sea discard pile.
    pub fn discard(&mut self, card: TransportCard) {
        match card.kind {
            CardKind::Sea => self.sea_pile.discard(card),
            CardKind::Land | CardKind::Wildcard => self.land_pile.discard(card),
        }
    }

    /// Draws a starting hand: `num_land_cards` land cards, then `num_sea_cards` sea cards.
    ///
    /// The hand is short if the piles run out.
    pub fn deal_hand<R: Rng + ?Sized>(
        &mut self,
        num_land_cards: usize,
        num_sea_cards: usize,
        rng: &mut R,
    ) -> Vec<TransportCard> {
        let mut hand = Vec::with_capacity(num_land_cards + num_sea_cards);
        hand.extend((0..num_land_cards).filter_map(|_| self.land_pile.draw(rng)));
        hand.extend((0..num_sea_cards).filter_map(|_| self.sea_pile.draw(rng)));
        hand
    }

    /// Fills the visible row up to its size, alternating land and sea cards, starting with land.
    ///
    /// When a deck is exhausted, the other one provides the card instead. When both are, the row
    /// stays short.
    pub fn reveal_visible_cards<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let mut deck = Deck::Land;

        while self.visible_cards.len() < self.num_visible_cards {
            match self.draw_with_fallback(deck, rng) {
                Some(card) => self.visible_cards.push(card),
                None => break,
            }

            deck = deck.other();
        }
    }

    fn should_reset_visible_cards(&self) -> bool {
        let num_visible_wildcards = self
            .visible_cards
            .iter()
            .filter(|card| card.is_wildcard())
            .count();

        if num_visible_wildcards < self.wildcard_limit {
            return false;
        }

        // Only reset if a row under the limit can be dealt out of the available cards.
        // Otherwise, we could end up resetting ad infinitum.
        let available_cards = self
            .visible_cards
            .iter()
            .chain(self.land_pile.cards())
            .chain(self.sea_pile.cards());

        let (num_available_cards, num_non_wildcards) =
            available_cards.fold((0, 0), |(num_cards, num_non_wildcards), card| {
                (num_cards + 1, num_non_wildcards + usize::from(!card.is_wildcard()))
            });

        let num_cards_in_new_row = num_available_cards.min(self.num_visible_cards);
        num_non_wildcards + self.wildcard_limit > num_cards_in_new_row
    }

    /// If the visible row holds too many wildcards, discards it entirely and deals a new one,
    /// until the row is under the wildcard limit (or cannot be).
    ///
    /// Returns whether the row was reset.
    pub fn maybe_reset_visible_cards<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        let mut was_reset = false;

        while self.should_reset_visible_cards() {
            let discarded: Vec<_> = self.visible_cards.drain(..).collect();
            for card in discarded {
                self.discard(card);
            }

            self.reveal_visible_cards(rng);
            was_reset = true;
        }

        was_reset
    }

    #[inline]
    pub fn visible_cards(&self) -> &[TransportCard] {
        &self.visible_cards
    }

    pub fn visible_card(&self, id: u16) -> Option<&TransportCard> {
        self.visible_cards.iter().find(|card| card.id == id)
    }

    /// Takes a card out of the visible row. The slot stays empty until [`CardDealer::replace_visible_card`].
    pub fn take_visible_card(&mut self, id: u16) -> Option<TransportCard> {
        let index = self.visible_cards.iter().position(|card| card.id == id)?;
        Some(self.visible_cards.remove(index))
    }

    /// Adds a card from the given deck to the visible row, falling back to the other deck.
    ///
    /// Returns the revealed card, or `None` if both decks are exhausted or the row is full.
    pub fn replace_visible_card<R: Rng + ?Sized>(
        &mut self,
        deck: Deck,
        rng: &mut R,
    ) -> Option<TransportCard> {
        if self.visible_cards.len() >= self.num_visible_cards {
            return None;
        }

        let card = self.draw_with_fallback(deck, rng)?;
        self.visible_cards.push(card);
        Some(card)
    }

    /// Accessor to the land pile.
    #[inline]
    pub fn land_pile(&self) -> &CardPile {
        &self.land_pile
    }

    /// Accessor to the sea pile.
    #[inline]
    pub fn sea_pile(&self) -> &CardPile {
        &self.sea_pile
    }

    /// Mutable accessor to the visible row.
    ///
    /// Should only be used for testing!
    pub fn get_mut_visible_cards(&mut self) -> &mut Vec<TransportCard> {
        &mut self.visible_cards
    }

    /// Mutable accessor to the land pile.
    ///
    /// Should only be used for testing!
    pub fn get_mut_land_pile(&mut self) -> &mut CardPile {
        &mut self.land_pile
    }

    /// Mutable accessor to the sea pile.
    ///
    /// Should only be used for testing!
    pub fn get_mut_sea_pile(&mut self) -> &mut CardPile {
        &mut self.sea_pile
    }

    pub fn get_state(&self) -> CardDealerState {
        CardDealerState {
            land_pile: self.land_pile.get_state(),
            sea_pile: self.sea_pile.get_state(),
            visible_cards: &self.visible_cards,
        }
    }
}
