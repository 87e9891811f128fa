use crate::cards::{Card, Rank, Suit};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum DeckError {
    /// A draw was requested after all 52 cards were dealt. A hand never needs more
    /// than 25 cards, so reaching this is a dealing bug, not a table condition.
    #[error("deck is empty")]
    Empty,
}

/// A standard 52-card deck, consumed from the top.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    /// All 52 cards in a fixed order: suits in [`Suit::ALL`] order, ranks ascending.
    ///
    /// ```
    /// use holdem_table::deck::Deck;
    ///
    /// let deck = Deck::build();
    /// assert_eq!(deck.len(), 52);
    /// ```
    pub fn build() -> Self {
        let mut cards = Vec::with_capacity(52);
        for s in Suit::ALL {
            for r in Rank::ALL {
                cards.push(Card::new(r, s));
            }
        }
        Self { cards }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Remaining cards, bottom first; the next draw is the last element.
    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    /// Shuffle using a seeded RNG for reproducibility.
    pub fn shuffle_seeded(&mut self, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.shuffle_with(&mut rng);
    }

    /// Uniform Fisher-Yates shuffle driven by `rng`.
    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    /// Remove and return the top card.
    pub fn draw(&mut self) -> Result<Card, DeckError> {
        self.cards.pop().ok_or(DeckError::Empty)
    }

    /// Draw `n` cards; fails without drawing anything if fewer than `n` remain.
    pub fn draw_n(&mut self, n: usize) -> Result<Vec<Card>, DeckError> {
        if n > self.cards.len() {
            return Err(DeckError::Empty);
        }
        (0..n).map(|_| self.draw()).collect()
    }
}
