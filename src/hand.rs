use crate::cards::{parse_cards, Card};
use std::collections::HashSet;
use std::str::FromStr;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandError {
    #[error("duplicate cards in hole cards")]
    DuplicateHoleCards,
    #[error("too many board cards: {0}")]
    TooManyBoardCards(usize),
    #[error("duplicate cards on board")]
    DuplicateBoardCards,
    #[error("hole cards overlap with board")]
    Overlap,
    #[error("expected exactly two hole cards, got {0}")]
    HoleCount(usize),
    #[error("card parse error: {0}")]
    CardParse(String),
}

/// A seat's two private cards.
///
/// ```
/// use holdem_table::cards::{Card, Rank, Suit};
/// use holdem_table::hand::HoleCards;
///
/// let hole = HoleCards::try_new(
///     Card::new(Rank::Ace, Suit::Spades),
///     Card::new(Rank::King, Suit::Spades),
/// ).unwrap();
/// assert_eq!(hole.to_string(), "A♠ K♠");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoleCards(Card, Card);

impl HoleCards {
    pub fn try_new(a: Card, b: Card) -> Result<Self, HandError> {
        if a == b {
            return Err(HandError::DuplicateHoleCards);
        }
        Ok(Self(a, b))
    }

    pub fn from_slice(slice: &[Card]) -> Result<Self, HandError> {
        match slice {
            [a, b] => Self::try_new(*a, *b),
            _ => Err(HandError::HoleCount(slice.len())),
        }
    }

    pub fn first(&self) -> Card {
        self.0
    }

    pub fn second(&self) -> Card {
        self.1
    }

    pub fn as_array(&self) -> [Card; 2] {
        [self.0, self.1]
    }

    pub fn contains(&self, card: Card) -> bool {
        self.0 == card || self.1 == card
    }
}

impl std::fmt::Display for HoleCards {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0, self.1)
    }
}

impl FromStr for HoleCards {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        Self::from_slice(&cards)
    }
}

/// Community cards: empty preflop, then 3, 4 and 5 cards.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Board {
    cards: Vec<Card>,
}

impl Board {
    pub const MAX: usize = 5;

    pub fn new() -> Self {
        Self { cards: Vec::with_capacity(Self::MAX) }
    }

    pub fn try_new(cards: Vec<Card>) -> Result<Self, HandError> {
        let mut board = Self::new();
        board.deal(cards)?;
        Ok(board)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.cards.len() == Self::MAX
    }

    pub fn as_slice(&self) -> &[Card] {
        &self.cards
    }

    /// Add cards to the board, rejecting overflow and repeated cards.
    pub fn deal<I>(&mut self, cards: I) -> Result<(), HandError>
    where
        I: IntoIterator<Item = Card>,
    {
        let incoming: Vec<Card> = cards.into_iter().collect();
        let total = self.cards.len() + incoming.len();
        if total > Self::MAX {
            return Err(HandError::TooManyBoardCards(total));
        }
        let mut seen: HashSet<Card> = self.cards.iter().copied().collect();
        if !incoming.iter().all(|c| seen.insert(*c)) {
            return Err(HandError::DuplicateBoardCards);
        }
        self.cards.extend(incoming);
        Ok(())
    }

    pub(crate) fn clear(&mut self) {
        self.cards.clear();
    }

    /// The seven cards a seat plays at showdown, or `None` before the river.
    pub fn seven_with(&self, hole: &HoleCards) -> Option<[Card; 7]> {
        match self.cards.as_slice() {
            [a, b, c, d, e] => Some([hole.first(), hole.second(), *a, *b, *c, *d, *e]),
            _ => None,
        }
    }
}

impl FromStr for Board {
    type Err = HandError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cards = parse_cards(s).map_err(|e| HandError::CardParse(e.to_string()))?;
        Board::try_new(cards)
    }
}

/// Check that hole cards and board can coexist in one hand: at most five distinct
/// board cards and no card shared between the two.
pub fn validate_holdem(hole: &HoleCards, board: &Board) -> Result<(), HandError> {
    if board.len() > Board::MAX {
        return Err(HandError::TooManyBoardCards(board.len()));
    }
    if board.as_slice().iter().any(|c| hole.contains(*c)) {
        return Err(HandError::Overlap);
    }
    if hole.first() == hole.second() {
        return Err(HandError::DuplicateHoleCards);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{Card, Rank, Suit};

    #[test]
    fn hole_cards_must_be_distinct() {
        let a = Card::new(Rank::Ace, Suit::Spades);
        assert!(matches!(HoleCards::try_new(a, a), Err(HandError::DuplicateHoleCards)));
        assert!(matches!(HoleCards::from_slice(&[a]), Err(HandError::HoleCount(1))));
    }

    #[test]
    fn board_deal_checks_limits_and_dupes() {
        let mut board = Board::new();
        board
            .deal([
                Card::new(Rank::Two, Suit::Clubs),
                Card::new(Rank::Three, Suit::Clubs),
                Card::new(Rank::Four, Suit::Clubs),
            ])
            .unwrap();
        assert_eq!(board.len(), 3);

        let dup = board.deal([Card::new(Rank::Two, Suit::Clubs)]);
        assert!(matches!(dup, Err(HandError::DuplicateBoardCards)));
        assert_eq!(board.len(), 3, "rejected deal leaves board untouched");

        let over = board.deal([
            Card::new(Rank::Five, Suit::Clubs),
            Card::new(Rank::Six, Suit::Clubs),
            Card::new(Rank::Seven, Suit::Clubs),
        ]);
        assert!(matches!(over, Err(HandError::TooManyBoardCards(6))));
    }

    #[test]
    fn seven_with_requires_full_board() {
        let hole: HoleCards = "As Kd".parse().unwrap();
        let flop: Board = "2c 3c 4c".parse().unwrap();
        assert!(flop.seven_with(&hole).is_none());
        let river: Board = "2c 3c 4c 5h 9d".parse().unwrap();
        let seven = river.seven_with(&hole).unwrap();
        assert_eq!(seven[0], Card::new(Rank::Ace, Suit::Spades));
        assert_eq!(seven[6], Card::new(Rank::Nine, Suit::Diamonds));
    }

    #[test]
    fn validate_holdem_catches_overlap() {
        let hole: HoleCards = "As Ks".parse().unwrap();
        let board: Board = "As 2c 3c".parse().unwrap();
        assert!(matches!(validate_holdem(&hole, &board), Err(HandError::Overlap)));
    }
}
