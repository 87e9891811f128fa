use crate::cards::Card;
use crate::hand::{validate_holdem, Board, HandError, HoleCards};
use core::cmp::Ordering;
use std::fmt;

/// Poker hand category from weakest to strongest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
#[repr(u8)]
pub enum Category {
    HighCard = 0,
    Pair = 1,
    TwoPair = 2,
    ThreeOfAKind = 3,
    Straight = 4,
    Flush = 5,
    FullHouse = 6,
    FourOfAKind = 7,
    StraightFlush = 8,
}

impl Category {
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    pub const fn label(self) -> &'static str {
        match self {
            Category::HighCard => "High Card",
            Category::Pair => "One Pair",
            Category::TwoPair => "Two Pair",
            Category::ThreeOfAKind => "Three of a Kind",
            Category::Straight => "Straight",
            Category::Flush => "Flush",
            Category::FullHouse => "Full House",
            Category::FourOfAKind => "Four of a Kind",
            Category::StraightFlush => "Straight Flush",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Score of one five-card hand. Ordering is by category, then the tiebreaker values
/// compared lexicographically; `best_five` never takes part in comparisons.
///
/// Tiebreakers per category (numeric rank values, A=14):
/// straight and straight flush `[high]` (the wheel is `[5]`), quads `[quad, kicker]`,
/// full house `[trips, pair]`, trips `[trips, k1, k2]`, two pair `[high, low, kicker]`,
/// pair `[pair, k1, k2, k3]`, flush and high card all five values descending.
#[derive(Debug, Clone)]
pub struct HandScore {
    pub category: Category,
    tiebreakers: Vec<u8>,
    best_five: [Card; 5],
}

impl HandScore {
    pub fn tiebreakers(&self) -> &[u8] {
        &self.tiebreakers
    }

    /// The five cards that produced this score, highest rank first.
    pub fn best_five(&self) -> [Card; 5] {
        self.best_five
    }
}

/// Total order over scores: category first, then tiebreakers lexicographically.
pub fn compare(a: &HandScore, b: &HandScore) -> Ordering {
    a.category.cmp(&b.category).then_with(|| a.tiebreakers.cmp(&b.tiebreakers))
}

impl Ord for HandScore {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self, other)
    }
}

impl PartialOrd for HandScore {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for HandScore {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for HandScore {}

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum EvalError {
    #[error("invalid hand: {0}")]
    InvalidHand(#[from] HandError),
    #[error("not enough cards to evaluate")]
    NotEnoughCards,
}

/// Highest card of a straight among ascending, deduplicated rank values.
///
/// Every five-value window is scanned from the top; the wheel (A-2-3-4-5) is checked
/// last because the ace only chains above the king.
pub(crate) fn straight_high(unique_asc: &[u8]) -> Option<u8> {
    if let Some(w) = unique_asc.windows(5).rev().find(|w| w[4] - w[0] == 4) {
        return Some(w[4]);
    }
    let wheel = [14, 2, 3, 4, 5];
    if wheel.iter().all(|v| unique_asc.contains(v)) {
        return Some(5);
    }
    None
}

/// Score exactly five cards.
pub fn score_five(cards: &[Card; 5]) -> HandScore {
    let mut sorted = *cards;
    sorted.sort_by(|a, b| b.rank().cmp(&a.rank()).then(a.suit().cmp(&b.suit())));

    let mut rank_counts = [0u8; 15];
    let mut suit_counts = [0u8; 4];
    for c in &sorted {
        rank_counts[c.rank().value() as usize] += 1;
        suit_counts[c.suit().index()] += 1;
    }
    let is_flush = suit_counts.iter().any(|&n| n == 5);

    let unique_asc: Vec<u8> = (2u8..=14).filter(|&v| rank_counts[v as usize] > 0).collect();
    let straight = straight_high(&unique_asc);

    // (count, value) with the biggest group first, ties broken by value
    let mut groups: Vec<(u8, u8)> =
        unique_asc.iter().map(|&v| (rank_counts[v as usize], v)).collect();
    groups.sort_by(|a, b| b.cmp(a));
    let by_group: Vec<u8> = groups.iter().map(|&(_, v)| v).collect();

    let (category, tiebreakers) = match (straight, is_flush, groups[0].0) {
        (Some(high), true, _) => (Category::StraightFlush, vec![high]),
        (_, _, 4) => (Category::FourOfAKind, by_group),
        (_, _, 3) if groups.len() == 2 => (Category::FullHouse, by_group),
        (_, true, _) => (Category::Flush, by_group),
        (Some(high), false, _) => (Category::Straight, vec![high]),
        (_, _, 3) => (Category::ThreeOfAKind, by_group),
        (_, _, 2) if groups.len() == 3 => (Category::TwoPair, by_group),
        (_, _, 2) => (Category::Pair, by_group),
        _ => (Category::HighCard, by_group),
    };

    HandScore { category, tiebreakers, best_five: sorted }
}

/// Best score among all 21 five-card subsets of seven cards.
pub fn score_best(cards: &[Card; 7]) -> HandScore {
    let mut best = score_five(&[cards[0], cards[1], cards[2], cards[3], cards[4]]);
    for i in 0..3 {
        for j in (i + 1)..4 {
            for k in (j + 1)..5 {
                for l in (k + 1)..6 {
                    for m in (l + 1)..7 {
                        let score = score_five(&[cards[i], cards[j], cards[k], cards[l], cards[m]]);
                        if score > best {
                            best = score;
                        }
                    }
                }
            }
        }
    }
    best
}

/// Score a seat's hole cards against a complete board.
///
/// ```
/// use holdem_table::evaluator::{score_holdem, Category};
///
/// let hole = "A♠ A♥".parse().unwrap();
/// let board = "K♣ Q♦ J♥ 3♠ 2♣".parse().unwrap();
/// let score = score_holdem(&hole, &board).unwrap();
/// assert_eq!(score.category, Category::Pair);
/// ```
pub fn score_holdem(hole: &HoleCards, board: &Board) -> Result<HandScore, EvalError> {
    validate_holdem(hole, board)?;
    let seven = board.seven_with(hole).ok_or(EvalError::NotEnoughCards)?;
    Ok(score_best(&seven))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::parse_cards;

    fn five(s: &str) -> [Card; 5] {
        let v = parse_cards(s).expect("valid cards");
        [v[0], v[1], v[2], v[3], v[4]]
    }

    fn seven(s: &str) -> [Card; 7] {
        let v = parse_cards(s).expect("valid cards");
        [v[0], v[1], v[2], v[3], v[4], v[5], v[6]]
    }

    #[test]
    fn straight_high_scans_every_window() {
        assert_eq!(straight_high(&[2, 3, 4, 5, 6]), Some(6));
        assert_eq!(straight_high(&[2, 3, 4, 5, 6, 7, 9]), Some(7));
        assert_eq!(straight_high(&[2, 3, 4, 5, 14]), Some(5));
        assert_eq!(straight_high(&[2, 3, 4, 5, 6, 14]), Some(6));
        assert_eq!(straight_high(&[10, 11, 12, 13, 14]), Some(14));
        assert_eq!(straight_high(&[2, 3, 4, 6, 7]), None);
        assert_eq!(straight_high(&[11, 12, 13, 14]), None);
    }

    #[test]
    fn categories_and_tiebreakers() {
        let cases: [(&str, Category, &[u8]); 9] = [
            ("As Ks Qs Js 10s", Category::StraightFlush, &[14]),
            ("Kc Kd Kh Ks 2s", Category::FourOfAKind, &[13, 2]),
            ("2s 10c 10d 2h 10h", Category::FullHouse, &[10, 2]),
            ("Ah 9h 7h 3h 2h", Category::Flush, &[14, 9, 7, 3, 2]),
            ("Ad 2c 3s 4h 5d", Category::Straight, &[5]),
            ("Qc Qd Qh 9s 2c", Category::ThreeOfAKind, &[12, 9, 2]),
            ("2s Jc 9c Jd 9h", Category::TwoPair, &[11, 9, 2]),
            ("Ah Ad 10s 9c 2d", Category::Pair, &[14, 10, 9, 2]),
            ("Ah Kd 7s 5c 2d", Category::HighCard, &[14, 13, 7, 5, 2]),
        ];
        for (cards, category, tiebreakers) in cases {
            let score = score_five(&five(cards));
            assert_eq!(score.category, category, "{cards}");
            assert_eq!(score.tiebreakers(), tiebreakers, "{cards}");
        }
    }

    #[test]
    fn kicker_breaks_two_pair_tie() {
        let low = score_five(&five("As Ah Ks Kh 2c"));
        let high = score_five(&five("Ad Ac Kd Kc 7s"));
        assert_eq!(low.category, Category::TwoPair);
        assert_eq!(high.category, Category::TwoPair);
        assert_eq!(compare(&high, &low), Ordering::Greater);
        assert_eq!(compare(&low, &high), Ordering::Less);
    }

    #[test]
    fn suits_never_break_ties() {
        let a = score_five(&five("As Kh 9d 7c 3s"));
        let b = score_five(&five("Ac Kd 9h 7s 3d"));
        assert_eq!(compare(&a, &b), Ordering::Equal);
        assert_eq!(a, b);
    }

    #[test]
    fn best_of_seven_finds_hidden_flush() {
        let score = score_best(&seven("2h 9h Kh 4c 4d 7h Ah"));
        assert_eq!(score.category, Category::Flush);
        assert_eq!(score.tiebreakers(), &[14, 13, 9, 7, 2]);
    }

    #[test]
    fn best_of_seven_prefers_higher_straight() {
        let score = score_best(&seven("Ah 2c 3d 4s 5h 6c Kd"));
        assert_eq!(score.category, Category::Straight);
        assert_eq!(score.tiebreakers(), &[6]);
    }

    #[test]
    fn holdem_needs_complete_board() {
        let hole: HoleCards = "As Ks".parse().unwrap();
        let board: Board = "2c 3d 4h".parse().unwrap();
        let err = score_holdem(&hole, &board).unwrap_err();
        assert!(matches!(err, EvalError::NotEnoughCards));

        let overlapping: Board = "As 3d 4h 5c 9d".parse().unwrap();
        let err = score_holdem(&hole, &overlapping).unwrap_err();
        assert!(matches!(err, EvalError::InvalidHand(HandError::Overlap)));
    }
}
