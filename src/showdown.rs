//! Showdown and pot settlement.
//!
//! Every active seat is scored on hole cards plus board; all seats tied at the best
//! score share the pot. Shares are `pot / winners`; the remaining odd chips go one
//! each to the winners in seat order starting left of the dealer.

use crate::evaluator::{score_holdem, Category, EvalError, HandScore};
use crate::table::TableState;

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum ShowdownError {
    #[error("no active seat left to award the pot")]
    NoContenders,
    #[error("seat {0} reached showdown without hole cards")]
    MissingHoleCards(usize),
    #[error("seat {seat}: {source}")]
    Evaluation {
        seat: usize,
        #[source]
        source: EvalError,
    },
}

/// How a pot was paid out.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct Settlement {
    /// Winning seats, starting left of the dealer.
    pub winners: Vec<usize>,
    /// Winning hand class; `None` when everyone else folded.
    pub category: Option<Category>,
    pub pot: u64,
    /// Equal share credited to every winner.
    pub payout: u64,
    /// Winners that received one extra chip from an uneven split.
    pub odd_chips: Vec<usize>,
}

impl Settlement {
    pub fn is_uncontested(&self) -> bool {
        self.category.is_none()
    }

    /// Total credited to `seat`.
    pub fn amount_for(&self, seat: usize) -> u64 {
        if !self.winners.contains(&seat) {
            return 0;
        }
        self.payout + u64::from(self.odd_chips.contains(&seat))
    }

    /// One-line summary using seat names from `table`.
    pub fn describe(&self, table: &TableState) -> String {
        let names: Vec<&str> = self
            .winners
            .iter()
            .filter_map(|&s| table.player(s).map(|p| p.name()))
            .collect();
        match (self.category, names.as_slice()) {
            (None, [name]) => format!("{name} wins {} uncontested", self.pot),
            (Some(cat), [name]) => format!("{name} wins {} with {cat}", self.pot),
            (Some(cat), _) => {
                format!("{} split {} with {cat}, {} each", names.join(", "), self.pot, self.payout)
            }
            (None, _) => format!("{} split {}", names.join(", "), self.pot),
        }
    }
}

/// Even share per winner and the seats that take one odd chip each.
/// `winners` must already be in payout order.
pub fn split_pot(pot: u64, winners: &[usize]) -> (u64, Vec<usize>) {
    if winners.is_empty() {
        return (0, Vec::new());
    }
    let n = winners.len() as u64;
    let share = pot / n;
    let rem = (pot % n) as usize;
    (share, winners[..rem].to_vec())
}

/// Score every active seat, pay the winners and empty the pot.
///
/// Returns the settlement plus each seat's score (`None` for folded seats).
pub fn settle(
    table: &mut TableState,
) -> Result<(Settlement, Vec<Option<HandScore>>), ShowdownError> {
    let mut scores: Vec<Option<HandScore>> = vec![None; table.num_seats()];
    let contenders: Vec<usize> = table.active_seats().collect();
    if contenders.is_empty() {
        return Err(ShowdownError::NoContenders);
    }
    for &seat in &contenders {
        let hole = table.players[seat].hole.ok_or(ShowdownError::MissingHoleCards(seat))?;
        let score = score_holdem(&hole, &table.board)
            .map_err(|source| ShowdownError::Evaluation { seat, source })?;
        scores[seat] = Some(score);
    }

    let best = contenders.iter().filter_map(|&s| scores[s].as_ref()).max().cloned();
    let Some(best) = best else {
        return Err(ShowdownError::NoContenders);
    };
    let mut winners: Vec<usize> =
        contenders.into_iter().filter(|&s| scores[s].as_ref() == Some(&best)).collect();
    let dealer = table.dealer;
    winners.sort_by_key(|&s| table.distance(dealer, s));

    let settlement = pay(table, winners, Some(best.category));
    Ok((settlement, scores))
}

/// Give the whole pot to the last seat standing.
pub fn award_uncontested(table: &mut TableState, seat: usize) -> Settlement {
    pay(table, vec![seat], None)
}

fn pay(table: &mut TableState, winners: Vec<usize>, category: Option<Category>) -> Settlement {
    let pot = table.pot;
    let (payout, odd_chips) = split_pot(pot, &winners);
    let split = winners.len() > 1;
    for &seat in &winners {
        let amount = payout + u64::from(odd_chips.contains(&seat));
        let p = &mut table.players[seat];
        p.chips += amount;
        p.last_action = Some(if split { format!("Split {amount}") } else { format!("Win {amount}") });
    }
    table.pot = 0;
    for p in &mut table.players {
        p.bet = 0;
    }
    Settlement { winners, category, pot, payout, odd_chips }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hand::{Board, HoleCards};
    use crate::table::{Player, SeatRole};

    fn table_at_river(holes: &[&str], board: &str) -> TableState {
        let players = holes
            .iter()
            .enumerate()
            .map(|(i, _)| Player::new(format!("S{i}"), SeatRole::Human, 0))
            .collect();
        let mut t = TableState::new(players, 5, 10, 0);
        t.reset_for_new_hand();
        for (i, h) in holes.iter().enumerate() {
            let hole: HoleCards = h.parse().expect("valid hole");
            t.players[i].hole = Some(hole);
            t.players[i].active = true;
        }
        let board: Board = board.parse().expect("valid board");
        t.board = board;
        t
    }

    #[test]
    fn split_pot_even_and_odd() {
        assert_eq!(split_pot(100, &[1, 3]), (50, vec![]));
        assert_eq!(split_pot(101, &[3, 1]), (50, vec![3]));
        assert_eq!(split_pot(10, &[0, 1, 2]), (3, vec![0]));
        assert_eq!(split_pot(7, &[]), (0, vec![]));
    }

    #[test]
    fn best_hand_takes_pot() {
        let mut t = table_at_river(&["Ah Ad", "Kh Kd", "7c 2s"], "Ac 9d 4s 3h Jc");
        t.pot = 90;
        let (s, scores) = settle(&mut t).unwrap();
        assert_eq!(s.winners, vec![0]);
        assert_eq!(s.category, Some(Category::ThreeOfAKind));
        assert_eq!(t.players[0].chips, 90);
        assert_eq!(t.pot(), 0);
        assert!(scores.iter().all(|s| s.is_some()));
    }

    #[test]
    fn tie_splits_with_odd_chip_left_of_dealer() {
        // every seat plays the board's broadway straight
        let mut t = table_at_river(&["2c 3d", "2h 3s", "4c 4d"], "As Kd Qh Js 10c");
        t.pot = 101;
        t.dealer = 1;
        let (s, _) = settle(&mut t).unwrap();
        assert_eq!(s.category, Some(Category::Straight));
        assert_eq!(s.winners, vec![2, 0, 1]);
        assert_eq!(s.payout, 33);
        assert_eq!(s.odd_chips, vec![2, 0]);
        assert_eq!(t.players[2].chips, 34);
        assert_eq!(t.players[0].chips, 34);
        assert_eq!(t.players[1].chips, 33);
    }

    #[test]
    fn folded_seats_are_not_scored() {
        let mut t = table_at_river(&["Ah Ad", "Kh Kd"], "Ac 9d 4s 3h Jc");
        t.mark_folded(0);
        t.pot = 40;
        let (s, scores) = settle(&mut t).unwrap();
        assert_eq!(s.winners, vec![1]);
        assert!(scores[0].is_none());
    }

    #[test]
    fn uncontested_award_and_description() {
        let mut t = table_at_river(&["Ah Ad", "Kh Kd"], "Ac 9d 4s 3h Jc");
        t.pot = 15;
        let s = award_uncontested(&mut t, 1);
        assert!(s.is_uncontested());
        assert_eq!(s.amount_for(1), 15);
        assert_eq!(s.amount_for(0), 0);
        assert_eq!(s.describe(&t), "S1 wins 15 uncontested");
    }
}
