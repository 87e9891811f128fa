//! Table state: the single record of seats, chips, bets, pot and turn pointers for
//! one hand. It has no game logic of its own beyond keeping chip movements
//! consistent; the betting engine and phase controller drive it.

use crate::hand::{Board, HoleCards};

/// Who makes decisions for a seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SeatRole {
    /// Acts only through inbound action intents.
    Human,
    /// Acts through the automated policy.
    Automated,
}

impl SeatRole {
    pub fn is_automated(self) -> bool {
        matches!(self, SeatRole::Automated)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[non_exhaustive]
pub enum Street {
    Preflop,
    Flop,
    Turn,
    River,
    Showdown,
}

impl Street {
    pub fn next(self) -> Street {
        match self {
            Street::Preflop => Street::Flop,
            Street::Flop => Street::Turn,
            Street::Turn => Street::River,
            Street::River | Street::Showdown => Street::Showdown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Street::Preflop => "Preflop",
            Street::Flop => "Flop",
            Street::Turn => "Turn",
            Street::River => "River",
            Street::Showdown => "Showdown",
        }
    }
}

#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Player {
    pub(crate) name: String,
    pub(crate) role: SeatRole,
    pub(crate) chips: u64,
    /// Chips put in on the current street.
    pub(crate) bet: u64,
    /// Chips put in over the whole hand.
    pub(crate) contributed: u64,
    /// False once folded, or when the seat sat the hand out.
    pub(crate) active: bool,
    pub(crate) hole: Option<HoleCards>,
    pub(crate) last_action: Option<String>,
}

impl Player {
    pub fn new(name: impl Into<String>, role: SeatRole, chips: u64) -> Self {
        Self {
            name: name.into(),
            role,
            chips,
            bet: 0,
            contributed: 0,
            active: false,
            hole: None,
            last_action: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn role(&self) -> SeatRole {
        self.role
    }

    pub fn chips(&self) -> u64 {
        self.chips
    }

    pub fn bet(&self) -> u64 {
        self.bet
    }

    pub fn contributed(&self) -> u64 {
        self.contributed
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn hole(&self) -> Option<HoleCards> {
        self.hole
    }

    pub fn last_action(&self) -> Option<&str> {
        self.last_action.as_deref()
    }
}

#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct TableState {
    pub(crate) players: Vec<Player>,
    pub(crate) dealer: usize,
    pub(crate) small_blind: u64,
    pub(crate) big_blind: u64,
    pub(crate) current_bet: u64,
    pub(crate) min_raise: u64,
    pub(crate) pot: u64,
    pub(crate) current: usize,
    /// Seat whose action closes the round when the turn comes back to it.
    pub(crate) last_aggressor: usize,
    /// Whether `last_aggressor` already acted since it became the aggressor.
    pub(crate) aggressor_acted: bool,
    pub(crate) street: Street,
    pub(crate) board: Board,
}

impl TableState {
    pub fn new(players: Vec<Player>, small_blind: u64, big_blind: u64, dealer: usize) -> Self {
        Self {
            players,
            dealer,
            small_blind,
            big_blind,
            current_bet: 0,
            min_raise: big_blind,
            pot: 0,
            current: dealer,
            last_aggressor: dealer,
            aggressor_acted: false,
            street: Street::Showdown,
            board: Board::new(),
        }
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, seat: usize) -> Option<&Player> {
        self.players.get(seat)
    }

    pub fn dealer(&self) -> usize {
        self.dealer
    }

    pub fn small_blind(&self) -> u64 {
        self.small_blind
    }

    pub fn big_blind(&self) -> u64 {
        self.big_blind
    }

    pub fn current_bet(&self) -> u64 {
        self.current_bet
    }

    pub fn min_raise(&self) -> u64 {
        self.min_raise
    }

    pub fn pot(&self) -> u64 {
        self.pot
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn last_aggressor(&self) -> usize {
        self.last_aggressor
    }

    pub fn street(&self) -> Street {
        self.street
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn num_seats(&self) -> usize {
        self.players.len()
    }

    /// Clear every hand-scoped field. Chip totals carry over; seats without chips
    /// sit the hand out.
    pub fn reset_for_new_hand(&mut self) {
        for p in &mut self.players {
            p.bet = 0;
            p.contributed = 0;
            p.hole = None;
            p.last_action = None;
            p.active = p.chips > 0;
        }
        self.board.clear();
        self.pot = 0;
        self.current_bet = 0;
        self.min_raise = self.big_blind;
        self.current = self.dealer;
        self.last_aggressor = self.dealer;
        self.aggressor_acted = false;
        self.street = Street::Preflop;
    }

    /// Post a forced bet, clamped to the seat's stack. Returns the amount posted.
    pub fn post_blind(&mut self, seat: usize, amount: u64) -> u64 {
        let paid = self.record_bet(seat, amount);
        self.current_bet = self.current_bet.max(self.players[seat].bet);
        paid
    }

    /// Move up to `amount` chips from the seat's stack into its street bet and the
    /// pot. Returns the amount actually moved.
    pub fn record_bet(&mut self, seat: usize, amount: u64) -> u64 {
        let p = &mut self.players[seat];
        let pay = p.chips.min(amount);
        p.chips -= pay;
        p.bet += pay;
        p.contributed += pay;
        self.pot += pay;
        pay
    }

    pub fn mark_folded(&mut self, seat: usize) {
        self.players[seat].active = false;
    }

    /// Move to the next street and clear per-street betting. Turn pointers are set
    /// by the betting engine when it opens the street.
    pub fn advance_phase(&mut self) -> Street {
        self.street = self.street.next();
        for p in &mut self.players {
            p.bet = 0;
        }
        self.current_bet = 0;
        self.min_raise = self.big_blind;
        self.street
    }

    /// Chips still owed by `seat` to match the current bet.
    pub fn to_call(&self, seat: usize) -> u64 {
        if matches!(self.street, Street::Showdown) {
            return 0;
        }
        self.players.get(seat).map(|p| self.current_bet.saturating_sub(p.bet)).unwrap_or(0)
    }

    pub fn is_active(&self, seat: usize) -> bool {
        self.players.get(seat).map(|p| p.active).unwrap_or(false)
    }

    pub fn active_count(&self) -> usize {
        self.players.iter().filter(|p| p.active).count()
    }

    pub fn active_seats(&self) -> impl Iterator<Item = usize> + '_ {
        self.players.iter().enumerate().filter(|(_, p)| p.active).map(|(i, _)| i)
    }

    /// First active seat clockwise after `seat`, or `None` when no seat is active.
    pub fn next_active_from(&self, seat: usize) -> Option<usize> {
        let n = self.players.len();
        (1..=n).map(|step| (seat + step) % n).find(|&i| self.players[i].active)
    }

    /// First active seat counter-clockwise before `seat`.
    pub fn prev_active_from(&self, seat: usize) -> Option<usize> {
        let n = self.players.len();
        (1..=n).map(|step| (seat + n * 2 - step) % n).find(|&i| self.players[i].active)
    }

    /// Clockwise distance from `from` to `to`, in 1..=n (a full lap when equal).
    pub(crate) fn distance(&self, from: usize, to: usize) -> usize {
        let n = self.players.len();
        let d = (to + n - from) % n;
        if d == 0 {
            n
        } else {
            d
        }
    }

    /// Sum of every seat's hand contribution; equals the pot until settlement.
    pub fn total_contributed(&self) -> u64 {
        self.players.iter().map(|p| p.contributed).sum()
    }

    pub fn total_chips(&self) -> u64 {
        self.players.iter().map(|p| p.chips).sum::<u64>() + self.pot
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(chips: &[u64]) -> TableState {
        let players = chips
            .iter()
            .enumerate()
            .map(|(i, &c)| Player::new(format!("S{i}"), SeatRole::Human, c))
            .collect();
        TableState::new(players, 5, 10, 0)
    }

    #[test]
    fn reset_sits_out_empty_stacks() {
        let mut t = table(&[100, 0, 100]);
        t.reset_for_new_hand();
        assert!(t.is_active(0));
        assert!(!t.is_active(1));
        assert_eq!(t.active_count(), 2);
        assert_eq!(t.street(), Street::Preflop);
        assert_eq!(t.min_raise(), 10);
    }

    #[test]
    fn blinds_are_clamped_to_stack() {
        let mut t = table(&[100, 3, 100]);
        t.reset_for_new_hand();
        assert_eq!(t.post_blind(1, 5), 3);
        assert_eq!(t.players[1].chips, 0);
        assert_eq!(t.pot(), 3);
        assert_eq!(t.post_blind(2, 10), 10);
        assert_eq!(t.current_bet(), 10);
        assert_eq!(t.pot(), t.total_contributed());
    }

    #[test]
    fn advance_phase_clears_street_bets_only() {
        let mut t = table(&[100, 100]);
        t.reset_for_new_hand();
        t.record_bet(0, 10);
        t.current_bet = 10;
        assert_eq!(t.advance_phase(), Street::Flop);
        assert_eq!(t.players[0].bet, 0);
        assert_eq!(t.players[0].contributed, 10);
        assert_eq!(t.current_bet(), 0);
        assert_eq!(t.pot(), 10);
    }

    #[test]
    fn seat_stepping_skips_inactive_and_wraps() {
        let mut t = table(&[100, 100, 100, 100, 100]);
        t.reset_for_new_hand();
        t.mark_folded(1);
        t.mark_folded(4);
        assert_eq!(t.next_active_from(0), Some(2));
        assert_eq!(t.next_active_from(3), Some(0));
        assert_eq!(t.prev_active_from(0), Some(3));
        assert_eq!(t.prev_active_from(2), Some(0));
        assert_eq!(t.distance(3, 1), 3);
        assert_eq!(t.distance(2, 2), 5);
    }

    #[test]
    fn no_active_seat_yields_none() {
        let mut t = table(&[0, 0]);
        t.reset_for_new_hand();
        assert_eq!(t.next_active_from(0), None);
    }
}
