//! The hand lifecycle: dealing, street progression and showdown.
//!
//! [`Game`] owns the table state exclusively. Inbound intents (`fold`,
//! `call_or_check`, `raise`) are accepted only for a human seat whose turn it is;
//! automated seats act through [`Game::step_automated`], usually scheduled by
//! [`crate::agents::Pacer`]. Every action is fully applied before the next turn
//! begins.

use crate::agents::{AutomatedPolicy, CallOrFold, DecisionContext};
use crate::betting::{self, Action, ActionError, Applied, Blinds, RoundState};
use crate::config::{ConfigError, TableConfig};
use crate::deck::{Deck, DeckError};
use crate::evaluator::HandScore;
use crate::hand::{Board, HandError, HoleCards};
use crate::showdown::{self, Settlement, ShowdownError};
use crate::table::{Player, SeatRole, Street, TableState};
use log::{debug, error, info, warn};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum HandHistoryVerb {
    SmallBlind,
    BigBlind,
    Fold,
    Check,
    Call,
    RaiseTo,
    Win,
    Split,
    Refund,
}

impl HandHistoryVerb {
    pub fn label(self) -> &'static str {
        match self {
            HandHistoryVerb::SmallBlind => "SB",
            HandHistoryVerb::BigBlind => "BB",
            HandHistoryVerb::Fold => "Fold",
            HandHistoryVerb::Check => "Check",
            HandHistoryVerb::Call => "Call",
            HandHistoryVerb::RaiseTo => "Raise to",
            HandHistoryVerb::Win => "Win",
            HandHistoryVerb::Split => "Split",
            HandHistoryVerb::Refund => "Refund",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct HandHistoryEntry {
    pub seat: usize,
    pub verb: HandHistoryVerb,
    pub amount: Option<u64>,
    pub street: Street,
}

#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum GameError {
    #[error(transparent)]
    Action(#[from] ActionError),
    #[error("hand aborted: {0}")]
    Deck(#[from] DeckError),
    #[error("dealing failed: {0}")]
    Hand(#[from] HandError),
    #[error("showdown failed: {0}")]
    Showdown(#[from] ShowdownError),
    #[error("hand {0} is still in progress")]
    HandInProgress(u64),
    #[error("need at least two seats with chips to deal, have {0}")]
    NotEnoughPlayers(usize),
    #[error("invalid table configuration: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Debug)]
pub struct Game {
    table: TableState,
    deck: Deck,
    rng: ChaCha8Rng,
    round: RoundState,
    policy: Box<dyn AutomatedPolicy>,
    automated_delay: Duration,
    hands_played: u64,
    /// Bumped on every committed mutation; lets schedulers detect stale turns.
    turn_token: u64,
    blinds: Option<Blinds>,
    settlement: Option<Settlement>,
    scores: Vec<Option<HandScore>>,
    hand_history: Vec<HandHistoryEntry>,
}

impl Game {
    pub fn new(config: TableConfig) -> Result<Self, GameError> {
        config.validate()?;
        let players: Vec<Player> = config
            .seats
            .iter()
            .map(|s| Player::new(s.name.clone(), s.role, config.starting_chips))
            .collect();
        let n = players.len();
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        Ok(Self {
            table: TableState::new(players, config.small_blind, config.big_blind, config.dealer),
            deck: Deck::build(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            round: RoundState::Complete,
            policy: Box::new(CallOrFold),
            automated_delay: config.automated_delay,
            hands_played: 0,
            turn_token: 0,
            blinds: None,
            settlement: None,
            scores: vec![None; n],
            hand_history: Vec::new(),
        })
    }

    /// Replace the automated-seat policy.
    pub fn with_policy(mut self, policy: Box<dyn AutomatedPolicy>) -> Self {
        self.policy = policy;
        self
    }

    pub fn table(&self) -> &TableState {
        &self.table
    }

    pub fn players(&self) -> &[Player] {
        self.table.players()
    }

    pub fn street(&self) -> Street {
        self.table.street()
    }

    pub fn round(&self) -> RoundState {
        self.round
    }

    pub fn current(&self) -> usize {
        self.table.current()
    }

    pub fn dealer(&self) -> usize {
        self.table.dealer()
    }

    pub fn pot(&self) -> u64 {
        self.table.pot()
    }

    pub fn board(&self) -> &Board {
        self.table.board()
    }

    pub fn to_call(&self, seat: usize) -> u64 {
        self.table.to_call(seat)
    }

    pub fn min_raise(&self) -> u64 {
        self.table.min_raise()
    }

    pub fn current_bet(&self) -> u64 {
        self.table.current_bet()
    }

    pub fn blinds(&self) -> Option<Blinds> {
        self.blinds
    }

    /// Settlement of the last finished hand.
    pub fn settlement(&self) -> Option<&Settlement> {
        self.settlement.as_ref()
    }

    /// Showdown score per seat for the last contested hand.
    pub fn scores(&self) -> &[Option<HandScore>] {
        &self.scores
    }

    pub fn hands_played(&self) -> u64 {
        self.hands_played
    }

    pub fn turn_token(&self) -> u64 {
        self.turn_token
    }

    pub fn automated_delay(&self) -> Duration {
        self.automated_delay
    }

    pub fn deck_remaining(&self) -> usize {
        self.deck.len()
    }

    pub fn is_hand_over(&self) -> bool {
        matches!(self.table.street(), Street::Showdown)
    }

    pub fn history_recent(&self, n: usize) -> Vec<HandHistoryEntry> {
        let start = self.hand_history.len().saturating_sub(n);
        self.hand_history[start..].to_vec()
    }

    pub fn history_len(&self) -> usize {
        self.hand_history.len()
    }

    /// Seat to act when it is automated.
    pub fn awaiting_automated(&self) -> Option<usize> {
        self.seat_to_act().filter(|&s| self.table.players[s].role.is_automated())
    }

    /// Seat to act when it is human.
    pub fn human_to_act(&self) -> Option<usize> {
        self.seat_to_act().filter(|&s| !self.table.players[s].role.is_automated())
    }

    fn seat_to_act(&self) -> Option<usize> {
        match self.round {
            RoundState::SeatToAct(seat) => Some(seat),
            _ => None,
        }
    }

    /// Start a new hand: move the button, shuffle a fresh deck, deal hole cards and
    /// post blinds. Rejected while the current hand is still being played.
    pub fn new_hand(&mut self) -> Result<(), GameError> {
        if !self.is_hand_over() {
            warn!("new hand requested during hand {}", self.hands_played);
            return Err(GameError::HandInProgress(self.hands_played));
        }
        let funded = self.table.players.iter().filter(|p| p.chips > 0).count();
        if funded < 2 {
            return Err(GameError::NotEnoughPlayers(funded));
        }
        self.move_button();
        self.table.reset_for_new_hand();
        self.deck = Deck::build();
        self.deck.shuffle_with(&mut self.rng);
        self.round = RoundState::AwaitingBlinds;
        self.blinds = None;
        self.settlement = None;
        self.scores = vec![None; self.table.num_seats()];
        self.hand_history.clear();
        self.hands_played += 1;
        self.turn_token += 1;
        info!(
            "hand {} begins: dealer seat {}, {} seats dealt in",
            self.hands_played,
            self.table.dealer,
            self.table.active_count()
        );

        if let Err(e) = self.deal_hole_cards() {
            return Err(self.abort_hand(e));
        }
        let (blinds, state) =
            betting::post_blinds(&mut self.table).ok_or(GameError::NotEnoughPlayers(funded))?;
        self.record_history(blinds.small_seat, HandHistoryVerb::SmallBlind, Some(blinds.small_paid));
        self.record_history(blinds.big_seat, HandHistoryVerb::BigBlind, Some(blinds.big_paid));
        self.table.players[blinds.small_seat].last_action = Some(format!("SB {}", blinds.small_paid));
        self.table.players[blinds.big_seat].last_action = Some(format!("BB {}", blinds.big_paid));
        debug!(
            "blinds: seat {} posts {}, seat {} posts {}",
            blinds.small_seat, blinds.small_paid, blinds.big_seat, blinds.big_paid
        );
        self.blinds = Some(blinds);
        self.round = state;
        Ok(())
    }

    /// The first hand keeps the configured button; later hands pass it clockwise.
    /// The button only lands on seats that have chips.
    fn move_button(&mut self) {
        let n = self.table.num_seats();
        let start = if self.hands_played == 0 { self.table.dealer + n - 1 } else { self.table.dealer };
        if let Some(seat) =
            (1..=n).map(|step| (start + step) % n).find(|&i| self.table.players[i].chips > 0)
        {
            self.table.dealer = seat;
        }
    }

    /// One card at a time, two passes, starting left of the dealer.
    fn deal_hole_cards(&mut self) -> Result<(), GameError> {
        let n = self.table.num_seats();
        let order: Vec<usize> = (1..=n)
            .map(|step| (self.table.dealer + step) % n)
            .filter(|&i| self.table.is_active(i))
            .collect();
        let first = self.deck.draw_n(order.len())?;
        let second = self.deck.draw_n(order.len())?;
        for ((&seat, a), b) in order.iter().zip(first).zip(second) {
            self.table.players[seat].hole = Some(HoleCards::try_new(a, b)?);
        }
        Ok(())
    }

    /// Human intent: fold for the human seat to act.
    pub fn fold(&mut self) -> Result<(), GameError> {
        self.act(Action::Fold)
    }

    /// Human intent: call the current bet, or check when nothing is owed.
    pub fn call_or_check(&mut self) -> Result<(), GameError> {
        self.act(Action::CallOrCheck)
    }

    /// Human intent: raise the current bet by `amount`.
    pub fn raise(&mut self, amount: u64) -> Result<(), GameError> {
        self.act(Action::Raise(amount))
    }

    /// Apply a human intent for whichever human seat is to act.
    pub fn act(&mut self, action: Action) -> Result<(), GameError> {
        let seat = match self.human_to_act() {
            Some(seat) => seat,
            None => return Err(self.reject_inbound(action).into()),
        };
        self.apply(seat, action).map(|_| ())
    }

    fn reject_inbound(&self, action: Action) -> ActionError {
        let err = match self.round {
            RoundState::SeatToAct(current) => {
                let seat = self.first_human().unwrap_or(current);
                ActionError::OutOfTurn { seat, current }
            }
            _ => ActionError::HandNotInProgress,
        };
        warn!("rejected {action}: {err}");
        err
    }

    fn first_human(&self) -> Option<usize> {
        self.table.players.iter().position(|p| p.role == SeatRole::Human)
    }

    /// Let the automated seat to act make its move. Returns `None` when the seat to
    /// act is not automated or no hand is running.
    pub fn step_automated(&mut self) -> Result<Option<Applied>, GameError> {
        let Some(seat) = self.awaiting_automated() else {
            return Ok(None);
        };
        let ctx = self.decision_context(seat);
        let action = self.policy.decide(&ctx);
        debug!("seat {seat} ({}) decides {action} facing {}", self.table.players[seat].name, ctx.to_call);
        self.apply(seat, action).map(Some)
    }

    /// Run automated turns until a human must act or the hand ends. Returns the
    /// number of automated actions taken.
    pub fn run_automated(&mut self) -> Result<usize, GameError> {
        let mut taken = 0;
        while self.step_automated()?.is_some() {
            taken += 1;
        }
        Ok(taken)
    }

    fn decision_context(&self, seat: usize) -> DecisionContext {
        DecisionContext {
            seat,
            street: self.table.street,
            chips: self.table.players[seat].chips,
            to_call: self.table.to_call(seat),
            current_bet: self.table.current_bet,
            min_raise: self.table.min_raise,
            pot: self.table.pot,
        }
    }

    fn apply(&mut self, seat: usize, action: Action) -> Result<Applied, GameError> {
        let applied = match betting::apply(&mut self.table, seat, action) {
            Ok(applied) => applied,
            Err(e) => {
                warn!("seat {seat} {action} rejected: {e}");
                return Err(e.into());
            }
        };
        self.turn_token += 1;
        let verb = match action {
            Action::Fold => HandHistoryVerb::Fold,
            Action::CallOrCheck if applied.paid == 0 => HandHistoryVerb::Check,
            Action::CallOrCheck => HandHistoryVerb::Call,
            Action::Raise(_) => HandHistoryVerb::RaiseTo,
        };
        let amount = match verb {
            HandHistoryVerb::Call => Some(applied.paid),
            HandHistoryVerb::RaiseTo => Some(self.table.current_bet),
            _ => None,
        };
        self.record_history(seat, verb, amount);
        debug!("seat {seat}: {} {}", verb.label(), amount.map(|a| a.to_string()).unwrap_or_default());

        match applied.state {
            RoundState::Complete => self.finish_round()?,
            state => self.round = state,
        }
        Ok(applied)
    }

    fn finish_round(&mut self) -> Result<(), GameError> {
        if self.table.active_count() <= 1 {
            let seat = self.table.active_seats().next().ok_or(ShowdownError::NoContenders)?;
            let settlement = showdown::award_uncontested(&mut self.table, seat);
            self.close_hand(settlement);
            return Ok(());
        }
        match self.table.street {
            Street::Preflop | Street::Flop | Street::Turn => self.deal_next_street(),
            Street::River => self.showdown(),
            Street::Showdown => Ok(()),
        }
    }

    fn deal_next_street(&mut self) -> Result<(), GameError> {
        let count = if matches!(self.table.street, Street::Preflop) { 3 } else { 1 };
        let cards = match self.deck.draw_n(count) {
            Ok(cards) => cards,
            Err(e) => return Err(self.abort_hand(e.into())),
        };
        if let Err(e) = self.table.board.deal(cards) {
            return Err(self.abort_hand(e.into()));
        }
        let street = self.table.advance_phase();
        self.round = betting::open_street(&mut self.table);
        info!(
            "{}: board {}",
            street.label(),
            self.table.board.as_slice().iter().map(|c| c.to_string()).collect::<Vec<_>>().join(" ")
        );
        Ok(())
    }

    fn showdown(&mut self) -> Result<(), GameError> {
        self.table.advance_phase();
        let (settlement, scores) = showdown::settle(&mut self.table)?;
        for (seat, score) in scores.iter().enumerate() {
            if let Some(score) = score {
                debug!("seat {seat} shows {}", score.category);
            }
        }
        self.scores = scores;
        self.close_hand(settlement);
        Ok(())
    }

    fn close_hand(&mut self, settlement: Settlement) {
        let verb =
            if settlement.winners.len() > 1 { HandHistoryVerb::Split } else { HandHistoryVerb::Win };
        for &seat in &settlement.winners {
            self.record_history(seat, verb, Some(settlement.amount_for(seat)));
        }
        info!("hand {}: {}", self.hands_played, settlement.describe(&self.table));
        self.table.street = Street::Showdown;
        self.round = RoundState::Complete;
        self.settlement = Some(settlement);
    }

    /// Give every seat its chips for this hand back and end the hand unsettled.
    /// Returns `cause` for the caller to propagate.
    fn abort_hand(&mut self, cause: GameError) -> GameError {
        error!("hand {} aborted: {cause}", self.hands_played);
        let street = self.table.street;
        let mut refunds = Vec::new();
        for (seat, p) in self.table.players.iter_mut().enumerate() {
            if p.contributed > 0 {
                p.chips += p.contributed;
                refunds.push((seat, p.contributed));
            }
            p.bet = 0;
            p.contributed = 0;
            p.active = false;
        }
        for (seat, amount) in refunds {
            self.hand_history.push(HandHistoryEntry {
                seat,
                verb: HandHistoryVerb::Refund,
                amount: Some(amount),
                street,
            });
        }
        self.table.pot = 0;
        self.table.street = Street::Showdown;
        self.round = RoundState::Complete;
        self.settlement = None;
        self.turn_token += 1;
        cause
    }

    fn record_history(&mut self, seat: usize, verb: HandHistoryVerb, amount: Option<u64>) {
        let entry = HandHistoryEntry { seat, verb, amount, street: self.table.street };
        self.hand_history.push(entry);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::Card;
    use std::collections::HashSet;

    fn mk_game(n: usize) -> Game {
        Game::new(TableConfig::all_human(n).seed(11)).expect("valid config")
    }

    #[test]
    fn new_hand_deals_unique_cards_and_posts_blinds() {
        let mut g = mk_game(5);
        g.new_hand().unwrap();
        let mut seen: HashSet<Card> = HashSet::new();
        for p in g.players() {
            let hole = p.hole().expect("every funded seat is dealt in");
            assert!(seen.insert(hole.first()));
            assert!(seen.insert(hole.second()));
        }
        assert_eq!(g.deck_remaining(), 42);
        assert_eq!(g.pot(), 15);
        assert_eq!(g.current(), 3);
        assert_eq!(g.round(), RoundState::SeatToAct(3));
    }

    #[test]
    fn empty_deck_aborts_hand_and_refunds() {
        let mut g = mk_game(3);
        g.new_hand().unwrap();
        g.call_or_check().unwrap();
        let before: u64 = g.players().iter().map(|p| p.chips() + p.contributed()).sum();

        g.deck = Deck::build();
        g.deck.draw_n(51).unwrap();
        let err = g.call_or_check().unwrap_err();
        assert!(matches!(err, GameError::Deck(DeckError::Empty)));

        assert_eq!(g.pot(), 0);
        assert!(g.is_hand_over());
        assert!(g.settlement().is_none());
        let after: u64 = g.players().iter().map(|p| p.chips()).sum();
        assert_eq!(before, after, "every contribution is refunded");
        assert_eq!(g.players().iter().map(|p| p.chips()).collect::<Vec<_>>(), vec![1000; 3]);
        assert!(g.history_recent(3).iter().any(|e| e.verb == HandHistoryVerb::Refund));
        assert!(matches!(
            g.fold(),
            Err(GameError::Action(ActionError::HandNotInProgress))
        ));
    }

    #[test]
    fn dealing_failure_is_returned_and_refunded() {
        let mut g = mk_game(3);
        g.new_hand().unwrap();
        g.call_or_check().unwrap();
        let err = g.abort_hand(HandError::DuplicateHoleCards.into());
        assert!(matches!(err, GameError::Hand(HandError::DuplicateHoleCards)));
        assert!(g.is_hand_over());
        assert_eq!(g.players().iter().map(|p| p.chips()).sum::<u64>(), 3000);
        g.new_hand().unwrap();
        assert!(g.players().iter().all(|p| p.hole().is_some()));
    }

    #[test]
    fn new_hand_mid_hand_is_rejected() {
        let mut g = mk_game(5);
        g.new_hand().unwrap();
        g.raise(100).unwrap();
        g.call_or_check().unwrap();
        let total = g.table().total_chips();
        let (pot, current, token) = (g.pot(), g.current(), g.turn_token());

        assert!(matches!(g.new_hand(), Err(GameError::HandInProgress(1))));
        assert_eq!(g.table().total_chips(), total);
        assert_eq!(total, 5000);
        assert_eq!((g.pot(), g.current(), g.turn_token()), (pot, current, token));
        assert_eq!(g.hands_played(), 1);
    }

    #[test]
    fn busted_seat_sits_out_next_hand() {
        let mut g = mk_game(3);
        g.table.players[1].chips = 0;
        g.new_hand().unwrap();
        let busted = &g.players()[1];
        assert!(!busted.is_active());
        assert!(busted.hole().is_none());
        assert_eq!(busted.contributed(), 0);
        assert_ne!(g.current(), 1);
    }

    #[test]
    fn new_hand_needs_two_funded_seats() {
        let mut g = mk_game(3);
        g.table.players[1].chips = 0;
        g.table.players[2].chips = 0;
        assert!(matches!(g.new_hand(), Err(GameError::NotEnoughPlayers(1))));
    }
}
