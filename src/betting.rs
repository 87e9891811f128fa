//! Betting round engine: blind posting, turn order, action application and round
//! termination for one street.
//!
//! Turn order steps clockwise over active seats. A round ends when the turn comes
//! back to the last aggressor after it has acted: the big blind's forced post counts
//! as its action preflop, a raise counts as the raiser's action. On later streets the
//! dealer is the aggressor but has not acted yet, so it acts last and its action
//! closes the round.

use crate::table::{Street, TableState};
use std::fmt;
use std::str::FromStr;

/// A seat's decision on its turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Action {
    Fold,
    CallOrCheck,
    /// Raise the current bet by this many chips.
    Raise(u64),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Fold => f.write_str("fold"),
            Action::CallOrCheck => f.write_str("call/check"),
            Action::Raise(amount) => write!(f, "raise {amount}"),
        }
    }
}

impl FromStr for Action {
    type Err = ActionError;

    /// Parses `f`/`fold`, `c`/`call`/`check`, and `r <amount>`/`raise <amount>`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split_whitespace();
        let verb = parts.next().map(|v| v.to_ascii_lowercase()).unwrap_or_default();
        match verb.as_str() {
            "f" | "fold" => Ok(Action::Fold),
            "c" | "call" | "check" => Ok(Action::CallOrCheck),
            "r" | "raise" => {
                let raw = parts.next().unwrap_or("");
                match raw.parse::<u64>() {
                    Ok(amount) if amount > 0 => Ok(Action::Raise(amount)),
                    _ => Err(ActionError::UnparsableAmount(raw.to_string())),
                }
            }
            _ => Err(ActionError::UnknownAction(s.trim().to_string())),
        }
    }
}

/// Rejections. None of them changes table state.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActionError {
    #[error("no hand in progress")]
    HandNotInProgress,
    #[error("seat {seat} cannot act now; seat {current} is to act")]
    OutOfTurn { seat: usize, current: usize },
    #[error("raise must be at least {min}, got {got}")]
    InvalidRaise { min: u64, got: u64 },
    #[error("raise amount must be a positive number, got '{0}'")]
    UnparsableAmount(String),
    #[error("not enough chips: need {needed}, have {available}")]
    InsufficientChips { needed: u64, available: u64 },
    #[error("unknown action: '{0}'")]
    UnknownAction(String),
}

/// Where the current street's betting stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum RoundState {
    /// Preflop, before the blinds are posted.
    AwaitingBlinds,
    SeatToAct(usize),
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blinds {
    pub small_seat: usize,
    pub small_paid: u64,
    pub big_seat: usize,
    pub big_paid: u64,
}

/// The effect of one applied action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Applied {
    pub seat: usize,
    pub action: Action,
    /// Chips moved from the seat into the pot.
    pub paid: u64,
    pub state: RoundState,
}

/// Post both blinds and hand the turn to the seat after the big blind.
///
/// With two seats in the hand the dealer posts the small blind. Returns `None`
/// when fewer than two seats are active.
pub fn post_blinds(table: &mut TableState) -> Option<(Blinds, RoundState)> {
    if table.active_count() < 2 {
        return None;
    }
    let small_seat = if table.active_count() == 2 && table.is_active(table.dealer) {
        table.dealer
    } else {
        table.next_active_from(table.dealer)?
    };
    let big_seat = table.next_active_from(small_seat)?;
    let small_paid = table.post_blind(small_seat, table.small_blind);
    let big_paid = table.post_blind(big_seat, table.big_blind);
    table.min_raise = table.big_blind;
    table.last_aggressor = big_seat;
    table.aggressor_acted = true;
    table.current = table.next_active_from(big_seat)?;
    let blinds = Blinds { small_seat, small_paid, big_seat, big_paid };
    Some((blinds, RoundState::SeatToAct(table.current)))
}

/// Set turn pointers for a post-flop street: the seat after the dealer acts first
/// and the dealer (or the nearest active seat before it) closes the round.
pub fn open_street(table: &mut TableState) -> RoundState {
    let Some(first) = table.next_active_from(table.dealer) else {
        return RoundState::Complete;
    };
    let closer = table.prev_active_from(first).unwrap_or(first);
    table.current = first;
    table.last_aggressor = closer;
    table.aggressor_acted = false;
    RoundState::SeatToAct(first)
}

/// Apply `action` for `seat`. On error nothing changes.
pub fn apply(table: &mut TableState, seat: usize, action: Action) -> Result<Applied, ActionError> {
    if matches!(table.street, Street::Showdown) {
        return Err(ActionError::HandNotInProgress);
    }
    if seat != table.current || !table.is_active(seat) {
        return Err(ActionError::OutOfTurn { seat, current: table.current });
    }
    let available = table.players[seat].chips;
    let paid = match action {
        Action::Fold => {
            table.mark_folded(seat);
            table.players[seat].last_action = Some("Fold".into());
            0
        }
        Action::CallOrCheck => {
            let needed = table.to_call(seat);
            if needed > available {
                return Err(ActionError::InsufficientChips { needed, available });
            }
            let paid = table.record_bet(seat, needed);
            table.players[seat].last_action =
                Some(if paid == 0 { "Check".into() } else { format!("Call {paid}") });
            paid
        }
        Action::Raise(amount) => {
            if amount == 0 || amount < table.min_raise {
                return Err(ActionError::InvalidRaise { min: table.min_raise, got: amount });
            }
            let Some(target) = table.current_bet.checked_add(amount) else {
                return Err(ActionError::InsufficientChips { needed: u64::MAX, available });
            };
            let needed = target.saturating_sub(table.players[seat].bet);
            if needed > available {
                return Err(ActionError::InsufficientChips { needed, available });
            }
            let paid = table.record_bet(seat, needed);
            table.current_bet = target;
            table.min_raise = amount;
            table.last_aggressor = seat;
            table.aggressor_acted = true;
            table.players[seat].last_action = Some(format!("Raise to {target}"));
            paid
        }
    };
    let state = step(table, seat, matches!(action, Action::Raise(_)));
    Ok(Applied { seat, action, paid, state })
}

/// Move the turn on from `seat`, or report the round complete.
fn step(table: &mut TableState, seat: usize, raised: bool) -> RoundState {
    if table.active_count() <= 1 {
        return RoundState::Complete;
    }
    if !raised && seat == table.last_aggressor {
        // the aggressor only gets a turn before it has acted: this closes the street
        table.aggressor_acted = true;
        return RoundState::Complete;
    }
    let Some(next) = table.next_active_from(seat) else {
        return RoundState::Complete;
    };
    let reaches_aggressor =
        table.distance(seat, table.last_aggressor) <= table.distance(seat, next);
    if table.aggressor_acted && reaches_aggressor {
        return RoundState::Complete;
    }
    table.current = next;
    RoundState::SeatToAct(next)
}
