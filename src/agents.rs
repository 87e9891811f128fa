//! Automated seats: the decision policy and the pacer that schedules automated turns.
//!
//! The pacer replaces a sleep-before-acting loop with an explicit deadline. A UI
//! calls [`Pacer::poll`] from its tick; the automated action runs on that same
//! thread once the deadline has passed, so it always follows the previously
//! committed mutation and never races with inbound human actions.

use crate::betting::{Action, Applied};
use crate::game::{Game, GameError};
use crate::table::Street;
use core::fmt;
use std::time::{Duration, Instant};

/// What an automated seat sees when it is asked to act.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct DecisionContext {
    pub seat: usize,
    pub street: Street,
    pub chips: u64,
    pub to_call: u64,
    pub current_bet: u64,
    pub min_raise: u64,
    pub pot: u64,
}

/// Chooses actions for automated seats.
pub trait AutomatedPolicy: fmt::Debug {
    fn decide(&mut self, ctx: &DecisionContext) -> Action;
}

/// Placeholder policy: check when nothing is owed, call while the stack covers more
/// than the call, fold otherwise. It never raises.
#[derive(Debug, Clone, Copy, Default)]
pub struct CallOrFold;

impl AutomatedPolicy for CallOrFold {
    fn decide(&mut self, ctx: &DecisionContext) -> Action {
        if ctx.to_call == 0 || ctx.chips > ctx.to_call {
            Action::CallOrCheck
        } else {
            Action::Fold
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Armed {
    token: u64,
    due: Instant,
}

/// Runs automated turns after a fixed delay.
#[derive(Debug)]
pub struct Pacer {
    delay: Duration,
    armed: Option<Armed>,
}

impl Pacer {
    pub fn new(delay: Duration) -> Self {
        Self { delay, armed: None }
    }

    pub fn for_game(game: &Game) -> Self {
        Self::new(game.automated_delay())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Deadline of the pending automated turn, if one is scheduled.
    pub fn due_at(&self) -> Option<Instant> {
        self.armed.map(|a| a.due)
    }

    /// Drive the table at time `now`.
    ///
    /// When an automated seat is to act and no turn is scheduled for the current
    /// state, a turn is scheduled at `now + delay`. A scheduled turn runs once `now`
    /// reaches its deadline. Any committed change to the game (a human action, a new
    /// hand) invalidates the schedule.
    pub fn poll(&mut self, game: &mut Game, now: Instant) -> Result<Option<Applied>, GameError> {
        if game.awaiting_automated().is_none() {
            self.armed = None;
            return Ok(None);
        }
        let token = game.turn_token();
        let armed = match self.armed {
            Some(a) if a.token == token => a,
            _ => {
                let a = Armed { token, due: now + self.delay };
                self.armed = Some(a);
                a
            }
        };
        if now < armed.due {
            return Ok(None);
        }
        self.armed = None;
        game.step_automated()
    }

    pub fn clear(&mut self) {
        self.armed = None;
    }
}
