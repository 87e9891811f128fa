// Engine boundary. Front ends (the console binary, tests, a future TUI) drive the
// table through this trait and read it back through `TableSnapshot`, without
// touching table internals.

use crate::cards::Card;
use crate::evaluator::Category;
use crate::game::{Game, GameError};
use crate::hand::HoleCards;
use crate::showdown::Settlement;
use crate::table::{SeatRole, Street};

pub trait HoldemEngine {
    // Hand lifecycle
    fn new_hand(&mut self) -> Result<(), GameError>;

    // Inbound human intents
    fn fold(&mut self) -> Result<(), GameError>;
    fn call_or_check(&mut self) -> Result<(), GameError>;
    fn raise(&mut self, amount: u64) -> Result<(), GameError>;

    // Queries
    fn snapshot(&self) -> TableSnapshot;
}

/// One seat as a front end may show it.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct SeatView {
    pub seat: usize,
    pub name: String,
    pub role: SeatRole,
    pub chips: u64,
    pub bet: u64,
    pub active: bool,
    pub is_dealer: bool,
    /// Human seats always; every dealt seat once a contested hand is shown down.
    pub hole: Option<HoleCards>,
    pub category: Option<Category>,
    pub last_action: Option<String>,
}

/// Read-only view of the table after the last committed mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct TableSnapshot {
    pub hand_number: u64,
    pub seats: Vec<SeatView>,
    pub pot: u64,
    pub board: Vec<Card>,
    pub street: Street,
    /// Seat whose turn it is, if any.
    pub to_act: Option<usize>,
    pub to_call: u64,
    pub min_raise: u64,
    pub current_bet: u64,
    pub settlement: Option<Settlement>,
    pub settlement_text: Option<String>,
}

impl TableSnapshot {
    pub fn seat(&self, seat: usize) -> Option<&SeatView> {
        self.seats.get(seat)
    }

    pub fn is_human_turn(&self) -> bool {
        self.to_act
            .and_then(|s| self.seats.get(s))
            .map(|v| v.role == SeatRole::Human)
            .unwrap_or(false)
    }
}

impl HoldemEngine for Game {
    fn new_hand(&mut self) -> Result<(), GameError> {
        Game::new_hand(self)
    }

    fn fold(&mut self) -> Result<(), GameError> {
        Game::fold(self)
    }

    fn call_or_check(&mut self) -> Result<(), GameError> {
        Game::call_or_check(self)
    }

    fn raise(&mut self, amount: u64) -> Result<(), GameError> {
        Game::raise(self, amount)
    }

    fn snapshot(&self) -> TableSnapshot {
        let table = self.table();
        let revealed = self.settlement().map(|s| !s.is_uncontested()).unwrap_or(false);
        let seats = table
            .players()
            .iter()
            .enumerate()
            .map(|(seat, p)| {
                let category = self.scores().get(seat).and_then(|s| s.as_ref()).map(|s| s.category);
                let shown = p.role() == SeatRole::Human || revealed;
                SeatView {
                    seat,
                    name: p.name().to_string(),
                    role: p.role(),
                    chips: p.chips(),
                    bet: p.bet(),
                    active: p.is_active(),
                    is_dealer: seat == table.dealer(),
                    hole: if shown { p.hole() } else { None },
                    category: if revealed { category } else { None },
                    last_action: p.last_action().map(str::to_string),
                }
            })
            .collect();
        let to_act = match self.round() {
            crate::betting::RoundState::SeatToAct(seat) => Some(seat),
            _ => None,
        };
        TableSnapshot {
            hand_number: self.hands_played(),
            seats,
            pot: table.pot(),
            board: table.board().as_slice().to_vec(),
            street: table.street(),
            to_act,
            to_call: to_act.map(|s| table.to_call(s)).unwrap_or(0),
            min_raise: table.min_raise(),
            current_bet: table.current_bet(),
            settlement: self.settlement().cloned(),
            settlement_text: self.settlement().map(|s| s.describe(table)),
        }
    }
}
