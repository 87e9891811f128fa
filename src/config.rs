//! Table configuration.

use crate::table::SeatRole;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatConfig {
    pub name: String,
    pub role: SeatRole,
}

impl SeatConfig {
    pub fn human(name: impl Into<String>) -> Self {
        Self { name: name.into(), role: SeatRole::Human }
    }

    pub fn automated(name: impl Into<String>) -> Self {
        Self { name: name.into(), role: SeatRole::Automated }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct TableConfig {
    /// Seats in clockwise order.
    pub seats: Vec<SeatConfig>,
    pub starting_chips: u64,
    pub small_blind: u64,
    pub big_blind: u64,
    /// Button seat for the first hand.
    pub dealer: usize,
    /// Pause before each automated action when paced by [`crate::agents::Pacer`].
    pub automated_delay: Duration,
    /// Seed for the shuffle RNG; `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self::with_automated_seats(4)
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("table needs between {min} and {max} seats, got {got}")]
    SeatCount { min: usize, max: usize, got: usize },
    #[error("small blind must be positive")]
    ZeroSmallBlind,
    #[error("big blind {big} must be at least the small blind {small}")]
    BlindOrder { small: u64, big: u64 },
    #[error("starting chips {chips} must cover the big blind {big}")]
    ShortStack { chips: u64, big: u64 },
    #[error("dealer seat {dealer} is outside the table of {seats}")]
    DealerSeat { dealer: usize, seats: usize },
}

impl TableConfig {
    pub const MIN_SEATS: usize = 2;
    pub const MAX_SEATS: usize = 10;

    /// One human seat followed by `bots` automated seats, 1000 chips, 5/10 blinds.
    pub fn with_automated_seats(bots: usize) -> Self {
        let mut seats = vec![SeatConfig::human("You")];
        seats.extend((1..=bots).map(|i| SeatConfig::automated(format!("CPU {i}"))));
        Self {
            seats,
            starting_chips: 1000,
            small_blind: 5,
            big_blind: 10,
            dealer: 0,
            automated_delay: Duration::from_millis(500),
            seed: None,
        }
    }

    /// `n` human seats; every seat acts through inbound intents.
    pub fn all_human(n: usize) -> Self {
        let seats = (1..=n).map(|i| SeatConfig::human(format!("P{i}"))).collect();
        Self { seats, ..Self::with_automated_seats(0) }
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn chips(mut self, chips: u64) -> Self {
        self.starting_chips = chips;
        self
    }

    pub fn blinds(mut self, small: u64, big: u64) -> Self {
        self.small_blind = small;
        self.big_blind = big;
        self
    }

    pub fn dealer(mut self, seat: usize) -> Self {
        self.dealer = seat;
        self
    }

    pub fn automated_delay(mut self, delay: Duration) -> Self {
        self.automated_delay = delay;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let got = self.seats.len();
        if !(Self::MIN_SEATS..=Self::MAX_SEATS).contains(&got) {
            return Err(ConfigError::SeatCount { min: Self::MIN_SEATS, max: Self::MAX_SEATS, got });
        }
        if self.small_blind == 0 {
            return Err(ConfigError::ZeroSmallBlind);
        }
        if self.big_blind < self.small_blind {
            return Err(ConfigError::BlindOrder { small: self.small_blind, big: self.big_blind });
        }
        if self.starting_chips < self.big_blind {
            return Err(ConfigError::ShortStack { chips: self.starting_chips, big: self.big_blind });
        }
        if self.dealer >= got {
            return Err(ConfigError::DealerSeat { dealer: self.dealer, seats: got });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_one_human_four_automated() {
        let cfg = TableConfig::default();
        assert_eq!(cfg.seats.len(), 5);
        assert_eq!(cfg.seats[0].role, SeatRole::Human);
        assert!(cfg.seats[1..].iter().all(|s| s.role == SeatRole::Automated));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn validate_rejects_bad_tables() {
        assert!(matches!(
            TableConfig::all_human(1).validate(),
            Err(ConfigError::SeatCount { got: 1, .. })
        ));
        assert!(matches!(
            TableConfig::all_human(11).validate(),
            Err(ConfigError::SeatCount { got: 11, .. })
        ));
        assert_eq!(
            TableConfig::default().blinds(0, 10).validate(),
            Err(ConfigError::ZeroSmallBlind)
        );
        assert_eq!(
            TableConfig::default().blinds(10, 5).validate(),
            Err(ConfigError::BlindOrder { small: 10, big: 5 })
        );
        assert_eq!(
            TableConfig::default().chips(5).validate(),
            Err(ConfigError::ShortStack { chips: 5, big: 10 })
        );
        assert_eq!(
            TableConfig::all_human(3).dealer(3).validate(),
            Err(ConfigError::DealerSeat { dealer: 3, seats: 3 })
        );
    }
}
