//! holdem-table: a single-table Texas Hold'em engine.
//!
//! One human seat plays against automated seats. The crate covers:
//! - a 52-card deck with seeded shuffles
//! - blind posting, turn order and round termination for every street
//! - flop, turn and river dealing and the showdown
//! - 5- and 7-card hand ranking with full tiebreakers
//! - pot settlement with split pots and odd-chip rules
//!
//! Rendering is left to front ends; [`engine::HoldemEngine`] is the boundary they use.
//!
//! ## Quick start: rank a Hold'em hand
//! ```
//! use holdem_table::evaluator::{score_holdem, Category};
//! use holdem_table::hand::{Board, HoleCards};
//!
//! let hole: HoleCards = "As Ah".parse().unwrap();
//! let board: Board = "Kc Qd Jh 3s 2c".parse().unwrap();
//!
//! let score = score_holdem(&hole, &board).unwrap();
//! assert_eq!(score.category, Category::Pair);
//! ```
//!
//! ## Quick start: play a hand
//! ```
//! use holdem_table::config::TableConfig;
//! use holdem_table::engine::HoldemEngine;
//! use holdem_table::game::Game;
//!
//! let mut game = Game::new(TableConfig::default().seed(7)).unwrap();
//! game.new_hand().unwrap();
//! game.run_automated().unwrap();
//! if game.human_to_act().is_some() {
//!     game.fold().unwrap();
//! }
//! game.run_automated().unwrap();
//! assert!(game.snapshot().settlement.is_some());
//! ```
//!
//! ## Console table
//! ```sh
//! cargo run --bin holdem -- --seed 42
//! ```

pub mod agents;
pub mod betting;
pub mod cards;
pub mod config;
pub mod deck;
pub mod engine;
pub mod evaluator;
pub mod game;
pub mod hand;
pub mod showdown;
pub mod table;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
