use holdem_table::config::TableConfig;
use holdem_table::engine::HoldemEngine;
use holdem_table::game::{Game, HandHistoryVerb};
use holdem_table::showdown::split_pot;
use holdem_table::table::Street;

fn check_down(seed: u64, seats: usize) -> Game {
    let mut g = Game::new(TableConfig::all_human(seats).seed(seed)).unwrap();
    g.new_hand().unwrap();
    while g.human_to_act().is_some() {
        g.call_or_check().unwrap();
    }
    g
}

#[test]
fn pot_of_100_splits_evenly() {
    assert_eq!(split_pot(100, &[1, 3]), (50, vec![]));
}

#[test]
fn pot_of_101_gives_odd_chip_to_first_winner_left_of_dealer() {
    // dealer 0: seat 1 comes before seat 3
    let (share, odd) = split_pot(101, &[1, 3]);
    assert_eq!(share, 50);
    assert_eq!(odd, vec![1]);
}

#[test]
fn showdown_pays_the_best_scores() {
    for seed in 0..40 {
        let g = check_down(seed, 5);
        assert_eq!(g.street(), Street::Showdown);
        let s = g.settlement().expect("settled");
        assert!(!s.is_uncontested());
        assert_eq!(s.pot, 50);

        let best = g.scores().iter().flatten().max().expect("scores").clone();
        assert_eq!(s.category, Some(best.category));
        for (seat, score) in g.scores().iter().enumerate() {
            let is_best = score.as_ref() == Some(&best);
            assert_eq!(s.winners.contains(&seat), is_best, "seed {seed} seat {seat}");
        }

        let paid: u64 = s.winners.iter().map(|&w| s.amount_for(w)).sum();
        assert_eq!(paid, 50);
        assert_eq!(g.table().total_chips(), 5000);
        assert_eq!(g.pot(), 0);
    }
}

#[test]
fn split_history_and_snapshot_reveal() {
    let g = check_down(17, 4);
    let s = g.settlement().unwrap().clone();
    let verb = if s.winners.len() > 1 { HandHistoryVerb::Split } else { HandHistoryVerb::Win };
    let recent = g.history_recent(s.winners.len());
    assert!(recent.iter().all(|e| e.verb == verb && s.winners.contains(&e.seat)));

    let snap = g.snapshot();
    assert!(snap.seats.iter().all(|v| v.hole.is_some() && v.category.is_some()));
    assert!(snap.settlement_text.is_some());
    assert_eq!(snap.to_act, None);
}
