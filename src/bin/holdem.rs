use holdem_table::agents::Pacer;
use holdem_table::betting::{Action, Applied};
use holdem_table::config::TableConfig;
use holdem_table::engine::{HoldemEngine, TableSnapshot};
use holdem_table::game::{Game, GameError};
use log::info;
use pico_args::Arguments;
use std::error::Error;
use std::io::{self, BufRead, Write};
use std::thread;
use std::time::{Duration, Instant};

const HELP: &str = "\
Play Texas Hold'em against automated seats

USAGE:
  holdem [OPTIONS]

OPTIONS:
  --seed N              Shuffle seed  [default: random]
  --chips N             Starting chips per seat  [default: 1000]
  --small-blind N       Small blind  [default: 5]
  --big-blind N         Big blind  [default: 10]
  --delay-ms N          Pause before each automated action  [default: 500]
  --bots N              Number of automated seats  [default: 4]

FLAGS:
  -h, --help            Print help information

COMMANDS (at the prompt):
  c                     Call, or check when nothing is owed
  r N                   Raise the current bet by N
  f                     Fold
  n                     Deal the next hand
  q                     Quit
";

struct Args {
    seed: Option<u64>,
    chips: u64,
    small_blind: u64,
    big_blind: u64,
    delay_ms: u64,
    bots: usize,
}

fn parse_args() -> Result<Args, pico_args::Error> {
    let mut pargs = Arguments::from_env();
    if pargs.contains(["-h", "--help"]) {
        print!("{HELP}");
        std::process::exit(0);
    }
    Ok(Args {
        seed: pargs.opt_value_from_str("--seed")?,
        chips: pargs.opt_value_from_str("--chips")?.unwrap_or(1000),
        small_blind: pargs.opt_value_from_str("--small-blind")?.unwrap_or(5),
        big_blind: pargs.opt_value_from_str("--big-blind")?.unwrap_or(10),
        delay_ms: pargs.opt_value_from_str("--delay-ms")?.unwrap_or(500),
        bots: pargs.opt_value_from_str("--bots")?.unwrap_or(4),
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();
    let args = parse_args()?;

    let mut config = TableConfig::with_automated_seats(args.bots)
        .chips(args.chips)
        .blinds(args.small_blind, args.big_blind)
        .automated_delay(Duration::from_millis(args.delay_ms));
    if let Some(seed) = args.seed {
        config = config.seed(seed);
    }
    let mut game = Game::new(config)?;
    let mut pacer = Pacer::for_game(&game);
    info!("holdem {} starting with {} automated seats", holdem_table::VERSION, args.bots);

    game.new_hand()?;
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        if let Err(e) = drive_automated(&mut game, &mut pacer) {
            println!("! {e}");
        }
        let snap = game.snapshot();
        render(&snap);

        let prompt = if snap.is_human_turn() {
            format!("to call {}, min raise {} [c / r N / f / q]", snap.to_call, snap.min_raise)
        } else {
            "hand over [n / q]".to_string()
        };
        print!("{prompt} > ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let cmd = line.trim();
        match cmd {
            "" => continue,
            "q" | "quit" => break,
            "n" | "next" => match game.new_hand() {
                Ok(()) => pacer.clear(),
                Err(GameError::NotEnoughPlayers(_)) => {
                    println!("Not enough seats with chips left to deal. Game over.");
                    break;
                }
                Err(e) => println!("! {e}"),
            },
            _ => match cmd.parse::<Action>() {
                Ok(action) => {
                    if let Err(e) = game.act(action) {
                        println!("! {e}");
                    }
                }
                Err(e) => println!("! {e}"),
            },
        }
    }
    Ok(())
}

/// Let automated seats act, one paced turn at a time, until a human must act or
/// the hand is over.
fn drive_automated(game: &mut Game, pacer: &mut Pacer) -> Result<(), GameError> {
    loop {
        match pacer.poll(game, Instant::now())? {
            Some(applied) => announce(game, &applied),
            None => match pacer.due_at() {
                Some(due) => thread::sleep(due.saturating_duration_since(Instant::now())),
                None => return Ok(()),
            },
        }
    }
}

fn announce(game: &Game, applied: &Applied) {
    let name = game.players().get(applied.seat).map(|p| p.name()).unwrap_or("?");
    let what = match applied.action {
        Action::Fold => "folds".to_string(),
        Action::CallOrCheck if applied.paid == 0 => "checks".to_string(),
        Action::CallOrCheck => format!("calls {}", applied.paid),
        Action::Raise(amount) => format!("raises by {amount}"),
        _ => applied.action.to_string(),
    };
    println!("  {name} {what}");
}

fn render(snap: &TableSnapshot) {
    let board: Vec<String> = snap.board.iter().map(|c| c.to_string()).collect();
    println!();
    println!(
        "Hand #{}  {}  Pot {}  Board [{}]",
        snap.hand_number,
        snap.street.label(),
        snap.pot,
        board.join(" ")
    );
    for seat in &snap.seats {
        let marker = if snap.to_act == Some(seat.seat) { ">" } else { " " };
        let button = if seat.is_dealer { "D" } else { " " };
        let hole = seat.hole.map(|h| h.to_string()).unwrap_or_else(|| {
            if seat.active {
                "?? ??".to_string()
            } else {
                "--".to_string()
            }
        });
        let category = seat.category.map(|c| format!(" ({c})")).unwrap_or_default();
        println!(
            "{marker}{button} {:<8} {:>6} chips  bet {:>4}  {hole}{category}  {}",
            seat.name,
            seat.chips,
            seat.bet,
            seat.last_action.as_deref().unwrap_or("")
        );
    }
    if let Some(text) = &snap.settlement_text {
        println!("{text}");
    }
}
