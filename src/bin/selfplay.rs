// Engine-vs-engine self-play for tuning difficulty levels
//
// Usage:
//   cargo run --release --bin selfplay -- [options]
//
// Options:
//   --games <N>        Number of games to play (default: 20)
//   --levels <A,B>     Difficulty for X and O (default: 5,5)
//   --seed <S>         Base seed; game i uses S + i (default: 0)
//   --config <path>    Path to Engine.toml (default: Engine.toml)

use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::env;
use std::process;
use std::time::Instant;

use queue_ultimate_ttt::bot::Bot;
use queue_ultimate_ttt::config::Config;
use queue_ultimate_ttt::eval::Perspective;
use queue_ultimate_ttt::policy::{Difficulty, Policy};
use queue_ultimate_ttt::scoring::{board_tally, calculate_score, result_for, ScoreParams};
use queue_ultimate_ttt::types::{Outcome, Player};

fn print_usage() {
    eprintln!("Queue Ultimate Tic-Tac-Toe Self-Play");
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("  selfplay [OPTIONS]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("  --games <N>             Number of games to play (default: 20)");
    eprintln!("  --levels <A,B>          Difficulty for X and O, 1-10 (default: 5,5)");
    eprintln!("  --seed <S>              Base seed, game i uses S + i (default: 0)");
    eprintln!("  --config <path>         Path to Engine.toml (default: Engine.toml)");
    eprintln!("  --help                  Show this help message");
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("  # Level 3 against level 8, 100 games");
    eprintln!("  selfplay --games 100 --levels 3,8");
}

fn parse_levels(s: &str) -> Result<(Difficulty, Difficulty), String> {
    let levels: Vec<Difficulty> = s
        .split(',')
        .map(|l| {
            l.trim()
                .parse::<u8>()
                .map_err(|e| format!("Invalid level '{}': {}", l, e))
                .and_then(Difficulty::try_from)
        })
        .collect::<Result<_, _>>()?;

    match levels.as_slice() {
        [x, o] => Ok((*x, *o)),
        _ => Err(format!("Expected two levels 'A,B', got '{}'", s)),
    }
}

fn parse_value<T: std::str::FromStr>(args: &[String], i: usize, flag: &str) -> T
where
    T::Err: std::fmt::Display,
{
    let Some(raw) = args.get(i + 1) else {
        eprintln!("Error: {} requires a value", flag);
        process::exit(1);
    };
    match raw.parse::<T>() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: invalid value '{}' for {}: {}", raw, flag, e);
            process::exit(1);
        }
    }
}

/// Summary of one finished game
struct GameRecord {
    outcome: Outcome,
    moves: u32,
    x_points: u64,
}

fn play_game(
    bot: &Bot,
    game: u64,
    seed: u64,
    x_level: Difficulty,
    o_level: Difficulty,
) -> GameRecord {
    let start_time = Instant::now();
    let mut rng = StdRng::seed_from_u64(seed.wrapping_add(game));
    let config = bot.config();
    let x_policy = Policy::new(config, Perspective::new(Player::X, Player::O));
    let o_policy = Policy::new(config, Perspective::new(Player::O, Player::X));

    let mut state = bot.new_game(Some(2), &mut rng);
    let mut moves = 0u32;
    let mut x_moves = 0u32;

    while !state.is_over() {
        let mover = state.current_player();
        let (policy, level) = if mover == Player::X {
            (&x_policy, x_level)
        } else {
            (&o_policy, o_level)
        };

        let Some(mv) = policy.choose_move(&state, level, &mut rng) else {
            warn!("Game {}: {} has no legal moves", game, mover);
            break;
        };
        state = state.apply_move(mv);
        moves += 1;
        if mover == Player::X {
            x_moves += 1;
        }
    }

    bot.end(&state);

    let (boards_won, boards_lost) = board_tally(&state, Player::X);
    let x_points = calculate_score(&ScoreParams {
        player_moves: x_moves,
        total_seconds: start_time.elapsed().as_secs_f64(),
        boards_won,
        boards_lost,
        result: result_for(&state, Player::X),
        difficulty: o_level,
        hell_mode: false,
    });

    info!(
        "Game {}: {:?} after {} moves ({} boards to X, {} to O) in {}ms",
        game,
        state.outcome(),
        moves,
        boards_won,
        boards_lost,
        start_time.elapsed().as_millis()
    );

    GameRecord {
        outcome: state.outcome(),
        moves,
        x_points,
    }
}

fn main() {
    // We default to 'info' level logging. But if the `RUST_LOG` environment variable is set,
    // we keep that value instead.
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.contains(&"--help".to_string()) {
        print_usage();
        process::exit(0);
    }

    let mut games: u64 = 20;
    let mut levels = (Difficulty::clamped(5), Difficulty::clamped(5));
    let mut seed: u64 = 0;
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--games" => {
                games = parse_value(&args, i, "--games");
                i += 1;
            }
            "--levels" => {
                let raw: String = parse_value(&args, i, "--levels");
                levels = match parse_levels(&raw) {
                    Ok(l) => l,
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        process::exit(1);
                    }
                };
                i += 1;
            }
            "--seed" => {
                seed = parse_value(&args, i, "--seed");
                i += 1;
            }
            "--config" => {
                config_path = Some(parse_value(&args, i, "--config"));
                i += 1;
            }
            other => {
                eprintln!("Error: unknown option '{}'", other);
                print_usage();
                process::exit(1);
            }
        }
        i += 1;
    }

    let config = match config_path {
        Some(path) => match Config::from_file(&path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error: {}", e);
                process::exit(1);
            }
        },
        None => Config::load_or_default(),
    };

    let (x_level, o_level) = levels;
    info!(
        "Playing {} games: X at level {} vs O at level {} on {} threads",
        games,
        x_level,
        o_level,
        rayon::current_num_threads()
    );

    let bot = Bot::new(config);
    let start_time = Instant::now();
    let records: Vec<GameRecord> = (0..games)
        .into_par_iter()
        .map(|game| play_game(&bot, game, seed, x_level, o_level))
        .collect();

    let mut x_wins = 0;
    let mut o_wins = 0;
    let mut draws = 0;
    for record in &records {
        match record.outcome {
            Outcome::Won(Player::X) => x_wins += 1,
            Outcome::Won(_) => o_wins += 1,
            Outcome::Draw | Outcome::InProgress => draws += 1,
        }
    }
    let total_moves: u64 = records.iter().map(|r| r.moves as u64).sum();
    let total_points: u64 = records.iter().map(|r| r.x_points).sum();
    let played = records.len().max(1) as u64;

    println!("=== Self-play: X level {} vs O level {} ===", x_level, o_level);
    println!("Games:      {}", records.len());
    println!("X wins:     {}", x_wins);
    println!("O wins:     {}", o_wins);
    println!("Draws:      {}", draws);
    println!("Avg moves:  {:.1}", total_moves as f64 / played as f64);
    println!(
        "X points:   {} total, {} per game",
        total_points,
        total_points / played
    );
    println!("Elapsed:    {}ms", start_time.elapsed().as_millis());
}
