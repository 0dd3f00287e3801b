use anyhow::{anyhow, Context, Result};
use chesstempo::{ClientConfig, Color, GameClient, GameState, NativeTransport, DEMO_FEN};
use futures::future::try_join_all;
use rand::seq::SliceRandom;
use std::env;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::time::{sleep, Duration};

const USAGE: &str = "Usage: chesstempo [--list | --resign <id> | --resign-all | --continue <id>] [--white | --black] [--demo]";

type Client = GameClient<NativeTransport>;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().skip(1).collect();
    if has_flag(&args, "--help") {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = ClientConfig::from_env();
    let client = GameClient::new(NativeTransport::new(&config.base_url));

    if has_flag(&args, "--resign") {
        let id = flag_value(&args, "--resign")
            .ok_or_else(|| anyhow!("Please include the identifier of the game.\n{}", USAGE))?;
        client.resign_game(id).await.context("Failed to resign game")?;
        return Ok(());
    }

    if has_flag(&args, "--resign-all") {
        resign_all(&client).await?;
        return Ok(());
    }

    if has_flag(&args, "--list") {
        let games = client.list_games().await.context("Failed to list games")?;
        for id in games {
            println!("{}", id);
        }
        return Ok(());
    }

    let identifier = match continued_game(&args)? {
        Some(id) => id.to_string(),
        None => {
            let color = if has_flag(&args, "--white") {
                Some(Color::White)
            } else if has_flag(&args, "--black") {
                Some(Color::Black)
            } else {
                None
            };
            let fen = has_flag(&args, "--demo").then_some(DEMO_FEN);
            client
                .start_game(color, fen)
                .await
                .context("Failed to start game")?
        }
    };
    println!("Game started {}", identifier);

    // Set up graceful shutdown handler for Ctrl+C
    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        r.store(false, Ordering::SeqCst);
        println!("\nStopping...");
    })
    .context("Error setting Ctrl-C handler")?;

    play(&client, &identifier, &running).await
}

/// Plays random legal moves until the game is over or `running` is cleared.
async fn play(client: &Client, identifier: &str, running: &AtomicBool) -> Result<()> {
    while running.load(Ordering::SeqCst) {
        let state = match client.fetch_game(identifier).await {
            Ok(state) => state,
            Err(e) => {
                eprintln!("Error! {}", e);
                break;
            }
        };
        draw(&state);
        println!("Game: {}", identifier);

        if state.is_over() {
            println!("Done!");
            println!("Outcome: {}", state.outcome.as_deref().unwrap_or_default());
            break;
        }

        // ValidMoves is only sent on the user's turn.
        let pick = state
            .valid_moves
            .as_deref()
            .and_then(|moves| moves.choose(&mut rand::thread_rng()))
            .cloned();
        match pick.as_deref().and_then(split_move) {
            Some((orig, dest)) => {
                client
                    .move_game(identifier, orig, dest)
                    .await
                    .with_context(|| format!("Failed to play {}{}", orig, dest))?;
                println!("Last move: {}{}", orig, dest);
            }
            None => println!("Waiting for the machine..."),
        }
        println!("Outcome: {}", state.outcome.as_deref().unwrap_or("?"));
        if let (Some(turn), Some(color)) = (state.turn, state.color.as_deref()) {
            println!("{:?} {}", turn, color);
        }

        sleep(Duration::from_secs(1)).await;
    }
    Ok(())
}

/// Resigns every open game. The requests go out together and finish in
/// whatever order the server answers.
async fn resign_all(client: &Client) -> Result<()> {
    let games = client.list_games().await.context("Failed to list games")?;
    try_join_all(games.iter().map(|id| client.resign_game(id)))
        .await
        .context("Failed to resign games")?;
    println!("Resigned {} game(s)", games.len());
    Ok(())
}

fn draw(state: &GameState) {
    // Clear the terminal before redrawing.
    print!("\x1B[2J\x1B[1;1H");
    match (&state.board, &state.fen) {
        (Some(board), _) => println!("{}", board),
        (None, Some(fen)) => println!("{}", fen),
        (None, None) => println!("(no position)"),
    }
}

/// Game named by `--continue`, if the flag is given. The flag without an
/// identifier is an error rather than a new game.
fn continued_game(args: &[String]) -> Result<Option<&str>> {
    if !has_flag(args, "--continue") {
        return Ok(None);
    }
    flag_value(args, "--continue")
        .map(Some)
        .ok_or_else(|| anyhow!("Please include the identifier of the game.\n{}", USAGE))
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|arg| arg == flag)
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
        .filter(|value| !value.starts_with("--"))
}

/// Splits a UCI move (`e2e4`, `e7e8q`) into origin and destination. The
/// destination keeps any promotion suffix so the pair concatenates back to
/// the original move.
fn split_move(uci: &str) -> Option<(&str, &str)> {
    if uci.len() < 4 || !uci.is_char_boundary(2) {
        return None;
    }
    Some(uci.split_at(2))
}
