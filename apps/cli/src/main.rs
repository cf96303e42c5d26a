use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use client_core::{AdjustOutcome, ScoreClient, LOAD_ERROR_MESSAGE, SAVE_ERROR_MESSAGE};

#[derive(Parser, Debug)]
struct Args {
    /// Base URL of the score server.
    #[arg(long, default_value = "http://127.0.0.1:3001")]
    server_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the current score.
    Show,
    /// Increment the score.
    Up {
        #[arg(long, default_value_t = 1)]
        times: u32,
    },
    /// Decrement the score.
    Down {
        #[arg(long, default_value_t = 1)]
        times: u32,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().init();
    let args = Args::parse();

    let mut client = ScoreClient::new(args.server_url);
    if client.load_score().await.is_err() {
        bail!("{}", client.error_message().unwrap_or(LOAD_ERROR_MESSAGE));
    }

    match args.command {
        Command::Show => {}
        Command::Up { times } => adjust(&mut client, times, 1).await?,
        Command::Down { times } => adjust(&mut client, times, -1).await?,
    }

    if let Some(score) = client.score() {
        println!("Score: {score}");
    }
    Ok(())
}

async fn adjust(client: &mut ScoreClient, times: u32, direction: i64) -> Result<()> {
    for _ in 0..times {
        let outcome = if direction > 0 {
            client.increment().await
        } else {
            client.decrement().await
        };
        match outcome {
            Ok(AdjustOutcome::Saved(_)) => {}
            Ok(AdjustOutcome::Skipped) => break,
            Err(_) => bail!("{}", client.error_message().unwrap_or(SAVE_ERROR_MESSAGE)),
        }
    }
    Ok(())
}
