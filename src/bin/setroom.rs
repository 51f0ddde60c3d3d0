//! setroom Binary
//!
//! Seats bots at a Set table and plays one game to completion.
//! Ctrl+C ends the game early; winners are still announced.

use clap::Parser;
use setroom::config::Config;
use setroom::gameroom::*;
use setroom::*;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(long, help = "JSON configuration file")]
    config: Option<PathBuf>,
    #[arg(long, help = "Number of bot players")]
    players: Option<usize>,
    #[arg(long, help = "Round length in milliseconds")]
    turn_timeout: Option<u64>,
    #[arg(long, help = "Delay between bot keypresses in milliseconds")]
    bot_delay: Option<u64>,
    #[arg(long, help = "Keep the countdown running after a valid match")]
    no_reset: bool,
}

impl Args {
    fn config(&self) -> anyhow::Result<Config> {
        let mut config = match self.config.as_ref() {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };
        if let Some(players) = self.players {
            config.players = players;
        }
        if let Some(millis) = self.turn_timeout {
            config.turn_timeout_millis = millis;
        }
        if let Some(millis) = self.bot_delay {
            config.bot_delay_millis = millis;
        }
        if self.no_reset {
            config.reset_on_match = false;
        }
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = args.config()?;
    log();
    let oracle = Arc::new(config.oracle());
    let mut dealer = Dealer::new(config.clone(), oracle, Arc::new(Log))?;
    let token = dealer.terminator();
    brb(token.clone());
    let bots = dealer
        .seat()
        .into_iter()
        .map(|handle| Bot::new(handle, config.table_size, config.bot_delay()))
        .map(|bot| bot.spawn(token.clone()))
        .collect::<Vec<_>>();
    let outcome = dealer.run().await;
    for bot in bots {
        bot.await?;
    }
    for (player, score) in outcome.scores.iter().enumerate() {
        println!("P{} scored {}", player, score);
    }
    println!(
        "{} after {} rounds",
        Event::GameOver {
            winners: outcome.winners
        },
        outcome.rounds
    );
    Ok(())
}
