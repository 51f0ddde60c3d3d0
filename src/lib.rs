//! Real-time Set: concurrent player actors racing to claim matches
//! on a shared table, arbitrated by a single dealer actor.
//!
//! ## Modules
//!
//! - [`cards`]: Card identifiers, the dealer's deck, and match oracles
//! - [`config`]: Static game parameters and their validation
//! - [`gameroom`]: Shared table, claim arbiter, player and dealer actors

pub mod cards;
pub mod config;
pub mod gameroom;

// ============================================================================
// TYPE ALIASES
// ============================================================================
/// Card identifier, `0 <= card < deck size`.
pub type Card = u16;
/// Table slot index, `0 <= slot < table size`.
pub type Slot = usize;
/// Player index, `0 <= player < player count`.
pub type PlayerId = usize;
/// Points awarded for valid matches.
pub type Score = u32;

// ============================================================================
// GAME PARAMETERS
// ============================================================================
/// Cards per claim.
pub const MATCH_SIZE: usize = 3;
/// Pending keypresses a player may buffer before input is dropped.
pub const INPUT_QUEUE: usize = 3;
/// Values each card feature can take.
pub const FEATURE_SIZE: usize = 3;
/// Features per card (color, number, shape, shading).
pub const FEATURE_COUNT: usize = 4;
/// Cards in a classic deck, `FEATURE_SIZE ^ FEATURE_COUNT`.
pub const DECK_SIZE: usize = 81;
/// Cards dealt onto the table at once.
pub const TABLE_SIZE: usize = 12;
/// Round length before the table is cleared and redealt (ms).
pub const TURN_TIMEOUT: u64 = 60_000;
/// Remaining time below which the countdown is shown as a warning (ms).
pub const TURN_WARNING: u64 = 5_000;
/// Freeze after scoring a valid match (ms).
pub const POINT_FREEZE: u64 = 1_000;
/// Freeze after claiming an invalid match (ms).
pub const PENALTY_FREEZE: u64 = 3_000;
/// Dealer wake interval while the countdown is calm (ms).
pub const TICK: u64 = 50;
/// Dealer wake interval inside the warning window (ms).
pub const WARNING_TICK: u64 = 10;
/// Delay between simulated keypresses (ms).
pub const BOT_DELAY: u64 = 100;

// ============================================================================
// RUNTIME UTILITIES
// ============================================================================
/// Initialize dual logging (terminal + file) with timestamped log files.
/// Creates `logs/` directory and writes DEBUG level to file, INFO to terminal.
#[cfg(feature = "server")]
pub fn log() {
    std::fs::create_dir_all("logs").expect("create logs directory");
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves slow")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config.clone(),
        std::fs::File::create(format!("logs/{}.log", time)).expect("create log file"),
    );
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// Register Ctrl+C handler that cancels the game instead of exiting.
/// The dealer then announces winners and joins every player before returning.
#[cfg(feature = "server")]
pub fn brb(token: tokio_util::sync::CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!();
            log::warn!("interrupt received, ending game");
            token.cancel();
        }
    });
}
