use crate::Card;
use crate::cards::SetOracle;
use serde::Deserialize;
use serde::Serialize;
use std::path::Path;
use std::time::Duration;

/// Errors that can occur while loading or validating a configuration.
/// All of them are fatal to process start: no actor runs on a bad config.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    NoPlayers,
    TableTooSmall { table: usize },
    TableExceedsDeck { table: usize, deck: usize },
    DeckExceedsFeatures { deck: usize, capacity: usize },
    DeckExceedsCardRange { deck: usize, max: usize },
    FeaturesOverflow { size: usize, count: usize },
    DeckMismatch { expected: usize },
    ZeroTimeout,
    WarningExceedsTimeout { warning: u64, timeout: u64 },
    ZeroTick,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "cannot read config: {}", e),
            Self::Parse(e) => write!(f, "cannot parse config: {}", e),
            Self::NoPlayers => write!(f, "at least one player is required"),
            Self::TableTooSmall { table } => {
                write!(f, "table size {} cannot hold a match", table)
            }
            Self::TableExceedsDeck { table, deck } => {
                write!(f, "table size {} exceeds deck size {}", table, deck)
            }
            Self::DeckExceedsFeatures { deck, capacity } => write!(
                f,
                "deck size {} exceeds the {} cards the features can encode",
                deck, capacity
            ),
            Self::DeckExceedsCardRange { deck, max } => {
                write!(f, "deck size {} exceeds the {} card ids available", deck, max)
            }
            Self::FeaturesOverflow { size, count } => write!(
                f,
                "{} features of {} values each cannot be encoded",
                count, size
            ),
            Self::DeckMismatch { expected } => write!(
                f,
                "deck must hold every card from 0 to {} exactly once",
                expected.saturating_sub(1)
            ),
            Self::ZeroTimeout => write!(f, "turn timeout must be positive"),
            Self::WarningExceedsTimeout { warning, timeout } => write!(
                f,
                "warning window {}ms exceeds turn timeout {}ms",
                warning, timeout
            ),
            Self::ZeroTick => write!(f, "tick intervals must be positive"),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

/// Static game parameters, loaded once before any actor starts.
/// Durations are in milliseconds, matching the JSON file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Config {
    pub deck_size: usize,
    pub table_size: usize,
    #[serde(alias = "playerCount")]
    pub players: usize,
    pub feature_size: usize,
    pub feature_count: usize,
    pub turn_timeout_millis: u64,
    pub turn_timeout_warning_millis: u64,
    pub point_freeze_millis: u64,
    pub penalty_freeze_millis: u64,
    pub tick_millis: u64,
    pub warning_tick_millis: u64,
    /// Restart the round countdown whenever a valid match is scored.
    pub reset_on_match: bool,
    pub bot_delay_millis: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            deck_size: crate::DECK_SIZE,
            table_size: crate::TABLE_SIZE,
            players: 2,
            feature_size: crate::FEATURE_SIZE,
            feature_count: crate::FEATURE_COUNT,
            turn_timeout_millis: crate::TURN_TIMEOUT,
            turn_timeout_warning_millis: crate::TURN_WARNING,
            point_freeze_millis: crate::POINT_FREEZE,
            penalty_freeze_millis: crate::PENALTY_FREEZE,
            tick_millis: crate::TICK,
            warning_tick_millis: crate::WARNING_TICK,
            reset_on_match: true,
            bot_delay_millis: crate::BOT_DELAY,
        }
    }
}

impl Config {
    /// Read a JSON configuration file. Missing keys fall back to defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config = serde_json::from_str::<Self>(&text)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.players == 0 {
            return Err(ConfigError::NoPlayers);
        }
        if self.table_size < crate::MATCH_SIZE {
            return Err(ConfigError::TableTooSmall {
                table: self.table_size,
            });
        }
        if self.table_size > self.deck_size {
            return Err(ConfigError::TableExceedsDeck {
                table: self.table_size,
                deck: self.deck_size,
            });
        }
        let ids = Card::MAX as usize + 1;
        if self.deck_size > ids {
            return Err(ConfigError::DeckExceedsCardRange {
                deck: self.deck_size,
                max: ids,
            });
        }
        let capacity = self
            .oracle()
            .capacity()
            .ok_or(ConfigError::FeaturesOverflow {
                size: self.feature_size,
                count: self.feature_count,
            })?;
        if self.deck_size > capacity {
            return Err(ConfigError::DeckExceedsFeatures {
                deck: self.deck_size,
                capacity,
            });
        }
        if self.turn_timeout_millis == 0 {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.turn_timeout_warning_millis > self.turn_timeout_millis {
            return Err(ConfigError::WarningExceedsTimeout {
                warning: self.turn_timeout_warning_millis,
                timeout: self.turn_timeout_millis,
            });
        }
        if self.tick_millis == 0 || self.warning_tick_millis == 0 {
            return Err(ConfigError::ZeroTick);
        }
        Ok(())
    }

    /// Set-rules oracle matching this configuration's card encoding.
    pub fn oracle(&self) -> SetOracle {
        SetOracle::new(self.feature_size, self.feature_count)
    }

    pub fn turn_timeout(&self) -> Duration {
        Duration::from_millis(self.turn_timeout_millis)
    }
    pub fn turn_warning(&self) -> Duration {
        Duration::from_millis(self.turn_timeout_warning_millis)
    }
    pub fn point_freeze(&self) -> Duration {
        Duration::from_millis(self.point_freeze_millis)
    }
    pub fn penalty_freeze(&self) -> Duration {
        Duration::from_millis(self.penalty_freeze_millis)
    }
    pub fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_millis)
    }
    pub fn warning_tick(&self) -> Duration {
        Duration::from_millis(self.warning_tick_millis)
    }
    pub fn bot_delay(&self) -> Duration {
        Duration::from_millis(self.bot_delay_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[test]
    fn default_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.deck_size, 81);
    }
    #[test]
    fn table_larger_than_deck() {
        let config = Config {
            deck_size: 5,
            table_size: 6,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::TableExceedsDeck { table: 6, deck: 5 })
        ));
    }
    #[test]
    fn no_players() {
        let config = Config {
            players: 0,
            ..Config::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::NoPlayers)));
    }
    #[test]
    fn deck_beyond_encoding() {
        let config = Config {
            deck_size: 82,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DeckExceedsFeatures { deck: 82, capacity: 81 })
        ));
    }
    #[test]
    fn deck_beyond_card_ids() {
        let config = Config {
            feature_count: 11,
            deck_size: 70_000,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::DeckExceedsCardRange { deck: 70_000, max: 65_536 })
        ));
    }
    #[test]
    fn features_too_large_to_encode() {
        let config = Config {
            feature_size: 10,
            feature_count: 30,
            ..Config::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::FeaturesOverflow { size: 10, count: 30 })
        ));
    }
    #[test]
    fn warning_beyond_timeout() {
        let config = Config {
            turn_timeout_millis: 1_000,
            turn_timeout_warning_millis: 2_000,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }
    #[test]
    fn parse_partial_json() {
        let json = r#"{ "players": 4, "turnTimeoutMillis": 30000, "resetOnMatch": false }"#;
        let config = serde_json::from_str::<Config>(json).expect("parse");
        assert_eq!(config.players, 4);
        assert_eq!(config.turn_timeout(), Duration::from_secs(30));
        assert!(!config.reset_on_match);
        assert_eq!(config.table_size, crate::TABLE_SIZE);
    }
    #[test]
    fn player_count_alias() {
        let config = serde_json::from_str::<Config>(r#"{ "playerCount": 3 }"#).expect("parse");
        assert_eq!(config.players, 3);
    }
    #[test]
    fn load_missing_file() {
        assert!(matches!(
            Config::load("/definitely/not/here.json"),
            Err(ConfigError::Io(_))
        ));
    }
}
