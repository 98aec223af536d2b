//! Session configuration.

use std::env;
use std::path::PathBuf;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::types::SCORE_SAVE_TIMEOUT_MS;

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub seed: u32,
    /// Nickname written to the persisted score record
    pub nickname: String,
    /// Local JSON-lines score file
    pub score_path: PathBuf,
    /// Bound on the score persistence call at game over
    pub save_timeout: Duration,
    /// Capacity of the inbound command queue
    pub command_buffer: usize,
    /// Capacity of the outbound event queue
    pub event_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            nickname: "player".to_string(),
            score_path: PathBuf::from("prime-drop-scores.jsonl"),
            save_timeout: Duration::from_millis(SCORE_SAVE_TIMEOUT_MS),
            command_buffer: 64,
            event_buffer: 64,
        }
    }
}

impl SessionConfig {
    /// Load from environment variables, falling back to defaults.
    ///
    /// Without `PRIME_DROP_SEED` the seed is taken from the system clock.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let seed = env::var("PRIME_DROP_SEED")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or_else(clock_seed);

        let nickname = env::var("PRIME_DROP_NICKNAME")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) })
            .unwrap_or(defaults.nickname);

        let score_path = env::var("PRIME_DROP_SCORE_PATH")
            .ok()
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(PathBuf::from(s)) })
            .unwrap_or(defaults.score_path);

        let save_timeout = env::var("PRIME_DROP_SAVE_TIMEOUT_MS")
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(defaults.save_timeout);

        Self {
            seed,
            nickname,
            score_path,
            save_timeout,
            command_buffer: defaults.command_buffer,
            event_buffer: defaults.event_buffer,
        }
    }

    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_nickname(mut self, nickname: impl Into<String>) -> Self {
        self.nickname = nickname.into();
        self
    }
}

fn clock_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| (d.as_nanos() as u32) ^ (d.as_secs() as u32))
        .unwrap_or(1)
}

/// Milliseconds since the Unix epoch, 0 if the clock is before it.
pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
