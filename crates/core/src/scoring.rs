//! Scoring module - progression derived from cumulative score
//!
//! Level and drop interval are pure functions of score. The game state never
//! stores them independently; it recomputes both after every score change.
//! Per-explosion scoring lives with the match rules in [`crate::matcher`].

use crate::types::{
    BASE_SPEED_MS, EARLY_LEVEL_CAP, EARLY_LEVEL_STEP_MS, LATE_LEVEL_STEP_MS, MIN_SPEED_MS,
    SCORE_PER_LEVEL,
};

/// Level management
/// Level increases every 1300 points, starting at 1
pub fn level_for_score(score: u32) -> u32 {
    score / SCORE_PER_LEVEL + 1
}

/// Drop interval for a level (milliseconds per row), floored at 200ms
pub fn game_speed_ms(level: u32) -> u32 {
    let reduction = if level <= EARLY_LEVEL_CAP {
        level.saturating_mul(EARLY_LEVEL_STEP_MS)
    } else {
        (EARLY_LEVEL_CAP * EARLY_LEVEL_STEP_MS)
            .saturating_add((level - EARLY_LEVEL_CAP).saturating_mul(LATE_LEVEL_STEP_MS))
    };
    BASE_SPEED_MS.saturating_sub(reduction).max(MIN_SPEED_MS)
}

/// Drop interval for a score
pub fn speed_for_score(score: u32) -> u32 {
    game_speed_ms(level_for_score(score))
}

/// Title recorded alongside a final score
pub fn title_for_level(level: u32) -> &'static str {
    match level {
        0..=1 => "Novice",
        2..=3 => "Apprentice",
        4..=5 => "Calculator",
        6..=8 => "Prime Hunter",
        9..=12 => "Number Sage",
        _ => "Prime Master",
    }
}
