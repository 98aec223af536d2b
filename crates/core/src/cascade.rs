//! Cascade module - the state machine of one drop cycle
//!
//! ```text
//! Idle -> AwaitingLanding -> ExplodingFirst -> ApplyingGravity -> CheckingCombo -+
//!              |                                     ^                           |
//!              |                                     +------ (match found) ------+
//!              +--> Settling -> Idle     (no match / rescan finds nothing)
//!              +--> GameOver             (row-0 landing without a match)
//! ```
//!
//! The cascade never waits by itself. Whenever an explosion is produced it
//! stops with `explosion_active` set and returns the event; the owner resumes
//! it once the explosion has been shown (or its wait has elapsed). While any
//! busy flag is set the game state rejects movement, operation selection,
//! ticks and new drops.

use crate::gravity::{apply_gravity, is_settled};
use crate::grid::Grid;
use crate::matcher::{detect, find_first_match, CellSet, MatchResult};
use crate::types::{Coord, ExplosionKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CascadePhase {
    #[default]
    Idle,
    AwaitingLanding,
    /// Waiting for the landing explosion to finish
    ExplodingFirst,
    ApplyingGravity,
    /// Rescanning, or waiting for a post-gravity explosion to finish
    CheckingCombo,
    Settling,
    GameOver,
}

impl CascadePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            CascadePhase::Idle => "idle",
            CascadePhase::AwaitingLanding => "awaiting_landing",
            CascadePhase::ExplodingFirst => "exploding_first",
            CascadePhase::ApplyingGravity => "applying_gravity",
            CascadePhase::CheckingCombo => "checking_combo",
            CascadePhase::Settling => "settling",
            CascadePhase::GameOver => "game_over",
        }
    }
}

/// Mutual-exclusion markers shared by input handling and the drop timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BusyFlags {
    pub processing_landing: bool,
    pub explosion_active: bool,
    /// The cycle was started by a hard drop
    pub dropping: bool,
}

impl BusyFlags {
    pub fn any(&self) -> bool {
        self.processing_landing || self.explosion_active || self.dropping
    }
}

/// Outbound explosion, consumed by renderers and sound.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplosionEvent {
    /// 1-based index of this explosion within its drop cycle
    pub step: u32,
    pub origin: Coord,
    pub value: u32,
    pub cells: CellSet,
    pub kind: ExplosionKind,
    pub score_delta: u32,
}

impl ExplosionEvent {
    fn from_match(step: u32, result: MatchResult) -> Self {
        Self {
            step,
            origin: result.origin,
            value: result.value,
            cells: result.cells,
            kind: result.kind,
            score_delta: result.score_gained,
        }
    }
}

/// What a landing or a resume produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CascadeStep {
    /// An explosion was applied; resume once it has been shown.
    Exploding(ExplosionEvent),
    /// The cycle is over, its score committed and the next block spawned.
    Settled { score_gained: u32, level_up: bool },
    /// The game ended during this cycle.
    GameOver { final_score: u32 },
}

/// Internal transition result handed back to the game state.
#[derive(Debug)]
pub(crate) enum Resolution {
    Exploding(ExplosionEvent),
    Settle,
    GameOver,
}

#[derive(Debug, Clone, Default)]
pub struct Cascade {
    phase: CascadePhase,
    flags: BusyFlags,
    /// Score accumulated by the in-flight cycle, committed on settle
    cycle_score: u32,
    /// Matches found by rescans after gravity in this cycle
    post_gravity_matches: u32,
    explosions: u32,
}

impl Cascade {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> CascadePhase {
        self.phase
    }

    pub fn flags(&self) -> BusyFlags {
        self.flags
    }

    pub fn is_busy(&self) -> bool {
        self.flags.any()
    }

    /// An explosion is outstanding and the cycle can be resumed.
    pub fn is_waiting(&self) -> bool {
        self.flags.explosion_active
    }

    pub fn cycle_score(&self) -> u32 {
        self.cycle_score
    }

    pub fn explosions(&self) -> u32 {
        self.explosions
    }

    pub(crate) fn begin_landing(&mut self, hard_drop: bool) {
        debug_assert_eq!(self.phase, CascadePhase::Idle, "overlapping drop cycles");
        self.phase = CascadePhase::AwaitingLanding;
        self.flags = BusyFlags {
            processing_landing: true,
            explosion_active: false,
            dropping: hard_drop,
        };
        self.cycle_score = 0;
        self.post_gravity_matches = 0;
        self.explosions = 0;
    }

    /// Run detection at the landing coordinate.
    pub(crate) fn resolve_landing(
        &mut self,
        grid: &mut Grid,
        x: i8,
        y: i8,
        value: u32,
        top_row: bool,
    ) -> Resolution {
        debug_assert_eq!(self.phase, CascadePhase::AwaitingLanding);

        let result = detect(grid, x, y, value, false);
        if result.matched {
            self.phase = CascadePhase::ExplodingFirst;
            return self.explode(result);
        }

        if top_row {
            log::debug!("landing at row 0 without a match at ({x}, {y})");
            self.enter_game_over();
            return Resolution::GameOver;
        }

        self.phase = CascadePhase::Settling;
        Resolution::Settle
    }

    /// Continue after an explosion: gravity, then a full rescan.
    ///
    /// Only the first match found by the rescan is resolved; the scan restarts
    /// after every explosion.
    pub(crate) fn resume(&mut self, grid: &mut Grid) -> Resolution {
        debug_assert!(self.is_waiting(), "resume without an outstanding explosion");
        self.flags.explosion_active = false;

        self.phase = CascadePhase::ApplyingGravity;
        *grid = apply_gravity(grid);
        debug_assert!(is_settled(grid));

        self.phase = CascadePhase::CheckingCombo;
        let Some((x, y, value)) = find_first_match(grid) else {
            self.phase = CascadePhase::Settling;
            return Resolution::Settle;
        };

        self.post_gravity_matches += 1;
        let is_combo = self.post_gravity_matches > 1;
        let result = detect(grid, x, y, value, is_combo);
        debug_assert!(result.matched, "rescan reported a match detect did not confirm");
        self.explode(result)
    }

    /// Settling -> Idle. Returns the cycle score to commit.
    pub(crate) fn finish(&mut self) -> u32 {
        debug_assert_eq!(self.phase, CascadePhase::Settling);
        self.phase = CascadePhase::Idle;
        self.flags = BusyFlags::default();
        std::mem::take(&mut self.cycle_score)
    }

    pub(crate) fn enter_game_over(&mut self) {
        self.phase = CascadePhase::GameOver;
        self.flags = BusyFlags::default();
    }

    fn explode(&mut self, result: MatchResult) -> Resolution {
        self.explosions += 1;
        self.cycle_score = self.cycle_score.saturating_add(result.score_gained);
        self.flags.explosion_active = true;
        let event = ExplosionEvent::from_match(self.explosions, result);
        log::debug!(
            "explosion #{} {} at {:?}: {} cells, +{}",
            event.step,
            event.kind.as_str(),
            event.origin,
            event.cells.len(),
            event.score_delta
        );
        Resolution::Exploding(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landing_without_match_settles() {
        let mut cascade = Cascade::new();
        let mut grid = Grid::with_values(&[(5, 15, 7)]);

        cascade.begin_landing(false);
        assert!(cascade.is_busy());
        assert!(matches!(
            cascade.resolve_landing(&mut grid, 5, 15, 7, false),
            Resolution::Settle
        ));
        assert_eq!(cascade.phase(), CascadePhase::Settling);
        assert_eq!(cascade.finish(), 0);
        assert_eq!(cascade.phase(), CascadePhase::Idle);
        assert!(!cascade.is_busy());
    }

    #[test]
    fn test_top_row_landing_without_match_is_game_over() {
        let mut cascade = Cascade::new();
        let mut grid = Grid::with_values(&[(5, 0, 9)]);

        cascade.begin_landing(true);
        assert!(matches!(
            cascade.resolve_landing(&mut grid, 5, 0, 9, true),
            Resolution::GameOver
        ));
        assert_eq!(cascade.phase(), CascadePhase::GameOver);
        assert!(!cascade.is_busy());
    }

    #[test]
    fn test_first_explosion_then_quiet_rescan() {
        let mut cascade = Cascade::new();
        let mut grid = Grid::with_values(&[(5, 15, 12), (5, 14, 12)]);

        cascade.begin_landing(false);
        let Resolution::Exploding(event) = cascade.resolve_landing(&mut grid, 5, 14, 12, false)
        else {
            panic!("expected an explosion");
        };
        assert_eq!(event.step, 1);
        assert_eq!(event.kind, ExplosionKind::Normal);
        assert_eq!(cascade.phase(), CascadePhase::ExplodingFirst);
        assert!(cascade.is_waiting());

        assert!(matches!(cascade.resume(&mut grid), Resolution::Settle));
        assert_eq!(cascade.finish(), 80);
    }

    #[test]
    fn test_combo_counter_resets_per_cycle() {
        let mut cascade = Cascade::new();
        cascade.post_gravity_matches = 3;
        cascade.begin_landing(false);
        assert_eq!(cascade.post_gravity_matches, 0);
        assert_eq!(cascade.explosions(), 0);
    }
}
