//! Game state module - manages the complete game state
//!
//! This module ties together all core components: grid, block generator,
//! operations, match detection, gravity, progression and the cascade.
//! It owns every mutation entry point; renderers only ever see snapshots.

use crate::cascade::{Cascade, CascadeStep, Resolution};
use crate::grid::Grid;
use crate::operation;
use crate::rng::BlockGenerator;
use crate::scoring::{level_for_score, speed_for_score};
use crate::snapshot::{FallingSnapshot, GameSnapshot};
use crate::types::{GameAction, Operation};

/// The single player-controlled block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FallingBlock {
    pub value: u32,
    pub x: i8,
    pub y: i8,
    pub id: u32,
}

impl FallingBlock {
    /// Whether the next downward step is blocked by the floor or a filled cell
    pub fn is_grounded(&self, grid: &Grid) -> bool {
        !grid.is_free(self.x, self.y + 1)
    }
}

/// Result of applying one input command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Rejected by a busy/pause/game-over flag or by collision; nothing changed.
    Ignored,
    /// State changed without a landing.
    Applied,
    /// The falling block landed and a drop cycle started.
    Landed(CascadeStep),
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    grid: Grid,
    falling: Option<FallingBlock>,
    generator: BlockGenerator,
    cascade: Cascade,
    score: u32,
    selected_operation: Operation,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    paused: bool,
    game_over: bool,
    started: bool,
    /// Level-transition overlay is up; blocks the drop timer and input.
    level_transition: bool,
    /// The final score could not be persisted.
    score_save_error: bool,
}

impl GameState {
    /// Create a new game with the given RNG seed
    pub fn new(seed: u32) -> Self {
        Self {
            grid: Grid::new(),
            falling: None,
            generator: BlockGenerator::new(seed),
            cascade: Cascade::new(),
            score: 0,
            selected_operation: Operation::None,
            episode_id: 0,
            paused: false,
            game_over: false,
            started: false,
            level_transition: false,
            score_save_error: false,
        }
    }

    /// Start the game and spawn the first block
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        if !self.spawn_block() {
            self.enter_game_over();
        }
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Derived from score on every call
    pub fn level(&self) -> u32 {
        level_for_score(self.score)
    }

    /// Drop interval in ms, derived from score on every call
    pub fn game_speed_ms(&self) -> u32 {
        speed_for_score(self.score)
    }

    pub fn selected_operation(&self) -> Operation {
        self.selected_operation
    }

    pub fn falling(&self) -> Option<FallingBlock> {
        self.falling
    }

    pub fn next_value(&self) -> u32 {
        self.generator.peek_value()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Direct grid access for scripted scenarios and tests.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn cascade(&self) -> &Cascade {
        &self.cascade
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn level_transition(&self) -> bool {
        self.level_transition
    }

    pub fn score_save_error(&self) -> bool {
        self.score_save_error
    }

    /// Record that persisting the final score failed or timed out.
    pub fn mark_score_save_failed(&mut self) {
        self.score_save_error = true;
    }

    /// Hide the level-transition overlay and let the drop timer run again.
    pub fn dismiss_level_transition(&mut self) {
        self.level_transition = false;
    }

    /// Replace the falling block's value (scripted scenarios and tests).
    pub fn set_falling_value(&mut self, value: u32) -> bool {
        match self.falling.as_mut() {
            Some(block) if !self.cascade.is_busy() => {
                block.value = value;
                true
            }
            _ => false,
        }
    }

    /// Whether movement, operation selection, drops and ticks are accepted.
    pub fn accepts_input(&self) -> bool {
        self.started
            && !self.paused
            && !self.game_over
            && !self.level_transition
            && !self.cascade.is_busy()
            && self.falling.is_some()
    }

    /// Whether the periodic drop timer should run.
    pub fn drop_timer_active(&self) -> bool {
        self.accepts_input()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        out.grid = self.grid.to_rows();
        out.grid_generation = self.grid.generation();
        out.falling = self.falling.map(FallingSnapshot::from);
        out.ghost_y = self.ghost_y();
        out.next_value = self.generator.peek_value();
        out.score = self.score;
        out.pending_score = self.cascade.cycle_score();
        out.level = self.level();
        out.game_speed_ms = self.game_speed_ms();
        out.operation = self.selected_operation;
        out.phase = self.cascade.phase();
        out.busy = self.cascade.flags();
        out.paused = self.paused;
        out.game_over = self.game_over;
        out.score_save_error = self.score_save_error;
        out.level_transition = self.level_transition;
        out.episode_id = self.episode_id;
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Spawn a new falling block at the top-center column.
    ///
    /// Returns false when the spawn cell is already filled.
    fn spawn_block(&mut self) -> bool {
        debug_assert!(self.falling.is_none(), "two falling blocks");
        let block = self.generator.spawn();
        if !self.grid.is_free(block.x, block.y) {
            return false;
        }
        self.falling = Some(block);
        true
    }

    /// Row a hard drop would land on
    pub fn ghost_y(&self) -> Option<i8> {
        let block = self.falling?;
        let mut y = block.y;
        while self.grid.is_free(block.x, y + 1) {
            y += 1;
        }
        Some(y)
    }

    /// Try to move the falling block sideways
    pub(crate) fn try_move(&mut self, dx: i8) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let Some(block) = self.falling else {
            return false;
        };
        if !self.grid.is_free(block.x + dx, block.y) {
            return false;
        }
        self.falling = Some(FallingBlock {
            x: block.x + dx,
            ..block
        });
        true
    }

    /// Choose the operation used by the next landing.
    pub fn select_operation(&mut self, op: Operation) -> bool {
        if !self.accepts_input() || !op.is_selectable() {
            return false;
        }
        self.selected_operation = op;
        true
    }

    /// Soft automatic descent by one row; lands when blocked.
    pub fn tick(&mut self) -> ActionOutcome {
        if !self.accepts_input() {
            return ActionOutcome::Ignored;
        }
        let Some(block) = self.falling else {
            return ActionOutcome::Ignored;
        };
        if block.is_grounded(&self.grid) {
            return ActionOutcome::Landed(self.land(block, false));
        }
        self.falling = Some(FallingBlock {
            y: block.y + 1,
            ..block
        });
        ActionOutcome::Applied
    }

    /// Hard drop the falling block to its lowest legal row and land it.
    pub fn hard_drop(&mut self) -> ActionOutcome {
        if !self.accepts_input() {
            return ActionOutcome::Ignored;
        }
        let (Some(block), Some(ghost_y)) = (self.falling, self.ghost_y()) else {
            return ActionOutcome::Ignored;
        };
        let dropped = FallingBlock { y: ghost_y, ..block };
        ActionOutcome::Landed(self.land(dropped, true))
    }

    /// Continue the drop cycle after an explosion has been shown.
    ///
    /// Returns None when no explosion is outstanding.
    pub fn resume_cascade(&mut self) -> Option<CascadeStep> {
        if !self.cascade.is_waiting() {
            return None;
        }
        let resolution = self.cascade.resume(&mut self.grid);
        Some(self.after_resolution(resolution))
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: GameAction) -> ActionOutcome {
        let changed = match action {
            GameAction::MoveLeft => self.try_move(-1),
            GameAction::MoveRight => self.try_move(1),
            GameAction::SelectOperation(op) => self.select_operation(op),
            GameAction::Drop => return self.hard_drop(),
            GameAction::Tick => return self.tick(),
            GameAction::Pause => {
                if self.game_over || !self.started {
                    false
                } else {
                    self.paused = !self.paused;
                    true
                }
            }
            GameAction::Restart => {
                if self.cascade.is_busy() || self.level_transition {
                    false
                } else {
                    let seed = self.generator.seed();
                    let next_episode = self.episode_id.wrapping_add(1);
                    *self = Self::new(seed);
                    self.episode_id = next_episode;
                    self.start();
                    true
                }
            }
        };

        if changed {
            ActionOutcome::Applied
        } else {
            ActionOutcome::Ignored
        }
    }

    /// Merge the block into the grid and start a drop cycle.
    fn land(&mut self, block: FallingBlock, hard_drop: bool) -> CascadeStep {
        self.falling = None;
        self.cascade.begin_landing(hard_drop);

        let op = self.selected_operation;
        let below = self.grid.value(block.x, block.y + 1);
        let (x, y, value) = match below {
            Some(cell_value) if op.combines() => {
                let combined = operation::apply(block.value, cell_value, op);
                self.grid.set(block.x, block.y + 1, Some(combined));
                self.grid.set(block.x, block.y, Some(block.value));
                self.selected_operation = Operation::None;
                log::debug!(
                    "{} {} {} = {} at ({}, {})",
                    block.value,
                    op.symbol(),
                    cell_value,
                    combined,
                    block.x,
                    block.y + 1
                );
                (block.x, block.y + 1, combined)
            }
            _ => {
                self.grid.set(block.x, block.y, Some(block.value));
                (block.x, block.y, block.value)
            }
        };

        let resolution =
            self.cascade
                .resolve_landing(&mut self.grid, x, y, value, block.y == 0);
        self.after_resolution(resolution)
    }

    fn after_resolution(&mut self, resolution: Resolution) -> CascadeStep {
        match resolution {
            Resolution::Exploding(event) => CascadeStep::Exploding(event),
            Resolution::Settle => self.settle(),
            Resolution::GameOver => self.enter_game_over(),
        }
    }

    /// Commit the cycle score, recompute progression, spawn the next block.
    fn settle(&mut self) -> CascadeStep {
        let gained = self.cascade.finish();
        let previous_level = self.level();
        self.score = self.score.saturating_add(gained);
        self.selected_operation = Operation::None;

        let level_up = self.level() > previous_level;
        if level_up {
            self.level_transition = true;
            log::info!(
                "level {} reached at score {} ({}ms per row)",
                self.level(),
                self.score,
                self.game_speed_ms()
            );
        }

        if !self.spawn_block() {
            return self.enter_game_over();
        }

        CascadeStep::Settled {
            score_gained: gained,
            level_up,
        }
    }

    fn enter_game_over(&mut self) -> CascadeStep {
        self.game_over = true;
        self.falling = None;
        self.level_transition = false;
        self.cascade.enter_game_over();
        log::info!("game over with score {}", self.score);
        CascadeStep::GameOver {
            final_score: self.score,
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}
