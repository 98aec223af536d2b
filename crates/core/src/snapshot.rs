use crate::cascade::{BusyFlags, CascadePhase};
use crate::game_state::FallingBlock;
use crate::types::{Operation, GRID_HEIGHT, GRID_WIDTH};

pub type GridRows = [[Option<u32>; GRID_WIDTH as usize]; GRID_HEIGHT as usize];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FallingSnapshot {
    pub value: u32,
    pub x: i8,
    pub y: i8,
    pub id: u32,
}

impl From<FallingBlock> for FallingSnapshot {
    fn from(value: FallingBlock) -> Self {
        Self {
            value: value.value,
            x: value.x,
            y: value.y,
            id: value.id,
        }
    }
}

/// Read-only view of the game handed to renderers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub grid: GridRows,
    pub grid_generation: u32,
    pub falling: Option<FallingSnapshot>,
    pub ghost_y: Option<i8>,
    pub next_value: u32,
    pub score: u32,
    /// Score of the in-flight drop cycle, not yet committed
    pub pending_score: u32,
    pub level: u32,
    pub game_speed_ms: u32,
    pub operation: Operation,
    pub phase: CascadePhase,
    pub busy: BusyFlags,
    pub paused: bool,
    pub game_over: bool,
    pub score_save_error: bool,
    pub level_transition: bool,
    pub episode_id: u32,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused && !self.level_transition && !self.busy.any()
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            grid: [[None; GRID_WIDTH as usize]; GRID_HEIGHT as usize],
            grid_generation: 0,
            falling: None,
            ghost_y: None,
            next_value: 0,
            score: 0,
            pending_score: 0,
            level: 1,
            game_speed_ms: 0,
            operation: Operation::None,
            phase: CascadePhase::Idle,
            busy: BusyFlags::default(),
            paused: false,
            game_over: false,
            score_save_error: false,
            level_transition: false,
            episode_id: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_state::GameState;

    #[test]
    fn test_snapshot_reflects_state() {
        let mut state = GameState::new(7);
        state.start();
        state.grid_mut().set(0, 15, Some(33));

        let snap = state.snapshot();
        assert_eq!(snap.grid[15][0], Some(33));
        assert_eq!(snap.falling.map(|f| (f.x, f.y)), Some((5, 0)));
        assert_eq!(snap.ghost_y, Some(15));
        assert_eq!(snap.level, 1);
        assert_eq!(snap.game_speed_ms, 810);
        assert!(snap.playable());
    }

    #[test]
    fn test_clear_resets_to_default() {
        let mut state = GameState::new(7);
        state.start();
        let mut snap = state.snapshot();
        snap.clear();
        assert_eq!(snap, GameSnapshot::default());
    }
}
