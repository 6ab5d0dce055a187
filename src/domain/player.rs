/// The player: grid-constrained hopper with a life counter.

use super::actor::{GridActor, HopDir, MoveResult};
use super::grid::PyramidGeometry;

pub const START_LIVES: u32 = 3;

#[derive(Clone, Debug)]
pub struct Player {
    pub actor: GridActor,
    pub lives: u32,
    start_row: i32,
    start_col: i32,
}

impl Player {
    pub fn new(start_row: i32, start_col: i32) -> Self {
        Player {
            actor: GridActor::new(start_row, start_col),
            lives: START_LIVES,
            start_row,
            start_col,
        }
    }

    /// Attempt one hop. When the target is off-grid the position still
    /// moves there — the orchestrator reads the off-grid coordinate to
    /// match disc triggers before ruling the jump fatal.
    pub fn attempt_move(&mut self, dir: HopDir, geom: &PyramidGeometry) -> MoveResult {
        if !self.actor.active {
            return MoveResult::Inactive;
        }
        let (dr, dc) = dir.delta();
        self.actor.offset(dr, dc);
        if self.actor.on_grid(geom) {
            MoveResult::Landed { row: self.actor.row, col: self.actor.col }
        } else {
            MoveResult::FellOff { row: self.actor.row, col: self.actor.col }
        }
    }

    /// One life down; input and collisions are off until respawn.
    /// The caller owns the once-per-death sequencing.
    pub fn die(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.actor.active = false;
    }

    pub fn reset_position(&mut self) {
        self.actor.place(self.start_row, self.start_col);
        self.actor.active = true;
    }

    pub fn reset_lives(&mut self) {
        self.lives = START_LIVES;
    }

    pub fn start_cell(&self) -> (i32, i32) {
        (self.start_row, self.start_col)
    }
}
