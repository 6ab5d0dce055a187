/// Shared actor behavior: grid position plus an activity flag.
///
/// Player, Coily and the ball all embed a `GridActor`. Positions are
/// signed so an actor can hold an off-grid coordinate after jumping
/// past an edge — the orchestrator needs that coordinate to match
/// disc triggers before deciding the jump was fatal.

use super::grid::PyramidGeometry;

/// The four legal player hops. Rows grow downward, so "up" moves
/// toward the apex. These are the only deltas in the movement contract.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HopDir {
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl HopDir {
    /// (d_row, d_col) for this hop.
    pub fn delta(self) -> (i32, i32) {
        match self {
            HopDir::UpLeft => (-1, -1),
            HopDir::UpRight => (-1, 0),
            HopDir::DownLeft => (1, 0),
            HopDir::DownRight => (1, 1),
        }
    }
}

/// Outcome of an attempted hop.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MoveResult {
    /// Landed on a valid cube.
    Landed { row: i32, col: i32 },
    /// Left the pyramid. The off-grid coordinate is retained.
    FellOff { row: i32, col: i32 },
    /// Actor was inactive; nothing happened.
    Inactive,
}

#[derive(Clone, Copy, Debug)]
pub struct GridActor {
    pub row: i32,
    pub col: i32,
    pub active: bool,
}

impl GridActor {
    pub fn new(row: i32, col: i32) -> Self {
        GridActor { row, col, active: true }
    }

    /// Apply a raw delta. Position always updates, even off-grid.
    pub fn offset(&mut self, d_row: i32, d_col: i32) {
        self.row += d_row;
        self.col += d_col;
    }

    pub fn place(&mut self, row: i32, col: i32) {
        self.row = row;
        self.col = col;
    }

    /// Is this actor standing on a pyramid cube?
    pub fn on_grid(&self, geom: &PyramidGeometry) -> bool {
        geom.is_valid_cell(self.row, self.col)
    }

    /// Same cell as another actor? Only meaningful if both are active;
    /// collision checks guard on that at the call site.
    pub fn same_cell(&self, other: &GridActor) -> bool {
        self.row == other.row && self.col == other.col
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hop_deltas() {
        assert_eq!(HopDir::UpLeft.delta(), (-1, -1));
        assert_eq!(HopDir::UpRight.delta(), (-1, 0));
        assert_eq!(HopDir::DownLeft.delta(), (1, 0));
        assert_eq!(HopDir::DownRight.delta(), (1, 1));
    }

    #[test]
    fn offset_retains_off_grid_position() {
        let geom = PyramidGeometry::standard();
        let mut a = GridActor::new(0, 0);
        assert!(a.on_grid(&geom));
        a.offset(-1, -1);
        assert_eq!((a.row, a.col), (-1, -1));
        assert!(!a.on_grid(&geom));
    }
}
