/// Coily — the pursuit adversary.
///
/// Two modes:
///   1. **Chase** — hop toward the player's cell (default).
///   2. **Decoy** — after the player rides a disc, chase the cell the
///      player jumped from instead; on arrival, replay the player's
///      off-grid delta and fall off the pyramid.
///
/// Each hop considers at most four candidate cells: the two below
/// (row+1: col, col+1) and the two above (row-1: col-1, col), validity
/// filtered. Among candidates Coily takes the one with minimal squared
/// grid distance to its target; exact ties are broken uniformly at
/// random through the session RNG.

use rand::Rng;

use super::actor::GridActor;
use super::grid::PyramidGeometry;

/// Hop interval at level 1.
pub const BASE_HOP_MS: u64 = 1500;
/// Hop interval at level 10 and beyond.
pub const MIN_HOP_MS: u64 = 500;

/// Linear interpolation between the level-1 and level-10 hop
/// intervals, floored to whole milliseconds.
pub fn hop_interval_ms(level: u32) -> u64 {
    if level <= 1 {
        return BASE_HOP_MS;
    }
    if level >= 10 {
        return MIN_HOP_MS;
    }
    let span = (BASE_HOP_MS - MIN_HOP_MS) as f64;
    let t = (level - 1) as f64 / 9.0;
    (BASE_HOP_MS as f64 - span * t) as u64
}

/// What a call to `hop` did. `Fooled` is reported back to the
/// orchestrator, which owns the score — Coily never touches it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CoilyAction {
    /// Inactive, or hop interval not yet elapsed.
    Waiting,
    /// No valid candidate move this hop.
    Stayed,
    Hopped { row: i32, col: i32 },
    /// Reached the decoy cell and jumped off after the player.
    Fooled,
}

#[derive(Clone, Debug)]
pub struct Coily {
    pub actor: GridActor,
    pub chasing_disc: bool,
    pub decoy_cell: Option<(i32, i32)>,
    pub decoy_delta: Option<(i32, i32)>,
    next_hop_at: u64,
}

impl Coily {
    pub fn new() -> Self {
        Coily {
            actor: GridActor::new(0, 0),
            chasing_disc: false,
            decoy_cell: None,
            decoy_delta: None,
            next_hop_at: 0,
        }
    }

    /// Back to a random column of the bottom row, active, no decoy.
    pub fn reset<R: Rng>(&mut self, geom: &PyramidGeometry, level: u32, now_ms: u64, rng: &mut R) {
        let bottom = geom.rows() as i32 - 1;
        let col = rng.random_range(0..geom.row_width(bottom as usize)) as i32;
        self.actor.place(bottom, col);
        self.actor.active = true;
        self.clear_decoy();
        self.next_hop_at = now_ms + hop_interval_ms(level);
    }

    /// Chase the disc jump-off cell instead of the player.
    pub fn arm_decoy(&mut self, cell: (i32, i32), delta: (i32, i32)) {
        self.chasing_disc = true;
        self.decoy_cell = Some(cell);
        self.decoy_delta = Some(delta);
    }

    pub fn clear_decoy(&mut self) {
        self.chasing_disc = false;
        self.decoy_cell = None;
        self.decoy_delta = None;
    }

    /// Advance Coily by elapsed time. At most one hop per call.
    pub fn hop<R: Rng>(
        &mut self,
        geom: &PyramidGeometry,
        player_cell: (i32, i32),
        level: u32,
        now_ms: u64,
        rng: &mut R,
    ) -> CoilyAction {
        if !self.actor.active || now_ms < self.next_hop_at {
            return CoilyAction::Waiting;
        }
        self.next_hop_at = now_ms + hop_interval_ms(level);

        let target = if self.chasing_disc {
            match (self.decoy_cell, self.decoy_delta) {
                (Some(cell), Some(delta)) => {
                    if (self.actor.row, self.actor.col) == cell {
                        // Fooled: jump off the same way the player did.
                        self.actor.offset(delta.0, delta.1);
                        self.actor.active = false;
                        self.clear_decoy();
                        return CoilyAction::Fooled;
                    }
                    cell
                }
                _ => {
                    // Flag set without a stored target/delta. Should not
                    // happen under correct sequencing; chase the player.
                    log::warn!("coily decoy state inconsistent, reverting to pursuit");
                    self.clear_decoy();
                    player_cell
                }
            }
        } else {
            player_cell
        };

        let (row, col) = (self.actor.row, self.actor.col);
        let candidates = [
            (row + 1, col),
            (row + 1, col + 1),
            (row - 1, col - 1),
            (row - 1, col),
        ];
        let valid: Vec<(i32, i32)> = candidates
            .iter()
            .copied()
            .filter(|&(r, c)| geom.is_valid_cell(r, c))
            .collect();
        if valid.is_empty() {
            return CoilyAction::Stayed;
        }

        let dist = |(r, c): (i32, i32)| {
            let dr = r - target.0;
            let dc = c - target.1;
            dr * dr + dc * dc
        };
        let best = valid.iter().copied().map(dist).min().unwrap_or(0);
        let tied: Vec<(i32, i32)> = valid.into_iter().filter(|&cell| dist(cell) == best).collect();
        let (nr, nc) = tied[rng.random_range(0..tied.len())];

        self.actor.place(nr, nc);
        CoilyAction::Hopped { row: nr, col: nc }
    }
}
