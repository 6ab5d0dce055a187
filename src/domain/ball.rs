/// The ball — a gravity-only hazard that bounces down the pyramid.
///
/// Spawns a fixed delay after level start or respawn, preferring row 1
/// at a random column, then hops strictly downward at a fixed interval
/// until it drops off the bottom edge.

use rand::Rng;

use super::actor::GridActor;
use super::grid::PyramidGeometry;

/// Delay between becoming eligible and actually appearing.
pub const SPAWN_DELAY_MS: u64 = 2000;
/// Time between downward hops.
pub const HOP_INTERVAL_MS: u64 = 800;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BallAction {
    Waiting,
    Bounced { row: i32, col: i32 },
    /// Dropped off the bottom (or had no valid landing cell).
    FellOff,
}

#[derive(Clone, Debug)]
pub struct Ball {
    pub actor: GridActor,
    hop_interval_ms: u64,
    next_hop_at: u64,
    spawn_at: Option<u64>,
}

impl Ball {
    pub fn new(hop_interval_ms: u64) -> Self {
        let mut actor = GridActor::new(0, 0);
        actor.active = false;
        Ball { actor, hop_interval_ms, next_hop_at: 0, spawn_at: None }
    }

    /// Schedule a (re)spawn `delay_ms` from now. The ball stays
    /// inactive until then.
    pub fn arm_spawn(&mut self, now_ms: u64, delay_ms: u64) {
        self.actor.active = false;
        self.spawn_at = Some(now_ms + delay_ms);
    }

    /// Activate once the spawn delay has elapsed. Returns true on the
    /// tick the ball actually appears.
    pub fn try_spawn<R: Rng>(&mut self, geom: &PyramidGeometry, now_ms: u64, rng: &mut R) -> bool {
        let due = match self.spawn_at {
            Some(at) if now_ms >= at => true,
            _ => false,
        };
        if !due {
            return false;
        }
        self.spawn_at = None;
        if geom.rows() > 1 {
            let col = rng.random_range(0..geom.row_width(1)) as i32;
            self.actor.place(1, col);
        } else {
            // degenerate single-row pyramid
            self.actor.place(0, 0);
        }
        self.actor.active = true;
        self.next_hop_at = now_ms + self.hop_interval_ms;
        true
    }

    /// Advance by elapsed time. At most one hop per call.
    pub fn hop<R: Rng>(&mut self, geom: &PyramidGeometry, now_ms: u64, rng: &mut R) -> BallAction {
        if !self.actor.active || now_ms < self.next_hop_at {
            return BallAction::Waiting;
        }
        self.next_hop_at = now_ms + self.hop_interval_ms;

        let next_row = self.actor.row + 1;
        if next_row >= geom.rows() as i32 {
            self.actor.active = false;
            return BallAction::FellOff;
        }
        let candidates: Vec<i32> = [self.actor.col, self.actor.col + 1]
            .into_iter()
            .filter(|&c| geom.is_valid_cell(next_row, c))
            .collect();
        if candidates.is_empty() {
            self.actor.active = false;
            return BallAction::FellOff;
        }
        let col = candidates[rng.random_range(0..candidates.len())];
        self.actor.place(next_row, col);
        BallAction::Bounced { row: next_row, col }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(11)
    }

    #[test]
    fn inactive_until_spawn_delay_elapses() {
        let geom = PyramidGeometry::standard();
        let mut b = Ball::new(HOP_INTERVAL_MS);
        let mut r = rng();
        b.arm_spawn(0, SPAWN_DELAY_MS);
        assert!(!b.try_spawn(&geom, 1999, &mut r));
        assert!(!b.actor.active);
        assert!(b.try_spawn(&geom, 2000, &mut r));
        assert!(b.actor.active);
        assert_eq!(b.actor.row, 1);
        assert!((0..2).contains(&b.actor.col));
        // spawn fires once
        assert!(!b.try_spawn(&geom, 2001, &mut r));
    }

    #[test]
    fn hops_strictly_downward() {
        let geom = PyramidGeometry::standard();
        let mut b = Ball::new(HOP_INTERVAL_MS);
        let mut r = rng();
        b.arm_spawn(0, 0);
        b.try_spawn(&geom, 0, &mut r);
        let mut now = 0;
        let mut prev_row = b.actor.row;
        let mut prev_col = b.actor.col;
        loop {
            now += HOP_INTERVAL_MS;
            match b.hop(&geom, now, &mut r) {
                BallAction::Bounced { row, col } => {
                    assert_eq!(row, prev_row + 1);
                    assert!(col == prev_col || col == prev_col + 1);
                    prev_row = row;
                    prev_col = col;
                }
                BallAction::FellOff => break,
                BallAction::Waiting => panic!("deadline elapsed but ball waited"),
            }
        }
        assert!(!b.actor.active);
        assert_eq!(prev_row, 6);
    }

    #[test]
    fn falls_off_from_bottom_row() {
        let geom = PyramidGeometry::standard();
        let mut b = Ball::new(HOP_INTERVAL_MS);
        let mut r = rng();
        b.actor.place(6, 3);
        b.actor.active = true;
        assert_eq!(b.hop(&geom, HOP_INTERVAL_MS, &mut r), BallAction::FellOff);
        assert!(!b.actor.active);
    }

    #[test]
    fn respects_hop_interval() {
        let geom = PyramidGeometry::standard();
        let mut b = Ball::new(HOP_INTERVAL_MS);
        let mut r = rng();
        b.arm_spawn(0, 0);
        b.try_spawn(&geom, 0, &mut r);
        assert_eq!(b.hop(&geom, HOP_INTERVAL_MS - 1, &mut r), BallAction::Waiting);
        assert!(matches!(b.hop(&geom, HOP_INTERVAL_MS, &mut r), BallAction::Bounced { .. }));
    }
}
