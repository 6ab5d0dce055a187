/// Discs — the two teleport-to-apex escape pads.
///
/// Each disc is bound to a fixed set of edge cells and a jump-off
/// direction. A player hop that leaves the grid from one of those
/// cells, in that direction, while the disc is available, rides the
/// disc to the apex instead of falling. Use puts the disc on a
/// cooldown that expires on its own.

use super::actor::HopDir;

/// Cooldown after a ride.
pub const COOLDOWN_MS: u64 = 5000;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DiscSide {
    Left,
    Right,
}

#[derive(Clone, Debug)]
pub struct Disc {
    pub side: DiscSide,
    jump_off_cells: Vec<(i32, i32)>,
    trigger_dirs: Vec<HopDir>,
    available: bool,
    cooldown_deadline: Option<u64>,
}

impl Disc {
    pub fn new(side: DiscSide, jump_off_cells: Vec<(i32, i32)>, trigger_dirs: Vec<HopDir>) -> Self {
        Disc {
            side,
            jump_off_cells,
            trigger_dirs,
            available: true,
            cooldown_deadline: None,
        }
    }

    /// The left disc serves the left pyramid edge, ridden by hopping
    /// up-left past it; the right disc mirrors that on the diagonal edge.
    pub fn standard_pair() -> [Disc; 2] {
        [
            Disc::new(DiscSide::Left, vec![(2, 0), (3, 0)], vec![HopDir::UpLeft]),
            Disc::new(DiscSide::Right, vec![(2, 2), (3, 3)], vec![HopDir::UpRight]),
        ]
    }

    #[inline]
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Does an off-grid hop from `cell` in direction `dir` ride this disc?
    pub fn matches(&self, cell: (i32, i32), dir: HopDir) -> bool {
        self.available
            && self.jump_off_cells.contains(&cell)
            && self.trigger_dirs.contains(&dir)
    }

    /// Consume the disc; valid only while available.
    pub fn use_disc(&mut self, now_ms: u64, cooldown_ms: u64) {
        debug_assert!(self.available);
        self.available = false;
        self.cooldown_deadline = Some(now_ms + cooldown_ms);
    }

    /// Passive per-tick check; returns true when the disc just came
    /// back from cooldown.
    pub fn update_cooldown(&mut self, now_ms: u64) -> bool {
        match self.cooldown_deadline {
            Some(deadline) if now_ms >= deadline => {
                self.available = true;
                self.cooldown_deadline = None;
                true
            }
            _ => false,
        }
    }

    /// Force back to available (full game reset).
    pub fn reset(&mut self) {
        self.available = true;
        self.cooldown_deadline = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_lifecycle() {
        let mut d = Disc::new(DiscSide::Left, vec![(2, 0)], vec![HopDir::UpLeft]);
        assert!(d.is_available());
        d.use_disc(1000, COOLDOWN_MS);
        assert!(!d.is_available());
        assert!(!d.update_cooldown(5999));
        assert!(!d.is_available());
        assert!(d.update_cooldown(6000));
        assert!(d.is_available());
        // no repeated reactivation event
        assert!(!d.update_cooldown(6001));
    }

    #[test]
    fn matching_requires_cell_dir_and_availability() {
        let [left, right] = Disc::standard_pair();
        assert!(left.matches((2, 0), HopDir::UpLeft));
        assert!(left.matches((3, 0), HopDir::UpLeft));
        assert!(!left.matches((2, 0), HopDir::UpRight));
        assert!(!left.matches((4, 0), HopDir::UpLeft));
        assert!(right.matches((3, 3), HopDir::UpRight));
        assert!(!right.matches((3, 3), HopDir::UpLeft));

        let mut used = left.clone();
        used.use_disc(0, COOLDOWN_MS);
        assert!(!used.matches((2, 0), HopDir::UpLeft));
    }

    #[test]
    fn reset_clears_cooldown() {
        let mut d = Disc::new(DiscSide::Right, vec![(2, 2)], vec![HopDir::UpRight]);
        d.use_disc(0, COOLDOWN_MS);
        d.reset();
        assert!(d.is_available());
        assert!(!d.update_cooldown(u64::MAX));
    }
}
