/// GameSession: the complete state of a running game.
///
/// One aggregate owns every entity, the score, the level counter, the
/// phase machine and the RNG. Nothing in the game lives outside it, and
/// only `step::step` mutates it, so there is a single writer by
/// construction.
///
/// Time is a millisecond counter advanced by the configured tick
/// interval each step. All time-gated behavior (Coily and ball hops,
/// disc cooldowns, the death pause, the level splash) compares stored
/// deadlines against `now_ms`; nothing sleeps.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::config::SpeedConfig;
use crate::domain::ball::Ball;
use crate::domain::coily::Coily;
use crate::domain::cube::CubeField;
use crate::domain::disc::Disc;
use crate::domain::grid::PyramidGeometry;
use crate::domain::player::Player;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Phase {
    Playing,
    /// Death pause before respawn or game over.
    PlayerDied,
    /// Timed "LEVEL COMPLETE" splash before the next level.
    LevelSplash,
    /// Manual-advance variant of the splash (config-gated).
    LevelComplete,
    GameOver,
}

pub struct GameSession {
    pub geom: PyramidGeometry,
    pub cubes: CubeField,
    pub player: Player,
    pub coily: Coily,
    pub ball: Ball,
    pub discs: [Disc; 2],

    pub score: u32,
    pub level: u32,
    pub phase: Phase,

    /// Logical clock in milliseconds, advanced once per step.
    pub now_ms: u64,
    pub tick: u64,

    pub speed: SpeedConfig,
    pub manual_level_advance: bool,
    pub rng: Pcg32,

    /// When the current death pause began.
    pub death_at: u64,
    /// When the current level splash began.
    pub splash_at: u64,
}

impl GameSession {
    pub fn new(speed: SpeedConfig, manual_level_advance: bool, seed: u64) -> Self {
        let geom = PyramidGeometry::standard();
        let mut session = GameSession {
            geom,
            cubes: CubeField::new(geom),
            player: Player::new(0, 0),
            coily: Coily::new(),
            ball: Ball::new(speed.ball_hop_ms),
            discs: Disc::standard_pair(),
            score: 0,
            level: 1,
            phase: Phase::Playing,
            now_ms: 0,
            tick: 0,
            speed,
            manual_level_advance,
            rng: Pcg32::seed_from_u64(seed),
            death_at: 0,
            splash_at: 0,
        };
        session.coily.reset(&session.geom, 1, 0, &mut session.rng);
        session.ball.arm_spawn(0, session.speed.ball_spawn_delay_ms);
        session.recolor_start_cube();
        session
    }

    /// Color the player's start cube without scoring. Runs at every
    /// game/level/life boundary so the player never starts on an
    /// uncolored cube.
    pub fn recolor_start_cube(&mut self) {
        let (row, col) = self.player.start_cell();
        if let Some(cube) = self.cubes.cube_at_mut(row, col) {
            cube.try_advance_color();
        }
    }

    /// Full reset: new game from scratch. Only this clears the score.
    pub fn reset_game(&mut self) {
        self.score = 0;
        self.level = 1;
        self.player.reset_lives();
        self.player.reset_position();
        self.coily.reset(&self.geom, self.level, self.now_ms, &mut self.rng);
        self.ball.arm_spawn(self.now_ms, self.speed.ball_spawn_delay_ms);
        for disc in &mut self.discs {
            disc.reset();
        }
        self.cubes.reset_all();
        self.recolor_start_cube();
        self.phase = Phase::Playing;
    }

    /// Begin the next level (the counter was already advanced when the
    /// previous one was cleared). Score carries over; cubes do not.
    pub fn start_next_level(&mut self) {
        self.player.reset_position();
        self.coily.reset(&self.geom, self.level, self.now_ms, &mut self.rng);
        self.ball.arm_spawn(self.now_ms, self.speed.ball_spawn_delay_ms);
        self.cubes.reset_all();
        self.recolor_start_cube();
        self.phase = Phase::Playing;
    }

    /// Put the player back on the start cube after a death pause.
    pub fn respawn(&mut self) {
        self.player.reset_position();
        self.coily.reset(&self.geom, self.level, self.now_ms, &mut self.rng);
        self.ball.arm_spawn(self.now_ms, self.speed.ball_spawn_delay_ms);
        self.recolor_start_cube();
        self.phase = Phase::Playing;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> GameSession {
        GameSession::new(SpeedConfig::default(), false, 42)
    }

    #[test]
    fn new_session_initial_state() {
        let s = session();
        assert_eq!(s.score, 0);
        assert_eq!(s.level, 1);
        assert_eq!(s.player.lives, 3);
        assert_eq!(s.phase, Phase::Playing);
        // start cube colored without scoring
        assert!(s.cubes.cube_at(0, 0).unwrap().is_target_color());
        // Coily active on the bottom row, ball waiting on its delay
        assert!(s.coily.actor.active);
        assert_eq!(s.coily.actor.row, 6);
        assert!(!s.ball.actor.active);
        assert!(s.discs.iter().all(|d| d.is_available()));
    }

    #[test]
    fn reset_game_restores_everything() {
        let mut s = session();
        s.score = 1234;
        s.level = 4;
        s.player.die();
        s.discs[0].use_disc(s.now_ms, s.speed.disc_cooldown_ms);
        s.cubes.cube_at_mut(3, 2).unwrap().try_advance_color();
        s.phase = Phase::GameOver;

        s.reset_game();
        assert_eq!(s.score, 0);
        assert_eq!(s.level, 1);
        assert_eq!(s.player.lives, 3);
        assert_eq!((s.player.actor.row, s.player.actor.col), (0, 0));
        assert!(s.player.actor.active);
        assert!(s.discs.iter().all(|d| d.is_available()));
        assert!(!s.cubes.cube_at(3, 2).unwrap().is_target_color());
        assert!(s.cubes.cube_at(0, 0).unwrap().is_target_color());
        assert_eq!(s.phase, Phase::Playing);
        assert!(s.coily.actor.active);
        assert!(!s.coily.chasing_disc);
    }

    #[test]
    fn next_level_keeps_score_resets_cubes() {
        let mut s = session();
        s.score = 500;
        s.level = 2;
        s.cubes.cube_at_mut(5, 5).unwrap().try_advance_color();
        s.start_next_level();
        assert_eq!(s.score, 500);
        assert_eq!(s.level, 2);
        assert!(!s.cubes.cube_at(5, 5).unwrap().is_target_color());
        assert!(s.cubes.cube_at(0, 0).unwrap().is_target_color());
    }
}
