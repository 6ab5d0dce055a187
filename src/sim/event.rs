/// Events emitted during a simulation step.
/// The presentation layer consumes these for animation/sound.

use crate::domain::disc::DiscSide;

#[derive(Clone, Debug)]
pub enum GameEvent {
    PlayerJumped,
    PlayerLanded { row: i32, col: i32 },
    PlayerFell,
    PlayerDied,
    CubeColored { row: i32, col: i32 },
    LevelCleared { level: u32 },
    DiscRide { side: DiscSide },
    DiscReady { side: DiscSide },
    CoilyHopped { row: i32, col: i32 },
    CoilyFooled,
    BallBounced { row: i32, col: i32 },
    GameOver,
}
