/// Entry point and game loop.

mod config;
mod domain;
mod sim;
mod ui;

use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use config::GameConfig;
use domain::actor::HopDir;
use sim::event::GameEvent;
use sim::session::GameSession;
use sim::step::{step, Command};
use ui::input::InputState;
use ui::renderer::Renderer;
use ui::sound::{Sfx, SoundEngine};

const FRAME_SLEEP: Duration = Duration::from_millis(5);

fn main() {
    env_logger::init();
    let config = GameConfig::load();

    let seed = config.seed.unwrap_or_else(|| {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_nanos() as u64)
            .unwrap_or(0)
    });
    let mut session = GameSession::new(config.speed.clone(), config.manual_level_advance, seed);

    let mut renderer = Renderer::new();
    if let Err(e) = renderer.init() {
        eprintln!("Terminal init failed: {e}");
        return;
    }

    let sound = SoundEngine::new();

    let result = game_loop(&mut session, &mut renderer, sound.as_ref());

    if let Err(e) = renderer.cleanup() {
        eprintln!("Terminal cleanup failed: {e}");
    }
    if let Err(e) = result {
        eprintln!("Game error: {e}");
    }

    println!();
    println!("Thanks for playing Cube Hop!");
    println!("Final Score: {}", session.score);
}

fn game_loop(
    session: &mut GameSession,
    renderer: &mut Renderer,
    sound: Option<&SoundEngine>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut kb = InputState::new();
    let mut last_tick = Instant::now();
    let tick_rate = Duration::from_millis(session.speed.tick_rate_ms);
    let mut pending: Option<Command> = None;

    loop {
        kb.drain_events();

        // Quit is handled immediately in any state.
        if kb.ctrl_c_pressed() || kb.any_pressed(&[KeyCode::Esc]) {
            break;
        }
        if let Some(cmd) = detect_command(&kb) {
            pending = Some(cmd);
        }

        if last_tick.elapsed() >= tick_rate {
            let events = step(session, pending.take());
            process_sound_events(sound, &events);
            last_tick = Instant::now();
        }

        renderer.render(session)?;
        std::thread::sleep(FRAME_SLEEP);
    }

    Ok(())
}

// ── Key Constants ──

const KEYS_UP_LEFT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q'), KeyCode::Left];
const KEYS_UP_RIGHT: &[KeyCode] = &[KeyCode::Char('w'), KeyCode::Char('W'), KeyCode::Up];
const KEYS_DOWN_LEFT: &[KeyCode] = &[KeyCode::Char('a'), KeyCode::Char('A'), KeyCode::Down];
const KEYS_DOWN_RIGHT: &[KeyCode] = &[KeyCode::Char('s'), KeyCode::Char('S'), KeyCode::Right];
const KEYS_RESTART: &[KeyCode] = &[KeyCode::Char('r'), KeyCode::Char('R')];
const KEYS_ADVANCE: &[KeyCode] = &[KeyCode::Char('n'), KeyCode::Char('N')];

fn detect_command(kb: &InputState) -> Option<Command> {
    if kb.any_pressed(KEYS_UP_LEFT) {
        Some(Command::Move(HopDir::UpLeft))
    } else if kb.any_pressed(KEYS_UP_RIGHT) {
        Some(Command::Move(HopDir::UpRight))
    } else if kb.any_pressed(KEYS_DOWN_LEFT) {
        Some(Command::Move(HopDir::DownLeft))
    } else if kb.any_pressed(KEYS_DOWN_RIGHT) {
        Some(Command::Move(HopDir::DownRight))
    } else if kb.any_pressed(KEYS_RESTART) {
        Some(Command::Restart)
    } else if kb.any_pressed(KEYS_ADVANCE) {
        Some(Command::AdvanceLevel)
    } else {
        None
    }
}

fn process_sound_events(sound: Option<&SoundEngine>, events: &[GameEvent]) {
    let sfx = match sound {
        Some(s) => s,
        None => return,
    };
    for event in events {
        match event {
            GameEvent::PlayerJumped => sfx.play(Sfx::Jump),
            GameEvent::PlayerLanded { .. } => sfx.play(Sfx::Land),
            GameEvent::PlayerFell => sfx.play(Sfx::Fall),
            GameEvent::PlayerDied => sfx.play(Sfx::PlayerDie),
            GameEvent::CubeColored { .. } => sfx.play(Sfx::ChangeColor),
            GameEvent::LevelCleared { .. } => sfx.play(Sfx::LevelComplete),
            GameEvent::DiscRide { .. } => sfx.play(Sfx::DiscRide),
            GameEvent::CoilyHopped { .. } => sfx.play(Sfx::EnemyHop),
            GameEvent::CoilyFooled => sfx.play(Sfx::CoilyFall),
            GameEvent::BallBounced { .. } => sfx.play(Sfx::BallBounce),
            GameEvent::GameOver => sfx.play(Sfx::GameOver),
            GameEvent::DiscReady { .. } => {}
        }
    }
}
