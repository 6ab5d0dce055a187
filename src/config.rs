/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory (or CWD).
/// Falls back to sensible defaults if the file is missing or incomplete.

use serde::Deserialize;
use std::path::PathBuf;

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub speed: SpeedConfig,
    /// Wait for an explicit advance command after clearing a level,
    /// instead of the timed splash.
    pub manual_level_advance: bool,
    /// Fixed RNG seed for reproducible runs. Random when absent.
    pub seed: Option<u64>,
}

#[derive(Clone, Debug)]
pub struct SpeedConfig {
    pub tick_rate_ms: u64,
    pub ball_hop_ms: u64,
    pub ball_spawn_delay_ms: u64,
    pub disc_cooldown_ms: u64,
    pub death_pause_ms: u64,
    pub splash_ms: u64,
}

impl Default for SpeedConfig {
    fn default() -> Self {
        SpeedConfig {
            tick_rate_ms: default_tick_rate(),
            ball_hop_ms: default_ball_hop(),
            ball_spawn_delay_ms: default_ball_spawn_delay(),
            disc_cooldown_ms: default_disc_cooldown(),
            death_pause_ms: default_death_pause(),
            splash_ms: default_splash(),
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    speed: TomlSpeed,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlSpeed {
    #[serde(default = "default_tick_rate")]
    tick_rate_ms: u64,
    #[serde(default = "default_ball_hop")]
    ball_hop_ms: u64,
    #[serde(default = "default_ball_spawn_delay")]
    ball_spawn_delay_ms: u64,
    #[serde(default = "default_disc_cooldown")]
    disc_cooldown_ms: u64,
    #[serde(default = "default_death_pause")]
    death_pause_ms: u64,
    #[serde(default = "default_splash")]
    splash_ms: u64,
}

#[derive(Deserialize, Debug, Default)]
struct TomlGeneral {
    #[serde(default)]
    manual_level_advance: bool,
    seed: Option<u64>,
}

// ── Defaults ──

fn default_tick_rate() -> u64 { 33 }          // ~30Hz
fn default_ball_hop() -> u64 { 800 }
fn default_ball_spawn_delay() -> u64 { 2000 }
fn default_disc_cooldown() -> u64 { 5000 }
fn default_death_pause() -> u64 { 1500 }
fn default_splash() -> u64 { 5000 }

impl Default for TomlSpeed {
    fn default() -> Self {
        TomlSpeed {
            tick_rate_ms: default_tick_rate(),
            ball_hop_ms: default_ball_hop(),
            ball_spawn_delay_ms: default_ball_spawn_delay(),
            disc_cooldown_ms: default_disc_cooldown(),
            death_pause_ms: default_death_pause(),
            splash_ms: default_splash(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: (1) exe directory, (2) current working directory.
    /// Missing file or missing keys gracefully fall back to defaults.
    pub fn load() -> Self {
        let toml_cfg = load_toml(&candidate_dirs());
        GameConfig {
            speed: SpeedConfig {
                tick_rate_ms: toml_cfg.speed.tick_rate_ms,
                ball_hop_ms: toml_cfg.speed.ball_hop_ms,
                ball_spawn_delay_ms: toml_cfg.speed.ball_spawn_delay_ms,
                disc_cooldown_ms: toml_cfg.speed.disc_cooldown_ms,
                death_pause_ms: toml_cfg.speed.death_pause_ms,
                splash_ms: toml_cfg.speed.splash_ms,
            },
            manual_level_advance: toml_cfg.general.manual_level_advance,
            seed: toml_cfg.general.seed,
        }
    }
}

/// Candidate directories to search: exe dir + CWD (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// Search for config.toml in candidate directories.
fn load_toml(search_dirs: &[PathBuf]) -> TomlConfig {
    for dir in search_dirs {
        let path = dir.join("config.toml");
        if path.exists() {
            match std::fs::read_to_string(&path) {
                Ok(text) => match toml::from_str::<TomlConfig>(&text) {
                    Ok(cfg) => return cfg,
                    Err(e) => {
                        log::warn!("config.toml parse error: {e}; using defaults");
                        return TomlConfig::default();
                    }
                },
                Err(e) => {
                    log::warn!("could not read {}: {e}", path.display());
                }
            }
        }
    }
    TomlConfig::default()
}
