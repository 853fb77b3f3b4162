//! Static tuning data and the optional `neon-swarm.toml` override file.
//!
//! Enemy archetypes are compile-time constants shared by every enemy of that
//! kind. Everything else lives in [`GameConfig`], whose defaults are the
//! game's canonical values. A TOML file may override any subset of keys;
//! missing keys keep their defaults.

use std::fmt;
use std::path::{Path, PathBuf};

use color_eyre::Result;
use color_eyre::eyre::WrapErr;
use ratatui::style::Color;
use serde::Deserialize;

/// Environment variable naming an alternative tuning file.
pub const CONFIG_ENV_VAR: &str = "NEON_SWARM_CONFIG";
/// Tuning file looked up in the working directory when the variable is unset.
pub const DEFAULT_CONFIG_FILE: &str = "neon-swarm.toml";

/// World units covered by one terminal cell.
pub const CELL_WIDTH: f32 = 8.0;
pub const CELL_HEIGHT: f32 = 16.0;

pub const PLAYER_COLOR: Color = Color::Rgb(0, 255, 255);
pub const PROJECTILE_COLOR: Color = Color::Rgb(255, 255, 0);
pub const GRID_COLOR: Color = Color::Rgb(0, 51, 51);

/// Immutable template for one enemy class.
#[derive(Debug, PartialEq)]
pub struct EnemyArchetype {
    pub name: &'static str,
    pub color: Color,
    pub radius: f32,
    pub base_speed: f32,
    pub health: u32,
    /// Any contact ends the run, so this is informational.
    pub contact_damage: u32,
    pub score_value: u32,
}

pub const ARCHETYPES: [EnemyArchetype; 3] = [
    EnemyArchetype {
        name: "Basic",
        color: Color::Rgb(255, 0, 0),
        radius: 20.0,
        base_speed: 2.0,
        health: 1,
        contact_damage: 1,
        score_value: 10,
    },
    EnemyArchetype {
        name: "Fast",
        color: Color::Rgb(255, 255, 0),
        radius: 15.0,
        base_speed: 3.5,
        health: 1,
        contact_damage: 1,
        score_value: 15,
    },
    EnemyArchetype {
        name: "Tank",
        color: Color::Rgb(255, 0, 255),
        radius: 35.0,
        base_speed: 1.0,
        health: 3,
        contact_damage: 2,
        score_value: 25,
    },
];

/// Runtime-tunable gameplay values.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // ── Enemies ──────────────────────────────────────────────────────────────
    pub enemy_spawn_interval_ms: f32,
    pub spawn_margin: f32,

    // ── Particles ────────────────────────────────────────────────────────────
    pub max_particles: usize,
    pub particle_radius: f32,

    // ── Player ───────────────────────────────────────────────────────────────
    pub player_radius: f32,
    pub player_speed: f32,
    pub shoot_interval_ms: u64,
    pub projectile_speed: f32,
    pub projectile_radius: f32,
    pub projectile_cull_margin: f32,

    // ── Firewall power-up ────────────────────────────────────────────────────
    pub firewall_speed: f32,
    pub firewall_radius: f32,
    pub firewall_offset: f32,
    pub firewall_period_ms: u64,

    // ── Progression ──────────────────────────────────────────────────────────
    pub initial_level: u32,
    pub initial_xp: f32,
    pub initial_xp_to_level: f32,
    pub level_up_factor: f32,

    // ── Input / presentation ─────────────────────────────────────────────────
    pub joystick_max_radius: f32,
    pub grid_spacing: f32,
    pub grid_scroll_speed: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            enemy_spawn_interval_ms: 1000.0,
            spawn_margin: 20.0,
            max_particles: 100,
            particle_radius: 3.0,
            player_radius: 30.0,
            player_speed: 5.0,
            shoot_interval_ms: 500,
            projectile_speed: 7.0,
            projectile_radius: 5.0,
            projectile_cull_margin: 50.0,
            firewall_speed: 5.0,
            firewall_radius: 8.0,
            firewall_offset: 50.0,
            firewall_period_ms: 1000,
            initial_level: 1,
            initial_xp: 0.0,
            initial_xp_to_level: 100.0,
            level_up_factor: 1.5,
            joystick_max_radius: 25.0,
            grid_spacing: 50.0,
            grid_scroll_speed: 0.5,
        }
    }
}

/// A tuning value outside the range the simulation can work with.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Value must be strictly positive.
    NotPositive { key: &'static str, value: f32 },
    /// Level-up factor must grow the threshold.
    LevelUpFactor { value: f32 },
    /// Level numbering starts at 1.
    InitialLevel,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotPositive { key, value } => {
                write!(f, "`{key}` must be greater than zero (got {value})")
            }
            ConfigError::LevelUpFactor { value } => {
                write!(f, "`level_up_factor` must be greater than 1 (got {value})")
            }
            ConfigError::InitialLevel => write!(f, "`initial_level` must be at least 1"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl GameConfig {
    /// Reads a TOML tuning file. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::info!("No tuning file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(path)
            .wrap_err_with(|| format!("failed to read {}", path.display()))?;
        let config: Self = toml::from_str(&text)
            .wrap_err_with(|| format!("failed to parse {}", path.display()))?;
        config
            .validate()
            .wrap_err_with(|| format!("invalid tuning in {}", path.display()))?;

        log::info!("Loaded tuning from {}", path.display());
        Ok(config)
    }

    /// Loads from `$NEON_SWARM_CONFIG`, falling back to `./neon-swarm.toml`.
    pub fn from_env() -> Result<Self> {
        let path = std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        Self::load(&path)
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let positive = [
            ("enemy_spawn_interval_ms", self.enemy_spawn_interval_ms),
            ("particle_radius", self.particle_radius),
            ("player_radius", self.player_radius),
            ("player_speed", self.player_speed),
            ("shoot_interval_ms", self.shoot_interval_ms as f32),
            ("projectile_speed", self.projectile_speed),
            ("projectile_radius", self.projectile_radius),
            ("firewall_speed", self.firewall_speed),
            ("firewall_radius", self.firewall_radius),
            ("firewall_period_ms", self.firewall_period_ms as f32),
            ("max_particles", self.max_particles as f32),
            ("initial_xp_to_level", self.initial_xp_to_level),
            ("joystick_max_radius", self.joystick_max_radius),
            ("grid_spacing", self.grid_spacing),
        ];
        for (key, value) in positive {
            if value.is_nan() || value <= 0.0 {
                return Err(ConfigError::NotPositive { key, value });
            }
        }
        if self.level_up_factor.is_nan() || self.level_up_factor <= 1.0 {
            return Err(ConfigError::LevelUpFactor {
                value: self.level_up_factor,
            });
        }
        if self.initial_level == 0 {
            return Err(ConfigError::InitialLevel);
        }
        Ok(())
    }
}
