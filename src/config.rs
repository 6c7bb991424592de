/// Gameplay tuning and playfield dimensions.
///
/// Every number the simulation depends on lives in [`Tuning`].  The defaults
/// are the built-in game; tests build variants to isolate one rule at a time.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("arena dimensions must be finite and positive, got {width}x{height}")]
    InvalidDimensions { width: f32, height: f32 },
    #[error("arena {width}x{height} is too small: need at least {min_width}x{min_height}")]
    ArenaTooSmall {
        width: f32,
        height: f32,
        min_width: f32,
        min_height: f32,
    },
    #[error("tuning value `{field}` must be finite and non-negative, got {value}")]
    InvalidTuning { field: &'static str, value: f32 },
    #[error("frame rate must be at least 1 fps")]
    ZeroFrameRate,
}

// ── Tuning ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tuning {
    // Player
    pub player_size: f32,
    pub player_max_hp: i32,
    pub player_speed: f32,
    /// Multiplier applied to pointer-drag deltas before they move the ship.
    pub drag_gain: f32,
    /// Distance from the bottom edge where the ship starts.
    pub player_start_offset: f32,

    // Bullets
    pub bullet_speed: f32,
    /// Bullets leave the nose of the ship, this far above its centre.
    pub bullet_muzzle_offset: f32,
    pub bullet_hit_radius: f32,

    // Grunts
    pub grunt_size: f32,
    pub grunt_hp: i32,
    pub grunt_fall_speed: f32,
    pub grunt_spawn_y: f32,
    pub grunt_score: u32,
    pub grunt_contact_damage: i32,

    // Boss
    pub boss_size: f32,
    pub boss_hp: i32,
    pub boss_spawn_y: f32,
    pub boss_hover_y: f32,
    pub boss_easing: f32,
    pub boss_patrol_speed: f32,
    pub boss_patrol_margin: f32,
    pub boss_score: u32,
    pub boss_contact_damage: i32,
    pub boss_trigger_score: u32,

    // Spawn curve
    pub spawn_interval_base: u32,
    pub spawn_interval_floor: u32,
    pub spawn_interval_score_step: u32,

    pub player_contact_radius: f32,
    /// Enemies further than this below the bottom edge are culled.
    pub offscreen_margin: f32,
    pub win_score: u32,

    // Background
    pub star_count: usize,
    pub star_max_speed: f32,
    pub star_base_speed: f32,
    pub star_wrap_y: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_size: 22.0,
            player_max_hp: 100,
            player_speed: 7.0,
            drag_gain: 1.4,
            player_start_offset: 100.0,

            bullet_speed: 15.0,
            bullet_muzzle_offset: 20.0,
            bullet_hit_radius: 15.0,

            grunt_size: 22.0,
            grunt_hp: 1,
            grunt_fall_speed: 4.5,
            grunt_spawn_y: -50.0,
            grunt_score: 100,
            grunt_contact_damage: 10,

            boss_size: 75.0,
            boss_hp: 80,
            boss_spawn_y: -100.0,
            boss_hover_y: 120.0,
            boss_easing: 0.05,
            boss_patrol_speed: 4.0,
            boss_patrol_margin: 75.0,
            boss_score: 3000,
            boss_contact_damage: 1,
            boss_trigger_score: 7000,

            spawn_interval_base: 60,
            spawn_interval_floor: 20,
            spawn_interval_score_step: 500,

            player_contact_radius: 20.0,
            offscreen_margin: 150.0,
            win_score: 10_000,

            star_count: 80,
            star_max_speed: 2.0,
            star_base_speed: 1.0,
            star_wrap_y: -5.0,
        }
    }
}

impl Tuning {
    /// Reject values that would make a random range or a speed meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let checks = [
            ("player_size", self.player_size),
            ("boss_patrol_margin", self.boss_patrol_margin),
            ("star_max_speed", self.star_max_speed),
            ("star_base_speed", self.star_base_speed),
        ];
        for (field, value) in checks {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidTuning { field, value });
            }
        }
        Ok(())
    }
}

// ── Arena ────────────────────────────────────────────────────────────────────

pub const DEFAULT_ARENA_WIDTH: f32 = 800.0;
pub const DEFAULT_ARENA_HEIGHT: f32 = 600.0;

/// Logical playfield size in simulation units ("pixels").
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arena {
    width: f32,
    height: f32,
}

impl Arena {
    /// Validate dimensions against the default tuning.
    pub fn new(width: f32, height: f32) -> Result<Self, ConfigError> {
        Self::with_tuning(width, height, &Tuning::default())
    }

    /// The arena must fit the clamped player box and the boss patrol lane,
    /// otherwise clamping would invert its bounds.
    pub fn with_tuning(width: f32, height: f32, tuning: &Tuning) -> Result<Self, ConfigError> {
        if !width.is_finite() || !height.is_finite() || width <= 0.0 || height <= 0.0 {
            return Err(ConfigError::InvalidDimensions { width, height });
        }
        tuning.validate()?;
        let min_width = (tuning.player_size * 2.0).max(tuning.boss_patrol_margin * 2.0);
        let min_height = tuning.player_size * 2.0;
        if width < min_width || height < min_height {
            return Err(ConfigError::ArenaTooSmall {
                width,
                height,
                min_width,
                min_height,
            });
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self {
            width: DEFAULT_ARENA_WIDTH,
            height: DEFAULT_ARENA_HEIGHT,
        }
    }
}

/// Target frame rate for the display-refresh stand-in.
pub fn validate_fps(fps: u32) -> Result<u32, ConfigError> {
    if fps == 0 {
        Err(ConfigError::ZeroFrameRate)
    } else {
        Ok(fps)
    }
}
