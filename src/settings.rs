//! Game tunables
//!
//! Persisted separately from anything round-related: LocalStorage on the web,
//! a JSON file natively.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Half-open interval `[min_ms, max_ms)` a phase dwell is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DwellRange {
    pub min_ms: f64,
    pub max_ms: f64,
}

impl DwellRange {
    pub const fn new(min_ms: f64, max_ms: f64) -> Self {
        Self { min_ms, max_ms }
    }

    /// Map a unit sample in [0, 1) onto the range
    #[inline]
    pub fn sample(&self, unit: f64) -> f64 {
        self.min_ms + unit * (self.max_ms - self.min_ms)
    }

    /// True if `dwell` could have been produced by `sample`
    pub fn contains(&self, dwell: f64) -> bool {
        if self.min_ms == self.max_ms {
            return dwell == self.min_ms;
        }
        dwell >= self.min_ms && dwell < self.max_ms
    }

    fn validate(&self, name: &'static str) -> Result<(), ConfigError> {
        let ok = self.min_ms.is_finite()
            && self.max_ms.is_finite()
            && self.min_ms > 0.0
            && self.min_ms <= self.max_ms;
        if ok {
            Ok(())
        } else {
            Err(ConfigError::InvalidDwell {
                name,
                min: self.min_ms,
                max: self.max_ms,
            })
        }
    }
}

/// Round tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Arena ===
    pub arena_width: f64,
    pub arena_height: f64,
    /// Victory when the player's top edge reaches this row
    pub goal_line_y: f64,
    /// Painted finish band (rendering only)
    pub finish_line_height: f64,

    // === Player ===
    pub start_x: f64,
    pub start_y: f64,
    pub player_width: f64,
    pub player_height: f64,
    pub player_speed: f64,

    // === Signal ===
    /// Dwell drawn on every mid-round phase flip
    pub flip_dwell: DwellRange,
    /// Dwell drawn when a round starts or restarts
    pub reset_dwell: DwellRange,

    // === Ledger ===
    pub ledger_timeout_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            goal_line_y: GOAL_LINE_Y,
            finish_line_height: FINISH_LINE_HEIGHT,

            start_x: PLAYER_START_X,
            start_y: PLAYER_START_Y,
            player_width: PLAYER_WIDTH,
            player_height: PLAYER_HEIGHT,
            player_speed: PLAYER_SPEED,

            flip_dwell: DwellRange::new(FLIP_DWELL_MIN_MS, FLIP_DWELL_MAX_MS),
            reset_dwell: DwellRange::new(RESET_DWELL_MIN_MS, RESET_DWELL_MAX_MS),

            ledger_timeout_ms: LEDGER_TIMEOUT_MS,
        }
    }
}

impl GameConfig {
    /// Reject tunables that would break scheduler or movement invariants
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.flip_dwell.validate("flip")?;
        self.reset_dwell.validate("reset")?;
        // Non-finite coordinates would all canonicalize to the same JSON
        let coordinates = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("goal_line_y", self.goal_line_y),
            ("finish_line_height", self.finish_line_height),
            ("start_x", self.start_x),
            ("start_y", self.start_y),
            ("player_width", self.player_width),
            ("player_height", self.player_height),
            ("player_speed", self.player_speed),
        ];
        if let Some(&(name, value)) = coordinates.iter().find(|(_, v)| !v.is_finite()) {
            return Err(ConfigError::NonFinite { name, value });
        }
        if self.player_speed <= 0.0 {
            return Err(ConfigError::NonPositiveSpeed(self.player_speed));
        }
        Ok(())
    }

    /// Parse and validate a JSON document (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load from a JSON file; a missing file yields defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: impl AsRef<std::path::Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let config = Self::from_json(&json)?;
                log::info!("Loaded config from {}", path.display());
                Ok(config)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(err) => Err(err.into()),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: impl AsRef<std::path::Path>) -> Result<(), ConfigError> {
        std::fs::write(path.as_ref(), self.to_json()?)?;
        log::info!("Config saved to {}", path.as_ref().display());
        Ok(())
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "redlight_config";

    /// Load config from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(config) => {
                        log::info!("Loaded config from LocalStorage");
                        return config;
                    }
                    Err(err) => log::warn!("Ignoring stored config: {err}"),
                }
            }
        }

        log::info!("Using default config");
        Self::default()
    }

    /// Save config to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Config saved");
            }
        }
    }
}
