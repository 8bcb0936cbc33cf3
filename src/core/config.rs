//! Game configuration
//!
//! All tuning lives in one serde-friendly struct that can be stored as RON
//! or JSON. Missing fields fall back to their defaults, so a config file
//! only needs to list what it changes.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ai::{ChaseFallback, EnemyConfig, SearchStrategy};
use crate::gameplay::{DEFAULT_DELIVERABLES, ItemKind, OrderBoardConfig, PlayerConfig};
use crate::world::{DEFAULT_SPAWN_ATTEMPTS, TilePalette};

/// Session configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Tile edge length in pixels
    pub tile_size: i32,
    /// Simulation ticks per second
    pub tick_rate: u32,
    /// Tile code roles for CSV maps
    pub palette: TilePalette,
    pub player: PlayerConfig,
    pub enemy: EnemyConfig,
    pub enemy_count: usize,
    /// Coins needed to finish the level
    pub coin_goal: u32,
    /// Coins scattered on the map at start
    pub coin_count: usize,
    /// Food items scattered on the map at start
    pub food_count: usize,
    /// Pixel size of pickups
    pub pickup_size: i32,
    /// Seconds a restaurant needs to hand out food
    pub food_give_time: f32,
    /// Items handed out by restaurants, assigned round-robin
    pub restaurant_items: Vec<ItemKind>,
    /// Seconds the player must stay in a delivery zone
    pub delivery_dwell: f32,
    /// Items a delivery zone accepts, in preference order
    pub deliverables: Vec<ItemKind>,
    pub orders: OrderBoardConfig,
    /// Let the player slide along solid tiles that carry no obstacle rect
    pub player_obstacles: bool,
    pub spawn_attempts: usize,
    /// RNG seed for spawning, orders and enemy behaviour
    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            tile_size: 32,
            tick_rate: 60,
            palette: TilePalette::default(),
            player: PlayerConfig::default(),
            enemy: EnemyConfig::default(),
            enemy_count: 3,
            coin_goal: 1,
            coin_count: 1,
            food_count: 4,
            pickup_size: 16,
            food_give_time: 2.0,
            restaurant_items: vec![ItemKind::Lomito, ItemKind::Empanada],
            delivery_dwell: 2.0,
            deliverables: DEFAULT_DELIVERABLES.to_vec(),
            orders: OrderBoardConfig::default(),
            player_obstacles: true,
            spawn_attempts: DEFAULT_SPAWN_ATTEMPTS,
            seed: 0,
        }
    }
}

impl GameConfig {
    /// Seconds per tick
    #[must_use]
    pub fn tick_duration(&self) -> f32 {
        1.0 / self.tick_rate.max(1) as f32
    }

    /// Set the tile size
    #[must_use]
    pub fn with_tile_size(mut self, tile_size: i32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Set the RNG seed
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of enemies spawned at start
    #[must_use]
    pub fn with_enemy_count(mut self, count: usize) -> Self {
        self.enemy_count = count;
        self
    }

    /// Replace the enemy tuning
    #[must_use]
    pub fn with_enemy(mut self, enemy: EnemyConfig) -> Self {
        self.enemy = enemy;
        self
    }

    /// Replace the player tuning
    #[must_use]
    pub fn with_player(mut self, player: PlayerConfig) -> Self {
        self.player = player;
        self
    }

    /// Set what enemies do after losing the player
    #[must_use]
    pub fn with_fallback(mut self, fallback: ChaseFallback) -> Self {
        self.enemy.fallback = fallback;
        self
    }

    /// Set the path search used by enemies
    #[must_use]
    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.enemy.strategy = strategy;
        self
    }

    /// Set the coin goal and how many coins are scattered
    #[must_use]
    pub fn with_coins(mut self, goal: u32, count: usize) -> Self {
        self.coin_goal = goal;
        self.coin_count = count;
        self
    }

    /// Set how many food items are scattered
    #[must_use]
    pub fn with_food_count(mut self, count: usize) -> Self {
        self.food_count = count;
        self
    }

    /// Replace the tile palette
    #[must_use]
    pub fn with_palette(mut self, palette: TilePalette) -> Self {
        self.palette = palette;
        self
    }

    /// Save the config to a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_ron(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let ron_string = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        fs::write(path, ron_string).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a config from a RON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_ron(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_ron_str(&content)
    }

    /// Parse a config from RON text
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails
    pub fn from_ron_str(content: &str) -> Result<Self, ConfigError> {
        ron::from_str(content).map_err(|e| ConfigError::DeserializeError(e.to_string()))
    }

    /// Save the config to a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or serialization fails
    pub fn save_json(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json_string = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;
        fs::write(path, json_string).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }

    /// Load a config from a JSON file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        serde_json::from_str(&content).map_err(|e| ConfigError::DeserializeError(e.to_string()))
    }

    /// Load from a `.json` or `.ron` file, picked by extension
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or deserialization fails
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        let config = if is_json {
            Self::load_json(path)?
        } else {
            Self::load_ron(path)?
        };
        log::info!("Loaded config {}", path.display());
        Ok(config)
    }
}

/// Errors that can occur while loading or saving a config
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// IO error
    IoError(String),
    /// Serialization error
    SerializeError(String),
    /// Deserialization error
    DeserializeError(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IoError(e) => write!(f, "IO error: {e}"),
            Self::SerializeError(e) => write!(f, "Serialization error: {e}"),
            Self::DeserializeError(e) => write!(f, "Deserialization error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}
