use std::{fs, io, path::{Path, PathBuf}, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::snake::{Direction, Snake};
use crate::vector::{Bounds, Vector};

pub const MIN_INITIAL_LENGTH: i32 = 3;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("playground {axis} must be at least 2, got {value}")]
    Dimension { axis: &'static str, value: i32 },
    #[error("initial length must be at least 3, got {0}")]
    TooShort(i32),
    #[error("initial length {length} does not fit in a playground {extent} cells across")]
    TooLong { length: i32, extent: i32 },
    #[error("a crawler of length {length} leaves no free food cell on a {width}x{height} playground")]
    NoRoomForFood { length: i32, width: i32, height: i32 },
    #[error("tick interval must be non-zero")]
    ZeroTickInterval,
    #[error("scale must be at least one column per cell")]
    ZeroScale,
    #[error("could not read config file {}", path.display())]
    Read { path: PathBuf, #[source] source: io::Error },
    #[error("could not parse config file")]
    Parse(#[from] serde_yaml_ng::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub width: i32,
    pub height: i32,
    /// Terminal columns used to draw one cell.
    pub scale: u16,
    pub tick_interval_ms: u64,
    pub restart_pause_ms: u64,
    pub score_per_food: u32,
    pub initial_length: i32,
    pub initial_direction: Direction,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            width: 25,
            height: 25,
            scale: 2,
            tick_interval_ms: 150,
            restart_pause_ms: 2500,
            score_per_food: 10,
            initial_length: 7,
            initial_direction: Direction::Right,
            seed: None,
        }
    }
}

impl GameConfig {
    /// Reads a YAML config; fields left out keep their defaults.
    pub fn from_yaml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_yaml_str(&content)
    }

    /// Parses without validating, so command-line overrides can still fix
    /// values before [`GameConfig::validate`] runs.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml_ng::from_str(content)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (axis, value) in [("width", self.width), ("height", self.height)] {
            if value < 2 {
                return Err(ConfigError::Dimension { axis, value });
            }
        }

        if self.initial_length < MIN_INITIAL_LENGTH {
            return Err(ConfigError::TooShort(self.initial_length));
        }

        let extent = match self.initial_direction {
            Direction::Left | Direction::Right => self.width,
            Direction::Up | Direction::Down => self.height,
        };
        if self.initial_length > extent {
            return Err(ConfigError::TooLong { length: self.initial_length, extent });
        }

        if !self.starting_layout_has_food_cell() {
            return Err(ConfigError::NoRoomForFood {
                length: self.initial_length,
                width: self.width,
                height: self.height,
            });
        }

        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.scale == 0 {
            return Err(ConfigError::ZeroScale);
        }

        Ok(())
    }

    // Food goes in [1, width) x [1, height)
    fn starting_layout_has_food_cell(&self) -> bool {
        let bounds = self.bounds();
        let snake = Snake::new(bounds.center(), self.initial_length, self.initial_direction, bounds);

        (1..self.height)
            .flat_map(|y| (1..self.width).map(move |x| Vector::new(x, y)))
            .any(|pos| !snake.body().contains(&pos))
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn restart_pause(&self) -> Duration {
        Duration::from_millis(self.restart_pause_ms)
    }
}
