//! Run configuration (logo.toml)

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::interpreter::Interpreter;
use crate::turtle::{Color, Turtle, DEFAULT_CIRCLE_STEPS};

/// Name of the config file looked up in the working directory
pub const CONFIG_FILE: &str = "logo.toml";

/// Settings applied to every interpreter the CLI creates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub turtle: TurtleConfig,

    #[serde(default)]
    pub run: RunConfig,
}

/// Initial turtle style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TurtleConfig {
    /// Initial pen width
    #[serde(default = "default_pen_width")]
    pub pen_width: f64,

    /// Initial pen color as r, g, b
    #[serde(default)]
    pub pen_color: [u8; 3],

    /// Segments used to approximate CIRCLE
    #[serde(default = "default_circle_steps")]
    pub circle_steps: usize,
}

impl Default for TurtleConfig {
    fn default() -> Self {
        Self {
            pen_width: default_pen_width(),
            pen_color: [0, 0, 0],
            circle_steps: default_circle_steps(),
        }
    }
}

fn default_pen_width() -> f64 {
    1.0
}

fn default_circle_steps() -> usize {
    DEFAULT_CIRCLE_STEPS
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Seed for RANDOM; time-seeded when absent
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Config errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    /// Parse a config from TOML
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    /// Load `explicit` if given, else `logo.toml` in `dir` if it exists,
    /// else the defaults
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let path = dir.join(CONFIG_FILE);
        if path.is_file() {
            tracing::debug!(path = %path.display(), "loading config");
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// A fresh turtle in the configured style
    pub fn turtle(&self) -> Turtle {
        let [r, g, b] = self.turtle.pen_color;
        let mut turtle = Turtle::with_style(self.turtle.pen_width, Color::new(r, g, b));
        turtle.set_circle_steps(self.turtle.circle_steps);
        turtle
    }

    /// An interpreter with the configured turtle and random seed
    pub fn interpreter(&self) -> Interpreter {
        let interpreter = Interpreter::new();
        let mut interpreter = match self.run.seed {
            Some(seed) => interpreter.with_seed(seed),
            None => interpreter,
        };
        interpreter.turtle = self.turtle();
        interpreter
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
