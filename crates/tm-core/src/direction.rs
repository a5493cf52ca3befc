//! Migration direction

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a migration file applies a change or reverses it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Apply the change
    Up,
    /// Reverse the change with the same version
    Down,
}

impl Direction {
    /// File-name token for this direction (`up` / `down`)
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(Direction::Up),
            "down" => Ok(Direction::Down),
            other => Err(format!("expected 'up' or 'down', found '{}'", other)),
        }
    }
}
