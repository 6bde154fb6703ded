//! Enumeration types for the arena.
//!
//! The serialized names are the ones the web and Android clients already
//! speak: cells are `" "`, `"X"` or `"O"`, and a finished round reports its
//! winner as `"X"`, `"O"` or `"D"` for a draw.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// The symbol a seat plays for the whole series.
///
/// `X` always belongs to the first player paired and always opens every
/// round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Mark {
    /// First seat. Moves first in every round.
    X,
    /// Second seat.
    O,
}

impl Mark {
    /// Return the opposing mark.
    pub const fn other(self) -> Self {
        match self {
            Self::X => Self::O,
            Self::O => Self::X,
        }
    }

    /// The outcome recorded when this mark completes a line.
    pub const fn win(self) -> Outcome {
        match self {
            Self::X => Outcome::WinX,
            Self::O => Outcome::WinO,
        }
    }
}

impl core::fmt::Display for Mark {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::X => f.write_str("X"),
            Self::O => f.write_str("O"),
        }
    }
}

/// State of one of the nine board cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Cell {
    /// Nobody has played here yet.
    #[default]
    #[serde(rename = " ")]
    Empty,
    /// Taken by the `X` seat.
    X,
    /// Taken by the `O` seat.
    O,
}

impl Cell {
    /// The mark occupying this cell, if any.
    pub const fn mark(self) -> Option<Mark> {
        match self {
            Self::Empty => None,
            Self::X => Some(Mark::X),
            Self::O => Some(Mark::O),
        }
    }

    /// Whether the cell is still free.
    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl From<Mark> for Cell {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Self::X,
            Mark::O => Self::O,
        }
    }
}

/// Terminal result of a single round.
///
/// A round that is still being played has no outcome; it is represented
/// as `Option<Outcome>::None` (`null` on the wire).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub enum Outcome {
    /// The `X` seat completed a line.
    #[serde(rename = "X")]
    WinX,
    /// The `O` seat completed a line.
    #[serde(rename = "O")]
    WinO,
    /// The board filled with no completed line.
    #[serde(rename = "D")]
    Draw,
}

impl Outcome {
    /// The winning mark, or `None` for a draw.
    pub const fn winner(self) -> Option<Mark> {
        match self {
            Self::WinX => Some(Mark::X),
            Self::WinO => Some(Mark::O),
            Self::Draw => None,
        }
    }
}
