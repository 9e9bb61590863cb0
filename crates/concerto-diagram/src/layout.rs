//! Hierarchical layout of projected diagrams.
//!
//! The layout assigns every node a position on a layered grid whose layers
//! flow in one of four [`Direction`]s, and sets the sides at which edges
//! leave and enter each node.

mod sugiyama;

pub use sugiyama::Engine;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use concerto_diagram_core::geometry::Side;

/// Flow direction of the layers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "TB", alias = "tb")]
    TopToBottom,
    #[serde(rename = "BT", alias = "bt")]
    BottomToTop,
    #[serde(rename = "LR", alias = "lr")]
    LeftToRight,
    #[serde(rename = "RL", alias = "rl")]
    RightToLeft,
}

impl Direction {
    /// Two letter code of the direction, e.g. `TB`.
    pub fn code(self) -> &'static str {
        match self {
            Self::TopToBottom => "TB",
            Self::BottomToTop => "BT",
            Self::LeftToRight => "LR",
            Self::RightToLeft => "RL",
        }
    }

    /// Returns true when layers are laid out along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LeftToRight | Self::RightToLeft)
    }

    /// Returns true when layers advance towards negative coordinates.
    pub fn is_reversed(self) -> bool {
        matches!(self, Self::BottomToTop | Self::RightToLeft)
    }

    /// Side of a node that outgoing edges leave from.
    pub fn source_side(self) -> Side {
        match self {
            Self::TopToBottom => Side::Bottom,
            Self::BottomToTop => Side::Top,
            Self::LeftToRight => Side::Right,
            Self::RightToLeft => Side::Left,
        }
    }

    /// Side of a node that incoming edges arrive at.
    pub fn target_side(self) -> Side {
        match self {
            Self::TopToBottom => Side::Top,
            Self::BottomToTop => Side::Bottom,
            Self::LeftToRight => Side::Left,
            Self::RightToLeft => Side::Right,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error returned when a string names no layout direction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid layout direction `{0}`, expected one of TB, BT, LR, RL")]
pub struct ParseDirectionError(String);

impl FromStr for Direction {
    type Err = ParseDirectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tb" | "top-to-bottom" => Ok(Self::TopToBottom),
            "bt" | "bottom-to-top" => Ok(Self::BottomToTop),
            "lr" | "left-to-right" => Ok(Self::LeftToRight),
            "rl" | "right-to-left" => Ok(Self::RightToLeft),
            _ => Err(ParseDirectionError(s.to_string())),
        }
    }
}

/// Errors raised by the layout engine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    #[error("layering engine panicked: {0}")]
    EnginePanicked(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_codes_case_insensitive() {
        assert_eq!("TB".parse::<Direction>().unwrap(), Direction::TopToBottom);
        assert_eq!("bt".parse::<Direction>().unwrap(), Direction::BottomToTop);
        assert_eq!("Lr".parse::<Direction>().unwrap(), Direction::LeftToRight);
        assert_eq!(
            "right-to-left".parse::<Direction>().unwrap(),
            Direction::RightToLeft
        );
    }

    #[test]
    fn test_parse_invalid() {
        let err = "diagonal".parse::<Direction>().unwrap_err();
        assert!(err.to_string().contains("diagonal"));
    }

    #[test]
    fn test_display_round_trip() {
        for direction in [
            Direction::TopToBottom,
            Direction::BottomToTop,
            Direction::LeftToRight,
            Direction::RightToLeft,
        ] {
            assert_eq!(direction.to_string().parse::<Direction>().unwrap(), direction);
        }
    }

    #[test]
    fn test_sides() {
        assert_eq!(Direction::TopToBottom.source_side(), Side::Bottom);
        assert_eq!(Direction::TopToBottom.target_side(), Side::Top);
        assert_eq!(Direction::LeftToRight.source_side(), Side::Right);
        assert_eq!(Direction::LeftToRight.target_side(), Side::Left);
        assert_eq!(Direction::RightToLeft.source_side(), Side::Left);
        assert_eq!(Direction::BottomToTop.target_side(), Side::Bottom);
    }

    #[test]
    fn test_axis_flags() {
        assert!(Direction::LeftToRight.is_horizontal());
        assert!(!Direction::BottomToTop.is_horizontal());
        assert!(Direction::BottomToTop.is_reversed());
        assert!(!Direction::TopToBottom.is_reversed());
    }

    #[test]
    fn test_serde_codes() {
        let direction: Direction = serde_json::from_str("\"RL\"").unwrap();
        assert_eq!(direction, Direction::RightToLeft);
        assert_eq!(
            serde_json::to_string(&Direction::BottomToTop).unwrap(),
            "\"BT\""
        );
    }
}
