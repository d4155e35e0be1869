//! Graph layout
//!
//! Pure, deterministic hierarchical layout for small resource graphs:
//! multi-source BFS rank assignment plus symmetric per-rank centering.
//! Intentionally not crossing-minimized.

pub mod engine;

pub use engine::{assign_ranks, layout};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// 2D position of a laid-out node
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A renderable node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub position: Position,
    pub data: Value,
}

/// A directed edge between two node ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowEdge {
    pub source: String,
    pub target: String,
}

/// Which axis ranks advance along, and in which direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    #[default]
    #[serde(rename = "TB")]
    TopBottom,
    #[serde(rename = "BT")]
    BottomTop,
    #[serde(rename = "LR")]
    LeftRight,
    #[serde(rename = "RL")]
    RightLeft,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::TopBottom => "TB",
            Direction::BottomTop => "BT",
            Direction::LeftRight => "LR",
            Direction::RightLeft => "RL",
        }
    }

    /// Ranks advance along x rather than y
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Direction::LeftRight | Direction::RightLeft)
    }

    /// Rank offsets mirror against the maximum rank
    pub fn is_reversed(&self) -> bool {
        matches!(self, Direction::BottomTop | Direction::RightLeft)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "TB" => Ok(Direction::TopBottom),
            "BT" => Ok(Direction::BottomTop),
            "LR" => Ok(Direction::LeftRight),
            "RL" => Ok(Direction::RightLeft),
            _ => Err(format!("Unknown layout direction: {}", s)),
        }
    }
}

/// Layout tuning knobs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutOptions {
    pub direction: Direction,
    pub node_width: f64,
    pub node_height: f64,
    /// Spacing between consecutive ranks along the rank axis
    pub rank_sep: f64,
    /// Spacing between neighbors within a rank along the cross axis
    pub node_sep: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            direction: Direction::TopBottom,
            node_width: 200.0,
            node_height: 48.0,
            rank_sep: 64.0,
            node_sep: 40.0,
        }
    }
}
