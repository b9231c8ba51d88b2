// ABOUTME: Geometry vocabulary shared by the layout engine and its hosts.
// ABOUTME: Orientation, insertion positions, sizes and divider clamping.

use serde::{Deserialize, Serialize};

/// Axis of a divider.
///
/// Named after the axis the divider moves along: a `Horizontal` divider
/// is dragged left and right and separates panes side by side, a
/// `Vertical` one is dragged up and down and stacks them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    pub fn flipped(self) -> Self {
        match self {
            Orientation::Horizontal => Orientation::Vertical,
            Orientation::Vertical => Orientation::Horizontal,
        }
    }

    /// Length of `size` along the axis this divider moves on
    pub fn extent(self, size: Size) -> i32 {
        match self {
            Orientation::Horizontal => size.width,
            Orientation::Vertical => size.height,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Orientation::Horizontal => "horizontal",
            Orientation::Vertical => "vertical",
        }
    }
}

/// Where a new pane goes relative to an existing one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Left,
    #[default]
    Right,
    Top,
    Bottom,
}

impl Position {
    pub fn all() -> &'static [Position] {
        &[Position::Left, Position::Right, Position::Top, Position::Bottom]
    }

    pub fn orientation(self) -> Orientation {
        match self {
            Position::Left | Position::Right => Orientation::Horizontal,
            Position::Top | Position::Bottom => Orientation::Vertical,
        }
    }

    /// Side of the new split the inserted pane lands on
    pub fn new_side(self) -> Side {
        match self {
            Position::Left | Position::Top => Side::First,
            Position::Right | Position::Bottom => Side::Second,
        }
    }

    pub fn parse(s: &str) -> Option<Position> {
        match s.to_ascii_lowercase().as_str() {
            "left" => Some(Position::Left),
            "right" => Some(Position::Right),
            "top" => Some(Position::Top),
            "bottom" => Some(Position::Bottom),
            _ => None,
        }
    }
}

/// One of the two children of a split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    First,
    Second,
}

impl Side {
    pub fn other(self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }
}

/// Container size in device-independent units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }
}

/// Which side keeps its length when the container is resized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SizePolicy {
    /// Divider keeps its relative position
    #[default]
    Proportional,
    /// First pane keeps its length
    FixedFirst,
    /// Second pane keeps its length
    FixedSecond,
}

impl SizePolicy {
    /// Carry a divider position from an old container extent to a new one.
    pub fn carry(self, position: i32, old_extent: i32, new_extent: i32) -> i32 {
        match self {
            SizePolicy::Proportional => {
                if old_extent <= 0 {
                    new_extent / 2
                } else {
                    saturate(i64::from(position) * i64::from(new_extent) / i64::from(old_extent))
                }
            }
            SizePolicy::FixedFirst => position,
            SizePolicy::FixedSecond => {
                saturate(i64::from(new_extent) - i64::from(old_extent) + i64::from(position))
            }
        }
    }
}

fn saturate(value: i64) -> i32 {
    value.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

/// Clamp a divider position into `[min_size, extent - min_size]`.
///
/// A container too small to honour both minimums gets the midpoint.
pub fn clamp_divider(position: i32, min_size: i32, extent: i32) -> i32 {
    if extent < min_size.saturating_mul(2) {
        extent / 2
    } else {
        position.clamp(min_size, extent.saturating_sub(min_size))
    }
}
