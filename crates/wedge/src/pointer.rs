use crate::geometry::Point;
use derive_more::{Display, From, Into};
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::str::FromStr;
use thiserror::Error;

/// Pointer button, numbered the X11/GTK way (1 left, 2 middle, 3 right).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, From, Into, SerializeDisplay, DeserializeFromStr,
)]
pub struct Button(u32);

impl Button {
    pub const LEFT: Button = Button(1);
    pub const MIDDLE: Button = Button(2);
    pub const RIGHT: Button = Button(3);

    pub fn new(number: u32) -> Self {
        Self(number)
    }

    pub fn number(self) -> u32 {
        self.0
    }
}

impl Default for Button {
    fn default() -> Self {
        Self::RIGHT
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown pointer button '{0}'")]
pub struct ButtonParseError(String);

impl FromStr for Button {
    type Err = ButtonParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(Self::LEFT),
            "middle" => Ok(Self::MIDDLE),
            "right" => Ok(Self::RIGHT),
            other => other
                .parse::<u32>()
                .ok()
                .filter(|&n| n > 0)
                .map(Self)
                .ok_or_else(|| ButtonParseError(s.to_string())),
        }
    }
}

/// Raw event from a pointer source. Coordinates are absolute screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Press { position: Point, button: Button },
    Release { position: Point, button: Button },
    Move { position: Point },
}

impl PointerEvent {
    pub fn position(&self) -> Point {
        match self {
            Self::Press { position, .. }
            | Self::Release { position, .. }
            | Self::Move { position } => *position,
        }
    }
}
