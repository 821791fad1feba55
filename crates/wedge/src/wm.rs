use crate::geometry::Point;
use derive_more::{AsRef, Deref, Display, From, Into};
use hyprland::data::{CursorPosition, Monitors};
use hyprland::prelude::*;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct MonitorName(String);

crate::impl_string_newtype!(MonitorName);

pub fn get_active_monitor() -> Option<MonitorName> {
    Monitors::get()
        .ok()?
        .into_iter()
        .find(|m| m.focused)
        .map(|m| MonitorName(m.name))
}

/// Cursor position relative to the top-left corner of the focused monitor,
/// which is the coordinate space of the overlay.
pub fn get_cursor_pos_on_active_monitor() -> Option<Point> {
    let cursor = CursorPosition::get().ok()?;
    let monitors = Monitors::get().ok()?;
    let focused = monitors.into_iter().find(|m| m.focused)?;

    let x = cursor.x as f64 - focused.x as f64;
    let y = cursor.y as f64 - focused.y as f64;

    Some(Point::new(x, y))
}
