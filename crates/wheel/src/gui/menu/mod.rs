pub mod model;
pub mod view;

pub use model::{MenuView, WedgeSlot};
pub use view::draw;

pub const ICON_SIZE: i32 = 24;
pub const ICON_GAP: f64 = 4.0;
pub const FONT_FAMILY: &str = "Sans";
pub const ACTION_FONT_SIZE: f64 = 10.0;
pub const SHORTCUT_FONT_SIZE: f64 = 8.5;
pub const LINE_SPACING: f64 = 1.25;
pub const LABEL_MAX_WIDTH: f64 = 56.0;
pub const BORDER_WIDTH: f64 = 2.0;
