pub mod app;
pub mod bridge;
pub mod icon;
pub mod menu;
pub mod theme;
pub mod window;
