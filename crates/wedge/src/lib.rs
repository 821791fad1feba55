#[macro_use]
pub mod macros;

pub mod action;
pub mod geometry;
pub mod gesture;
pub mod inject;
pub mod ipc;
pub mod keymap;
pub mod keys;
pub mod pointer;
pub mod registry;
pub mod wm;
