use gtk::gdk;
use gtk::prelude::*;
use gtk4 as gtk;
use gtk4_layer_shell::{Edge, Layer, LayerShell};
use wedge::wm::{self, MonitorName};

/// Fullscreen transparent overlay: the menu is drawn at the gesture anchor
/// and pointer input anywhere on the monitor reaches the daemon.
pub fn init_layer_shell(window: &gtk::ApplicationWindow) {
    window.init_layer_shell();
    window.set_layer(Layer::Overlay);
    window.set_namespace(Some("wheel"));
    window.set_exclusive_zone(-1);
    for edge in [Edge::Left, Edge::Right, Edge::Top, Edge::Bottom] {
        window.set_anchor(edge, true);
    }
    window.set_keyboard_mode(gtk4_layer_shell::KeyboardMode::OnDemand);
}

pub fn get_monitor_by_name(name: &MonitorName) -> Option<gdk::Monitor> {
    let display = gdk::Display::default()?;
    let monitors = display.monitors();
    (0..monitors.n_items()).find_map(|i| {
        monitors
            .item(i)
            .and_then(|item| item.downcast::<gdk::Monitor>().ok())
            .filter(|m| m.connector().is_some_and(|n| n.as_str() == **name))
    })
}

pub fn set_window_monitor(window: &gtk::ApplicationWindow, monitor_name: &MonitorName) {
    if let Some(monitor) = get_monitor_by_name(monitor_name) {
        window.set_monitor(Some(&monitor));
    }
}

/// Anchor coordinates are relative to the focused monitor, so the overlay
/// has to be on it.
pub fn move_to_active_monitor(window: &gtk::ApplicationWindow) {
    match wm::get_active_monitor() {
        Some(name) => set_window_monitor(window, &name),
        None => log::debug!("No focused monitor reported, keeping overlay where it is"),
    }
}
