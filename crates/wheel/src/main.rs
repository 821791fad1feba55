use parking_lot::RwLock;
use relm4::prelude::*;
use std::sync::Arc;
use wheel::config;
use wheel::gui::app::{AppInit, AppModel};
use wheel::sys::runtime;

fn main() {
    env_logger::init();

    match config::write_default_config() {
        Ok(path) => log::debug!("Config file: {}", path.display()),
        Err(e) => log::warn!("Failed to write default config: {}", e),
    }
    let settings = config::load_or_default();
    log::info!("Loaded {} menu entries", settings.registry.len());

    let dispatch = Arc::new(RwLock::new(settings.dispatch));
    let (tx, rx) = async_channel::bounded(32);
    let (action_tx, action_rx) = async_channel::unbounded();

    // Start Background Services
    runtime::start_background_services(tx, action_rx, dispatch.clone());

    let app = RelmApp::new("org.troia.wheel");

    app.run::<AppModel>(AppInit {
        settings,
        dispatch,
        actions: action_tx,
        events: rx,
    });
}
