use crate::events::AppEvent;
use crate::sys::dispatch::SharedDispatchSettings;
use async_channel::{Receiver, Sender};
use std::thread;
use tokio::runtime::Runtime;
use wedge::action::Action;

pub fn start_background_services(
    tx: Sender<AppEvent>,
    actions: Receiver<Action>,
    dispatch: SharedDispatchSettings,
) {
    thread::spawn(move || {
        let rt = Runtime::new().expect("Failed to create Tokio runtime");

        rt.block_on(async {
            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::sys::server::run_server(tx).await;
                });
            }

            {
                let tx = tx.clone();
                tokio::spawn(async move {
                    crate::config::run_async_watcher(tx).await;
                });
            }

            tokio::spawn(crate::sys::dispatch::run_dispatcher(actions, dispatch));

            std::future::pending::<()>().await;
        });
    });
}
