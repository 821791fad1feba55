use async_channel::Receiver;
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use wedge::action::Action;
use wedge::inject::{self, BackendKind, InjectError, Keyboard, KeyboardBackend, KeystrokeTiming};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DispatchSettings {
    pub backend: BackendKind,
    pub timing: KeystrokeTiming,
    /// Wait before the first key so the menu is gone before the target
    /// window sees input.
    pub delay: Duration,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            backend: BackendKind::default(),
            timing: KeystrokeTiming::default(),
            delay: Duration::from_millis(10),
        }
    }
}

/// Written by the GUI thread on config reload, read by the worker.
pub type SharedDispatchSettings = Arc<RwLock<DispatchSettings>>;

pub async fn dispatch<K: Keyboard>(
    keyboard: &mut K,
    action: &Action,
    settings: &DispatchSettings,
) -> Result<(), InjectError> {
    tokio::time::sleep(settings.delay).await;
    inject::perform(keyboard, action, settings.timing).await
}

/// Runs queued actions one at a time until the channel closes.
pub async fn run_dispatcher(rx: Receiver<Action>, settings: SharedDispatchSettings) {
    while let Ok(action) = rx.recv().await {
        let current = *settings.read();
        let mut keyboard = KeyboardBackend::from(current.backend);

        if let Err(e) = dispatch(&mut keyboard, &action, &current).await {
            log::error!("Failed to send shortcut: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::Instant;
    use wedge::inject::KeyDirection;
    use wedge::keys::{Chord, Key};

    #[derive(Default)]
    struct RecordingKeyboard {
        events: Vec<(Instant, Key, KeyDirection)>,
    }

    impl Keyboard for RecordingKeyboard {
        async fn send(&mut self, key: Key, direction: KeyDirection) -> Result<(), InjectError> {
            self.events.push((Instant::now(), key, direction));
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatch_waits_before_first_key() {
        let settings = DispatchSettings {
            delay: Duration::from_millis(10),
            ..Default::default()
        };
        let action = Action::single(Chord::bare(Key::Delete));
        let mut kb = RecordingKeyboard::default();

        let start = Instant::now();
        dispatch(&mut kb, &action, &settings).await.unwrap();

        assert_eq!(kb.events.len(), 2);
        assert!(kb.events[0].0 - start >= settings.delay);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dispatcher_drains_queue_with_dry_run() {
        let (tx, rx) = async_channel::unbounded();
        let settings = Arc::new(RwLock::new(DispatchSettings {
            backend: BackendKind::DryRun,
            ..Default::default()
        }));

        let worker = tokio::spawn(run_dispatcher(rx, settings));
        tx.send(Action::single(Chord::new(vec![Key::Ctrl], Key::Letter('c'))))
            .await
            .unwrap();
        tx.send(Action::single(Chord::bare(Key::Delete))).await.unwrap();
        drop(tx);

        worker.await.unwrap();
    }
}
