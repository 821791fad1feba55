//! Synthetic keyboard input.
//!
//! Actions are replayed as raw key down/up events. A chord presses its
//! modifiers, waits for them to settle, taps the key and releases the
//! modifiers in reverse order. Steps of a compound action are spaced by
//! [`KeystrokeTiming::sequence_gap`].

use crate::action::Action;
use crate::keys::{Chord, Key};
use serde_with::DeserializeFromStr;
use std::future::Future;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;
use tokio::process::Command;

const YDOTOOL: &str = "ydotool";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDirection {
    Down,
    Up,
}

impl KeyDirection {
    fn state(self) -> u8 {
        match self {
            Self::Down => 1,
            Self::Up => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeystrokeTiming {
    /// Pause between pressing the modifiers and tapping the key.
    pub settle: Duration,
    /// Minimum pause between the steps of a compound action.
    pub sequence_gap: Duration,
}

impl Default for KeystrokeTiming {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(100),
            sequence_gap: Duration::from_millis(100),
        }
    }
}

#[derive(Debug, Error)]
pub enum InjectError {
    #[error("key {0} has no input event code")]
    Unmapped(Key),
    #[error("failed to run ydotool: {0}")]
    Io(#[from] std::io::Error),
    #[error("ydotool exited with {0}")]
    Status(ExitStatus),
}

pub trait Keyboard {
    fn send(
        &mut self,
        key: Key,
        direction: KeyDirection,
    ) -> impl Future<Output = Result<(), InjectError>> + Send;
}

/// Sends events through `ydotool key`, which talks to the `ydotoold` uinput
/// daemon and so works under any Wayland compositor.
#[derive(Debug, Clone, Default)]
pub struct Ydotool;

impl Keyboard for Ydotool {
    async fn send(&mut self, key: Key, direction: KeyDirection) -> Result<(), InjectError> {
        let code = key.code().ok_or(InjectError::Unmapped(key))?;
        let status = Command::new(YDOTOOL)
            .arg("key")
            .arg(format!("{}:{}", code, direction.state()))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await?;

        if status.success() {
            Ok(())
        } else {
            Err(InjectError::Status(status))
        }
    }
}

/// Logs events instead of sending them.
#[derive(Debug, Clone, Default)]
pub struct DryRun;

impl Keyboard for DryRun {
    async fn send(&mut self, key: Key, direction: KeyDirection) -> Result<(), InjectError> {
        log::info!("[dry-run] {} {:?}", key, direction);
        Ok(())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, DeserializeFromStr, EnumString, StrumDisplay,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum BackendKind {
    #[default]
    Ydotool,
    DryRun,
}

#[derive(Debug, Clone)]
pub enum KeyboardBackend {
    Ydotool(Ydotool),
    DryRun(DryRun),
}

impl From<BackendKind> for KeyboardBackend {
    fn from(kind: BackendKind) -> Self {
        match kind {
            BackendKind::Ydotool => Self::Ydotool(Ydotool),
            BackendKind::DryRun => Self::DryRun(DryRun),
        }
    }
}

impl Keyboard for KeyboardBackend {
    async fn send(&mut self, key: Key, direction: KeyDirection) -> Result<(), InjectError> {
        match self {
            Self::Ydotool(k) => k.send(key, direction).await,
            Self::DryRun(k) => k.send(key, direction).await,
        }
    }
}

async fn tap<K: Keyboard>(keyboard: &mut K, key: Key) -> Result<(), InjectError> {
    keyboard.send(key, KeyDirection::Down).await?;
    keyboard.send(key, KeyDirection::Up).await
}

pub async fn press_chord<K: Keyboard>(
    keyboard: &mut K,
    chord: &Chord,
    settle: Duration,
) -> Result<(), InjectError> {
    let mut held = Vec::with_capacity(chord.modifiers().len());
    let mut result = Ok(());
    for &modifier in chord.modifiers() {
        result = keyboard.send(modifier, KeyDirection::Down).await;
        if result.is_err() {
            break;
        }
        held.push(modifier);
    }

    if result.is_ok() {
        if !held.is_empty() {
            tokio::time::sleep(settle).await;
        }
        result = tap(keyboard, chord.key()).await;
    }

    // whatever went down must come back up, whichever step failed
    release(keyboard, &held).await;
    result
}

async fn release<K: Keyboard>(keyboard: &mut K, held: &[Key]) {
    for &modifier in held.iter().rev() {
        if let Err(e) = keyboard.send(modifier, KeyDirection::Up).await {
            log::error!("Failed to release {}: {}", modifier, e);
        }
    }
}

pub async fn perform<K: Keyboard>(
    keyboard: &mut K,
    action: &Action,
    timing: KeystrokeTiming,
) -> Result<(), InjectError> {
    for (i, chord) in action.steps().iter().enumerate() {
        if i > 0 {
            tokio::time::sleep(timing.sequence_gap).await;
        }
        log::debug!("Sending {}", chord);
        press_chord(keyboard, chord, timing.settle).await?;
    }
    Ok(())
}
