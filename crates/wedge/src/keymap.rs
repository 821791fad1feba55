//! Per-platform key table.
//!
//! A handful of shortcuts differ between the macOS family and everything
//! else. They are collected here once and looked up by the dispatch layer
//! instead of branching at each call site.

use crate::action::Action;
use crate::keys::{Chord, ChordSpec, Key, KeySpec};
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumString};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, DeserializeFromStr, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive)]
pub enum Platform {
    #[strum(serialize = "macos", serialize = "mac", serialize = "darwin")]
    MacOs,
    #[strum(serialize = "other", serialize = "linux", serialize = "windows")]
    Other,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::Other
        }
    }
}

struct PlatformKeys {
    command: Key,
    delete: Key,
    previous: (&'static [Key], Key),
    redo: (&'static [Key], Key),
}

const MACOS_KEYS: PlatformKeys = PlatformKeys {
    command: Key::Meta,
    delete: Key::Backspace,
    previous: (&[Key::Meta], Key::BracketLeft),
    redo: (&[Key::Meta, Key::Shift], Key::Letter('z')),
};

const OTHER_KEYS: PlatformKeys = PlatformKeys {
    command: Key::Ctrl,
    delete: Key::Delete,
    previous: (&[Key::Alt], Key::Left),
    redo: (&[Key::Ctrl], Key::Letter('y')),
};

/// Modifier glyphs in the order macOS menus print them.
const MAC_MODIFIER_GLYPHS: [(Key, &str); 4] = [
    (Key::Ctrl, "⌃"),
    (Key::Alt, "⌥"),
    (Key::Shift, "⇧"),
    (Key::Meta, "⌘"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keymap {
    pub platform: Platform,
    pub command: Key,
    pub delete: Key,
    pub previous: Chord,
    pub redo: Chord,
}

impl Keymap {
    pub fn for_platform(platform: Platform) -> Self {
        let keys = match platform {
            Platform::MacOs => &MACOS_KEYS,
            Platform::Other => &OTHER_KEYS,
        };
        Self {
            platform,
            command: keys.command,
            delete: keys.delete,
            previous: Chord::new(keys.previous.0, keys.previous.1),
            redo: Chord::new(keys.redo.0, keys.redo.1),
        }
    }

    /// The primary shortcut modifier held with `key`.
    pub fn command(&self, key: Key) -> Chord {
        Chord::new(vec![self.command], key)
    }

    pub fn resolve_key(&self, spec: KeySpec) -> Key {
        match spec {
            KeySpec::Command => self.command,
            KeySpec::Key(key) => key,
        }
    }

    pub fn resolve(&self, spec: &ChordSpec) -> Chord {
        Chord::new(
            spec.modifiers
                .iter()
                .map(|&m| self.resolve_key(m))
                .collect::<Vec<_>>(),
            self.resolve_key(spec.key),
        )
    }

    /// Human readable shortcut, e.g. `Ctrl+A` or `⇧⌘Z`.
    pub fn label(&self, chord: &Chord) -> String {
        match self.platform {
            Platform::Other => chord.to_string(),
            Platform::MacOs => {
                let mut label: String = MAC_MODIFIER_GLYPHS
                    .iter()
                    .filter(|(key, _)| chord.modifiers().contains(key))
                    .map(|(_, glyph)| *glyph)
                    .collect();
                label.push_str(&chord.key().to_string());
                label
            }
        }
    }

    pub fn action_label(&self, action: &Action) -> String {
        action
            .steps()
            .iter()
            .map(|chord| self.label(chord))
            .collect::<Vec<_>>()
            .join(" + ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Builtin;

    #[test]
    fn test_platform_names() {
        assert_eq!("macOS".parse::<Platform>(), Ok(Platform::MacOs));
        assert_eq!("darwin".parse::<Platform>(), Ok(Platform::MacOs));
        assert_eq!("Linux".parse::<Platform>(), Ok(Platform::Other));
        assert!("beos".parse::<Platform>().is_err());
    }

    #[test]
    fn test_command_modifier_per_platform() {
        let spec: ChordSpec = "cmd+c".parse().unwrap();
        let mac = Keymap::for_platform(Platform::MacOs);
        let other = Keymap::for_platform(Platform::Other);
        assert_eq!(mac.resolve(&spec), Chord::new(vec![Key::Meta], Key::Letter('c')));
        assert_eq!(other.resolve(&spec), Chord::new(vec![Key::Ctrl], Key::Letter('c')));
    }

    #[test]
    fn test_previous_and_delete_differ() {
        let mac = Keymap::for_platform(Platform::MacOs);
        let other = Keymap::for_platform(Platform::Other);
        assert_eq!(mac.previous, Chord::new(vec![Key::Meta], Key::BracketLeft));
        assert_eq!(other.previous, Chord::new(vec![Key::Alt], Key::Left));
        assert_eq!(mac.delete, Key::Backspace);
        assert_eq!(other.delete, Key::Delete);
    }

    #[test]
    fn test_labels() {
        let mac = Keymap::for_platform(Platform::MacOs);
        let other = Keymap::for_platform(Platform::Other);

        assert_eq!(other.action_label(&Builtin::SelectAllCopy.action(&other)), "Ctrl+A + Ctrl+C");
        assert_eq!(other.action_label(&Builtin::Next.action(&other)), "Alt+→");
        assert_eq!(mac.action_label(&Builtin::Redo.action(&mac)), "⇧⌘Z");
        assert_eq!(mac.action_label(&Builtin::Previous.action(&mac)), "⌘[");
    }
}
