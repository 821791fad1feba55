use serde_with::DeserializeFromStr;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A physical key on a US layout keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Ctrl,
    Shift,
    Alt,
    Meta,
    /// Lowercase ASCII letter.
    Letter(char),
    /// Top-row digit, 0 to 9.
    Digit(u8),
    /// Function key, 1 to 12.
    F(u8),
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    Backspace,
    Enter,
    Escape,
    Tab,
    Space,
    BracketLeft,
    BracketRight,
    Minus,
    Equal,
    Comma,
    Period,
    Slash,
}

const LETTER_ROWS: [(&str, u16); 3] = [("qwertyuiop", 16), ("asdfghjkl", 30), ("zxcvbnm", 44)];

impl Key {
    pub fn is_modifier(self) -> bool {
        matches!(self, Self::Ctrl | Self::Shift | Self::Alt | Self::Meta)
    }

    /// Linux input event code (`linux/input-event-codes.h`).
    pub fn code(self) -> Option<u16> {
        let code = match self {
            Self::Ctrl => 29,
            Self::Shift => 42,
            Self::Alt => 56,
            Self::Meta => 125,
            Self::Letter(c) => {
                return LETTER_ROWS.iter().find_map(|(row, base)| {
                    row.find(c.to_ascii_lowercase()).map(|i| base + i as u16)
                });
            }
            Self::Digit(0) => 11,
            Self::Digit(d @ 1..=9) => 1 + d as u16,
            Self::Digit(_) => return None,
            Self::F(n @ 1..=10) => 58 + n as u16,
            Self::F(11) => 87,
            Self::F(12) => 88,
            Self::F(_) => return None,
            Self::Left => 105,
            Self::Right => 106,
            Self::Up => 103,
            Self::Down => 108,
            Self::Home => 102,
            Self::End => 107,
            Self::PageUp => 104,
            Self::PageDown => 109,
            Self::Insert => 110,
            Self::Delete => 111,
            Self::Backspace => 14,
            Self::Enter => 28,
            Self::Escape => 1,
            Self::Tab => 15,
            Self::Space => 57,
            Self::BracketLeft => 26,
            Self::BracketRight => 27,
            Self::Minus => 12,
            Self::Equal => 13,
            Self::Comma => 51,
            Self::Period => 52,
            Self::Slash => 53,
        };
        Some(code)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ctrl => f.write_str("Ctrl"),
            Self::Shift => f.write_str("Shift"),
            Self::Alt => f.write_str("Alt"),
            Self::Meta => f.write_str("Super"),
            Self::Letter(c) => write!(f, "{}", c.to_ascii_uppercase()),
            Self::Digit(d) => write!(f, "{d}"),
            Self::F(n) => write!(f, "F{n}"),
            Self::Left => f.write_str("←"),
            Self::Right => f.write_str("→"),
            Self::Up => f.write_str("↑"),
            Self::Down => f.write_str("↓"),
            Self::Home => f.write_str("Home"),
            Self::End => f.write_str("End"),
            Self::PageUp => f.write_str("PgUp"),
            Self::PageDown => f.write_str("PgDn"),
            Self::Insert => f.write_str("Ins"),
            Self::Delete => f.write_str("Del"),
            Self::Backspace => f.write_str("Backspace"),
            Self::Enter => f.write_str("Enter"),
            Self::Escape => f.write_str("Esc"),
            Self::Tab => f.write_str("Tab"),
            Self::Space => f.write_str("Space"),
            Self::BracketLeft => f.write_str("["),
            Self::BracketRight => f.write_str("]"),
            Self::Minus => f.write_str("-"),
            Self::Equal => f.write_str("="),
            Self::Comma => f.write_str(","),
            Self::Period => f.write_str("."),
            Self::Slash => f.write_str("/"),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ChordParseError {
    #[error("empty key name in '{0}'")]
    EmptyKey(String),
    #[error("unknown key '{0}'")]
    UnknownKey(String),
    #[error("'{0}' is not a modifier")]
    NotAModifier(String),
}

impl FromStr for Key {
    type Err = ChordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        let mut chars = name.chars();
        let key = match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_lowercase() => Self::Letter(c),
            (Some(c), None) if c.is_ascii_digit() => Self::Digit(c as u8 - b'0'),
            _ => match name.as_str() {
                "ctrl" | "control" => Self::Ctrl,
                "shift" => Self::Shift,
                "alt" | "option" | "opt" => Self::Alt,
                "meta" | "super" | "win" | "logo" => Self::Meta,
                "left" => Self::Left,
                "right" => Self::Right,
                "up" => Self::Up,
                "down" => Self::Down,
                "home" => Self::Home,
                "end" => Self::End,
                "pageup" | "pgup" => Self::PageUp,
                "pagedown" | "pgdn" => Self::PageDown,
                "insert" | "ins" => Self::Insert,
                "delete" | "del" => Self::Delete,
                "backspace" => Self::Backspace,
                "enter" | "return" => Self::Enter,
                "escape" | "esc" => Self::Escape,
                "tab" => Self::Tab,
                "space" => Self::Space,
                "[" | "bracketleft" => Self::BracketLeft,
                "]" | "bracketright" => Self::BracketRight,
                "-" | "minus" => Self::Minus,
                "=" | "equal" => Self::Equal,
                "," | "comma" => Self::Comma,
                "." | "period" => Self::Period,
                "/" | "slash" => Self::Slash,
                f if f.starts_with('f') => f[1..]
                    .parse::<u8>()
                    .ok()
                    .filter(|n| (1..=12).contains(n))
                    .map(Self::F)
                    .ok_or_else(|| ChordParseError::UnknownKey(s.to_string()))?,
                _ => return Err(ChordParseError::UnknownKey(s.to_string())),
            },
        };
        Ok(key)
    }
}

/// A shortcut: modifiers held while one key is tapped.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Chord {
    modifiers: Vec<Key>,
    key: Key,
}

impl Chord {
    pub fn new(modifiers: impl Into<Vec<Key>>, key: Key) -> Self {
        Self {
            modifiers: modifiers.into(),
            key,
        }
    }

    pub fn bare(key: Key) -> Self {
        Self::new(Vec::new(), key)
    }

    pub fn modifiers(&self) -> &[Key] {
        &self.modifiers
    }

    pub fn key(&self) -> Key {
        self.key
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for m in &self.modifiers {
            write!(f, "{m}+")?;
        }
        write!(f, "{}", self.key)
    }
}

/// A key as written in config: either a physical key or the platform's
/// primary shortcut modifier (`cmd`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySpec {
    Command,
    Key(Key),
}

impl KeySpec {
    fn is_modifier(self) -> bool {
        match self {
            Self::Command => true,
            Self::Key(k) => k.is_modifier(),
        }
    }
}

impl FromStr for KeySpec {
    type Err = ChordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cmd" | "command" | "primary" => Ok(Self::Command),
            _ => s.parse().map(Self::Key),
        }
    }
}

/// An unresolved chord such as `cmd+shift+z`.
#[derive(Debug, Clone, PartialEq, Eq, DeserializeFromStr)]
pub struct ChordSpec {
    pub modifiers: Vec<KeySpec>,
    pub key: KeySpec,
}

impl FromStr for ChordSpec {
    type Err = ChordParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s
            .split('+')
            .map(|part| {
                let part = part.trim();
                if part.is_empty() {
                    Err(ChordParseError::EmptyKey(s.to_string()))
                } else {
                    part.parse::<KeySpec>().map(|spec| (part, spec))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        let (_, key) = parts
            .pop()
            .ok_or_else(|| ChordParseError::EmptyKey(s.to_string()))?;

        let modifiers = parts
            .into_iter()
            .map(|(name, spec)| {
                spec.is_modifier()
                    .then_some(spec)
                    .ok_or_else(|| ChordParseError::NotAModifier(name.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { modifiers, key })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_names() {
        let cases = vec![
            ("a", Key::Letter('a')),
            ("Z", Key::Letter('z')),
            ("7", Key::Digit(7)),
            ("ctrl", Key::Ctrl),
            ("Super", Key::Meta),
            ("del", Key::Delete),
            ("[", Key::BracketLeft),
            ("f11", Key::F(11)),
            ("PgDn", Key::PageDown),
        ];

        for (name, expected) in cases {
            assert_eq!(name.parse::<Key>(), Ok(expected), "{name}");
        }
        assert!("f13".parse::<Key>().is_err());
        assert!("hyper".parse::<Key>().is_err());
    }

    #[test]
    fn test_event_codes() {
        assert_eq!(Key::Letter('a').code(), Some(30));
        assert_eq!(Key::Letter('c').code(), Some(46));
        assert_eq!(Key::Letter('y').code(), Some(21));
        assert_eq!(Key::Letter('z').code(), Some(44));
        assert_eq!(Key::Digit(0).code(), Some(11));
        assert_eq!(Key::Digit(1).code(), Some(2));
        assert_eq!(Key::F(1).code(), Some(59));
        assert_eq!(Key::F(12).code(), Some(88));
        assert_eq!(Key::Ctrl.code(), Some(29));
        assert_eq!(Key::Letter('!').code(), None);
    }

    #[test]
    fn test_chord_spec_parsing() {
        let spec: ChordSpec = "cmd+shift+z".parse().unwrap();
        assert_eq!(
            spec.modifiers,
            vec![KeySpec::Command, KeySpec::Key(Key::Shift)]
        );
        assert_eq!(spec.key, KeySpec::Key(Key::Letter('z')));

        let bare: ChordSpec = "delete".parse().unwrap();
        assert!(bare.modifiers.is_empty());
        assert_eq!(bare.key, KeySpec::Key(Key::Delete));
    }

    #[test]
    fn test_chord_spec_errors() {
        assert!(matches!(
            "a+ctrl".parse::<ChordSpec>(),
            Err(ChordParseError::NotAModifier(_))
        ));
        assert!(matches!(
            "ctrl++a".parse::<ChordSpec>(),
            Err(ChordParseError::EmptyKey(_))
        ));
        assert!(matches!(
            "ctrl+nope".parse::<ChordSpec>(),
            Err(ChordParseError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_chord_display() {
        let chord = Chord::new(vec![Key::Alt], Key::Right);
        assert_eq!(chord.to_string(), "Alt+→");
        assert_eq!(Chord::bare(Key::Delete).to_string(), "Del");
    }

    #[test]
    fn test_chord_spec_deserialization() {
        let spec: ChordSpec = serde_json::from_str("\"ctrl+t\"").unwrap();
        assert_eq!(spec.key, KeySpec::Key(Key::Letter('t')));
    }
}
