use crate::keymap::Keymap;
use crate::keys::{Chord, Key};
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

/// What a menu entry does: one or more chords sent in order. More than one
/// chord makes it a compound action, whose steps are separated by a minimum
/// gap so the target application settles in between.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    steps: Vec<Chord>,
}

impl Action {
    pub fn single(chord: Chord) -> Self {
        Self { steps: vec![chord] }
    }

    pub fn sequence(steps: Vec<Chord>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Chord] {
        &self.steps
    }

    pub fn is_compound(&self) -> bool {
        self.steps.len() > 1
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, DeserializeFromStr, EnumString, EnumIter, StrumDisplay,
)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum Builtin {
    SelectAllCopy,
    Redo,
    Next,
    Copy,
    Paste,
    Cut,
    Previous,
    Undo,
    SelectAll,
    Delete,
}

impl Builtin {
    pub fn title(self) -> &'static str {
        match self {
            Self::SelectAllCopy => "Select All + Copy",
            Self::Redo => "Redo",
            Self::Next => "Next",
            Self::Copy => "Copy",
            Self::Paste => "Paste",
            Self::Cut => "Cut",
            Self::Previous => "Previous",
            Self::Undo => "Undo",
            Self::SelectAll => "Select All",
            Self::Delete => "Delete",
        }
    }

    pub fn action(self, keymap: &Keymap) -> Action {
        let command = |c| keymap.command(Key::Letter(c));
        match self {
            Self::SelectAllCopy => Action::sequence(vec![command('a'), command('c')]),
            Self::Redo => Action::single(keymap.redo.clone()),
            Self::Next => Action::single(Chord::new(vec![Key::Alt], Key::Right)),
            Self::Copy => Action::single(command('c')),
            Self::Paste => Action::single(command('v')),
            Self::Cut => Action::single(command('x')),
            Self::Previous => Action::single(keymap.previous.clone()),
            Self::Undo => Action::single(command('z')),
            Self::SelectAll => Action::single(command('a')),
            Self::Delete => Action::single(Chord::bare(keymap.delete)),
        }
    }
}
