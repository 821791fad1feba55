use crate::action::{Action, Builtin};
use crate::geometry::WedgeGeometry;
use crate::keymap::Keymap;
use derive_more::{AsRef, Deref, Display, From, Into};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use thiserror::Error;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct EntryName(String);

crate::impl_string_newtype!(EntryName);

#[derive(Debug, Clone, PartialEq)]
pub struct MenuEntry {
    pub name: EntryName,
    pub action: Action,
    pub shortcut_label: String,
    /// Icon name or path, only used for drawing.
    pub icon: Option<String>,
}

impl MenuEntry {
    pub fn new(name: impl Into<String>, action: Action, shortcut_label: impl Into<String>) -> Self {
        Self {
            name: EntryName::new(name),
            action,
            shortcut_label: shortcut_label.into(),
            icon: None,
        }
    }

    pub fn builtin(builtin: Builtin, keymap: &Keymap) -> Self {
        let action = builtin.action(keymap);
        let label = keymap.action_label(&action);
        Self::new(builtin.title(), action, label)
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("menu needs at least one entry")]
    Empty,
    #[error("{order:?} is not a permutation of {len} entries")]
    InvalidPermutation { order: Vec<usize>, len: usize },
}

/// Ordered menu entries. Position in the list is position on the ring, so
/// every mutation changes the whole layout.
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    entries: Vec<MenuEntry>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn try_from_entries(entries: Vec<MenuEntry>) -> Result<Self, RegistryError> {
        if entries.is_empty() {
            return Err(RegistryError::Empty);
        }
        Ok(Self { entries })
    }

    /// The eight entry menu used when no configuration is available.
    pub fn default_menu(keymap: &Keymap) -> Self {
        let entries = [
            (Builtin::SelectAllCopy, "edit-select-all"),
            (Builtin::Redo, "edit-redo"),
            (Builtin::Next, "go-next"),
            (Builtin::Copy, "edit-copy"),
            (Builtin::Paste, "edit-paste"),
            (Builtin::Cut, "edit-cut"),
            (Builtin::Undo, "edit-undo"),
            (Builtin::SelectAll, "edit-select-all"),
        ]
        .into_iter()
        .map(|(builtin, icon)| MenuEntry::builtin(builtin, keymap).with_icon(icon))
        .collect();

        Self { entries }
    }

    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&MenuEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entry_count(&self) -> Option<NonZeroUsize> {
        NonZeroUsize::new(self.entries.len())
    }

    pub fn wedges(&self) -> Vec<WedgeGeometry> {
        WedgeGeometry::layout(self.entries.len())
    }

    pub fn append(&mut self, entry: MenuEntry) {
        let mut entries = self.entries.clone();
        entries.push(entry);
        self.entries = entries;
    }

    /// Removes every entry called `name`. An unknown name is not an error,
    /// but removing the last entry is refused.
    pub fn remove(&mut self, name: &str) -> Result<Option<MenuEntry>, RegistryError> {
        let (removed, kept): (Vec<_>, Vec<_>) = self
            .entries
            .iter()
            .cloned()
            .partition(|entry| entry.name.as_str() == name);

        if removed.is_empty() {
            return Ok(None);
        }
        if kept.is_empty() {
            return Err(RegistryError::Empty);
        }
        self.entries = kept;
        Ok(removed.into_iter().next())
    }

    /// Rearranges entries so that new position `i` holds old entry `order[i]`.
    pub fn reorder(&mut self, order: &[usize]) -> Result<(), RegistryError> {
        let invalid = || RegistryError::InvalidPermutation {
            order: order.to_vec(),
            len: self.entries.len(),
        };
        if order.len() != self.entries.len() {
            return Err(invalid());
        }

        let mut seen = vec![false; order.len()];
        for &i in order {
            match seen.get_mut(i) {
                Some(slot) if !*slot => *slot = true,
                _ => return Err(invalid()),
            }
        }

        self.entries = order.iter().map(|&i| self.entries[i].clone()).collect();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::Platform;

    fn names(registry: &ActionRegistry) -> Vec<&str> {
        registry.entries().iter().map(|e| e.name.as_str()).collect()
    }

    fn registry() -> ActionRegistry {
        let keymap = Keymap::for_platform(Platform::Other);
        let entries = [Builtin::Copy, Builtin::Paste, Builtin::Cut]
            .into_iter()
            .map(|b| MenuEntry::builtin(b, &keymap))
            .collect();
        ActionRegistry::try_from_entries(entries).unwrap()
    }

    #[test]
    fn test_default_menu_layout() {
        let menu = ActionRegistry::default_menu(&Keymap::for_platform(Platform::Other));
        assert_eq!(menu.len(), 8);
        assert_eq!(menu.wedges().len(), 8);
        assert_eq!(menu.get(0).unwrap().name.as_str(), "Select All + Copy");
        assert_eq!(menu.get(0).unwrap().shortcut_label, "Ctrl+A + Ctrl+C");
    }

    #[test]
    fn test_empty_registry_rejected() {
        assert_eq!(
            ActionRegistry::try_from_entries(Vec::new()).unwrap_err(),
            RegistryError::Empty
        );
        assert!(ActionRegistry::new().entry_count().is_none());
    }

    #[test]
    fn test_append_grows_layout() {
        let mut menu = registry();
        let keymap = Keymap::for_platform(Platform::Other);
        menu.append(MenuEntry::builtin(Builtin::Undo, &keymap));
        assert_eq!(names(&menu), ["Copy", "Paste", "Cut", "Undo"]);
        assert_eq!(menu.wedges().len(), 4);
    }

    #[test]
    fn test_remove() {
        let mut menu = registry();
        assert_eq!(menu.remove("Nope"), Ok(None));
        assert_eq!(menu.len(), 3);

        let removed = menu.remove("Paste").unwrap().unwrap();
        assert_eq!(removed.name.as_str(), "Paste");
        assert_eq!(names(&menu), ["Copy", "Cut"]);
    }

    #[test]
    fn test_remove_last_entry_refused() {
        let mut menu = registry();
        menu.remove("Copy").unwrap();
        menu.remove("Paste").unwrap();
        assert_eq!(menu.remove("Cut"), Err(RegistryError::Empty));
        assert_eq!(names(&menu), ["Cut"]);
    }

    #[test]
    fn test_reorder() {
        let mut menu = registry();
        menu.reorder(&[2, 0, 1]).unwrap();
        assert_eq!(names(&menu), ["Cut", "Copy", "Paste"]);
    }

    #[test]
    fn test_reorder_rejects_bad_permutations() {
        let mut menu = registry();
        for order in [&[0, 1][..], &[0, 1, 1][..], &[0, 1, 3][..], &[0, 1, 2, 3][..]] {
            assert!(matches!(
                menu.reorder(order),
                Err(RegistryError::InvalidPermutation { len: 3, .. })
            ));
        }
        assert_eq!(names(&menu), ["Copy", "Paste", "Cut"]);
    }
}
