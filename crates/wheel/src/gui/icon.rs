use derive_more::{AsRef, Deref, Display, From, Into};
use freedesktop_icons::lookup;
use gdk_pixbuf::Pixbuf;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, Deref, From, Into, AsRef)]
pub struct IconName(String);

wedge::impl_string_newtype!(IconName);

/// Resolves an icon theme name, or an absolute path, to a file.
pub fn find_icon_path(icon_name: &IconName, size: u16) -> Option<PathBuf> {
    if icon_name.is_empty() {
        return None;
    }

    let path = Path::new(icon_name.as_str());
    if path.is_absolute() {
        return path.exists().then(|| path.to_path_buf());
    }

    lookup(icon_name.as_str())
        .with_size(size)
        .with_scale(1)
        .find()
}

pub fn load_icon(icon_name: &IconName, size: i32) -> Option<Pixbuf> {
    let path = find_icon_path(icon_name, size.clamp(1, u16::MAX as i32) as u16)?;
    match Pixbuf::from_file_at_scale(&path, size, size, true) {
        Ok(pixbuf) => Some(pixbuf),
        Err(e) => {
            log::warn!("Failed to load icon {}: {}", path.display(), e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_icons_resolve_to_none() {
        assert_eq!(find_icon_path(&IconName::from(""), 32), None);
        assert_eq!(
            find_icon_path(&IconName::from("/nonexistent/wheel/icon.png"), 32),
            None
        );
    }
}
