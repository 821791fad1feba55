use crate::events::AppEvent;
use crate::sys::dispatch::DispatchSettings;
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use serde::Deserialize;
use serde_with::DeserializeFromStr;
use std::time::Duration;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;
use wedge::action::{Action, Builtin};
use wedge::geometry::RingGeometry;
use wedge::gesture::{GestureConfig, GestureMode};
use wedge::inject::{BackendKind, KeystrokeTiming};
use wedge::keymap::{Keymap, Platform};
use wedge::keys::ChordSpec;
use wedge::pointer::Button;
use wedge::registry::{ActionRegistry, MenuEntry, RegistryError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, DeserializeFromStr, EnumString, StrumDisplay)]
#[strum(ascii_case_insensitive)]
pub enum PlatformChoice {
    #[default]
    #[strum(serialize = "auto")]
    Auto,
    #[strum(serialize = "macos", serialize = "mac", serialize = "darwin")]
    MacOs,
    #[strum(serialize = "other", serialize = "linux", serialize = "windows")]
    Other,
}

impl PlatformChoice {
    pub fn resolve(self) -> Platform {
        match self {
            Self::Auto => Platform::current(),
            Self::MacOs => Platform::MacOs,
            Self::Other => Platform::Other,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GestureSettings {
    pub mode: GestureMode,
    pub hold_ms: u64,
    pub button: Button,
}

impl Default for GestureSettings {
    fn default() -> Self {
        Self {
            mode: GestureMode::Hold,
            hold_ms: 200,
            button: Button::RIGHT,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MenuSettings {
    /// Side of the square the menu is drawn in. The ring has to fit inside
    /// it; the menu itself is always centered on the press.
    pub size: f64,
    pub inner_radius: f64,
    pub outer_radius: f64,
}

impl Default for MenuSettings {
    fn default() -> Self {
        let ring = RingGeometry::default();
        Self {
            size: ring.size,
            inner_radius: ring.inner_radius,
            outer_radius: ring.outer_radius,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct KeySettings {
    pub platform: PlatformChoice,
    pub backend: BackendKind,
    pub settle_ms: u64,
    pub sequence_gap_ms: u64,
    pub dispatch_delay_ms: u64,
}

impl Default for KeySettings {
    fn default() -> Self {
        Self {
            platform: PlatformChoice::Auto,
            backend: BackendKind::Ydotool,
            settle_ms: 100,
            sequence_gap_ms: 100,
            dispatch_delay_ms: 10,
        }
    }
}

/// One `[[entries]]` table. Exactly one of `action` and `keys` must be set.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EntryConfig {
    pub name: Option<String>,
    pub action: Option<Builtin>,
    pub keys: Option<Vec<ChordSpec>>,
    pub label: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub gesture: GestureSettings,
    #[serde(default)]
    pub menu: MenuSettings,
    #[serde(default)]
    pub keys: KeySettings,
    #[serde(default)]
    pub entries: Vec<EntryConfig>,
}

/// Everything the daemon derives from a [`Config`].
#[derive(Debug, Clone)]
pub struct Settings {
    pub gesture: GestureConfig,
    pub registry: ActionRegistry,
    pub dispatch: DispatchSettings,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("Menu error: {0}")]
    Registry(#[from] RegistryError),
    #[error("Entry {index}: set exactly one of `action` or `keys`")]
    AmbiguousEntry { index: usize },
    #[error("Entry {index}: `keys` is empty")]
    EmptyKeys { index: usize },
    #[error("Entry {index}: entries with custom `keys` need a `name`")]
    UnnamedEntry { index: usize },
    #[error(
        "Invalid menu ring: need 0 <= inner_radius ({inner}) < outer_radius ({outer}) <= size ({size}) / 2"
    )]
    InvalidRing { size: f64, inner: f64, outer: f64 },
}

impl EntryConfig {
    fn to_entry(&self, index: usize, keymap: &Keymap) -> Result<MenuEntry, ConfigError> {
        let (name, action) = match (&self.action, &self.keys) {
            (Some(builtin), None) => (
                self.name
                    .clone()
                    .unwrap_or_else(|| builtin.title().to_string()),
                builtin.action(keymap),
            ),
            (None, Some(keys)) if keys.is_empty() => return Err(ConfigError::EmptyKeys { index }),
            (None, Some(keys)) => (
                self.name
                    .clone()
                    .ok_or(ConfigError::UnnamedEntry { index })?,
                Action::sequence(keys.iter().map(|spec| keymap.resolve(spec)).collect()),
            ),
            _ => return Err(ConfigError::AmbiguousEntry { index }),
        };

        let label = self
            .label
            .clone()
            .unwrap_or_else(|| keymap.action_label(&action));

        let entry = MenuEntry::new(name, action, label);
        Ok(match &self.icon {
            Some(icon) => entry.with_icon(icon.clone()),
            None => entry,
        })
    }
}

impl Config {
    pub fn keymap(&self) -> Keymap {
        Keymap::for_platform(self.keys.platform.resolve())
    }

    pub fn ring(&self) -> Result<RingGeometry, ConfigError> {
        let (size, inner_radius, outer_radius) =
            (self.menu.size, self.menu.inner_radius, self.menu.outer_radius);
        if !(inner_radius >= 0.0 && inner_radius < outer_radius && 2.0 * outer_radius <= size) {
            return Err(ConfigError::InvalidRing {
                size,
                inner: inner_radius,
                outer: outer_radius,
            });
        }
        Ok(RingGeometry {
            size,
            inner_radius,
            outer_radius,
        })
    }

    pub fn gesture_config(&self) -> Result<GestureConfig, ConfigError> {
        Ok(GestureConfig {
            mode: self.gesture.mode,
            hold: Duration::from_millis(self.gesture.hold_ms),
            button: self.gesture.button,
            ring: self.ring()?,
        })
    }

    /// An empty `entries` list selects the built-in menu.
    pub fn build_registry(&self, keymap: &Keymap) -> Result<ActionRegistry, ConfigError> {
        if self.entries.is_empty() {
            log::info!("No entries configured, using the built-in menu");
            return Ok(ActionRegistry::default_menu(keymap));
        }

        let entries = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, cfg)| cfg.to_entry(i, keymap))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ActionRegistry::try_from_entries(entries)?)
    }

    pub fn dispatch_settings(&self) -> DispatchSettings {
        DispatchSettings {
            backend: self.keys.backend,
            timing: KeystrokeTiming {
                settle: Duration::from_millis(self.keys.settle_ms),
                sequence_gap: Duration::from_millis(self.keys.sequence_gap_ms),
            },
            delay: Duration::from_millis(self.keys.dispatch_delay_ms),
        }
    }

    pub fn resolve(&self) -> Result<Settings, ConfigError> {
        let keymap = self.keymap();
        Ok(Settings {
            gesture: self.gesture_config()?,
            registry: self.build_registry(&keymap)?,
            dispatch: self.dispatch_settings(),
        })
    }
}

impl Settings {
    /// Built-in settings, used when the configuration cannot be loaded.
    pub fn fallback() -> Self {
        let config = Config::default();
        Self {
            gesture: GestureConfig::default(),
            registry: ActionRegistry::default_menu(&config.keymap()),
            dispatch: config.dispatch_settings(),
        }
    }
}

pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "troia", "wheel").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;

    let s = config::Config::builder()
        .add_source(config::File::from(config_path).required(false))
        .add_source(
            config::Environment::with_prefix("WHEEL")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn parse_config(toml: &str) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    Ok(s.try_deserialize()?)
}

pub fn load_settings() -> Result<Settings, ConfigError> {
    load_config()?.resolve()
}

pub fn load_or_default() -> Settings {
    match load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Failed to load config, using built-in menu: {}", e);
            Settings::fallback()
        }
    }
}

pub fn write_default_config() -> std::io::Result<std::path::PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

pub const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", ConfigError::from(e));
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", ConfigError::from(e));
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let touches_config = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                ) && event.paths.iter().any(|p| p == &config_path);

                if touches_config && tx.send(AppEvent::ConfigReload).await.is_err() {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}
