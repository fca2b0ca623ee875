use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    /// Follow `prefers-color-scheme`.
    System,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::System => "system",
        }
    }

    fn parse(s: &str) -> Option<ThemeMode> {
        match s {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            "system" => Some(ThemeMode::System),
            _ => None,
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the preference is encoded in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeStorage {
    /// `themeMode` = `light` | `dark` | `system`.
    TriState,
    /// `darkmode` = `active`, or absent for light.
    Binary,
}

impl ThemeStorage {
    pub fn key(self) -> &'static str {
        match self {
            ThemeStorage::TriState => "themeMode",
            ThemeStorage::Binary => "darkmode",
        }
    }

    pub fn default_mode(self) -> ThemeMode {
        match self {
            ThemeStorage::TriState => ThemeMode::System,
            ThemeStorage::Binary => ThemeMode::Light,
        }
    }

    fn decode(self, stored: Option<&str>) -> ThemeMode {
        match self {
            ThemeStorage::TriState => stored
                .and_then(ThemeMode::parse)
                .unwrap_or(ThemeMode::System),
            ThemeStorage::Binary => {
                if stored == Some("active") {
                    ThemeMode::Dark
                } else {
                    ThemeMode::Light
                }
            }
        }
    }

    fn encode(self, mode: ThemeMode) -> anyhow::Result<Option<&'static str>> {
        match (self, mode) {
            (ThemeStorage::TriState, mode) => Ok(Some(mode.as_str())),
            (ThemeStorage::Binary, ThemeMode::Dark) => Ok(Some("active")),
            (ThemeStorage::Binary, ThemeMode::Light) => Ok(None),
            (ThemeStorage::Binary, ThemeMode::System) => {
                anyhow::bail!("binary theme storage has no system mode")
            }
        }
    }
}

/// Key/value storage the theme preference is persisted in.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()>;
    fn remove(&mut self, key: &str) -> anyhow::Result<()>;
}

#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Preferences kept as a flat JSON object on disk.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `preferences.json` under the platform data directory.
    pub fn default_path() -> anyhow::Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("dev", "packhub", "packhub-pages")
            .context("could not determine a data directory for preferences")?;
        Ok(dirs.data_dir().join("preferences.json"))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> anyhow::Result<BTreeMap<String, String>> {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e).with_context(|| format!("read {}", self.path.display())),
        };
        serde_json::from_slice(&bytes).with_context(|| format!("parse {}", self.path.display()))
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
        }
        let json = serde_json::to_vec_pretty(entries).context("serialize preferences")?;
        std::fs::write(&self.path, json).with_context(|| format!("write {}", self.path.display()))
    }
}

impl PreferenceStore for FileStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&mut self, key: &str) -> anyhow::Result<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// Current theme mode, backed by a [`PreferenceStore`].
pub struct ThemeController<S> {
    store: S,
    storage: ThemeStorage,
    mode: ThemeMode,
}

impl<S: PreferenceStore> ThemeController<S> {
    /// Reads the stored preference and writes the resolved mode straight back,
    /// so a missing or unrecognized value is replaced by the default.
    pub fn load(store: S, storage: ThemeStorage) -> anyhow::Result<Self> {
        let stored = store
            .get(storage.key())
            .with_context(|| format!("read theme preference {}", storage.key()))?;
        let mode = storage.decode(stored.as_deref());
        tracing::debug!(key = storage.key(), ?stored, %mode, "loaded theme preference");

        let mut controller = Self {
            store,
            storage,
            mode,
        };
        controller.persist()?;
        Ok(controller)
    }

    pub fn mode(&self) -> ThemeMode {
        self.mode
    }

    pub fn storage(&self) -> ThemeStorage {
        self.storage
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn set(&mut self, mode: ThemeMode) -> anyhow::Result<()> {
        self.storage.encode(mode)?;
        self.mode = mode;
        self.persist()
    }

    /// Advances to the next mode and persists it.
    ///
    /// Tri-state: `system` flips to the opposite of what the system currently shows,
    /// an explicit `light`/`dark` goes back to `system`. Binary: light and dark alternate.
    pub fn toggle(&mut self, system_prefers_dark: bool) -> anyhow::Result<ThemeMode> {
        let next = match (self.storage, self.mode) {
            (ThemeStorage::TriState, ThemeMode::System) => {
                if system_prefers_dark {
                    ThemeMode::Light
                } else {
                    ThemeMode::Dark
                }
            }
            (ThemeStorage::TriState, _) => ThemeMode::System,
            (ThemeStorage::Binary, ThemeMode::Dark) => ThemeMode::Light,
            (ThemeStorage::Binary, _) => ThemeMode::Dark,
        };
        self.set(next)?;
        Ok(next)
    }

    /// Class put on `<body>`; `None` means no class.
    pub fn body_class(&self) -> Option<&'static str> {
        body_class(self.storage, self.mode)
    }

    /// The concrete light/dark in force.
    pub fn effective(&self, system_prefers_dark: bool) -> ThemeMode {
        match self.mode {
            ThemeMode::System if system_prefers_dark => ThemeMode::Dark,
            ThemeMode::System => ThemeMode::Light,
            mode => mode,
        }
    }

    fn persist(&mut self) -> anyhow::Result<()> {
        let key = self.storage.key();
        let res = match self.storage.encode(self.mode)? {
            Some(value) => self.store.set(key, value),
            None => self.store.remove(key),
        };
        res.with_context(|| format!("persist theme preference {}", key))
    }
}

pub fn body_class(storage: ThemeStorage, mode: ThemeMode) -> Option<&'static str> {
    match storage {
        ThemeStorage::TriState => Some(mode.as_str()),
        ThemeStorage::Binary => (mode == ThemeMode::Dark).then_some("darkmode"),
    }
}
