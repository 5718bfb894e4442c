use anyhow::{anyhow, Context, Result};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::warn;

use super::media::MediaKind;

pub const FAVORITES_KEY: &str = "favorites";

pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to read {}", path.display())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let path = self.path(key);
        fs::write(&path, value).with_context(|| format!("Failed to write {}", path.display()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Favorite {
    #[serde(deserialize_with = "id_number_or_string")]
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: MediaKind,
}

// Older entries were saved with the id taken from a DOM attribute, i.e. a string.
fn id_number_or_string<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(i64),
        Text(String),
    }

    match RawId::deserialize(deserializer)? {
        RawId::Number(n) => Ok(n),
        RawId::Text(s) => s.trim().parse().map_err(de::Error::custom),
    }
}

#[derive(Debug)]
pub struct Favorites<S> {
    store: S,
}

impl<S: KeyValueStore> Favorites<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    // Unreadable or corrupt storage reads as an empty list.
    pub fn list(&self) -> Vec<Favorite> {
        let raw = match self.store.get(FAVORITES_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!("Failed to read favorites: {:#}", e);
                return Vec::new();
            }
        };
        match serde_json::from_str::<Vec<Value>>(&raw) {
            Ok(entries) => entries
                .iter()
                .filter_map(|entry| Favorite::deserialize(entry).ok())
                .collect(),
            Err(e) => {
                warn!("Ignoring corrupt favorites entry: {}", e);
                Vec::new()
            }
        }
    }

    pub fn contains(&self, id: i64, kind: MediaKind) -> bool {
        self.list().iter().any(|f| f.id == id && f.kind == kind)
    }

    pub fn add(&self, id: i64, kind: MediaKind) -> Result<bool> {
        let mut list = self.list();
        if list.iter().any(|f| f.id == id && f.kind == kind) {
            return Ok(false);
        }
        list.push(Favorite { id, kind });
        self.save(&list)?;
        Ok(true)
    }

    pub fn remove(&self, id: i64, kind: MediaKind) -> Result<bool> {
        let list = self.list();
        let kept: Vec<Favorite> = list
            .iter()
            .copied()
            .filter(|f| !(f.id == id && f.kind == kind))
            .collect();
        if kept.len() == list.len() {
            return Ok(false);
        }
        self.save(&kept)?;
        Ok(true)
    }

    fn save(&self, list: &[Favorite]) -> Result<()> {
        let raw = serde_json::to_string(list).context("Failed to encode favorites")?;
        self.store.set(FAVORITES_KEY, &raw)
    }
}
