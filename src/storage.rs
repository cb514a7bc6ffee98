use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::Context;

use crate::meals::dto::MealSnapshot;
use crate::meals::model::Meal;

/// Whole-collection persistence for the meal list.
///
/// `read_all` returns `Ok(None)` when nothing has been stored yet; a
/// snapshot that exists but cannot be decoded is an error.
pub trait MealStore: Send + Sync {
    fn read_all(&self) -> anyhow::Result<Option<Vec<Meal>>>;
    fn write_all(&self, meals: &[Meal]) -> anyhow::Result<()>;
}

pub fn encode_snapshot(meals: &[Meal]) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(&MealSnapshot::capture(meals)).context("serialize meal snapshot")
}

pub fn decode_snapshot(data: &[u8]) -> anyhow::Result<Vec<Meal>> {
    let snapshot: MealSnapshot =
        serde_json::from_slice(data).context("parse meal snapshot")?;
    snapshot.into_meals()
}

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "meals.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl MealStore for FileStore {
    fn read_all(&self) -> anyhow::Result<Option<Vec<Meal>>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read(&self.path)
            .with_context(|| format!("read meal store {}", self.path.display()))?;
        decode_snapshot(&data)
            .with_context(|| format!("decode meal store {}", self.path.display()))
            .map(Some)
    }

    fn write_all(&self, meals: &[Meal]) -> anyhow::Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("create store directory {}", dir.display()))?;
        }

        let data = encode_snapshot(meals)?;
        let tmp_path = self.tmp_path();
        let written = write_synced(&tmp_path, &data).and_then(|()| {
            fs::rename(&tmp_path, &self.path)
                .with_context(|| format!("replace meal store {}", self.path.display()))
        });
        if written.is_err() {
            let _ = fs::remove_file(&tmp_path);
        }
        written
    }
}

fn write_synced(path: &Path, data: &[u8]) -> anyhow::Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("create temp store file {}", path.display()))?;
    file.write_all(data)
        .with_context(|| format!("write temp store file {}", path.display()))?;
    file.sync_all()
        .with_context(|| format!("sync temp store file {}", path.display()))
}

/// In-process store holding the encoded snapshot bytes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: Mutex<Option<Vec<u8>>>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with raw bytes, valid or not.
    pub fn with_bytes(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: Mutex::new(Some(data.into())),
            fail_writes: false,
        }
    }

    /// Store whose writes always fail.
    pub fn failing() -> Self {
        Self {
            data: Mutex::new(None),
            fail_writes: true,
        }
    }

    pub fn bytes(&self) -> Option<Vec<u8>> {
        self.data
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl MealStore for MemoryStore {
    fn read_all(&self) -> anyhow::Result<Option<Vec<Meal>>> {
        self.bytes().map(|data| decode_snapshot(&data)).transpose()
    }

    fn write_all(&self, meals: &[Meal]) -> anyhow::Result<()> {
        anyhow::ensure!(!self.fail_writes, "memory store is read-only");
        let data = encode_snapshot(meals)?;
        *self
            .data
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(data);
        Ok(())
    }
}
