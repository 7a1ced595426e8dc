// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// One string-valued key holding the whole collection.
/// `read` returns `None` when nothing has been written yet.
pub trait StorageBackend {
    fn read(&self) -> Result<Option<String>>;
    fn write(&self, payload: &str) -> Result<()>;
}

/// Backing for tests and `--demo` runs; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    cell: Mutex<Option<String>>,
}

impl StorageBackend for MemoryBackend {
    fn read(&self) -> Result<Option<String>> {
        let cell = self
            .cell
            .lock()
            .map_err(|_| anyhow::anyhow!("memory backend lock poisoned"))?;
        Ok(cell.clone())
    }

    fn write(&self, payload: &str) -> Result<()> {
        let mut cell = self
            .cell
            .lock()
            .map_err(|_| anyhow::anyhow!("memory backend lock poisoned"))?;
        *cell = Some(payload.to_owned());
        Ok(())
    }
}

/// One JSON file on disk. Writes land in a sibling temp file first and are
/// renamed into place, so a failed write never truncates the collection.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StorageBackend for FileBackend {
    fn read(&self) -> Result<Option<String>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("read data file {}", self.path.display()))?;
        Ok(Some(raw))
    }

    fn write(&self, payload: &str) -> Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("create data directory {}", parent.display()))?;
        }

        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, payload)
            .with_context(|| format!("write data file {}", staging.display()))?;
        fs::rename(&staging, &self.path)
            .with_context(|| format!("replace data file {}", self.path.display()))
    }
}
