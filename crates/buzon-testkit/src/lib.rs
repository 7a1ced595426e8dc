// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};
use buzon_app::Message;
use buzon_store::{MessageStore, NewMessage, StorageBackend};
use std::path::PathBuf;
use tempfile::TempDir;

/// Builds a message with a fixed id/timestamp so ordering tests are
/// deterministic. `minute` doubles as the id suffix.
pub fn message_at(minute: u8, name: &str, title: &str) -> Message {
    Message {
        id: format!("17565000000{minute:02}"),
        name: name.to_owned(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        title: title.to_owned(),
        content: format!("{title} -- details"),
        created_at: format!("2026-08-29T12:{minute:02}:00Z"),
    }
}

pub fn new_message(name: &str, email: &str, title: &str, content: &str) -> NewMessage {
    NewMessage {
        name: name.to_owned(),
        email: email.to_owned(),
        title: title.to_owned(),
        content: content.to_owned(),
    }
}

/// A file-backed store in a temp directory. Keep the `TempDir` alive for
/// the duration of the test.
pub fn temp_store() -> Result<(TempDir, PathBuf, MessageStore)> {
    let dir = TempDir::new()?;
    let path = dir.path().join("contact_messages.json");
    let store = MessageStore::open(&path)?;
    Ok((dir, path, store))
}

/// Backend whose writes always fail, for exercising the abort-on-write
/// error path. Reads serve whatever the initial payload was.
#[derive(Debug, Default)]
pub struct FailingWriteBackend {
    initial: Option<String>,
}

impl FailingWriteBackend {
    pub fn with_payload(payload: &str) -> Self {
        Self {
            initial: Some(payload.to_owned()),
        }
    }
}

impl StorageBackend for FailingWriteBackend {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.initial.clone())
    }

    fn write(&self, _payload: &str) -> Result<()> {
        bail!("storage write refused (quota exceeded)");
    }
}

/// Backend whose reads fail outright, for the lenient-read policy.
#[derive(Debug, Default)]
pub struct FailingReadBackend;

impl StorageBackend for FailingReadBackend {
    fn read(&self) -> Result<Option<String>> {
        bail!("storage read refused");
    }

    fn write(&self, _payload: &str) -> Result<()> {
        Ok(())
    }
}
