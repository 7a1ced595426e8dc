// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use buzon_app::Message;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime};

pub mod backend;

pub use backend::{FileBackend, MemoryBackend, StorageBackend};

pub const APP_NAME: &str = "buzon";

/// File name of the single collection key.
pub const STORAGE_FILE: &str = "contact_messages.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub name: String,
    pub email: String,
    pub title: String,
    pub content: String,
}

/// Persistence and query layer over one string-valued key holding a JSON
/// array of messages. Every mutation is a full read-modify-write of the
/// collection; fine for the small single-user datasets this targets, and
/// deliberately unguarded against a second writer (last writer wins).
pub struct MessageStore {
    backend: Box<dyn StorageBackend>,
    clock: Mutex<MillisClock>,
}

impl MessageStore {
    pub fn open(path: &Path) -> Result<Self> {
        let printable = path.to_string_lossy().to_string();
        validate_data_path(&printable)?;
        Ok(Self::with_backend(Box::new(FileBackend::new(path))))
    }

    pub fn open_memory() -> Self {
        Self::with_backend(Box::new(MemoryBackend::default()))
    }

    pub fn with_backend(backend: Box<dyn StorageBackend>) -> Self {
        Self {
            backend,
            clock: Mutex::new(MillisClock::default()),
        }
    }

    /// Appends a new message and rewrites the collection. On a backend
    /// write failure the error propagates and the stored collection is
    /// left as it was.
    pub fn create(&self, input: &NewMessage) -> Result<Message> {
        let now = OffsetDateTime::now_utc();
        let message = Message {
            id: self.next_id(now),
            name: input.name.clone(),
            email: input.email.clone(),
            title: input.title.clone(),
            content: input.content.clone(),
            created_at: format_timestamp(now)?,
        };

        let mut messages = self.list();
        messages.push(message.clone());
        self.persist(&messages)?;
        Ok(message)
    }

    /// Reads the full collection. Missing, unreadable, or unparsable data
    /// yields an empty list so one bad write never bricks the UI.
    pub fn list(&self) -> Vec<Message> {
        let Ok(Some(raw)) = self.backend.read() else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_default()
    }

    /// Removes the message with the given id, if present. Deleting an
    /// unknown id is a no-op, not an error.
    pub fn delete_by_id(&self, id: &str) -> Result<()> {
        let mut messages = self.list();
        messages.retain(|message| message.id != id);
        self.persist(&messages)
    }

    /// Case-insensitive substring search across name, email, title, and
    /// content. The empty query returns the whole collection; that is an
    /// explicit branch, not a side effect of substring matching.
    pub fn search(&self, query: &str) -> Vec<Message> {
        let messages = self.list();
        if query.is_empty() {
            return messages;
        }
        messages
            .into_iter()
            .filter(|message| matches_query(message, query))
            .collect()
    }

    fn persist(&self, messages: &[Message]) -> Result<()> {
        let payload = serde_json::to_string(messages).context("encode message collection")?;
        self.backend.write(&payload)
    }

    fn next_id(&self, now: OffsetDateTime) -> String {
        let millis = (now.unix_timestamp_nanos() / 1_000_000) as i64;
        self.clock
            .lock()
            .map(|mut clock| clock.observe(millis))
            .unwrap_or(millis)
            .to_string()
    }
}

/// Ids are creation-time millis rendered as decimal strings. Two calls in
/// the same millisecond would collide, so the clock never hands out the
/// same value twice within one store.
#[derive(Debug, Default)]
struct MillisClock {
    last: i64,
}

impl MillisClock {
    fn observe(&mut self, millis: i64) -> i64 {
        if millis <= self.last {
            self.last += 1;
        } else {
            self.last = millis;
        }
        self.last
    }
}

pub fn matches_query(message: &Message, query: &str) -> bool {
    let needle = query.to_lowercase();
    [
        &message.name,
        &message.email,
        &message.title,
        &message.content,
    ]
    .into_iter()
    .any(|field| field.to_lowercase().contains(&needle))
}

/// Stable, non-mutating sort by `created_at`. Unparsable timestamps order
/// as oldest. `ascending = false` puts the most recent message first.
pub fn sort_by_date(messages: &[Message], ascending: bool) -> Vec<Message> {
    let mut sorted = messages.to_vec();
    sorted.sort_by(|a, b| {
        let first = sort_key(a);
        let second = sort_key(b);
        if ascending {
            first.cmp(&second)
        } else {
            second.cmp(&first)
        }
    });
    sorted
}

/// The admin panel's derived view: filter when a query is set, then sort.
pub fn filter_and_sort(messages: &[Message], query: &str, ascending: bool) -> Vec<Message> {
    let filtered: Vec<Message> = if query.is_empty() {
        messages.to_vec()
    } else {
        messages
            .iter()
            .filter(|message| matches_query(message, query))
            .cloned()
            .collect()
    };
    sort_by_date(&filtered, ascending)
}

fn sort_key(message: &Message) -> OffsetDateTime {
    parse_timestamp(&message.created_at).unwrap_or(OffsetDateTime::UNIX_EPOCH)
}

fn format_timestamp(value: OffsetDateTime) -> Result<String> {
    value.format(&Rfc3339).context("format creation timestamp")
}

fn parse_timestamp(raw: &str) -> Result<OffsetDateTime> {
    if let Ok(value) = OffsetDateTime::parse(raw, &Rfc3339) {
        return Ok(value);
    }

    if let Ok(value) = PrimitiveDateTime::parse(
        raw,
        &format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    ) {
        return Ok(value.assume_utc());
    }

    if let Ok(value) = PrimitiveDateTime::parse(
        raw,
        &format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    ) {
        return Ok(value.assume_utc());
    }

    bail!("unsupported timestamp format {raw:?}")
}

pub fn default_data_path() -> Result<PathBuf> {
    let data_root = dirs::data_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set [storage].data_path in the config")
    })?;
    Ok(data_root.join(APP_NAME).join(STORAGE_FILE))
}

pub fn validate_data_path(path: &str) -> Result<()> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        bail!("data path is empty");
    }
    if trimmed.contains("://") {
        bail!("data path {trimmed:?} looks like a URL; expected a plain file path");
    }
    if Path::new(trimmed).is_dir() {
        bail!("data path {trimmed:?} is a directory; expected a file path");
    }
    Ok(())
}

/// Seeds a handful of fixed sample messages for `--demo` runs.
pub fn seed_demo_messages(store: &MessageStore) -> Result<()> {
    let samples = [
        (
            "Ana Morales",
            "ana@example.com",
            "Broken faucet",
            "The faucet in unit 4B has been dripping for a week.",
        ),
        (
            "Budi Santoso",
            "budi@example.com",
            "Question about hours",
            "Are you open on Saturdays?",
        ),
        (
            "Carla Reyes",
            "carla@example.com",
            "Thank you",
            "The repair crew was fast and friendly.",
        ),
    ];

    for (name, email, title, content) in samples {
        store.create(&NewMessage {
            name: name.to_owned(),
            email: email.to_owned(),
            title: title.to_owned(),
            content: content.to_owned(),
        })?;
    }
    Ok(())
}
