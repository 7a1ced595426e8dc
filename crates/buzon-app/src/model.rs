// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use serde::{Deserialize, Serialize};

/// One contact-form submission. Field names serialize in camelCase so the
/// persisted JSON layout stays `{"id": ..., "createdAt": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub name: String,
    pub email: String,
    pub title: String,
    pub content: String,
    /// RFC 3339 timestamp assigned at creation, never updated.
    pub created_at: String,
}
