// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Result, bail};

/// The public contact form. All four fields are required; the email check
/// is a crude contains-'@' test since there is no server to verify against.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageFormInput {
    pub name: String,
    pub email: String,
    pub title: String,
    pub content: String,
}

impl MessageFormInput {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("name is required -- enter your name and retry");
        }
        if self.email.trim().is_empty() {
            bail!("email is required -- enter your email and retry");
        }
        if !self.email.contains('@') {
            bail!("email must contain @ -- fix the address and retry");
        }
        if self.title.trim().is_empty() {
            bail!("title is required -- enter a title and retry");
        }
        if self.content.trim().is_empty() {
            bail!("message is required -- write a message and retry");
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginFormInput {
    pub username: String,
    pub password: String,
}

impl LoginFormInput {
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            bail!("username is required -- enter a username and retry");
        }
        if self.password.is_empty() {
            bail!("password is required -- enter a password and retry");
        }
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
