// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

/// Credentials that ship with the app when the config file does not set a
/// pair. Client-side only; this is not a security boundary.
pub const DEFAULT_ADMIN_USERNAME: &str = "dapsz082";
pub const DEFAULT_ADMIN_PASSWORD: &str = "082197";

pub trait AuthenticationProvider {
    fn validate(&self, username: &str, password: &str) -> bool;
}

/// Checks against one configured username/password pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedCredentials {
    username: String,
    password: String,
}

impl FixedCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Default for FixedCredentials {
    fn default() -> Self {
        Self::new(DEFAULT_ADMIN_USERNAME, DEFAULT_ADMIN_PASSWORD)
    }
}

impl AuthenticationProvider for FixedCredentials {
    fn validate(&self, username: &str, password: &str) -> bool {
        username == self.username && password == self.password
    }
}
