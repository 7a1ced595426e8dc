// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use buzon_app::{AuthenticationProvider, FixedCredentials, Message, MessageFormInput};
use buzon_store::{MessageStore, NewMessage};
use buzon_tui::AppRuntime;

/// Wires the UI to the message store and the configured credential pair.
pub struct StoreRuntime<'a> {
    store: &'a MessageStore,
    credentials: FixedCredentials,
}

impl<'a> StoreRuntime<'a> {
    pub fn new(store: &'a MessageStore, credentials: FixedCredentials) -> Self {
        Self { store, credentials }
    }
}

impl AppRuntime for StoreRuntime<'_> {
    fn load_messages(&mut self) -> Result<Vec<Message>> {
        Ok(self.store.list())
    }

    fn submit_message(&mut self, form: &MessageFormInput) -> Result<Message> {
        form.validate()?;
        self.store.create(&NewMessage {
            name: form.name.clone(),
            email: form.email.clone(),
            title: form.title.clone(),
            content: form.content.clone(),
        })
    }

    fn delete_message(&mut self, id: &str) -> Result<()> {
        self.store.delete_by_id(id)
    }

    fn authenticate(&mut self, username: &str, password: &str) -> bool {
        self.credentials.validate(username, password)
    }
}
