// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use buzon_store::{
    MessageStore, filter_and_sort, matches_query, sort_by_date, validate_data_path,
};
use buzon_testkit::{FailingReadBackend, FailingWriteBackend, message_at, new_message, temp_store};
use std::collections::BTreeSet;

#[test]
fn validate_data_path_rejects_urls_and_directories() {
    assert!(validate_data_path("").is_err());
    assert!(validate_data_path("https://example.com/messages.json").is_err());
    assert!(validate_data_path("/tmp").is_err());
    assert!(validate_data_path("/tmp/buzon-messages.json").is_ok());
}

#[test]
fn create_then_list_returns_the_stored_message() -> Result<()> {
    let store = MessageStore::open_memory();

    let created = store.create(&new_message(
        "Ana",
        "ana@example.com",
        "Hola",
        "Saludos desde el sur",
    ))?;

    let messages = store.list();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0], created);
    assert_eq!(messages[0].name, "Ana");
    assert_eq!(messages[0].email, "ana@example.com");
    assert_eq!(messages[0].title, "Hola");
    assert_eq!(messages[0].content, "Saludos desde el sur");
    assert!(!messages[0].id.is_empty());
    assert!(!messages[0].created_at.is_empty());
    Ok(())
}

#[test]
fn rapid_creates_get_distinct_ids() -> Result<()> {
    let store = MessageStore::open_memory();

    for index in 0..20 {
        store.create(&new_message(
            "Ana",
            "ana@example.com",
            &format!("Message {index}"),
            "body",
        ))?;
    }

    let ids: BTreeSet<String> = store.list().into_iter().map(|message| message.id).collect();
    assert_eq!(ids.len(), 20);
    Ok(())
}

#[test]
fn list_is_empty_for_a_fresh_store() {
    let store = MessageStore::open_memory();
    assert!(store.list().is_empty());
}

#[test]
fn corrupt_payload_reads_as_empty() -> Result<()> {
    let (_dir, path, store) = temp_store()?;
    store.create(&new_message("Ana", "ana@example.com", "Hola", "body"))?;

    std::fs::write(&path, "{not json")?;
    assert!(store.list().is_empty());

    // The store is still usable after the bad payload.
    store.create(&new_message("Budi", "budi@example.com", "Halo", "body"))?;
    assert_eq!(store.list().len(), 1);
    Ok(())
}

#[test]
fn unreadable_backend_reads_as_empty() {
    let store = MessageStore::with_backend(Box::new(FailingReadBackend));
    assert!(store.list().is_empty());
    assert!(store.search("anything").is_empty());
}

#[test]
fn failed_write_aborts_create_and_surfaces_the_error() {
    let store = MessageStore::with_backend(Box::new(FailingWriteBackend::with_payload("[]")));

    let error = store
        .create(&new_message("Ana", "ana@example.com", "Hola", "body"))
        .expect_err("write failure should propagate");
    assert!(error.to_string().contains("storage write refused"));
    assert!(store.list().is_empty());
}

#[test]
fn delete_removes_only_the_matching_id() -> Result<()> {
    let store = MessageStore::open_memory();
    let first = store.create(&new_message("Ana", "ana@example.com", "Uno", "body"))?;
    let second = store.create(&new_message("Budi", "budi@example.com", "Dos", "body"))?;

    store.delete_by_id(&first.id)?;

    let remaining = store.list();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, second.id);
    Ok(())
}

#[test]
fn delete_of_unknown_id_is_a_no_op() -> Result<()> {
    let store = MessageStore::open_memory();
    let created = store.create(&new_message("Ana", "ana@example.com", "Hola", "body"))?;

    store.delete_by_id("no-such-id")?;
    store.delete_by_id(&created.id)?;
    store.delete_by_id(&created.id)?;

    assert!(store.list().is_empty());
    Ok(())
}

#[test]
fn search_matches_any_field_case_insensitively() -> Result<()> {
    let store = MessageStore::open_memory();
    store.create(&new_message(
        "Ana Morales",
        "ana@example.com",
        "Broken faucet",
        "The kitchen faucet drips.",
    ))?;
    store.create(&new_message(
        "Budi Santoso",
        "budi@shop.example",
        "Opening hours",
        "Open Saturdays?",
    ))?;

    assert_eq!(store.search("FAUCET").len(), 1);
    assert_eq!(store.search("budi@shop").len(), 1);
    assert_eq!(store.search("saturdays").len(), 1);
    assert_eq!(store.search("morales").len(), 1);
    assert_eq!(store.search("example").len(), 2);
    assert!(store.search("zzz").is_empty());
    Ok(())
}

#[test]
fn empty_search_returns_every_message() -> Result<()> {
    let store = MessageStore::open_memory();
    for index in 0..3 {
        store.create(&new_message(
            "Ana",
            "ana@example.com",
            &format!("Message {index}"),
            "body",
        ))?;
    }

    assert_eq!(store.search("").len(), 3);
    Ok(())
}

#[test]
fn matches_query_checks_exactly_the_four_fields() {
    let message = message_at(5, "Ana", "Broken gate");
    assert!(matches_query(&message, "broken"));
    assert!(matches_query(&message, "ana@example.com"));
    assert!(!matches_query(&message, &message.id));
    assert!(!matches_query(&message, "2026-08-29"));
}

#[test]
fn sort_orders_by_creation_time() {
    let older = message_at(1, "Ana", "First");
    let newer = message_at(2, "Budi", "Second");
    let messages = vec![older.clone(), newer.clone()];

    let descending = sort_by_date(&messages, false);
    assert_eq!(descending, vec![newer.clone(), older.clone()]);

    let ascending = sort_by_date(&messages, true);
    assert_eq!(ascending, vec![older, newer]);
}

#[test]
fn sort_is_idempotent_and_reverses_with_direction() {
    let messages = vec![
        message_at(3, "Ana", "C"),
        message_at(1, "Budi", "A"),
        message_at(2, "Carla", "B"),
    ];

    let ascending = sort_by_date(&messages, true);
    assert_eq!(sort_by_date(&ascending, true), ascending);

    let descending = sort_by_date(&messages, false);
    let mut reversed = descending.clone();
    reversed.reverse();
    assert_eq!(reversed, ascending);
}

#[test]
fn sort_is_stable_for_equal_timestamps() {
    let first = message_at(7, "Ana", "First in");
    let mut second = message_at(7, "Budi", "Second in");
    second.id = "distinct-id".to_owned();
    let messages = vec![first.clone(), second.clone()];

    let ascending = sort_by_date(&messages, true);
    assert_eq!(ascending, vec![first.clone(), second.clone()]);

    let descending = sort_by_date(&messages, false);
    assert_eq!(descending, vec![first, second]);
}

#[test]
fn sort_does_not_mutate_its_input() {
    let messages = vec![message_at(2, "Ana", "B"), message_at(1, "Budi", "A")];
    let snapshot = messages.clone();
    let _sorted = sort_by_date(&messages, true);
    assert_eq!(messages, snapshot);
}

#[test]
fn unparsable_timestamps_sort_as_oldest() {
    let mut broken = message_at(9, "Ana", "Broken clock");
    broken.created_at = "not-a-date".to_owned();
    let fine = message_at(1, "Budi", "Fine");

    let ascending = sort_by_date(&[fine.clone(), broken.clone()], true);
    assert_eq!(ascending, vec![broken.clone(), fine.clone()]);

    let descending = sort_by_date(&[fine.clone(), broken.clone()], false);
    assert_eq!(descending, vec![fine, broken]);
}

#[test]
fn space_separated_timestamps_still_parse() {
    let mut legacy = message_at(1, "Ana", "Legacy");
    legacy.created_at = "2026-08-29 12:30:00".to_owned();
    let newer = message_at(5, "Budi", "Newer");

    let descending = sort_by_date(&[legacy.clone(), newer.clone()], false);
    assert_eq!(descending, vec![legacy, newer]);
}

#[test]
fn filter_and_sort_combines_query_and_direction() {
    let messages = vec![
        message_at(1, "Ana", "Faucet drip"),
        message_at(3, "Budi", "Faucet replacement"),
        message_at(2, "Carla", "Gate latch"),
    ];

    let visible = filter_and_sort(&messages, "faucet", false);
    assert_eq!(visible.len(), 2);
    assert_eq!(visible[0].name, "Budi");
    assert_eq!(visible[1].name, "Ana");

    let everything = filter_and_sort(&messages, "", true);
    assert_eq!(everything.len(), 3);
    assert_eq!(everything[0].name, "Ana");
    assert_eq!(everything[2].name, "Budi");
}

#[test]
fn file_store_survives_reopen() -> Result<()> {
    let (_dir, path, store) = temp_store()?;
    store.create(&new_message("Ana", "ana@example.com", "Hola", "body"))?;
    drop(store);

    let reopened = MessageStore::open(&path)?;
    let messages = reopened.list();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].name, "Ana");
    Ok(())
}

#[test]
fn persisted_layout_is_a_json_array_with_camel_case_dates() -> Result<()> {
    let (_dir, path, store) = temp_store()?;
    store.create(&new_message("Ana", "ana@example.com", "Hola", "body"))?;

    let raw = std::fs::read_to_string(&path)?;
    let value: serde_json::Value = serde_json::from_str(&raw)?;
    let records = value.as_array().expect("top-level JSON array");
    assert_eq!(records.len(), 1);
    assert!(records[0].get("createdAt").is_some());
    assert!(records[0].get("created_at").is_none());
    Ok(())
}

#[test]
fn demo_seed_creates_searchable_messages() -> Result<()> {
    let store = MessageStore::open_memory();
    buzon_store::seed_demo_messages(&store)?;

    assert_eq!(store.list().len(), 3);
    assert_eq!(store.search("faucet").len(), 1);
    Ok(())
}
