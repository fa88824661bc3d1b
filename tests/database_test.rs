// ABOUTME: Integration tests for the SQLite message log and summary store
// ABOUTME: Checks ordering, scoping, lineage persistence, and file-backed durability
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use chrono::Duration;
use common::{base_time, create_test_database, insert_leaf, seed_messages};
use conversation_summarizer::database::{Database, MessageStore, SummaryStore};
use conversation_summarizer::models::{Message, MessageRole, NewSummaryNode};
use tempfile::TempDir;

#[tokio::test]
async fn test_fetch_range_is_inclusive_and_session_scoped() {
    let database = create_test_database().await.unwrap();
    seed_messages(&database, "s-1", &[1, 2, 3, 4]).await;
    seed_messages(&database, "s-2", &[5, 6]).await;

    let messages = database.messages().fetch_range("s-1", 2, 5).await.unwrap();
    let ids: Vec<i64> = messages.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![2, 3, 4]);
    assert_eq!(messages[0].role, MessageRole::Assistant);
}

#[tokio::test]
async fn test_fetch_range_orders_by_creation_time_then_id() {
    let database = create_test_database().await.unwrap();
    let manager = database.messages();
    let at = |secs: i64| base_time() + Duration::seconds(secs);
    for (id, created_at) in [(1, at(10)), (2, at(5)), (3, at(5))] {
        manager
            .import(&Message {
                id,
                session_id: "s-1".to_owned(),
                role: MessageRole::User,
                content: format!("m{id}"),
                created_at,
            })
            .await
            .unwrap();
    }

    let ids: Vec<i64> = manager
        .fetch_range("s-1", 1, 3)
        .await
        .unwrap()
        .iter()
        .map(|m| m.id)
        .collect();
    assert_eq!(ids, vec![2, 3, 1]);
}

#[tokio::test]
async fn test_append_assigns_increasing_ids() {
    let database = create_test_database().await.unwrap();
    let manager = database.messages();
    let first = manager.append("s-1", MessageRole::User, "hello").await.unwrap();
    let second = manager
        .append("s-1", MessageRole::Assistant, "hi there")
        .await
        .unwrap();

    assert!(second.id > first.id);
    let fetched = manager.fetch_range("s-1", first.id, second.id).await.unwrap();
    assert_eq!(fetched, vec![first, second]);
}

#[tokio::test]
async fn test_find_by_ids_is_scoped_to_session_and_user() {
    let database = create_test_database().await.unwrap();
    let mine = insert_leaf(&database, "s-1", "u-1", "mine").await;
    let other_user = insert_leaf(&database, "s-1", "u-2", "theirs").await;
    let other_session = insert_leaf(&database, "s-2", "u-1", "elsewhere").await;

    let found = database
        .summaries()
        .find_by_ids("s-1", "u-1", &[mine.id, other_user.id, other_session.id, 404])
        .await
        .unwrap();
    assert_eq!(found, vec![mine]);

    assert!(database
        .summaries()
        .find_by_ids("s-1", "u-1", &[])
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn test_merge_parents_survive_storage() {
    let database = create_test_database().await.unwrap();
    let store = database.summaries();
    let saved = store
        .insert(NewSummaryNode::merge("s-1", "u-1", "merged", vec![9, 2, 5]).unwrap())
        .await
        .unwrap();

    let found = store.find_by_ids("s-1", "u-1", &[saved.id]).await.unwrap();
    assert_eq!(found[0].parent_summary_ids(), Some(&[9, 2, 5][..]));
    assert_eq!(found[0].original_message_count, 3);
    assert_eq!(found[0].created_at, saved.created_at);
}

#[tokio::test]
async fn test_file_database_persists_across_reopen() {
    let dir = TempDir::new().unwrap();
    let url = format!("sqlite:{}", dir.path().join("summaries.db").display());

    let saved = {
        let database = Database::new(&url).await.unwrap();
        insert_leaf(&database, "s-1", "u-1", "durable").await
    };

    let reopened = Database::new(&url).await.unwrap();
    let listed = reopened
        .summaries()
        .list_by_session_and_user("s-1", "u-1")
        .await
        .unwrap();
    assert_eq!(listed, vec![saved]);
}

#[tokio::test]
async fn test_administrative_deactivation_keeps_node_listed() {
    let database = create_test_database().await.unwrap();
    let store = database.summaries();
    let node = insert_leaf(&database, "s-1", "u-1", "retired").await;

    assert!(!store.set_active(node.id, "u-2", false).await.unwrap());
    assert!(!store.set_active(404, "u-1", false).await.unwrap());
    assert!(store.set_active(node.id, "u-1", false).await.unwrap());

    let listed = store.list_by_session_and_user("s-1", "u-1").await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(!listed[0].is_active);
    assert_eq!(listed[0].content, "retired");

    assert!(store.set_active(node.id, "u-1", true).await.unwrap());
    let listed = store.list_by_session_and_user("s-1", "u-1").await.unwrap();
    assert!(listed[0].is_active);
}
