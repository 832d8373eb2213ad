//! Mutation service integration tests
//!
//! Exercises append/edit/remove and the listing modes directly at the
//! service layer, which both the REST handlers and the gateway dispatch
//! call into. All tests require a database and skip cleanly without one.

use pretty_assertions::assert_eq;
use serial_test::serial;

use huddle::backend::error::ApiError;
use huddle::backend::messages::service::{
    append_message, edit_message, ensure_channel_member, list_messages, list_messages_after,
    remove_message,
};
use huddle::backend::messages::DEFAULT_PAGE_SIZE;

use crate::common::auth_helpers::create_unique_test_user;
use crate::common::database::{seed_workspace_with_channel, TestDatabase};
use crate::{assert_err, assert_ok};

#[tokio::test]
#[serial]
async fn test_append_enriches_with_author_profile() {
    let Some(db) = TestDatabase::connect().await else { return };
    let user = create_unique_test_user(db.pool()).await.unwrap();
    let (_, channel) = seed_workspace_with_channel(db.pool(), user.id)
        .await
        .unwrap();

    let record = assert_ok!(
        append_message(
            db.pool(),
            channel.id,
            &user.identity(),
            Some("first message"),
            &[],
        )
        .await
    );

    assert_eq!(record.channel_id, channel.id);
    assert_eq!(record.author_id, user.id);
    assert_eq!(record.author_name, user.username);
    assert_eq!(record.content.as_deref(), Some("first message"));
    assert!(record.image_urls.is_empty());
    assert_eq!(record.created_at, record.updated_at);
}

#[tokio::test]
#[serial]
async fn test_append_requires_content_or_images() {
    let Some(db) = TestDatabase::connect().await else { return };
    let user = create_unique_test_user(db.pool()).await.unwrap();
    let (_, channel) = seed_workspace_with_channel(db.pool(), user.id)
        .await
        .unwrap();

    let blank = append_message(db.pool(), channel.id, &user.identity(), Some("   "), &[]).await;
    assert_err!(blank, ApiError::Validation { .. });

    let none = append_message(db.pool(), channel.id, &user.identity(), None, &[]).await;
    assert_err!(none, ApiError::Validation { .. });

    // Images alone are enough; blank content is stored as absent
    let urls = vec!["/uploads/pic.png".to_string()];
    let record = assert_ok!(
        append_message(db.pool(), channel.id, &user.identity(), Some("  "), &urls).await
    );
    assert_eq!(record.content, None);
    assert_eq!(record.image_urls, urls);
}

#[tokio::test]
#[serial]
async fn test_edit_applies_checks_in_order() {
    let Some(db) = TestDatabase::connect().await else { return };
    let author = create_unique_test_user(db.pool()).await.unwrap();
    let intruder = create_unique_test_user(db.pool()).await.unwrap();
    let (_, channel) = seed_workspace_with_channel(db.pool(), author.id)
        .await
        .unwrap();

    let record = assert_ok!(
        append_message(db.pool(), channel.id, &author.identity(), Some("draft"), &[]).await
    );

    // Missing beats forbidden beats invalid
    let missing = edit_message(db.pool(), &intruder.identity(), 999_999, "").await;
    assert_err!(missing, ApiError::NotFound { .. });

    let forbidden = edit_message(db.pool(), &intruder.identity(), record.id, "").await;
    assert_err!(forbidden, ApiError::Authorization { .. });

    let invalid = edit_message(db.pool(), &author.identity(), record.id, "   ").await;
    assert_err!(invalid, ApiError::Validation { .. });

    tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    let edited = assert_ok!(edit_message(db.pool(), &author.identity(), record.id, "final").await);
    assert_eq!(edited.content.as_deref(), Some("final"));
    assert!(edited.updated_at > edited.created_at);
}

#[tokio::test]
#[serial]
async fn test_remove_applies_checks_in_order() {
    let Some(db) = TestDatabase::connect().await else { return };
    let author = create_unique_test_user(db.pool()).await.unwrap();
    let intruder = create_unique_test_user(db.pool()).await.unwrap();
    let (_, channel) = seed_workspace_with_channel(db.pool(), author.id)
        .await
        .unwrap();

    let record = assert_ok!(
        append_message(db.pool(), channel.id, &author.identity(), Some("to go"), &[]).await
    );

    let missing = remove_message(db.pool(), "uploads", &intruder.identity(), 999_999).await;
    assert_err!(missing, ApiError::NotFound { .. });

    let forbidden = remove_message(db.pool(), "uploads", &intruder.identity(), record.id).await;
    assert_err!(forbidden, ApiError::Authorization { .. });

    let deleted = assert_ok!(
        remove_message(db.pool(), "uploads", &author.identity(), record.id).await
    );
    assert_eq!(deleted.id, record.id);
    assert_eq!(deleted.channel_id, channel.id);

    let remaining = assert_ok!(
        list_messages(db.pool(), &author.identity(), channel.id, None, None).await
    );
    assert!(remaining.is_empty());
}

#[tokio::test]
#[serial]
async fn test_remove_deletes_stored_image_files() {
    let Some(db) = TestDatabase::connect().await else { return };
    let author = create_unique_test_user(db.pool()).await.unwrap();
    let (_, channel) = seed_workspace_with_channel(db.pool(), author.id)
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let stored = dir.path().join("pic.png");
    std::fs::write(&stored, b"bytes").unwrap();

    // One referenced file exists, one is already gone
    let urls = vec![
        "/uploads/pic.png".to_string(),
        "/uploads/ghost.png".to_string(),
    ];
    let record = assert_ok!(
        append_message(db.pool(), channel.id, &author.identity(), None, &urls).await
    );

    assert_ok!(
        remove_message(
            db.pool(),
            dir.path().to_str().unwrap(),
            &author.identity(),
            record.id,
        )
        .await
    );
    assert!(!stored.exists(), "referenced image files must be removed");
}

#[tokio::test]
#[serial]
async fn test_list_pages_newest_then_presents_oldest_first() {
    let Some(db) = TestDatabase::connect().await else { return };
    let user = create_unique_test_user(db.pool()).await.unwrap();
    let (_, channel) = seed_workspace_with_channel(db.pool(), user.id)
        .await
        .unwrap();

    let mut ids = Vec::new();
    for n in 1..=5 {
        let record = assert_ok!(
            append_message(
                db.pool(),
                channel.id,
                &user.identity(),
                Some(&format!("message {}", n)),
                &[],
            )
            .await
        );
        ids.push(record.id);
    }

    // Default page: everything, ascending
    let all = assert_ok!(list_messages(db.pool(), &user.identity(), channel.id, None, None).await);
    assert_eq!(all.iter().map(|m| m.id).collect::<Vec<_>>(), ids);

    // limit 2 selects the two newest, still presented ascending
    let newest = assert_ok!(
        list_messages(db.pool(), &user.identity(), channel.id, Some(2), Some(0)).await
    );
    assert_eq!(
        newest.iter().map(|m| m.id).collect::<Vec<_>>(),
        vec![ids[3], ids[4]]
    );

    // offset walks backwards through history
    let older = assert_ok!(
        list_messages(db.pool(), &user.identity(), channel.id, Some(2), Some(2)).await
    );
    assert_eq!(
        older.iter().map(|m| m.id).collect::<Vec<_>>(),
        vec![ids[1], ids[2]]
    );

    // Non-positive limits fall back to the default page size, which
    // comfortably covers the five seeded messages
    assert!(DEFAULT_PAGE_SIZE >= 5);
    let fallback = assert_ok!(
        list_messages(db.pool(), &user.identity(), channel.id, Some(0), None).await
    );
    assert_eq!(fallback.len(), 5);
}

#[tokio::test]
#[serial]
async fn test_list_after_returns_strictly_newer_ascending() {
    let Some(db) = TestDatabase::connect().await else { return };
    let user = create_unique_test_user(db.pool()).await.unwrap();
    let (_, channel) = seed_workspace_with_channel(db.pool(), user.id)
        .await
        .unwrap();

    let first = assert_ok!(
        append_message(db.pool(), channel.id, &user.identity(), Some("one"), &[]).await
    );
    tokio::time::sleep(std::time::Duration::from_millis(20)).await;
    let second = assert_ok!(
        append_message(db.pool(), channel.id, &user.identity(), Some("two"), &[]).await
    );
    let third = assert_ok!(
        append_message(db.pool(), channel.id, &user.identity(), Some("three"), &[]).await
    );

    let newer = assert_ok!(
        list_messages_after(db.pool(), &user.identity(), channel.id, first.created_at).await
    );
    let ids: Vec<i64> = newer.iter().map(|m| m.id).collect();
    assert_eq!(ids, vec![second.id, third.id]);
}

#[tokio::test]
#[serial]
async fn test_membership_gate_orders_not_found_before_forbidden() {
    let Some(db) = TestDatabase::connect().await else { return };
    let owner = create_unique_test_user(db.pool()).await.unwrap();
    let outsider = create_unique_test_user(db.pool()).await.unwrap();
    let (_, channel) = seed_workspace_with_channel(db.pool(), owner.id)
        .await
        .unwrap();

    let missing = ensure_channel_member(db.pool(), 999_999, outsider.id).await;
    assert_err!(missing, ApiError::NotFound { .. });

    let forbidden = ensure_channel_member(db.pool(), channel.id, outsider.id).await;
    assert_err!(forbidden, ApiError::Authorization { .. });

    // The same gate guards reads
    let listing = list_messages(db.pool(), &outsider.identity(), channel.id, None, None).await;
    assert_err!(listing, ApiError::Authorization { .. });

    let sending =
        append_message(db.pool(), channel.id, &outsider.identity(), Some("hi"), &[]).await;
    assert_err!(sending, ApiError::Authorization { .. });
}
