//! # Like Tests

mod common;

use common::{new_record, setup_db};
use ichidan::{likes, records, IchidanError, Liker};

#[tokio::test]
async fn test_liking_twice_is_idempotent() {
    let provider = setup_db().await;
    let db = &provider.db;
    let record = records::create_record(db, "alice", new_record("本")).await.unwrap();
    let liker = Liker::User("bob".to_string());

    let first = likes::like_record(db, record.id, &liker).await.unwrap();
    let second = likes::like_record(db, record.id, &liker).await.unwrap();

    assert_eq!(first.like_count, 1);
    assert!(first.liked);
    assert_eq!(second, first);
}

#[tokio::test]
async fn test_users_and_sessions_like_independently() {
    let provider = setup_db().await;
    let db = &provider.db;
    let record = records::create_record(db, "alice", new_record("本")).await.unwrap();

    // The same raw id under two liker kinds is two distinct likers.
    likes::like_record(db, record.id, &Liker::User("x1".to_string()))
        .await
        .unwrap();
    let status = likes::like_record(db, record.id, &Liker::Session("x1".to_string()))
        .await
        .unwrap();
    assert_eq!(status.like_count, 2);

    let anonymous = likes::like_status(db, record.id, None).await.unwrap();
    assert_eq!(anonymous.like_count, 2);
    assert!(!anonymous.liked);
}

#[tokio::test]
async fn test_unlike_removes_only_own_like() {
    let provider = setup_db().await;
    let db = &provider.db;
    let record = records::create_record(db, "alice", new_record("本")).await.unwrap();
    let bob = Liker::User("bob".to_string());
    let carol = Liker::Session("carol-session".to_string());

    likes::like_record(db, record.id, &bob).await.unwrap();
    likes::like_record(db, record.id, &carol).await.unwrap();

    let status = likes::unlike_record(db, record.id, &bob).await.unwrap();
    assert_eq!(status.like_count, 1);
    assert!(!status.liked);

    // Unliking again is a no-op.
    let again = likes::unlike_record(db, record.id, &bob).await.unwrap();
    assert_eq!(again, status);

    let for_carol = likes::like_status(db, record.id, Some(&carol)).await.unwrap();
    assert!(for_carol.liked);
}

#[tokio::test]
async fn test_liking_missing_record_is_not_found() {
    let provider = setup_db().await;
    let db = &provider.db;
    let liker = Liker::Session("s".to_string());

    let err = likes::like_record(db, 42, &liker).await.unwrap_err();
    assert!(matches!(err, IchidanError::NotFound(_)));

    let err = likes::like_status(db, 42, None).await.unwrap_err();
    assert!(matches!(err, IchidanError::NotFound(_)));
}
