mod common;

use chrono::Duration;
use common::{insert_theme, new_theme, now, row_count, suspend, token, Harness, TokenIdentity};
use std::sync::Arc;
use wareomofu_core::db::open_db_in_memory;
use wareomofu_core::gateway::{FixedClock, Gateways};
use wareomofu_core::model::THESIS_CONTENT_MAX_LENGTH;
use wareomofu_core::{
    ErrorKind, ServiceError, SqliteStore, Stores, Subject, ThemeDraft, ThemeService, ThesisDraft,
    ThesisService, ValidationError,
};

fn draft(title: &str) -> ThemeDraft {
    ThemeDraft {
        title: title.to_string(),
        description: "Write about anything.".to_string(),
        start_at: None,
        expire_at: Some(now() + Duration::days(7)),
        min_length: 10,
        max_length: None,
    }
}

fn thesis(content: &str) -> ThesisDraft {
    ThesisDraft {
        content: content.to_string(),
        works_cited: String::new(),
    }
}

#[test]
fn theme_creation_defaults_max_length() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let service = ThemeService::new(Stores::single(store), Harness::new().gateways);

    let theme = service.create_theme(&token("alice"), &draft("Open letters")).unwrap();
    assert_eq!(theme.username.as_deref(), Some("alice"));
    assert_eq!(theme.min_length, 10);
    assert_eq!(theme.max_length, THESIS_CONTENT_MAX_LENGTH);
    assert!(theme.updated_at.is_none());

    let fetched = service.get_theme(theme.id).unwrap();
    assert_eq!(fetched.theme, theme);
    assert!(fetched.theses.is_empty());
}

#[test]
fn rejected_theme_is_not_stored() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let service = ThemeService::new(Stores::single(store), Harness::new().gateways);

    let err = service.create_theme(&token("alice"), &draft("")).unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ValidationError::TitleRequired)
    ));
    assert_eq!(err.kind().status_code(), 403);

    let mut past = draft("Too late");
    past.start_at = Some(now() - Duration::minutes(1));
    assert!(matches!(
        service.create_theme(&token("alice"), &past),
        Err(ServiceError::Validation(ValidationError::StartInPast))
    ));

    let mut inverted = draft("Inverted");
    inverted.max_length = Some(5);
    assert!(matches!(
        service.create_theme(&token("alice"), &inverted),
        Err(ServiceError::Validation(ValidationError::MinExceedsMax))
    ));

    assert_eq!(row_count(&conn, "themes"), 0);
}

#[test]
fn identity_failures_block_writes() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let harness = Harness::new();
    let service = ThemeService::new(Stores::single(store), harness.gateways.clone());

    let err = service.create_theme("garbage", &draft("x")).unwrap_err();
    assert!(matches!(err, ServiceError::Unauthorized));
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(err.user_message(), "認証に失敗しました");

    let down = Gateways::new(
        Arc::new(TokenIdentity::unavailable()),
        harness.notifier.clone(),
        harness.alerts.clone(),
    )
    .with_clock(Arc::new(FixedClock(now())));
    let service = ThemeService::new(Stores::single(store), down);
    let err = service.create_theme(&token("alice"), &draft("x")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert_eq!(err.user_message(), "サーバーでエラーが発生しました");

    assert_eq!(row_count(&conn, "themes"), 0);
}

#[test]
fn thesis_length_bounds_count_characters() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let mut bounded = new_theme("alice", "bounded");
    bounded.min_length = 3;
    bounded.max_length = 5;
    let theme = insert_theme(&store, bounded);

    let service = ThesisService::new(Stores::single(store), Harness::new().gateways);
    assert!(matches!(
        service.create_thesis(&token("bob"), theme.id, &thesis("あい")),
        Err(ServiceError::Validation(ValidationError::ContentTooShort))
    ));
    assert!(matches!(
        service.create_thesis(&token("bob"), theme.id, &thesis("あいうえおか")),
        Err(ServiceError::Validation(ValidationError::ContentTooLong))
    ));

    let created = service
        .create_thesis(&token("bob"), theme.id, &thesis("あいうえお"))
        .unwrap();
    assert_eq!(created.theme_id, theme.id);
    assert_eq!(created.username.as_deref(), Some("bob"));
    assert!(service
        .create_thesis(&token("carol"), theme.id, &thesis("あいう"))
        .is_ok());
}

#[test]
fn second_thesis_on_same_theme_conflicts() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let theme = insert_theme(&store, new_theme("alice", "once"));

    let service = ThesisService::new(Stores::single(store), Harness::new().gateways);
    service
        .create_thesis(&token("bob"), theme.id, &thesis("first"))
        .unwrap();
    let err = service
        .create_thesis(&token("bob"), theme.id, &thesis("second"))
        .unwrap_err();
    assert!(matches!(err, ServiceError::Conflict));
    assert_eq!(err.kind().status_code(), 409);
    assert_eq!(err.user_message(), "既に登録されています");
    assert_eq!(row_count(&conn, "theses"), 1);
}

#[test]
fn acceptance_window_gates_submissions() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();

    let mut upcoming = new_theme("alice", "upcoming");
    upcoming.start_at = Some(now() + Duration::hours(1));
    let upcoming = insert_theme(&store, upcoming);
    let mut closed = new_theme("alice", "closed");
    closed.expire_at = Some(now() - Duration::hours(1));
    let closed = insert_theme(&store, closed);
    let mut exact = new_theme("alice", "exact");
    exact.start_at = Some(now());
    exact.expire_at = Some(now());
    let exact = insert_theme(&store, exact);
    let hidden = insert_theme(&store, new_theme("alice", "hidden"));
    suspend(&conn, "themes", hidden.id);

    let service = ThesisService::new(Stores::single(store), Harness::new().gateways);
    assert!(matches!(
        service.create_thesis(&token("bob"), upcoming.id, &thesis("text")),
        Err(ServiceError::Validation(ValidationError::NotYetAccepting))
    ));
    assert!(matches!(
        service.create_thesis(&token("bob"), closed.id, &thesis("text")),
        Err(ServiceError::Validation(ValidationError::AcceptanceClosed))
    ));
    assert!(matches!(
        service.create_thesis(&token("bob"), hidden.id, &thesis("text")),
        Err(ServiceError::NotFound(Subject::Theme))
    ));
    assert!(matches!(
        service.create_thesis(&token("bob"), 9_999, &thesis("text")),
        Err(ServiceError::NotFound(Subject::Theme))
    ));
    assert!(service
        .create_thesis(&token("bob"), exact.id, &thesis("text"))
        .is_ok());
}

#[test]
fn theme_owner_is_notified_of_new_thesis() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let theme = insert_theme(&store, new_theme("alice", "notify me"));
    let harness = Harness::new();

    let service = ThesisService::new(Stores::single(store), harness.gateways.clone());
    let created = service
        .create_thesis(&token("bob"), theme.id, &thesis("hello alice"))
        .unwrap();
    service
        .create_thesis(&token("alice"), theme.id, &thesis("my own"))
        .unwrap();

    let sent = harness.notifier.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].recipient, "alice");
    assert_eq!(sent[0].subject, "テーマに小論文が投稿されました");
    assert!(sent[0].body.starts_with("alice 様\n\n"));
    assert!(sent[0].body.contains(&format!("小論文ID: {}", created.id)));
    assert!(sent[0].body.contains("hello alice"));
}

#[test]
fn notification_failure_does_not_fail_the_write() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let theme = insert_theme(&store, new_theme("alice", "flaky mail"));
    let harness = Harness::with_notifier(common::RecordingNotifier::failing());

    let service = ThesisService::new(Stores::single(store), harness.gateways.clone());
    assert!(service
        .create_thesis(&token("bob"), theme.id, &thesis("still stored"))
        .is_ok());
    assert_eq!(row_count(&conn, "theses"), 1);
}

#[test]
fn created_at_comes_from_the_injected_clock() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let harness = Harness::new();
    let instant = now() + Duration::milliseconds(1_250);
    let clocked = Gateways::new(
        Arc::new(TokenIdentity::default()),
        harness.notifier.clone(),
        harness.alerts.clone(),
    )
    .with_clock(Arc::new(FixedClock(instant)));

    let theme = ThemeService::new(Stores::single(store), clocked.clone())
        .create_theme(&token("alice"), &draft("Clocked"))
        .unwrap();
    let posted = ThesisService::new(Stores::single(store), clocked)
        .create_thesis(&token("bob"), theme.id, &thesis("on time"))
        .unwrap();

    assert_eq!(theme.created_at, instant);
    assert_eq!(posted.created_at, instant);
}
