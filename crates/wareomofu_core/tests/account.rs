mod common;

use common::{insert_theme, insert_thesis, new_theme, now, row_count, token, Harness};
use std::sync::Barrier;
use std::thread;
use wareomofu_core::db::{open_db, open_db_in_memory};
use wareomofu_core::model::setting::NotificationToggles;
use wareomofu_core::repo::{
    AccountRepository, CommentRepository, SettingRepository, ThemeRepository, ThesisRepository,
};
use wareomofu_core::{
    AccountService, CommentDraft, CommentService, ServiceError, SqliteStore, Stores, ThesisDraft,
    ThesisService,
};

#[test]
fn withdrawal_anonymizes_content_and_drops_favorites() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let harness = Harness::new();

    let own_theme = insert_theme(&store, new_theme("alice", "alice's theme"));
    let other_theme = insert_theme(&store, new_theme("bob", "bob's theme"));
    let own_thesis = insert_thesis(&store, &other_theme, "alice", "alice writes");
    let bob_thesis = insert_thesis(&store, &own_theme, "bob", "bob writes");
    let comment = CommentService::new(Stores::single(store), harness.gateways.clone())
        .create_comment(
            &token("alice"),
            bob_thesis.id,
            &CommentDraft {
                content: "nice".to_string(),
            },
        )
        .unwrap();
    conn.execute(
        "INSERT INTO favorite_theses (thesis_id, username) VALUES (?1, 'alice');",
        [bob_thesis.id],
    )
    .unwrap();

    let service = AccountService::new(Stores::single(store), harness.gateways.clone());
    let summary = service.withdraw(&token("alice")).unwrap();
    assert_eq!(summary.themes_anonymized, 1);
    assert_eq!(summary.theses_anonymized, 1);
    assert_eq!(summary.comments_anonymized, 1);
    assert_eq!(summary.favorites_deleted, 1);

    let theme = store.get_theme(own_theme.id).unwrap().unwrap();
    assert_eq!(theme.username, None);
    assert_eq!(theme.title, "alice's theme");
    assert!(theme.updated_at.is_some());
    let thesis = store.get_thesis(own_thesis.id).unwrap().unwrap();
    assert_eq!(thesis.username, None);
    assert_eq!(thesis.content, "alice writes");
    assert_eq!(store.get_comment(comment.id).unwrap().unwrap().username, None);
    assert_eq!(row_count(&conn, "favorite_theses"), 0);

    assert!(service.withdraw(&token("alice")).unwrap().is_noop());
}

#[test]
fn withdrawn_owner_receives_nothing_and_name_can_post_again() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let harness = Harness::new();

    let theme = insert_theme(&store, new_theme("alice", "legacy"));
    insert_thesis(&store, &theme, "carol", "before withdrawal");
    AccountService::new(Stores::single(store), harness.gateways.clone())
        .withdraw(&token("carol"))
        .unwrap();
    AccountService::new(Stores::single(store), harness.gateways.clone())
        .withdraw(&token("alice"))
        .unwrap();

    let theses = ThesisService::new(Stores::single(store), harness.gateways.clone());
    let again = theses
        .create_thesis(
            &token("carol"),
            theme.id,
            &ThesisDraft {
                content: "after withdrawal".to_string(),
                works_cited: String::new(),
            },
        )
        .unwrap();
    assert_eq!(again.username.as_deref(), Some("carol"));
    assert!(harness.notifier.sent().is_empty());
    assert_eq!(store.count_theses(&Default::default()).unwrap(), 2);
}

#[test]
fn notification_settings_default_then_update() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let service = AccountService::new(Stores::single(store), Harness::new().gateways);

    let initial = service.notification_setting(&token("alice")).unwrap();
    assert_eq!(initial.username, "alice");
    assert_eq!(initial.toggles, NotificationToggles::default());
    assert_eq!(
        service.notification_setting(&token("alice")).unwrap(),
        initial
    );
    assert_eq!(row_count(&conn, "email_notification_settings"), 1);

    let quiet = NotificationToggles {
        thesis: false,
        favorite: true,
        comment: false,
    };
    let updated = service
        .update_notification_setting(&token("alice"), quiet)
        .unwrap();
    assert_eq!(updated.toggles, quiet);
    assert_eq!(
        service.notification_setting(&token("alice")).unwrap().toggles,
        quiet
    );

    let fresh = service
        .update_notification_setting(&token("bob"), quiet)
        .unwrap();
    assert_eq!(fresh.toggles, quiet);

    assert!(matches!(
        service.notification_setting("bad"),
        Err(ServiceError::Unauthorized)
    ));
    assert_eq!(row_count(&conn, "email_notification_settings"), 2);
}

#[test]
fn failed_withdrawal_rolls_back_every_table() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteStore::try_new(&conn).unwrap();
    let harness = Harness::new();

    let theme = insert_theme(&store, new_theme("alice", "kept owner"));
    let thesis = insert_thesis(&store, &theme, "alice", "kept author");
    CommentService::new(Stores::single(store), harness.gateways.clone())
        .create_comment(
            &token("alice"),
            thesis.id,
            &CommentDraft {
                content: "blocked".to_string(),
            },
        )
        .unwrap();
    conn.execute(
        "INSERT INTO favorite_theses (thesis_id, username) VALUES (?1, 'alice');",
        [thesis.id],
    )
    .unwrap();
    conn.execute_batch(
        "CREATE TRIGGER block_comment_update BEFORE UPDATE ON comments
         BEGIN
            SELECT RAISE(ABORT, 'comment update blocked');
         END;",
    )
    .unwrap();

    let service = AccountService::new(Stores::single(store), harness.gateways.clone());
    assert!(service.withdraw(&token("alice")).is_err());

    let theme = store.get_theme(theme.id).unwrap().unwrap();
    assert_eq!(theme.username.as_deref(), Some("alice"));
    assert!(theme.updated_at.is_none());
    let thesis = store.get_thesis(thesis.id).unwrap().unwrap();
    assert_eq!(thesis.username.as_deref(), Some("alice"));
    assert_eq!(row_count(&conn, "favorite_theses"), 1);

    conn.execute_batch("DROP TRIGGER block_comment_update;").unwrap();
    let summary = store.withdraw("alice", now()).unwrap();
    assert_eq!(summary.themes_anonymized, 1);
    assert_eq!(summary.comments_anonymized, 1);
}

#[test]
fn concurrent_first_reads_share_one_setting_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.sqlite3");
    let connections = vec![open_db(&path).unwrap(), open_db(&path).unwrap()];
    let barrier = Barrier::new(connections.len());

    let settings = thread::scope(|scope| {
        let handles = connections
            .into_iter()
            .map(|conn| {
                let barrier = &barrier;
                scope.spawn(move || {
                    let store = SqliteStore::try_new(&conn).unwrap();
                    barrier.wait();
                    store.create_or_read_setting("u").unwrap()
                })
            })
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect::<Vec<_>>()
    });

    assert_eq!(settings[0], settings[1]);
    assert_eq!(settings[0].toggles, NotificationToggles::default());
    let conn = open_db(&path).unwrap();
    assert_eq!(row_count(&conn, "email_notification_settings"), 1);
}
