#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use rusqlite::Connection;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use wareomofu_core::gateway::{
    AlertPublisher, FixedClock, GatewayError, GatewayResult, Gateways, IdentityProvider, Notifier,
};
use wareomofu_core::model::report::{ContentKind, ReportSummary};
use wareomofu_core::model::theme::{NewTheme, Theme};
use wareomofu_core::model::thesis::{NewThesis, Thesis};
use wareomofu_core::repo::{ThemeRepository, ThesisRepository};
use wareomofu_core::SqliteStore;

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
}

/// Token `token-<name>` resolves to `<name>`; anything else is rejected.
#[derive(Default)]
pub struct TokenIdentity {
    unavailable: bool,
}

impl TokenIdentity {
    pub fn unavailable() -> Self {
        Self { unavailable: true }
    }
}

impl IdentityProvider for TokenIdentity {
    fn resolve_identity(&self, access_token: &str) -> GatewayResult<String> {
        if self.unavailable {
            return Err(GatewayError::Unavailable("identity down".to_string()));
        }
        access_token
            .strip_prefix("token-")
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .ok_or(GatewayError::Unauthenticated)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<SentMail>>,
    pub failing: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: true,
        }
    }

    pub fn sent(&self) -> Vec<SentMail> {
        self.sent.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, recipient: &str, subject: &str, body: &str) -> GatewayResult<()> {
        if self.failing {
            return Err(GatewayError::Unavailable("smtp down".to_string()));
        }
        self.sent.lock().unwrap().push(SentMail {
            recipient: recipient.to_string(),
            subject: subject.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingAlerts {
    pub published: Mutex<Vec<(ReportSummary, ContentKind)>>,
}

impl RecordingAlerts {
    pub fn published(&self) -> Vec<(ReportSummary, ContentKind)> {
        self.published.lock().unwrap().clone()
    }
}

impl AlertPublisher for RecordingAlerts {
    fn publish_alert(&self, report: &ReportSummary, kind: ContentKind) -> GatewayResult<()> {
        self.published.lock().unwrap().push((report.clone(), kind));
        Ok(())
    }
}

pub struct Harness {
    pub notifier: Arc<RecordingNotifier>,
    pub alerts: Arc<RecordingAlerts>,
    pub gateways: Gateways,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_notifier(RecordingNotifier::default())
    }

    pub fn with_notifier(notifier: RecordingNotifier) -> Self {
        let notifier = Arc::new(notifier);
        let alerts = Arc::new(RecordingAlerts::default());
        let gateways = Gateways::new(
            Arc::new(TokenIdentity::default()),
            notifier.clone(),
            alerts.clone(),
        )
        .with_clock(Arc::new(FixedClock(now())));
        Self {
            notifier,
            alerts,
            gateways,
        }
    }
}

pub fn token(username: &str) -> String {
    format!("token-{username}")
}

pub fn new_theme(username: &str, title: &str) -> NewTheme {
    NewTheme {
        username: username.to_string(),
        title: title.to_string(),
        description: format!("{title} description"),
        start_at: None,
        expire_at: None,
        min_length: 1,
        max_length: 400,
    }
}

pub fn insert_theme(store: &SqliteStore<'_>, theme: NewTheme) -> Theme {
    store.create_theme(&theme, now()).unwrap()
}

pub fn insert_thesis(
    store: &SqliteStore<'_>,
    theme: &Theme,
    username: &str,
    content: &str,
) -> Thesis {
    store
        .create_thesis(
            &NewThesis {
                theme_id: theme.id,
                username: username.to_string(),
                content: content.to_string(),
                works_cited: String::new(),
            },
            now(),
        )
        .unwrap()
}

/// Pins `created_at` so recency ordering is deterministic.
pub fn set_created_at(conn: &Connection, table: &str, id: i64, at: DateTime<Utc>) {
    conn.execute(
        &format!("UPDATE {table} SET created_at = ?1 WHERE id = ?2;"),
        (at.timestamp_millis(), id),
    )
    .unwrap();
}

pub fn suspend(conn: &Connection, table: &str, id: i64) {
    conn.execute(
        &format!("UPDATE {table} SET is_suspended = 1 WHERE id = ?1;"),
        [id],
    )
    .unwrap();
}

pub fn minutes_ago(minutes: i64) -> DateTime<Utc> {
    now() - Duration::minutes(minutes)
}

pub fn row_count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| row.get(0))
        .unwrap()
}

pub fn counts_by_kind(alerts: &[(ReportSummary, ContentKind)]) -> HashMap<ContentKind, usize> {
    let mut counts = HashMap::new();
    for (_, kind) in alerts {
        *counts.entry(*kind).or_insert(0) += 1;
    }
    counts
}
