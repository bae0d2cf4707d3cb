//! Backend core for the Wareomofu discussion platform.
//!
//! Themes collect theses, theses collect comments and favorites, and every
//! piece of content can be reported. Business rules live here; transport,
//! identity and mail delivery are supplied through [`gateway`] traits.

pub mod config;
pub mod db;
pub mod gateway;
pub mod logging;
pub mod model;
pub mod notification;
pub mod query;
pub mod repo;
pub mod service;
pub mod validation;

pub use config::{Config, ConfigError};
pub use db::{open_db, open_db_in_memory, open_db_read_only, DbError, DbResult};
pub use gateway::{
    AlertPublisher, Clock, FixedClock, GatewayError, Gateways, IdentityProvider, Notifier,
    SystemClock,
};
pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use query::{PageSummary, Pagination, ThemeFilter, ThemeSort, ThesisFilter, ThesisSort};
pub use repo::{RepoError, RepoResult, SqliteStore};
pub use service::{
    AccountService, CommentService, ErrorKind, FavoriteService, ReportDraft, ReportService,
    ServiceError, ServiceResult, Stores, ThemeService, ThesisService,
};
pub use validation::{CommentDraft, Subject, ThemeDraft, ThesisDraft, ValidationError};

/// Liveness check for binaries linking this crate.
pub fn ping() -> &'static str {
    "pong"
}

pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_answers() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_matches_manifest() {
        assert_eq!(core_version(), env!("CARGO_PKG_VERSION"));
    }
}
