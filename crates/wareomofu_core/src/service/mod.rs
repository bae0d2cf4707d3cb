//! Use-case services over repositories, rules and collaborators.
//!
//! # Responsibility
//! - Resolve the caller's identity before any business-rule check.
//! - Route reads to the replica store and writes to the primary store.
//! - Map page numbers to row windows and counts to page summaries.
//! - Classify every failure into [`ErrorKind`].
//!
//! # Invariants
//! - A read that depends on a write in the same call uses the primary store.
//! - Collaborator failures after a successful write never fail the call.

use crate::gateway::{GatewayError, Gateways};
use crate::repo::RepoError;
use crate::validation::{Subject, ValidationError};
use log::warn;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod account_service;
pub mod comment_service;
pub mod favorite_service;
pub mod report_service;
pub mod theme_service;
pub mod thesis_service;

pub use account_service::AccountService;
pub use comment_service::CommentService;
pub use favorite_service::FavoriteService;
pub use report_service::{ReportDraft, ReportService};
pub use theme_service::ThemeService;
pub use thesis_service::ThesisService;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Coarse failure class, one per caller-visible outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Validation,
    Unauthorized,
    Conflict,
    Internal,
}

impl ErrorKind {
    /// HTTP status a transport layer should answer with.
    pub fn status_code(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::Validation => 403,
            Self::Unauthorized => 401,
            Self::Conflict => 409,
            Self::Internal => 500,
        }
    }
}

#[derive(Debug)]
pub enum ServiceError {
    NotFound(Subject),
    Validation(ValidationError),
    Unauthorized,
    Conflict,
    Internal(RepoError),
    Collaborator(GatewayError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Validation(_) => ErrorKind::Validation,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::Conflict => ErrorKind::Conflict,
            Self::Internal(_) | Self::Collaborator(_) => ErrorKind::Internal,
        }
    }

    /// Localized message safe to show the caller.
    pub fn user_message(&self) -> String {
        match self {
            Self::NotFound(subject) => subject.not_found_message(),
            Self::Validation(err) => err.message(),
            Self::Unauthorized => "認証に失敗しました".to_string(),
            Self::Conflict => "既に登録されています".to_string(),
            Self::Internal(_) | Self::Collaborator(_) => {
                "サーバーでエラーが発生しました".to_string()
            }
        }
    }
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(subject) => write!(f, "{} not found", subject.label()),
            Self::Validation(err) => write!(f, "validation failed: {}", err.code()),
            Self::Unauthorized => write!(f, "unauthorized"),
            Self::Conflict => write!(f, "conflict"),
            Self::Internal(err) => write!(f, "{err}"),
            Self::Collaborator(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Internal(err) => Some(err),
            Self::Collaborator(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Conflict { .. } => Self::Conflict,
            other => Self::Internal(other),
        }
    }
}

impl From<ValidationError> for ServiceError {
    fn from(value: ValidationError) -> Self {
        match value {
            ValidationError::TargetNotFound(subject) => Self::NotFound(subject),
            other => Self::Validation(other),
        }
    }
}

/// Primary store for writes and read-your-writes; replica store for plain reads.
#[derive(Debug, Clone, Copy)]
pub struct Stores<R> {
    pub primary: R,
    pub replica: R,
}

impl<R: Clone> Stores<R> {
    /// Uses one store for both roles.
    pub fn single(store: R) -> Self {
        Self {
            primary: store.clone(),
            replica: store,
        }
    }
}

impl<R> Stores<R> {
    pub fn with_replica(primary: R, replica: R) -> Self {
        Self { primary, replica }
    }
}

/// Maps an access token to a username; any rejection is `Unauthorized`.
pub(crate) fn resolve_user(
    gateways: &Gateways,
    access_token: &str,
    operation: &str,
) -> ServiceResult<String> {
    gateways
        .identity
        .resolve_identity(access_token)
        .map_err(|err| {
            warn!(
                "event=resolve_identity module=service status=error operation={} error={}",
                operation, err
            );
            match err {
                GatewayError::Unauthenticated => ServiceError::Unauthorized,
                other => ServiceError::Collaborator(other),
            }
        })
}

/// Logs a rejected write without echoing caller input.
pub(crate) fn log_rejection(operation: &str, err: &ServiceError) {
    let code = match err {
        ServiceError::Validation(rule) => rule.code(),
        ServiceError::NotFound(_) => "not_found",
        ServiceError::Conflict => "conflict",
        ServiceError::Unauthorized => "unauthorized",
        ServiceError::Internal(_) | ServiceError::Collaborator(_) => "internal",
    };
    warn!(
        "event={} module=service status=error error_code={}",
        operation, code
    );
}
