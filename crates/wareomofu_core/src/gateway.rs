//! Collaborator contracts injected into services.
//!
//! # Responsibility
//! - Define the identity, notify, alert and clock seams.
//! - Bundle them so services receive collaborators by construction.
//!
//! # Invariants
//! - Implementations are `Send + Sync` and shareable behind `Arc`.
//! - Identity failures never say why a token was rejected.

use crate::model::report::{ContentKind, ReportSummary};
use chrono::{DateTime, Utc};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    /// Token could not be resolved to a user.
    Unauthenticated,
    /// Downstream service failed or was unreachable.
    Unavailable(String),
}

impl Display for GatewayError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "access token rejected"),
            Self::Unavailable(message) => write!(f, "collaborator unavailable: {message}"),
        }
    }
}

impl Error for GatewayError {}

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Resolves an opaque access token to a username.
pub trait IdentityProvider: Send + Sync {
    fn resolve_identity(&self, access_token: &str) -> GatewayResult<String>;
}

/// Delivers one rendered email to a user.
pub trait Notifier: Send + Sync {
    fn notify(&self, recipient: &str, subject: &str, body: &str) -> GatewayResult<()>;
}

/// Fans a persisted report out to moderators.
pub trait AlertPublisher: Send + Sync {
    fn publish_alert(&self, report: &ReportSummary, kind: ContentKind) -> GatewayResult<()>;
}

/// Source of "now" for window checks and filters.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// All collaborators a service may need.
#[derive(Clone)]
pub struct Gateways {
    pub identity: Arc<dyn IdentityProvider>,
    pub notifier: Arc<dyn Notifier>,
    pub alerts: Arc<dyn AlertPublisher>,
    pub clock: Arc<dyn Clock>,
}

impl Gateways {
    pub fn new(
        identity: Arc<dyn IdentityProvider>,
        notifier: Arc<dyn Notifier>,
        alerts: Arc<dyn AlertPublisher>,
    ) -> Self {
        Self {
            identity,
            notifier,
            alerts,
            clock: Arc::new(SystemClock),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}
