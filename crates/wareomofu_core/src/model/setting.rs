//! Per-user email notification settings.

use serde::{Deserialize, Serialize};

/// Which owner-facing event a notification is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    /// A thesis was posted on the recipient's theme.
    Thesis,
    /// The recipient's thesis was favorited.
    Favorite,
    /// The recipient's thesis was commented on.
    Comment,
}

/// The three independent toggles. All default to enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationToggles {
    pub thesis: bool,
    pub favorite: bool,
    pub comment: bool,
}

impl Default for NotificationToggles {
    fn default() -> Self {
        Self {
            thesis: true,
            favorite: true,
            comment: true,
        }
    }
}

impl NotificationToggles {
    pub fn allows(&self, kind: NotificationKind) -> bool {
        match kind {
            NotificationKind::Thesis => self.thesis,
            NotificationKind::Favorite => self.favorite,
            NotificationKind::Comment => self.comment,
        }
    }
}

/// One row per username, created lazily on first access.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmailNotificationSetting {
    #[serde(skip_serializing)]
    pub username: String,
    #[serde(flatten)]
    pub toggles: NotificationToggles,
}
