use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{error::Result, plan::ScheduledReminder};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuthorizationStatus {
    Authorized,
    Denied,
    NotDetermined,
    Provisional,
    Ephemeral,
}

impl AuthorizationStatus {
    pub fn is_authorized(self) -> bool {
        matches!(self, AuthorizationStatus::Authorized)
    }
}

/// Presentation capabilities asked for when prompting the user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorizationOptions {
    pub alert: bool,
    pub sound: bool,
    pub badge: bool,
}

impl Default for AuthorizationOptions {
    fn default() -> Self {
        Self {
            alert: true,
            sound: false,
            badge: false,
        }
    }
}

/// Platform-specific notification adapters will implement this trait.
///
/// Every call may suspend; none of them is expected to block a thread.
#[async_trait]
pub trait NotificationGateway: Send + Sync {
    async fn authorization_status(&self) -> AuthorizationStatus;

    /// Removes every pending reminder owned by the scheduler. Idempotent.
    async fn clear_all(&self);

    /// Installs a one-shot, non-repeating reminder.
    async fn enqueue(&self, reminder: &ScheduledReminder) -> Result<()>;

    /// Prompts the user for permission. Resolves to whether it was granted.
    async fn request_authorization(&self, options: AuthorizationOptions) -> Result<bool>;
}
