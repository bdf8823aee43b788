use std::collections::HashSet;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use uuid::Uuid;

use crate::{
    error::{GatewayError, Result},
    notifications::{AuthorizationOptions, AuthorizationStatus, NotificationGateway},
    plan::ScheduledReminder,
};

/// Calls observed by an [`InMemoryGateway`], in arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    AuthorizationStatus,
    ClearAll,
    Enqueue(Uuid),
    RequestAuthorization(AuthorizationOptions),
}

/// In-process notification centre.
///
/// Used by hosts that have no platform centre and by tests. With the
/// `test-util` feature, rejections can be injected per reminder title, an
/// artificial enqueue latency lets callers overlap scheduling passes, and the
/// call log is readable.
pub struct InMemoryGateway {
    status: RwLock<AuthorizationStatus>,
    grant_on_request: bool,
    pending: RwLock<Vec<ScheduledReminder>>,
    rejected_titles: RwLock<HashSet<String>>,
    enqueue_latency: Option<Duration>,
    calls: Mutex<Vec<GatewayCall>>,
}

impl InMemoryGateway {
    pub fn new(status: AuthorizationStatus) -> Self {
        Self {
            status: RwLock::new(status),
            grant_on_request: true,
            pending: RwLock::new(Vec::new()),
            rejected_titles: RwLock::new(HashSet::new()),
            enqueue_latency: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn authorized() -> Self {
        Self::new(AuthorizationStatus::Authorized)
    }

    /// Whether a permission prompt should be answered with "allow".
    pub fn with_grant_on_request(mut self, grant: bool) -> Self {
        self.grant_on_request = grant;
        self
    }

    #[cfg(any(test, feature = "test-util"))]
    pub fn with_enqueue_latency(mut self, latency: Duration) -> Self {
        self.enqueue_latency = Some(latency);
        self
    }

    pub fn set_status(&self, status: AuthorizationStatus) {
        *self.status.write() = status;
    }

    #[cfg(any(test, feature = "test-util"))]
    pub fn reject_title(&self, title: impl Into<String>) {
        self.rejected_titles.write().insert(title.into());
    }

    /// Reminders currently installed, in enqueue order.
    pub fn pending(&self) -> Vec<ScheduledReminder> {
        self.pending.read().clone()
    }

    #[cfg(any(test, feature = "test-util"))]
    pub fn calls(&self) -> Vec<GatewayCall> {
        self.calls.lock().clone()
    }

    #[cfg(any(test, feature = "test-util"))]
    pub fn clear_count(&self) -> usize {
        self.count(|call| matches!(call, GatewayCall::ClearAll))
    }

    #[cfg(any(test, feature = "test-util"))]
    pub fn enqueue_count(&self) -> usize {
        self.count(|call| matches!(call, GatewayCall::Enqueue(_)))
    }

    #[cfg(any(test, feature = "test-util"))]
    fn count(&self, predicate: impl Fn(&GatewayCall) -> bool) -> usize {
        self.calls.lock().iter().filter(|call| predicate(call)).count()
    }

    fn record(&self, call: GatewayCall) {
        self.calls.lock().push(call);
    }
}

impl Default for InMemoryGateway {
    fn default() -> Self {
        Self::new(AuthorizationStatus::NotDetermined)
    }
}

#[async_trait]
impl NotificationGateway for InMemoryGateway {
    async fn authorization_status(&self) -> AuthorizationStatus {
        self.record(GatewayCall::AuthorizationStatus);
        *self.status.read()
    }

    async fn clear_all(&self) {
        self.record(GatewayCall::ClearAll);
        self.pending.write().clear();
    }

    async fn enqueue(&self, reminder: &ScheduledReminder) -> Result<()> {
        self.record(GatewayCall::Enqueue(reminder.id));
        if let Some(latency) = self.enqueue_latency {
            tokio::time::sleep(latency).await;
        }
        if self.rejected_titles.read().contains(&reminder.title) {
            return Err(GatewayError::Rejected {
                reason: format!("title `{}` is blocked", reminder.title),
            });
        }
        let mut pending = self.pending.write();
        pending.retain(|existing| existing.id != reminder.id);
        pending.push(reminder.clone());
        Ok(())
    }

    async fn request_authorization(&self, options: AuthorizationOptions) -> Result<bool> {
        self.record(GatewayCall::RequestAuthorization(options));
        let status = if self.grant_on_request {
            AuthorizationStatus::Authorized
        } else {
            AuthorizationStatus::Denied
        };
        self.set_status(status);
        Ok(self.grant_on_request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn reminder(title: &str) -> ScheduledReminder {
        ScheduledReminder {
            id: Uuid::new_v4(),
            fire_at: Utc::now(),
            title: title.into(),
            body: String::new(),
            config_index: 0,
        }
    }

    #[tokio::test]
    async fn enqueue_replaces_same_id_and_clear_empties() {
        let gateway = InMemoryGateway::authorized();
        let first = reminder("a");
        gateway.enqueue(&first).await.unwrap();
        gateway.enqueue(&first).await.unwrap();
        gateway.enqueue(&reminder("b")).await.unwrap();
        assert_eq!(gateway.pending().len(), 2);

        gateway.clear_all().await;
        gateway.clear_all().await;
        assert!(gateway.pending().is_empty());
        assert_eq!(gateway.clear_count(), 2);
    }

    #[tokio::test]
    async fn rejected_titles_fail_without_installing() {
        let gateway = InMemoryGateway::authorized();
        gateway.reject_title("blocked");
        let err = gateway.enqueue(&reminder("blocked")).await.unwrap_err();
        assert!(matches!(err, GatewayError::Rejected { .. }));
        assert!(gateway.pending().is_empty());
    }

    #[tokio::test]
    async fn prompt_updates_status() {
        let gateway = InMemoryGateway::default().with_grant_on_request(false);
        let granted = gateway
            .request_authorization(AuthorizationOptions::default())
            .await
            .unwrap();
        assert!(!granted);
        assert_eq!(gateway.authorization_status().await, AuthorizationStatus::Denied);
    }
}
