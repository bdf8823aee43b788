use crate::{error::GatewayError, notifications::AuthorizationStatus, plan::ScheduledReminder};

/// Something worth reporting during a scheduling pass.
#[derive(Debug, Clone, PartialEq)]
pub enum ScheduleEvent {
    SkippedNoReferenceTime,
    SkippedUnauthorized(AuthorizationStatus),
    Cleared,
    NoRiskHorizon,
    Enqueued {
        reminder: ScheduledReminder,
    },
    EnqueueFailed {
        reminder: ScheduledReminder,
        error: GatewayError,
    },
    AuthorizationRequested {
        granted: bool,
    },
    AuthorizationRequestFailed {
        error: GatewayError,
    },
}

/// Observability sink for scheduling outcomes.
pub trait ScheduleObserver: Send + Sync {
    fn record(&self, event: &ScheduleEvent);
}

/// Default sink: every event becomes a `tracing` record.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ScheduleObserver for TracingObserver {
    fn record(&self, event: &ScheduleEvent) {
        match event {
            ScheduleEvent::SkippedNoReferenceTime => {
                tracing::info!("no best header date yet, skipping reminders")
            }
            ScheduleEvent::SkippedUnauthorized(status) => {
                tracing::info!(?status, "notifications not authorized, skipping reminders")
            }
            ScheduleEvent::Cleared => tracing::debug!("cleared pending reminders"),
            ScheduleEvent::NoRiskHorizon => {
                tracing::info!("no risk horizon, nothing to remind")
            }
            ScheduleEvent::Enqueued { reminder } => tracing::info!(
                id = %reminder.id,
                fire_at = %reminder.fire_at,
                body = %reminder.body,
                "scheduled reminder"
            ),
            ScheduleEvent::EnqueueFailed { reminder, error } => tracing::error!(
                id = %reminder.id,
                fire_at = %reminder.fire_at,
                config_index = reminder.config_index,
                %error,
                "error adding reminder"
            ),
            ScheduleEvent::AuthorizationRequested { granted } => {
                tracing::info!(granted, "notification permission answered")
            }
            ScheduleEvent::AuthorizationRequestFailed { error } => {
                tracing::warn!(%error, "notification permission request failed")
            }
        }
    }
}
