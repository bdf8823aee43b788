use std::sync::Arc;

use chrono::{DateTime, Utc};
use futures::future::join_all;
use tokio::{sync::Mutex, task::JoinHandle};

use crate::{
    channel::Channel,
    config::{PassPolicy, SchedulerConfig},
    notifications::{AuthorizationOptions, NotificationGateway},
    observer::{ScheduleEvent, ScheduleObserver, TracingObserver},
    plan::{build_plan, NotificationLeadConfig},
    risk::{compute_risk_horizon, DEFAULT_BLOCK_INTERVAL_MINUTES},
};

/// Source of "now" for deciding which reminders already elapsed.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Steps of a single scheduling pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassStage {
    AwaitingAuthorizationCheck,
    Unauthorized,
    ClearingPrior,
    Computing,
    Enqueuing,
    Idle,
}

/// Installs timelock reminders on a [`NotificationGateway`].
///
/// Cloning is cheap; clones share the gateway, configurations and pass guard.
#[derive(Clone)]
pub struct ReminderScheduler {
    gateway: Arc<dyn NotificationGateway>,
    configurations: Arc<[NotificationLeadConfig]>,
    observer: Arc<dyn ScheduleObserver>,
    clock: Arc<dyn Clock>,
    block_interval_minutes: u32,
    authorization_options: AuthorizationOptions,
    pass_guard: Option<Arc<Mutex<()>>>,
}

pub struct ReminderSchedulerBuilder {
    gateway: Arc<dyn NotificationGateway>,
    configurations: Vec<NotificationLeadConfig>,
    observer: Option<Arc<dyn ScheduleObserver>>,
    clock: Option<Arc<dyn Clock>>,
    block_interval_minutes: u32,
    authorization_options: AuthorizationOptions,
    pass_policy: PassPolicy,
}

impl ReminderSchedulerBuilder {
    pub fn new(gateway: Arc<dyn NotificationGateway>) -> Self {
        Self {
            gateway,
            configurations: Vec::new(),
            observer: None,
            clock: None,
            block_interval_minutes: DEFAULT_BLOCK_INTERVAL_MINUTES,
            authorization_options: AuthorizationOptions::default(),
            pass_policy: PassPolicy::default(),
        }
    }

    pub fn add_configuration(mut self, configuration: NotificationLeadConfig) -> Self {
        self.configurations.push(configuration);
        self
    }

    pub fn with_configurations(
        mut self,
        configurations: impl IntoIterator<Item = NotificationLeadConfig>,
    ) -> Self {
        self.configurations.extend(configurations);
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ScheduleObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_block_interval_minutes(mut self, minutes: u32) -> Self {
        self.block_interval_minutes = minutes;
        self
    }

    pub fn with_authorization_options(mut self, options: AuthorizationOptions) -> Self {
        self.authorization_options = options;
        self
    }

    pub fn with_pass_policy(mut self, policy: PassPolicy) -> Self {
        self.pass_policy = policy;
        self
    }

    pub fn with_config(self, config: SchedulerConfig) -> Self {
        self.with_block_interval_minutes(config.block_interval_minutes)
            .with_pass_policy(config.pass_policy)
    }

    pub fn build(self) -> ReminderScheduler {
        let pass_guard = match self.pass_policy {
            PassPolicy::Serialized => Some(Arc::new(Mutex::new(()))),
            PassPolicy::Unserialized => None,
        };
        ReminderScheduler {
            gateway: self.gateway,
            configurations: self.configurations.into(),
            observer: self.observer.unwrap_or_else(|| Arc::new(TracingObserver)),
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
            block_interval_minutes: self.block_interval_minutes,
            authorization_options: self.authorization_options,
            pass_guard,
        }
    }
}

impl ReminderScheduler {
    pub fn builder(gateway: Arc<dyn NotificationGateway>) -> ReminderSchedulerBuilder {
        ReminderSchedulerBuilder::new(gateway)
    }

    pub fn configurations(&self) -> &[NotificationLeadConfig] {
        &self.configurations
    }

    pub fn block_interval_minutes(&self) -> u32 {
        self.block_interval_minutes
    }

    /// Asks the user for notification permission without waiting for the answer.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn request_authorization(&self) -> JoinHandle<()> {
        let gateway = Arc::clone(&self.gateway);
        let observer = Arc::clone(&self.observer);
        let options = self.authorization_options;
        tokio::spawn(async move {
            let event = match gateway.request_authorization(options).await {
                Ok(granted) => ScheduleEvent::AuthorizationRequested { granted },
                Err(error) => ScheduleEvent::AuthorizationRequestFailed { error },
            };
            observer.record(&event);
        })
    }

    /// Runs [`schedule`](Self::schedule) on the tokio runtime.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn_schedule(
        &self,
        channels: Vec<Channel>,
        reference_time: Option<DateTime<Utc>>,
    ) -> JoinHandle<()> {
        let scheduler = self.clone();
        tokio::spawn(async move { scheduler.schedule(&channels, reference_time).await })
    }

    /// Replaces every pending reminder with the ones derived from `channels`.
    ///
    /// Nothing is touched without a reference time or without authorization.
    /// Enqueue failures are reported to the observer and never retried.
    pub async fn schedule(&self, channels: &[Channel], reference_time: Option<DateTime<Utc>>) {
        let Some(reference_time) = reference_time else {
            self.observer.record(&ScheduleEvent::SkippedNoReferenceTime);
            return;
        };

        let _pass = match &self.pass_guard {
            Some(guard) => Some(guard.lock().await),
            None => None,
        };

        self.enter(PassStage::AwaitingAuthorizationCheck);
        let status = self.gateway.authorization_status().await;
        if !status.is_authorized() {
            self.enter(PassStage::Unauthorized);
            self.observer.record(&ScheduleEvent::SkippedUnauthorized(status));
            return;
        }

        self.enter(PassStage::ClearingPrior);
        self.gateway.clear_all().await;
        self.observer.record(&ScheduleEvent::Cleared);

        self.enter(PassStage::Computing);
        let horizon =
            compute_risk_horizon(channels, Some(reference_time), self.block_interval_minutes);
        if horizon.is_none() {
            self.observer.record(&ScheduleEvent::NoRiskHorizon);
            self.enter(PassStage::Idle);
            return;
        }
        // A header stamped ahead of our clock must not let reminders precede it.
        let now = self.clock.now().max(reference_time);
        let plan = build_plan(horizon, &self.configurations, now);

        self.enter(PassStage::Enqueuing);
        join_all(plan.into_iter().map(|reminder| async move {
            let event = match self.gateway.enqueue(&reminder).await {
                Ok(()) => ScheduleEvent::Enqueued { reminder },
                Err(error) => ScheduleEvent::EnqueueFailed { reminder, error },
            };
            self.observer.record(&event);
        }))
        .await;

        self.enter(PassStage::Idle);
    }

    fn enter(&self, stage: PassStage) {
        tracing::debug!(?stage, "reminder pass");
    }
}
