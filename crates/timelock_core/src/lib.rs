//! Timelock reminder scheduling for a Lightning wallet.
//!
//! Given the wallet's channels and the timestamp of the best known block
//! header, [`ReminderScheduler`] works out when the most urgent channel's
//! relative timelock could lapse and installs user-facing reminders ahead of
//! that moment on a platform [`NotificationGateway`].
//!
//! - [`risk::compute_risk_horizon`]: channels + reference time to risk horizon
//! - [`plan::build_plan`]: risk horizon + lead times to dated reminders
//! - [`ReminderScheduler`]: authorization gate, full replace of the pending set

pub mod channel;
pub mod config;
pub mod error;
pub mod memory;
pub mod notifications;
pub mod observer;
pub mod plan;
pub mod risk;
pub mod scheduler;

pub use crate::channel::Channel;
pub use crate::config::{PassPolicy, SchedulerConfig};
pub use crate::error::{ConfigError, GatewayError};
pub use crate::memory::InMemoryGateway;
pub use crate::notifications::{AuthorizationOptions, AuthorizationStatus, NotificationGateway};
pub use crate::observer::{ScheduleEvent, ScheduleObserver, TracingObserver};
pub use crate::plan::{NotificationLeadConfig, ScheduledReminder};
pub use crate::scheduler::{Clock, ReminderScheduler, ReminderSchedulerBuilder, SystemClock};
