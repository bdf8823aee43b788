use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use timelock_core::{
    Channel, InMemoryGateway, NotificationLeadConfig, ReminderScheduler, ScheduledReminder,
    SchedulerConfig,
};
use tracing::{debug, info, warn};

pub const SNAPSHOT_VAR: &str = "TIMELOCK_SNAPSHOT";

#[derive(Clone, Debug, Default)]
pub struct HostConfig {
    pub(crate) snapshot_path: Option<PathBuf>,
    pub(crate) scheduler: SchedulerConfig,
}

impl HostConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(path) = lookup(SNAPSHOT_VAR) {
            let path = path.trim();
            if !path.is_empty() {
                config.snapshot_path = Some(PathBuf::from(path));
            }
        }
        config.scheduler = SchedulerConfig::from_lookup(&lookup).unwrap_or_else(|err| {
            warn!(%err, "ignoring invalid scheduler settings, using defaults");
            SchedulerConfig::default()
        });
        Ok(config)
    }

    pub fn with_snapshot(mut self, path: impl AsRef<Path>) -> Self {
        self.snapshot_path = Some(path.as_ref().to_path_buf());
        self
    }
}

/// Wallet state handed over by the embedding application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    /// Timestamp of the best known block header.
    pub reference_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub channels: Vec<Channel>,
    #[serde(default)]
    pub reminders: Vec<NotificationLeadConfig>,
}

impl Snapshot {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("unable to read snapshot {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("malformed snapshot {}", path.display()))
    }
}

/// Runs one scheduling pass for the configured snapshot and returns what ended
/// up pending on the gateway.
pub async fn run(config: HostConfig) -> Result<Vec<ScheduledReminder>> {
    let path = config
        .snapshot_path
        .as_deref()
        .with_context(|| format!("{SNAPSHOT_VAR} is not set"))?;
    let snapshot = Snapshot::load(path)?;
    info!(
        path = %path.display(),
        channels = snapshot.channels.len(),
        reminders = snapshot.reminders.len(),
        "loaded wallet snapshot"
    );

    let gateway = Arc::new(InMemoryGateway::authorized());
    let scheduler = ReminderScheduler::builder(gateway.clone())
        .with_configurations(snapshot.reminders)
        .with_config(config.scheduler)
        .build();
    debug!(
        block_interval_minutes = scheduler.block_interval_minutes(),
        "scheduler ready"
    );

    scheduler
        .spawn_schedule(snapshot.channels, snapshot.reference_time)
        .await
        .context("scheduling pass panicked")?;

    let pending = gateway.pending();
    for reminder in &pending {
        info!(fire_at = %reminder.fire_at, title = %reminder.title, "pending reminder");
    }
    Ok(pending)
}
