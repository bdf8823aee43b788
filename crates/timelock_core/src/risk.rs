use chrono::{DateTime, Duration, Utc};

use crate::channel::Channel;

/// Assumed average time between blocks.
pub const DEFAULT_BLOCK_INTERVAL_MINUTES: u32 = 10;

/// Earliest moment at which any at-risk channel's timelocked output becomes
/// contestable, anchored at `reference_time`.
///
/// Returns `None` when there is no reference time yet, when no channel holds a
/// positive local balance, or when the offset does not fit a timestamp.
pub fn compute_risk_horizon(
    channels: &[Channel],
    reference_time: Option<DateTime<Utc>>,
    block_interval_minutes: u32,
) -> Option<DateTime<Utc>> {
    let reference_time = reference_time?;

    let csv_delays: Vec<u32> = channels
        .iter()
        .filter(|channel| channel.is_at_risk())
        .map(|channel| channel.csv_delay)
        .collect();
    tracing::debug!(?csv_delays, "csv delays of channels at risk");

    let min_delay = csv_delays.into_iter().min()?;
    let horizon = i64::from(min_delay)
        .checked_mul(i64::from(block_interval_minutes))
        .and_then(Duration::try_minutes)
        .and_then(|offset| reference_time.checked_add_signed(offset));
    if horizon.is_none() {
        tracing::warn!(min_delay, block_interval_minutes, "risk horizon out of range");
    }
    horizon
}
