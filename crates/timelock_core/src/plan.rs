use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One reminder to fire `days_left` days before the risk horizon.
///
/// Title and body are already localized by the caller.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationLeadConfig {
    days_left: i64,
    title: String,
    body: String,
}

impl NotificationLeadConfig {
    pub fn new(days_left: i64, title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            days_left,
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn days_left(&self) -> i64 {
        self.days_left
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

/// A concrete, future-dated reminder handed to the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScheduledReminder {
    pub id: Uuid,
    pub fire_at: DateTime<Utc>,
    pub title: String,
    pub body: String,
    /// Position of the originating [`NotificationLeadConfig`].
    pub config_index: usize,
}

/// Turns the risk horizon into the reminders still worth scheduling at `now`.
///
/// Output follows the order of `configs`; reminders at or before `now` are
/// dropped rather than fired late.
pub fn build_plan(
    risk_horizon: Option<DateTime<Utc>>,
    configs: &[NotificationLeadConfig],
    now: DateTime<Utc>,
) -> Vec<ScheduledReminder> {
    let Some(horizon) = risk_horizon else {
        return Vec::new();
    };

    configs
        .iter()
        .enumerate()
        .filter_map(|(config_index, config)| {
            let fire_at = Duration::try_days(config.days_left)
                .and_then(|lead| horizon.checked_sub_signed(lead))?;
            if fire_at <= now {
                tracing::debug!(%fire_at, days_left = config.days_left, "reminder already elapsed");
                return None;
            }
            Some(ScheduledReminder {
                id: Uuid::new_v4(),
                fire_at,
                title: config.title.clone(),
                body: config.body.clone(),
                config_index,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{channel::Channel, risk::compute_risk_horizon};
    use chrono::TimeZone;
    use proptest::prelude::*;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 8, 30, 0).unwrap()
    }

    fn config(days_left: i64) -> NotificationLeadConfig {
        NotificationLeadConfig::new(days_left, format!("{days_left} days"), "Open your wallet")
    }

    #[test]
    fn no_horizon_means_no_reminders() {
        let configs = vec![config(0), config(1), config(7)];
        assert!(build_plan(None, &configs, t0()).is_empty());
    }

    #[test]
    fn reminder_landing_exactly_on_now_is_dropped() {
        let channels = [Channel::new(0, 10), Channel::new(5, 144)];
        let horizon = compute_risk_horizon(&channels, Some(t0()), 10);
        assert_eq!(horizon, Some(t0() + Duration::seconds(86_400)));

        assert!(build_plan(horizon, &[config(1)], t0()).is_empty());

        let kept = build_plan(horizon, &[config(0)], t0());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].fire_at, t0() + Duration::seconds(86_400));
        assert_eq!(kept[0].title, "0 days");
        assert_eq!(kept[0].body, "Open your wallet");
    }

    #[test]
    fn empty_channel_list_plans_nothing() {
        let horizon = compute_risk_horizon(&[], Some(t0()), 10);
        assert!(build_plan(horizon, &[config(0), config(3)], t0()).is_empty());
    }

    #[test]
    fn duplicate_lead_times_yield_distinct_reminders() {
        let horizon = Some(t0() + Duration::days(10));
        let plan = build_plan(horizon, &[config(2), config(2)], t0());
        assert_eq!(plan.len(), 2);
        assert_eq!(plan[0].fire_at, plan[1].fire_at);
        assert_ne!(plan[0].id, plan[1].id);
    }

    #[test]
    fn config_order_is_kept_not_sorted() {
        let horizon = Some(t0() + Duration::days(10));
        let plan = build_plan(horizon, &[config(1), config(7), config(3)], t0());
        let indices: Vec<usize> = plan.iter().map(|r| r.config_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
        assert!(plan[0].fire_at > plan[1].fire_at);
    }

    #[test]
    fn unrepresentable_lead_times_are_dropped() {
        let horizon = Some(t0() + Duration::days(10));
        let plan = build_plan(horizon, &[config(i64::MAX), config(3), config(i64::MIN)], t0());
        let indices: Vec<usize> = plan.iter().map(|r| r.config_index).collect();
        assert_eq!(indices, vec![1]);
    }

    proptest! {
        #[test]
        fn plan_is_future_dated_and_ordered(
            lead_days in prop::collection::vec(-30i64..60, 0..12),
            horizon_offset in -86_400i64 * 30..86_400 * 90,
        ) {
            let configs: Vec<NotificationLeadConfig> = lead_days.iter().map(|d| config(*d)).collect();
            let now = t0();
            let plan = build_plan(Some(now + Duration::seconds(horizon_offset)), &configs, now);

            prop_assert!(plan.iter().all(|reminder| reminder.fire_at > now));
            prop_assert!(plan.windows(2).all(|pair| pair[0].config_index < pair[1].config_index));
            for reminder in &plan {
                prop_assert_eq!(&reminder.title, configs[reminder.config_index].title());
            }
        }
    }
}
