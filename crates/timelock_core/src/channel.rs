use serde::{Deserialize, Serialize};

/// The slice of a payment channel the reminder scheduler cares about.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Channel {
    /// Satoshis owned by the local party.
    pub local_balance: i64,
    /// Relative timelock, in blocks, on the local settlement output.
    pub csv_delay: u32,
}

impl Channel {
    pub fn new(local_balance: i64, csv_delay: u32) -> Self {
        Self {
            local_balance,
            csv_delay,
        }
    }

    /// Only channels where we could lose money are worth a reminder.
    pub fn is_at_risk(&self) -> bool {
        self.local_balance > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_snapshot_entries_and_flags_risk() {
        let channels: Vec<Channel> = serde_json::from_str(
            r#"[{"local_balance": 0, "csv_delay": 10}, {"local_balance": 5, "csv_delay": 144}]"#,
        )
        .unwrap();
        let at_risk: Vec<bool> = channels.iter().map(Channel::is_at_risk).collect();
        assert_eq!(at_risk, vec![false, true]);
        assert_eq!(channels[1], Channel::new(5, 144));
    }
}
