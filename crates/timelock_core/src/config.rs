use serde::{Deserialize, Serialize};

use crate::{error::ConfigError, risk::DEFAULT_BLOCK_INTERVAL_MINUTES};

pub const BLOCK_INTERVAL_VAR: &str = "TIMELOCK_BLOCK_INTERVAL_MINUTES";
pub const SERIALIZE_PASSES_VAR: &str = "TIMELOCK_SERIALIZE_PASSES";

/// How overlapping scheduling passes interact on the gateway.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum PassPolicy {
    /// Passes race freely; the last clear-then-enqueue to reach the gateway wins
    /// and interleavings may leave a mix of both plans.
    #[default]
    Unserialized,
    /// Passes queue behind each other so each one replaces the gateway state whole.
    Serialized,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SchedulerConfig {
    pub block_interval_minutes: u32,
    pub pass_policy: PassPolicy,
}

impl SchedulerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(raw) = lookup(BLOCK_INTERVAL_VAR) {
            config.block_interval_minutes = match raw.trim().parse::<u32>() {
                Ok(value) if value > 0 => value,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: BLOCK_INTERVAL_VAR.into(),
                        message: format!("expected a positive number of minutes, got `{raw}`"),
                    })
                }
            };
        }
        if let Some(raw) = lookup(SERIALIZE_PASSES_VAR) {
            config.pass_policy = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => PassPolicy::Serialized,
                "0" | "false" | "no" | "" => PassPolicy::Unserialized,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: SERIALIZE_PASSES_VAR.into(),
                        message: format!("expected a boolean, got `{raw}`"),
                    })
                }
            };
        }
        Ok(config)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            block_interval_minutes: DEFAULT_BLOCK_INTERVAL_MINUTES,
            pass_policy: PassPolicy::Unserialized,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        let config = SchedulerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, SchedulerConfig::default());
        assert_eq!(config.block_interval_minutes, 10);
    }

    #[test]
    fn reads_interval_and_policy() {
        let config = SchedulerConfig::from_lookup(lookup(&[
            (BLOCK_INTERVAL_VAR, " 2 "),
            (SERIALIZE_PASSES_VAR, "Yes"),
        ]))
        .unwrap();
        assert_eq!(config.block_interval_minutes, 2);
        assert_eq!(config.pass_policy, PassPolicy::Serialized);
    }

    #[test]
    fn rejects_zero_interval_and_garbage_flags() {
        assert!(SchedulerConfig::from_lookup(lookup(&[(BLOCK_INTERVAL_VAR, "0")])).is_err());
        let err = SchedulerConfig::from_lookup(lookup(&[(SERIALIZE_PASSES_VAR, "maybe")]))
            .unwrap_err();
        assert!(err.to_string().contains(SERIALIZE_PASSES_VAR));
    }
}
