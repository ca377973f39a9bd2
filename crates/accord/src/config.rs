//! Round runtime configuration.

use crate::error::AccordError;

/// Per-round execution parameters.
#[derive(Debug, Clone)]
pub struct RoundConfig {
    /// Number of executor slots per round (slot 0 is the leader)
    pub executors: usize,
    /// Deadline for each individual slot, in milliseconds
    pub slot_timeout_ms: u64,
}

impl Default for RoundConfig {
    fn default() -> Self {
        Self {
            executors: 5,
            slot_timeout_ms: 30_000,
        }
    }
}

impl RoundConfig {
    /// Validate the configuration before a round starts.
    pub(crate) fn validate(&self) -> Result<(), AccordError> {
        if self.executors == 0 {
            return Err(AccordError::InvalidRound(
                "executor count must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(RoundConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_executors_rejected() {
        let config = RoundConfig {
            executors: 0,
            ..RoundConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
