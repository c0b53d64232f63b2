//! Saga timing configuration.

use std::time::Duration;

/// Deadlines applied by the orchestrator.
///
/// The saga deadline bounds the forward steps. Compensating calls and the
/// final CompleteOrder call each get their own fresh timeout, so they still
/// run after the saga deadline has expired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SagaConfig {
    pub saga_timeout: Duration,
    pub compensation_timeout: Duration,
    pub finalize_timeout: Duration,
}

impl SagaConfig {
    pub const DEFAULT_SAGA_TIMEOUT: Duration = Duration::from_secs(30);
    pub const DEFAULT_COMPENSATION_TIMEOUT: Duration = Duration::from_secs(5);
    pub const DEFAULT_FINALIZE_TIMEOUT: Duration = Duration::from_secs(5);

    pub fn with_saga_timeout(mut self, timeout: Duration) -> Self {
        self.saga_timeout = timeout;
        self
    }

    pub fn with_compensation_timeout(mut self, timeout: Duration) -> Self {
        self.compensation_timeout = timeout;
        self
    }

    pub fn with_finalize_timeout(mut self, timeout: Duration) -> Self {
        self.finalize_timeout = timeout;
        self
    }
}

impl Default for SagaConfig {
    fn default() -> Self {
        Self {
            saga_timeout: Self::DEFAULT_SAGA_TIMEOUT,
            compensation_timeout: Self::DEFAULT_COMPENSATION_TIMEOUT,
            finalize_timeout: Self::DEFAULT_FINALIZE_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = SagaConfig::default();
        assert_eq!(config.saga_timeout, Duration::from_secs(30));
        assert_eq!(config.compensation_timeout, Duration::from_secs(5));
        assert_eq!(config.finalize_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_builders() {
        let config = SagaConfig::default()
            .with_saga_timeout(Duration::from_millis(100))
            .with_compensation_timeout(Duration::from_millis(50));
        assert_eq!(config.saga_timeout, Duration::from_millis(100));
        assert_eq!(config.compensation_timeout, Duration::from_millis(50));
        assert_eq!(config.finalize_timeout, Duration::from_secs(5));
    }
}
