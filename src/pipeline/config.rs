use std::time::{Duration, Instant};

/// Per-stage timeout applied when nothing else is configured
pub const DEFAULT_STEP_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    /// Deadline for each individual stage
    pub step_timeout: Duration,
    /// Optional budget for the whole run
    pub pipeline_timeout: Option<Duration>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            step_timeout: DEFAULT_STEP_TIMEOUT,
            pipeline_timeout: None,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_step_timeout(mut self, step_timeout: Duration) -> Self {
        self.step_timeout = step_timeout;
        self
    }

    pub fn with_pipeline_timeout(mut self, pipeline_timeout: Duration) -> Self {
        self.pipeline_timeout = Some(pipeline_timeout);
        self
    }

    /// Timeout for the next stage of a run that began at `started`.
    ///
    /// `None` means the aggregate budget is already spent.
    pub fn step_deadline(&self, started: Instant) -> Option<Duration> {
        match self.pipeline_timeout {
            None => Some(self.step_timeout),
            Some(total) => {
                let remaining = total.checked_sub(started.elapsed())?;
                if remaining.is_zero() {
                    None
                } else {
                    Some(remaining.min(self.step_timeout))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::default();
        assert_eq!(config.step_timeout, Duration::from_secs(30));
        assert_eq!(config.pipeline_timeout, None);
    }

    #[test]
    fn test_builder_pattern() {
        let config = PipelineConfig::new()
            .with_step_timeout(Duration::from_secs(5))
            .with_pipeline_timeout(Duration::from_secs(60));

        assert_eq!(config.step_timeout, Duration::from_secs(5));
        assert_eq!(config.pipeline_timeout, Some(Duration::from_secs(60)));
    }

    #[test]
    fn test_step_deadline_without_budget() {
        let config = PipelineConfig::new().with_step_timeout(Duration::from_secs(7));
        assert_eq!(
            config.step_deadline(Instant::now()),
            Some(Duration::from_secs(7))
        );
    }

    #[test]
    fn test_step_deadline_is_capped_by_remaining_budget() {
        let config = PipelineConfig::new()
            .with_step_timeout(Duration::from_secs(30))
            .with_pipeline_timeout(Duration::from_secs(10));

        let deadline = config.step_deadline(Instant::now()).unwrap();
        assert!(deadline <= Duration::from_secs(10));
        assert!(deadline > Duration::from_secs(9));
    }

    #[test]
    fn test_step_deadline_exhausted() {
        let config = PipelineConfig::new().with_pipeline_timeout(Duration::from_millis(1));
        let started = Instant::now() - Duration::from_millis(50);
        assert_eq!(config.step_deadline(started), None);
    }
}
