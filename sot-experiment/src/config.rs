use serde::{Deserialize, Serialize};
use sot_core::{Error, Result};
use std::path::Path;
use std::time::Duration;

use crate::capture::CaptureMode;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentConfig {
    pub test_time_budget_secs: u32,
    pub tick_interval_ms: u64,
    pub feedback_dwell_ms: u64,
    pub step_degrees: f64,
    pub capture_mode: CaptureMode,
    pub asset_load_timeout_ms: u64,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            test_time_budget_secs: 300,
            tick_interval_ms: 1000,
            feedback_dwell_ms: 2000,
            step_degrees: 5.0,
            capture_mode: CaptureMode::Continuous,
            asset_load_timeout_ms: 30_000,
        }
    }
}

impl ExperimentConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.test_time_budget_secs == 0 {
            return Err(Error::Config("test_time_budget_secs must be positive".into()));
        }
        if self.tick_interval_ms == 0 {
            return Err(Error::Config("tick_interval_ms must be positive".into()));
        }
        if !(self.step_degrees > 0.0 && self.step_degrees < 360.0) {
            return Err(Error::Config("step_degrees must be in (0, 360)".into()));
        }
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn feedback_dwell(&self) -> Duration {
        Duration::from_millis(self.feedback_dwell_ms)
    }

    pub fn asset_load_timeout(&self) -> Duration {
        Duration::from_millis(self.asset_load_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_the_standard_session() {
        let c = ExperimentConfig::default();
        assert_eq!(c.test_time_budget_secs, 300);
        assert_eq!(c.feedback_dwell(), Duration::from_secs(2));
        assert_eq!(c.tick_interval(), Duration::from_secs(1));
        assert_eq!(c.step_degrees, 5.0);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"test_time_budget_secs": 60, "capture_mode": "discrete"}}"#).unwrap();
        let c = ExperimentConfig::load(file.path()).unwrap();
        assert_eq!(c.test_time_budget_secs, 60);
        assert_eq!(c.capture_mode, CaptureMode::Discrete);
        assert_eq!(c.feedback_dwell_ms, 2000);
    }

    #[test]
    fn zero_budget_is_rejected() {
        let c = ExperimentConfig {
            test_time_budget_secs: 0,
            ..Default::default()
        };
        assert!(matches!(c.validate(), Err(Error::Config(_))));
    }
}
