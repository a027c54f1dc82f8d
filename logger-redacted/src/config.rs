// Logger configuration
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    /// Filter directive used when `RUST_LOG` is not set
    pub log_level: String,
    /// Emit newline-delimited JSON instead of human-readable lines
    pub json: bool,
    /// Scrub credentials from text passed through [`crate::redact`]; on unless turned off
    pub redaction_enabled: bool,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json: false,
            redaction_enabled: true,
        }
    }
}

impl LoggerConfig {
    pub fn verbose(mut self, verbose: bool) -> Self {
        if verbose {
            self.log_level = "debug".to_string();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: LoggerConfig = serde_json::from_str(r#"{"json": true}"#).unwrap();
        assert!(config.json);
        assert_eq!(config.log_level, "info");
        assert!(config.redaction_enabled);
    }

    #[test]
    fn test_redaction_can_be_disabled() {
        let config: LoggerConfig =
            serde_json::from_str(r#"{"redaction_enabled": false}"#).unwrap();
        assert!(!config.redaction_enabled);
        assert_eq!(config.log_level, "info");
        assert!(LoggerConfig::default().redaction_enabled);
    }

    #[test]
    fn test_verbose_raises_level() {
        assert_eq!(LoggerConfig::default().verbose(true).log_level, "debug");
        assert_eq!(LoggerConfig::default().verbose(false).log_level, "info");
    }
}
