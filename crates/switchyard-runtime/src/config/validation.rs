//! Configuration validation utilities.

use std::collections::HashSet;

use switchyard_core::is_reserved_key;

use super::error::{ConfigError, ConfigResult};
use super::schema::{LogFormat, LogOutput, LoggingConfig, RouterSettings, SwitchyardConfig};

/// Validates the entire configuration.
pub fn validate_config(config: &SwitchyardConfig) -> ConfigResult<()> {
    validate_logging_config(&config.logging)?;
    validate_router_settings(&config.router)?;
    Ok(())
}

fn validate_logging_config(logging: &LoggingConfig) -> ConfigResult<()> {
    if logging.output == LogOutput::File && logging.file_path.is_none() {
        return Err(ConfigError::validation(
            "logging.file_path is required when logging.output is \"file\"",
        ));
    }

    if logging.format == LogFormat::Json && !cfg!(feature = "json-log") {
        return Err(ConfigError::validation(
            "logging.format \"json\" requires the json-log feature",
        ));
    }

    if let Some(module) = logging.filters.keys().find(|m| m.trim().is_empty()) {
        return Err(ConfigError::validation(format!(
            "Invalid logging filter target: {module:?}"
        )));
    }

    Ok(())
}

fn validate_router_settings(router: &RouterSettings) -> ConfigResult<()> {
    let mut seen = HashSet::new();

    for processor in &router.processors {
        let key = processor.key.as_str();

        if key.trim().is_empty() {
            return Err(ConfigError::validation("Processor key cannot be empty"));
        }

        if is_reserved_key(key) {
            return Err(ConfigError::validation(format!(
                "'{key}' is a reserved router setting and cannot name a processor"
            )));
        }

        if processor.enabled && !seen.insert(key) {
            return Err(ConfigError::validation(format!(
                "Processor '{key}' is listed more than once"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::{LogLevel, ProcessorSettings};
    use serde_json::json;

    #[test]
    fn test_validate_default_config() {
        assert!(validate_config(&SwitchyardConfig::default()).is_ok());
    }

    #[test]
    fn test_file_output_requires_path() {
        let mut config = SwitchyardConfig::default();
        config.logging.output = LogOutput::File;
        assert!(validate_config(&config).is_err());

        config.logging.file_path = Some("switchyard.log".into());
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_reserved_processor_key() {
        let mut config = SwitchyardConfig::default();
        config
            .router
            .processors
            .push(ProcessorSettings::new("onError", json!({})));

        let result = validate_config(&config);
        assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    }

    #[test]
    fn test_duplicate_processor_key() {
        let mut config = SwitchyardConfig::default();
        config.router.processors = vec![
            ProcessorSettings::new("queue", json!({})),
            ProcessorSettings::new("queue", json!({})),
        ];
        assert!(validate_config(&config).is_err());

        // A disabled duplicate does not take part in dispatch.
        config.router.processors[1].enabled = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_empty_filter_target() {
        let mut config = SwitchyardConfig::default();
        config.logging.filters.insert(" ".into(), LogLevel::Debug);
        assert!(validate_config(&config).is_err());
    }
}
