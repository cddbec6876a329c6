//! Configuration validation.

use crate::error::ConfigError;
use crate::schema::Config;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Timeouts below this are accepted but flagged.
const TINY_TIMEOUT_MS: u64 = 100;

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    pub fn validate(config: &Config) -> Result<ValidationResult, ConfigError> {
        let mut result = ValidationResult::default();

        Self::validate_browser(config, &mut result);
        Self::validate_snapshot(config, &mut result);
        Self::validate_timeouts(config, &mut result);
        Self::validate_tabs(config, &mut result);
        Self::validate_logging(config, &mut result);

        Ok(result)
    }

    fn validate_browser(config: &Config, result: &mut ValidationResult) {
        let browser = &config.browser;
        if browser.viewport_width == 0 || browser.viewport_height == 0 {
            result.add_error(ValidationError::new(
                "browser.viewport",
                "Viewport width and height must be greater than 0",
            ));
        }

        if browser.debug_port == 0 {
            result.add_error(ValidationError::new(
                "browser.debug_port",
                "Port cannot be 0",
            ));
        }

        if browser.launch_timeout_secs == 0 {
            result.add_error(ValidationError::new(
                "browser.launch_timeout_secs",
                "launch_timeout_secs must be greater than 0",
            ));
        }

        if let Some(ref path) = browser.chrome_path {
            if !path.exists() {
                result.add_warning(ValidationWarning::new(
                    "browser.chrome_path",
                    format!("Browser executable does not exist: {:?}", path),
                ));
            }
        }
    }

    fn validate_snapshot(config: &Config, result: &mut ValidationResult) {
        if config.snapshot.max_ax_attempts == 0 {
            result.add_error(ValidationError::new(
                "snapshot.max_ax_attempts",
                "max_ax_attempts must be greater than 0",
            ));
        }

        if config.snapshot.hierarchy_line_cap == 0 {
            result.add_warning(ValidationWarning::new(
                "snapshot.hierarchy_line_cap",
                "hierarchy_line_cap is 0, snapshots will carry no hierarchy text",
            ));
        }
    }

    fn validate_timeouts(config: &Config, result: &mut ValidationResult) {
        let timeouts = [
            ("readiness.timeout_ms", config.readiness.timeout_ms),
            ("actions.locator_timeout_ms", config.actions.locator_timeout_ms),
            ("actions.click_timeout_ms", config.actions.click_timeout_ms),
            ("actions.navigation_timeout_ms", config.actions.navigation_timeout_ms),
        ];

        for (path, value) in timeouts {
            if value < TINY_TIMEOUT_MS {
                result.add_warning(ValidationWarning::new(
                    path,
                    format!("{}ms is very short, waits will almost always time out", value),
                ));
            }
        }

        if config.actions.verification_radius_px <= 0.0 {
            result.add_error(ValidationError::new(
                "actions.verification_radius_px",
                "verification_radius_px must be positive",
            ));
        }
    }

    fn validate_tabs(config: &Config, result: &mut ValidationResult) {
        if config.tabs.history_limit == 0 {
            result.add_error(ValidationError::new(
                "tabs.history_limit",
                "history_limit must be greater than 0",
            ));
        }

        if config.tabs.recent_window < config.tabs.distinct_domain_threshold {
            result.add_warning(ValidationWarning::new(
                "tabs.recent_window",
                "recent_window is smaller than distinct_domain_threshold, the domain recommendation can never trigger",
            ));
        }
    }

    fn validate_logging(config: &Config, result: &mut ValidationResult) {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        let level = config.logging.level.to_lowercase();
        if !level.contains('=') && !valid_levels.contains(&level.as_str()) {
            result.add_warning(ValidationWarning::new(
                "logging.level",
                format!(
                    "Unknown log level '{}', valid values: {:?}",
                    config.logging.level, valid_levels
                ),
            ));
        }
    }
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
