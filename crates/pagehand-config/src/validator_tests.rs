use super::*;
use std::path::PathBuf;

#[test]
fn test_validate_default_config() {
    let config = Config::default();
    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validate_zero_viewport() {
    let mut config = Config::default();
    config.browser.viewport_width = 0;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "browser.viewport"));
}

#[test]
fn test_validate_zero_retries() {
    let mut config = Config::default();
    config.snapshot.max_ax_attempts = 0;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "snapshot.max_ax_attempts"));
}

#[test]
fn test_validate_zero_history_limit() {
    let mut config = Config::default();
    config.tabs.history_limit = 0;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(!result.is_valid());
    assert!(result.errors.iter().any(|e| e.path == "tabs.history_limit"));
}

#[test]
fn test_validate_tiny_timeout_warning() {
    let mut config = Config::default();
    config.actions.click_timeout_ms = 10;

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result
        .warnings
        .iter()
        .any(|w| w.path == "actions.click_timeout_ms"));
}

#[test]
fn test_validate_missing_chrome_path_warning() {
    let mut config = Config::default();
    config.browser.chrome_path = Some(PathBuf::from("/nonexistent/chrome-binary"));

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.is_valid());
    assert!(result.warnings.iter().any(|w| w.path == "browser.chrome_path"));
}

#[test]
fn test_validate_unknown_log_level_warning() {
    let mut config = Config::default();
    config.logging.level = "loud".to_string();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.warnings.iter().any(|w| w.path == "logging.level"));
}

#[test]
fn test_validate_directive_log_level_accepted() {
    let mut config = Config::default();
    config.logging.level = "pagehand_browser=debug".to_string();

    let result = ConfigValidator::validate(&config).unwrap();
    assert!(result.warnings.is_empty());
}

#[test]
fn test_validation_result_methods() {
    let mut result = ValidationResult::default();
    assert!(result.is_valid());

    result.add_warning(ValidationWarning::new("test", "warning"));
    assert!(result.is_valid());

    result.add_error(ValidationError::new("test", "error"));
    assert!(!result.is_valid());
}
