use std::collections::HashSet;

use tracing::{debug, warn};

use super::{ActionDispatcher, FormErrorReport};
use crate::scripts;

const MAX_FORM_ERRORS: usize = 5;

impl ActionDispatcher<'_> {
    /// Visible validation messages on the page.
    pub async fn check_for_form_errors(&self) -> FormErrorReport {
        let raw = match self.page.evaluate(&scripts::form_errors()).await {
            Ok(value) => serde_json::from_value::<Vec<String>>(value).unwrap_or_default(),
            Err(e) => {
                warn!("Form error scan failed: {}", e);
                return FormErrorReport {
                    success: false,
                    error: Some(e.to_string()),
                    ..Default::default()
                };
            }
        };

        let errors = dedup_messages(raw, MAX_FORM_ERRORS);
        debug!(count = errors.len(), "Form error scan finished");
        FormErrorReport {
            success: true,
            has_errors: !errors.is_empty(),
            errors,
            error: None,
        }
    }
}

/// Whitespace-normalized, case-insensitively unique, at most `cap`.
fn dedup_messages(raw: Vec<String>, cap: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.into_iter()
        .map(|m| m.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|m| !m.is_empty() && seen.insert(m.to_lowercase()))
        .take(cap)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_messages() {
        let raw = vec![
            "This field is required".to_string(),
            "  This   field is required ".to_string(),
            "THIS FIELD IS REQUIRED".to_string(),
            "".to_string(),
            "Invalid email".to_string(),
        ];
        assert_eq!(
            dedup_messages(raw, 5),
            vec!["This field is required", "Invalid email"]
        );
    }

    #[test]
    fn test_dedup_messages_caps() {
        let raw = (0..8).map(|i| format!("Error {i}")).collect();
        assert_eq!(dedup_messages(raw, 5).len(), 5);
    }
}
