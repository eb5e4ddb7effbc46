//! Subdomain format validation.

use serde::Serialize;

/// Minimum accepted label length.
pub const MIN_SUBDOMAIN_LEN: usize = 2;

/// Result of checking a workspace identifier.
///
/// `message` is for display only; callers branch on `is_valid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub message: String,
}

impl ValidationOutcome {
    fn valid() -> Self {
        Self {
            is_valid: true,
            message: String::new(),
        }
    }

    fn invalid(message: &str) -> Self {
        Self {
            is_valid: false,
            message: message.to_string(),
        }
    }
}

/// Check an identifier: non-empty, at least two characters, `[A-Za-z0-9-]+`.
pub fn validate_subdomain(identifier: &str) -> ValidationOutcome {
    if identifier.is_empty() {
        return ValidationOutcome::invalid("Subdomain is required");
    }

    if identifier.chars().count() < MIN_SUBDOMAIN_LEN {
        return ValidationOutcome::invalid("Subdomain must be at least 2 characters");
    }

    if !identifier
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-')
    {
        return ValidationOutcome::invalid(
            "Subdomain can only contain letters, numbers, and hyphens",
        );
    }

    ValidationOutcome::valid()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_valid_labels() {
        for id in ["ab", "acme", "team-42", "ACME", "0-0", "--"] {
            let out = validate_subdomain(id);
            assert!(out.is_valid, "{id} should be valid");
            assert!(out.message.is_empty());
        }
    }

    #[test]
    fn test_rejects_empty_and_short() {
        let out = validate_subdomain("");
        assert!(!out.is_valid);
        assert_eq!(out.message, "Subdomain is required");

        let out = validate_subdomain("a");
        assert!(!out.is_valid);
        assert_eq!(out.message, "Subdomain must be at least 2 characters");
    }

    #[test]
    fn test_rejects_bad_characters() {
        for id in ["ac_me", "acme!", "a b", "café", "acme.co"] {
            let out = validate_subdomain(id);
            assert!(!out.is_valid, "{id} should be rejected");
            assert_eq!(
                out.message,
                "Subdomain can only contain letters, numbers, and hyphens"
            );
        }
    }
}
