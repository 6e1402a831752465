//! The single user-notification channel.
//!
//! Every recoverable failure ends up here as plain data: no formatting,
//! no localization. A `Banner` is dismissible and non-blocking (the
//! "using local data" fallback); a `Blocking` notice names the rejected
//! operation and expects an acknowledgement before the user moves on.

use study_remote::StoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Banner,
    Blocking,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    severity: Severity,
    message: String,
    operation: Option<&'static str>,
}

impl Notice {
    #[must_use]
    pub fn banner(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Banner,
            message: message.into(),
            operation: None,
        }
    }

    #[must_use]
    pub fn blocking(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Blocking,
            message: message.into(),
            operation: Some(operation),
        }
    }

    /// Maps a store failure onto the channel: transport failures become
    /// banners, everything else a blocking notice naming the operation.
    #[must_use]
    pub fn from_store(operation: &'static str, err: &StoreError) -> Self {
        match err {
            StoreError::Unreachable(_) => {
                Notice::banner("Could not connect to the server. Using local data instead.")
            }
            other => Notice::blocking(operation, other.to_string()),
        }
    }

    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[must_use]
    pub fn operation(&self) -> Option<&'static str> {
        self.operation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_becomes_a_banner() {
        let err = StoreError::Unreachable("connection refused".into());
        let notice = Notice::from_store("list subjects", &err);
        assert_eq!(notice.severity(), Severity::Banner);
        assert!(notice.operation().is_none());
    }

    #[test]
    fn rejection_becomes_blocking_and_names_the_operation() {
        let err = StoreError::Rejected {
            operation: "create card",
            status: 400,
        };
        let notice = Notice::from_store("create card", &err);
        assert_eq!(notice.severity(), Severity::Blocking);
        assert_eq!(notice.operation(), Some("create card"));
    }
}
