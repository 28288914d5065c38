use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

static NEXT_ERROR_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide unique identifier for a rejected commit. Used to key the
/// transient error display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ErrorId(u64);

impl ErrorId {
    pub fn next() -> Self {
        Self(NEXT_ERROR_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ErrorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "commit-error-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{error}")]
pub struct CommitError {
    pub id: ErrorId,
    /// Field the error belongs to.
    pub name: &'static str,
    pub error: String,
}

impl CommitError {
    pub fn unknown_value(value: &str) -> Self {
        Self {
            id: ErrorId::next(),
            name: "name",
            error: format!("{value} does not exist"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CommitError, ErrorId};

    #[test]
    fn ids_increase_monotonically() {
        let first = ErrorId::next();
        let second = ErrorId::next();
        assert!(second > first);
    }

    #[test]
    fn unknown_value_message() {
        let err = CommitError::unknown_value("bet");
        assert_eq!(err.name, "name");
        assert_eq!(err.error, "bet does not exist");
        assert_eq!(err.to_string(), "bet does not exist");
    }

    #[test]
    fn repeated_rejections_get_distinct_ids() {
        let a = CommitError::unknown_value("x");
        let b = CommitError::unknown_value("x");
        assert_ne!(a.id, b.id);
        assert_ne!(a, b);
    }
}
