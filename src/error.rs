//! Error types returned while waiting for notifications.
//!
//! Normal operation (registering, broadcasting) never fails. Errors only
//! describe why a wait ended without an event:
//!
//! - [`NotifyError::Cancelled`]: the caller's own token fired first.
//! - [`NotifyError::Closed`]: the source was stopped or closed and will never
//!   deliver again.
//!
//! Both variants provide `as_label` / `as_message` helpers for logs.

use thiserror::Error;

/// # Reasons a wait for the next notification ended without one.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyError {
    /// The caller's cancellation token fired before the next event.
    #[error("wait cancelled by caller")]
    Cancelled,

    /// The subscription was stopped or the periodic broadcaster was closed.
    ///
    /// Terminal: every later wait on the same source returns this again.
    #[error("notification source closed")]
    Closed,
}

impl NotifyError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use herald::NotifyError;
    ///
    /// assert_eq!(NotifyError::Closed.as_label(), "notify_closed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            NotifyError::Cancelled => "notify_cancelled",
            NotifyError::Closed => "notify_closed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            NotifyError::Cancelled => "caller token cancelled before next event".to_string(),
            NotifyError::Closed => "source stopped; no further events".to_string(),
        }
    }

    /// Indicates whether the source itself is gone (as opposed to the caller giving up).
    ///
    /// # Example
    /// ```
    /// use herald::NotifyError;
    ///
    /// assert!(NotifyError::Closed.is_closed());
    /// assert!(!NotifyError::Cancelled.is_closed());
    /// ```
    pub fn is_closed(&self) -> bool {
        matches!(self, NotifyError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_distinct() {
        assert_ne!(
            NotifyError::Cancelled.as_label(),
            NotifyError::Closed.as_label()
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(NotifyError::Closed.to_string(), "notification source closed");
        assert_eq!(NotifyError::Cancelled.to_string(), "wait cancelled by caller");
    }
}
