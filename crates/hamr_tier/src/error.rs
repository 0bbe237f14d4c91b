// Copyright (c) the Hamr Project Authors.
// Licensed under the MIT License.

//! Error types for cache tier operations.

use std::{borrow::Cow, sync::Arc};

/// An error from a cache tier operation.
///
/// This is an opaque error type that can wrap any underlying error from a tier
/// implementation, typically a transport failure when talking to the shared
/// tier. The wrapped source is reference-counted so the error can be cloned
/// and handed to every caller coalesced onto the same in-flight computation.
///
/// # Example
///
/// ```
/// use hamr_tier::Error;
///
/// let error = Error::from_message("operation failed");
/// ```
#[derive(Clone, Debug, thiserror::Error)]
#[error("cache tier error: {message}")]
pub struct Error {
    message: Cow<'static, str>,
    #[source]
    source: Option<Arc<dyn std::error::Error + Send + Sync>>,
}

impl Error {
    /// Creates a new error from a message, with no underlying cause.
    pub fn from_message(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a new error wrapping an underlying cause.
    pub fn from_source(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self {
            message: Cow::Owned(source.to_string()),
            source: Some(Arc::new(source)),
        }
    }

    /// Creates a new error with a message and an underlying cause.
    pub fn with_context(message: impl Into<Cow<'static, str>>, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self {
            message: message.into(),
            source: Some(Arc::new(source)),
        }
    }

    /// Attempts to downcast the underlying cause to a concrete error type.
    #[must_use]
    pub fn source_as<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_deref().and_then(|source| source.downcast_ref::<E>())
    }
}

/// A specialized [`Result`] type for cache tier operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_contains_message() {
        let error = Error::from_message("display test");
        let display_str = format!("{error}");
        assert!(
            display_str.contains("display test"),
            "display output should contain the message, got: {display_str}"
        );
    }

    #[test]
    fn error_source_is_preserved() {
        let io = std::io::Error::new(std::io::ErrorKind::TimedOut, "connection timed out");
        let error = Error::with_context("shared tier unreachable", io);
        assert!(std::error::Error::source(&error).is_some());
        let downcast = error.source_as::<std::io::Error>().expect("should downcast");
        assert_eq!(downcast.kind(), std::io::ErrorKind::TimedOut);
    }

    #[test]
    fn error_source_display_names_the_cause() {
        let io = std::io::Error::other("socket closed");
        let error = Error::with_context("shared tier write failed", io);
        let source = std::error::Error::source(&error).expect("should have a source");
        assert_eq!(source.to_string(), "socket closed");
        assert_eq!(format!("{error}"), "cache tier error: shared tier write failed");
    }

    #[test]
    fn error_clone_shares_source() {
        let io = std::io::Error::other("boom");
        let error = Error::from_source(io);
        let cloned = error.clone();
        assert_eq!(format!("{error}"), format!("{cloned}"));
        assert!(cloned.source_as::<std::io::Error>().is_some());
    }

    #[test]
    fn result_type_alias_propagates_errors() {
        fn returns_err() -> Result<i32> {
            Err(Error::from_message("expected failure"))
        }

        let err = returns_err().expect_err("should return an error");
        assert!(format!("{err}").contains("expected failure"));
    }
}
