// Copyright (c) the Hamr Project Authors.
// Licensed under the MIT License.

//! Error types for cache operations.

use std::sync::Arc;

use samflight::FlightAborted;

/// An error from a cache operation.
///
/// Cloneable, because a coalesced population failure is delivered to every
/// caller attached to the same in-flight computation.
#[derive(Clone, Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The fallback computation reported an error.
    ///
    /// The error is not cached; the next call for the key retries the
    /// fallback.
    #[error("fallback failed: {0}")]
    Fallback(#[source] Arc<dyn std::error::Error + Send + Sync>),

    /// The coalesced population computation ended abnormally (panic or
    /// runtime shutdown) rather than returning a result.
    #[error(transparent)]
    Aborted(#[from] FlightAborted),

    /// A tier operation failed.
    #[error(transparent)]
    Tier(#[from] hamr_tier::Error),
}

impl Error {
    pub(crate) fn fallback(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Fallback(Arc::new(source))
    }

    /// Attempts to downcast a [`Error::Fallback`] cause to a concrete type.
    #[must_use]
    pub fn fallback_as<E: std::error::Error + 'static>(&self) -> Option<&E> {
        match self {
            Self::Fallback(source) => source.downcast_ref::<E>(),
            Self::Aborted(_) | Self::Tier(_) => None,
        }
    }
}

/// A specialized [`Result`] type for cache operations.
pub type Result<T> = std::result::Result<T, Error>;
