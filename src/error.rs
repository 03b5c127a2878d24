//! Error taxonomy for the briefing run.
//!
//! Failures fall into two classes with different blast radius:
//!
//! - **Local**: a single topic fetch or article summarization failed
//!   ([`Network`], [`Auth`], [`RateLimited`], [`Quota`], [`Model`]). The
//!   orchestrator logs these and moves on; the briefing is sent without the
//!   affected entries.
//! - **Fatal**: the run cannot produce its one deliverable ([`Config`],
//!   [`Delivery`], [`EmptyDigest`]). These propagate to `main`, which prints
//!   the message to stderr and exits non-zero.
//!
//! There are no retries at any layer; each variant describes a single failed
//! attempt.
//!
//! [`Network`]: BriefingError::Network
//! [`Auth`]: BriefingError::Auth
//! [`RateLimited`]: BriefingError::RateLimited
//! [`Quota`]: BriefingError::Quota
//! [`Model`]: BriefingError::Model
//! [`Config`]: BriefingError::Config
//! [`Delivery`]: BriefingError::Delivery
//! [`EmptyDigest`]: BriefingError::EmptyDigest

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, BriefingError>;

/// Everything that can go wrong during one briefing run.
#[derive(Debug, Error)]
pub enum BriefingError {
    /// A required configuration value is missing or unusable. Raised before
    /// any network call is attempted.
    #[error("configuration error: {0}")]
    Config(String),

    /// The request to an external service never produced a usable response
    /// (connect failure, timeout, unexpected status, undecodable body).
    #[error("{service} request failed: {message}")]
    Network {
        /// Which external service the request was addressed to.
        service: &'static str,
        /// What went wrong, as reported by the HTTP layer or the service.
        message: String,
    },

    /// The external service rejected the configured credentials.
    #[error("{service} rejected the configured credentials")]
    Auth {
        /// Which external service refused us.
        service: &'static str,
    },

    /// The external service throttled the request.
    #[error("{service} rate limit exceeded")]
    RateLimited {
        /// Which external service throttled us.
        service: &'static str,
    },

    /// The provider account has no quota left. Distinct from
    /// [`RateLimited`](Self::RateLimited) because waiting will not help.
    #[error("{service} quota exhausted")]
    Quota {
        /// Which external service reported the exhausted quota.
        service: &'static str,
    },

    /// The model endpoint answered, but not with a usable summary.
    #[error("summarization failed: {0}")]
    Model(String),

    /// The briefing email could not be built or handed to the SMTP server.
    #[error("mail delivery failed: {0}")]
    Delivery(String),

    /// Not a single article across all topics produced a summary, so there
    /// is nothing worth sending.
    #[error("no summaries were produced for any topic; not sending an empty briefing")]
    EmptyDigest,
}

impl BriefingError {
    /// Build a [`Network`](Self::Network) error from anything displayable.
    pub(crate) fn network(service: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Network {
            service,
            message: err.to_string(),
        }
    }
}
