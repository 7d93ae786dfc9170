//! Error types for the market data crate.
//!
//! An adapter reports "no data for this query" through an empty result
//! (`Ok(None)` / an empty distribution list). Every variant here is an
//! operational failure: the registry logs it and moves on to the next
//! provider in the priority list.

use thiserror::Error;

/// Errors that can occur during market data operations.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The provider does not handle the requested asset category.
    #[error("{provider} does not support category '{category}'")]
    UnsupportedCategory {
        /// The provider that rejected the category
        provider: String,
        /// The rejected category tag
        category: String,
    },

    /// The provider does not implement the requested operation at all.
    #[error("{provider} does not support {operation}")]
    NotSupported {
        /// The operation that was requested (e.g. "dividends")
        operation: String,
        /// The provider that was asked
        provider: String,
    },

    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// A provider-specific error occurred.
    #[error("Provider error: {provider} - {message}")]
    ProviderError {
        /// The provider that returned the error
        provider: String,
        /// The error message from the provider
        message: String,
    },

    /// The provider answered, but the payload could not be understood.
    #[error("Unparseable response from {provider}: {message}")]
    InvalidResponse {
        /// The provider that returned the payload
        provider: String,
        /// What went wrong while parsing
        message: String,
    },

    /// The provider needs a credential that was not configured.
    #[error("{provider} requires an API token")]
    MissingCredentials {
        /// The provider missing its credential
        provider: String,
    },

    /// A provider name in a priority list has no registered adapter.
    #[error("Unrecognized data source name {0}")]
    UnknownProvider(String),

    /// The priority list for the request was empty.
    #[error("No providers configured")]
    NoProvidersConfigured,

    /// All providers were tried and none produced data.
    #[error("All providers failed")]
    AllProvidersFailed,

    /// A network error occurred while communicating with a provider.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Shorthand for a [`MarketDataError::ProviderError`].
    pub fn provider(provider: &str, message: impl Into<String>) -> Self {
        Self::ProviderError {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    /// Shorthand for a [`MarketDataError::InvalidResponse`].
    pub fn invalid_response(provider: &str, message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    /// True when the whole provider scan came up empty.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::AllProvidersFailed | Self::NoProvidersConfigured)
    }
}
