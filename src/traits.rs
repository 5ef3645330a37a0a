//! Core contract for e-commerce platform adapters.
//!
//! Concrete clients (Shopify, Shopee, Lazada, TikTok Shop) implement
//! [`PlatformClient`] independently; nothing here is shared mutable state.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::stop::Stop;

/// Generic fulfillment status vocabulary, mapped by each adapter to its
/// platform's native status values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FulfillmentStatus {
    Unfulfilled,
    Fulfilled,
    Partial,
    Any,
}

impl FulfillmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unfulfilled => "unfulfilled",
            Self::Fulfilled => "fulfilled",
            Self::Partial => "partial",
            Self::Any => "any",
        }
    }
}

impl fmt::Display for FulfillmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FulfillmentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unfulfilled" => Ok(Self::Unfulfilled),
            "fulfilled" => Ok(Self::Fulfilled),
            "partial" => Ok(Self::Partial),
            "any" => Ok(Self::Any),
            other => Err(format!(
                "unknown fulfillment status '{other}' (expected unfulfilled, fulfilled, partial, or any)"
            )),
        }
    }
}

/// Adapter-side failures. Missing coordinates on an order are not an error;
/// those stops are simply ungeocoded.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("missing configuration: {0}")]
    MissingConfig(&'static str),
    #[error("unsupported region '{0}'")]
    UnsupportedRegion(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// A client for one order-management backend.
pub trait PlatformClient {
    /// Fetch raw order records matching the given fulfillment status.
    ///
    /// `limit` is a best-effort page size; platforms cap it at their own
    /// maximum.
    fn fetch_orders(
        &self,
        status: FulfillmentStatus,
        limit: usize,
    ) -> Result<Vec<serde_json::Value>, ClientError>;

    /// Fetch orders and normalize them into delivery [`Stop`]s, skipping
    /// orders without a shipping or recipient address. Coordinates are
    /// populated only when the platform's data includes them.
    fn extract_delivery_addresses(
        &self,
        status: FulfillmentStatus,
    ) -> Result<Vec<Stop>, ClientError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            FulfillmentStatus::Unfulfilled,
            FulfillmentStatus::Fulfilled,
            FulfillmentStatus::Partial,
            FulfillmentStatus::Any,
        ] {
            assert_eq!(status.as_str().parse::<FulfillmentStatus>(), Ok(status));
        }
    }

    #[test]
    fn unknown_status_is_rejected() {
        assert!("shipped".parse::<FulfillmentStatus>().is_err());
    }
}
