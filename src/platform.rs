//! Platform selection and client factory.
//!
//! Adapters are independent implementations of [`PlatformClient`] chosen at
//! runtime by platform identifier; no shared base state.

use std::fmt;
use std::str::FromStr;

use crate::lazada::{LazadaClient, LazadaConfig};
use crate::shopee::{ShopeeClient, ShopeeConfig};
use crate::shopify::{ShopifyClient, ShopifyConfig};
use crate::tiktok::{TikTokClient, TikTokConfig};
use crate::traits::{ClientError, PlatformClient};

/// Identifier for a supported order-management backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Shopify,
    Shopee,
    Lazada,
    Tiktok,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Shopify => "shopify",
            Self::Shopee => "shopee",
            Self::Lazada => "lazada",
            Self::Tiktok => "tiktok",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shopify" => Ok(Self::Shopify),
            "shopee" => Ok(Self::Shopee),
            "lazada" => Ok(Self::Lazada),
            "tiktok" => Ok(Self::Tiktok),
            other => Err(format!(
                "unknown platform '{other}' (expected shopify, shopee, lazada, or tiktok)"
            )),
        }
    }
}

/// Configuration for one concrete platform client.
#[derive(Debug, Clone)]
pub enum PlatformConfig {
    Shopify(ShopifyConfig),
    Shopee(ShopeeConfig),
    Lazada(LazadaConfig),
    Tiktok(TikTokConfig),
}

impl PlatformConfig {
    pub fn platform(&self) -> Platform {
        match self {
            Self::Shopify(_) => Platform::Shopify,
            Self::Shopee(_) => Platform::Shopee,
            Self::Lazada(_) => Platform::Lazada,
            Self::Tiktok(_) => Platform::Tiktok,
        }
    }
}

/// Build the client for the configured platform.
///
/// Validation happens eagerly in each client constructor; a client that
/// comes back `Ok` is ready to make requests.
pub fn build_client(config: PlatformConfig) -> Result<Box<dyn PlatformClient>, ClientError> {
    match config {
        PlatformConfig::Shopify(config) => Ok(Box::new(ShopifyClient::new(config)?)),
        PlatformConfig::Shopee(config) => Ok(Box::new(ShopeeClient::new(config)?)),
        PlatformConfig::Lazada(config) => Ok(Box::new(LazadaClient::new(config)?)),
        PlatformConfig::Tiktok(config) => Ok(Box::new(TikTokClient::new(config)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn platform_parses_from_identifier() {
        assert_eq!("shopify".parse::<Platform>(), Ok(Platform::Shopify));
        assert_eq!("tiktok".parse::<Platform>(), Ok(Platform::Tiktok));
        assert!("ebay".parse::<Platform>().is_err());
    }

    #[test]
    fn config_reports_its_platform() {
        let config = PlatformConfig::Shopify(ShopifyConfig::new("shop.myshopify.com", "token"));
        assert_eq!(config.platform(), Platform::Shopify);
    }

    #[test]
    fn factory_surfaces_constructor_validation() {
        let result = build_client(PlatformConfig::Shopify(ShopifyConfig::new("", "")));
        assert!(result.is_err());
    }
}
