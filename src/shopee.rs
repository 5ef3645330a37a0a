//! Shopee Open Platform v2 adapter.
//!
//! Every request carries an HMAC-SHA256 signature over
//! `partner_id + path + timestamp + access_token + shop_id`. Order lookups
//! are a two-step flow: list order numbers, then batch-fetch details
//! (the list endpoint does not include recipient addresses).

use hmac::{Hmac, Mac};
use serde_json::Value;
use sha2::Sha256;
use tracing::debug;

use crate::stop::Stop;
use crate::traits::{ClientError, FulfillmentStatus, PlatformClient};

type HmacSha256 = Hmac<Sha256>;

const BASE_URL: &str = "https://partner.shopeemobile.com";

/// Shopee caps page_size at 100.
const MAX_PAGE_SIZE: usize = 100;

/// Order list lookback window in seconds (15 days).
const LOOKBACK_SECS: u64 = 15 * 24 * 3600;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct ShopeeConfig {
    pub partner_id: u64,
    pub partner_key: String,
    pub shop_id: u64,
    pub access_token: String,
    pub timeout_secs: u64,
}

impl ShopeeConfig {
    pub fn new(
        partner_id: u64,
        partner_key: impl Into<String>,
        shop_id: u64,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            partner_id,
            partner_key: partner_key.into(),
            shop_id,
            access_token: access_token.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShopeeClient {
    config: ShopeeConfig,
    client: reqwest::blocking::Client,
}

impl ShopeeClient {
    pub fn new(config: ShopeeConfig) -> Result<Self, ClientError> {
        if config.partner_id == 0 {
            return Err(ClientError::MissingConfig("shopee partner_id"));
        }
        if config.partner_key.is_empty() {
            return Err(ClientError::MissingConfig("shopee partner_key"));
        }
        if config.shop_id == 0 {
            return Err(ClientError::MissingConfig("shopee shop_id"));
        }
        if config.access_token.is_empty() {
            return Err(ClientError::MissingConfig("shopee access_token"));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn signed_get(&self, path: &str, params: &[(&str, String)]) -> Result<Value, ClientError> {
        let timestamp = unix_timestamp();
        let signature = sign(
            self.config.partner_id,
            &self.config.partner_key,
            path,
            timestamp,
            &self.config.access_token,
            self.config.shop_id,
        );

        let mut query = vec![
            ("partner_id", self.config.partner_id.to_string()),
            ("timestamp", timestamp.to_string()),
            ("access_token", self.config.access_token.clone()),
            ("shop_id", self.config.shop_id.to_string()),
            ("sign", signature),
        ];
        query.extend(params.iter().map(|(k, v)| (*k, v.clone())));

        let response = self
            .client
            .get(format!("{}{}", BASE_URL, path))
            .query(&query)
            .send()?
            .error_for_status()?;

        Ok(response.json()?)
    }
}

impl PlatformClient for ShopeeClient {
    fn fetch_orders(
        &self,
        status: FulfillmentStatus,
        limit: usize,
    ) -> Result<Vec<Value>, ClientError> {
        let now = unix_timestamp();
        let mut params = vec![
            ("time_range_field", "create_time".to_string()),
            ("time_from", now.saturating_sub(LOOKBACK_SECS).to_string()),
            ("time_to", now.to_string()),
            ("page_size", limit.min(MAX_PAGE_SIZE).to_string()),
            ("cursor", String::new()),
        ];
        if let Some(native) = native_status(status) {
            params.push(("order_status", native.to_string()));
        }

        let data = self.signed_get("/api/v2/order/get_order_list", &params)?;
        let order_list = order_list(&data);
        debug!(count = order_list.len(), "fetched shopee order list");

        if order_list.is_empty() {
            return Ok(Vec::new());
        }

        // Full details (including recipient addresses) come from a single
        // batch lookup keyed on the order serial numbers.
        let order_sn_list = order_list
            .iter()
            .filter_map(|order| order.get("order_sn").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join(",");
        let detail_params = [
            ("order_sn_list", order_sn_list),
            (
                "response_optional_fields",
                "buyer_username,recipient_address,note".to_string(),
            ),
        ];

        let detail = self.signed_get("/api/v2/order/get_order_detail", &detail_params)?;
        Ok(order_list_owned(&detail))
    }

    fn extract_delivery_addresses(
        &self,
        status: FulfillmentStatus,
    ) -> Result<Vec<Stop>, ClientError> {
        let orders = self.fetch_orders(status, MAX_PAGE_SIZE)?;
        Ok(stops_from_orders(&orders))
    }
}

/// Map the generic status vocabulary to Shopee order statuses.
/// `Any` means no status filter at all.
fn native_status(status: FulfillmentStatus) -> Option<&'static str> {
    match status {
        FulfillmentStatus::Unfulfilled => Some("READY_TO_SHIP"),
        FulfillmentStatus::Fulfilled => Some("SHIPPED"),
        FulfillmentStatus::Partial => Some("RETRY_SHIP"),
        FulfillmentStatus::Any => None,
    }
}

fn sign(
    partner_id: u64,
    partner_key: &str,
    path: &str,
    timestamp: u64,
    access_token: &str,
    shop_id: u64,
) -> String {
    let base_string = format!("{partner_id}{path}{timestamp}{access_token}{shop_id}");
    let mut mac =
        HmacSha256::new_from_slice(partner_key.as_bytes()).expect("HMAC accepts any key length");
    mac.update(base_string.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

fn unix_timestamp() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn order_list(data: &Value) -> Vec<&Value> {
    data.get("response")
        .and_then(|r| r.get("order_list"))
        .and_then(Value::as_array)
        .map(|list| list.iter().collect())
        .unwrap_or_default()
}

fn order_list_owned(data: &Value) -> Vec<Value> {
    order_list(data).into_iter().cloned().collect()
}

fn stops_from_orders(orders: &[Value]) -> Vec<Stop> {
    let mut stops = Vec::new();

    for order in orders {
        let Some(recipient) = order.get("recipient_address").filter(|v| !v.is_null()) else {
            continue;
        };

        let field = |key: &str| -> String {
            recipient
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let order_sn = order
            .get("order_sn")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        stops.push(Stop {
            order_id: order_sn.clone(),
            order_name: order_sn,
            name: field("name"),
            address1: field("full_address"),
            address2: field("district"),
            city: field("city"),
            province: field("state"),
            country: field("region"),
            zip_code: field("zipcode"),
            phone: field("phone"),
            // Shopee order data carries no coordinates.
            latitude: None,
            longitude: None,
        });
    }

    stops
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejects_incomplete_credentials() {
        let err = ShopeeClient::new(ShopeeConfig::new(0, "key", 7, "token")).unwrap_err();
        assert!(matches!(err, ClientError::MissingConfig(_)));

        let err = ShopeeClient::new(ShopeeConfig::new(5, "", 7, "token")).unwrap_err();
        assert!(matches!(err, ClientError::MissingConfig(_)));
    }

    #[test]
    fn status_maps_to_shopee_vocabulary() {
        assert_eq!(native_status(FulfillmentStatus::Unfulfilled), Some("READY_TO_SHIP"));
        assert_eq!(native_status(FulfillmentStatus::Fulfilled), Some("SHIPPED"));
        assert_eq!(native_status(FulfillmentStatus::Partial), Some("RETRY_SHIP"));
        assert_eq!(native_status(FulfillmentStatus::Any), None);
    }

    #[test]
    fn signature_is_lowercase_hex_and_deterministic() {
        let a = sign(10, "secret", "/api/v2/order/get_order_list", 1700000000, "token", 20);
        let b = sign(10, "secret", "/api/v2/order/get_order_list", 1700000000, "token", 20);

        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

        let other = sign(10, "secret", "/api/v2/order/get_order_list", 1700000001, "token", 20);
        assert_ne!(a, other);
    }

    #[test]
    fn extracts_recipient_addresses() {
        let orders = vec![
            json!({"order_sn": "SN1"}),
            json!({
                "order_sn": "SN2",
                "recipient_address": {
                    "name": "C. Lim",
                    "full_address": "88 Jalan Besar",
                    "city": "Singapore",
                    "state": "",
                    "region": "SG",
                    "zipcode": "208787",
                    "phone": "91234567"
                }
            }),
        ];

        let stops = stops_from_orders(&orders);
        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].order_id, "SN2");
        assert_eq!(stops[0].address1, "88 Jalan Besar");
        assert!(!stops[0].is_geocoded());
    }
}
