//! TikTok Shop Open API adapter.
//!
//! Signatures are HMAC-SHA256 over the app secret, the API path, and all
//! query parameters sorted by name, with the secret repeated as a suffix.
//! Order search and detail lookups are signed POST requests.

use hmac::{Hmac, Mac};
use serde_json::{json, Value};
use sha2::Sha256;
use tracing::debug;

use crate::stop::Stop;
use crate::traits::{ClientError, FulfillmentStatus, PlatformClient};

type HmacSha256 = Hmac<Sha256>;

const BASE_URL: &str = "https://open-api.tiktokglobalshop.com";

/// TikTok Shop caps page_size at 100.
const MAX_PAGE_SIZE: usize = 100;

/// Order search lookback window in seconds (15 days).
const LOOKBACK_SECS: u64 = 15 * 24 * 3600;

const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct TikTokConfig {
    pub app_key: String,
    pub app_secret: String,
    pub access_token: String,
    pub shop_id: String,
    pub timeout_secs: u64,
}

impl TikTokConfig {
    pub fn new(
        app_key: impl Into<String>,
        app_secret: impl Into<String>,
        access_token: impl Into<String>,
        shop_id: impl Into<String>,
    ) -> Self {
        Self {
            app_key: app_key.into(),
            app_secret: app_secret.into(),
            access_token: access_token.into(),
            shop_id: shop_id.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TikTokClient {
    config: TikTokConfig,
    client: reqwest::blocking::Client,
}

impl TikTokClient {
    pub fn new(config: TikTokConfig) -> Result<Self, ClientError> {
        if config.app_key.is_empty() {
            return Err(ClientError::MissingConfig("tiktok app_key"));
        }
        if config.app_secret.is_empty() {
            return Err(ClientError::MissingConfig("tiktok app_secret"));
        }
        if config.access_token.is_empty() {
            return Err(ClientError::MissingConfig("tiktok access_token"));
        }
        if config.shop_id.is_empty() {
            return Err(ClientError::MissingConfig("tiktok shop_id"));
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn signed_post(&self, path: &str, body: &Value) -> Result<Value, ClientError> {
        let timestamp = unix_timestamp();
        let sign_params = [
            ("app_key", self.config.app_key.clone()),
            ("timestamp", timestamp.to_string()),
            ("shop_id", self.config.shop_id.clone()),
        ];
        let signature = sign(&self.config.app_secret, path, &sign_params);

        let mut query = sign_params.to_vec();
        query.push(("sign", signature));
        query.push(("access_token", self.config.access_token.clone()));

        let response = self
            .client
            .post(format!("{}{}", BASE_URL, path))
            .query(&query)
            .json(body)
            .send()?
            .error_for_status()?;

        Ok(response.json()?)
    }
}

impl PlatformClient for TikTokClient {
    fn fetch_orders(
        &self,
        status: FulfillmentStatus,
        limit: usize,
    ) -> Result<Vec<Value>, ClientError> {
        let now = unix_timestamp();
        let mut body = json!({
            "page_size": limit.min(MAX_PAGE_SIZE),
            "sort_by": "CREATE_TIME",
            "sort_type": 2,
            "create_time_from": now.saturating_sub(LOOKBACK_SECS),
            "create_time_to": now,
        });
        if let Some(native) = native_status(status) {
            body["order_status"] = Value::from(native);
        }

        let data = self.signed_post("/api/orders/search", &body)?;
        let order_ids: Vec<Value> = order_list(&data)
            .iter()
            .filter_map(|order| order.get("order_id").cloned())
            .collect();
        debug!(count = order_ids.len(), "fetched tiktok order list");

        if order_ids.is_empty() {
            return Ok(Vec::new());
        }

        // Search results omit recipient addresses; batch-fetch full details.
        let detail = self.signed_post(
            "/api/orders/detail/query",
            &json!({ "order_id_list": order_ids }),
        )?;
        Ok(order_list(&detail).into_iter().cloned().collect())
    }

    fn extract_delivery_addresses(
        &self,
        status: FulfillmentStatus,
    ) -> Result<Vec<Stop>, ClientError> {
        let orders = self.fetch_orders(status, MAX_PAGE_SIZE)?;
        Ok(stops_from_orders(&orders))
    }
}

/// Map the generic status vocabulary to TikTok Shop order statuses.
/// `Any` means no status filter at all.
fn native_status(status: FulfillmentStatus) -> Option<&'static str> {
    match status {
        FulfillmentStatus::Unfulfilled => Some("AWAITING_SHIPMENT"),
        FulfillmentStatus::Fulfilled => Some("DELIVERED"),
        FulfillmentStatus::Partial => Some("IN_TRANSIT"),
        FulfillmentStatus::Any => None,
    }
}

fn sign(app_secret: &str, path: &str, params: &[(&str, String)]) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by_key(|(name, _)| *name);

    let mut base_string = String::from(app_secret);
    base_string.push_str(path);
    for (name, value) in sorted {
        base_string.push_str(name);
        base_string.push_str(value);
    }
    base_string.push_str(app_secret);

    let mut mac =
        HmacSha256::new_from_slice(app_secret.as_bytes()).expect("HMAC accepts any key length");
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
    data.get("data")
        .and_then(|d| d.get("order_list"))
        .and_then(Value::as_array)
        .map(|list| list.iter().collect())
        .unwrap_or_default()
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
        let order_id = order
            .get("order_id")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        stops.push(Stop {
            order_id: order_id.clone(),
            order_name: order_id,
            name: field("name"),
            address1: field("address_detail"),
            address2: field("address_line2"),
            city: field("city"),
            province: field("state"),
            country: field("region_code"),
            zip_code: field("zipcode"),
            phone: field("phone"),
            // TikTok Shop order data carries no coordinates.
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
        let err = TikTokClient::new(TikTokConfig::new("", "s", "t", "shop")).unwrap_err();
        assert!(matches!(err, ClientError::MissingConfig(_)));

        let err = TikTokClient::new(TikTokConfig::new("k", "s", "t", "")).unwrap_err();
        assert!(matches!(err, ClientError::MissingConfig(_)));
    }

    #[test]
    fn status_maps_to_tiktok_vocabulary() {
        assert_eq!(native_status(FulfillmentStatus::Unfulfilled), Some("AWAITING_SHIPMENT"));
        assert_eq!(native_status(FulfillmentStatus::Fulfilled), Some("DELIVERED"));
        assert_eq!(native_status(FulfillmentStatus::Partial), Some("IN_TRANSIT"));
        assert_eq!(native_status(FulfillmentStatus::Any), None);
    }

    #[test]
    fn signature_is_lowercase_hex_and_parameter_order_independent() {
        let forward = [("timestamp", "1700000000".to_string()), ("app_key", "k".to_string())];
        let reversed = [("app_key", "k".to_string()), ("timestamp", "1700000000".to_string())];

        let sig = sign("secret", "/api/orders/search", &forward);
        assert_eq!(sig, sign("secret", "/api/orders/search", &reversed));
        assert_eq!(sig.len(), 64);
        assert!(sig.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn extracts_recipient_addresses() {
        let orders = vec![
            json!({"order_id": "T1"}),
            json!({
                "order_id": "T2",
                "recipient_address": {
                    "name": "E. Chen",
                    "address_detail": "101 Nanjing Rd",
                    "city": "Taipei",
                    "state": "",
                    "region_code": "TW",
                    "zipcode": "104",
                    "phone": "0912000111"
                }
            }),
        ];

        let stops = stops_from_orders(&orders);
        assert_eq!(stops.len(), 1);
        assert_eq!(stops[0].order_id, "T2");
        assert_eq!(stops[0].order_name, "T2");
        assert_eq!(stops[0].address1, "101 Nanjing Rd");
        assert!(!stops[0].is_geocoded());
    }
}
