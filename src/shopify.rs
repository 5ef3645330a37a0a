//! Shopify Admin REST API adapter.
//!
//! Shopify is the only supported backend that returns coordinates on the
//! shipping address, so its stops are usually geocoded.

use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::stop::Stop;
use crate::traits::{ClientError, FulfillmentStatus, PlatformClient};

const API_VERSION: &str = "2024-01";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct ShopifyConfig {
    /// Store domain, e.g. "my-shop.myshopify.com".
    pub store_url: String,
    pub access_token: String,
    pub timeout_secs: u64,
}

impl ShopifyConfig {
    pub fn new(store_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            store_url: store_url.into(),
            access_token: access_token.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ShopifyClient {
    base_url: String,
    access_token: String,
    client: reqwest::blocking::Client,
}

impl ShopifyClient {
    pub fn new(config: ShopifyConfig) -> Result<Self, ClientError> {
        if config.store_url.is_empty() {
            return Err(ClientError::MissingConfig("shopify store_url"));
        }
        if config.access_token.is_empty() {
            return Err(ClientError::MissingConfig("shopify access_token"));
        }

        let store_url = config.store_url.trim_end_matches('/');
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: format!("https://{}/admin/api/{}", store_url, API_VERSION),
            access_token: config.access_token,
            client,
        })
    }

    fn get(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Value, ClientError> {
        let url = format!("{}/{}.json", self.base_url, endpoint);
        let response = self
            .client
            .get(url)
            .header("X-Shopify-Access-Token", &self.access_token)
            .query(params)
            .send()?
            .error_for_status()?;

        Ok(response.json()?)
    }
}

impl PlatformClient for ShopifyClient {
    fn fetch_orders(
        &self,
        status: FulfillmentStatus,
        limit: usize,
    ) -> Result<Vec<Value>, ClientError> {
        // Shopify's fulfillment_status vocabulary matches the generic one.
        let params = [
            ("status", "any".to_string()),
            ("fulfillment_status", status.as_str().to_string()),
            ("limit", limit.to_string()),
        ];

        let data = self.get("orders", &params)?;
        let response: OrdersResponse = serde_json::from_value(data)?;
        debug!(count = response.orders.len(), "fetched shopify orders");
        Ok(response.orders)
    }

    fn extract_delivery_addresses(
        &self,
        status: FulfillmentStatus,
    ) -> Result<Vec<Stop>, ClientError> {
        let orders = self.fetch_orders(status, 250)?;
        Ok(stops_from_orders(&orders))
    }
}

fn stops_from_orders(orders: &[Value]) -> Vec<Stop> {
    let mut stops = Vec::new();

    for order in orders {
        let Some(shipping) = order.get("shipping_address").filter(|v| !v.is_null()) else {
            continue;
        };
        let Ok(shipping) = serde_json::from_value::<ShippingAddress>(shipping.clone()) else {
            continue;
        };

        let first = shipping.first_name.unwrap_or_default();
        let last = shipping.last_name.unwrap_or_default();

        stops.push(Stop {
            order_id: id_string(order.get("id")),
            order_name: order
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            name: format!("{} {}", first, last).trim().to_string(),
            address1: shipping.address1.unwrap_or_default(),
            address2: shipping.address2.unwrap_or_default(),
            city: shipping.city.unwrap_or_default(),
            province: shipping.province.unwrap_or_default(),
            country: shipping.country.unwrap_or_default(),
            zip_code: shipping.zip.unwrap_or_default(),
            phone: shipping.phone.unwrap_or_default(),
            latitude: shipping.latitude,
            longitude: shipping.longitude,
        });
    }

    stops
}

/// Shopify order ids are numeric; render them as opaque strings.
fn id_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

#[derive(Debug, Deserialize)]
struct OrdersResponse {
    #[serde(default)]
    orders: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ShippingAddress {
    first_name: Option<String>,
    last_name: Option<String>,
    address1: Option<String>,
    address2: Option<String>,
    city: Option<String>,
    province: Option<String>,
    country: Option<String>,
    zip: Option<String>,
    phone: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}
