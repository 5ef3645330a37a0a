//! Test fixtures for delivery-routing.
//!
//! Builders for stops with and without coordinates.

use delivery_routing::stop::Stop;

/// A geocoded stop at the given coordinates.
pub fn stop_at(order_name: &str, lat: f64, lng: f64) -> Stop {
    Stop {
        latitude: Some(lat),
        longitude: Some(lng),
        ..ungeocoded_stop(order_name)
    }
}

/// A stop without coordinates.
pub fn ungeocoded_stop(order_name: &str) -> Stop {
    Stop {
        order_id: order_name.trim_start_matches('#').to_string(),
        order_name: order_name.to_string(),
        name: format!("Recipient {}", order_name),
        address1: "1 Test St".to_string(),
        address2: String::new(),
        city: "Testville".to_string(),
        province: String::new(),
        country: "SG".to_string(),
        zip_code: "000000".to_string(),
        phone: String::new(),
        latitude: None,
        longitude: None,
    }
}

/// Order names in sequence, for permutation checks.
pub fn order_names(stops: &[Stop]) -> Vec<String> {
    stops.iter().map(|s| s.order_name.clone()).collect()
}
