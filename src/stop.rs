//! Delivery stop data model shared by all platform adapters.

use serde::{Deserialize, Serialize};

/// One delivery destination extracted from an e-commerce order.
///
/// Display fields are opaque strings used only for rendering. Coordinates
/// are present only when the backend supplies them; routing math never
/// touches a stop without both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub order_id: String,
    /// Human-facing order label (e.g. "#1001" or the platform order number).
    pub order_name: String,
    pub name: String,
    pub address1: String,
    pub address2: String,
    pub city: String,
    pub province: String,
    pub country: String,
    pub zip_code: String,
    pub phone: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Stop {
    /// A stop is geocoded iff both coordinates are present.
    pub fn is_geocoded(&self) -> bool {
        self.latitude.is_some() && self.longitude.is_some()
    }

    /// Coordinates as `(lat, lng)`, if the stop is geocoded.
    pub fn location(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }

    /// Single-line address built from the non-empty display parts.
    pub fn full_address(&self) -> String {
        let parts = [
            &self.address1,
            &self.address2,
            &self.city,
            &self.province,
            &self.zip_code,
            &self.country,
        ];
        parts
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop() -> Stop {
        Stop {
            order_id: "1001".to_string(),
            order_name: "#1001".to_string(),
            name: "A. Tan".to_string(),
            address1: "12 Orchard Rd".to_string(),
            address2: String::new(),
            city: "Singapore".to_string(),
            province: String::new(),
            country: "SG".to_string(),
            zip_code: "238823".to_string(),
            phone: String::new(),
            latitude: None,
            longitude: None,
        }
    }

    #[test]
    fn full_address_skips_empty_parts() {
        assert_eq!(stop().full_address(), "12 Orchard Rd, Singapore, 238823, SG");
    }

    #[test]
    fn geocoded_requires_both_coordinates() {
        let mut s = stop();
        assert!(!s.is_geocoded());

        s.latitude = Some(1.3);
        assert!(!s.is_geocoded());
        assert_eq!(s.location(), None);

        s.longitude = Some(103.8);
        assert!(s.is_geocoded());
        assert_eq!(s.location(), Some((1.3, 103.8)));
    }
}
