//! CSV export for planned routes.

use std::io::Write;
use std::path::Path;

use crate::stop::Stop;

const HEADER: [&str; 11] = [
    "stop", "order_name", "name", "address", "city", "province", "zip", "country", "phone",
    "latitude", "longitude",
];

/// Write the route as CSV, one row per stop in visiting order.
///
/// Stop numbers are 1-based. Latitude/longitude cells are left empty for
/// ungeocoded stops.
pub fn write_route_csv<W: Write>(stops: &[Stop], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(HEADER)?;

    for (i, stop) in stops.iter().enumerate() {
        csv_writer.write_record([
            (i + 1).to_string(),
            stop.order_name.clone(),
            stop.name.clone(),
            stop.full_address(),
            stop.city.clone(),
            stop.province.clone(),
            stop.zip_code.clone(),
            stop.country.clone(),
            stop.phone.clone(),
            stop.latitude.map(|v| v.to_string()).unwrap_or_default(),
            stop.longitude.map(|v| v.to_string()).unwrap_or_default(),
        ])?;
    }

    csv_writer.flush()?;
    Ok(())
}

/// Export the route to a CSV file at `path`.
pub fn export_route_csv(stops: &[Stop], path: &Path) -> Result<(), csv::Error> {
    let file = std::fs::File::create(path)?;
    write_route_csv(stops, file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stop(order_name: &str, lat: Option<f64>, lng: Option<f64>) -> Stop {
        Stop {
            order_id: order_name.trim_start_matches('#').to_string(),
            order_name: order_name.to_string(),
            name: "Recipient".to_string(),
            address1: "1 Main St".to_string(),
            address2: String::new(),
            city: "Singapore".to_string(),
            province: String::new(),
            country: "SG".to_string(),
            zip_code: "018956".to_string(),
            phone: String::new(),
            latitude: lat,
            longitude: lng,
        }
    }

    #[test]
    fn writes_header_and_numbered_rows() {
        let stops = vec![
            stop("#1", Some(1.3), Some(103.8)),
            stop("#2", None, None),
        ];

        let mut buffer = Vec::new();
        write_route_csv(&stops, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "stop,order_name,name,address,city,province,zip,country,phone,latitude,longitude"
        );
        assert!(lines[1].starts_with("1,#1,"));
        assert!(lines[1].ends_with("1.3,103.8"));
        // Ungeocoded stops get empty coordinate cells.
        assert!(lines[2].starts_with("2,#2,"));
        assert!(lines[2].ends_with(",,"));
    }
}
