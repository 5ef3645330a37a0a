//! Great-circle distance and pairwise distance matrices.
//!
//! Straight-line estimates only; road networks are out of scope.

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate haversine distance between two `(lat, lng)` points in kilometers.
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Build the symmetric pairwise distance matrix for a set of locations.
///
/// Indexed by the provided location order. The upper triangle is computed
/// once and mirrored; the diagonal stays zero.
pub fn distance_matrix(locations: &[(f64, f64)]) -> Vec<Vec<f64>> {
    let n = locations.len();
    let mut matrix = vec![vec![0.0; n]; n];

    for i in 0..n {
        for j in i + 1..n {
            let km = haversine_km(locations[i], locations[j]);
            matrix[i][j] = km;
            matrix[j][i] = km;
        }
    }

    matrix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_same_point() {
        let dist = haversine_km((1.35, 103.82), (1.35, 103.82));
        assert!(dist < 0.001, "Same point should have ~0 distance");
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = (1.29, 103.85);
        let b = (3.14, 101.69);
        assert_eq!(haversine_km(a, b), haversine_km(b, a));
    }

    #[test]
    fn test_haversine_known_distance() {
        // Singapore (1.35, 103.82) to Kuala Lumpur (3.14, 101.69)
        // Actual distance ~310 km
        let dist = haversine_km((1.35, 103.82), (3.14, 101.69));
        assert!(dist > 290.0 && dist < 330.0, "SIN to KUL should be ~310km, got {}", dist);
    }

    #[test]
    fn test_one_degree_of_longitude_at_equator() {
        // One degree of arc on a 6371 km sphere is ~111.19 km.
        let dist = haversine_km((0.0, 0.0), (0.0, 1.0));
        assert!((dist - 111.19).abs() < 0.5, "got {}", dist);
    }

    #[test]
    fn test_matrix_diagonal_is_zero() {
        let locations = vec![(1.30, 103.80), (1.31, 103.81), (1.32, 103.82)];
        let matrix = distance_matrix(&locations);

        for i in 0..locations.len() {
            assert_eq!(matrix[i][i], 0.0, "Diagonal should be zero");
        }
    }

    #[test]
    fn test_matrix_symmetric() {
        let locations = vec![(1.30, 103.80), (1.35, 103.90), (1.20, 103.60)];
        let matrix = distance_matrix(&locations);

        for i in 0..locations.len() {
            for j in 0..locations.len() {
                assert_eq!(matrix[i][j], matrix[j][i], "Matrix should be symmetric");
            }
        }
    }

    #[test]
    fn test_empty_matrix() {
        assert!(distance_matrix(&[]).is_empty());
    }
}
