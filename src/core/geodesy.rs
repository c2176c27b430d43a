/// Mean Earth radius used for epicentral distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Conversion used when handing distances to the travel-time model.
pub const KM_PER_DEGREE: f64 = 111.0;

/// Great-circle distance between two points given in degrees.
pub fn epicentral_distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();
    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().min(1.0).asin();
    EARTH_RADIUS_KM * c
}

pub fn km_to_degrees(km: f64) -> f64 {
    km / KM_PER_DEGREE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_distance() {
        assert_eq!(epicentral_distance_km(46.5, 8.5, 46.5, 8.5), 0.0);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = epicentral_distance_km(46.0, 8.0, 47.0, 8.0);
        assert!((d - 111.19).abs() < 0.1, "got {d}");
    }

    #[test]
    fn test_zurich_to_geneva() {
        // roughly 224 km as the crow flies
        let d = epicentral_distance_km(47.3769, 8.5417, 46.2044, 6.1432);
        assert!((d - 224.0).abs() < 3.0, "got {d}");
    }

    #[test]
    fn test_antipodes_do_not_overflow() {
        let d = epicentral_distance_km(0.0, 0.0, 0.0, 180.0);
        assert!((d - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_km_to_degrees() {
        assert_eq!(km_to_degrees(222.0), 2.0);
    }
}
