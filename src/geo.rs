use std::fmt;

/// Mean Earth radius in kilometers (spherical model).
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// A geographic point in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    /// Latitude in degrees, -90 to 90.
    pub lat_deg: f64,
    /// Longitude in degrees, -180 to 180.
    pub lng_deg: f64,
}

impl Coordinate {
    #[inline]
    pub fn new(lat_deg: f64, lng_deg: f64) -> Self {
        Self { lat_deg, lng_deg }
    }

    /// True when both components are inside the valid degree ranges.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.lat_deg >= -90.0
            && self.lat_deg <= 90.0
            && self.lng_deg >= -180.0
            && self.lng_deg <= 180.0
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat_deg, self.lng_deg)
    }
}

/// Great-circle distance between two points in kilometers, by the haversine
/// formula. Pure and deterministic; out-of-range or NaN input propagates
/// into the result instead of being validated here.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat1 = a.lat_deg.to_radians();
    let lat2 = b.lat_deg.to_radians();
    let d_lat = (b.lat_deg - a.lat_deg).to_radians();
    let d_lng = (b.lng_deg - a.lng_deg).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().atan2((1.0 - h).sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amsterdam_to_rotterdam_is_about_57_km() {
        let amsterdam = Coordinate::new(52.3676, 4.9041);
        let rotterdam = Coordinate::new(51.9244, 4.4777);
        let d = distance_km(amsterdam, rotterdam);
        assert!((d - 57.2).abs() < 1.0, "got {d}");
    }

    #[test]
    fn distance_to_self_is_zero() {
        let utrecht = Coordinate::new(52.0907, 5.1214);
        assert_eq!(distance_km(utrecht, utrecht), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = Coordinate::new(53.2194, 6.5665);
        let b = Coordinate::new(50.8514, 5.6910);
        assert_eq!(distance_km(a, b), distance_km(b, a));
    }

    #[test]
    fn nan_input_propagates() {
        let a = Coordinate::new(f64::NAN, 4.9);
        let b = Coordinate::new(51.9, 4.5);
        assert!(distance_km(a, b).is_nan());
    }

    #[test]
    fn coordinate_validity() {
        assert!(Coordinate::new(0.0, 0.0).is_valid());
        assert!(Coordinate::new(90.0, 180.0).is_valid());
        assert!(Coordinate::new(-90.0, -180.0).is_valid());
        assert!(!Coordinate::new(90.5, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -180.5).is_valid());
        assert!(!Coordinate::new(f64::NAN, 0.0).is_valid());
    }
}
