use crate::model::Coord;

pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Great-circle distance in kilometres between two points (haversine).
///
/// Inputs must be finite; callers only pass coordinates of resolved kiosks
/// or a validated device position.
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);

    // rounding can push `a` a hair outside [0, 1] near antipodes
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

pub fn between(a: Coord, b: Coord) -> f64 {
    distance_km(a.lat, a.lon, b.lat, b.lon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_points() {
        assert_eq!(distance_km(37.497942, 127.027621, 37.497942, 127.027621), 0.0);
        assert_eq!(distance_km(0.0, 0.0, 0.0, 0.0), 0.0);
    }

    #[test]
    fn symmetric() {
        let ab = distance_km(37.497942, 127.027621, 37.513119, 127.100555);
        let ba = distance_km(37.513119, 127.100555, 37.497942, 127.027621);
        assert!((ab - ba).abs() < 1e-12);
    }

    #[test]
    fn gangnam_to_jamsil() {
        let d = distance_km(37.497942, 127.027621, 37.513119, 127.100555);
        assert!((d - 6.65).abs() < 0.05, "got {d}");
    }

    #[test]
    fn antipodes() {
        let d = distance_km(0.0, 0.0, 0.0, 180.0);
        let half = std::f64::consts::PI * EARTH_RADIUS_KM;
        assert!((d - half).abs() < 1e-6);

        let d = distance_km(90.0, 0.0, -90.0, 0.0);
        assert!((d - half).abs() < 1e-6);
    }

    #[test]
    fn never_negative() {
        let d = distance_km(37.5, 127.0, 37.5, 127.0 + 1e-12);
        assert!(d >= 0.0);
    }
}
