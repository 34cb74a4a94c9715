//! Great-circle distance between coordinates.

/// Mean Earth radius used for all distance calculations, in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two WGS84 coordinates, in kilometres.
///
/// Inputs are not validated: a NaN coordinate produces a NaN distance.
///
/// # Examples
///
/// ```
/// use transit_router::geo::distance_km;
///
/// assert_eq!(distance_km(-2.99, 104.75, -2.99, 104.75), 0.0);
///
/// // One degree of latitude is roughly 111 km.
/// let d = distance_km(0.0, 0.0, 1.0, 0.0);
/// assert!((d - 111.19).abs() < 0.01);
/// ```
pub fn distance_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();

    let a = (dlat / 2.0).sin().powi(2) + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Latitude offset (in degrees) that corresponds to `km` kilometres due north.
///
/// Handy for placing points a known distance apart.
pub fn lat_offset_deg(km: f64) -> f64 {
    (km / EARTH_RADIUS_KM).to_degrees()
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn coord() -> impl Strategy<Value = (f64, f64)> {
        (-80.0f64..80.0, -179.0f64..179.0)
    }

    proptest! {
        /// Distance is symmetric.
        #[test]
        fn symmetric((lat1, lon1) in coord(), (lat2, lon2) in coord()) {
            let ab = distance_km(lat1, lon1, lat2, lon2);
            let ba = distance_km(lat2, lon2, lat1, lon1);
            prop_assert!((ab - ba).abs() < 1e-9);
        }

        /// Distance is never negative and never exceeds half the circumference.
        #[test]
        fn bounded((lat1, lon1) in coord(), (lat2, lon2) in coord()) {
            let d = distance_km(lat1, lon1, lat2, lon2);
            prop_assert!(d >= 0.0);
            prop_assert!(d <= std::f64::consts::PI * EARTH_RADIUS_KM + 1e-6);
        }

        /// Triangle inequality holds.
        #[test]
        fn triangle((lat1, lon1) in coord(), (lat2, lon2) in coord(), (lat3, lon3) in coord()) {
            let ab = distance_km(lat1, lon1, lat2, lon2);
            let bc = distance_km(lat2, lon2, lat3, lon3);
            let ac = distance_km(lat1, lon1, lat3, lon3);
            prop_assert!(ac <= ab + bc + 1e-6);
        }
    }
}
