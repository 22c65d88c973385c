//! Great-circle distances and search rectangles.

use geo::{Coord, Rect};

/// Mean Earth radius used for haversine distances.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Relative slack added to the box so rounding never excludes a point that
/// [`distance_km`] places on the radius.
const BOX_MARGIN: f64 = 1.001;

/// Haversine distance in kilometres between two points given in degrees.
///
/// No validation is performed: non-finite input yields `NaN`, which callers
/// must treat as an unknown distance.
///
/// # Examples
/// ```
/// use safespot_core::distance_km;
///
/// assert_eq!(distance_km(13.05, 80.28, 13.05, 80.28), 0.0);
/// let d = distance_km(0.0, 0.0, 0.0, 1.0);
/// assert!((d - 111.19).abs() < 0.01);
/// ```
#[must_use]
pub fn distance_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_KM * c
}

/// [`distance_km`] over `geo` coordinates (`x = longitude`, `y = latitude`).
#[must_use]
pub fn distance_between(a: Coord<f64>, b: Coord<f64>) -> f64 {
    distance_km(a.y, a.x, b.y, b.x)
}

/// Round a distance to two decimals for display.
#[must_use]
pub fn round_distance(km: f64) -> f64 {
    (km * 100.0).round() / 100.0
}

/// Rectangle containing every point within `radius_km` of `center`.
///
/// The rectangle is a superset used to prefilter candidates; exact distance
/// checks still apply. The angular span comes from [`EARTH_RADIUS_KM`], so it
/// agrees with [`distance_km`]. When the circle reaches a pole or crosses the
/// antimeridian the longitude span covers the whole globe.
#[must_use]
pub fn bounding_box(center: Coord<f64>, radius_km: f64) -> Rect<f64> {
    let angle = radius_km.max(0.0) / EARTH_RADIUS_KM * BOX_MARGIN;
    let d_lat = angle.to_degrees();
    let min_lat = (center.y - d_lat).max(-90.0);
    let max_lat = (center.y + d_lat).min(90.0);
    // Widest longitude offset reached by the circle: asin(sin r / cos lat).
    let ratio = angle.sin() / center.y.to_radians().cos();
    let d_lng = if min_lat > -90.0 && max_lat < 90.0 && (0.0..1.0).contains(&ratio) {
        ratio.asin().to_degrees()
    } else {
        f64::INFINITY
    };
    let (min_lng, max_lng) = if center.x - d_lng < -180.0 || center.x + d_lng > 180.0 {
        (-180.0, 180.0)
    } else {
        (center.x - d_lng, center.x + d_lng)
    };
    Rect::new(
        Coord {
            x: min_lng,
            y: min_lat,
        },
        Coord {
            x: max_lng,
            y: max_lat,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::Intersects;
    use rstest::rstest;

    #[rstest]
    #[case(0.0, 0.0)]
    #[case(13.0827, 80.2707)]
    #[case(-89.9, 179.9)]
    fn distance_to_self_is_zero(#[case] lat: f64, #[case] lng: f64) {
        assert!(distance_km(lat, lng, lat, lng).abs() < 1e-9);
    }

    #[test]
    fn distance_is_symmetric() {
        let ab = distance_km(13.0827, 80.2707, 12.9716, 77.5946);
        let ba = distance_km(12.9716, 77.5946, 13.0827, 80.2707);
        assert!((ab - ba).abs() < 1e-9);
        // Chennai to Bengaluru
        assert!((ab - 290.0).abs() < 5.0);
    }

    #[test]
    fn nan_input_yields_nan() {
        assert!(distance_km(f64::NAN, 0.0, 0.0, 0.0).is_nan());
    }

    #[rstest]
    #[case(1.234_56, 1.23)]
    #[case(1.235_1, 1.24)]
    #[case(0.0, 0.0)]
    fn rounds_to_two_decimals(#[case] km: f64, #[case] expected: f64) {
        assert!((round_distance(km) - expected).abs() < 1e-9);
    }

    #[rstest]
    #[case::north_edge(Coord { x: 0.0, y: 0.0 }, 100.0, Coord { x: 0.0, y: 0.899 })]
    #[case::east_edge(Coord { x: 80.27, y: 13.08 }, 5.0, Coord { x: 80.3161, y: 13.08 })]
    #[case::high_latitude(Coord { x: 20.0, y: 70.0 }, 50.0, Coord { x: 21.31, y: 70.0 })]
    #[case::across_antimeridian(Coord { x: 179.99, y: 0.0 }, 50.0, Coord { x: -179.99, y: 0.0 })]
    fn bounding_box_keeps_points_just_inside_radius(
        #[case] center: Coord<f64>,
        #[case] radius_km: f64,
        #[case] point: Coord<f64>,
    ) {
        assert!(distance_between(center, point) <= radius_km);
        assert!(bounding_box(center, radius_km).intersects(&point));
    }

    #[test]
    fn bounding_box_excludes_far_points() {
        let rect = bounding_box(Coord { x: 80.27, y: 13.08 }, 5.0);
        assert!(!rect.intersects(&Coord { x: 81.0, y: 13.08 }));
        assert!(!rect.intersects(&Coord { x: 80.27, y: 13.2 }));
    }

    #[test]
    fn bounding_box_spans_all_longitudes_near_pole() {
        let rect = bounding_box(Coord { x: 10.0, y: 89.99 }, 50.0);
        assert!((rect.min().x + 180.0).abs() < f64::EPSILON);
        assert!((rect.max().x - 180.0).abs() < f64::EPSILON);
    }
}
