//! Spatial helpers for proximity search.
//!
//! Coordinates are WGS84 decimal degrees held in `geo` types with
//! `x = longitude` and `y = latitude`. Distances are haversine distances on
//! the mean Earth radius, which is accurate to well under a percent at the
//! radii the search accepts.

use geo::{Coord, Distance, Haversine, Point, Rect};
use std::f64::consts::{FRAC_PI_2, PI};

use crate::error::AppError;

/// Mean Earth radius in metres (IUGG), the radius `Haversine` measures on.
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// Slack added around bounding boxes, in degrees (about 1 cm).
const BBOX_PADDING_DEG: f64 = 1e-7;

/// Build a point from latitude and longitude, rejecting non-finite or
/// out-of-range values.
pub fn wgs84_point(lat: f64, lon: f64) -> Result<Point<f64>, AppError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(AppError::ValidationError(format!(
            "latitude {lat} is outside [-90, 90]"
        )));
    }
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(AppError::ValidationError(format!(
            "longitude {lon} is outside [-180, 180]"
        )));
    }
    Ok(Point::new(lon, lat))
}

/// Great-circle distance between two points in metres.
pub fn distance_m(a: Point<f64>, b: Point<f64>) -> f64 {
    Haversine.distance(a, b)
}

fn rect_from_radians(min_lat: f64, max_lat: f64, min_lon: f64, max_lon: f64) -> Rect<f64> {
    Rect::new(
        Coord {
            x: (min_lon.to_degrees() - BBOX_PADDING_DEG).max(-180.0),
            y: (min_lat.to_degrees() - BBOX_PADDING_DEG).max(-90.0),
        },
        Coord {
            x: (max_lon.to_degrees() + BBOX_PADDING_DEG).min(180.0),
            y: (max_lat.to_degrees() + BBOX_PADDING_DEG).min(90.0),
        },
    )
}

/// Rectangles that together cover every point within `radius_m` of `center`.
///
/// Returns a single box in the common case, two boxes when the circle
/// crosses the antimeridian, and a full-longitude band when it reaches a
/// pole. The boxes over-approximate the circle; callers still filter on
/// the exact distance.
pub fn bounding_boxes(center: Point<f64>, radius_m: f64) -> Vec<Rect<f64>> {
    let angular = radius_m / EARTH_RADIUS_M;
    let lat = center.y().to_radians();
    let lon = center.x().to_radians();

    let min_lat = lat - angular;
    let max_lat = lat + angular;

    if min_lat <= -FRAC_PI_2 || max_lat >= FRAC_PI_2 {
        return vec![rect_from_radians(
            min_lat.max(-FRAC_PI_2),
            max_lat.min(FRAC_PI_2),
            -PI,
            PI,
        )];
    }

    let d_lon = (angular.sin() / lat.cos()).min(1.0).asin();
    let min_lon = lon - d_lon;
    let max_lon = lon + d_lon;

    if min_lon < -PI {
        vec![
            rect_from_radians(min_lat, max_lat, min_lon + 2.0 * PI, PI),
            rect_from_radians(min_lat, max_lat, -PI, max_lon),
        ]
    } else if max_lon > PI {
        vec![
            rect_from_radians(min_lat, max_lat, min_lon, PI),
            rect_from_radians(min_lat, max_lat, -PI, max_lon - 2.0 * PI),
        ]
    } else {
        vec![rect_from_radians(min_lat, max_lat, min_lon, max_lon)]
    }
}
