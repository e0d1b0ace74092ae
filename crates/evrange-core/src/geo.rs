//! Spherical-earth geodesy: destination points, great-circle distances, bearings.
//!
//! All functions use a mean earth radius of 6371 km. Accuracy is well within
//! what a road-network oracle can resolve, which is all the search needs.

use crate::error::CoreError;
use crate::types::Coordinate;

/// Mean earth radius in kilometres.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Point reached by travelling `distance_km` along the great circle leaving
/// `origin` at `bearing_deg` (clockwise from north).
///
/// Longitude of the result is wrapped into `[-180, 180]`.
///
/// # Errors
///
/// Returns [`CoreError::InvalidArgument`] if the origin is invalid, the bearing
/// or distance is not finite, or the distance is negative.
pub fn destination_point(
    origin: Coordinate,
    bearing_deg: f64,
    distance_km: f64,
) -> Result<Coordinate, CoreError> {
    origin.validate()?;
    if !bearing_deg.is_finite() {
        return Err(CoreError::InvalidArgument(format!(
            "bearing {bearing_deg} is not finite"
        )));
    }
    if !distance_km.is_finite() || distance_km < 0.0 {
        return Err(CoreError::InvalidArgument(format!(
            "distance must be a non-negative finite number of km, got {distance_km}"
        )));
    }

    let delta = distance_km / EARTH_RADIUS_KM;
    let theta = bearing_deg.to_radians();
    let phi1 = origin.lat.to_radians();
    let lambda1 = origin.lon.to_radians();

    let sin_phi2 = phi1.sin() * delta.cos() + phi1.cos() * delta.sin() * theta.cos();
    let phi2 = sin_phi2.clamp(-1.0, 1.0).asin();
    let y = theta.sin() * delta.sin() * phi1.cos();
    let x = delta.cos() - phi1.sin() * phi2.sin();
    let lambda2 = lambda1 + y.atan2(x);

    Ok(Coordinate {
        lat: phi2.to_degrees().clamp(-90.0, 90.0),
        lon: wrap_longitude(lambda2.to_degrees()),
    })
}

/// Great-circle distance between `a` and `b` in kilometres (haversine).
#[must_use]
pub fn haversine_km(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_phi = (b.lat - a.lat).to_radians();
    let d_lambda = (b.lon - a.lon).to_radians();

    let h = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Initial great-circle bearing from `a` towards `b`, in `[0, 360)`.
#[must_use]
pub fn initial_bearing(a: Coordinate, b: Coordinate) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let d_lambda = (b.lon - a.lon).to_radians();

    let y = d_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * d_lambda.cos();
    let deg = y.atan2(x).to_degrees().rem_euclid(360.0);
    if deg >= 360.0 {
        0.0
    } else {
        deg
    }
}

fn wrap_longitude(lon: f64) -> f64 {
    let wrapped = (lon + 540.0).rem_euclid(360.0) - 180.0;
    // Preserve +180 rather than folding it onto -180.
    if wrapped == -180.0 && lon > 0.0 {
        180.0
    } else {
        wrapped
    }
}
