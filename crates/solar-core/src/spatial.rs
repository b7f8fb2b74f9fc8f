//! Geometry primitives over small latitude/longitude deltas.
//!
//! Roof segments span a few tens of meters, so everything here works on a
//! local planar approximation scaled by the WGS84 meters-per-degree at the
//! latitude of interest. Nothing in this module is geodesic-exact.

use crate::error::{Result, SolarError};
use crate::models::{Bounds, Coordinate};

/// Smallest half-span (degrees) a rectangle may have, about 1 cm on the ground.
pub const MIN_HALF_SPAN_DEG: f64 = 1e-7;

pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Build a rectangle centered on a point.
///
/// `half_width_deg` is the east-west half-span (longitude), `half_height_deg`
/// the north-south half-span (latitude). Zero or negative half-spans are
/// widened to [`MIN_HALF_SPAN_DEG`] so `ne` is always strictly greater than `sw`.
pub fn bounds_of(
    center_lat: f64,
    center_lng: f64,
    half_width_deg: f64,
    half_height_deg: f64,
) -> Result<Bounds> {
    if !(center_lat.is_finite()
        && center_lng.is_finite()
        && half_width_deg.is_finite()
        && half_height_deg.is_finite())
    {
        return Err(SolarError::invalid_geometry(format!(
            "non-finite bounds input ({center_lat}, {center_lng}, {half_width_deg}, {half_height_deg})"
        )));
    }
    let half_w = half_width_deg.abs().max(MIN_HALF_SPAN_DEG);
    let half_h = half_height_deg.abs().max(MIN_HALF_SPAN_DEG);
    Ok(Bounds {
        ne: Coordinate::new(center_lat + half_h, center_lng + half_w),
        sw: Coordinate::new(center_lat - half_h, center_lng - half_w),
    })
}

/// Rectangle centered on `center` with half-spans given in meters.
pub fn bounds_from_meters(center: Coordinate, half_ns_m: f64, half_ew_m: f64) -> Result<Bounds> {
    bounds_of(
        center.latitude,
        center.longitude,
        meters_to_lon(half_ew_m, center.latitude),
        meters_to_lat(half_ns_m, center.latitude),
    )
}

/// Spacing between `cell_count` evenly spread cells over `range_deg`.
///
/// Dividing by `cell_count + 1` leaves one spacing of margin before the first
/// cell and after the last, so no cell sits on the range edge.
pub fn grid_spacing(range_deg: f64, cell_count: usize) -> Result<f64> {
    if cell_count == 0 {
        return Err(SolarError::invalid_geometry(
            "grid cell count must be positive",
        ));
    }
    if !range_deg.is_finite() || range_deg <= 0.0 {
        return Err(SolarError::invalid_geometry(format!(
            "grid range must be positive, got {range_deg}"
        )));
    }
    Ok(range_deg / (cell_count as f64 + 1.0))
}

/// Approximate planar area of a lat/lng rectangle in square meters.
pub fn area_m2(bounds: &Bounds) -> f64 {
    let ref_lat = bounds.center().latitude;
    let height_m = lat_to_meters(bounds.lat_span(), ref_lat).abs();
    let width_m = lon_to_meters(bounds.lng_span(), ref_lat).abs();
    height_m * width_m
}

/// Great-circle distance between two points in meters.
pub fn haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();
    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Meters per degree of latitude at a given latitude (WGS84 approximation).
pub fn meters_per_deg_lat(lat_deg: f64) -> f64 {
    let lat_rad = lat_deg.to_radians();
    111_132.954 - 559.822 * (2.0 * lat_rad).cos() + 1.175 * (4.0 * lat_rad).cos()
        - 0.0023 * (6.0 * lat_rad).cos()
}

/// Meters per degree of longitude at a given latitude (WGS84 approximation).
pub fn meters_per_deg_lon(lat_deg: f64) -> f64 {
    let lat_rad = lat_deg.to_radians();
    111_412.84 * lat_rad.cos() - 93.5 * (3.0 * lat_rad).cos() + 0.118 * (5.0 * lat_rad).cos()
}

/// Convert a north/south offset in meters to degrees latitude.
pub fn meters_to_lat(meters: f64, ref_lat_deg: f64) -> f64 {
    let meters_per_deg = meters_per_deg_lat(ref_lat_deg).max(1e-9);
    meters / meters_per_deg
}

/// Convert an east/west offset in meters to degrees longitude.
/// Requires the reference latitude for proper scaling.
pub fn meters_to_lon(meters: f64, ref_lat_deg: f64) -> f64 {
    let meters_per_deg = meters_per_deg_lon(ref_lat_deg).max(1e-9);
    meters / meters_per_deg
}

pub fn lat_to_meters(deg: f64, ref_lat_deg: f64) -> f64 {
    deg * meters_per_deg_lat(ref_lat_deg)
}

pub fn lon_to_meters(deg: f64, ref_lat_deg: f64) -> f64 {
    deg * meters_per_deg_lon(ref_lat_deg)
}

/// Offset a position by meters in the north and east directions.
///
/// Uses the local meters-per-degree scaling, which is accurate to well under
/// a centimeter over roof-sized offsets.
pub fn offset_position(origin: Coordinate, north_m: f64, east_m: f64) -> Coordinate {
    Coordinate {
        latitude: origin.latitude + meters_to_lat(north_m, origin.latitude),
        longitude: origin.longitude + meters_to_lon(east_m, origin.latitude),
    }
}
