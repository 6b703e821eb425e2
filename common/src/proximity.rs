use crate::Coordinate;

/// Whether `target` lies inside a box of `threshold` degrees around `observer`.
///
/// Latitude and longitude are compared independently. Longitude degrees are
/// not scaled by latitude, so the ground size of the box shrinks towards the
/// poles.
pub fn is_near(observer: &Coordinate, target: &Coordinate, threshold: f64) -> bool {
    (target.latitude - observer.latitude).abs() <= threshold
        && (target.longitude - observer.longitude).abs() <= threshold
}
