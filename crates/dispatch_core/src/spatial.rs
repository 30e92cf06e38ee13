//! Planar geometry on the shifted coordinate grid of the historical dataset.
//!
//! Coordinates are grid units, not geographic degrees, so distances here are a
//! relative cost proxy rather than kilometres.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Euclidean distance in grid units.
    pub fn distance_to(&self, other: &Location) -> f64 {
        euclidean_distance(self.lat, self.lng, other.lat, other.lng)
    }

    pub fn squared_distance_to(&self, other: &Location) -> f64 {
        let dlat = self.lat - other.lat;
        let dlng = self.lng - other.lng;
        dlat * dlat + dlng * dlng
    }

    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

pub fn euclidean_distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let dlat = lat1 - lat2;
    let dlng = lng1 - lng2;
    (dlat * dlat + dlng * dlng).sqrt()
}

/// Arithmetic mean of a set of locations, `None` when empty.
pub fn centroid<'a>(points: impl IntoIterator<Item = &'a Location>) -> Option<Location> {
    let mut count = 0usize;
    let mut lat = 0.0;
    let mut lng = 0.0;
    for point in points {
        count += 1;
        lat += point.lat;
        lng += point.lng;
    }
    if count == 0 {
        return None;
    }
    Some(Location::new(lat / count as f64, lng / count as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Location::new(0.0, 0.0);
        let b = Location::new(3.0, 4.0);
        assert_eq!(a.distance_to(&b), 5.0);
        assert_eq!(b.distance_to(&a), 5.0);
        assert_eq!(a.squared_distance_to(&b), 25.0);
    }

    #[test]
    fn centroid_of_points() {
        let points = [
            Location::new(0.0, 0.0),
            Location::new(2.0, 0.0),
            Location::new(1.0, 3.0),
        ];
        assert_eq!(centroid(points.iter()), Some(Location::new(1.0, 1.0)));
        assert_eq!(centroid(std::iter::empty()), None);
    }
}
