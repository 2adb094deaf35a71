//! Shared geographic data shapes.
//!
//! These are the types exchanged with every collaborator: coordinates,
//! chunk bounding boxes, geocoder candidates, and wildlife observations.

use crate::error::{ChunkScoutError, Result};
use serde::{Deserialize, Serialize};

/// A (longitude, latitude) pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lon: f64,
    pub lat: f64,
}

impl Coordinate {
    /// Creates a coordinate, validating the degree ranges.
    ///
    /// # Errors
    ///
    /// Returns a validation error when longitude is outside [-180, 180] or
    /// latitude is outside [-90, 90].
    pub fn new(lon: f64, lat: f64) -> Result<Self> {
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(ChunkScoutError::validation(format!(
                "Longitude {lon} is outside [-180, 180]"
            )));
        }
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(ChunkScoutError::validation(format!(
                "Latitude {lat} is outside [-90, 90]"
            )));
        }
        Ok(Self { lon, lat })
    }
}

/// One chunk's footprint: an axis-aligned box in degrees.
///
/// Immutable once produced by the discovery collaborator; the field order
/// matches the wire format `[min_lon, min_lat, max_lon, max_lat]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "[f64; 4]", into = "[f64; 4]")]
pub struct BoundingBox {
    min_lon: f64,
    min_lat: f64,
    max_lon: f64,
    max_lat: f64,
}

impl BoundingBox {
    /// Creates a bounding box, enforcing `min <= max` on both axes.
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Result<Self> {
        let sw = Coordinate::new(min_lon, min_lat)?;
        let ne = Coordinate::new(max_lon, max_lat)?;
        if sw.lon > ne.lon || sw.lat > ne.lat {
            return Err(ChunkScoutError::validation(format!(
                "Invalid bounding box: ({min_lon}, {min_lat}) to ({max_lon}, {max_lat})"
            )));
        }
        Ok(Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        })
    }

    pub fn min_lon(&self) -> f64 {
        self.min_lon
    }

    pub fn min_lat(&self) -> f64 {
        self.min_lat
    }

    pub fn max_lon(&self) -> f64 {
        self.max_lon
    }

    pub fn max_lat(&self) -> f64 {
        self.max_lat
    }

    /// Southwest corner.
    pub fn southwest(&self) -> Coordinate {
        Coordinate {
            lon: self.min_lon,
            lat: self.min_lat,
        }
    }

    /// Northeast corner.
    pub fn northeast(&self) -> Coordinate {
        Coordinate {
            lon: self.max_lon,
            lat: self.max_lat,
        }
    }

    /// Arithmetic mean of min/max per axis.
    pub fn centroid(&self) -> Coordinate {
        Coordinate {
            lon: (self.min_lon + self.max_lon) / 2.0,
            lat: (self.min_lat + self.max_lat) / 2.0,
        }
    }

    /// The five-point closed rectangle SW, SE, NE, NW, SW.
    pub fn closed_ring(&self) -> [Coordinate; 5] {
        let sw = Coordinate {
            lon: self.min_lon,
            lat: self.min_lat,
        };
        let se = Coordinate {
            lon: self.max_lon,
            lat: self.min_lat,
        };
        let ne = Coordinate {
            lon: self.max_lon,
            lat: self.max_lat,
        };
        let nw = Coordinate {
            lon: self.min_lon,
            lat: self.max_lat,
        };
        [sw, se, ne, nw, sw]
    }

    /// The smallest box covering every box in `boxes`.
    ///
    /// Returns `None` for an empty slice. Used to fit the camera after a
    /// successful discovery.
    pub fn union(boxes: &[BoundingBox]) -> Option<BoundingBox> {
        let first = boxes.first()?;
        let mut acc = *first;
        for b in &boxes[1..] {
            acc.min_lon = acc.min_lon.min(b.min_lon);
            acc.min_lat = acc.min_lat.min(b.min_lat);
            acc.max_lon = acc.max_lon.max(b.max_lon);
            acc.max_lat = acc.max_lat.max(b.max_lat);
        }
        Some(acc)
    }
}

impl TryFrom<[f64; 4]> for BoundingBox {
    type Error = ChunkScoutError;

    fn try_from(raw: [f64; 4]) -> Result<Self> {
        Self::new(raw[0], raw[1], raw[2], raw[3])
    }
}

impl From<BoundingBox> for [f64; 4] {
    fn from(b: BoundingBox) -> Self {
        [b.min_lon, b.min_lat, b.max_lon, b.max_lat]
    }
}

/// One ranked geocoder result. Produced transiently; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AddressCandidate {
    pub id: String,
    pub display_name: String,
    pub center: Coordinate,
}

/// One wildlife observation record.
///
/// `coordinate` may be absent; such records are listed in results but never
/// rendered as map points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub id: u64,
    pub species_guess: String,
    pub iconic_taxon_name: String,
    pub photo_url: Option<String>,
    pub observation_url: String,
    pub coordinate: Option<Coordinate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_rejects_out_of_range() {
        assert!(Coordinate::new(-181.0, 0.0).is_err());
        assert!(Coordinate::new(0.0, 90.5).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(-122.42, 37.77).is_ok());
    }

    #[test]
    fn bounding_box_requires_min_le_max() {
        assert!(BoundingBox::new(1.0, 1.0, 0.0, 2.0).is_err());
        assert!(BoundingBox::new(1.0, 2.0, 2.0, 1.0).is_err());
        // Degenerate (zero-area) boxes are structurally valid.
        assert!(BoundingBox::new(1.0, 1.0, 1.0, 1.0).is_ok());
    }

    #[test]
    fn centroid_is_arithmetic_mean() {
        let b = BoundingBox::new(-122.5, 37.7, -122.4, 37.8).unwrap();
        let c = b.centroid();
        assert!((c.lon - -122.45).abs() < 1e-12);
        assert!((c.lat - 37.75).abs() < 1e-12);
    }

    #[test]
    fn closed_ring_starts_and_ends_at_southwest() {
        let b = BoundingBox::new(0.0, 0.0, 1.0, 2.0).unwrap();
        let ring = b.closed_ring();
        assert_eq!(ring[0], ring[4]);
        assert_eq!(ring[0], b.southwest());
        assert_eq!(ring[2], b.northeast());
    }

    #[test]
    fn union_covers_all_boxes() {
        let a = BoundingBox::new(0.0, 0.0, 1.0, 1.0).unwrap();
        let b = BoundingBox::new(2.0, -1.0, 3.0, 0.5).unwrap();
        let u = BoundingBox::union(&[a, b]).unwrap();
        assert_eq!(<[f64; 4]>::from(u), [0.0, -1.0, 3.0, 1.0]);
        assert!(BoundingBox::union(&[]).is_none());
    }

    #[test]
    fn bounding_box_wire_format_is_a_flat_array() {
        let b: BoundingBox = serde_json::from_str("[-122.5, 37.7, -122.4, 37.8]").unwrap();
        assert_eq!(b.min_lon(), -122.5);
        assert_eq!(serde_json::to_string(&b).unwrap(), "[-122.5,37.7,-122.4,37.8]");
        // Inverted axes are rejected at deserialization time.
        assert!(serde_json::from_str::<BoundingBox>("[1.0, 1.0, 0.0, 2.0]").is_err());
    }
}
