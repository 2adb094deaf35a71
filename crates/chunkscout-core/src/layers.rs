//! Map layer command model.
//!
//! The session controller issues layer commands; it never touches the
//! rendering surface directly. A [`LayerRegistry`] tracks which layer
//! identifiers are live so removal-before-add is a checked precondition
//! rather than a runtime probe of the map engine.

use crate::geo::{BoundingBox, Coordinate, Observation};
use serde::Serialize;
use serde_json::{json, Value as JsonValue};

/// Identifier of the candidate-chunks layer (fill + outline + glow).
pub const CANDIDATE_CHUNKS_LAYER: &str = "candidate-chunks";
/// Identifier of the selected-chunk highlight layer (fill + outline).
pub const SELECTED_CHUNK_LAYER: &str = "selected-chunk";
/// Identifier of the observation-points layer.
pub const OBSERVATIONS_LAYER: &str = "observations";

/// Camera padding used when fitting to chunk bounds, in pixels.
pub const FIT_PADDING: u32 = 40;

/// Styling for one layer family. Sub-layers (fill/outline/glow) are the
/// adapter's concern; they live and die with their parent identifier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerStyle {
    pub fill_color: Option<&'static str>,
    pub fill_opacity: Option<f64>,
    pub line_color: Option<&'static str>,
    pub line_width: Option<f64>,
    pub line_opacity: Option<f64>,
    pub glow_color: Option<&'static str>,
    pub circle_color: Option<&'static str>,
    pub circle_radius: Option<f64>,
}

impl LayerStyle {
    /// Green fill with white outline and a subtle glow, for candidates.
    pub fn candidate_chunks() -> Self {
        Self {
            fill_color: Some("#00ff88"),
            fill_opacity: Some(0.4),
            line_color: Some("#fff"),
            line_width: Some(2.0),
            line_opacity: None,
            glow_color: Some("#00ff88"),
            circle_color: None,
            circle_radius: None,
        }
    }

    /// Bright yellow highlight for the selected chunk.
    pub fn selected_chunk() -> Self {
        Self {
            fill_color: Some("#ffff00"),
            fill_opacity: Some(0.3),
            line_color: Some("#ffff00"),
            line_width: Some(3.0),
            line_opacity: Some(0.8),
            glow_color: None,
            circle_color: None,
            circle_radius: None,
        }
    }

    /// Orange circles for observation points.
    pub fn observation_points() -> Self {
        Self {
            fill_color: None,
            fill_opacity: Some(0.8),
            line_color: Some("#ffffff"),
            line_width: Some(2.0),
            line_opacity: None,
            glow_color: None,
            circle_color: Some("#ff6b35"),
            circle_radius: Some(6.0),
        }
    }
}

/// One command issued against the rendering surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LayerCommand {
    /// Adds a layer. The registry guarantees the id is not already live.
    Upsert {
        id: String,
        geometry: JsonValue,
        style: LayerStyle,
    },
    /// Removes a layer and its dependent sub-layers.
    Remove { id: String },
    /// Fits the camera to bounds with padding.
    FitCamera { bounds: BoundingBox, padding: u32 },
    /// Flies the camera to a point at a zoom level.
    FlyTo { center: Coordinate, zoom: f64 },
}

/// Events reported back from the rendering surface.
///
/// The adapter re-registers its handlers attach-once per layer lifetime and
/// funnels everything through a single dispatch call on the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapEvent {
    /// A candidate chunk was clicked, identified by its index in the
    /// current candidate list.
    ChunkClicked(usize),
    /// Pointer entered an interactive layer (cursor feedback only).
    HoverEnter,
    /// Pointer left an interactive layer.
    HoverLeave,
}

/// The surface the controller drives. Implemented by the real map adapter
/// and by recording fakes in tests.
pub trait MapPort: Send {
    fn apply(&mut self, command: LayerCommand);
}

/// Registry of live layer identifiers.
///
/// Owned by the controller so "remove before re-add" is provable from
/// session state instead of relying on the map engine's bookkeeping.
#[derive(Debug, Default)]
pub struct LayerRegistry {
    active: Vec<String>,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.iter().any(|a| a == id)
    }

    /// Emits a `Remove` for `id` if it is live, and forgets it.
    pub fn remove(&mut self, id: &str, port: &mut dyn MapPort) {
        if let Some(pos) = self.active.iter().position(|a| a == id) {
            self.active.remove(pos);
            port.apply(LayerCommand::Remove { id: id.to_string() });
        }
    }

    /// Replaces the layer under `id`: removes any live instance first,
    /// then upserts. Layer identifiers are never left dangling.
    pub fn upsert(
        &mut self,
        id: &str,
        geometry: JsonValue,
        style: LayerStyle,
        port: &mut dyn MapPort,
    ) {
        self.remove(id, port);
        self.active.push(id.to_string());
        port.apply(LayerCommand::Upsert {
            id: id.to_string(),
            geometry,
            style,
        });
    }

    pub fn active_ids(&self) -> &[String] {
        &self.active
    }
}

/// GeoJSON FeatureCollection of candidate chunk polygons.
///
/// Each feature carries its candidate index and corner coordinates as
/// properties so click events can be mapped back to a candidate.
pub fn candidate_chunks_geometry(chunks: &[BoundingBox]) -> JsonValue {
    let features: Vec<JsonValue> = chunks
        .iter()
        .enumerate()
        .map(|(index, chunk)| {
            json!({
                "type": "Feature",
                "properties": {
                    "id": index,
                    "min_lon": chunk.min_lon(),
                    "min_lat": chunk.min_lat(),
                    "max_lon": chunk.max_lon(),
                    "max_lat": chunk.max_lat(),
                },
                "geometry": polygon_geometry(chunk),
            })
        })
        .collect();
    json!({ "type": "FeatureCollection", "features": features })
}

/// GeoJSON Feature for a single chunk polygon.
pub fn chunk_feature(chunk: &BoundingBox) -> JsonValue {
    json!({
        "type": "Feature",
        "geometry": polygon_geometry(chunk),
    })
}

fn polygon_geometry(chunk: &BoundingBox) -> JsonValue {
    let ring: Vec<[f64; 2]> = chunk.closed_ring().iter().map(|c| [c.lon, c.lat]).collect();
    json!({ "type": "Polygon", "coordinates": [ring] })
}

/// GeoJSON FeatureCollection of observation points.
///
/// Records without a coordinate are skipped; they are listed in the results
/// panel but never rendered.
pub fn observation_points_geometry(observations: &[Observation]) -> JsonValue {
    let features: Vec<JsonValue> = observations
        .iter()
        .filter_map(|obs| {
            let coordinate = obs.coordinate?;
            Some(json!({
                "type": "Feature",
                "properties": {
                    "id": obs.id,
                    "species_guess": obs.species_guess,
                    "iconic_taxon_name": obs.iconic_taxon_name,
                    "photo_url": obs.photo_url,
                    "observation_url": obs.observation_url,
                },
                "geometry": {
                    "type": "Point",
                    "coordinates": [coordinate.lon, coordinate.lat],
                },
            }))
        })
        .collect();
    json!({ "type": "FeatureCollection", "features": features })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingPort(Vec<LayerCommand>);

    impl MapPort for RecordingPort {
        fn apply(&mut self, command: LayerCommand) {
            self.0.push(command);
        }
    }

    fn chunk() -> BoundingBox {
        BoundingBox::new(0.0, 0.0, 1.0, 1.0).unwrap()
    }

    #[test]
    fn upsert_removes_live_layer_first() {
        let mut registry = LayerRegistry::new();
        let mut port = RecordingPort(Vec::new());

        registry.upsert(
            CANDIDATE_CHUNKS_LAYER,
            candidate_chunks_geometry(&[chunk()]),
            LayerStyle::candidate_chunks(),
            &mut port,
        );
        registry.upsert(
            CANDIDATE_CHUNKS_LAYER,
            candidate_chunks_geometry(&[chunk()]),
            LayerStyle::candidate_chunks(),
            &mut port,
        );

        let kinds: Vec<&str> = port
            .0
            .iter()
            .map(|c| match c {
                LayerCommand::Upsert { .. } => "upsert",
                LayerCommand::Remove { .. } => "remove",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, ["upsert", "remove", "upsert"]);
        assert_eq!(registry.active_ids(), [CANDIDATE_CHUNKS_LAYER]);
        assert!(registry.is_active(CANDIDATE_CHUNKS_LAYER));
    }

    #[test]
    fn removing_an_inactive_layer_is_a_no_op() {
        let mut registry = LayerRegistry::new();
        let mut port = RecordingPort(Vec::new());
        assert!(!registry.is_active(OBSERVATIONS_LAYER));
        registry.remove(OBSERVATIONS_LAYER, &mut port);
        assert!(port.0.is_empty());
    }

    #[test]
    fn candidate_geometry_carries_index_and_corners() {
        let geometry = candidate_chunks_geometry(&[chunk(), chunk()]);
        let features = geometry["features"].as_array().unwrap();
        assert_eq!(features.len(), 2);
        assert_eq!(features[1]["properties"]["id"], 1);
        assert_eq!(features[0]["properties"]["max_lon"], 1.0);
        let ring = features[0]["geometry"]["coordinates"][0].as_array().unwrap();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring[0], ring[4]);
    }

    #[test]
    fn observation_geometry_skips_records_without_coordinates() {
        let with = Observation {
            id: 1,
            species_guess: "Corvus corax".to_string(),
            iconic_taxon_name: "Aves".to_string(),
            photo_url: None,
            observation_url: "https://example.org/1".to_string(),
            coordinate: Some(crate::geo::Coordinate { lon: 0.5, lat: 0.5 }),
        };
        let without = Observation {
            id: 2,
            coordinate: None,
            ..with.clone()
        };
        let geometry = observation_points_geometry(&[with, without]);
        assert_eq!(geometry["features"].as_array().unwrap().len(), 1);
    }
}
