//! Boundary export encoding.
//!
//! Pure, stateless transforms of a [`BoundingBox`] into the three export
//! artifacts: a KML document, a map-provider deep link, and a
//! human-readable coordinate block. No network, no file I/O; persisting the
//! output is the caller's concern.

use crate::geo::BoundingBox;
use std::fmt::Write as FmtWrite;

/// MIME type for exported KML documents.
pub const KML_MIME_TYPE: &str = "application/vnd.google-earth.kml+xml";

/// Zoom level used by the map deep link.
const DEEP_LINK_ZOOM: u8 = 16;

/// Encodes a chunk boundary as a KML document.
///
/// The document contains one styled Polygon placemark whose outer ring is
/// the five-point closed rectangle (SW, SE, NE, NW, SW) at zero elevation.
/// Output is deterministic for a given box.
pub fn to_kml(bounds: &BoundingBox) -> String {
    let mut coords = String::new();
    for (i, c) in bounds.closed_ring().iter().enumerate() {
        if i > 0 {
            coords.push_str("\n              ");
        }
        // Infallible: writing to a String cannot fail.
        let _ = write!(coords, "{},{},0", c.lon, c.lat);
    }

    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<kml xmlns="http://www.opengis.net/kml/2.2">
  <Document>
    <name>Chunk Scout - {min_lat:.4}, {min_lon:.4}</name>
    <description>Exported from Chunk Scout</description>
    <Style id="chunkStyle">
      <LineStyle>
        <color>ff0000ff</color>
        <width>3</width>
      </LineStyle>
      <PolyStyle>
        <color>330000ff</color>
      </PolyStyle>
    </Style>
    <Placemark>
      <name>Selected Chunk</name>
      <description>Chunk boundaries: {min_lat:.6}, {min_lon:.6} to {max_lat:.6}, {max_lon:.6}</description>
      <styleUrl>#chunkStyle</styleUrl>
      <Polygon>
        <outerBoundaryIs>
          <LinearRing>
            <coordinates>
              {coords}
            </coordinates>
          </LinearRing>
        </outerBoundaryIs>
      </Polygon>
    </Placemark>
  </Document>
</kml>"#,
        min_lat = bounds.min_lat(),
        min_lon = bounds.min_lon(),
        max_lat = bounds.max_lat(),
        max_lon = bounds.max_lon(),
        coords = coords,
    )
}

/// Suggested download filename for the KML artifact.
pub fn kml_filename(bounds: &BoundingBox) -> String {
    format!("chunk-{:.4}-{:.4}.kml", bounds.min_lat(), bounds.min_lon())
}

/// A URI opening a third-party map viewer centered on the chunk at a fixed
/// zoom level.
pub fn to_map_deep_link(bounds: &BoundingBox) -> String {
    let center = bounds.centroid();
    format!(
        "https://www.google.com/maps/@{:.6},{:.6},{}z",
        center.lat, center.lon, DEEP_LINK_ZOOM
    )
}

/// A human-readable coordinate block listing the southwest corner, the
/// northeast corner, and the centroid to 6 decimal places.
pub fn to_coordinate_text(bounds: &BoundingBox) -> String {
    let sw = bounds.southwest();
    let ne = bounds.northeast();
    let center = bounds.centroid();
    format!(
        "Chunk Coordinates:\n\
         Southwest: {:.6}, {:.6}\n\
         Northeast: {:.6}, {:.6}\n\
         Center: {:.6}, {:.6}",
        sw.lat, sw.lon, ne.lat, ne.lon, center.lat, center.lon
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::events::Event;
    use quick_xml::Reader;

    fn sample() -> BoundingBox {
        BoundingBox::new(-122.42, 37.77, -122.41, 37.78).unwrap()
    }

    #[test]
    fn kml_is_well_formed_xml() {
        let kml = to_kml(&sample());
        let mut reader = Reader::from_str(&kml);
        let mut depth = 0i32;
        loop {
            match reader.read_event().expect("well-formed XML") {
                Event::Start(_) => depth += 1,
                Event::End(_) => depth -= 1,
                Event::Eof => break,
                _ => {}
            }
        }
        assert_eq!(depth, 0);
    }

    #[test]
    fn kml_ring_has_five_closed_corner_triples() {
        let b = sample();
        let kml = to_kml(&b);
        let start = kml.find("<coordinates>").unwrap() + "<coordinates>".len();
        let end = kml.find("</coordinates>").unwrap();
        let triples: Vec<Vec<f64>> = kml[start..end]
            .split_whitespace()
            .map(|t| t.split(',').map(|v| v.parse().unwrap()).collect())
            .collect();

        assert_eq!(triples.len(), 5);
        assert_eq!(triples[0], triples[4]);
        assert_eq!(triples[0], vec![b.min_lon(), b.min_lat(), 0.0]);
        assert_eq!(triples[1], vec![b.max_lon(), b.min_lat(), 0.0]);
        assert_eq!(triples[2], vec![b.max_lon(), b.max_lat(), 0.0]);
        assert_eq!(triples[3], vec![b.min_lon(), b.max_lat(), 0.0]);
        assert!(triples.iter().all(|t| t[2] == 0.0));
    }

    #[test]
    fn kml_embeds_southwest_corner_in_name() {
        let kml = to_kml(&sample());
        assert!(kml.contains("<name>Chunk Scout - 37.7700, -122.4200</name>"));
        assert!(kml.contains("37.770000, -122.420000 to 37.780000, -122.410000"));
    }

    #[test]
    fn deep_link_uses_centroid_and_fixed_zoom() {
        assert_eq!(
            to_map_deep_link(&sample()),
            "https://www.google.com/maps/@37.775000,-122.415000,16z"
        );
    }

    #[test]
    fn coordinate_text_is_labeled_and_six_decimal() {
        let text = to_coordinate_text(&sample());
        assert_eq!(
            text,
            "Chunk Coordinates:\n\
             Southwest: 37.770000, -122.420000\n\
             Northeast: 37.780000, -122.410000\n\
             Center: 37.775000, -122.415000"
        );
    }

    #[test]
    fn kml_filename_uses_four_decimal_southwest() {
        assert_eq!(kml_filename(&sample()), "chunk-37.7700--122.4200.kml");
    }
}
