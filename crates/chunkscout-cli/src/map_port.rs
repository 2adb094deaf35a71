//! A map port that logs layer commands instead of rendering them.
//!
//! The CLI has no map surface; layer commands are still emitted by the
//! controller under the same idempotency contract, so logging them keeps
//! the command stream observable (RUST_LOG=debug).

use chunkscout_core::layers::{LayerCommand, MapPort};
use tracing::debug;

pub struct TracingMapPort;

impl MapPort for TracingMapPort {
    fn apply(&mut self, command: LayerCommand) {
        match &command {
            LayerCommand::Upsert { id, .. } => debug!(layer = %id, "upsert layer"),
            LayerCommand::Remove { id } => debug!(layer = %id, "remove layer"),
            LayerCommand::FitCamera { bounds, padding } => {
                debug!(?bounds, padding, "fit camera")
            }
            LayerCommand::FlyTo { center, zoom } => {
                debug!(lon = center.lon, lat = center.lat, zoom, "fly to")
            }
        }
    }
}
