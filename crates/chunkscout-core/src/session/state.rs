//! The single mutable session aggregate.

use crate::geo::{Coordinate, Observation};
use crate::session::phase::SessionPhase;
use crate::taxa::TaxaSelection;

/// Everything one session owns.
///
/// Single-writer discipline: only the [`SessionController`](crate::session::SessionController)
/// mutates this, always in response to one trigger; the export encoder and
/// the map adapter are pure readers.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub phase: SessionPhase,
    /// Raw address text as the user typed (or picked) it.
    pub origin_address: String,
    /// Geocoded origin; `None` until the first successful geocode.
    pub origin: Option<Coordinate>,
    /// Drive-time budget in minutes. Validated to [1, 60] before any
    /// collaborator call.
    pub drive_time_minutes: u32,
    /// Chunk footprint in square kilometres. Validated to be positive.
    pub chunk_size_km2: f64,
    pub taxa: TaxaSelection,
    /// Observations for the selected chunk; empty until fetched.
    pub observations: Vec<Observation>,
    /// User-facing status line. Last write wins.
    pub status_message: String,
    /// True while a discovery or observation fetch is in flight. Concurrent
    /// triggers are rejected as no-ops while set.
    pub is_loading: bool,
}

impl SessionState {
    /// A fresh idle session with the original client's defaults
    /// (30 minutes, 1 km² chunks).
    pub fn new() -> Self {
        Self {
            drive_time_minutes: 30,
            chunk_size_km2: 1.0,
            ..Self::default()
        }
    }

    pub(crate) fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = message.into();
    }
}
