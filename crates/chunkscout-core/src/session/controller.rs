//! The session controller: the orchestrating state machine.
//!
//! Turns UI triggers (find chunks, roll, chunk click) into collaborator
//! calls, session-state updates, and idempotent layer commands. Every
//! asynchronous failure is caught here and converted into a status-message
//! update; no failure leaves the session in an unstable phase.

use crate::collaborators::{ChunkDiscovery, Geocoder, ObservationSource};
use crate::error::{ChunkScoutError, Result};
use crate::geo::{BoundingBox, Coordinate};
use crate::layers::{
    candidate_chunks_geometry, chunk_feature, observation_points_geometry, LayerCommand,
    LayerRegistry, LayerStyle, MapEvent, MapPort, CANDIDATE_CHUNKS_LAYER, FIT_PADDING,
    OBSERVATIONS_LAYER, SELECTED_CHUNK_LAYER,
};
use crate::selection::ChunkSelection;
use crate::session::phase::SessionPhase;
use crate::session::state::SessionState;
use crate::taxa::TaxaSelection;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace, warn};

/// Upper drive-time bound imposed by the discovery collaborator.
pub const MAX_DRIVE_TIME_MINUTES: u32 = 60;

/// Deadline for one observation fetch. Expiry is an ordinary fetch failure.
pub const OBSERVATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Zoom level used when flying to a picked address candidate.
pub const ADDRESS_ZOOM: f64 = 12.0;

/// Drives the geocode → discover → select → fetch-observations flow.
///
/// Owns the session state, the candidate selection, and the layer registry.
/// Collaborators are trait objects so tests can substitute in-memory mocks;
/// the map port is a type parameter so tests can record emitted commands.
pub struct SessionController<P: MapPort> {
    state: SessionState,
    selection: ChunkSelection,
    registry: LayerRegistry,
    geocoder: Arc<dyn Geocoder>,
    discovery: Arc<dyn ChunkDiscovery>,
    observation_source: Arc<dyn ObservationSource>,
    port: P,
}

impl<P: MapPort> SessionController<P> {
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        discovery: Arc<dyn ChunkDiscovery>,
        observation_source: Arc<dyn ObservationSource>,
        port: P,
    ) -> Self {
        Self {
            state: SessionState::new(),
            selection: ChunkSelection::new(),
            registry: LayerRegistry::new(),
            geocoder,
            discovery,
            observation_source,
            port,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn selection(&self) -> &ChunkSelection {
        &self.selection
    }

    pub fn port(&self) -> &P {
        &self.port
    }

    /// The chunk currently available for export, if any.
    pub fn selected_bounds(&self) -> Option<BoundingBox> {
        self.selection.selected_bounds()
    }

    pub fn set_origin_address(&mut self, address: impl Into<String>) {
        self.state.origin_address = address.into();
    }

    pub fn set_drive_time_minutes(&mut self, minutes: u32) {
        self.state.drive_time_minutes = minutes;
    }

    pub fn set_chunk_size_km2(&mut self, km2: f64) {
        self.state.chunk_size_km2 = km2;
    }

    /// The taxa selection is user-editable between operations; the
    /// effective filter is re-resolved at every collaborator call.
    pub fn taxa_mut(&mut self) -> &mut TaxaSelection {
        &mut self.state.taxa
    }

    pub fn taxa(&self) -> &TaxaSelection {
        &self.state.taxa
    }

    /// Flies the camera to a point (used after picking an address
    /// candidate, before any discovery runs).
    pub fn fly_to(&mut self, center: Coordinate, zoom: f64) {
        self.port.apply(LayerCommand::FlyTo { center, zoom });
    }

    /// Runs the full geocode → discover transition.
    ///
    /// Validation failures abort before any network call with the phase
    /// unchanged. Concurrent invocations while an operation is in flight
    /// are rejected as no-ops.
    pub async fn find_chunks(&mut self) {
        if self.state.is_loading {
            debug!("find_chunks ignored: an operation is already in flight");
            return;
        }
        if let Err(err) = self.validate_inputs() {
            self.state.set_status(err.to_string());
            return;
        }

        self.state.is_loading = true;
        self.state.phase = SessionPhase::Geocoding;
        self.state.set_status("Geocoding your address...");

        if let Err(err) = self.run_discovery().await {
            warn!(error = %err, "chunk discovery failed");
            self.state.phase = SessionPhase::Idle;
            if err.is_rate_limited() {
                self.state.set_status(
                    "Rate limit exceeded. Try reducing the drivetime to 20-30 minutes \
                     or wait a moment before trying again.",
                );
            } else {
                self.state.set_status(format!("Error: {err}"));
            }
        }
        self.state.is_loading = false;
    }

    /// Picks one candidate uniformly at random and fetches its
    /// observations. A no-op with a user-visible message when no discovery
    /// has produced candidates yet.
    pub async fn roll<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        if self.state.is_loading {
            debug!("roll ignored: an operation is already in flight");
            return;
        }
        if self.selection.is_empty() {
            self.state.set_status("Please find chunks first!");
            return;
        }

        self.state.is_loading = true;
        self.state.set_status("Rolling for a chunk...");
        if let Some(bounds) = self.selection.roll(rng) {
            self.fetch_selected(bounds).await;
        }
        self.state.is_loading = false;
    }

    /// Single dispatch point for events reported by the map adapter.
    pub async fn handle_event(&mut self, event: MapEvent) {
        match event {
            MapEvent::ChunkClicked(index) => {
                if self.state.is_loading {
                    debug!("chunk click ignored: an operation is already in flight");
                    return;
                }
                let Some(bounds) = self.selection.select(index) else {
                    warn!(index, "click on unknown chunk index");
                    return;
                };
                self.state.is_loading = true;
                self.fetch_selected(bounds).await;
                self.state.is_loading = false;
            }
            MapEvent::HoverEnter | MapEvent::HoverLeave => {
                // Cursor feedback is the adapter's concern.
                trace!(?event, "hover event");
            }
        }
    }

    fn validate_inputs(&self) -> Result<()> {
        if self.state.origin_address.trim().is_empty() {
            return Err(ChunkScoutError::validation("Please enter a location first."));
        }
        if self.state.drive_time_minutes == 0 {
            return Err(ChunkScoutError::validation(
                "Please enter a valid drivetime (positive number)",
            ));
        }
        if self.state.drive_time_minutes > MAX_DRIVE_TIME_MINUTES {
            return Err(ChunkScoutError::validation(
                "Drivetime cannot exceed 60 minutes due to API limitations",
            ));
        }
        if !self.state.chunk_size_km2.is_finite() || self.state.chunk_size_km2 <= 0.0 {
            return Err(ChunkScoutError::validation(
                "Please enter a valid chunk size (positive number)",
            ));
        }
        Ok(())
    }

    async fn run_discovery(&mut self) -> Result<()> {
        // A re-run invalidates the previous run's candidates, selection,
        // and layers before any collaborator call, so neither a geocode
        // miss nor a discovery failure can leave stale chunks rollable.
        self.selection.clear();
        self.state.observations.clear();
        self.registry.remove(CANDIDATE_CHUNKS_LAYER, &mut self.port);
        self.registry.remove(SELECTED_CHUNK_LAYER, &mut self.port);
        self.registry.remove(OBSERVATIONS_LAYER, &mut self.port);

        let query = self.state.origin_address.trim().to_string();
        let Some(candidate) = self.geocoder.best_match(&query).await? else {
            self.state.phase = SessionPhase::Idle;
            self.state
                .set_status("Address not found. Please try another location.");
            return Ok(());
        };
        self.state.origin = Some(candidate.center);

        self.state.phase = SessionPhase::DiscoveringChunks;
        self.state.set_status(format!(
            "Finding chunks within {} mins...",
            self.state.drive_time_minutes
        ));

        let filter = self.state.taxa.resolve();
        let chunks = self
            .discovery
            .discover(
                candidate.center,
                self.state.drive_time_minutes,
                self.state.chunk_size_km2,
                filter.as_deref(),
            )
            .await?;

        if chunks.is_empty() {
            self.state.phase = SessionPhase::Idle;
            self.state.set_status(
                "No valid chunks found. Try increasing the drivetime or changing filters.",
            );
            return Ok(());
        }

        debug!(count = chunks.len(), "discovery produced candidates");
        self.selection.replace_candidates(chunks);
        let geometry = candidate_chunks_geometry(self.selection.candidates());
        self.registry.upsert(
            CANDIDATE_CHUNKS_LAYER,
            geometry,
            LayerStyle::candidate_chunks(),
            &mut self.port,
        );
        if let Some(bounds) = self.selection.union_bounds() {
            self.port.apply(LayerCommand::FitCamera {
                bounds,
                padding: FIT_PADDING,
            });
        }

        let category_text = if self.state.taxa.categories().is_empty() {
            String::new()
        } else {
            format!(" with {} observations", self.state.taxa.category_summary())
        };
        self.state.phase = SessionPhase::ChunksReady;
        self.state.set_status(format!(
            "Found {} eligible chunks{}! Click any chunk to see observations, \
             or roll to select one randomly. [Filter: {}]",
            self.selection.len(),
            category_text,
            filter.as_deref().unwrap_or("none"),
        ));
        Ok(())
    }

    /// The shared click/roll tail: highlight the chunk, fetch its
    /// observations with a deadline, render the points.
    ///
    /// Observations are cleared on entry; a fetch failure leaves them as
    /// they were before the call and retains the selection.
    async fn fetch_selected(&mut self, bounds: BoundingBox) {
        self.state.phase = SessionPhase::FetchingObservations;
        self.state
            .set_status("Loading observations for this chunk...");
        self.state.observations.clear();

        let highlight = chunk_feature(&bounds);
        self.registry.upsert(
            SELECTED_CHUNK_LAYER,
            highlight,
            LayerStyle::selected_chunk(),
            &mut self.port,
        );
        self.port.apply(LayerCommand::FitCamera {
            bounds,
            padding: FIT_PADDING,
        });

        let filter = self.state.taxa.resolve();
        let result = match tokio::time::timeout(
            OBSERVATION_TIMEOUT,
            self.observation_source
                .observations_in(bounds, filter.as_deref()),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ChunkScoutError::Timeout {
                seconds: OBSERVATION_TIMEOUT.as_secs(),
            }),
        };

        self.registry.remove(OBSERVATIONS_LAYER, &mut self.port);
        match result {
            Ok(observations) => {
                let points = observation_points_geometry(&observations);
                let has_points = points["features"]
                    .as_array()
                    .is_some_and(|f| !f.is_empty());
                if has_points {
                    self.registry.upsert(
                        OBSERVATIONS_LAYER,
                        points,
                        LayerStyle::observation_points(),
                        &mut self.port,
                    );
                }
                let count = observations.len();
                self.state.observations = observations;
                if count == 0 {
                    self.state.set_status(
                        "No observations found in this chunk for the selected categories.",
                    );
                } else {
                    self.state
                        .set_status(format!("Found {count} observations in this chunk!"));
                }
            }
            Err(err) => {
                warn!(error = %err, "observation fetch failed");
                self.state
                    .set_status(format!("Error loading observations: {err}"));
            }
        }
        self.state.phase = SessionPhase::ChunkSelected;
    }
}
