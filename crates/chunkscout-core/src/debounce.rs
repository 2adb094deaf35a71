//! Debounced address lookup.
//!
//! Owns the two one-shot timers of the address-input stream: the
//! suggestion debounce and the post-selection auto-discovery delay. Each
//! new keystroke aborts the previously scheduled (not-yet-fired) query, so
//! only the query for the most recent burst, after the quiescence delay,
//! ever dispatches. Events arrive on an unbounded channel.

use crate::collaborators::Geocoder;
use crate::geo::{AddressCandidate, Coordinate};
use crate::session::controller::ADDRESS_ZOOM;
use crate::taxa::TaxaSelection;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

/// Quiescence window before a suggestion query dispatches.
pub const SUGGESTION_DEBOUNCE: Duration = Duration::from_millis(300);

/// Maximum number of candidates requested per query.
pub const SUGGESTION_LIMIT: usize = 5;

/// Delay between picking a candidate and the best-effort auto-discovery,
/// leaving room for the camera animation to settle.
pub const AUTO_DISCOVER_DELAY: Duration = Duration::from_millis(1200);

/// Inputs shorter than this clear suggestions without a query.
const MIN_QUERY_CHARS: usize = 3;

/// One replacement of the suggestion list.
///
/// `visible` is false exactly when the list must be hidden (short input,
/// lookup failure, or a candidate was just picked); stale suggestions are
/// never left visible after an error.
#[derive(Debug, Clone, PartialEq)]
pub struct SuggestionUpdate {
    pub suggestions: Vec<AddressCandidate>,
    pub visible: bool,
}

impl SuggestionUpdate {
    fn cleared() -> Self {
        Self {
            suggestions: Vec::new(),
            visible: false,
        }
    }
}

/// What the lookup reports back to its owner.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupEvent {
    /// Replace the suggestion list.
    Suggestions(SuggestionUpdate),
    /// The post-selection delay elapsed; the owner should invoke
    /// discovery. Best-effort: the controller's loading gate turns this
    /// into a no-op when an operation is already in flight.
    AutoDiscover,
}

/// What the caller should do immediately after a candidate is picked.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionOutcome {
    /// Text to place in the origin-address field.
    pub address: String,
    /// Camera move to the candidate.
    pub fly_to: (Coordinate, f64),
}

/// Manages the single in-flight, cancelable suggestion query per keystroke
/// burst, plus the one-shot auto-discovery timer after a pick.
pub struct AddressLookup {
    geocoder: Arc<dyn Geocoder>,
    debounce: Duration,
    auto_discover_delay: Duration,
    pending: Option<JoinHandle<()>>,
    pending_auto: Option<JoinHandle<()>>,
    tx: mpsc::UnboundedSender<LookupEvent>,
}

impl AddressLookup {
    /// Creates a lookup with the default delays, returning the receiving
    /// end of the event stream.
    pub fn new(geocoder: Arc<dyn Geocoder>) -> (Self, mpsc::UnboundedReceiver<LookupEvent>) {
        Self::with_delays(geocoder, SUGGESTION_DEBOUNCE, AUTO_DISCOVER_DELAY)
    }

    pub fn with_delays(
        geocoder: Arc<dyn Geocoder>,
        debounce: Duration,
        auto_discover_delay: Duration,
    ) -> (Self, mpsc::UnboundedReceiver<LookupEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                geocoder,
                debounce,
                auto_discover_delay,
                pending: None,
                pending_auto: None,
                tx,
            },
            rx,
        )
    }

    /// Reacts to one keystroke's worth of input.
    ///
    /// Cancels any previously scheduled query and any scheduled
    /// auto-discovery. Trimmed input shorter than three characters clears
    /// suggestions immediately with no network call; otherwise a query is
    /// scheduled to fire after the debounce delay.
    pub fn on_input(&mut self, text: &str) {
        self.cancel_pending();
        self.cancel_auto_discover();

        if text.trim().chars().count() < MIN_QUERY_CHARS {
            let _ = self
                .tx
                .send(LookupEvent::Suggestions(SuggestionUpdate::cleared()));
            return;
        }

        let geocoder = self.geocoder.clone();
        let tx = self.tx.clone();
        let query = text.to_string();
        let delay = self.debounce;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let update = match geocoder.suggest(&query, SUGGESTION_LIMIT).await {
                Ok(suggestions) => SuggestionUpdate {
                    suggestions,
                    visible: true,
                },
                Err(err) => {
                    warn!(error = %err, "suggestion lookup failed");
                    SuggestionUpdate::cleared()
                }
            };
            let _ = tx.send(LookupEvent::Suggestions(update));
        }));
    }

    /// Aborts the pending not-yet-fired query, if any.
    pub fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Aborts a scheduled auto-discovery, if any.
    pub fn cancel_auto_discover(&mut self) {
        if let Some(handle) = self.pending_auto.take() {
            handle.abort();
        }
    }

    /// Commits a picked candidate: clears and hides suggestions, and, when
    /// a taxa filter is active, schedules [`LookupEvent::AutoDiscover`]
    /// after the auto-discovery delay.
    pub fn select(
        &mut self,
        candidate: &AddressCandidate,
        taxa: &TaxaSelection,
    ) -> SelectionOutcome {
        self.cancel_pending();
        self.cancel_auto_discover();
        let _ = self
            .tx
            .send(LookupEvent::Suggestions(SuggestionUpdate::cleared()));

        if taxa.resolve().is_some() {
            let tx = self.tx.clone();
            let delay = self.auto_discover_delay;
            self.pending_auto = Some(tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                let _ = tx.send(LookupEvent::AutoDiscover);
            }));
        }

        SelectionOutcome {
            address: candidate.display_name.clone(),
            fly_to: (candidate.center, ADDRESS_ZOOM),
        }
    }
}

impl Drop for AddressLookup {
    fn drop(&mut self) {
        self.cancel_pending();
        self.cancel_auto_discover();
    }
}
