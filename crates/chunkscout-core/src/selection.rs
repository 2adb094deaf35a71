//! Chunk selection engine.
//!
//! Tracks the candidate list produced by the last discovery call and the
//! single active selection over it. Random picks go through an injected
//! [`rand::Rng`] so tests can seed them.

use crate::geo::BoundingBox;
use rand::Rng;

/// Candidate chunks plus the current selection.
///
/// Invariant: `selected` is always a valid index into `candidates` or
/// `None`. Replacing the candidate list clears the selection.
#[derive(Debug, Clone, Default)]
pub struct ChunkSelection {
    candidates: Vec<BoundingBox>,
    selected: Option<usize>,
}

impl ChunkSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the candidate list, clearing any previous selection.
    pub fn replace_candidates(&mut self, candidates: Vec<BoundingBox>) {
        self.candidates = candidates;
        self.selected = None;
    }

    /// Drops all candidates and the selection.
    pub fn clear(&mut self) {
        self.candidates.clear();
        self.selected = None;
    }

    pub fn candidates(&self) -> &[BoundingBox] {
        &self.candidates
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    /// Selects the candidate at `index`.
    ///
    /// Returns the selected bounds, or `None` when the index is out of
    /// range (e.g. a click event raced a candidate-list replacement).
    pub fn select(&mut self, index: usize) -> Option<BoundingBox> {
        let bounds = *self.candidates.get(index)?;
        self.selected = Some(index);
        Some(bounds)
    }

    /// Picks one candidate uniformly at random and selects it.
    ///
    /// Returns `None` when there are no candidates; rolling never triggers
    /// discovery itself.
    pub fn roll<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<BoundingBox> {
        if self.candidates.is_empty() {
            return None;
        }
        let index = rng.gen_range(0..self.candidates.len());
        self.select(index)
    }

    /// The currently selected chunk, if any.
    pub fn selected_bounds(&self) -> Option<BoundingBox> {
        self.selected.map(|i| self.candidates[i])
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Union bounds over all candidates, for the post-discovery camera fit.
    pub fn union_bounds(&self) -> Option<BoundingBox> {
        BoundingBox::union(&self.candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn boxes(n: usize) -> Vec<BoundingBox> {
        (0..n)
            .map(|i| {
                let lon = i as f64;
                BoundingBox::new(lon, 0.0, lon + 1.0, 1.0).unwrap()
            })
            .collect()
    }

    #[test]
    fn roll_on_empty_is_none() {
        let mut selection = ChunkSelection::new();
        let mut rng = StdRng::seed_from_u64(7);
        assert!(selection.roll(&mut rng).is_none());
        assert!(selection.selected_bounds().is_none());
    }

    #[test]
    fn roll_picks_a_valid_candidate_and_tracks_it() {
        let mut selection = ChunkSelection::new();
        selection.replace_candidates(boxes(5));
        let mut rng = StdRng::seed_from_u64(42);

        let picked = selection.roll(&mut rng).unwrap();
        let index = selection.selected_index().unwrap();
        assert!(index < 5);
        assert_eq!(selection.candidates()[index], picked);
        assert_eq!(selection.selected_bounds(), Some(picked));
    }

    #[test]
    fn roll_is_deterministic_for_a_seeded_rng() {
        let mut a = ChunkSelection::new();
        let mut b = ChunkSelection::new();
        a.replace_candidates(boxes(10));
        b.replace_candidates(boxes(10));

        let mut rng_a = StdRng::seed_from_u64(1234);
        let mut rng_b = StdRng::seed_from_u64(1234);
        for _ in 0..20 {
            assert_eq!(a.roll(&mut rng_a), b.roll(&mut rng_b));
        }
    }

    #[test]
    fn replacing_candidates_clears_selection() {
        let mut selection = ChunkSelection::new();
        selection.replace_candidates(boxes(3));
        selection.select(2).unwrap();
        selection.replace_candidates(boxes(1));
        assert!(selection.selected_bounds().is_none());
    }

    #[test]
    fn out_of_range_select_is_rejected() {
        let mut selection = ChunkSelection::new();
        selection.replace_candidates(boxes(2));
        assert!(selection.select(2).is_none());
        assert!(selection.selected_bounds().is_none());
    }

    #[test]
    fn union_bounds_covers_all_candidates() {
        let mut selection = ChunkSelection::new();
        selection.replace_candidates(boxes(4));
        let union = selection.union_bounds().unwrap();
        assert_eq!(<[f64; 4]>::from(union), [0.0, 0.0, 4.0, 1.0]);
    }
}
