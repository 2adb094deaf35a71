//! Taxa filtering: the iconic-taxon category catalog and the user's
//! current filter selection.
//!
//! The selection has two mutually exclusive modes: a set of category codes
//! or a free-text species filter. Selecting any category disables the
//! free-text input; clearing every category re-enables it. The stored
//! free-text value is retained while disabled but ignored by [`TaxaSelection::resolve`]
//! (categories win).

use serde::{Deserialize, Serialize};

/// One entry in the iconic-taxon catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// Code sent to collaborators (e.g. "Aves").
    pub code: &'static str,
    /// Human-readable label (e.g. "Birds").
    pub label: &'static str,
}

/// The iNaturalist iconic-taxon categories offered as filters.
pub const CATEGORIES: [Category; 12] = [
    Category { code: "Aves", label: "Birds" },
    Category { code: "Amphibia", label: "Amphibians" },
    Category { code: "Reptilia", label: "Reptiles" },
    Category { code: "Mammalia", label: "Mammals" },
    Category { code: "Actinopterygii", label: "Ray-finned Fishes" },
    Category { code: "Mollusca", label: "Mollusks" },
    Category { code: "Arachnida", label: "Arachnids" },
    Category { code: "Insecta", label: "Insects" },
    Category { code: "Plantae", label: "Plants" },
    Category { code: "Fungi", label: "Fungi including Lichens" },
    Category { code: "Protozoa", label: "Protozoans" },
    Category { code: "Unknown", label: "Unknown" },
];

/// Returns the catalog entry for a category code, if it exists.
pub fn category_by_code(code: &str) -> Option<Category> {
    CATEGORIES.iter().copied().find(|c| c.code == code)
}

/// The user's current taxa filter selection.
///
/// Kept as an ordered list of category codes (insertion order, no
/// duplicates) plus the free-text field. The effective filter string is
/// recomputed fresh at each collaborator call site via [`resolve`](Self::resolve),
/// never cached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxaSelection {
    categories: Vec<String>,
    free_text: String,
}

impl TaxaSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a selection from persisted category codes.
    ///
    /// Unknown codes are dropped so a stale config file cannot smuggle
    /// arbitrary filter strings into collaborator calls.
    pub fn from_saved_categories(codes: Vec<String>) -> Self {
        let mut selection = Self::default();
        for code in codes {
            if category_by_code(&code).is_some() {
                selection.toggle_category(&code);
            }
        }
        selection
    }

    /// Toggles a category code in or out of the set.
    ///
    /// Returns true if the code is selected after the toggle.
    pub fn toggle_category(&mut self, code: &str) -> bool {
        if let Some(pos) = self.categories.iter().position(|c| c == code) {
            self.categories.remove(pos);
            false
        } else {
            self.categories.push(code.to_string());
            true
        }
    }

    /// The selected category codes, in selection order.
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Sets the free-text filter value.
    ///
    /// The value is stored even while the field is disabled; it only takes
    /// effect once the category set is empty again.
    pub fn set_free_text(&mut self, text: impl Into<String>) {
        self.free_text = text.into();
    }

    pub fn free_text(&self) -> &str {
        &self.free_text
    }

    /// Whether the free-text input is currently usable.
    pub fn is_free_text_enabled(&self) -> bool {
        self.categories.is_empty()
    }

    /// Resolves the effective filter at a collaborator call site.
    ///
    /// Category set wins when non-empty (codes joined by commas); otherwise
    /// trimmed free text; otherwise no filter.
    pub fn resolve(&self) -> Option<String> {
        if !self.categories.is_empty() {
            return Some(self.categories.join(","));
        }
        let trimmed = self.free_text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// Comma-joined category list for status messages ("Aves, Plantae").
    pub fn category_summary(&self) -> String {
        self.categories.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_has_twelve_known_codes() {
        assert_eq!(CATEGORIES.len(), 12);
        assert_eq!(category_by_code("Aves").unwrap().label, "Birds");
        assert!(category_by_code("Dinosauria").is_none());
    }

    #[test]
    fn toggling_clears_and_restores_free_text_mode() {
        let mut sel = TaxaSelection::new();
        assert!(sel.is_free_text_enabled());

        assert!(sel.toggle_category("Aves"));
        assert!(sel.toggle_category("Plantae"));
        assert!(!sel.is_free_text_enabled());

        // Clearing Plantae leaves {Aves}; free text stays disabled.
        assert!(!sel.toggle_category("Plantae"));
        assert_eq!(sel.categories(), ["Aves"]);
        assert!(!sel.is_free_text_enabled());

        assert!(!sel.toggle_category("Aves"));
        assert!(sel.is_free_text_enabled());
    }

    #[test]
    fn resolve_prefers_categories_over_stale_free_text() {
        let mut sel = TaxaSelection::new();
        sel.set_free_text("Eucalyptus");
        assert_eq!(sel.resolve().as_deref(), Some("Eucalyptus"));

        sel.toggle_category("Aves");
        sel.toggle_category("Plantae");
        assert_eq!(sel.resolve().as_deref(), Some("Aves,Plantae"));

        sel.toggle_category("Aves");
        sel.toggle_category("Plantae");
        // Stored free text becomes effective again once categories clear.
        assert_eq!(sel.resolve().as_deref(), Some("Eucalyptus"));
    }

    #[test]
    fn resolve_is_none_for_blank_input() {
        let mut sel = TaxaSelection::new();
        assert_eq!(sel.resolve(), None);
        sel.set_free_text("   ");
        assert_eq!(sel.resolve(), None);
    }

    #[test]
    fn saved_categories_drop_unknown_codes() {
        let sel = TaxaSelection::from_saved_categories(vec![
            "Aves".to_string(),
            "NotACategory".to_string(),
            "Fungi".to_string(),
        ]);
        assert_eq!(sel.categories(), ["Aves", "Fungi"]);
    }
}
