//! The `categories` command: inspect and edit the persisted selection.

use anyhow::{Context, Result};
use chunkscout_core::taxa::{CATEGORIES, TaxaSelection};
use chunkscout_infrastructure::{CategoryStore, ChunkScoutPaths};
use clap::Subcommand;

#[derive(Subcommand)]
pub enum CategoriesAction {
    /// List the catalog and the persisted selection
    List,
    /// Replace the persisted selection (comma separated codes)
    Set {
        #[arg(value_delimiter = ',')]
        codes: Vec<String>,
    },
    /// Clear the persisted selection
    Clear,
}

pub fn run(action: CategoriesAction) -> Result<()> {
    let path = ChunkScoutPaths::categories_file().context("cannot resolve config directory")?;
    let store = CategoryStore::new(path);

    match action {
        CategoriesAction::List => {
            let selection = store.load();
            for category in CATEGORIES {
                let marker = if selection.categories().iter().any(|c| c == category.code) {
                    "[x]"
                } else {
                    "[ ]"
                };
                println!("{marker} {:<16} {}", category.code, category.label);
            }
        }
        CategoriesAction::Set { codes } => {
            let selection = TaxaSelection::from_saved_categories(codes);
            store.save(&selection)?;
            println!("Saved: {}", selection.category_summary());
        }
        CategoriesAction::Clear => {
            store.save(&TaxaSelection::new())?;
            println!("Cleared category selection");
        }
    }
    Ok(())
}
