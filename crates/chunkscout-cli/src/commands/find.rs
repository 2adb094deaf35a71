//! The `find` command: one full find → (roll | pick) → export pass.

use crate::map_port::TracingMapPort;
use anyhow::{Context, Result};
use chunkscout_core::export::{kml_filename, to_coordinate_text, to_kml, to_map_deep_link};
use chunkscout_core::session::SessionController;
use chunkscout_infrastructure::{CategoryStore, ChunkScoutPaths};
use chunkscout_interaction::{ChunkServiceClient, MapboxGeocoder};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args)]
pub struct FindArgs {
    /// Origin address to geocode
    #[arg(long)]
    pub address: String,

    /// Maximum drive time in minutes (1-60)
    #[arg(long, default_value_t = 30)]
    pub drivetime: u32,

    /// Chunk size in square kilometres
    #[arg(long, default_value_t = 1.0)]
    pub chunk_size: f64,

    /// Category codes (comma separated, e.g. Aves,Plantae). Overrides the
    /// persisted selection for this run.
    #[arg(long, value_delimiter = ',')]
    pub categories: Vec<String>,

    /// Free-text species/taxa filter (ignored while categories are set)
    #[arg(long)]
    pub taxa: Option<String>,

    /// Roll for a random chunk after discovery
    #[arg(long)]
    pub roll: bool,

    /// Select a specific candidate by index instead of rolling
    #[arg(long, conflicts_with = "roll")]
    pub pick: Option<usize>,

    /// Write the selected chunk boundary as KML to this path
    /// (a directory gets the suggested filename)
    #[arg(long)]
    pub export_kml: Option<PathBuf>,

    /// Persist the category selection for future runs
    #[arg(long)]
    pub save_categories: bool,
}

pub async fn run(args: FindArgs) -> Result<()> {
    let geocoder = Arc::new(MapboxGeocoder::try_from_env()?);
    let service = Arc::new(ChunkServiceClient::from_env());
    let mut controller = SessionController::new(
        geocoder,
        service.clone(),
        service,
        TracingMapPort,
    );

    let store = ChunkScoutPaths::categories_file()
        .ok()
        .map(CategoryStore::new);

    // Explicit categories override the persisted selection for this run.
    if args.categories.is_empty() {
        if let Some(store) = &store {
            *controller.taxa_mut() = store.load();
        }
    } else {
        for code in &args.categories {
            controller.taxa_mut().toggle_category(code);
        }
    }
    if let Some(taxa) = &args.taxa {
        controller.taxa_mut().set_free_text(taxa);
    }

    if args.save_categories {
        if let Some(store) = &store {
            store
                .save(controller.taxa())
                .context("failed to persist category selection")?;
        }
    }

    controller.set_origin_address(&args.address);
    controller.set_drive_time_minutes(args.drivetime);
    controller.set_chunk_size_km2(args.chunk_size);

    controller.find_chunks().await;
    println!("{}", controller.state().status_message);

    if let Some(index) = args.pick {
        controller
            .handle_event(chunkscout_core::layers::MapEvent::ChunkClicked(index))
            .await;
        println!("{}", controller.state().status_message);
    } else if args.roll {
        controller.roll(&mut rand::thread_rng()).await;
        println!("{}", controller.state().status_message);
    }

    for obs in &controller.state().observations {
        let position = obs
            .coordinate
            .map(|c| format!("{:.6}, {:.6}", c.lat, c.lon))
            .unwrap_or_else(|| "position withheld".to_string());
        println!(
            "  {} ({}) - {} [{}]",
            obs.species_guess, obs.iconic_taxon_name, position, obs.observation_url
        );
    }

    if let Some(bounds) = controller.selected_bounds() {
        println!();
        println!("{}", to_coordinate_text(&bounds));
        println!("Open in maps: {}", to_map_deep_link(&bounds));

        if let Some(target) = &args.export_kml {
            let path = if target.is_dir() {
                target.join(kml_filename(&bounds))
            } else {
                target.clone()
            };
            std::fs::write(&path, to_kml(&bounds))
                .with_context(|| format!("failed to write KML to {}", path.display()))?;
            println!("Wrote {}", path.display());
        }
    } else if args.export_kml.is_some() {
        anyhow::bail!("no chunk selected; use --roll or --pick to select one before exporting");
    }

    Ok(())
}
