use anyhow::Result;
use tracing_subscriber::EnvFilter;
use verdantkin_catalog::{
    classify::{build_character_map, render_distribution, CharacterMap},
    cli::{Cli, Commands},
    config::CatalogPaths,
    query::{
        export_catalog, export_unique_cards, render_background_counts, run_query, CatalogReader,
        QueryMode,
    },
    writer::index_catalog,
    ConsoleUi,
};
use std::time::Instant;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse_args();

    match cli.command {
        Commands::Index {
            metadata_dir,
            mapping,
        } => {
            let start = Instant::now();
            let paths = CatalogPaths {
                db: cli.db,
                metadata_dir,
                mapping_csv: mapping,
            };

            let mut ui = ConsoleUi::new();
            let summary = index_catalog(&paths, &mut ui)?;
            drop(ui);

            let reader = CatalogReader::open(&paths.db)?;
            println!(
                "\n{}",
                render_background_counts("Rarity Summary", &reader.background_counts()?)
            );

            let elapsed = start.elapsed();
            println!(
                "Indexed {} NFTs into {:?} ({} mapped, {} fallback, {} failed, {} missing) in {:.1}s",
                summary.indexed(),
                paths.db,
                summary.mapped,
                summary.fallback,
                summary.failed,
                summary.missing,
                elapsed.as_secs_f64()
            );
        }

        Commands::Query { token } => {
            let reader = CatalogReader::open(&cli.db)?;
            let mode = QueryMode::from_arg(token.as_deref());
            print!("{}", run_query(&reader, mode)?);
        }

        Commands::CharacterMap { output, map_output } => {
            let reader = CatalogReader::open(&cli.db)?;
            let map = build_character_map(&reader.all_tokens()?)?;
            map.write_json(&output)?;
            map.write_keyed_json(&map_output)?;

            println!("Generated {:?} with {} entries", output, map.entries.len());
            println!("Generated {:?}", map_output);
            print!("{}", render_distribution(&map));
        }

        Commands::KeyedMap { input, output } => {
            let map = CharacterMap::read_json(&input)?;
            map.write_keyed_json(&output)?;
            println!("Converted {:?} -> {:?}", input, output);
        }

        Commands::UniqueCards { output } => {
            let reader = CatalogReader::open(&cli.db)?;
            let report = export_unique_cards(&reader, &output)?;

            println!("{}", serde_json::to_string_pretty(&report.cards)?);
            println!(
                "\nExtracted {} unique character+background combos.",
                report.cards.len()
            );
            println!("Total unique characters (names): {}", report.distinct_names);
        }

        Commands::Export { output } => {
            let reader = CatalogReader::open(&cli.db)?;
            let count = export_catalog(&reader, &output)?;
            println!("Exported {} NFTs to {:?}", count, output);
        }
    }

    Ok(())
}
