use anyhow::{Context, Result};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use super::sqlite::CatalogWriter;
use crate::config::CatalogPaths;
use crate::mapping::{load_mapping, TokenMapping};
use crate::parser::parse_metadata;
use crate::ui::{Phase, Ui};

/// A metadata document scheduled to be written under `token_id`
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedDocument {
    pub token_id: u64,
    pub path: PathBuf,
}

/// Partition of the metadata directory, computed once per run.
///
/// Every document in the directory lands in exactly one bucket, so no
/// document can be written twice.
#[derive(Debug, Default)]
pub struct IndexPlan {
    /// Mapping entries whose document exists
    pub mapped: Vec<PlannedDocument>,
    /// Mapping entries whose document is absent: `(token_id, filename)`
    pub missing: Vec<(u64, String)>,
    /// Unmapped documents indexed under their numeric file stem
    pub fallback: Vec<PlannedDocument>,
    /// Unmapped documents whose stem is already a mapped token id
    pub shadowed: Vec<PathBuf>,
    /// Unmapped documents without an integer stem
    pub unrecognized: Vec<PathBuf>,
}

impl IndexPlan {
    pub fn build(metadata_dir: &Path, mapping: &TokenMapping) -> Result<Self> {
        let documents = list_documents(metadata_dir)?;
        let mut plan = IndexPlan::default();
        let mut referenced: HashSet<PathBuf> = HashSet::new();

        for (token_id, filename) in mapping.iter() {
            let path = metadata_dir.join(filename);
            if path.is_file() {
                referenced.insert(path.clone());
                plan.mapped.push(PlannedDocument { token_id, path });
            } else {
                plan.missing.push((token_id, filename.to_string()));
            }
        }

        for path in documents {
            if referenced.contains(&path) {
                continue;
            }

            let stem_id = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<u64>().ok());

            match stem_id {
                Some(token_id) if mapping.contains(token_id) => plan.shadowed.push(path),
                Some(token_id) => plan.fallback.push(PlannedDocument { token_id, path }),
                None => plan.unrecognized.push(path),
            }
        }

        Ok(plan)
    }
}

/// Counts from one indexing run
#[derive(Debug, Default, Clone, PartialEq)]
pub struct IndexSummary {
    pub mappings: usize,
    pub mapped: usize,
    pub fallback: usize,
    pub failed: usize,
    pub missing: usize,
    pub skipped: usize,
}

impl IndexSummary {
    pub fn indexed(&self) -> usize {
        self.mapped + self.fallback
    }
}

/// List `*.json` files directly inside `dir`, sorted by path
pub fn list_documents(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir)
        .with_context(|| format!("Failed to read metadata directory: {:?}", dir))?;

    let mut documents = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|e| e.to_str()) == Some("json") {
            documents.push(path);
        }
    }
    documents.sort();
    Ok(documents)
}

/// Load the mapping, then index mapped documents followed by fallbacks.
///
/// A missing mapping file aborts before the database is touched. Bad
/// documents are logged and skipped.
pub fn index_catalog(paths: &CatalogPaths, ui: &mut impl Ui) -> Result<IndexSummary> {
    ui.set_phase(Phase::Mapping);
    let mapping = load_mapping(&paths.mapping_csv)?;
    ui.log(format!(
        "Loaded {} mappings from {:?}",
        mapping.len(),
        paths.mapping_csv
    ));
    if let Some((token_id, filename)) = mapping.iter().next() {
        ui.log(format!("Example: Token #{} maps to {}", token_id, filename));
    }

    let writer = CatalogWriter::open(&paths.db)?;
    writer.create_tables()?;
    writer.record_mapping(&mapping)?;

    let plan = IndexPlan::build(&paths.metadata_dir, &mapping)?;
    let mut summary = IndexSummary {
        mappings: mapping.len(),
        missing: plan.missing.len(),
        skipped: plan.shadowed.len() + plan.unrecognized.len(),
        ..Default::default()
    };

    for (token_id, filename) in &plan.missing {
        warn!(
            token_id,
            filename = %filename,
            "File not found for #{} in {:?}",
            token_id,
            paths.metadata_dir
        );
    }

    ui.set_phase(Phase::Indexing);
    summary.mapped = index_documents(&writer, &plan.mapped, &mut summary.failed, ui);

    for path in &plan.shadowed {
        warn!(path = ?path, "Skipping unmapped file: its token id is already mapped");
    }
    for path in &plan.unrecognized {
        warn!(path = ?path, "Skipping file without a numeric name");
    }

    ui.set_phase(Phase::Fallback);
    summary.fallback = index_documents(&writer, &plan.fallback, &mut summary.failed, ui);

    ui.set_phase(Phase::Complete);
    info!(
        indexed = summary.indexed(),
        failed = summary.failed,
        missing = summary.missing,
        "Indexed into {:?}",
        paths.db
    );

    Ok(summary)
}

fn index_documents(
    writer: &CatalogWriter,
    documents: &[PlannedDocument],
    failed: &mut usize,
    ui: &mut impl Ui,
) -> usize {
    let total = documents.len() as u64;
    let mut written = 0;

    for (i, doc) in documents.iter().enumerate() {
        let filename = doc
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        match parse_metadata(doc.token_id, &doc.path).and_then(|record| {
            writer.upsert_record(&record)?;
            Ok(record)
        }) {
            Ok(record) => {
                debug!(
                    token_id = doc.token_id,
                    filename = %filename,
                    "Inserted {} (Background: {})",
                    record.name,
                    record.background
                );
                written += 1;
            }
            Err(e) => {
                error!(
                    token_id = doc.token_id,
                    filename = %filename,
                    "Error processing {} for #{}: {:#}",
                    filename,
                    doc.token_id,
                    e
                );
                *failed += 1;
            }
        }

        ui.set_progress(i as u64 + 1, total, filename);
    }

    ui.clear_progress();
    written
}
