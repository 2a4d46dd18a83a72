//! Text rendering for the `query` command

use anyhow::Result;
use std::fmt::Write;

use super::store::{CatalogReader, TraitAverages};
use crate::parser::TokenRecord;

/// Number of records shown in summary mode
pub const SUMMARY_LIMIT: usize = 10;

/// Which report to render, chosen by the optional positional argument
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QueryMode {
    Detail(u64),
    Summary,
}

impl QueryMode {
    /// Detail mode only for an all-digit argument; anything else is a summary
    pub fn from_arg(arg: Option<&str>) -> Self {
        match arg {
            Some(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => s
                .parse()
                .map(QueryMode::Detail)
                .unwrap_or(QueryMode::Summary),
            _ => QueryMode::Summary,
        }
    }
}

/// Run the selected report plus the shared statistics sections
pub fn run_query(reader: &CatalogReader, mode: QueryMode) -> Result<String> {
    let mut out = match mode {
        QueryMode::Detail(token_id) => render_detail(token_id, reader.get_token(token_id)?.as_ref()),
        QueryMode::Summary => render_listing(&reader.list_tokens(SUMMARY_LIMIT)?),
    };

    out.push('\n');
    out.push_str(&render_stats(reader.count()?, reader.trait_averages()?.as_ref()));
    out.push('\n');
    out.push_str(&render_breakdown(&reader.background_counts()?));
    Ok(out)
}

pub fn render_detail(token_id: u64, record: Option<&TokenRecord>) -> String {
    let Some(r) = record else {
        return format!("No data for #{}\n", token_id);
    };

    let mut out = String::new();
    let _ = writeln!(out, "Full Data for #{} ({}):", r.token_id, r.filename);
    let fields: [(&str, String); 13] = [
        ("Name", r.name.clone()),
        ("Description", r.description.clone()),
        ("Collection", r.collection.clone()),
        ("Image", r.image.clone()),
        ("Fee Recipient", r.fee_recipient.clone()),
        ("Seller Fee BP", r.seller_fee_basis_points.to_string()),
        ("Attack", r.attack.to_string()),
        ("Defense", r.defense.to_string()),
        ("Vitality", r.vitality.to_string()),
        ("Agility", r.agility.to_string()),
        ("Core", r.core.to_string()),
        ("Background", r.background.clone()),
        ("Token URI", r.token_uri.clone()),
    ];
    for (label, value) in fields {
        let _ = writeln!(out, "  {}: {}", label, value);
    }
    out
}

pub fn render_listing(records: &[TokenRecord]) -> String {
    let mut out = format!(
        "First {} NFTs (ID | Name | Attack | Def | Vit | Agi | Core | Background):\n",
        SUMMARY_LIMIT
    );
    if records.is_empty() {
        out.push_str("  no data\n");
    }
    for r in records {
        let _ = writeln!(
            out,
            "  {} | {} | {} | {} | {} | {} | {} | {}",
            r.token_id, r.name, r.attack, r.defense, r.vitality, r.agility, r.core, r.background
        );
    }
    out
}

/// Totals and one-decimal trait means; an empty catalog reports "no data"
pub fn render_stats(total: u64, averages: Option<&TraitAverages>) -> String {
    match averages {
        Some(a) => format!(
            "Overall Stats: Total NFTs={}, Avg Attack={:.1}, Def={:.1}, Vit={:.1}, Agi={:.1}, Core={:.1}\n",
            total, a.attack, a.defense, a.vitality, a.agility, a.core
        ),
        None => format!("Overall Stats: Total NFTs={}, averages: no data\n", total),
    }
}

pub fn render_breakdown(counts: &[(String, u64)]) -> String {
    render_background_counts("Rarity Breakdown", counts)
}

/// `background: count` lines under `heading`
pub fn render_background_counts(heading: &str, counts: &[(String, u64)]) -> String {
    let mut out = format!("{}:\n", heading);
    if counts.is_empty() {
        out.push_str("  no data\n");
    }
    for (background, count) in counts {
        let _ = writeln!(out, "  {}: {}", background, count);
    }
    out
}
