//! CreamTint CLI
//!
//! A headless harness for the repaint pipeline: loads a page snapshot from
//! JSON, runs the scan phase, replays any post-load insertions through the
//! watcher, and reports what was repainted.
//!
//! Snapshot format: a recursive `document` node record (tag, background,
//! color, width, height, children; `text` or `comment` instead of `tag` for
//! non-element nodes), plus an optional `inserted` list of batches. Each batch is a list of node
//! records appended under the document element after the initial scan, which
//! is how injected widgets arrive on a live page.

use std::collections::HashMap;
use std::fs;

use anyhow::{Context, Result, bail};
use clap::Parser;
use creamtint_dom::{BoxMetrics, ComputedStyle, ElementData, NodeId, Page};
use creamtint_engine::{CountingScheduler, InsertionBatch, QueuedChanges, TintConfig, Tinter};
use owo_colors::OwoColorize;
use serde::Deserialize;

/// CreamTint - rewrite near-white page backgrounds to a cream tone
#[derive(Parser, Debug)]
#[command(name = "creamtint")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Run the pipeline over a snapshot file
    creamtint page.json

    # Inline snapshot
    creamtint --json '{"document": {"tag": "html", "children": [
        {"tag": "div", "background": "rgb(255, 255, 255)", "width": 100, "height": 100}
    ]}}'

    # Stricter near-white threshold, no mutation replay
    creamtint page.json --luma-threshold 245 --no-observe
"#)]
struct Cli {
    /// Path to a page snapshot (JSON)
    #[arg(value_name = "FILE")]
    path: Option<String>,

    /// Parse a snapshot string directly instead of a file
    #[arg(long, value_name = "JSON", conflicts_with = "path")]
    json: Option<String>,

    /// Minimum Rec. 601 luma for a background to count as near-white
    #[arg(long, default_value = "235.0")]
    luma_threshold: f64,

    /// Alpha floor below which a background is treated as invisible
    #[arg(long, default_value = "0.15")]
    alpha_min: f64,

    /// Elements processed per scan slice
    #[arg(long, default_value = "600")]
    nodes_per_tick: usize,

    /// Skip replaying the snapshot's `inserted` batches
    #[arg(long)]
    no_observe: bool,
}

/// One node of the page snapshot. Elements carry a `tag`; text and comment
/// nodes carry `text` or `comment`. Style and geometry default to what a
/// host reports for an unstyled, unlaid-out node.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct NodeRecord {
    #[serde(default)]
    tag: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    comment: Option<String>,
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    background: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
    #[serde(default)]
    children: Vec<NodeRecord>,
}

/// A whole snapshot: the document tree at load time, plus insertion batches
/// delivered afterwards.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Snapshot {
    document: NodeRecord,
    #[serde(default)]
    inserted: Vec<Vec<NodeRecord>>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let raw = match (&cli.json, &cli.path) {
        (Some(inline), _) => inline.clone(),
        (None, Some(path)) => {
            fs::read_to_string(path).with_context(|| format!("reading snapshot {path}"))?
        }
        (None, None) => bail!("expected a snapshot file or --json"),
    };
    let snapshot: Snapshot =
        serde_json::from_str(&raw).context("parsing page snapshot")?;

    let config = TintConfig {
        luma_threshold: cli.luma_threshold,
        alpha_min: cli.alpha_min,
        nodes_per_tick: cli.nodes_per_tick,
        observe_mutations: !cli.no_observe,
        ..TintConfig::default()
    };

    let mut page = Page::new();
    let mut original = HashMap::new();
    let document_root = page.tree().root();
    let doc_element = build_node(&mut page, document_root, &snapshot.document, &mut original);

    // Injection sequence: scan what is already there, then feed the watcher
    // the content that arrives later.
    let mut tinter = Tinter::new(config);
    let mut scheduler = CountingScheduler::new();
    let slices = doc_element.map_or(0, |root| tinter.scan(&mut page, root, &mut scheduler));

    if tinter.config().observe_mutations && !snapshot.inserted.is_empty() {
        let Some(root) = doc_element else {
            bail!("snapshot has inserted batches but no document element");
        };
        let mut source = QueuedChanges::new();
        for batch in &snapshot.inserted {
            let added = batch
                .iter()
                .filter_map(|record| build_node(&mut page, root, record, &mut original))
                .collect();
            source.push(InsertionBatch::new(added));
        }
        tinter.observe(&mut page, &mut source);
    }

    report(&page, &tinter, &original, doc_element, slices, scheduler.frames());
    Ok(())
}

/// Build one snapshot record (and its subtree) under `parent`. Returns the
/// new node's id for element records, `None` for text records.
fn build_node(
    page: &mut Page,
    parent: NodeId,
    record: &NodeRecord,
    original: &mut HashMap<NodeId, String>,
) -> Option<NodeId> {
    let Some(tag) = &record.tag else {
        if let Some(text) = &record.text {
            let _ = page.append_text(parent, text.clone());
        } else if let Some(comment) = &record.comment {
            let _ = page.append_comment(parent, comment.clone());
        }
        return None;
    };

    let defaults = ComputedStyle::default();
    let background = record
        .background
        .clone()
        .unwrap_or(defaults.background_color);
    let style = ComputedStyle {
        background_color: background.clone(),
        color: record.color.clone().unwrap_or(defaults.color),
    };

    let mut data = ElementData::new(tag.clone());
    if let Some(id_attr) = &record.id {
        let _ = data.attrs.insert("id".to_string(), id_attr.clone());
    }
    let id = page.append_element(
        parent,
        data,
        style,
        BoxMetrics::new(record.width, record.height),
    );
    let _ = original.insert(id, background);

    for child in &record.children {
        let _ = build_node(page, id, child, original);
    }
    Some(id)
}

/// Print the run summary: totals, then one line per repainted element.
fn report(
    page: &Page,
    tinter: &Tinter,
    original: &HashMap<NodeId, String>,
    doc_element: Option<NodeId>,
    slices: usize,
    frames: usize,
) {
    let Some(root) = doc_element else {
        println!("{}", "Empty document: nothing to paint.".yellow());
        return;
    };

    let total = 1 + page.element_descendants(root).count();
    println!(
        "Scanned {} elements in {} slice(s), {} frame(s) yielded",
        total.bold(),
        slices,
        frames
    );
    println!(
        "Painted {} element(s):",
        tinter.painted_count().green().bold()
    );

    for id in std::iter::once(root).chain(page.element_descendants(root)) {
        if !tinter.has_painted(id) {
            continue;
        }
        let label = page.element(id).map_or_else(
            || "?".to_string(),
            |e| match e.id() {
                Some(id_attr) => format!("{}#{id_attr}", e.tag_name),
                None => e.tag_name.clone(),
            },
        );
        let from = original.get(&id).map_or("?", String::as_str);
        let to = page.inline_background_color(id).unwrap_or("?");
        let note = if page.inline_color(id).is_some() {
            " (text darkened)"
        } else {
            ""
        };
        println!("  {} {} -> {}{note}", label.cyan(), from.dimmed(), to.green());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(json: &str) -> Snapshot {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn a_file_and_an_inline_snapshot_cannot_both_be_given() {
        let result = Cli::try_parse_from(["creamtint", "page.json", "--json", "{}"]);
        assert!(result.is_err());
        // either input alone is fine
        assert!(Cli::try_parse_from(["creamtint", "page.json"]).is_ok());
        assert!(Cli::try_parse_from(["creamtint", "--json", "{}"]).is_ok());
    }

    #[test]
    fn snapshot_parses_with_defaults() {
        let snapshot = load(
            r#"{"document": {"tag": "html", "children": [
                {"tag": "div", "background": "rgb(255, 255, 255)", "width": 100, "height": 100},
                {"text": "hello"},
                {"comment": "generator"}
            ]}}"#,
        );
        assert_eq!(snapshot.document.tag.as_deref(), Some("html"));
        assert_eq!(snapshot.document.children.len(), 3);
        assert!(snapshot.inserted.is_empty());
    }

    #[test]
    fn comment_records_build_non_element_nodes() {
        let snapshot = load(
            r#"{"document": {"tag": "html", "children": [{"comment": "generator"}]}}"#,
        );
        let mut page = Page::new();
        let mut original = HashMap::new();
        let root = page.tree().root();
        let doc = build_node(&mut page, root, &snapshot.document, &mut original).unwrap();

        // the comment lands in the tree but is never a paint candidate
        assert_eq!(page.element_descendants(doc).count(), 0);
        assert_eq!(page.tree().children(doc).len(), 1);
    }

    #[test]
    fn build_node_records_original_backgrounds() {
        let snapshot = load(
            r#"{"document": {"tag": "html", "children": [
                {"tag": "div", "id": "main", "background": "rgb(255, 255, 255)",
                 "width": 100, "height": 100}
            ]}}"#,
        );
        let mut page = Page::new();
        let mut original = HashMap::new();
        let root = page.tree().root();
        let doc = build_node(&mut page, root, &snapshot.document, &mut original).unwrap();

        let div = page.element_descendants(doc).next().unwrap();
        assert_eq!(original.get(&div).map(String::as_str), Some("rgb(255, 255, 255)"));
        assert_eq!(page.element(div).unwrap().id().map(String::as_str), Some("main"));
    }

    #[test]
    fn full_run_paints_initial_and_inserted_content() {
        let snapshot = load(
            r#"{"document": {"tag": "html", "children": [
                {"tag": "div", "background": "rgb(255, 255, 255)", "width": 100, "height": 100}
            ]},
            "inserted": [[
                {"tag": "aside", "background": "rgb(250, 250, 250)", "width": 300, "height": 200}
            ]]}"#,
        );

        let mut page = Page::new();
        let mut original = HashMap::new();
        let root = page.tree().root();
        let doc = build_node(&mut page, root, &snapshot.document, &mut original).unwrap();

        let mut tinter = Tinter::new(TintConfig::default());
        let mut scheduler = CountingScheduler::new();
        let _ = tinter.scan(&mut page, doc, &mut scheduler);
        assert_eq!(tinter.painted_count(), 1);

        let mut source = QueuedChanges::new();
        let added = snapshot.inserted[0]
            .iter()
            .filter_map(|r| build_node(&mut page, doc, r, &mut original))
            .collect();
        source.push(InsertionBatch::new(added));
        tinter.observe(&mut page, &mut source);

        assert_eq!(tinter.painted_count(), 2);
    }
}
