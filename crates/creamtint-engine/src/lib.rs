//! The CreamTint repaint pipeline.
//!
//! # Scope
//!
//! This crate implements the pass/observe pipeline that rewrites near-white
//! backgrounds to a fixed cream tone:
//!
//! - **Paint Operation** - idempotent per-element repaint with guard
//!   conditions (tag exclusions, processed-set, size floor)
//! - **Batched Initial Scanner** - one pass over the captured descendant set,
//!   sliced across rendering frames so large documents stay responsive
//! - **Mutation Watcher** - incremental repaint of inserted subtrees, with a
//!   hard per-insertion descendant cap
//! - **Host services** - the [`FrameScheduler`] and [`SubtreeChangeSource`]
//!   traits a concrete host (or a synchronous test harness) provides
//!
//! # Not Implemented
//!
//! Deliberately outside this engine's contract:
//!
//! - Undo/restore of original colors (painting is one-shot per element)
//! - Removal handling (dropped nodes just stop being candidates)
//! - Non-RGB color spaces (see `creamtint-color`)
//! - Cross-frame traversal

/// Pipeline configuration and its fixed defaults.
pub mod config;
/// Host service traits and synchronous harness implementations.
pub mod host;
/// The gatekeeper and the per-element paint operation.
pub mod paint;
/// The batched initial scanner.
pub mod scan;
/// The mutation watcher.
pub mod watch;

pub use config::TintConfig;
pub use host::{CountingScheduler, FrameScheduler, InsertionBatch, QueuedChanges, SubtreeChangeSource};
pub use paint::Tinter;

use creamtint_dom::Page;

/// Run the whole pipeline once: scan from the document element, then drain
/// the change source if mutation observation is enabled.
///
/// Returns the [`Tinter`] so the host can keep feeding it insertion batches
/// for the rest of the page's lifetime (the watcher never unsubscribes).
/// A page without a document element skips the scan phase.
pub fn inject<S, M>(
    page: &mut Page,
    config: TintConfig,
    scheduler: &mut S,
    source: &mut M,
) -> Tinter
where
    S: FrameScheduler,
    M: SubtreeChangeSource,
{
    let mut tinter = Tinter::new(config);
    if let Some(root) = page.document_element() {
        let _ = tinter.scan(page, root, scheduler);
    }
    if tinter.config().observe_mutations {
        tinter.observe(page, source);
    }
    tinter
}
