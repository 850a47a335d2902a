//! The mutation watcher.
//!
//! Handles subtree insertions delivered after the initial scan: each
//! directly inserted element is painted, then up to the descendant cap of
//! its subtree. The cap keeps a single large injected widget from stalling
//! the observer turn; whatever it cuts off stays unpainted (there is no
//! follow-up pass). Removals are not handled - a removed node simply stops
//! being a candidate.

use creamtint_dom::{NodeId, Page};

use crate::host::{InsertionBatch, SubtreeChangeSource};
use crate::paint::Tinter;

/// Candidate bound per inserted root. The counter advances on every element
/// candidate, painted or not, and the walk stops after the candidate that
/// pushes it past the cap - so at most `DESCENDANT_CAP + 1` descendants are
/// visited, and gatekeeper-skipped elements (e.g. a run of `<svg>` children)
/// still consume budget. Observed behavior of the original, kept as-is.
const DESCENDANT_CAP: usize = 250;

impl Tinter {
    /// Apply one insertion batch.
    ///
    /// Non-element entries (text insertions) are ignored outright, including
    /// their descendants.
    pub fn on_insertions(&mut self, page: &mut Page, batch: &InsertionBatch) {
        for &added in &batch.added {
            if !page.is_element(added) {
                continue;
            }
            self.paint_if_light(page, added);

            let descendants: Vec<NodeId> = page.element_descendants(added).collect();
            let mut count = 0usize;
            for id in descendants {
                self.paint_if_light(page, id);
                count += 1;
                if count > DESCENDANT_CAP {
                    break;
                }
            }
        }
    }

    /// Drain a change source, applying every batch it currently has.
    ///
    /// Each batch is handled synchronously, with no yielding mid-batch; the
    /// source may produce more batches later, in which case the host calls
    /// this again (the watcher never unsubscribes for the page's lifetime).
    pub fn observe<M: SubtreeChangeSource>(&mut self, page: &mut Page, source: &mut M) {
        while let Some(batch) = source.next_batch() {
            self.on_insertions(page, &batch);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TintConfig;
    use crate::host::QueuedChanges;
    use creamtint_dom::{BoxMetrics, ComputedStyle, ElementData};

    const CREAM: &str = "rgb(255, 243, 214)";

    fn white_style() -> ComputedStyle {
        ComputedStyle {
            background_color: "rgb(255, 255, 255)".to_string(),
            color: "rgb(0, 0, 0)".to_string(),
        }
    }

    fn add(page: &mut Page, parent: NodeId, tag: &str) -> NodeId {
        page.append_element(
            parent,
            ElementData::new(tag),
            white_style(),
            BoxMetrics::new(100.0, 50.0),
        )
    }

    fn empty_page() -> (Page, NodeId) {
        let mut page = Page::new();
        let root = page.tree().root();
        let html = add(&mut page, root, "html");
        (page, html)
    }

    #[test]
    fn a_small_inserted_subtree_is_fully_painted() {
        let (mut page, html) = empty_page();
        let widget = add(&mut page, html, "div");
        let a = add(&mut page, widget, "p");
        let b = add(&mut page, widget, "p");

        let mut tinter = Tinter::new(TintConfig::default());
        tinter.on_insertions(&mut page, &InsertionBatch::new(vec![widget]));

        for id in [widget, a, b] {
            assert_eq!(page.inline_background_color(id), Some(CREAM));
        }
    }

    #[test]
    fn the_descendant_cap_cuts_off_a_large_subtree() {
        let (mut page, html) = empty_page();
        let widget = add(&mut page, html, "div");
        let children: Vec<NodeId> = (0..400).map(|_| add(&mut page, widget, "div")).collect();

        let mut tinter = Tinter::new(TintConfig::default());
        tinter.on_insertions(&mut page, &InsertionBatch::new(vec![widget]));

        // the root, plus candidates until the counter passes 250: 251 painted
        assert_eq!(tinter.painted_count(), 252);
        assert!(tinter.has_painted(widget));
        for (i, &id) in children.iter().enumerate() {
            if i < 251 {
                assert_eq!(page.inline_background_color(id), Some(CREAM), "child {i}");
            } else {
                assert_eq!(page.inline_background_color(id), None, "child {i}");
            }
        }
    }

    #[test]
    fn skipped_candidates_still_consume_the_cap() {
        let (mut page, html) = empty_page();
        let widget = add(&mut page, html, "div");
        // 280 svg children burn the whole budget before any paintable child
        let svgs: Vec<NodeId> = (0..280).map(|_| add(&mut page, widget, "svg")).collect();
        let late: Vec<NodeId> = (0..30).map(|_| add(&mut page, widget, "div")).collect();

        let mut tinter = Tinter::new(TintConfig::default());
        tinter.on_insertions(&mut page, &InsertionBatch::new(vec![widget]));

        assert_eq!(tinter.painted_count(), 1); // just the root
        for id in svgs.iter().chain(&late) {
            assert_eq!(page.inline_background_color(*id), None);
        }
    }

    #[test]
    fn non_element_insertions_are_ignored() {
        let (mut page, html) = empty_page();
        let text = page.append_text(html, "streamed in");
        let comment = page.append_comment(html, "ad slot");

        let mut tinter = Tinter::new(TintConfig::default());
        tinter.on_insertions(&mut page, &InsertionBatch::new(vec![text, comment]));
        assert_eq!(tinter.painted_count(), 0);
    }

    #[test]
    fn the_cap_applies_per_inserted_root() {
        let (mut page, html) = empty_page();
        let first = add(&mut page, html, "div");
        let _kids_a: Vec<NodeId> = (0..300).map(|_| add(&mut page, first, "div")).collect();
        let second = add(&mut page, html, "div");
        let _kids_b: Vec<NodeId> = (0..300).map(|_| add(&mut page, second, "div")).collect();

        let mut tinter = Tinter::new(TintConfig::default());
        tinter.on_insertions(&mut page, &InsertionBatch::new(vec![first, second]));

        // each root gets its own 251-candidate budget
        assert_eq!(tinter.painted_count(), 2 * (1 + 251));
    }

    #[test]
    fn observe_drains_every_queued_batch() {
        let (mut page, html) = empty_page();
        let a = add(&mut page, html, "div");
        let b = add(&mut page, html, "div");

        let mut source = QueuedChanges::new();
        source.push(InsertionBatch::new(vec![a]));
        source.push(InsertionBatch::new(vec![b]));

        let mut tinter = Tinter::new(TintConfig::default());
        tinter.observe(&mut page, &mut source);

        assert!(tinter.has_painted(a));
        assert!(tinter.has_painted(b));
        assert!(source.next_batch().is_none());
    }

    #[test]
    fn already_scanned_elements_are_not_repainted_on_reinsertion() {
        let (mut page, html) = empty_page();
        let div = add(&mut page, html, "div");

        let mut tinter = Tinter::new(TintConfig::default());
        tinter.paint_if_light(&mut page, div);
        assert_eq!(tinter.painted_count(), 1);

        // a host may redeliver a node (e.g. move within the document)
        tinter.on_insertions(&mut page, &InsertionBatch::new(vec![div]));
        assert_eq!(tinter.painted_count(), 1);
    }
}
