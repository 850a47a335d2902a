//! The batched initial scanner.
//!
//! One pass over the descendant set captured at call time, sliced so the
//! page stays responsive: at most `nodes_per_tick` elements are processed
//! per slice, with a yield to the host's frame scheduler between slices.
//! The pass is fire-and-forget - once started it runs to completion across
//! however many frames it needs; there is no cancellation.

use creamtint_dom::{NodeId, Page};

use crate::host::FrameScheduler;
use crate::paint::Tinter;

impl Tinter {
    /// Scan every element currently under `root` (excluding `root` itself)
    /// and paint the ones that qualify.
    ///
    /// The descendant set is captured once, up front; elements inserted
    /// while the scan is in flight are not picked up here - they arrive
    /// through the mutation watcher instead.
    ///
    /// Returns the number of slices executed (the scheduler sees one fewer
    /// yield, since the final slice does not yield).
    pub fn scan<S: FrameScheduler>(
        &mut self,
        page: &mut Page,
        root: NodeId,
        scheduler: &mut S,
    ) -> usize {
        let captured: Vec<NodeId> = page.element_descendants(root).collect();
        // a zero slice size would never advance the cursor
        let per_tick = self.config().nodes_per_tick.max(1);

        let mut cursor = 0;
        let mut slices = 0;
        while cursor < captured.len() {
            let end = captured.len().min(cursor + per_tick);
            while cursor < end {
                self.paint_if_light(page, captured[cursor]);
                cursor += 1;
            }
            slices += 1;
            if cursor < captured.len() {
                scheduler.yield_to_frame();
            }
        }
        slices
    }
}
