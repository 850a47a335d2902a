//! The gatekeeper and the per-element paint operation.
//!
//! Painting is a monotonic one-shot transform: once an element passes every
//! guard and is repainted, its id enters the processed-set and it is never
//! touched again for the lifetime of the page. All failure modes - exotic
//! color syntax, missing geometry, excluded tags - degrade silently to
//! "skip"; when in doubt the element is left unmodified rather than risking
//! a visually broken repaint.

use std::collections::HashSet;

use creamtint_color::{is_near_white_background, ColorParseError, Rgba};
use creamtint_common::warning::warn_once;
use creamtint_dom::{NodeId, Page};

use crate::config::TintConfig;

/// Tags that must never be repainted as if they were ordinary boxes:
/// non-rendered containers plus the vector-graphics tags, where a flat
/// fill would corrupt the artwork.
const EXCLUDED_TAGS: [&str; 6] = ["script", "style", "noscript", "svg", "path", "g"];

/// Elements narrower or shorter than this (px) are left alone; a flat cream
/// fill on tiny decorative boxes (icons, dividers) tends to look broken.
const MIN_PAINT_EXTENT: f64 = 24.0;

/// Replacement text color for faint text on a freshly creamed background.
const TEXT_DARK: Rgba = Rgba::opaque(45.0, 45.0, 45.0);

/// Faint-text luma band (exclusive on both ends). Text inside the band is
/// darkened to keep legibility against the lighter background; text outside
/// it is already legible (dark) or intentional (very light) and stays.
const FAINT_TEXT_LUMA_MIN: f64 = 140.0;
const FAINT_TEXT_LUMA_MAX: f64 = 210.0;

/// The paint pipeline state: configuration plus the processed-set.
///
/// The processed-set holds [`NodeId`]s, which the arena never reuses, so
/// membership of a node that later leaves the document simply becomes
/// unreachable - the same semantics as the weakly-referencing identity set
/// a garbage-collected host would use.
#[derive(Debug)]
pub struct Tinter {
    config: TintConfig,
    touched: HashSet<NodeId>,
}

impl Tinter {
    /// Create a tinter with an empty processed-set.
    #[must_use]
    pub fn new(config: TintConfig) -> Self {
        Self {
            config,
            touched: HashSet::new(),
        }
    }

    /// The configuration this tinter was injected with.
    pub fn config(&self) -> &TintConfig {
        &self.config
    }

    /// Whether the element has already been painted.
    #[must_use]
    pub fn has_painted(&self, id: NodeId) -> bool {
        self.touched.contains(&id)
    }

    /// How many elements have been painted so far.
    #[must_use]
    pub fn painted_count(&self) -> usize {
        self.touched.len()
    }

    /// The gatekeeper: `true` means "do not touch".
    ///
    /// Skips non-elements, the fixed tag exclusion set (ASCII
    /// case-insensitive), and anything already in the processed-set.
    #[must_use]
    pub fn should_skip(&self, page: &Page, id: NodeId) -> bool {
        let Some(tag) = page.tag_name(id) else {
            return true;
        };
        if EXCLUDED_TAGS.iter().any(|t| tag.eq_ignore_ascii_case(t)) {
            return true;
        }
        self.touched.contains(&id)
    }

    /// The paint operation: repaint one element if it qualifies.
    ///
    /// Ordered guards, any failure aborting with no mutation:
    /// 1. gatekeeper
    /// 2. near-white computed background
    /// 3. rendered box at least 24px in both extents
    ///
    /// On a match, the background becomes the cream tone; faint text
    /// (luma strictly inside the 140..210 band) is darkened alongside it;
    /// and the element enters the processed-set for good.
    pub fn paint_if_light(&mut self, page: &mut Page, id: NodeId) {
        if self.should_skip(page, id) {
            return;
        }

        let near_white = page
            .computed_background_color(id)
            .is_some_and(|bg| self.classify_background(bg));
        if !near_white {
            return;
        }

        let metrics = page.box_metrics(id).unwrap_or_default();
        if metrics.width < MIN_PAINT_EXTENT || metrics.height < MIN_PAINT_EXTENT {
            return;
        }

        page.set_inline_background_color(id, self.config.cream.to_string());

        let darken = page
            .computed_color(id)
            .and_then(|c| Rgba::parse_css(c).ok())
            .is_some_and(|c| {
                let luma = c.luma();
                luma > FAINT_TEXT_LUMA_MIN && luma < FAINT_TEXT_LUMA_MAX
            });
        if darken {
            page.set_inline_color(id, TEXT_DARK.to_string());
        }

        let _ = self.touched.insert(id);
    }

    /// Classify a computed background, reporting syntaxes the color crate
    /// deliberately rejects (diagnostic only; the element is skipped either
    /// way).
    fn classify_background(&self, bg: &str) -> bool {
        if is_near_white_background(bg, self.config.luma_threshold, self.config.alpha_min) {
            return true;
        }
        if let Err(ColorParseError::UnsupportedSyntax(token)) = Rgba::parse_css(bg) {
            warn_once("Color", &format!("unsupported color syntax '{token}'"));
        }
        false
    }
}
