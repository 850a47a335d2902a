//! Color samples and near-white classification.
//!
//! This crate parses the legacy comma-separated `rgb()`/`rgba()` notation of
//! [CSS Color Level 4](https://www.w3.org/TR/css-color-4/#rgb-functions) and
//! classifies samples by Rec. 601 luma.
//!
//! # Scope
//!
//! Only the functional `rgb()`/`rgba()` forms parse. Hex notation, named
//! colors, `hsl()`, `currentcolor`, and custom properties are rejected with a
//! typed error. This is a deliberate under-detection policy: a host's style
//! computation reports used values in `rgb()` form, and anything else is an
//! ambiguous surface the classifier must never call near-white.

use serde::Deserialize;
use thiserror::Error;

/// Why a color string did not produce a [`Rgba`] sample.
///
/// Every variant maps to "not near-white" during classification; the variants
/// exist so callers can tell deliberate rejections apart from noise worth a
/// diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// The string was empty (or all whitespace).
    #[error("empty color string")]
    Empty,

    /// A recognized keyword that names no repaintable surface
    /// (currently only `transparent`).
    #[error("keyword '{0}' is not a repaintable color")]
    Keyword(String),

    /// A syntax this engine deliberately does not parse, such as `hsl(...)`,
    /// hex notation, or a named color. Carries the leading token for
    /// diagnostics.
    #[error("unsupported color syntax '{0}'")]
    UnsupportedSyntax(String),

    /// The string looked like `rgb()`/`rgba()` but its arguments were
    /// malformed (wrong count, non-numeric components).
    #[error("malformed rgb()/rgba() function")]
    InvalidFunction,
}

/// [§ 4 Color syntax](https://www.w3.org/TR/css-color-4/#color-syntax)
/// sRGB color sample with alpha.
///
/// Channels keep their parsed fractional precision: classification happens on
/// the numeric values, and rounding early would move samples across the
/// luma threshold.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Rgba {
    /// "the red color channel" (0.0-255.0)
    pub r: f64,
    /// "the green color channel" (0.0-255.0)
    pub g: f64,
    /// "the blue color channel" (0.0-255.0)
    pub b: f64,
    /// "the alpha channel" (0.0-1.0, 1.0 = fully opaque)
    #[serde(default = "opaque_alpha")]
    pub a: f64,
}

/// Serde default for [`Rgba::a`]: "If omitted, it defaults to 100%."
fn opaque_alpha() -> f64 {
    1.0
}

impl Rgba {
    /// Create a fully opaque sample from three channel values.
    #[must_use]
    pub const fn opaque(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// [§ 4.1 The RGB Functions](https://www.w3.org/TR/css-color-4/#rgb-functions)
    ///
    /// Parse the legacy comma-separated notation:
    ///
    /// "For legacy reasons, rgb() also supports an alternate syntax that
    /// separates all of its arguments with commas."
    ///
    /// Accepts exactly 3 numeric components plus an optional alpha. Input is
    /// trimmed and lowercased first, so used-value strings from any host
    /// casing parse the same way.
    ///
    /// "Values outside these ranges are not invalid, but are clamped to the
    /// ranges defined here at parsed-value time." - channels clamp to
    /// [0, 255], alpha to [0, 1]; a missing alpha defaults to 1 (opaque).
    ///
    /// # Errors
    ///
    /// Returns a [`ColorParseError`] describing why the string is not a
    /// parsable rgb()/rgba() sample.
    pub fn parse_css(input: &str) -> Result<Self, ColorParseError> {
        let s = input.trim().to_ascii_lowercase();
        if s.is_empty() {
            return Err(ColorParseError::Empty);
        }
        if s == "transparent" {
            return Err(ColorParseError::Keyword(s));
        }

        let Some(args) = strip_rgb_function(&s) else {
            return Err(ColorParseError::UnsupportedSyntax(leading_token(&s)));
        };

        let mut channels = [0.0_f64; 3];
        let mut alpha = 1.0_f64;
        let mut count = 0usize;

        for part in args.split(',') {
            if count >= 4 {
                return Err(ColorParseError::InvalidFunction);
            }
            let value = parse_component(part.trim())?;
            if count < 3 {
                channels[count] = value.clamp(0.0, 255.0);
            } else {
                alpha = value.clamp(0.0, 1.0);
            }
            count += 1;
        }

        if count < 3 {
            return Err(ColorParseError::InvalidFunction);
        }

        Ok(Self {
            r: channels[0],
            g: channels[1],
            b: channels[2],
            a: alpha,
        })
    }

    /// Rec. 601 luma of the sample, in [0, 255].
    ///
    /// [ITU-R BT.601](https://www.itu.int/rec/R-REC-BT.601): the classic
    /// luma weighting, `0.299 R + 0.587 G + 0.114 B`. Alpha does not
    /// participate; translucency is handled by the caller's alpha floor.
    #[must_use]
    pub fn luma(&self) -> f64 {
        0.299 * self.r + 0.587 * self.g + 0.114 * self.b
    }
}

impl std::fmt::Display for Rgba {
    /// Format as the legacy functional notation (`rgb(255, 243, 214)` or
    /// `rgba(...)` when alpha is not 1), matching the shape a host's style
    /// computation reports, so written values re-parse unchanged.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (r, g, b) = (
            Channel(self.r),
            Channel(self.g),
            Channel(self.b),
        );
        if (self.a - 1.0).abs() < f64::EPSILON {
            write!(f, "rgb({r}, {g}, {b})")
        } else {
            write!(f, "rgba({r}, {g}, {b}, {})", self.a)
        }
    }
}

/// Display adapter that prints integral channels without a trailing `.0`.
struct Channel(f64);

impl std::fmt::Display for Channel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.fract() == 0.0 {
            write!(f, "{:.0}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// Strip a `rgb(` / `rgba(` wrapper, returning the argument list.
///
/// Returns `None` when the string is not an rgb-family function call.
fn strip_rgb_function(s: &str) -> Option<&str> {
    let body = s
        .strip_prefix("rgba(")
        .or_else(|| s.strip_prefix("rgb("))?;
    body.strip_suffix(')')
}

/// Parse one functional component: digits and dots only, then numeric.
///
/// Matches the original's `[0-9.]+` acceptance - notably no sign and no
/// exponent, so `-10` or `1e2` reject even though `f64` could parse them.
fn parse_component(part: &str) -> Result<f64, ColorParseError> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit() || b == b'.') {
        return Err(ColorParseError::InvalidFunction);
    }
    part.parse::<f64>()
        .map_err(|_| ColorParseError::InvalidFunction)
}

/// Leading token of an unsupported color string, for diagnostics.
///
/// For functions this is the name before `(` (e.g. `hsl`); otherwise the
/// first whitespace-delimited word, truncated so a pathological string cannot
/// flood the warning channel.
fn leading_token(s: &str) -> String {
    let head = s
        .split(['(', ',', ' '])
        .next()
        .unwrap_or(s);
    head.chars().take(24).collect()
}

/// Decide whether a computed background color string is a near-white surface
/// worth repainting.
///
/// Policy, in order:
/// - `transparent` and anything unparsable are never near-white
///   (conservative under-detection).
/// - Samples with alpha below `alpha_min` are not a visible white surface.
/// - Otherwise the sample is near-white iff its Rec. 601 luma is at least
///   `luma_threshold`.
#[must_use]
pub fn is_near_white_background(color: &str, luma_threshold: f64, alpha_min: f64) -> bool {
    match Rgba::parse_css(color) {
        Ok(sample) => sample.a >= alpha_min && sample.luma() >= luma_threshold,
        Err(_) => false,
    }
}
