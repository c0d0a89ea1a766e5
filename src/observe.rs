//! Viewport-membership tests for the reveal driver.
//!
//! Mirrors the browser's intersection semantics for the one configuration
//! the effects use: a root viewport whose bottom edge is pulled up by a
//! fraction of its height, and a visibility-ratio threshold.

use crate::dom::Rect;
use crate::Viewport;

/// Intersection parameters: `threshold` is the visible fraction of the
/// target required to count as intersecting, `bottom_inset` the fraction of
/// the viewport height trimmed off the root's bottom edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    pub threshold: f64,
    pub bottom_inset: f64,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        ObserverOptions {
            threshold: 0.18,
            bottom_inset: 0.10,
        }
    }
}

/// Fraction of the target visible inside the inset root at the given scroll
/// offset. Zero-height targets report 1.0 when their top edge is inside the
/// root and 0.0 otherwise.
pub fn intersection_ratio(
    target: &Rect,
    scroll_y: f64,
    viewport: Viewport,
    opts: ObserverOptions,
) -> f64 {
    let root_top = scroll_y;
    let root_bottom = scroll_y + f64::from(viewport.height) * (1.0 - opts.bottom_inset);

    if target.height <= 0.0 {
        let inside = target.top() >= root_top && target.top() <= root_bottom;
        return if inside { 1.0 } else { 0.0 };
    }

    let visible = (target.bottom().min(root_bottom) - target.top().max(root_top)).max(0.0);
    visible / target.height
}

/// Whether the target meets the configured visibility threshold.
pub fn is_intersecting(
    target: &Rect,
    scroll_y: f64,
    viewport: Viewport,
    opts: ObserverOptions,
) -> bool {
    let ratio = intersection_ratio(target, scroll_y, viewport, opts);
    ratio > 0.0 && ratio >= opts.threshold
}
