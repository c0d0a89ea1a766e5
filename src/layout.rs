//! Block-layout estimates for the page model.
//!
//! Headless, there is no layout engine to ask for offsets, so sections and
//! content blocks get simple stacked geometry: sections are viewport-tall
//! unless their inline style pins a pixel height, and blocks inside them
//! stack with a line-count estimate of their text.

use scraper::ElementRef;

use crate::Viewport;

/// Horizontal page margin on each side, px.
pub const PAGE_MARGIN: f64 = 32.0;
/// Vertical padding between a section's top edge and its first block, px.
pub const SECTION_PADDING: f64 = 48.0;
/// Estimated line height, px.
pub const LINE_HEIGHT: f64 = 24.0;
/// Inner padding of a content block, px.
pub const BLOCK_PADDING: f64 = 16.0;
/// Vertical gap between stacked blocks, px.
pub const BLOCK_GAP: f64 = 16.0;
/// Estimated character advance, px.
pub const CHAR_WIDTH: f64 = 8.0;

/// Usable content width inside the page margins.
pub fn content_width(viewport: Viewport) -> f64 {
    (f64::from(viewport.width) - PAGE_MARGIN * 2.0).max(CHAR_WIDTH)
}

/// Height of a section: an explicit `height: <N>px` from its inline style
/// when present, otherwise the full viewport (hero-style sections).
pub fn section_height(el: &ElementRef<'_>, viewport: Viewport) -> f64 {
    inline_px(el, "height").unwrap_or_else(|| f64::from(viewport.height))
}

/// Height of a content block: explicit inline height, or a line-count
/// estimate of its text at the configured character advance.
pub fn block_height(el: &ElementRef<'_>, viewport: Viewport) -> f64 {
    if let Some(h) = inline_px(el, "height") {
        return h;
    }
    let text_len = el
        .text()
        .map(|t| t.trim().chars().count())
        .sum::<usize>()
        .max(1);
    let usable = (content_width(viewport) - BLOCK_PADDING * 2.0).max(CHAR_WIDTH);
    let chars_per_line = (usable / CHAR_WIDTH).floor().max(1.0) as usize;
    let lines = text_len.div_ceil(chars_per_line);
    lines as f64 * LINE_HEIGHT + BLOCK_PADDING * 2.0
}

/// Parse a `prop: <N>px` declaration out of an element's inline style.
fn inline_px(el: &ElementRef<'_>, prop: &str) -> Option<f64> {
    let style = el.value().attr("style")?;
    for decl in style.split(';') {
        let (name, value) = match decl.split_once(':') {
            Some(pair) => pair,
            None => continue,
        };
        if !name.trim().eq_ignore_ascii_case(prop) {
            continue;
        }
        let value = value.trim();
        if let Some(px) = value.strip_suffix("px") {
            if let Ok(parsed) = px.trim().parse::<f64>() {
                return Some(parsed);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn viewport() -> Viewport {
        Viewport {
            width: 1280,
            height: 720,
        }
    }

    fn first<'a>(doc: &'a Html, sel: &Selector) -> ElementRef<'a> {
        doc.select(sel).next().expect("element present")
    }

    #[test]
    fn section_height_prefers_inline_pixels() {
        let sel = Selector::parse("section").unwrap();

        let doc = Html::parse_document("<section id=\"a\" style=\"height: 600px\"></section>");
        assert_eq!(section_height(&first(&doc, &sel), viewport()), 600.0);

        let doc = Html::parse_document("<section id=\"a\"></section>");
        assert_eq!(section_height(&first(&doc, &sel), viewport()), 720.0);

        // Non-pixel heights fall back to the viewport
        let doc = Html::parse_document("<section id=\"a\" style=\"height: 50vh\"></section>");
        assert_eq!(section_height(&first(&doc, &sel), viewport()), 720.0);
    }

    #[test]
    fn block_height_grows_with_text() {
        let sel = Selector::parse("p").unwrap();

        let doc = Html::parse_document("<p>short</p>");
        let short = block_height(&first(&doc, &sel), viewport());
        assert_eq!(short, LINE_HEIGHT + BLOCK_PADDING * 2.0);

        let long = "x".repeat(600);
        let doc = Html::parse_document(&format!("<p>{}</p>", long));
        let tall = block_height(&first(&doc, &sel), viewport());
        assert!(tall > short);
    }

    #[test]
    fn narrow_viewports_never_divide_by_zero() {
        let sel = Selector::parse("p").unwrap();
        let doc = Html::parse_document("<p>text</p>");
        let tiny = Viewport {
            width: 10,
            height: 10,
        };
        assert!(block_height(&first(&doc, &sel), tiny) > 0.0);
    }
}
