//! Active-nav-link highlighting driven by the scroll position.

use crate::dom::PageModel;

/// Class toggled on the nav link whose section is in view.
pub const ACTIVE_CLASS: &str = "active";

/// Determine the current section for a scroll offset: a linear scan in
/// document order, last section whose top minus the lookahead is at or
/// above the offset wins. Sections are assumed ordered top to bottom.
pub fn current_section<'a>(
    model: &'a PageModel,
    scroll_y: f64,
    lookahead_px: f64,
) -> Option<&'a str> {
    let mut current = None;
    for section in &model.sections {
        if scroll_y >= section.rect.top() - lookahead_px {
            current = Some(section.id.as_str());
        }
    }
    current
}

/// Run one highlight pass: strip the active class from every nav link, then
/// re-add it on the link targeting the current section. Returns the current
/// section id, `None` when nothing matched (no link stays highlighted).
pub fn highlight(model: &mut PageModel, scroll_y: f64, lookahead_px: f64) -> Option<String> {
    let current = current_section(model, scroll_y, lookahead_px).map(|s| s.to_string());
    let target = current.as_ref().map(|id| format!("#{}", id));

    for link in &mut model.nav_links {
        link.remove_class(ACTIVE_CLASS);
        if let Some(t) = &target {
            if link.href == *t {
                link.add_class(ACTIVE_CLASS);
            }
        }
    }

    current
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{NavLink, PageModel, Rect, Section};

    fn model_with_sections(tops: &[(&str, f64)]) -> PageModel {
        PageModel {
            title: String::new(),
            url: None,
            sections: tops
                .iter()
                .map(|(id, top)| Section {
                    id: id.to_string(),
                    rect: Rect {
                        x: 0.0,
                        y: *top,
                        width: 1280.0,
                        height: 800.0,
                    },
                })
                .collect(),
            nav_links: tops
                .iter()
                .map(|(id, _)| NavLink {
                    href: format!("#{}", id),
                    text: id.to_string(),
                    classes: Vec::new(),
                })
                .collect(),
            anchors: Vec::new(),
            hero: None,
            trackables: Vec::new(),
            form: None,
            doc_height: 2400.0,
        }
    }

    #[test]
    fn last_matching_section_wins() {
        let mut model =
            model_with_sections(&[("home", 0.0), ("about", 800.0), ("contact", 1600.0)]);

        // 900 >= 800 - 200 but 900 < 1600 - 200: middle section is current
        let current = highlight(&mut model, 900.0, 200.0);
        assert_eq!(current.as_deref(), Some("about"));
        assert!(!model.nav_links[0].has_class(ACTIVE_CLASS));
        assert!(model.nav_links[1].has_class(ACTIVE_CLASS));
        assert!(!model.nav_links[2].has_class(ACTIVE_CLASS));
    }

    #[test]
    fn lookahead_promotes_the_next_section_early() {
        let mut model = model_with_sections(&[("home", 0.0), ("about", 800.0)]);
        assert_eq!(highlight(&mut model, 599.0, 200.0).as_deref(), Some("home"));
        assert_eq!(highlight(&mut model, 600.0, 200.0).as_deref(), Some("about"));
    }

    #[test]
    fn no_match_clears_every_link() {
        let mut model = model_with_sections(&[("about", 800.0)]);
        model.nav_links[0].add_class(ACTIVE_CLASS);

        let current = highlight(&mut model, 0.0, 200.0);
        assert_eq!(current, None);
        assert!(!model.nav_links[0].has_class(ACTIVE_CLASS));
    }

    #[test]
    fn links_without_matching_fragment_stay_plain() {
        let mut model = model_with_sections(&[("home", 0.0)]);
        model.nav_links.push(NavLink {
            href: "https://example.com".to_string(),
            text: "external".to_string(),
            classes: Vec::new(),
        });

        highlight(&mut model, 0.0, 200.0);
        assert!(model.nav_links[0].has_class(ACTIVE_CLASS));
        assert!(!model.nav_links[1].has_class(ACTIVE_CLASS));
    }
}
