//! In-memory page model the effects operate on.
//!
//! The model is built once per load from the parsed markup: sections, nav
//! links, same-page anchors, the hero block, the watchable content blocks,
//! and the contact form's fields. Geometry comes from the block layout in
//! [`crate::layout`]; everything else is mutable presentation state.

use scraper::{ElementRef, Html, Selector};

use crate::layout;
use crate::style::{InlineStyle, Transform};
use crate::Viewport;

/// Document-space rectangle in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// The content-block families that get a hidden initial state and a one-shot
/// reveal. Each family carries its own initial offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackableKind {
    ServiceCard,
    ProjectCard,
    ResumeItem,
    AboutText,
    AboutImage,
    ContactForm,
    SectionHeading,
}

impl TrackableKind {
    pub const ALL: [TrackableKind; 7] = [
        TrackableKind::ServiceCard,
        TrackableKind::ProjectCard,
        TrackableKind::ResumeItem,
        TrackableKind::AboutText,
        TrackableKind::AboutImage,
        TrackableKind::ContactForm,
        TrackableKind::SectionHeading,
    ];

    /// The CSS class this family is selected by.
    pub fn class(&self) -> &'static str {
        match self {
            TrackableKind::ServiceCard => "service-card",
            TrackableKind::ProjectCard => "project-card",
            TrackableKind::ResumeItem => "resume-item",
            TrackableKind::AboutText => "about-text",
            TrackableKind::AboutImage => "about-image",
            TrackableKind::ContactForm => "contact-form",
            TrackableKind::SectionHeading => "section-heading",
        }
    }

    /// The offset an element of this family starts from before its reveal.
    pub fn hidden_transform(&self) -> Transform {
        match self {
            TrackableKind::ServiceCard => Transform::translate_y(60.0),
            TrackableKind::ProjectCard => Transform::translate_y(40.0),
            TrackableKind::ResumeItem => Transform::translate_x(40.0),
            TrackableKind::AboutText => Transform::translate_x(-50.0),
            TrackableKind::AboutImage => Transform::translate_x(50.0).with_scale(0.9),
            TrackableKind::ContactForm => Transform::translate_y(50.0),
            TrackableKind::SectionHeading => Transform::translate_y(30.0),
        }
    }

    /// Match an element's class list against the known families.
    pub fn from_classes<'a, I>(classes: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let classes: Vec<&str> = classes.into_iter().collect();
        Self::ALL
            .iter()
            .copied()
            .find(|k| classes.contains(&k.class()))
    }

    /// Selector list matching every trackable family.
    pub fn selector_list() -> String {
        Self::ALL
            .iter()
            .map(|k| format!(".{}", k.class()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Reveal lifecycle of a trackable element. The transition is
/// one-directional; once an element leaves `Hidden` it never goes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPhase {
    /// Initial state: zero opacity, family-specific offset, still watched.
    Hidden,
    /// First viewport entry happened; the CSS transition is running and the
    /// element is no longer watched.
    Revealing { frames_left: u32 },
    /// Terminal state.
    Revealed,
}

impl RevealPhase {
    pub fn label(&self) -> &'static str {
        match self {
            RevealPhase::Hidden => "hidden",
            RevealPhase::Revealing { .. } => "revealing",
            RevealPhase::Revealed => "revealed",
        }
    }
}

/// A `section[id]` block, the unit the nav highlighter scans.
#[derive(Debug, Clone)]
pub struct Section {
    pub id: String,
    pub rect: Rect,
}

/// A `nav a` link; the highlighter toggles its `active` class.
#[derive(Debug, Clone)]
pub struct NavLink {
    pub href: String,
    pub text: String,
    pub classes: Vec<String>,
}

impl NavLink {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if !self.has_class(class) {
            self.classes.push(class.to_string());
        }
    }

    pub fn remove_class(&mut self, class: &str) {
        self.classes.retain(|c| c != class);
    }
}

/// A same-page hyperlink and the fragment it targets.
#[derive(Debug, Clone)]
pub struct Anchor {
    pub href: String,
    pub fragment: String,
}

/// The hero block the parallax drives. The transform only follows the
/// scroll offset when the block actually sits inside `#home`.
#[derive(Debug, Clone)]
pub struct HeroContent {
    pub in_home: bool,
    pub style: InlineStyle,
}

/// A watched content block with its geometry, style state, and reveal phase.
#[derive(Debug, Clone)]
pub struct Trackable {
    pub kind: TrackableKind,
    pub rect: Rect,
    pub style: InlineStyle,
    pub phase: RevealPhase,
}

/// One `input`/`textarea` inside the contact form.
#[derive(Debug, Clone)]
pub struct FormField {
    pub id: String,
    pub value: String,
}

/// The contact form's field state; submit clears it.
#[derive(Debug, Clone, Default)]
pub struct FormModel {
    pub fields: Vec<FormField>,
}

/// Everything the effects read and mutate for one loaded page.
#[derive(Debug, Clone)]
pub struct PageModel {
    pub title: String,
    pub url: Option<String>,
    pub sections: Vec<Section>,
    pub nav_links: Vec<NavLink>,
    pub anchors: Vec<Anchor>,
    pub hero: Option<HeroContent>,
    pub trackables: Vec<Trackable>,
    pub form: Option<FormModel>,
    pub doc_height: f64,
}

impl PageModel {
    /// Parse markup and lay it out against the given viewport.
    pub fn parse(html: &str, url: Option<&str>, viewport: Viewport) -> PageModel {
        let document = Html::parse_document(html);

        let title_sel = Selector::parse("title").unwrap();
        let title = document
            .select(&title_sel)
            .next()
            .map(|n| n.text().collect::<String>().trim().to_string())
            .unwrap_or_default();

        let (sections, trackables, doc_height) = lay_out(&document, viewport);

        let nav_sel = Selector::parse("nav a").unwrap();
        let nav_links = document
            .select(&nav_sel)
            .map(|a| NavLink {
                href: a.value().attr("href").unwrap_or_default().to_string(),
                text: a.text().collect::<String>().trim().to_string(),
                classes: a.value().classes().map(|c| c.to_string()).collect(),
            })
            .collect();

        let link_sel = Selector::parse("a[href]").unwrap();
        let anchors = document
            .select(&link_sel)
            .filter_map(|a| {
                let href = a.value().attr("href").unwrap_or_default();
                same_page_fragment(href, url).map(|fragment| Anchor {
                    href: href.to_string(),
                    fragment,
                })
            })
            .collect();

        let hero = find_hero(&document);
        let form = find_form(&document);

        PageModel {
            title,
            url: url.map(|u| u.to_string()),
            sections,
            nav_links,
            anchors,
            hero,
            trackables,
            form,
            doc_height,
        }
    }

    /// Top offset of the section a fragment points at, when it exists.
    pub fn section_top(&self, fragment: &str) -> Option<f64> {
        self.sections
            .iter()
            .find(|s| s.id == fragment)
            .map(|s| s.rect.top())
    }

    /// Largest reachable scroll offset for the given viewport.
    pub fn max_scroll(&self, viewport: Viewport) -> f64 {
        (self.doc_height - f64::from(viewport.height)).max(0.0)
    }
}

/// Stack sections vertically and give every trackable block a rect inside
/// its section. Trackables outside any section are appended below the last
/// section so they still have document-space geometry.
fn lay_out(document: &Html, viewport: Viewport) -> (Vec<Section>, Vec<Trackable>, f64) {
    let section_sel = Selector::parse("section[id]").unwrap();
    let trackable_sel = Selector::parse(&TrackableKind::selector_list()).unwrap();

    let mut sections = Vec::new();
    let mut trackables = Vec::new();
    let mut seen = std::collections::HashSet::new();
    let mut cursor = 0.0_f64;

    for section in document.select(&section_sel) {
        let id = section.value().attr("id").unwrap_or_default().to_string();
        let height = layout::section_height(&section, viewport);
        let rect = Rect {
            x: 0.0,
            y: cursor,
            width: f64::from(viewport.width),
            height,
        };

        let mut inner = layout::SECTION_PADDING;
        for el in section.select(&trackable_sel) {
            let Some(kind) = TrackableKind::from_classes(el.value().classes()) else {
                continue;
            };
            seen.insert(el.id());
            let block_height = layout::block_height(&el, viewport);
            trackables.push(Trackable {
                kind,
                rect: Rect {
                    x: layout::PAGE_MARGIN,
                    y: cursor + inner,
                    width: layout::content_width(viewport),
                    height: block_height,
                },
                style: InlineStyle::default(),
                phase: RevealPhase::Hidden,
            });
            inner += block_height + layout::BLOCK_GAP;
        }

        sections.push(Section { id, rect });
        cursor += height;
    }

    // Strays: trackables that live outside every section
    let mut doc_height = cursor.max(f64::from(viewport.height));
    for el in document.select(&trackable_sel) {
        if seen.contains(&el.id()) {
            continue;
        }
        let Some(kind) = TrackableKind::from_classes(el.value().classes()) else {
            continue;
        };
        let block_height = layout::block_height(&el, viewport);
        trackables.push(Trackable {
            kind,
            rect: Rect {
                x: layout::PAGE_MARGIN,
                y: doc_height,
                width: layout::content_width(viewport),
                height: block_height,
            },
            style: InlineStyle::default(),
            phase: RevealPhase::Hidden,
        });
        doc_height += block_height + layout::BLOCK_GAP;
    }

    (sections, trackables, doc_height)
}

fn find_hero(document: &Html) -> Option<HeroContent> {
    let hero_sel = Selector::parse(".hero-content").unwrap();
    let content = document.select(&hero_sel).next()?;

    let home_sel = Selector::parse("#home").unwrap();
    let in_home = document
        .select(&home_sel)
        .next()
        .map(|home| home.select(&hero_sel).any(|el| el.id() == content.id()))
        .unwrap_or(false);

    Some(HeroContent {
        in_home,
        style: InlineStyle::default(),
    })
}

fn find_form(document: &Html) -> Option<FormModel> {
    let form_sel = Selector::parse(".contact-form").unwrap();
    let field_sel = Selector::parse("input, textarea").unwrap();
    let form = document.select(&form_sel).next()?;

    let fields = form
        .select(&field_sel)
        .map(|f: ElementRef<'_>| {
            // A textarea's initial value is its text content, an input's is
            // its value attribute
            let value = if f.value().name() == "textarea" {
                f.text().collect::<String>().trim().to_string()
            } else {
                f.value().attr("value").unwrap_or_default().to_string()
            };
            FormField {
                id: f.value().attr("id").unwrap_or_default().to_string(),
                value,
            }
        })
        .collect();

    Some(FormModel { fields })
}

/// Resolve a link target to a fragment when the link stays on the current
/// page. Bare `#fragment` hrefs always qualify; with a base URL, absolute
/// and relative hrefs that resolve to the same document also qualify.
pub(crate) fn same_page_fragment(href: &str, base: Option<&str>) -> Option<String> {
    if let Some(frag) = href.strip_prefix('#') {
        if frag.is_empty() {
            return None;
        }
        return Some(frag.to_string());
    }

    #[cfg(feature = "fetch")]
    if let Some(base) = base {
        if let Ok(base_url) = url::Url::parse(base) {
            if let Ok(joined) = base_url.join(href) {
                let same_doc = joined[..url::Position::AfterQuery]
                    == base_url[..url::Position::AfterQuery];
                if same_doc {
                    return joined
                        .fragment()
                        .filter(|f| !f.is_empty())
                        .map(|f| f.to_string());
                }
            }
        }
    }

    #[cfg(not(feature = "fetch"))]
    let _ = base;

    None
}
