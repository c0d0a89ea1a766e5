//! FxEngine: the pure-Rust effects backend.
//!
//! Owns the page model, the scroll offset, the frame scheduler, and the
//! reveal watch set. Scroll events mutate nav state immediately and arm the
//! pending-frame flag; `run_frame` drains that flag into one parallax
//! recompute, steps any smooth-scroll, and delivers intersections.

use std::sync::Arc;

use crate::dom::{self, PageModel};
use crate::effects::anchor::ScrollAnimation;
use crate::effects::{form, nav, parallax};
use crate::effects::reveal::RevealDriver;
use crate::frame::FrameScheduler;
use crate::style::InlineStyle;
use crate::{
    EffectsConfig, ElementStyleSnapshot, Error, FormFieldSnapshot, NavChange, NavLinkSnapshot,
    Notice, PageEffects, PageSummary, Result, RevealEvent, StateSnapshot, TrackableSnapshot,
    Viewport,
};

#[cfg(feature = "fetch")]
use reqwest::blocking::Client;
#[cfg(feature = "fetch")]
use std::time::Duration;

type OnLoadHandler = Arc<dyn Fn(&PageSummary) + Send + Sync>;
type OnNavHandler = Arc<dyn Fn(&NavChange) + Send + Sync>;
type OnRevealHandler = Arc<dyn Fn(&RevealEvent) + Send + Sync>;
type OnNoticeHandler = Arc<dyn Fn(&Notice) + Send + Sync>;

pub struct FxEngine {
    #[cfg(feature = "fetch")]
    client: Client,
    config: EffectsConfig,
    last_html: Option<String>,
    last_url: Option<String>,

    model: Option<PageModel>,
    scroll_y: f64,
    last_active: Option<String>,
    scheduler: FrameScheduler,
    reveal: RevealDriver,
    scroll_anim: Option<ScrollAnimation>,

    on_load: Option<OnLoadHandler>,
    on_nav: Option<OnNavHandler>,
    on_reveal: Option<OnRevealHandler>,
    on_notice: Option<OnNoticeHandler>,
}

impl FxEngine {
    /// Install a parsed page: rebuild the model, reset per-page state,
    /// push every watched block into its hidden state, and run the initial
    /// parallax frame.
    fn install(&mut self, html: String, url: Option<String>) {
        let mut model = PageModel::parse(&html, url.as_deref(), self.config.viewport);

        self.scroll_y = 0.0;
        self.last_active = None;
        self.scroll_anim = None;
        self.scheduler.reset();
        self.reveal = RevealDriver::new(
            self.config.observer_options(),
            self.config.reveal_transition.clone(),
            self.config.reveal_frames(),
        );
        self.reveal.prime(&mut model.trackables);

        // The hero gets a quicker transition so the parallax feels direct
        if let Some(hero) = model.hero.as_mut() {
            hero.style.transition = Some(self.config.hero_transition.clone());
            hero.style.will_change = Some("transform, opacity".to_string());
        }
        parallax::apply(model.hero.as_mut(), self.scroll_y, &self.config.parallax);

        log::debug!(
            "installed page {:?}: {} sections, {} watched blocks, doc height {}",
            model.title,
            model.sections.len(),
            model.trackables.len(),
            model.doc_height
        );

        let summary = PageSummary {
            title: model.title.clone(),
            url: url.clone().unwrap_or_default(),
            sections: model.sections.iter().map(|s| s.id.clone()).collect(),
            trackables: model.trackables.len(),
            anchors: model.anchors.len(),
        };

        self.model = Some(model);
        self.last_html = Some(html);
        self.last_url = url;

        if let Some(cb) = &self.on_load {
            cb(&summary);
        }
    }

    /// One scroll event: clamp, run the nav highlighter, arm the
    /// pending-frame flag.
    fn apply_scroll(&mut self, y: f64) {
        let Some(model) = self.model.as_mut() else {
            log::debug!("scroll ignored: no page loaded");
            return;
        };

        let max = model.max_scroll(self.config.viewport);
        self.scroll_y = y.clamp(0.0, max);

        let active = nav::highlight(model, self.scroll_y, self.config.nav_lookahead_px);
        if active != self.last_active {
            self.last_active = active.clone();
            if let Some(cb) = &self.on_nav {
                cb(&NavChange { active });
            }
        }

        self.scheduler.request();
    }

    fn style_snapshot(style: &InlineStyle) -> ElementStyleSnapshot {
        ElementStyleSnapshot {
            opacity: style.opacity,
            transform: style.transform.as_ref().map(|t| t.to_css()),
            transition: style.transition.clone(),
            will_change: style.will_change.clone(),
        }
    }
}

impl PageEffects for FxEngine {
    fn new(config: EffectsConfig) -> Result<Self>
    where
        Self: Sized,
    {
        if !(0.0..=1.0).contains(&config.reveal_threshold) {
            return Err(Error::ConfigError(format!(
                "reveal_threshold must be within [0, 1], got {}",
                config.reveal_threshold
            )));
        }
        if !(0.0..1.0).contains(&config.reveal_bottom_inset) {
            return Err(Error::ConfigError(format!(
                "reveal_bottom_inset must be within [0, 1), got {}",
                config.reveal_bottom_inset
            )));
        }
        if config.frame_interval_ms <= 0.0 {
            return Err(Error::ConfigError(
                "frame_interval_ms must be positive".to_string(),
            ));
        }

        #[cfg(feature = "fetch")]
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::InitializationError(format!("Failed to build HTTP client: {}", e)))?;

        let reveal = RevealDriver::new(
            config.observer_options(),
            config.reveal_transition.clone(),
            config.reveal_frames(),
        );

        Ok(Self {
            #[cfg(feature = "fetch")]
            client,
            config,
            last_html: None,
            last_url: None,
            model: None,
            scroll_y: 0.0,
            last_active: None,
            scheduler: FrameScheduler::new(),
            reveal,
            scroll_anim: None,
            on_load: None,
            on_nav: None,
            on_reveal: None,
            on_notice: None,
        })
    }

    #[cfg(feature = "fetch")]
    fn load_url(&mut self, url: &str) -> Result<()> {
        let resp = self
            .client
            .get(url)
            .header("User-Agent", self.config.user_agent.clone())
            .send()
            .map_err(|e| Error::NetworkError(format!("Failed to fetch {}: {}", url, e)))?;

        let final_url = resp.url().to_string();
        let body = resp
            .text()
            .map_err(|e| Error::LoadError(format!("Failed to read response body: {}", e)))?;

        self.install(body, Some(final_url));
        Ok(())
    }

    fn load_html(&mut self, html: &str, url: Option<&str>) -> Result<()> {
        self.install(html.to_string(), url.map(|u| u.to_string()));
        Ok(())
    }

    fn scroll_to(&mut self, y: f64) {
        // A manual scroll takes over from any running smooth-scroll
        self.scroll_anim = None;
        self.apply_scroll(y);
    }

    fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    fn run_frame(&mut self) {
        self.scheduler.advance();

        // A smooth-scroll step behaves like one more scroll event
        if let Some((y, done)) = self.scroll_anim.as_mut().map(|a| a.step()) {
            if done {
                self.scroll_anim = None;
            }
            self.apply_scroll(y);
        }

        // The pending flag collapses every scroll since the last frame into
        // a single hero recompute
        if self.scheduler.take() {
            if let Some(model) = self.model.as_mut() {
                parallax::apply(model.hero.as_mut(), self.scroll_y, &self.config.parallax);
            }
        }

        if let Some(model) = self.model.as_mut() {
            let fired = self
                .reveal
                .observe(&mut model.trackables, self.scroll_y, self.config.viewport);
            if let Some(cb) = &self.on_reveal {
                for ev in &fired {
                    cb(ev);
                }
            }
            self.reveal.tick(&mut model.trackables);
        }
    }

    fn click_anchor(&mut self, href: &str) -> bool {
        let Some(model) = self.model.as_ref() else {
            log::debug!("click ignored: no page loaded");
            return false;
        };
        let Some(fragment) = dom::same_page_fragment(href, self.last_url.as_deref()) else {
            log::debug!("link {:?} does not stay on this page", href);
            return false;
        };
        let Some(top) = model.section_top(&fragment) else {
            log::debug!("anchor target #{} not found", fragment);
            return false;
        };

        let max = model.max_scroll(self.config.viewport);
        let to = top.clamp(0.0, max);
        self.scroll_anim = Some(ScrollAnimation::new(
            self.scroll_y,
            to,
            self.config.scroll_frames(),
        ));
        true
    }

    fn submit_form(&mut self) -> bool {
        let Some(model) = self.model.as_mut() else {
            log::debug!("submit ignored: no page loaded");
            return false;
        };
        let Some(form_model) = model.form.as_mut() else {
            log::debug!("submit ignored: page has no contact form");
            return false;
        };

        let notice = form::submit(form_model);
        if let Some(cb) = &self.on_notice {
            cb(&notice);
        }
        true
    }

    fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        self.config.viewport = viewport;
        if let Some(html) = self.last_html.clone() {
            log::debug!("viewport changed to {}x{}, reinstalling page", viewport.width, viewport.height);
            let url = self.last_url.clone();
            self.install(html, url);
        }
        Ok(())
    }

    fn snapshot(&self) -> Result<StateSnapshot> {
        let model = self
            .model
            .as_ref()
            .ok_or_else(|| Error::LoadError("No page loaded".into()))?;

        Ok(StateSnapshot {
            url: model.url.clone().unwrap_or_default(),
            title: model.title.clone(),
            scroll_y: self.scroll_y,
            frame: self.scheduler.frame(),
            active_section: self.last_active.clone(),
            nav: model
                .nav_links
                .iter()
                .map(|l| NavLinkSnapshot {
                    href: l.href.clone(),
                    active: l.has_class(nav::ACTIVE_CLASS),
                })
                .collect(),
            hero: model.hero.as_ref().map(|h| Self::style_snapshot(&h.style)),
            trackables: model
                .trackables
                .iter()
                .map(|t| TrackableSnapshot {
                    class: t.kind.class().to_string(),
                    phase: t.phase.label().to_string(),
                    top: t.rect.top(),
                    style: Self::style_snapshot(&t.style),
                })
                .collect(),
            form: model.form.as_ref().map(|f| {
                f.fields
                    .iter()
                    .map(|field| FormFieldSnapshot {
                        id: field.id.clone(),
                        value: field.value.clone(),
                    })
                    .collect()
            }),
            watched: self.reveal.watched().len(),
        })
    }

    fn on_load<F>(&mut self, cb: F)
    where
        F: Fn(&PageSummary) + Send + Sync + 'static,
    {
        self.on_load = Some(Arc::new(cb));
    }

    fn clear_on_load(&mut self) {
        self.on_load = None;
    }

    fn on_nav<F>(&mut self, cb: F)
    where
        F: Fn(&NavChange) + Send + Sync + 'static,
    {
        self.on_nav = Some(Arc::new(cb));
    }

    fn clear_on_nav(&mut self) {
        self.on_nav = None;
    }

    fn on_reveal<F>(&mut self, cb: F)
    where
        F: Fn(&RevealEvent) + Send + Sync + 'static,
    {
        self.on_reveal = Some(Arc::new(cb));
    }

    fn clear_on_reveal(&mut self) {
        self.on_reveal = None;
    }

    fn on_notice<F>(&mut self, cb: F)
    where
        F: Fn(&Notice) + Send + Sync + 'static,
    {
        self.on_notice = Some(Arc::new(cb));
    }

    fn clear_on_notice(&mut self) {
        self.on_notice = None;
    }

    fn close(self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Three viewport-tall sections at 0 / 800 / 1600 with an 800px viewport
    const PORTFOLIO: &str = r##"<html><head><title>Jane Doe — Portfolio</title></head><body>
        <nav>
            <a href="#home">Home</a>
            <a href="#about">About</a>
            <a href="#contact">Contact</a>
        </nav>
        <section id="home">
            <div class="hero-content"><h1>Jane Doe</h1><p>Developer</p></div>
        </section>
        <section id="about">
            <h2 class="section-heading">About me</h2>
            <p class="about-text">I build things.</p>
            <img class="about-image" src="me.png">
        </section>
        <section id="contact">
            <h2 class="section-heading">Say hi</h2>
            <form class="contact-form">
                <input id="name" type="text" value="Jane">
                <input id="email" type="email" value="jane@example.com">
                <textarea id="message"></textarea>
            </form>
        </section>
    </body></html>"##;

    fn engine() -> FxEngine {
        let config = EffectsConfig {
            viewport: Viewport {
                width: 1280,
                height: 800,
            },
            ..Default::default()
        };
        let mut engine = FxEngine::new(config).expect("engine should build");
        engine.load_html(PORTFOLIO, None).expect("load should succeed");
        engine
    }

    #[test]
    fn config_validation_rejects_bad_thresholds() {
        let config = EffectsConfig {
            reveal_threshold: 1.5,
            ..Default::default()
        };
        assert!(matches!(FxEngine::new(config), Err(Error::ConfigError(_))));

        let config = EffectsConfig {
            frame_interval_ms: 0.0,
            ..Default::default()
        };
        assert!(matches!(FxEngine::new(config), Err(Error::ConfigError(_))));
    }

    #[test]
    fn load_applies_hidden_states_and_initial_parallax() {
        let engine = engine();
        let snap = engine.snapshot().expect("snapshot");

        assert_eq!(snap.title, "Jane Doe — Portfolio");
        assert_eq!(snap.scroll_y, 0.0);
        assert_eq!(snap.watched, snap.trackables.len());

        for t in &snap.trackables {
            assert_eq!(t.phase, "hidden");
            assert_eq!(t.style.opacity, Some(0.0));
            assert_eq!(t.style.will_change.as_deref(), Some("transform, opacity"));
        }
        let heading = &snap.trackables[0];
        assert_eq!(heading.class, "section-heading");
        assert_eq!(heading.style.transform.as_deref(), Some("translate3d(0px, 30px, 0)"));

        let hero = snap.hero.expect("hero style");
        assert_eq!(hero.opacity, Some(1.0));
        assert_eq!(hero.transform.as_deref(), Some("translate3d(0px, 0px, 0)"));
        assert_eq!(hero.transition.as_deref(), Some("transform 0.2s ease-out, opacity 0.3s ease"));
    }

    #[test]
    fn scroll_at_900_highlights_the_middle_section() {
        let mut engine = engine();
        engine.scroll_to(900.0);

        let snap = engine.snapshot().expect("snapshot");
        assert_eq!(snap.active_section.as_deref(), Some("about"));
        let active: Vec<&str> = snap
            .nav
            .iter()
            .filter(|l| l.active)
            .map(|l| l.href.as_str())
            .collect();
        assert_eq!(active, vec!["#about"]);
    }

    #[test]
    fn current_section_without_a_nav_link_leaves_every_link_plain() {
        let page = r##"<html><body>
            <nav><a href="#late">Late</a></nav>
            <section id="first" style="height: 900px"></section>
            <section id="late" style="height: 900px"></section>
        </body></html>"##;

        let mut engine = FxEngine::new(EffectsConfig::default()).expect("engine");
        engine.load_html(page, None).expect("load");
        engine.scroll_to(0.0);

        let snap = engine.snapshot().expect("snapshot");
        // The first section is current but no nav link targets it
        assert_eq!(snap.active_section.as_deref(), Some("first"));
        assert!(snap.nav.iter().all(|l| !l.active));

        // Scrolling into the second section moves the highlight onto its link
        engine.scroll_to(800.0);
        let snap = engine.snapshot().expect("snapshot");
        assert_eq!(snap.active_section.as_deref(), Some("late"));
        assert!(snap.nav[0].active);
    }

    #[test]
    fn parallax_updates_only_on_frame_delivery() {
        let mut engine = engine();

        // Many scroll events, no frame yet: hero still shows the load state
        for y in [50.0, 120.0, 300.0, 410.0, 500.0] {
            engine.scroll_to(y);
        }
        let before = engine.snapshot().expect("snapshot");
        assert_eq!(before.hero.expect("hero").transform.as_deref(), Some("translate3d(0px, 0px, 0)"));

        // One frame drains the single pending job at the latest offset
        engine.run_frame();
        let after = engine.snapshot().expect("snapshot");
        let hero = after.hero.expect("hero");
        assert_eq!(hero.transform.as_deref(), Some("translate3d(0px, 60px, 0)"));
        assert_eq!(hero.opacity, Some(0.35));
    }

    #[test]
    fn deep_scroll_clamps_hero_motion() {
        let mut engine = engine();
        engine.scroll_to(1000.0);
        engine.run_frame();

        let snap = engine.snapshot().expect("snapshot");
        let hero = snap.hero.expect("hero");
        assert_eq!(hero.transform.as_deref(), Some("translate3d(0px, 60px, 0)"));
        assert_eq!(hero.opacity, Some(0.35));
    }

    #[test]
    fn reveals_fire_once_and_survive_scrolling_away() {
        let mut engine = engine();

        // Above-the-fold blocks reveal on the first frame after load
        engine.run_frame();
        let initial = engine.snapshot().expect("snapshot");
        let hidden_before: Vec<&TrackableSnapshot> = initial
            .trackables
            .iter()
            .filter(|t| t.phase == "hidden")
            .collect();
        assert!(!hidden_before.is_empty(), "far blocks should still be hidden");

        // Scroll the about section into view and deliver intersections
        engine.scroll_to(800.0);
        engine.run_frame();
        let snap = engine.snapshot().expect("snapshot");
        let heading = &snap.trackables[0];
        assert_ne!(heading.phase, "hidden");
        assert_eq!(heading.style.opacity, Some(1.0));
        assert_eq!(heading.style.transform.as_deref(), Some("translate3d(0px, 0px, 0)"));

        // Scrolling far away and back never re-hides anything
        engine.scroll_to(0.0);
        engine.run_frames(64);
        engine.scroll_to(800.0);
        engine.run_frames(64);
        let settled = engine.snapshot().expect("snapshot");
        assert_eq!(settled.trackables[0].phase, "revealed");
        assert_eq!(settled.trackables[0].style.opacity, Some(1.0));
    }

    #[test]
    fn revealing_blocks_settle_after_the_transition_frames() {
        let mut engine = engine();
        engine.scroll_to(800.0);
        engine.run_frame();

        let snap = engine.snapshot().expect("snapshot");
        assert!(snap.trackables.iter().any(|t| t.phase == "revealing"));

        engine.run_frames(engine.config.reveal_frames());
        let snap = engine.snapshot().expect("snapshot");
        assert!(snap.trackables.iter().all(|t| t.phase != "revealing"));
    }

    #[test]
    fn click_anchor_scrolls_smoothly_to_the_target_top() {
        let mut engine = engine();
        let mut positions = Vec::new();

        assert!(engine.click_anchor("#about"));
        let frames = engine.config.scroll_frames();
        for _ in 0..frames {
            engine.run_frame();
            positions.push(engine.scroll_y());
        }

        assert_eq!(engine.scroll_y(), 800.0);
        assert!(positions.windows(2).all(|w| w[0] <= w[1]), "scroll must ease monotonically");
        // The approach passes through intermediate offsets rather than jumping
        assert!(positions.iter().any(|&y| y > 0.0 && y < 800.0));

        let snap = engine.snapshot().expect("snapshot");
        assert_eq!(snap.active_section.as_deref(), Some("about"));
    }

    #[test]
    fn click_anchor_with_missing_target_is_a_silent_noop() {
        let mut engine = engine();
        assert!(!engine.click_anchor("#nope"));
        assert!(!engine.click_anchor("#"));
        assert!(!engine.click_anchor("https://example.com/#about"));

        engine.run_frames(8);
        assert_eq!(engine.scroll_y(), 0.0);
    }

    #[test]
    fn manual_scroll_cancels_a_running_smooth_scroll() {
        let mut engine = engine();
        assert!(engine.click_anchor("#contact"));
        engine.run_frames(3);
        assert!(engine.scroll_y() > 0.0);

        engine.scroll_to(100.0);
        engine.run_frames(60);
        assert_eq!(engine.scroll_y(), 100.0);
    }

    #[test]
    fn submit_clears_fields_and_emits_the_acknowledgement() {
        let mut engine = engine();
        let notices = Arc::new(Mutex::new(Vec::new()));
        let captured = notices.clone();
        engine.on_notice(move |n| {
            captured.lock().unwrap().push(n.message.clone());
        });

        assert!(engine.submit_form());
        let snap = engine.snapshot().expect("snapshot");
        let fields = snap.form.expect("form present");
        assert!(fields.iter().all(|f| f.value.is_empty()));

        let notices = notices.lock().unwrap();
        assert_eq!(notices.as_slice(), [form::ACK_MESSAGE]);
    }

    #[test]
    fn operations_without_a_page_are_silent_noops() {
        let mut engine = FxEngine::new(EffectsConfig::default()).expect("engine");
        engine.scroll_to(500.0);
        engine.run_frame();
        assert_eq!(engine.scroll_y(), 0.0);
        assert!(!engine.click_anchor("#home"));
        assert!(!engine.submit_form());
        assert!(matches!(engine.snapshot(), Err(Error::LoadError(_))));
    }

    #[test]
    fn pages_without_hero_or_form_skip_those_effects() {
        let mut engine = FxEngine::new(EffectsConfig::default()).expect("engine");
        engine
            .load_html("<html><body><section id=\"a\"><p class=\"about-text\">x</p></section></body></html>", None)
            .expect("load");

        engine.scroll_to(10.0);
        engine.run_frame();
        assert!(!engine.submit_form());

        let snap = engine.snapshot().expect("snapshot");
        assert!(snap.hero.is_none());
        assert!(snap.form.is_none());
    }

    #[test]
    fn on_load_reports_the_page_summary() {
        let summaries = Arc::new(Mutex::new(Vec::new()));
        let captured = summaries.clone();

        let mut engine = FxEngine::new(EffectsConfig::default()).expect("engine");
        engine.on_load(move |s| {
            captured.lock().unwrap().push((s.title.clone(), s.sections.clone(), s.trackables));
        });
        engine.load_html(PORTFOLIO, None).expect("load");

        let summaries = summaries.lock().unwrap();
        assert_eq!(summaries.len(), 1);
        let (title, sections, trackables) = &summaries[0];
        assert_eq!(title, "Jane Doe — Portfolio");
        assert_eq!(sections.as_slice(), ["home", "about", "contact"]);
        assert_eq!(*trackables, 5);
    }

    #[test]
    fn set_viewport_reinstalls_the_page() {
        let mut engine = engine();
        engine.scroll_to(800.0);
        engine.run_frames(4);

        engine
            .set_viewport(Viewport {
                width: 800,
                height: 600,
            })
            .expect("resize");

        let snap = engine.snapshot().expect("snapshot");
        assert_eq!(snap.scroll_y, 0.0);
        assert_eq!(snap.watched, snap.trackables.len());
        // Sections now stack at the new viewport height
        assert!(snap.trackables[0].top > 600.0);
    }

    #[test]
    fn nav_change_events_fire_only_on_transitions() {
        let mut engine = engine();
        let changes = Arc::new(Mutex::new(Vec::new()));
        let captured = changes.clone();
        engine.on_nav(move |c| {
            captured.lock().unwrap().push(c.active.clone());
        });

        engine.scroll_to(10.0);
        engine.scroll_to(20.0);
        engine.scroll_to(900.0);
        engine.scroll_to(910.0);

        let changes = changes.lock().unwrap();
        assert_eq!(
            changes.as_slice(),
            [Some("home".to_string()), Some("about".to_string())]
        );
    }
}
