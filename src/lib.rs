//! PageFX Effects Engine
//!
//! A headless scroll-effects engine for static pages. PageFX ingests a
//! page's markup, models its sections and content blocks with simple block
//! layout, and drives the classic portfolio-page behaviors deterministically
//! in plain Rust: smooth anchor scrolling, active-nav highlighting, a hero
//! parallax, one-shot reveal-on-scroll animations, and a cosmetic
//! contact-form handler. Every effect output is an inline-style or class
//! mutation on the in-memory model, so state can be asserted, snapshotted,
//! and diffed without a browser.
//!
//! # Features
//!
//! - **Deterministic frames**: scroll events coalesce into at most one
//!   parallax recompute per rendered frame; `run_frame` advances everything
//!   one frame at a time.
//! - **One-shot reveals**: watched blocks animate to rest on first viewport
//!   entry and are released from observation permanently.
//! - **Snapshots**: the full effect state serializes to JSON for golden
//!   tests and CLI inspection.
//!
//! # Example
//!
//! ```
//! use pagefx::{EffectsConfig, PageEffects};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut engine = pagefx::new_engine(EffectsConfig::default())?;
//! engine.load_html(
//!     "<section id=\"home\"><div class=\"hero-content\"><h1>Hi</h1></div></section>",
//!     None,
//! )?;
//! engine.scroll_to(240.0);
//! engine.run_frame();
//! let snap = engine.snapshot()?;
//! assert_eq!(snap.scroll_y, 0.0); // a single-screen page cannot scroll
//! # Ok(())
//! # }
//! ```

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub mod error;
pub use error::{Error, Result};

pub mod dom;
pub mod effects;
pub mod engine;
pub mod frame;
pub mod layout;
pub mod observe;
pub mod style;

// Async-friendly page API (worker-backed abstraction)
pub mod async_api;

// Re-export the main handles at the crate root for ergonomic use
pub use async_api::Page;
pub use engine::FxEngine;

use effects::parallax::ParallaxParams;
use observe::ObserverOptions;

/// Configuration for the effects engine
///
/// Defaults reproduce the reference tuning: a 200px nav lookahead, hero
/// translate clamped to ±60px with an opacity floor of 0.35, reveals at 18%
/// visibility inside a viewport whose bottom edge is pulled up 10%, and the
/// original transition curves.
///
/// # Examples
///
/// ```
/// let cfg = pagefx::EffectsConfig::default();
/// assert!(cfg.user_agent.contains("PageFX"));
/// assert_eq!(cfg.nav_lookahead_px, 200.0);
/// ```
#[derive(Debug, Clone)]
pub struct EffectsConfig {
    /// User agent string sent when fetching pages
    pub user_agent: String,
    /// Viewport dimensions
    pub viewport: Viewport,
    /// Timeout for page loads in milliseconds
    pub timeout_ms: u64,
    /// Nominal duration of one rendered frame in milliseconds
    pub frame_interval_ms: f64,
    /// Lookahead subtracted from each section top when picking the current
    /// section for nav highlighting
    pub nav_lookahead_px: f64,
    /// Hero parallax tuning
    pub parallax: ParallaxParams,
    /// Visible fraction of a watched block required to trigger its reveal
    pub reveal_threshold: f64,
    /// Fraction of the viewport height trimmed off the bottom of the
    /// intersection root
    pub reveal_bottom_inset: f64,
    /// Transition applied to watched blocks at load
    pub reveal_transition: String,
    /// Duration of the reveal transform transition in milliseconds
    pub reveal_duration_ms: u64,
    /// Quicker transition applied to the hero block at load
    pub hero_transition: String,
    /// Duration of an anchor smooth-scroll in milliseconds
    pub scroll_duration_ms: u64,
}

impl Default for EffectsConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/115.0 PageFX/0.1"
                .to_string(),
            viewport: Viewport::default(),
            timeout_ms: 30000,
            frame_interval_ms: 16.0,
            nav_lookahead_px: 200.0,
            parallax: ParallaxParams::default(),
            reveal_threshold: 0.18,
            reveal_bottom_inset: 0.10,
            reveal_transition: "transform 0.6s cubic-bezier(0.22, 1, 0.36, 1), opacity 0.5s ease"
                .to_string(),
            reveal_duration_ms: 600,
            hero_transition: "transform 0.2s ease-out, opacity 0.3s ease".to_string(),
            scroll_duration_ms: 450,
        }
    }
}

impl EffectsConfig {
    pub(crate) fn observer_options(&self) -> ObserverOptions {
        ObserverOptions {
            threshold: self.reveal_threshold,
            bottom_inset: self.reveal_bottom_inset,
        }
    }

    pub(crate) fn reveal_frames(&self) -> u32 {
        effects::anchor::frames_for(self.reveal_duration_ms, self.frame_interval_ms)
    }

    pub(crate) fn scroll_frames(&self) -> u32 {
        effects::anchor::frames_for(self.scroll_duration_ms, self.frame_interval_ms)
    }
}

/// Viewport dimensions
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// A summary of a loaded page, passed to `on_load` handlers
#[derive(Debug, Clone)]
pub struct PageSummary {
    /// Page title
    pub title: String,
    /// Final URL when the page came over the network
    pub url: String,
    /// Section ids in document order
    pub sections: Vec<String>,
    /// Number of watched content blocks
    pub trackables: usize,
    /// Number of same-page links found
    pub anchors: usize,
}

/// Nav-highlight change, passed to `on_nav` handlers when the current
/// section differs from the previous scroll event's
#[derive(Debug, Clone, PartialEq)]
pub struct NavChange {
    /// Section id now holding the highlight, `None` when nothing matched
    pub active: Option<String>,
}

/// A reveal delivery, passed to `on_reveal` handlers
#[derive(Debug, Clone, PartialEq)]
pub struct RevealEvent {
    /// Index of the block in the page model's trackable list
    pub index: usize,
    /// The block's selector class
    pub class: String,
}

/// User-facing acknowledgement emitted by the contact-form handler
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub message: String,
}

/// Inline style values of one element, rendered for snapshots
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementStyleSnapshot {
    pub opacity: Option<f64>,
    pub transform: Option<String>,
    pub transition: Option<String>,
    pub will_change: Option<String>,
}

/// One nav link's highlight state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavLinkSnapshot {
    pub href: String,
    pub active: bool,
}

/// One watched block's state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackableSnapshot {
    pub class: String,
    pub phase: String,
    pub top: f64,
    pub style: ElementStyleSnapshot,
}

/// One form field's id and current value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FormFieldSnapshot {
    pub id: String,
    pub value: String,
}

/// A serializable snapshot of the whole effect state
///
/// This is the crate's observable output: scroll position, the nav
/// highlight, the hero's inline style, every watched block's phase and
/// style, and the form fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub url: String,
    pub title: String,
    pub scroll_y: f64,
    pub frame: u64,
    pub active_section: Option<String>,
    pub nav: Vec<NavLinkSnapshot>,
    pub hero: Option<ElementStyleSnapshot>,
    pub trackables: Vec<TrackableSnapshot>,
    pub form: Option<Vec<FormFieldSnapshot>>,
    /// Blocks still being watched for their first viewport entry
    pub watched: usize,
}

impl StateSnapshot {
    /// Canonical SHA-256 digest of the snapshot, hex encoded. Two runs of
    /// the same timeline over the same page produce the same digest.
    pub fn digest(&self) -> Result<String> {
        let bytes = serde_json::to_vec(self)
            .map_err(|e| Error::SnapshotError(format!("serialize failed: {}", e)))?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(hex::encode(hasher.finalize()))
    }

    /// Pretty-printed JSON rendering of the snapshot.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| Error::SnapshotError(format!("serialize failed: {}", e)))
    }

    /// Compact human-readable rendering used by the CLI's plain output.
    pub fn describe(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{} ({})", self.title, self.url);
        let _ = writeln!(out, "scroll: {} frame: {}", self.scroll_y, self.frame);
        let _ = writeln!(
            out,
            "active section: {}",
            self.active_section.as_deref().unwrap_or("-")
        );
        for t in &self.trackables {
            let _ = writeln!(out, "  .{} [{}] top={}", t.class, t.phase, t.top);
        }
        let _ = writeln!(out, "watched: {}", self.watched);
        out
    }
}

/// Core trait for effects-engine implementations
pub trait PageEffects {
    /// Create a new engine instance with the given configuration
    fn new(config: EffectsConfig) -> Result<Self>
    where
        Self: Sized;

    /// Fetch a URL and install the page
    #[cfg(feature = "fetch")]
    fn load_url(&mut self, url: &str) -> Result<()>;

    /// Install a page from markup already in hand. `url` is used to resolve
    /// same-page links and is echoed in snapshots.
    fn load_html(&mut self, html: &str, url: Option<&str>) -> Result<()>;

    /// Process one scroll event: clamp the offset, run the nav highlighter,
    /// and schedule a parallax recompute for the next frame. A manual
    /// scroll cancels any running smooth-scroll. No-op before a page loads.
    fn scroll_to(&mut self, y: f64);

    /// Current scroll offset
    fn scroll_y(&self) -> f64;

    /// Advance one rendered frame: smooth-scroll step, the pending parallax
    /// job (if any), intersection delivery, and reveal-transition ticks.
    fn run_frame(&mut self);

    /// Advance several frames
    fn run_frames(&mut self, count: u32) {
        for _ in 0..count {
            self.run_frame();
        }
    }

    /// Activate a same-page link. Default navigation is always suppressed;
    /// when the fragment's section exists an eased scroll toward its top
    /// edge starts and `true` is returned, otherwise nothing happens.
    fn click_anchor(&mut self, href: &str) -> bool;

    /// Submit the contact form: suppress default behavior, emit the fixed
    /// acknowledgement through `on_notice`, clear every field. Returns
    /// whether a form was present.
    fn submit_form(&mut self) -> bool;

    /// Change the viewport. With a page installed this reloads the stored
    /// markup at the new size, resetting effect state like a fresh load.
    fn set_viewport(&mut self, viewport: Viewport) -> Result<()>;

    /// Snapshot the full effect state
    fn snapshot(&self) -> Result<StateSnapshot>;

    /// Register a callback invoked after each successful page install
    fn on_load<F>(&mut self, cb: F)
    where
        F: Fn(&PageSummary) + Send + Sync + 'static;

    /// Remove a previously registered on_load callback if any
    fn clear_on_load(&mut self);

    /// Register a callback for nav-highlight changes
    fn on_nav<F>(&mut self, cb: F)
    where
        F: Fn(&NavChange) + Send + Sync + 'static;

    /// Remove a previously registered on_nav callback if any
    fn clear_on_nav(&mut self);

    /// Register a callback for reveal deliveries
    fn on_reveal<F>(&mut self, cb: F)
    where
        F: Fn(&RevealEvent) + Send + Sync + 'static;

    /// Remove a previously registered on_reveal callback if any
    fn clear_on_reveal(&mut self);

    /// Register a callback for user-facing notices (form acknowledgements)
    fn on_notice<F>(&mut self, cb: F)
    where
        F: Fn(&Notice) + Send + Sync + 'static;

    /// Remove a previously registered on_notice callback if any
    fn clear_on_notice(&mut self);

    /// Close the engine and release resources
    fn close(self) -> Result<()>;
}

/// Create a new engine instance with the default backend
pub fn new_engine(config: EffectsConfig) -> Result<impl PageEffects> {
    engine::FxEngine::new(config)
}
