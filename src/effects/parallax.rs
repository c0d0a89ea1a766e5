//! Hero parallax: scroll-driven translate and fade, clamped for legibility.

use crate::dom::HeroContent;
use crate::style::Transform;

/// Tuning for the hero motion. Defaults keep the block within ±60px and
/// never fade below 0.35 opacity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxParams {
    /// Scroll-to-translate ratio
    pub factor: f64,
    /// Translate clamp, px
    pub max_px: f64,
    /// Opacity lost per scrolled pixel
    pub fade_per_px: f64,
    /// Opacity floor
    pub min_opacity: f64,
}

impl Default for ParallaxParams {
    fn default() -> Self {
        ParallaxParams {
            factor: 0.2,
            max_px: 60.0,
            fade_per_px: 0.0015,
            min_opacity: 0.35,
        }
    }
}

/// Compute the hero translate and opacity for a scroll offset.
pub fn hero_motion(scroll_y: f64, params: &ParallaxParams) -> (f64, f64) {
    let translate = (scroll_y * params.factor).clamp(-params.max_px, params.max_px);
    let opacity = (1.0 - scroll_y * params.fade_per_px).max(params.min_opacity);
    (translate, opacity)
}

/// Apply the motion to the hero block. Runs at most once per rendered frame
/// (the engine's pending-frame flag gates calls here) and only moves a hero
/// that actually lives inside `#home`.
pub fn apply(hero: Option<&mut HeroContent>, scroll_y: f64, params: &ParallaxParams) {
    let Some(hero) = hero else {
        return;
    };
    if !hero.in_home {
        return;
    }
    let (translate, opacity) = hero_motion(scroll_y, params);
    hero.style.transform = Some(Transform::translate_y(translate));
    hero.style.opacity = Some(opacity);
}
