//! Inline presentation state mutated by the effects.
//!
//! The engine's only outputs are inline style properties (`opacity`,
//! `transform`, `transition`, `will-change`) and class toggles on modeled
//! elements, so these types are the observable surface of every effect.

/// A GPU-friendly 2D transform: translation plus an optional uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Horizontal translation in pixels
    pub x: f64,
    /// Vertical translation in pixels
    pub y: f64,
    /// Uniform scale factor (1.0 = none)
    pub scale: f64,
}

impl Transform {
    /// The resting transform applied when an element reveals.
    pub const IDENTITY: Transform = Transform {
        x: 0.0,
        y: 0.0,
        scale: 1.0,
    };

    /// Vertical offset in pixels
    pub fn translate_y(px: f64) -> Self {
        Transform {
            x: 0.0,
            y: px,
            scale: 1.0,
        }
    }

    /// Horizontal offset in pixels
    pub fn translate_x(px: f64) -> Self {
        Transform {
            x: px,
            y: 0.0,
            scale: 1.0,
        }
    }

    /// Add a uniform scale to an existing translation
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn is_identity(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.scale == 1.0
    }

    /// Render as a CSS transform value, e.g. `translate3d(0, 60px, 0)` or
    /// `translate3d(50px, 0, 0) scale(0.9)`.
    pub fn to_css(&self) -> String {
        let mut css = format!("translate3d({}px, {}px, 0)", self.x, self.y);
        if self.scale != 1.0 {
            css.push_str(&format!(" scale({})", self.scale));
        }
        css
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Inline style slots written by the effects. `None` means the property was
/// never assigned, mirroring an element whose `style` attribute is untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InlineStyle {
    pub opacity: Option<f64>,
    pub transform: Option<Transform>,
    pub transition: Option<String>,
    pub will_change: Option<String>,
}

impl InlineStyle {
    /// Render the assigned properties as a `style`-attribute string.
    pub fn css_text(&self) -> String {
        let mut parts = Vec::new();
        if let Some(op) = self.opacity {
            parts.push(format!("opacity: {}", op));
        }
        if let Some(tr) = &self.transform {
            parts.push(format!("transform: {}", tr.to_css()));
        }
        if let Some(t) = &self.transition {
            parts.push(format!("transition: {}", t));
        }
        if let Some(w) = &self.will_change {
            parts.push(format!("will-change: {}", w));
        }
        parts.join("; ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_css_rendering() {
        assert_eq!(Transform::translate_y(60.0).to_css(), "translate3d(0px, 60px, 0)");
        assert_eq!(Transform::translate_x(-50.0).to_css(), "translate3d(-50px, 0px, 0)");
        assert_eq!(
            Transform::translate_x(50.0).with_scale(0.9).to_css(),
            "translate3d(50px, 0px, 0) scale(0.9)"
        );
        assert_eq!(Transform::IDENTITY.to_css(), "translate3d(0px, 0px, 0)");
        assert!(Transform::IDENTITY.is_identity());
        assert!(!Transform::translate_y(1.0).is_identity());
    }

    #[test]
    fn style_css_text_lists_assigned_properties_only() {
        let mut style = InlineStyle::default();
        assert_eq!(style.css_text(), "");

        style.opacity = Some(0.35);
        style.transform = Some(Transform::translate_y(30.0));
        let css = style.css_text();
        assert_eq!(css, "opacity: 0.35; transform: translate3d(0px, 30px, 0)");

        style.will_change = Some("transform, opacity".to_string());
        assert!(style.css_text().ends_with("will-change: transform, opacity"));
    }
}
