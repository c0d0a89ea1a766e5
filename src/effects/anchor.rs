//! Smooth anchor scrolling: an eased animation of the scroll offset toward
//! a target section's top edge, advanced one step per rendered frame.

/// A running smooth-scroll. Produces the next scroll offset on every frame
/// until the target is reached.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollAnimation {
    from: f64,
    to: f64,
    total: u32,
    frame: u32,
}

impl ScrollAnimation {
    pub fn new(from: f64, to: f64, frames: u32) -> Self {
        ScrollAnimation {
            from,
            to,
            total: frames.max(1),
            frame: 0,
        }
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    /// Advance one frame; returns the next offset and whether the animation
    /// just finished. The final step lands exactly on the target.
    pub fn step(&mut self) -> (f64, bool) {
        self.frame = (self.frame + 1).min(self.total);
        let t = f64::from(self.frame) / f64::from(self.total);
        let y = self.from + (self.to - self.from) * ease_in_out_cubic(t);
        (y, self.frame >= self.total)
    }
}

/// Number of animation frames covering a duration at the frame interval.
pub fn frames_for(duration_ms: u64, frame_interval_ms: f64) -> u32 {
    if frame_interval_ms <= 0.0 {
        return 1;
    }
    ((duration_ms as f64 / frame_interval_ms).ceil() as u32).max(1)
}

fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}
