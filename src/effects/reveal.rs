//! One-shot reveal driver for the watched content blocks.
//!
//! At load every trackable is pushed into its hidden state and registered
//! in the watch set. On its first qualifying viewport entry the element
//! animates to rest and leaves the set for good; later scrolling in either
//! direction cannot touch it again.

use crate::dom::{RevealPhase, Trackable};
use crate::observe::{self, ObserverOptions};
use crate::style::Transform;
use crate::{RevealEvent, Viewport};

/// Owns the watch set and the reveal bookkeeping.
#[derive(Debug)]
pub struct RevealDriver {
    options: ObserverOptions,
    transition: String,
    reveal_frames: u32,
    watched: Vec<usize>,
}

impl RevealDriver {
    pub fn new(options: ObserverOptions, transition: String, reveal_frames: u32) -> Self {
        RevealDriver {
            options,
            transition,
            reveal_frames: reveal_frames.max(1),
            watched: Vec::new(),
        }
    }

    /// Indices still being watched.
    pub fn watched(&self) -> &[usize] {
        &self.watched
    }

    /// Assign every trackable its hidden state and (re)build the watch set.
    pub fn prime(&mut self, trackables: &mut [Trackable]) {
        self.watched = (0..trackables.len()).collect();
        for t in trackables.iter_mut() {
            t.style.opacity = Some(0.0);
            t.style.will_change = Some("transform, opacity".to_string());
            t.style.transition = Some(self.transition.clone());
            t.style.transform = Some(t.kind.hidden_transform());
            t.phase = RevealPhase::Hidden;
        }
    }

    /// Deliver intersections for the current scroll offset: every watched
    /// element meeting the threshold reveals and is dropped from the set.
    pub fn observe(
        &mut self,
        trackables: &mut [Trackable],
        scroll_y: f64,
        viewport: Viewport,
    ) -> Vec<RevealEvent> {
        let options = self.options;
        let reveal_frames = self.reveal_frames;
        let mut fired = Vec::new();

        self.watched.retain(|&idx| {
            let Some(t) = trackables.get_mut(idx) else {
                return false;
            };
            if !observe::is_intersecting(&t.rect, scroll_y, viewport, options) {
                return true;
            }
            t.style.transform = Some(Transform::IDENTITY);
            t.style.opacity = Some(1.0);
            t.phase = RevealPhase::Revealing {
                frames_left: reveal_frames,
            };
            fired.push(RevealEvent {
                index: idx,
                class: t.kind.class().to_string(),
            });
            false
        });

        fired
    }

    /// Advance the running reveal transitions by one frame.
    pub fn tick(&mut self, trackables: &mut [Trackable]) {
        for t in trackables.iter_mut() {
            if let RevealPhase::Revealing { frames_left } = &mut t.phase {
                *frames_left -= 1;
                if *frames_left == 0 {
                    t.phase = RevealPhase::Revealed;
                }
            }
        }
    }
}
