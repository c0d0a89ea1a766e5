//! The page effects: anchor smooth-scroll, active-nav highlighting, hero
//! parallax, one-shot reveals, and the cosmetic contact-form handler.
//!
//! Each module holds the pure mechanics; the engine owns the state and
//! decides when each runs (per scroll event vs. per rendered frame).

pub mod anchor;
pub mod form;
pub mod nav;
pub mod parallax;
pub mod reveal;
