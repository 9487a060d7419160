//! Scroll-coverage fade for the landing page cards
//!
//! Every frame the host measures each card and its media frame, and the
//! engine turns that geometry into an opacity:
//!
//! ```text
//! coverage = 1 - max(0, media.top) / viewport_height      (0 once off-screen)
//! t        = clamp((coverage - START) / (END - START), 0, 1) ^ EASE
//! opacity  = 1 - t, constrained by scroll direction and the hidden latch
//! ```
//!
//! While scrolling down a sticky card can only get dimmer, while scrolling up
//! only brighter. Once it has faded out completely it stays hidden until the
//! user scrolls back past the end threshold, see [`Latch`].
//!
//! The engine is single-threaded and owns all per-card state; [`FrameScheduler`]
//! coalesces the scroll, resize and orientation triggers into one recompute
//! per frame.

pub mod config;
pub mod engine;
pub mod geometry;
pub mod latch;
pub mod scheduler;
pub mod trace;

pub use config::{parse_sticky_offset, FadeConfig, DEFAULT_STICKY_OFFSET_PX};
pub use engine::{advance, CardFrame, CardState, Direction, FadeEngine, Phase};
pub use geometry::{coverage, CardGeometry, Viewport};
pub use latch::Latch;
pub use scheduler::{FadeTrigger, FrameScheduler, Schedule};
pub use trace::{FadeTrace, FrameReport, ObserverReport, TraceFrame, TraceIntersection, VideoReport};
