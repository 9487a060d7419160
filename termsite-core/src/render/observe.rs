//! Intersection-driven behaviour: reveal-on-scroll and video autoplay

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

use super::node::Element;

/// Sections reveal once this share of them is on screen
pub const SECTION_REVEAL_THRESHOLD: f64 = 0.35;
pub const FAQ_REVEAL_THRESHOLD: f64 = 0.1;
/// Videos play while at least half visible
pub const VIDEO_PLAY_THRESHOLD: f64 = 0.5;

pub const VISIBLE_CLASS: &str = "is-visible";

/// One intersection observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Intersection {
    pub is_intersecting: bool,
    pub ratio: f64,
}

impl Intersection {
    pub fn new(is_intersecting: bool, ratio: f64) -> Self {
        Self { is_intersecting, ratio }
    }

    pub fn hidden() -> Self {
        Self { is_intersecting: false, ratio: 0.0 }
    }

    fn reaches(&self, threshold: f64) -> bool {
        self.is_intersecting && self.ratio >= threshold
    }
}

/// What the host can offer for reveal animations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MotionEnv {
    pub prefers_reduced_motion: bool,
    pub has_intersection_observer: bool,
}

impl Default for MotionEnv {
    fn default() -> Self {
        Self { prefers_reduced_motion: false, has_intersection_observer: true }
    }
}

impl MotionEnv {
    fn animates(&self) -> bool {
        !self.prefers_reduced_motion && self.has_intersection_observer
    }
}

/// One-shot reveal tracking; an item stays visible once revealed
#[derive(Debug, Clone)]
pub struct RevealTracker {
    threshold: f64,
    animate: bool,
    observed: HashSet<String>,
    visible: HashSet<String>,
}

impl RevealTracker {
    pub fn new(threshold: f64, env: MotionEnv) -> Self {
        Self { threshold, animate: env.animates(), observed: HashSet::new(), visible: HashSet::new() }
    }

    pub fn for_sections(env: MotionEnv) -> Self {
        Self::new(SECTION_REVEAL_THRESHOLD, env)
    }

    pub fn for_faq(env: MotionEnv) -> Self {
        Self::new(FAQ_REVEAL_THRESHOLD, env)
    }

    /// Start watching an item; returns true when it is visible right away
    pub fn observe(&mut self, id: impl Into<String>) -> bool {
        let id = id.into();
        if self.animate {
            self.observed.insert(id);
            false
        } else {
            self.visible.insert(id);
            true
        }
    }

    /// Returns true when this observation revealed the item
    pub fn on_intersection(&mut self, id: &str, entry: Intersection) -> bool {
        if !entry.reaches(self.threshold) || !self.observed.remove(id) {
            return false;
        }
        self.visible.insert(id.to_string());
        true
    }

    pub fn is_visible(&self, id: &str) -> bool {
        self.visible.contains(id)
    }

    pub fn is_observing(&self, id: &str) -> bool {
        self.observed.contains(id)
    }

    /// Mark revealed elements with the visible class
    pub fn apply<'a, I>(&self, elements: I)
    where
        I: IntoIterator<Item = &'a mut Element>,
    {
        for element in elements {
            let visible = element.element_id().map(|id| self.visible.contains(id)).unwrap_or(false);
            if visible {
                element.add_class(VISIBLE_CLASS);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoCommand {
    Play,
    Pause,
}

/// Decide playback for one observation
pub fn video_command(entry: Intersection) -> VideoCommand {
    if entry.reaches(VIDEO_PLAY_THRESHOLD) {
        VideoCommand::Play
    } else {
        VideoCommand::Pause
    }
}

/// Playback state for every video on the page
#[derive(Debug, Clone, Default)]
pub struct VideoAutoplay {
    playing: HashMap<String, bool>,
}

impl VideoAutoplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed an observation, forwarding the command to `player`
    ///
    /// A failed play (for example blocked by an autoplay policy) leaves the
    /// video paused and is otherwise ignored.
    pub fn on_intersection<F, E>(&mut self, id: &str, entry: Intersection, player: F) -> VideoCommand
    where
        F: FnOnce(VideoCommand) -> Result<(), E>,
        E: std::fmt::Display,
    {
        let command = video_command(entry);
        let playing = match player(command) {
            Ok(()) => command == VideoCommand::Play,
            Err(e) => {
                log::debug!("Playback of {} rejected: {}", id, e);
                false
            }
        };
        self.playing.insert(id.to_string(), playing);
        command
    }

    pub fn is_playing(&self, id: &str) -> bool {
        self.playing.get(id).copied().unwrap_or(false)
    }
}
