//! Scripted geometry traces replayed through the engine
//!
//! A trace is JSON:
//!
//! ```json
//! {
//!   "sticky_top": "88px",
//!   "viewport": { "width": 1280, "height": 800 },
//!   "frames": [
//!     { "events": ["scroll", "scroll"], "cards": [{ "id": "hero", "card_top": 88, "media_top": 400 }] }
//!   ]
//! }
//! ```
//!
//! Each entry in `frames` is one rendered frame; its `events` arrive before
//! the frame and are coalesced by a [`FrameScheduler`]. A frame may also list
//! `intersections` (`{ "id", "is_intersecting", "ratio", "video"?,
//! "autoplay_blocked"? }`) which drive reveal-on-scroll and video autoplay
//! through [`FadeTrace::replay_observers`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::render::observe::{Intersection, MotionEnv, RevealTracker, VideoAutoplay, VideoCommand};

use super::config::parse_sticky_offset;
use super::engine::{CardFrame, FadeEngine};
use super::geometry::{CardGeometry, Viewport};
use super::scheduler::{FadeTrigger, FrameScheduler, Schedule};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FadeTrace {
    /// Raw `--card-sticky-top` value; the engine's own offset when absent
    #[serde(default)]
    pub sticky_top: Option<String>,
    pub viewport: Viewport,
    /// Host prefers reduced motion; sections reveal as soon as they are measured
    #[serde(default)]
    pub reduced_motion: bool,
    pub frames: Vec<TraceFrame>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceFrame {
    #[serde(default = "default_events")]
    pub events: Vec<FadeTrigger>,
    /// Replaces the viewport from this frame on
    #[serde(default)]
    pub viewport: Option<Viewport>,
    pub cards: Vec<CardGeometry>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub intersections: Vec<TraceIntersection>,
}

/// Intersection observer entry for one section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceIntersection {
    pub id: String,
    #[serde(flatten)]
    pub entry: Intersection,
    /// The section's media is a video
    #[serde(default)]
    pub video: bool,
    /// The host refuses `play()` (autoplay policy)
    #[serde(default)]
    pub autoplay_blocked: bool,
}

fn default_events() -> Vec<FadeTrigger> {
    vec![FadeTrigger::Scroll]
}

/// One recompute observed during a replay
#[derive(Debug, Clone, Serialize)]
pub struct FrameReport {
    /// Index into the trace's `frames`
    pub frame: usize,
    pub trigger: FadeTrigger,
    pub cards: Vec<CardFrame>,
}

/// Reveals and video commands produced by one traced frame
#[derive(Debug, Clone, Default, Serialize)]
pub struct ObserverReport {
    pub frame: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub revealed: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub videos: Vec<VideoReport>,
}

impl ObserverReport {
    fn is_empty(&self) -> bool {
        self.revealed.is_empty() && self.videos.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoReport {
    pub id: String,
    pub command: VideoCommand,
    /// Whether the video ended up playing; rejected `play()` calls leave it paused
    pub playing: bool,
}

impl FadeTrace {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read trace file: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse trace file: {}", path.display()))
    }

    /// Replay with a fresh engine using the trace's sticky offset
    pub fn replay(&self) -> Vec<FrameReport> {
        self.replay_with(&mut FadeEngine::default())
    }

    /// Replay through an existing engine
    ///
    /// `sticky_top` is applied only when the trace sets it.
    pub fn replay_with(&self, engine: &mut FadeEngine) -> Vec<FrameReport> {
        if let Some(raw) = self.sticky_top.as_deref() {
            engine.set_sticky_offset(parse_sticky_offset(Some(raw)));
        }

        let mut scheduler = FrameScheduler::new();
        let mut viewport = self.viewport;
        let mut reports = Vec::new();

        for (index, frame) in self.frames.iter().enumerate() {
            if let Some(vp) = frame.viewport {
                viewport = vp;
            }

            for event in &frame.events {
                if scheduler.notify(*event) == Schedule::Immediate {
                    reports.push(FrameReport {
                        frame: index,
                        trigger: *event,
                        cards: engine.recompute(&viewport, &frame.cards),
                    });
                }
            }

            if let Some((trigger, cards)) = scheduler.frame(engine, &viewport, &frame.cards) {
                reports.push(FrameReport { frame: index, trigger, cards });
            }
        }

        log::debug!(
            "Replayed {} frames into {} recomputes ({} triggers coalesced)",
            self.frames.len(),
            reports.len(),
            scheduler.coalesced()
        );
        reports
    }

    /// Replay the frames' intersection entries through reveal and autoplay
    ///
    /// Sections are observed from the first frame that measures or
    /// intersects them. Only frames with an outcome are reported.
    pub fn replay_observers(&self) -> Vec<ObserverReport> {
        let motion = MotionEnv { prefers_reduced_motion: self.reduced_motion, ..MotionEnv::default() };
        let mut reveal = RevealTracker::for_sections(motion);
        let mut videos = VideoAutoplay::new();
        let mut reports = Vec::new();

        for (index, frame) in self.frames.iter().enumerate() {
            let mut report = ObserverReport { frame: index, ..ObserverReport::default() };

            let ids = frame.cards.iter().map(|c| &c.id).chain(frame.intersections.iter().map(|i| &i.id));
            for id in ids {
                if !reveal.is_observing(id) && !reveal.is_visible(id) && reveal.observe(id.as_str()) {
                    report.revealed.push(id.clone());
                }
            }

            for hit in &frame.intersections {
                if reveal.on_intersection(&hit.id, hit.entry) {
                    report.revealed.push(hit.id.clone());
                }
                if hit.video {
                    let blocked = hit.autoplay_blocked;
                    let command = videos.on_intersection(&hit.id, hit.entry, |command| {
                        if blocked && command == VideoCommand::Play {
                            Err("autoplay blocked")
                        } else {
                            Ok(())
                        }
                    });
                    report.videos.push(VideoReport {
                        id: hit.id.clone(),
                        command,
                        playing: videos.is_playing(&hit.id),
                    });
                }
            }

            if !report.is_empty() {
                reports.push(report);
            }
        }
        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACE: &str = r#"{
        "sticky_top": "100px",
        "viewport": { "width": 1280, "height": 1000 },
        "frames": [
            { "cards": [{ "id": "hero", "card_top": 100, "media_top": 1000 }] },
            { "events": ["scroll", "scroll", "scroll"],
              "cards": [{ "id": "hero", "card_top": 100, "media_top": 500 }] },
            { "events": ["load"],
              "cards": [{ "id": "hero", "card_top": 100, "media_top": 300 }] },
            { "events": [],
              "cards": [{ "id": "hero", "card_top": 100, "media_top": 0 }] }
        ]
    }"#;

    #[test]
    fn test_replay_coalesces_and_runs_load_immediately() {
        let trace = FadeTrace::from_json(TRACE).unwrap();
        let reports = trace.replay();

        let summary: Vec<(usize, FadeTrigger)> = reports.iter().map(|r| (r.frame, r.trigger)).collect();
        assert_eq!(
            summary,
            vec![(0, FadeTrigger::Scroll), (1, FadeTrigger::Scroll), (2, FadeTrigger::Load)]
        );
        assert_eq!(reports[2].cards[0].opacity, 0.0);
    }

    #[test]
    fn test_sticky_top_from_trace() {
        let trace = FadeTrace::from_json(TRACE).unwrap();
        let reports = trace.replay();
        assert!(reports[0].cards[0].sticky);

        let mut plain = trace.clone();
        plain.sticky_top = None;
        let mut engine = FadeEngine::new(50.0);
        let reports = plain.replay_with(&mut engine);
        assert!(!reports[0].cards[0].sticky);
    }

    const OBSERVED: &str = r#"{
        "viewport": { "width": 1280, "height": 1000 },
        "frames": [
            { "cards": [{ "id": "overview", "card_top": 300, "media_top": 900 }],
              "intersections": [{ "id": "overview", "is_intersecting": true, "ratio": 0.2 }] },
            { "cards": [{ "id": "overview", "card_top": 200, "media_top": 700 }],
              "intersections": [
                  { "id": "overview", "is_intersecting": true, "ratio": 0.4 },
                  { "id": "demo", "is_intersecting": true, "ratio": 0.6, "video": true, "autoplay_blocked": true }
              ] },
            { "cards": [],
              "intersections": [
                  { "id": "overview", "is_intersecting": true, "ratio": 0.9 },
                  { "id": "demo", "is_intersecting": true, "ratio": 0.7, "video": true }
              ] },
            { "cards": [],
              "intersections": [{ "id": "demo", "is_intersecting": false, "ratio": 0.0, "video": true }] }
        ]
    }"#;

    #[test]
    fn test_observer_replay_reveals_once_and_drives_video() {
        let trace = FadeTrace::from_json(OBSERVED).unwrap();
        let reports = trace.replay_observers();

        let frames: Vec<usize> = reports.iter().map(|r| r.frame).collect();
        assert_eq!(frames, vec![1, 2, 3]);

        assert_eq!(reports[0].revealed, vec!["overview".to_string(), "demo".to_string()]);
        assert_eq!(
            reports[0].videos,
            vec![VideoReport { id: "demo".into(), command: VideoCommand::Play, playing: false }]
        );
        assert!(reports[1].revealed.is_empty());
        assert!(reports[1].videos[0].playing);
        assert_eq!(reports[2].videos[0].command, VideoCommand::Pause);
        assert!(!reports[2].videos[0].playing);
    }

    #[test]
    fn test_reduced_motion_reveals_on_first_measure() {
        let mut trace = FadeTrace::from_json(OBSERVED).unwrap();
        trace.reduced_motion = true;
        let reports = trace.replay_observers();
        assert_eq!(reports[0].frame, 0);
        assert_eq!(reports[0].revealed, vec!["overview".to_string()]);
        assert_eq!(reports[1].revealed, vec!["demo".to_string()]);
    }

    #[test]
    fn test_missing_file_names_path() {
        let err = FadeTrace::from_file("/nonexistent/trace.json").unwrap_err();
        assert!(format!("{:#}", err).contains("/nonexistent/trace.json"));
    }
}
