//! Frame coalescing for fade triggers

use serde::{Deserialize, Serialize};

use super::engine::{CardFrame, FadeEngine};
use super::geometry::{CardGeometry, Viewport};

/// Host events that can change card geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FadeTrigger {
    Scroll,
    Resize,
    OrientationChange,
    /// Page finished loading (images settled); recomputed right away
    Load,
}

/// What the host should do after a trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Schedule {
    /// Recompute now, outside the frame cycle
    Immediate,
    /// Wait for the next frame; an earlier pending request was replaced
    Replaced,
    /// Wait for the next frame
    Queued,
}

/// Keeps at most one recompute pending per frame
#[derive(Debug, Default, Clone)]
pub struct FrameScheduler {
    pending: Option<FadeTrigger>,
    coalesced: u64,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notify(&mut self, trigger: FadeTrigger) -> Schedule {
        if trigger == FadeTrigger::Load {
            return Schedule::Immediate;
        }

        match self.pending.replace(trigger) {
            Some(_) => {
                self.coalesced += 1;
                Schedule::Replaced
            }
            None => Schedule::Queued,
        }
    }

    pub fn pending(&self) -> Option<FadeTrigger> {
        self.pending
    }

    /// Triggers dropped because a newer one replaced them
    pub fn coalesced(&self) -> u64 {
        self.coalesced
    }

    /// Run the pending recompute, if any, for this frame
    pub fn frame(
        &mut self,
        engine: &mut FadeEngine,
        viewport: &Viewport,
        cards: &[CardGeometry],
    ) -> Option<(FadeTrigger, Vec<CardFrame>)> {
        let trigger = self.pending.take()?;
        Some((trigger, engine.recompute(viewport, cards)))
    }
}
