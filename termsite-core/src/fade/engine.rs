use serde::Serialize;
use std::collections::{HashMap, HashSet};

use super::config::{parse_sticky_offset, FadeConfig, INTERACTIVE_MIN_OPACITY};
use super::geometry::{coverage, CardGeometry, Viewport};
use super::latch::Latch;
use crate::config::FadeSettings;

/// Per-card state carried between frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardState {
    pub last_opacity: f64,
    pub latch: Latch,
    /// `None` until the first frame has been computed
    pub prev_coverage: Option<f64>,
}

impl Default for CardState {
    fn default() -> Self {
        Self { last_opacity: 1.0, latch: Latch::Open, prev_coverage: None }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Coverage grew or stayed put
    Down,
    Up,
}

/// What the card looks like after a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Visible,
    FadingDown,
    LockedHidden,
    FadingUp,
}

/// Result of one frame for one card
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardFrame {
    pub id: String,
    pub coverage: f64,
    pub opacity: f64,
    /// Whether the card's actions accept pointer events
    pub interactive: bool,
    pub sticky: bool,
    pub direction: Direction,
    pub phase: Phase,
}

/// Advance one card by one frame
///
/// Pure: the previous state and this frame's measurements in, the next state
/// and the frame result out.
pub fn advance(
    config: &FadeConfig,
    state: &CardState,
    sticky_offset: f64,
    viewport_height: f64,
    id: &str,
    card_top: f64,
    media_top: f64,
) -> (CardState, CardFrame) {
    let coverage = coverage(media_top, viewport_height);
    let prev_coverage = state.prev_coverage.unwrap_or(coverage);
    let direction = if coverage >= prev_coverage { Direction::Down } else { Direction::Up };
    let sticky = card_top <= sticky_offset + 1.0;

    let computed = config.eased_opacity(coverage);
    let prev_opacity = state.last_opacity;

    let latch = match direction {
        Direction::Down => state.latch.on_down(sticky, prev_opacity.min(computed)),
        Direction::Up => state.latch.on_up(coverage, prev_coverage, config.high_water()),
    };

    let opacity = if !sticky {
        if latch.is_locked() || coverage >= config.end {
            0.0
        } else {
            1.0
        }
    } else {
        match direction {
            Direction::Down => prev_opacity.min(computed),
            Direction::Up if latch.is_locked() => 0.0,
            Direction::Up => prev_opacity.max(computed),
        }
    };

    let phase = if latch.is_locked() {
        Phase::LockedHidden
    } else if opacity >= 1.0 {
        Phase::Visible
    } else if direction == Direction::Down {
        Phase::FadingDown
    } else {
        Phase::FadingUp
    };

    let next = CardState { last_opacity: opacity, latch, prev_coverage: Some(coverage) };
    let frame = CardFrame {
        id: id.to_string(),
        coverage,
        opacity,
        interactive: opacity >= INTERACTIVE_MIN_OPACITY,
        sticky,
        direction,
        phase,
    };
    (next, frame)
}

/// Tracks every rendered card by its section id
#[derive(Debug, Clone)]
pub struct FadeEngine {
    sticky_offset: f64,
    cards: HashMap<String, CardState>,
}

impl Default for FadeEngine {
    fn default() -> Self {
        Self::new(parse_sticky_offset(None))
    }
}

impl FadeEngine {
    pub fn new(sticky_offset: f64) -> Self {
        Self { sticky_offset, cards: HashMap::new() }
    }

    pub fn from_settings(settings: &FadeSettings) -> Self {
        Self::new(settings.sticky_offset())
    }

    /// Use the raw `--card-sticky-top` value, e.g. `"88px"`
    pub fn with_sticky_property(mut self, raw: Option<&str>) -> Self {
        self.sticky_offset = parse_sticky_offset(raw);
        self
    }

    pub fn sticky_offset(&self) -> f64 {
        self.sticky_offset
    }

    pub fn set_sticky_offset(&mut self, offset: f64) {
        self.sticky_offset = offset;
    }

    /// Start tracking a freshly rendered card, resetting any previous state
    pub fn register(&mut self, id: impl Into<String>) {
        self.cards.insert(id.into(), CardState::default());
    }

    pub fn forget(&mut self, id: &str) -> Option<CardState> {
        self.cards.remove(id)
    }

    pub fn state(&self, id: &str) -> Option<&CardState> {
        self.cards.get(id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Recompute every card for the current frame
    ///
    /// Cards without a media frame are skipped and their state left alone.
    /// Unknown ids are tracked from their first frame on. An id repeated
    /// within one frame is ignored after its first occurrence.
    pub fn recompute(&mut self, viewport: &Viewport, cards: &[CardGeometry]) -> Vec<CardFrame> {
        let config = FadeConfig::for_viewport(viewport);
        let vh = viewport.effective_height();

        let mut frames = Vec::with_capacity(cards.len());
        let mut seen: HashSet<&str> = HashSet::with_capacity(cards.len());
        for card in cards {
            let Some(media_top) = card.media_top else {
                continue;
            };
            if !seen.insert(card.id.as_str()) {
                log::warn!("Card {} measured twice in one frame; keeping the first", card.id);
                continue;
            }

            let state = self.cards.entry(card.id.clone()).or_default();
            let (next, frame) =
                advance(&config, state, self.sticky_offset, vh, &card.id, card.card_top, media_top);
            *state = next;
            frames.push(frame);
        }

        log::trace!("Recomputed fade for {} of {} cards", frames.len(), cards.len());
        frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fade::config::LOCK_THRESHOLD;

    const VH: f64 = 1000.0;

    fn viewport() -> Viewport {
        Viewport::new(1280.0, VH)
    }

    // Sticky card whose media frame sits at the given coverage
    fn sticky_at(coverage: f64) -> CardGeometry {
        CardGeometry::new("hero", 40.0, (1.0 - coverage) * VH)
    }

    fn run(engine: &mut FadeEngine, coverages: &[f64]) -> Vec<CardFrame> {
        coverages
            .iter()
            .map(|c| engine.recompute(&viewport(), &[sticky_at(*c)]).remove(0))
            .collect()
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_down_then_up_sequence() {
        let mut engine = FadeEngine::default();
        let frames = run(&mut engine, &[0.0, 0.3, 0.5, 0.7, 0.5, 0.3]);
        let opacities: Vec<f64> = frames.iter().map(|f| f.opacity).collect();

        let expected = [1.0, 1.0, 0.898807, 0.0, 0.898807, 1.0];
        for (got, want) in opacities.iter().zip(expected) {
            assert!(approx(*got, want), "{:?}", opacities);
        }
        assert_eq!(frames[3].phase, Phase::LockedHidden);
        assert_eq!(frames[4].phase, Phase::FadingUp);
        assert_eq!(frames[5].phase, Phase::Visible);
        assert_eq!(engine.state("hero").map(|s| s.latch), Some(Latch::Open));
    }

    #[test]
    fn test_first_frame_counts_as_down() {
        let mut engine = FadeEngine::default();
        let frame = engine.recompute(&viewport(), &[sticky_at(0.8)]).remove(0);
        assert_eq!(frame.direction, Direction::Down);
        assert_eq!(frame.opacity, 0.0);
        assert_eq!(frame.phase, Phase::LockedHidden);
    }

    #[test]
    fn test_downward_frames_never_brighten() {
        let mut engine = FadeEngine::default();
        let frames = run(&mut engine, &[0.41, 0.45, 0.45, 0.52, 0.58, 0.6, 0.63]);
        for pair in frames.windows(2) {
            assert!(pair[1].opacity <= pair[0].opacity);
        }
    }

    #[test]
    fn test_upward_frames_never_dim() {
        let mut engine = FadeEngine::default();
        run(&mut engine, &[0.62]);
        let frames = run(&mut engine, &[0.6, 0.55, 0.5, 0.42, 0.1]);
        for pair in frames.windows(2) {
            assert!(pair[1].opacity >= pair[0].opacity);
        }
        assert_eq!(frames.last().map(|f| f.opacity), Some(1.0));
    }

    #[test]
    fn test_lock_holds_until_crossing_from_above() {
        let mut engine = FadeEngine::default();
        run(&mut engine, &[0.5, 0.9]);
        assert!(engine.state("hero").map(|s| s.latch.is_locked()).unwrap_or(false));

        // Upward frames that stay above the high-water mark keep it hidden
        let frames = run(&mut engine, &[0.8, 0.7, 0.65]);
        assert!(frames.iter().all(|f| f.opacity == 0.0));

        let frames = run(&mut engine, &[0.6, 0.5]);
        assert!(frames[0].opacity > 0.0);
        assert!(frames[1].opacity > frames[0].opacity);
    }

    #[test]
    fn test_first_upward_frame_marks_seen_high() {
        let mut engine = FadeEngine::default();
        engine.register("hero");
        let frames = run(&mut engine, &[0.3, 0.66, 0.66]);
        assert_eq!(frames[1].opacity, 0.0);
        assert_eq!(engine.state("hero").map(|s| s.latch), Some(Latch::Locked));

        let frames = run(&mut engine, &[0.65]);
        assert_eq!(frames[0].opacity, 0.0);
        assert_eq!(engine.state("hero").map(|s| s.latch), Some(Latch::LockedSeenHigh));
    }

    #[test]
    fn test_not_sticky_card_is_binary() {
        let mut engine = FadeEngine::default();
        let vp = viewport();
        let below = |c: f64| CardGeometry::new("cta", 300.0, (1.0 - c) * VH);

        assert_eq!(engine.recompute(&vp, &[below(0.5)])[0].opacity, 1.0);
        assert_eq!(engine.recompute(&vp, &[below(0.64)])[0].opacity, 1.0);
        assert_eq!(engine.recompute(&vp, &[below(0.7)])[0].opacity, 0.0);
        assert!(!engine.state("cta").map(|s| s.latch.is_locked()).unwrap_or(true));
        assert_eq!(engine.recompute(&vp, &[below(0.2)])[0].opacity, 1.0);
    }

    #[test]
    fn test_sticky_threshold_includes_one_pixel() {
        let mut engine = FadeEngine::new(88.0);
        let frame = engine.recompute(&viewport(), &[CardGeometry::new("a", 89.0, 500.0)]).remove(0);
        assert!(frame.sticky);
        let frame = engine.recompute(&viewport(), &[CardGeometry::new("b", 89.5, 500.0)]).remove(0);
        assert!(!frame.sticky);
    }

    #[test]
    fn test_interactivity_follows_opacity() {
        let mut engine = FadeEngine::default();
        let frames = run(&mut engine, &[0.5, 0.6, 0.62]);
        assert!(frames[0].interactive);
        assert!(frames.iter().any(|f| !f.interactive));
        for f in &frames {
            assert_eq!(f.interactive, f.opacity >= 0.5);
        }
    }

    #[test]
    fn test_cards_without_media_are_skipped() {
        let mut engine = FadeEngine::default();
        engine.register("text-only");
        let frames = engine.recompute(
            &viewport(),
            &[CardGeometry::without_media("text-only", 0.0), sticky_at(0.9)],
        );
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].id, "hero");
        assert_eq!(engine.state("text-only"), Some(&CardState::default()));
    }

    #[test]
    fn test_cards_are_independent() {
        let mut engine = FadeEngine::default();
        let vp = viewport();
        let frames = engine.recompute(
            &vp,
            &[CardGeometry::new("one", 0.0, 0.0), CardGeometry::new("two", 400.0, 900.0)],
        );
        assert_eq!(frames[0].opacity, 0.0);
        assert_eq!(frames[1].opacity, 1.0);
        assert_eq!(engine.len(), 2);
        assert!(engine.forget("one").is_some());
        assert_eq!(engine.len(), 1);
    }

    // xorshift random walk over coverage, steps of at most 0.15
    fn coverage_walk(seed: u64, len: usize) -> Vec<f64> {
        let mut state = seed;
        let mut coverage = 0.0_f64;
        (0..len)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                let step = ((state % 2001) as f64 / 1000.0 - 1.0) * 0.15;
                coverage = (coverage + step).clamp(0.0, 1.0);
                coverage
            })
            .collect()
    }

    #[test]
    fn test_generated_walks_stay_monotonic_while_unlocked() {
        for seed in 1..=250_u64 {
            let mut engine = FadeEngine::default();
            let frames = run(&mut engine, &coverage_walk(seed, 80));

            for (i, pair) in frames.windows(2).enumerate() {
                let (prev, cur) = (&pair[0], &pair[1]);
                assert!(cur.sticky);
                if cur.phase == Phase::LockedHidden {
                    assert!(cur.opacity <= LOCK_THRESHOLD, "seed {} frame {}: {:?}", seed, i + 1, cur);
                    continue;
                }
                if prev.phase == Phase::LockedHidden {
                    continue;
                }
                match cur.direction {
                    Direction::Down => assert!(
                        cur.opacity <= prev.opacity,
                        "seed {} frame {}: brightened on the way down {:?} -> {:?}",
                        seed,
                        i + 1,
                        prev,
                        cur
                    ),
                    Direction::Up => assert!(
                        cur.opacity >= prev.opacity,
                        "seed {} frame {}: dimmed on the way up {:?} -> {:?}",
                        seed,
                        i + 1,
                        prev,
                        cur
                    ),
                }
            }
        }
    }

    #[test]
    fn test_walks_reach_both_directions_and_the_lock() {
        let mut directions = HashSet::new();
        let mut locked = false;
        for seed in 1..=250_u64 {
            let mut engine = FadeEngine::default();
            for frame in run(&mut engine, &coverage_walk(seed, 80)) {
                directions.insert(frame.direction == Direction::Down);
                locked |= frame.phase == Phase::LockedHidden;
            }
        }
        assert_eq!(directions.len(), 2);
        assert!(locked);
    }

    #[test]
    fn test_repeated_id_in_one_frame_keeps_first() {
        let mut engine = FadeEngine::default();
        let frames = engine.recompute(
            &viewport(),
            &[CardGeometry::new("a", 40.0, 0.0), CardGeometry::new("a", 900.0, VH)],
        );
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].phase, Phase::LockedHidden);
        assert_eq!(engine.state("a").and_then(|s| s.prev_coverage), Some(1.0));
    }

    #[test]
    fn test_sticky_property_override() {
        let engine = FadeEngine::default().with_sticky_property(Some("120px"));
        assert_eq!(engine.sticky_offset(), 120.0);
        let engine = FadeEngine::from_settings(&FadeSettings::default());
        assert_eq!(engine.sticky_offset(), 88.0);
    }
}
