//! FAQ list and fragment navigation
//!
//! [`AnchorNavigator`] models the deep-link behaviour as a timer-driven state
//! machine. The host forwards the initial fragment and later fragment changes,
//! advances the clock, and applies the scroll requests it gets back.

use std::collections::HashSet;
use std::time::Duration;

use super::content::FaqItem;
use super::node::Element;

/// Delay between the fragment being handled and the scroll
pub const SCROLL_DELAY: Duration = Duration::from_millis(100);
/// How long a targeted item keeps the `highlighted` class
pub const HIGHLIGHT_DURATION: Duration = Duration::from_millis(2000);
/// Header height assumed when the page has none (or it measures 0)
pub const DEFAULT_HEADER_HEIGHT: f64 = 60.0;
/// Extra space kept between the header and the item
pub const SCROLL_MARGIN: f64 = 20.0;

pub const HIGHLIGHT_CLASS: &str = "highlighted";

pub fn faq_id(item: &FaqItem, index: usize) -> String {
    match &item.id {
        Some(id) => id.clone(),
        None => format!("faq-{}", index + 1),
    }
}

pub fn render_faq_item(item: &FaqItem, index: usize) -> Element {
    Element::new("div")
        .class("faq-item")
        .id(faq_id(item, index))
        .child(Element::new("h2").class("faq-question").text(item.question.as_str()))
        .child(Element::new("div").class("faq-answer").raw(item.answer.as_str()))
}

pub fn render_faq(items: &[FaqItem]) -> Vec<Element> {
    items.iter().enumerate().map(|(i, item)| render_faq_item(item, i)).collect()
}

/// Layout queries answered by the host when a scroll fires
pub trait PageLayout {
    /// Top of the element relative to the viewport
    fn element_top(&self, id: &str) -> Option<f64>;
    fn scroll_y(&self) -> f64;
    /// Height of `.site-header`, `None` when there is no header
    fn header_height(&self) -> Option<f64>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollRequest {
    pub top: f64,
    pub smooth: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TimerAction {
    HandleFragment(String),
    ScrollTo(String),
    ClearHighlight(String),
}

#[derive(Debug, Clone)]
struct Timer {
    due: Duration,
    seq: u64,
    action: TimerAction,
}

/// Highlight-and-scroll handling for `#fragment` links to FAQ items
#[derive(Debug, Clone, Default)]
pub struct AnchorNavigator {
    items: HashSet<String>,
    highlighted: HashSet<String>,
    timers: Vec<Timer>,
    now: Duration,
    seq: u64,
}

impl AnchorNavigator {
    pub fn new<I, S>(item_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { items: item_ids.into_iter().map(Into::into).collect(), ..Self::default() }
    }

    /// Navigator for the items `render_faq` produces
    pub fn for_items(items: &[FaqItem]) -> Self {
        Self::new(items.iter().enumerate().map(|(i, item)| faq_id(item, i)))
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn is_highlighted(&self, id: &str) -> bool {
        self.highlighted.contains(id)
    }

    pub fn highlighted(&self) -> impl Iterator<Item = &str> {
        self.highlighted.iter().map(String::as_str)
    }

    /// Page finished rendering with the given location hash (with or without `#`)
    pub fn on_load(&mut self, hash: &str) {
        if let Some(target) = fragment(hash) {
            self.schedule(SCROLL_DELAY, TimerAction::HandleFragment(target.to_string()));
        }
    }

    pub fn on_hash_change(&mut self, hash: &str) {
        if let Some(target) = fragment(hash) {
            self.handle(target.to_string());
        }
    }

    /// Move the clock forward, firing due timers in order
    pub fn advance(&mut self, elapsed: Duration, layout: &dyn PageLayout) -> Vec<ScrollRequest> {
        let deadline = self.now + elapsed;
        let mut scrolls = Vec::new();

        while let Some(pos) = self.next_due(deadline) {
            let timer = self.timers.remove(pos);
            self.now = timer.due;
            match timer.action {
                TimerAction::HandleFragment(id) => self.handle(id),
                TimerAction::ScrollTo(id) => {
                    if let Some(request) = scroll_target(&id, layout) {
                        scrolls.push(request);
                    }
                }
                TimerAction::ClearHighlight(id) => {
                    self.highlighted.remove(&id);
                }
            }
        }

        self.now = deadline;
        scrolls
    }

    /// Apply the highlight state to rendered items
    pub fn apply(&self, items: &mut [Element]) {
        for item in items {
            let on = item.element_id().map(|id| self.highlighted.contains(id)).unwrap_or(false);
            if on {
                item.add_class(HIGHLIGHT_CLASS);
            } else {
                item.remove_class(HIGHLIGHT_CLASS);
            }
        }
    }

    fn handle(&mut self, id: String) {
        if !self.items.contains(&id) {
            log::debug!("Ignoring fragment #{} without a matching FAQ item", id);
            return;
        }

        self.highlighted.clear();
        self.highlighted.insert(id.clone());
        self.schedule(SCROLL_DELAY, TimerAction::ScrollTo(id.clone()));
        self.schedule(HIGHLIGHT_DURATION, TimerAction::ClearHighlight(id));
    }

    fn schedule(&mut self, delay: Duration, action: TimerAction) {
        self.seq += 1;
        self.timers.push(Timer { due: self.now + delay, seq: self.seq, action });
    }

    fn next_due(&self, deadline: Duration) -> Option<usize> {
        self.timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due <= deadline)
            .min_by_key(|(_, t)| (t.due, t.seq))
            .map(|(pos, _)| pos)
    }
}

fn fragment(hash: &str) -> Option<&str> {
    let id = hash.strip_prefix('#').unwrap_or(hash);
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

fn scroll_target(id: &str, layout: &dyn PageLayout) -> Option<ScrollRequest> {
    let top = layout.element_top(id)?;
    let header = match layout.header_height() {
        Some(h) if h > 0.0 => h,
        _ => DEFAULT_HEADER_HEIGHT,
    };
    Some(ScrollRequest { top: top + layout.scroll_y() - header - SCROLL_MARGIN, smooth: true })
}
