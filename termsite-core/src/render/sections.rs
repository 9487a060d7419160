//! Landing page sections

use std::collections::{HashMap, HashSet};

use super::content::{AnchorRule, MediaDescriptor, MediaKind, SectionDescriptor};
use super::node::{Element, Node};
use crate::fade::FadeEngine;

/// A rendered card as seen by the fade engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardInfo {
    pub id: String,
    /// Whether the section got a media region; cards without one never fade
    pub has_media: bool,
}

/// Rendered `#sections` children plus the cards they contain
#[derive(Debug, Clone, Default)]
pub struct SectionsView {
    pub nodes: Vec<Node>,
    pub cards: Vec<CardInfo>,
}

impl SectionsView {
    /// Start tracking every rendered card, in document order
    pub fn register_cards(&self, engine: &mut FadeEngine) {
        for card in &self.cards {
            engine.register(card.id.clone());
        }
    }

    pub fn to_html(&self) -> String {
        self.nodes.iter().map(|n| n.to_string()).collect()
    }
}

/// Id used for a section; falls back to `section-{n}` (1-based)
pub fn section_id(section: &SectionDescriptor, index: usize) -> String {
    match &section.id {
        Some(id) => id.clone(),
        None => format!("section-{}", index + 1),
    }
}

/// Section ids in document order, with repeats suffixed `-2`, `-3`, ...
///
/// Card state is keyed by these ids, so no two rendered sections may share one.
pub fn unique_section_ids(sections: &[SectionDescriptor]) -> Vec<String> {
    let mut taken: HashSet<String> = HashSet::new();
    let mut ids = Vec::with_capacity(sections.len());

    for (index, section) in sections.iter().enumerate() {
        let base = section_id(section, index);
        let mut id = base.clone();
        let mut n = 2;
        while taken.contains(&id) {
            id = format!("{}-{}", base, n);
            n += 1;
        }
        if id != base {
            log::warn!("Duplicate section id {}; rendering it as {}", base, id);
        }
        taken.insert(id.clone());
        ids.push(id);
    }
    ids
}

/// Render all sections, inserting hidden anchors before their target sections
///
/// Unusable anchor rules are ignored. When several rules name the same
/// index the last one wins.
pub fn render_sections(sections: &[SectionDescriptor], anchors: &[AnchorRule]) -> SectionsView {
    let anchor_by_index: HashMap<usize, &str> = anchors
        .iter()
        .filter(|a| a.is_usable())
        .filter_map(|a| usize::try_from(a.index).ok().map(|i| (i, a.id.as_str())))
        .collect();

    let ids = unique_section_ids(sections);
    let mut view = SectionsView::default();
    for (index, (section, id)) in sections.iter().zip(ids).enumerate() {
        if let Some(anchor_id) = anchor_by_index.get(&index) {
            view.nodes.push(anchor(anchor_id).into());
        }

        let element = section_element(section, id.clone());
        view.cards.push(CardInfo { id, has_media: element.find_class("section__media").is_some() });
        view.nodes.push(element.into());
    }
    view
}

pub fn anchor(id: &str) -> Element {
    Element::new("div").id(id).class("section-anchor").attr("aria-hidden", "true")
}

pub fn render_section(section: &SectionDescriptor, index: usize) -> Element {
    section_element(section, section_id(section, index))
}

fn section_element(section: &SectionDescriptor, id: String) -> Element {
    let mut content = Element::new("div").class("section__content");

    if let Some(eyebrow) = &section.eyebrow {
        content = content.child(Element::new("span").class("section__eyebrow").text(eyebrow.as_str()));
    }
    if let Some(title) = &section.title {
        content = content.child(Element::new("h2").class("section__title").text(title.as_str()));
    }
    if let Some(description) = &section.description {
        content =
            content.child(Element::new("p").class("section__description").text(description.as_str()));
    }

    if !section.actions.is_empty() {
        let mut actions = Element::new("div").class("section__actions");
        for action in section.actions.iter().flatten() {
            let (Some(label), Some(href)) = (&action.label, &action.href) else {
                continue;
            };
            let class = if action.is_ghost() { "button button--ghost" } else { "button" };
            actions = actions.child(Element::new("a").class(class).attr("href", href.as_str()).text(label.as_str()));
        }
        content = content.child(actions);
    }

    let mut element = Element::new("section")
        .class("section")
        .id(id)
        .child(Element::new("article").class("section-card").child(content));

    for media in &section.media {
        if let Some(wrapper) = render_media(media.as_ref()) {
            element = element.child(wrapper);
        }
    }
    element
}

/// One `div.section__media` wrapper; `None` input renders the placeholder
///
/// Returns `None` for media without a source.
pub fn render_media(media: Option<&MediaDescriptor>) -> Option<Element> {
    let inner = match media {
        None => Element::new("div").class("section__media-placeholder").attr("aria-hidden", "true"),
        Some(media) => {
            let src = media.src.as_deref()?;
            match media.kind {
                MediaKind::Video => video(media, src),
                MediaKind::Image => Element::new("img")
                    .attr("src", src)
                    .attr("alt", media.alt.as_deref().unwrap_or_default()),
            }
        }
    };

    let frame = Element::new("div").class("section__media-frame").child(inner);
    Some(Element::new("div").class("section__media").child(frame))
}

fn video(media: &MediaDescriptor, src: &str) -> Element {
    let mut el = Element::new("video").attr("src", src);
    if media.muted != Some(false) {
        el = el.flag("muted");
    }
    if media.looped != Some(false) {
        el = el.flag("loop");
    }
    if media.autoplay != Some(false) {
        el = el.flag("autoplay");
    }
    el = el.flag("playsinline").attr("aria-label", media.alt.as_deref().unwrap_or_default());
    if let Some(poster) = &media.poster {
        el = el.attr("poster", poster.as_str());
    }
    if media.controls == Some(true) {
        el = el.flag("controls");
    }
    el
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::content::{parse_entries, ActionDescriptor};

    fn sections(json: &str) -> Vec<SectionDescriptor> {
        parse_entries(json).unwrap()
    }

    #[test]
    fn test_full_section_markup() {
        let data = sections(
            r#"[{ "id": "overview", "eyebrow": "Introducing TermStation", "title": "Take control",
                  "description": "One workspace.",
                  "actions": [{ "label": "View FAQ", "href": "faq.html", "variant": "primary" },
                              { "label": "Source", "href": "https://example.com", "variant": "ghost" }],
                  "media": [{ "type": "image", "src": "assets/ui.png", "alt": "Sessions" }] }]"#,
        );
        let html = render_section(&data[0], 0).to_html();
        assert_eq!(
            html,
            concat!(
                r#"<section class="section" id="overview"><article class="section-card">"#,
                r#"<div class="section__content"><span class="section__eyebrow">Introducing TermStation</span>"#,
                r#"<h2 class="section__title">Take control</h2><p class="section__description">One workspace.</p>"#,
                r#"<div class="section__actions"><a class="button" href="faq.html">View FAQ</a>"#,
                r#"<a class="button button--ghost" href="https://example.com">Source</a></div></div></article>"#,
                r#"<div class="section__media"><div class="section__media-frame">"#,
                r#"<img src="assets/ui.png" alt="Sessions"></div></div></section>"#,
            )
        );
    }

    #[test]
    fn test_fallback_id_is_one_based() {
        let section = SectionDescriptor::default();
        assert_eq!(render_section(&section, 2).element_id(), Some("section-3"));
    }

    #[test]
    fn test_incomplete_actions_still_emit_container() {
        let section = SectionDescriptor {
            actions: vec![Some(ActionDescriptor { label: Some("Go".into()), ..Default::default() }), None],
            ..Default::default()
        };
        let el = render_section(&section, 0);
        let actions = el.find_class("section__actions").unwrap();
        assert!(actions.children.is_empty());

        let bare = render_section(&SectionDescriptor::default(), 0);
        assert!(bare.find_class("section__actions").is_none());
    }

    #[test]
    fn test_video_defaults() {
        let data = sections(r#"[{ "media": { "type": "video", "src": "demo.mp4", "alt": "Demo" } }]"#);
        let html = render_section(&data[0], 0).to_html();
        assert!(html.contains(r#"<video src="demo.mp4" muted loop autoplay playsinline aria-label="Demo"></video>"#));
    }

    #[test]
    fn test_video_overrides() {
        let data = sections(
            r#"[{ "media": { "type": "video", "src": "demo.mp4", "muted": false, "loop": false,
                             "autoplay": false, "controls": true, "poster": "poster.png" } }]"#,
        );
        let html = render_section(&data[0], 0).to_html();
        assert!(html.contains(
            r#"<video src="demo.mp4" playsinline aria-label="" poster="poster.png" controls></video>"#
        ));
    }

    #[test]
    fn test_placeholder_and_missing_src() {
        let data = sections(r#"[{ "media": [null, { "type": "image" }] }]"#);
        let el = render_section(&data[0], 0);
        let media: Vec<&Element> = el.child_elements().filter(|e| e.has_class("section__media")).collect();
        assert_eq!(media.len(), 1);
        assert_eq!(
            media[0].to_html(),
            concat!(
                r#"<div class="section__media"><div class="section__media-frame">"#,
                r#"<div class="section__media-placeholder" aria-hidden="true"></div></div></div>"#,
            )
        );
    }

    #[test]
    fn test_anchors_and_cards() {
        let data = sections(
            r#"[{ "id": "overview", "media": { "src": "a.png" } }, { "title": "Text only" }, { "id": "last" }]"#,
        );
        let anchors = vec![
            AnchorRule { index: 0, id: "overview-anchor".into() },
            AnchorRule { index: 1, id: "".into() },
            AnchorRule { index: -1, id: "negative".into() },
            AnchorRule { index: 2, id: "first".into() },
            AnchorRule { index: 2, id: "features-anchor".into() },
        ];
        let view = render_sections(&data, &anchors);

        let ids: Vec<Option<&str>> = view
            .nodes
            .iter()
            .map(|n| match n {
                Node::Element(e) => e.element_id(),
                _ => None,
            })
            .collect();
        assert_eq!(
            ids,
            vec![Some("overview-anchor"), Some("overview"), Some("section-2"), Some("features-anchor"), Some("last")]
        );
        assert!(view.to_html().starts_with(r#"<div id="overview-anchor" class="section-anchor" aria-hidden="true"></div>"#));

        assert_eq!(
            view.cards,
            vec![
                CardInfo { id: "overview".into(), has_media: true },
                CardInfo { id: "section-2".into(), has_media: false },
                CardInfo { id: "last".into(), has_media: false },
            ]
        );

        let mut engine = FadeEngine::default();
        view.register_cards(&mut engine);
        assert_eq!(engine.len(), 3);
    }

    #[test]
    fn test_colliding_ids_get_distinct_cards() {
        let data = sections(
            r#"[{ "id": "a", "media": { "src": "1.png" } },
                { "id": "a", "media": { "src": "2.png" } },
                { "id": "section-4" },
                { "media": { "src": "4.png" } }]"#,
        );
        let view = render_sections(&data, &[]);

        let ids: Vec<&str> = view.cards.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "a-2", "section-4", "section-4-2"]);
        let html = view.to_html();
        assert!(html.contains(r#"<section class="section" id="a-2">"#));
        assert!(html.contains(r#"<section class="section" id="section-4-2">"#));

        let mut engine = FadeEngine::default();
        view.register_cards(&mut engine);
        assert_eq!(engine.len(), 4);
    }

    #[test]
    fn test_same_id_cards_keep_separate_fade_state() {
        use crate::fade::{CardGeometry, Direction, Phase, Viewport};

        let data = sections(
            r#"[{ "id": "a", "media": { "src": "1.png" } }, { "id": "a", "media": { "src": "2.png" } }]"#,
        );
        let view = render_sections(&data, &[]);
        let mut engine = FadeEngine::default();
        view.register_cards(&mut engine);

        let viewport = Viewport::new(1280.0, 1000.0);
        let geometry = |top_second: f64| {
            vec![
                CardGeometry::new(view.cards[0].id.as_str(), 40.0, 0.0),
                CardGeometry::new(view.cards[1].id.as_str(), top_second, 1000.0),
            ]
        };
        let frames = engine.recompute(&viewport, &geometry(900.0));

        assert_eq!(frames[0].phase, Phase::LockedHidden);
        assert_eq!(frames[1].coverage, 0.0);
        assert_eq!(frames[1].direction, Direction::Down);
        assert_eq!(frames[1].phase, Phase::Visible);
    }

    #[test]
    fn test_text_is_escaped() {
        let section = SectionDescriptor { title: Some("<b>bold</b>".into()), ..Default::default() };
        assert!(render_section(&section, 0).to_html().contains("&lt;b&gt;bold&lt;/b&gt;"));
    }
}
