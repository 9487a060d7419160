//! Page-level fragments: the section container, the FAQ list and the footer

use chrono::{Datelike, Local};
use std::path::Path;

use super::content::{load_anchors, load_faq, load_sections, AnchorRule, FaqItem, SectionDescriptor};
use super::faq::{render_faq, AnchorNavigator};
use super::node::{Element, Node};
use super::observe::{MotionEnv, RevealTracker};
use super::sections::{render_sections, SectionsView};
use crate::config::ContentConfig;

pub const SECTIONS_CONTAINER_ID: &str = "sections";
pub const FAQ_CONTAINER_ID: &str = "faq-list";
pub const FOOTER_YEAR_ID: &str = "footer-year";

/// Which page container to render
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Landing,
    Faq,
}

/// Current local year for the footer
pub fn footer_year() -> i32 {
    Local::now().year()
}

pub fn footer_year_element(year: i32) -> Element {
    Element::new("span").id(FOOTER_YEAR_ID).text(year.to_string())
}

/// `div#sections` with every section rendered into it
pub fn landing(sections: &[SectionDescriptor], anchors: &[AnchorRule]) -> (Element, SectionsView) {
    let view = render_sections(sections, anchors);
    let mut container = Element::new("div").id(SECTIONS_CONTAINER_ID);
    container.children = view.nodes.clone();
    (container, view)
}

/// `div#faq-list` with every FAQ item rendered into it
pub fn faq_list(items: &[FaqItem]) -> Element {
    let mut container = Element::new("div").id(FAQ_CONTAINER_ID);
    container.children = render_faq(items).into_iter().map(Into::into).collect();
    container
}

/// Render a page container from the content files, followed by the footer year
///
/// Items that would be revealed without scrolling (reduced motion, no
/// intersection source) are emitted already visible. `highlight` is a FAQ
/// fragment to render highlighted.
pub fn render_document(
    content: &ContentConfig,
    page: PageKind,
    highlight: Option<&str>,
    motion: MotionEnv,
    year: i32,
) -> crate::Result<String> {
    let container = match page {
        PageKind::Landing => {
            let sections = load_sections(&content.sections)?;
            let anchors = optional_anchors(&content.anchors)?;
            let (mut container, view) = landing(&sections, &anchors);

            let mut reveal = RevealTracker::for_sections(motion);
            for card in &view.cards {
                reveal.observe(card.id.as_str());
            }
            reveal.apply(container.children.iter_mut().filter_map(|node| match node {
                Node::Element(e) if e.has_class("section") => Some(e),
                _ => None,
            }));

            log::info!(
                "Rendered {} sections, {} with media",
                view.cards.len(),
                view.cards.iter().filter(|c| c.has_media).count()
            );
            container
        }
        PageKind::Faq => {
            let faq = load_faq(&content.faq)?;
            let mut items = render_faq(&faq);

            let mut reveal = RevealTracker::for_faq(motion);
            for item in &items {
                if let Some(id) = item.element_id() {
                    reveal.observe(id);
                }
            }
            reveal.apply(items.iter_mut());

            if let Some(fragment) = highlight {
                let mut nav = AnchorNavigator::for_items(&faq);
                nav.on_hash_change(fragment);
                nav.apply(&mut items);
            }
            log::info!("Rendered {} FAQ items", items.len());

            let mut container = Element::new("div").id(FAQ_CONTAINER_ID);
            container.children = items.into_iter().map(Into::into).collect();
            container
        }
    };

    Ok(format!("{}\n{}", container, footer_year_element(year)))
}

// Anchor rules are optional page furniture.
fn optional_anchors(path: &Path) -> crate::Result<Vec<AnchorRule>> {
    if !path.exists() {
        log::debug!("No anchor file at {}", path.display());
        return Ok(Vec::new());
    }
    Ok(load_anchors(path)?)
}
