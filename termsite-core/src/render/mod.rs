//! Section and FAQ rendering
//!
//! Content declarations (plain JSON data) become a small [`node`] tree that
//! serialises to HTML. The landing page's cards are handed to the fade engine
//! by id through [`SectionsView::register_cards`].

pub mod content;
pub mod faq;
pub mod node;
pub mod observe;
pub mod page;
pub mod sections;

pub use content::{
    load_anchors, load_faq, load_sections, ActionDescriptor, AnchorRule, ContentError, FaqItem,
    MediaDescriptor, MediaKind, SectionDescriptor,
};
pub use faq::{render_faq, AnchorNavigator, PageLayout, ScrollRequest};
pub use node::{Element, Node};
pub use observe::{Intersection, MotionEnv, RevealTracker, VideoAutoplay, VideoCommand};
pub use page::{faq_list, footer_year, footer_year_element, landing, render_document, PageKind};
pub use sections::{render_section, render_sections, CardInfo, SectionsView};
