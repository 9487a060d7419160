use anyhow::Result;
use clap::ValueEnum;
use termsite_core::render::{footer_year, render_document, MotionEnv, PageKind};
use termsite_core::SiteConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Page {
    /// `#sections` container of the landing page
    Landing,
    /// `#faq-list` container of the FAQ page
    Faq,
}

impl From<Page> for PageKind {
    fn from(page: Page) -> Self {
        match page {
            Page::Landing => PageKind::Landing,
            Page::Faq => PageKind::Faq,
        }
    }
}

/// Print the page container; `reduced_motion` renders every item already revealed
pub fn run(config: &SiteConfig, page: Page, highlight: Option<&str>, reduced_motion: bool) -> Result<()> {
    super::init_logging(&config.logging, true)?;

    let motion = MotionEnv { prefers_reduced_motion: reduced_motion, ..MotionEnv::default() };
    let html = render_document(&config.content, page.into(), highlight, motion, footer_year())?;
    println!("{}", html);
    Ok(())
}
