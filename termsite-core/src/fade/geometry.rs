//! Viewport and card measurements supplied by the host each frame

use serde::{Deserialize, Serialize};

use super::config::SMALL_SCREEN_MAX_PX;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
    /// Visual viewport height, when the host exposes one (mobile URL bars)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_height: Option<f64>,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height, visual_height: None }
    }

    pub fn with_visual_height(mut self, height: f64) -> Self {
        self.visual_height = Some(height);
        self
    }

    /// Height used as the coverage reference, never below 1
    pub fn effective_height(&self) -> f64 {
        let height = match self.visual_height {
            Some(h) if h > 0.0 => h,
            _ => self.height,
        };
        height.max(1.0)
    }

    pub fn is_small_screen(&self) -> bool {
        self.width <= SMALL_SCREEN_MAX_PX || self.width.min(self.height) <= SMALL_SCREEN_MAX_PX
    }
}

/// One rendered card as measured in the current frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardGeometry {
    /// Stable id of the owning section
    pub id: String,
    /// Top edge of the card, relative to the viewport
    pub card_top: f64,
    /// Top edge of the media frame; `None` when the section has no media
    #[serde(default)]
    pub media_top: Option<f64>,
}

impl CardGeometry {
    pub fn new(id: impl Into<String>, card_top: f64, media_top: f64) -> Self {
        Self { id: id.into(), card_top, media_top: Some(media_top) }
    }

    pub fn without_media(id: impl Into<String>, card_top: f64) -> Self {
        Self { id: id.into(), card_top, media_top: None }
    }
}

/// How far the media frame has travelled up the viewport, in `[0, 1]`
///
/// 0 while the frame is at or below the bottom edge, 1 once its top reaches
/// the top of the viewport.
pub fn coverage(media_top: f64, viewport_height: f64) -> f64 {
    let vh = viewport_height.max(1.0);
    let distance = media_top.max(0.0);
    if distance < vh {
        1.0 - distance / vh
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coverage_bounds() {
        assert_eq!(coverage(800.0, 800.0), 0.0);
        assert_eq!(coverage(1200.0, 800.0), 0.0);
        assert_eq!(coverage(0.0, 800.0), 1.0);
        assert_eq!(coverage(-250.0, 800.0), 1.0);
        assert_eq!(coverage(400.0, 800.0), 0.5);
    }

    #[test]
    fn test_zero_height_viewport() {
        assert_eq!(coverage(0.5, 0.0), 0.5);
        assert_eq!(Viewport::new(300.0, 0.0).effective_height(), 1.0);
    }

    #[test]
    fn test_visual_viewport_preferred() {
        let vp = Viewport::new(390.0, 844.0).with_visual_height(760.0);
        assert_eq!(vp.effective_height(), 760.0);
        assert_eq!(Viewport::new(390.0, 844.0).with_visual_height(0.0).effective_height(), 844.0);
    }

    #[test]
    fn test_small_screen_detection() {
        assert!(Viewport::new(720.0, 1000.0).is_small_screen());
        assert!(Viewport::new(1280.0, 700.0).is_small_screen());
        assert!(!Viewport::new(1280.0, 800.0).is_small_screen());
    }
}
