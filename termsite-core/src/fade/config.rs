//! Fade thresholds and the sticky offset

use serde::{Deserialize, Serialize};

use super::geometry::Viewport;

/// Sticky offset used when `--card-sticky-top` is absent, unparsable or zero
pub const DEFAULT_STICKY_OFFSET_PX: u32 = 88;

/// Opacity at or below which a sticky card latches hidden
pub const LOCK_THRESHOLD: f64 = 0.001;

/// Card controls stop receiving pointer events below this opacity
pub const INTERACTIVE_MIN_OPACITY: f64 = 0.5;

/// Screens whose shorter side is at most this wide use the compact profile
pub const SMALL_SCREEN_MAX_PX: f64 = 720.0;

/// Coverage thresholds and easing exponent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FadeConfig {
    /// Coverage at which the card starts to fade
    pub start: f64,
    /// Coverage at which the card is fully transparent
    pub end: f64,
    /// Ease-in exponent applied to the normalised progress
    pub ease: f64,
    /// Tolerance below `end` for the seen-high and unlock checks
    pub eps: f64,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self::regular()
    }
}

impl FadeConfig {
    pub const fn regular() -> Self {
        Self { start: 0.40, end: 0.65, ease: 2.5, eps: 0.01 }
    }

    /// Small screens currently share the regular curve
    pub const fn compact() -> Self {
        Self { start: 0.40, end: 0.65, ease: 2.5, eps: 0.01 }
    }

    /// Profile for the current screen size
    pub fn for_viewport(viewport: &Viewport) -> Self {
        if viewport.is_small_screen() {
            Self::compact()
        } else {
            Self::regular()
        }
    }

    /// `end - eps`, the coverage that counts as "high" for the latch
    pub fn high_water(&self) -> f64 {
        self.end - self.eps
    }

    /// Eased opacity for a coverage value, before any direction constraint
    pub fn eased_opacity(&self, coverage: f64) -> f64 {
        let t = ((coverage - self.start) / (self.end - self.start)).clamp(0.0, 1.0);
        1.0 - t.powf(self.ease)
    }
}

/// Parse a `--card-sticky-top` value such as `"88px"`
///
/// Takes the leading integer like CSS-unaware `parseInt` does. Missing,
/// unparsable and zero values fall back to [`DEFAULT_STICKY_OFFSET_PX`].
pub fn parse_sticky_offset(raw: Option<&str>) -> f64 {
    let fallback = f64::from(DEFAULT_STICKY_OFFSET_PX);
    let Some(raw) = raw else {
        return fallback;
    };

    let trimmed = raw.trim();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits.find(|c: char| !c.is_ascii_digit()).unwrap_or(digits.len());

    match digits[..end].parse::<u32>() {
        Ok(0) | Err(_) => fallback,
        Ok(value) => sign * f64::from(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profiles_are_identical() {
        let phone = Viewport::new(390.0, 844.0);
        let desktop = Viewport::new(1440.0, 900.0);
        assert!(phone.is_small_screen());
        assert!(!desktop.is_small_screen());
        assert_eq!(FadeConfig::for_viewport(&phone), FadeConfig::for_viewport(&desktop));
    }

    #[test]
    fn test_eased_opacity_curve() {
        let cfg = FadeConfig::default();
        assert_eq!(cfg.eased_opacity(0.0), 1.0);
        assert_eq!(cfg.eased_opacity(0.40), 1.0);
        assert!((cfg.eased_opacity(0.5) - 0.898807).abs() < 1e-6);
        assert_eq!(cfg.eased_opacity(0.65), 0.0);
        assert_eq!(cfg.eased_opacity(1.0), 0.0);
        assert!((cfg.high_water() - 0.64).abs() < 1e-12);
    }

    #[test]
    fn test_sticky_offset_parsing() {
        assert_eq!(parse_sticky_offset(Some("72px")), 72.0);
        assert_eq!(parse_sticky_offset(Some("  96px ")), 96.0);
        assert_eq!(parse_sticky_offset(Some("12.7px")), 12.0);
        assert_eq!(parse_sticky_offset(Some("-8px")), -8.0);
        assert_eq!(parse_sticky_offset(Some("0px")), 88.0);
        assert_eq!(parse_sticky_offset(Some("auto")), 88.0);
        assert_eq!(parse_sticky_offset(Some("")), 88.0);
        assert_eq!(parse_sticky_offset(None), 88.0);
    }
}
