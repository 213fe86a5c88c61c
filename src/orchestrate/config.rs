use crate::foundation::core::{Breakpoint, Viewport};

/// A parameter authored per breakpoint, resolved once at build time.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Responsive<T> {
    pub mobile: T,
    pub desktop: T,
}

impl<T: Copy> Responsive<T> {
    pub fn uniform(value: T) -> Self {
        Self {
            mobile: value,
            desktop: value,
        }
    }

    pub fn resolve(&self, breakpoint: Breakpoint) -> T {
        match breakpoint {
            Breakpoint::Mobile => self.mobile,
            Breakpoint::Desktop => self.desktop,
        }
    }
}

/// Authored per-section parameters. All responsive branching happens here,
/// once, instead of inline viewport checks at animation time.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct SectionConfig {
    /// Reserved pin distance as a multiple of viewport height.
    pub pin_distance: Responsive<f64>,
    /// Smoothing approach factor per frame, in `(0, 1]`. 1.0 disables lag.
    pub lag: Responsive<f64>,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            // Longer reserved distance on mobile, as in the authored sequence.
            pin_distance: Responsive {
                mobile: 2.3,
                desktop: 1.85,
            },
            lag: Responsive {
                mobile: 0.35,
                desktop: 0.45,
            },
        }
    }
}

impl SectionConfig {
    pub fn resolve(&self, viewport: Viewport) -> ResolvedParams {
        let bp = viewport.breakpoint();
        ResolvedParams {
            breakpoint: bp,
            pin_distance: self.pin_distance.resolve(bp).max(0.0),
            lag: self.lag.resolve(bp).clamp(0.01, 1.0),
        }
    }
}

/// Fully-resolved parameter set for one breakpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedParams {
    pub breakpoint: Breakpoint,
    pub pin_distance: f64,
    pub lag: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolution_picks_the_breakpoint_side() {
        let cfg = SectionConfig::default();
        let narrow = cfg.resolve(Viewport::new(390.0, 844.0).unwrap());
        let wide = cfg.resolve(Viewport::new(1440.0, 900.0).unwrap());
        assert_eq!(narrow.breakpoint, Breakpoint::Mobile);
        assert_eq!(narrow.pin_distance, 2.3);
        assert_eq!(wide.pin_distance, 1.85);
        assert!(narrow.pin_distance > wide.pin_distance);
    }

    #[test]
    fn lag_is_clamped_to_a_sane_range() {
        let cfg = SectionConfig {
            lag: Responsive::uniform(7.0),
            ..SectionConfig::default()
        };
        let r = cfg.resolve(Viewport::new(1440.0, 900.0).unwrap());
        assert_eq!(r.lag, 1.0);
    }
}
