use crate::foundation::error::{StageError, StageResult};

pub use kurbo::{Point, Rect, Vec2};

/// Widest viewport (CSS px) still treated as the mobile breakpoint.
pub const MOBILE_MAX_WIDTH: f64 = 768.0;

/// Normalized scroll progress through a pinned section's reserved distance.
///
/// Always in `[0, 1]`; NaN collapses to 0 so a bad measurement can never
/// poison a published value.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, serde::Serialize, serde::Deserialize)]
pub struct Progress(f64);

impl Progress {
    pub const ZERO: Progress = Progress(0.0);
    pub const ONE: Progress = Progress(1.0);

    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self(0.0);
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    pub fn is_start(self) -> bool {
        self.0 == 0.0
    }

    pub fn is_end(self) -> bool {
        self.0 == 1.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Breakpoint {
    Mobile,
    Desktop,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> StageResult<Self> {
        if !(width > 0.0 && height > 0.0) {
            return Err(StageError::validation("viewport width/height must be > 0"));
        }
        Ok(Self { width, height })
    }

    pub fn breakpoint(self) -> Breakpoint {
        if self.width <= MOBILE_MAX_WIDTH {
            Breakpoint::Mobile
        } else {
            Breakpoint::Desktop
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_clamps_and_rejects_nan() {
        assert_eq!(Progress::new(-0.5).value(), 0.0);
        assert_eq!(Progress::new(1.5).value(), 1.0);
        assert_eq!(Progress::new(f64::NAN).value(), 0.0);
        assert_eq!(Progress::new(0.25).value(), 0.25);
    }

    #[test]
    fn progress_terminals() {
        assert!(Progress::ZERO.is_start());
        assert!(Progress::ONE.is_end());
        assert!(!Progress::new(0.5).is_start());
        assert!(!Progress::new(0.5).is_end());
    }

    #[test]
    fn viewport_breakpoints() {
        let narrow = Viewport::new(390.0, 844.0).unwrap();
        let wide = Viewport::new(1440.0, 900.0).unwrap();
        assert_eq!(narrow.breakpoint(), Breakpoint::Mobile);
        assert_eq!(wide.breakpoint(), Breakpoint::Desktop);
        assert!(Viewport::new(0.0, 10.0).is_err());
    }
}
