pub mod counter;
pub mod ease;
pub mod reveal;
pub mod tween;
