//! LED values and the per-LED read sequence.

mod color;
mod ops;

pub use color::{Rgb, parse_rgb};
pub use ops::{LedRef, LedState, list_leds, snapshot};
