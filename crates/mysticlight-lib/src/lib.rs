//! Mystic Light: bindings to the MSI Mystic Light SDK for per-LED color, style,
//! brightness and speed control.

pub mod config;
pub mod error;
pub mod led;
pub mod safearray;
pub mod sdk;
pub mod session;
pub mod status;

pub use error::MysticLightError;
