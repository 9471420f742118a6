//! RGB values as the SDK takes them: three independent DWORD channels.
//!
//! Channels are not clamped. The SDK validates ranges itself, so a value such
//! as 300 is passed through untouched.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u32,
    pub g: u32,
    pub b: u32,
}

impl Rgb {
    pub const fn new(r: u32, g: u32, b: u32) -> Self {
        Rgb { r, g, b }
    }

    /// `#RRGGBB`. Channels above 255 print with more digits.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R-{} G-{} B-{}", self.r, self.g, self.b)
    }
}

/// Parse a color argument.
///
/// Accepts:
/// - Hex: `"#FF0000"`, `"FF0000"`, `"#ff0000"`
/// - Components: `"255,0,0"` (any DWORD value per channel)
/// - Named: `"red"`, `"green"`, `"blue"`, `"white"`, `"orange"`, `"yellow"`,
///   `"purple"`, `"cyan"`, `"off"`
pub fn parse_rgb(s: &str) -> crate::error::Result<Rgb> {
    let s = s.trim();

    match s.to_lowercase().as_str() {
        "red" => return Ok(Rgb::new(255, 0, 0)),
        "green" => return Ok(Rgb::new(0, 255, 0)),
        "blue" => return Ok(Rgb::new(0, 0, 255)),
        "white" => return Ok(Rgb::new(255, 255, 255)),
        "orange" => return Ok(Rgb::new(255, 128, 0)),
        "yellow" => return Ok(Rgb::new(255, 255, 0)),
        "purple" => return Ok(Rgb::new(128, 0, 255)),
        "cyan" => return Ok(Rgb::new(0, 255, 255)),
        "off" | "black" => return Ok(Rgb::new(0, 0, 0)),
        _ => {}
    }

    if s.contains(',') {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        if parts.len() != 3 {
            return Err(crate::MysticLightError::Color(format!(
                "Invalid color: {s} (expected r,g,b)"
            )));
        }
        let mut channels = [0u32; 3];
        for (slot, part) in channels.iter_mut().zip(&parts) {
            *slot = part.parse().map_err(|_| {
                crate::MysticLightError::Color(format!("Invalid color component: {part}"))
            })?;
        }
        return Ok(Rgb::new(channels[0], channels[1], channels[2]));
    }

    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 {
        return Err(crate::MysticLightError::Color(format!(
            "Invalid color: {s} (use #RRGGBB, r,g,b or a color name)"
        )));
    }
    let val = u32::from_str_radix(hex, 16)
        .map_err(|_| crate::MysticLightError::Color(format!("Invalid hex color: {s}")))?;
    Ok(Rgb::new((val >> 16) & 0xFF, (val >> 8) & 0xFF, val & 0xFF))
}
