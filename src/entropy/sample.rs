//! Raw entropy events
//!
//! The pool never looks inside an event; each event decides which of its
//! bytes carry randomness.

use serde::{Deserialize, Serialize};

/// An opaque user event that contributes bytes to an [`EntropyPool`](super::EntropyPool).
pub trait EntropySample {
    /// Append the randomness carried by this event.
    fn write_entropy(&self, out: &mut Vec<u8>);
}

/// Pointer position reported by whatever surface is collecting movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coordinates {
    pub x: u32,
    pub y: u32,
}

impl Coordinates {
    pub fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Parse a `"x y"` (or `"x,y"`) line as produced by the CLI's stdin feed.
    pub fn parse_line(line: &str) -> Option<Self> {
        let mut parts = line
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|p| !p.is_empty());
        let x = parts.next()?.parse().ok()?;
        let y = parts.next()?.parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self { x, y })
    }
}

/// Six bytes per event: `x`, `y` and the low half of `x * y`, each as a
/// little-endian u16. Only the low 16 bits of each position are kept, so
/// positions 65536 apart contribute the same bytes.
impl EntropySample for Coordinates {
    fn write_entropy(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&(self.x as u16).to_le_bytes());
        out.extend_from_slice(&(self.y as u16).to_le_bytes());
        let product = self.x.wrapping_mul(self.y) as u16;
        out.extend_from_slice(&product.to_le_bytes());
    }
}

impl EntropySample for [u8] {
    fn write_entropy(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self);
    }
}
