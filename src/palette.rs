use embedded_graphics::{pixelcolor::Rgb565, prelude::*};
use smallvec::SmallVec;

/// Number of entries an 8-bit index can address
pub const PALETTE_LEN: usize = 256;

/// Index to color lookup for one frame.
///
/// Tables shorter than 256 entries are allowed; indices past the end resolve to black.
#[derive(Clone, Debug, Default)]
pub struct Palette {
    table: SmallVec<[Rgb565; PALETTE_LEN]>,
}

impl Palette {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from packed `r, g, b` triplets, as stored in a GIF color table
    pub fn from_rgb888(rgb: &[u8]) -> Self {
        rgb.chunks_exact(3)
            .take(PALETTE_LEN)
            .map(|c| Rgb565::from(embedded_graphics::pixelcolor::Rgb888::new(c[0], c[1], c[2])))
            .collect()
    }

    /// Set entry `idx`, growing the table with black entries if needed
    pub fn set(&mut self, idx: u8, color: Rgb565) {
        let idx = idx as usize;
        if idx >= self.table.len() {
            self.table.resize(idx + 1, Rgb565::BLACK);
        }
        self.table[idx] = color;
    }

    #[inline]
    pub fn get(&self, idx: u8) -> Rgb565 {
        self.table
            .get(idx as usize)
            .copied()
            .unwrap_or(Rgb565::BLACK)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl FromIterator<Rgb565> for Palette {
    fn from_iter<I: IntoIterator<Item = Rgb565>>(iter: I) -> Self {
        Self {
            table: iter.into_iter().take(PALETTE_LEN).collect(),
        }
    }
}
