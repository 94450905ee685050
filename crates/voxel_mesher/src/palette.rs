//! Fixed 256-entry colour palette for the palette colour modes.

use crate::types::Color8;

pub const PALETTE_SIZE: usize = 256;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorPalette {
  colors: [Color8; PALETTE_SIZE],
}

impl Default for ColorPalette {
  fn default() -> Self {
    Self {
      colors: [Color8::TRANSPARENT; PALETTE_SIZE],
    }
  }
}

impl ColorPalette {
  pub fn new() -> Self {
    Self::default()
  }

  /// Palette from up to 256 colours; remaining entries stay transparent.
  pub fn from_colors(colors: impl IntoIterator<Item = Color8>) -> Self {
    let mut palette = Self::default();
    for (slot, color) in palette.colors.iter_mut().zip(colors) {
      *slot = color;
    }
    palette
  }

  /// Colour for a cell value. Values past the last entry are transparent.
  #[inline]
  pub fn get(&self, index: u32) -> Color8 {
    self
      .colors
      .get(index as usize)
      .copied()
      .unwrap_or(Color8::TRANSPARENT)
  }

  pub fn set(&mut self, index: u8, color: Color8) {
    self.colors[index as usize] = color;
  }

  pub fn colors(&self) -> &[Color8; PALETTE_SIZE] {
    &self.colors
  }
}
