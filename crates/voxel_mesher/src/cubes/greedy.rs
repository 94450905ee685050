//! Greedy quad merger.
//!
//! # Algorithm
//!
//! ```text
//! Per axis, per deck:
//!
//!   1. Fill the mask: one cell per face slot of the deck, holding
//!      Empty | Positive(payload) | Negative(payload).
//!
//!   2. Scan row-major. At the first non-empty cell:
//!        extend right while cells merge with it      → width
//!        extend down while a whole row span merges   → height
//!
//!        ┌───┬───┬───┬───┐
//!        │ A │ A │ A │ B │      first run: A A A (width 3)
//!        ├───┼───┼───┼───┤
//!        │ A │ A │ A │ B │      row 2 matches over 0..3 → height 2
//!        ├───┼───┼───┼───┤
//!        │ A │ A │ . │ . │      row 3 breaks at x = 2
//!        └───┴───┴───┴───┘
//!
//!   3. Emit one quad for the rectangle, then clear it in the mask.
//! ```
//!
//! Rows always grow before columns. The result is deterministic but not
//! area-optimal: an L-shaped region splits along row boundaries.
//!
//! Merging compares payloads exactly, never through floating point.

use super::visibility::Facing;
use crate::types::Color8;

/// Payload equality used for merging.
pub trait MergePayload: Copy {
  fn merges_with(&self, other: &Self) -> bool;
}

/// Raw cell value of the owning cell.
impl MergePayload for u32 {
  #[inline(always)]
  fn merges_with(&self, other: &Self) -> bool {
    self == other
  }
}

/// Atlas mode keeps each cell's colour but merges across colours, splitting
/// only on output bucket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtlasPayload {
  pub bucket: u8,
  pub color: Color8,
}

impl MergePayload for AtlasPayload {
  #[inline(always)]
  fn merges_with(&self, other: &Self) -> bool {
    self.bucket == other.bucket
  }
}

/// One mask slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaskCell<P> {
  Empty,
  Positive(P),
  Negative(P),
}

impl<P: MergePayload> MaskCell<P> {
  #[inline]
  pub fn new(facing: Facing, payload: P) -> Self {
    match facing {
      Facing::Positive => MaskCell::Positive(payload),
      Facing::Negative => MaskCell::Negative(payload),
    }
  }

  #[inline]
  pub fn payload(&self) -> Option<&P> {
    match self {
      MaskCell::Empty => None,
      MaskCell::Positive(p) | MaskCell::Negative(p) => Some(p),
    }
  }

  #[inline]
  pub fn facing(&self) -> Option<Facing> {
    match self {
      MaskCell::Empty => None,
      MaskCell::Positive(_) => Some(Facing::Positive),
      MaskCell::Negative(_) => Some(Facing::Negative),
    }
  }

  /// Same polarity and mergeable payload. Empty never merges.
  #[inline(always)]
  pub fn merges_with(&self, other: &Self) -> bool {
    match (self, other) {
      (MaskCell::Positive(a), MaskCell::Positive(b)) => a.merges_with(b),
      (MaskCell::Negative(a), MaskCell::Negative(b)) => a.merges_with(b),
      _ => false,
    }
  }
}

/// Reusable per-deck scratch mask, row-major.
#[derive(Clone, Debug)]
pub struct GreedyMask<P> {
  width: usize,
  height: usize,
  cells: Vec<MaskCell<P>>,
}

impl<P: MergePayload> Default for GreedyMask<P> {
  fn default() -> Self {
    Self::new()
  }
}

impl<P: MergePayload> GreedyMask<P> {
  pub fn new() -> Self {
    Self {
      width: 0,
      height: 0,
      cells: Vec::new(),
    }
  }

  /// Resize to `width × height` and clear every slot, keeping capacity.
  pub fn reset(&mut self, width: usize, height: usize) {
    self.width = width;
    self.height = height;
    self.cells.clear();
    self.cells.resize(width * height, MaskCell::Empty);
  }

  #[inline]
  pub fn width(&self) -> usize {
    self.width
  }

  #[inline]
  pub fn height(&self) -> usize {
    self.height
  }

  #[inline(always)]
  pub fn get(&self, x: usize, y: usize) -> &MaskCell<P> {
    &self.cells[y * self.width + x]
  }

  #[inline(always)]
  pub fn set(&mut self, x: usize, y: usize, cell: MaskCell<P>) {
    self.cells[y * self.width + x] = cell;
  }

  pub fn capacity(&self) -> usize {
    self.cells.capacity()
  }

  fn clear_rect(&mut self, x: usize, y: usize, width: usize, height: usize) {
    for row in y..y + height {
      let start = row * self.width + x;
      self.cells[start..start + width].fill(MaskCell::Empty);
    }
  }
}

/// A merged rectangle in mask coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GreedyQuad<P> {
  pub x: usize,
  pub y: usize,
  pub width: usize,
  pub height: usize,
  pub facing: Facing,
  /// Payload of the rectangle's first cell.
  pub payload: P,
}

/// Merge every non-empty run in `mask`, calling `emit` once per rectangle
/// before its cells are cleared. Returns the number of rectangles.
pub fn merge_mask<P: MergePayload>(
  mask: &mut GreedyMask<P>,
  mut emit: impl FnMut(&GreedyQuad<P>, &GreedyMask<P>),
) -> u32 {
  assert_eq!(
    mask.cells.len(),
    mask.width * mask.height,
    "greedy mask does not match its deck"
  );

  let (w, h) = (mask.width, mask.height);
  let mut quads = 0;

  for fy in 0..h {
    let mut fx = 0;
    while fx < w {
      let cell = *mask.get(fx, fy);
      let (Some(facing), Some(&payload)) = (cell.facing(), cell.payload()) else {
        fx += 1;
        continue;
      };

      let mut rx = fx + 1;
      while rx < w && mask.get(rx, fy).merges_with(&cell) {
        rx += 1;
      }

      let mut ry = fy + 1;
      'rows: while ry < h {
        for x in fx..rx {
          if !mask.get(x, ry).merges_with(&cell) {
            break 'rows;
          }
        }
        ry += 1;
      }

      let quad = GreedyQuad {
        x: fx,
        y: fy,
        width: rx - fx,
        height: ry - fy,
        facing,
        payload,
      };
      emit(&quad, mask);
      mask.clear_rect(fx, fy, quad.width, quad.height);
      quads += 1;
      fx = rx;
    }
  }

  quads
}

#[cfg(test)]
#[path = "greedy_test.rs"]
mod greedy_test;
