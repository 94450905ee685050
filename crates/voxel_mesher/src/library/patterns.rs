//! Side pattern bitmaps, the deduplicated pattern pool and the occlusion
//! matrix built over it.
//!
//! # Occlusion Relation
//!
//! ```text
//! For distinct non-empty patterns A and B:
//!
//!   res = A & B
//!   res empty      → no relation
//!   res == A       → B occludes A   (A lies inside B)
//!   res == B       → A occludes B
//!
//! Every non-empty pattern occludes itself. Empty patterns take part in no
//! relation. The pool holds no duplicates, so res == A == B cannot happen.
//! ```

use std::collections::HashMap;

use crate::constants::{RASTER_CELLS, RASTER_SIZE};

/// Words backing one bitmap.
pub const PATTERN_WORDS: usize = RASTER_CELLS / 64;

/// R×R occupancy bitmap of one model side, row-major.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct PatternBitmap {
  words: [u64; PATTERN_WORDS],
}

impl Default for PatternBitmap {
  fn default() -> Self {
    Self::empty()
  }
}

impl std::fmt::Debug for PatternBitmap {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("PatternBitmap")
      .field("set_cells", &self.count_ones())
      .finish()
  }
}

impl PatternBitmap {
  pub const fn empty() -> Self {
    Self {
      words: [0; PATTERN_WORDS],
    }
  }

  pub const fn full() -> Self {
    Self {
      words: [u64::MAX; PATTERN_WORDS],
    }
  }

  #[inline]
  fn bit(x: usize, y: usize) -> (usize, u64) {
    debug_assert!(x < RASTER_SIZE && y < RASTER_SIZE);
    let i = y * RASTER_SIZE + x;
    (i / 64, 1u64 << (i % 64))
  }

  #[inline]
  pub fn get(&self, x: usize, y: usize) -> bool {
    let (w, mask) = Self::bit(x, y);
    self.words[w] & mask != 0
  }

  #[inline]
  pub fn set(&mut self, x: usize, y: usize) {
    let (w, mask) = Self::bit(x, y);
    self.words[w] |= mask;
  }

  pub fn is_empty(&self) -> bool {
    self.words.iter().all(|&w| w == 0)
  }

  pub fn is_full(&self) -> bool {
    self.words.iter().all(|&w| w == u64::MAX)
  }

  pub fn count_ones(&self) -> u32 {
    self.words.iter().map(|w| w.count_ones()).sum()
  }

  pub fn intersection(&self, other: &Self) -> Self {
    let mut words = self.words;
    for (w, o) in words.iter_mut().zip(other.words.iter()) {
      *w &= o;
    }
    Self { words }
  }
}

// =============================================================================
// Pattern pool
// =============================================================================

/// Deduplicating store of side patterns.
#[derive(Debug, Default)]
pub struct PatternPool {
  patterns: Vec<PatternBitmap>,
  lookup: HashMap<PatternBitmap, u32>,
}

impl PatternPool {
  pub fn new() -> Self {
    Self::default()
  }

  /// Index of `bitmap` in the pool, appending it if no identical bitmap
  /// exists yet.
  pub fn intern(&mut self, bitmap: PatternBitmap) -> u32 {
    if let Some(&index) = self.lookup.get(&bitmap) {
      return index;
    }
    let index = self.patterns.len() as u32;
    self.lookup.insert(bitmap.clone(), index);
    self.patterns.push(bitmap);
    index
  }

  pub fn len(&self) -> usize {
    self.patterns.len()
  }

  pub fn is_empty(&self) -> bool {
    self.patterns.is_empty()
  }

  pub fn into_patterns(self) -> Vec<PatternBitmap> {
    self.patterns
  }
}

// =============================================================================
// Occlusion matrix
// =============================================================================

/// Square boolean relation over pattern indices.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OcclusionMatrix {
  size: usize,
  bits: Vec<u64>,
}

impl OcclusionMatrix {
  fn with_size(size: usize) -> Self {
    Self {
      size,
      bits: vec![0; (size * size).div_ceil(64)],
    }
  }

  /// Build the relation from pairwise containment of `patterns`.
  #[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "occlusion_matrix::build"))]
  pub fn build(patterns: &[PatternBitmap]) -> Self {
    let mut matrix = Self::with_size(patterns.len());

    for (ai, a) in patterns.iter().enumerate() {
      if a.is_empty() {
        continue;
      }
      matrix.set(ai, ai);

      for (bi, b) in patterns.iter().enumerate().skip(ai + 1) {
        if b.is_empty() {
          continue;
        }
        let res = a.intersection(b);
        if res.is_empty() {
          continue;
        }
        let b_occludes_a = res == *a;
        let a_occludes_b = res == *b;
        assert!(
          !(a_occludes_b && b_occludes_a),
          "patterns {ai} and {bi} are identical, pool is not deduplicated"
        );
        if b_occludes_a {
          matrix.set(bi, ai);
        }
        if a_occludes_b {
          matrix.set(ai, bi);
        }
      }
    }

    matrix
  }

  #[inline]
  fn set(&mut self, occluder: usize, occluded: usize) {
    let i = occluder * self.size + occluded;
    self.bits[i / 64] |= 1 << (i % 64);
  }

  /// True when a face using `occluded` is fully hidden by a touching face
  /// using `occluder`. Unknown indices never occlude.
  #[inline]
  pub fn occludes(&self, occluder: u32, occluded: u32) -> bool {
    let (a, b) = (occluder as usize, occluded as usize);
    if a >= self.size || b >= self.size {
      return false;
    }
    let i = a * self.size + b;
    self.bits[i / 64] & (1 << (i % 64)) != 0
  }

  /// Number of patterns the relation is defined over.
  pub fn len(&self) -> usize {
    self.size
  }

  pub fn is_empty(&self) -> bool {
    self.size == 0
  }
}

#[cfg(test)]
#[path = "patterns_test.rs"]
mod patterns_test;
