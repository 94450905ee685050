//! Shadow occluder proxies for chunk sides fully covered by opaque faces.
//!
//! ```text
//!          neighbour chunk (padding layer)
//!   ┌───┬───┬───┬───┐
//!   │ N │ N │ N │ N │   every pair (C, N) must be opaque, C's side full,
//!   ├───┼───┼───┼───┤   and C's side pattern must hide N's opposite one
//!   │ C │ C │ C │ C │
//!   └───┴───┴───┴───┘
//!          boundary layer of this chunk
//! ```
//!
//! When a side passes, one quad covering the whole chunk face is emitted.

use crate::constants::{deck_quad, Side, PADDING};
use crate::error::GridError;
use crate::library::{BakedLibrary, BakedModel};
use crate::storage::{cell_index, CellReader, CellVisitor, Depth, VoxelGridView};
use crate::types::OccluderArrays;

/// Per-side occlusion flags and the proxy quads of occluded sides.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShadowOccluders {
  /// Indexed by [`Side::index`].
  pub sides: [bool; Side::COUNT],
  pub arrays: OccluderArrays,
}

impl ShadowOccluders {
  #[inline]
  pub fn is_occluded(&self, side: Side) -> bool {
    self.sides[side.index()]
  }

  /// Number of occluded sides.
  pub fn count(&self) -> usize {
    self.sides.iter().filter(|&&s| s).count()
  }
}

/// Evaluate the sides enabled in `enabled_mask` (bit per [`Side::bit`]) and
/// emit a proxy quad for every fully occluded one.
///
/// Unsupported input is logged and reports no occluded side.
#[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "occluders::generate"))]
pub fn generate_shadow_occluders(
  library: &BakedLibrary,
  grid: &VoxelGridView<'_>,
  enabled_mask: u8,
) -> ShadowOccluders {
  let mut occluders = ShadowOccluders::default();

  let sides = match classify_sides(library, grid, enabled_mask) {
    Ok(sides) => sides,
    Err(err) => {
      tracing::error!(%err, size = ?grid.size(), "shadow occluder generation failed");
      return occluders;
    }
  };

  let extent = grid.size().map(|s| (s - 2 * PADDING) as f32);
  for side in Side::ALL.into_iter().filter(|s| sides[s.index()]) {
    let axis = side.axis();
    let (ua, va) = axis.deck_axes();
    let plane = if side.is_positive() { extent[axis.index()] } else { 0.0 };
    let corners = deck_quad(axis, plane, 0.0, 0.0, extent[ua.index()], extent[va.index()]);
    occluders.arrays.push_quad(axis, side.is_positive(), corners);
  }
  occluders.sides = sides;
  occluders
}

fn classify_sides(
  library: &BakedLibrary,
  grid: &VoxelGridView<'_>,
  enabled_mask: u8,
) -> Result<[bool; Side::COUNT], GridError> {
  if grid.depth() == Depth::Bit32 {
    return Err(GridError::UnsupportedDepth(Depth::Bit32));
  }
  // No interior, nothing to cover.
  if grid.size().iter().any(|&s| s <= 2 * PADDING) {
    return Ok([false; Side::COUNT]);
  }

  Ok(grid.visit(SideClassifier {
    library,
    size: grid.size(),
    enabled_mask,
  }))
}

struct SideClassifier<'a> {
  library: &'a BakedLibrary,
  size: [usize; 3],
  enabled_mask: u8,
}

impl CellVisitor for SideClassifier<'_> {
  type Output = [bool; Side::COUNT];

  fn visit<R: CellReader>(self, cells: R) -> Self::Output {
    Side::ALL.map(|side| {
      self.enabled_mask & side.bit() != 0 && is_side_occluded(cells, self.library, self.size, side)
    })
  }
}

/// Whether `own`'s face toward `neighbor` fully covers the chunk boundary.
#[inline]
fn is_pair_occluded(library: &BakedLibrary, own: &BakedModel, neighbor: &BakedModel, side: Side) -> bool {
  own.transparency_index == 0
    && neighbor.transparency_index == 0
    && own.is_side_full(side)
    && library.occlusion().occludes(own.pattern(side), neighbor.pattern(side.opposite()))
}

fn is_side_occluded<R: CellReader>(cells: R, library: &BakedLibrary, size: [usize; 3], side: Side) -> bool {
  let axis = side.axis();
  let (ua, va) = axis.deck_axes();
  let a = axis.index();
  let (layer, outside) = if side.is_positive() {
    (size[a] - PADDING - 1, size[a] - PADDING)
  } else {
    (PADDING, PADDING - 1)
  };

  for v in PADDING..size[va.index()] - PADDING {
    for u in PADDING..size[ua.index()] - PADDING {
      let mut pos = [0; 3];
      pos[ua.index()] = u;
      pos[va.index()] = v;

      pos[a] = layer;
      let own = library.model(cells.read(cell_index(size, pos[0], pos[1], pos[2])));
      pos[a] = outside;
      let neighbor = library.model(cells.read(cell_index(size, pos[0], pos[1], pos[2])));

      match (own, neighbor) {
        (Some(own), Some(neighbor)) if is_pair_occluded(library, own, neighbor, side) => {}
        _ => return false,
      }
    }
  }
  true
}

#[cfg(test)]
#[path = "occluders_test.rs"]
mod occluders_test;
