//! Simple (non-greedy) face emitter: one unit quad per visible face.

use super::{bucket_of, ColorResolver, FaceScan};
use crate::constants::{deck_quad, Axis};
use crate::storage::CellReader;
use crate::types::MaterialArrays;

const UNIT_UVS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];

/// Emit every visible face of the padded grid. Returns the quad count.
#[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "cubes::emit_simple"))]
pub(crate) fn emit_simple<R: CellReader, C: ColorResolver>(
  scan: FaceScan<R, C>,
  surfaces: &mut [MaterialArrays],
) -> u32 {
  let mut quads = 0;

  for axis in Axis::ALL {
    for d in 0..scan.deck_count(axis) {
      let plane = d as f32;
      scan.for_each_face(axis, d, |u, v, facing, _value, color| {
        let (u, v) = (u as f32, v as f32);
        surfaces[bucket_of(color)].push_quad(
          axis,
          facing.is_positive(),
          deck_quad(axis, plane, u, v, u + 1.0, v + 1.0),
          Some(color.to_f32()),
          Some(UNIT_UVS),
        );
        quads += 1;
      });
    }
  }

  quads
}
