//! Blocky mesher: one baked model per cell.
//!
//! # Processing Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        INPUT                                    │
//! │  BakedLibrary   - snapshot of one generation                    │
//! │  VoxelGridView  - padded model ids, 8 or 16 bit                 │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  PER INTERIOR CELL (ZXY order)                                  │
//! │    air / unknown id / empty model → skip                        │
//! │    per side: empty? → neighbour hides it? → AO corners          │
//! │    append side triangles, then interior triangles               │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        OUTPUT                                   │
//! │  one bucket per model material id, vertex colours with AO       │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Ambient Occlusion
//!
//! Each corner of a visible side counts the cells in front of the face that
//! darken it, following the classic voxel AO rule:
//!
//! ```text
//!   edge_u && edge_v        → 3
//!   otherwise               → edge_u + edge_v + corner
//! ```
//!
//! A vertex takes the strongest corner shade, weighted by
//! `max(0, 1 - distance²)` from that corner.

use glam::Vec3;
use web_time::Instant;

use crate::config::MesherConfig;
use crate::constants::{Axis, Side, PADDING};
use crate::error::{GridError, MeshError};
use crate::library::{BakedLibrary, BakedModel, BakedSurface};
use crate::metrics::{self, MesherKind};
use crate::storage::{axis_strides, cell_index, CellReader, CellVisitor, Depth, VoxelGridView};
use crate::types::{MaterialArrays, MeshOutput};

/// Blocky mesher entry point.
#[derive(Clone, Debug)]
pub struct BlockyMesher {
  config: MesherConfig,
}

impl BlockyMesher {
  pub fn new(config: &MesherConfig) -> Self {
    Self {
      config: config.resolved(),
    }
  }

  pub fn config(&self) -> &MesherConfig {
    &self.config
  }

  /// Mesh one padded grid of model ids against `library`.
  ///
  /// Input contract violations are logged and produce an empty output.
  #[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "blocky::build"))]
  pub fn build(&self, library: &BakedLibrary, grid: &VoxelGridView<'_>) -> MeshOutput {
    let start = Instant::now();
    let mut output = MeshOutput::with_surfaces(library.material_count());

    match self.build_into(library, grid, &mut output) {
      Ok(sides) => output.stats.quads = sides,
      Err(err) => {
        tracing::error!(%err, size = ?grid.size(), generation = library.generation(), "blocky mesh build failed");
        output.clear();
      }
    }

    output.update_counts();
    output.stats.build_time_us = start.elapsed().as_micros() as u64;
    metrics::record_build(MesherKind::Blocky, &output.stats);
    output
  }

  fn build_into(
    &self,
    library: &BakedLibrary,
    grid: &VoxelGridView<'_>,
    output: &mut MeshOutput,
  ) -> Result<u32, MeshError> {
    if grid.depth() == Depth::Bit32 {
      return Err(GridError::UnsupportedDepth(Depth::Bit32).into());
    }

    let ao_darkness = self
      .config
      .occlusion_enabled
      .then_some(self.config.occlusion_darkness / 3.0)
      .filter(|&d| d > 0.0);

    Ok(grid.visit(ModelPass {
      library,
      size: grid.size(),
      ao_darkness,
      surfaces: &mut output.surfaces,
    }))
  }
}

// =============================================================================
// Per-cell emission
// =============================================================================

struct ModelPass<'a> {
  library: &'a BakedLibrary,
  size: [usize; 3],
  /// Darkness per AO level, `None` when AO is off.
  ao_darkness: Option<f32>,
  surfaces: &'a mut [MaterialArrays],
}

impl CellVisitor for ModelPass<'_> {
  type Output = u32;

  fn visit<R: CellReader>(self, cells: R) -> u32 {
    emit_models(cells, self.library, self.size, self.ao_darkness, self.surfaces)
  }
}

/// Signed index offset of a cell displacement.
#[inline(always)]
fn offset_of(strides: [usize; 3], d: [i32; 3]) -> isize {
  (0..3).map(|i| d[i] as isize * strides[i] as isize).sum()
}

#[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "blocky::emit_models"))]
fn emit_models<R: CellReader>(
  cells: R,
  library: &BakedLibrary,
  size: [usize; 3],
  ao_darkness: Option<f32>,
  surfaces: &mut [MaterialArrays],
) -> u32 {
  let strides = axis_strides(size);
  let side_offsets = Side::ALL.map(|side| offset_of(strides, side.direction()));
  let mut sides = 0;

  for z in PADDING..size[2] - PADDING {
    for x in PADDING..size[0] - PADDING {
      for y in PADDING..size[1] - PADDING {
        let index = cell_index(size, x, y, z);
        let Some(model) = library.model(cells.read(index)) else {
          continue;
        };
        let origin = Vec3::new((x - PADDING) as f32, (y - PADDING) as f32, (z - PADDING) as f32);
        let arrays = &mut surfaces[model.material_id as usize];

        for side in Side::ALL {
          if model.is_side_empty(side) {
            continue;
          }
          let neighbor_index = index.wrapping_add_signed(side_offsets[side.index()]);
          let neighbor = library.model(cells.read(neighbor_index));
          if !library.is_face_visible(model, side, neighbor) {
            continue;
          }

          let corners = match ao_darkness {
            Some(darkness) => corner_shades(cells, library, strides, neighbor_index, side, darkness),
            None => [CornerShade::NONE; 4],
          };
          append_surface(arrays, &model.sides[side.index()], model, origin, &corners);
          sides += 1;
        }

        if !model.interior.is_empty() {
          append_surface(arrays, &model.interior, model, origin, &[CornerShade::NONE; 4]);
        }
      }
    }
  }

  sides
}

// =============================================================================
// Ambient occlusion
// =============================================================================

/// Darkening contributed by one face corner, in model space.
#[derive(Clone, Copy, Debug, PartialEq)]
struct CornerShade {
  position: Vec3,
  shade: f32,
}

impl CornerShade {
  const NONE: CornerShade = CornerShade {
    position: Vec3::ZERO,
    shade: 0.0,
  };
}

#[inline]
fn contributes_to_ao<R: CellReader>(cells: R, library: &BakedLibrary, index: usize) -> bool {
  library.model(cells.read(index)).is_some_and(|m| m.contributes_to_ao)
}

/// Shade of each corner of `side`. `front` is the cell the face looks into.
fn corner_shades<R: CellReader>(
  cells: R,
  library: &BakedLibrary,
  strides: [usize; 3],
  front: usize,
  side: Side,
  darkness: f32,
) -> [CornerShade; 4] {
  let axis = side.axis();
  let (ua, va) = axis.deck_axes();
  let plane = if side.is_positive() { 1.0 } else { 0.0 };
  let step = |a: Axis, sign: i32| {
    let mut d = [0; 3];
    d[a.index()] = sign;
    offset_of(strides, d)
  };

  let mut corners = [CornerShade::NONE; 4];
  for (i, corner) in corners.iter_mut().enumerate() {
    let (cu, cv) = (i & 1, i >> 1);
    let du = step(ua, if cu == 1 { 1 } else { -1 });
    let dv = step(va, if cv == 1 { 1 } else { -1 });

    let edge_u = contributes_to_ao(cells, library, front.wrapping_add_signed(du));
    let edge_v = contributes_to_ao(cells, library, front.wrapping_add_signed(dv));
    let level = if edge_u && edge_v {
      3
    } else {
      let diagonal = contributes_to_ao(cells, library, front.wrapping_add_signed(du + dv));
      edge_u as u8 + edge_v as u8 + diagonal as u8
    };

    let mut position = Vec3::ZERO;
    position[axis.index()] = plane;
    position[ua.index()] = cu as f32;
    position[va.index()] = cv as f32;
    *corner = CornerShade {
      position,
      shade: darkness * level as f32,
    };
  }
  corners
}

/// Strongest corner shade reaching a model-space vertex.
#[inline]
fn vertex_shade(corners: &[CornerShade; 4], vertex: Vec3) -> f32 {
  corners
    .iter()
    .filter(|c| c.shade > 0.0)
    .map(|c| c.shade * (1.0 - c.position.distance_squared(vertex)).max(0.0))
    .fold(0.0, f32::max)
}

fn append_surface(
  arrays: &mut MaterialArrays,
  surface: &BakedSurface,
  model: &BakedModel,
  origin: Vec3,
  corners: &[CornerShade; 4],
) {
  let base = arrays.positions.len() as u32;
  let [r, g, b, a] = model.color.to_f32();

  for (position, normal) in surface.positions.iter().zip(&surface.normals) {
    let local = Vec3::from_array(*position);
    let gs = 1.0 - vertex_shade(corners, local);
    arrays.positions.push((local + origin).to_array());
    arrays.normals.push(*normal);
    arrays.colors.push([r * gs, g * gs, b * gs, a]);
  }
  arrays.indices.extend(surface.indices.iter().map(|i| base + i));
}

#[cfg(test)]
#[path = "blocky_test.rs"]
mod blocky_test;
