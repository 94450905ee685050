//! Model library baker.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  PHASE 1: Validation                                            │
//! │    model count, material ids, whole triangles, index ranges     │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  PHASE 2: Rasterization (parallel over models)                  │
//! │    6 side patterns per model                                    │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  PHASE 3: Deduplication (sequential, model order)               │
//! │    intern each pattern, record per-side indices and masks       │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  PHASE 4: Occlusion matrix over the pattern pool                │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use glam::Vec3;
use rayon::prelude::*;

use super::model::{ModelSurface, VoxelModel};
use super::patterns::{OcclusionMatrix, PatternBitmap, PatternPool};
use super::raster::rasterize_side;
use super::{BakedLibrary, BakedModel, BakedSurface};
use crate::constants::{Side, MAX_MATERIALS, MAX_MODELS};
use crate::error::BakeError;

/// Bake `models` into an immutable library tagged with `generation`.
#[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "library::bake"))]
pub fn bake_library(models: &[VoxelModel], generation: u64) -> Result<BakedLibrary, BakeError> {
  if models.len() > MAX_MODELS {
    return Err(BakeError::TooManyModels(models.len()));
  }
  for (id, model) in models.iter().enumerate() {
    validate_model(id, model)?;
  }

  let bitmaps: Vec<[PatternBitmap; Side::COUNT]> = models
    .par_iter()
    .map(|model| {
      Side::ALL.map(|side| {
        let surface = &model.sides[side.index()];
        rasterize_side(side, &surface.positions, &surface.indices)
      })
    })
    .collect();

  let mut pool = PatternPool::new();
  let baked: Vec<BakedModel> = models
    .iter()
    .zip(bitmaps)
    .map(|(model, sides)| bake_model(model, sides, &mut pool))
    .collect();

  let patterns = pool.into_patterns();
  let occlusion = OcclusionMatrix::build(&patterns);
  let material_count = baked
    .iter()
    .filter(|m| !m.empty)
    .map(|m| m.material_id as usize + 1)
    .max()
    .unwrap_or(1);

  tracing::debug!(
    generation,
    models = baked.len(),
    patterns = patterns.len(),
    materials = material_count,
    "baked model library"
  );

  Ok(BakedLibrary {
    models: baked,
    patterns,
    occlusion,
    material_count,
    generation,
  })
}

fn validate_surface(model: usize, side: Option<Side>, surface: &ModelSurface) -> Result<(), BakeError> {
  if surface.indices.len() % 3 != 0 {
    return Err(BakeError::InvalidIndexCount {
      model,
      side,
      count: surface.indices.len(),
    });
  }
  let vertex_count = surface.positions.len();
  if let Some(&index) = surface.indices.iter().find(|&&i| i as usize >= vertex_count) {
    return Err(BakeError::IndexOutOfRange {
      model,
      index,
      vertex_count,
    });
  }
  Ok(())
}

fn validate_model(id: usize, model: &VoxelModel) -> Result<(), BakeError> {
  if model.material_id >= MAX_MATERIALS {
    return Err(BakeError::TooManyMaterials(model.material_id));
  }
  for side in Side::ALL {
    validate_surface(id, Some(side), &model.sides[side.index()])?;
  }
  validate_surface(id, None, &model.interior)
}

fn bake_model(
  model: &VoxelModel,
  bitmaps: [PatternBitmap; Side::COUNT],
  pool: &mut PatternPool,
) -> BakedModel {
  let mut side_patterns = [0u32; Side::COUNT];
  let mut empty_sides_mask = 0u8;
  let mut full_sides_mask = 0u8;
  let mut contributes_to_ao = true;

  for (side, bitmap) in Side::ALL.into_iter().zip(bitmaps) {
    if model.sides[side.index()].is_empty() {
      empty_sides_mask |= side.bit();
    }
    if bitmap.is_full() {
      full_sides_mask |= side.bit();
    } else {
      contributes_to_ao = false;
    }
    side_patterns[side.index()] = pool.intern(bitmap);
  }

  BakedModel {
    sides: Side::ALL.map(|side| bake_side_surface(side, &model.sides[side.index()])),
    interior: bake_interior_surface(&model.interior),
    side_patterns,
    empty: model.is_empty(),
    empty_sides_mask,
    full_sides_mask,
    contributes_to_ao,
    transparency_index: model.transparency_index,
    culls_neighbors: model.culls_neighbors,
    color: model.color,
    material_id: model.material_id,
  }
}

fn bake_side_surface(side: Side, surface: &ModelSurface) -> BakedSurface {
  BakedSurface {
    positions: surface.positions.iter().map(|p| p.to_array()).collect(),
    normals: vec![side.normal(); surface.positions.len()],
    indices: surface.indices.clone(),
  }
}

/// Interior triangles get flat normals, so vertices are split per triangle.
fn bake_interior_surface(surface: &ModelSurface) -> BakedSurface {
  let mut baked = BakedSurface::default();
  for tri in surface.indices.chunks_exact(3) {
    let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| surface.positions[i as usize]);
    let normal = (b - a).cross(c - a).normalize_or(Vec3::Y).to_array();
    let base = baked.positions.len() as u32;
    baked.positions.extend([a, b, c].map(|p| p.to_array()));
    baked.normals.extend_from_slice(&[normal; 3]);
    baked.indices.extend_from_slice(&[base, base + 1, base + 2]);
  }
  baked
}

#[cfg(test)]
#[path = "bake_test.rs"]
mod bake_test;
