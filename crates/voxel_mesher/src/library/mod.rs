//! Voxel model library: authored models, baked snapshots and the shared
//! snapshot holder.
//!
//! # Lifecycle
//!
//! ```text
//!  Vec<VoxelModel> ──bake──▶ BakedLibrary (generation N, immutable)
//!                                 │
//!                     Arc swap under write lock
//!                                 │
//!                                 ▼
//!  ModelLibrary ──snapshot()──▶ Arc<BakedLibrary> held by each mesh build
//! ```
//!
//! Builds keep the generation they started with; a concurrent bake swaps in a
//! new `Arc` without touching the one in use.

pub mod bake;
pub mod model;
pub mod patterns;
pub mod raster;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use web_time::Instant;

pub use bake::bake_library;
pub use model::{ModelSurface, VoxelModel};
pub use patterns::{OcclusionMatrix, PatternBitmap, PatternPool};

use crate::constants::{Side, AIR_ID};
use crate::error::BakeError;
use crate::metrics;
use crate::types::Color8;

/// Render-ready geometry of one model surface.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BakedSurface {
  pub positions: Vec<[f32; 3]>,
  pub normals: Vec<[f32; 3]>,
  pub indices: Vec<u32>,
}

impl BakedSurface {
  pub fn is_empty(&self) -> bool {
    self.indices.is_empty()
  }
}

/// One model after baking.
#[derive(Clone, Debug, PartialEq)]
pub struct BakedModel {
  pub sides: [BakedSurface; Side::COUNT],
  pub interior: BakedSurface,

  /// Pattern pool index of each side.
  pub side_patterns: [u32; Side::COUNT],

  /// No geometry at all.
  pub empty: bool,
  /// Sides without triangles.
  pub empty_sides_mask: u8,
  /// Sides whose pattern covers the whole face.
  pub full_sides_mask: u8,
  /// All six sides are full, so the model darkens neighbours' corners.
  pub contributes_to_ao: bool,

  pub transparency_index: u8,
  pub culls_neighbors: bool,
  pub color: Color8,
  pub material_id: u32,
}

impl BakedModel {
  #[inline]
  pub fn pattern(&self, side: Side) -> u32 {
    self.side_patterns[side.index()]
  }

  #[inline]
  pub fn is_side_empty(&self, side: Side) -> bool {
    self.empty_sides_mask & side.bit() != 0
  }

  #[inline]
  pub fn is_side_full(&self, side: Side) -> bool {
    self.full_sides_mask & side.bit() != 0
  }
}

/// Immutable baked snapshot of a model catalog.
#[derive(Clone, Debug, Default)]
pub struct BakedLibrary {
  models: Vec<BakedModel>,
  patterns: Vec<PatternBitmap>,
  occlusion: OcclusionMatrix,
  material_count: usize,
  generation: u64,
}

impl BakedLibrary {
  /// Baked model for a cell value. Air and ids outside the catalog yield
  /// `None`.
  #[inline]
  pub fn model(&self, id: u32) -> Option<&BakedModel> {
    if id == AIR_ID {
      return None;
    }
    self.models.get(id as usize).filter(|m| !m.empty)
  }

  pub fn models(&self) -> &[BakedModel] {
    &self.models
  }

  pub fn patterns(&self) -> &[PatternBitmap] {
    &self.patterns
  }

  pub fn occlusion(&self) -> &OcclusionMatrix {
    &self.occlusion
  }

  /// Number of blocky output buckets.
  pub fn material_count(&self) -> usize {
    self.material_count.max(1)
  }

  pub fn generation(&self) -> u64 {
    self.generation
  }

  /// Whether `side` of `model` is visible next to `neighbor`.
  ///
  /// Visible when the neighbour is air, more transparent, or does not cull.
  /// Otherwise visible only when the two touching patterns differ and the
  /// neighbour's pattern does not hide this one.
  pub fn is_face_visible(&self, model: &BakedModel, side: Side, neighbor: Option<&BakedModel>) -> bool {
    let Some(other) = neighbor else {
      return true;
    };
    if other.empty || other.transparency_index > model.transparency_index || !other.culls_neighbors {
      return true;
    }
    let own = model.pattern(side);
    let theirs = other.pattern(side.opposite());
    own != theirs && !self.occlusion.occludes(theirs, own)
  }
}

// =============================================================================
// Shared snapshot holder
// =============================================================================

/// Owner of the current baked snapshot, shared by every mesh worker.
#[derive(Debug)]
pub struct ModelLibrary {
  current: RwLock<Arc<BakedLibrary>>,
  next_generation: AtomicU64,
}

impl Default for ModelLibrary {
  fn default() -> Self {
    Self::new()
  }
}

impl ModelLibrary {
  /// Library holding an empty generation 0 snapshot.
  pub fn new() -> Self {
    Self {
      current: RwLock::new(Arc::new(BakedLibrary::default())),
      next_generation: AtomicU64::new(1),
    }
  }

  /// Current snapshot. Cheap; the read lock is held only to clone the `Arc`.
  pub fn snapshot(&self) -> Arc<BakedLibrary> {
    self
      .current
      .read()
      .unwrap_or_else(PoisonError::into_inner)
      .clone()
  }

  pub fn generation(&self) -> u64 {
    self.snapshot().generation()
  }

  /// Bake `models` and publish the result. On failure the previous snapshot
  /// stays current.
  pub fn bake(&self, models: &[VoxelModel]) -> Result<Arc<BakedLibrary>, BakeError> {
    let generation = self.next_generation.fetch_add(1, Ordering::Relaxed);
    let start = Instant::now();
    let baked = match bake_library(models, generation) {
      Ok(baked) => Arc::new(baked),
      Err(err) => {
        tracing::error!(generation, %err, "library bake failed, keeping previous snapshot");
        return Err(err);
      }
    };
    metrics::record_bake(generation, start.elapsed().as_micros() as u64);

    let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
    // A slower bake that started earlier must not replace a newer one.
    if current.generation() < generation {
      *current = baked.clone();
    }
    Ok(baked)
  }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod mod_test;
