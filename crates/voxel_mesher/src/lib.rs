//! voxel_mesher - Engine independent blocky and cube voxel meshing
//!
//! Turns padded chunks of per-cell values into render-ready geometry.
//!
//! # Features
//!
//! - **Cubes mesher**: one colour per cell, simple or greedy merged quads,
//!   optional per-voxel colour atlas with exact UVs
//! - **Blocky mesher**: baked voxel models with shape-aware face culling and
//!   baked ambient occlusion
//! - **Model library**: side silhouettes rasterized once, deduplicated and
//!   related by an occlusion matrix, published as generation-counted
//!   snapshots
//! - **Shadow occluders**: coarse proxy quads for fully covered chunk sides
//!
//! # Example
//!
//! ```ignore
//! use voxel_mesher::{CubesMesher, MeshScratch, MesherConfig, VoxelGrid, Depth};
//!
//! // 16³ interior plus one cell of padding on each side
//! let mut grid = VoxelGrid::new([18, 18, 18], Depth::Bit8, 0)?;
//! grid.fill_box([1, 1, 1], [16, 8, 16], 0xff);
//!
//! let mesher = CubesMesher::new(&MesherConfig::new());
//! let mut scratch = MeshScratch::new();
//! let output = mesher.build(&grid.view(), &mut scratch);
//!
//! println!("{} quads, {} triangles", output.stats.quads, output.triangle_count());
//! ```

pub mod blocky;
pub mod config;
pub mod constants;
pub mod cubes;
pub mod error;
pub mod library;
pub mod metrics;
pub mod occluders;
pub mod palette;
pub mod storage;
pub mod types;

#[cfg(test)]
mod test_utils;

// Re-export commonly used items
pub use blocky::BlockyMesher;
pub use config::{ColorMode, MesherConfig};
pub use constants::{Axis, Side, ALL_SIDES_MASK, MATERIAL_OPAQUE, MATERIAL_TRANSPARENT, PADDING};
pub use cubes::{CubesMesher, MeshScratch};
pub use error::{BakeError, ConfigError, GridError, MeshError};
pub use library::{bake_library, BakedLibrary, BakedModel, ModelLibrary, VoxelModel};
pub use occluders::{generate_shadow_occluders, ShadowOccluders};
pub use palette::ColorPalette;
pub use storage::{Depth, VoxelGrid, VoxelGridView};
pub use types::{Color8, MaterialArrays, MeshOutput, MeshStats, OccluderArrays};
