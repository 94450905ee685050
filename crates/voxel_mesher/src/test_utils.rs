//! Test fixtures shared by the mesher tests.
//!
//! Provides a small model catalog, padded grid builders and geometry
//! inspection helpers.

use std::collections::HashMap;

use crate::library::{bake_library, BakedLibrary, VoxelModel};
use crate::storage::{Depth, VoxelGrid};
use crate::types::{Color8, MaterialArrays, MeshOutput};

// =============================================================================
// Model catalog
// =============================================================================

pub const AIR: u32 = 0;
pub const STONE: u32 = 1;
pub const GLASS: u32 = 2;
pub const SLAB: u32 = 3;
pub const LEAVES: u32 = 4;

pub const STONE_COLOR: Color8 = Color8::new(128, 128, 128, 255);

/// Air, stone, glass, half slab and non-culling leaves.
pub fn standard_models() -> Vec<VoxelModel> {
  vec![
    VoxelModel::air(),
    VoxelModel::cube(STONE_COLOR),
    VoxelModel::cube(Color8::new(200, 220, 255, 128))
      .with_transparency_index(1)
      .with_material_id(1),
    VoxelModel::slab(0.5, Color8::new(160, 120, 80, 255)),
    VoxelModel::cube(Color8::new(40, 160, 40, 255)).with_culls_neighbors(false),
  ]
}

pub fn standard_library() -> BakedLibrary {
  bake_library(&standard_models(), 1).expect("standard catalog bakes")
}

// =============================================================================
// Grids
// =============================================================================

/// Padded extent for an interior extent.
pub fn padded(interior: [usize; 3]) -> [usize; 3] {
  interior.map(|s| s + 2)
}

/// Dense 8-bit grid with `interior` cells, all zero, padding included.
pub fn empty_grid_u8(interior: [usize; 3]) -> VoxelGrid {
  let size = padded(interior);
  VoxelGrid::from_u8(size, vec![0; size[0] * size[1] * size[2]]).expect("valid grid")
}

/// Dense grid of `depth` with every interior cell set to `value` and air
/// padding.
pub fn filled_interior(interior: [usize; 3], depth: Depth, value: u32) -> VoxelGrid {
  let size = padded(interior);
  let mut grid = match depth {
    Depth::Bit8 => VoxelGrid::from_u8(size, vec![0; size[0] * size[1] * size[2]]),
    Depth::Bit16 => VoxelGrid::from_u16(size, vec![0; size[0] * size[1] * size[2]]),
    Depth::Bit32 => VoxelGrid::from_u32(size, vec![0; size[0] * size[1] * size[2]]),
  }
  .expect("valid grid");
  grid.fill_box([1, 1, 1], interior, value);
  grid
}

// =============================================================================
// Geometry inspection
// =============================================================================

/// Quads in one bucket (two triangles each).
pub fn quad_count(arrays: &MaterialArrays) -> usize {
  arrays.triangle_count() / 2
}

pub fn total_quads(output: &MeshOutput) -> usize {
  output.surfaces.iter().map(quad_count).sum()
}

fn quad_area(arrays: &MaterialArrays, first_vertex: usize) -> f32 {
  let p = &arrays.positions[first_vertex..first_vertex + 4];
  let du: f32 = (0..3).map(|i| (p[1][i] - p[0][i]).abs()).sum();
  let dv: f32 = (0..3).map(|i| (p[2][i] - p[0][i]).abs()).sum();
  du * dv
}

/// Area of every emitted quad, keyed by rounded normal.
pub fn area_by_normal(output: &MeshOutput) -> HashMap<[i32; 3], f32> {
  let mut areas = HashMap::new();
  for arrays in &output.surfaces {
    for first in (0..arrays.positions.len()).step_by(4) {
      let normal = arrays.normals[first].map(|c| c.round() as i32);
      *areas.entry(normal).or_insert(0.0) += quad_area(arrays, first);
    }
  }
  areas
}

/// Quad count keyed by rounded normal.
pub fn quads_by_normal(output: &MeshOutput) -> HashMap<[i32; 3], usize> {
  let mut counts = HashMap::new();
  for arrays in &output.surfaces {
    for first in (0..arrays.positions.len()).step_by(4) {
      let normal = arrays.normals[first].map(|c| c.round() as i32);
      *counts.entry(normal).or_insert(0) += 1;
    }
  }
  counts
}

/// Every triangle's geometric normal agrees with its vertex normal.
pub fn assert_outward_winding(arrays: &MaterialArrays) {
  assert_outward_winding_of(&arrays.positions, &arrays.normals, &arrays.indices);
}

pub fn assert_outward_winding_of(positions: &[[f32; 3]], normals: &[[f32; 3]], indices: &[u32]) {
  for tri in indices.chunks(3) {
    let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| glam::Vec3::from_array(positions[i as usize]));
    let geometric = (b - a).cross(c - a);
    let normal = glam::Vec3::from_array(normals[tri[0] as usize]);
    assert!(
      geometric.dot(normal) > 0.0,
      "triangle {:?} is wound against its normal {:?}",
      tri,
      normal
    );
  }
}

pub const AXIS_NORMALS: [[i32; 3]; 6] = [
  [-1, 0, 0],
  [1, 0, 0],
  [0, -1, 0],
  [0, 1, 0],
  [0, 0, -1],
  [0, 0, 1],
];
