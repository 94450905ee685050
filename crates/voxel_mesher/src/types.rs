//! Core data types shared by the meshers.

use smallvec::SmallVec;

use crate::constants::{quad_indices, Axis, CUBES_MATERIAL_COUNT};

/// 8-bit per channel RGBA colour.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Color8 {
  pub r: u8,
  pub g: u8,
  pub b: u8,
  pub a: u8,
}

impl Color8 {
  pub const TRANSPARENT: Color8 = Color8::new(0, 0, 0, 0);
  pub const WHITE: Color8 = Color8::new(255, 255, 255, 255);

  #[inline]
  pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
    Self { r, g, b, a }
  }

  /// Decode `RRGGBBAA` (2 bits per channel).
  #[inline]
  pub const fn from_u8(v: u8) -> Self {
    Self::new(
      ((v >> 6) & 0x3) * 85,
      ((v >> 4) & 0x3) * 85,
      ((v >> 2) & 0x3) * 85,
      (v & 0x3) * 85,
    )
  }

  /// Decode `RRRRGGGGBBBBAAAA` (4 bits per channel).
  #[inline]
  pub const fn from_u16(v: u16) -> Self {
    Self::new(
      ((v >> 12) & 0xf) as u8 * 17,
      ((v >> 8) & 0xf) as u8 * 17,
      ((v >> 4) & 0xf) as u8 * 17,
      (v & 0xf) as u8 * 17,
    )
  }

  /// Decode `RGBA8888`.
  #[inline]
  pub const fn from_u32(v: u32) -> Self {
    Self::new((v >> 24) as u8, (v >> 16) as u8, (v >> 8) as u8, v as u8)
  }

  #[inline]
  pub const fn to_u32(self) -> u32 {
    (self.r as u32) << 24 | (self.g as u32) << 16 | (self.b as u32) << 8 | self.a as u32
  }

  #[inline]
  pub fn to_rgba(self) -> [u8; 4] {
    [self.r, self.g, self.b, self.a]
  }

  /// Normalized linear components in [0, 1].
  #[inline]
  pub fn to_f32(self) -> [f32; 4] {
    [self.r, self.g, self.b, self.a].map(|c| c as f32 / 255.0)
  }

  #[inline]
  pub fn is_opaque(self) -> bool {
    self.a == 255
  }
}

// =============================================================================
// Output geometry
// =============================================================================

/// Vertex and index streams for one output material bucket.
///
/// `colors` and `uvs` are either empty or parallel to `positions`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MaterialArrays {
  pub positions: Vec<[f32; 3]>,
  pub normals: Vec<[f32; 3]>,
  pub colors: Vec<[f32; 4]>,
  pub uvs: Vec<[f32; 2]>,
  /// Triangle indices (3 indices per triangle).
  pub indices: Vec<u32>,
}

impl MaterialArrays {
  pub fn new() -> Self {
    Self::default()
  }

  /// Clear all buffers, preserving capacity.
  pub fn clear(&mut self) {
    self.positions.clear();
    self.normals.clear();
    self.colors.clear();
    self.uvs.clear();
    self.indices.clear();
  }

  /// Returns true if no geometry was generated.
  pub fn is_empty(&self) -> bool {
    self.positions.is_empty()
  }

  #[inline]
  pub fn vertex_count(&self) -> usize {
    self.positions.len()
  }

  /// Number of triangles in the bucket.
  pub fn triangle_count(&self) -> usize {
    self.indices.len() / 3
  }

  /// Append one axis-aligned quad. Returns the index of its first vertex.
  ///
  /// `corners` follow the deck vertex order (0,0) (1,0) (0,1) (1,1).
  pub fn push_quad(
    &mut self,
    axis: Axis,
    positive: bool,
    corners: [[f32; 3]; 4],
    color: Option<[f32; 4]>,
    uvs: Option<[[f32; 2]; 4]>,
  ) -> usize {
    let base = self.positions.len();
    let mut normal = axis.unit();
    if !positive {
      normal = normal.map(|c| -c);
    }
    self.positions.extend_from_slice(&corners);
    self.normals.extend_from_slice(&[normal; 4]);
    if let Some(color) = color {
      self.colors.extend_from_slice(&[color; 4]);
    }
    if let Some(uvs) = uvs {
      self.uvs.extend_from_slice(&uvs);
    }
    let base_index = base as u32;
    self
      .indices
      .extend(quad_indices(axis, positive).iter().map(|i| base_index + i));
    base
  }

  /// Assert the stream invariants: every index refers to an appended vertex and
  /// optional streams are parallel to positions.
  pub fn assert_consistent(&self) {
    let n = self.positions.len();
    assert_eq!(self.normals.len(), n);
    assert!(self.colors.is_empty() || self.colors.len() == n);
    assert!(self.uvs.is_empty() || self.uvs.len() == n);
    assert_eq!(self.indices.len() % 3, 0);
    assert!(self.indices.iter().all(|&i| (i as usize) < n));
  }
}

/// Build statistics attached to every [`MeshOutput`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MeshStats {
  /// Emitted cube quads, or emitted model sides for the blocky mesher.
  pub quads: u32,
  pub vertices: u32,
  pub indices: u32,
  /// Wall time of the build in microseconds.
  pub build_time_us: u64,
}

/// Mesh generation result.
#[derive(Clone, Debug, Default)]
pub struct MeshOutput {
  /// One entry per material bucket.
  pub surfaces: SmallVec<[MaterialArrays; CUBES_MATERIAL_COUNT]>,

  /// Packed per-voxel colours, present when atlas packing ran.
  pub atlas: Option<image::RgbaImage>,

  /// UVs address exact texels of `atlas` and must not be quantized.
  pub exact_uvs: bool,

  pub stats: MeshStats,
}

impl MeshOutput {
  pub fn new() -> Self {
    Self::default()
  }

  /// Output with `count` empty buckets.
  pub fn with_surfaces(count: usize) -> Self {
    let mut output = Self::default();
    output.surfaces.resize_with(count, MaterialArrays::default);
    output
  }

  /// Clear all buffers, preserving capacity.
  pub fn clear(&mut self) {
    for surface in &mut self.surfaces {
      surface.clear();
    }
    self.atlas = None;
    self.exact_uvs = false;
    self.stats = MeshStats::default();
  }

  /// Returns true if no geometry was generated.
  pub fn is_empty(&self) -> bool {
    self.surfaces.iter().all(MaterialArrays::is_empty)
  }

  /// Number of triangles across all buckets.
  pub fn triangle_count(&self) -> usize {
    self.surfaces.iter().map(MaterialArrays::triangle_count).sum()
  }

  pub fn vertex_count(&self) -> usize {
    self.surfaces.iter().map(MaterialArrays::vertex_count).sum()
  }

  /// Fill vertex/index counts in `stats` from the current buffers.
  pub(crate) fn update_counts(&mut self) {
    self.stats.vertices = self.vertex_count() as u32;
    self.stats.indices = self.surfaces.iter().map(|s| s.indices.len() as u32).sum();
  }
}

/// Shadow proxy geometry: positions, normals and indices only.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OccluderArrays {
  pub positions: Vec<[f32; 3]>,
  pub normals: Vec<[f32; 3]>,
  pub indices: Vec<u32>,
}

impl OccluderArrays {
  pub fn clear(&mut self) {
    self.positions.clear();
    self.normals.clear();
    self.indices.clear();
  }

  pub fn is_empty(&self) -> bool {
    self.positions.is_empty()
  }

  pub fn quad_count(&self) -> usize {
    self.indices.len() / 6
  }

  /// Append one axis-aligned quad with outward winding.
  pub fn push_quad(&mut self, axis: Axis, positive: bool, corners: [[f32; 3]; 4]) {
    let base = self.positions.len() as u32;
    let mut normal = axis.unit();
    if !positive {
      normal = normal.map(|c| -c);
    }
    self.positions.extend_from_slice(&corners);
    self.normals.extend_from_slice(&[normal; 4]);
    self
      .indices
      .extend(quad_indices(axis, positive).iter().map(|i| base + i));
  }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
