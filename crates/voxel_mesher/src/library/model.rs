//! Voxel model definitions as authored, before baking.
//!
//! Model geometry lives in the unit cube `[0, 1]³`. Triangles lying exactly
//! on one of the six cube faces belong to that side; everything else is
//! interior geometry that is always drawn when the cell is drawn.

use glam::Vec3;

use crate::constants::{Axis, Side};
use crate::types::Color8;

/// Indexed triangle list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ModelSurface {
  pub positions: Vec<Vec3>,
  /// Triangle indices (3 indices per triangle).
  pub indices: Vec<u32>,
}

impl ModelSurface {
  pub fn is_empty(&self) -> bool {
    self.indices.is_empty()
  }

  pub fn push_triangle(&mut self, triangle: [Vec3; 3]) {
    let base = self.positions.len() as u32;
    self.positions.extend_from_slice(&triangle);
    self.indices.extend_from_slice(&[base, base + 1, base + 2]);
  }

  /// Append an axis-aligned quad on the plane `plane` of `side`'s axis,
  /// wound to face along `side`.
  pub fn push_side_quad(&mut self, side: Side, plane: f32, u0: f32, v0: f32, u1: f32, v1: f32) {
    let base = self.positions.len() as u32;
    let corners = crate::constants::deck_quad(side.axis(), plane, u0, v0, u1, v1);
    self.positions.extend(corners.iter().map(|c| Vec3::from_array(*c)));
    let lut = crate::constants::quad_indices(side.axis(), side.is_positive());
    self.indices.extend(lut.iter().map(|i| base + i));
  }
}

/// One voxel type as authored.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelModel {
  /// Geometry lying on each cube side, indexed by [`Side::index`].
  pub sides: [ModelSurface; Side::COUNT],

  /// Geometry not lying on any cube side.
  pub interior: ModelSurface,

  /// Transparency rank. 0 is fully opaque; higher ranks never cull lower ones.
  pub transparency_index: u8,

  /// Whether this model hides faces of its neighbours.
  pub culls_neighbors: bool,

  pub color: Color8,

  /// Output bucket of the blocky mesher.
  pub material_id: u32,
}

impl Default for VoxelModel {
  fn default() -> Self {
    Self::air()
  }
}

impl VoxelModel {
  /// Empty model without geometry.
  pub fn air() -> Self {
    Self {
      sides: Default::default(),
      interior: ModelSurface::default(),
      transparency_index: 0,
      culls_neighbors: false,
      color: Color8::TRANSPARENT,
      material_id: 0,
    }
  }

  /// Full unit cube.
  pub fn cube(color: Color8) -> Self {
    Self::slab(1.0, color)
  }

  /// Box covering `[0, 1] × [0, height] × [0, 1]`.
  pub fn slab(height: f32, color: Color8) -> Self {
    let h = height.clamp(0.0, 1.0);
    let mut model = Self {
      color,
      culls_neighbors: true,
      ..Self::air()
    };

    for side in Side::ALL {
      let surface = match side {
        Side::PositiveY if h < 1.0 => &mut model.interior,
        _ => &mut model.sides[side.index()],
      };
      let plane = match side {
        Side::PositiveY => h,
        s if s.is_positive() => 1.0,
        _ => 0.0,
      };
      // Height runs along Y: u on X sides, v on Z sides.
      let (u1, v1) = match side.axis() {
        Axis::X => (h, 1.0),
        Axis::Y => (1.0, 1.0),
        Axis::Z => (1.0, h),
      };
      if h > 0.0 {
        surface.push_side_quad(side, plane, 0.0, 0.0, u1, v1);
      }
    }
    model
  }

  /// Classify an arbitrary triangle soup. A triangle belongs to a side when
  /// all three vertices lie exactly on that side's plane; every other
  /// triangle is interior.
  pub fn from_mesh(triangles: &[[Vec3; 3]]) -> Self {
    let mut model = Self {
      culls_neighbors: true,
      color: Color8::WHITE,
      ..Self::air()
    };
    for triangle in triangles {
      match classify_triangle(triangle) {
        Some(side) => model.sides[side.index()].push_triangle(*triangle),
        None => model.interior.push_triangle(*triangle),
      }
    }
    model
  }

  pub fn with_color(mut self, color: Color8) -> Self {
    self.color = color;
    self
  }

  pub fn with_transparency_index(mut self, index: u8) -> Self {
    self.transparency_index = index;
    self
  }

  pub fn with_culls_neighbors(mut self, culls: bool) -> Self {
    self.culls_neighbors = culls;
    self
  }

  pub fn with_material_id(mut self, id: u32) -> Self {
    self.material_id = id;
    self
  }

  pub fn is_empty(&self) -> bool {
    self.interior.is_empty() && self.sides.iter().all(ModelSurface::is_empty)
  }
}

/// Side whose plane holds all three vertices, compared exactly.
fn classify_triangle(triangle: &[Vec3; 3]) -> Option<Side> {
  Side::ALL.into_iter().find(|side| {
    let axis = side.axis().index();
    let plane = if side.is_positive() { 1.0 } else { 0.0 };
    triangle.iter().all(|p| p[axis] == plane)
  })
}

#[cfg(test)]
#[path = "model_test.rs"]
mod model_test;
