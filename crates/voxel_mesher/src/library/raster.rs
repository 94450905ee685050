//! Pattern rasterizer.
//!
//! Projects the triangles of one model side onto the side's two in-plane axes,
//! scales them into an R×R grid and marks every cell whose centre lies inside
//! a triangle (edges inclusive).
//!
//! ```text
//!  Side axis   raster x   raster y
//!  ─────────   ────────   ────────
//!     X           y          z
//!     Y           x          z
//!     Z           x          y
//! ```
//!
//! Each triangle is first pushed outward from its centroid by
//! [`RASTER_TRIANGLE_GROWTH`] so that cell centres lying exactly on a shared
//! edge are not lost to rounding.

use glam::{Vec2, Vec3};

use super::patterns::PatternBitmap;
use crate::constants::{Side, RASTER_SIZE, RASTER_TRIANGLE_GROWTH};

/// Project a model-space point onto the raster plane of `side`, in raster
/// cells.
#[inline]
pub fn project(side: Side, p: Vec3) -> Vec2 {
  let (u, v) = side.axis().deck_axes();
  Vec2::new(p[u.index()], p[v.index()]) * RASTER_SIZE as f32
}

/// Rasterize an indexed triangle list lying on `side`.
///
/// `indices.len()` must be a multiple of 3 and every index in range; the baker
/// validates this before calling.
pub fn rasterize_side(side: Side, positions: &[Vec3], indices: &[u32]) -> PatternBitmap {
  let mut bitmap = PatternBitmap::empty();
  for tri in indices.chunks_exact(3) {
    let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| project(side, positions[i as usize]));
    rasterize_triangle(&mut bitmap, a, b, c);
  }
  bitmap
}

/// Move each vertex `amount` further away from the centroid.
fn grow_triangle(a: Vec2, b: Vec2, c: Vec2, amount: f32) -> [Vec2; 3] {
  let centroid = (a + b + c) / 3.0;
  [a, b, c].map(|p| p + (p - centroid).normalize_or_zero() * amount)
}

#[inline]
fn edge(a: Vec2, b: Vec2, p: Vec2) -> f32 {
  (b - a).perp_dot(p - a)
}

/// Inclusive point-in-triangle test, independent of winding.
#[inline]
pub fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
  let d0 = edge(a, b, p);
  let d1 = edge(b, c, p);
  let d2 = edge(c, a, p);
  let has_neg = d0 < 0.0 || d1 < 0.0 || d2 < 0.0;
  let has_pos = d0 > 0.0 || d1 > 0.0 || d2 > 0.0;
  !(has_neg && has_pos)
}

fn rasterize_triangle(bitmap: &mut PatternBitmap, a: Vec2, b: Vec2, c: Vec2) {
  // Degenerate triangles cover no area.
  if edge(a, b, c) == 0.0 {
    return;
  }
  let [a, b, c] = grow_triangle(a, b, c, RASTER_TRIANGLE_GROWTH);

  let min = a.min(b).min(c).floor().max(Vec2::ZERO);
  let max = a.max(b).max(c).ceil().min(Vec2::splat(RASTER_SIZE as f32));
  if min.x >= max.x || min.y >= max.y {
    return;
  }

  for y in min.y as usize..max.y as usize {
    for x in min.x as usize..max.x as usize {
      let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
      if point_in_triangle(p, a, b, c) {
        bitmap.set(x, y);
      }
    }
  }
}

#[cfg(test)]
#[path = "raster_test.rs"]
mod raster_test;
