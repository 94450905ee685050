//! Atlas packer for greedy quads carrying per-voxel colours.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  During greedy emission (per quad)                              │
//! │    push 4 placeholder UVs                                       │
//! │    copy the rectangle's colours row by row into `colors`        │
//! │    record AtlasImageInfo { offsets, size, bucket }              │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  pack_rectangles: guillotiere allocation, largest first,        │
//! │  atlas doubled on failure, final image cropped to used extent   │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  patch UVs = pixel bounds / image size, blit colours            │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

use guillotiere::{AllocatorOptions, SimpleAtlasAllocator, Size};
use image::{Rgba, RgbaImage};

use crate::types::{Color8, MaterialArrays};

/// One atlased quad.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AtlasImageInfo {
  /// Offset of the quad's first colour in the scratch colour buffer.
  pub first_color_index: usize,
  /// First of the quad's four vertices in its bucket.
  pub first_vertex_index: usize,
  pub size_x: u32,
  pub size_y: u32,
  /// Output bucket holding the quad.
  pub surface_index: usize,
}

/// Per-build atlas scratch, reused across builds.
#[derive(Clone, Debug, Default)]
pub struct AtlasScratch {
  pub colors: Vec<Color8>,
  pub images: Vec<AtlasImageInfo>,
}

impl AtlasScratch {
  pub fn clear(&mut self) {
    self.colors.clear();
    self.images.clear();
  }

  pub fn is_empty(&self) -> bool {
    self.images.is_empty()
  }
}

/// Pixel placement of one packed rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PackedRect {
  pub x: u32,
  pub y: u32,
  pub width: u32,
  pub height: u32,
}

impl PackedRect {
  pub fn intersects(&self, other: &PackedRect) -> bool {
    self.x < other.x + other.width
      && other.x < self.x + self.width
      && self.y < other.y + other.height
      && other.y < self.y + self.height
  }
}

fn allocator_options() -> AllocatorOptions {
  AllocatorOptions {
    alignment: Size::new(1, 1),
    small_size_threshold: 3,
    large_size_threshold: 8,
  }
}

/// Place every `(width, height)` without overlap. Returns placements in input
/// order and the smallest image extent containing them all.
pub fn pack_rectangles(sizes: &[(u32, u32)]) -> (Vec<PackedRect>, [u32; 2]) {
  if sizes.is_empty() {
    return (Vec::new(), [0, 0]);
  }

  let area: u64 = sizes.iter().map(|&(w, h)| w as u64 * h as u64).sum();
  let widest = sizes.iter().map(|&(w, h)| w.max(h)).max().unwrap_or(1);
  let side = ((area as f64).sqrt().ceil() as u32)
    .max(widest)
    .next_power_of_two();

  let mut atlas = SimpleAtlasAllocator::with_options(Size::new(side as i32, side as i32), &allocator_options());

  // Largest first, ties by input order.
  let mut order: Vec<usize> = (0..sizes.len()).collect();
  order.sort_by_key(|&i| {
    let (w, h) = sizes[i];
    (std::cmp::Reverse(w.max(h)), std::cmp::Reverse(w * h), i)
  });

  let mut placed = vec![
    PackedRect {
      x: 0,
      y: 0,
      width: 0,
      height: 0,
    };
    sizes.len()
  ];
  let mut extent = [0u32; 2];

  for i in order {
    let (w, h) = sizes[i];
    let rect = loop {
      if let Some(rect) = atlas.allocate(Size::new(w as i32, h as i32)) {
        break rect;
      }
      let current = atlas.size();
      atlas.grow(Size::new(current.width * 2, current.height * 2));
    };
    let packed = PackedRect {
      x: rect.min.x as u32,
      y: rect.min.y as u32,
      width: w,
      height: h,
    };
    extent[0] = extent[0].max(packed.x + w);
    extent[1] = extent[1].max(packed.y + h);
    placed[i] = packed;
  }

  (placed, extent)
}

/// Pack every recorded quad image, patch the quads' UVs and build the atlas.
/// Returns `None` when no quad was recorded.
#[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "cubes::build_atlas"))]
pub fn build_atlas(scratch: &AtlasScratch, surfaces: &mut [MaterialArrays]) -> Option<RgbaImage> {
  if scratch.is_empty() {
    return None;
  }

  let sizes: Vec<(u32, u32)> = scratch.images.iter().map(|i| (i.size_x, i.size_y)).collect();
  let (placed, [width, height]) = pack_rectangles(&sizes);
  let (fw, fh) = (width as f32, height as f32);
  let mut image = RgbaImage::new(width, height);

  for (info, rect) in scratch.images.iter().zip(&placed) {
    let x0 = rect.x as f32 / fw;
    let y0 = rect.y as f32 / fh;
    let x1 = (rect.x + rect.width) as f32 / fw;
    let y1 = (rect.y + rect.height) as f32 / fh;
    let uvs = &mut surfaces[info.surface_index].uvs;
    uvs[info.first_vertex_index..info.first_vertex_index + 4].copy_from_slice(&[[x0, y0], [x1, y0], [x0, y1], [x1, y1]]);

    let colors = &scratch.colors[info.first_color_index..];
    for j in 0..info.size_y {
      for i in 0..info.size_x {
        let color = colors[(j * info.size_x + i) as usize];
        image.put_pixel(rect.x + i, rect.y + j, Rgba(color.to_rgba()));
      }
    }
  }

  Some(image)
}

#[cfg(test)]
#[path = "atlas_test.rs"]
mod atlas_test;
