//! Cubes mesher: one colour per cell, unit cube faces.
//!
//! # Processing Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        INPUT                                    │
//! │  VoxelGridView  - padded cells, 8/16/32 bit, dense or uniform   │
//! │  MesherConfig   - greedy, colour mode, atlas                    │
//! │  MeshScratch    - per-worker masks and atlas buffers            │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  DISPATCH (once per build)                                      │
//! │    uniform channel → empty output                               │
//! │    cell width      → DenseCells<u8 | u16 | u32>                 │
//! │    colour mode     → Raw | Palette | ShaderPalette resolver      │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  PER AXIS, PER DECK                                             │
//! │    classify (near, far) by opacity rank                         │
//! │    simple:  one unit quad per face                              │
//! │    greedy:  fill mask → merge rectangles → one quad each        │
//! │    atlas:   greedy + record per-cell colours per quad           │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                        OUTPUT                                   │
//! │  surfaces[0] opaque, surfaces[1] transparent                    │
//! │  optional packed atlas image with exact UVs                     │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Face Ownership
//!
//! A face belongs to the higher-rank cell of the pair. Every deck from the
//! low padding layer to the last interior layer is scanned, so faces owned by
//! padding cells are emitted too. With `skip_padding_faces` those are left to
//! the neighbouring chunk and a seam is emitted once.

pub mod atlas;
pub mod greedy;
pub mod simple;
pub mod visibility;

use std::marker::PhantomData;
use std::sync::Arc;

use web_time::Instant;

use self::atlas::{build_atlas, AtlasImageInfo, AtlasScratch};
use self::greedy::{merge_mask, AtlasPayload, GreedyMask, MaskCell};
use self::visibility::{alpha_rank, classify, Facing};
use crate::config::{ColorMode, MesherConfig};
use crate::constants::{deck_quad, Axis, CUBES_MATERIAL_COUNT, MATERIAL_OPAQUE, MATERIAL_TRANSPARENT, PADDING};
use crate::error::MeshError;
use crate::metrics::{self, MesherKind};
use crate::palette::ColorPalette;
use crate::storage::{axis_strides, CellReader, CellSlice, CellValue, DenseCells, VoxelGridView};
use crate::types::{Color8, MaterialArrays, MeshOutput};

// =============================================================================
// Colour resolution
// =============================================================================

/// Maps a cell value to the colour that decides its rank and payload.
pub trait ColorResolver: Copy {
  fn resolve(&self, value: u32) -> Color8;
}

/// Packed colour with equal bits per channel, width taken from the cell type.
#[derive(Debug)]
pub struct RawColors<T>(PhantomData<T>);

impl<T> RawColors<T> {
  pub const fn new() -> Self {
    Self(PhantomData)
  }
}

impl<T> Default for RawColors<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T> Clone for RawColors<T> {
  fn clone(&self) -> Self {
    *self
  }
}

impl<T> Copy for RawColors<T> {}

impl<T: CellValue> ColorResolver for RawColors<T> {
  #[inline(always)]
  fn resolve(&self, value: u32) -> Color8 {
    T::from_u32(value).raw_color()
  }
}

#[derive(Clone, Copy, Debug)]
pub struct PaletteColors<'a>(pub &'a ColorPalette);

impl ColorResolver for PaletteColors<'_> {
  #[inline(always)]
  fn resolve(&self, value: u32) -> Color8 {
    self.0.get(value)
  }
}

/// Index in red, palette alpha in alpha; the shader resolves the rest.
#[derive(Clone, Copy, Debug)]
pub struct ShaderPaletteColors<'a>(pub &'a ColorPalette);

impl ColorResolver for ShaderPaletteColors<'_> {
  #[inline(always)]
  fn resolve(&self, value: u32) -> Color8 {
    Color8::new(value as u8, 0, 0, self.0.get(value).a)
  }
}

/// Output bucket for a face colour.
#[inline(always)]
pub fn bucket_of(color: Color8) -> usize {
  if color.is_opaque() {
    MATERIAL_OPAQUE
  } else {
    MATERIAL_TRANSPARENT
  }
}

// =============================================================================
// Deck traversal
// =============================================================================

/// One padded grid as seen by the face emitters.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FaceScan<R, C> {
  pub cells: R,
  pub colors: C,
  pub size: [usize; 3],
  /// Drop faces owned by a padding cell.
  pub skip_padding: bool,
}

impl<R: CellReader, C: ColorResolver> FaceScan<R, C> {
  /// Visit every visible face between padded layers `d` and `d + 1` along
  /// `axis`.
  ///
  /// `f` receives deck coordinates in the unpadded frame, the facing, the
  /// owning cell's raw value and its resolved colour.
  #[inline(always)]
  pub fn for_each_face(&self, axis: Axis, d: usize, mut f: impl FnMut(usize, usize, Facing, u32, Color8)) {
    let size = self.size;
    let (ua, va) = axis.deck_axes();
    let strides = axis_strides(size);
    let (sa, su, sv) = (strides[axis.index()], strides[ua.index()], strides[va.index()]);

    let near_owned = !self.skip_padding || d >= PADDING;
    let far_owned = !self.skip_padding || d + 1 < size[axis.index()] - PADDING;
    if !near_owned && !far_owned {
      return;
    }

    for v in PADDING..size[va.index()] - PADDING {
      for u in PADDING..size[ua.index()] - PADDING {
        let near = d * sa + u * su + v * sv;
        let near_value = self.cells.read(near);
        let far_value = self.cells.read(near + sa);
        if near_value == far_value {
          continue;
        }

        let near_color = self.colors.resolve(near_value);
        let far_color = self.colors.resolve(far_value);
        match classify(alpha_rank(near_color.a), alpha_rank(far_color.a)) {
          Some(Facing::Positive) if near_owned => f(u - PADDING, v - PADDING, Facing::Positive, near_value, near_color),
          Some(Facing::Negative) if far_owned => f(u - PADDING, v - PADDING, Facing::Negative, far_value, far_color),
          _ => {}
        }
      }
    }
  }

  /// Padded deck count along `axis`: every layer pair from the low padding
  /// layer to the high one.
  #[inline]
  pub fn deck_count(&self, axis: Axis) -> usize {
    self.size[axis.index()] - 1
  }
}

// =============================================================================
// Scratch
// =============================================================================

/// Per-worker scratch memory, reused across builds.
///
/// Never shared: the build takes it by `&mut`.
#[derive(Debug, Default)]
pub struct MeshScratch {
  value_mask: GreedyMask<u32>,
  atlas_mask: GreedyMask<AtlasPayload>,
  atlas: AtlasScratch,
}

impl MeshScratch {
  pub fn new() -> Self {
    Self::default()
  }

  /// Slots currently reserved by the greedy masks.
  pub fn mask_capacity(&self) -> usize {
    self.value_mask.capacity() + self.atlas_mask.capacity()
  }
}

// =============================================================================
// Mesher
// =============================================================================

/// Cubes mesher entry point.
#[derive(Clone, Debug)]
pub struct CubesMesher {
  config: MesherConfig,
  palette: Option<Arc<ColorPalette>>,
}

impl CubesMesher {
  /// Mesher using the resolved form of `config`.
  pub fn new(config: &MesherConfig) -> Self {
    Self {
      config: config.resolved(),
      palette: None,
    }
  }

  pub fn with_palette(mut self, palette: Arc<ColorPalette>) -> Self {
    self.palette = Some(palette);
    self
  }

  pub fn config(&self) -> &MesherConfig {
    &self.config
  }

  /// Mesh one padded grid.
  ///
  /// Input contract violations are logged and produce an empty output.
  #[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "cubes::build"))]
  pub fn build(&self, grid: &VoxelGridView<'_>, scratch: &mut MeshScratch) -> MeshOutput {
    let start = Instant::now();
    let mut output = MeshOutput::with_surfaces(CUBES_MATERIAL_COUNT);

    match self.build_into(grid, scratch, &mut output) {
      Ok(quads) => output.stats.quads = quads,
      Err(err) => {
        tracing::error!(%err, size = ?grid.size(), "cubes mesh build failed");
        output.clear();
      }
    }

    output.update_counts();
    output.stats.build_time_us = start.elapsed().as_micros() as u64;
    metrics::record_build(MesherKind::Cubes, &output.stats);
    output
  }

  fn build_into(
    &self,
    grid: &VoxelGridView<'_>,
    scratch: &mut MeshScratch,
    output: &mut MeshOutput,
  ) -> Result<u32, MeshError> {
    let palette = match self.config.color_mode {
      ColorMode::Raw => None,
      ColorMode::MesherPalette | ColorMode::ShaderPalette => {
        Some(self.palette.as_deref().ok_or(MeshError::MissingPalette)?)
      }
    };

    let size = grid.size();
    match grid.cells() {
      // Every pair compares equal, nothing is visible.
      CellSlice::Uniform(_) => Ok(0),
      CellSlice::U8(cells) => self.build_typed(cells, size, palette, scratch, output),
      CellSlice::U16(cells) => self.build_typed(cells, size, palette, scratch, output),
      CellSlice::U32(cells) => self.build_typed(cells, size, palette, scratch, output),
    }
  }

  fn build_typed<T: CellValue>(
    &self,
    cells: &[T],
    size: [usize; 3],
    palette: Option<&ColorPalette>,
    scratch: &mut MeshScratch,
    output: &mut MeshOutput,
  ) -> Result<u32, MeshError> {
    let cells = DenseCells(cells);
    let quads = match (self.config.color_mode, palette) {
      (ColorMode::Raw, _) => self.emit(cells, RawColors::<T>::new(), size, scratch, output),
      (ColorMode::MesherPalette, Some(p)) => self.emit(cells, PaletteColors(p), size, scratch, output),
      (ColorMode::ShaderPalette, Some(p)) => self.emit(cells, ShaderPaletteColors(p), size, scratch, output),
      (_, None) => return Err(MeshError::MissingPalette),
    };
    Ok(quads)
  }

  fn emit<R: CellReader, C: ColorResolver>(
    &self,
    cells: R,
    colors: C,
    size: [usize; 3],
    scratch: &mut MeshScratch,
    output: &mut MeshOutput,
  ) -> u32 {
    let scan = FaceScan {
      cells,
      colors,
      size,
      skip_padding: self.config.skip_padding_faces,
    };
    if !self.config.greedy_meshing {
      return simple::emit_simple(scan, &mut output.surfaces);
    }
    if !self.config.store_colors_in_texture {
      return emit_greedy(scan, &mut scratch.value_mask, &mut output.surfaces);
    }

    scratch.atlas.clear();
    let quads = emit_greedy_atlas(scan, &mut scratch.atlas_mask, &mut scratch.atlas, &mut output.surfaces);
    output.atlas = build_atlas(&scratch.atlas, &mut output.surfaces);
    output.exact_uvs = output.atlas.is_some();
    quads
  }
}

// =============================================================================
// Greedy emission
// =============================================================================

fn fill_mask<R: CellReader, C: ColorResolver, P: greedy::MergePayload>(
  scan: &FaceScan<R, C>,
  axis: Axis,
  d: usize,
  mask: &mut GreedyMask<P>,
  payload: impl Fn(u32, Color8) -> P,
) {
  let (ua, va) = axis.deck_axes();
  mask.reset(scan.size[ua.index()] - 2 * PADDING, scan.size[va.index()] - 2 * PADDING);
  scan.for_each_face(axis, d, |u, v, facing, value, color| {
    mask.set(u, v, MaskCell::new(facing, payload(value, color)));
  });
}

/// Greedy merge with the owning cell's raw value as payload.
#[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "cubes::emit_greedy"))]
fn emit_greedy<R: CellReader, C: ColorResolver>(
  scan: FaceScan<R, C>,
  mask: &mut GreedyMask<u32>,
  surfaces: &mut [MaterialArrays],
) -> u32 {
  let mut quads = 0;

  for axis in Axis::ALL {
    for d in 0..scan.deck_count(axis) {
      fill_mask(&scan, axis, d, mask, |value, _| value);
      let plane = d as f32;
      quads += merge_mask(mask, |quad, _| {
        let color = scan.colors.resolve(quad.payload);
        let (u0, v0) = (quad.x as f32, quad.y as f32);
        let (w, h) = (quad.width as f32, quad.height as f32);
        surfaces[bucket_of(color)].push_quad(
          axis,
          quad.facing.is_positive(),
          deck_quad(axis, plane, u0, v0, u0 + w, v0 + h),
          Some(color.to_f32()),
          Some([[0.0, 0.0], [w, 0.0], [0.0, h], [w, h]]),
        );
      });
    }
  }

  quads
}

/// Greedy merge across colours of one bucket, recording each quad's colours
/// for atlas packing.
#[cfg_attr(feature = "profiling", tracing::instrument(skip_all, name = "cubes::emit_greedy_atlas"))]
fn emit_greedy_atlas<R: CellReader, C: ColorResolver>(
  scan: FaceScan<R, C>,
  mask: &mut GreedyMask<AtlasPayload>,
  atlas: &mut AtlasScratch,
  surfaces: &mut [MaterialArrays],
) -> u32 {
  let mut quads = 0;

  for axis in Axis::ALL {
    for d in 0..scan.deck_count(axis) {
      fill_mask(&scan, axis, d, mask, |_, color| AtlasPayload {
        bucket: bucket_of(color) as u8,
        color,
      });
      let plane = d as f32;
      quads += merge_mask(mask, |quad, mask| {
        let surface_index = quad.payload.bucket as usize;
        let (u0, v0) = (quad.x as f32, quad.y as f32);
        let (w, h) = (quad.width as f32, quad.height as f32);
        let first_vertex_index = surfaces[surface_index].push_quad(
          axis,
          quad.facing.is_positive(),
          deck_quad(axis, plane, u0, v0, u0 + w, v0 + h),
          None,
          Some([[0.0; 2]; 4]),
        );

        let first_color_index = atlas.colors.len();
        for y in quad.y..quad.y + quad.height {
          for x in quad.x..quad.x + quad.width {
            let color = mask.get(x, y).payload().map_or(Color8::TRANSPARENT, |p| p.color);
            atlas.colors.push(color);
          }
        }
        atlas.images.push(AtlasImageInfo {
          first_color_index,
          first_vertex_index,
          size_x: quad.width as u32,
          size_y: quad.height as u32,
          surface_index,
        });
      });
    }
  }

  quads
}
