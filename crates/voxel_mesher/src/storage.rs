//! Padded voxel grids and typed cell access.
//!
//! A grid stores one channel of cell values at 8, 16 or 32 bits per cell,
//! either densely or as a single uniform value covering the whole chunk.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  VoxelGrid (owned)          VoxelGridView<'a> (borrowed)        │
//! │    size: [usize; 3]           size: [usize; 3]                  │
//! │    depth: Depth               depth: Depth                      │
//! │    data: ChannelData  ──────▶ cells: CellSlice<'a>              │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼  matched once per build
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  CellReader (monomorphic for the rest of the build)             │
//! │    DenseCells<'a, u8> | DenseCells<'a, u16> | DenseCells<'a,u32>│
//! │    UniformCells                                                 │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cells are laid out ZXY, see [`crate::constants`].

use crate::constants::MIN_PADDED_SIZE;
use crate::error::GridError;
use crate::types::Color8;

/// Bits per stored cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Depth {
  Bit8,
  Bit16,
  Bit32,
}

impl Depth {
  pub const fn bits(self) -> u32 {
    match self {
      Depth::Bit8 => 8,
      Depth::Bit16 => 16,
      Depth::Bit32 => 32,
    }
  }

  /// Largest value a cell of this depth can hold.
  pub const fn max_value(self) -> u32 {
    match self {
      Depth::Bit8 => u8::MAX as u32,
      Depth::Bit16 => u16::MAX as u32,
      Depth::Bit32 => u32::MAX,
    }
  }
}

/// Linear index of a cell in a padded grid of `size`.
#[inline(always)]
pub fn cell_index(size: [usize; 3], x: usize, y: usize, z: usize) -> usize {
  y + x * size[1] + z * size[0] * size[1]
}

/// Index step to the next cell along each axis.
#[inline]
pub fn axis_strides(size: [usize; 3]) -> [usize; 3] {
  [size[1], 1, size[0] * size[1]]
}

fn validate_size(size: [usize; 3]) -> Result<usize, GridError> {
  if size.iter().any(|&s| s < MIN_PADDED_SIZE) {
    return Err(GridError::SizeTooSmall(size));
  }
  Ok(size[0] * size[1] * size[2])
}

// =============================================================================
// Typed cell access
// =============================================================================

/// Primitive integer stored per cell.
pub trait CellValue: Copy + Send + Sync + 'static {
  const DEPTH: Depth;

  fn to_u32(self) -> u32;

  /// Truncate to the storage width.
  fn from_u32(value: u32) -> Self;

  /// Interpret the value as a packed colour with equal bits per channel.
  fn raw_color(self) -> Color8;
}

impl CellValue for u8 {
  const DEPTH: Depth = Depth::Bit8;

  #[inline(always)]
  fn to_u32(self) -> u32 {
    self as u32
  }

  #[inline(always)]
  fn from_u32(value: u32) -> Self {
    value as u8
  }

  #[inline(always)]
  fn raw_color(self) -> Color8 {
    Color8::from_u8(self)
  }
}

impl CellValue for u16 {
  const DEPTH: Depth = Depth::Bit16;

  #[inline(always)]
  fn to_u32(self) -> u32 {
    self as u32
  }

  #[inline(always)]
  fn from_u32(value: u32) -> Self {
    value as u16
  }

  #[inline(always)]
  fn raw_color(self) -> Color8 {
    Color8::from_u16(self)
  }
}

impl CellValue for u32 {
  const DEPTH: Depth = Depth::Bit32;

  #[inline(always)]
  fn to_u32(self) -> u32 {
    self
  }

  #[inline(always)]
  fn from_u32(value: u32) -> Self {
    value
  }

  #[inline(always)]
  fn raw_color(self) -> Color8 {
    Color8::from_u32(self)
  }
}

/// Read access to one channel. Selected once per build, then used without
/// per-cell branching on the storage format.
pub trait CellReader: Copy {
  fn read(&self, index: usize) -> u32;
}

/// Dense cells of one primitive width.
#[derive(Clone, Copy, Debug)]
pub struct DenseCells<'a, T>(pub &'a [T]);

impl<T: CellValue> CellReader for DenseCells<'_, T> {
  #[inline(always)]
  fn read(&self, index: usize) -> u32 {
    self.0[index].to_u32()
  }
}

/// A whole channel compressed to one value.
#[derive(Clone, Copy, Debug)]
pub struct UniformCells(pub u32);

impl CellReader for UniformCells {
  #[inline(always)]
  fn read(&self, _index: usize) -> u32 {
    self.0
  }
}

/// Callback receiving the reader chosen for a grid.
pub trait CellVisitor {
  type Output;

  fn visit<R: CellReader>(self, cells: R) -> Self::Output;
}

// =============================================================================
// Owned grid
// =============================================================================

/// Owned channel storage.
#[derive(Clone, Debug, PartialEq)]
pub enum ChannelData {
  Uniform(u32),
  U8(Vec<u8>),
  U16(Vec<u16>),
  U32(Vec<u32>),
}

impl ChannelData {
  fn dense(depth: Depth, len: usize, value: u32) -> Self {
    match depth {
      Depth::Bit8 => ChannelData::U8(vec![u8::from_u32(value); len]),
      Depth::Bit16 => ChannelData::U16(vec![u16::from_u32(value); len]),
      Depth::Bit32 => ChannelData::U32(vec![value; len]),
    }
  }

  #[inline]
  pub fn read(&self, index: usize) -> u32 {
    match self {
      ChannelData::Uniform(v) => *v,
      ChannelData::U8(cells) => cells[index].to_u32(),
      ChannelData::U16(cells) => cells[index].to_u32(),
      ChannelData::U32(cells) => cells[index],
    }
  }
}

/// A padded voxel grid owning its single channel.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelGrid {
  size: [usize; 3],
  depth: Depth,
  data: ChannelData,
}

impl VoxelGrid {
  /// Uniform grid filled with `default_value`.
  pub fn new(size: [usize; 3], depth: Depth, default_value: u32) -> Result<Self, GridError> {
    validate_size(size)?;
    Ok(Self {
      size,
      depth,
      data: ChannelData::Uniform(default_value & depth.max_value()),
    })
  }

  pub fn from_u8(size: [usize; 3], cells: Vec<u8>) -> Result<Self, GridError> {
    Self::from_data(size, Depth::Bit8, cells.len(), ChannelData::U8(cells))
  }

  pub fn from_u16(size: [usize; 3], cells: Vec<u16>) -> Result<Self, GridError> {
    Self::from_data(size, Depth::Bit16, cells.len(), ChannelData::U16(cells))
  }

  pub fn from_u32(size: [usize; 3], cells: Vec<u32>) -> Result<Self, GridError> {
    Self::from_data(size, Depth::Bit32, cells.len(), ChannelData::U32(cells))
  }

  fn from_data(
    size: [usize; 3],
    depth: Depth,
    actual: usize,
    data: ChannelData,
  ) -> Result<Self, GridError> {
    let expected = validate_size(size)?;
    if expected != actual {
      return Err(GridError::LengthMismatch { expected, actual });
    }
    Ok(Self { size, depth, data })
  }

  #[inline]
  pub fn size(&self) -> [usize; 3] {
    self.size
  }

  #[inline]
  pub fn depth(&self) -> Depth {
    self.depth
  }

  #[inline]
  pub fn volume(&self) -> usize {
    self.size[0] * self.size[1] * self.size[2]
  }

  pub fn data(&self) -> &ChannelData {
    &self.data
  }

  pub fn is_uniform(&self) -> bool {
    matches!(self.data, ChannelData::Uniform(_))
  }

  #[inline]
  pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
    cell_index(self.size, x, y, z)
  }

  #[inline]
  pub fn get(&self, x: usize, y: usize, z: usize) -> u32 {
    self.data.read(self.index(x, y, z))
  }

  /// Write one cell, expanding a uniform channel to dense storage first.
  pub fn set(&mut self, x: usize, y: usize, z: usize, value: u32) {
    let index = self.index(x, y, z);
    if let ChannelData::Uniform(current) = self.data {
      if current == value & self.depth.max_value() {
        return;
      }
      self.data = ChannelData::dense(self.depth, self.volume(), current);
    }
    match &mut self.data {
      ChannelData::U8(cells) => cells[index] = u8::from_u32(value),
      ChannelData::U16(cells) => cells[index] = u16::from_u32(value),
      ChannelData::U32(cells) => cells[index] = value,
      ChannelData::Uniform(_) => unreachable!("uniform channel expanded above"),
    }
  }

  /// Fill every cell inside the inclusive box `min..=max`.
  pub fn fill_box(&mut self, min: [usize; 3], max: [usize; 3], value: u32) {
    for z in min[2]..=max[2] {
      for x in min[0]..=max[0] {
        for y in min[1]..=max[1] {
          self.set(x, y, z, value);
        }
      }
    }
  }

  /// Replace every cell with `value`, compressing the channel.
  pub fn fill(&mut self, value: u32) {
    self.data = ChannelData::Uniform(value & self.depth.max_value());
  }

  /// Collapse dense storage to a uniform value when every cell is equal.
  pub fn compress_uniform(&mut self) -> bool {
    let first = self.data.read(0);
    let uniform = match &self.data {
      ChannelData::Uniform(_) => return true,
      ChannelData::U8(cells) => cells.iter().all(|&c| c.to_u32() == first),
      ChannelData::U16(cells) => cells.iter().all(|&c| c.to_u32() == first),
      ChannelData::U32(cells) => cells.iter().all(|&c| c == first),
    };
    if uniform {
      self.data = ChannelData::Uniform(first);
    }
    uniform
  }

  pub fn view(&self) -> VoxelGridView<'_> {
    let cells = match &self.data {
      ChannelData::Uniform(v) => CellSlice::Uniform(*v),
      ChannelData::U8(c) => CellSlice::U8(c),
      ChannelData::U16(c) => CellSlice::U16(c),
      ChannelData::U32(c) => CellSlice::U32(c),
    };
    VoxelGridView {
      size: self.size,
      depth: self.depth,
      cells,
    }
  }
}

// =============================================================================
// Borrowed view
// =============================================================================

/// Borrowed cell data of one channel.
#[derive(Clone, Copy, Debug)]
pub enum CellSlice<'a> {
  Uniform(u32),
  U8(&'a [u8]),
  U16(&'a [u16]),
  U32(&'a [u32]),
}

/// Read-only padded grid handed to the meshers.
#[derive(Clone, Copy, Debug)]
pub struct VoxelGridView<'a> {
  size: [usize; 3],
  depth: Depth,
  cells: CellSlice<'a>,
}

impl<'a> VoxelGridView<'a> {
  /// View over externally owned dense cells.
  pub fn new<T: CellValue>(size: [usize; 3], cells: &'a [T]) -> Result<Self, GridError>
  where
    CellSlice<'a>: From<&'a [T]>,
  {
    let expected = validate_size(size)?;
    if cells.len() != expected {
      return Err(GridError::LengthMismatch {
        expected,
        actual: cells.len(),
      });
    }
    Ok(Self {
      size,
      depth: T::DEPTH,
      cells: cells.into(),
    })
  }

  pub fn uniform(size: [usize; 3], depth: Depth, value: u32) -> Result<Self, GridError> {
    validate_size(size)?;
    Ok(Self {
      size,
      depth,
      cells: CellSlice::Uniform(value & depth.max_value()),
    })
  }

  #[inline]
  pub fn size(&self) -> [usize; 3] {
    self.size
  }

  #[inline]
  pub fn depth(&self) -> Depth {
    self.depth
  }

  #[inline]
  pub fn cells(&self) -> CellSlice<'a> {
    self.cells
  }

  pub fn uniform_value(&self) -> Option<u32> {
    match self.cells {
      CellSlice::Uniform(v) => Some(v),
      _ => None,
    }
  }

  #[inline]
  pub fn get(&self, x: usize, y: usize, z: usize) -> u32 {
    let index = cell_index(self.size, x, y, z);
    match self.cells {
      CellSlice::Uniform(v) => v,
      CellSlice::U8(c) => c[index].to_u32(),
      CellSlice::U16(c) => c[index].to_u32(),
      CellSlice::U32(c) => c[index],
    }
  }

  /// Run `visitor` with the reader matching this grid's storage.
  pub fn visit<V: CellVisitor>(&self, visitor: V) -> V::Output {
    match self.cells {
      CellSlice::Uniform(v) => visitor.visit(UniformCells(v)),
      CellSlice::U8(c) => visitor.visit(DenseCells(c)),
      CellSlice::U16(c) => visitor.visit(DenseCells(c)),
      CellSlice::U32(c) => visitor.visit(DenseCells(c)),
    }
  }
}

impl<'a> From<&'a [u8]> for CellSlice<'a> {
  fn from(cells: &'a [u8]) -> Self {
    CellSlice::U8(cells)
  }
}

impl<'a> From<&'a [u16]> for CellSlice<'a> {
  fn from(cells: &'a [u16]) -> Self {
    CellSlice::U16(cells)
  }
}

impl<'a> From<&'a [u32]> for CellSlice<'a> {
  fn from(cells: &'a [u32]) -> Self {
    CellSlice::U32(cells)
  }
}

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;
