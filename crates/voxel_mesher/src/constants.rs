//! Grid layout, cube side tables and quad winding lookups.
//!
//! # Padded Grid Layout
//!
//! Every grid handed to a mesher carries a one cell border on each axis. The
//! border holds neighbour data and never produces geometry of its own.
//!
//! ```text
//! Padded index:   0     1     2    ...   n-2   n-1
//!                 │     │                 │     │
//!                 │     └──── interior ───┘     │
//!                 │                             │
//!                 └─ padding          padding ──┘
//! ```
//!
//! # Memory Layout (ZXY)
//!
//! ```text
//! index = y + x * size_y + z * size_x * size_y
//!
//! Neighbour offsets:
//!   X → size_y
//!   Y → 1
//!   Z → size_x * size_y
//! ```
//!
//! # Coordinate System
//!
//! ```text
//!         +Y
//!          │
//!          │
//!          └───────── +X
//!         /
//!        /
//!       +Z
//! ```
//!
//! # Deck Axes
//!
//! A deck is the 2D slice perpendicular to the swept axis. Its two in-plane
//! axes (u, v) are:
//!
//! ```text
//! Axis  u  v
//! ────  ─  ─
//!  X    Y  Z
//!  Y    X  Z
//!  Z    X  Y
//! ```
//!
//! Quad vertices are always laid out as:
//!
//! ```text
//!   v
//!   │  2 ──── 3
//!   │  │      │
//!   │  0 ──── 1
//!   └────────── u
//! ```

/// Border cells on each side of every axis.
pub const PADDING: usize = 1;

/// Smallest padded extent accepted on any axis.
pub const MIN_PADDED_SIZE: usize = 2 * PADDING;

/// Resolution of side pattern bitmaps (R×R).
pub const RASTER_SIZE: usize = 32;

/// Cells in one side pattern bitmap.
pub const RASTER_CELLS: usize = RASTER_SIZE * RASTER_SIZE;

/// Outward inflation applied to triangles before rasterization, in raster
/// cells.
pub const RASTER_TRIANGLE_GROWTH: f32 = 0.001;

/// Cubes mesher bucket for faces with alpha == 255.
pub const MATERIAL_OPAQUE: usize = 0;

/// Cubes mesher bucket for faces with alpha < 255.
pub const MATERIAL_TRANSPARENT: usize = 1;

/// Number of cubes mesher output buckets.
pub const CUBES_MATERIAL_COUNT: usize = 2;

/// Upper bound on the number of models in one library.
pub const MAX_MODELS: usize = 65536;

/// Upper bound on blocky material ids (exclusive).
pub const MAX_MATERIALS: u32 = 256;

/// Model id reserved for empty space.
pub const AIR_ID: u32 = 0;

/// Bitmask with one bit per [`Side`].
pub const ALL_SIDES_MASK: u8 = 0b11_1111;

// =============================================================================
// Axes and sides
// =============================================================================

/// One of the three grid axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
  X = 0,
  Y = 1,
  Z = 2,
}

impl Axis {
  pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

  #[inline]
  pub const fn index(self) -> usize {
    self as usize
  }

  /// In-plane axes (u, v) of a deck perpendicular to this axis.
  #[inline]
  pub const fn deck_axes(self) -> (Axis, Axis) {
    match self {
      Axis::X => (Axis::Y, Axis::Z),
      Axis::Y => (Axis::X, Axis::Z),
      Axis::Z => (Axis::X, Axis::Y),
    }
  }

  /// Unit vector along this axis.
  #[inline]
  pub const fn unit(self) -> [f32; 3] {
    match self {
      Axis::X => [1.0, 0.0, 0.0],
      Axis::Y => [0.0, 1.0, 0.0],
      Axis::Z => [0.0, 0.0, 1.0],
    }
  }
}

/// One of the six cube sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
  NegativeX = 0,
  PositiveX = 1,
  NegativeY = 2,
  PositiveY = 3,
  NegativeZ = 4,
  PositiveZ = 5,
}

impl Side {
  pub const COUNT: usize = 6;

  pub const ALL: [Side; 6] = [
    Side::NegativeX,
    Side::PositiveX,
    Side::NegativeY,
    Side::PositiveY,
    Side::NegativeZ,
    Side::PositiveZ,
  ];

  #[inline]
  pub const fn index(self) -> usize {
    self as usize
  }

  /// Bit of this side in a 6-bit side mask.
  #[inline]
  pub const fn bit(self) -> u8 {
    1 << (self as u8)
  }

  #[inline]
  pub const fn axis(self) -> Axis {
    match self {
      Side::NegativeX | Side::PositiveX => Axis::X,
      Side::NegativeY | Side::PositiveY => Axis::Y,
      Side::NegativeZ | Side::PositiveZ => Axis::Z,
    }
  }

  #[inline]
  pub const fn is_positive(self) -> bool {
    (self as u8) & 1 == 1
  }

  #[inline]
  pub const fn opposite(self) -> Side {
    Side::ALL[(self as usize) ^ 1]
  }

  pub const fn from_axis(axis: Axis, positive: bool) -> Side {
    Side::ALL[axis.index() * 2 + positive as usize]
  }

  /// Integer offset to the neighbouring cell across this side.
  #[inline]
  pub const fn direction(self) -> [i32; 3] {
    match self {
      Side::NegativeX => [-1, 0, 0],
      Side::PositiveX => [1, 0, 0],
      Side::NegativeY => [0, -1, 0],
      Side::PositiveY => [0, 1, 0],
      Side::NegativeZ => [0, 0, -1],
      Side::PositiveZ => [0, 0, 1],
    }
  }

  /// Outward unit normal.
  #[inline]
  pub fn normal(self) -> [f32; 3] {
    self.direction().map(|c| c as f32)
  }
}

// =============================================================================
// Quad winding
// =============================================================================

/// Triangle indices for a quad whose normal points along +axis.
///
/// Counter-clockwise seen from outside, shared diagonal 0-3.
pub const QUAD_INDICES_POSITIVE: [[u32; 6]; 3] = [
  [0, 1, 3, 0, 3, 2], // X
  [0, 2, 3, 0, 3, 1], // Y
  [0, 1, 3, 0, 3, 2], // Z
];

/// Triangle indices for a quad whose normal points along -axis.
pub const QUAD_INDICES_NEGATIVE: [[u32; 6]; 3] = [
  [0, 2, 3, 0, 3, 1], // X
  [0, 1, 3, 0, 3, 2], // Y
  [0, 2, 3, 0, 3, 1], // Z
];

/// Index lookup for a quad on `axis` facing `positive`.
#[inline]
pub const fn quad_indices(axis: Axis, positive: bool) -> &'static [u32; 6] {
  if positive {
    &QUAD_INDICES_POSITIVE[axis.index()]
  } else {
    &QUAD_INDICES_NEGATIVE[axis.index()]
  }
}

/// Build a 3D point from a plane coordinate along `axis` and deck
/// coordinates (u, v).
#[inline]
pub fn deck_point(axis: Axis, plane: f32, u: f32, v: f32) -> [f32; 3] {
  match axis {
    Axis::X => [plane, u, v],
    Axis::Y => [u, plane, v],
    Axis::Z => [u, v, plane],
  }
}

/// The four corners of a deck-aligned rectangle in quad vertex order.
#[inline]
pub fn deck_quad(axis: Axis, plane: f32, u0: f32, v0: f32, u1: f32, v1: f32) -> [[f32; 3]; 4] {
  [
    deck_point(axis, plane, u0, v0),
    deck_point(axis, plane, u1, v0),
    deck_point(axis, plane, u0, v1),
    deck_point(axis, plane, u1, v1),
  ]
}

#[cfg(test)]
#[path = "constants_test.rs"]
mod constants_test;
