//! Error types for baking, grid access, configuration and meshing.

use thiserror::Error;

use crate::constants::Side;
use crate::storage::Depth;

/// Errors that abort a library bake. The previous snapshot stays in use.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BakeError {
  /// A surface index buffer does not describe whole triangles.
  #[error("model {model}: {count} indices on {} is not a multiple of 3", side_name(.side))]
  InvalidIndexCount {
    model: usize,
    /// `None` for the interior surface.
    side: Option<Side>,
    count: usize,
  },

  /// A surface index points past the end of its vertex buffer.
  #[error("model {model}: index {index} out of range for {vertex_count} vertices")]
  IndexOutOfRange {
    model: usize,
    index: u32,
    vertex_count: usize,
  },

  #[error("too many models: {0}")]
  TooManyModels(usize),

  #[error("material id {0} exceeds the supported range")]
  TooManyMaterials(u32),
}

fn side_name(side: &Option<Side>) -> String {
  match side {
    Some(side) => format!("side {side:?}"),
    None => "interior".to_string(),
  }
}

/// Malformed voxel grid input.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridError {
  #[error("grid size {0:?} is below the padded minimum")]
  SizeTooSmall([usize; 3]),

  #[error("grid data holds {actual} cells, expected {expected}")]
  LengthMismatch { expected: usize, actual: usize },

  #[error("cell depth {0:?} is not supported by this mesher")]
  UnsupportedDepth(Depth),
}

/// Invalid configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("failed to parse mesher config: {0}")]
  Parse(#[from] toml::de::Error),
}

/// Input contract violations detected during a mesh build.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
  #[error(transparent)]
  Grid(#[from] GridError),

  #[error("palette colour mode selected without a palette")]
  MissingPalette,
}
