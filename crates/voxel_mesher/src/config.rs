//! MesherConfig - options shared by the cubes and blocky meshers.

use serde::Deserialize;

use crate::error::ConfigError;

/// How cubes mesher cell values map to colours.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorMode {
  /// Cell value is a packed RGBA colour with equal bits per channel.
  #[default]
  Raw,

  /// Cell value indexes the mesher's palette; vertices carry the resolved
  /// colour.
  MesherPalette,

  /// Cell value indexes a palette resolved in the shader. Vertex colour red
  /// holds the index, alpha holds the palette alpha.
  ShaderPalette,
}

/// Configuration for mesh generation.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct MesherConfig {
  /// Merge coplanar faces with identical payload into larger quads.
  pub greedy_meshing: bool,

  pub color_mode: ColorMode,

  /// Pack per-voxel colours into an atlas image instead of vertex colours.
  /// Requires greedy meshing and a colour mode other than `ShaderPalette`.
  pub store_colors_in_texture: bool,

  /// Bake ambient occlusion into blocky vertex colours.
  pub occlusion_enabled: bool,

  /// Strength of baked ambient occlusion, 0..=1.
  pub occlusion_darkness: f32,

  /// Leave cube faces owned by padding cells to the neighbouring chunk, so a
  /// seam is emitted once across a chunk pair.
  pub skip_padding_faces: bool,
}

impl Default for MesherConfig {
  fn default() -> Self {
    Self {
      greedy_meshing: true,
      color_mode: ColorMode::Raw,
      store_colors_in_texture: false,
      occlusion_enabled: true,
      occlusion_darkness: 0.8,
      skip_padding_faces: false,
    }
  }
}

impl MesherConfig {
  pub fn new() -> Self {
    Self::default()
  }

  /// Parse a TOML document. Missing keys take their defaults.
  pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
    Ok(toml::from_str(source)?)
  }

  pub fn with_greedy_meshing(mut self, enabled: bool) -> Self {
    self.greedy_meshing = enabled;
    self
  }

  pub fn with_color_mode(mut self, mode: ColorMode) -> Self {
    self.color_mode = mode;
    self
  }

  pub fn with_store_colors_in_texture(mut self, enabled: bool) -> Self {
    self.store_colors_in_texture = enabled;
    self
  }

  pub fn with_occlusion_enabled(mut self, enabled: bool) -> Self {
    self.occlusion_enabled = enabled;
    self
  }

  pub fn with_occlusion_darkness(mut self, darkness: f32) -> Self {
    self.occlusion_darkness = darkness;
    self
  }

  pub fn with_skip_padding_faces(mut self, enabled: bool) -> Self {
    self.skip_padding_faces = enabled;
    self
  }

  /// Effective configuration. Unsupported combinations degrade to the nearest
  /// supported mode with a warning.
  pub fn resolved(&self) -> Self {
    let mut config = self.clone();

    if config.store_colors_in_texture && !config.greedy_meshing {
      tracing::warn!("colour atlas requires greedy meshing, falling back to vertex colours");
      config.store_colors_in_texture = false;
    }

    if config.store_colors_in_texture && config.color_mode == ColorMode::ShaderPalette {
      tracing::warn!("colour atlas is not supported with shader palette, falling back to vertex colours");
      config.store_colors_in_texture = false;
    }

    if !(0.0..=1.0).contains(&config.occlusion_darkness) {
      let clamped = if config.occlusion_darkness.is_nan() {
        0.0
      } else {
        config.occlusion_darkness.clamp(0.0, 1.0)
      };
      tracing::warn!(
        requested = config.occlusion_darkness,
        clamped,
        "occlusion darkness out of range"
      );
      config.occlusion_darkness = clamped;
    }

    config
  }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
