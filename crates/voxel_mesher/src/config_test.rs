use super::*;

#[test]
fn test_defaults() {
  let config = MesherConfig::default();
  assert!(config.greedy_meshing);
  assert_eq!(config.color_mode, ColorMode::Raw);
  assert!(!config.store_colors_in_texture);
  assert!(config.occlusion_enabled);
  assert_eq!(config.occlusion_darkness, 0.8);
  assert!(!config.skip_padding_faces);
}

#[test]
fn test_builder_chain() {
  let config = MesherConfig::new()
    .with_greedy_meshing(false)
    .with_color_mode(ColorMode::MesherPalette)
    .with_store_colors_in_texture(true)
    .with_occlusion_enabled(false)
    .with_occlusion_darkness(0.25);

  assert!(!config.greedy_meshing);
  assert_eq!(config.color_mode, ColorMode::MesherPalette);
  assert!(config.store_colors_in_texture);
  assert!(!config.occlusion_enabled);
  assert_eq!(config.occlusion_darkness, 0.25);
}

#[test]
fn test_toml_partial_document_uses_defaults() {
  let config = MesherConfig::from_toml_str(
    r#"
      color_mode = "shader_palette"
      occlusion_darkness = 0.5
    "#,
  )
  .unwrap();

  assert_eq!(config.color_mode, ColorMode::ShaderPalette);
  assert_eq!(config.occlusion_darkness, 0.5);
  assert!(config.greedy_meshing);
}

#[test]
fn test_skip_padding_faces_is_opt_in() {
  assert!(MesherConfig::new().with_skip_padding_faces(true).skip_padding_faces);

  let config = MesherConfig::from_toml_str("skip_padding_faces = true").unwrap();
  assert!(config.skip_padding_faces);
  assert!(config.resolved().skip_padding_faces);
}

#[test]
fn test_toml_parse_error() {
  let err = MesherConfig::from_toml_str("color_mode = \"sepia\"").unwrap_err();
  assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn test_atlas_without_greedy_degrades() {
  let config = MesherConfig::new()
    .with_greedy_meshing(false)
    .with_store_colors_in_texture(true)
    .resolved();
  assert!(!config.store_colors_in_texture);
}

#[test]
fn test_atlas_with_shader_palette_degrades() {
  let config = MesherConfig::new()
    .with_color_mode(ColorMode::ShaderPalette)
    .with_store_colors_in_texture(true)
    .resolved();
  assert!(!config.store_colors_in_texture);
  assert_eq!(config.color_mode, ColorMode::ShaderPalette);
}

#[test]
fn test_supported_atlas_is_kept() {
  let config = MesherConfig::new()
    .with_color_mode(ColorMode::MesherPalette)
    .with_store_colors_in_texture(true)
    .resolved();
  assert!(config.store_colors_in_texture);
}

#[test]
fn test_darkness_is_clamped() {
  assert_eq!(
    MesherConfig::new().with_occlusion_darkness(3.0).resolved().occlusion_darkness,
    1.0
  );
  assert_eq!(
    MesherConfig::new().with_occlusion_darkness(-1.0).resolved().occlusion_darkness,
    0.0
  );
  assert_eq!(
    MesherConfig::new().with_occlusion_darkness(f32::NAN).resolved().occlusion_darkness,
    0.0
  );
}
