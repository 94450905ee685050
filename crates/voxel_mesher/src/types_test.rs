use super::*;

#[test]
fn test_color8_from_u8_expands_two_bits() {
  assert_eq!(Color8::from_u8(0xff), Color8::WHITE);
  assert_eq!(Color8::from_u8(0), Color8::TRANSPARENT);
  // RR=11, GG=00, BB=01, AA=10
  assert_eq!(Color8::from_u8(0b11_00_01_10), Color8::new(255, 0, 85, 170));
}

#[test]
fn test_color8_from_u16_expands_four_bits() {
  assert_eq!(Color8::from_u16(0xffff), Color8::WHITE);
  assert_eq!(Color8::from_u16(0xf00f), Color8::new(255, 0, 0, 255));
  assert_eq!(Color8::from_u16(0x1234), Color8::new(17, 34, 51, 68));
}

#[test]
fn test_color8_u32_roundtrip() {
  let c = Color8::new(12, 34, 56, 78);
  assert_eq!(Color8::from_u32(c.to_u32()), c);
  assert_eq!(Color8::from_u32(0xff0000ff), Color8::new(255, 0, 0, 255));
}

#[test]
fn test_push_quad_appends_two_triangles() {
  let mut arrays = MaterialArrays::new();
  let corners = crate::constants::deck_quad(Axis::Y, 1.0, 0.0, 0.0, 2.0, 3.0);
  let first = arrays.push_quad(Axis::Y, true, corners, Some([1.0; 4]), None);
  let second = arrays.push_quad(Axis::Y, false, corners, Some([1.0; 4]), None);

  assert_eq!(first, 0);
  assert_eq!(second, 4);
  assert_eq!(arrays.vertex_count(), 8);
  assert_eq!(arrays.triangle_count(), 4);
  assert_eq!(arrays.normals[0], [0.0, 1.0, 0.0]);
  assert_eq!(arrays.normals[4], [0.0, -1.0, 0.0]);
  assert!(arrays.indices[6..].iter().all(|&i| i >= 4));
  arrays.assert_consistent();
}

#[test]
fn test_mesh_output_clear_keeps_buckets() {
  let mut output = MeshOutput::with_surfaces(2);
  let corners = crate::constants::deck_quad(Axis::X, 0.0, 0.0, 0.0, 1.0, 1.0);
  output.surfaces[1].push_quad(Axis::X, true, corners, None, None);
  output.update_counts();
  assert!(!output.is_empty());
  assert_eq!(output.stats.vertices, 4);
  assert_eq!(output.stats.indices, 6);

  output.clear();
  assert!(output.is_empty());
  assert_eq!(output.surfaces.len(), 2);
  assert_eq!(output.stats, MeshStats::default());
}
