use super::*;

fn triangle(a: [f32; 3], b: [f32; 3], c: [f32; 3]) -> [Vec3; 3] {
  [Vec3::from_array(a), Vec3::from_array(b), Vec3::from_array(c)]
}

#[test]
fn test_air_is_empty() {
  let air = VoxelModel::air();
  assert!(air.is_empty());
  assert!(!air.culls_neighbors);
}

#[test]
fn test_cube_has_six_sides_and_no_interior() {
  let cube = VoxelModel::cube(Color8::WHITE);
  assert!(cube.interior.is_empty());
  for side in Side::ALL {
    let surface = &cube.sides[side.index()];
    assert_eq!(surface.positions.len(), 4);
    assert_eq!(surface.indices.len(), 6);
    let axis = side.axis().index();
    let plane = if side.is_positive() { 1.0 } else { 0.0 };
    assert!(surface.positions.iter().all(|p| p[axis] == plane));
  }
}

#[test]
fn test_slab_top_is_interior() {
  let slab = VoxelModel::slab(0.5, Color8::WHITE);
  assert!(slab.sides[Side::PositiveY.index()].is_empty());
  assert!(!slab.sides[Side::NegativeY.index()].is_empty());
  assert_eq!(slab.interior.indices.len(), 6);
  assert!(slab.interior.positions.iter().all(|p| p.y == 0.5));
  // Side walls only reach half height.
  let wall = &slab.sides[Side::NegativeX.index()];
  assert!(wall.positions.iter().all(|p| p.y <= 0.5));
}

#[test]
fn test_from_mesh_classifies_exact_planes() {
  let triangles = [
    // On +X
    triangle([1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0]),
    // On -Z
    triangle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
    // Diagonal through the cell
    triangle([0.0, 0.0, 0.0], [1.0, 1.0, 0.0], [1.0, 1.0, 1.0]),
    // Almost on -Y, but not exactly
    triangle([0.0, 0.0001, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
  ];
  let model = VoxelModel::from_mesh(&triangles);

  assert_eq!(model.sides[Side::PositiveX.index()].indices.len(), 3);
  assert_eq!(model.sides[Side::NegativeZ.index()].indices.len(), 3);
  assert!(model.sides[Side::NegativeY.index()].is_empty());
  assert_eq!(model.interior.indices.len(), 6);
}

#[test]
fn test_from_mesh_of_cube_triangles_matches_sides() {
  let cube = VoxelModel::cube(Color8::WHITE);
  let mut soup = Vec::new();
  for surface in &cube.sides {
    for tri in surface.indices.chunks(3) {
      soup.push([tri[0], tri[1], tri[2]].map(|i| surface.positions[i as usize]));
    }
  }
  let model = VoxelModel::from_mesh(&soup);
  assert!(model.interior.is_empty());
  for side in Side::ALL {
    assert_eq!(model.sides[side.index()].indices.len(), 6);
  }
}
