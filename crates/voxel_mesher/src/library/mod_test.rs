use rayon::prelude::*;

use super::*;
use crate::test_utils::{standard_library, standard_models, GLASS, LEAVES, SLAB, STONE};

#[test]
fn test_new_library_is_empty_generation_zero() {
  let library = ModelLibrary::new();
  let snapshot = library.snapshot();
  assert_eq!(snapshot.generation(), 0);
  assert!(snapshot.models().is_empty());
  assert!(snapshot.model(STONE).is_none());
}

#[test]
fn test_bake_publishes_new_generation() {
  let library = ModelLibrary::new();
  let first = library.bake(&standard_models()).unwrap();
  let second = library.bake(&standard_models()).unwrap();
  assert!(second.generation() > first.generation());
  assert_eq!(library.generation(), second.generation());
  assert!(Arc::ptr_eq(&library.snapshot(), &second));
}

#[test]
fn test_failed_bake_keeps_previous_snapshot() {
  let library = ModelLibrary::new();
  let good = library.bake(&standard_models()).unwrap();

  let mut models = standard_models();
  models[STONE as usize].sides[0].indices.push(0);
  assert!(library.bake(&models).is_err());

  assert!(Arc::ptr_eq(&library.snapshot(), &good));
}

#[test]
fn test_snapshot_survives_rebake() {
  let library = ModelLibrary::new();
  library.bake(&standard_models()).unwrap();
  let held = library.snapshot();

  library.bake(&[VoxelModel::air()]).unwrap();

  assert!(held.model(STONE).is_some());
  assert!(library.snapshot().model(STONE).is_none());
}

#[test]
fn test_concurrent_readers_during_bakes() {
  let library = ModelLibrary::new();
  library.bake(&standard_models()).unwrap();

  let generations: Vec<u64> = (0..64)
    .into_par_iter()
    .map(|i| {
      if i % 8 == 0 {
        library.bake(&standard_models()).unwrap();
      }
      let snapshot = library.snapshot();
      assert_eq!(snapshot.models().len(), standard_models().len());
      snapshot.generation()
    })
    .collect();

  assert!(generations.iter().all(|&g| g >= 1));
  assert_eq!(library.generation(), 9);
}

#[test]
fn test_face_visibility_rules() {
  let library = standard_library();
  let stone = library.model(STONE).unwrap();
  let glass = library.model(GLASS).unwrap();
  let slab = library.model(SLAB).unwrap();
  let leaves = library.model(LEAVES).unwrap();

  // Next to air
  assert!(library.is_face_visible(stone, Side::PositiveX, None));
  // Identical full faces hide each other
  assert!(!library.is_face_visible(stone, Side::PositiveX, Some(stone)));
  // Opaque face next to more transparent neighbour stays visible
  assert!(library.is_face_visible(stone, Side::PositiveX, Some(glass)));
  // Transparent face next to opaque neighbour is hidden
  assert!(!library.is_face_visible(glass, Side::PositiveX, Some(stone)));
  // Same transparent model hides itself
  assert!(!library.is_face_visible(glass, Side::PositiveX, Some(glass)));
  // Non-culling neighbour never hides
  assert!(library.is_face_visible(stone, Side::PositiveX, Some(leaves)));
  // Half wall cannot hide a full face, full face hides half wall
  assert!(library.is_face_visible(stone, Side::PositiveX, Some(slab)));
  assert!(!library.is_face_visible(slab, Side::PositiveX, Some(stone)));
  // Slab bottom is full, stone below it hides it
  assert!(!library.is_face_visible(slab, Side::NegativeY, Some(stone)));
}
