use super::*;

fn rect(x0: usize, y0: usize, x1: usize, y1: usize) -> PatternBitmap {
  let mut bitmap = PatternBitmap::empty();
  for y in y0..y1 {
    for x in x0..x1 {
      bitmap.set(x, y);
    }
  }
  bitmap
}

#[test]
fn test_bitmap_set_get() {
  let mut bitmap = PatternBitmap::empty();
  assert!(bitmap.is_empty());
  bitmap.set(31, 31);
  bitmap.set(0, 1);
  assert!(bitmap.get(31, 31));
  assert!(bitmap.get(0, 1));
  assert!(!bitmap.get(1, 0));
  assert_eq!(bitmap.count_ones(), 2);
}

#[test]
fn test_full_bitmap() {
  assert!(PatternBitmap::full().is_full());
  assert_eq!(rect(0, 0, RASTER_SIZE, RASTER_SIZE), PatternBitmap::full());
  assert!(!rect(0, 0, RASTER_SIZE, RASTER_SIZE - 1).is_full());
}

#[test]
fn test_pool_deduplicates() {
  let mut pool = PatternPool::new();
  let a = pool.intern(rect(0, 0, 4, 4));
  let b = pool.intern(rect(0, 0, 8, 8));
  let c = pool.intern(rect(0, 0, 4, 4));
  assert_eq!(a, c);
  assert_ne!(a, b);
  assert_eq!(pool.len(), 2);
}

#[test]
fn test_matrix_diagonal() {
  let patterns = vec![PatternBitmap::empty(), rect(0, 0, 4, 4)];
  let matrix = OcclusionMatrix::build(&patterns);
  assert!(!matrix.occludes(0, 0));
  assert!(matrix.occludes(1, 1));
}

#[test]
fn test_matrix_containment() {
  let small = rect(0, 0, 4, 4);
  let large = rect(0, 0, 16, 16);
  let disjoint = rect(20, 20, 24, 24);
  let overlapping = rect(2, 2, 20, 20);
  let patterns = vec![small, large, disjoint, overlapping, PatternBitmap::full()];
  let matrix = OcclusionMatrix::build(&patterns);

  // large hides small, not the reverse
  assert!(matrix.occludes(1, 0));
  assert!(!matrix.occludes(0, 1));
  // disjoint patterns are unrelated
  assert!(!matrix.occludes(2, 0));
  assert!(!matrix.occludes(0, 2));
  // partial overlap is not occlusion
  assert!(!matrix.occludes(3, 1));
  assert!(!matrix.occludes(1, 3));
  // full side hides everything non-empty
  for i in 0..4 {
    assert!(matrix.occludes(4, i));
  }
}

#[test]
fn test_matrix_empty_pattern_never_related() {
  let patterns = vec![PatternBitmap::empty(), PatternBitmap::full(), rect(0, 0, 1, 1)];
  let matrix = OcclusionMatrix::build(&patterns);
  for i in 0..3 {
    assert!(!matrix.occludes(0, i));
    assert!(!matrix.occludes(i, 0));
  }
}

#[test]
fn test_matrix_unknown_indices() {
  let matrix = OcclusionMatrix::build(&[PatternBitmap::full()]);
  assert_eq!(matrix.len(), 1);
  assert!(!matrix.occludes(0, 1));
  assert!(!matrix.occludes(5, 0));
}

#[test]
fn test_matrix_is_antisymmetric() {
  let patterns: Vec<_> = (1..=8).map(|n| rect(0, 0, n * 4, n * 2)).collect();
  let matrix = OcclusionMatrix::build(&patterns);
  for a in 0..patterns.len() as u32 {
    for b in 0..patterns.len() as u32 {
      if a != b {
        assert!(!(matrix.occludes(a, b) && matrix.occludes(b, a)));
      }
    }
  }
}

#[test]
#[should_panic]
fn test_duplicate_patterns_are_fatal() {
  let patterns = vec![rect(0, 0, 4, 4), rect(0, 0, 4, 4)];
  OcclusionMatrix::build(&patterns);
}
