//! Process-wide mesher metrics.
//!
//! Feature-gated and runtime-toggled: without the `metrics` feature every
//! record call is a no-op.
//!
//! # Usage
//!
//! ```ignore
//! use voxel_mesher::metrics::{self, MesherKind, COLLECT_METRICS};
//!
//! // Compile with --features metrics
//! // Runtime toggle:
//! COLLECT_METRICS.store(false, Ordering::Relaxed);
//!
//! // Meshers record every build themselves; read a copy for display:
//! let snapshot = metrics::snapshot();
//! println!("{:.1} us", snapshot.kind(MesherKind::Cubes).avg_build_us());
//! ```

use std::collections::VecDeque;
use std::sync::atomic::AtomicBool;
#[cfg(feature = "metrics")]
use std::sync::atomic::Ordering;
use std::sync::{Mutex, OnceLock, PoisonError};

use crate::types::MeshStats;

/// Runtime toggle for metrics collection.
pub static COLLECT_METRICS: AtomicBool = AtomicBool::new(true);

/// Check if metrics collection is enabled (both compile-time and runtime).
#[inline]
pub fn is_enabled() -> bool {
  #[cfg(feature = "metrics")]
  {
    COLLECT_METRICS.load(Ordering::Relaxed)
  }
  #[cfg(not(feature = "metrics"))]
  {
    false
  }
}

/// Most recent timings in microseconds; the oldest entry drops out once
/// `capacity` is reached.
#[derive(Debug, Clone)]
pub struct TimingWindow {
  samples: VecDeque<u64>,
  capacity: usize,
}

impl TimingWindow {
  pub const DEFAULT_CAPACITY: usize = 128;

  pub fn new(capacity: usize) -> Self {
    Self {
      samples: VecDeque::with_capacity(capacity),
      capacity: capacity.max(1),
    }
  }

  pub fn push(&mut self, us: u64) {
    if self.samples.len() == self.capacity {
      self.samples.pop_front();
    }
    self.samples.push_back(us);
  }

  pub fn len(&self) -> usize {
    self.samples.len()
  }

  pub fn is_empty(&self) -> bool {
    self.samples.is_empty()
  }

  pub fn clear(&mut self) {
    self.samples.clear();
  }

  /// Mean of the window, 0 when empty.
  pub fn average(&self) -> f64 {
    if self.samples.is_empty() {
      return 0.0;
    }
    self.samples.iter().sum::<u64>() as f64 / self.samples.len() as f64
  }
}

impl Default for TimingWindow {
  fn default() -> Self {
    Self::new(Self::DEFAULT_CAPACITY)
  }
}

// =============================================================================
// Per-mesher counters
// =============================================================================

/// Which mesher produced a build.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MesherKind {
  Cubes,
  Blocky,
}

/// Counters for one mesher.
#[derive(Debug, Clone, Default)]
pub struct BuildMetrics {
  /// Rolling window of build times in microseconds.
  pub build_timings: TimingWindow,
  pub last_build_us: u64,
  pub total_builds: u64,
  /// Builds that produced no geometry.
  pub empty_builds: u64,
  pub total_quads: u64,
  pub total_vertices: u64,
  pub total_indices: u64,
}

impl BuildMetrics {
  fn record(&mut self, stats: &MeshStats) {
    self.build_timings.push(stats.build_time_us);
    self.last_build_us = stats.build_time_us;
    self.total_builds += 1;
    if stats.vertices == 0 {
      self.empty_builds += 1;
    }
    self.total_quads += stats.quads as u64;
    self.total_vertices += stats.vertices as u64;
    self.total_indices += stats.indices as u64;
  }

  pub fn avg_build_us(&self) -> f64 {
    self.build_timings.average()
  }

  /// Approximate memory of every vertex and index produced so far.
  pub fn mesh_memory_mb(&self) -> f64 {
    // position + normal + colour + uv
    let vertex_bytes = 12 + 12 + 16 + 8;
    (self.total_vertices * vertex_bytes + self.total_indices * 4) as f64 / 1_048_576.0
  }
}

/// Metrics for every mesher in the process.
#[derive(Debug, Clone, Default)]
pub struct MesherMetrics {
  pub cubes: BuildMetrics,
  pub blocky: BuildMetrics,
  /// Library bake times in microseconds.
  pub bake_timings: TimingWindow,
  pub last_generation: u64,
}

impl MesherMetrics {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn kind(&self, kind: MesherKind) -> &BuildMetrics {
    match kind {
      MesherKind::Cubes => &self.cubes,
      MesherKind::Blocky => &self.blocky,
    }
  }

  fn kind_mut(&mut self, kind: MesherKind) -> &mut BuildMetrics {
    match kind {
      MesherKind::Cubes => &mut self.cubes,
      MesherKind::Blocky => &mut self.blocky,
    }
  }

  /// Record one mesh build.
  pub fn record_build(&mut self, kind: MesherKind, stats: &MeshStats) {
    if is_enabled() {
      self.kind_mut(kind).record(stats);
    }
  }

  /// Record one library bake.
  pub fn record_bake(&mut self, generation: u64, timing_us: u64) {
    if is_enabled() {
      self.bake_timings.push(timing_us);
      self.last_generation = generation;
    }
  }

  /// Reset timings, keeping the cumulative totals.
  pub fn reset(&mut self) {
    self.cubes.build_timings.clear();
    self.blocky.build_timings.clear();
    self.bake_timings.clear();
  }
}

// =============================================================================
// Process-wide collector
// =============================================================================

static GLOBAL: OnceLock<Mutex<MesherMetrics>> = OnceLock::new();

fn global() -> &'static Mutex<MesherMetrics> {
  GLOBAL.get_or_init(|| Mutex::new(MesherMetrics::new()))
}

/// Record a build in the process-wide collector.
#[inline]
pub fn record_build(kind: MesherKind, stats: &MeshStats) {
  if !is_enabled() {
    return;
  }
  global()
    .lock()
    .unwrap_or_else(PoisonError::into_inner)
    .record_build(kind, stats);
}

/// Record a library bake in the process-wide collector.
#[inline]
pub fn record_bake(generation: u64, timing_us: u64) {
  if !is_enabled() {
    return;
  }
  global()
    .lock()
    .unwrap_or_else(PoisonError::into_inner)
    .record_bake(generation, timing_us);
}

/// Copy of the process-wide metrics.
pub fn snapshot() -> MesherMetrics {
  global().lock().unwrap_or_else(PoisonError::into_inner).clone()
}

#[cfg(all(test, feature = "metrics"))]
mod tests {
  use super::*;

  #[test]
  fn test_timing_window_evicts_oldest() {
    let mut window = TimingWindow::new(3);
    assert!(window.is_empty());
    assert_eq!(window.average(), 0.0);

    for us in [10, 20, 30] {
      window.push(us);
    }
    assert_eq!(window.len(), 3);
    assert_eq!(window.average(), 20.0);

    window.push(40);
    assert_eq!(window.len(), 3);
    assert_eq!(window.average(), 30.0);

    window.clear();
    assert!(window.is_empty());
  }

  #[test]
  fn test_build_recording() {
    let mut metrics = MesherMetrics::new();
    let stats = |quads: u32, us: u64| MeshStats {
      quads,
      vertices: quads * 4,
      indices: quads * 6,
      build_time_us: us,
    };

    metrics.record_build(MesherKind::Cubes, &stats(6, 100));
    metrics.record_build(MesherKind::Cubes, &stats(0, 300));
    metrics.record_build(MesherKind::Blocky, &stats(2, 50));

    let cubes = metrics.kind(MesherKind::Cubes);
    assert_eq!(cubes.total_builds, 2);
    assert_eq!(cubes.empty_builds, 1);
    assert_eq!(cubes.total_quads, 6);
    assert_eq!(cubes.avg_build_us(), 200.0);
    assert_eq!(cubes.last_build_us, 300);
    assert_eq!(metrics.kind(MesherKind::Blocky).total_vertices, 8);

    metrics.reset();
    assert!(metrics.cubes.build_timings.is_empty());
    assert_eq!(metrics.cubes.total_builds, 2);
  }

  #[test]
  fn test_global_collector() {
    let before = snapshot().blocky.total_builds;
    record_build(
      MesherKind::Blocky,
      &MeshStats {
        quads: 1,
        vertices: 4,
        indices: 6,
        build_time_us: 10,
      },
    );
    assert!(snapshot().blocky.total_builds > before);
  }
}
