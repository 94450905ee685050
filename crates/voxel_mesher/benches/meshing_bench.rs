//! Meshing benchmarks on 32³ chunks.
//!
//! - **cubes**: simple vs greedy vs greedy + atlas on the same terrain
//! - **blocky**: baked model meshing with and without AO
//! - **library**: bake of a small model catalog
//! - **parallel**: a batch of chunks with per-worker scratch

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rayon::prelude::*;
use voxel_mesher::{
  bake_library, generate_shadow_occluders, BlockyMesher, Color8, CubesMesher, Depth, MeshScratch, MesherConfig,
  VoxelGrid, VoxelModel, ALL_SIDES_MASK,
};

const CHUNK: usize = 32;
const PADDED: usize = CHUNK + 2;

/// Rolling terrain of packed 8-bit colours: grass on top, stone below.
fn terrain_grid() -> VoxelGrid {
  let mut grid = VoxelGrid::new([PADDED; 3], Depth::Bit8, 0).unwrap();
  for z in 0..PADDED {
    for x in 0..PADDED {
      let height = 12.0 + 6.0 * ((x as f32 * 0.21).sin() + (z as f32 * 0.17).cos());
      let top = height as usize;
      for y in 0..top.min(PADDED) {
        // RRGGBBAA: 0b00_11_00_11 green, 0b10_10_10_11 grey
        let value = if y + 1 == top { 0b0011_0011 } else { 0b1010_1011 };
        grid.set(x, y, z, value);
      }
    }
  }
  grid
}

/// Noisy chunk of model ids for the blocky mesher.
fn model_grid() -> VoxelGrid {
  let mut grid = VoxelGrid::new([PADDED; 3], Depth::Bit8, 0).unwrap();
  let mut state = 0x2545_f491u32;
  for z in 0..PADDED {
    for x in 0..PADDED {
      for y in 0..PADDED / 2 {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        grid.set(x, y, z, 1 + state % 3);
      }
    }
  }
  grid
}

fn models() -> Vec<VoxelModel> {
  vec![
    VoxelModel::air(),
    VoxelModel::cube(Color8::new(128, 128, 128, 255)),
    VoxelModel::slab(0.5, Color8::new(160, 120, 80, 255)),
    VoxelModel::cube(Color8::new(200, 220, 255, 128))
      .with_transparency_index(1)
      .with_material_id(1),
  ]
}

fn bench_cubes(c: &mut Criterion) {
  let grid = terrain_grid();
  let mut group = c.benchmark_group("cubes_32");
  group.throughput(Throughput::Elements((CHUNK * CHUNK * CHUNK) as u64));

  let configs = [
    ("simple", MesherConfig::new().with_greedy_meshing(false)),
    ("greedy", MesherConfig::new()),
    ("greedy_atlas", MesherConfig::new().with_store_colors_in_texture(true)),
  ];

  for (name, config) in configs {
    let mesher = CubesMesher::new(&config);
    let mut scratch = MeshScratch::new();
    group.bench_with_input(BenchmarkId::from_parameter(name), &grid, |b, grid| {
      b.iter(|| black_box(mesher.build(&grid.view(), &mut scratch)))
    });
  }

  group.finish();
}

fn bench_blocky(c: &mut Criterion) {
  let library = bake_library(&models(), 1).unwrap();
  let grid = model_grid();
  let mut group = c.benchmark_group("blocky_32");

  for ao in [false, true] {
    let mesher = BlockyMesher::new(&MesherConfig::new().with_occlusion_enabled(ao));
    group.bench_with_input(BenchmarkId::new("ao", ao), &grid, |b, grid| {
      b.iter(|| black_box(mesher.build(&library, &grid.view())))
    });
  }

  group.bench_function("shadow_occluders", |b| {
    b.iter(|| black_box(generate_shadow_occluders(&library, &grid.view(), ALL_SIDES_MASK)))
  });

  group.finish();
}

fn bench_library_bake(c: &mut Criterion) {
  let mut catalog = models();
  for i in 1..=60 {
    catalog.push(VoxelModel::slab(i as f32 / 64.0, Color8::WHITE));
  }

  c.bench_function("library_bake (64 models)", |b| {
    b.iter(|| black_box(bake_library(black_box(&catalog), 1).unwrap()))
  });
}

fn bench_parallel(c: &mut Criterion) {
  let grids: Vec<VoxelGrid> = (0..32).map(|_| terrain_grid()).collect();
  let mesher = CubesMesher::new(&MesherConfig::new());

  c.bench_function("cubes_32 greedy x32 (rayon)", |b| {
    b.iter(|| {
      let quads: u32 = grids
        .par_iter()
        .map_init(MeshScratch::new, |scratch, grid| mesher.build(&grid.view(), scratch).stats.quads)
        .sum();
      black_box(quads)
    })
  });
}

criterion_group!(benches, bench_cubes, bench_blocky, bench_library_bake, bench_parallel);
criterion_main!(benches);
