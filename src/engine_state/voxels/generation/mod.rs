//! # World Generation
//!
//! Deterministic terrain generation for chunks. Every block is a pure function of its
//! world coordinates and the configured seed, so a chunk can be regenerated on any
//! thread at any time and will come out identical.
//!
//! ## Terrain Model
//! - Surface height: two Perlin samples (elevation and a low-frequency biome warp)
//!   added to a base height, rounded and floored at 1
//! - Columns: grass on the surface, `soil_depth` layers of dirt, stone below
//! - Caves: 3D Perlin noise carves air pockets below the topsoil
//! - Decoration: trees placed on grass by a seeded value-noise roll (see [`decoration`])

use cgmath::Point3;
use noise::{NoiseFn, Perlin, Value};
use serde::{Deserialize, Serialize};

use super::block::block_type::BlockType;
use super::chunk::{Chunk, CHUNK_DIMENSION};

pub mod decoration;

/// Blocks at or below this world height are never carved into caves.
pub const BEDROCK_LEVEL: i32 = 0;

/// Tunable parameters of the terrain generator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Seed of every noise source.
    pub seed: u32,
    /// Surface height before any noise is applied.
    pub base_height: i32,
    /// Peak deviation of the elevation noise, in blocks.
    pub height_amplitude: i32,
    pub height_frequency: f64,
    pub biome_frequency: f64,
    /// Peak deviation of the biome warp, in blocks.
    pub biome_strength: f64,
    pub cave_frequency: f64,
    /// Absolute noise values below this open a cave.
    pub cave_threshold: f64,
    /// Number of dirt layers between grass and stone.
    pub soil_depth: i32,
    pub tree_frequency: f64,
    /// Value-noise rolls above this grow a tree.
    pub tree_threshold: f64,
    /// When false the world is flat at `base_height` without caves.
    pub enable_noise: bool,
    pub enable_trees: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        GeneratorConfig {
            seed: 1337,
            base_height: 8,
            height_amplitude: 6,
            height_frequency: 0.035,
            biome_frequency: 0.0125,
            biome_strength: 3.0,
            cave_frequency: 0.08,
            cave_threshold: 0.18,
            soil_depth: 3,
            tree_frequency: 1.0,
            tree_threshold: 0.92,
            enable_noise: true,
            enable_trees: true,
        }
    }
}

impl GeneratorConfig {
    /// A flat, cave-free and tree-free configuration. Every column has its surface at
    /// `base_height`.
    pub fn flat(base_height: i32) -> Self {
        GeneratorConfig {
            base_height,
            enable_noise: false,
            enable_trees: false,
            ..GeneratorConfig::default()
        }
    }
}

/// One vertical column of a chunk as produced by the generator.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedColumn {
    /// World-space height of the topmost solid block of the column.
    pub surface_height: i32,
    /// Block types from the bottom of the chunk to the top.
    pub blocks: [BlockType; CHUNK_DIMENSION as usize],
}

/// Terrain generator shared by every chunk job.
///
/// The generator is immutable after construction, so a single instance can be shared
/// between the main thread and the worker behind an `Arc`.
pub struct WorldGenerator {
    config: GeneratorConfig,
    perlin: Perlin,
    decoration_noise: Value,
}

impl WorldGenerator {
    /// Creates a generator, building the seeded noise tables up front.
    pub fn new(config: GeneratorConfig) -> Self {
        log::info!(
            "world generator seeded with {} (base height {})",
            config.seed,
            config.base_height
        );

        WorldGenerator {
            perlin: Perlin::new(config.seed),
            decoration_noise: Value::new(config.seed),
            config,
        }
    }

    /// The configuration this generator was built with.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Height of the surface block of the column at world `(x, z)`.
    ///
    /// # Returns
    /// The rounded height, never lower than 1.
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        if !self.config.enable_noise {
            return self.config.base_height.max(1);
        }

        let (x, z) = (x as f64, z as f64);
        let elevation = self.perlin.get([
            x * self.config.height_frequency,
            0.0,
            z * self.config.height_frequency,
        ]);
        let biome = self.perlin.get([
            x * self.config.biome_frequency,
            0.0,
            z * self.config.biome_frequency,
        ]);

        let height = self.config.base_height as f64
            + biome * self.config.biome_strength
            + elevation * self.config.height_amplitude as f64;

        (height.round() as i32).max(1)
    }

    /// Whether the block at world `(x, y, z)` is carved out by a cave.
    ///
    /// Caves only open strictly between `BEDROCK_LEVEL` and one block below the surface,
    /// so the grass layer and the block under it are always kept.
    pub fn is_cave(&self, x: i32, y: i32, z: i32) -> bool {
        self.is_cave_below(x, y, z, self.surface_height(x, z))
    }

    fn is_cave_below(&self, x: i32, y: i32, z: i32, surface_height: i32) -> bool {
        if !self.config.enable_noise || y <= BEDROCK_LEVEL || y >= surface_height - 1 {
            return false;
        }

        let frequency = self.config.cave_frequency;
        let sample = self
            .perlin
            .get([x as f64 * frequency, y as f64 * frequency, z as f64 * frequency]);

        sample.abs() < self.config.cave_threshold
    }

    /// Generates one column of the chunk at `chunk_position`.
    ///
    /// # Arguments
    /// * `chunk_position` - Chunk grid coordinate
    /// * `local_x`, `local_z` - Column inside the chunk, in `[0, CHUNK_DIMENSION)`
    pub fn generate_column(
        &self,
        chunk_position: Point3<i32>,
        local_x: i32,
        local_z: i32,
    ) -> GeneratedColumn {
        let world_x = chunk_position.x * CHUNK_DIMENSION + local_x;
        let world_z = chunk_position.z * CHUNK_DIMENSION + local_z;
        let surface_height = self.surface_height(world_x, world_z);

        let mut blocks = [BlockType::AIR; CHUNK_DIMENSION as usize];
        for (local_y, block) in blocks.iter_mut().enumerate() {
            let world_y = chunk_position.y * CHUNK_DIMENSION + local_y as i32;
            if world_y > surface_height
                || self.is_cave_below(world_x, world_y, world_z, surface_height)
            {
                continue;
            }

            *block = if world_y == surface_height {
                BlockType::GRASS
            } else if world_y >= surface_height - self.config.soil_depth {
                BlockType::DIRT
            } else {
                BlockType::STONE
            };
        }

        GeneratedColumn {
            surface_height,
            blocks,
        }
    }

    /// Fills every column of `chunk`, then decorates it.
    ///
    /// The chunk's visibility masks are not rebuilt here; callers do that once the
    /// chunk is final.
    pub fn populate_chunk(&self, chunk: &mut Chunk) {
        let position = chunk.position();
        let mut surface_heights = Vec::with_capacity((CHUNK_DIMENSION * CHUNK_DIMENSION) as usize);

        for z in 0..CHUNK_DIMENSION {
            for x in 0..CHUNK_DIMENSION {
                let column = self.generate_column(position, x, z);
                for (y, block) in column.blocks.iter().enumerate() {
                    if *block != BlockType::AIR {
                        chunk.set_block(x, y as i32, z, *block);
                    }
                }
                surface_heights.push(column.surface_height);
            }
        }

        if self.config.enable_trees {
            decoration::place_trees(self, chunk, &surface_heights);
        }
    }

    /// Seeded roll in `[-1, 1]` for the column at world `(x, z)`.
    pub(crate) fn decoration_roll(&self, x: i32, z: i32) -> f64 {
        let frequency = self.config.tree_frequency;
        self.decoration_noise
            .get([x as f64 * frequency, 0.0, z as f64 * frequency])
    }
}
