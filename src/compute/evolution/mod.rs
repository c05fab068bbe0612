//! Evolutionary search for circle genomes that approximate a target image.
//!
//! # Overview
//!
//! The search is a single-individual hill climber:
//!
//! - **Fitness Functions** (`fitness`): MSE-based fitness and structural similarity
//! - **Genome Operations** (`genome`): Seeded random generation, growth, and mutation
//! - **Search** (`search`): The accept-if-strictly-better generation loop
//!
//! # Example
//!
//! ```rust,no_run
//! use circle_evolution::compute::Raster;
//! use circle_evolution::compute::evolution::EvolutionEngine;
//! use circle_evolution::schema::{CanvasSize, EvolutionConfig};
//!
//! let config = EvolutionConfig {
//!     canvas: CanvasSize::new(64, 64),
//!     gene_count: 50,
//!     max_generations: 5_000,
//!     random_seed: Some(7),
//!     ..Default::default()
//! };
//! let target = Raster::filled(config.canvas, 0.5);
//!
//! let mut engine = EvolutionEngine::new(config, target).unwrap();
//! let result = engine
//!     .run_with_callback(|imp| println!("GEN {}, FIT {:.6}", imp.generation, imp.fitness))
//!     .unwrap();
//!
//! println!("Best fitness: {:.6}", result.best.fitness);
//! ```

mod fitness;
mod genome;
mod search;

pub use fitness::{
    FitnessError, FitnessEvaluator, SsimParams, max_error, mean_squared_error, mse_fitness,
    structural_similarity, structural_similarity_with,
};
pub use genome::{GenomeRng, genome_distance};
pub use search::{
    Candidate, EngineError, EvolutionEngine, EvolutionResult, EvolutionStats, Improvement,
};
