//! Circle Evolution - Approximate grayscale images with evolved translucent circles.
//!
//! A single "specie" genome encodes a list of circles. Each generation the
//! genome is mutated, the challenger is rendered and scored against the
//! target image, and it replaces the incumbent only when strictly better.
//!
//! # Architecture
//!
//! - `schema`: Configuration and genome types
//! - `compute`: Rendering, fitness metrics, mutation, and the search loop
//! - `imaging`: Loading target images and exporting results
//!
//! # Example
//!
//! ```rust,no_run
//! use circle_evolution::{
//!     compute::evolution::EvolutionEngine,
//!     imaging::{load_target_image, show_image},
//!     schema::{CanvasSize, EvolutionConfig},
//! };
//!
//! let config = EvolutionConfig {
//!     canvas: CanvasSize::new(128, 128),
//!     gene_count: 150,
//!     max_generations: 10_000,
//!     ..Default::default()
//! };
//! let target = load_target_image("mona_lisa.jpg", config.canvas).unwrap();
//!
//! let mut engine = EvolutionEngine::new(config, target).unwrap();
//! let result = engine.run().unwrap();
//!
//! show_image(&result.phenotype, "evolved.png").unwrap();
//! println!("Final fitness: {:.6}", result.best.fitness);
//! ```

pub mod compute;
pub mod imaging;
pub mod schema;

// Re-export commonly used types
pub use compute::evolution::{EvolutionEngine, EvolutionResult, Improvement};
pub use compute::{Raster, render};
pub use schema::{CanvasSize, EvolutionConfig, Gene, Genome};
