//! Quick evolution performance test

use circle_evolution::{
    EvolutionConfig, EvolutionEngine,
    compute::Raster,
    schema::{CanvasSize, FitnessMetric},
};
use std::time::Instant;

fn main() {
    println!("=== Evolution Performance Test ===\n");

    for (canvas_size, metric) in [
        (32, FitnessMetric::Mse),
        (64, FitnessMetric::Mse),
        (128, FitnessMetric::Mse),
        (64, FitnessMetric::StructuralSimilarity),
    ] {
        println!("Canvas: {}x{} ({:?})", canvas_size, canvas_size, metric);

        let canvas = CanvasSize::new(canvas_size, canvas_size);
        let target = Raster::from_fn(canvas, |y, x| {
            let dy = y as f64 / canvas_size as f64 - 0.5;
            let dx = x as f64 / canvas_size as f64 - 0.5;
            (1.0 - 2.0 * (dx * dx + dy * dy).sqrt()).clamp(0.0, 1.0)
        });

        let config = EvolutionConfig {
            canvas,
            gene_count: 50,
            max_generations: 2_000,
            metric,
            random_seed: Some(42),
            ..Default::default()
        };

        let start = Instant::now();
        let mut engine = match EvolutionEngine::new(config, target) {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("  Failed to create engine: {}", e);
                continue;
            }
        };
        let result = match engine.run() {
            Ok(result) => result,
            Err(e) => {
                eprintln!("  Run failed: {}", e);
                continue;
            }
        };
        let elapsed = start.elapsed();

        println!("  Generations:     {}", result.stats.generations);
        println!("  Improvements:    {}", result.stats.improvements);
        println!("  Elapsed:         {:.2}s", elapsed.as_secs_f64());
        println!("  Gens/sec:        {:.1}", result.stats.generations_per_second);
        println!("  Initial fitness: {:.4}", result.stats.initial_fitness);
        println!("  Best fitness:    {:.4}", result.stats.best_fitness);
        println!();
    }
}
