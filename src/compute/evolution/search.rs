//! Hill-climbing search over circle genomes.

use std::time::Instant;

use crate::compute::{Raster, render_into};
use crate::schema::{ConfigError, EvolutionConfig, Genome};

use super::fitness::{FitnessError, FitnessEvaluator};
use super::genome::{GenomeRng, genome_distance};

/// A scored genome.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// The genome.
    pub genome: Genome,
    /// Fitness score.
    pub fitness: f64,
    /// Generation that produced it.
    pub generation: u64,
}

/// Reported whenever a challenger replaces the incumbent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Improvement {
    /// Zero-based generation index.
    pub generation: u64,
    /// Fitness of the new incumbent.
    pub fitness: f64,
    /// Fitness of the replaced incumbent.
    pub previous: f64,
}

/// Summary statistics of a run.
#[derive(Debug, Clone)]
pub struct EvolutionStats {
    pub generations: u64,
    pub improvements: u64,
    pub initial_fitness: f64,
    pub best_fitness: f64,
    pub gene_count: usize,
    pub elapsed_seconds: f64,
    pub generations_per_second: f64,
}

/// Output of a finished run.
#[derive(Debug, Clone)]
pub struct EvolutionResult {
    /// Final incumbent.
    pub best: Candidate,
    /// Final incumbent rendered on the run's canvas.
    pub phenotype: Raster,
    pub stats: EvolutionStats,
}

/// Errors raised while setting up or running the search.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Fitness(#[from] FitnessError),
}

/// Single-individual evolution engine.
///
/// Owns the incumbent genome exclusively. A generation mutates it, scores the
/// challenger and swaps it in only on strict improvement, so the incumbent is
/// always a complete, scored genome between generations.
pub struct EvolutionEngine {
    config: EvolutionConfig,
    rng: GenomeRng,
    evaluator: FitnessEvaluator,
    incumbent: Candidate,
    initial_fitness: f64,
    generation: u64,
    improvements: u64,
    canvas: Raster,
}

impl EvolutionEngine {
    /// Create a new evolution engine with a random initial genome.
    pub fn new(config: EvolutionConfig, target: Raster) -> Result<Self, EngineError> {
        config.validate()?;
        if target.size() != config.canvas {
            return Err(FitnessError::DimensionMismatch {
                expected: config.canvas,
                actual: target.size(),
            }
            .into());
        }

        let seed = config.random_seed.unwrap_or_else(rand::random);
        let mut rng = GenomeRng::new(seed);
        let evaluator = FitnessEvaluator::new(target, config.metric);

        let genome = rng.random_genome(config.gene_count);
        let mut canvas = Raster::zeros(config.canvas);
        render_into(&genome, &mut canvas);
        let fitness = evaluator.evaluate(&canvas)?;

        log::info!(
            "Engine ready: canvas {}, {} genes, metric {:?}, seed {}, max error {:.6}, initial fitness {:.6}",
            config.canvas,
            config.gene_count,
            config.metric,
            seed,
            evaluator.max_error(),
            fitness
        );

        Ok(Self {
            config,
            rng,
            evaluator,
            incumbent: Candidate {
                genome,
                fitness,
                generation: 0,
            },
            initial_fitness: fitness,
            generation: 0,
            improvements: 0,
            canvas,
        })
    }

    /// Replace the random initial genome.
    pub fn with_genome(mut self, genome: Genome) -> Result<Self, EngineError> {
        let fitness = self.score(&genome)?;
        self.incumbent = Candidate {
            genome,
            fitness,
            generation: self.generation,
        };
        self.initial_fitness = fitness;
        Ok(self)
    }

    /// Render a genome into the scratch canvas and score it.
    fn score(&mut self, genome: &Genome) -> Result<f64, FitnessError> {
        render_into(genome, &mut self.canvas);
        self.evaluator.evaluate(&self.canvas)
    }

    /// Run one generation.
    ///
    /// Rendering is pure, so the incumbent's cached fitness stands in for
    /// re-rendering it.
    pub fn step(&mut self) -> Result<Option<Improvement>, FitnessError> {
        let generation = self.generation;
        let fit = self.incumbent.fitness;

        let challenger = self
            .rng
            .mutate(&self.incumbent.genome, &self.config.mutation);
        let new_fit = self.score(&challenger)?;
        self.generation += 1;

        log::trace!("Generation {generation}: incumbent {fit:.6}, challenger {new_fit:.6}");

        if new_fit > fit {
            log::debug!(
                "Generation {generation}: fitness {fit:.6} -> {new_fit:.6}, genome distance {:.4}",
                genome_distance(&self.incumbent.genome, &challenger)
            );
            self.incumbent = Candidate {
                genome: challenger,
                fitness: new_fit,
                generation,
            };
            self.improvements += 1;
            Ok(Some(Improvement {
                generation,
                fitness: new_fit,
                previous: fit,
            }))
        } else {
            Ok(None)
        }
    }

    /// Replace the incumbent with a copy carrying one extra random gene.
    ///
    /// The grown genome is kept regardless of its score. Returns the new
    /// fitness. Not used by the main loop.
    pub fn grow_incumbent(&mut self) -> Result<f64, FitnessError> {
        let grown = self.rng.grow(&self.incumbent.genome);
        let fitness = self.score(&grown)?;
        log::debug!(
            "Grew incumbent to {} genes: fitness {:.6} -> {:.6}",
            grown.len(),
            self.incumbent.fitness,
            fitness
        );
        self.incumbent = Candidate {
            genome: grown,
            fitness,
            generation: self.generation,
        };
        Ok(fitness)
    }

    /// Run until the generation budget is spent, reporting every improvement.
    pub fn run_with_callback<F>(&mut self, mut callback: F) -> Result<EvolutionResult, EngineError>
    where
        F: FnMut(&Improvement),
    {
        let start_time = Instant::now();
        let start_generation = self.generation;
        let total = self.config.max_generations;
        let report_every = (total / 10).max(1);

        while self.generation < total {
            if let Some(improvement) = self.step()? {
                callback(&improvement);
            }

            if self.generation % report_every == 0 {
                log::info!(
                    "Generation {}/{}: fitness {:.6}, {} improvements",
                    self.generation,
                    total,
                    self.incumbent.fitness,
                    self.improvements
                );
            }
        }

        let elapsed = start_time.elapsed().as_secs_f64();
        let ran = self.generation - start_generation;
        let stats = EvolutionStats {
            generations: self.generation,
            improvements: self.improvements,
            initial_fitness: self.initial_fitness,
            best_fitness: self.incumbent.fitness,
            gene_count: self.incumbent.genome.len(),
            elapsed_seconds: elapsed,
            generations_per_second: if elapsed > 0.0 {
                ran as f64 / elapsed
            } else {
                0.0
            },
        };

        log::info!(
            "Finished {} generations in {:.2}s: fitness {:.6} -> {:.6}",
            stats.generations,
            elapsed,
            stats.initial_fitness,
            stats.best_fitness
        );

        Ok(EvolutionResult {
            best: self.incumbent.clone(),
            phenotype: self.render_incumbent(),
            stats,
        })
    }

    /// Run evolution (blocking).
    pub fn run(&mut self) -> Result<EvolutionResult, EngineError> {
        self.run_with_callback(|_| {})
    }

    /// Current best candidate.
    pub fn incumbent(&self) -> &Candidate {
        &self.incumbent
    }

    /// Render the incumbent on a fresh canvas.
    pub fn render_incumbent(&self) -> Raster {
        crate::compute::render(&self.incumbent.genome, self.config.canvas)
    }

    /// Generations executed so far.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Normalization constant fixed at construction.
    pub fn max_error(&self) -> f64 {
        self.evaluator.max_error()
    }

    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    pub fn evaluator(&self) -> &FitnessEvaluator {
        &self.evaluator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{CanvasSize, FitnessMetric, Gene};

    fn test_config(size: usize, generations: u64) -> EvolutionConfig {
        EvolutionConfig {
            canvas: CanvasSize::new(size, size),
            gene_count: 8,
            max_generations: generations,
            random_seed: Some(42),
            ..Default::default()
        }
    }

    fn target(size: usize) -> Raster {
        let canvas = CanvasSize::new(size, size);
        Raster::from_fn(canvas, |y, x| {
            let dy = y as f64 - size as f64 / 2.0;
            let dx = x as f64 - size as f64 / 2.0;
            if dy * dy + dx * dx < (size * size) as f64 / 9.0 { 0.8 } else { 0.1 }
        })
    }

    #[test]
    fn test_evolution_engine_creation() {
        let engine = EvolutionEngine::new(test_config(16, 10), target(16)).unwrap();

        assert_eq!(engine.generation(), 0);
        assert_eq!(engine.incumbent().genome.len(), 8);
        assert_eq!(engine.config().gene_count, 8);
        assert_eq!(engine.config().random_seed, Some(42));
        assert!(engine.incumbent().fitness.is_finite());
    }

    #[test]
    fn test_target_size_mismatch() {
        let result = EvolutionEngine::new(test_config(16, 10), target(12));
        assert!(matches!(
            result,
            Err(EngineError::Fitness(FitnessError::DimensionMismatch { .. }))
        ));
    }

    #[test]
    fn test_invalid_config() {
        let config = EvolutionConfig {
            gene_count: 0,
            ..test_config(8, 1)
        };
        assert!(matches!(
            EvolutionEngine::new(config, target(8)),
            Err(EngineError::Config(ConfigError::InvalidGeneCount))
        ));
    }

    #[test]
    fn test_evolution_run() {
        let mut engine = EvolutionEngine::new(test_config(16, 200), target(16)).unwrap();
        let result = engine.run().unwrap();

        assert_eq!(result.stats.generations, 200);
        assert!(result.stats.best_fitness >= result.stats.initial_fitness);
        assert_eq!(result.phenotype, engine.render_incumbent());
    }

    #[test]
    fn test_fitness_is_monotonic() {
        let mut engine = EvolutionEngine::new(test_config(16, 300), target(16)).unwrap();
        let initial = engine.incumbent().fitness;

        let mut seen = Vec::new();
        let result = engine.run_with_callback(|imp| seen.push(*imp)).unwrap();

        let mut last = initial;
        for imp in &seen {
            assert!(imp.fitness > last);
            assert_eq!(imp.previous, last);
            last = imp.fitness;
        }
        assert_eq!(result.stats.improvements as usize, seen.len());
        assert_eq!(result.best.fitness, last);
    }

    #[test]
    fn test_generations_strictly_ordered() {
        let mut engine = EvolutionEngine::new(test_config(12, 150), target(12)).unwrap();
        let mut gens = Vec::new();
        engine
            .run_with_callback(|imp| gens.push(imp.generation))
            .unwrap();

        assert!(gens.windows(2).all(|w| w[0] < w[1]));
        assert!(gens.iter().all(|&g| g < 150));
    }

    #[test]
    fn test_cached_fitness_matches_render() {
        let mut engine = EvolutionEngine::new(test_config(16, 100), target(16)).unwrap();
        engine.run().unwrap();

        let rendered = engine.render_incumbent();
        let fresh = engine.evaluator().evaluate(&rendered).unwrap();
        assert_eq!(fresh, engine.incumbent().fitness);
    }

    #[test]
    fn test_max_error_fixed_across_run() {
        let mut engine = EvolutionEngine::new(test_config(16, 50), target(16)).unwrap();
        let before = engine.max_error();
        engine.run().unwrap();
        assert_eq!(engine.max_error(), before);

        let mut longer = EvolutionEngine::new(test_config(16, 500), target(16)).unwrap();
        longer.run().unwrap();
        assert_eq!(longer.max_error(), before);
    }

    #[test]
    fn test_seeded_runs_reproducible() {
        let a = EvolutionEngine::new(test_config(12, 100), target(12))
            .unwrap()
            .run()
            .unwrap();
        let b = EvolutionEngine::new(test_config(12, 100), target(12))
            .unwrap()
            .run()
            .unwrap();

        assert_eq!(a.best.genome, b.best.genome);
        assert_eq!(a.best.fitness, b.best.fitness);
    }

    #[test]
    fn test_perfect_genome_on_blank_target() {
        let config = EvolutionConfig {
            canvas: CanvasSize::new(4, 4),
            gene_count: 1,
            max_generations: 20,
            random_seed: Some(1),
            ..Default::default()
        };
        let genome = Genome::from_genes(vec![Gene::from_array([0.5, 0.5, 0.0, 1.0, 0.0])]).unwrap();

        let mut engine = EvolutionEngine::new(config, Raster::zeros(CanvasSize::new(4, 4)))
            .unwrap()
            .with_genome(genome.clone())
            .unwrap();
        assert_eq!(engine.incumbent().fitness, 1.0);

        // Nothing beats a perfect score, so the genome survives.
        let result = engine.run().unwrap();
        assert_eq!(result.best.genome, genome);
        assert_eq!(result.stats.improvements, 0);
    }

    #[test]
    fn test_grow_incumbent() {
        let mut engine = EvolutionEngine::new(test_config(16, 10), target(16)).unwrap();
        let before = engine.incumbent().genome.clone();

        let fitness = engine.grow_incumbent().unwrap();

        let after = &engine.incumbent().genome;
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(&after.genes()[..before.len()], before.genes());
        assert_eq!(engine.incumbent().fitness, fitness);
    }

    #[test]
    fn test_structural_similarity_metric() {
        let config = EvolutionConfig {
            metric: FitnessMetric::StructuralSimilarity,
            ..test_config(16, 100)
        };
        let mut engine = EvolutionEngine::new(config, target(16)).unwrap();
        let result = engine.run().unwrap();

        assert!(result.stats.best_fitness <= 1.0 + 1e-9);
        assert!(result.stats.best_fitness >= result.stats.initial_fitness);
    }
}
