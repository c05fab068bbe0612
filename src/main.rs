//! Circle Evolution CLI - Evolve circles towards a target image.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use circle_evolution::{
    compute::evolution::EvolutionEngine,
    imaging::{load_target_image, show_image},
    schema::{CanvasSize, EvolutionConfig, FitnessMetric},
};

#[derive(Parser, Debug)]
#[command(author, version, about = "Approximate a grayscale image with evolved translucent circles")]
struct Args {
    /// Target image path
    target: PathBuf,

    /// Canvas height in pixels
    #[arg(long, default_value_t = 128)]
    height: usize,

    /// Canvas width in pixels
    #[arg(long, default_value_t = 128)]
    width: usize,

    /// Number of circles in the initial genome
    #[arg(short, long, default_value_t = 150)]
    genes: usize,

    /// Generation budget
    #[arg(short = 'n', long, default_value_t = 100_000)]
    generations: u64,

    /// Random seed (random if omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Fitness metric
    #[arg(short, long, value_enum, default_value_t = Metric::Mse)]
    metric: Metric,

    /// Where to write the rendered result
    #[arg(short, long, default_value = "evolved.png")]
    output: PathBuf,

    /// Do not print each improvement
    #[arg(short, long)]
    quiet: bool,

    /// Print the resolved configuration as JSON and exit
    #[arg(long)]
    print_config: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Metric {
    Mse,
    Ssim,
}

impl From<Metric> for FitnessMetric {
    fn from(metric: Metric) -> Self {
        match metric {
            Metric::Mse => FitnessMetric::Mse,
            Metric::Ssim => FitnessMetric::StructuralSimilarity,
        }
    }
}

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args = Args::parse();

    let config = EvolutionConfig {
        canvas: CanvasSize::new(args.height, args.width),
        gene_count: args.genes,
        max_generations: args.generations,
        metric: args.metric.into(),
        random_seed: args.seed,
        ..Default::default()
    };

    if args.print_config {
        match serde_json::to_string_pretty(&config) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Error serializing config: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    }

    let target = load_target_image(&args.target, config.canvas).unwrap_or_else(|e| {
        eprintln!("Error loading target image: {}", e);
        std::process::exit(1);
    });

    println!("Circle Evolution");
    println!("================");
    println!("Target: {}", args.target.display());
    println!("Canvas: {}", config.canvas);
    println!("Genes: {}", config.gene_count);
    println!("Generations: {}", config.max_generations);
    println!("Metric: {:?}", config.metric);
    println!();

    let mut engine = EvolutionEngine::new(config, target).unwrap_or_else(|e| {
        eprintln!("Error creating engine: {}", e);
        std::process::exit(1);
    });

    println!("Initial fitness: {:.6}", engine.incumbent().fitness);
    println!();

    let quiet = args.quiet;
    let result = engine
        .run_with_callback(|imp| {
            if !quiet {
                println!("GEN {}, FIT {:.6}", imp.generation, imp.fitness);
            }
        })
        .unwrap_or_else(|e| {
            eprintln!("Evolution failed: {}", e);
            std::process::exit(1);
        });

    if let Err(e) = show_image(&result.phenotype, &args.output) {
        eprintln!("Error writing result: {}", e);
        std::process::exit(1);
    }

    let stats = &result.stats;
    println!();
    println!("Final state:");
    println!("  Generations: {}", stats.generations);
    println!("  Improvements: {}", stats.improvements);
    println!("  Genes: {}", stats.gene_count);
    println!(
        "  Time: {:.2}s ({:.1} generations/s)",
        stats.elapsed_seconds, stats.generations_per_second
    );
    println!("  Output: {}", args.output.display());
    println!("Final fitness: {:.6}", stats.best_fitness);
}
