//! Configuration types for a circle evolution run.

use serde::{Deserialize, Serialize};

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    /// Rows (Y dimension).
    pub height: usize,
    /// Columns (X dimension).
    pub width: usize,
}

impl CanvasSize {
    pub fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    /// Total pixel count.
    #[inline]
    pub fn area(&self) -> usize {
        self.height * self.width
    }

    /// Pixel length that a gene radius of 1.0 maps to.
    #[inline]
    pub fn radius_scale(&self) -> f64 {
        (self.height + self.width) as f64 / 2.0 / 6.0
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        Self {
            height: 128,
            width: 128,
        }
    }
}

impl std::fmt::Display for CanvasSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.height, self.width)
    }
}

/// Fitness metric used to compare a phenotype with the target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FitnessMetric {
    /// Mean squared error normalized by the target's threshold error.
    #[default]
    Mse,
    /// Windowed structural similarity index.
    StructuralSimilarity,
}

/// Mutation operator parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationConfig {
    /// Range the per-call cell selection rate is drawn from.
    #[serde(default = "default_rate_bounds")]
    pub rate_bounds: (f64, f64),
    /// Probability that selected cells are redrawn instead of nudged.
    #[serde(default = "default_replacement_probability")]
    pub replacement_probability: f64,
    /// Inclusive range of the soft-addition divisor.
    #[serde(default = "default_divisor_bounds")]
    pub divisor_bounds: (u32, u32),
}

impl Default for MutationConfig {
    fn default() -> Self {
        Self {
            rate_bounds: default_rate_bounds(),
            replacement_probability: default_replacement_probability(),
            divisor_bounds: default_divisor_bounds(),
        }
    }
}

fn default_rate_bounds() -> (f64, f64) {
    (0.02, 0.4)
}
fn default_replacement_probability() -> f64 {
    0.25
}
fn default_divisor_bounds() -> (u32, u32) {
    (4, 12)
}

impl MutationConfig {
    /// Validate mutation parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (lo, hi) = self.rate_bounds;
        if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || lo > hi {
            return Err(ConfigError::InvalidRateBounds(lo, hi));
        }
        if !(0.0..=1.0).contains(&self.replacement_probability) {
            return Err(ConfigError::InvalidReplacementProbability(
                self.replacement_probability,
            ));
        }
        let (lo, hi) = self.divisor_bounds;
        if lo == 0 || lo > hi {
            return Err(ConfigError::InvalidDivisorBounds(lo, hi));
        }
        Ok(())
    }
}

/// Top-level configuration for an evolution run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvolutionConfig {
    /// Canvas (and target) dimensions.
    pub canvas: CanvasSize,
    /// Genes in the initial random genome.
    pub gene_count: usize,
    /// Generation budget.
    pub max_generations: u64,
    /// Mutation operator parameters.
    #[serde(default)]
    pub mutation: MutationConfig,
    /// Fitness metric driving acceptance.
    #[serde(default)]
    pub metric: FitnessMetric,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            canvas: CanvasSize::default(),
            gene_count: 150,
            max_generations: 100_000,
            mutation: MutationConfig::default(),
            metric: FitnessMetric::default(),
            random_seed: None,
        }
    }
}

impl EvolutionConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.canvas.height == 0 || self.canvas.width == 0 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.gene_count == 0 {
            return Err(ConfigError::InvalidGeneCount);
        }
        self.mutation.validate()
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Canvas dimensions (height, width) must be non-zero")]
    InvalidDimensions,
    #[error("Gene count must be non-zero")]
    InvalidGeneCount,
    #[error("Mutation rate bounds ({0}, {1}) must be ordered and within [0, 1]")]
    InvalidRateBounds(f64, f64),
    #[error("Replacement probability {0} must be within [0, 1]")]
    InvalidReplacementProbability(f64),
    #[error("Divisor bounds ({0}, {1}) must be ordered and non-zero")]
    InvalidDivisorBounds(u32, u32),
}
