//! Genome manipulation utilities for evolutionary search.
//!
//! Provides random generation, growth, and the mutation operator.

use rand::prelude::*;

use crate::schema::{Gene, Genome, MutationConfig};

/// Random number generator wrapper for genome operations.
pub struct GenomeRng {
    rng: StdRng,
}

impl GenomeRng {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Generate a random genome.
    pub fn random_genome(&mut self, gene_count: usize) -> Genome {
        Genome::random(gene_count, &mut self.rng)
    }

    /// Copy of `parent` with one extra random gene appended.
    pub fn grow(&mut self, parent: &Genome) -> Genome {
        let mut child = parent.clone();
        child.push_random_gene(&mut self.rng);
        child
    }

    /// Derive a child genome from `parent`.
    ///
    /// A rate is drawn for this call and every (gene, field) cell is selected
    /// independently with that probability. Selected cells are either all
    /// redrawn uniformly or all nudged by `(u - 0.5) / k`, with one divisor
    /// `k` shared by the whole call, then clamped to [0, 1]. The parent is
    /// never touched.
    pub fn mutate(&mut self, parent: &Genome, config: &MutationConfig) -> Genome {
        let (rate_lo, rate_hi) = config.rate_bounds;
        let rate = self.rng.gen_range(rate_lo..=rate_hi);

        let mut cells: Vec<[f64; Gene::FIELDS]> =
            parent.genes().iter().map(Gene::to_array).collect();

        let mask: Vec<[bool; Gene::FIELDS]> = cells
            .iter()
            .map(|_| std::array::from_fn(|_| self.rng.r#gen::<f64>() < rate))
            .collect();
        let selected = mask.iter().flatten().filter(|&&m| m).count();

        let scope: Vec<f64> = (0..selected).map(|_| self.rng.r#gen::<f64>()).collect();

        let replace = self.rng.r#gen::<f64>() < config.replacement_probability;
        let (div_lo, div_hi) = config.divisor_bounds;
        let divisor = self.rng.gen_range(div_lo..=div_hi) as f64;

        let targets = cells
            .iter_mut()
            .flatten()
            .zip(mask.iter().flatten())
            .filter_map(|(cell, &m)| m.then_some(cell));

        for (cell, &u) in targets.zip(&scope) {
            let value = if replace {
                u
            } else {
                *cell + (u - 0.5) / divisor
            };
            *cell = value.clamp(0.0, 1.0);
        }

        log::trace!(
            "mutate: rate={rate:.3}, cells={selected}, {}",
            if replace {
                "replace".to_string()
            } else {
                format!("soft k={divisor}")
            }
        );

        Genome::from_clamped(cells.into_iter().map(Gene::from_array).collect())
    }
}

/// Mean absolute per-field difference between two genomes.
///
/// Genes beyond the shorter genome count as fully different.
pub fn genome_distance(g1: &Genome, g2: &Genome) -> f64 {
    let longest = g1.len().max(g2.len());
    if longest == 0 {
        return 0.0;
    }

    let shared: f64 = g1
        .genes()
        .iter()
        .zip(g2.genes())
        .map(|(a, b)| {
            a.to_array()
                .iter()
                .zip(b.to_array())
                .map(|(x, y)| (x - y).abs())
                .sum::<f64>()
        })
        .sum();
    let missing = (longest - g1.len().min(g2.len())) * Gene::FIELDS;

    (shared + missing as f64) / (longest * Gene::FIELDS) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_range(genome: &Genome) -> bool {
        genome
            .genes()
            .iter()
            .all(|g| g.to_array().iter().all(|v| (0.0..=1.0).contains(v)))
    }

    #[test]
    fn test_random_genome() {
        let mut rng = GenomeRng::new(42);
        let genome = rng.random_genome(20);
        assert_eq!(genome.len(), 20);
        assert!(in_range(&genome));
    }

    #[test]
    fn test_seeded_rng_reproducible() {
        let a = GenomeRng::new(9).random_genome(10);
        let b = GenomeRng::new(9).random_genome(10);
        assert_eq!(a, b);
    }

    #[test]
    fn test_mutation_stays_in_range() {
        let mut rng = GenomeRng::new(42);
        let config = MutationConfig::default();
        let mut genome = rng.random_genome(30);

        for _ in 0..200 {
            genome = rng.mutate(&genome, &config);
            assert!(in_range(&genome));
            assert_eq!(genome.len(), 30);
        }
    }

    #[test]
    fn test_mutation_leaves_parent_untouched() {
        let mut rng = GenomeRng::new(1);
        let parent = rng.random_genome(10);
        let snapshot = parent.clone();

        let config = MutationConfig {
            rate_bounds: (1.0, 1.0),
            ..Default::default()
        };
        let child = rng.mutate(&parent, &config);

        assert_eq!(parent, snapshot);
        assert_ne!(child, parent);
    }

    #[test]
    fn test_forced_replacement_redraws_everything() {
        let config = MutationConfig {
            rate_bounds: (1.0, 1.0),
            replacement_probability: 1.0,
            ..Default::default()
        };
        let zeros = Genome::from_genes(vec![Gene::from_array([0.0; 5]); 8]).unwrap();
        let ones = Genome::from_genes(vec![Gene::from_array([1.0; 5]); 8]).unwrap();

        // Same RNG stream, different parents: replacement ignores parent values.
        let from_zeros = GenomeRng::new(77).mutate(&zeros, &config);
        let from_ones = GenomeRng::new(77).mutate(&ones, &config);

        assert_eq!(from_zeros, from_ones);
        assert!(from_zeros.genes().iter().all(|g| g.to_array() != [0.0; 5]));
    }

    #[test]
    fn test_soft_addition_is_bounded_step() {
        let config = MutationConfig {
            rate_bounds: (1.0, 1.0),
            replacement_probability: 0.0,
            divisor_bounds: (4, 4),
        };
        let parent = Genome::from_genes(vec![Gene::from_array([0.5; 5]); 6]).unwrap();
        let child = GenomeRng::new(3).mutate(&parent, &config);

        for gene in child.genes() {
            for v in gene.to_array() {
                assert!((v - 0.5).abs() <= 0.125 + 1e-12);
            }
        }
    }

    #[test]
    fn test_empty_selection_copies_parent() {
        let config = MutationConfig {
            rate_bounds: (0.0, 0.0),
            ..Default::default()
        };
        let mut rng = GenomeRng::new(5);
        let parent = rng.random_genome(12);
        let child = rng.mutate(&parent, &config);
        assert_eq!(child, parent);
    }

    #[test]
    fn test_grow() {
        let mut rng = GenomeRng::new(8);
        let parent = rng.random_genome(4);
        let child = rng.grow(&parent);

        assert_eq!(parent.len(), 4);
        assert_eq!(child.len(), 5);
        assert_eq!(&child.genes()[..4], parent.genes());
    }

    #[test]
    fn test_genome_distance() {
        let mut rng = GenomeRng::new(42);
        let g1 = rng.random_genome(6);
        let g2 = g1.clone();
        let g3 = rng.random_genome(6);

        assert!(genome_distance(&g1, &g2).abs() < 1e-12);
        assert!(genome_distance(&g1, &g3) > 0.0);

        let longer = rng.grow(&g1);
        let d = genome_distance(&g1, &longer);
        assert!((d - 1.0 / 7.0).abs() < 1e-12);
    }
}
