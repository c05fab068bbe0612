//! Genome types: the circle encoding evolved by the search.

use rand::Rng;

/// One translucent circle. Every field is normalized to [0, 1].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gene {
    /// Center row as a fraction of canvas height.
    pub center_y: f64,
    /// Center column as a fraction of canvas width.
    pub center_x: f64,
    /// Radius as a fraction of the canvas radius scale.
    pub radius: f64,
    /// Grayscale intensity added to covered pixels.
    pub intensity: f64,
    /// Weight kept from what is already drawn under the circle.
    pub transparency: f64,
}

impl Gene {
    /// Number of fields in a gene.
    pub const FIELDS: usize = 5;

    /// Field names in canonical order.
    pub const FIELD_NAMES: [&'static str; Self::FIELDS] =
        ["center_y", "center_x", "radius", "intensity", "transparency"];

    /// Draw every field uniformly from [0, 1).
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_array(std::array::from_fn(|_| rng.r#gen::<f64>()))
    }

    /// Fields in canonical order.
    #[inline]
    pub fn to_array(&self) -> [f64; Self::FIELDS] {
        [
            self.center_y,
            self.center_x,
            self.radius,
            self.intensity,
            self.transparency,
        ]
    }

    /// Build a gene from fields in canonical order. Does not validate.
    #[inline]
    pub fn from_array(fields: [f64; Self::FIELDS]) -> Self {
        let [center_y, center_x, radius, intensity, transparency] = fields;
        Self {
            center_y,
            center_x,
            radius,
            intensity,
            transparency,
        }
    }

    /// Index of the first field outside [0, 1], if any.
    fn invalid_field(&self) -> Option<usize> {
        self.to_array()
            .iter()
            .position(|v| !(0.0..=1.0).contains(v))
    }
}

/// Ordered set of circles. Later genes are painted over earlier ones.
///
/// The gene vector is private so the [0, 1] invariant can only be broken
/// through [`Genome::from_genes`], which checks it.
#[derive(Debug, Clone, PartialEq)]
pub struct Genome {
    genes: Vec<Gene>,
}

impl Genome {
    /// Random genome with `gene_count` uniformly drawn genes.
    pub fn random<R: Rng + ?Sized>(gene_count: usize, rng: &mut R) -> Self {
        Self {
            genes: (0..gene_count).map(|_| Gene::random(rng)).collect(),
        }
    }

    /// Wrap an existing gene vector, rejecting fields outside [0, 1].
    pub fn from_genes(genes: Vec<Gene>) -> Result<Self, GenomeError> {
        for (i, gene) in genes.iter().enumerate() {
            if let Some(field) = gene.invalid_field() {
                return Err(GenomeError::InvalidGene {
                    gene: i,
                    field: Gene::FIELD_NAMES[field],
                    value: gene.to_array()[field],
                });
            }
        }
        Ok(Self { genes })
    }

    /// Wrap genes the caller has already clamped.
    pub(crate) fn from_clamped(genes: Vec<Gene>) -> Self {
        debug_assert!(genes.iter().all(|g| g.invalid_field().is_none()));
        Self { genes }
    }

    /// Append one uniformly random gene.
    pub fn push_random_gene<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.genes.push(Gene::random(rng));
    }

    /// Number of genes.
    #[inline]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Genes in paint order.
    #[inline]
    pub fn genes(&self) -> &[Gene] {
        &self.genes
    }
}

/// Genome validation errors.
#[derive(Debug, thiserror::Error)]
pub enum GenomeError {
    #[error("Gene {gene} field {field} = {value} lies outside [0, 1]")]
    InvalidGene {
        gene: usize,
        field: &'static str,
        value: f64,
    },
}
