//! Fitness metrics comparing a rendered phenotype with the target image.
//!
//! Both metrics are higher-is-better:
//!
//! - MSE fitness: `(max_error - mse) / max_error`, exactly 1.0 on a perfect match
//! - Structural similarity: windowed SSIM in roughly [-1, 1]

use crate::compute::Raster;
use crate::schema::{CanvasSize, FitnessMetric};

/// Errors raised when scoring a phenotype.
#[derive(Debug, thiserror::Error)]
pub enum FitnessError {
    #[error("Phenotype is {actual} but target is {expected}")]
    DimensionMismatch {
        expected: CanvasSize,
        actual: CanvasSize,
    },
}

fn check_dimensions(phenotype: &Raster, target: &Raster) -> Result<(), FitnessError> {
    if phenotype.size() != target.size() {
        return Err(FitnessError::DimensionMismatch {
            expected: target.size(),
            actual: phenotype.size(),
        });
    }
    Ok(())
}

/// Normalization constant: MSE between the target and the complement of its
/// hard 0.5 threshold.
///
/// For targets in [0, 1] every pixel contributes at least 0.25, so the result
/// is never zero.
pub fn max_error(target: &Raster) -> f64 {
    let data = target.as_slice();
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data
        .iter()
        .map(|&t| {
            let complement = if t >= 0.5 { 0.0 } else { 1.0 };
            let d = complement - t;
            d * d
        })
        .sum();
    sum / data.len() as f64
}

/// Mean squared error between two rasters of equal size.
pub fn mean_squared_error(a: &Raster, b: &Raster) -> Result<f64, FitnessError> {
    check_dimensions(a, b)?;
    let n = a.as_slice().len();
    if n == 0 {
        return Ok(0.0);
    }
    let sum: f64 = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(&x, &y)| (x - y) * (x - y))
        .sum();
    Ok(sum / n as f64)
}

/// MSE mapped so a perfect match scores 1.0 and `max_error` scores 0.0.
pub fn mse_fitness(
    phenotype: &Raster,
    target: &Raster,
    max_error: f64,
) -> Result<f64, FitnessError> {
    let raw = mean_squared_error(phenotype, target)?;
    Ok((max_error - raw) / max_error)
}

/// Structural similarity parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SsimParams {
    /// Side of the square uniform window (odd).
    pub window: usize,
    pub k1: f64,
    pub k2: f64,
    /// Dynamic range of the inputs. 2.0 matches the floating-point default of
    /// the common reference implementation.
    pub data_range: f64,
}

impl Default for SsimParams {
    fn default() -> Self {
        Self {
            window: 7,
            k1: 0.01,
            k2: 0.03,
            data_range: 2.0,
        }
    }
}

/// Mean structural similarity with default parameters.
pub fn structural_similarity(phenotype: &Raster, target: &Raster) -> Result<f64, FitnessError> {
    structural_similarity_with(phenotype, target, &SsimParams::default())
}

/// Mean structural similarity.
///
/// Local statistics use a uniform window with symmetric boundary extension;
/// the similarity map is averaged after cropping half a window from every
/// border. The window shrinks to the largest odd size that fits the image.
pub fn structural_similarity_with(
    x: &Raster,
    y: &Raster,
    params: &SsimParams,
) -> Result<f64, FitnessError> {
    check_dimensions(x, y)?;
    let size = x.size();
    if size.area() == 0 {
        return Ok(1.0);
    }

    let mut win = params.window.max(1).min(size.height.min(size.width));
    if win % 2 == 0 {
        win -= 1;
    }
    let np = (win * win) as f64;
    let cov_norm = if np > 1.0 { np / (np - 1.0) } else { 1.0 };

    let xs = x.as_slice();
    let ys = y.as_slice();
    let xx: Vec<f64> = xs.iter().map(|v| v * v).collect();
    let yy: Vec<f64> = ys.iter().map(|v| v * v).collect();
    let xy: Vec<f64> = xs.iter().zip(ys).map(|(a, b)| a * b).collect();

    let ux = uniform_filter(xs, size, win);
    let uy = uniform_filter(ys, size, win);
    let uxx = uniform_filter(&xx, size, win);
    let uyy = uniform_filter(&yy, size, win);
    let uxy = uniform_filter(&xy, size, win);

    let c1 = (params.k1 * params.data_range).powi(2);
    let c2 = (params.k2 * params.data_range).powi(2);

    let pad = (win - 1) / 2;
    let mut total = 0.0;
    let mut count = 0usize;
    for row in pad..size.height - pad {
        for col in pad..size.width - pad {
            let i = row * size.width + col;
            let vx = cov_norm * (uxx[i] - ux[i] * ux[i]);
            let vy = cov_norm * (uyy[i] - uy[i] * uy[i]);
            let vxy = cov_norm * (uxy[i] - ux[i] * uy[i]);

            let a1 = 2.0 * ux[i] * uy[i] + c1;
            let a2 = 2.0 * vxy + c2;
            let b1 = ux[i] * ux[i] + uy[i] * uy[i] + c1;
            let b2 = vx + vy + c2;

            total += (a1 * a2) / (b1 * b2);
            count += 1;
        }
    }

    Ok(total / count as f64)
}

/// Mirror an out-of-range index back into `0..len` (edge sample repeated).
#[inline]
fn reflect(mut i: isize, len: usize) -> usize {
    let n = len as isize;
    loop {
        if i < 0 {
            i = -i - 1;
        } else if i >= n {
            i = 2 * n - i - 1;
        } else {
            return i as usize;
        }
    }
}

/// Separable box mean over a `win x win` neighbourhood.
fn uniform_filter(data: &[f64], size: CanvasSize, win: usize) -> Vec<f64> {
    let (h, w) = (size.height, size.width);
    let half = (win / 2) as isize;
    let inv = 1.0 / win as f64;

    let mut rows = vec![0.0; data.len()];
    for y in 0..h {
        let line = &data[y * w..(y + 1) * w];
        for x in 0..w {
            let mut acc = 0.0;
            for k in -half..=half {
                acc += line[reflect(x as isize + k, w)];
            }
            rows[y * w + x] = acc * inv;
        }
    }

    let mut out = vec![0.0; data.len()];
    for y in 0..h {
        for x in 0..w {
            let mut acc = 0.0;
            for k in -half..=half {
                acc += rows[reflect(y as isize + k, h) * w + x];
            }
            out[y * w + x] = acc * inv;
        }
    }
    out
}

/// Scores phenotypes against a fixed target.
///
/// `max_error` is derived from the target once, at construction.
#[derive(Debug, Clone)]
pub struct FitnessEvaluator {
    target: Raster,
    metric: FitnessMetric,
    max_error: f64,
    ssim: SsimParams,
}

impl FitnessEvaluator {
    /// Create a new fitness evaluator.
    pub fn new(target: Raster, metric: FitnessMetric) -> Self {
        let max_error = max_error(&target);
        Self {
            target,
            metric,
            max_error,
            ssim: SsimParams::default(),
        }
    }

    /// Override structural similarity parameters.
    pub fn with_ssim_params(mut self, params: SsimParams) -> Self {
        self.ssim = params;
        self
    }

    /// Score a phenotype with the configured metric.
    pub fn evaluate(&self, phenotype: &Raster) -> Result<f64, FitnessError> {
        match self.metric {
            FitnessMetric::Mse => mse_fitness(phenotype, &self.target, self.max_error),
            FitnessMetric::StructuralSimilarity => {
                structural_similarity_with(phenotype, &self.target, &self.ssim)
            }
        }
    }

    #[inline]
    pub fn max_error(&self) -> f64 {
        self.max_error
    }

    #[inline]
    pub fn metric(&self) -> FitnessMetric {
        self.metric
    }

    #[inline]
    pub fn target(&self) -> &Raster {
        &self.target
    }
}
