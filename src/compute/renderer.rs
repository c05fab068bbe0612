//! Phenotype rendering: composite a genome's circles onto a canvas.
//!
//! Each gene paints a disk with `p = p * transparency + intensity`. The blend
//! is deliberately left unclamped, so overlapping bright circles can push
//! pixels above 1. Fitness values depend on this accumulation.

use crate::schema::{CanvasSize, Gene, Genome};

use super::Raster;

/// Whether pixel `(py, px)` lies inside the disk centered at `(cy, cx)`.
///
/// Pixels are sampled at their integer coordinates. Boundary pixels at exactly
/// distance `r` are excluded, so a zero radius covers nothing.
#[inline]
pub fn disk_contains(py: f64, px: f64, cy: f64, cx: f64, r: f64) -> bool {
    let dy = py - cy;
    let dx = px - cx;
    dy * dy + dx * dx < r * r
}

/// Visit every canvas pixel inside a disk, row by row.
///
/// Only the disk's bounding box clipped to the canvas is scanned.
pub fn for_each_disk_pixel(
    size: CanvasSize,
    cy: f64,
    cx: f64,
    r: f64,
    mut f: impl FnMut(usize, usize),
) {
    if !(r > 0.0) || size.area() == 0 {
        return;
    }

    let Some((y0, y1)) = clipped_span(cy, r, size.height) else {
        return;
    };
    let Some((x0, x1)) = clipped_span(cx, r, size.width) else {
        return;
    };

    for y in y0..=y1 {
        for x in x0..=x1 {
            if disk_contains(y as f64, x as f64, cy, cx, r) {
                f(y, x);
            }
        }
    }
}

/// Integer range `ceil(c - r)..=floor(c + r)` clipped to `0..len`.
fn clipped_span(c: f64, r: f64, len: usize) -> Option<(usize, usize)> {
    let lo = (c - r).ceil().max(0.0);
    let hi = (c + r).floor().min((len - 1) as f64);
    if hi < lo {
        return None;
    }
    Some((lo as usize, hi as usize))
}

/// Disk geometry of a gene on a given canvas: `(cy, cx, r)` in pixels.
#[inline]
pub fn gene_geometry(gene: &Gene, size: CanvasSize) -> (f64, f64, f64) {
    (
        gene.center_y * size.height as f64,
        gene.center_x * size.width as f64,
        gene.radius * size.radius_scale(),
    )
}

/// Paint one gene onto the canvas.
pub fn composite_gene(canvas: &mut Raster, gene: &Gene) {
    let size = canvas.size();
    let (cy, cx, r) = gene_geometry(gene, size);
    let width = size.width;
    let data = canvas.as_mut_slice();

    for_each_disk_pixel(size, cy, cx, r, |y, x| {
        let p = &mut data[y * width + x];
        *p = *p * gene.transparency + gene.intensity;
    });
}

/// Render a genome into an existing canvas, overwriting its contents.
pub fn render_into(genome: &Genome, canvas: &mut Raster) {
    canvas.clear();
    for gene in genome.genes() {
        composite_gene(canvas, gene);
    }
}

/// Render a genome into a fresh canvas.
pub fn render(genome: &Genome, size: CanvasSize) -> Raster {
    let mut canvas = Raster::zeros(size);
    render_into(genome, &mut canvas);
    canvas
}
