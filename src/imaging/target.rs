//! Target image loading: decode, grayscale, normalize, area-resize.

use std::path::{Path, PathBuf};

use crate::compute::Raster;
use crate::schema::CanvasSize;

/// Errors raised while loading a target image.
#[derive(Debug, thiserror::Error)]
pub enum ImageLoadError {
    #[error("Failed to decode image {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Image {path:?} has no pixels")]
    Empty { path: PathBuf },
    #[error("Requested size {0} has no pixels")]
    InvalidSize(CanvasSize),
}

/// Load an image file as a normalized grayscale raster of `size`.
///
/// Color is reduced with BT.601 luma weights to 8-bit gray, scaled to [0, 1]
/// and resampled by area averaging.
pub fn load_target_image<P: AsRef<Path>>(
    path: P,
    size: CanvasSize,
) -> Result<Raster, ImageLoadError> {
    let path = path.as_ref();
    if size.area() == 0 {
        return Err(ImageLoadError::InvalidSize(size));
    }

    let img = image::open(path).map_err(|source| ImageLoadError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    let rgb = img.to_rgb8();
    let (w, h) = rgb.dimensions();
    if w == 0 || h == 0 {
        return Err(ImageLoadError::Empty {
            path: path.to_path_buf(),
        });
    }

    let source_size = CanvasSize::new(h as usize, w as usize);
    let gray = Raster::from_fn(source_size, |y, x| {
        let [r, g, b] = rgb.get_pixel(x as u32, y as u32).0;
        luma(r, g, b) as f64 / 255.0
    });

    log::debug!("Loaded {:?} ({}), resizing to {}", path, source_size, size);
    Ok(resize_area(&gray, size))
}

/// BT.601 luma rounded to 8 bits.
#[inline]
fn luma(r: u8, g: u8, b: u8) -> u8 {
    (0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64)
        .round()
        .clamp(0.0, 255.0) as u8
}

/// Per output index: source indices and their overlap weights (summing to 1).
fn area_weights(in_len: usize, out_len: usize) -> Vec<Vec<(usize, f64)>> {
    let scale = in_len as f64 / out_len as f64;
    (0..out_len)
        .map(|o| {
            let start = o as f64 * scale;
            let end = start + scale;
            let first = start.floor() as usize;
            let last = (end.ceil() as usize).min(in_len);
            (first..last)
                .filter_map(|i| {
                    let overlap = end.min(i as f64 + 1.0) - start.max(i as f64);
                    (overlap > 0.0).then_some((i, overlap / scale))
                })
                .collect()
        })
        .collect()
}

/// Resample by averaging the source area each output pixel covers.
pub fn resize_area(src: &Raster, size: CanvasSize) -> Raster {
    if src.size() == size {
        return src.clone();
    }

    let cols = area_weights(src.width(), size.width);
    let rows = area_weights(src.height(), size.height);

    // Horizontal pass: src.height x size.width
    let mut horizontal = vec![0.0; src.height() * size.width];
    for y in 0..src.height() {
        let line = src.row(y);
        for (x, weights) in cols.iter().enumerate() {
            horizontal[y * size.width + x] = weights.iter().map(|&(i, w)| line[i] * w).sum();
        }
    }

    Raster::from_fn(size, |y, x| {
        rows[y]
            .iter()
            .map(|&(i, w)| horizontal[i * size.width + x] * w)
            .sum()
    })
}
