//! Display mapping and export of rendered rasters.

use std::path::{Path, PathBuf};

use image::{GrayImage, Luma};

use crate::compute::Raster;

/// Errors raised while writing an image.
#[derive(Debug, thiserror::Error)]
pub enum ImageSaveError {
    #[error("Failed to write image {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// Map a raster to 8-bit gray. Values outside [0, 1] saturate.
pub fn to_gray_image(raster: &Raster) -> GrayImage {
    GrayImage::from_fn(raster.width() as u32, raster.height() as u32, |x, y| {
        let v = raster.get(y as usize, x as usize).clamp(0.0, 1.0);
        Luma([(v * 255.0).round() as u8])
    })
}

/// Write the display mapping of a raster. Format follows the extension.
pub fn save_image<P: AsRef<Path>>(raster: &Raster, path: P) -> Result<(), ImageSaveError> {
    let path = path.as_ref();
    to_gray_image(raster)
        .save(path)
        .map_err(|source| ImageSaveError::Write {
            path: path.to_path_buf(),
            source,
        })
}

/// Present a raster for inspection by writing it to `path`.
///
/// Logs how many pixels fall outside [0, 1] and were saturated.
pub fn show_image<P: AsRef<Path>>(raster: &Raster, path: P) -> Result<(), ImageSaveError> {
    let path = path.as_ref();
    save_image(raster, path)?;

    let saturated = raster
        .as_slice()
        .iter()
        .filter(|v| !(0.0..=1.0).contains(*v))
        .count();
    let (lo, hi) = raster.value_range();
    log::info!(
        "Wrote {}x{} image to {:?} (range [{:.3}, {:.3}], {} saturated pixels)",
        raster.height(),
        raster.width(),
        path,
        lo,
        hi,
        saturated
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::CanvasSize;

    #[test]
    fn test_display_mapping_saturates() {
        let raster = Raster::from_vec(CanvasSize::new(1, 4), vec![-0.5, 0.0, 0.5, 3.0]).unwrap();
        let img = to_gray_image(&raster);

        assert_eq!(img.dimensions(), (4, 1));
        assert_eq!(img.get_pixel(0, 0).0, [0]);
        assert_eq!(img.get_pixel(1, 0).0, [0]);
        assert_eq!(img.get_pixel(2, 0).0, [128]);
        assert_eq!(img.get_pixel(3, 0).0, [255]);
    }

    #[test]
    fn test_row_column_orientation() {
        let raster = Raster::from_fn(CanvasSize::new(2, 3), |y, x| {
            if y == 1 && x == 2 { 1.0 } else { 0.0 }
        });
        let img = to_gray_image(&raster);

        assert_eq!(img.dimensions(), (3, 2));
        assert_eq!(img.get_pixel(2, 1).0, [255]);
        assert_eq!(img.get_pixel(1, 1).0, [0]);
        assert_eq!(img.get_pixel(2, 0).0, [0]);
    }
}
