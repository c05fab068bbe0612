//! Dense row-major intensity grid shared by targets and phenotypes.

use crate::schema::CanvasSize;

/// Single-channel image stored row-major as `f64`.
///
/// Targets hold values in [0, 1]. Phenotypes may leave that range because
/// circle compositing is not clamped.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    size: CanvasSize,
    data: Vec<f64>,
}

impl Raster {
    /// All-zero raster.
    pub fn zeros(size: CanvasSize) -> Self {
        Self {
            size,
            data: vec![0.0; size.area()],
        }
    }

    /// Raster filled with a constant.
    pub fn filled(size: CanvasSize, value: f64) -> Self {
        Self {
            size,
            data: vec![value; size.area()],
        }
    }

    /// Wrap row-major data.
    pub fn from_vec(size: CanvasSize, data: Vec<f64>) -> Result<Self, RasterError> {
        if data.len() != size.area() {
            return Err(RasterError::LengthMismatch {
                size,
                expected: size.area(),
                actual: data.len(),
            });
        }
        Ok(Self { size, data })
    }

    /// Build from a function of `(y, x)`.
    pub fn from_fn(size: CanvasSize, mut f: impl FnMut(usize, usize) -> f64) -> Self {
        let mut data = Vec::with_capacity(size.area());
        for y in 0..size.height {
            for x in 0..size.width {
                data.push(f(y, x));
            }
        }
        Self { size, data }
    }

    #[inline]
    pub fn size(&self) -> CanvasSize {
        self.size
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.size.height
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.size.width
    }

    #[inline]
    pub fn get(&self, y: usize, x: usize) -> f64 {
        self.data[y * self.size.width + x]
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// One row as a slice.
    #[inline]
    pub fn row(&self, y: usize) -> &[f64] {
        let start = y * self.size.width;
        &self.data[start..start + self.size.width]
    }

    /// Reset every pixel to zero.
    pub fn clear(&mut self) {
        self.data.fill(0.0);
    }

    /// Minimum and maximum pixel values.
    pub fn value_range(&self) -> (f64, f64) {
        self.data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

/// Raster construction errors.
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    #[error("Raster {size} needs {expected} values, got {actual}")]
    LengthMismatch {
        size: CanvasSize,
        expected: usize,
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zeros() {
        let r = Raster::zeros(CanvasSize::new(3, 4));
        assert_eq!(r.as_slice().len(), 12);
        assert!(r.as_slice().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_row_major_indexing() {
        let r = Raster::from_fn(CanvasSize::new(2, 3), |y, x| (y * 10 + x) as f64);
        assert_eq!(r.get(1, 2), 12.0);
        assert_eq!(r.row(1), &[10.0, 11.0, 12.0]);
        assert_eq!(r.as_slice()[4], 11.0);
    }

    #[test]
    fn test_from_vec_length_check() {
        let size = CanvasSize::new(2, 2);
        assert!(Raster::from_vec(size, vec![0.0; 4]).is_ok());
        assert!(matches!(
            Raster::from_vec(size, vec![0.0; 5]),
            Err(RasterError::LengthMismatch {
                expected: 4,
                actual: 5,
                ..
            })
        ));
    }

    #[test]
    fn test_clear_and_stats() {
        let mut r = Raster::from_fn(CanvasSize::new(2, 2), |y, x| (y + x) as f64);
        assert_eq!(r.value_range(), (0.0, 2.0));

        r.clear();
        assert_eq!(r.value_range(), (0.0, 0.0));
    }
}
