//! Normalized image and mask tensors.
//!
//! Pixel data leaves the loader as `f32` arrays in `[0, 1]`. Images carry a
//! leading batch axis so the host can concatenate them along axis 0.

use image::{Rgb32FImage, Rgba32FImage};
use ndarray::{Array2, Array4, ShapeError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// RGB image tensor with shape `(1, height, width, 3)`.
///
/// The array is shared through an `Arc` so values can fan out to several
/// downstream nodes without copying pixel data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageTensor {
    data: Arc<Array4<f32>>,
}

/// Mask tensor with shape `(height, width)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskTensor {
    data: Arc<Array2<f32>>,
}

impl ImageTensor {
    /// Build a tensor from an RGB float buffer (row-major, channels last).
    pub fn from_rgb(buffer: Rgb32FImage) -> Result<Self, ShapeError> {
        let (width, height) = buffer.dimensions();
        let shape = (1, height as usize, width as usize, 3);
        let array = Array4::from_shape_vec(shape, buffer.into_raw())?;
        Ok(Self::from_array(array))
    }

    /// Wrap an existing array.
    pub fn from_array(array: Array4<f32>) -> Self {
        Self {
            data: Arc::new(array),
        }
    }

    /// An all-black tensor of the given size.
    pub fn zeros(height: usize, width: usize) -> Self {
        Self::from_array(Array4::zeros((1, height, width, 3)))
    }

    /// Tensor shape as `[batch, height, width, channels]`.
    pub fn shape(&self) -> [usize; 4] {
        let (b, h, w, c) = self.data.dim();
        [b, h, w, c]
    }

    /// Image height in pixels.
    pub fn height(&self) -> usize {
        self.data.dim().1
    }

    /// Image width in pixels.
    pub fn width(&self) -> usize {
        self.data.dim().2
    }

    /// Borrow the underlying array.
    pub fn data(&self) -> &Array4<f32> {
        &self.data
    }

    /// Take the underlying array, cloning only if it is shared.
    pub fn into_array(self) -> Array4<f32> {
        Arc::try_unwrap(self.data).unwrap_or_else(|arc| (*arc).clone())
    }
}

impl MaskTensor {
    /// Build an inverted-alpha mask: opaque pixels become 0, transparent 1.
    pub fn from_alpha(buffer: &Rgba32FImage) -> Result<Self, ShapeError> {
        let (width, height) = buffer.dimensions();
        let inverted: Vec<f32> = buffer.pixels().map(|p| 1.0 - p.0[3]).collect();
        let array = Array2::from_shape_vec((height as usize, width as usize), inverted)?;
        Ok(Self::from_array(array))
    }

    /// Wrap an existing array.
    pub fn from_array(array: Array2<f32>) -> Self {
        Self {
            data: Arc::new(array),
        }
    }

    /// An all-zero mask, used for images without alpha.
    pub fn zeros(height: usize, width: usize) -> Self {
        Self::from_array(Array2::zeros((height, width)))
    }

    /// Tensor shape as `[height, width]`.
    pub fn shape(&self) -> [usize; 2] {
        let (h, w) = self.data.dim();
        [h, w]
    }

    /// Mask height in pixels.
    pub fn height(&self) -> usize {
        self.data.dim().0
    }

    /// Mask width in pixels.
    pub fn width(&self) -> usize {
        self.data.dim().1
    }

    /// Borrow the underlying array.
    pub fn data(&self) -> &Array2<f32> {
        &self.data
    }

    /// Take the underlying array, cloning only if it is shared.
    pub fn into_array(self) -> Array2<f32> {
        Arc::try_unwrap(self.data).unwrap_or_else(|arc| (*arc).clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba};

    #[test]
    fn test_image_tensor_layout() {
        let mut buffer = Rgb32FImage::new(3, 2);
        buffer.put_pixel(2, 1, Rgb([0.25, 0.5, 1.0]));

        let tensor = ImageTensor::from_rgb(buffer).unwrap();
        assert_eq!(tensor.shape(), [1, 2, 3, 3]);
        assert_eq!(tensor.height(), 2);
        assert_eq!(tensor.width(), 3);
        assert_eq!(tensor.data()[[0, 1, 2, 0]], 0.25);
        assert_eq!(tensor.data()[[0, 1, 2, 2]], 1.0);
        assert_eq!(tensor.data()[[0, 0, 0, 1]], 0.0);
    }

    #[test]
    fn test_mask_inverts_alpha() {
        let mut buffer = Rgba32FImage::new(2, 1);
        buffer.put_pixel(0, 0, Rgba([0.0, 0.0, 0.0, 1.0]));
        buffer.put_pixel(1, 0, Rgba([0.0, 0.0, 0.0, 0.25]));

        let mask = MaskTensor::from_alpha(&buffer).unwrap();
        assert_eq!(mask.shape(), [1, 2]);
        assert_eq!(mask.data()[[0, 0]], 0.0);
        assert_eq!(mask.data()[[0, 1]], 0.75);
    }

    #[test]
    fn test_into_array_unshared() {
        let mask = MaskTensor::zeros(4, 5);
        let array = mask.into_array();
        assert_eq!(array.dim(), (4, 5));
        assert!(array.iter().all(|&v| v == 0.0));
    }
}
