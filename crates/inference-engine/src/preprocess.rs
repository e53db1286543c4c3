//! Image preprocessing
//!
//! Deterministic, pure transformation of an uploaded image into the model's
//! NHWC input batch.

use crate::{InferenceError, INPUT_SIZE};
use image::DynamicImage;
use tract_onnx::prelude::*;

/// Decode uploaded bytes into an image.
///
/// Any format and color mode the `image` crate understands is accepted; the
/// color mode is unified to RGB later in the pipeline.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage, InferenceError> {
    image::load_from_memory(bytes).map_err(|e| InferenceError::Decode(e.to_string()))
}

/// Resize to the model input size and scale pixels into [0, 1].
///
/// Output shape is `(1, 224, 224, 3)`: a one-image NHWC batch.
pub fn to_input_tensor(image: &DynamicImage) -> tract_ndarray::Array4<f32> {
    let size = INPUT_SIZE as u32;
    let resized = image
        .resize_exact(size, size, image::imageops::FilterType::Triangle)
        .to_rgb8();

    let mut input = tract_ndarray::Array4::<f32>::zeros((1, INPUT_SIZE, INPUT_SIZE, 3));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for c in 0..3 {
            input[[0, y as usize, x as usize, c]] = pixel[c] as f32 / 255.0;
        }
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;
    use std::io::Cursor;

    fn sample_jpeg(width: u32, height: u32) -> Vec<u8> {
        let img = RgbImage::from_fn(width, height, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(img)
            .write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Jpeg)
            .unwrap();
        bytes
    }

    #[test]
    fn test_tensor_shape_and_range() {
        let bytes = sample_jpeg(500, 500);
        let img = decode_image(&bytes).unwrap();
        let tensor = to_input_tensor(&img);

        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
        assert!(tensor.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_non_square_input_resizes_exactly() {
        let bytes = sample_jpeg(640, 480);
        let img = decode_image(&bytes).unwrap();
        let tensor = to_input_tensor(&img);
        assert_eq!(tensor.shape(), &[1, 224, 224, 3]);
    }

    #[test]
    fn test_preprocessing_is_deterministic() {
        let bytes = sample_jpeg(300, 300);
        let img = decode_image(&bytes).unwrap();
        assert_eq!(to_input_tensor(&img), to_input_tensor(&img));
    }

    #[test]
    fn test_undecodable_bytes() {
        let result = decode_image(b"definitely not an image");
        assert!(matches!(result, Err(InferenceError::Decode(_))));
    }
}
