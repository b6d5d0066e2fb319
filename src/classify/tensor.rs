//! Model input construction: stretch-resize then normalize.

use image::imageops::{self, FilterType};
use image::RgbImage;
use serde::Deserialize;

use crate::frame::RasterImage;
use crate::LensError;

/// Side length of the square input the bundled food model was trained on.
pub const MODEL_INPUT_SIZE: u32 = 224;

/// Interleaved channels per pixel (R, G, B).
pub const CHANNELS: usize = 3;

/// Memory order an exported model expects for its image input.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputLayout {
    /// `[1, H, W, 3]`, the layout mobile (TFLite-converted) models use.
    #[default]
    Nhwc,
    /// `[1, 3, H, W]`.
    Nchw,
}

impl std::str::FromStr for InputLayout {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "nhwc" => Ok(InputLayout::Nhwc),
            "nchw" => Ok(InputLayout::Nchw),
            other => Err(anyhow::anyhow!(
                "unknown input layout '{}'; expected nhwc or nchw",
                other
            )),
        }
    }
}

/// Normalized model input: `height x width x 3` values in [0, 1], row-major, RGB interleaved.
///
/// Fields are private so the length always equals `width * height * CHANNELS`.
#[derive(Clone, Debug, PartialEq)]
pub struct InputTensor {
    data: Vec<f32>,
    width: u32,
    height: u32,
}

impl InputTensor {
    /// Resize `image` to exactly `width x height` and normalize it.
    ///
    /// The resize is a plain stretch with a bilinear filter. Aspect ratio is not
    /// preserved; the model expects the whole frame squeezed into its input square.
    pub fn from_raster(image: &RasterImage, width: u32, height: u32) -> Result<Self, LensError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(LensError::decode("cannot build model input from an empty image"));
        }
        if width == 0 || height == 0 {
            return Err(LensError::decode(format!(
                "model input size must be positive, got {}x{}",
                width, height
            )));
        }

        let source = image.as_rgb_image();
        let data = if source.dimensions() == (width, height) {
            normalize(source)
        } else {
            normalize(&imageops::resize(source, width, height, FilterType::Triangle))
        };

        Ok(Self {
            data,
            width,
            height,
        })
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// NHWC shape with a batch of one.
    pub fn shape(&self) -> [usize; 4] {
        [1, self.height as usize, self.width as usize, CHANNELS]
    }

    /// Channel-first (NCHW) copy for models exported with planar input.
    pub fn to_planar(&self) -> Vec<f32> {
        let plane = self.width as usize * self.height as usize;
        let mut planar = vec![0.0f32; self.data.len()];
        for (idx, value) in self.data.iter().enumerate() {
            let (pixel, channel) = (idx / CHANNELS, idx % CHANNELS);
            planar[channel * plane + pixel] = *value;
        }
        planar
    }

    /// Platform-native byte encoding, for handing the tensor to a native runtime buffer.
    pub fn to_ne_bytes(&self) -> Vec<u8> {
        self.data.iter().flat_map(|v| v.to_ne_bytes()).collect()
    }
}

fn normalize(image: &RgbImage) -> Vec<f32> {
    image
        .pixels()
        .flat_map(|px| px.0.map(|channel| channel as f32 / 255.0))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgb: [u8; 3]) -> RasterImage {
        RgbImage::from_pixel(width, height, image::Rgb(rgb)).into()
    }

    #[test]
    fn tensor_has_fixed_length_and_unit_range() {
        let image = RgbImage::from_fn(640, 480, |x, y| {
            image::Rgb([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8])
        });
        let tensor =
            InputTensor::from_raster(&image.into(), MODEL_INPUT_SIZE, MODEL_INPUT_SIZE).unwrap();

        assert_eq!(tensor.len(), 224 * 224 * 3);
        assert_eq!(tensor.shape(), [1, 224, 224, 3]);
        assert!(tensor.as_slice().iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn channels_are_interleaved_rgb() {
        let tensor = InputTensor::from_raster(&solid(4, 4, [255, 0, 51]), 2, 2).unwrap();
        assert_eq!(&tensor.as_slice()[..3], &[1.0, 0.0, 0.2]);
        assert_eq!(&tensor.as_slice()[9..], &[1.0, 0.0, 0.2]);
    }

    #[test]
    fn stretch_ignores_aspect_ratio() {
        // A wide image with a red left half and blue right half: after a stretch to a square,
        // the left column stays red and the right column stays blue on every row.
        let image = RgbImage::from_fn(400, 100, |x, _| {
            if x < 200 {
                image::Rgb([255, 0, 0])
            } else {
                image::Rgb([0, 0, 255])
            }
        });
        let tensor = InputTensor::from_raster(&image.into(), 8, 8).unwrap();
        let data = tensor.as_slice();
        for row in 0..8 {
            let left = row * 8 * 3;
            let right = left + 7 * 3;
            assert_eq!(&data[left..left + 3], &[1.0, 0.0, 0.0]);
            assert_eq!(&data[right..right + 3], &[0.0, 0.0, 1.0]);
        }
    }

    #[test]
    fn planar_view_groups_channels() {
        let tensor = InputTensor::from_raster(&solid(2, 1, [255, 0, 0]), 2, 1).unwrap();
        assert_eq!(tensor.to_planar(), vec![1.0, 1.0, 0.0, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn native_bytes_are_four_per_value() {
        let tensor = InputTensor::from_raster(&solid(1, 1, [255, 255, 255]), 1, 1).unwrap();
        let bytes = tensor.to_ne_bytes();
        assert_eq!(bytes.len(), 12);
        assert_eq!(&bytes[..4], &1.0f32.to_ne_bytes());
    }

    #[test]
    fn empty_image_rejected() {
        let empty = RasterImage::from_rgb(0, 0, Vec::new()).unwrap();
        assert!(InputTensor::from_raster(&empty, 224, 224).is_err());
    }
}
