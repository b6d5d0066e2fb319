//! Frame containers.
//!
//! - `Plane`: one memory plane of a camera frame plus its stride metadata.
//! - `RawFrame`: a 4:2:0 camera frame as delivered by the capture layer (Y, U, V planes).
//! - `RasterImage`: interleaved 8-bit RGB pixels, the decoder's output and the classifier's input.
//!
//! `RawFrame` is read-only once built. The decoder borrows it; nothing in this crate mutates
//! plane bytes after construction.

use std::path::Path;

use image::{DynamicImage, ImageBuffer, RgbImage};

use crate::LensError;

/// Number of planes in a 4:2:0 frame (one luma, two chroma).
pub const PLANES_420: usize = 3;

// ----------------------------------------------------------------------------
// Plane
// ----------------------------------------------------------------------------

/// A single image plane.
///
/// `row_stride` is the byte distance between the starts of two consecutive rows.
/// `pixel_stride` is the byte distance between two horizontally adjacent samples
/// (1 for fully planar chroma, 2 for semi-planar chroma where U and V interleave).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Plane {
    data: Vec<u8>,
    row_stride: usize,
    pixel_stride: usize,
}

impl Plane {
    pub fn new(data: Vec<u8>, row_stride: usize, pixel_stride: usize) -> Self {
        Self {
            data,
            row_stride,
            pixel_stride,
        }
    }

    /// Tightly packed plane: no row padding, one byte per sample.
    pub fn packed(data: Vec<u8>, width: usize) -> Self {
        Self::new(data, width, 1)
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    pub fn pixel_stride(&self) -> usize {
        self.pixel_stride
    }

    /// Minimum buffer length needed to address `width` x `height` samples.
    ///
    /// The last row does not need trailing padding, which matches what camera
    /// HALs actually hand out.
    pub(crate) fn required_len(&self, width: usize, height: usize) -> Option<usize> {
        if width == 0 || height == 0 {
            return Some(0);
        }
        (height - 1)
            .checked_mul(self.row_stride)?
            .checked_add((width - 1).checked_mul(self.pixel_stride)?)?
            .checked_add(1)
    }

    /// Sample at (x, y). Callers validate bounds with `required_len` first.
    #[inline]
    pub(crate) fn sample(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.row_stride + x * self.pixel_stride]
    }
}

// ----------------------------------------------------------------------------
// RawFrame
// ----------------------------------------------------------------------------

/// Raw 4:2:0 camera frame: planes are ordered Y, U (Cb), V (Cr).
#[derive(Clone, Debug)]
pub struct RawFrame {
    pub width: u32,
    pub height: u32,
    planes: Vec<Plane>,
}

impl RawFrame {
    /// Wrap planes handed over by a capture API. Geometry is validated by the decoder.
    pub fn new(width: u32, height: u32, planes: Vec<Plane>) -> Self {
        Self {
            width,
            height,
            planes,
        }
    }

    /// Build from a packed NV21 buffer: Y plane, then interleaved V/U pairs.
    pub fn from_nv21(bytes: &[u8], width: u32, height: u32) -> Result<Self, LensError> {
        Self::from_semi_planar(bytes, width, height, ChromaOrder::Vu)
    }

    /// Build from a packed NV12 buffer: Y plane, then interleaved U/V pairs.
    pub fn from_nv12(bytes: &[u8], width: u32, height: u32) -> Result<Self, LensError> {
        Self::from_semi_planar(bytes, width, height, ChromaOrder::Uv)
    }

    /// Build from a packed I420 buffer: Y plane, then the full U plane, then the full V plane.
    pub fn from_i420(bytes: &[u8], width: u32, height: u32) -> Result<Self, LensError> {
        let layout = PackedLayout::new(bytes.len(), width, height)?;
        let (y, chroma) = bytes.split_at(layout.luma_len);
        let (u, v) = chroma.split_at(layout.chroma_w * layout.chroma_h);
        Ok(Self::new(
            width,
            height,
            vec![
                Plane::packed(y.to_vec(), layout.width),
                Plane::packed(u.to_vec(), layout.chroma_w),
                Plane::packed(v.to_vec(), layout.chroma_w),
            ],
        ))
    }

    fn from_semi_planar(
        bytes: &[u8],
        width: u32,
        height: u32,
        order: ChromaOrder,
    ) -> Result<Self, LensError> {
        let layout = PackedLayout::new(bytes.len(), width, height)?;
        let (y, chroma) = bytes.split_at(layout.luma_len);
        let row_stride = layout.chroma_w * 2;
        // Both chroma planes view the same interleaved block, offset by one byte.
        let first = Plane::new(chroma.to_vec(), row_stride, 2);
        let second = Plane::new(chroma[1..].to_vec(), row_stride, 2);
        let (u, v) = match order {
            ChromaOrder::Uv => (first, second),
            ChromaOrder::Vu => (second, first),
        };
        Ok(Self::new(
            width,
            height,
            vec![Plane::packed(y.to_vec(), layout.width), u, v],
        ))
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    /// Chroma plane dimensions for 4:2:0 subsampling (odd sizes round up).
    pub fn chroma_dims(&self) -> (usize, usize) {
        (
            (self.width as usize).div_ceil(2),
            (self.height as usize).div_ceil(2),
        )
    }
}

#[derive(Clone, Copy)]
enum ChromaOrder {
    Uv,
    Vu,
}

/// Sizes of a packed 4:2:0 buffer; `w*h + w*h/2` bytes for even dimensions.
struct PackedLayout {
    width: usize,
    luma_len: usize,
    chroma_w: usize,
    chroma_h: usize,
}

impl PackedLayout {
    fn new(len: usize, width: u32, height: u32) -> Result<Self, LensError> {
        if width == 0 || height == 0 {
            return Err(LensError::decode(format!(
                "frame dimensions must be positive, got {}x{}",
                width, height
            )));
        }
        let w = width as usize;
        let h = height as usize;
        let chroma_w = w.div_ceil(2);
        let chroma_h = h.div_ceil(2);
        let expected = w
            .checked_mul(h)
            .and_then(|luma| {
                chroma_w
                    .checked_mul(chroma_h)
                    .and_then(|c| c.checked_mul(2))
                    .and_then(|c| c.checked_add(luma))
            })
            .ok_or_else(|| LensError::decode("frame dimensions overflow"))?;
        if len != expected {
            return Err(LensError::decode(format!(
                "packed 4:2:0 length mismatch for {}x{}: expected {}, got {}",
                width, height, expected, len
            )));
        }
        Ok(Self {
            width: w,
            luma_len: w * h,
            chroma_w,
            chroma_h,
        })
    }
}

// ----------------------------------------------------------------------------
// RasterImage
// ----------------------------------------------------------------------------

/// Interleaved RGB raster, 8 bits per channel.
#[derive(Clone, Debug, PartialEq)]
pub struct RasterImage {
    pixels: RgbImage,
}

impl RasterImage {
    /// Wrap tightly packed RGB bytes.
    pub fn from_rgb(width: u32, height: u32, data: Vec<u8>) -> Result<Self, LensError> {
        let len = data.len();
        ImageBuffer::from_raw(width, height, data)
            .map(|pixels| Self { pixels })
            .ok_or_else(|| {
                LensError::decode(format!(
                    "RGB buffer of {} bytes does not fit {}x{}",
                    len, width, height
                ))
            })
    }

    /// Build from 0xAARRGGBB words (alpha ignored), the packed-int layout
    /// mobile bitmap APIs hand out.
    pub fn from_argb_words(width: u32, height: u32, words: &[u32]) -> Result<Self, LensError> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| LensError::decode("frame dimensions overflow"))?;
        if words.len() != expected {
            return Err(LensError::decode(format!(
                "ARGB pixel count mismatch: expected {}, got {}",
                expected,
                words.len()
            )));
        }
        let data = words
            .iter()
            .flat_map(|&px| [(px >> 16) as u8, (px >> 8) as u8, px as u8])
            .collect();
        Self::from_rgb(width, height, data)
    }

    /// Decode an encoded photo (JPEG or PNG) from disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, LensError> {
        let path = path.as_ref();
        let decoded = image::open(path).map_err(|e| {
            LensError::decode(format!("failed to decode photo {}: {}", path.display(), e))
        })?;
        Ok(Self::from(decoded))
    }

    /// Decode an encoded photo already in memory.
    pub fn decode_encoded(bytes: &[u8]) -> Result<Self, LensError> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| LensError::decode(format!("failed to decode photo bytes: {}", e)))?;
        Ok(Self::from(decoded))
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// RGB value at `(x, y)`, or `None` outside the image.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        self.pixels.get_pixel_checked(x, y).map(|p| p.0)
    }

    pub fn as_rgb_image(&self) -> &RgbImage {
        &self.pixels
    }

    pub fn into_rgb_image(self) -> RgbImage {
        self.pixels
    }
}

impl From<RgbImage> for RasterImage {
    fn from(pixels: RgbImage) -> Self {
        Self { pixels }
    }
}

impl From<DynamicImage> for RasterImage {
    fn from(image: DynamicImage) -> Self {
        Self {
            pixels: image.into_rgb8(),
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nv21_split_orders_chroma_vu() {
        // 2x2 frame: 4 luma bytes, then one V/U pair.
        let bytes = [10u8, 20, 30, 40, 200, 50];
        let frame = RawFrame::from_nv21(&bytes, 2, 2).unwrap();
        let planes = frame.planes();
        assert_eq!(planes.len(), PLANES_420);
        assert_eq!(planes[0].sample(1, 1), 40);
        assert_eq!(planes[1].sample(0, 0), 50, "U");
        assert_eq!(planes[2].sample(0, 0), 200, "V");
    }

    #[test]
    fn nv12_split_orders_chroma_uv() {
        let bytes = [0u8, 0, 0, 0, 50, 200];
        let frame = RawFrame::from_nv12(&bytes, 2, 2).unwrap();
        assert_eq!(frame.planes()[1].sample(0, 0), 50);
        assert_eq!(frame.planes()[2].sample(0, 0), 200);
    }

    #[test]
    fn packed_length_must_match_420_geometry() {
        let err = RawFrame::from_i420(&[0u8; 5], 2, 2).unwrap_err();
        assert!(matches!(err, LensError::Decode { .. }));

        // Odd sizes round chroma up: 3x3 -> 9 luma + 2 * (2x2) chroma.
        assert!(RawFrame::from_i420(&[0u8; 17], 3, 3).is_ok());
    }

    #[test]
    fn zero_dimensions_rejected() {
        assert!(RawFrame::from_nv21(&[], 0, 4).is_err());
    }

    #[test]
    fn plane_required_len_skips_last_row_padding() {
        let plane = Plane::new(vec![0; 10], 8, 2);
        assert_eq!(plane.required_len(2, 2), Some(8 + 2 + 1));
        assert_eq!(plane.required_len(0, 2), Some(0));
    }

    #[test]
    fn argb_words_unpack_to_rgb() {
        let raster = RasterImage::from_argb_words(2, 1, &[0xFF112233, 0x00AABBCC]).unwrap();
        assert_eq!(raster.pixel(0, 0), Some([0x11, 0x22, 0x33]));
        assert_eq!(raster.pixel(1, 0), Some([0xAA, 0xBB, 0xCC]));
    }

    #[test]
    fn pixel_outside_image_is_none() {
        let raster = RasterImage::from_rgb(2, 1, vec![7; 6]).unwrap();
        assert_eq!(raster.pixel(1, 0), Some([7, 7, 7]));
        assert_eq!(raster.pixel(2, 0), None);
        assert_eq!(raster.pixel(0, 1), None);
    }

    #[test]
    fn rgb_buffer_length_checked() {
        assert!(RasterImage::from_rgb(2, 2, vec![0; 11]).is_err());
        assert!(RasterImage::from_rgb(2, 2, vec![0; 12]).is_ok());
    }
}
