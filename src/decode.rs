//! Frame decoder: 4:2:0 camera frames to RGB rasters.
//!
//! Conversion is a direct per-pixel BT.601 full-range (JFIF) transform. Plane row and
//! pixel strides are honored, so padded rows and semi-planar chroma decode correctly.

use crate::frame::{Plane, RasterImage, RawFrame, PLANES_420};
use crate::LensError;

/// Decode a raw 4:2:0 frame into an RGB raster of the same dimensions.
pub fn decode(raw: &RawFrame) -> Result<RasterImage, LensError> {
    let planes = raw.planes();
    if planes.len() != PLANES_420 {
        return Err(LensError::decode(format!(
            "expected {} planes (Y, U, V), got {}",
            PLANES_420,
            planes.len()
        )));
    }
    if raw.width == 0 || raw.height == 0 {
        return Err(LensError::decode(format!(
            "frame dimensions must be positive, got {}x{}",
            raw.width, raw.height
        )));
    }

    let w = raw.width as usize;
    let h = raw.height as usize;
    let (cw, ch) = raw.chroma_dims();
    let (y_plane, u_plane, v_plane) = (&planes[0], &planes[1], &planes[2]);

    check_plane("Y", y_plane, w, h)?;
    check_plane("U", u_plane, cw, ch)?;
    check_plane("V", v_plane, cw, ch)?;

    let rgb_len = w
        .checked_mul(h)
        .and_then(|v| v.checked_mul(3))
        .ok_or_else(|| LensError::decode("frame dimensions overflow"))?;
    let mut rgb = vec![0u8; rgb_len];
    for j in 0..h {
        for i in 0..w {
            let y = y_plane.sample(i, j) as f32;
            let u = u_plane.sample(i / 2, j / 2) as f32 - 128.0;
            let v = v_plane.sample(i / 2, j / 2) as f32 - 128.0;

            let offset = (j * w + i) * 3;
            rgb[offset..offset + 3].copy_from_slice(&yuv_to_rgb(y, u, v));
        }
    }

    log::debug!("decoded {}x{} 4:2:0 frame", raw.width, raw.height);
    RasterImage::from_rgb(raw.width, raw.height, rgb)
}

fn check_plane(name: &str, plane: &Plane, width: usize, height: usize) -> Result<(), LensError> {
    let min_row = width
        .saturating_sub(1)
        .saturating_mul(plane.pixel_stride())
        .saturating_add(1);
    if plane.pixel_stride() == 0 || plane.row_stride() < min_row {
        return Err(LensError::decode(format!(
            "{} plane strides (row {}, pixel {}) cannot hold {} samples per row",
            name,
            plane.row_stride(),
            plane.pixel_stride(),
            width
        )));
    }
    let required = plane
        .required_len(width, height)
        .ok_or_else(|| LensError::decode(format!("{} plane geometry overflows", name)))?;
    if plane.data().len() < required {
        return Err(LensError::decode(format!(
            "{} plane too short for {}x{}: need {} bytes, got {}",
            name,
            width,
            height,
            required,
            plane.data().len()
        )));
    }
    Ok(())
}

/// BT.601 full-range YCbCr to RGB. `u` and `v` are already centered on zero.
#[inline]
fn yuv_to_rgb(y: f32, u: f32, v: f32) -> [u8; 3] {
    let r = y + 1.402_f32 * v;
    let g = y - 0.344_136_f32 * u - 0.714_136_f32 * v;
    let b = y + 1.772_f32 * u;
    [clamp_to_u8(r), clamp_to_u8(g), clamp_to_u8(b)]
}

fn clamp_to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}
