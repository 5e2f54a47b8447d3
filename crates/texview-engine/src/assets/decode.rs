use std::fmt;

use anyhow::{Context, Result};

use super::Bundle;

/// Decoded image: tightly packed RGBA8, rows top to bottom, straight alpha.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageData {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl ImageData {
    /// Wraps raw RGBA8 pixels, checking the buffer matches the dimensions.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        anyhow::ensure!(width > 0 && height > 0, "image has zero size ({width}x{height})");

        let expected = width as usize * height as usize * 4;
        anyhow::ensure!(
            pixels.len() == expected,
            "RGBA buffer is {} bytes, expected {expected} for {width}x{height}",
            pixels.len()
        );

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Width over height.
    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Scales each color channel by its alpha, rounding to nearest.
    pub fn premultiply_alpha(&mut self) {
        for px in self.pixels.chunks_exact_mut(4) {
            let a = u16::from(px[3]);
            for c in &mut px[..3] {
                *c = ((u16::from(*c) * a + 127) / 255) as u8;
            }
        }
    }
}

impl fmt::Debug for ImageData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageData")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

/// Decodes an encoded image (format sniffed from the bytes) into RGBA8.
pub fn decode_image(bytes: &[u8]) -> Result<ImageData> {
    let decoded = image::load_from_memory(bytes).context("failed to decode image")?;
    let rgba = decoded.to_rgba8();
    let (width, height) = rgba.dimensions();
    ImageData::from_rgba(width, height, rgba.into_raw())
}

/// Resolves `name` in `bundle` and decodes it.
pub fn load_image(name: &str, bundle: &Bundle) -> Result<ImageData> {
    let bytes = bundle.read(name)?;
    let data = decode_image(&bytes).with_context(|| format!("image `{name}` is not decodable"))?;
    log::debug!("decoded `{name}`: {}x{}", data.width, data.height);
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn png(width: u32, height: u32, px: [u8; 4]) -> Vec<u8> {
        let img = image::RgbaImage::from_pixel(width, height, image::Rgba(px));
        let mut out = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut std::io::Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn decodes_png_to_rgba() {
        let data = decode_image(&png(3, 2, [10, 20, 30, 255])).unwrap();
        assert_eq!(data.size(), (3, 2));
        assert_eq!(data.pixels().len(), 3 * 2 * 4);
        assert_eq!(&data.pixels()[..4], &[10, 20, 30, 255]);
    }

    #[test]
    fn decoded_alpha_is_straight() {
        let data = decode_image(&png(1, 1, [255, 0, 0, 128])).unwrap();
        assert_eq!(data.pixels(), &[255, 0, 0, 128]);
    }

    #[test]
    fn premultiply_scales_color_by_alpha() {
        let mut data = decode_image(&png(1, 1, [255, 0, 0, 128])).unwrap();
        data.premultiply_alpha();
        assert_eq!(data.pixels(), &[128, 0, 0, 128]);
    }

    #[test]
    fn premultiply_keeps_opaque_and_clears_invisible() {
        let mut data = ImageData::from_rgba(2, 1, vec![10, 20, 30, 255, 200, 100, 50, 0]).unwrap();
        data.premultiply_alpha();
        assert_eq!(data.pixels(), &[10, 20, 30, 255, 0, 0, 0, 0]);
    }

    #[test]
    fn garbage_is_not_an_image() {
        assert!(decode_image(b"definitely not a png").is_err());
    }

    #[test]
    fn load_goes_through_bundle() {
        let bundle = Bundle::in_memory().with_entry("wide", png(8, 4, [0, 0, 0, 255]));
        let data = load_image("wide", &bundle).unwrap();
        assert_eq!(data.aspect(), 2.0);
    }

    #[test]
    fn load_of_unknown_name_fails() {
        let bundle = Bundle::in_memory().with_entry("wide", png(8, 4, [0, 0, 0, 255]));
        assert!(load_image("tall", &bundle).is_err());
    }

    #[test]
    fn from_rgba_checks_buffer_length() {
        assert!(ImageData::from_rgba(2, 2, vec![0; 15]).is_err());
        assert!(ImageData::from_rgba(2, 2, vec![0; 16]).is_ok());
    }

    #[test]
    fn from_rgba_rejects_zero_size() {
        assert!(ImageData::from_rgba(0, 4, vec![]).is_err());
    }
}
