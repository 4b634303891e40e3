use image::codecs::hdr::HdrDecoder;
use image::ImageError;
use serde::{Deserialize, Serialize};
use smart_default::SmartDefault;
use std::io::Cursor;

pub type Asset = String;

/// Environment map source and the layout of the cube map baked from it.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize, SmartDefault)]
#[serde(default)]
pub struct Environment {
    /// Name of the HDR asset holding the equirectangular image.
    #[default(_code = "String::from(\"cedar_bridge_1k1.hdr\")")]
    pub map: Asset,

    /// Face resolution of the first cube map level.
    #[default(512)]
    pub base_resolution: u32,

    #[default(9)]
    pub mip_levels: u32,

    /// Number of lobe samples taken per baked texel.
    #[default(2048)]
    pub sample_count: u32,
}

impl Environment {
    /// Checks the bake layout can produce at least one well-defined level.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.base_resolution == 0 || self.mip_levels == 0 {
            return Err("cube map needs a nonzero resolution and level count");
        }

        if self.sample_count == 0 {
            return Err("cube map bake needs at least one sample per texel");
        }

        Ok(())
    }
}

/// Decoded equirectangular image, tightly packed RGB floats.
///
/// Row 0 is the bottom row of the image so the data can be uploaded as is.
#[derive(Clone, Debug, PartialEq)]
pub struct EnvironmentImage {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<f32>,
}

impl EnvironmentImage {
    /// Decodes a Radiance HDR image without tone mapping it.
    pub fn from_hdr_bytes(bytes: &[u8]) -> Result<Self, ImageError> {
        let decoder = HdrDecoder::new(Cursor::new(bytes))?;

        let metadata = decoder.metadata();
        let (width, height) = (metadata.width as usize, metadata.height as usize);

        let rows = decoder.read_image_hdr()?;
        let mut pixels = Vec::with_capacity(width * height * 3);

        // the file stores the top row first
        for row in rows.chunks_exact(width.max(1)).rev() {
            pixels.extend(row.iter().flat_map(|pixel| pixel.0.iter().copied()));
        }

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Single black pixel used when no usable environment is available.
    pub fn placeholder() -> Self {
        Self {
            width: 1,
            height: 1,
            pixels: vec![0.0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::hdr::HdrEncoder;
    use image::Rgb;

    fn encode(width: usize, height: usize, pixels: &[Rgb<f32>]) -> Vec<u8> {
        let mut bytes = vec![];

        HdrEncoder::new(&mut bytes)
            .encode(pixels, width, height)
            .unwrap();

        bytes
    }

    fn assert_close(actual: &[f32], expected: &[f32]) {
        assert_eq!(actual.len(), expected.len());

        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() <= 0.02 * e.abs().max(1.0), "{} != {}", a, e);
        }
    }

    #[test]
    fn decodes_hdr_and_flips_rows() {
        let top = Rgb([4.0, 2.0, 1.0]);
        let bottom = Rgb([0.5, 0.25, 0.125]);

        let bytes = encode(2, 2, &[top, top, bottom, bottom]);
        let image = EnvironmentImage::from_hdr_bytes(&bytes).unwrap();

        assert_eq!((image.width, image.height), (2, 2));
        assert_eq!(image.pixels.len(), 2 * 2 * 3);

        assert_close(&image.pixels[..6], &[0.5, 0.25, 0.125, 0.5, 0.25, 0.125]);
        assert_close(&image.pixels[6..], &[4.0, 2.0, 1.0, 4.0, 2.0, 1.0]);
    }

    #[test]
    fn keeps_radiance_above_one() {
        let bytes = encode(1, 1, &[Rgb([16.0, 8.0, 4.0])]);
        let image = EnvironmentImage::from_hdr_bytes(&bytes).unwrap();

        assert!(image.pixels[0] > 15.0, "clipped to {}", image.pixels[0]);
        assert_close(&image.pixels, &[16.0, 8.0, 4.0]);
    }

    #[test]
    fn rejects_garbage() {
        assert!(EnvironmentImage::from_hdr_bytes(b"not an hdr file").is_err());
    }

    #[test]
    fn placeholder_is_one_black_pixel() {
        let image = EnvironmentImage::placeholder();

        assert_eq!((image.width, image.height), (1, 1));
        assert_eq!(image.pixels, vec![0.0; 3]);
    }

    #[test]
    fn default_environment_layout() {
        let environment = Environment::default();

        assert_eq!(environment.map, "cedar_bridge_1k1.hdr");
        assert_eq!(environment.base_resolution, 512);
        assert_eq!(environment.mip_levels, 9);
        assert_eq!(environment.sample_count, 2048);
        assert_eq!(environment.validate(), Ok(()));
    }

    #[test]
    fn rejects_degenerate_bake_layouts() {
        let zero_samples = Environment {
            sample_count: 0,
            ..Environment::default()
        };

        let zero_levels = Environment {
            mip_levels: 0,
            ..Environment::default()
        };

        let zero_resolution = Environment {
            base_resolution: 0,
            ..Environment::default()
        };

        assert!(zero_samples.validate().is_err());
        assert!(zero_levels.validate().is_err());
        assert!(zero_resolution.validate().is_err());
    }
}
