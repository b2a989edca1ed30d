//! A flat, fully-resident image, grounded on `original_source/Include/udImage.h`'s `udImage`.
//!
//! Decoding compressed formats (PNG et al.) is an external collaborator per spec §1 ("image
//! decode / PNG compression" is explicitly out of scope), so this type only wraps already-decoded
//! ARGB8888 pixels; callers needing to load a PNG/JPEG off disk decode it externally and hand the
//! raw pixels to [`Image::from_argb`]. This mirrors `udcore_file`'s pattern of leaving truly
//! external formats to a pluggable collaborator rather than reimplementing them here.

use udcore_result::{ud_error_if, UdResult, UdResultCode};

use crate::sample::{self, SampleFlags};

/// A fully-resident ARGB8888 image (component C10's non-streaming counterpart).
#[derive(Debug, Clone)]
pub struct Image {
    width: u32,
    height: u32,
    source_channels: u16,
    pixels: Vec<u32>,
}

impl Image {
    /// Wrap already-decoded ARGB8888 pixels, row-major from the top-left.
    pub fn from_argb(width: u32, height: u32, source_channels: u16, pixels: Vec<u32>) -> UdResult<Self> {
        ud_error_if!(width == 0 || height == 0, UdResultCode::InvalidParameter);
        ud_error_if!(
            pixels.len() != (width as usize) * (height as usize),
            UdResultCode::InvalidParameter
        );
        Ok(Self {
            width,
            height,
            source_channels,
            pixels,
        })
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn source_channels(&self) -> u16 {
        self.source_channels
    }

    #[must_use]
    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Sample a pixel with OpenGL-style (or top-left, per flags) UV coordinates.
    #[must_use]
    pub fn sample(&self, u: f32, v: f32, flags: SampleFlags) -> Option<u32> {
        let (px, py) = sample::uv_to_pixel(u, v, self.width, self.height, flags)?;
        Some(sample::sample_buffer(px, py, self.width, self.height, flags, |x, y| {
            self.pixels[(y * self.width + x) as usize]
        }))
    }

    /// Box-filter downsample to half resolution (rounding up), the mip-chain generation step
    /// used by [`crate::streaming::save`].
    #[must_use]
    pub fn downsample_half(&self) -> Self {
        let new_width = (self.width / 2).max(1);
        let new_height = (self.height / 2).max(1);
        let mut pixels = Vec::with_capacity((new_width * new_height) as usize);
        for y in 0..new_height {
            for x in 0..new_width {
                let x0 = (x * 2).min(self.width - 1);
                let y0 = (y * 2).min(self.height - 1);
                let x1 = (x0 + 1).min(self.width - 1);
                let y1 = (y0 + 1).min(self.height - 1);
                let texels = [
                    self.pixels[(y0 * self.width + x0) as usize],
                    self.pixels[(y0 * self.width + x1) as usize],
                    self.pixels[(y1 * self.width + x0) as usize],
                    self.pixels[(y1 * self.width + x1) as usize],
                ];
                pixels.push(average_argb(&texels));
            }
        }
        Self {
            width: new_width,
            height: new_height,
            source_channels: self.source_channels,
            pixels,
        }
    }
}

fn average_argb(texels: &[u32; 4]) -> u32 {
    let mut sums = [0u32; 4];
    for &texel in texels {
        for (i, b) in texel.to_le_bytes().iter().enumerate() {
            sums[i] += *b as u32;
        }
    }
    let avg: Vec<u8> = sums.iter().map(|s| (*s / texels.len() as u32) as u8).collect();
    u32::from_le_bytes([avg[0], avg[1], avg[2], avg[3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_pixel_count() {
        let err = Image::from_argb(2, 2, 4, vec![0; 3]).unwrap_err();
        assert_eq!(err.code, UdResultCode::InvalidParameter);
    }

    #[test]
    fn sample_top_left_matches_first_pixel() {
        let image = Image::from_argb(2, 2, 4, vec![0xAABBCCDD, 1, 2, 3]).unwrap();
        let texel = image.sample(0.0, 0.0, SampleFlags::TOP_LEFT).unwrap();
        assert_eq!(texel, 0xAABBCCDD);
    }

    #[test]
    fn downsample_halves_dimensions() {
        let image = Image::from_argb(4, 4, 4, vec![0; 16]).unwrap();
        let half = image.downsample_half();
        assert_eq!((half.width(), half.height()), (2, 2));
    }

    #[test]
    fn downsample_of_1x1_stays_1x1() {
        let image = Image::from_argb(1, 1, 4, vec![0x11223344]).unwrap();
        let half = image.downsample_half();
        assert_eq!((half.width(), half.height()), (1, 1));
        assert_eq!(half.pixels()[0], 0x11223344);
    }
}
