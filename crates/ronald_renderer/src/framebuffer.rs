//! Linear-radiance framebuffer, tone mapping and 8-bit encoding.

use std::path::Path;
use std::slice::ChunksMut;

use crate::material::Color;
use image::{ImageResult, Rgb, RgbImage};

/// Scale used when quantising a [0, 1] channel to 8 bits.
const EIGHT_BIT_MAX: f32 = 255.99;

/// Rec. 709 luminance weights.
const LUMINANCE: Color = Color::new(0.2126, 0.7152, 0.0722);

/// Compresses unbounded radiance towards [0, 1]. Only `Clamp` guarantees
/// the bound; `encode` clamps whatever is left over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToneMapOperator {
    /// Clamp every channel to [0, 1].
    Clamp,
    /// Reinhard-Jodie: blend of luminance-based and per-channel Reinhard.
    #[default]
    ReinhardJodie,
}

impl ToneMapOperator {
    pub fn apply(self, pixel: Color) -> Color {
        match self {
            ToneMapOperator::Clamp => pixel.clamp(Color::ZERO, Color::ONE),
            ToneMapOperator::ReinhardJodie => {
                let l = pixel.dot(LUMINANCE);
                let tv = pixel / (pixel + Color::ONE);
                let by_luminance = pixel / (1.0 + l);

                // Per-channel lerp weighted by tv itself
                by_luminance + (tv - by_luminance) * tv
            }
        }
    }
}

/// Image buffer of linear radiance, row-major with row 0 at the top.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width * height],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: usize, y: usize) -> Color {
        self.pixels[y * self.width + x]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: usize, y: usize, color: Color) {
        self.pixels[y * self.width + x] = color;
    }

    /// Disjoint mutable rows, top to bottom.
    pub fn rows_mut(&mut self) -> ChunksMut<'_, Color> {
        self.pixels.chunks_mut(self.width)
    }

    pub fn row(&self, y: usize) -> &[Color] {
        &self.pixels[y * self.width..(y + 1) * self.width]
    }

    /// Tone map every pixel in place. Only meaningful on a finished render.
    pub fn apply_tone_map(&mut self, operator: ToneMapOperator) {
        for pixel in &mut self.pixels {
            *pixel = operator.apply(*pixel);
        }
    }

    /// Gamma-encode (gamma 2) and quantise to 8-bit RGB.
    pub fn to_rgb8(&self) -> RgbImage {
        RgbImage::from_fn(self.width as u32, self.height as u32, |x, y| {
            Rgb(encode(self.get(x as usize, y as usize)))
        })
    }

    /// Encode and write; the format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> ImageResult<()> {
        self.to_rgb8().save(path)
    }
}

/// Convert a [0, 1] color to gamma-encoded 8-bit channels.
#[inline]
pub fn encode(color: Color) -> [u8; 3] {
    let c = color.clamp(Color::ZERO, Color::ONE);
    [
        (c.x.sqrt() * EIGHT_BIT_MAX) as u8,
        (c.y.sqrt() * EIGHT_BIT_MAX) as u8,
        (c.z.sqrt() * EIGHT_BIT_MAX) as u8,
    ]
}
