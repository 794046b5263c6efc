use ab_glyph::{Font, FontVec, PxScale};
use image::{Pixel, Rgba, RgbaImage};
use nanorand::{Rng, WyRand};
use palette::{Hsl, IntoColor, Pixel as _, Srgb};
use tracing::debug;

use crate::error::ConfigError;
use crate::layout::{Layout, Placement};
use crate::text;

pub type ColorFunc = fn(&Placement, &mut WyRand) -> Rgba<u8>;

/// Rasterizes a finished layout. Positions are taken as given.
pub struct Renderer<'a> {
    font: Option<&'a FontVec>,
    background_color: Rgba<u8>,
    color_func: ColorFunc,
    scale: f32,
    rng_seed: Option<u64>,
}

impl<'a> Renderer<'a> {
    pub fn new(font: Option<&'a FontVec>) -> Self {
        Renderer {
            font,
            background_color: Rgba([255, 255, 255, 255]),
            color_func: random_color_rgba,
            scale: 1.0,
            rng_seed: None,
        }
    }

    pub fn with_background_color(mut self, value: Rgba<u8>) -> Self {
        self.background_color = value;
        self
    }

    pub fn with_color_func(mut self, value: ColorFunc) -> Self {
        self.color_func = value;
        self
    }

    pub fn with_scale(mut self, value: f32) -> Self {
        self.scale = value;
        self
    }

    pub fn with_rng_seed(mut self, value: Option<u64>) -> Self {
        self.rng_seed = value;
        self
    }

    pub fn render(&self, layout: &Layout) -> Result<RgbaImage, ConfigError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(ConfigError::InvalidScale(self.scale));
        }

        let mut rng = match self.rng_seed {
            Some(seed) => WyRand::new_seed(seed),
            None => WyRand::new(),
        };

        let mut buffer = RgbaImage::from_pixel(
            ((layout.canvas.width as f32 * self.scale) as u32).max(1),
            ((layout.canvas.height as f32 * self.scale) as u32).max(1),
            self.background_color,
        );

        for placement in &layout.placements {
            let color = (self.color_func)(placement, &mut rng);
            match self.font {
                Some(font) => self.draw_glyphs(&mut buffer, font, placement, color),
                None => self.draw_block(&mut buffer, placement, color),
            }
        }

        debug!(
            width = buffer.width(),
            height = buffer.height(),
            terms = layout.len(),
            "Rendered layout"
        );
        Ok(buffer)
    }

    fn draw_glyphs(&self, buffer: &mut RgbaImage, font: &FontVec, word: &Placement, color: Rgba<u8>) {
        let glyph_data =
            text::text_to_glyphs(&word.term, font, PxScale::from(word.font_size * self.scale));
        let origin_x = word.bounds.x * self.scale;
        let origin_y = word.bounds.y * self.scale;
        let text_width = glyph_data.width as f32;

        for glyph in glyph_data.glyphs {
            if let Some(outlined) = font.outline_glyph(glyph) {
                let bounds = outlined.px_bounds();

                outlined.draw(|x, y, v| {
                    let gx = bounds.min.x + x as f32;
                    let gy = bounds.min.y + y as f32;
                    // rotated words read bottom to top
                    let (px, py) = if word.rotated {
                        (origin_x + gy, origin_y + text_width - gx)
                    } else {
                        (origin_x + gx, origin_y + gy)
                    };
                    blend_pixel(buffer, px, py, color, v);
                })
            }
        }
    }

    /// Preview drawing without a font: each term becomes a filled block.
    fn draw_block(&self, buffer: &mut RgbaImage, word: &Placement, color: Rgba<u8>) {
        let inset = (word.font_size * self.scale * 0.1).min(2.0);
        let x0 = word.bounds.x * self.scale + inset;
        let y0 = word.bounds.y * self.scale + inset;
        let x1 = word.bounds.right() * self.scale - inset;
        let y1 = word.bounds.bottom() * self.scale - inset;

        let mut y = y0.floor();
        while y < y1 {
            let mut x = x0.floor();
            while x < x1 {
                blend_pixel(buffer, x, y, color, 1.0);
                x += 1.0;
            }
            y += 1.0;
        }
    }
}

fn blend_pixel(buffer: &mut RgbaImage, x: f32, y: f32, color: Rgba<u8>, coverage: f32) {
    if x < 0.0 || y < 0.0 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    if x >= buffer.width() || y >= buffer.height() {
        return;
    }

    let px = buffer.get_pixel_mut(x, y);
    let coverage = coverage.clamp(0.0, 1.0);
    px.apply2(&color, |old, new| {
        ((coverage * new as f32) + (1.0 - coverage) * old as f32) as u8
    });
    px.0[3] = 0xFF;
}

pub fn random_color_rgba(_: &Placement, rng: &mut WyRand) -> Rgba<u8> {
    let hue: u16 = rng.generate_range(0..360u16);

    let col = Hsl::new(hue as f32, 1.0, 0.4);
    let rgb: Srgb = col.into_color();

    let raw: [u8; 3] = rgb.into_format().into_raw();

    Rgba([raw[0], raw[1], raw[2], 0xFF])
}
