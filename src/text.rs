use ab_glyph::{point, Font, FontVec, Glyph, GlyphId, Point, PxScale, ScaleFont};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// Size of a term's box when drawn at a given font size.
pub trait TextMeasure {
    fn measure(&self, text: &str, font_size: f32) -> Size;
}

/// Font-free metric for layouts that never get rasterized with glyphs, or
/// when no font is loaded. Wide (CJK) characters take a full em.
#[derive(Clone, Copy, Debug)]
pub struct ApproxMeasure {
    pub char_width: f32,
    pub wide_char_width: f32,
    pub line_height: f32,
}

impl Default for ApproxMeasure {
    fn default() -> Self {
        ApproxMeasure {
            char_width: 0.6,
            wide_char_width: 1.0,
            line_height: 1.2,
        }
    }
}

impl TextMeasure for ApproxMeasure {
    fn measure(&self, text: &str, font_size: f32) -> Size {
        let ems: f32 = text
            .chars()
            .map(|c| {
                if c.len_utf8() >= 3 {
                    self.wide_char_width
                } else {
                    self.char_width
                }
            })
            .sum();

        Size {
            width: ems * font_size,
            height: self.line_height * font_size,
        }
    }
}

/// Measures with the glyphs the renderer will actually draw.
pub struct FontMeasure<'a> {
    pub font: &'a FontVec,
}

impl TextMeasure for FontMeasure<'_> {
    fn measure(&self, text: &str, font_size: f32) -> Size {
        let glyphs = text_to_glyphs(text, self.font, PxScale::from(font_size));
        Size {
            width: glyphs.width as f32,
            height: glyphs.height as f32,
        }
    }
}

#[derive(Clone, Debug)]
pub struct GlyphData {
    pub glyphs: Vec<Glyph>,
    pub width: u32,
    pub height: u32,
}

//把文本转换为字体，方便画图
pub fn text_to_glyphs(text: &str, font: &FontVec, scale: PxScale) -> GlyphData {
    let scaled_font = font.as_scaled(scale);

    let mut glyphs: Vec<Glyph> = vec![];
    layout_line(&scaled_font, point(0.0, 0.0), text, &mut glyphs);

    let height = scaled_font.height().ceil() as u32;
    let width = match (glyphs.first(), glyphs.last()) {
        (Some(first), Some(last)) => {
            let max_x = last.position.x + scaled_font.h_advance(last.id);
            (max_x - first.position.x).ceil() as u32
        }
        _ => 0,
    };

    GlyphData {
        glyphs,
        width,
        height,
    }
}

/// Lays out `text` on a single baseline; control characters are skipped.
fn layout_line<F, SF>(font: &SF, position: Point, text: &str, target: &mut Vec<Glyph>)
where
    F: Font,
    SF: ScaleFont<F>,
{
    let mut caret = position + point(0.0, font.ascent());
    let mut last_glyph: Option<GlyphId> = None;
    for c in text.chars().filter(|c| !c.is_control()) {
        let mut glyph = font.scaled_glyph(c);
        if let Some(previous) = last_glyph.take() {
            caret.x += font.kern(previous, glyph.id);
        }
        glyph.position = caret;
        last_glyph = Some(glyph.id);
        caret.x += font.h_advance(glyph.id);

        target.push(glyph);
    }
}
