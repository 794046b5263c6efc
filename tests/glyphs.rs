// Measuring and drawing real glyphs with the bundled DejaVu Sans.

use ab_glyph::FontVec;
use image::Rgba;
use nanorand::WyRand;
use social_wcloud::{
    Canvas, FontMeasure, Layout, Placement, Point, Rect, Renderer, Stopwords, TextMeasure,
    WordCloud,
};

const DEJAVU: &[u8] = include_bytes!("../fonts/DejaVuSans.ttf");

fn font() -> FontVec {
    FontVec::try_from_vec(DEJAVU.to_vec()).unwrap()
}

fn black(_: &Placement, _: &mut WyRand) -> Rgba<u8> {
    Rgba([0, 0, 0, 255])
}

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// Min/max x and y of every pixel that is not background.
fn ink_extent(image: &image::RgbaImage) -> Option<(u32, u32, u32, u32)> {
    image
        .enumerate_pixels()
        .filter(|(_, _, px)| **px != WHITE)
        .fold(None, |extent, (x, y, _)| match extent {
            None => Some((x, y, x, y)),
            Some((x0, y0, x1, y1)) => Some((x0.min(x), y0.min(y), x1.max(x), y1.max(y))),
        })
}

#[test]
fn font_measure_scales_with_text_and_size() {
    let font = font();
    let measure = FontMeasure { font: &font };

    let gold = measure.measure("gold", 20.0);
    let silver = measure.measure("silver", 20.0);
    let big_gold = measure.measure("gold", 40.0);

    assert!(gold.width > 0.0 && gold.height > 0.0);
    assert!(silver.width > gold.width);
    assert!(big_gold.width > 1.8 * gold.width);
    assert!(big_gold.height > 1.8 * gold.height);
    assert_eq!(measure.measure("", 20.0).width, 0.0);
}

#[test]
fn layout_with_font_stays_valid() {
    let corpus = ["silver price rises", "silver demand grows", "gold falls"];
    let cloud = WordCloud::default()
        .with_stopwords(Stopwords::empty())
        .with_font(font());
    let layout = cloud.generate_layout(&corpus).unwrap();

    assert_eq!(layout.placements[0].term, "silver");
    for (i, a) in layout.placements.iter().enumerate() {
        assert!(a.bounds.x >= 0.0 && a.bounds.right() <= 800.0);
        assert!(a.bounds.y >= 0.0 && a.bounds.bottom() <= 400.0);
        for b in &layout.placements[i + 1..] {
            assert!(!a.bounds.overlaps(&b.bounds));
        }
    }
}

fn single(rotated: bool, bounds: Rect) -> Layout {
    Layout {
        canvas: Canvas::new(200, 200).unwrap(),
        placements: vec![Placement {
            term: "silver".into(),
            score: 1.0,
            font_size: 30.0,
            center: Point {
                x: bounds.x + bounds.width / 2.0,
                y: bounds.y + bounds.height / 2.0,
            },
            bounds,
            rotated,
        }],
    }
}

#[test]
fn horizontal_glyphs_are_drawn_inside_their_box() {
    let font = font();
    let size = FontMeasure { font: &font }.measure("silver", 30.0);
    let bounds = Rect {
        x: 20.0,
        y: 40.0,
        width: size.width,
        height: size.height,
    };

    let image = Renderer::new(Some(&font))
        .with_color_func(black)
        .render(&single(false, bounds))
        .unwrap();

    let (x0, y0, x1, y1) = ink_extent(&image).expect("nothing drawn");
    assert!(x1 - x0 > y1 - y0, "horizontal text should be wider than tall");
    assert!(x0 as f32 >= bounds.x - 1.0 && x1 as f32 <= bounds.right() + 1.0);
    assert!(y0 as f32 >= bounds.y - 1.0 && y1 as f32 <= bounds.bottom() + 1.0);
}

#[test]
fn rotated_glyphs_are_drawn_inside_their_swapped_box() {
    let font = font();
    let size = FontMeasure { font: &font }.measure("silver", 30.0);
    let bounds = Rect {
        x: 60.0,
        y: 20.0,
        width: size.height,
        height: size.width,
    };

    let image = Renderer::new(Some(&font))
        .with_color_func(black)
        .render(&single(true, bounds))
        .unwrap();

    let (x0, y0, x1, y1) = ink_extent(&image).expect("nothing drawn");
    assert!(y1 - y0 > x1 - x0, "rotated text should be taller than wide");
    assert!(x0 as f32 >= bounds.x - 1.0 && x1 as f32 <= bounds.right() + 1.0);
    assert!(y0 as f32 >= bounds.y - 1.0 && y1 as f32 <= bounds.bottom() + 1.0);
}
