//! Spiral placement of scored terms on a fixed canvas.
//!
//! Terms are placed largest first. Each one walks an Archimedean spiral out
//! from the canvas center, stretched to the canvas aspect ratio, and takes the
//! first spot where its box stays inside the canvas and clear of every box
//! placed before it. Terms that find no spot are left out.

use std::f32::consts::{SQRT_2, TAU};

use nanorand::{Rng, WyRand};
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::ConfigError;
use crate::text::{Size, TextMeasure};
use crate::weighting::TermScores;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    pub fn new(width: i32, height: i32) -> Result<Self, ConfigError> {
        if width <= 0 || height <= 0 {
            return Err(ConfigError::InvalidCanvas { width, height });
        }
        Ok(Canvas {
            width: width as u32,
            height: height as u32,
        })
    }

    fn bounds(&self) -> Rect {
        Rect {
            x: 0.0,
            y: 0.0,
            width: self.width as f32,
            height: self.height as f32,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Axis-aligned box; `x`/`y` is the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn centered(center: Point, size: Size) -> Self {
        Rect {
            x: center.x - size.width / 2.0,
            y: center.y - size.height / 2.0,
            width: size.width,
            height: size.height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Shared edges do not count as overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn contains(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    fn expand(&self, margin: f32) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            width: self.width + 2.0 * margin,
            height: self.height + 2.0 * margin,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Placement {
    pub term: String,
    pub score: f32,
    pub font_size: f32,
    pub center: Point,
    pub bounds: Rect,
    /// Drawn reading bottom to top, the box is already swapped.
    pub rotated: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Layout {
    pub canvas: Canvas,
    pub placements: Vec<Placement>,
}

impl Layout {
    pub fn empty(canvas: Canvas) -> Self {
        Layout {
            canvas,
            placements: vec![],
        }
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Nothing to display. Callers should not render an empty layout as if it
    /// were a result.
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Placement> {
        self.placements.iter()
    }

    pub fn get(&self, term: &str) -> Option<&Placement> {
        self.placements.iter().find(|p| p.term == term)
    }
}

/// Score to font size. The top term always gets the maximum size.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FontScaling {
    /// `max * score / top`
    Linear,
    /// `max * sqrt(score / top)`, narrows the gap between big and small terms.
    #[default]
    Sqrt,
}

impl FontScaling {
    pub fn font_size(&self, score: f32, top_score: f32, min_size: f32, max_size: f32) -> f32 {
        let ratio = if top_score > 0.0 {
            (score / top_score).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let ratio = match self {
            FontScaling::Linear => ratio,
            FontScaling::Sqrt => ratio.sqrt(),
        };
        (max_size * ratio).clamp(min_size, max_size)
    }
}

pub struct LayoutEngine {
    pub canvas: Canvas,
    pub max_terms: usize,
    pub min_font_size: f32,
    pub max_font_size: f32,
    pub font_scaling: FontScaling,
    /// Gap kept between neighbouring boxes.
    pub margin: f32,
    pub allow_rotation: bool,
    /// Distance between spiral turns, in pixels along the shorter axis.
    pub spiral_spacing: f32,
    /// Distance between candidates along the spiral, in pixels.
    pub spiral_step: f32,
    start_angle: f32,
}

impl LayoutEngine {
    pub fn new(canvas: Canvas, max_terms: usize) -> Self {
        LayoutEngine {
            canvas,
            max_terms,
            min_font_size: 10.0,
            max_font_size: 96.0,
            font_scaling: FontScaling::default(),
            margin: 2.0,
            allow_rotation: false,
            spiral_spacing: 6.0,
            spiral_step: 3.0,
            start_angle: 0.0,
        }
    }

    pub fn with_font_range(mut self, min: f32, max: f32) -> Self {
        self.min_font_size = min;
        self.max_font_size = max;
        self
    }

    pub fn with_font_scaling(mut self, value: FontScaling) -> Self {
        self.font_scaling = value;
        self
    }

    pub fn with_margin(mut self, value: f32) -> Self {
        self.margin = value;
        self
    }

    pub fn with_rotation(mut self, value: bool) -> Self {
        self.allow_rotation = value;
        self
    }

    /// Rotates where the spiral starts. Without a seed it starts pointing right.
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.start_angle = match seed {
            Some(seed) => {
                let degrees: u32 = WyRand::new_seed(seed).generate_range(0..360u32);
                (degrees as f32).to_radians()
            }
            None => 0.0,
        };
        self
    }

    pub fn layout(&self, scores: &TermScores, measure: &dyn TextMeasure) -> Layout {
        let ranked = scores.ranked(self.max_terms);
        let Some(top_score) = ranked.first().map(|entry| entry.score) else {
            return Layout::empty(self.canvas);
        };

        let mut placements: Vec<Placement> = Vec::with_capacity(ranked.len());
        let mut occupied: Vec<Rect> = Vec::with_capacity(ranked.len());
        let mut skipped = 0usize;

        for entry in ranked {
            let font_size = self.font_scaling.font_size(
                entry.score,
                top_score,
                self.min_font_size,
                self.max_font_size,
            );
            let size = measure.measure(&entry.term, font_size);

            match self.find_position(size, &occupied) {
                Some((bounds, rotated)) => {
                    occupied.push(bounds.expand(self.margin));
                    placements.push(Placement {
                        term: entry.term.clone(),
                        score: entry.score,
                        font_size,
                        center: Point {
                            x: bounds.x + bounds.width / 2.0,
                            y: bounds.y + bounds.height / 2.0,
                        },
                        bounds,
                        rotated,
                    });
                }
                None => {
                    debug!(term = %entry.term, font_size, "No room left for term");
                    skipped += 1;
                }
            }
        }

        if skipped > 0 {
            warn!(skipped, placed = placements.len(), "Some terms did not fit on the canvas");
        }

        Layout {
            canvas: self.canvas,
            placements,
        }
    }

    fn find_position(&self, size: Size, occupied: &[Rect]) -> Option<(Rect, bool)> {
        let canvas = self.canvas.bounds();
        let fits_canvas = |rect: &Rect| canvas.contains(rect);

        let horizontal_fits = size.width <= canvas.width && size.height <= canvas.height;
        let vertical_fits =
            self.allow_rotation && size.height <= canvas.width && size.width <= canvas.height;
        if !horizontal_fits && !vertical_fits {
            return None;
        }
        let rotated_size = Size {
            width: size.height,
            height: size.width,
        };

        // Boxes are re-checked against the last obstacle first; neighbouring
        // candidates usually collide with the same box.
        let mut last_hit = 0usize;
        let mut is_free = |rect: &Rect| {
            if occupied.get(last_hit).is_some_and(|o| o.overlaps(rect)) {
                return false;
            }
            match occupied.iter().position(|o| o.overlaps(rect)) {
                Some(index) => {
                    last_hit = index;
                    false
                }
                None => true,
            }
        };

        let spiral = Spiral::new(
            self.canvas,
            self.start_angle,
            self.spiral_spacing,
            self.spiral_step,
        );
        for center in spiral {
            if horizontal_fits {
                let rect = Rect::centered(center, size);
                if fits_canvas(&rect) && is_free(&rect) {
                    return Some((rect, false));
                }
            }
            if vertical_fits {
                let rect = Rect::centered(center, rotated_size);
                if fits_canvas(&rect) && is_free(&rect) {
                    return Some((rect, true));
                }
            }
        }

        None
    }
}

/// Candidate centers along an Archimedean spiral, ending once the spiral
/// has swept past the canvas corners.
struct Spiral {
    center: Point,
    /// Half extents of the canvas, the spiral is an ellipse in pixel space.
    half_width: f32,
    half_height: f32,
    half_short: f32,
    start_angle: f32,
    spacing: f32,
    step: f32,
    theta: f32,
}

impl Spiral {
    fn new(canvas: Canvas, start_angle: f32, spacing: f32, step: f32) -> Self {
        let half_width = canvas.width as f32 / 2.0;
        let half_height = canvas.height as f32 / 2.0;
        Spiral {
            center: Point {
                x: half_width,
                y: half_height,
            },
            half_width,
            half_height,
            half_short: half_width.min(half_height),
            start_angle,
            spacing: spacing.max(0.5),
            step: step.max(0.5),
            theta: 0.0,
        }
    }
}

impl Iterator for Spiral {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        let radius = self.spacing * self.theta / TAU;
        // normalized radius 1.0 touches the canvas edge, sqrt(2) its corners
        let normalized = radius / self.half_short;
        if normalized > SQRT_2 {
            return None;
        }

        let angle = self.theta + self.start_angle;
        let point = Point {
            x: self.center.x + normalized * self.half_width * angle.cos(),
            y: self.center.y + normalized * self.half_height * angle.sin(),
        };

        // constant arc length between candidates, at most an eighth of a turn
        let stretch = self.half_width.max(self.half_height) / self.half_short;
        self.theta += (self.step / (radius * stretch).max(1.0)).min(TAU / 8.0);

        Some(point)
    }
}
