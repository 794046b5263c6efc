use std::{fs, path::PathBuf};

use ab_glyph::FontVec;
use image::{Rgba, RgbaImage};
use tracing::info;

pub use error::{ConfigError, SourceError, WordCloudError};
pub use layout::{Canvas, FontScaling, Layout, LayoutEngine, Placement, Point, Rect};
pub use render::{random_color_rgba, ColorFunc, Renderer};
pub use source::{DocumentSource, FileSource, ReaderSource, SampleSource, StaticSource};
pub use stopwords::Stopwords;
pub use text::{ApproxMeasure, FontMeasure, Size, TextMeasure};
pub use tokenizer::Tokenizer;
pub use weighting::{idf, score, TermFrequency, TermScore, TermScores};

mod error;
mod layout;
mod render;
mod source;
mod stopwords;
mod text;
mod tokenizer;
mod weighting;

/// The whole pipeline: documents to scores to placements to pixels.
///
/// Parameters are plain values set through `with_*` and checked each time a
/// pipeline runs, so a bad value fails the call instead of being coerced.
pub struct WordCloud {
    tokenizer: Tokenizer,
    term_frequency: TermFrequency,
    width: i32,
    height: i32,
    max_terms: i32,
    min_font_size: f32,
    max_font_size: f32,
    font_scaling: FontScaling,
    word_margin: f32,
    allow_rotation: bool,
    rng_seed: Option<u64>,
    background_color: Rgba<u8>,
    color_func: ColorFunc,
    font: Option<FontVec>,
}

impl Default for WordCloud {
    fn default() -> Self {
        WordCloud {
            tokenizer: Tokenizer::default(),
            term_frequency: TermFrequency::default(),
            width: 800,
            height: 400,
            max_terms: 200,
            min_font_size: 10.0,
            max_font_size: 96.0,
            font_scaling: FontScaling::default(),
            word_margin: 2.0,
            allow_rotation: false,
            rng_seed: None,
            background_color: Rgba([255, 255, 255, 255]),
            color_func: random_color_rgba,
            font: None,
        }
    }
}

impl WordCloud {
    pub fn with_tokenizer(mut self, value: Tokenizer) -> Self {
        self.tokenizer = value;
        self
    }

    pub fn with_stopwords(mut self, value: Stopwords) -> Self {
        self.tokenizer = self.tokenizer.with_stopwords(value);
        self
    }

    pub fn with_term_frequency(mut self, value: TermFrequency) -> Self {
        self.term_frequency = value;
        self
    }

    pub fn with_size(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_max_terms(mut self, value: i32) -> Self {
        self.max_terms = value;
        self
    }

    pub fn with_font_size_range(mut self, min: f32, max: f32) -> Self {
        self.min_font_size = min;
        self.max_font_size = max;
        self
    }

    pub fn with_font_scaling(mut self, value: FontScaling) -> Self {
        self.font_scaling = value;
        self
    }

    pub fn with_word_margin(mut self, value: f32) -> Self {
        self.word_margin = value;
        self
    }

    pub fn with_rotation(mut self, value: bool) -> Self {
        self.allow_rotation = value;
        self
    }

    /// Seeds the spiral start angle and the word colors. Without a seed the
    /// layout is still deterministic, only colors vary between runs.
    pub fn with_rng_seed(mut self, value: Option<u64>) -> Self {
        self.rng_seed = value;
        self
    }

    pub fn with_background_color(mut self, value: Rgba<u8>) -> Self {
        self.background_color = value;
        self
    }

    pub fn with_color_func(mut self, value: ColorFunc) -> Self {
        self.color_func = value;
        self
    }

    pub fn with_font(mut self, font: FontVec) -> Self {
        self.font = Some(font);
        self
    }

    pub fn with_font_from_path(self, path: impl Into<PathBuf>) -> Result<Self, WordCloudError> {
        let path = path.into();
        let font_file = fs::read(&path).map_err(|source| WordCloudError::FontIo { path, source })?;
        Ok(self.with_font(FontVec::try_from_vec(font_file)?))
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    fn layout_engine(&self) -> Result<LayoutEngine, ConfigError> {
        let canvas = Canvas::new(self.width, self.height)?;
        if self.max_terms < 0 {
            return Err(ConfigError::NegativeMaxTerms(self.max_terms));
        }
        let (min, max) = (self.min_font_size, self.max_font_size);
        if !min.is_finite() || !max.is_finite() || min <= 0.0 || min > max {
            return Err(ConfigError::InvalidFontRange { min, max });
        }
        if !self.word_margin.is_finite() || self.word_margin < 0.0 {
            return Err(ConfigError::InvalidMargin(self.word_margin));
        }
        self.tokenizer.validate()?;

        Ok(LayoutEngine::new(canvas, self.max_terms as usize)
            .with_font_range(min, max)
            .with_font_scaling(self.font_scaling)
            .with_margin(self.word_margin)
            .with_rotation(self.allow_rotation)
            .with_seed(self.rng_seed))
    }

    /// Term scores of one corpus with this cloud's tokenizer.
    pub fn score<S: AsRef<str> + Sync>(&self, documents: &[S]) -> TermScores {
        score(documents, &self.tokenizer, self.term_frequency)
    }

    /// Scores `documents` and lays out the best terms. An empty layout means
    /// there was nothing to display.
    pub fn generate_layout<S: AsRef<str> + Sync>(
        &self,
        documents: &[S],
    ) -> Result<Layout, WordCloudError> {
        let engine = self.layout_engine()?;
        let scores = self.score(documents);

        let layout = match &self.font {
            Some(font) => engine.layout(&scores, &FontMeasure { font }),
            None => engine.layout(&scores, &ApproxMeasure::default()),
        };

        info!(
            documents = documents.len(),
            vocabulary = scores.len(),
            placed = layout.len(),
            "Generated word cloud layout"
        );
        Ok(layout)
    }

    pub fn renderer(&self) -> Renderer<'_> {
        Renderer::new(self.font.as_ref())
            .with_background_color(self.background_color)
            .with_color_func(self.color_func)
            .with_rng_seed(self.rng_seed)
    }

    /// Lays out and rasterizes in one go; `scale` multiplies the bitmap size.
    pub fn generate_image<S: AsRef<str> + Sync>(
        &self,
        documents: &[S],
        scale: f32,
    ) -> Result<RgbaImage, WordCloudError> {
        let layout = self.generate_layout(documents)?;
        Ok(self.renderer().with_scale(scale).render(&layout)?)
    }
}

/// [`WordCloud::generate_layout`] with every parameter at its default.
pub fn generate_layout<S: AsRef<str> + Sync>(documents: &[S]) -> Result<Layout, WordCloudError> {
    WordCloud::default().generate_layout(documents)
}
