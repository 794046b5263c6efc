use std::{fs, io, path::PathBuf, time::Instant};

use ab_glyph::FontVec;
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use image::Rgba;
use social_wcloud::{
    DocumentSource, FileSource, FontScaling, ReaderSource, SampleSource, Stopwords, TermFrequency,
    Tokenizer, WordCloud,
};
use tracing::{info, warn};

const DEFAULT_FONT: &[u8] = include_bytes!("../fonts/DejaVuSans.ttf");

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Scaling {
    Sqrt,
    Linear,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Tf {
    Normalized,
    Raw,
    L2,
}

/// Build a word cloud of the most distinctive terms in a set of posts.
#[derive(Debug, Parser)]
#[clap(name = "social_wcloud", version)]
struct Cli {
    /// File with one post per line; stdin when omitted
    #[clap(short, long)]
    input: Option<PathBuf>,

    /// Use placeholder posts instead of reading any input
    #[clap(long, conflicts_with = "input")]
    sample: bool,

    /// Keep only posts mentioning this topic
    #[clap(short, long, default_value = "")]
    topic: String,

    /// Maximum number of posts to read
    #[clap(short, long, default_value_t = 1000)]
    limit: usize,

    #[clap(long, default_value_t = 800, allow_hyphen_values = true)]
    width: i32,

    #[clap(long, default_value_t = 400, allow_hyphen_values = true)]
    height: i32,

    #[clap(long, default_value_t = 200, allow_hyphen_values = true)]
    max_terms: i32,

    #[clap(long, default_value_t = 10.0)]
    min_font_size: f32,

    #[clap(long, default_value_t = 96.0)]
    max_font_size: f32,

    #[clap(long, value_enum, default_value = "sqrt")]
    scaling: Scaling,

    #[clap(long, value_enum, default_value = "normalized")]
    tf: Tf,

    /// TrueType/OpenType font used to measure and draw terms; the bundled
    /// DejaVu Sans when omitted
    #[clap(long)]
    font: Option<PathBuf>,

    /// Any CSS color
    #[clap(long, default_value = "white")]
    background: String,

    /// Extra stop words, one per line
    #[clap(long)]
    stopwords: Option<PathBuf>,

    #[clap(long)]
    no_default_stopwords: bool,

    #[clap(long, default_value_t = 2)]
    min_term_length: usize,

    #[clap(long)]
    exclude_numbers: bool,

    /// Segment Chinese text into words
    #[clap(long)]
    cjk: bool,

    /// Allow vertical terms when horizontal ones do not fit
    #[clap(long)]
    rotate: bool,

    #[clap(long)]
    seed: Option<u64>,

    #[clap(long, default_value_t = 1.0)]
    scale: f32,

    #[clap(short, long, default_value = "cloud.png")]
    output: PathBuf,

    /// Also write the placements as JSON
    #[clap(long)]
    json: Option<PathBuf>,
}

impl Cli {
    fn stopwords(&self) -> Result<Stopwords> {
        let mut stopwords = if self.no_default_stopwords {
            Stopwords::empty()
        } else {
            Stopwords::english()
        };
        if self.cjk {
            stopwords = stopwords.merge(Stopwords::chinese());
        }
        if let Some(path) = &self.stopwords {
            let list = fs::read_to_string(path)
                .with_context(|| format!("Unable to read stop words from {}", path.display()))?;
            stopwords.extend(&list.lines().collect::<Vec<_>>());
        }
        Ok(stopwords)
    }

    fn documents(&self) -> Result<Vec<String>> {
        let documents = if self.sample {
            SampleSource.fetch_documents(&self.topic, self.limit)?
        } else if let Some(path) = &self.input {
            FileSource::new(path).fetch_documents(&self.topic, self.limit)?
        } else {
            ReaderSource::new(io::stdin().lock()).fetch_documents(&self.topic, self.limit)?
        };
        Ok(documents)
    }

    fn word_cloud(&self) -> Result<WordCloud> {
        let tokenizer = Tokenizer::new(self.stopwords()?)
            .with_min_term_length(self.min_term_length)
            .with_exclude_numbers(self.exclude_numbers)
            .with_cjk_segmentation(self.cjk);

        let background = csscolorparser::parse(&self.background)
            .with_context(|| format!("Invalid background color {:?}", self.background))?
            .to_rgba8();

        let mut wordcloud = WordCloud::default()
            .with_tokenizer(tokenizer)
            .with_term_frequency(match self.tf {
                Tf::Normalized => TermFrequency::Normalized,
                Tf::Raw => TermFrequency::Raw,
                Tf::L2 => TermFrequency::L2,
            })
            .with_size(self.width, self.height)
            .with_max_terms(self.max_terms)
            .with_font_size_range(self.min_font_size, self.max_font_size)
            .with_font_scaling(match self.scaling {
                Scaling::Sqrt => FontScaling::Sqrt,
                Scaling::Linear => FontScaling::Linear,
            })
            .with_rotation(self.rotate)
            .with_rng_seed(self.seed)
            .with_background_color(Rgba(background));

        wordcloud = match &self.font {
            Some(path) => wordcloud.with_font_from_path(path)?,
            None => wordcloud.with_font(
                FontVec::try_from_vec(DEFAULT_FONT.to_vec()).context("Bundled font is invalid")?,
            ),
        };
        Ok(wordcloud)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("social_wcloud=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let wordcloud = cli.word_cloud()?;
    let documents = cli.documents()?;
    if documents.is_empty() {
        warn!(topic = %cli.topic, "No posts found");
    }

    let now = Instant::now();
    let layout = wordcloud.generate_layout(&documents)?;
    if layout.is_empty() {
        warn!("Nothing to display, no image written");
        return Ok(());
    }

    if let Some(path) = &cli.json {
        let json = serde_json::to_string_pretty(&layout)?;
        fs::write(path, json).with_context(|| format!("Unable to write {}", path.display()))?;
    }

    let image = wordcloud.renderer().with_scale(cli.scale).render(&layout)?;
    image
        .save(&cli.output)
        .with_context(|| format!("Unable to save image to {}", cli.output.display()))?;

    info!(
        terms = layout.len(),
        elapsed_ms = now.elapsed().as_millis() as u64,
        output = %cli.output.display(),
        "Word cloud written"
    );
    Ok(())
}
