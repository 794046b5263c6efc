use std::path::PathBuf;

use thiserror::Error;

/// Invalid pipeline parameters. Raised before any work is done.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("canvas dimensions must be positive, got {width}x{height}")]
    InvalidCanvas { width: i32, height: i32 },

    #[error("max_terms must not be negative, got {0}")]
    NegativeMaxTerms(i32),

    #[error("font size range [{min}, {max}] is invalid")]
    InvalidFontRange { min: f32, max: f32 },

    #[error("word margin must be a finite, non-negative number, got {0}")]
    InvalidMargin(f32),

    #[error("minimum term length must be at least 1")]
    ZeroMinTermLength,

    #[error("render scale must be a positive number, got {0}")]
    InvalidScale(f32),
}

#[derive(Debug, Error)]
pub enum WordCloudError {
    #[error(transparent)]
    Configuration(#[from] ConfigError),

    #[error("unable to read font file {path}")]
    FontIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("font data is invalid")]
    InvalidFont(#[from] ab_glyph::InvalidFont),
}

/// Failure of a [`DocumentSource`](crate::source::DocumentSource).
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("unable to open {path}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed reading documents")]
    Read(#[from] std::io::Error),
}
