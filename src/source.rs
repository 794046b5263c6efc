//! Where documents come from. The pipeline itself only sees a slice of strings.

use std::borrow::Cow;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use tracing::{info, warn};

use crate::error::SourceError;

pub trait DocumentSource {
    /// Up to `limit` documents about `topic`. An empty topic matches everything.
    fn fetch_documents(&mut self, topic: &str, limit: usize) -> Result<Vec<String>, SourceError>;
}

fn mentions(document: &str, topic: &str) -> bool {
    topic.is_empty() || document.to_lowercase().contains(&topic.to_lowercase())
}

/// One document per non-blank line of a reader.
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: BufRead> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        ReaderSource { reader }
    }
}

impl<R: BufRead> DocumentSource for ReaderSource<R> {
    fn fetch_documents(&mut self, topic: &str, limit: usize) -> Result<Vec<String>, SourceError> {
        let mut documents = Vec::new();
        let mut buf = Vec::new();
        let mut line_number = 0usize;

        while documents.len() < limit {
            buf.clear();
            if self.reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            line_number += 1;

            let line = String::from_utf8_lossy(&buf);
            if matches!(line, Cow::Owned(_)) {
                warn!(line = line_number, "Replaced invalid UTF-8 in document");
            }
            let document = line.trim();
            if !document.is_empty() && mentions(document, topic) {
                documents.push(document.to_string());
            }
        }

        Ok(documents)
    }
}

pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource { path: path.into() }
    }
}

impl DocumentSource for FileSource {
    fn fetch_documents(&mut self, topic: &str, limit: usize) -> Result<Vec<String>, SourceError> {
        let file = File::open(&self.path).map_err(|source| SourceError::Open {
            path: self.path.clone(),
            source,
        })?;
        let documents = ReaderSource::new(BufReader::new(file)).fetch_documents(topic, limit)?;
        info!(path = %self.path.display(), documents = documents.len(), "Loaded documents");
        Ok(documents)
    }
}

/// A fixed list, for tests and for callers that already hold the posts.
pub struct StaticSource {
    documents: Vec<String>,
}

impl StaticSource {
    pub fn new<S: Into<String>>(documents: impl IntoIterator<Item = S>) -> Self {
        StaticSource {
            documents: documents.into_iter().map(Into::into).collect(),
        }
    }
}

impl DocumentSource for StaticSource {
    fn fetch_documents(&mut self, topic: &str, limit: usize) -> Result<Vec<String>, SourceError> {
        Ok(self
            .documents
            .iter()
            .filter(|doc| mentions(doc, topic))
            .take(limit)
            .cloned()
            .collect())
    }
}

/// Stand-in for platforms that are not wired up: repeats one sample post.
pub struct SampleSource;

impl DocumentSource for SampleSource {
    fn fetch_documents(&mut self, topic: &str, limit: usize) -> Result<Vec<String>, SourceError> {
        Ok(vec![format!("Sample post about {topic}"); limit])
    }
}
