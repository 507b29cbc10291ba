// ============================================================
// Layer 3 — Domain Errors
// ============================================================
// Every failure the core can report, as one typed enum.
// The application and CLI layers wrap these in anyhow with
// extra context; the data/ml/infra layers return them as-is.
//
// An empty input file or a zero-length drawing is NOT an error.
// Those are reported through ClassifyOutcome / SampleReport.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SketchError {
    /// Input that cannot be turned into a sample: bad JSON, bad
    /// strokes, a label the vocabulary does not know, a bad
    /// vocabulary line. `line` is 1-based.
    #[error("malformed input on line {line}: {reason}")]
    MalformedInput { line: usize, reason: String },

    /// Parameters or configuration that do not fit the architecture.
    #[error("shape mismatch for {what}: expected {expected}, found {actual}")]
    ShapeMismatch {
        what:     String,
        expected: usize,
        actual:   usize,
    },

    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("model record error: {0}")]
    Record(String),

    #[error("model config error: {0}")]
    Config(String),

    #[error("tensor data error: {0}")]
    TensorData(String),
}

impl SketchError {
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedInput { line, reason: reason.into() }
    }

    pub fn shape(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch { what: what.into(), expected, actual }
    }

    /// Same error with the line number replaced. Encoders don't know
    /// which line they were fed, loaders do.
    pub fn at_line(self, line: usize) -> Self {
        match self {
            Self::MalformedInput { reason, .. } => Self::MalformedInput { line, reason },
            other => other,
        }
    }
}

pub type SketchResult<T> = Result<T, SketchError>;
