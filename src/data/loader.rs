// ============================================================
// Layer 4 — Ndjson Loader
// ============================================================
// Reads the newline-delimited JSON file the game writes:
// one drawing per line, {"word": ..., "drawing": [...]}.
//
// Whitespace-only lines are skipped. Any other line that does
// not parse aborts the whole read, naming the line.

use std::{fs, path::PathBuf};

use crate::domain::drawing::RawDrawing;
use crate::domain::error::{SketchError, SketchResult};
use crate::domain::traits::DrawingSource;

pub struct NdjsonLoader {
    path: PathBuf,
}

impl NdjsonLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DrawingSource for NdjsonLoader {
    fn load_all(&self) -> SketchResult<Vec<(usize, RawDrawing)>> {
        let text = fs::read_to_string(&self.path).map_err(|source| SketchError::Io {
            path: self.path.clone(),
            source,
        })?;

        let drawings = parse_ndjson(&text)?;
        tracing::info!(
            "Read {} drawings from '{}'",
            drawings.len(),
            self.path.display()
        );
        Ok(drawings)
    }
}

/// Parse ndjson text, keeping 1-based line numbers.
pub fn parse_ndjson(text: &str) -> SketchResult<Vec<(usize, RawDrawing)>> {
    text.lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line))
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(number, line)| {
            RawDrawing::from_json(line)
                .map(|raw| (number, raw))
                .map_err(|e| e.at_line(number))
        })
        .collect()
}
