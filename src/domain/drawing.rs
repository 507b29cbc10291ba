// ============================================================
// Layer 3 — Raw Drawing Domain Type
// ============================================================
// One line of the ndjson input, exactly as the game sends it:
//
//   {"word": "square", "drawing": [[[0, 10], [0, 0]], [[10, 10], [0, 10]]]}
//
// `drawing` is an ordered list of strokes. Each stroke is a list
// of parallel coordinate arrays: x values, then y values, and in
// the raw Quick, Draw! export an optional third array of
// timestamps, which we ignore.

use serde::{Deserialize, Serialize};

use crate::domain::error::{SketchError, SketchResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDrawing {
    /// Ground-truth label
    pub word: String,

    /// Strokes as `[xs, ys, (ts)]`
    pub drawing: Vec<Vec<Vec<f32>>>,
}

/// Borrowed view of one validated stroke.
#[derive(Debug, Clone, Copy)]
pub struct Stroke<'a> {
    pub xs: &'a [f32],
    pub ys: &'a [f32],
}

impl RawDrawing {
    #[cfg(test)]
    pub fn new(word: impl Into<String>, drawing: Vec<Vec<Vec<f32>>>) -> Self {
        Self { word: word.into(), drawing }
    }

    /// Parse one ndjson line. The line number in the error is 0;
    /// the loader fills in the real one.
    pub fn from_json(line: &str) -> SketchResult<Self> {
        serde_json::from_str(line).map_err(|e| SketchError::malformed(0, e.to_string()))
    }

    /// Check every stroke and hand back borrowed x/y slices.
    /// Coordinates too large for f32 arrive as infinities and are
    /// rejected here, before normalisation can turn them into NaN.
    pub fn strokes(&self) -> SketchResult<Vec<Stroke<'_>>> {
        self.drawing
            .iter()
            .enumerate()
            .map(|(i, stroke)| match stroke.as_slice() {
                [xs, ys, ..] if xs.len() != ys.len() => Err(SketchError::malformed(
                    0,
                    format!(
                        "stroke {i} has {} x values but {} y values",
                        xs.len(),
                        ys.len()
                    ),
                )),
                [xs, ys, ..] if xs.iter().chain(ys.iter()).all(|v| v.is_finite()) => {
                    Ok(Stroke { xs, ys })
                }
                [_, _, ..] => Err(SketchError::malformed(
                    0,
                    format!("stroke {i} has a coordinate outside the f32 range"),
                )),
                _ => Err(SketchError::malformed(
                    0,
                    format!("stroke {i} needs x and y arrays, found {}", stroke.len()),
                )),
            })
            .collect()
    }

    pub fn total_points(&self) -> usize {
        self.drawing
            .iter()
            .map(|stroke| stroke.first().map_or(0, Vec::len))
            .sum()
    }
}
