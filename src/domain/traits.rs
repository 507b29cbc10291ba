// ============================================================
// Layer 3 — Core Traits
// ============================================================
// Abstractions the application layer programs against.
//
//   - NdjsonLoader implements DrawingSource (file on disk)
//   - tests use in-memory sources built from string literals

use crate::domain::drawing::RawDrawing;
use crate::domain::error::SketchResult;

// ─── DrawingSource ────────────────────────────────────────────────────────────
/// Anything that can hand over raw drawings in input order.
pub trait DrawingSource {
    /// Every drawing with its 1-based line number. An empty source
    /// returns an empty Vec, not an error.
    fn load_all(&self) -> SketchResult<Vec<(usize, RawDrawing)>>;
}
