// ============================================================
// Layer 4 — Data Pipeline
// ============================================================
// From an ndjson file to model-ready tensor batches:
//
//   drawing.ndjson
//       │
//       ▼
//   NdjsonLoader     → one RawDrawing per non-blank line
//       │
//       ▼
//   StrokeEncoder    → flatten, normalise, delta-encode
//       │
//       ▼
//   SketchDataset    → implements Burn's Dataset trait
//       │
//       ▼
//   SketchBatcher    → right-pads into [N, max_len, 3] + lengths
//       │
//       ▼
//   DataLoader       → feeds batches to the Inferencer

/// Reads newline-delimited JSON drawings
pub mod loader;

/// Turns raw strokes into (Δx, Δy, pen_lift) sequences
pub mod encoder;

/// Implements Burn's Dataset trait for encoded sketches
pub mod dataset;

/// Implements Burn's Batcher trait for variable-length ink
pub mod batcher;
