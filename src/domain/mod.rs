// ============================================================
// Layer 3 — Domain Layer
// ============================================================
// Plain Rust types describing what a sketch, a vocabulary and
// a failure ARE. No burn types and no file I/O in here.

// A raw ndjson drawing record
pub mod drawing;

// Ordered class labels with inverse lookup
pub mod vocabulary;

// Typed error kinds shared by every lower layer
pub mod error;

// Abstractions other layers implement
pub mod traits;
