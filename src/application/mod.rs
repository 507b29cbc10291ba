// ============================================================
// Layer 2 — Application / Use Cases
// ============================================================
// Workflow coordination only: no model math, no printing.

// The evaluation workflow: file in, per-drawing reports out
pub mod classify_use_case;
