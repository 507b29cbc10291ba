// ============================================================
// Layer 6 — Infrastructure Layer
// ============================================================
//
//   model_store.rs — the model directory: class vocabulary,
//                    SketchClassifierConfig as JSON and the
//                    weights as a Burn CompactRecorder record.
//                    Inference rebuilds the model from the
//                    config before loading weights into it.

/// Vocabulary, config and weight persistence
pub mod model_store;
