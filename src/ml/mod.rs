// ============================================================
// Layer 5 — ML / Model Layer (Burn)
// ============================================================
//
//   mask.rs       — length-aware tensor ops: validity mask,
//                   zeroing padding, masked sum, per-sample flip
//
//   recurrent.rs  — bidirectional LSTM layer whose reverse
//                   direction starts at each sample's last step
//
//   model.rs      — the sketch classifier:
//                   • 3 × Conv1d (48/64/96, k 5/5/3, same padding)
//                   • 3 × bidirectional LSTM (128 per direction)
//                   • sum over valid steps
//                   • linear head to class logits
//
//   inferencer.rs — loads a stored model, batches samples,
//                   returns logits, argmax and a full ranking

/// Validity masks and masked reductions
pub mod mask;

/// Length-aware bidirectional LSTM
pub mod recurrent;

/// Sketch classifier architecture
pub mod model;

/// Batched prediction over encoded samples
pub mod inferencer;
