// ============================================================
// Layer 4 — Sketch Batcher
// ============================================================
// Implements Burn's Batcher trait to turn a Vec<SketchSample>
// of different lengths into one right-padded tensor batch.
//
//   Input:  N samples, sample i has lengths[i] time steps
//   Output: ink [N, max_len, 3], zero beyond lengths[i]
//           lengths [N], label_indices [N], labels (N strings)
//
// The batch size is whatever the caller hands in. Samples keep
// their input order; nothing is truncated or left-padded.

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::SketchSample;

// ─── SketchBatch ──────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct SketchBatch<B: Backend> {
    /// Padded ink — shape: [batch_size, max_len, 3]
    pub ink: Tensor<B, 3>,

    /// True length of each sample — shape: [batch_size]
    pub lengths: Tensor<B, 1, Int>,

    /// Vocabulary index of each ground-truth label — shape: [batch_size]
    pub label_indices: Tensor<B, 1, Int>,

    /// Ground-truth labels, same order as the rows of `ink`
    pub labels: Vec<String>,

    /// Longest sample in the batch
    pub max_len: usize,
}

impl<B: Backend> SketchBatch<B> {
    pub fn batch_size(&self) -> usize {
        self.labels.len()
    }
}

// ─── SketchBatcher ────────────────────────────────────────────────────────────
#[derive(Clone, Debug)]
pub struct SketchBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> SketchBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<SketchSample, SketchBatch<B>> for SketchBatcher<B> {
    fn batch(&self, items: Vec<SketchSample>) -> SketchBatch<B> {
        let batch_size = items.len();
        let max_len    = items.iter().map(SketchSample::length).max().unwrap_or(0);

        // ── Right-pad every sample into one flat buffer ───────────────────────
        let row_width    = max_len * 3;
        let mut ink_flat = vec![0.0f32; batch_size * row_width];
        for (row, sample) in ink_flat.chunks_exact_mut(row_width.max(1)).zip(&items) {
            for (slot, value) in row.iter_mut().zip(sample.ink.iter().flatten()) {
                *slot = *value;
            }
        }

        let lengths: Vec<i32> = items
            .iter()
            .map(|s| s.length() as i32)
            .collect();

        let label_indices: Vec<i32> = items
            .iter()
            .map(|s| s.label_index as i32)
            .collect();

        let ink = Tensor::<B, 3>::from_data(
            TensorData::new(ink_flat, [batch_size, max_len, 3]),
            &self.device,
        );

        let lengths = Tensor::<B, 1, Int>::from_ints(
            lengths.as_slice(), &self.device
        );

        let label_indices = Tensor::<B, 1, Int>::from_ints(
            label_indices.as_slice(), &self.device
        );

        tracing::trace!("Collated {} samples, max_len={}", batch_size, max_len);

        SketchBatch {
            ink,
            lengths,
            label_indices,
            labels: items.into_iter().map(|s| s.label).collect(),
            max_len,
        }
    }
}
