// ============================================================
// Layer 5 — Length-Aware Tensor Ops
// ============================================================
// Everything that needs to know where a sample ends:
//
//   sequence_mask   mask[i, t] = t < lengths[i]
//   zero_padding    clear steps at or past lengths[i]
//   masked_sum      pool over the valid steps only
//   reverse_padded  flip each sample's valid prefix
//
// Masks are built by comparing a [N, M] grid of time indices with
// a [N, M] broadcast of the lengths, so each row is a contiguous
// true-prefix of exactly lengths[i] entries.

use burn::prelude::*;

/// Boolean validity mask, shape [N, max_len]. `max_len` defaults
/// to the longest length in the vector.
pub fn sequence_mask<B: Backend>(
    lengths: Tensor<B, 1, Int>,
    max_len: Option<usize>,
) -> Tensor<B, 2, Bool> {
    let [batch_size] = lengths.dims();
    let device       = lengths.device();
    let max_len      = max_len.unwrap_or_else(|| longest(&lengths));

    if max_len == 0 {
        return Tensor::<B, 2, Int>::zeros([batch_size, 0], &device).equal_elem(1);
    }

    let steps = Tensor::<B, 1, Int>::arange(0..max_len as i64, &device)
        .unsqueeze::<2>()
        .expand([batch_size, max_len]);
    let limits = lengths
        .unsqueeze_dim::<2>(1)
        .expand([batch_size, max_len]);

    steps.lower(limits)
}

/// Zero every padded time step of `features` [N, L, D].
pub fn zero_padding<B: Backend>(features: Tensor<B, 3>, lengths: Tensor<B, 1, Int>) -> Tensor<B, 3> {
    let [batch_size, seq_len, d_features] = features.dims();

    let padding = sequence_mask(lengths, Some(seq_len))
        .bool_not()
        .unsqueeze_dim::<3>(2)
        .expand([batch_size, seq_len, d_features]);

    features.mask_fill(padding, 0.0)
}

/// Zero padded steps of `features` [N, L, D] and sum the rest
/// over time, giving [N, D].
pub fn masked_sum<B: Backend>(features: Tensor<B, 3>, lengths: Tensor<B, 1, Int>) -> Tensor<B, 2> {
    let [batch_size, _, d_features] = features.dims();

    zero_padding(features, lengths)
        .sum_dim(1)
        .reshape([batch_size, d_features])
}

/// Reverse the valid prefix of every sample in place, leaving the
/// padding where it is: step t of sample i reads step
/// `lengths[i] - 1 - t` while t < lengths[i], else step t.
/// Applying it twice gives back the input.
pub fn reverse_padded<B: Backend>(features: Tensor<B, 3>, lengths: Tensor<B, 1, Int>) -> Tensor<B, 3> {
    let [batch_size, seq_len, d_features] = features.dims();
    if seq_len == 0 {
        return features;
    }

    let device = features.device();
    let steps  = Tensor::<B, 1, Int>::arange(0..seq_len as i64, &device)
        .unsqueeze::<2>()
        .expand([batch_size, seq_len]);
    let limits = lengths
        .unsqueeze_dim::<2>(1)
        .expand([batch_size, seq_len]);

    let valid    = steps.clone().lower(limits.clone());
    let mirrored = limits.sub_scalar(1).sub(steps.clone());
    let source   = steps
        .mask_where(valid, mirrored)
        .unsqueeze_dim::<3>(2)
        .expand([batch_size, seq_len, d_features]);

    features.gather(1, source)
}

fn longest<B: Backend>(lengths: &Tensor<B, 1, Int>) -> usize {
    if lengths.dims()[0] == 0 {
        return 0;
    }
    lengths.clone().max().into_scalar().elem::<i64>().max(0) as usize
}
