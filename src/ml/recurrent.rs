// ============================================================
// Layer 5 — Length-Aware Bidirectional LSTM
// ============================================================
// One bidirectional layer built from two burn Lstm modules.
//
// The forward direction reads the padded batch as-is: padding
// only ever follows the valid steps, so it cannot reach them.
// The reverse direction reads each sample's valid prefix flipped
// (reverse_padded), so it starts at the sample's own last step
// rather than at the end of the padding, and its output is
// flipped back before the two halves are concatenated.
//
//   input  [N, L, d_input]
//   output [N, L, 2 * d_hidden]   (forward features first)

use burn::{
    nn::{Lstm, LstmConfig},
    prelude::*,
};

use crate::ml::mask::reverse_padded;

#[derive(Config, Debug)]
pub struct MaskedBiLstmConfig {
    pub d_input:  usize,
    pub d_hidden: usize,
    #[config(default = true)]
    pub bias:     bool,
}

impl MaskedBiLstmConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> MaskedBiLstm<B> {
        MaskedBiLstm {
            forward: LstmConfig::new(self.d_input, self.d_hidden, self.bias).init(device),
            reverse: LstmConfig::new(self.d_input, self.d_hidden, self.bias).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct MaskedBiLstm<B: Backend> {
    pub forward: Lstm<B>,
    pub reverse: Lstm<B>,
}

impl<B: Backend> MaskedBiLstm<B> {
    pub fn forward(&self, x: Tensor<B, 3>, lengths: Tensor<B, 1, Int>) -> Tensor<B, 3> {
        let (ahead, _) = self.forward.forward(x.clone(), None);

        let flipped     = reverse_padded(x, lengths.clone());
        let (behind, _) = self.reverse.forward(flipped, None);
        let behind      = reverse_padded(behind, lengths);

        Tensor::cat(vec![ahead, behind], 2)
    }
}
