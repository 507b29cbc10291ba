use burn::{
    nn::{
        conv::{Conv1d, Conv1dConfig},
        Dropout, DropoutConfig,
        Linear, LinearConfig,
        PaddingConfig1d,
    },
    prelude::*,
};

use crate::domain::error::{SketchError, SketchResult};
use crate::ml::mask::{masked_sum, zero_padding};
use crate::ml::recurrent::{MaskedBiLstm, MaskedBiLstmConfig};

/// Δx, Δy, pen_lift
pub const INK_CHANNELS: usize = 3;

/// Whether dropout is active. Passed to every forward call; the
/// model itself carries no train/eval flag. Burn only drops
/// activations on autodiff backends, so Training on a plain
/// backend behaves like Inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ForwardMode {
    #[cfg_attr(not(test), allow(dead_code))]
    Training,
    #[default]
    Inference,
}

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct SketchClassifierConfig {
    pub num_classes:  usize,
    #[config(default = "[48, 64, 96]")]
    pub conv_filters: [usize; 3],
    #[config(default = "[5, 5, 3]")]
    pub conv_kernels: [usize; 3],
    #[config(default = 128)]
    pub hidden_size:  usize,
    #[config(default = 3)]
    pub num_layers:   usize,
    #[config(default = 0.3)]
    pub dropout:      f64,
}

impl SketchClassifierConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> SketchClassifier<B> {
        let mut channels_in = INK_CHANNELS;
        let convs: Vec<Conv1d<B>> = self
            .conv_filters
            .iter()
            .zip(self.conv_kernels)
            .map(|(&filters, kernel)| {
                let conv = Conv1dConfig::new(channels_in, filters, kernel)
                    .with_padding(PaddingConfig1d::Explicit(kernel / 2))
                    .init(device);
                channels_in = filters;
                conv
            })
            .collect();

        let recurrent: Vec<MaskedBiLstm<B>> = (0..self.num_layers)
            .map(|layer| {
                let d_input = if layer == 0 { channels_in } else { 2 * self.hidden_size };
                MaskedBiLstmConfig::new(d_input, self.hidden_size).init(device)
            })
            .collect();

        let head    = LinearConfig::new(2 * self.hidden_size, self.num_classes).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();

        SketchClassifier {
            convs, recurrent, head, dropout,
            num_classes: self.num_classes,
        }
    }

    /// Fail unless this config describes the fixed sketch architecture:
    /// conv 48/64/96 with kernels 5/5/3, 3 bidirectional layers of 128.
    pub fn check_architecture(&self) -> SketchResult<()> {
        let reference = Self::new(self.num_classes);
        let pairs = reference
            .conv_filters
            .iter()
            .zip(&self.conv_filters)
            .enumerate()
            .map(|(i, (e, a))| (format!("conv {} filters", i + 1), *e, *a))
            .chain(
                reference
                    .conv_kernels
                    .iter()
                    .zip(&self.conv_kernels)
                    .enumerate()
                    .map(|(i, (e, a))| (format!("conv {} kernel", i + 1), *e, *a)),
            )
            .chain([
                ("hidden_size".to_string(), reference.hidden_size, self.hidden_size),
                ("num_layers".to_string(), reference.num_layers, self.num_layers),
            ]);

        for (what, expected, actual) in pairs {
            if expected != actual {
                return Err(SketchError::shape(what, expected, actual));
            }
        }
        Ok(())
    }
}

#[derive(Module, Debug)]
pub struct SketchClassifier<B: Backend> {
    pub convs:       Vec<Conv1d<B>>,
    pub recurrent:   Vec<MaskedBiLstm<B>>,
    pub head:        Linear<B>,
    pub dropout:     Dropout,
    pub num_classes: usize,
}

impl<B: Backend> SketchClassifier<B> {
    /// ink: [batch, seq_len, 3], lengths: [batch] → logits [batch, num_classes]
    pub fn forward(
        &self,
        ink:     Tensor<B, 3>,
        lengths: Tensor<B, 1, Int>,
        mode:    ForwardMode,
    ) -> Tensor<B, 2> {
        let [batch_size, _, _] = ink.dims();
        assert_eq!(
            lengths.dims()[0], batch_size,
            "lengths must hold one entry per sample in the batch"
        );

        // Conv1d wants [batch, channels, time]. Padded steps are cleared
        // after every conv so the next kernel sees the same zeros an
        // unpadded sample would.
        let last_conv = self.convs.len().saturating_sub(1);
        let mut x = ink.swap_dims(1, 2);
        for (i, conv) in self.convs.iter().enumerate() {
            x = conv.forward(x);
            x = zero_padding(x.swap_dims(1, 2), lengths.clone()).swap_dims(1, 2);
            if i < last_conv {
                x = self.apply_dropout(x, mode);
            }
        }
        let mut x = x.swap_dims(1, 2); // [batch, seq_len, conv_filters[2]]

        for (i, layer) in self.recurrent.iter().enumerate() {
            if i > 0 {
                x = self.apply_dropout(x, mode);
            }
            x = layer.forward(x, lengths.clone());
        }
        // x: [batch, seq_len, 2 * hidden_size]

        self.head.forward(masked_sum(x, lengths))
    }

    fn apply_dropout<const D: usize>(&self, x: Tensor<B, D>, mode: ForwardMode) -> Tensor<B, D> {
        match mode {
            ForwardMode::Training  => self.dropout.forward(x),
            ForwardMode::Inference => x,
        }
    }
}
