// ============================================================
// Layer 1 — CLI Arguments
// ============================================================
// The single positional argument is the ndjson file to classify;
// everything else has a default so the game can call
//
//   sketch-rater drawing.ndjson
//
// and parse the output positionally.

use std::path::PathBuf;

use clap::{Args, ValueEnum};

use crate::application::classify_use_case::ClassifyConfig;

/// Where the forward pass runs.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeviceKind {
    /// NdArray backend
    #[default]
    Cpu,
    /// Wgpu backend, default adapter
    Gpu,
}

#[derive(Args, Debug)]
pub struct ClassifyArgs {
    /// Path to the newline-delimited JSON drawings
    pub input: PathBuf,

    /// Directory holding classes.txt, model_config.json and model.mpk
    #[arg(long, default_value = "models")]
    pub model_dir: PathBuf,

    /// Backend to run the model on
    #[arg(long, value_enum, default_value_t = DeviceKind::Cpu)]
    pub device: DeviceKind,

    /// Drawings per forward pass
    #[arg(long, default_value_t = 1)]
    pub batch_size: usize,

    /// Ranked labels printed under each prediction (0 = none)
    #[arg(long, default_value_t = 3)]
    pub top_k: usize,
}

/// The application layer never sees clap types.
impl From<&ClassifyArgs> for ClassifyConfig {
    fn from(a: &ClassifyArgs) -> Self {
        ClassifyConfig {
            input:      a.input.clone(),
            model_dir:  a.model_dir.clone(),
            batch_size: a.batch_size.max(1),
            top_k:      a.top_k,
        }
    }
}
