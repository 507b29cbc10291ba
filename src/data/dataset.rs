use burn::data::dataset::Dataset;
use serde::{Deserialize, Serialize};

use crate::data::encoder::InkPoint;

/// One encoded sketch. `ink` has one `[Δx, Δy, pen_lift]` entry per
/// time step and is never padded; padding happens in the batcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SketchSample {
    pub ink:         Vec<InkPoint>,
    pub label:       String,
    pub label_index: usize,
}

impl SketchSample {
    pub fn new(ink: Vec<InkPoint>, label: impl Into<String>, label_index: usize) -> Self {
        Self { ink, label: label.into(), label_index }
    }

    pub fn length(&self) -> usize {
        self.ink.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ink.is_empty()
    }
}

pub struct SketchDataset {
    samples: Vec<SketchSample>,
}

impl SketchDataset {
    pub fn new(samples: Vec<SketchSample>) -> Self { Self { samples } }
}

impl Dataset<SketchSample> for SketchDataset {
    fn get(&self, index: usize) -> Option<SketchSample> {
        self.samples.get(index).cloned()
    }

    fn len(&self) -> usize {
        self.samples.len()
    }
}
