// ============================================================
// Layer 2 — ClassifyUseCase
// ============================================================
// Orchestrates one evaluation run:
//
//   Step 1: Read the ndjson drawings      (Layer 4 - data)
//   Step 2: Encode strokes into ink       (Layer 4 - data)
//   Step 3: Set aside zero-length ink     (reported as Empty)
//   Step 4: Batch + classify the rest     (Layer 5 - ml)
//   Step 5: Merge back into input order
//
// No printing here; the CLI layer renders the outcome.

use std::path::PathBuf;

use anyhow::{Context, Result};
use burn::prelude::Backend;

use crate::data::{encoder::StrokeEncoder, loader::NdjsonLoader};
use crate::domain::traits::DrawingSource;
use crate::infra::model_store::ModelStore;
use crate::ml::inferencer::{Inferencer, Prediction};

// ─── Classification Configuration ────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct ClassifyConfig {
    pub input:      PathBuf,
    pub model_dir:  PathBuf,
    pub batch_size: usize,
    pub top_k:      usize,
}

impl Default for ClassifyConfig {
    fn default() -> Self {
        Self {
            input:      PathBuf::from("drawing.ndjson"),
            model_dir:  PathBuf::from("models"),
            batch_size: 1,
            top_k:      3,
        }
    }
}

// ─── Outcome Types ────────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq)]
pub enum SampleReport {
    /// The drawing was classified.
    Predicted { line: usize, prediction: Prediction },

    /// The drawing had fewer than two points, so there was nothing
    /// to classify.
    Empty { line: usize, label: String },
}

impl SampleReport {
    pub fn line(&self) -> usize {
        match self {
            Self::Predicted { line, .. } | Self::Empty { line, .. } => *line,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassifyOutcome {
    /// The input held no drawings at all.
    EmptyInput,
    Reports(Vec<SampleReport>),
}

// ─── ClassifyUseCase ──────────────────────────────────────────────────────────
pub struct ClassifyUseCase<B: Backend> {
    inferencer: Inferencer<B>,
    encoder:    StrokeEncoder,
    batch_size: usize,
}

impl<B: Backend> ClassifyUseCase<B> {
    /// Load vocabulary and weights from `config.model_dir`.
    pub fn new(config: &ClassifyConfig, device: B::Device) -> Result<Self> {
        let store = ModelStore::new(&config.model_dir);
        let inferencer = Inferencer::from_store(&store, device).with_context(|| {
            format!("Cannot load model from '{}'", config.model_dir.display())
        })?;
        Ok(Self::with_inferencer(inferencer, config.batch_size))
    }

    pub fn with_inferencer(inferencer: Inferencer<B>, batch_size: usize) -> Self {
        Self { inferencer, encoder: StrokeEncoder::new(), batch_size }
    }

    pub fn classify_file(&self, path: impl Into<PathBuf>) -> Result<ClassifyOutcome> {
        let path = path.into();
        self.classify(&NdjsonLoader::new(&path))
            .with_context(|| format!("Cannot classify '{}'", path.display()))
    }

    pub fn classify(&self, source: &impl DrawingSource) -> Result<ClassifyOutcome> {
        // ── Step 1: Read ─────────────────────────────────────────────────────
        let drawings = source.load_all()?;
        if drawings.is_empty() {
            tracing::info!("No drawings to classify");
            return Ok(ClassifyOutcome::EmptyInput);
        }

        // ── Steps 2-3: Encode, set aside empty ink ───────────────────────────
        let mut lines   = Vec::new();
        let mut samples = Vec::new();
        let mut reports: Vec<Option<SampleReport>> = Vec::with_capacity(drawings.len());

        for (line, raw) in &drawings {
            let sample = self
                .encoder
                .encode(raw, self.inferencer.vocabulary())
                .map_err(|e| e.at_line(*line))?;

            if sample.is_empty() {
                tracing::warn!("Line {}: drawing has fewer than two points", line);
                reports.push(Some(SampleReport::Empty { line: *line, label: sample.label }));
            } else {
                reports.push(None);
                lines.push(*line);
                samples.push(sample);
            }
        }

        // ── Step 4: Classify ─────────────────────────────────────────────────
        tracing::info!("Classifying {} drawings", samples.len());
        let predictions = self.inferencer.predict_all(samples, self.batch_size)?;

        // ── Step 5: Merge in input order ─────────────────────────────────────
        let mut predicted = lines.into_iter().zip(predictions);
        let reports = reports
            .into_iter()
            .map(|slot| match slot {
                Some(empty) => Ok(empty),
                None => predicted
                    .next()
                    .map(|(line, prediction)| SampleReport::Predicted { line, prediction })
                    .context("Model returned fewer predictions than samples"),
            })
            .collect::<Result<Vec<_>>>()?;

        let correct = reports
            .iter()
            .filter(|r| matches!(r, SampleReport::Predicted { prediction, .. } if prediction.is_correct()))
            .count();
        tracing::info!("{} of {} drawings matched their label", correct, reports.len());

        Ok(ClassifyOutcome::Reports(reports))
    }
}
