// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses arguments, picks the backend, runs ClassifyUseCase and
// prints the outcome. Output contract relied on by the game:
//
//   - the predicted label is printed alone on its own line, and
//     it is the last non-empty line of its block (the game drops
//     blank lines and reads the final one)
//   - an empty file (or a drawing with < 2 points) prints a line
//     that reads exactly `Empty`
//
// Logging goes to stderr so stdout carries only the report.

pub mod commands;

use anyhow::Result;
use burn::prelude::Backend;
use clap::Parser;
use commands::{ClassifyArgs, DeviceKind};

use crate::application::classify_use_case::{
    ClassifyConfig, ClassifyOutcome, ClassifyUseCase, SampleReport,
};
use crate::ml::inferencer::{CpuBackend, GpuBackend, Prediction};

#[derive(Parser, Debug)]
#[command(
    name = "sketch-rater",
    version,
    about = "Classify hand-drawn sketches from an ndjson file of pen strokes."
)]
pub struct Cli {
    #[command(flatten)]
    pub args: ClassifyArgs,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let config = ClassifyConfig::from(&self.args);
        tracing::info!("Running on {:?}", self.args.device);

        let lines = match self.args.device {
            DeviceKind::Cpu => classify::<CpuBackend>(&config, Default::default())?,
            DeviceKind::Gpu => classify::<GpuBackend>(&config, Default::default())?,
        };

        for line in lines {
            println!("{line}");
        }
        Ok(())
    }
}

fn classify<B: Backend>(config: &ClassifyConfig, device: B::Device) -> Result<Vec<String>> {
    let use_case = ClassifyUseCase::<B>::new(config, device)?;
    let outcome  = use_case.classify_file(&config.input)?;
    Ok(render_outcome(&outcome, config.top_k))
}

// ─── Rendering ────────────────────────────────────────────────────────────────

pub fn render_outcome(outcome: &ClassifyOutcome, top_k: usize) -> Vec<String> {
    match outcome {
        ClassifyOutcome::EmptyInput => vec![
            "Empty drawing sent for evaluation".to_string(),
            "Empty".to_string(),
        ],
        ClassifyOutcome::Reports(reports) => reports
            .iter()
            .flat_map(|report| render_report(report, top_k))
            .collect(),
    }
}

fn render_report(report: &SampleReport, top_k: usize) -> Vec<String> {
    match report {
        SampleReport::Empty { .. } => vec![
            format!("Empty drawing on line {} sent for evaluation", report.line()),
            "Empty".to_string(),
            String::new(),
        ],
        SampleReport::Predicted { prediction, .. } => render_prediction(prediction, top_k),
    }
}

fn render_prediction(p: &Prediction, top_k: usize) -> Vec<String> {
    let logits = p
        .logits
        .iter()
        .map(|l| format!("{l:.4}"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut lines = vec![
        format!("Logits:   [{logits}]"),
        format!("Result:   {}", p.predicted_index),
        format!("Expected: {}", p.expected_index),
    ];

    lines.extend(p.top(top_k).iter().enumerate().map(|(rank, r)| {
        format!(
            "   #{:<2} {:<20} logit={:>10.4}  p={:.4}",
            rank + 1, r.label, r.logit, r.probability
        )
    }));
    if let Some(rank) = p.expected_rank() {
        lines.push(format!("Expected label ranked #{}", rank + 1));
    }
    lines.extend([
        String::new(),
        format!(" --> PREDICTED CLASS:  {}", p.predicted_label),
        p.predicted_label.clone(),
        String::new(),
    ]);
    lines
}
