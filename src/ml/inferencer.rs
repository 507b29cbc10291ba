// ============================================================
// Layer 5 — Inferencer
// ============================================================
// Owns a loaded classifier plus its vocabulary and turns encoded
// samples into predictions:
//
//   samples ─▶ DataLoader(SketchBatcher) ─▶ forward(Inference)
//           ─▶ softmax + argmax ─▶ Prediction per sample
//
// Every prediction carries the full logits and a ranking of all
// labels, so callers can apply their own acceptance threshold.

use burn::{
    data::dataloader::DataLoaderBuilder,
    prelude::*,
};

use crate::data::batcher::{SketchBatch, SketchBatcher};
use crate::data::dataset::{SketchDataset, SketchSample};
use crate::domain::error::{SketchError, SketchResult};
use crate::domain::vocabulary::ClassVocabulary;
use crate::infra::model_store::ModelStore;
use crate::ml::model::{ForwardMode, SketchClassifier};

pub type CpuBackend = burn::backend::NdArray;
pub type GpuBackend = burn::backend::Wgpu;

/// One label's position in a prediction's ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedLabel {
    pub index:       usize,
    pub label:       String,
    pub logit:       f32,
    pub probability: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    pub logits:          Vec<f32>,
    pub predicted_index: usize,
    pub predicted_label: String,
    pub expected_index:  usize,
    pub expected_label:  String,
    /// All labels, highest logit first
    pub ranking:         Vec<RankedLabel>,
}

impl Prediction {
    pub fn is_correct(&self) -> bool {
        self.predicted_index == self.expected_index
    }

    /// The `k` best labels.
    pub fn top(&self, k: usize) -> &[RankedLabel] {
        &self.ranking[..k.min(self.ranking.len())]
    }

    /// Where the expected label landed in the ranking (0 = top-1).
    pub fn expected_rank(&self) -> Option<usize> {
        self.ranking.iter().position(|r| r.index == self.expected_index)
    }
}

pub struct Inferencer<B: Backend> {
    model:  SketchClassifier<B>,
    vocab:  ClassVocabulary,
    device: B::Device,
}

impl<B: Backend> Inferencer<B> {
    pub fn new(
        model:  SketchClassifier<B>,
        vocab:  ClassVocabulary,
        device: B::Device,
    ) -> SketchResult<Self> {
        if model.num_classes != vocab.len() {
            return Err(SketchError::shape("class count", vocab.len(), model.num_classes));
        }
        Ok(Self { model, vocab, device })
    }

    pub fn from_store(store: &ModelStore, device: B::Device) -> SketchResult<Self> {
        let vocab  = store.load_vocabulary()?;
        let config = store.load_config()?;
        let model  = store.load_model::<B>(&config, &device)?;
        tracing::info!("Model loaded: {} classes", vocab.len());
        Self::new(model, vocab, device)
    }

    pub fn vocabulary(&self) -> &ClassVocabulary {
        &self.vocab
    }

    /// Run every sample through the model, `batch_size` at a time,
    /// keeping input order. Samples must not be empty.
    pub fn predict_all(
        &self,
        samples:    Vec<SketchSample>,
        batch_size: usize,
    ) -> SketchResult<Vec<Prediction>> {
        if samples.is_empty() {
            return Ok(Vec::new());
        }

        let loader = DataLoaderBuilder::new(SketchBatcher::<B>::new(self.device.clone()))
            .batch_size(batch_size.max(1))
            .build(SketchDataset::new(samples));

        let mut predictions = Vec::new();
        for batch in loader.iter() {
            predictions.extend(self.predict_batch(batch)?);
        }
        Ok(predictions)
    }

    pub fn predict_batch(&self, batch: SketchBatch<B>) -> SketchResult<Vec<Prediction>> {
        let batch_size  = batch.batch_size();
        let num_classes = self.vocab.len();
        tracing::debug!("Batch of {} drawings, max_len={}", batch_size, batch.max_len);

        let logits = self.model.forward(batch.ink, batch.lengths, ForwardMode::Inference);
        let probs  = burn::tensor::activation::softmax(logits.clone(), 1);
        // argmax(1) returns [batch, 1]
        let predicted = logits.clone().argmax(1).flatten::<1>(0, 1);

        let logits    = to_f32(logits)?;
        let probs     = to_f32(probs)?;
        let predicted = predicted
            .into_data()
            .convert::<i64>()
            .to_vec::<i64>()
            .map_err(|e| SketchError::TensorData(format!("{e:?}")))?;
        let expected  = batch
            .label_indices
            .into_data()
            .convert::<i64>()
            .to_vec::<i64>()
            .map_err(|e| SketchError::TensorData(format!("{e:?}")))?;

        let predictions: Vec<Prediction> = (0..batch_size)
            .map(|i| {
                let row_logits = logits[i * num_classes..(i + 1) * num_classes].to_vec();
                let row_probs  = &probs[i * num_classes..(i + 1) * num_classes];
                let predicted_index = predicted[i] as usize;
                let expected_index  = expected[i] as usize;

                Prediction {
                    ranking:         self.rank(&row_logits, row_probs),
                    predicted_label: self.label(predicted_index),
                    expected_label:  batch.labels[i].clone(),
                    logits:          row_logits,
                    predicted_index,
                    expected_index,
                }
            })
            .collect();

        for p in &predictions {
            tracing::debug!(
                "predicted '{}' ({}), expected '{}' ({})",
                p.predicted_label, p.predicted_index, p.expected_label, p.expected_index
            );
        }

        Ok(predictions)
    }

    fn rank(&self, logits: &[f32], probs: &[f32]) -> Vec<RankedLabel> {
        let mut ranking: Vec<RankedLabel> = logits
            .iter()
            .zip(probs)
            .enumerate()
            .map(|(index, (&logit, &probability))| RankedLabel {
                index,
                label: self.label(index),
                logit,
                probability,
            })
            .collect();
        ranking.sort_by(|a, b| b.logit.total_cmp(&a.logit));
        ranking
    }

    fn label(&self, index: usize) -> String {
        self.vocab.label(index).unwrap_or_default().to_string()
    }
}

fn to_f32<B: Backend, const D: usize>(tensor: Tensor<B, D>) -> SketchResult<Vec<f32>> {
    tensor
        .into_data()
        .convert::<f32>()
        .to_vec::<f32>()
        .map_err(|e| SketchError::TensorData(format!("{e:?}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::module::Param;

    use crate::data::encoder::StrokeEncoder;
    use crate::domain::drawing::RawDrawing;
    use crate::ml::model::SketchClassifierConfig;

    type TestBackend = CpuBackend;

    fn vocab() -> ClassVocabulary {
        ClassVocabulary::new(["cat", "dog", "square"]).unwrap()
    }

    /// A classifier whose head bias drowns out everything but "square".
    fn square_biased() -> Inferencer<TestBackend> {
        let device    = Default::default();
        let mut model = SketchClassifierConfig::new(3).init::<TestBackend>(&device);
        model.head.bias = Some(Param::from_tensor(Tensor::from_floats(
            [0.0, 0.0, 1000.0],
            &device,
        )));
        Inferencer::new(model, vocab(), device).unwrap()
    }

    fn encode(line: &str) -> SketchSample {
        let raw = RawDrawing::from_json(line).unwrap();
        StrokeEncoder::new().encode(&raw, &vocab()).unwrap()
    }

    #[test]
    fn test_biased_head_predicts_square() {
        let inferencer = square_biased();
        let samples = vec![
            encode(r#"{"word":"cat","drawing":[[[0,5,9,3],[1,7,2,2]]]}"#),
            encode(r#"{"word":"square","drawing":[[[0,10],[0,0]],[[10,10],[0,10]]]}"#),
        ];

        let predictions = inferencer.predict_all(samples, 1).unwrap();
        assert_eq!(predictions.len(), 2);
        for p in &predictions {
            assert_eq!(p.predicted_label, "square");
            assert_eq!(p.predicted_index, 2);
            assert_eq!(p.ranking[0].label, "square");
            assert_eq!(p.logits.len(), 3);
        }
        assert_eq!(predictions[0].expected_label, "cat");
        assert!(!predictions[0].is_correct());
        assert!(predictions[1].is_correct());
    }

    #[test]
    fn test_ranking_is_sorted_and_complete() {
        let inferencer = square_biased();
        let sample = encode(r#"{"word":"dog","drawing":[[[0,5,9],[1,7,2]]]}"#);
        let p = &inferencer.predict_all(vec![sample], 1).unwrap()[0];

        assert_eq!(p.ranking.len(), 3);
        assert!(p.ranking.windows(2).all(|w| w[0].logit >= w[1].logit));
        let total: f32 = p.ranking.iter().map(|r| r.probability).sum();
        assert!((total - 1.0).abs() < 1e-4);
        assert_eq!(p.top(2).len(), 2);
        assert_eq!(p.top(10).len(), 3);
        assert!(p.expected_rank().is_some_and(|rank| rank > 0));
    }

    #[test]
    fn test_batch_size_does_not_change_predictions() {
        let inferencer = square_biased();
        let samples = vec![
            encode(r#"{"word":"cat","drawing":[[[0,5,9,3],[1,7,2,2]]]}"#),
            encode(r#"{"word":"dog","drawing":[[[4,4,8],[0,9,9]],[[1,2],[1,2]]]}"#),
            encode(r#"{"word":"square","drawing":[[[0,10],[0,0]],[[10,10],[0,10]]]}"#),
        ];

        let one_by_one = inferencer.predict_all(samples.clone(), 1).unwrap();
        let together   = inferencer.predict_all(samples, 3).unwrap();
        for (a, b) in one_by_one.iter().zip(&together) {
            assert_eq!(a.expected_label, b.expected_label);
            for (x, y) in a.logits.iter().zip(&b.logits) {
                assert!((x - y).abs() < 1e-3, "{x} vs {y}");
            }
        }
    }

    #[test]
    fn test_class_count_must_match_vocabulary() {
        let device = Default::default();
        let model  = SketchClassifierConfig::new(4).init::<TestBackend>(&device);
        let err    = Inferencer::new(model, vocab(), device).err().unwrap();
        assert!(matches!(err, SketchError::ShapeMismatch { expected: 3, actual: 4, .. }));
    }
}
