// ============================================================
// Layer 6 — Model Store
// ============================================================
// Everything inference needs to rebuild a trained classifier,
// kept side by side in one directory:
//
//   models/
//     classes.txt          ← one label per line, line = class index
//     model_config.json    ← SketchClassifierConfig
//     model.mpk            ← weights, Burn CompactRecorder
//
// The config is read first so the model can be rebuilt with the
// right shape before the weights are loaded into it.

use std::{fs, path::PathBuf};

use burn::{
    prelude::*,
    record::{CompactRecorder, Recorder},
};

use crate::domain::error::{SketchError, SketchResult};
use crate::domain::vocabulary::ClassVocabulary;
use crate::ml::model::{SketchClassifier, SketchClassifierConfig};

pub const CLASSES_FILE: &str = "classes.txt";
pub const CONFIG_FILE:  &str = "model_config.json";
/// Recorder adds the `.mpk` extension
pub const WEIGHTS_FILE: &str = "model";

pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write vocabulary, config and weights. The directory is
    /// created if needed.
    #[cfg(test)]
    pub fn save<B: Backend>(
        &self,
        model:  &SketchClassifier<B>,
        config: &SketchClassifierConfig,
        vocab:  &ClassVocabulary,
    ) -> SketchResult<()> {
        if config.num_classes != vocab.len() {
            return Err(SketchError::shape("class count", vocab.len(), config.num_classes));
        }
        fs::create_dir_all(&self.dir).map_err(|source| SketchError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let classes = self.dir.join(CLASSES_FILE);
        let mut text = vocab.labels().join("\n");
        text.push('\n');
        fs::write(&classes, text).map_err(|source| SketchError::Io { path: classes, source })?;

        let config_path = self.dir.join(CONFIG_FILE);
        config
            .save(&config_path)
            .map_err(|source| SketchError::Io { path: config_path, source })?;

        let weights = self.dir.join(WEIGHTS_FILE);
        CompactRecorder::new()
            .record(model.clone().into_record(), weights.clone())
            .map_err(|e| {
                SketchError::Record(format!("cannot save '{}': {e:?}", weights.display()))
            })?;

        tracing::debug!("Saved model to '{}'", self.dir.display());
        Ok(())
    }

    pub fn load_vocabulary(&self) -> SketchResult<ClassVocabulary> {
        let path = self.dir.join(CLASSES_FILE);
        let text = fs::read_to_string(&path).map_err(|source| SketchError::Io {
            path: path.clone(),
            source,
        })?;

        let vocab = ClassVocabulary::parse(&text)?;
        if vocab.is_empty() {
            return Err(SketchError::Config(format!("'{}' lists no classes", path.display())));
        }
        Ok(vocab)
    }

    /// Read the config and make sure it is the sketch architecture.
    pub fn load_config(&self) -> SketchResult<SketchClassifierConfig> {
        let path   = self.dir.join(CONFIG_FILE);
        let config = SketchClassifierConfig::load(&path).map_err(|e| {
            SketchError::Config(format!("cannot read '{}': {e:?}", path.display()))
        })?;
        config.check_architecture()?;
        Ok(config)
    }

    /// Build a model from `config` and load the stored weights into it.
    pub fn load_model<B: Backend>(
        &self,
        config: &SketchClassifierConfig,
        device: &B::Device,
    ) -> SketchResult<SketchClassifier<B>> {
        let path = self.dir.join(WEIGHTS_FILE);
        tracing::info!("Loading weights from '{}'", path.display());

        let record = CompactRecorder::new()
            .load(path.clone(), device)
            .map_err(|e| {
                SketchError::Record(format!("cannot load '{}': {e:?}", path.display()))
            })?;

        Ok(config.init::<B>(device).load_record(record))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;
    use tempfile::TempDir;

    use crate::data::dataset::SketchSample;
    use crate::ml::inferencer::Inferencer;

    type TestBackend = NdArray;

    fn vocab() -> ClassVocabulary {
        ClassVocabulary::new(["cat", "dog", "square"]).unwrap()
    }

    #[test]
    fn test_round_trip_keeps_predictions() {
        let temp_dir = TempDir::new().unwrap();
        let store    = ModelStore::new(temp_dir.path());
        let device   = Default::default();
        let config   = SketchClassifierConfig::new(3);
        let model    = config.init::<TestBackend>(&device);

        store.save(&model, &config, &vocab()).unwrap();
        assert!(temp_dir.path().join("model.mpk").exists());

        let sample = SketchSample::new(
            vec![[0.5, 0.0, 0.0], [0.0, 0.5, 1.0], [-0.5, 0.0, 0.0], [0.0, -0.5, 1.0]],
            "dog",
            1,
        );
        let before = Inferencer::new(model, vocab(), device)
            .unwrap()
            .predict_all(vec![sample.clone()], 1)
            .unwrap();
        let after = Inferencer::<TestBackend>::from_store(&store, device)
            .unwrap()
            .predict_all(vec![sample], 1)
            .unwrap();

        assert_eq!(after[0].logits.len(), 3);
        for (a, b) in before[0].logits.iter().zip(&after[0].logits) {
            // CompactRecorder stores half precision
            assert!((a - b).abs() < 0.05, "{a} vs {b}");
        }
    }

    #[test]
    fn test_vocabulary_file_order_is_index_order() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CLASSES_FILE), "square\ncat\n").unwrap();

        let vocab = ModelStore::new(temp_dir.path()).load_vocabulary().unwrap();
        assert_eq!(vocab.index_of("square"), Some(0));
        assert_eq!(vocab.index_of("cat"), Some(1));
    }

    #[test]
    fn test_empty_vocabulary_file_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CLASSES_FILE), "").unwrap();

        let err = ModelStore::new(temp_dir.path()).load_vocabulary().unwrap_err();
        assert!(matches!(err, SketchError::Config(_)));
    }

    #[test]
    fn test_foreign_architecture_is_rejected() {
        let temp_dir = TempDir::new().unwrap();
        SketchClassifierConfig::new(3)
            .with_num_layers(2)
            .save(temp_dir.path().join(CONFIG_FILE))
            .unwrap();

        let err = ModelStore::new(temp_dir.path()).load_config().unwrap_err();
        assert!(matches!(err, SketchError::ShapeMismatch { expected: 3, actual: 2, .. }));
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let err = ModelStore::new("/no/such/model/dir").load_vocabulary().unwrap_err();
        assert!(matches!(err, SketchError::Io { .. }));
    }

    #[test]
    fn test_save_rejects_class_count_mismatch() {
        let temp_dir = TempDir::new().unwrap();
        let config   = SketchClassifierConfig::new(4);
        let model    = config.init::<TestBackend>(&Default::default());
        let err = ModelStore::new(temp_dir.path())
            .save(&model, &config, &vocab())
            .unwrap_err();
        assert!(matches!(err, SketchError::ShapeMismatch { .. }));
    }
}
