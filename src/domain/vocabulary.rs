// ============================================================
// Layer 3 — Class Vocabulary
// ============================================================
// The ordered list of labels the model was trained on.
// Index = 0-based position in the source list, and it must be
// the same order the weights were produced with, so the list
// is loaded once and never reordered.

use std::collections::HashMap;

use crate::domain::error::{SketchError, SketchResult};

#[derive(Debug, Clone, PartialEq)]
pub struct ClassVocabulary {
    labels:   Vec<String>,
    by_label: HashMap<String, usize>,
}

impl ClassVocabulary {
    /// Build from labels in index order. Blank and duplicate
    /// labels are rejected; the error line is the 1-based position.
    pub fn new<I, S>(labels: I) -> SketchResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut ordered  = Vec::new();
        let mut by_label = HashMap::new();

        for (index, label) in labels.into_iter().enumerate() {
            let label: String = label.into();
            if label.is_empty() {
                return Err(SketchError::malformed(index + 1, "blank class label"));
            }
            if by_label.insert(label.clone(), index).is_some() {
                return Err(SketchError::malformed(
                    index + 1,
                    format!("duplicate class label '{label}'"),
                ));
            }
            ordered.push(label);
        }

        Ok(Self { labels: ordered, by_label })
    }

    /// One label per line, surrounding whitespace trimmed.
    pub fn parse(text: &str) -> SketchResult<Self> {
        Self::new(text.lines().map(str::trim))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.by_label.get(label).copied()
    }

    #[cfg(test)]
    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}
