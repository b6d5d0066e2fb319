use std::path::Path;

use anyhow::Context;

use crate::LensError;

/// Ordered label vocabulary, index-aligned with the model's output vector.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a newline-delimited label list. Line endings are stripped and blank lines
    /// skipped; label text is otherwise kept as written.
    pub fn parse(text: &str) -> Self {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        Self::new(
            text.lines()
                .map(|line| line.trim_end_matches('\r'))
                .filter(|line| !line.trim().is_empty()),
        )
    }

    /// Load a label file. A missing or non-UTF-8 file is a `ModelLoad` error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LensError> {
        let path = path.as_ref();
        let raw = std::fs::read(path)
            .with_context(|| format!("read {}", path.display()))
            .map_err(|e| LensError::model_load("label file unavailable", e))?;
        let text = String::from_utf8(raw)
            .with_context(|| format!("{} is not UTF-8 text", path.display()))
            .map_err(|e| LensError::model_load("label file malformed", e))?;
        let labels = Self::parse(&text);
        if labels.is_empty() {
            log::warn!("label file {} contains no labels", path.display());
        }
        Ok(labels)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.labels.get(index).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_strips_line_endings_and_skips_blank_lines() {
        let labels = LabelSet::parse("\u{feff}apple\r\nbanana\n\n  \r\n\ncarrot\n");
        assert_eq!(labels.iter().collect::<Vec<_>>(), ["apple", "banana", "carrot"]);
    }

    #[test]
    fn parse_keeps_label_text_verbatim() {
        let labels = LabelSet::parse("ice cream\r\n baby_back_ribs \n");
        assert_eq!(labels.get(0), Some("ice cream"));
        assert_eq!(labels.get(1), Some(" baby_back_ribs "));
    }

    #[test]
    fn parse_keeps_file_order() {
        let labels = LabelSet::parse("zucchini\napple");
        assert_eq!(labels.get(0), Some("zucchini"));
        assert_eq!(labels.get(1), Some("apple"));
        assert_eq!(labels.get(2), None);
    }

    #[test]
    fn missing_file_is_model_load_error() {
        let err = LabelSet::load("/nonexistent/labels.txt").unwrap_err();
        assert!(matches!(err, LensError::ModelLoad { .. }));
    }
}
