use std::sync::Arc;

use crate::highlight::Highlight;

use super::engine::{compute_diff, DiffOptions};
use super::model::DiffModel;

#[derive(Debug, Clone, PartialEq, Eq)]
struct DiffKey {
    original: String,
    modified: String,
    language: String,
}

/// Single-entry memo for the diff model, keyed by the input triple.
///
/// The view only ever shows one diff, so one slot is enough: a changed key
/// replaces the previous model entirely.
#[derive(Default)]
pub struct DiffCache {
    entry: Option<(DiffKey, Arc<DiffModel>)>,
    options: DiffOptions,
}

impl DiffCache {
    pub fn new(options: DiffOptions) -> Self {
        Self {
            entry: None,
            options,
        }
    }

    pub fn get_or_compute(
        &mut self,
        original: &str,
        modified: &str,
        language: &str,
        highlighter: &dyn Highlight,
    ) -> Arc<DiffModel> {
        if let Some((key, model)) = &self.entry {
            if key.original == original && key.modified == modified && key.language == language {
                tracing::trace!("diff cache hit");
                return Arc::clone(model);
            }
        }

        let model = Arc::new(compute_diff(
            original,
            modified,
            language,
            highlighter,
            &self.options,
        ));
        self.entry = Some((
            DiffKey {
                original: original.to_string(),
                modified: modified.to_string(),
                language: language.to_string(),
            },
            Arc::clone(&model),
        ));
        model
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::highlight::Markup;

    /// Counts how many documents it was asked to highlight.
    struct CountingHighlighter {
        calls: Cell<usize>,
    }

    impl Highlight for CountingHighlighter {
        fn highlight(&self, line: &str, _grammar: &str) -> Markup {
            Markup::plain(line)
        }

        fn highlight_document(&self, lines: &[&str], _grammar: &str) -> Vec<Markup> {
            self.calls.set(self.calls.get() + 1);
            lines.iter().map(|l| Markup::plain(l)).collect()
        }
    }

    #[test]
    fn test_same_key_reuses_model() {
        let hl = CountingHighlighter {
            calls: Cell::new(0),
        };
        let mut cache = DiffCache::new(DiffOptions::default());
        let first = cache.get_or_compute("a\nb", "a\nc", "rust", &hl);
        let second = cache.get_or_compute("a\nb", "a\nc", "rust", &hl);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(hl.calls.get(), 2);
    }

    #[test]
    fn test_changed_key_recomputes() {
        let hl = CountingHighlighter {
            calls: Cell::new(0),
        };
        let mut cache = DiffCache::new(DiffOptions::default());
        let first = cache.get_or_compute("a", "b", "rust", &hl);
        let by_language = cache.get_or_compute("a", "b", "python", &hl);
        assert!(!Arc::ptr_eq(&first, &by_language));
        let by_content = cache.get_or_compute("a", "c", "python", &hl);
        assert!(!Arc::ptr_eq(&by_language, &by_content));
        assert_eq!(hl.calls.get(), 6);
    }
}
