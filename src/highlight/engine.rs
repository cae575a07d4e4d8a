use std::collections::HashMap;

use tree_sitter_highlight::{HighlightConfiguration, HighlightEvent, Highlighter};

use super::languages::language_entries;
use super::markup::{HighlightClass, Markup};
use super::theme::{class_for_highlight, highlight_names_vec};
use super::Highlight;

/// Tree-sitter backed highlighter for the bundled grammars.
pub struct HighlightEngine {
    configs: HashMap<&'static str, HighlightConfiguration>,
}

impl HighlightEngine {
    pub fn new() -> Self {
        let highlight_names = highlight_names_vec();
        let mut configs = HashMap::new();

        for entry in language_entries() {
            match entry.config(&highlight_names) {
                Ok(config) => {
                    configs.insert(entry.name, config);
                }
                Err(e) => tracing::warn!(grammar = entry.name, error = %e, "grammar unavailable"),
            }
        }

        Self { configs }
    }

    pub fn supports(&self, grammar: &str) -> bool {
        self.configs.contains_key(grammar)
    }
}

impl Highlight for HighlightEngine {
    fn highlight(&self, line: &str, grammar: &str) -> Markup {
        self.highlight_document(&[line], grammar)
            .pop()
            .unwrap_or_else(|| Markup::plain(line))
    }

    /// Highlights the whole document in one parse so multi-line constructs
    /// (block comments, strings) classify correctly, then splits per line.
    fn highlight_document(&self, lines: &[&str], grammar: &str) -> Vec<Markup> {
        let plain = || lines.iter().map(|l| Markup::plain(l)).collect::<Vec<_>>();

        let Some(config) = self.configs.get(grammar) else {
            return plain();
        };

        let source = lines.join("\n");
        let mut line_starts = Vec::with_capacity(lines.len());
        let mut offset = 0;
        for line in lines {
            line_starts.push(offset);
            offset += line.len() + 1;
        }

        let mut highlighter = Highlighter::new();
        let events = match highlighter.highlight(config, source.as_bytes(), None, |_| None) {
            Ok(events) => events,
            Err(e) => {
                tracing::debug!(grammar, error = %e, "highlight failed, using plain text");
                return plain();
            }
        };

        let mut result = vec![Markup::default(); lines.len()];
        let mut stack: Vec<Option<HighlightClass>> = Vec::new();

        for event in events {
            match event {
                Ok(HighlightEvent::Source { start, end }) => {
                    let class = stack.last().copied().flatten();
                    add_spans_for_range(&source, lines, &line_starts, &mut result, start, end, class);
                }
                Ok(HighlightEvent::HighlightStart(highlight)) => {
                    stack.push(class_for_highlight(highlight.0));
                }
                Ok(HighlightEvent::HighlightEnd) => {
                    stack.pop();
                }
                Err(e) => {
                    tracing::debug!(grammar, error = %e, "highlight aborted, using plain text");
                    return plain();
                }
            }
        }

        result
    }
}

/// Split a byte range of the joined document across line boundaries and
/// append the pieces to each line's markup.
fn add_spans_for_range(
    source: &str,
    lines: &[&str],
    line_starts: &[usize],
    result: &mut [Markup],
    start: usize,
    end: usize,
    class: Option<HighlightClass>,
) {
    let mut pos = start;
    while pos < end {
        let idx = line_starts.partition_point(|&s| s <= pos).saturating_sub(1);
        let (Some(&line_start), Some(line)) = (line_starts.get(idx), lines.get(idx)) else {
            return;
        };
        let line_end = line_start + line.len();
        let seg_end = end.min(line_end);

        if pos < seg_end {
            if let (Some(text), Some(markup)) = (source.get(pos..seg_end), result.get_mut(idx)) {
                markup.push(text, class);
            }
        }

        // Skip the joining newline
        pos = line_end + 1;
    }
}
