mod engine;
pub mod languages;
pub mod markup;
pub mod theme;

pub use engine::HighlightEngine;
pub use languages::resolve_grammar;
pub use markup::{HighlightClass, Markup, MarkupSpan};

/// Line highlighter consumed by the diff engine.
///
/// Implementations must never fail: an unknown grammar yields
/// [`Markup::plain`] of the input.
pub trait Highlight {
    fn highlight(&self, line: &str, grammar: &str) -> Markup;

    /// Highlight a whole document. The default highlights line by line;
    /// implementations that benefit from full-document context override it.
    /// The result always has one entry per input line.
    fn highlight_document(&self, lines: &[&str], grammar: &str) -> Vec<Markup> {
        lines.iter().map(|l| self.highlight(l, grammar)).collect()
    }
}

/// Highlighter that never classifies anything.
pub struct PlainHighlighter;

impl Highlight for PlainHighlighter {
    fn highlight(&self, line: &str, _grammar: &str) -> Markup {
        Markup::plain(line)
    }
}
