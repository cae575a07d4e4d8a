/// Token class assigned by a highlighter. The renderer maps each class to a
/// theme colour; unclassed text uses the theme's default foreground.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightClass {
    Attribute,
    Comment,
    Constant,
    Function,
    Keyword,
    Number,
    Operator,
    Property,
    Punctuation,
    String,
    Tag,
    Type,
    Variable,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupSpan {
    pub text: String,
    pub class: Option<HighlightClass>,
}

/// Pre-highlighted, terminal-safe content of a single line.
///
/// Every span's text has already passed through [`sanitize`], so it can be
/// written to the terminal as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Markup {
    spans: Vec<MarkupSpan>,
}

impl Markup {
    /// Unclassed markup for raw text.
    pub fn plain(text: &str) -> Self {
        let mut markup = Self::default();
        markup.push(text, None);
        markup
    }

    /// Append a span, merging with the previous one when the class matches.
    pub fn push(&mut self, text: &str, class: Option<HighlightClass>) {
        if text.is_empty() {
            return;
        }
        let clean = sanitize(text);
        match self.spans.last_mut() {
            Some(last) if last.class == class => last.text.push_str(&clean),
            _ => self.spans.push(MarkupSpan { text: clean, class }),
        }
    }

    pub fn spans(&self) -> &[MarkupSpan] {
        &self.spans
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Concatenated span text.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

const TAB_WIDTH: usize = 4;

/// Make raw text safe to print inside a pane: tabs expand to spaces and
/// control characters become their Unicode "control picture" glyphs, so
/// file content can never emit escape sequences.
pub fn sanitize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\t' => out.push_str(&" ".repeat(TAB_WIDTH)),
            '\u{7f}' => out.push('\u{2421}'),
            c if (c as u32) < 0x20 => {
                out.push(char::from_u32(0x2400 + c as u32).unwrap_or('\u{fffd}'))
            }
            c if c.is_control() => out.push('\u{fffd}'),
            c => out.push(c),
        }
    }
    out
}
