use ratatui::style::Color;
use serde::Deserialize;

use crate::diff::BlockKind;
use crate::highlight::HighlightClass;

/// All semantic color slots for the twindiff UI.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,

    // General UI
    pub accent: Color,
    pub secondary: Color,
    pub text: Color,
    pub text_muted: Color,
    pub surface: Color,
    pub selection_bg: Color,

    // Diff panes
    pub diff_add_bg: Color,
    pub diff_del_bg: Color,
    pub diff_add_fg: Color,
    pub diff_del_fg: Color,
    pub current_hunk_fg: Color,

    // Connector gutter
    pub connector_modified: Color,
    pub connector_added: Color,
    pub connector_removed: Color,

    // Status indicators
    pub success: Color,
    pub error: Color,
    pub warning: Color,

    // Syntax highlighting
    pub syntax: SyntaxColors,
}

/// Syntax highlighting color slots.
#[derive(Debug, Clone)]
pub struct SyntaxColors {
    pub comment: Color,
    pub keyword: Color,
    pub string: Color,
    pub number: Color,
    pub function: Color,
    pub type_name: Color,
    pub variable: Color,
    pub operator: Color,
    pub property: Color,
    pub tag: Color,
    pub punctuation: Color,
    pub default_fg: Color,
}

impl SyntaxColors {
    pub fn color_for(&self, class: Option<HighlightClass>) -> Color {
        match class {
            Some(HighlightClass::Comment) => self.comment,
            Some(HighlightClass::Keyword) => self.keyword,
            Some(HighlightClass::String) => self.string,
            Some(HighlightClass::Number | HighlightClass::Constant) => self.number,
            Some(HighlightClass::Function) => self.function,
            Some(HighlightClass::Type) => self.type_name,
            Some(HighlightClass::Variable) => self.variable,
            Some(HighlightClass::Operator) => self.operator,
            Some(HighlightClass::Property | HighlightClass::Attribute) => self.property,
            Some(HighlightClass::Tag) => self.tag,
            Some(HighlightClass::Punctuation) => self.punctuation,
            None => self.default_fg,
        }
    }
}

pub const THEME_NAMES: &[&str] = &[
    "one-dark",
    "github-dark",
    "dracula",
    "catppuccin-mocha",
    "tokyo-night",
    "solarized-dark",
];

impl Theme {
    pub fn from_name(name: &str) -> Self {
        match name {
            "github-dark" => github_dark(),
            "dracula" => dracula(),
            "catppuccin-mocha" => catppuccin_mocha(),
            "tokyo-night" => tokyo_night(),
            "solarized-dark" => solarized_dark(),
            _ => one_dark(),
        }
    }

    pub fn connector_color(&self, kind: BlockKind) -> Color {
        match kind {
            BlockKind::Modified => self.connector_modified,
            BlockKind::Added => self.connector_added,
            BlockKind::Removed => self.connector_removed,
        }
    }
}

pub fn next_theme(current: &str) -> &'static str {
    let idx = THEME_NAMES.iter().position(|&n| n == current).unwrap_or(0);
    THEME_NAMES[(idx + 1) % THEME_NAMES.len()]
}

pub fn prev_theme(current: &str) -> &'static str {
    let idx = THEME_NAMES.iter().position(|&n| n == current).unwrap_or(0);
    if idx == 0 {
        THEME_NAMES[THEME_NAMES.len() - 1]
    } else {
        THEME_NAMES[idx - 1]
    }
}

pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#').unwrap_or(hex);
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

/// Mix `color` toward `background`. Only RGB pairs can be blended; anything
/// else comes back unchanged.
pub fn blend(color: Color, background: Color, amount: f32) -> Color {
    match (color, background) {
        (Color::Rgb(r, g, b), Color::Rgb(br, bg, bb)) => {
            let mix = |c: u8, base: u8| -> u8 {
                (c as f32 * amount + base as f32 * (1.0 - amount)).round() as u8
            };
            Color::Rgb(mix(r, br), mix(g, bg), mix(b, bb))
        }
        _ => color,
    }
}

// ── Serde-compatible override struct ──────────────────────────────

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ThemeOverrides {
    pub accent: Option<String>,
    pub secondary: Option<String>,
    pub text: Option<String>,
    pub text_muted: Option<String>,
    pub surface: Option<String>,
    pub selection_bg: Option<String>,
    pub diff_add_bg: Option<String>,
    pub diff_del_bg: Option<String>,
    pub diff_add_fg: Option<String>,
    pub diff_del_fg: Option<String>,
    pub current_hunk_fg: Option<String>,
    pub connector_modified: Option<String>,
    pub connector_added: Option<String>,
    pub connector_removed: Option<String>,
    pub success: Option<String>,
    pub error: Option<String>,
    pub warning: Option<String>,
    #[serde(default)]
    pub syntax: Option<SyntaxOverrides>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct SyntaxOverrides {
    pub comment: Option<String>,
    pub keyword: Option<String>,
    pub string: Option<String>,
    pub number: Option<String>,
    pub function: Option<String>,
    pub type_name: Option<String>,
    pub variable: Option<String>,
    pub operator: Option<String>,
    pub property: Option<String>,
    pub tag: Option<String>,
    pub punctuation: Option<String>,
    pub default_fg: Option<String>,
}

pub fn apply_overrides(theme: &mut Theme, overrides: &ThemeOverrides) {
    macro_rules! apply {
        ($field:ident) => {
            if let Some(ref hex) = overrides.$field {
                match parse_hex_color(hex) {
                    Some(c) => theme.$field = c,
                    None => tracing::warn!(field = stringify!($field), %hex, "ignoring bad color"),
                }
            }
        };
    }
    apply!(accent);
    apply!(secondary);
    apply!(text);
    apply!(text_muted);
    apply!(surface);
    apply!(selection_bg);
    apply!(diff_add_bg);
    apply!(diff_del_bg);
    apply!(diff_add_fg);
    apply!(diff_del_fg);
    apply!(current_hunk_fg);
    apply!(connector_modified);
    apply!(connector_added);
    apply!(connector_removed);
    apply!(success);
    apply!(error);
    apply!(warning);

    if let Some(ref syn) = overrides.syntax {
        macro_rules! apply_syn {
            ($field:ident) => {
                if let Some(ref hex) = syn.$field {
                    if let Some(c) = parse_hex_color(hex) {
                        theme.syntax.$field = c;
                    }
                }
            };
        }
        apply_syn!(comment);
        apply_syn!(keyword);
        apply_syn!(string);
        apply_syn!(number);
        apply_syn!(function);
        apply_syn!(type_name);
        apply_syn!(variable);
        apply_syn!(operator);
        apply_syn!(property);
        apply_syn!(tag);
        apply_syn!(punctuation);
        apply_syn!(default_fg);
    }
}

// ── Built-in themes ──────────────────────────────────────────────

const fn hex(rgb: u32) -> Color {
    Color::Rgb((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
}

fn one_dark() -> Theme {
    Theme {
        name: "one-dark".to_string(),
        accent: hex(0x56b6c2),
        secondary: hex(0xc678dd),
        text: hex(0xabb2bf),
        text_muted: hex(0x5c6370),
        surface: hex(0x1e1e1e),
        selection_bg: hex(0x282832),
        diff_add_bg: hex(0x001e00),
        diff_del_bg: hex(0x280000),
        diff_add_fg: hex(0x98c379),
        diff_del_fg: hex(0xe06c75),
        current_hunk_fg: hex(0xe5c07b),
        connector_modified: hex(0xc678dd),
        connector_added: hex(0x98c379),
        connector_removed: hex(0xe06c75),
        success: hex(0x98c379),
        error: hex(0xe06c75),
        warning: hex(0xe5c07b),
        syntax: SyntaxColors {
            comment: hex(0x6a737d),
            keyword: hex(0xc678dd),
            string: hex(0x98c379),
            number: hex(0xd19a66),
            function: hex(0x61afef),
            type_name: hex(0xe5c07b),
            variable: hex(0xabb2bf),
            operator: hex(0x56b6c2),
            property: hex(0xe06c75),
            tag: hex(0xe06c75),
            punctuation: hex(0x8c8c8c),
            default_fg: hex(0xabb2bf),
        },
    }
}

fn github_dark() -> Theme {
    Theme {
        name: "github-dark".to_string(),
        accent: hex(0x58a6ff),
        secondary: hex(0xbc8cff),
        text: hex(0xe6edf3),
        text_muted: hex(0x7d8590),
        surface: hex(0x161b22),
        selection_bg: hex(0x263248),
        diff_add_bg: hex(0x122818),
        diff_del_bg: hex(0x321212),
        diff_add_fg: hex(0x3fb950),
        diff_del_fg: hex(0xf85149),
        current_hunk_fg: hex(0xd29922),
        connector_modified: hex(0xbc8cff),
        connector_added: hex(0x3fb950),
        connector_removed: hex(0xf85149),
        success: hex(0x3fb950),
        error: hex(0xf85149),
        warning: hex(0xd29922),
        syntax: SyntaxColors {
            comment: hex(0x7d8590),
            keyword: hex(0xff7b72),
            string: hex(0xa5d6ff),
            number: hex(0x79c0ff),
            function: hex(0xd2a8ff),
            type_name: hex(0xffa657),
            variable: hex(0xe6edf3),
            operator: hex(0xff7b72),
            property: hex(0x79c0ff),
            tag: hex(0x7ee787),
            punctuation: hex(0x7d8590),
            default_fg: hex(0xe6edf3),
        },
    }
}

fn dracula() -> Theme {
    Theme {
        name: "dracula".to_string(),
        accent: hex(0x8be9fd),
        secondary: hex(0xff79c6),
        text: hex(0xf8f8f2),
        text_muted: hex(0x6272a4),
        surface: hex(0x282a36),
        selection_bg: hex(0x44475a),
        diff_add_bg: hex(0x0f280f),
        diff_del_bg: hex(0x2d0a0a),
        diff_add_fg: hex(0x50fa7b),
        diff_del_fg: hex(0xff5555),
        current_hunk_fg: hex(0xf1fa8c),
        connector_modified: hex(0xff79c6),
        connector_added: hex(0x50fa7b),
        connector_removed: hex(0xff5555),
        success: hex(0x50fa7b),
        error: hex(0xff5555),
        warning: hex(0xf1fa8c),
        syntax: SyntaxColors {
            comment: hex(0x6272a4),
            keyword: hex(0xff79c6),
            string: hex(0xf1fa8c),
            number: hex(0xbd93f9),
            function: hex(0x50fa7b),
            type_name: hex(0x8be9fd),
            variable: hex(0xf8f8f2),
            operator: hex(0xff79c6),
            property: hex(0xbd93f9),
            tag: hex(0xff79c6),
            punctuation: hex(0xf8f8f2),
            default_fg: hex(0xf8f8f2),
        },
    }
}

fn catppuccin_mocha() -> Theme {
    Theme {
        name: "catppuccin-mocha".to_string(),
        accent: hex(0x89b4fa),
        secondary: hex(0xf5c2e7),
        text: hex(0xcdd6f4),
        text_muted: hex(0x6c7086),
        surface: hex(0x1e1e2e),
        selection_bg: hex(0x313244),
        diff_add_bg: hex(0x0a2314),
        diff_del_bg: hex(0x2d0a0f),
        diff_add_fg: hex(0xa6e3a1),
        diff_del_fg: hex(0xf38ba8),
        current_hunk_fg: hex(0xf9e2af),
        connector_modified: hex(0xf5c2e7),
        connector_added: hex(0xa6e3a1),
        connector_removed: hex(0xf38ba8),
        success: hex(0xa6e3a1),
        error: hex(0xf38ba8),
        warning: hex(0xf9e2af),
        syntax: SyntaxColors {
            comment: hex(0x6c7086),
            keyword: hex(0xcba6f7),
            string: hex(0xa6e3a1),
            number: hex(0xfab387),
            function: hex(0x89b4fa),
            type_name: hex(0xf9e2af),
            variable: hex(0xcdd6f4),
            operator: hex(0x89dceb),
            property: hex(0xf2cdcd),
            tag: hex(0xf38ba8),
            punctuation: hex(0x9399b2),
            default_fg: hex(0xcdd6f4),
        },
    }
}

fn tokyo_night() -> Theme {
    Theme {
        name: "tokyo-night".to_string(),
        accent: hex(0x7aa2f7),
        secondary: hex(0xbb9af7),
        text: hex(0xc0caf5),
        text_muted: hex(0x565f89),
        surface: hex(0x1a1b26),
        selection_bg: hex(0x292e42),
        diff_add_bg: hex(0x0a230f),
        diff_del_bg: hex(0x2d0a0f),
        diff_add_fg: hex(0x9ece6a),
        diff_del_fg: hex(0xf7768e),
        current_hunk_fg: hex(0xe0af68),
        connector_modified: hex(0xbb9af7),
        connector_added: hex(0x9ece6a),
        connector_removed: hex(0xf7768e),
        success: hex(0x9ece6a),
        error: hex(0xf7768e),
        warning: hex(0xe0af68),
        syntax: SyntaxColors {
            comment: hex(0x565f89),
            keyword: hex(0xbb9af7),
            string: hex(0x9ece6a),
            number: hex(0xff9e64),
            function: hex(0x7aa2f7),
            type_name: hex(0x2ac3de),
            variable: hex(0xc0caf5),
            operator: hex(0x89ddff),
            property: hex(0x73daca),
            tag: hex(0xf7768e),
            punctuation: hex(0x565f89),
            default_fg: hex(0xc0caf5),
        },
    }
}

fn solarized_dark() -> Theme {
    Theme {
        name: "solarized-dark".to_string(),
        accent: hex(0x268bd2),
        secondary: hex(0xd33682),
        text: hex(0x93a1a1),
        text_muted: hex(0x586e75),
        surface: hex(0x00222b),
        selection_bg: hex(0x073642),
        diff_add_bg: hex(0x001e0a),
        diff_del_bg: hex(0x280505),
        diff_add_fg: hex(0x859900),
        diff_del_fg: hex(0xdc322f),
        current_hunk_fg: hex(0xb58900),
        connector_modified: hex(0xd33682),
        connector_added: hex(0x859900),
        connector_removed: hex(0xdc322f),
        success: hex(0x859900),
        error: hex(0xdc322f),
        warning: hex(0xb58900),
        syntax: SyntaxColors {
            comment: hex(0x586e75),
            keyword: hex(0x859900),
            string: hex(0x2aa198),
            number: hex(0xd33682),
            function: hex(0x268bd2),
            type_name: hex(0xb58900),
            variable: hex(0x93a1a1),
            operator: hex(0x859900),
            property: hex(0x268bd2),
            tag: hex(0xdc322f),
            punctuation: hex(0x586e75),
            default_fg: hex(0x93a1a1),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_name_falls_back() {
        assert_eq!(Theme::from_name("nope").name, "one-dark");
        for name in THEME_NAMES {
            assert_eq!(Theme::from_name(name).name, *name);
        }
    }

    #[test]
    fn test_theme_cycle_wraps() {
        assert_eq!(next_theme("solarized-dark"), "one-dark");
        assert_eq!(prev_theme("one-dark"), "solarized-dark");
        assert_eq!(next_theme("unknown"), "github-dark");
    }

    #[test]
    fn test_parse_hex_color() {
        assert_eq!(parse_hex_color("#ff8000"), Some(Color::Rgb(255, 128, 0)));
        assert_eq!(parse_hex_color("00ff00"), Some(Color::Rgb(0, 255, 0)));
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#gg0000"), None);
    }

    #[test]
    fn test_overrides_apply_connector_colors() {
        let mut theme = Theme::from_name("one-dark");
        let overrides = ThemeOverrides {
            connector_added: Some("#010203".into()),
            connector_removed: Some("bogus".into()),
            syntax: Some(SyntaxOverrides {
                keyword: Some("#aabbcc".into()),
                ..Default::default()
            }),
            ..Default::default()
        };
        apply_overrides(&mut theme, &overrides);
        assert_eq!(theme.connector_color(BlockKind::Added), Color::Rgb(1, 2, 3));
        assert_eq!(
            theme.connector_color(BlockKind::Removed),
            Theme::from_name("one-dark").connector_removed
        );
        assert_eq!(theme.syntax.keyword, Color::Rgb(0xaa, 0xbb, 0xcc));
    }

    #[test]
    fn test_blend() {
        let c = blend(Color::Rgb(200, 100, 0), Color::Rgb(0, 0, 0), 0.5);
        assert_eq!(c, Color::Rgb(100, 50, 0));
        assert_eq!(blend(Color::Red, Color::Rgb(0, 0, 0), 0.5), Color::Red);
    }

    #[test]
    fn test_syntax_class_mapping() {
        let theme = Theme::from_name("dracula");
        assert_eq!(
            theme.syntax.color_for(Some(HighlightClass::Keyword)),
            theme.syntax.keyword
        );
        assert_eq!(theme.syntax.color_for(None), theme.syntax.default_fg);
    }
}
