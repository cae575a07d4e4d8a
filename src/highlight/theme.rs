use super::markup::HighlightClass;

/// All recognized highlight capture names, in order.
/// The index into this array corresponds to the Highlight ID returned by tree-sitter.
pub const HIGHLIGHT_NAMES: &[&str] = &[
    "attribute",
    "comment",
    "constant",
    "constant.builtin",
    "constructor",
    "escape",
    "function",
    "function.builtin",
    "function.method",
    "keyword",
    "label",
    "number",
    "operator",
    "property",
    "punctuation",
    "punctuation.bracket",
    "punctuation.delimiter",
    "punctuation.special",
    "string",
    "string.special",
    "tag",
    "type",
    "type.builtin",
    "variable",
    "variable.builtin",
    "variable.parameter",
];

pub fn highlight_names_vec() -> Vec<String> {
    HIGHLIGHT_NAMES.iter().map(|s| s.to_string()).collect()
}

/// Map a tree-sitter highlight index to a markup class.
pub fn class_for_highlight(idx: usize) -> Option<HighlightClass> {
    let name = HIGHLIGHT_NAMES.get(idx).copied()?;
    let class = match name {
        "comment" => HighlightClass::Comment,
        "keyword" => HighlightClass::Keyword,
        "string" | "string.special" | "escape" => HighlightClass::String,
        "number" => HighlightClass::Number,
        "constant" | "constant.builtin" => HighlightClass::Constant,
        "function" | "function.builtin" | "function.method" => HighlightClass::Function,
        "type" | "type.builtin" | "constructor" => HighlightClass::Type,
        "variable" | "variable.builtin" | "variable.parameter" => HighlightClass::Variable,
        "operator" => HighlightClass::Operator,
        "property" | "label" => HighlightClass::Property,
        "attribute" => HighlightClass::Attribute,
        "tag" => HighlightClass::Tag,
        "punctuation" | "punctuation.bracket" | "punctuation.delimiter" | "punctuation.special" => {
            HighlightClass::Punctuation
        }
        _ => return None,
    };
    Some(class)
}
