use std::path::Path;

use tree_sitter_highlight::HighlightConfiguration;

pub struct LanguageEntry {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
    config_fn: fn() -> Result<HighlightConfiguration, tree_sitter::QueryError>,
}

impl LanguageEntry {
    pub fn config(
        &self,
        highlight_names: &[String],
    ) -> Result<HighlightConfiguration, tree_sitter::QueryError> {
        let mut config = (self.config_fn)()?;
        config.configure(highlight_names);
        Ok(config)
    }
}

macro_rules! lang {
    ($name:expr, $exts:expr, $lang_fn:expr, $highlights:expr) => {
        LanguageEntry {
            name: $name,
            extensions: $exts,
            config_fn: || {
                HighlightConfiguration::new(
                    $lang_fn.into(),
                    $name,
                    $highlights,
                    "", // injections
                    "", // locals
                )
            },
        }
    };
}

pub fn language_entries() -> Vec<LanguageEntry> {
    vec![
        lang!(
            "rust",
            &["rs"],
            tree_sitter_rust::LANGUAGE,
            tree_sitter_rust::HIGHLIGHTS_QUERY
        ),
        lang!(
            "javascript",
            &["js", "jsx", "mjs", "cjs"],
            tree_sitter_javascript::LANGUAGE,
            tree_sitter_javascript::HIGHLIGHT_QUERY
        ),
        lang!(
            "typescript",
            &["ts", "tsx"],
            tree_sitter_typescript::LANGUAGE_TYPESCRIPT,
            tree_sitter_typescript::HIGHLIGHTS_QUERY
        ),
        lang!(
            "python",
            &["py", "pyi"],
            tree_sitter_python::LANGUAGE,
            tree_sitter_python::HIGHLIGHTS_QUERY
        ),
        lang!(
            "json",
            &["json", "jsonc"],
            tree_sitter_json::LANGUAGE,
            tree_sitter_json::HIGHLIGHTS_QUERY
        ),
        lang!(
            "toml",
            &["toml"],
            tree_sitter_toml_ng::LANGUAGE,
            tree_sitter_toml_ng::HIGHLIGHTS_QUERY
        ),
        lang!(
            "css",
            &["css"],
            tree_sitter_css::LANGUAGE,
            tree_sitter_css::HIGHLIGHTS_QUERY
        ),
        lang!(
            "html",
            &["html", "htm"],
            tree_sitter_html::LANGUAGE,
            tree_sitter_html::HIGHLIGHTS_QUERY
        ),
        lang!(
            "go",
            &["go"],
            tree_sitter_go::LANGUAGE,
            tree_sitter_go::HIGHLIGHTS_QUERY
        ),
        lang!(
            "ruby",
            &["rb", "rake", "gemspec"],
            tree_sitter_ruby::LANGUAGE,
            tree_sitter_ruby::HIGHLIGHTS_QUERY
        ),
        lang!(
            "bash",
            &["sh", "bash", "zsh"],
            tree_sitter_bash::LANGUAGE,
            tree_sitter_bash::HIGHLIGHT_QUERY
        ),
        lang!(
            "yaml",
            &["yml", "yaml"],
            tree_sitter_yaml::LANGUAGE,
            tree_sitter_yaml::HIGHLIGHTS_QUERY
        ),
    ]
}

pub fn detect_language(path: &Path) -> Option<&'static str> {
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        for entry in language_entries() {
            if entry.extensions.contains(&ext) {
                return Some(entry.name);
            }
        }
    }
    // Filename-based detection
    let filename = path.file_name()?.to_str()?;
    match filename {
        "Makefile" | "makefile" | "GNUmakefile" => Some("bash"),
        "Dockerfile" => Some("bash"),
        "Gemfile" | "Rakefile" => Some("ruby"),
        "Cargo.lock" => Some("toml"),
        _ => None,
    }
}

/// Normalise a user-supplied grammar key: grammar names pass through,
/// extensions and a few common aliases map to their grammar, anything else
/// is kept lowercased (and later falls back to plain text).
pub fn normalize_grammar(key: &str) -> String {
    let lower = key.trim().to_ascii_lowercase();
    match lower.as_str() {
        "sh" | "shell" | "zsh" => return "bash".to_string(),
        "js" | "node" => return "javascript".to_string(),
        "ts" => return "typescript".to_string(),
        "py" => return "python".to_string(),
        "yml" => return "yaml".to_string(),
        _ => {}
    }
    language_entries()
        .into_iter()
        .find(|e| e.name == lower || e.extensions.contains(&lower.as_str()))
        .map(|e| e.name.to_string())
        .unwrap_or(lower)
}

/// Pick the grammar key: an explicit `--language` wins, otherwise detect
/// from the file name. Returns an empty key when nothing matches.
pub fn resolve_grammar(explicit: Option<&str>, path: &Path) -> String {
    match explicit {
        Some(key) if !key.trim().is_empty() => normalize_grammar(key),
        _ => detect_language(path).unwrap_or_default().to_string(),
    }
}
