use crate::error::ScoutError;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Language {
    Go,
}

/// Detect language from file extension
pub fn detect_language(path: &Path) -> Result<Language, ScoutError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .ok_or_else(|| ScoutError::NoExtension(path.display().to_string()))?;

    match extension {
        "go" => Ok(Language::Go),
        _ => Err(ScoutError::UnsupportedExtension(extension.to_string())),
    }
}

/// Get tree-sitter Language for a given language enum
pub fn ts_language(lang: Language) -> tree_sitter::Language {
    match lang {
        Language::Go => tree_sitter_go::LANGUAGE.into(),
    }
}
