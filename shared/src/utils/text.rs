//! Text helpers for labels, slugs and file names.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static NON_SLUG_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9_\s-]").expect("slug pattern is valid"));
static SLUG_SEPARATORS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s_-]+").expect("separator pattern is valid"));

const ELLIPSIS: &str = "...";

/// Cut `text` to `max_length` characters and append "..." if it was longer.
pub fn truncate_text(text: &str, max_length: usize) -> String {
    if text.chars().count() <= max_length {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_length).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

/// Uppercase the first character and lowercase the rest: "sHOW" -> "Show"
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.as_str().to_lowercase().chars())
            .collect(),
        None => String::new(),
    }
}

/// Capitalize every space-separated word, keeping the spacing intact.
pub fn title_case(text: &str) -> String {
    text.split(' ')
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}

/// URL slug: "Spring Show 2024!" -> "spring-show-2024"
pub fn create_slug(text: &str) -> String {
    let lowered = text.trim().to_lowercase();
    let cleaned = NON_SLUG_CHARS.replace_all(&lowered, "");
    let dashed = SLUG_SEPARATORS.replace_all(&cleaned, "-");
    dashed.trim_matches('-').to_string()
}

/// Extension after the last dot, or "" for names without one (or dotfiles).
pub fn file_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(index) if index > 0 => &filename[index + 1..],
        _ => "",
    }
}

/// Message suitable for showing an error to a user.
pub fn error_message<E: fmt::Display + ?Sized>(error: Option<&E>) -> String {
    match error {
        Some(error) => error.to_string(),
        None => "An unexpected error occurred".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_text() {
        assert_eq!(truncate_text("Bessie", 10), "Bessie");
        assert_eq!(truncate_text("Bessie", 6), "Bessie");
        assert_eq!(truncate_text("Grand champion steer", 5), "Grand...");
        assert_eq!(truncate_text("Jalapeño", 7), "Jalapeñ...");
    }

    #[test]
    fn test_capitalize_and_title_case() {
        assert_eq!(capitalize_first("sHOW"), "Show");
        assert_eq!(capitalize_first(""), "");
        assert_eq!(title_case("market LAMB project"), "Market Lamb Project");
        assert_eq!(title_case("two  spaces"), "Two  Spaces");
    }

    #[test]
    fn test_create_slug() {
        assert_eq!(create_slug("  Spring Show 2024! "), "spring-show-2024");
        assert_eq!(create_slug("feed_and--water"), "feed-and-water");
        assert_eq!(create_slug("--Hello--"), "hello");
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("receipt.jpeg"), "jpeg");
        assert_eq!(file_extension("archive.tar.gz"), "gz");
        assert_eq!(file_extension("README"), "");
        assert_eq!(file_extension(".env"), "");
    }

    #[test]
    fn test_error_message() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
        assert_eq!(error_message(Some(&err)), "disk full");
        assert_eq!(error_message::<std::io::Error>(None), "An unexpected error occurred");
    }
}
