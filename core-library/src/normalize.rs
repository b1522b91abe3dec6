//! Display-name normalization
//!
//! Song names, artist names and group links arrive as free-form text typed by
//! people: doubled spaces, non-breaking spaces pasted from web pages, spaces
//! around hyphens and commas. Everything written to storage goes through
//! [`normalize`] first, so equal names compare equal as plain strings.
//!
//! The rules, applied in order:
//! 1. non-breaking spaces become ordinary spaces
//! 2. whitespace around `-` is removed (`A - B` → `A-B`)
//! 3. whitespace around `,` is removed (`A , B` → `A,B`)
//! 4. remaining whitespace runs collapse to a single space
//! 5. leading and trailing whitespace is trimmed

use regex::Regex;
use std::sync::OnceLock;

const NO_BREAK_SPACE: char = '\u{00A0}';

fn dash_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s*-\s*").expect("static regex"))
}

fn comma_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\s*,\s*").expect("static regex"))
}

/// Canonicalize a display string.
///
/// Total and idempotent: `normalize(&normalize(s)) == normalize(s)`.
///
/// # Examples
///
/// ```
/// use core_library::normalize::normalize;
///
/// assert_eq!(normalize(" Song  Name  -  Artist "), "Song Name-Artist");
/// assert_eq!(normalize("За тебя, Родина - мать"), "За тебя,Родина-мать");
/// ```
pub fn normalize(s: &str) -> String {
    let s = s.replace(NO_BREAK_SPACE, " ");
    let s = dash_pattern().replace_all(&s, "-");
    let s = comma_pattern().replace_all(&s, ",");

    // split_whitespace also trims both ends
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lower-cased normalized form, stored next to names for case-insensitive lookups.
///
/// SQLite's `LIKE` only folds ASCII, so the folding happens here where it is
/// Unicode-aware.
pub fn search_key(s: &str) -> String {
    normalize(s).to_lowercase()
}

/// Normalize an optional field, treating blank input as absent.
pub fn normalize_optional(s: Option<&str>) -> Option<String> {
    s.map(normalize).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_cases() {
        let cases = [
            ("Song Name\u{00A0}-\u{00A0}Artist", "Song Name-Artist"),
            (" Song  Name  -  Artist ", "Song Name-Artist"),
            ("Song - Name, Artist ", "Song-Name,Artist"),
            ("  Song  Name  ", "Song Name"),
            (
                "Song Name -  Artist , Some Other Artist",
                "Song Name-Artist,Some Other Artist",
            ),
            ("За     тебя, Родина   -   мать", "За тебя,Родина-мать"),
            ("За тебя, Родина - мать", "За тебя,Родина-мать"),
        ];

        for (input, expected) in cases {
            assert_eq!(normalize(input), expected, "input: {:?}", input);
        }
    }

    #[test]
    fn test_normalize_collapses_newlines_and_tabs() {
        assert_eq!(normalize("Line\n\tone\r\n  two"), "Line one two");
        assert_eq!(normalize("A \n-\n B"), "A-B");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let inputs = [
            " Song  Name  -  Artist ",
            "A , , B",
            "x -- y",
            "\u{00A0}\u{00A0}lead",
            "Родина  -  мать ,  тебя",
            "",
            "   ",
        ];

        for input in inputs {
            let once = normalize(input);
            assert_eq!(normalize(&once), once, "input: {:?}", input);
        }
    }

    #[test]
    fn test_normalize_blank_is_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \t\n\u{00A0}"), "");
    }

    #[test]
    fn test_search_key_folds_unicode_case() {
        assert_eq!(search_key("  ЗА Тебя "), "за тебя");
        assert_eq!(search_key("Song - NAME"), "song-name");
    }

    #[test]
    fn test_normalize_optional() {
        assert_eq!(normalize_optional(None), None);
        assert_eq!(normalize_optional(Some("   ")), None);
        assert_eq!(
            normalize_optional(Some(" https://band.example / page ")),
            Some("https://band.example / page".to_string())
        );
    }
}
