//! Word splitting and case conversion for routable identifiers.
//!
//! Tags are written by hand in frontmatter, so the same topic shows up as
//! `SQL Server`, `sql-server` or `SqlServer` depending on the day. Every one of
//! them has to land on the same URL. This module turns free-form labels into
//! words and joins them in kebab form:
//!
//! - `"SQL Server"` → `["SQL", "Server"]` → `sql-server`
//! - `"camelCase"` → `["camel", "Case"]` → `camel-case`
//! - `"XMLHttpRequest"` → `["XML", "Http", "Request"]` → `xml-http-request`
//! - `"HTML5"` → `["HTML", "5"]` → `html-5`
//! - `"Node.js"` → `["Node", "js"]` → `node-js`
//!
//! ## Word Boundaries
//!
//! A new word starts at:
//! - any run of non-alphanumeric characters (the run itself is dropped)
//! - a lowercase → uppercase transition
//! - the last capital of an acronym followed by lowercase (`XMLHttp` → `XML`, `Http`)
//! - a letter ↔ digit transition
//!
//! Apostrophes are removed without splitting, so `"Don't Panic"` becomes
//! `dont-panic` rather than `don-t-panic`.

#[derive(Clone, Copy, PartialEq, Eq)]
enum CharKind {
    Upper,
    /// Lowercase and caseless letters.
    Lower,
    Digit,
}

fn classify(c: char) -> Option<CharKind> {
    if c.is_numeric() {
        Some(CharKind::Digit)
    } else if c.is_uppercase() {
        Some(CharKind::Upper)
    } else if c.is_alphabetic() {
        Some(CharKind::Lower)
    } else {
        None
    }
}

fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}')
}

/// Split a label into words, keeping the original casing of each word.
pub fn split_words(input: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev: Option<CharKind> = None;

    for c in input.chars() {
        if is_apostrophe(c) {
            continue;
        }
        let Some(kind) = classify(c) else {
            flush(&mut current, &mut words);
            prev = None;
            continue;
        };

        match (prev, kind) {
            (Some(CharKind::Lower), CharKind::Upper)
            | (Some(CharKind::Digit), CharKind::Upper | CharKind::Lower)
            | (Some(CharKind::Upper | CharKind::Lower), CharKind::Digit) => {
                flush(&mut current, &mut words);
            }
            (Some(CharKind::Upper), CharKind::Lower) if current.chars().count() >= 2 => {
                // Acronym run: the last capital belongs to the next word.
                if let Some(last) = current.pop() {
                    flush(&mut current, &mut words);
                    current.push(last);
                }
            }
            _ => {}
        }

        current.push(c);
        prev = Some(kind);
    }
    flush(&mut current, &mut words);
    words
}

fn flush(current: &mut String, words: &mut Vec<String>) {
    if !current.is_empty() {
        words.push(std::mem::take(current));
    }
}

/// Lowercase words joined with `-`. Empty when the input has no alphanumerics.
pub fn kebab_case(input: &str) -> String {
    split_words(input)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Whether `s` is already in the form [`kebab_case`] produces.
pub fn is_kebab_case(s: &str) -> bool {
    !s.is_empty() && kebab_case(s) == s
}

/// Display title from a file stem: dashes become spaces.
///
/// `who-am-i` → `who am i`
pub fn display_title(stem: &str) -> String {
    stem.replace('-', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_whitespace() {
        assert_eq!(split_words("SQL Server"), vec!["SQL", "Server"]);
    }

    #[test]
    fn splits_camel_case() {
        assert_eq!(split_words("camelCase"), vec!["camel", "Case"]);
    }

    #[test]
    fn splits_acronym_before_word() {
        assert_eq!(
            split_words("XMLHttpRequest"),
            vec!["XML", "Http", "Request"]
        );
    }

    #[test]
    fn splits_letter_digit_boundaries() {
        assert_eq!(split_words("foo2bar"), vec!["foo", "2", "bar"]);
        assert_eq!(split_words("HTML5"), vec!["HTML", "5"]);
    }

    #[test]
    fn drops_punctuation_runs() {
        assert_eq!(split_words("--Node.js__"), vec!["Node", "js"]);
    }

    #[test]
    fn apostrophes_do_not_split() {
        assert_eq!(kebab_case("Don't Panic"), "dont-panic");
        assert_eq!(kebab_case("Rock\u{2019}n\u{2019}Roll"), "rockn-roll");
    }

    #[test]
    fn kebab_variants_converge() {
        for variant in ["SQL Server", "sql-server", "sql_server", "SqlServer", "SQL  SERVER"] {
            assert_eq!(kebab_case(variant), "sql-server", "variant {variant:?}");
        }
    }

    #[test]
    fn kebab_single_word() {
        assert_eq!(kebab_case("Python"), "python");
    }

    #[test]
    fn kebab_mixed_case_prefix() {
        assert_eq!(kebab_case("iOS"), "i-os");
    }

    #[test]
    fn kebab_non_ascii_letters() {
        assert_eq!(kebab_case("Café Crème"), "café-crème");
    }

    #[test]
    fn kebab_of_symbols_is_empty() {
        assert_eq!(kebab_case("+++"), "");
        assert_eq!(kebab_case(""), "");
    }

    #[test]
    fn kebab_is_idempotent() {
        let once = kebab_case("Machine Learning 101");
        assert_eq!(once, "machine-learning-101");
        assert_eq!(kebab_case(&once), once);
    }

    #[test]
    fn recognizes_kebab_identifiers() {
        assert!(is_kebab_case("sql-server"));
        assert!(!is_kebab_case("SQL Server"));
        assert!(!is_kebab_case("sql--server"));
        assert!(!is_kebab_case(""));
    }

    #[test]
    fn display_title_replaces_dashes() {
        assert_eq!(display_title("who-am-i"), "who am i");
        assert_eq!(display_title("plain"), "plain");
    }
}
