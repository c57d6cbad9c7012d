//! Case-insensitive glob matching
//!
//! Supported syntax:
//! - `*` matches any run of characters, including `/` and the empty run
//! - `?` matches exactly one character
//! - `[seq]` matches one character from `seq` (ranges like `a-z` allowed)
//! - `[!seq]` matches one character not in `seq`
//!
//! A `[` without a closing `]` is an ordinary character.

use glob::{MatchOptions, Pattern};

const OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// A glob pattern compiled once and matched many times
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlobPattern {
    source: String,
    compiled: Pattern,
}

impl GlobPattern {
    /// Compiles a pattern. Never fails: malformed brackets become literals.
    pub fn new(pattern: &str) -> Self {
        let lowered = pattern.to_lowercase();
        let compiled = Pattern::new(&prepare(&lowered))
            .or_else(|_| Pattern::new(&Pattern::escape(&lowered)))
            .unwrap_or_default();

        Self {
            source: pattern.to_string(),
            compiled,
        }
    }

    /// Returns the pattern as written
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Checks whether `value` matches, ignoring case
    pub fn is_match(&self, value: &str) -> bool {
        self.compiled.matches_with(&value.to_lowercase(), OPTIONS)
    }
}

impl From<&str> for GlobPattern {
    fn from(pattern: &str) -> Self {
        Self::new(pattern)
    }
}

impl From<String> for GlobPattern {
    fn from(pattern: String) -> Self {
        Self::new(&pattern)
    }
}

/// Rewrites a pattern into a form `glob::Pattern` accepts with the same meaning
///
/// Runs of `*` collapse to one, since `**` has a path-component meaning in
/// `glob`. A `[` that is never closed is escaped so it matches itself.
fn prepare(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 2);
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' => {
                if !out.ends_with('*') {
                    out.push('*');
                }
                i += 1;
            }
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    out.extend(&chars[i..=end]);
                    i = end + 1;
                }
                None => {
                    out.push_str("[[]");
                    i += 1;
                }
            },
            c => {
                out.push(c);
                i += 1;
            }
        }
    }
    out
}

/// Index of the `]` closing the bracket expression that opens at `open`
///
/// A `]` right after the opening (or after `!`) is a member, not the end.
fn class_end(chars: &[char], open: usize) -> Option<usize> {
    let mut i = open + 1;
    if chars.get(i) == Some(&'!') {
        i += 1;
    }
    if chars.get(i) == Some(&']') {
        i += 1;
    }
    chars[i.min(chars.len())..]
        .iter()
        .position(|c| *c == ']')
        .map(|offset| i + offset)
}

/// Checks if `value` matches the glob `pattern`, ignoring case
///
/// # Examples
///
/// ```
/// use pdf_trawler::filter::matches;
///
/// assert!(matches("Report.PDF", "report*.pdf"));
/// assert!(matches("report1.pdf", "report?.pdf"));
/// assert!(!matches("report12.pdf", "report?.pdf"));
/// ```
pub fn matches(value: &str, pattern: &str) -> bool {
    GlobPattern::new(pattern).is_match(value)
}

/// Returns true if `patterns` is empty or `value` matches any of them
pub fn matches_any<S: AsRef<str>>(value: &str, patterns: &[S]) -> bool {
    patterns.is_empty() || patterns.iter().any(|p| matches(value, p.as_ref()))
}
