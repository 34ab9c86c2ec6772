//! SQL LIKE pattern matching.

use regex::Regex;

/// Translate a LIKE pattern into an anchored regular expression.
///
/// `%` matches any run of characters, `_` exactly one character, and every
/// other character matches itself.
pub fn like_to_regex(pattern: &str) -> String {
    let mut regex = String::with_capacity(pattern.len() + 8);
    regex.push_str("(?s)^");

    let mut literal = String::new();
    for ch in pattern.chars() {
        match ch {
            '%' | '_' => {
                regex.push_str(&regex::escape(&literal));
                literal.clear();
                regex.push_str(if ch == '%' { ".*" } else { "." });
            }
            c => literal.push(c),
        }
    }
    regex.push_str(&regex::escape(&literal));
    regex.push('$');

    regex
}

/// Compiled LIKE pattern
#[derive(Debug, Clone)]
pub struct LikePattern {
    regex: Regex,
}

impl LikePattern {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(&like_to_regex(pattern))?,
        })
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}
