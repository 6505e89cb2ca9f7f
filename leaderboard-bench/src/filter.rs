// Copyright (c) 2026 Graphcore Ltd. All rights reserved.

//! Shell style file name patterns.
//!
//! Supports `*`, `?`, `[abc]`, `[a-z]` and negated `[!abc]` classes. A `[`
//! without a matching `]` is a literal. Matching is case sensitive.

use leaderboard_data::error::{LeaderboardError, LeaderboardResult};
use regex::Regex;

#[derive(Clone, Debug)]
pub struct GlobFilter {
    pattern: String,
    regex: Regex,
}

impl GlobFilter {
    pub fn new(pattern: &str) -> LeaderboardResult<Self> {
        let regex = Regex::new(&glob_to_regex(pattern))
            .map_err(|e| LeaderboardError::Bench(format!("invalid filter '{pattern}': {e}")))?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

/// Translate a glob into an anchored regular expression.
fn glob_to_regex(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut re = String::from("^");
    let mut i = 0;
    while i < chars.len() {
        match chars[i] {
            '*' => re.push_str(".*"),
            '?' => re.push('.'),
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    re.push('[');
                    let mut j = i + 1;
                    if chars[j] == '!' {
                        re.push('^');
                        j += 1;
                    }
                    for &c in &chars[j..end] {
                        if c == '\\' || c == '[' || c == ']' || c == '^' || c == '&' || c == '~' {
                            re.push('\\');
                        }
                        re.push(c);
                    }
                    re.push(']');
                    i = end;
                }
                None => re.push_str(r"\["),
            },
            c => re.push_str(&regex::escape(&c.to_string())),
        }
        i += 1;
    }
    re.push('$');
    re
}

/// Index of the `]` closing the class opened at `start`.
///
/// A `]` directly after the `[` (or `[!`) is part of the class.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    (j..chars.len()).find(|&k| chars[k] == ']')
}
