//! Shell wildcard patterns
//!
//! Paste markers may name several chunks at once with the shell subset of glob syntax:
//!
//! | Pattern   | Regex     | Meaning                              |
//! |-----------|-----------|--------------------------------------|
//! | `*`       | `.*`      | any run of characters                |
//! | `?`       | `.`       | exactly one character                |
//! | `[abc]`   | `[abc]`   | one character of the class           |
//! | `[!abc]`  | `[^abc]`  | one character outside the class      |
//!
//! Everything else is matched literally.
//!
//! Known limitation: there is no way to quote a metacharacter. A chunk name containing a literal
//! `*`, `?` or `[` cannot be matched by itself only.

use regex::Regex;

/// Whether `pattern` uses any wildcard syntax: `*`, `?` or a closed `[...]` class.
///
/// An unclosed `[` is a literal, the same way [`translate`] reads it.
pub fn is_wildcard(pattern: &str) -> bool {
    let chars: Vec<char> = pattern.chars().collect();
    chars.iter().enumerate().any(|(i, &c)| match c {
        '*' | '?' => true,
        '[' => class_end(&chars, i + 1).is_some(),
        _ => false,
    })
}

/// Translate a shell pattern into (unanchored) regex source.
///
/// An unterminated class does not fail: its `[` is emitted as a literal and scanning resumes
/// right after it.
pub fn translate(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut buf = [0u8; 4];
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        i += 1;
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    push_class(&mut out, &chars[i..end]);
                    i = end + 1;
                }
                None => out.push_str(r"\["),
            },
            _ => out.push_str(&regex::escape(c.encode_utf8(&mut buf))),
        }
    }

    out
}

/// Compile `pattern` into a regex matching whole names only.
pub fn compile(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?s:{})$", translate(pattern)))
}

/// Index of the `]` closing a class whose body starts at `start`.
///
/// A leading `!` and a `]` right after the opening (or after the `!`) belong to the body.
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    chars
        .get(j..)?
        .iter()
        .position(|&c| c == ']')
        .map(|offset| j + offset)
}

fn push_class(out: &mut String, body: &[char]) {
    out.push('[');

    let rest = match body.first() {
        Some('!') => {
            out.push('^');
            &body[1..]
        }
        Some('^') => {
            out.push_str(r"\^");
            &body[1..]
        }
        _ => body,
    };

    // Ranges stay ranges; everything the regex crate treats as class syntax
    // (nesting, set operators) is made literal.
    let mut prev = None;
    for &c in rest {
        let special = matches!(c, '\\' | '[' | ']' | '&' | '~' | '^') || (c == '-' && prev == Some('-'));
        if special {
            out.push('\\');
        }
        out.push(c);
        prev = Some(c);
    }

    out.push(']');
}
