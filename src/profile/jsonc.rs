// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

// Profile descriptors are relaxed JSON: `//` line comments are allowed
// anywhere outside string literals. Stripping them line by line keeps the
// parser's line numbers aligned with the source.

pub fn strip_line_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut first = true;
    for line in text.split('\n') {
        if !first {
            out.push('\n');
        }
        first = false;
        out.push_str(code_span(line));
    }
    out
}

fn code_span(line: &str) -> &str {
    let bytes = line.as_bytes();
    let mut in_string = false;
    let mut idx = 0usize;
    while idx < bytes.len() {
        match bytes[idx] {
            b'"' => in_string = !in_string,
            b'\\' if in_string => idx += 1,
            b'/' if !in_string && bytes.get(idx + 1) == Some(&b'/') => {
                return &line[..idx];
            }
            _ => {}
        }
        idx += 1;
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_trailing_and_full_line_comments() {
        let text = "// header\n{ \"a\": 1 // value\n}\n";
        assert_eq!(strip_line_comments(text), "\n{ \"a\": 1 \n}\n");
    }

    #[test]
    fn leaves_slashes_inside_strings_alone() {
        let text = "{ \"url\": \"http://host/path\" } // gone";
        assert_eq!(
            strip_line_comments(text),
            "{ \"url\": \"http://host/path\" } "
        );
    }

    #[test]
    fn escaped_quote_does_not_end_the_string() {
        let text = "{ \"s\": \"a\\\"//b\" }";
        assert_eq!(strip_line_comments(text), text);
    }

    #[test]
    fn single_slash_is_not_a_comment() {
        let text = "{ \"a\": 1 } /";
        assert_eq!(strip_line_comments(text), text);
    }
}
