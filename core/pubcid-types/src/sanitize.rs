//! Plain-text sanitizer for cookie values and settings fields.
//!
//! Mirrors the publishing platform's text-field sanitizer so values read
//! from the browser, produced by generators, or submitted through the
//! settings form are all normalised the same way:
//! - HTML tags are stripped, a lone `<` becomes `&lt;`
//! - Control characters are removed
//! - Runs of spaces, tabs and line breaks collapse to one space
//! - Percent-encoded octets (`%XX`) are removed
//! - Leading and trailing whitespace is trimmed

/// Sanitizes untrusted text into a single line of plain text.
#[must_use]
pub fn sanitize_text_field(input: &str) -> String {
    let stripped = strip_tags(input);

    let mut filtered = String::with_capacity(stripped.len());
    let mut in_space = false;
    for c in stripped.chars() {
        if matches!(c, ' ' | '\t' | '\r' | '\n') {
            if !in_space {
                filtered.push(' ');
                in_space = true;
            }
        } else if !c.is_control() {
            filtered.push(c);
            in_space = false;
        }
    }
    let mut filtered = filtered.trim().to_string();

    let mut found_octet = false;
    while let Some(pos) = find_octet(&filtered) {
        filtered.replace_range(pos..pos + 3, "");
        found_octet = true;
    }

    if found_octet {
        filtered = collapse_spaces(&filtered).trim().to_string();
    }

    filtered
}

/// Removes `<...>` tags. A `<` that is not closed by `>` before the next
/// `<` (or the end of input) is kept as the entity `&lt;`.
fn strip_tags(input: &str) -> String {
    if !input.contains('<') {
        return input.to_string();
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(open) = rest.find('<') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find(['<', '>']) {
            Some(end) if after.as_bytes()[end] == b'>' => {
                rest = &after[end + 1..];
            }
            _ => {
                out.push_str("&lt;");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Byte offset of the first `%` followed by two hex digits.
fn find_octet(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    bytes.windows(3).position(|w| {
        w[0] == b'%' && w[1].is_ascii_hexdigit() && w[2].is_ascii_hexdigit()
    })
}

fn collapse_spaces(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for c in s.chars() {
        if c == ' ' {
            if !prev_space {
                out.push(c);
            }
            prev_space = true;
        } else {
            out.push(c);
            prev_space = false;
        }
    }
    out
}
