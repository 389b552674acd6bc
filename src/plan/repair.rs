//! Heuristic repair of near-JSON model output.
//!
//! Each transform is an independent pure function; [`repair`] applies them in
//! a fixed order because later steps assume the earlier normalization:
//! 1. [`normalize_smart_quotes`]
//! 2. [`quote_bare_keys`]
//! 3. [`double_quote_values`]
//! 4. [`strip_trailing_commas`]
//! 5. [`wrap_single_object`]
//!
//! The scanning transforms leave the inside of quoted strings alone.
//! The result is not guaranteed to parse.

/// Run the whole repair chain.
pub fn repair(text: &str) -> String {
    let s = normalize_smart_quotes(text.trim());
    let s = quote_bare_keys(&s);
    let s = double_quote_values(&s);
    let s = strip_trailing_commas(&s);
    wrap_single_object(&s)
}

/// Replace typographic quotes with their ASCII forms.
pub fn normalize_smart_quotes(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            other => other,
        })
        .collect()
}

/// Quote object keys that are bare identifiers or single-quoted.
///
/// Only positions right after `{` or `,` are considered, and only when the
/// token is followed by `:`. Single-quoted values are copied unchanged.
pub fn quote_bare_keys(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 16);
    let mut last_sig: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '"' {
            i = copy_double_quoted(&chars, i, &mut out);
            last_sig = Some('"');
            continue;
        }

        if matches!(last_sig, Some('{') | Some(',')) {
            if is_ident_start(c) {
                let end = ident_end(&chars, i);
                if next_significant(&chars, end) == Some(':') {
                    push_quoted(&mut out, &chars[i..end]);
                    last_sig = Some('"');
                } else {
                    out.extend(&chars[i..end]);
                    last_sig = Some(chars[end - 1]);
                }
                i = end;
                continue;
            }
        }

        if c == '\'' && matches!(last_sig, Some('{') | Some(',') | Some(':') | Some('[')) {
            if let Some(close) = closing_single_quote(&chars, i) {
                let is_key = matches!(last_sig, Some('{') | Some(','))
                    && next_significant(&chars, close + 1) == Some(':');
                if is_key {
                    push_single_as_double(&mut out, &chars[i + 1..close]);
                } else {
                    // Single-quoted value: left for `double_quote_values`.
                    out.extend(&chars[i..=close]);
                }
                last_sig = Some('"');
                i = close + 1;
                continue;
            }
        }

        out.push(c);
        if !c.is_whitespace() {
            last_sig = Some(c);
        }
        i += 1;
    }
    out
}

/// Convert single-quoted string values to double-quoted ones.
///
/// A value position is right after `:`, `[` or `,`.
pub fn double_quote_values(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 16);
    let mut last_sig: Option<char> = None;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '"' {
            i = copy_double_quoted(&chars, i, &mut out);
            last_sig = Some('"');
            continue;
        }

        if c == '\'' && matches!(last_sig, Some(':') | Some('[') | Some(',')) {
            if let Some(close) = closing_single_quote(&chars, i) {
                push_single_as_double(&mut out, &chars[i + 1..close]);
                last_sig = Some('"');
                i = close + 1;
                continue;
            }
        }

        out.push(c);
        if !c.is_whitespace() {
            last_sig = Some(c);
        }
        i += 1;
    }
    out
}

/// Drop commas that directly precede `}` or `]`.
pub fn strip_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        if c == '"' {
            i = copy_double_quoted(&chars, i, &mut out);
            continue;
        }
        if c == ',' && matches!(next_significant(&chars, i + 1), Some('}') | Some(']')) {
            i += 1;
            continue;
        }
        out.push(c);
        i += 1;
    }
    out
}

/// Wrap a lone top-level object in an array.
pub fn wrap_single_object(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        format!("[{}]", trimmed)
    } else {
        trimmed.to_string()
    }
}

/// Copy a double-quoted string starting at `start` verbatim; returns the index after it.
fn copy_double_quoted(chars: &[char], start: usize, out: &mut String) -> usize {
    out.push('"');
    let mut j = start + 1;
    while j < chars.len() {
        let c = chars[j];
        out.push(c);
        if c == '\\' {
            if let Some(&escaped) = chars.get(j + 1) {
                out.push(escaped);
            }
            j += 2;
            continue;
        }
        if c == '"' {
            return j + 1;
        }
        j += 1;
    }
    chars.len()
}

/// Index of the `'` closing the single-quoted string opened at `start`.
fn closing_single_quote(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start + 1;
    while j < chars.len() {
        match chars[j] {
            '\\' => j += 2,
            '\'' => return Some(j),
            '\n' => return None,
            _ => j += 1,
        }
    }
    None
}

/// Emit single-quoted content as a JSON double-quoted string.
fn push_single_as_double(out: &mut String, content: &[char]) {
    out.push('"');
    let mut j = 0;
    while j < content.len() {
        match content[j] {
            '\\' if content.get(j + 1) == Some(&'\'') => {
                out.push('\'');
                j += 2;
                continue;
            }
            '"' => out.push_str("\\\""),
            c => out.push(c),
        }
        j += 1;
    }
    out.push('"');
}

fn push_quoted(out: &mut String, ident: &[char]) {
    out.push('"');
    out.extend(ident);
    out.push('"');
}

fn next_significant(chars: &[char], from: usize) -> Option<char> {
    chars[from.min(chars.len())..]
        .iter()
        .copied()
        .find(|c| !c.is_whitespace())
}

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn ident_end(chars: &[char], start: usize) -> usize {
    let mut j = start;
    while j < chars.len() && (chars[j].is_ascii_alphanumeric() || chars[j] == '_') {
        j += 1;
    }
    j
}
