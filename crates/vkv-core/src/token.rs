//! Header-line tokenizer and string transforms.
//!
//! A header line holds a name and, for leaves, a value. With quoting on, the split is
//! quote-aware; without it, any run of whitespace separates tokens.

use crate::error::{Result, VkvError};
use crate::options::VkvOptions;

/// Escape codes in encode order. The backslash pair comes first so that backslashes
/// introduced by the other codes are never escaped again.
const ESCAPE_CODES: [(char, char); 11] = [
    ('\\', '\\'),
    ('\'', '\''),
    ('"', '"'),
    ('\0', '0'),
    ('\u{07}', 'a'),
    ('\u{08}', 'b'),
    ('\u{0C}', 'f'),
    ('\n', 'n'),
    ('\r', 'r'),
    ('\t', 't'),
    ('\u{0B}', 'v'),
];

/// Split a trimmed header line into its raw tokens (quotes still attached).
///
/// Tabs count as spaces. Fails on an unterminated quotation or on more than two
/// tokens.
pub(crate) fn split_header(line: &str, line_no: usize, options: &VkvOptions) -> Result<Vec<String>> {
    let line = line.replace('\t', " ");
    let tokens = if options.use_quotes {
        split_quoted(&line, line_no)?
    } else {
        line.split_whitespace().map(str::to_string).collect()
    };
    if tokens.len() > 2 {
        return Err(VkvError::parse(line_no, "too many values in node"));
    }
    Ok(tokens)
}

/// Quote-aware split. A `"` toggles the quote state unless an odd number of
/// backslashes precede it.
fn split_quoted(line: &str, line_no: usize) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut backslashes = 0usize;

    for c in line.chars() {
        if c == '"' && backslashes % 2 == 0 {
            in_quote = !in_quote;
        }
        if c == '\\' {
            backslashes += 1;
        } else {
            backslashes = 0;
        }

        if c == ' ' && !in_quote {
            if !current.is_empty() {
                tokens.push(std::mem::take(&mut current));
            }
        } else {
            current.push(c);
        }
    }

    if in_quote {
        return Err(VkvError::parse(
            line_no,
            "reached end-of-line while inside quotations",
        ));
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Turn a raw token into its text: strip the surrounding quotes and resolve escape
/// codes, as the options require.
pub(crate) fn decode_token(token: &str, line_no: usize, options: &VkvOptions) -> Result<String> {
    let mut content = token;
    if options.use_quotes {
        content = token
            .strip_prefix('"')
            .and_then(|rest| rest.strip_suffix('"'))
            .ok_or_else(|| {
                VkvError::parse(line_no, format!("no quotes found around content: {token}"))
            })?;
    }
    if options.use_escape_codes {
        Ok(unescape(content))
    } else {
        Ok(content.to_string())
    }
}

/// Inverse of [`decode_token`]: escape, then quote.
pub(crate) fn encode_token(content: &str, options: &VkvOptions) -> String {
    let mut out = String::with_capacity(content.len() + 2);
    if options.use_quotes {
        out.push('"');
    }
    if options.use_escape_codes {
        escape_into(content, &mut out);
    } else {
        out.push_str(content);
    }
    if options.use_quotes {
        out.push('"');
    }
    out
}

/// Replace every escapable character with its backslash code.
pub fn escape(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    escape_into(content, &mut out);
    out
}

fn escape_into(content: &str, out: &mut String) {
    for c in content.chars() {
        match ESCAPE_CODES.iter().find(|(raw, _)| *raw == c) {
            Some((_, code)) => {
                out.push('\\');
                out.push(*code);
            }
            None => out.push(c),
        }
    }
}

/// Resolve backslash codes in one left-to-right pass, so an escaped backslash is
/// restored exactly once and never combines with the character after it.
/// Unknown codes are kept as written.
pub fn unescape(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let raw = chars
            .peek()
            .and_then(|next| ESCAPE_CODES.iter().find(|(_, code)| code == next))
            .map(|(raw, _)| *raw);
        match raw {
            Some(raw) => {
                chars.next();
                out.push(raw);
            }
            None => out.push('\\'),
        }
    }
    out
}
