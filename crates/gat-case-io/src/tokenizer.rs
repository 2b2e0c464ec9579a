//! Line tokenizer for legacy text records.
//!
//! A record line is split into positional fields:
//!
//! - a comma separates fields and absorbs the whitespace around it;
//! - a whitespace run not adjacent to a comma also separates fields;
//! - a leading comma, or two commas with nothing between them, yield an empty field;
//! - a field starting with `'` or `"` runs to the matching quote, delimiters
//!   inside it are literal and the quotes are dropped;
//! - everything after an unquoted `/` is a comment.
//!
//! Malformed quoting is not an error: an unterminated quote runs to the end of
//! the line.

use serde::{Deserialize, Serialize};

/// Starts a same-line comment outside quotes.
pub const COMMENT_MARKER: char = '/';

/// Prefix of a field-name hint line.
pub const FIELD_HINT_MARKER: &str = "@!";

/// Field separator of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    #[default]
    Comma,
    Whitespace,
}

/// Delimiter and quote character detected for (or used to write) a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dialect {
    pub delimiter: Delimiter,
    pub quote: char,
}

impl Default for Dialect {
    fn default() -> Self {
        Self {
            delimiter: Delimiter::Comma,
            quote: '\'',
        }
    }
}

impl Dialect {
    /// Text placed between two written fields.
    pub fn separator(&self) -> &'static str {
        match self.delimiter {
            Delimiter::Comma => ", ",
            Delimiter::Whitespace => " ",
        }
    }

    /// The quote character that is not the active one.
    pub fn alternate_quote(&self) -> char {
        if self.quote == '"' {
            '\''
        } else {
            '"'
        }
    }
}

fn is_quote(c: char) -> bool {
    c == '\'' || c == '"'
}

/// Drop everything from the first unquoted comment marker on.
pub fn strip_comment(line: &str) -> &str {
    let mut open: Option<char> = None;
    for (pos, c) in line.char_indices() {
        match open {
            Some(q) if c == q => open = None,
            Some(_) => {}
            None if c == COMMENT_MARKER => return &line[..pos],
            None if is_quote(c) => open = Some(c),
            None => {}
        }
    }
    line
}

/// Collapse unquoted whitespace runs to one space and trim the ends.
pub fn normalize_whitespace(line: &str) -> String {
    let mut out = String::with_capacity(line.len());
    let mut open: Option<char> = None;
    let mut pending_space = false;
    for c in line.trim().chars() {
        match open {
            Some(q) => {
                if c == q {
                    open = None;
                }
                out.push(c);
            }
            None if c.is_whitespace() => pending_space = true,
            None => {
                if pending_space {
                    out.push(' ');
                    pending_space = false;
                }
                if is_quote(c) {
                    open = Some(c);
                }
                out.push(c);
            }
        }
    }
    out
}

/// Detect the dialect of a block from its first record line.
///
/// Comma wins over whitespace whenever an unquoted comma is present. The
/// quote is the first quote character on the line, `'` when there is none.
pub fn detect_dialect(line: &str) -> Dialect {
    let line = strip_comment(line);
    let mut open: Option<char> = None;
    let mut quote: Option<char> = None;
    let mut comma = false;
    for c in line.chars() {
        match open {
            Some(q) if c == q => open = None,
            Some(_) => {}
            None if c == ',' => comma = true,
            None if is_quote(c) => {
                open = Some(c);
                quote.get_or_insert(c);
            }
            None => {}
        }
    }
    Dialect {
        delimiter: if comma {
            Delimiter::Comma
        } else {
            Delimiter::Whitespace
        },
        quote: quote.unwrap_or('\''),
    }
}

/// Split one record line into fields.
pub fn tokenize(line: &str) -> Vec<String> {
    let chars: Vec<char> = strip_comment(line).chars().collect();
    let n = chars.len();
    let mut tokens = Vec::new();
    let mut i = skip_whitespace(&chars, 0);
    if i == n {
        return tokens;
    }

    loop {
        let mut field = String::new();
        if is_quote(chars[i]) {
            let q = chars[i];
            i += 1;
            while i < n && chars[i] != q {
                field.push(chars[i]);
                i += 1;
            }
            if i < n {
                i += 1;
            }
        }
        while i < n && chars[i] != ',' && !chars[i].is_whitespace() {
            field.push(chars[i]);
            i += 1;
        }
        tokens.push(field);

        i = skip_whitespace(&chars, i);
        if i == n {
            break;
        }
        if chars[i] == ',' {
            i = skip_whitespace(&chars, i + 1);
            if i == n {
                tokens.push(String::new());
                break;
            }
        }
    }
    tokens
}

/// Field names of a `@!` hint line.
///
/// Quotes are dropped, blanks inside a name removed (`'N A M E'` names
/// `name`) and names lowercased.
pub fn field_hint_names(rest: &str) -> Vec<String> {
    tokenize(rest)
        .into_iter()
        .map(|name| {
            name.split_whitespace()
                .collect::<String>()
                .to_ascii_lowercase()
        })
        .filter(|name| !name.is_empty())
        .collect()
}

fn skip_whitespace(chars: &[char], mut i: usize) -> usize {
    while i < chars.len() && chars[i].is_whitespace() {
        i += 1;
    }
    i
}
