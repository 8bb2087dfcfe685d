//! Helpers for embedding user data in SQL text.
//!
//! The repository binds parameters and never needs these. They exist for
//! code that composes SQL text directly, such as [`crate::export_sql`].
//! A single quote is the only byte that can terminate a quoted SQL literal,
//! so doubling it is sufficient.

use std::borrow::Cow;

/// Double every `'` in `raw`. All other bytes are left unchanged.
pub fn encode_literal(raw: &[u8]) -> Cow<'_, [u8]> {
    if !raw.contains(&b'\'') {
        return Cow::Borrowed(raw);
    }

    let quotes = raw.iter().filter(|&&b| b == b'\'').count();
    let mut out = Vec::with_capacity(raw.len() + quotes);
    for &b in raw {
        if b == b'\'' {
            out.push(b'\'');
        }
        out.push(b);
    }
    Cow::Owned(out)
}

/// Text form of [`encode_literal`].
pub fn encode_literal_str(raw: &str) -> Cow<'_, str> {
    if raw.contains('\'') {
        Cow::Owned(raw.replace('\'', "''"))
    } else {
        Cow::Borrowed(raw)
    }
}

/// Encode `raw` and wrap it in single quotes.
pub fn quote_literal(raw: &str) -> String {
    format!("'{}'", encode_literal_str(raw))
}

/// Render bytes as a SQLite blob literal (`X'0AFF'`).
pub fn blob_literal(raw: &[u8]) -> String {
    let mut out = String::with_capacity(raw.len() * 2 + 3);
    out.push_str("X'");
    for b in raw {
        out.push_str(&format!("{:02X}", b));
    }
    out.push('\'');
    out
}
