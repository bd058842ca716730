//! Cell text sanitization and XML escaping

use std::borrow::Cow;

/// Returns true for control characters that may not appear in XML 1.0 text.
///
/// Tab, line feed and carriage return are legal whitespace and are kept.
#[inline]
fn is_disallowed(c: char) -> bool {
    (c as u32) <= 31 && c != '\t' && c != '\n' && c != '\r'
}

/// Remove control characters that would make the document unreadable.
///
/// Borrows the input unchanged when it is already clean, which is the
/// common case for tabular data. Idempotent: stripping stripped text is
/// a no-op.
pub fn strip_control_chars(text: &str) -> Cow<'_, str> {
    if !text.chars().any(is_disallowed) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.chars().filter(|c| !is_disallowed(*c)).collect())
}

/// Append `text` to `buf` with the five XML-reserved characters escaped.
///
/// Escaping happens exactly once, at emission time; callers pass text
/// that has already been through [`strip_control_chars`].
pub fn escape_into(buf: &mut Vec<u8>, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => buf.extend_from_slice(b"&amp;"),
            '<' => buf.extend_from_slice(b"&lt;"),
            '>' => buf.extend_from_slice(b"&gt;"),
            '"' => buf.extend_from_slice(b"&quot;"),
            '\'' => buf.extend_from_slice(b"&apos;"),
            c => {
                let mut utf8 = [0u8; 4];
                buf.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
            }
        }
    }
}
