//! Shared-strings table emission

use std::io::Write;

use indexmap::IndexMap;

use crate::error::Result;
use crate::sanitize::{escape_into, strip_control_chars};

/// Appends cell text to a shared-strings stream and hands out ordinals.
///
/// Each emitted entry is one `<si><t>…</t></si>` record; the ordinal
/// counter is session-scoped and strictly increasing, so an entry's
/// position in the stream always matches the index its cell references.
/// Entries are never reordered or removed.
///
/// By default every cell appends a new entry even when the text repeats,
/// keeping memory flat no matter how many strings pass through. With
/// [`with_dedup`](SharedStringEmitter::with_dedup) repeated text reuses
/// its first slot at the cost of holding the table in memory.
pub struct SharedStringEmitter<S: Write> {
    out: S,
    next_index: u64,
    dedup: Option<IndexMap<String, u64>>,
    buf: Vec<u8>,
}

impl<S: Write> SharedStringEmitter<S> {
    /// Append-only emitter; no duplicate reduction.
    pub fn new(out: S) -> Self {
        SharedStringEmitter {
            out,
            next_index: 0,
            dedup: None,
            buf: Vec::with_capacity(256),
        }
    }

    /// Emitter that maps repeated text back to its first slot.
    pub fn with_dedup(out: S) -> Self {
        SharedStringEmitter {
            out,
            next_index: 0,
            dedup: Some(IndexMap::new()),
            buf: Vec::with_capacity(256),
        }
    }

    /// Sanitize and escape `text`, append its table entry, and return
    /// the entry's ordinal (0-based).
    pub fn emit(&mut self, text: &str) -> Result<u64> {
        let clean = strip_control_chars(text);

        if let Some(table) = &self.dedup {
            if let Some(&index) = table.get(&*clean) {
                return Ok(index);
            }
        }

        self.buf.clear();
        self.buf.extend_from_slice(b"<si><t>");
        escape_into(&mut self.buf, &clean);
        self.buf.extend_from_slice(b"</t></si>");
        self.out.write_all(&self.buf)?;

        let index = self.next_index;
        self.next_index += 1;
        if let Some(table) = &mut self.dedup {
            table.insert(clean.into_owned(), index);
        }
        Ok(index)
    }

    /// Number of entries appended so far.
    pub fn entry_count(&self) -> u64 {
        self.next_index
    }

    /// Flush buffered output to the backing store.
    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    /// Hand the stream back so the caller can wrap the table's root
    /// element around it.
    pub fn into_inner(self) -> S {
        self.out
    }
}
