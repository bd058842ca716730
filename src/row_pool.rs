//! Reusable row records to cut allocation churn on large exports

use std::sync::Mutex;

/// One cell awaiting serialization: its sheet reference and the ordinal
/// of its text in the shared-strings table. Cell type is always
/// shared-string (`t="s"`); text never appears inline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Spreadsheet reference, e.g. "B7"
    pub reference: String,
    /// Ordinal of the cell text in the shared-strings table
    pub string_index: u64,
}

/// One worksheet row awaiting serialization.
///
/// Records are recycled through [`RowPool`]; a record obtained from
/// `acquire` may still carry field contents from a previous row, so
/// callers must [`reset`](RowRecord::reset) it before populating.
#[derive(Debug, Default)]
pub struct RowRecord {
    /// 1-based row number, assigned by the writer
    pub number: u32,
    /// Fixed column span hint, e.g. "1:10"
    pub spans: &'static str,
    /// Fixed row descent formatting hint
    pub dy_descent: &'static str,
    /// Cells in source column order
    pub cells: Vec<Cell>,
}

impl RowRecord {
    /// Clear all fields. Retains the cell vector's capacity.
    pub fn reset(&mut self) {
        self.number = 0;
        self.spans = "";
        self.dy_descent = "";
        self.cells.clear();
    }

    /// Serialize this row as a `<row>` element into `buf`.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        let mut digits = itoa::Buffer::new();
        buf.extend_from_slice(b"<row r=\"");
        buf.extend_from_slice(digits.format(self.number).as_bytes());
        buf.extend_from_slice(b"\" spans=\"");
        buf.extend_from_slice(self.spans.as_bytes());
        buf.extend_from_slice(b"\" x14ac:dyDescent=\"");
        buf.extend_from_slice(self.dy_descent.as_bytes());
        buf.extend_from_slice(b"\">");
        for cell in &self.cells {
            buf.extend_from_slice(b"<c r=\"");
            buf.extend_from_slice(cell.reference.as_bytes());
            buf.extend_from_slice(b"\" t=\"s\"><v>");
            buf.extend_from_slice(digits.format(cell.string_index).as_bytes());
            buf.extend_from_slice(b"</v></c>");
        }
        buf.extend_from_slice(b"</row>");
    }
}

/// Unbounded free list of [`RowRecord`]s.
///
/// The export loop is single-threaded, but the pool tolerates concurrent
/// acquire/release so row production can be parallelized later without
/// changing the contract. Ownership moves out on `acquire` and back on
/// `release`, so a record can never be aliased past its release.
#[derive(Debug, Default)]
pub struct RowPool {
    free: Mutex<Vec<RowRecord>>,
}

impl RowPool {
    pub fn new() -> Self {
        RowPool {
            free: Mutex::new(Vec::new()),
        }
    }

    /// Take a record from the free list, or allocate a fresh one.
    ///
    /// Recycled records keep their previous field contents; call
    /// [`RowRecord::reset`] before use.
    pub fn acquire(&self) -> RowRecord {
        let mut free = match self.free.lock() {
            Ok(guard) => guard,
            // a poisoned free list still only holds reusable records
            Err(poisoned) => poisoned.into_inner(),
        };
        free.pop().unwrap_or_default()
    }

    /// Return a record for future reuse. Call exactly once per acquire,
    /// after the row's XML has been fully serialized.
    pub fn release(&self, row: RowRecord) {
        let mut free = match self.free.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        free.push(row);
    }
}
