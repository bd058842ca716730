//! Streaming worksheet XML generation

use std::borrow::Cow;
use std::io::Write;

use crate::column::column_letter;
use crate::error::Result;
use crate::row_pool::{Cell, RowPool};
use crate::shared_strings::SharedStringEmitter;
use crate::source::RowSource;

/// Rows between forced flushes of both output streams.
pub const DEFAULT_FLUSH_INTERVAL: u32 = 1000;

/// Fixed span hint carried on every row element.
const ROW_SPANS: &str = "1:10";
/// Fixed descent hint matching the sheet format preamble.
const ROW_DY_DESCENT: &str = "0.25";

/// Column letters pre-computed at construction.
const COLUMN_CACHE_SIZE: usize = 64;

const WORKSHEET_HEADER: &str = concat!(
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>",
    "<worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\"",
    " xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\"",
    " xmlns:mc=\"http://schemas.openxmlformats.org/markup-compatibility/2006\"",
    " mc:Ignorable=\"x14ac\"",
    " xmlns:x14ac=\"http://schemas.microsoft.com/office/spreadsheetml/2009/9/ac\">",
    "<sheetViews><sheetView tabSelected=\"1\" workbookViewId=\"0\">",
    "<selection activeCell=\"A1\" sqref=\"A1\"/></sheetView></sheetViews>",
    "<sheetFormatPr defaultRowHeight=\"15\" x14ac:dyDescent=\"0.25\"/>",
    "<sheetData>"
);

const WORKSHEET_FOOTER: &str = concat!(
    "</sheetData>",
    "<pageMargins left=\"0.7\" right=\"0.7\" top=\"0.75\" bottom=\"0.75\"",
    " header=\"0.3\" footer=\"0.3\"/>",
    "</worksheet>"
);

/// Streams worksheet rows into one output while externalizing cell text
/// into a [`SharedStringEmitter`].
///
/// Rows are pulled from a [`RowSource`], numbered 1-based with no gaps,
/// serialized through a reusable buffer, and written out as they go.
/// Every [`DEFAULT_FLUSH_INTERVAL`] rows both streams are flushed to
/// their backing stores, bounding memory growth. Any I/O error aborts
/// the export; a worksheet that stops mid-stream is not valid output.
pub struct SheetWriter<W: Write, S: Write> {
    sheet: W,
    strings: SharedStringEmitter<S>,
    pool: RowPool,
    row_count: u32,
    flush_interval: u32,
    header_written: bool,
    xml_buffer: Vec<u8>,
    column_cache: Vec<String>,
}

impl<W: Write, S: Write> SheetWriter<W, S> {
    pub fn new(sheet: W, strings: SharedStringEmitter<S>) -> Self {
        let mut column_cache = Vec::with_capacity(COLUMN_CACHE_SIZE);
        for col in 0..COLUMN_CACHE_SIZE {
            column_cache.push(column_letter(col as u32));
        }

        SheetWriter {
            sheet,
            strings,
            pool: RowPool::new(),
            row_count: 0,
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            header_written: false,
            xml_buffer: Vec::with_capacity(8192),
            column_cache,
        }
    }

    /// Set the number of rows between forced flushes.
    pub fn set_flush_interval(&mut self, interval: u32) {
        self.flush_interval = interval.max(1);
    }

    /// Rows written so far.
    pub fn rows_written(&self) -> u32 {
        self.row_count
    }

    fn ensure_header(&mut self) -> Result<()> {
        if self.header_written {
            return Ok(());
        }
        self.sheet.write_all(WORKSHEET_HEADER.as_bytes())?;
        self.header_written = true;
        Ok(())
    }

    /// Append one row. Values are taken in source column order; cell
    /// references and shared-string ordinals are assigned here.
    pub fn write_row<I, T>(&mut self, values: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        self.ensure_header()?;

        let mut row = self.pool.acquire();
        row.reset();

        self.row_count += 1;
        row.number = self.row_count;
        row.spans = ROW_SPANS;
        row.dy_descent = ROW_DY_DESCENT;

        let mut digits = itoa::Buffer::new();
        let row_digits = digits.format(self.row_count);

        for (index, value) in values.into_iter().enumerate() {
            let string_index = self.strings.emit(value.as_ref())?;
            let letters: Cow<'_, str> = match self.column_cache.get(index) {
                Some(cached) => Cow::Borrowed(cached.as_str()),
                None => Cow::Owned(column_letter(index as u32)),
            };
            let mut reference = String::with_capacity(letters.len() + row_digits.len());
            reference.push_str(&letters);
            reference.push_str(row_digits);
            row.cells.push(Cell {
                reference,
                string_index,
            });
        }

        self.xml_buffer.clear();
        row.encode(&mut self.xml_buffer);
        self.pool.release(row);
        self.sheet.write_all(&self.xml_buffer)?;

        if self.row_count % self.flush_interval == 0 {
            self.sheet.flush()?;
            self.strings.flush()?;
        }

        Ok(())
    }

    /// Close `<sheetData>`, write the page-margin trailer and the
    /// worksheet close tag, then flush both streams. Returns the streams
    /// for package assembly.
    pub fn finish(mut self) -> Result<(W, SharedStringEmitter<S>)> {
        self.ensure_header()?;
        self.sheet.write_all(WORKSHEET_FOOTER.as_bytes())?;
        self.sheet.flush()?;
        self.strings.flush()?;
        Ok((self.sheet, self.strings))
    }

    /// Drive the full export state machine: header, row loop until the
    /// source signals its end, footer.
    pub fn stream<R>(mut self, source: &mut R) -> Result<(W, SharedStringEmitter<S>)>
    where
        R: RowSource + ?Sized,
    {
        self.ensure_header()?;
        while let Some(values) = source.next_row() {
            self.write_row(&values)?;
        }
        self.finish()
    }
}
