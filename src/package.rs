//! OOXML package assembly
//!
//! Owns the export session: two temporary byte stores on disk for the
//! generated worksheet and shared-strings documents, the streaming run
//! against them, and the final zip archive combining generated and
//! static parts. Temporary stores are removed on every exit path.

use std::fs::File;
use std::io::{self, BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tempfile::{Builder, NamedTempFile};
use zip::write::{ExtendedFileOptions, FileOptions};
use zip::{CompressionMethod, ZipWriter};

use crate::error::{ExportError, Result};
use crate::parts;
use crate::sheet_writer::{SheetWriter, DEFAULT_FLUSH_INTERVAL};
use crate::shared_strings::SharedStringEmitter;
use crate::source::RowSource;

const ZIP_BUFFER_SIZE: usize = 64 * 1024;

fn file_options() -> FileOptions<'static, ExtendedFileOptions> {
    FileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .compression_level(Some(6))
        .large_file(true)
}

/// Configurable export session.
///
/// # Examples
///
/// ```no_run
/// use sheetstream::{Exporter, IterSource};
///
/// # fn main() -> sheetstream::Result<()> {
/// let rows = vec![
///     vec!["Name".to_string(), "City".to_string()],
///     vec!["Alice".to_string(), "Oslo".to_string()],
/// ];
/// Exporter::new()
///     .dedup_shared_strings(true)
///     .export("people.xlsx", &mut IterSource::new(rows.into_iter()))?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Exporter {
    flush_interval: u32,
    dedup_shared_strings: bool,
    temp_dir: Option<PathBuf>,
}

impl Default for Exporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter {
    pub fn new() -> Self {
        Exporter {
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            dedup_shared_strings: false,
            temp_dir: None,
        }
    }

    /// Rows between forced flushes of the worksheet and shared-strings
    /// streams. Lower values narrow the data-loss window on abrupt
    /// termination at some throughput cost.
    pub fn flush_interval(mut self, rows: u32) -> Self {
        self.flush_interval = rows.max(1);
        self
    }

    /// Map repeated cell text to a single shared-strings slot.
    ///
    /// Off by default: dedup keeps the whole table in memory, which
    /// defeats constant-memory streaming on datasets with mostly unique
    /// text. Worth enabling for large repeated-value datasets.
    pub fn dedup_shared_strings(mut self, enabled: bool) -> Self {
        self.dedup_shared_strings = enabled;
        self
    }

    /// Directory for the session's temporary stores. Defaults to the
    /// system temp directory. Concurrent sessions may share it; names
    /// are randomized per session.
    pub fn temp_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    /// Run the export: stream `source` into temporary stores, then
    /// assemble the archive at `path`.
    pub fn export<P: AsRef<Path>>(&self, path: P, source: &mut dyn RowSource) -> Result<()> {
        let temp_dir = match &self.temp_dir {
            Some(dir) => dir.clone(),
            None => std::env::temp_dir(),
        };

        let mut sheet_store = new_temp_store(&temp_dir, "sheetstream-sheet-")?;
        let mut strings_store = new_temp_store(&temp_dir, "sheetstream-sst-")?;

        let result = self.run(path.as_ref(), source, &mut sheet_store, &mut strings_store);

        match result {
            Ok(()) => {
                sheet_store.close().map_err(ExportError::Cleanup)?;
                strings_store.close().map_err(ExportError::Cleanup)?;
                Ok(())
            }
            Err(err) => {
                // the functional failure takes precedence over cleanup trouble
                let _ = sheet_store.close();
                let _ = strings_store.close();
                Err(err)
            }
        }
    }

    fn run(
        &self,
        dest: &Path,
        source: &mut dyn RowSource,
        sheet_store: &mut NamedTempFile,
        strings_store: &mut NamedTempFile,
    ) -> Result<()> {
        {
            let mut strings_out = BufWriter::new(strings_store.as_file());
            strings_out.write_all(parts::SST_PREAMBLE.as_bytes())?;

            let emitter = if self.dedup_shared_strings {
                SharedStringEmitter::with_dedup(strings_out)
            } else {
                SharedStringEmitter::new(strings_out)
            };

            let sheet_out = BufWriter::new(sheet_store.as_file());
            let mut writer = SheetWriter::new(sheet_out, emitter);
            writer.set_flush_interval(self.flush_interval);

            let (mut sheet_out, emitter) = writer.stream(source)?;
            let mut strings_out = emitter.into_inner();
            strings_out.write_all(parts::SST_CLOSE.as_bytes())?;
            strings_out.flush()?;
            sheet_out.flush()?;
        }

        assemble(dest, sheet_store, strings_store)
    }
}

fn new_temp_store(dir: &Path, prefix: &str) -> Result<NamedTempFile> {
    Builder::new()
        .prefix(prefix)
        .suffix(".xml")
        .tempfile_in(dir)
        .map_err(|source| ExportError::Create {
            path: dir.to_path_buf(),
            source,
        })
}

/// Copy the generated stores and the static parts into the destination
/// archive under their fixed OOXML entry names.
fn assemble(dest: &Path, sheet_store: &mut NamedTempFile, strings_store: &mut NamedTempFile) -> Result<()> {
    let file = File::create(dest).map_err(|source| ExportError::Create {
        path: dest.to_path_buf(),
        source,
    })?;
    let mut zip = ZipWriter::new(BufWriter::with_capacity(ZIP_BUFFER_SIZE, file));

    for (name, body) in parts::STATIC_PARTS {
        zip.start_file(*name, file_options())?;
        zip.write_all(body.as_bytes())?;
    }

    zip.start_file("docProps/core.xml", file_options())?;
    zip.write_all(parts::core_properties().as_bytes())?;

    sheet_store.as_file_mut().seek(SeekFrom::Start(0))?;
    zip.start_file("xl/worksheets/sheet1.xml", file_options())?;
    io::copy(sheet_store.as_file_mut(), &mut zip)?;

    strings_store.as_file_mut().seek(SeekFrom::Start(0))?;
    zip.start_file("xl/sharedStrings.xml", file_options())?;
    io::copy(strings_store.as_file_mut(), &mut zip)?;

    zip.finish()?;
    Ok(())
}

/// Export with default settings.
///
/// # Examples
///
/// ```no_run
/// use sheetstream::IterSource;
///
/// # fn main() -> sheetstream::Result<()> {
/// let rows = vec![vec!["only cell".to_string()]];
/// sheetstream::export("out.xlsx", &mut IterSource::new(rows.into_iter()))?;
/// # Ok(())
/// # }
/// ```
pub fn export<P: AsRef<Path>>(path: P, source: &mut dyn RowSource) -> Result<()> {
    Exporter::new().export(path, source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::IterSource;
    use tempfile::tempdir;

    fn rows(data: &[&[&str]]) -> IterSource<std::vec::IntoIter<Vec<String>>> {
        let owned: Vec<Vec<String>> = data
            .iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect();
        IterSource::new(owned.into_iter())
    }

    #[test]
    fn test_export_writes_archive() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.xlsx");
        export(&path, &mut rows(&[&["a", "b"], &["c"]])).unwrap();
        assert!(path.exists());
        assert!(path.metadata().unwrap().len() > 0);
    }

    #[test]
    fn test_unwritable_destination_fails_and_cleans_up() {
        let scratch = tempdir().unwrap();
        let exporter = Exporter::new().temp_dir(scratch.path());
        let missing = scratch.path().join("no-such-dir").join("out.xlsx");

        let err = exporter
            .export(&missing, &mut rows(&[&["a"]]))
            .unwrap_err();
        assert!(matches!(err, ExportError::Create { .. }));

        // session stores were removed from the shared temp dir
        let leftovers: Vec<_> = std::fs::read_dir(scratch.path()).unwrap().collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_temp_dir_must_exist() {
        let scratch = tempdir().unwrap();
        let exporter = Exporter::new().temp_dir(scratch.path().join("missing"));
        let dest = scratch.path().join("out.xlsx");
        let err = exporter.export(&dest, &mut rows(&[&["a"]])).unwrap_err();
        assert!(matches!(err, ExportError::Create { .. }));
    }
}
